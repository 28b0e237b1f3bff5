//! HTTP glue integration tests
//!
//! Response parsing plus the whole path from shell input to a scripted
//! transport and back to a structured value.

use std::cell::RefCell;
use std::rc::Rc;

use sofash::http::{Client, HttpError, Method, Response, Transport};
use sofash::repl::EvalResult;
use sofash::script::{Evaluator, Value};

/// Transport replaying canned raw responses and recording what it saw
struct Scripted {
    responses: Vec<String>,
    log: Rc<RefCell<Vec<(Method, String, Option<String>)>>>,
}

impl Transport for Scripted {
    fn request(
        &mut self,
        method: Method,
        url: &str,
        body: Option<&str>,
    ) -> Result<String, HttpError> {
        self.log
            .borrow_mut()
            .push((method, url.to_string(), body.map(str::to_string)));
        if self.responses.is_empty() {
            return Ok("HTTP/1.0 200 OK\r\n\r\n".to_string());
        }
        Ok(self.responses.remove(0))
    }
}

fn scripted_evaluator(
    responses: &[&str],
) -> (Evaluator, Rc<RefCell<Vec<(Method, String, Option<String>)>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let transport = Scripted {
        responses: responses.iter().map(|r| r.to_string()).collect(),
        log: Rc::clone(&log),
    };
    let client = Client::new(Box::new(transport), "http://127.0.0.1:5984");
    (Evaluator::with_client(client), log)
}

fn value(
    evaluator: &mut Evaluator,
    code: &str,
) -> Value {
    match evaluator.evaluate(code) {
        EvalResult::Value(v) => v,
        other => panic!("expected value for {:?}, got {:?}", code, other),
    }
}

#[test]
fn test_parse_response_splits_status_headers_body() {
    let raw = "HTTP/1.1 200 OK\r\n\
               Server: CouchDB/0.9.0 (Erlang OTP/R12B)\r\n\
               Cache-Control: no-cache\r\n\
               Cache-Control: must-revalidate\r\n\
               Content-Type: application/json\r\n\
               \r\n\
               {\"db_name\":\"test_suite_db\",\"doc_count\":10}";
    let response = Response::parse(raw).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(
        response.headers.get("cache-control"),
        Some(&vec!["no-cache".to_string(), "must-revalidate".to_string()])
    );
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.json().unwrap()["doc_count"], serde_json::json!(10));
}

#[test]
fn test_get_builtin_returns_structured_response() {
    let (mut evaluator, log) = scripted_evaluator(&[
        "HTTP/1.0 200 OK\r\nContent-Type: application/json\r\n\r\n{\"ok\":true}",
    ]);

    let status = value(&mut evaluator, r#"var r = get("/test_db"); r.status"#);
    assert_eq!(status, Value::Number(200.0));
    assert_eq!(
        value(&mut evaluator, r#"r.headers["content-type"][0]"#),
        Value::Str("application/json".to_string())
    );
    assert_eq!(
        value(&mut evaluator, "parse(r.body).ok"),
        Value::Bool(true)
    );

    let log = log.borrow();
    assert_eq!(
        *log,
        vec![(
            Method::Get,
            "http://127.0.0.1:5984/test_db".to_string(),
            None
        )]
    );
}

#[test]
fn test_post_builtin_serializes_map_bodies() {
    let (mut evaluator, log) = scripted_evaluator(&[]);

    evaluator.evaluate(r#"post("/db/_purge", {"1": ["1-abc"]})"#);

    let log = log.borrow();
    assert_eq!(log.len(), 1);
    let (method, url, body) = &log[0];
    assert_eq!(*method, Method::Post);
    assert_eq!(url, "http://127.0.0.1:5984/db/_purge");
    assert_eq!(body.as_deref(), Some(r#"{"1":["1-abc"]}"#));
}

#[test]
fn test_verb_failure_is_recoverable_evaluation_error() {
    // No transport configured at all
    let mut evaluator = Evaluator::new();
    match evaluator.evaluate(r#"get("/db")"#) {
        EvalResult::Error(msg) => assert!(msg.contains("transport"), "msg: {}", msg),
        other => panic!("expected error, got {:?}", other),
    }
    // The session is still usable
    assert_eq!(value(&mut evaluator, "1 + 1"), Value::Number(2.0));
}

#[test]
fn test_head_of_all_verbs_dispatch() {
    let (mut evaluator, log) = scripted_evaluator(&[]);
    for code in [
        r#"get("/d")"#,
        r#"head("/d")"#,
        r#"put("/d")"#,
        r#"post("/d")"#,
        r#"delete("/d")"#,
        r#"copy("/d")"#,
        r#"move("/d")"#,
    ] {
        assert!(
            matches!(evaluator.evaluate(code), EvalResult::Value(_)),
            "failed: {}",
            code
        );
    }
    let methods: Vec<Method> = log.borrow().iter().map(|(m, _, _)| *m).collect();
    assert_eq!(
        methods,
        vec![
            Method::Get,
            Method::Head,
            Method::Put,
            Method::Post,
            Method::Delete,
            Method::Copy,
            Method::Move,
        ]
    );
}
