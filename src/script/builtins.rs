//! Builtin functions
//!
//! The fixed function namespace of the shell: a few data helpers plus the
//! HTTP verb helpers that make it a database shell. Verbs go through the
//! evaluator's [`Client`] and come back as `{status, headers, body}` maps.

use indexmap::IndexMap;

use crate::http::{Client, Method, Response};

use super::error::{ScriptError, ScriptResult};
use super::value::Value;

/// Whether `name` is a builtin
pub fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "print"
            | "typeof"
            | "len"
            | "keys"
            | "parse"
            | "stringify"
            | "get"
            | "head"
            | "put"
            | "post"
            | "delete"
            | "copy"
            | "move"
    )
}

/// Dispatch a builtin call
pub fn call(
    name: &str,
    args: Vec<Value>,
    client: Option<&mut Client>,
) -> ScriptResult<Value> {
    match name {
        "print" => {
            let line = args
                .iter()
                .map(Value::to_raw_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", line);
            Ok(Value::Null)
        }
        "typeof" => {
            let [value] = one("typeof", args)?;
            Ok(Value::Str(value.type_name().to_string()))
        }
        "len" => {
            let [value] = one("len", args)?;
            let len = match &value {
                Value::Str(s) => s.chars().count(),
                Value::List(items) => items.len(),
                Value::Map(entries) => entries.len(),
                other => {
                    return Err(ScriptError::Type(format!(
                        "len of {}",
                        other.type_name()
                    )))
                }
            };
            Ok(Value::Number(len as f64))
        }
        "keys" => {
            let [value] = one("keys", args)?;
            match value {
                Value::Map(entries) => Ok(Value::List(
                    entries.keys().cloned().map(Value::Str).collect(),
                )),
                other => Err(ScriptError::Type(format!(
                    "keys of {}",
                    other.type_name()
                ))),
            }
        }
        "parse" => {
            let [value] = one("parse", args)?;
            match value {
                Value::Str(text) => Ok(Value::from_json(serde_json::from_str(&text)?)),
                other => Err(ScriptError::Type(format!(
                    "parse of {}",
                    other.type_name()
                ))),
            }
        }
        "stringify" => {
            let [value] = one("stringify", args)?;
            Ok(Value::Str(serde_json::to_string(&value.to_json())?))
        }
        "get" => verb("get", Method::Get, args, client),
        "head" => verb("head", Method::Head, args, client),
        "delete" => verb("delete", Method::Delete, args, client),
        "copy" => verb("copy", Method::Copy, args, client),
        "move" => verb("move", Method::Move, args, client),
        "put" => verb_with_body("put", Method::Put, args, client),
        "post" => verb_with_body("post", Method::Post, args, client),
        other => Err(ScriptError::UnknownFunction(other.to_string())),
    }
}

fn one(
    name: &'static str,
    args: Vec<Value>,
) -> ScriptResult<[Value; 1]> {
    let got = args.len();
    <[Value; 1]>::try_from(args).map_err(|_| ScriptError::Arity {
        name,
        expected: "1",
        got,
    })
}

fn url_arg(
    name: &'static str,
    value: Value,
) -> ScriptResult<String> {
    match value {
        Value::Str(url) => Ok(url),
        other => Err(ScriptError::Type(format!(
            "{} expects a url string, got {}",
            name,
            other.type_name()
        ))),
    }
}

/// Bodyless verb: `name(url)`
fn verb(
    name: &'static str,
    method: Method,
    args: Vec<Value>,
    client: Option<&mut Client>,
) -> ScriptResult<Value> {
    let [url] = one(name, args)?;
    let url = url_arg(name, url)?;
    dispatch(method, &url, None, client)
}

/// Verb taking an optional body: `name(url)` or `name(url, body)`
///
/// A string body is sent verbatim; any other value is serialized to JSON
/// first, so `post("/db/_purge", {"1": [rev]})` works unquoted.
fn verb_with_body(
    name: &'static str,
    method: Method,
    args: Vec<Value>,
    client: Option<&mut Client>,
) -> ScriptResult<Value> {
    if args.is_empty() || args.len() > 2 {
        return Err(ScriptError::Arity {
            name,
            expected: "1 or 2",
            got: args.len(),
        });
    }
    let mut args = args.into_iter();
    let url = url_arg(name, args.next().unwrap_or(Value::Null))?;
    let body = match args.next() {
        None => None,
        Some(Value::Str(text)) => Some(text),
        Some(other) => Some(serde_json::to_string(&other.to_json())?),
    };
    dispatch(method, &url, body.as_deref(), client)
}

fn dispatch(
    method: Method,
    url: &str,
    body: Option<&str>,
    client: Option<&mut Client>,
) -> ScriptResult<Value> {
    let client = client.ok_or(ScriptError::NoTransport)?;
    let response = client.request(method, url, body)?;
    Ok(response_value(&response))
}

/// Structure a response the way the shell shows it: status, headers (name
/// -> list of values), raw body
fn response_value(response: &Response) -> Value {
    let mut headers = IndexMap::new();
    for (key, values) in response.headers.iter() {
        headers.insert(
            key.clone(),
            Value::List(values.iter().cloned().map(Value::Str).collect()),
        );
    }

    let mut entries = IndexMap::new();
    entries.insert("status".to_string(), Value::Number(response.status as f64));
    entries.insert("headers".to_string(), Value::Map(headers));
    entries.insert("body".to_string(), Value::Str(response.body.clone()));
    Value::Map(entries)
}
