//! Parser for the shell command language
//!
//! Recursive descent with one token of lookahead. A program is a sequence
//! of statements separated by newlines or semicolons; expressions use the
//! usual precedence ladder (`||` lowest, postfix highest).

use super::ast::{BinaryOp, Expr, Stmt, UnaryOp};
use super::error::{ScriptError, ScriptResult};
use super::lexer::{tokenize, Token};

/// Parse source text into a statement list
pub fn parse(source: &str) -> ScriptResult<Vec<Stmt>> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn program(mut self) -> ScriptResult<Vec<Stmt>> {
        let mut stmts = Vec::new();

        self.skip_separators();
        while self.peek().is_some() {
            stmts.push(self.statement()?);

            // A statement ends at a separator or at the end of input
            match self.peek() {
                None => {}
                Some(Token::Newline) | Some(Token::Semicolon) => self.skip_separators(),
                Some(other) => {
                    return Err(ScriptError::Syntax(format!(
                        "expected end of statement, found {}",
                        other.describe()
                    )))
                }
            }
        }

        Ok(stmts)
    }

    fn statement(&mut self) -> ScriptResult<Stmt> {
        if self.peek() == Some(&Token::Var) {
            self.advance();
            let name = self.expect_ident()?;
            self.expect(&Token::Eq)?;
            let value = self.expression()?;
            return Ok(Stmt::Var(name, value));
        }

        Ok(Stmt::Expr(self.expression()?))
    }

    fn expression(&mut self) -> ScriptResult<Expr> {
        // Assignment needs two tokens of lookahead: `name = ...` but not
        // `name == ...`
        if let Some(Token::Ident(name)) = self.peek() {
            if self.peek_at(1) == Some(&Token::Eq) {
                let name = name.clone();
                self.advance();
                self.advance();
                let value = self.expression()?;
                return Ok(Expr::Assign(name, Box::new(value)));
            }
        }

        self.or_expr()
    }

    fn or_expr(&mut self) -> ScriptResult<Expr> {
        let mut left = self.and_expr()?;
        while self.eat(&Token::OrOr) {
            let right = self.and_expr()?;
            left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> ScriptResult<Expr> {
        let mut left = self.equality()?;
        while self.eat(&Token::AndAnd) {
            let right = self.equality()?;
            left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn equality(&mut self) -> ScriptResult<Expr> {
        let mut left = self.comparison()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::BangEq) => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.comparison()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn comparison(&mut self) -> ScriptResult<Expr> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::LtEq) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::GtEq) => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn additive(&mut self) -> ScriptResult<Expr> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> ScriptResult<Expr> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> ScriptResult<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Ok(Expr::Unary(UnaryOp::Neg, Box::new(self.unary()?)))
            }
            Some(Token::Bang) => {
                self.advance();
                Ok(Expr::Unary(UnaryOp::Not, Box::new(self.unary()?)))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> ScriptResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    let name = match expr {
                        Expr::Ident(ref name) => name.clone(),
                        _ => {
                            return Err(ScriptError::Syntax(
                                "only builtin functions can be called".to_string(),
                            ))
                        }
                    };
                    self.advance();
                    let args = self.arguments()?;
                    expr = Expr::Call(name, args);
                }
                Some(Token::Dot) => {
                    self.advance();
                    let name = self.expect_ident()?;
                    expr = Expr::Member(Box::new(expr), name);
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let index = self.expression()?;
                    self.expect(&Token::RBracket)?;
                    expr = Expr::Index(Box::new(expr), Box::new(index));
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn arguments(&mut self) -> ScriptResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen)?;
            return Ok(args);
        }
    }

    fn primary(&mut self) -> ScriptResult<Expr> {
        match self.advance() {
            Some(Token::Null) => Ok(Expr::Null),
            Some(Token::True) => Ok(Expr::Bool(true)),
            Some(Token::False) => Ok(Expr::Bool(false)),
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::Ident(name)) => Ok(Expr::Ident(name)),
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::LBracket) => {
                let mut items = Vec::new();
                if self.eat(&Token::RBracket) {
                    return Ok(Expr::List(items));
                }
                loop {
                    items.push(self.expression()?);
                    if self.eat(&Token::Comma) {
                        continue;
                    }
                    self.expect(&Token::RBracket)?;
                    return Ok(Expr::List(items));
                }
            }
            Some(Token::LBrace) => {
                let mut entries = Vec::new();
                if self.eat(&Token::RBrace) {
                    return Ok(Expr::Map(entries));
                }
                loop {
                    let key = match self.advance() {
                        Some(Token::Ident(name)) => name,
                        Some(Token::Str(s)) => s,
                        Some(other) => {
                            return Err(ScriptError::Syntax(format!(
                                "expected map key, found {}",
                                other.describe()
                            )))
                        }
                        None => {
                            return Err(ScriptError::Syntax(
                                "expected map key, found end of input".to_string(),
                            ))
                        }
                    };
                    self.expect(&Token::Colon)?;
                    let value = self.expression()?;
                    entries.push((key, value));
                    if self.eat(&Token::Comma) {
                        continue;
                    }
                    self.expect(&Token::RBrace)?;
                    return Ok(Expr::Map(entries));
                }
            }
            Some(other) => Err(ScriptError::Syntax(format!(
                "unexpected {}",
                other.describe()
            ))),
            None => Err(ScriptError::Syntax(
                "unexpected end of input".to_string(),
            )),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(
        &self,
        offset: usize,
    ) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(
        &mut self,
        token: &Token,
    ) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(
        &mut self,
        token: &Token,
    ) -> ScriptResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(ScriptError::Syntax(match self.peek() {
                Some(found) => format!(
                    "expected {}, found {}",
                    token.describe(),
                    found.describe()
                ),
                None => format!("expected {}, found end of input", token.describe()),
            }))
        }
    }

    fn expect_ident(&mut self) -> ScriptResult<String> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name),
            Some(other) => Err(ScriptError::Syntax(format!(
                "expected identifier, found {}",
                other.describe()
            ))),
            None => Err(ScriptError::Syntax(
                "expected identifier, found end of input".to_string(),
            )),
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(Token::Newline) | Some(Token::Semicolon)) {
            self.pos += 1;
        }
    }
}
