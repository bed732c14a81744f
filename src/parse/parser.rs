use crate::{LogicalOp, Node, Value};

use super::ParseError;
use super::lexer::{Token, TokenKind};

/// Deepest parenthesis nesting accepted before giving up.
pub const MAX_NESTING: usize = 128;

/// Deepest tree accepted, counted in logical operators from root to leaf.
/// A flat `a AND b AND ...` chain adds one level per operator.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser over a token slice with one token of lookahead.
///
/// ```text
/// expr       := term ((AND | OR) term)*      left-assoc, AND and OR share precedence
/// term       := '(' expr ')' | comparison
/// comparison := IDENT OP (STRING | NUMBER | BOOL)
/// ```
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.pos, self.peek().map(|t| t.offset))
    }

    fn found(&self) -> String {
        match self.peek() {
            Some(token) => token.kind.to_string(),
            None => "end of input".to_owned(),
        }
    }

    fn expr(&mut self) -> Result<Node, ParseError> {
        let mut node = self.term()?;
        let mut depth = node.depth();
        while let Some(token) = self.peek() {
            let Some(op) = logical_op(&token.kind) else {
                break;
            };
            let op_pos = self.pos;
            self.bump();
            if self.peek().is_none() {
                return Err(self.error_here(format!("missing operand after '{op}'")));
            }
            let right = self.term()?;
            depth = depth.max(right.depth()) + 1;
            if depth > MAX_DEPTH {
                return Err(ParseError::new(
                    format!("logical operators nested deeper than {MAX_DEPTH} levels"),
                    op_pos,
                    Some(token.offset),
                ));
            }
            node = Node::logical(op, node, right);
        }
        Ok(node)
    }

    fn term(&mut self) -> Result<Node, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.error_here("expected a comparison or '(', found end of input"));
        };
        match &token.kind {
            TokenKind::LParen => self.group(token),
            TokenKind::Ident(_) => self.comparison(),
            _ => Err(self.error_here(format!(
                "expected a comparison or '(', found {}",
                self.found()
            ))),
        }
    }

    fn group(&mut self, open: &Token) -> Result<Node, ParseError> {
        let open_pos = self.pos;
        if self.depth >= MAX_NESTING {
            return Err(self.error_here(format!(
                "parentheses nested deeper than {MAX_NESTING} levels"
            )));
        }
        self.bump();
        self.depth += 1;
        let inner = self.expr()?;
        self.depth -= 1;
        match self.peek() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => {
                self.bump();
                Ok(inner)
            }
            _ => Err(ParseError::new(
                format!(
                    "unmatched '(' at token {open_pos}: expected ')', found {}",
                    self.found()
                ),
                open_pos,
                Some(open.offset),
            )),
        }
    }

    fn comparison(&mut self) -> Result<Node, ParseError> {
        let attribute = match self.bump() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => name.clone(),
            _ => unreachable!("comparison() is only entered on an identifier"),
        };

        let op = match self.peek() {
            Some(Token {
                kind: TokenKind::Op(op),
                ..
            }) => *op,
            _ => {
                return Err(self.error_here(format!(
                    "comparison on '{attribute}' is missing an operator, found {}",
                    self.found()
                )));
            }
        };
        self.bump();

        let literal = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Str(s)) => Value::String(s.clone()),
            Some(TokenKind::Number(n)) => n.clone(),
            Some(TokenKind::Ident(word)) if word.eq_ignore_ascii_case("true") => Value::Bool(true),
            Some(TokenKind::Ident(word)) if word.eq_ignore_ascii_case("false") => {
                Value::Bool(false)
            }
            _ => {
                return Err(self.error_here(format!(
                    "comparison '{attribute} {op}' is missing a literal, found {}",
                    self.found()
                )));
            }
        };
        self.bump();

        Ok(Node::Comparison {
            attribute,
            op,
            literal,
        })
    }
}

fn logical_op(kind: &TokenKind) -> Option<LogicalOp> {
    match kind {
        TokenKind::And => Some(LogicalOp::And),
        TokenKind::Or => Some(LogicalOp::Or),
        _ => None,
    }
}

/// Parse a complete token stream into a tree.
///
/// # Errors
///
/// Returns [`ParseError`] on empty input, unbalanced parentheses, a missing
/// operand or literal, or tokens left over after a complete expression.
pub fn parse_tokens(tokens: &[Token]) -> Result<Node, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::new("rule is empty", 0, None));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let node = parser.expr()?;

    match parser.peek() {
        None => Ok(node),
        Some(Token {
            kind: TokenKind::RParen,
            ..
        }) => Err(parser.error_here("unmatched ')'")),
        Some(token) => Err(parser.error_here(format!(
            "unexpected {} after complete expression",
            token.kind
        ))),
    }
}
