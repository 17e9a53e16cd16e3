//! Recursive-descent parser producing the AST directly.
//!
//! Precedence, loosest to tightest: concatenation, additive,
//! multiplicative, postfix (call, field, index, `as`), primary. Statements
//! are juxtaposed; an expression followed by `=` is an assignment.
//!
//! Parse errors are fatal and unrecoverable, like every other error in the
//! pass; no partial AST is produced.

use std::ops::Range;

use logos::Logos;

use crate::ast::{BinOp, Node, Param, TableField, TypeExpr};
use crate::error::{Error, Result};
use crate::types::Primitive;

use super::lexer::Token;

/// Parse a whole source text into a `Node::Program`.
pub fn parse(source: &str) -> Result<Node> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(error_at(source, span, "unrecognized character".to_owned()));
            }
        }
    }

    Parser {
        source,
        tokens,
        pos: 0,
    }
    .program()
}

fn error_at(source: &str, span: Range<usize>, message: String) -> Error {
    let prefix = &source[..span.start.min(source.len())];
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rsplit('\n').next().map_or(0, str::len) + 1;
    Error::Parse {
        line,
        column,
        message,
    }
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(token.describe()))
        }
    }

    fn unexpected(&self, wanted: &str) -> Error {
        match self.tokens.get(self.pos) {
            Some((found, span)) => error_at(
                self.source,
                span.clone(),
                format!("expected {wanted}, found {}", found.describe()),
            ),
            None => error_at(
                self.source,
                self.source.len()..self.source.len(),
                format!("expected {wanted}, found end of input"),
            ),
        }
    }

    fn ident(&mut self) -> Result<String> {
        match self.peek() {
            Some(Token::Ident(_)) => match self.next() {
                Some(Token::Ident(name)) => Ok(name),
                _ => unreachable!(),
            },
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn program(mut self) -> Result<Node> {
        let mut statements = Vec::new();
        while self.peek().is_some() {
            statements.push(self.statement()?);
        }
        Ok(Node::Program { statements })
    }

    fn statement(&mut self) -> Result<Node> {
        if self.eat(&Token::Let) {
            let name = self.ident()?;
            let annotation = if self.eat(&Token::Colon) {
                Some(self.type_expr()?)
            } else {
                None
            };
            let value = if self.eat(&Token::Eq) {
                Some(Box::new(self.expr()?))
            } else {
                None
            };
            return Ok(Node::Let {
                name,
                annotation,
                value,
            });
        }

        let expr = self.expr()?;
        if self.eat(&Token::Eq) {
            let right = self.expr()?;
            return Ok(Node::Assign {
                left: Box::new(expr),
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn expr(&mut self) -> Result<Node> {
        let mut left = self.additive()?;
        while self.eat(&Token::DotDot) {
            let right = self.additive()?;
            left = Node::Binary {
                op: BinOp::Concat,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Node> {
        let mut left = self.multiplicative()?;
        loop {
            let op = if self.eat(&Token::Plus) {
                BinOp::Plus
            } else if self.eat(&Token::Minus) {
                BinOp::Minus
            } else {
                return Ok(left);
            };
            let right = self.multiplicative()?;
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn multiplicative(&mut self) -> Result<Node> {
        let mut left = self.postfix()?;
        loop {
            let op = if self.eat(&Token::Star) {
                BinOp::Times
            } else if self.eat(&Token::Slash) {
                BinOp::Over
            } else {
                return Ok(left);
            };
            let right = self.postfix()?;
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn postfix(&mut self) -> Result<Node> {
        let mut node = self.primary()?;
        loop {
            if self.eat(&Token::LParen) {
                let mut args = Vec::new();
                if !self.at(&Token::RParen) {
                    loop {
                        args.push(self.expr()?);
                        if !self.eat(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&Token::RParen)?;
                node = Node::Call {
                    callee: Box::new(node),
                    args,
                };
            } else if self.eat(&Token::Dot) {
                let field = self.ident()?;
                node = Node::Traverse {
                    target: Box::new(node),
                    field,
                };
            } else if self.eat(&Token::LBracket) {
                let index = self.expr()?;
                self.expect(&Token::RBracket)?;
                node = Node::Index {
                    target: Box::new(node),
                    index: Box::new(index),
                };
            } else if self.eat(&Token::As) {
                let annotation = self.type_expr()?;
                node = Node::As {
                    value: Box::new(node),
                    annotation,
                };
            } else {
                return Ok(node);
            }
        }
    }

    fn primary(&mut self) -> Result<Node> {
        match self.peek() {
            Some(Token::Number(_)) => match self.next() {
                Some(Token::Number(text)) => Ok(Node::Factor {
                    text,
                    ty: Primitive::Number,
                }),
                _ => unreachable!(),
            },
            Some(Token::Str(_)) => match self.next() {
                Some(Token::Str(text)) => Ok(Node::Factor {
                    text,
                    ty: Primitive::String,
                }),
                _ => unreachable!(),
            },
            Some(Token::True) => {
                self.pos += 1;
                Ok(Node::Factor {
                    text: "true".to_owned(),
                    ty: Primitive::Bool,
                })
            }
            Some(Token::False) => {
                self.pos += 1;
                Ok(Node::Factor {
                    text: "false".to_owned(),
                    ty: Primitive::Bool,
                })
            }
            Some(Token::Nil) => {
                self.pos += 1;
                Ok(Node::Factor {
                    text: "nil".to_owned(),
                    ty: Primitive::Nil,
                })
            }
            Some(Token::Ident(_)) => {
                let name = self.ident()?;
                Ok(Node::Variable { name })
            }
            Some(Token::Typeof) => {
                self.pos += 1;
                let annotation = self.type_expr()?;
                Ok(Node::TypeOf { annotation })
            }
            Some(Token::LBrace) => self.table_literal(),
            Some(Token::LBracket) => self.array_literal(),
            Some(Token::LParen) => {
                if self.lparen_starts_function() {
                    self.function_literal()
                } else {
                    self.pos += 1;
                    let inner = self.expr()?;
                    self.expect(&Token::RParen)?;
                    Ok(Node::Group(Box::new(inner)))
                }
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Disambiguate `(` between a group and a function literal by scanning
    /// to the matching `)`: a following `=>` or `:` means a signature.
    fn lparen_starts_function(&self) -> bool {
        let mut depth = 0usize;
        for (i, (token, _)) in self.tokens[self.pos..].iter().enumerate() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(self.pos + i + 1).map(|(t, _)| t),
                            Some(Token::Arrow) | Some(Token::Colon)
                        );
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn function_literal(&mut self) -> Result<Node> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        if !self.at(&Token::RParen) {
            loop {
                let name = self.ident()?;
                let annotation = if self.eat(&Token::Colon) {
                    Some(self.type_expr()?)
                } else {
                    None
                };
                params.push(Param { name, annotation });
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;

        let ret = if self.eat(&Token::Colon) {
            Some(self.type_expr()?)
        } else {
            None
        };

        self.expect(&Token::Arrow)?;
        let body = self.expr()?;

        Ok(Node::Function {
            params,
            ret,
            body: Box::new(body),
        })
    }

    fn table_literal(&mut self) -> Result<Node> {
        self.expect(&Token::LBrace)?;
        let mut fields = Vec::new();
        if !self.at(&Token::RBrace) {
            loop {
                let name = self.ident()?;
                self.expect(&Token::Eq)?;
                let value = self.expr()?;
                fields.push(TableField { name, value });
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RBrace)?;
        Ok(Node::TableLit { fields })
    }

    fn array_literal(&mut self) -> Result<Node> {
        self.expect(&Token::LBracket)?;
        let mut items = Vec::new();
        if !self.at(&Token::RBracket) {
            loop {
                items.push(self.expr()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RBracket)?;
        Ok(Node::ArrayLit { items })
    }

    fn type_expr(&mut self) -> Result<TypeExpr> {
        match self.peek() {
            Some(Token::NumberKw) => {
                self.pos += 1;
                Ok(TypeExpr::Primitive(Primitive::Number))
            }
            Some(Token::StringKw) => {
                self.pos += 1;
                Ok(TypeExpr::Primitive(Primitive::String))
            }
            Some(Token::BoolKw) => {
                self.pos += 1;
                Ok(TypeExpr::Primitive(Primitive::Bool))
            }
            Some(Token::Nil) => {
                self.pos += 1;
                Ok(TypeExpr::Primitive(Primitive::Nil))
            }
            Some(Token::AnyKw) => {
                self.pos += 1;
                Ok(TypeExpr::Primitive(Primitive::Any))
            }
            Some(Token::Generic(_)) => match self.next() {
                Some(Token::Generic(name)) => Ok(TypeExpr::Generic(name)),
                _ => unreachable!(),
            },
            Some(Token::LBracket) => {
                self.pos += 1;
                let inner = self.type_expr()?;
                self.expect(&Token::RBracket)?;
                Ok(TypeExpr::Array(Box::new(inner)))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let mut params = Vec::new();
                if !self.at(&Token::RParen) {
                    loop {
                        params.push(self.type_expr()?);
                        if !self.eat(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&Token::RParen)?;
                self.expect(&Token::Arrow)?;
                let ret = self.type_expr()?;
                Ok(TypeExpr::Function {
                    params,
                    ret: Box::new(ret),
                })
            }
            _ => Err(self.unexpected("type")),
        }
    }
}
