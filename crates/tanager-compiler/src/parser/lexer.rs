//! Token definitions for the Tanager surface syntax.

use logos::Logos;

/// One lexical token. Literal and name tokens carry their source text.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip(r"--[^\n]*", allow_greedy = true))]
pub enum Token {
    #[token("let")]
    Let,
    #[token("as")]
    As,
    #[token("typeof")]
    Typeof,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,

    // Primitive type keywords.
    #[token("number")]
    NumberKw,
    #[token("string")]
    StringKw,
    #[token("bool")]
    BoolKw,
    #[token("any")]
    AnyKw,

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_owned())]
    Number(String),
    /// String literal, quotes included; the text is already valid Lua.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice().to_owned())]
    Str(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Ident(String),
    /// `$Name`; the payload drops the sigil.
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice()[1..].to_owned())]
    Generic(String),

    #[token("=>")]
    Arrow,
    #[token("..")]
    DotDot,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
}

impl Token {
    /// Human-readable description for parse errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Let => "`let`",
            Token::As => "`as`",
            Token::Typeof => "`typeof`",
            Token::True | Token::False => "boolean literal",
            Token::Nil => "`nil`",
            Token::NumberKw | Token::StringKw | Token::BoolKw | Token::AnyKw => "type name",
            Token::Number(_) => "number literal",
            Token::Str(_) => "string literal",
            Token::Ident(_) => "identifier",
            Token::Generic(_) => "generic name",
            Token::Arrow => "`=>`",
            Token::DotDot => "`..`",
            Token::Plus => "`+`",
            Token::Minus => "`-`",
            Token::Star => "`*`",
            Token::Slash => "`/`",
            Token::Eq => "`=`",
            Token::Colon => "`:`",
            Token::Comma => "`,`",
            Token::Dot => "`.`",
            Token::LParen => "`(`",
            Token::RParen => "`)`",
            Token::LBracket => "`[`",
            Token::RBracket => "`]`",
            Token::LBrace => "`{`",
            Token::RBrace => "`}`",
        }
    }
}
