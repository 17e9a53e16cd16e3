//! Surface syntax front end: logos lexer plus recursive-descent grammar.

mod grammar;
mod lexer;


pub use grammar::parse;
pub use lexer::Token;
