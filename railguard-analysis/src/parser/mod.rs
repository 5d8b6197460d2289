//! Ruby Mini-Parser: tokenizer plus a tolerant recursive-descent builder
//! that turns route files and controller files into the shared mini-AST.

pub mod ast_builder;
pub mod lexer;

pub use ast_builder::{parse, parse_file};
