//! Parsing, graph construction and interpretation of twee stories.

pub mod completion;
pub mod condition;
pub mod content;
pub mod dialog;
pub mod lexer;
pub mod links;
pub mod lint;
pub mod loader;
pub mod macros;
pub mod parser;
pub mod state;
pub mod story;
