//! tinylex Library
//!
//! This library provides a small pull-based lexical scanner: identifiers,
//! integer literals, single-character operators and statement terminators,
//! each tagged with its line/column position.

pub mod error;
pub mod lexer;
pub mod session;

// Re-export commonly used types
pub use error::{ErrorCollector, LexError, LexResult, TinylexError, TinylexResult};
pub use lexer::{Lexer, Position, Span, Token, TokenKind};
pub use session::ScanSession;
