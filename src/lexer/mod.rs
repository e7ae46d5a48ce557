//! Lexical analysis module.
//!
//! Converts a character stream into positioned tokens: letter-only
//! identifiers, decimal integer literals, the single-character operators
//! `+ - * / =` and the `;` terminator. Anything else is reported in-band as an
//! `Illegal` token so that scanning can continue.

mod chars;
#[allow(clippy::module_inception)]
mod lexer;
mod source;
mod token;

pub use chars::{digit_value, is_decimal_digit, is_letter};
pub use lexer::Lexer;
pub use source::CharSource;
pub use token::{Position, Span, Token, TokenKind};

use crate::error::LexResult;

/// ソースコードをトークン化（最後の `EndOfInput` を含む）
pub fn tokenize(input: &str) -> LexResult<Vec<Token>> {
    Lexer::from_text(input).collect_tokens()
}

/// デバッグ用：トークンストリームを文字列として出力
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}:{} {} {:?}", t.position.line, t.position.column, t.kind, t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_ends_with_eof() {
        let tokens = tokenize("x = 1;").unwrap();
        assert_eq!(tokens.len(), 5);
        assert!(tokens.last().is_some_and(Token::is_eof));
        assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
    }

    #[test]
    fn test_tokenize_only_whitespace() {
        let tokens = tokenize("  \n\t \n").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
        assert_eq!(tokens[0].position, Position { line: 3, column: 0 });
    }

    #[test]
    fn test_format_tokens() {
        let tokens = tokenize("a*2").unwrap();
        assert_eq!(
            format_tokens(&tokens),
            "1:1 IDENT \"a\"\n1:2 * \"*\"\n1:3 INT \"2\"\n1:3 EOF \"\""
        );
    }
}
