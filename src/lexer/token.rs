//! トークン定義

use serde::Serialize;

use super::chars::digit_value;
use std::fmt;

/// トークンの種類
///
/// 固定の集合で、拡張ポイントは持たない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    EndOfInput,
    Illegal,
    Identifier,
    IntegerLiteral,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
}

impl TokenKind {
    /// トークン種別の表示名
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::EndOfInput => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Identifier => "IDENT",
            TokenKind::IntegerLiteral => "INT",
            TokenKind::Semicolon => ";",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Assign => "=",
        }
    }

    /// 1文字の演算子・区切り文字に対応する種別を返す
    pub const fn from_operator(ch: char) -> Option<TokenKind> {
        match ch {
            ';' => Some(TokenKind::Semicolon),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '=' => Some(TokenKind::Assign),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position tracking for tokens.
///
/// `line` is 1-based. `column` counts the characters consumed on the current
/// line, so the first character of a line sits at column 1 and a freshly
/// started line is at column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new() -> Self {
        Position { line: 1, column: 0 }
    }

    /// 改行以外の文字を1つ消費した
    pub fn advance(&mut self) {
        self.column += 1;
    }

    /// 改行を消費した
    pub fn newline(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    /// 押し戻しに合わせて直前の `advance` を取り消す
    pub fn retreat(&mut self) {
        self.column = self.column.saturating_sub(1);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// 入力中のバイト範囲（終端は含まない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// 位置情報付きトークン
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub position: Position,
    pub kind: TokenKind,
    /// 字句そのもの。`EndOfInput` では空。
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(position: Position, kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            position,
            kind,
            text: text.into(),
            span,
        }
    }

    /// 入力終端トークンを作成
    pub fn eof(position: Position, offset: usize) -> Self {
        Self::new(position, TokenKind::EndOfInput, String::new(), Span::new(offset, offset))
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    pub fn is_illegal(&self) -> bool {
        self.kind == TokenKind::Illegal
    }

    /// 整数リテラルの値。桁あふれや他の種別では `None`。
    ///
    /// ASCII 以外の10進数字も桁ごとに値を求める。
    pub fn int_value(&self) -> Option<u64> {
        if self.kind != TokenKind::IntegerLiteral {
            return None;
        }
        self.text.chars().try_fold(0u64, |acc, ch| {
            acc.checked_mul(10)?.checked_add(u64::from(digit_value(ch)?))
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "{} {}", self.position, self.kind),
            TokenKind::Identifier | TokenKind::IntegerLiteral | TokenKind::Illegal => {
                write!(f, "{} {}({:?})", self.position, self.kind, self.text)
            }
            _ => write!(f, "{} {}", self.position, self.kind),
        }
    }
}
