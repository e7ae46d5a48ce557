//! レキサーのメイン実装

use std::io::Read;

use super::chars::{is_decimal_digit, is_letter};
use super::source::CharSource;
use super::token::{Position, Span, Token, TokenKind};
use crate::error::{LexError, LexResult};

/// 文字ストリームを位置情報付きトークンに変換するレキサー
///
/// 呼び出し側が `next_token` を繰り返し呼び、`EndOfInput` を受け取るまで
/// 走査を進める。`EndOfInput` の後は何度呼んでも `EndOfInput` を返す。
pub struct Lexer<R: Read> {
    source: CharSource<R>,
    position: Position,
    poisoned: bool,
    /// イテレータとして終端（または致命的エラー）を返し終えた
    finished: bool,
}

impl<'a> Lexer<&'a [u8]> {
    /// 文字列からレキサーを作成
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<R: Read> Lexer<R> {
    /// 新しいレキサーを作成
    pub fn new(reader: R) -> Self {
        Self {
            source: CharSource::new(reader),
            position: Position::new(),
            poisoned: false,
            finished: false,
        }
    }

    /// 最後に消費した文字の位置
    pub fn position(&self) -> Position {
        self.position
    }

    /// 次のトークンを取得
    ///
    /// 入力の読み込みに失敗した場合は致命的エラーを返し、それ以降の呼び出しは
    /// すべて `LexError::Poisoned` になる。
    pub fn next_token(&mut self) -> LexResult<Token> {
        if self.poisoned {
            return Err(LexError::Poisoned);
        }

        match self.scan() {
            Ok(token) => {
                log::trace!("{} {:?} at {}", token.kind, token.text, token.position);
                Ok(token)
            }
            Err(e) => {
                log::debug!("lexer stopped at {}: {}", self.position, e);
                self.poisoned = true;
                Err(e)
            }
        }
    }

    /// すべてのトークンを収集（最後の `EndOfInput` を含む）
    pub fn collect_tokens(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn scan(&mut self) -> LexResult<Token> {
        loop {
            let start = self.source.offset();
            let Some(ch) = self.read()? else {
                return Ok(Token::eof(self.position, start));
            };

            if ch == '\n' {
                self.position.newline();
                continue;
            }

            let span = Span::new(start, self.source.offset());
            if let Some(kind) = TokenKind::from_operator(ch) {
                return Ok(Token::new(self.position, kind, ch, span));
            }

            if ch.is_whitespace() {
                continue;
            }

            if is_decimal_digit(ch) {
                // 先頭の数字を戻して、整数の残りと一緒に読み直す
                let token_start = self.position;
                self.backup()?;
                let lit = self.scan_integer()?;
                let span = Span::new(start, self.source.offset());
                return Ok(Token::new(token_start, TokenKind::IntegerLiteral, lit, span));
            }

            if is_letter(ch) {
                let token_start = self.position;
                self.backup()?;
                let lit = self.scan_identifier()?;
                let span = Span::new(start, self.source.offset());
                return Ok(Token::new(token_start, TokenKind::Identifier, lit, span));
            }

            return Ok(Token::new(self.position, TokenKind::Illegal, ch, span));
        }
    }

    /// 1文字読み、列を進める。改行による行の更新は呼び出し側で行う。
    fn read(&mut self) -> LexResult<Option<char>> {
        let ch = self.source.read_next()?;
        if ch.is_some() {
            self.position.advance();
        }
        Ok(ch)
    }

    fn backup(&mut self) -> LexResult<()> {
        self.source.push_back()?;
        self.position.retreat();
        Ok(())
    }

    fn scan_integer(&mut self) -> LexResult<String> {
        self.scan_while(is_decimal_digit)
    }

    /// 識別子は英字のみ（数字やアンダースコアは含まない）
    fn scan_identifier(&mut self) -> LexResult<String> {
        self.scan_while(is_letter)
    }

    /// `accept` を満たす文字が続く間読み進め、最初に外れた文字は押し戻す
    fn scan_while(&mut self, accept: fn(char) -> bool) -> LexResult<String> {
        let mut lit = String::new();
        while let Some(ch) = self.read()? {
            if !accept(ch) {
                self.backup()?;
                break;
            }
            lit.push(ch);
        }
        Ok(lit)
    }
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_token() {
            Ok(token) if token.is_eof() => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Lexer<R> {}
