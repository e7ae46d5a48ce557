//! 走査セッションモジュール
//!
//! 名前付きのソースを保持して走査し、認識できない文字を
//! 診断として蓄積・報告する機能を提供します。

use crate::error::{DiagnosticError, ErrorCollector, LexIssue, TinylexError, TinylexResult};
use crate::lexer::{Lexer, Token};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use std::fs;
use std::io::Read;
use std::path::Path;

/// 走査状態を管理する構造体
pub struct ScanSession {
    pub name: String,
    pub source: String,
    pub files: SimpleFiles<String, String>,
    pub file_id: usize,
    pub error_collector: ErrorCollector,
}

impl ScanSession {
    /// ファイルから走査セッションを作成
    pub fn from_path<P: AsRef<Path>>(path: P) -> TinylexResult<Self> {
        let source = fs::read_to_string(path.as_ref())?;
        Ok(Self::from_string(&path.as_ref().display().to_string(), source))
    }

    /// 文字列から走査セッションを作成
    pub fn from_string(name: &str, source: String) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(name.to_string(), source.clone());

        Self {
            name: name.to_string(),
            source,
            files,
            file_id,
            error_collector: ErrorCollector::new(),
        }
    }

    /// 任意の読み込み器（標準入力など）から走査セッションを作成
    pub fn from_reader<R: Read>(name: &str, mut reader: R) -> TinylexResult<Self> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(Self::from_string(name, source))
    }

    /// エラーを追加
    pub fn add_error(&mut self, issue: LexIssue) {
        self.error_collector.add_error(issue, self.file_id);
    }

    /// ソース全体を走査する
    ///
    /// `Illegal` トークンはエラーとして記録する。致命的エラーで走査が止まった
    /// 場合はそれも記録し、そこまでに得たトークンを返す。
    pub fn tokenize(&mut self) -> Vec<Token> {
        log::debug!("scanning {}", self.name);

        let mut lexer = Lexer::from_text(&self.source);
        let mut tokens = Vec::new();
        let mut issues = Vec::new();

        loop {
            match lexer.next_token() {
                Ok(token) => {
                    if token.is_illegal() {
                        issues.push(LexIssue::IllegalCharacter {
                            text: token.text.clone(),
                            position: token.position,
                            span: token.span,
                        });
                    }
                    let done = token.is_eof();
                    tokens.push(token);
                    if done {
                        break;
                    }
                }
                Err(e) => {
                    log::debug!("scan of {} aborted at {}", self.name, lexer.position());
                    let offset = tokens.last().map_or(0, |t: &Token| t.span.end);
                    issues.push(LexIssue::Aborted {
                        message: TinylexError::from(e).to_string(),
                        offset,
                    });
                    break;
                }
            }
        }

        for issue in issues {
            self.add_error(issue);
        }
        tokens
    }

    /// 診断情報を書き出す
    pub fn emit_diagnostics<W: WriteColor>(&self, writer: &mut W) -> TinylexResult<()> {
        let config = codespan_reporting::term::Config::default();
        for error in self.error_collector.errors() {
            let diagnostic = error.to_diagnostic();
            codespan_reporting::term::emit(writer, &config, &self.files, &diagnostic)?;
        }
        Ok(())
    }

    /// 診断情報を標準エラー出力に報告
    pub fn report_diagnostics(&self, color: ColorChoice) -> TinylexResult<()> {
        let writer = StandardStream::stderr(color);
        let mut lock = writer.lock();
        self.emit_diagnostics(&mut lock)
    }

    /// エラーがあるかチェック
    pub fn has_errors(&self) -> bool {
        self.error_collector.has_errors()
    }

    /// エラー数を取得
    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }

    /// 最初に記録されたエラーを取得
    pub fn first_error(&self) -> Option<&DiagnosticError> {
        self.error_collector.first_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;
    use codespan_reporting::term::termcolor::Buffer;
    use std::io::Write;

    #[test]
    fn test_clean_source_has_no_errors() {
        let mut session = ScanSession::from_string("clean.txt", "x = 1 + 2;".to_string());
        let tokens = session.tokenize();

        assert_eq!(tokens.len(), 7);
        assert!(!session.has_errors());
    }

    #[test]
    fn test_illegal_characters_are_collected() {
        let source = "x = @;\ny = $ # 1;".to_string();
        let mut session = ScanSession::from_string("bad.txt", source);
        let tokens = session.tokenize();

        assert!(tokens.last().is_some_and(Token::is_eof));
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Illegal).count(), 3);
        assert_eq!(session.error_count(), 3);

        let first = &session.error_collector.errors()[0];
        assert_eq!(
            first.issue,
            LexIssue::IllegalCharacter {
                text: "@".to_string(),
                position: crate::lexer::Position { line: 1, column: 5 },
                span: crate::lexer::Span::new(4, 5),
            }
        );
    }

    #[test]
    fn test_emit_diagnostics_mentions_file_and_char() {
        let mut session = ScanSession::from_string("bad.txt", "a#b".to_string());
        session.tokenize();

        let mut buffer = Buffer::no_color();
        session.emit_diagnostics(&mut buffer).unwrap();
        let output = String::from_utf8(buffer.into_inner()).unwrap();

        assert!(output.contains("bad.txt"));
        assert!(output.contains('#'));
    }

    #[test]
    fn test_report_diagnostics_to_stderr() {
        let mut session = ScanSession::from_string("bad.txt", "a#b".to_string());
        session.tokenize();

        assert!(session.report_diagnostics(ColorChoice::Never).is_ok());
        assert!(matches!(
            session.first_error().map(|e| &e.issue),
            Some(LexIssue::IllegalCharacter { text, .. }) if text == "#"
        ));
    }

    #[test]
    fn test_first_error_on_clean_source() {
        let mut session = ScanSession::from_string("clean.txt", "a;".to_string());
        session.tokenize();
        assert!(session.first_error().is_none());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "total = 10 / 2;").unwrap();

        let mut session = ScanSession::from_path(file.path()).unwrap();
        let tokens = session.tokenize();

        assert_eq!(tokens[0].text, "total");
        assert_eq!(tokens[4].text, "2");
        assert!(!session.has_errors());
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = ScanSession::from_path("/nonexistent/tinylex/input.txt");
        assert!(matches!(result, Err(crate::error::TinylexError::Io(_))));
    }

    #[test]
    fn test_from_reader() {
        let session = ScanSession::from_reader("<stdin>", "a;".as_bytes()).unwrap();
        assert_eq!(session.name, "<stdin>");
        assert_eq!(session.source, "a;");
    }
}
