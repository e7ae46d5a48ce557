//! 統一的なエラーハンドリングモジュール
//!
//! レキサーの致命的なエラー型と、認識できない文字などを
//! codespan-reporting の診断として報告するための仕組みを提供します。

use crate::lexer::{Position, Span};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use std::io;
use thiserror::Error;

/// レキサーの致命的なエラー
///
/// 認識できない文字はエラーではなく `Illegal` トークンとして返される。
/// ここに現れるのは、走査を続けられない状態だけ。
#[derive(Error, Debug)]
pub enum LexError {
    /// 入力の読み込みに失敗した（終端に達した場合は除く）
    #[error("入力の読み込みに失敗しました: {0}")]
    Read(#[from] io::Error),

    /// 押し戻せる文字がない状態で押し戻しが要求された
    #[error("押し戻せる文字がありません")]
    PushbackUnavailable,

    /// 致命的なエラーの後に再び呼び出された
    #[error("致命的なエラーの後にレキサーが呼び出されました")]
    Poisoned,
}

/// Result型のエイリアス
pub type LexResult<T> = Result<T, LexError>;

/// tinylex 全体の統一エラー型
#[derive(Error, Debug)]
pub enum TinylexError {
    /// 字句解析エラー
    #[error("字句解析エラー: {0}")]
    Lex(#[from] LexError),

    /// ファイルI/Oエラー
    #[error("ファイル操作エラー: {0}")]
    Io(#[from] io::Error),

    /// 診断の出力エラー
    #[error("診断の出力に失敗しました: {0}")]
    Report(#[from] codespan_reporting::files::Error),
}

pub type TinylexResult<T> = Result<T, TinylexError>;

/// 診断として報告する問題
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexIssue {
    #[error("認識できない文字: '{text}'")]
    IllegalCharacter {
        text: String,
        position: Position,
        span: Span,
    },

    #[error("走査を中断しました: {message}")]
    Aborted { message: String, offset: usize },
}

/// 問題とソースファイルの対応
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub issue: LexIssue,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(issue: LexIssue, file_id: usize) -> Self {
        Self { issue, file_id }
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let (message, labels) = match &self.issue {
            LexIssue::IllegalCharacter {
                text,
                position,
                span,
            } => (
                format!("認識できない文字: '{}'", text),
                vec![Label::primary(self.file_id, *span)
                    .with_message(format!("{} 行 {} 列の文字は字句として扱えません", position.line, position.column))],
            ),
            LexIssue::Aborted { message, offset } => (
                format!("走査を中断しました: {}", message),
                vec![Label::primary(self.file_id, *offset..*offset)
                    .with_message("ここから先は読み込めませんでした")],
            ),
        };

        Diagnostic::error().with_message(message).with_labels(labels)
    }
}

/// 複数のエラーを蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加
    pub fn add_error(&mut self, issue: LexIssue, file_id: usize) {
        self.errors.push(DiagnosticError::new(issue, file_id));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// すべてのエラーを取得
    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&DiagnosticError> {
        self.errors.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::diagnostic::Severity;

    fn illegal(text: &str, start: usize) -> LexIssue {
        LexIssue::IllegalCharacter {
            text: text.to_string(),
            position: Position { line: 1, column: start + 1 },
            span: Span::new(start, start + text.len()),
        }
    }

    #[test]
    fn test_illegal_character_diagnostic() {
        let error = DiagnosticError::new(illegal("#", 1), 0);
        let diagnostic = error.to_diagnostic();

        assert_eq!(diagnostic.severity, Severity::Error);
        assert!(diagnostic.message.contains('#'));
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.labels[0].range, 1..2);
        assert_eq!(diagnostic.labels[0].file_id, 0);
    }

    #[test]
    fn test_aborted_diagnostic_is_zero_width() {
        let issue = LexIssue::Aborted {
            message: "device fault".to_string(),
            offset: 7,
        };
        let diagnostic = DiagnosticError::new(issue, 3).to_diagnostic();

        assert!(diagnostic.message.contains("device fault"));
        assert_eq!(diagnostic.labels[0].range, 7..7);
        assert_eq!(diagnostic.labels[0].file_id, 3);
    }

    #[test]
    fn test_error_collector() {
        let mut collector = ErrorCollector::new();
        assert!(!collector.has_errors());
        assert!(collector.first_error().is_none());

        collector.add_error(illegal("#", 1), 0);
        collector.add_error(illegal("@", 4), 0);

        assert!(collector.has_errors());
        assert_eq!(collector.error_count(), 2);
        assert_eq!(collector.first_error().map(|e| &e.issue), Some(&illegal("#", 1)));
        assert_eq!(collector.errors()[1].issue, illegal("@", 4));
    }

    #[test]
    fn test_lex_error_from_io() {
        let error: LexError = io::Error::new(io::ErrorKind::Other, "device fault").into();
        assert!(matches!(error, LexError::Read(_)));
        assert!(error.to_string().contains("device fault"));

        let wrapped: TinylexError = error.into();
        assert!(matches!(wrapped, TinylexError::Lex(LexError::Read(_))));
        // 走査中断の診断メッセージはこの表示を使う
        assert!(wrapped.to_string().starts_with("字句解析エラー"));
        assert!(wrapped.to_string().contains("device fault"));
    }
}
