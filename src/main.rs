use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codespan_reporting::term::termcolor::ColorChoice;
use colored::{ColoredString, Colorize};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tinylex::lexer::{Lexer, Token, TokenKind};
use tinylex::session::ScanSession;

#[derive(Parser)]
#[command(name = "tinylex")]
#[command(author, version, about = "ソーステキストを位置情報付きトークンに分解する", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 詳細なログを出力する
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 色付き出力を無効にする
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// 1行に1トークン（既定）
    #[value(name = "text")]
    Text,
    /// トークンのJSON配列
    #[value(name = "json")]
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// ソースファイルのトークン列を表示する
    Tokens {
        /// 走査するソースファイル（"-" で標準入力）
        input: PathBuf,

        /// 出力形式
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// ソースファイル中の認識できない文字を報告する
    Check {
        /// 検査するソースファイル（"-" で標準入力）
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // 引数の解析より先にロガーを初期化
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // --verbose でデバッグログまで表示
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Tokens { input, format } => tokens(&input, format),
        Commands::Check { input } => check(&input, cli.no_color),
    };

    if let Err(e) = result {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// `-` は標準入力を表す
fn is_stdin(input: &Path) -> bool {
    input.as_os_str() == "-"
}

fn open_input(input: &Path) -> Result<Box<dyn Read>> {
    if is_stdin(input) {
        return Ok(Box::new(io::stdin()));
    }
    let file = File::open(input).with_context(|| format!("Failed to open source file: {:?}", input))?;
    Ok(Box::new(file))
}

/// 種別名を揃えた幅で色付けする
fn kind_label(kind: TokenKind) -> ColoredString {
    let name = format!("{:<7}", kind.name());
    match kind {
        TokenKind::Identifier => name.cyan(),
        TokenKind::IntegerLiteral => name.yellow(),
        TokenKind::Illegal => name.red().bold(),
        TokenKind::EndOfInput => name.dimmed(),
        _ => name.normal(),
    }
}

/// トークン列を1行ずつ、またはJSONで書き出す
fn tokens(input: &Path, format: OutputFormat) -> Result<()> {
    log::info!("Scanning {:?}", input);

    let mut lexer = Lexer::new(open_input(input)?);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match format {
        OutputFormat::Text => loop {
            let token = lexer
                .next_token()
                .with_context(|| format!("Failed to scan {:?}", input))?;
            writeln!(
                out,
                "{:>4}:{:<4} {} {:?}",
                token.position.line,
                token.position.column,
                kind_label(token.kind),
                token.text
            )?;
            if token.is_eof() {
                break;
            }
        },
        OutputFormat::Json => {
            let tokens: Vec<Token> = lexer
                .collect_tokens()
                .with_context(|| format!("Failed to scan {:?}", input))?;
            serde_json::to_writer_pretty(&mut out, &tokens)?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// 認識できない文字を診断として報告し、見つかれば失敗を返す
fn check(input: &Path, no_color: bool) -> Result<()> {
    log::info!("Checking {:?}", input);

    let mut session = if is_stdin(input) {
        ScanSession::from_reader("<stdin>", io::stdin())?
    } else {
        ScanSession::from_path(input)
            .with_context(|| format!("Failed to read source file: {:?}", input))?
    };

    let tokens = session.tokenize();
    log::debug!("{} tokens scanned", tokens.len());

    if session.has_errors() {
        let color = if no_color { ColorChoice::Never } else { ColorChoice::Auto };
        session.report_diagnostics(color)?;
        anyhow::bail!("Lexical analysis failed: {} error(s) found", session.error_count());
    }

    println!("{}: No errors found", "success".green().bold());
    Ok(())
}
