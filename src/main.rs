//! Purpose: `bpcodec` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits payloads on stdout.
//! Invariants: stdout carries only payloads (blueprint strings, JSON documents, batch summaries).
//! Invariants: Non-interactive errors and notices are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `bpcodec::to_exit_code`.
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bpcodec::batch::{ErrorPolicy, Operation};
use bpcodec::codec::DEFAULT_LEVEL;
use bpcodec::notice::{Notice, notice_json};
use bpcodec::{Error, ErrorKind, to_exit_code};
use clap::{Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod color_json;
mod command_dispatch;

use color_json::render_json;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint(clap_error_hint(&err)),
                    ColorMode::Auto,
                ));
            }
        },
    };

    init_tracing();
    let color_mode = cli.color;

    command_dispatch::dispatch_command(cli.command, color_mode)
        .map_err(add_codec_hint)
        .map_err(add_io_hint)
        .map_err(add_internal_hint)
        .map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "bpcodec",
    version,
    about = "Encode and decode blueprint strings",
    long_about = None,
    before_help = r#"A blueprint string is a version marker ("0") followed by base64 of zlib-compressed JSON."#,
    after_help = r#"EXAMPLES
  $ bpcodec decode 0eNqrVkpUsjKsBQAIKgIJ        # prints {"a": 1}
  $ bpcodec decode -f belt.txt > belt.json
  $ bpcodec encode belt.json > belt.txt
  $ bpcodec batch decode                         # BPString/ -> Decoded/
  $ bpcodec batch encode --output-dir out        # BPJson/ -> out/

  Set RUST_LOG=debug to trace batch progress on stderr."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OperationCli {
    Encode,
    Decode,
}

impl From<OperationCli> for Operation {
    fn from(value: OperationCli) -> Self {
        match value {
            OperationCli::Encode => Operation::Encode,
            OperationCli::Decode => Operation::Decode,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ErrorPolicyCli {
    Skip,
    Stop,
}

impl From<ErrorPolicyCli> for ErrorPolicy {
    fn from(value: ErrorPolicyCli) -> Self {
        match value {
            ErrorPolicyCli::Skip => ErrorPolicy::Skip,
            ErrorPolicyCli::Stop => ErrorPolicy::Stop,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Encode a JSON blueprint into a blueprint string",
        after_help = r#"EXAMPLES
  $ bpcodec encode belt.json
  $ echo '{"a": 1}' | bpcodec encode
  $ bpcodec encode --level 6 belt.json"#
    )]
    Encode {
        #[arg(
            help = "JSON file to encode (omit or use - for stdin)",
            value_hint = ValueHint::FilePath
        )]
        file: Option<PathBuf>,
        #[arg(
            long,
            default_value_t = DEFAULT_LEVEL,
            value_parser = clap::value_parser!(u32).range(0..=9),
            help = "zlib compression level (0-9)"
        )]
        level: u32,
    },
    #[command(
        about = "Decode a blueprint string into JSON",
        after_help = r#"EXAMPLES
  $ bpcodec decode 0eNqrVkpUsjKsBQAIKgIJ
  $ bpcodec decode -f belt.txt
  $ pbpaste | bpcodec decode --pretty

NOTES
  - With no STRING or --file, reads stdin (prompts when stdin is a terminal)
  - Output is pretty JSON on a terminal or with --pretty, compact otherwise"#
    )]
    Decode {
        #[arg(help = "Blueprint string")]
        blueprint: Option<String>,
        #[arg(
            short = 'f',
            long = "file",
            help = "Read the blueprint string from a file (use - for stdin)",
            conflicts_with = "blueprint",
            value_hint = ValueHint::FilePath
        )]
        file: Option<PathBuf>,
        #[arg(long, help = "Pretty-print with 4-space indentation")]
        pretty: bool,
    },
    #[command(
        arg_required_else_help = true,
        about = "Convert every file in a directory",
        after_help = r#"EXAMPLES
  $ bpcodec batch decode
  $ bpcodec batch encode --input-dir json --output-dir strings
  $ bpcodec batch decode --errors stop

NOTES
  - Defaults: decode reads BPString/ into Decoded/, encode reads BPJson/ into Encoded/
  - Existing outputs are kept; new files get a numeric suffix (belt1.json)
  - `--errors skip` (default) reports bad files as notices and continues"#
    )]
    Batch {
        #[arg(value_enum, help = "Operation to apply: encode|decode")]
        operation: OperationCli,
        #[arg(long, help = "Input directory", value_hint = ValueHint::DirPath)]
        input_dir: Option<PathBuf>,
        #[arg(long, help = "Output directory (created if missing)", value_hint = ValueHint::DirPath)]
        output_dir: Option<PathBuf>,
        #[arg(
            short = 'e',
            long = "errors",
            value_enum,
            default_value = "skip",
            help = "Per-file failure policy: skip|stop"
        )]
        errors: ErrorPolicyCli,
        #[arg(
            long,
            default_value_t = DEFAULT_LEVEL,
            value_parser = clap::value_parser!(u32).range(0..=9),
            help = "zlib compression level for encode (0-9)"
        )]
        level: u32,
    },
    #[command(about = "Print version info")]
    Version,
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn add_codec_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::Decoding => {
            err.with_hint("Check that the whole string was copied; base64 uses A-Z a-z 0-9 + / =.")
        }
        ErrorKind::Decompression => {
            err.with_hint("The payload is damaged; copy the blueprint string again.")
        }
        ErrorKind::Parse => err.with_hint("Provide a single JSON object (e.g. '{\"a\":1}')."),
        _ => err,
    }
}

fn add_io_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::Permission => err.with_hint(
            "Permission denied. Check directory permissions or choose a writable --output-dir.",
        ),
        ErrorKind::NotFound => err.with_hint("Check the path and try again."),
        ErrorKind::Io => err.with_hint("I/O error. Check the path, filesystem, and disk space."),
        _ => err,
    }
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint(
        "Unexpected internal failure. Retry with RUST_BACKTRACE=1 and share command/context if it persists.",
    )
}

fn emit_version_output(color_mode: ColorMode) {
    if io::stdout().is_terminal() {
        println!("bpcodec {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(
            json!({
                "name": "bpcodec",
                "version": env!("CARGO_PKG_VERSION"),
            }),
            false,
            color_mode,
        );
    }
}

/// Print a JSON value on stdout: indented on a terminal or when asked, compact otherwise.
fn emit_json(value: Value, pretty: bool, color_mode: ColorMode) {
    let is_tty = io::stdout().is_terminal();
    let use_color = color_mode.use_color(is_tty);
    let json = if pretty || is_tty {
        render_json(&value, use_color)
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let report = ErrorReport::new(err);
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", report.to_text(color_mode.use_color(is_tty)));
        return;
    }

    let json = serde_json::to_string(&report.to_json()).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn notice_time_now() -> String {
    use time::format_description::well_known::Rfc3339;
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| {
            time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()
        })
        .and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_default()
}

fn emit_notice(notice: &Notice, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        let label = colorize_label("skipped:", color_mode.use_color(is_tty), AnsiColor::Yellow);
        eprintln!("{label} {} ({})", notice.path, notice.message);
        return;
    }

    let value = notice_json(notice);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

/// A failure as shown on stderr. Text and JSON carry the same fields.
struct ErrorReport {
    kind: ErrorKind,
    message: String,
    hint: Option<String>,
    path: Option<String>,
    cause: Option<String>,
}

impl ErrorReport {
    fn new(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err
                .message()
                .unwrap_or_else(|| fallback_message(err.kind()))
                .to_string(),
            hint: err.hint().map(str::to_string),
            path: err.path().map(|path| path.display().to_string()),
            cause: err.source().map(|source| source.to_string()),
        }
    }

    /// Optional fields as (json key, text label, value).
    fn extras(&self) -> [(&'static str, &'static str, Option<&str>); 3] {
        [
            ("hint", "hint:", self.hint.as_deref()),
            ("path", "path:", self.path.as_deref()),
            ("cause", "caused by:", self.cause.as_deref()),
        ]
    }

    fn to_json(&self) -> Value {
        let mut inner = Map::new();
        inner.insert("kind".to_string(), json!(format!("{:?}", self.kind)));
        inner.insert("exit_code".to_string(), json!(to_exit_code(self.kind)));
        inner.insert("message".to_string(), json!(self.message));
        for (key, _, value) in self.extras() {
            if let Some(value) = value {
                inner.insert(key.to_string(), json!(value));
            }
        }
        json!({ "error": inner })
    }

    fn to_text(&self, use_color: bool) -> String {
        let mut text = format!(
            "{} {}",
            colorize_label("error:", use_color, AnsiColor::Red),
            self.message
        );
        for (_, label, value) in self.extras() {
            let Some(value) = value else { continue };
            text.push('\n');
            text.push_str(&colorize_label(label, use_color, AnsiColor::Yellow));
            text.push(' ');
            text.push_str(value);
        }
        text
    }
}

fn fallback_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Internal => "internal error",
        ErrorKind::Usage => "usage error",
        ErrorKind::NotFound => "not found",
        ErrorKind::AlreadyExists => "already exists",
        ErrorKind::Permission => "permission denied",
        ErrorKind::Io => "i/o error",
        ErrorKind::InvalidDocument => "blueprint must be a JSON object",
        ErrorKind::InvalidFormat => "invalid blueprint string",
        ErrorKind::Decoding => "invalid base64",
        ErrorKind::Decompression => "invalid zlib stream",
        ErrorKind::Parse => "invalid json",
    }
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);

    let Some(usage) = usage else {
        return "Try `bpcodec --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|t| *t == "bpcodec") else {
        return "Try `bpcodec --help`.".to_string();
    };

    let parts: Vec<&str> = tokens
        .iter()
        .skip(pos + 1)
        .take_while(|token| {
            !(token.starts_with('-') || token.starts_with('<') || token.starts_with('['))
        })
        .copied()
        .collect();

    if parts.is_empty() {
        return "Try `bpcodec --help`.".to_string();
    }
    format!("Try `bpcodec {} --help`.", parts.join(" "))
}
