//! Purpose: Hold top-level CLI command dispatch for `bpcodec`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and output helpers.
//! Invariants: Each command reads one input, calls the codec or batch runner, prints one payload.
//! Invariants: Batch failures in skip mode become notices; the exit code reflects the first one.

use std::fs;
use std::io::{BufRead, Read, Write};
use std::path::Path;

use bpcodec::batch::{self, BatchConfig, Written, run_batch};
use bpcodec::notice::skip_notice;
use bpcodec::output_path::FsProbe;
use bpcodec::{EncodeOptions, decode, encode_with};
use clap::CommandFactory;

use super::*;

pub(super) fn dispatch_command(command: Command, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "bpcodec", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output(color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Encode { file, level } => {
            let text = read_source(file.as_deref(), false)?;
            let document = batch::parse_document(&text)?;
            let blueprint = encode_with(&document, &EncodeOptions::default().with_level(level))?;
            println!("{blueprint}");
            Ok(RunOutcome::ok())
        }
        Command::Decode {
            blueprint,
            file,
            pretty,
        } => {
            let text = match blueprint {
                Some(blueprint) => blueprint,
                None => read_source(file.as_deref(), true)?,
            };
            let document = decode(batch::clean_blueprint_text(&text))?;
            emit_json(document, pretty, color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Batch {
            operation,
            input_dir,
            output_dir,
            errors,
            level,
        } => {
            let operation = Operation::from(operation);
            let mut config = BatchConfig::new(operation)
                .with_errors(errors.into())
                .with_options(EncodeOptions::default().with_level(level));
            if let Some(input_dir) = input_dir {
                config.input_dir = input_dir;
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            run_batch_command(&config, color_mode)
        }
    }
}

fn run_batch_command(config: &BatchConfig, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    let cmd = format!("batch {}", config.operation.as_str());
    let mut written: Vec<Written> = Vec::new();
    let mut first_failure: Option<ErrorKind> = None;

    let outcome = run_batch(
        config,
        &FsProbe,
        |item| written.push(item),
        |failure| {
            first_failure.get_or_insert(failure.error.kind());
            emit_notice(&skip_notice(&failure, &cmd, notice_time_now()), color_mode);
        },
    )?;

    let written_json = written
        .iter()
        .map(|item| {
            json!({
                "input": item.input.display().to_string(),
                "output": item.output.display().to_string(),
            })
        })
        .collect::<Vec<_>>();
    emit_json(
        json!({
            "operation": config.operation.as_str(),
            "input_dir": config.input_dir.display().to_string(),
            "output_dir": config.output_dir.display().to_string(),
            "files": outcome.files_total,
            "ok": outcome.ok,
            "failed": outcome.failed,
            "written": written_json,
        }),
        false,
        color_mode,
    );

    Ok(match first_failure {
        Some(kind) => RunOutcome::with_code(to_exit_code(kind)),
        None => RunOutcome::ok(),
    })
}

/// Read a whole input from a file, or from stdin when `path` is absent or `-`.
///
/// When stdin is a terminal and `prompt_line` is set, a prompt is shown and a single
/// pasted line is read instead of waiting for end of input.
fn read_source(path: Option<&Path>, prompt_line: bool) -> Result<String, Error> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|err| Error::from_io(err, "failed to read input file").with_path(path)),
        _ => read_stdin(prompt_line),
    }
}

fn read_stdin(prompt_line: bool) -> Result<String, Error> {
    let stdin = io::stdin();
    let mut text = String::new();
    if prompt_line && stdin.is_terminal() {
        eprint!("Paste a blueprint string and press Enter: ");
        io::stderr()
            .flush()
            .map_err(|err| Error::from_io(err, "failed to write prompt"))?;
        stdin
            .lock()
            .read_line(&mut text)
            .map_err(|err| Error::from_io(err, "failed to read stdin"))?;
    } else {
        stdin
            .lock()
            .read_to_string(&mut text)
            .map_err(|err| Error::from_io(err, "failed to read stdin"))?;
    }
    if text.trim().is_empty() {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("no input provided")
            .with_hint("Pass a file path, an inline value, or pipe data on stdin."));
    }
    Ok(text)
}
