//! Purpose: Apply one codec operation to every file in an input directory.
//! Exports: `Operation`, `ErrorPolicy`, `BatchConfig`, `BatchOutcome`, `BatchFailure`,
//! `Written`, `run_batch`, `render_document`, `parse_document`, `clean_blueprint_text`.
//! Role: Batch driver used by the CLI; all settings arrive through `BatchConfig`.
//! Invariants: Inputs are visited in file-name order; directories are ignored.
//! Invariants: Skip mode reports each failed file and keeps going; Stop returns the first error.
//! Invariants: Existing output files are never overwritten (free path + create-new).
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, warn};

use crate::codec::{self, EncodeOptions, serial};
use crate::core::error::{Error, ErrorKind};
use crate::output_path::{PathProbe, free_path};

const DECODED_INDENT: &[u8] = b"    ";
const BOM: char = '\u{feff}';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    /// JSON files in, blueprint strings out.
    Encode,
    /// Blueprint strings in, JSON files out.
    Decode,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Encode => "encode",
            Operation::Decode => "decode",
        }
    }

    pub fn default_input_dir(self) -> &'static str {
        match self {
            Operation::Encode => "BPJson",
            Operation::Decode => "BPString",
        }
    }

    pub fn default_output_dir(self) -> &'static str {
        match self {
            Operation::Encode => "Encoded",
            Operation::Decode => "Decoded",
        }
    }

    pub fn output_extension(self) -> &'static str {
        match self {
            Operation::Encode => "txt",
            Operation::Decode => "json",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ErrorPolicy {
    #[default]
    Skip,
    Stop,
}

#[derive(Clone, Debug)]
pub struct BatchConfig {
    pub operation: Operation,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub errors: ErrorPolicy,
    pub options: EncodeOptions,
}

impl BatchConfig {
    /// Config using the conventional directory pair for `operation`.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            input_dir: PathBuf::from(operation.default_input_dir()),
            output_dir: PathBuf::from(operation.default_output_dir()),
            errors: ErrorPolicy::default(),
            options: EncodeOptions::default(),
        }
    }

    pub fn with_dirs(
        mut self,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        self.input_dir = input_dir.into();
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_errors(mut self, errors: ErrorPolicy) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BatchOutcome {
    pub files_total: u64,
    pub ok: u64,
    pub failed: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Written {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: Error,
}

pub fn run_batch<P, W, F>(
    config: &BatchConfig,
    probe: &P,
    mut on_written: W,
    mut on_failure: F,
) -> Result<BatchOutcome, Error>
where
    P: PathProbe + ?Sized,
    W: FnMut(Written),
    F: FnMut(BatchFailure),
{
    let inputs = list_input_files(&config.input_dir)?;
    fs::create_dir_all(&config.output_dir).map_err(|err| {
        Error::from_io(err, "failed to create output directory").with_path(&config.output_dir)
    })?;
    debug!(
        operation = config.operation.as_str(),
        input_dir = %config.input_dir.display(),
        files = inputs.len(),
        "starting batch"
    );

    let mut outcome = BatchOutcome::default();
    for input in inputs {
        outcome.files_total += 1;
        match process_file(config, probe, &input) {
            Ok(output) => {
                debug!(input = %input.display(), output = %output.display(), "converted");
                outcome.ok += 1;
                on_written(Written { input, output });
            }
            Err(err) => match config.errors {
                ErrorPolicy::Stop => return Err(err),
                ErrorPolicy::Skip => {
                    warn!(input = %input.display(), error = %err, "skipping file");
                    outcome.failed += 1;
                    on_failure(BatchFailure { input, error: err });
                }
            },
        }
    }
    Ok(outcome)
}

/// Pretty JSON with 4-space indentation, the layout used for decoded files.
pub fn render_document(document: &Value) -> Result<String, Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(DECODED_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to render document")
            .with_source(err)
    })?;
    String::from_utf8(buf).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("rendered document is not utf-8")
            .with_source(err)
    })
}

fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(dir).map_err(|err| {
        Error::from_io(err, "failed to read input directory")
            .with_path(dir)
            .with_hint("Create the directory or pass --input-dir.")
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| {
            Error::from_io(err, "failed to read input directory").with_path(dir)
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn process_file<P: PathProbe + ?Sized>(
    config: &BatchConfig,
    probe: &P,
    input: &Path,
) -> Result<PathBuf, Error> {
    let text = fs::read_to_string(input)
        .map_err(|err| Error::from_io(err, "failed to read input file").with_path(input))?;

    let rendered = match config.operation {
        Operation::Decode => {
            let document =
                codec::decode(clean_blueprint_text(&text)).map_err(|err| err.with_path(input))?;
            let mut json = render_document(&document)?;
            json.push('\n');
            json
        }
        Operation::Encode => {
            let document = parse_document(&text).map_err(|err| err.with_path(input))?;
            codec::encode_with(&document, &config.options).map_err(|err| err.with_path(input))?
        }
    };

    let target = free_path(&output_base(config, input), probe);
    write_new(&target, rendered.as_bytes())?;
    Ok(target)
}

/// Parse a JSON document read from a file or stdin, ignoring a leading byte order mark.
pub fn parse_document(text: &str) -> Result<Value, Error> {
    serial::parse_value(text.trim_start_matches(BOM).as_bytes()).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message(format!("input is not valid JSON: {err}"))
            .with_source(err)
    })
}

/// Strip what editors and clipboards add around a pasted blueprint string.
pub fn clean_blueprint_text(text: &str) -> &str {
    text.trim_start_matches(BOM).trim()
}

fn output_base(config: &BatchConfig, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .or_else(|| input.file_name())
        .unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(config.operation.output_extension());
    config.output_dir.join(name)
}

fn write_new(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| Error::from_io(err, "failed to create output file").with_path(path))?;
    file.write_all(bytes)
        .map_err(|err| Error::from_io(err, "failed to write output file").with_path(path))
}
