//! Purpose: Library crate behind the `bpcodec` CLI.
//! Exports: `codec` (blueprint string <-> JSON), `batch`, `output_path`, `notice`, errors.
//! Role: The codec is usable on its own; the other modules back the batch CLI.
//! Invariants: The codec is pure; filesystem access lives in `batch` and `output_path`.
//! Invariants: Modules prefer explicit inputs/outputs over hidden state.
pub mod batch;
pub mod codec;
pub mod core;
pub mod notice;
pub mod output_path;

pub use crate::codec::{EncodeOptions, decode, encode, encode_with};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
