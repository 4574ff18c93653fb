//! Purpose: Pick an output path that does not collide with an existing file.
//! Exports: `PathProbe`, `FsProbe`, `free_path`.
//! Role: Injectable collaborator of the batch runner; tests swap in an in-memory probe.
//! Invariants: `base` is returned unchanged when free.
//! Invariants: Otherwise candidates are `<stem>1<ext>`, `<stem>2<ext>`, ... in order.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub trait PathProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub fn free_path<P: PathProbe + ?Sized>(base: &Path, probe: &P) -> PathBuf {
    if !probe.exists(base) {
        return base.to_path_buf();
    }
    (1u64..)
        .map(|index| numbered(base, index))
        .find(|candidate| !probe.exists(candidate))
        .unwrap_or_else(|| base.to_path_buf())
}

fn numbered(base: &Path, index: u64) -> PathBuf {
    let mut name = base.file_stem().map(OsString::from).unwrap_or_default();
    name.push(index.to_string());
    if let Some(ext) = base.extension() {
        name.push(".");
        name.push(ext);
    }
    base.with_file_name(name)
}
