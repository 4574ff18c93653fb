//! Purpose: Table of known blueprint string versions and the stages each one uses.
//! Exports: `Version`, `Transport`, `Compression`, `VERSIONS`, `CURRENT`, `lookup`.
//! Role: Decode dispatches on the leading marker through this table.
//! Invariants: Markers are unique within `VERSIONS`.
//! Invariants: Adding a version is a new table entry, never a new branch in the pipeline.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transport {
    /// Standard alphabet, `=` padding.
    Base64Standard,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Compression {
    /// Deflate wrapped in a zlib header and adler32 trailer.
    Zlib,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Version {
    pub marker: char,
    pub transport: Transport,
    pub compression: Compression,
}

pub const V0: Version = Version {
    marker: '0',
    transport: Transport::Base64Standard,
    compression: Compression::Zlib,
};

pub const VERSIONS: &[Version] = &[V0];

/// Version used by `encode` unless told otherwise.
pub const CURRENT: Version = V0;

pub fn lookup(marker: char) -> Option<Version> {
    VERSIONS
        .iter()
        .copied()
        .find(|version| version.marker == marker)
}
