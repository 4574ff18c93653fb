// Compression stage: JSON bytes <-> zlib stream.
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Decompress, FlushDecompress, Status};

use crate::codec::version::Compression;
use crate::core::error::{Error, ErrorKind};

pub const MAX_LEVEL: u32 = 9;
pub const DEFAULT_LEVEL: u32 = MAX_LEVEL;

const INFLATE_CHUNK: usize = 32 * 1024;

pub fn deflate(compression: Compression, bytes: &[u8], level: u32) -> Result<Vec<u8>, Error> {
    if level > MAX_LEVEL {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("compression level {level} is out of range"))
            .with_hint("Use a level from 0 (store) to 9 (smallest)."));
    }
    match compression {
        Compression::Zlib => zlib_deflate(bytes, level),
    }
}

pub fn inflate(compression: Compression, bytes: &[u8]) -> Result<Vec<u8>, Error> {
    match compression {
        Compression::Zlib => zlib_inflate(bytes),
    }
}

fn zlib_deflate(bytes: &[u8], level: u32) -> Result<Vec<u8>, Error> {
    let out = Vec::with_capacity(bytes.len() / 2 + 16);
    let mut encoder = ZlibEncoder::new(out, flate2::Compression::new(level));
    encoder.write_all(bytes).map_err(deflate_failed)?;
    encoder.finish().map_err(deflate_failed)
}

fn deflate_failed(err: std::io::Error) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("zlib compression failed")
        .with_source(err)
}

// Driven by hand so a stream that ends before its adler32 trailer is an error
// instead of silently yielding the bytes inflated so far.
fn zlib_inflate(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(bytes.len().saturating_mul(4).max(INFLATE_CHUNK));
    loop {
        if out.len() == out.capacity() {
            out.reserve(out.len().max(INFLATE_CHUNK));
        }
        let consumed = inflater.total_in();
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&bytes[consumed as usize..], &mut out, FlushDecompress::None)
            .map_err(|err| {
                Error::new(ErrorKind::Decompression)
                    .with_message("blueprint payload is not a valid zlib stream")
                    .with_source(err)
            })?;
        if status == Status::StreamEnd {
            return Ok(out);
        }
        if inflater.total_in() == consumed && inflater.total_out() == produced {
            return Err(Error::new(ErrorKind::Decompression)
                .with_message("zlib stream is truncated")
                .with_hint("The blueprint string was probably cut off when copied."));
        }
    }
}
