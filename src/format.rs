use log::debug;

use crate::ascii::read_ascii_stl;
use crate::binary::{declared_count, parse_binary_stl, required_len, PREAMBLE_LEN};
use crate::error::StlError;
use crate::model::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlFormat {
    Ascii,
    Binary,
}

impl StlFormat {
    /// Guesses the encoding of `bytes`.
    ///
    /// Binary headers are free text and often start with `solid` too, so a
    /// buffer whose length matches its declared triangle count exactly is
    /// taken as binary before the `solid` keyword is considered.
    pub fn detect(bytes: &[u8]) -> StlFormat {
        if bytes.len() >= PREAMBLE_LEN && bytes.len() as u64 == required_len(declared_count(bytes)) {
            return StlFormat::Binary;
        }
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        if bytes[start..].starts_with(b"solid") {
            StlFormat::Ascii
        } else {
            StlFormat::Binary
        }
    }
}

/// Decodes `bytes` in whichever encoding [`StlFormat::detect`] picks.
///
/// An ASCII failure drops the triangles read before it; use
/// [`read_ascii_stl`] directly to keep them.
pub fn decode_stl(bytes: &[u8]) -> Result<Model, StlError> {
    let format = StlFormat::detect(bytes);
    debug!("decoding {} bytes as {:?} STL", bytes.len(), format);
    match format {
        StlFormat::Binary => parse_binary_stl(bytes),
        StlFormat::Ascii => read_ascii_stl(bytes).map_err(|e| e.into_source()),
    }
}
