use std::io;

use thiserror::Error;

use crate::model::Model;

/// Errors produced while decoding STL data.
#[derive(Debug, Error)]
pub enum StlError {
    /// A binary source ran out of bytes.
    #[error("truncated STL data: needed {needed} more bytes at offset {offset}")]
    Truncated { offset: u64, needed: usize },

    /// An ASCII line did not start with the literal the grammar requires here.
    #[error("line {line}: expected `{expected}`, found `{found}`")]
    MalformedLine {
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// The ASCII stream ended where a mandatory line was expected.
    #[error("line {line}: expected `{expected}`, found end of input")]
    UnexpectedEnd { line: usize, expected: &'static str },

    #[error("line {line}: expected {expected} fields, found {found}")]
    UnexpectedFieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: `{token}` is not a number")]
    NumericParseFailure { line: usize, token: String },

    /// Failure of the underlying reader.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An ASCII decode that failed part-way through the facet list.
///
/// `partial` holds every triangle accepted before the failing line. Whether
/// that is worth keeping is up to the caller.
#[derive(Debug, Error)]
#[error("{source} (after {} triangles)", .partial.triangle_count())]
pub struct AsciiDecodeError {
    pub partial: Model,
    #[source]
    pub source: StlError,
}

impl AsciiDecodeError {
    pub(crate) fn new(partial: Model, source: StlError) -> Self {
        Self { partial, source }
    }

    pub fn into_partial(self) -> Model {
        self.partial
    }

    pub fn into_source(self) -> StlError {
        self.source
    }
}
