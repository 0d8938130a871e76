use std::io::{self, Read};

use glam::Vec3;
use log::debug;
use nom::bytes::complete::take;
use nom::combinator::map;
use nom::number::complete::{le_f32, le_u16, le_u32};
use nom::sequence::tuple;
use nom::IResult;

use crate::error::StlError;
use crate::model::{Model, Triangle};

/*
    Layout (little-endian, no padding)

    0   80 bytes  header, null padded
    80  u32       triangle count
    84  50 bytes per triangle: normal, 3 vertices (f32 x 12), u16 attribute byte count
*/

pub const HEADER_LEN: usize = 80;
pub const PREAMBLE_LEN: usize = HEADER_LEN + 4;
pub const TRIANGLE_RECORD_LEN: usize = 50;

// Upper bound on up-front allocation so a bogus count in a stream header
// cannot reserve gigabytes before the first record is read.
const MAX_PREALLOCATED_TRIANGLES: usize = 1 << 16;

/// Somewhere binary STL bytes come from: either a reader or a complete buffer.
pub trait ByteSource {
    /// Fill `buf` entirely, or fail with [`StlError::Truncated`].
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), StlError>;
}

/// Reads from an [`io::Read`], consuming exactly the bytes the model needs.
pub struct StreamSource<R> {
    reader: R,
    offset: u64,
}

impl<R: Read> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        StreamSource { reader, offset: 0 }
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), StlError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(StlError::Truncated {
                        offset: self.offset + filled as u64,
                        needed: buf.len() - filled,
                    })
                }
                Ok(n) => filled += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += filled as u64;
        Ok(())
    }
}

/// Reads from a byte slice held in memory.
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        SliceSource { bytes, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}

impl<'a> ByteSource for SliceSource<'a> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), StlError> {
        if self.remaining() < buf.len() {
            return Err(StlError::Truncated {
                offset: self.bytes.len() as u64,
                needed: buf.len() - self.remaining(),
            });
        }
        let end = self.offset + buf.len();
        buf.copy_from_slice(&self.bytes[self.offset..end]);
        self.offset = end;
        Ok(())
    }
}

/*
    Record parsers
*/

fn preamble(input: &[u8]) -> IResult<&[u8], (String, u32)> {
    map(tuple((take(HEADER_LEN), le_u32)), |(header, count)| {
        (header_text(header), count)
    })(input)
}

fn header_text(header: &[u8]) -> String {
    String::from_utf8_lossy(header).trim_matches('\0').to_string()
}

fn vec3(input: &[u8]) -> IResult<&[u8], Vec3> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| Vec3::new(x, y, z))(input)
}

fn triangle(input: &[u8]) -> IResult<&[u8], Triangle> {
    map(
        tuple((vec3, vec3, vec3, vec3, le_u16)),
        |(normal, a, b, c, attribute_byte_count)| {
            Triangle::new(normal, [a, b, c], attribute_byte_count)
        },
    )(input)
}

// Buffers handed to the record parsers always have the exact record length,
// so this only fires if a parser and its buffer size disagree.
fn short_record(offset: u64, len: usize) -> StlError {
    StlError::Truncated {
        offset,
        needed: len,
    }
}

/*
    Decoding
*/

/// Decodes a binary STL from any [`ByteSource`].
pub fn decode_binary<S: ByteSource>(source: &mut S) -> Result<Model, StlError> {
    let mut head = [0u8; PREAMBLE_LEN];
    source.fill(&mut head)?;
    let (_, (header, count)) = preamble(&head).map_err(|_| short_record(0, PREAMBLE_LEN))?;
    debug!("binary STL header {:?}, {} triangles declared", header, count);

    let mut triangles = Vec::with_capacity((count as usize).min(MAX_PREALLOCATED_TRIANGLES));
    let mut record = [0u8; TRIANGLE_RECORD_LEN];
    for index in 0..count {
        source.fill(&mut record)?;
        let offset = required_len(index);
        let (_, t) = triangle(&record).map_err(|_| short_record(offset, TRIANGLE_RECORD_LEN))?;
        triangles.push(t);
    }

    Ok(Model::new(header, triangles))
}

/// Decodes a binary STL from a reader. Bytes after the last triangle record
/// are left unread.
pub fn read_binary_stl<R: Read>(reader: R) -> Result<Model, StlError> {
    decode_binary(&mut StreamSource::new(reader))
}

/// Decodes a binary STL held in memory. Fails with [`StlError::Truncated`]
/// before decoding anything if the buffer is shorter than its declared
/// triangle count requires.
pub fn parse_binary_stl(bytes: &[u8]) -> Result<Model, StlError> {
    if bytes.len() < PREAMBLE_LEN {
        return Err(StlError::Truncated {
            offset: bytes.len() as u64,
            needed: PREAMBLE_LEN - bytes.len(),
        });
    }
    let required = required_len(declared_count(bytes));
    if (bytes.len() as u64) < required {
        return Err(StlError::Truncated {
            offset: bytes.len() as u64,
            needed: (required - bytes.len() as u64) as usize,
        });
    }
    decode_binary(&mut SliceSource::new(bytes))
}

pub(crate) fn declared_count(bytes: &[u8]) -> u32 {
    le_u32::<_, nom::error::Error<&[u8]>>(&bytes[HEADER_LEN..PREAMBLE_LEN])
        .map(|(_, count)| count)
        .unwrap_or(0)
}

/// Total byte length of a binary STL carrying `count` triangles.
pub fn required_len(count: u32) -> u64 {
    PREAMBLE_LEN as u64 + u64::from(count) * TRIANGLE_RECORD_LEN as u64
}
