use std::io::BufRead;

use glam::Vec3;
use log::debug;
use nom::bytes::complete::tag;
use nom::combinator::all_consuming;
use nom::number::complete::float;
use nom::IResult;

use crate::error::{AsciiDecodeError, StlError};
use crate::model::{Model, Triangle};

pub const HEADER_PREFIX: &str = "Imported from ASCII STL by stlview - ";

const LINE_TRIM: &[char] = &[' ', '\t', '\n', '\r'];

/*
    Line reader
*/

/// Reads one statement per line and checks it against the grammar.
struct LineReader<R> {
    reader: R,
    line: usize,
    bytes: Vec<u8>,
    text: String,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        LineReader {
            reader,
            line: 0,
            bytes: Vec::new(),
            text: String::new(),
        }
    }

    /// Next trimmed line, or `None` at end of input.
    ///
    /// Solid names are free text in whatever encoding the exporter used, so
    /// bytes that are not UTF-8 are replaced rather than failing the read.
    fn next_line(&mut self) -> Result<Option<&str>, StlError> {
        self.bytes.clear();
        if self.reader.read_until(b'\n', &mut self.bytes)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        self.text = String::from_utf8_lossy(&self.bytes).into_owned();
        Ok(Some(self.text.trim_matches(LINE_TRIM)))
    }

    /// Reads a line that must start with `prefix`, splits the rest on
    /// `delimiter` and checks that exactly `count` fields came out.
    ///
    /// Without a delimiter the line must end right after the prefix.
    fn expect(
        &mut self,
        prefix: &'static str,
        delimiter: Option<char>,
        count: usize,
    ) -> Result<Vec<String>, StlError> {
        let line_number = self.line + 1;
        let line = match self.next_line()? {
            Some(line) => line,
            None => {
                return Err(StlError::UnexpectedEnd {
                    line: line_number,
                    expected: prefix,
                })
            }
        };

        let rest = match strip_literal(prefix, line) {
            Some(rest) => rest,
            None => {
                return Err(StlError::MalformedLine {
                    line: line_number,
                    expected: prefix,
                    found: line.to_string(),
                })
            }
        };

        let fields: Vec<String> = match delimiter {
            Some(d) => rest.split(d).map(str::to_string).collect(),
            None if rest.is_empty() => Vec::new(),
            None => vec![rest.to_string()],
        };
        if fields.len() != count {
            return Err(StlError::UnexpectedFieldCount {
                line: line_number,
                expected: count,
                found: fields.len(),
            });
        }
        Ok(fields)
    }

    fn expect_vec3(&mut self, prefix: &'static str) -> Result<Vec3, StlError> {
        let fields = self.expect(prefix, Some(' '), 3)?;
        let line = self.line;
        Ok(Vec3::new(
            number(line, &fields[0])?,
            number(line, &fields[1])?,
            number(line, &fields[2])?,
        ))
    }
}

fn strip_literal<'a>(literal: &'static str, line: &'a str) -> Option<&'a str> {
    let matched: IResult<&str, &str> = tag(literal)(line);
    matched.ok().map(|(rest, _)| rest)
}

fn number(line: usize, token: &str) -> Result<f32, StlError> {
    let parsed: IResult<&str, f32> = all_consuming(float)(token);
    parsed
        .map(|(_, value)| value)
        .map_err(|_| StlError::NumericParseFailure {
            line,
            token: token.to_string(),
        })
}

/*
    Solid
*/

fn solid_name<R: BufRead>(lines: &mut LineReader<R>) -> Result<String, StlError> {
    match lines.next_line()? {
        Some(line) => match strip_literal("solid", line) {
            Some(name) => Ok(name.trim_matches(LINE_TRIM).to_string()),
            None => Err(StlError::MalformedLine {
                line: 1,
                expected: "solid",
                found: line.to_string(),
            }),
        },
        None => Err(StlError::UnexpectedEnd {
            line: 1,
            expected: "solid",
        }),
    }
}

/// Reads the body of a facet once its `facet normal` line has matched.
fn facet_body<R: BufRead>(lines: &mut LineReader<R>, normal: Vec3) -> Result<Triangle, StlError> {
    lines.expect("outer loop", None, 0)?;
    let a = lines.expect_vec3("vertex ")?;
    let b = lines.expect_vec3("vertex ")?;
    let c = lines.expect_vec3("vertex ")?;
    lines.expect("endloop", None, 0)?;
    lines.expect("endfacet", None, 0)?;
    Ok(Triangle::new(normal, [a, b, c], 0))
}

/// Decodes an ASCII STL.
///
/// Facets are read until a line fails to match `facet normal`: end of input,
/// `endsolid`, or anything else. That line is consumed. Once a facet has
/// started, every following line of it is mandatory, and a failure returns
/// the triangles accepted so far inside the error.
pub fn read_ascii_stl<R: BufRead>(reader: R) -> Result<Model, AsciiDecodeError> {
    let mut lines = LineReader::new(reader);

    let name = solid_name(&mut lines).map_err(|e| AsciiDecodeError::new(Model::default(), e))?;
    let mut model = Model::new(format!("{}{}", HEADER_PREFIX, name), Vec::new());
    debug!("ASCII STL solid {:?}", name);

    loop {
        let normal = match lines.expect_vec3("facet normal ") {
            Ok(normal) => normal,
            Err(StlError::Io(e)) => return Err(AsciiDecodeError::new(model, StlError::Io(e))),
            Err(e @ StlError::NumericParseFailure { .. }) => {
                return Err(AsciiDecodeError::new(model, e))
            }
            Err(e) => {
                debug!("facet list ends: {}", e);
                break;
            }
        };
        match facet_body(&mut lines, normal) {
            Ok(triangle) => model.push(triangle),
            Err(e) => return Err(AsciiDecodeError::new(model, e)),
        }
    }

    debug!("ASCII STL decoded {} triangles", model.triangle_count());
    Ok(model)
}

pub fn parse_ascii_stl(text: &str) -> Result<Model, AsciiDecodeError> {
    read_ascii_stl(text.as_bytes())
}
