extern crate glam;
extern crate nom;

mod ascii;
mod binary;
mod bounds;
pub mod config;
mod error;
mod format;
pub mod model;
pub mod projection;
pub mod render;

pub use self::ascii::{parse_ascii_stl, read_ascii_stl, HEADER_PREFIX};
pub use self::binary::{
    decode_binary, parse_binary_stl, read_binary_stl, required_len, ByteSource, SliceSource,
    StreamSource, HEADER_LEN, PREAMBLE_LEN, TRIANGLE_RECORD_LEN,
};
pub use self::bounds::Bounds;
pub use self::config::ProjectionConfig;
pub use self::error::{AsciiDecodeError, StlError};
pub use self::format::{decode_stl, StlFormat};
pub use self::model::{Model, Triangle};
pub use self::projection::{project, Grid, View};
pub use self::render::render;

/// Projects `model` as `config` describes and draws the result.
pub fn render_model(model: &Model, config: &ProjectionConfig) -> String {
    render(&project(model, config.grid_size, config.view))
}
