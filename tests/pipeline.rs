use std::io::Cursor;

use approx::assert_relative_eq;
use glam::Vec3;
use stlview::{
    decode_stl, parse_ascii_stl, parse_binary_stl, project, read_ascii_stl, read_binary_stl,
    render, render_model, required_len, ProjectionConfig, StlError, StlFormat, View,
};

const CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [2.0, 0.0, 0.0],
    [2.0, 2.0, 0.0],
    [0.0, 2.0, 0.0],
    [0.0, 0.0, 2.0],
    [2.0, 0.0, 2.0],
    [2.0, 2.0, 2.0],
    [0.0, 2.0, 2.0],
];

const FACES: [[usize; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [2, 3, 7],
    [2, 7, 6],
    [0, 4, 7],
    [0, 7, 3],
    [1, 2, 6],
    [1, 6, 5],
];

fn cube_binary() -> Vec<u8> {
    let mut bytes = b"cube".to_vec();
    bytes.resize(80, 0);
    bytes.extend_from_slice(&(FACES.len() as u32).to_le_bytes());
    for face in FACES.iter() {
        for _ in 0..3 {
            bytes.extend_from_slice(&0f32.to_le_bytes());
        }
        for &corner in face.iter() {
            for c in CORNERS[corner].iter() {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }
    bytes
}

fn cube_ascii() -> String {
    let mut text = String::from("solid cube\n");
    for face in FACES.iter() {
        text.push_str("  facet normal 0 0 0\n    outer loop\n");
        for &corner in face.iter() {
            let [x, y, z] = CORNERS[corner];
            text.push_str(&format!("      vertex {} {} {}\n", x, y, z));
        }
        text.push_str("    endloop\n  endfacet\n");
    }
    text.push_str("endsolid cube\n");
    text
}

#[test]
fn binary_cube_decodes() {
    let bytes = cube_binary();
    assert_eq!(bytes.len() as u64, required_len(12));

    let model = parse_binary_stl(&bytes).unwrap();
    assert_eq!(model.header(), "cube");
    assert_eq!(model.triangle_count(), 12);
    assert_eq!(model.triangles().len(), 12);

    let bounds = model.bounds();
    assert_eq!(bounds.min, Vec3::ZERO);
    assert_eq!(bounds.max, Vec3::splat(2.0));
}

#[test]
fn ascii_and_binary_agree_on_geometry() {
    let binary = parse_binary_stl(&cube_binary()).unwrap();
    let ascii = parse_ascii_stl(&cube_ascii()).unwrap();

    assert_eq!(ascii.header(), "Imported from ASCII STL by stlview - cube");
    assert_eq!(ascii.triangles(), binary.triangles());
}

#[test]
fn streamed_inputs_match_buffers() {
    let bytes = cube_binary();
    assert_eq!(
        read_binary_stl(Cursor::new(&bytes)).unwrap(),
        parse_binary_stl(&bytes).unwrap()
    );

    let text = cube_ascii();
    assert_eq!(
        read_ascii_stl(Cursor::new(text.as_bytes())).unwrap(),
        parse_ascii_stl(&text).unwrap()
    );
}

#[test]
fn detection_picks_the_right_decoder() {
    assert_eq!(StlFormat::detect(&cube_binary()), StlFormat::Binary);
    assert_eq!(StlFormat::detect(cube_ascii().as_bytes()), StlFormat::Ascii);

    let from_binary = decode_stl(&cube_binary()).unwrap();
    let from_ascii = decode_stl(cube_ascii().as_bytes()).unwrap();
    assert_eq!(from_binary.triangles(), from_ascii.triangles());
}

#[test]
fn cube_from_every_side_shows_four_corners() {
    let model = parse_binary_stl(&cube_binary()).unwrap();
    for &view in View::ALL.iter() {
        let grid = project(&model, 2, view);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(render(&grid), "▓ ▓\n▓ ▓\n", "view {}", view);
    }
}

#[test]
fn projection_depth_is_normalised() {
    let model = parse_ascii_stl(&cube_ascii()).unwrap();
    let grid = project(&model, 10, View::Side);
    let max = grid.rows().flatten().cloned().fold(0.0f32, f32::max);
    assert_relative_eq!(max, 1.0);
}

#[test]
fn render_model_uses_config() {
    let model = parse_binary_stl(&cube_binary()).unwrap();
    let config = ProjectionConfig::default().with_grid_size(8).with_view(View::Top);
    let drawn = render_model(&model, &config);

    assert_eq!(drawn.lines().count(), 5);
    assert!(drawn.lines().all(|line| line.chars().count() == 9));
    assert_eq!(drawn.matches('▓').count(), 4);
}

#[test]
fn truncated_binary_is_rejected() {
    let mut bytes = cube_binary();
    bytes.truncate(bytes.len() - 1);

    assert!(matches!(parse_binary_stl(&bytes), Err(StlError::Truncated { .. })));
    assert!(matches!(
        read_binary_stl(Cursor::new(bytes)),
        Err(StlError::Truncated { .. })
    ));
}

#[test]
fn broken_ascii_facet_keeps_earlier_triangles() {
    let text = cube_ascii();
    let cut = text.match_indices("vertex").nth(8).map(|(i, _)| i).unwrap();
    let broken = format!("{}vertex 1 2\n", &text[..cut]);

    let err = parse_ascii_stl(&broken).unwrap_err();
    assert!(matches!(err.source, StlError::UnexpectedFieldCount { .. }));
    assert_eq!(err.partial.triangle_count(), 2);
}
