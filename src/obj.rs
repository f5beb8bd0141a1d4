//! This module groups the records of a Wavefront OBJ document into one block
//! per object. Only object names, vertex positions and material names are
//! read; faces, normals and everything else are ignored.

use nalgebra::Vector3;
use std::convert::TryInto;

use crate::error::ParseError;

const OBJECT_MARKER: &str = "o ";
const VERTEX_MARKER: &str = "v ";
const MATERIAL_MARKER: &str = "usemtl ";

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectBlock {
    pub object_name: String,
    pub material_name: String,
    pub vertices: Vec<Vector3<f64>>,
}

impl ObjectBlock {
    fn new(object_name: &str) -> Self {
        Self {
            object_name: object_name.trim().to_string(),
            material_name: String::new(),
            vertices: Vec::new(),
        }
    }

    /// The block's vertices as box corners, or `None` if the object is not
    /// made of exactly 8 vertices.
    pub fn corners(&self) -> Option<&[Vector3<f64>; 8]> {
        self.vertices.as_slice().try_into().ok()
    }
}

/// Split an OBJ document into object blocks, in document order. Blocks are
/// returned whatever their vertex count; lines before the first object are
/// ignored.
pub fn parse_object_blocks(text: &str) -> Result<Vec<ObjectBlock>, ParseError> {
    let mut blocks = Vec::new();
    let mut current: Option<ObjectBlock> = None;

    for (line_ix, line) in text.lines().enumerate() {
        if let Some(name) = line.strip_prefix(OBJECT_MARKER) {
            blocks.extend(current.replace(ObjectBlock::new(name)));
            continue;
        }

        let block = match current.as_mut() {
            Some(block) => block,
            None => continue,
        };

        if line.starts_with(VERTEX_MARKER) {
            block.vertices.push(parse_vertex(line, line_ix + 1)?);
        } else if let Some(material) = line.strip_prefix(MATERIAL_MARKER) {
            block.material_name = material.trim().to_string();
        }
    }

    blocks.extend(current);
    Ok(blocks)
}

/// Read a `v x y z` record. The source convention has Z as up while levels use
/// Y as up, so the second and third coordinates are exchanged.
fn parse_vertex(line: &str, line_number: usize) -> Result<Vector3<f64>, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().skip(1).collect();
    if fields.len() < 3 {
        return Err(ParseError::MissingField {
            line: line_number,
            found: fields.len(),
            text: line.to_string(),
        });
    }

    let mut coords = [0.0; 3];
    for (coord, token) in coords.iter_mut().zip(&fields) {
        *coord = token.parse().map_err(|_| ParseError::InvalidNumber {
            line: line_number,
            token: token.to_string(),
        })?;
    }
    Ok(Vector3::new(coords[0], coords[2], coords[1]))
}
