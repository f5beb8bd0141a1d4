//! Error types for the conversion pipeline.

use thiserror::Error;

/// A vertex record in the mesh text could not be read.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("line {line}: vertex needs 3 coordinates, found {found} in {text:?}")]
    MissingField {
        line: usize,
        found: usize,
        text: String,
    },

    #[error("line {line}: invalid coordinate {token:?}")]
    InvalidNumber { line: usize, token: String },
}

/// The corners of an object do not describe a box.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("expected 3 perpendicular vectors, found {found} (material {material:?})")]
    PerpendicularCount { found: usize, material: String },
}

/// Any failure that stops a whole document from converting.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("object {object:?}: {source}")]
    Geometry {
        object: String,
        #[source]
        source: GeometryError,
    },
}
