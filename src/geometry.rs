use float_cmp::approx_eq;
use itertools::Itertools;
use nalgebra::{UnitQuaternion, Vector3};

use crate::error::GeometryError;
use crate::quaternion::fit_rotation;

/// A cuboid reduced to its center, edge lengths and orientation.
#[derive(Debug, Clone)]
pub struct OrientedBox {
    pub center: Vector3<f64>,
    /// Lengths along the box's local X, Y and Z axes.
    pub size: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub type_name: String,
}

impl OrientedBox {
    /// Reconstruct a box from its 8 corners, given in any order.
    ///
    /// The first corner is used as the origin of the local frame. The edge to
    /// the nearest other corner becomes the X axis, and the two shortest
    /// vectors perpendicular to it become Y and Z, ordered so that the frame
    /// is right-handed.
    pub fn from_corners(material: &str, corners: &[Vector3<f64>; 8]) -> Result<Self, GeometryError> {
        let center = corners.iter().sum::<Vector3<f64>>() / 8.0;

        let origin = corners[0];
        let edges: Vec<Vector3<f64>> = corners[1..].iter().map(|x| x - origin).collect();
        let lengths: Vec<f64> = edges.iter().map(|x| x.norm()).collect();
        let units: Vec<Vector3<f64>> = edges.iter().zip(&lengths).map(|(x, &l)| x / l).collect();

        let x_ix = lengths
            .iter()
            .position_min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(0);
        let x_unit = units[x_ix];

        // Roundoff in the input keeps exact perpendicularity out of reach.
        let perpendicular_ixs: Vec<usize> = units
            .iter()
            .enumerate()
            .filter(|&(_, unit)| {
                approx_eq!(f64, x_unit.cross(unit).norm(), 1.0, epsilon = 1e-6, ulps = 4)
            })
            .map(|(ix, _)| ix)
            .collect();
        if perpendicular_ixs.len() != 3 {
            return Err(GeometryError::PerpendicularCount {
                found: perpendicular_ixs.len(),
                material: material.to_string(),
            });
        }

        // The longest perpendicular vector spans the face diagonal.
        let diagonal_ix = longest(&perpendicular_ixs, &lengths);
        let (a_ix, b_ix) = perpendicular_ixs
            .iter()
            .copied()
            .filter(|&ix| ix != diagonal_ix)
            .collect_tuple()
            .ok_or_else(|| GeometryError::PerpendicularCount {
                found: perpendicular_ixs.len(),
                material: material.to_string(),
            })?;

        let (y_ix, z_ix) = if x_unit.cross(&units[a_ix]).dot(&units[b_ix]) > 0.0 {
            (a_ix, b_ix)
        } else {
            (b_ix, a_ix)
        };

        let rotation = fit_rotation(
            &[Vector3::x(), Vector3::y(), Vector3::z()],
            &[x_unit, units[y_ix], units[z_ix]],
        );

        Ok(Self {
            center,
            size: Vector3::new(lengths[x_ix], lengths[y_ix], lengths[z_ix]),
            rotation,
            type_name: type_name(material).to_string(),
        })
    }
}

#[cfg(test)]
impl OrientedBox {
    /// Corner positions of the box in world space.
    pub fn corners(&self) -> Vec<Vector3<f64>> {
        let half = self.size / 2.0;
        let mut result = Vec::with_capacity(8);
        for &sx in &[-1.0, 1.0] {
            for &sy in &[-1.0, 1.0] {
                for &sz in &[-1.0, 1.0] {
                    let local = Vector3::new(sx * half.x, sy * half.y, sz * half.z);
                    result.push(self.center + self.rotation * local);
                }
            }
        }
        result
    }
}

/// Index into `lengths` of the longest candidate, the first one on ties.
fn longest(candidates: &[usize], lengths: &[f64]) -> usize {
    let mut result = candidates[0];
    for &ix in &candidates[1..] {
        if lengths[ix] > lengths[result] {
            result = ix;
        }
    }
    result
}

/// Strip the instance suffix from a material name, e.g. `Metal.001` becomes
/// `Metal`.
pub fn type_name(material: &str) -> &str {
    match material.find('.') {
        Some(ix) => &material[..ix],
        None => material,
    }
}
