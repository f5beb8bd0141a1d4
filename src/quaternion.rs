//! Closed-form absolute orientation between two frames, following Besl and
//! McKay, "Method for registration of 3-D shapes" (1992).

use itertools::izip;
use nalgebra::{Matrix3, Matrix4, Quaternion, UnitQuaternion, Vector3};

/// Find the rotation carrying each vector of `reference` onto the vector of
/// `measured` with the same index. Both triples are expected to be
/// orthonormal.
///
/// The quaternion is the eigenvector of the largest eigenvalue of the
/// symmetric key matrix. When that eigenvalue is repeated the first one in the
/// solver's ordering is used, and the sign of the result is left as the
/// solver produced it.
pub fn fit_rotation(
    reference: &[Vector3<f64>; 3],
    measured: &[Vector3<f64>; 3],
) -> UnitQuaternion<f64> {
    let mut m = Matrix3::zeros();
    for (a, b) in izip!(reference.iter(), measured.iter()) {
        m += a * b.transpose();
    }

    let eigen = key_matrix(&m).symmetric_eigen();
    let (best, _) = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_ix, best_value), (ix, &value)| {
            if value > best_value {
                (ix, value)
            } else {
                (best_ix, best_value)
            }
        });

    let q = eigen.eigenvectors.column(best);
    // Eigenvectors come back normalized, so no renormalization is needed.
    UnitQuaternion::new_unchecked(Quaternion::new(q[0], q[1], q[2], q[3]))
}

#[rustfmt::skip]
fn key_matrix(m: &Matrix3<f64>) -> Matrix4<f64> {
    let (m00, m01, m02) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let (m10, m11, m12) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let (m20, m21, m22) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

    let n12 = m12 - m21;
    let n13 = m20 - m02;
    let n14 = m01 - m10;
    let n23 = m01 + m10;
    let n24 = m20 + m02;
    let n34 = m12 + m21;

    Matrix4::new(
        m00 + m11 + m22, n12,             n13,              n14,
        n12,             m00 - m11 - m22, n23,              n24,
        n13,             n23,             -m00 + m11 - m22, n34,
        n14,             n24,             n34,              -m00 - m11 + m22,
    )
}
