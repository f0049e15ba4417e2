//! Rigid-body (Kabsch) superposition, used to align a measured step's extended-backbone
//! atoms onto a reference golden-step cloud before computing RMSD (spec.md §4.1, §4.9).
//!
//! Grounded on the SVD usage pattern of the teacher's own `calc::SubstructureAxis`
//! (helical-axis fitting via `nalgebra::SVD`), generalised here to a full 3x3 rotation
//! fit rather than a principal axis.

use crate::calc::Vec3;
use crate::error::ClassificationError;
use nalgebra::{Matrix3, Vector3, SVD};

fn to_na(v: &Vec3) -> Vector3<f64> {
    Vector3::new(v.x, v.y, v.z)
}

fn from_na(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Aligns `movable` onto `reference` with a rigid rotation + translation that minimises
/// RMSD (Kabsch algorithm), mutating `movable`'s coordinates in place. Returns the RMSD
/// achieved after alignment.
pub fn superpose(movable: &mut [Vec3], reference: &[Vec3]) -> Result<f64, ClassificationError> {
    if movable.len() != reference.len() {
        return Err(ClassificationError::MismatchingSizes);
    }
    if movable.is_empty() {
        return Err(ClassificationError::InvalidArgument);
    }
    let n = movable.len() as f64;

    let mov_centroid = crate::calc::centroid(movable)?;
    let ref_centroid = crate::calc::centroid(reference)?;

    let mut cov = Matrix3::zeros();
    for (m, r) in movable.iter().zip(reference.iter()) {
        let mc = to_na(m) - to_na(&mov_centroid);
        let rc = to_na(r) - to_na(&ref_centroid);
        cov += mc * rc.transpose();
    }

    let svd = SVD::new(cov, true, true);
    let u = svd.u.ok_or(ClassificationError::BadGeometry)?;
    let v_t = svd.v_t.ok_or(ClassificationError::BadGeometry)?;

    // Correct for a reflection so the rotation is proper (det == +1).
    let d = (v_t.transpose() * u.transpose()).determinant();
    let correction = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, d.signum());
    let rotation = v_t.transpose() * correction * u.transpose();

    let mut sum_sq = 0.0;
    for (m, r) in movable.iter_mut().zip(reference.iter()) {
        let mc = to_na(m) - to_na(&mov_centroid);
        let aligned = rotation * mc + to_na(&ref_centroid);
        *m = from_na(&aligned);
        sum_sq += m.distance_square_to(r);
    }

    Ok((sum_sq / n).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_clouds_have_zero_rmsd() {
        let reference = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let mut movable = reference.clone();
        let rmsd = superpose(&mut movable, &reference).unwrap();
        assert!(rmsd < 1e-9);
    }

    #[test]
    fn rotated_translated_cloud_superposes_to_zero() {
        let reference = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.3, 0.7, 1.4),
        ];
        // 90 degree rotation about z, plus a translation.
        let mut movable: Vec<Vec3> = reference
            .iter()
            .map(|p| Vec3::new(-p.y + 5.0, p.x - 3.0, p.z + 2.0))
            .collect();
        let rmsd = superpose(&mut movable, &reference).unwrap();
        assert!(rmsd < 1e-6, "rmsd={rmsd}");
    }

    #[test]
    fn mismatching_sizes_is_an_error() {
        let reference = vec![Vec3::new(0.0, 0.0, 0.0)];
        let mut movable = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            superpose(&mut movable, &reference),
            Err(ClassificationError::MismatchingSizes)
        ));
    }
}
