//! Pure geometry primitives: distances, angles, dihedrals, centroids, wrapping and RMSD.
//!
//! These are thin, named wrappers over [`Vec3`]'s own operator-style methods
//! (`distance_to`, `planar_angle3`, `dihedral_angle4`) — the same relationship the
//! original C library has between `LLKA_measureDistance`/`measureAngle`/`measureDihedral`
//! and its internal `util/geometry.h` math: the measurement layer never duplicates the
//! math, it only names it.

use crate::calc::{dihedral_angle4, planar_angle3, Vec3};
use crate::error::ClassificationError;
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

fn check_finite(xs: &[f64]) -> Result<(), ClassificationError> {
    if xs.iter().any(|x| !x.is_finite()) {
        return Err(ClassificationError::BadGeometry);
    }
    Ok(())
}

/// Euclidean distance between two points.
pub fn distance(p: &Vec3, q: &Vec3) -> Result<f64, ClassificationError> {
    check_finite(&[p.x, p.y, p.z, q.x, q.y, q.z])?;
    Ok(p.distance_to(q))
}

/// Interior angle a-b-c at vertex `b`, in \[0, π\].
pub fn angle(a: &Vec3, b: &Vec3, c: &Vec3) -> Result<f64, ClassificationError> {
    check_finite(&[a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z])?;
    Ok(planar_angle3(a, b, c))
}

/// Signed dihedral a-b-c-d about the b-c axis, right-handed convention, in (−π, π].
pub fn dihedral(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> Result<f64, ClassificationError> {
    check_finite(&[a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z, d.x, d.y, d.z])?;
    Ok(dihedral_angle4(a, b, c, d))
}

/// Arithmetic centroid of a non-empty point set.
pub fn centroid(points: &[Vec3]) -> Result<Vec3, ClassificationError> {
    if points.is_empty() {
        return Err(ClassificationError::InvalidArgument);
    }
    let mut c = Vec3::from_float(0.0);
    for p in points {
        check_finite(&[p.x, p.y, p.z])?;
        c += p;
    }
    c /= points.len() as f64;
    Ok(c)
}

/// Root-mean-square deviation between two equally-sized point sets, no alignment performed.
pub fn rmsd(a: &[Vec3], b: &[Vec3]) -> Result<f64, ClassificationError> {
    if a.len() != b.len() {
        return Err(ClassificationError::MismatchingSizes);
    }
    if a.is_empty() {
        return Err(ClassificationError::InvalidArgument);
    }
    let mut sum_sq = 0.0;
    for (p, q) in a.iter().zip(b.iter()) {
        sum_sq += p.distance_square_to(q);
    }
    Ok((sum_sq / a.len() as f64).sqrt())
}

/// Wraps an angle into `[0, 2*PI)`.
pub fn wrap_to_2pi(x: f64) -> f64 {
    let mut w = x % TWO_PI;
    if w < 0.0 {
        w += TWO_PI;
    }
    w
}

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_to_pi(x: f64) -> f64 {
    let mut w = wrap_to_2pi(x);
    if w > PI {
        w -= TWO_PI;
    }
    w
}

/// Signed shortest arc from `b` to `a`, in `(-PI, PI]`.
///
/// Must give the same numerical result as computing `a - b` and wrapping; used
/// throughout distance calculations in the nearest-neighbour search and voting stages.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    wrap_to_pi(a - b)
}

/// Converts a radian value to degrees. Centralised so every degree/radian crossing in
/// the voting and confal-scoring code is visually explicit at the call site (the
/// "degrees-in-voting quirk", see `SPEC_FULL.md` §9).
pub fn to_degrees_f(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Converts a degree value to radians. See [`to_degrees_f`].
pub fn to_radians_f(degrees: f64) -> f64 {
    degrees.to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_difference_is_antisymmetric() {
        for &a in &[0.0, 0.5, 1.5, 3.0, -2.0] {
            assert!((angle_difference(a, a)).abs() < 1e-12);
            for &b in &[0.1, -1.0, 2.9] {
                let d1 = angle_difference(a, b);
                let d2 = angle_difference(b, a);
                assert!((d1 + d2).abs() < 1e-9, "a={a} b={b} d1={d1} d2={d2}");
            }
        }
    }

    #[test]
    fn wrap_to_2pi_is_idempotent() {
        for &x in &[-10.0, -0.1, 0.0, 3.0, 7.0, 100.0] {
            let w = wrap_to_2pi(x);
            assert!((wrap_to_2pi(w) - w).abs() < 1e-12);
            assert!(w >= 0.0 && w < TWO_PI);
        }
    }

    #[test]
    fn wrap_to_pi_range() {
        for &x in &[-10.0, -0.1, 0.0, 3.0, 7.0, 100.0] {
            let w = wrap_to_pi(x);
            assert!(w > -PI - 1e-12 && w <= PI + 1e-12);
        }
    }

    #[test]
    fn distance_rejects_non_finite() {
        let a = Vec3::new(f64::NAN, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 0.0);
        assert!(matches!(distance(&a, &b), Err(ClassificationError::BadGeometry)));
    }

    #[test]
    fn rmsd_rejects_mismatching_sizes() {
        let a = vec![Vec3::new(0.0, 0.0, 0.0)];
        let b = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        assert!(matches!(rmsd(&a, &b), Err(ClassificationError::MismatchingSizes)));
    }
}
