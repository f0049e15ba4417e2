//! Functions that calculate geometric properties: distances, angles, dihedrals,
//! angular wrapping, rigid superposition and RMSD.
mod geometry;
mod superpose;
mod vec3;

pub use geometry::*;
pub use superpose::superpose;
pub use vec3::{dihedral_angle4, planar_angle2, planar_angle3, Vec3};
