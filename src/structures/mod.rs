// Released under MIT License.

//! Implementation of various structures used in the `poscar_tools` library.

pub mod atom;
pub mod label;
pub mod lattice;
pub mod mobility;
pub mod vector3d;
