// Released under MIT License.

//! # poscar_tools: VASP POSCAR Toolkit for Rust
//!
//! Rust library (and the `poscar` command-line tool) for inspecting and editing
//! VASP POSCAR/CONTCAR crystal-structure files.
//!
//! ## Usage
//!
//! Import the crate in your Rust code:
//! ```
//! use poscar_tools::prelude::*;
//! ```
//!
//! ## Atom labels
//!
//! Atoms are identified by labels composed of the element symbol and the 1-based
//! occurrence of that element in the file, e.g. `Si2` is the second silicon atom
//! listed in the file. Labels are only valid for the atom ordering of one particular file.
//!
//! ## Examples
//!
//! #### Printing coordinates and neighbors of an atom
//!
//! ```no_run
//! use poscar_tools::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     // read a POSCAR file
//!     let structure = Structure::from_file("CONTCAR")?;
//!
//!     // print fractional coordinates of two atoms
//!     let labels = parse_labels(&["Si1", "O3"])?;
//!     for (label, position) in structure.get_coordinates(&labels)? {
//!         println!("{:<8} {}", label, position);
//!     }
//!
//!     // list all atoms (including periodic images) within 2.5 Å of Si1
//!     let si1: AtomLabel = "Si1".parse()?;
//!     for neighbor in structure.neighbors(&si1, 2.5)? {
//!         println!("{:<8} {:.4}", neighbor.label(), neighbor.distance());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Freezing atoms using selective dynamics
//!
//! The editor keeps every line of the original file except for the coordinate block.
//!
//! ```no_run
//! use poscar_tools::prelude::*;
//! use poscar_tools::selective::{write_selective_dynamics, Selection};
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let selection = Selection::parse(&["Si1", "Si2"])?;
//!     let tag: MobilityTag = "FFF".parse()?;
//!
//!     for assignment in write_selective_dynamics("POSCAR", "POSCAR_frozen.vasp", &selection, tag)? {
//!         println!("{} -> {}", assignment.label(), assignment.tag());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Creating a defect and perturbing its surroundings
//!
//! ```no_run
//! use poscar_tools::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let structure = Structure::from_file("POSCAR")?;
//!
//!     // replace the first silicon atom with germanium
//!     let substitution: Defect = "Si1=Ge".parse()?;
//!     let mut defective = structure.create_defect(&substitution)?;
//!
//!     // randomly displace atoms surrounding the germanium atom
//!     let mut rng = StdRng::seed_from_u64(2024);
//!     let ge1: AtomLabel = "Ge1".parse()?;
//!     defective.perturb_neighbors(&ge1, 2.5, 0.15, &mut rng)?;
//!
//!     defective.write_poscar("POSCAR_Ge.vasp")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//! The individual error types provided by `poscar_tools` are not exported into the `prelude` module.
//! If you want to work with a specific error type, include it explicitly from the `errors` module:
//! ```
//! use poscar_tools::errors::ParsePoscarError;
//! ```
//!
//! ## Features
//! - [x] reading POSCAR/CONTCAR files (direct and Cartesian coordinates)
//! - [x] writing POSCAR files
//! - [x] editing selective dynamics flags
//! - [x] neighbor search respecting periodic boundary conditions (any cell shape)
//! - [x] comparing structures
//! - [x] point defects
//! - [x] random perturbations
//! - [ ] XDATCAR trajectories
//!
//! ## License
//! This library is released under the MIT License.

/// Current version of the `poscar_tools` library.
pub const POSCAR_TOOLS_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod auxiliary;
pub mod errors;
pub mod io;
pub mod selective;
pub mod structure;
pub mod structures;

/// Reexported basic `poscar_tools` structures.
pub mod prelude {
    pub use crate::io::poscar_io::PoscarFile;
    pub use crate::structure::{Defect, Displacement, Move, Neighbor, Structure};
    pub use crate::structures::atom::Atom;
    pub use crate::structures::label::{parse_labels, AtomLabel, LabelIndex};
    pub use crate::structures::lattice::Lattice;
    pub use crate::structures::mobility::MobilityTag;
    pub use crate::structures::vector3d::Vector3D;
}
