// Released under MIT License.

//! Implementation of errors returned by the `poscar_tools` library.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur when reading and parsing a POSCAR file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParsePoscarError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("File `{0}` ended unexpectedly.")]
    LineNotFound(Box<Path>),
    #[error("Could not parse line `{0}` as scaling factor.")]
    ParseScaleErr(String),
    #[error("Could not parse line `{0}` as lattice vector.")]
    ParseLatticeErr(String),
    #[error("Could not parse line `{0}` as element symbols.")]
    ParseSymbolsErr(String),
    #[error("Could not parse line `{0}` as atom counts.")]
    ParseCountsErr(String),
    #[error("Element line lists {0} symbols but count line lists {1} counts.")]
    CountMismatch(usize, usize),
    #[error("Could not parse line `{0}` as atom coordinates.")]
    ParseAtomLineErr(String),
    #[error("Could not parse selective dynamics flags on line `{0}`.")]
    ParseFlagsErr(String),
    #[error("Lattice vectors are linearly dependent.")]
    SingularLattice,
}

/// Errors that can occur when writing a POSCAR file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WritePoscarError {
    #[error("File `{0}` could not be created.")]
    CouldNotCreate(Box<Path>),
    #[error("Could not write line into file.")]
    CouldNotWrite,
    #[error("File could not be moved into place at `{0}`.")]
    CouldNotPersist(Box<Path>),
}

/// Errors that can occur when working with atom labels.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AtomLabelError {
    #[error("`{0}` is not a valid atom label (expected element symbol followed by a positive number, e.g. `Si2`).")]
    InvalidLabel(String),
    #[error("Atom label `{0}` does not exist in the structure.")]
    NotFound(String),
    #[error("No atom labels are provided.")]
    NoLabels,
}

/// Errors that can occur when parsing a selective dynamics tag.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MobilityTagError {
    #[error("Tag `{0}` does not consist of exactly three flags.")]
    InvalidLength(String),
    #[error("Tag `{0}` contains flag `{1}`; only `T` and `F` are allowed.")]
    InvalidFlag(String, char),
}

/// Errors that can occur when rewriting the selective dynamics block of a POSCAR file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectiveDynamicsError {
    #[error("{0}")]
    Parse(#[from] ParsePoscarError),
    #[error("{0}")]
    Label(#[from] AtomLabelError),
    #[error("{0}")]
    Tag(#[from] MobilityTagError),
    #[error("{0}")]
    Write(#[from] WritePoscarError),
}

/// Errors that can occur when comparing two structures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompareError {
    #[error("Lattice vectors of the two structures are not equivalent.")]
    LatticeMismatch,
    #[error("Atom `{0}` is present in only one of the structures.")]
    AtomMismatch(String),
    #[error("Threshold `{0}` is not a valid number.")]
    InvalidThreshold(String),
}

/// Errors that can occur when creating a point defect.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DefectError {
    #[error("{0}")]
    Label(#[from] AtomLabelError),
    #[error("`{0}` is not a valid element symbol.")]
    InvalidElement(String),
    #[error("Could not parse `{0}` as a defect specification.")]
    InvalidSpecification(String),
    #[error("Cannot remove `{0}`: the structure would contain no atoms.")]
    EmptyStructure(String),
}

/// Errors that can occur when searching for neighbors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NeighborError {
    #[error("{0}")]
    Label(#[from] AtomLabelError),
    #[error("Radius `{0}` must be a positive finite number.")]
    InvalidRadius(String),
    #[error("Radius `{0}` Å spans too many periodic images of the cell.")]
    RadiusTooLarge(String),
}

/// Errors that can occur when perturbing atomic positions.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PerturbError {
    #[error("{0}")]
    Label(#[from] AtomLabelError),
    #[error("{0}")]
    Neighbor(#[from] NeighborError),
    #[error("Radius `{0}` must be a positive finite number.")]
    InvalidRadius(String),
    #[error("No neighbors of `{0}` were found within {1} Å.")]
    NoNeighbors(String, String),
}
