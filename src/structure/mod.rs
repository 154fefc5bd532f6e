// Released under MIT License.

//! Implementation of the Structure structure and its methods.

use std::path::Path;

use crate::errors::{AtomLabelError, ParsePoscarError};
use crate::io::poscar_io;
use crate::structures::{
    atom::Atom,
    label::{AtomLabel, LabelIndex},
    lattice::Lattice,
    vector3d::Vector3D,
};

mod compare;
mod coordinates;
mod defect;
mod neighbors;
mod perturb;

pub use compare::Displacement;
pub use defect::Defect;
pub use neighbors::Neighbor;
pub use perturb::Move;

/// Crystal structure read from a POSCAR file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    /// Comment line of the POSCAR file.
    name: String,
    /// Periodic lattice (scaled).
    lattice: Lattice,
    /// Atoms in file order. Atoms of the same element form contiguous blocks.
    atoms: Vec<Atom>,
    /// Does the structure use selective dynamics?
    selective: bool,
}

/// ## Methods for creating `Structure` structures and accessing their properties.
impl Structure {
    /// Create a new structure.
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// #
    /// let lattice = Lattice::new([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]).unwrap();
    /// let atoms = vec![
    ///     Atom::new("Si", [0.0, 0.0, 0.0].into()),
    ///     Atom::new("O", [0.5, 0.5, 0.5].into()),
    /// ];
    ///
    /// let structure = Structure::new("SiO", lattice, atoms, false);
    /// assert_eq!(structure.get_n_atoms(), 2);
    /// ```
    pub fn new(name: &str, lattice: Lattice, atoms: Vec<Atom>, selective: bool) -> Self {
        Structure {
            name: name.to_owned(),
            lattice,
            atoms,
            selective,
        }
    }

    /// Read a structure from a POSCAR/CONTCAR file.
    ///
    /// ## Returns
    /// `Structure` if the file was successfully parsed. Otherwise `ParsePoscarError`.
    ///
    /// ## Example
    /// ```no_run
    /// # use poscar_tools::prelude::*;
    /// #
    /// let structure = match Structure::from_file("CONTCAR") {
    ///     Ok(x) => x,
    ///     Err(e) => {
    ///         eprintln!("{}", e);
    ///         return;
    ///     }
    /// };
    /// ```
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, ParsePoscarError> {
        poscar_io::read_poscar(filename)
    }

    /// Get the name (comment line) of the structure.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Get the lattice of the structure.
    pub fn get_lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Get the atoms of the structure.
    pub fn get_atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Get the number of atoms in the structure.
    pub fn get_n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Returns `true` if the structure uses selective dynamics.
    pub fn is_selective(&self) -> bool {
        self.selective
    }

    /// Get element symbols and atom counts of contiguous blocks of atoms, in file order.
    pub fn species(&self) -> Vec<(String, usize)> {
        let mut species: Vec<(String, usize)> = Vec::new();
        for atom in self.atoms.iter() {
            match species.last_mut() {
                Some((symbol, count)) if *symbol == atom.get_element() => *count += 1,
                _ => species.push((atom.get_element().to_owned(), 1)),
            }
        }

        species
    }

    /// Build the mapping of atom labels to atom indices.
    pub fn label_index(&self) -> LabelIndex {
        let (symbols, counts): (Vec<String>, Vec<usize>) = self.species().into_iter().unzip();
        LabelIndex::build(&symbols, &counts, 0)
    }

    /// Get labels of all atoms in file order.
    pub fn labels(&self) -> Vec<AtomLabel> {
        self.label_index().labels().cloned().collect()
    }

    /// Get the index of the atom with the given label.
    ///
    /// ## Returns
    /// Index of the atom. `AtomLabelError::NotFound` if no such atom exists.
    pub fn get_index(&self, label: &AtomLabel) -> Result<usize, AtomLabelError> {
        self.label_index().resolve(label)
    }

    /// Get a reference to the atom with the given label.
    pub fn get_atom(&self, label: &AtomLabel) -> Result<&Atom, AtomLabelError> {
        let index = self.get_index(label)?;
        Ok(&self.atoms[index])
    }

    /// Get the Cartesian position (in Å) of the atom with the given index.
    ///
    /// ## Panics
    /// Panics if the index is out of range.
    pub fn cartesian_position(&self, index: usize) -> Vector3D {
        self.lattice.to_cartesian(self.atoms[index].get_position())
    }

    /// Get mutable access to the atoms.
    pub(crate) fn get_atoms_mut(&mut self) -> &mut Vec<Atom> {
        &mut self.atoms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_blocks() {
        let structure = Structure::from_file("test_files/SiO.vasp").unwrap();
        assert_eq!(
            structure.species(),
            vec![("Si".to_string(), 2), ("O".to_string(), 1)]
        );
    }

    #[test]
    fn species_empty() {
        let lattice = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let structure = Structure::new("empty", lattice, Vec::new(), false);
        assert!(structure.species().is_empty());
        assert!(structure.label_index().is_empty());
    }

    #[test]
    fn label_index_matches_file() {
        let structure = Structure::from_file("test_files/SiO_selective.vasp").unwrap();
        let file = poscar_io::PoscarFile::from_file("test_files/SiO_selective.vasp").unwrap();

        assert_eq!(structure.label_index(), file.label_index().rebased(0));
    }

    #[test]
    fn labels_in_file_order() {
        let structure = Structure::from_file("test_files/SiO.vasp").unwrap();
        let labels: Vec<String> = structure.labels().iter().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["Si1", "Si2", "O1"]);
    }

    #[test]
    fn get_atom_by_label() {
        let structure = Structure::from_file("test_files/SiO.vasp").unwrap();
        let atom = structure.get_atom(&"O1".parse().unwrap()).unwrap();
        assert_eq!(atom.get_element(), "O");
        assert_eq!(
            structure.get_atom(&"O2".parse().unwrap()),
            Err(AtomLabelError::NotFound("O2".to_string()))
        );
    }
}
