// Released under MIT License.

//! Implementation of displacement analysis between two structures.

use getset::{CopyGetters, Getters};

use crate::errors::CompareError;
use crate::structure::Structure;
use crate::structures::{label::AtomLabel, vector3d::Vector3D};

/// Displacement of a single atom between two structures.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Displacement {
    #[getset(get = "pub")]
    label: AtomLabel,
    /// Length of the displacement in Å (minimum image).
    #[getset(get_copy = "pub")]
    distance: f64,
    /// Fractional position of the atom in the first structure.
    #[getset(get_copy = "pub")]
    position1: Vector3D,
    /// Fractional position of the atom in the second structure.
    #[getset(get_copy = "pub")]
    position2: Vector3D,
}

/// ## Methods for comparing structures.
impl Structure {
    /// Calculate displacements of atoms between `self` and `other`.
    ///
    /// ## Returns
    /// Displacements strictly larger than `threshold` (in Å), sorted from the largest.
    /// `CompareError::LatticeMismatch` if the two lattices are not equivalent.
    /// `CompareError::AtomMismatch` if the structures do not contain the same atoms.
    ///
    /// ## Example
    /// ```no_run
    /// # use poscar_tools::prelude::*;
    /// #
    /// let neutral = Structure::from_file("neutral.vasp").unwrap();
    /// let charged = Structure::from_file("charged.vasp").unwrap();
    ///
    /// for displacement in neutral.compare(&charged, 0.01).unwrap() {
    ///     println!("{} {:.4}", displacement.label(), displacement.distance());
    /// }
    /// ```
    ///
    /// ## Notes
    /// - Atoms are matched by their labels, i.e. by their order within each element.
    /// - Periodic boundary conditions are respected: an atom that crossed the cell boundary
    ///   is reported with its real, short displacement.
    pub fn compare(&self, other: &Structure, threshold: f64) -> Result<Vec<Displacement>, CompareError> {
        if !self.get_lattice().is_equivalent(other.get_lattice()) {
            return Err(CompareError::LatticeMismatch);
        }

        let index1 = self.label_index();
        let index2 = other.label_index();

        if let Some(label) = index2.labels().find(|l| index1.get(l).is_none()) {
            return Err(CompareError::AtomMismatch(label.to_string()));
        }

        let mut displacements = Vec::new();
        for (label, i) in index1.iter() {
            let j = index2
                .get(label)
                .ok_or_else(|| CompareError::AtomMismatch(label.to_string()))?;

            let position1 = *self.get_atoms()[i].get_position();
            let position2 = *other.get_atoms()[j].get_position();
            let distance = self.get_lattice().distance(&position1, &position2);

            if distance > threshold {
                displacements.push(Displacement {
                    label: label.clone(),
                    distance,
                    position1,
                    position2,
                });
            }
        }

        // stable sort keeps file order for equal displacements
        displacements.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        log::debug!(
            "{} of {} atoms moved by more than {} Å.",
            displacements.len(),
            index1.len(),
            threshold
        );

        Ok(displacements)
    }
}
