// Released under MIT License.

//! Implementation of coordinate lookup by atom labels.

use crate::errors::AtomLabelError;
use crate::structure::Structure;
use crate::structures::{label::AtomLabel, vector3d::Vector3D};

/// ## Methods for obtaining coordinates of labelled atoms.
impl Structure {
    /// Get fractional coordinates of atoms with the given labels.
    ///
    /// ## Returns
    /// Labels with their fractional coordinates in the order of the request.
    /// `AtomLabelError::NoLabels` if no labels were provided.
    /// `AtomLabelError::NotFound` if any of the labels does not exist.
    ///
    /// ## Example
    /// ```no_run
    /// # use poscar_tools::prelude::*;
    /// #
    /// let structure = Structure::from_file("CONTCAR").unwrap();
    /// let labels = parse_labels(&["Si1", "O3"]).unwrap();
    ///
    /// for (label, position) in structure.get_coordinates(&labels).unwrap() {
    ///     println!("{} {}", label, position);
    /// }
    /// ```
    pub fn get_coordinates(
        &self,
        labels: &[AtomLabel],
    ) -> Result<Vec<(AtomLabel, Vector3D)>, AtomLabelError> {
        if labels.is_empty() {
            return Err(AtomLabelError::NoLabels);
        }

        let index = self.label_index();
        labels
            .iter()
            .map(|label| {
                let i = index.resolve(label)?;
                Ok((label.clone(), *self.get_atoms()[i].get_position()))
            })
            .collect()
    }
}
