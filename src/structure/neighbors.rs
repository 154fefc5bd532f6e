// Released under MIT License.

//! Implementation of periodic neighbor search.

use getset::{CopyGetters, Getters};

use crate::errors::NeighborError;
use crate::structure::Structure;
use crate::structures::{
    label::AtomLabel,
    lattice::image_shifts,
    vector3d::Vector3D,
};

/// Distances below this value (in Å) are considered to be zero.
const ZERO_DISTANCE: f64 = 1e-8;

/// Periodic image of an atom found within the search sphere.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    /// Label of the atom.
    #[getset(get = "pub")]
    label: AtomLabel,
    /// Index of the atom in the structure.
    #[getset(get_copy = "pub")]
    index: usize,
    /// Fractional position of the atom wrapped into the unit cell.
    #[getset(get_copy = "pub")]
    position: Vector3D,
    /// Distance (in Å) between the image and the center of the search sphere.
    #[getset(get_copy = "pub")]
    distance: f64,
}

/// ## Methods for searching for neighbors.
impl Structure {
    /// Find all atoms (including periodic images) located within `radius` Å of the atom with the given label.
    ///
    /// ## Returns
    /// Neighbors sorted by distance (and by file order for equal distances).
    /// The central atom itself is not included but its periodic images are,
    /// if they are closer than `radius`.
    /// `NeighborError` if the label does not exist or the radius is not a positive finite number.
    ///
    /// ## Example
    /// ```no_run
    /// # use poscar_tools::prelude::*;
    /// #
    /// let structure = Structure::from_file("CONTCAR").unwrap();
    /// for neighbor in structure.neighbors(&"Si1".parse().unwrap(), 2.5).unwrap() {
    ///     println!("{} {:.4}", neighbor.label(), neighbor.distance());
    /// }
    /// ```
    pub fn neighbors(&self, label: &AtomLabel, radius: f64) -> Result<Vec<Neighbor>, NeighborError> {
        let center = *self.get_atom(label)?.get_position();

        Ok(self
            .sites_in_sphere(&center, radius)?
            .into_iter()
            .filter(|n| n.distance > ZERO_DISTANCE)
            .collect())
    }

    /// Find all atoms (including periodic images) located within `radius` Å of a point
    /// given in fractional coordinates.
    ///
    /// ## Returns
    /// Sites sorted by distance (and by file order for equal distances).
    /// Sites at zero distance are included.
    /// `NeighborError::InvalidRadius` if the radius is not a positive finite number,
    /// `NeighborError::RadiusTooLarge` if it spans too many periodic images.
    pub fn sites_in_sphere(&self, center: &Vector3D, radius: f64) -> Result<Vec<Neighbor>, NeighborError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(NeighborError::InvalidRadius(radius.to_string()));
        }

        let lattice = self.get_lattice();
        let range = lattice
            .image_range(radius)
            .ok_or_else(|| NeighborError::RadiusTooLarge(radius.to_string()))?;

        let mut found = Vec::new();
        for ((label, index), atom) in self.label_index().iter().zip(self.get_atoms()) {
            let mut wrapped = *atom.get_position();
            wrapped.wrap();

            // start from the image closest to the center and explore the surrounding cells
            let closest = *center + (wrapped - *center).min_image();
            for shift in image_shifts(range) {
                let image = closest + shift;
                let distance = lattice.to_cartesian(&(image - *center)).len();

                if distance <= radius {
                    found.push(Neighbor {
                        label: label.clone(),
                        index,
                        position: wrapped,
                        distance,
                    });
                }
            }
        }

        found.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.index.cmp(&b.index))
        });

        Ok(found)
    }
}
