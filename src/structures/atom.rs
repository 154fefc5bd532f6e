// Released under MIT License.

//! Implementation of the Atom structure and its methods.

use crate::structures::{mobility::MobilityTag, vector3d::Vector3D};

/// Single atom of a crystal structure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    /// Element symbol as written in the POSCAR header.
    element: String,
    /// Position in fractional coordinates.
    position: Vector3D,
    /// Selective dynamics flags, if the structure uses selective dynamics.
    mobility: Option<MobilityTag>,
}

impl Atom {
    /// Create a new atom with the given element symbol and fractional position.
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// #
    /// let atom = Atom::new("Si", [0.25, 0.25, 0.25].into())
    ///     .with_mobility(MobilityTag::FROZEN);
    ///
    /// assert_eq!(atom.get_element(), "Si");
    /// assert_eq!(atom.get_mobility(), Some(MobilityTag::FROZEN));
    /// ```
    pub fn new(element: &str, position: Vector3D) -> Self {
        Atom {
            element: element.to_owned(),
            position,
            mobility: None,
        }
    }

    /// Add selective dynamics flags to the atom.
    pub fn with_mobility(mut self, mobility: MobilityTag) -> Self {
        self.mobility = Some(mobility);
        self
    }

    /// Get the element symbol of the atom.
    pub fn get_element(&self) -> &str {
        &self.element
    }

    /// Set the element symbol of the atom.
    pub fn set_element(&mut self, element: &str) {
        self.element = element.to_owned();
    }

    /// Get the fractional position of the atom.
    pub fn get_position(&self) -> &Vector3D {
        &self.position
    }

    /// Set the fractional position of the atom.
    pub fn set_position(&mut self, position: Vector3D) {
        self.position = position;
    }

    /// Get the selective dynamics flags of the atom.
    pub fn get_mobility(&self) -> Option<MobilityTag> {
        self.mobility
    }

    /// Set the selective dynamics flags of the atom.
    pub fn set_mobility(&mut self, mobility: Option<MobilityTag>) {
        self.mobility = mobility;
    }

    /// Wrap the position of the atom into the unit cell.
    pub fn wrap(&mut self) {
        self.position.wrap();
    }
}
