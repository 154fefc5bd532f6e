// Released under MIT License.

//! Implementation of random perturbation of atoms surrounding a site.

use getset::{CopyGetters, Getters};
use hashbrown::HashSet;
use rand::Rng;

use crate::errors::PerturbError;
use crate::structure::Structure;
use crate::structures::{label::AtomLabel, vector3d::Vector3D};

/// Record of a single atom moved by `Structure::perturb_neighbors`.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    #[getset(get = "pub")]
    label: AtomLabel,
    /// Fractional position before the move.
    #[getset(get_copy = "pub")]
    old: Vector3D,
    /// Fractional position after the move (wrapped into the cell).
    #[getset(get_copy = "pub")]
    new: Vector3D,
}

/// Draw a random direction: uniform vector from [-0.5, 0.5)^3, normalized.
fn random_direction(rng: &mut impl Rng) -> Vector3D {
    Vector3D::new(
        rng.gen::<f64>() - 0.5,
        rng.gen::<f64>() - 0.5,
        rng.gen::<f64>() - 0.5,
    )
    .to_unit()
}

/// ## Methods for perturbing structures.
impl Structure {
    /// Randomly displace all atoms located within `radius` Å of the atom with the given label.
    ///
    /// Every neighbor is moved in a random direction by `magnitude / distance` Å,
    /// so atoms closer to the site move more.
    ///
    /// ## Returns
    /// List of moved atoms with their old and new positions, ordered by distance from the site.
    /// `PerturbError` if the label does not exist, the radius is not a positive finite number
    /// or no neighbors were found.
    ///
    /// ## Example
    /// ```no_run
    /// # use poscar_tools::prelude::*;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut structure = Structure::from_file("POSCAR").unwrap();
    /// let mut rng = StdRng::seed_from_u64(42);
    ///
    /// let moves = structure
    ///     .perturb_neighbors(&"O3".parse().unwrap(), 2.5, 0.15, &mut rng)
    ///     .unwrap();
    /// println!("Moved {} atoms.", moves.len());
    /// ```
    ///
    /// ## Notes
    /// - The central atom itself is never moved.
    /// - An atom is moved only once, based on its closest periodic image.
    pub fn perturb_neighbors(
        &mut self,
        label: &AtomLabel,
        radius: f64,
        magnitude: f64,
        rng: &mut impl Rng,
    ) -> Result<Vec<Move>, PerturbError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PerturbError::InvalidRadius(radius.to_string()));
        }

        let center = self.get_index(label)?;
        let neighbors = self.neighbors(label, radius)?;

        let mut visited = HashSet::new();
        let mut moves = Vec::new();

        for neighbor in neighbors {
            let index = neighbor.index();
            if index == center || !visited.insert(index) {
                continue;
            }

            let displacement = random_direction(rng).scale(magnitude / neighbor.distance());
            let shift = self.get_lattice().to_fractional(&displacement);

            let atom = &mut self.get_atoms_mut()[index];
            let old = *atom.get_position();
            atom.set_position(old + shift);
            atom.wrap();

            moves.push(Move {
                label: neighbor.label().clone(),
                old,
                new: *atom.get_position(),
            });
        }

        if moves.is_empty() {
            return Err(PerturbError::NoNeighbors(label.to_string(), radius.to_string()));
        }

        log::info!("Perturbed {} atoms around {}.", moves.len(), label);
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AtomLabelError, NeighborError};
    use crate::structures::{atom::Atom, lattice::Lattice};
    use float_cmp::assert_approx_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn cluster() -> Structure {
        let lattice = Lattice::new([[10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]]).unwrap();
        Structure::new(
            "cluster",
            lattice,
            vec![
                Atom::new("Ti", [0.5, 0.5, 0.5].into()),
                Atom::new("O", [0.7, 0.5, 0.5].into()),
                Atom::new("O", [0.5, 0.35, 0.5].into()),
                Atom::new("O", [0.0, 0.0, 0.0].into()),
            ],
            false,
        )
    }

    #[test]
    fn only_neighbors_move() {
        let original = cluster();
        let mut structure = original.clone();
        let mut rng = StdRng::seed_from_u64(1);

        let moves = structure
            .perturb_neighbors(&"Ti1".parse().unwrap(), 2.5, 0.15, &mut rng)
            .unwrap();

        let labels: Vec<String> = moves.iter().map(|m| m.label().to_string()).collect();
        assert_eq!(labels, vec!["O2", "O1"]);

        assert_eq!(structure.get_atoms()[0], original.get_atoms()[0]);
        assert_eq!(structure.get_atoms()[3], original.get_atoms()[3]);
        assert_ne!(structure.get_atoms()[1], original.get_atoms()[1]);
        assert_ne!(structure.get_atoms()[2], original.get_atoms()[2]);
    }

    #[test]
    fn displacement_scales_with_distance() {
        let original = cluster();
        let mut structure = original.clone();
        let mut rng = StdRng::seed_from_u64(7);

        let moves = structure
            .perturb_neighbors(&"Ti1".parse().unwrap(), 2.5, 0.15, &mut rng)
            .unwrap();

        // O2 is 1.5 Å away, O1 is 2.0 Å away
        for (m, distance) in moves.iter().zip([1.5, 2.0]) {
            let moved = original
                .get_lattice()
                .distance(&m.old(), &m.new());
            assert_approx_eq!(f64, moved, 0.15 / distance, epsilon = 1e-9);
        }
    }

    #[test]
    fn seed_reproducibility() {
        let mut first = cluster();
        let mut second = cluster();

        let moves1 = first
            .perturb_neighbors(&"Ti1".parse().unwrap(), 2.5, 0.15, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let moves2 = second
            .perturb_neighbors(&"Ti1".parse().unwrap(), 2.5, 0.15, &mut StdRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(moves1, moves2);
        assert_eq!(first, second);
    }

    #[test]
    fn moved_atoms_stay_in_cell() {
        let lattice = Lattice::new([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]).unwrap();
        let mut structure = Structure::new(
            "edge",
            lattice,
            vec![
                Atom::new("Si", [0.0, 0.0, 0.0].into()),
                Atom::new("O", [0.0, 0.0, 0.4].into()),
            ],
            false,
        );

        let mut rng = StdRng::seed_from_u64(3);
        structure
            .perturb_neighbors(&"Si1".parse().unwrap(), 1.5, 1.0, &mut rng)
            .unwrap();

        for atom in structure.get_atoms() {
            for coor in [atom.get_position().x, atom.get_position().y, atom.get_position().z] {
                assert!((0.0..1.0).contains(&coor));
            }
        }
    }

    #[test]
    fn no_neighbors() {
        let mut structure = cluster();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            structure.perturb_neighbors(&"O3".parse().unwrap(), 1.0, 0.15, &mut rng),
            Err(PerturbError::NoNeighbors("O3".to_string(), "1".to_string()))
        );
    }

    #[test]
    fn invalid_radius() {
        let mut structure = cluster();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            structure.perturb_neighbors(&"Ti1".parse().unwrap(), -1.0, 0.15, &mut rng),
            Err(PerturbError::InvalidRadius("-1".to_string()))
        );
        assert_eq!(
            structure.perturb_neighbors(&"Ti1".parse().unwrap(), f64::INFINITY, 0.15, &mut rng),
            Err(PerturbError::InvalidRadius("inf".to_string()))
        );
        assert_eq!(structure, cluster());
    }

    #[test]
    fn radius_too_large() {
        let mut structure = cluster();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            structure.perturb_neighbors(&"Ti1".parse().unwrap(), 1e6, 0.15, &mut rng),
            Err(PerturbError::Neighbor(NeighborError::RadiusTooLarge(
                "1000000".to_string()
            )))
        );
    }

    #[test]
    fn unknown_label() {
        let mut structure = cluster();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            structure.perturb_neighbors(&"Ti2".parse().unwrap(), 2.5, 0.15, &mut rng),
            Err(PerturbError::Label(AtomLabelError::NotFound("Ti2".to_string())))
        );
    }
}
