// Released under MIT License.

//! Implementation of the Lattice structure and its methods.

use nalgebra::{Matrix3, Vector3};

use crate::auxiliary::LATTICE_EPSILON;
use crate::errors::ParsePoscarError;
use crate::structures::vector3d::Vector3D;

/// Largest number of periodic images searched along one lattice vector in each direction.
const MAX_IMAGE_RANGE: f64 = 32.0;

/// Periodic lattice of a crystal.
/// Rows of the matrix are the lattice vectors **a**, **b**, and **c** in Å (scaling factor already applied).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lattice {
    matrix: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl Lattice {
    /// Create a new lattice from three lattice vectors.
    ///
    /// ## Returns
    /// `Lattice` if the vectors span a volume. Otherwise `ParsePoscarError::SingularLattice`.
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// #
    /// let lattice = Lattice::new([[4.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 6.0]]).unwrap();
    /// assert_eq!(lattice.volume(), 120.0);
    /// ```
    pub fn new(vectors: [[f64; 3]; 3]) -> Result<Self, ParsePoscarError> {
        let matrix = Matrix3::from_row_slice(&[
            vectors[0][0],
            vectors[0][1],
            vectors[0][2],
            vectors[1][0],
            vectors[1][1],
            vectors[1][2],
            vectors[2][0],
            vectors[2][1],
            vectors[2][2],
        ]);

        let inverse = matrix
            .try_inverse()
            .filter(|_| matrix.determinant().abs() > f64::EPSILON)
            .ok_or(ParsePoscarError::SingularLattice)?;

        Ok(Lattice { matrix, inverse })
    }

    /// Create a lattice from unscaled vectors and a POSCAR scaling factor.
    ///
    /// ## Notes
    /// - A negative scaling factor is interpreted as the target cell volume (in Å³), as in VASP.
    pub fn from_poscar(vectors: [[f64; 3]; 3], scale: f64) -> Result<Self, ParsePoscarError> {
        let unscaled = Lattice::new(vectors)?;
        let factor = if scale < 0.0 {
            (scale.abs() / unscaled.volume()).cbrt()
        } else {
            scale
        };

        let mut scaled = vectors;
        for vector in scaled.iter_mut() {
            for coor in vector.iter_mut() {
                *coor *= factor;
            }
        }

        Lattice::new(scaled)
    }

    /// Get lattice vector with the given index (0 = a, 1 = b, 2 = c).
    ///
    /// ## Panics
    /// Panics if `index` is larger than 2.
    pub fn get_vector(&self, index: usize) -> Vector3D {
        Vector3D(self.matrix.row(index).transpose())
    }

    /// Get lengths of the lattice vectors a, b, c.
    pub fn lengths(&self) -> Vector3D {
        Vector3D::new(
            self.get_vector(0).len(),
            self.get_vector(1).len(),
            self.get_vector(2).len(),
        )
    }

    /// Get volume of the cell in Å³.
    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    /// Convert fractional coordinates into Cartesian coordinates (in Å).
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let lattice = Lattice::new([[4.0, 0.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 6.0]]).unwrap();
    /// let cart = lattice.to_cartesian(&Vector3D::new(0.5, 0.5, 0.5));
    ///
    /// assert_approx_eq!(f64, cart.x, 3.0);
    /// assert_approx_eq!(f64, cart.y, 2.0);
    /// assert_approx_eq!(f64, cart.z, 3.0);
    /// ```
    #[inline]
    pub fn to_cartesian(&self, frac: &Vector3D) -> Vector3D {
        Vector3D(self.matrix.transpose() * frac.0)
    }

    /// Convert Cartesian coordinates (in Å) into fractional coordinates.
    #[inline]
    pub fn to_fractional(&self, cart: &Vector3D) -> Vector3D {
        Vector3D(self.inverse.transpose() * cart.0)
    }

    /// Check whether two lattices are the same within a tolerance of 1e-6 Å per matrix element.
    pub fn is_equivalent(&self, other: &Lattice) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| float_cmp::approx_eq!(f64, *a, *b, epsilon = LATTICE_EPSILON))
    }

    /// Calculate the shortest distance (in Å) between two points given in fractional coordinates,
    /// taking periodic boundary conditions into consideration.
    ///
    /// ## Notes
    /// - Works for triclinic cells; the 27 images around the minimum-image guess are checked.
    pub fn distance(&self, frac1: &Vector3D, frac2: &Vector3D) -> f64 {
        let diff = (*frac2 - *frac1).min_image();

        let mut shortest = f64::INFINITY;
        for shift in image_shifts([1, 1, 1]) {
            let cart = self.to_cartesian(&(diff + shift));
            shortest = shortest.min(cart.len());
        }

        shortest
    }

    /// Number of periodic images along each lattice vector that must be checked
    /// to find every point within `radius` Å.
    ///
    /// The distance between neighboring lattice planes along vector `i` is
    /// `1 / |row i of the inverse transposed matrix|`.
    ///
    /// ## Returns
    /// `None` if the radius is not finite or the search would span more than
    /// `MAX_IMAGE_RANGE` images along any lattice vector.
    pub(crate) fn image_range(&self, radius: f64) -> Option<[i32; 3]> {
        if !radius.is_finite() {
            return None;
        }

        let mut range = [0; 3];
        for (i, item) in range.iter_mut().enumerate() {
            let reciprocal: Vector3<f64> = self.inverse.column(i).into_owned();
            let spacing = 1.0 / reciprocal.magnitude();
            let images = (radius.max(0.0) / spacing).ceil() + 1.0;
            if images > MAX_IMAGE_RANGE {
                return None;
            }
            *item = images as i32;
        }

        Some(range)
    }
}

/// Iterate over all integer shift vectors within the given range along each lattice vector.
pub(crate) fn image_shifts(range: [i32; 3]) -> impl Iterator<Item = Vector3D> {
    (-range[0]..=range[0]).flat_map(move |i| {
        (-range[1]..=range[1]).flat_map(move |j| {
            (-range[2]..=range[2]).map(move |k| Vector3D::new(i as f64, j as f64, k as f64))
        })
    })
}
