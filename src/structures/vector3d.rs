// Released under MIT License.

//! Implementation of methods for three-dimensional vector.

use std::fmt;
use std::ops::{Add, Deref, DerefMut, Sub};

use nalgebra::base::Vector3;

/// Describes a position of a point in space, either in fractional or in Cartesian coordinates.
/// Implemented using `nalgebra`'s Vector3; fields can be accessed as `.x`, `.y`, and `.z`.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3D(pub(crate) Vector3<f64>);

impl From<[f64; 3]> for Vector3D {
    #[inline]
    fn from(arr: [f64; 3]) -> Self {
        Vector3D(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

impl From<Vector3<f64>> for Vector3D {
    #[inline]
    fn from(vec: Vector3<f64>) -> Self {
        Vector3D(vec)
    }
}

impl Deref for Vector3D {
    type Target = Vector3<f64>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Vector3D {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D(self.0 + rhs.0)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D(self.0 - rhs.0)
    }
}

impl fmt::Display for Vector3D {
    /// Coordinates are written with 4 decimal places and a leading space reserved for the sign.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{: >7.4} {: >7.4} {: >7.4}", self.0.x, self.0.y, self.0.z)
    }
}

impl Vector3D {
    /// Create a new `Vector3D` structure.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3D(Vector3::new(x, y, z))
    }

    /// Calculate length of the vector.
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let vector = Vector3D::new(1.0, 2.0, 3.0);
    /// assert_approx_eq!(f64, vector.len(), 3.7416573867739413);
    /// ```
    #[inline]
    pub fn len(&self) -> f64 {
        self.0.magnitude()
    }

    /// Convert vector to unit vector.
    ///
    /// ## Notes
    /// - A null vector is returned unchanged.
    #[inline]
    pub fn to_unit(self) -> Vector3D {
        match self.0.try_normalize(0.0) {
            Some(x) => Vector3D(x),
            None => self,
        }
    }

    /// Multiply the vector by a scalar.
    #[inline]
    pub fn scale(self, factor: f64) -> Vector3D {
        Vector3D(self.0 * factor)
    }

    /// Wrap fractional coordinates into the interval [0, 1).
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let mut point = Vector3D::new(1.25, -0.25, 0.5);
    /// point.wrap();
    ///
    /// assert_approx_eq!(f64, point.x, 0.25);
    /// assert_approx_eq!(f64, point.y, 0.75);
    /// assert_approx_eq!(f64, point.z, 0.5);
    /// ```
    #[inline]
    pub fn wrap(&mut self) {
        for coor in self.0.iter_mut() {
            *coor = Vector3D::wrap_coordinate(*coor);
        }
    }

    /// Wrap a single fractional coordinate into [0, 1).
    fn wrap_coordinate(coor: f64) -> f64 {
        let wrapped = coor - coor.floor();
        // -1e-17 floors to -1 and ends up as exactly 1.0
        if wrapped >= 1.0 {
            0.0
        } else {
            wrapped
        }
    }

    /// Shift every coordinate of a fractional difference vector into [-0.5, 0.5).
    #[inline]
    pub fn min_image(self) -> Vector3D {
        Vector3D(self.0.map(|d| d - (d + 0.5).floor()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn wrap_exact_one() {
        let mut point = Vector3D::new(1.0, 2.0, -1.0);
        point.wrap();
        assert_eq!(point, Vector3D::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn wrap_tiny_negative() {
        let mut point = Vector3D::new(-1e-17, 0.3, 0.999);
        point.wrap();
        assert!(point.x >= 0.0 && point.x < 1.0);
        assert_approx_eq!(f64, point.y, 0.3);
        assert_approx_eq!(f64, point.z, 0.999);
    }

    #[test]
    fn min_image_components() {
        let diff = Vector3D::new(0.9, -0.7, 0.2).min_image();
        assert_approx_eq!(f64, diff.x, -0.1, epsilon = 1e-12);
        assert_approx_eq!(f64, diff.y, 0.3, epsilon = 1e-12);
        assert_approx_eq!(f64, diff.z, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn unit_of_null_vector() {
        let null = Vector3D::default().to_unit();
        assert_eq!(null, Vector3D::default());
    }

    #[test]
    fn unit_length() {
        let unit = Vector3D::new(3.0, -4.0, 12.0).to_unit();
        assert_approx_eq!(f64, unit.len(), 1.0);
    }

    #[test]
    fn display() {
        let vec = Vector3D::new(0.5, -0.25, 0.0);
        assert_eq!(format!("{}", vec), " 0.5000 -0.2500  0.0000");
    }
}
