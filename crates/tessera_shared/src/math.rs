//! Mathematical value types shared between the storage core and its consumers.
//!
//! These are plain owned values. Reading a component field out of the arena
//! produces one of these; writing one back copies its lanes into the arena.
//! Lanes are `f64` so every element kind an accessor can store round-trips
//! exactly. Matrices are column-major, matching GPU upload order.
//!
//! Construction is explicit: `new` takes components, `from_array` takes a
//! flat array, and `From` impls convert from another shape.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D Vector - texture coords, screen positions
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f64; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// 3D Vector - position, scale, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// All lanes one
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// 4D Vector - homogeneous coordinates, quaternions, colors
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec4 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
    /// W component
    pub w: f64,
}

impl Vec4 {
    /// Creates a new Vec4
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Identity rotation when used as a quaternion
    pub const IDENTITY_QUATERNION: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f64; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Extends a Vec3 with an explicit `w`.
    #[must_use]
    pub const fn from_vec3(v: Vec3, w: f64) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<Vec2> for Vec3 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y, 0.0)
    }
}

impl From<Vec3> for Vec2 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vec4> for Vec3 {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// 3x3 matrix, column-major
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat3 {
    /// Column-major lanes: `m[col * 3 + row]`
    pub m: [f64; 9],
}

impl Mat3 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Creates from a column-major array
    #[must_use]
    pub const fn from_array(m: [f64; 9]) -> Self {
        Self { m }
    }

    /// Creates from rows, as a matrix is usually written down.
    #[must_use]
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        let mut m = [0.0; 9];
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                m[col * 3 + row] = *value;
            }
        }
        Self { m }
    }

    /// Element at `row`, `col`
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> f64 {
        self.m[col * 3 + row]
    }

    /// Column-major array
    #[must_use]
    pub const fn to_array(self) -> [f64; 9] {
        self.m
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// 4x4 matrix, column-major
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    /// Column-major lanes: `m[col * 4 + row]`
    pub m: [f64; 16],
}

impl Mat4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Creates from a column-major array
    #[must_use]
    pub const fn from_array(m: [f64; 16]) -> Self {
        Self { m }
    }

    /// Creates from rows, as a matrix is usually written down.
    #[must_use]
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let mut m = [0.0; 16];
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                m[col * 4 + row] = *value;
            }
        }
        Self { m }
    }

    /// Element at `row`, `col`
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> f64 {
        self.m[col * 4 + row]
    }

    /// Translation column
    #[must_use]
    pub const fn translation(&self) -> Vec3 {
        Vec3::new(self.m[12], self.m[13], self.m[14])
    }

    /// Column-major array
    #[must_use]
    pub const fn to_array(self) -> [f64; 16] {
        self.m
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat3> for Mat4 {
    fn from(other: Mat3) -> Self {
        let mut out = Self::IDENTITY;
        for col in 0..3 {
            for row in 0..3 {
                out.m[col * 4 + row] = other.get(row, col);
            }
        }
        out
    }
}

impl From<Mat4> for Mat3 {
    fn from(other: Mat4) -> Self {
        let mut m = [0.0; 9];
        for col in 0..3 {
            for row in 0..3 {
                m[col * 3 + row] = other.get(row, col);
            }
        }
        Self { m }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0); // 1*4 + 2*5 + 3*6
        assert_eq!((b - a) * 2.0, Vec3::new(6.0, 6.0, 6.0));
    }

    #[test]
    fn test_named_constructors_agree() {
        assert_eq!(Vec3::from_array([1.0, 2.0, 3.0]), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            Vec3::from(Vec4::new(1.0, 2.0, 3.0, 4.0)),
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(
            Vec4::from_vec3(Vec3::ONE, 0.5),
            Vec4::new(1.0, 1.0, 1.0, 0.5)
        );
        assert_eq!(Vec3::from(Vec2::new(7.0, 8.0)), Vec3::new(7.0, 8.0, 0.0));
    }

    #[test]
    fn test_matrix_rows_are_stored_column_major() {
        let m = Mat4::from_rows([
            [1.0, 0.0, 0.0, 10.0],
            [0.0, 1.0, 0.0, 20.0],
            [0.0, 0.0, 1.0, 30.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(m.translation(), Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(m.get(0, 3), 10.0);
        assert_eq!(m.m[12], 10.0);
    }

    #[test]
    fn test_mat3_mat4_conversion() {
        let m3 = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let m4 = Mat4::from(m3);
        assert_eq!(m4.get(1, 2), 6.0);
        assert_eq!(m4.get(3, 3), 1.0);
        assert_eq!(Mat3::from(m4), m3);
    }

    #[test]
    fn test_mat4_bytemuck() {
        let m = Mat4::IDENTITY;
        let bytes: &[u8] = bytemuck::bytes_of(&m);
        assert_eq!(bytes.len(), 128); // 16 * 8 bytes
    }
}
