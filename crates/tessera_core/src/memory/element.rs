//! # Element Encoding
//!
//! How one accessor element is laid out in bytes: its composition (how many
//! lanes), its numeric kind (how wide each lane is), and its byte order.
//!
//! Lanes are carried as `f64` on the way in and out. Every supported kind
//! (up to 32-bit integers, `f32`, `f64`) converts to `f64` without loss.

use bytemuck::Pod;

/// Shape of one accessor element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Composition {
    /// One lane.
    Scalar,
    /// Two lanes.
    Vec2,
    /// Three lanes.
    Vec3,
    /// Four lanes.
    Vec4,
    /// Nine lanes, column-major.
    Mat3,
    /// Sixteen lanes, column-major.
    Mat4,
}

impl Composition {
    /// Number of numeric lanes in one element.
    #[inline]
    #[must_use]
    pub const fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// Numeric type of every lane of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl ElementKind {
    /// Size of one lane in bytes.
    #[inline]
    #[must_use]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

/// Byte order used when reading and writing lanes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Least significant byte first. GPU upload order.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// Size of one element of `composition` with lanes of `kind`.
#[inline]
#[must_use]
pub const fn element_size_in_bytes(composition: Composition, kind: ElementKind) -> usize {
    composition.component_count() * kind.size_in_bytes()
}

/// Rust numeric types an accessor region can be viewed as directly.
pub trait Element: Pod {
    /// The element kind this type corresponds to.
    const KIND: ElementKind;
}

macro_rules! impl_element {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl Element for $ty {
            const KIND: ElementKind = ElementKind::$kind;
        })*
    };
}

impl_element! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    f32 => F32,
    f64 => F64,
}

macro_rules! read_as {
    ($ty:ty, $bytes:expr, $endianness:expr) => {{
        let mut raw = [0u8; std::mem::size_of::<$ty>()];
        raw.copy_from_slice($bytes);
        match $endianness {
            Endianness::Little => <$ty>::from_le_bytes(raw),
            Endianness::Big => <$ty>::from_be_bytes(raw),
        }
    }};
}

macro_rules! write_as {
    ($ty:ty, $value:expr, $bytes:expr, $endianness:expr) => {{
        let value = $value as $ty;
        let raw = match $endianness {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        $bytes.copy_from_slice(&raw);
    }};
}

/// Reads one lane. `bytes` is exactly `kind.size_in_bytes()` long.
fn read_lane(kind: ElementKind, bytes: &[u8], endianness: Endianness) -> f64 {
    match kind {
        ElementKind::I8 => f64::from(read_as!(i8, bytes, endianness)),
        ElementKind::U8 => f64::from(read_as!(u8, bytes, endianness)),
        ElementKind::I16 => f64::from(read_as!(i16, bytes, endianness)),
        ElementKind::U16 => f64::from(read_as!(u16, bytes, endianness)),
        ElementKind::I32 => f64::from(read_as!(i32, bytes, endianness)),
        ElementKind::U32 => f64::from(read_as!(u32, bytes, endianness)),
        ElementKind::F32 => f64::from(read_as!(f32, bytes, endianness)),
        ElementKind::F64 => read_as!(f64, bytes, endianness),
    }
}

/// Writes one lane. Integer kinds saturate; `f32` rounds to nearest.
fn write_lane(kind: ElementKind, value: f64, bytes: &mut [u8], endianness: Endianness) {
    match kind {
        ElementKind::I8 => write_as!(i8, value, bytes, endianness),
        ElementKind::U8 => write_as!(u8, value, bytes, endianness),
        ElementKind::I16 => write_as!(i16, value, bytes, endianness),
        ElementKind::U16 => write_as!(u16, value, bytes, endianness),
        ElementKind::I32 => write_as!(i32, value, bytes, endianness),
        ElementKind::U32 => write_as!(u32, value, bytes, endianness),
        ElementKind::F32 => write_as!(f32, value, bytes, endianness),
        ElementKind::F64 => write_as!(f64, value, bytes, endianness),
    }
}

/// Decodes the first `N` lanes of an element.
///
/// `element` holds the whole element (`composition.component_count()` lanes).
/// Lanes past the element's composition read as zero.
pub(crate) fn read_lanes<const N: usize>(
    element: &[u8],
    composition: Composition,
    kind: ElementKind,
    endianness: Endianness,
) -> [f64; N] {
    let lane_size = kind.size_in_bytes();
    let mut out = [0.0; N];
    let lanes = N.min(composition.component_count());
    for (lane, chunk) in element.chunks_exact(lane_size).take(lanes).enumerate() {
        out[lane] = read_lane(kind, chunk, endianness);
    }
    out
}

/// Encodes `values` into the leading lanes of an element.
///
/// Values past the element's composition are dropped.
pub(crate) fn write_lanes(
    element: &mut [u8],
    values: &[f64],
    composition: Composition,
    kind: ElementKind,
    endianness: Endianness,
) {
    let lane_size = kind.size_in_bytes();
    let lanes = values.len().min(composition.component_count());
    for (chunk, value) in element
        .chunks_exact_mut(lane_size)
        .take(lanes)
        .zip(values.iter())
    {
        write_lane(kind, *value, chunk, endianness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(element_size_in_bytes(Composition::Vec3, ElementKind::F32), 12);
        assert_eq!(element_size_in_bytes(Composition::Mat4, ElementKind::F32), 64);
        assert_eq!(element_size_in_bytes(Composition::Mat3, ElementKind::F64), 72);
        assert_eq!(element_size_in_bytes(Composition::Scalar, ElementKind::U8), 1);
    }

    #[test]
    fn test_lane_encoding_respects_endianness() {
        let mut bytes = [0u8; 4];
        write_lanes(
            &mut bytes,
            &[1.0],
            Composition::Scalar,
            ElementKind::U32,
            Endianness::Big,
        );
        assert_eq!(bytes, [0, 0, 0, 1]);

        write_lanes(
            &mut bytes,
            &[1.0],
            Composition::Scalar,
            ElementKind::U32,
            Endianness::Little,
        );
        assert_eq!(bytes, [1, 0, 0, 0]);
    }

    #[test]
    fn test_integer_lanes_saturate() {
        let mut bytes = [0u8; 2];
        write_lanes(
            &mut bytes,
            &[300.0, -5.0],
            Composition::Vec2,
            ElementKind::U8,
            Endianness::Little,
        );
        assert_eq!(bytes, [255, 0]);

        let lanes: [f64; 2] =
            read_lanes(&bytes, Composition::Vec2, ElementKind::U8, Endianness::Little);
        assert_eq!(lanes, [255.0, 0.0]);
    }

    #[test]
    fn test_lanes_beyond_composition_read_zero() {
        let mut bytes = [0u8; 8];
        write_lanes(
            &mut bytes,
            &[-1.5, 2.5, 99.0],
            Composition::Vec2,
            ElementKind::F32,
            Endianness::Little,
        );
        let lanes: [f64; 4] =
            read_lanes(&bytes, Composition::Vec2, ElementKind::F32, Endianness::Little);
        assert_eq!(lanes, [-1.5, 2.5, 0.0, 0.0]);
    }
}
