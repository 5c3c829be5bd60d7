// Math utilities and helper functions

use glam::{Vec2, Vec3};

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Vector helpers shared by the 2D and 3D vector types.
///
/// glam already covers the arithmetic (add, sub, scalar mul/div, dot, cross,
/// length, `normalize_or_zero`). This adds the few queries the physics code
/// leans on that glam either lacks or spells differently.
pub trait VectorExt: Copy {
    /// Unit vector in the same direction, or the zero vector when the length is zero
    fn normalized(self) -> Self;

    /// Angle between two vectors in degrees
    ///
    /// The cosine is clamped to [-1, 1] so rounding never produces NaN.
    /// Either vector being zero-length yields 0.
    fn angle_degrees(self, other: Self) -> f32;

    /// Reflect a direction about a surface normal: `d - n * (2 * dot(d, n))`
    fn reflect_about(self, normal: Self) -> Self;

    /// Euclidean distance to another point
    fn distance_to(self, other: Self) -> f32;
}

macro_rules! impl_vector_ext {
    ($ty:ty) => {
        impl VectorExt for $ty {
            #[inline]
            fn normalized(self) -> Self {
                let len = self.length();
                if len > 0.0 {
                    self / len
                } else {
                    <$ty>::ZERO
                }
            }

            fn angle_degrees(self, other: Self) -> f32 {
                let denom = self.length() * other.length();
                if denom == 0.0 {
                    return 0.0;
                }
                let cos = clamp(self.dot(other) / denom, -1.0, 1.0);
                cos.acos().to_degrees()
            }

            #[inline]
            fn reflect_about(self, normal: Self) -> Self {
                self - normal * (2.0 * self.dot(normal))
            }

            #[inline]
            fn distance_to(self, other: Self) -> f32 {
                (other - self).length()
            }
        }
    };
}

impl_vector_ext!(Vec2);
impl_vector_ext!(Vec3);

/// Closest point inside an axis-aligned box to `point`
#[inline]
pub fn clamp_to_box(point: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    Vec3::new(
        clamp(point.x, min.x, max.x),
        clamp(point.y, min.y, max.y),
        clamp(point.z, min.z, max.z),
    )
}
