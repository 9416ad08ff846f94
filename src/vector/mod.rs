mod point;
mod point2d;
mod quaternion;
mod transform;

pub use point::Point;
pub use point2d::Point2D;
pub use quaternion::Quaternion;
pub use transform::AffineTransform;

/// `2^-538`, the largest power of two whose square underflows to zero.
///
/// The smallest positive subnormal `f64` is `2^-1074`; squaring `2^-538` gives
/// `2^-1076`, which rounds to zero, while `2^-537` squares to `2^-1074`.
pub const ROOT_ZERO: f64 = f64::from_bits(485u64 << 52);

/// `2^512`, the smallest power of two whose square overflows to infinity.
///
/// `f64::MAX` is just below `2^1024`, while `2^511` squares to `2^1022`.
pub const ROOT_INFINITY: f64 = f64::from_bits(1535u64 << 52);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_constants_bracket_the_range() {
        assert_eq!(ROOT_ZERO, 2f64.powi(-538));
        assert_eq!(ROOT_ZERO * ROOT_ZERO, 0.0);
        assert!((ROOT_ZERO * 2.0) * (ROOT_ZERO * 2.0) > 0.0);

        assert_eq!(ROOT_INFINITY, 2f64.powi(512));
        assert_eq!(ROOT_INFINITY * ROOT_INFINITY, f64::INFINITY);
        assert!((ROOT_INFINITY / 2.0) * (ROOT_INFINITY / 2.0) < f64::INFINITY);
    }
}
