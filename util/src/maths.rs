//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle into the range (-pi, pi].
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float + FloatConst
{
    let pi = T::PI();
    let tau = pi + pi;

    let wrapped = rem_euclid(angle + pi, tau) - pi;

    // rem_euclid lands on -pi for odd multiples of pi, which belongs to the
    // other end of the range.
    if wrapped <= -pi {
        wrapped + tau
    }
    else if wrapped > pi {
        wrapped - tau
    }
    else {
        wrapped
    }
}

/// sin(x)/x, using the Taylor expansion close to zero.
pub fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-9 {
        1.0 - x * x / 6.0
    }
    else {
        x.sin() / x
    }
}

/// Sign of a value, returning zero for zero (unlike `f64::signum`).
pub fn sign<T>(value: T) -> T
where
    T: Float
{
    if value > T::zero() {
        T::one()
    }
    else if value < T::zero() {
        -T::one()
    }
    else {
        T::zero()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0.0, 1.0), (-1.0, 1.0), 0.5), 0.0);
        assert_eq!(lin_map((-2.0, 2.0), (-1.0, 1.0), 2.0), 1.0);
    }

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0.5f64) - 0.5).abs() < 1e-12);
        assert!((wrap_pi(PI) - PI).abs() < 1e-12);
        assert!((wrap_pi(-PI) - PI).abs() < 1e-12);
        assert!((wrap_pi(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
        assert!((wrap_pi(-1.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert!((wrap_pi(7.0) - (7.0 - 2.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn test_sinc() {
        assert_eq!(sinc(0f64), 1.0);
        assert!((sinc(1e-12f64) - 1.0).abs() < 1e-12);
        assert!((sinc(PI / 2.0) - 2.0 / PI).abs() < 1e-12);
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(0.0f64), 0.0);
        assert_eq!(sign(-0.0f64), 0.0);
        assert_eq!(sign(3.2f64), 1.0);
        assert_eq!(sign(-0.1f64), -1.0);
    }
}
