//! Shortcuts for the linear-algebra types used throughout the engine.
//!
//! Unlike the 3D renderer this crate is descended from, every ray, element,
//! and source here lives in the plane, so `Point`/`Vector` are 2D.

use cgmath::{prelude::*, Point2, Vector2};

pub type Point = Point2<f64>;
pub type Vector = Vector2<f64>;

/// Rotate a vector counter-clockwise by `angle_deg` degrees.
#[inline]
pub fn rotate(v: Vector, angle_deg: f64) -> Vector {
    let a = angle_deg.to_radians();
    let (s, c) = a.sin_cos();
    Vector::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Unit vector at the given lab-frame angle (degrees, 0 = +x axis).
#[inline]
pub fn unit_at_angle(angle_deg: f64) -> Vector {
    let a = angle_deg.to_radians();
    let (s, c) = a.sin_cos();
    Vector::new(c, s)
}

/// Left-normal of a (already normalized) tangent vector: `(-t.y, t.x)`.
#[inline]
pub fn left_normal(t: Vector) -> Vector {
    Vector::new(-t.y, t.x)
}

/// Angle of a vector, in degrees, measured from the +x axis.
#[inline]
pub fn angle_of(v: Vector) -> f64 {
    v.y.atan2(v.x).to_degrees()
}

#[inline]
pub fn approx_unit(v: Vector, tol: f64) -> bool {
    (v.magnitude() - 1.0).abs() < tol
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn rotate_90_degrees() {
        let v = Vector::new(1.0, 0.0);
        let r = rotate(v, 90.0);
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn left_normal_of_x_axis_is_y_axis() {
        let n = left_normal(Vector::new(1.0, 0.0));
        assert_abs_diff_eq!(n.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.y, 1.0, epsilon = 1e-12);
    }
}
