//! The geometric intersection kernel: ray-segment and ray-arc intersection,
//! with the normal/tangent frame convention shared by every element variant.
//!
//! The kernel is total: degenerate geometry (zero-length segments, radii too
//! small for their chord, parallel or tangent rays) is rejected as a no-hit
//! rather than surfaced as an error, matching `lasgun::core::math::quad_roots`'s
//! "return zero roots" treatment of degenerate quadratics.

use cgmath::prelude::*;
use crate::space::{left_normal, Point, Vector};

/// A finite flat optical interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p1: Point,
    pub p2: Point,
}

impl LineSegment {
    pub fn new(p1: Point, p2: Point) -> LineSegment {
        LineSegment { p1, p2 }
    }

    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).magnitude()
    }

    pub fn midpoint(&self) -> Point {
        self.p1 + (self.p2 - self.p1) * 0.5
    }

    /// Unit tangent from `p1` towards `p2`. `None` if the segment is
    /// degenerate.
    pub fn tangent(&self) -> Option<Vector> {
        let v = self.p2 - self.p1;
        let len = v.magnitude();
        if len < 1e-9 {
            None
        } else {
            Some(v / len)
        }
    }
}

/// A circular arc through `p1` and `p2`. The sign of `radius` selects one of
/// the two arcs joining the endpoints: positive puts the centre on the left
/// of the `p1 -> p2` chord, negative on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvedSegment {
    pub p1: Point,
    pub p2: Point,
    pub radius: f64,
}

impl CurvedSegment {
    pub fn new(p1: Point, p2: Point, radius: f64) -> CurvedSegment {
        CurvedSegment { p1, p2, radius }
    }

    pub fn chord_length(&self) -> f64 {
        (self.p2 - self.p1).magnitude()
    }

    /// Sagitta: perpendicular offset of the chord midpoint from the arc.
    pub fn sagitta(&self) -> f64 {
        let r = self.radius.abs();
        let half_chord = self.chord_length() / 2.0;
        if half_chord > r {
            return 0.0;
        }
        r - (r * r - half_chord * half_chord).sqrt()
    }

    /// Centre of curvature, or `None` if the radius is too small for the
    /// chord (degenerate geometry).
    pub fn center(&self) -> Option<Point> {
        let chord = self.p2 - self.p1;
        let chord_len = chord.magnitude();
        if chord_len < 1e-9 {
            return None;
        }
        let half_chord = chord_len / 2.0;
        let r = self.radius.abs();
        if r < half_chord {
            return None;
        }
        let mid = self.midpoint();
        let perp = left_normal(chord / chord_len);
        let d = (r * r - half_chord * half_chord).sqrt();
        Some(if self.radius > 0.0 { mid + perp * d } else { mid - perp * d })
    }

    pub fn midpoint(&self) -> Point {
        self.p1 + (self.p2 - self.p1) * 0.5
    }

    /// Outward normal at a point already known to lie on the arc, following
    /// the same left/right sign convention `LineSegment`'s normal uses.
    fn normal_at(&self, center: Point, point: Point) -> Vector {
        let radial = (point - center) / self.radius.abs();
        if self.radius > 0.0 {
            radial
        } else {
            -radial
        }
    }

    /// Whether `point` lies within the shorter angular span from `p1` to
    /// `p2` around `center` (the span this arc actually draws).
    fn on_span(&self, center: Point, point: Point) -> bool {
        let v1 = self.p1 - center;
        let v2 = self.p2 - center;
        let vp = point - center;

        let full = v1.angle(v2).0;
        let to_point = v1.angle(vp).0;

        // `cgmath::Angle::angle` returns the unsigned angle between vectors
        // (in [0, pi]); a point is on the minor arc p1->p2 iff its angle from
        // p1 does not exceed the endpoint-to-endpoint angle, on either side.
        to_point <= full + 1e-9
    }
}

/// Geometric description of either kind of element interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Flat(LineSegment),
    Curved(CurvedSegment),
}

impl Geometry {
    pub fn intersect(&self, p: Point, v: Vector, geometry_epsilon: f64) -> Option<GeometryHit> {
        match self {
            Geometry::Flat(seg) => intersect_segment(seg, p, v, geometry_epsilon),
            Geometry::Curved(arc) => intersect_arc(arc, p, v, geometry_epsilon),
        }
    }
}

/// Local frame and hit parameters returned by the kernel.
#[derive(Debug, Clone, Copy)]
pub struct GeometryHit {
    /// Ray parameter `t` such that `hit_point = p + t * v`, with `v` unit.
    pub t: f64,
    pub point: Point,
    /// Tangent at the hit point, oriented so that `(tangent, normal)` stays
    /// right-handed with `normal` chosen to satisfy `dot(v, normal) < 0`.
    pub tangent: Vector,
    /// Incoming-face normal: flipped (together with `tangent`) so that
    /// `dot(v, normal) < 0`, per invariant 4 in the data model.
    pub normal: Vector,
    /// Whether the raw (geometry-derived) normal had to be flipped to satisfy
    /// `dot(v, normal) < 0`. Used by the refractive interaction to decide
    /// which side of the interface (`n1` or `n2`) the ray is arriving from,
    /// since `normal` itself always faces the incoming ray and so cannot
    /// carry that information on its own.
    pub flipped: bool,
}

fn orient(v: Vector, tangent: Vector, normal: Vector) -> (Vector, Vector, bool) {
    if v.dot(normal) < 0.0 {
        (tangent, normal, false)
    } else {
        (-tangent, -normal, true)
    }
}

/// Mirror-reflect `v` about a surface with normal `n`.
#[inline]
pub fn reflect(v: Vector, n: Vector) -> Vector {
    v - n * (2.0 * v.dot(n))
}

/// Step-by-step segment intersection, per the geometry kernel algorithm.
fn intersect_segment(seg: &LineSegment, p: Point, v: Vector, eps: f64) -> Option<GeometryHit> {
    let t_hat = seg.tangent()?; // reject L < 1e-9
    let l = seg.length();
    let n_hat = left_normal(t_hat);
    let c = seg.midpoint();

    let denom = v.dot(n_hat);
    if denom.abs() < eps {
        return None; // ray parallel to segment
    }

    let t = (c - p).dot(n_hat) / denom;
    if t <= eps {
        return None; // behind or on the origin
    }

    let x = p + v * t;
    let s = (x - c).dot(t_hat);
    if s.abs() > l / 2.0 + 1e-7 {
        return None; // outside the finite segment
    }

    let (tangent, normal, flipped) = orient(v, t_hat, n_hat);
    Some(GeometryHit { t, point: x, tangent, normal, flipped })
}

/// Arc intersection: solve the quadratic for the ray/circle intersection,
/// then verify the candidate root lands within the arc's angular span.
fn intersect_arc(arc: &CurvedSegment, p: Point, v: Vector, eps: f64) -> Option<GeometryHit> {
    let center = arc.center()?;
    let r = arc.radius.abs();
    let m = p - center;

    let a = v.dot(v); // 1.0 since v is unit, kept explicit for clarity
    let b = 2.0 * v.dot(m);
    let c = m.dot(m) - r * r;

    let (roots, n) = crate::core::math::quad_roots(a, b, c);
    if n == 0 {
        return None;
    }

    let mut candidates: Vec<f64> = roots[..n as usize]
        .iter()
        .copied()
        .filter(|t| *t > eps)
        .collect();
    candidates.sort_by(|a, b| a.partial_cmp(b).unwrap());

    for t in candidates {
        let x = p + v * t;
        if arc.on_span(center, x) {
            let normal = arc.normal_at(center, x);
            let tangent = left_normal(normal); // 90 deg rotation of the normal
            let (tangent, normal, flipped) = orient(v, tangent, normal);
            return Some(GeometryHit { t, point: x, tangent, normal, flipped });
        }
    }
    None
}
