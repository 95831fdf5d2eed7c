//! Jones-vector polarization algebra: basis construction, rotation into an
//! element's local frame, and the Fresnel amplitude coefficients used by the
//! refractive interface.
//!
//! The Jones vector is carried **unnormalized**: `Ray::intensity` is the
//! authoritative energy budget, and every transform here keeps
//! `‖Jones‖² == intensity` (to within `1e-12`) rather than folding
//! normalization into the vector itself. This is one of the two conventions
//! `spec.md` §9 allows; it is the one chosen here because it keeps the
//! radiometric quantity (`intensity`, used by the driver's budget check) and
//! the polarization *shape* (`Jones`) as separate concerns, the same split
//! `lasgun` makes between a `Color` and the `Fresnel`/`BxDF` that scale it.

use num_complex::Complex64;

/// A 2-component complex amplitude in the lab frame's `(x, y)` basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jones {
    pub ex: Complex64,
    pub ey: Complex64,
}

impl Jones {
    pub fn new(ex: Complex64, ey: Complex64) -> Jones {
        Jones { ex, ey }
    }

    pub fn horizontal() -> Jones {
        Jones::new(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0))
    }

    pub fn vertical() -> Jones {
        Jones::new(Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0))
    }

    pub fn diagonal_plus_45() -> Jones {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        Jones::new(Complex64::new(s, 0.0), Complex64::new(s, 0.0))
    }

    pub fn diagonal_minus_45() -> Jones {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        Jones::new(Complex64::new(s, 0.0), Complex64::new(-s, 0.0))
    }

    pub fn circular_right() -> Jones {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        Jones::new(Complex64::new(s, 0.0), Complex64::new(0.0, s))
    }

    pub fn circular_left() -> Jones {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        Jones::new(Complex64::new(s, 0.0), Complex64::new(0.0, -s))
    }

    pub fn linear(angle_deg: f64) -> Jones {
        let a = angle_deg.to_radians();
        Jones::new(Complex64::new(a.cos(), 0.0), Complex64::new(a.sin(), 0.0))
    }

    /// `‖Jones‖²`; with the unnormalized convention this equals `intensity`
    /// for a ray whose Jones vector has not been independently rescaled.
    pub fn norm_squared(&self) -> f64 {
        self.ex.norm_sqr() + self.ey.norm_sqr()
    }

    /// Rescale so `norm_squared() == target`. No-op on a zero vector.
    pub fn scaled_to(&self, target: f64) -> Jones {
        let current = self.norm_squared();
        if current < 1e-300 {
            return *self;
        }
        let factor = (target / current).sqrt();
        Jones::new(self.ex * factor, self.ey * factor)
    }

    /// Rotate the Jones vector by `angle_deg` counter-clockwise: project the
    /// lab-frame vector into a frame rotated by `angle_deg`.
    pub fn rotate(&self, angle_deg: f64) -> Jones {
        let a = angle_deg.to_radians();
        let (s, c) = a.sin_cos();
        Jones::new(
            self.ex * c + self.ey * s,
            -self.ex * s + self.ey * c,
        )
    }
}

/// Enumerated source polarization spec, per `spec.md` §6.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolarizationSpec {
    Horizontal,
    Vertical,
    Plus45,
    Minus45,
    CircularRight,
    CircularLeft,
    Linear(f64),
    Custom(Complex64, Complex64),
}

impl PolarizationSpec {
    /// Resolve to a unit-intensity Jones vector (`custom` is normalized on
    /// entry, per `spec.md` §6).
    pub fn jones(&self) -> Jones {
        match *self {
            PolarizationSpec::Horizontal => Jones::horizontal(),
            PolarizationSpec::Vertical => Jones::vertical(),
            PolarizationSpec::Plus45 => Jones::diagonal_plus_45(),
            PolarizationSpec::Minus45 => Jones::diagonal_minus_45(),
            PolarizationSpec::CircularRight => Jones::circular_right(),
            PolarizationSpec::CircularLeft => Jones::circular_left(),
            PolarizationSpec::Linear(theta) => Jones::linear(theta),
            PolarizationSpec::Custom(ex, ey) => {
                let j = Jones::new(ex, ey);
                j.scaled_to(1.0)
            }
        }
    }
}

/// Fresnel amplitude coefficients at a dielectric interface, for both s
/// (perpendicular to the plane of incidence) and p (in-plane) polarization.
///
/// Follows the standard Fresnel equations (see the GLOSSARY), not
/// `lasgun::core::bxdf::fresnel::dielectric`'s unpolarized reflectance
/// formula (which only needs a scalar, and — being unpolarized — is the
/// wrong starting point for a Jones-vector engine: it conflates r_s and r_p
/// into a single averaged reflectance).
#[derive(Debug, Clone, Copy)]
pub struct FresnelCoefficients {
    pub r_s: f64,
    pub r_p: f64,
    pub t_s: f64,
    pub t_p: f64,
    /// `Some(cos_theta_t)` unless the interface is beyond the critical angle.
    pub cos_theta_t: Option<f64>,
}

/// Computes Fresnel amplitude coefficients given the cosine of the angle of
/// incidence (positive, already `abs`-ed by the caller) and the two
/// refractive indices. Returns `cos_theta_t = None` under total internal
/// reflection, matching `spec.md` §4.2's TIR rule: `n1 sin(theta_i) > n2`.
pub fn fresnel(cos_theta_i: f64, n1: f64, n2: f64) -> FresnelCoefficients {
    let cos_theta_i = cos_theta_i.clamp(0.0, 1.0);
    let sin_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0).sqrt();
    let sin_theta_t = n1 / n2 * sin_theta_i;

    if sin_theta_t >= 1.0 {
        return FresnelCoefficients { r_s: 1.0, r_p: 1.0, t_s: 0.0, t_p: 0.0, cos_theta_t: None };
    }

    let cos_theta_t = (1.0 - sin_theta_t * sin_theta_t).max(0.0).sqrt();

    let r_s = (n1 * cos_theta_i - n2 * cos_theta_t) / (n1 * cos_theta_i + n2 * cos_theta_t);
    let r_p = (n2 * cos_theta_i - n1 * cos_theta_t) / (n2 * cos_theta_i + n1 * cos_theta_t);
    let t_s = (2.0 * n1 * cos_theta_i) / (n1 * cos_theta_i + n2 * cos_theta_t);
    let t_p = (2.0 * n1 * cos_theta_i) / (n2 * cos_theta_i + n1 * cos_theta_t);

    FresnelCoefficients { r_s, r_p, t_s, t_p, cos_theta_t: Some(cos_theta_t) }
}
