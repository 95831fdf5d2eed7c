//! Scene validation: the explicit-failure half of `spec.md` §7's choice
//! between "silent clamping or an explicit precondition failure". This
//! engine picks the latter — `validate_scene` is a caller-invoked gate run
//! once before `propagate`, in the same spirit as `hyperdrive`'s
//! `thiserror`-backed config validation ahead of its processing pipeline.
//!
//! `propagate` itself stays total: it never calls into this module, and
//! degenerate geometry is still handled as a no-hit by the kernel (§4.1)
//! regardless of whether the caller bothered to validate first.

use thiserror::Error;

use crate::element::{ElementId, Variant};
use crate::geometry::Geometry;
use crate::scene::Scene;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("element {0:?} has degenerate geometry (p1 == p2)")]
    DegenerateGeometry(ElementId),

    #[error("element {0:?} has non-positive refractive index (n1={1}, n2={2})")]
    NonPositiveRefractiveIndex(ElementId, f64, f64),

    #[error("element {0:?} has beamsplitter weight out of [0, 1] (T={1}, R={2})")]
    BeamsplitterWeightOutOfRange(ElementId, f64, f64),

    #[error("source {0} has ray_count == 0")]
    ZeroRayCount(usize),

    #[error("source {0} has negative ray_length ({1})")]
    NegativeRayLength(usize, f64),

    #[error("source {0} has non-positive wavelength ({1})")]
    NonPositiveWavelength(usize, f64),

    #[error("source {0} has a non-finite Jones vector")]
    NonFiniteJonesVector(usize),
}

/// Check every precondition `spec.md` §7 recommends, against the whole
/// scene. Returns the first violation found; elements are checked in
/// insertion order, then sources.
pub fn validate_scene(scene: &Scene) -> Result<(), ValidationError> {
    for element in scene.elements() {
        match &element.geometry {
            Geometry::Flat(seg) => {
                if seg.tangent().is_none() {
                    return Err(ValidationError::DegenerateGeometry(element.id));
                }
            }
            Geometry::Curved(arc) => {
                if arc.center().is_none() {
                    return Err(ValidationError::DegenerateGeometry(element.id));
                }
            }
        }

        match element.variant {
            Variant::Refractive { n1, n2 } => {
                if n1 <= 0.0 || n2 <= 0.0 {
                    return Err(ValidationError::NonPositiveRefractiveIndex(element.id, n1, n2));
                }
            }
            Variant::Beamsplitter { transmission, reflection, .. } => {
                if !(0.0..=1.0).contains(&transmission) || !(0.0..=1.0).contains(&reflection) {
                    return Err(ValidationError::BeamsplitterWeightOutOfRange(element.id, transmission, reflection));
                }
            }
            _ => {}
        }
    }

    for (i, source) in scene.sources().iter().enumerate() {
        if source.ray_count == 0 {
            return Err(ValidationError::ZeroRayCount(i));
        }
        if source.ray_length < 0.0 {
            return Err(ValidationError::NegativeRayLength(i, source.ray_length));
        }
        if source.wavelength <= 0.0 {
            return Err(ValidationError::NonPositiveWavelength(i, source.wavelength));
        }
        let jones = source.polarization_spec.jones();
        if !jones.ex.re.is_finite() || !jones.ex.im.is_finite() || !jones.ey.re.is_finite() || !jones.ey.im.is_finite() {
            return Err(ValidationError::NonFiniteJonesVector(i));
        }
    }

    Ok(())
}
