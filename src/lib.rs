//! A 2D geometric ray-optics propagation engine.
//!
//! Given a `Scene` of optical elements and sources, `propagate` traces every
//! source ray through the scene and returns the finished polylines, each
//! carrying the colour and alpha its surviving intensity implies. The engine
//! is a pure function of its inputs: single-threaded, synchronous, with no
//! persistent state between calls.

pub(crate) mod core;

pub mod budget;
pub mod element;
pub mod error;
pub mod geometry;
pub mod polarization;
pub mod ray;
pub mod scene;
pub mod source;
pub mod space;

mod driver;

pub use crate::budget::Budgets;
pub use crate::driver::{propagate, TracedPath};
pub use crate::element::{Element, ElementId, PassType, Variant};
pub use crate::error::{validate_scene, ValidationError};
pub use crate::geometry::{CurvedSegment, Geometry, GeometryHit, LineSegment};
pub use crate::polarization::{FresnelCoefficients, Jones, PolarizationSpec};
pub use crate::ray::Ray;
pub use crate::scene::Scene;
pub use crate::source::SourceDescriptor;
