//! In-flight ray state carried by the propagation driver.

use crate::element::ElementId;
use crate::polarization::Jones;
use crate::space::{Point, Vector};

/// A single in-flight branch of a trace.
#[derive(Debug, Clone)]
pub struct Ray {
    pub position: Point,
    /// Unit direction vector.
    pub direction: Vector,
    /// Remaining length budget (mm); decremented by traversed distance.
    pub remaining_length: f64,
    /// `[0, 1]`.
    pub intensity: f64,
    pub polarization: Jones,
    /// Wavelength, nm.
    pub wavelength: f64,
    /// Carried for rendering only; never read by the physics.
    pub base_rgb: (u8, u8, u8),
    pub events_so_far: u32,
    /// Element most recently interacted with, excluded from the next
    /// nearest-hit scan to suppress self-reintersection.
    pub last_element: Option<ElementId>,
    /// Accumulated positions, starting with the emission point.
    pub path_points: Vec<Point>,
}

impl Ray {
    /// A freshly emitted ray: `intensity = 1`, no prior interactions, and
    /// `path_points` seeded with the emission point, per `spec.md` §4.4.
    pub fn emit(
        position: Point,
        direction: Vector,
        remaining_length: f64,
        polarization: Jones,
        wavelength: f64,
        base_rgb: (u8, u8, u8),
    ) -> Ray {
        Ray {
            position,
            direction,
            remaining_length,
            intensity: 1.0,
            polarization,
            wavelength,
            base_rgb,
            events_so_far: 0,
            last_element: None,
            path_points: vec![position],
        }
    }

    /// Build a child ray that continues from this one's hit point at
    /// `new_direction`, offset by `self_hit_epsilon` to avoid immediately
    /// re-hitting `element`. `distance_traveled` is subtracted from the
    /// remaining-length budget before the offset is applied.
    pub fn spawn_child(
        &self,
        hit_point: Point,
        new_direction: Vector,
        distance_traveled: f64,
        intensity: f64,
        polarization: Jones,
        element: ElementId,
        self_hit_epsilon: f64,
    ) -> Ray {
        let mut path_points = self.path_points.clone();
        path_points.push(hit_point);

        Ray {
            position: hit_point + new_direction * self_hit_epsilon,
            direction: new_direction,
            remaining_length: (self.remaining_length - distance_traveled).max(0.0),
            intensity,
            polarization,
            wavelength: self.wavelength,
            base_rgb: self.base_rgb,
            events_so_far: self.events_so_far + 1,
            last_element: Some(element),
            path_points,
        }
    }
}
