//! Source descriptors and fan emission.

use crate::polarization::PolarizationSpec;
use crate::ray::Ray;
use crate::space::{left_normal, unit_at_angle, Point};

/// Emission configuration for a single source, per `spec.md` §3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceDescriptor {
    pub position: Point,
    /// Lab-frame degrees.
    pub base_angle: f64,
    /// Width of the emitting aperture, mm.
    pub aperture_size: f64,
    pub ray_count: u32,
    /// Half-angle of the fan, degrees.
    pub spread: f64,
    pub ray_length: f64,
    pub wavelength: f64,
    pub color: (u8, u8, u8),
    pub polarization_spec: PolarizationSpec,
}

impl SourceDescriptor {
    /// Produce this source's `ray_count` initial rays, per `spec.md` §4.4.
    ///
    /// `ray_count == 0` is a caller precondition violation (`validate_scene`
    /// rejects it); defensively this just emits nothing rather than divide
    /// by zero.
    pub fn emit(&self) -> Vec<Ray> {
        if self.ray_count == 0 {
            return Vec::new();
        }

        let axis = unit_at_angle(self.base_angle);
        let aperture_normal = left_normal(axis);
        let polarization = self.polarization_spec.jones();

        let offsets = evenly_spaced(self.ray_count, -self.aperture_size / 2.0, self.aperture_size / 2.0);
        let angles = evenly_spaced(self.ray_count, self.base_angle - self.spread, self.base_angle + self.spread);

        (0..self.ray_count)
            .map(|i| {
                let position = if self.ray_count == 1 || self.aperture_size == 0.0 {
                    self.position
                } else {
                    self.position + aperture_normal * offsets[i as usize]
                };
                let angle = if self.ray_count == 1 || self.spread == 0.0 {
                    self.base_angle
                } else {
                    angles[i as usize]
                };
                let direction = unit_at_angle(angle);

                Ray::emit(position, direction, self.ray_length, polarization, self.wavelength, self.color)
            })
            .collect()
    }
}

/// `count` values evenly spaced across `[lo, hi]`; a single value collapses
/// to `lo` (callers only reach this branch when `count == 1`, where `lo ==
/// hi` by construction).
fn evenly_spaced(count: u32, lo: f64, hi: f64) -> Vec<f64> {
    if count <= 1 {
        return vec![lo];
    }
    let step = (hi - lo) / (count as f64 - 1.0);
    (0..count).map(|i| lo + step * i as f64).collect()
}
