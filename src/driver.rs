//! The propagation driver: a single-threaded, stack-based, depth-first
//! traversal of every source ray through the scene's elements.
//!
//! Mirrors `lasgun::render`'s shape — a free function taking an immutable
//! scene reference and returning an owned `Vec` of results — but the
//! traversal itself is LIFO-stack branch-and-bound rather than a
//! per-pixel integrator loop, since a single source ray can split into
//! many polylines.

use cgmath::prelude::*;
use log::{debug, trace};

use crate::budget::Budgets;
use crate::element::ElementId;
use crate::ray::Ray;
use crate::scene::Scene;

/// One finished branch of a trace, ready for the caller to render or
/// otherwise consume.
#[derive(Debug, Clone)]
pub struct TracedPath {
    pub points: Vec<(f64, f64)>,
    pub rgba: (u8, u8, u8, u8),
    pub wavelength_nm: f64,
}

/// Trace every source in `scene` through every element, returning one
/// `TracedPath` per terminated branch. Pure function of its inputs: no
/// shared mutable state, no caching between calls.
pub fn propagate(scene: &Scene, budgets: &Budgets) -> Vec<TracedPath> {
    let mut finished = Vec::new();
    let mut stack: Vec<Ray> = Vec::new();

    for source in scene.sources() {
        stack.extend(source.emit());
    }

    while let Some(ray) = stack.pop() {
        if ray.intensity < budgets.min_intensity {
            trace!("branch finalised: intensity cutoff, events={}", ray.events_so_far);
            finished.push(finalize_in_place(&ray));
            continue;
        }
        if ray.events_so_far >= budgets.max_events {
            trace!("branch finalised: event cap, events={}", ray.events_so_far);
            finished.push(finalize_in_place(&ray));
            continue;
        }
        if ray.remaining_length <= 0.0 {
            trace!("branch finalised: length exhausted, events={}", ray.events_so_far);
            finished.push(finalize_in_place(&ray));
            continue;
        }

        match nearest_hit(scene, &ray, budgets) {
            None => {
                trace!("branch finalised: escape, events={}", ray.events_so_far);
                finished.push(finalize(&ray, ray.direction * ray.remaining_length));
            }
            Some((element_id, t, _hit_point)) if t > ray.remaining_length => {
                trace!("nearest hit beyond remaining length: element={:?} t={}", element_id, t);
                finished.push(finalize(&ray, ray.direction * ray.remaining_length));
            }
            Some((element_id, t, _hit_point)) => {
                trace!("nearest hit: element={:?} t={}", element_id, t);

                let element = scene.element(element_id).expect("nearest_hit only returns valid ids");
                let hit = element
                    .geometry
                    .intersect(ray.position, ray.direction, budgets.geometry_epsilon)
                    .expect("nearest_hit recomputed below from the same geometry");
                let children = element.interact(&ray, &hit, budgets);

                for child in children {
                    stack.push(child);
                }
            }
        }
    }

    debug!(
        "propagate: {} sources, {} elements -> {} paths",
        scene.sources().len(),
        scene.elements().len(),
        finished.len()
    );

    finished
}

/// Resolve the nearest element `ray` intersects, excluding `ray.last_element`
/// to suppress self-reintersection (`spec.md` §4.5). Returns the element id,
/// the ray parameter `t`, and the hit point (as an absolute point, reused by
/// the length-exhaustion path).
fn nearest_hit(scene: &Scene, ray: &Ray, budgets: &Budgets) -> Option<(ElementId, f64, crate::space::Point)> {
    let mut best: Option<(ElementId, f64, crate::space::Point)> = None;

    for element in scene.elements() {
        if Some(element.id) == ray.last_element {
            continue;
        }
        if let Some(hit) = element.geometry.intersect(ray.position, ray.direction, budgets.geometry_epsilon) {
            if best.map_or(true, |(_, best_t, _)| hit.t < best_t) {
                best = Some((element.id, hit.t, hit.point));
            }
        }
    }

    best
}

/// Assemble a finished branch's output for escape / length exhaustion:
/// `travel` is appended as one further point past `ray.position`.
fn finalize(ray: &Ray, travel: crate::space::Vector) -> TracedPath {
    let end = ray.position + travel;
    let mut points: Vec<(f64, f64)> = ray.path_points.iter().map(|p| (p.x, p.y)).collect();
    points.push((end.x, end.y));
    traced_path(ray, points)
}

/// Assemble a finished branch's output for event cap / intensity cutoff:
/// the polyline ends at the last point already recorded, with no further
/// extension (`spec.md` §4.6 items 3-4).
fn finalize_in_place(ray: &Ray) -> TracedPath {
    let points: Vec<(f64, f64)> = ray.path_points.iter().map(|p| (p.x, p.y)).collect();
    traced_path(ray, points)
}

fn traced_path(ray: &Ray, points: Vec<(f64, f64)>) -> TracedPath {
    let alpha = (255.0 * ray.intensity.clamp(0.0, 1.0)).round() as u8;
    let (r, g, b) = ray.base_rgb;
    TracedPath { points, rgba: (r, g, b, alpha), wavelength_nm: ray.wavelength }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::{PassType, Variant};
    use crate::geometry::{Geometry, LineSegment};
    use crate::polarization::PolarizationSpec;
    use crate::source::SourceDescriptor;
    use crate::space::Point;

    fn single_ray_source(position: Point, angle: f64, ray_length: f64, polarization: PolarizationSpec, wavelength: f64) -> SourceDescriptor {
        SourceDescriptor {
            position,
            base_angle: angle,
            aperture_size: 0.0,
            ray_count: 1,
            spread: 0.0,
            ray_length,
            wavelength,
            color: (255, 255, 255),
            polarization_spec: polarization,
        }
    }

    #[test]
    fn empty_scene_one_ray_escapes_straight() {
        let mut scene = Scene::new();
        scene.push_source(single_ray_source(Point::new(0.0, 0.0), 0.0, 100.0, PolarizationSpec::Horizontal, 633.0));

        let paths = propagate(&scene, &Budgets::default());
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].points.len(), 2);
        assert!((paths[0].points[0].0 - 0.0).abs() < 1e-9);
        assert!((paths[0].points[1].0 - 100.0).abs() < 1e-9);
        assert!((paths[0].points[1].1 - 0.0).abs() < 1e-9);
        assert_eq!(paths[0].rgba.3, 255);
    }

    #[test]
    fn mirror_at_45_degrees_sends_ray_upward() {
        let mut scene = Scene::new();
        // A segment through (50,50) tangent along (1,1)/sqrt(2), i.e. lying on x=y,
        // with normal facing -x (toward the source approaching along +x).
        let dir = crate::space::Vector::new(1.0, 1.0).normalize();
        let half = dir * 50.0;
        let center = Point::new(50.0, 50.0);
        scene.push_element(
            Geometry::Flat(LineSegment::new(center - half, center + half)),
            Variant::Mirror { reflectivity: 1.0 },
        );
        scene.push_source(single_ray_source(Point::new(0.0, 50.0), 0.0, 200.0, PolarizationSpec::Horizontal, 633.0));

        let paths = propagate(&scene, &Budgets::default());
        assert_eq!(paths.len(), 1);
        let pts = &paths[0].points;
        let last = pts.len() - 1;
        let out_dir = crate::space::Vector::new(pts[last].0 - pts[last - 1].0, pts[last].1 - pts[last - 1].1).normalize();
        assert!((out_dir.x - 0.0).abs() < 1e-9);
        assert!((out_dir.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn non_polarizing_beamsplitter_produces_two_paths_summing_to_input_alpha() {
        let mut scene = Scene::new();
        scene.push_element(
            Geometry::Flat(LineSegment::new(Point::new(50.0, -20.0), Point::new(50.0, 20.0))),
            Variant::Beamsplitter { transmission: 0.5, reflection: 0.5, is_polarizing: false, transmission_axis_deg: 0.0 },
        );
        scene.push_source(single_ray_source(Point::new(0.0, 0.0), 0.0, 200.0, PolarizationSpec::Horizontal, 633.0));

        let paths = propagate(&scene, &Budgets::default());
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| (p.rgba.3 as i32 - 128).abs() <= 1));
    }

    #[test]
    fn polarizing_beamsplitter_splits_45_degree_input_evenly() {
        let mut scene = Scene::new();
        scene.push_element(
            Geometry::Flat(LineSegment::new(Point::new(50.0, -20.0), Point::new(50.0, 20.0))),
            Variant::Beamsplitter { transmission: 1.0, reflection: 1.0, is_polarizing: true, transmission_axis_deg: 0.0 },
        );
        scene.push_source(single_ray_source(Point::new(0.0, 0.0), 0.0, 200.0, PolarizationSpec::Plus45, 633.0));

        let paths = propagate(&scene, &Budgets::default());
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert!((path.rgba.3 as i32 - 128).abs() <= 1);
        }
    }

    #[test]
    fn longpass_dichroic_conserves_intensity() {
        let mut scene = Scene::new();
        scene.push_element(
            Geometry::Flat(LineSegment::new(Point::new(50.0, -20.0), Point::new(50.0, 20.0))),
            Variant::Dichroic { cutoff_nm: 550.0, transition_width_nm: 50.0, pass_type: PassType::Longpass },
        );
        scene.push_source(single_ray_source(Point::new(0.0, 0.0), 0.0, 200.0, PolarizationSpec::Horizontal, 488.0));

        let paths = propagate(&scene, &Budgets::default());
        assert_eq!(paths.len(), 2);
        let sum: u32 = paths.iter().map(|p| p.rgba.3 as u32).sum();
        assert!(sum <= 256 && sum >= 254);
    }

    #[test]
    fn event_cap_terminates_a_resonant_cavity() {
        let mut scene = Scene::new();
        scene.push_element(
            Geometry::Flat(LineSegment::new(Point::new(50.0, -20.0), Point::new(50.0, 20.0))),
            Variant::Mirror { reflectivity: 1.0 },
        );
        scene.push_element(
            Geometry::Flat(LineSegment::new(Point::new(-50.0, -20.0), Point::new(-50.0, 20.0))),
            Variant::Mirror { reflectivity: 1.0 },
        );
        scene.push_source(single_ray_source(Point::new(0.0, 0.0), 0.0, 1.0e6, PolarizationSpec::Horizontal, 633.0));

        let budgets = Budgets { max_events: 10, ..Budgets::default() };
        let paths = propagate(&scene, &budgets);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn low_min_intensity_branch_terminates_at_the_split_point() {
        // transmission (0.01) falls below the default MIN_INTENSITY (0.02):
        // that branch is finalised immediately at the split point rather
        // than travelling on, but it still produces its own (very dim)
        // polyline, per `spec.md` §4.6 item 4.
        let mut scene = Scene::new();
        scene.push_element(
            Geometry::Flat(LineSegment::new(Point::new(50.0, -20.0), Point::new(50.0, 20.0))),
            Variant::Beamsplitter { transmission: 0.01, reflection: 0.99, is_polarizing: false, transmission_axis_deg: 0.0 },
        );
        scene.push_source(single_ray_source(Point::new(0.0, 0.0), 0.0, 200.0, PolarizationSpec::Horizontal, 633.0));

        let budgets = Budgets::default();
        let paths = propagate(&scene, &budgets);
        assert_eq!(paths.len(), 2);

        let strong = paths.iter().max_by_key(|p| p.rgba.3).unwrap();
        let weak = paths.iter().min_by_key(|p| p.rgba.3).unwrap();
        assert!(strong.rgba.3 > 200);
        assert!(weak.rgba.3 <= 5);
        // the weak branch never reaches past the split point: source + hit, nothing more
        assert_eq!(weak.points.len(), 2);
    }
}
