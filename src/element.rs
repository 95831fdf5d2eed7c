//! The closed set of optical element variants and their `interact` laws.
//!
//! Dispatch is an exhaustive match over `Variant`, never a string type code
//! or a trait object — "adding a new element type is a single place to
//! edit" (`spec.md` §9). This mirrors how `lasgun::core::bxdf::BxDF` is a
//! closed enum dispatched by `match` rather than a `dyn` trait.

use cgmath::prelude::*;
use num_complex::Complex64;

use crate::budget::Budgets;
use crate::geometry::{reflect, Geometry, GeometryHit};
use crate::polarization::{fresnel, Jones};
use crate::ray::Ray;
use crate::space::angle_of;

/// Stable identity for an element within one `propagate` call, assigned by
/// insertion order into the scene's element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassType {
    Longpass,
    Shortpass,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    Mirror { reflectivity: f64 },
    ThinLens { focal_length_mm: f64 },
    Refractive { n1: f64, n2: f64 },
    Beamsplitter { transmission: f64, reflection: f64, is_polarizing: bool, transmission_axis_deg: f64 },
    Waveplate { phase_shift_deg: f64, fast_axis_deg: f64 },
    Dichroic { cutoff_nm: f64, transition_width_nm: f64, pass_type: PassType },
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub geometry: Geometry,
    pub variant: Variant,
    pub name: String,
}

impl Element {
    pub fn new(id: ElementId, geometry: Geometry, variant: Variant) -> Element {
        Element { id, geometry, variant, name: String::new() }
    }

    pub fn named(mut self, name: impl Into<String>) -> Element {
        self.name = name.into();
        self
    }

    /// Resolve the outgoing rays produced by `ray_in` hitting this element at
    /// `hit`. Every outgoing ray has its origin offset by
    /// `budgets.self_hit_epsilon`, `events_so_far` incremented, and
    /// `last_element` set to this element's id, per `spec.md` §4.3.
    ///
    /// Splitting variants (`Refractive`, `Beamsplitter`, `Dichroic`) push the
    /// transmitted/refracted child before the reflected child, fixing the
    /// traversal order the driver's LIFO stack exposes (reflected branches
    /// are explored first, since they are popped first).
    pub fn interact(&self, ray_in: &Ray, hit: &GeometryHit, budgets: &Budgets) -> Vec<Ray> {
        match self.variant {
            Variant::Mirror { reflectivity } => self.interact_mirror(ray_in, hit, reflectivity, budgets),
            Variant::ThinLens { focal_length_mm } => self.interact_lens(ray_in, hit, focal_length_mm, budgets),
            Variant::Refractive { n1, n2 } => self.interact_refractive(ray_in, hit, n1, n2, budgets),
            Variant::Beamsplitter { transmission, reflection, is_polarizing, transmission_axis_deg } =>
                self.interact_beamsplitter(ray_in, hit, transmission, reflection, is_polarizing, transmission_axis_deg, budgets),
            Variant::Waveplate { phase_shift_deg, fast_axis_deg } =>
                self.interact_waveplate(ray_in, hit, phase_shift_deg, fast_axis_deg, budgets),
            Variant::Dichroic { cutoff_nm, transition_width_nm, pass_type } =>
                self.interact_dichroic(ray_in, hit, cutoff_nm, transition_width_nm, pass_type, budgets),
        }
    }

    fn interact_mirror(&self, ray_in: &Ray, hit: &GeometryHit, reflectivity: f64, budgets: &Budgets) -> Vec<Ray> {
        let direction = reflect(ray_in.direction, hit.normal);
        // Idealised reflector: no phase imposed between s and p (see
        // SPEC_FULL.md §4.2); a uniform amplitude scale commutes with any
        // basis choice, so no local-frame rotation is needed.
        let scale = reflectivity.max(0.0).sqrt();
        let polarization = Jones::new(ray_in.polarization.ex * scale, ray_in.polarization.ey * scale);
        let intensity = ray_in.intensity * reflectivity;

        vec![ray_in.spawn_child(hit.point, direction, hit.t, intensity, polarization, self.id, budgets.self_hit_epsilon)]
    }

    fn interact_lens(&self, ray_in: &Ray, hit: &GeometryHit, focal_length_mm: f64, budgets: &Budgets) -> Vec<Ray> {
        let center = match self.geometry {
            Geometry::Flat(seg) => seg.midpoint(),
            Geometry::Curved(arc) => arc.midpoint(),
        };
        let y = (hit.point - center).dot(hit.tangent);
        let delta_rad = -y / focal_length_mm;
        let direction = crate::space::rotate(ray_in.direction, delta_rad.to_degrees());

        // Polarization passes through a thin lens unchanged.
        vec![ray_in.spawn_child(hit.point, direction, hit.t, ray_in.intensity, ray_in.polarization, self.id, budgets.self_hit_epsilon)]
    }

    fn interact_refractive(&self, ray_in: &Ray, hit: &GeometryHit, n1: f64, n2: f64, budgets: &Budgets) -> Vec<Ray> {
        let (eta_i, eta_t) = if hit.flipped { (n2, n1) } else { (n1, n2) };
        let cos_theta_i = -ray_in.direction.dot(hit.normal);
        let f = fresnel(cos_theta_i, eta_i, eta_t);

        let alpha = angle_of(hit.tangent);
        let local = ray_in.polarization.rotate(alpha);
        let i_s = local.ex.norm_sqr();
        let i_p = local.ey.norm_sqr();

        let reflected_local = Jones::new(local.ex * f.r_s, local.ey * f.r_p);
        let reflected = reflected_local.rotate(-alpha);
        let i_reflected = f.r_s * f.r_s * i_s + f.r_p * f.r_p * i_p;
        let reflected_dir = reflect(ray_in.direction, hit.normal);

        let reflected_ray = ray_in.spawn_child(
            hit.point, reflected_dir, hit.t, i_reflected, reflected, self.id, budgets.self_hit_epsilon,
        );

        match f.cos_theta_t {
            None => {
                // Total internal reflection: only the reflected child
                // survives, at the full incident intensity (spec.md §4.2,
                // §4.6 item 5).
                vec![reflected_ray]
            }
            Some(cos_theta_t) => {
                let eta = eta_i / eta_t;
                let transmitted_dir =
                    ray_in.direction * eta + hit.normal * (eta * cos_theta_i - cos_theta_t);

                let t_factor = (eta_t * cos_theta_t) / (eta_i * cos_theta_i);
                let transmitted_local = Jones::new(
                    local.ex * f.t_s * t_factor.sqrt(),
                    local.ey * f.t_p * t_factor.sqrt(),
                );
                let transmitted = transmitted_local.rotate(-alpha);
                let i_transmitted = t_factor * (f.t_s * f.t_s * i_s + f.t_p * f.t_p * i_p);

                let transmitted_ray = ray_in.spawn_child(
                    hit.point, transmitted_dir, hit.t, i_transmitted, transmitted, self.id, budgets.self_hit_epsilon,
                );

                vec![transmitted_ray, reflected_ray]
            }
        }
    }

    fn interact_beamsplitter(
        &self,
        ray_in: &Ray,
        hit: &GeometryHit,
        transmission: f64,
        reflection: f64,
        is_polarizing: bool,
        transmission_axis_deg: f64,
        budgets: &Budgets,
    ) -> Vec<Ray> {
        let reflected_dir = reflect(ray_in.direction, hit.normal);

        let (transmitted_jones, i_transmitted, reflected_jones, i_reflected) = if is_polarizing {
            let local = ray_in.polarization.rotate(transmission_axis_deg);
            let i_par = local.ex.norm_sqr();
            let i_perp = local.ey.norm_sqr();

            let t_local = Jones::new(local.ex, Complex64::new(0.0, 0.0));
            let r_local = Jones::new(Complex64::new(0.0, 0.0), local.ey);

            (t_local.rotate(-transmission_axis_deg), i_par, r_local.rotate(-transmission_axis_deg), i_perp)
        } else {
            let i_t = ray_in.intensity * transmission;
            let i_r = ray_in.intensity * reflection;
            (
                ray_in.polarization.scaled_to(i_t),
                i_t,
                ray_in.polarization.scaled_to(i_r),
                i_r,
            )
        };

        let transmitted_ray = ray_in.spawn_child(
            hit.point, ray_in.direction, hit.t, i_transmitted, transmitted_jones, self.id, budgets.self_hit_epsilon,
        );
        let reflected_ray = ray_in.spawn_child(
            hit.point, reflected_dir, hit.t, i_reflected, reflected_jones, self.id, budgets.self_hit_epsilon,
        );

        vec![transmitted_ray, reflected_ray]
    }

    fn interact_waveplate(&self, ray_in: &Ray, hit: &GeometryHit, phase_shift_deg: f64, fast_axis_deg: f64, budgets: &Budgets) -> Vec<Ray> {
        let local = ray_in.polarization.rotate(fast_axis_deg);
        let phase = Complex64::from_polar(1.0, phase_shift_deg.to_radians());
        let shifted = Jones::new(local.ex, local.ey * phase);
        let polarization = shifted.rotate(-fast_axis_deg);

        vec![ray_in.spawn_child(hit.point, ray_in.direction, hit.t, ray_in.intensity, polarization, self.id, budgets.self_hit_epsilon)]
    }

    fn interact_dichroic(
        &self,
        ray_in: &Ray,
        hit: &GeometryHit,
        cutoff_nm: f64,
        transition_width_nm: f64,
        pass_type: PassType,
        budgets: &Budgets,
    ) -> Vec<Ray> {
        let lo = cutoff_nm - transition_width_nm / 2.0;
        let hi = cutoff_nm + transition_width_nm / 2.0;
        let s = smooth_step(lo, hi, ray_in.wavelength);
        let transmission = match pass_type {
            PassType::Longpass => s,
            PassType::Shortpass => 1.0 - s,
        };
        let reflection = 1.0 - transmission;

        self.interact_beamsplitter(ray_in, hit, transmission, reflection, false, 0.0, budgets)
    }
}

/// Cubic Hermite smoothstep, monotone and C1, clamped to `[lo, hi]`.
fn smooth_step(lo: f64, hi: f64, x: f64) -> f64 {
    if hi <= lo {
        return if x < lo { 0.0 } else { 1.0 };
    }
    let t = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::LineSegment;
    use crate::space::{Point, Vector};

    fn vertical_segment() -> Geometry {
        Geometry::Flat(LineSegment::new(Point::new(50.0, -20.0), Point::new(50.0, 20.0)))
    }

    #[test]
    fn mirror_reflects_and_scales_intensity() {
        let element = Element::new(ElementId(0), vertical_segment(), Variant::Mirror { reflectivity: 0.5 });
        let hit = element.geometry.intersect(Point::new(0.0, 0.0), Vector::new(1.0, 0.0), 1e-9).unwrap();
        let ray = Ray::emit(Point::new(0.0, 0.0), Vector::new(1.0, 0.0), 100.0, Jones::horizontal(), 633.0, (255, 0, 0));
        let out = element.interact(&ray, &hit, &Budgets::default());
        assert_eq!(out.len(), 1);
        assert!((out[0].intensity - 0.5).abs() < 1e-12);
        assert!((out[0].direction.x - -1.0).abs() < 1e-9);
    }

    #[test]
    fn thin_lens_focuses_off_axis_ray() {
        let lens_geom = Geometry::Flat(LineSegment::new(Point::new(0.0, -20.0), Point::new(0.0, 20.0)));
        let element = Element::new(ElementId(0), lens_geom, Variant::ThinLens { focal_length_mm: 100.0 });
        let origin = Point::new(-100.0, 10.0);
        let direction = Vector::new(1.0, 0.0);
        let hit = element.geometry.intersect(origin, direction, 1e-9).unwrap();
        let ray = Ray::emit(origin, direction, 200.0, Jones::horizontal(), 633.0, (255, 0, 0));
        let out = element.interact(&ray, &hit, &Budgets::default());
        assert_eq!(out.len(), 1);

        let target = Point::new(100.0, 0.0);
        let expected = (target - hit.point).normalize();
        let got = out[0].direction.normalize();
        assert!((got.x - expected.x).abs() < 1e-6);
        assert!((got.y - expected.y).abs() < 1e-6);
    }

    #[test]
    fn non_polarizing_beamsplitter_conserves_weighted_intensity() {
        let element = Element::new(
            ElementId(0),
            vertical_segment(),
            Variant::Beamsplitter { transmission: 0.5, reflection: 0.5, is_polarizing: false, transmission_axis_deg: 0.0 },
        );
        let origin = Point::new(0.0, 0.0);
        let direction = Vector::new(1.0, 0.0);
        let hit = element.geometry.intersect(origin, direction, 1e-9).unwrap();
        let ray = Ray::emit(origin, direction, 200.0, Jones::horizontal(), 633.0, (255, 0, 0));
        let out = element.interact(&ray, &hit, &Budgets::default());
        assert_eq!(out.len(), 2);
        let total: f64 = out.iter().map(|r| r.intensity).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((out[0].intensity - 0.5).abs() < 1e-9);
        assert!((out[1].intensity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn polarizing_beamsplitter_obeys_malus_law() {
        let element = Element::new(
            ElementId(0),
            vertical_segment(),
            Variant::Beamsplitter { transmission: 1.0, reflection: 1.0, is_polarizing: true, transmission_axis_deg: 0.0 },
        );
        let origin = Point::new(0.0, 0.0);
        let direction = Vector::new(1.0, 0.0);
        let hit = element.geometry.intersect(origin, direction, 1e-9).unwrap();
        let ray = Ray::emit(origin, direction, 200.0, Jones::diagonal_plus_45(), 633.0, (255, 0, 0));
        let out = element.interact(&ray, &hit, &Budgets::default());
        let total: f64 = out.iter().map(|r| r.intensity).sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!((out[0].intensity - 0.5).abs() < 1e-6);
        assert!((out[1].intensity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn waveplate_preserves_norm() {
        let element = Element::new(
            ElementId(0),
            vertical_segment(),
            Variant::Waveplate { phase_shift_deg: 90.0, fast_axis_deg: 22.5 },
        );
        let origin = Point::new(0.0, 0.0);
        let direction = Vector::new(1.0, 0.0);
        let hit = element.geometry.intersect(origin, direction, 1e-9).unwrap();
        let ray = Ray::emit(origin, direction, 200.0, Jones::diagonal_plus_45(), 633.0, (255, 0, 0));
        let out = element.interact(&ray, &hit, &Budgets::default());
        assert_eq!(out.len(), 1);
        assert!((out[0].polarization.norm_squared() - ray.polarization.norm_squared()).abs() < 1e-12);
    }

    #[test]
    fn half_wave_plate_applied_twice_is_identity_up_to_sign() {
        let element = Element::new(
            ElementId(0),
            vertical_segment(),
            Variant::Waveplate { phase_shift_deg: 180.0, fast_axis_deg: 10.0 },
        );
        let origin = Point::new(0.0, 0.0);
        let direction = Vector::new(1.0, 0.0);
        let hit = element.geometry.intersect(origin, direction, 1e-9).unwrap();
        let ray = Ray::emit(origin, direction, 200.0, Jones::linear(30.0), 633.0, (255, 0, 0));
        let once = &element.interact(&ray, &hit, &Budgets::default())[0];
        let twice = &element.interact(once, &hit, &Budgets::default())[0];

        let same_sign = (twice.polarization.ex - ray.polarization.ex).norm() < 1e-9
            && (twice.polarization.ey - ray.polarization.ey).norm() < 1e-9;
        let flipped_sign = (twice.polarization.ex + ray.polarization.ex).norm() < 1e-9
            && (twice.polarization.ey + ray.polarization.ey).norm() < 1e-9;
        assert!(same_sign || flipped_sign);
    }

    #[test]
    fn longpass_dichroic_reflects_shorter_wavelength_more_strongly() {
        let element = Element::new(
            ElementId(0),
            vertical_segment(),
            Variant::Dichroic { cutoff_nm: 550.0, transition_width_nm: 50.0, pass_type: PassType::Longpass },
        );
        let origin = Point::new(0.0, 0.0);
        let direction = Vector::new(1.0, 0.0);
        let hit = element.geometry.intersect(origin, direction, 1e-9).unwrap();
        let ray = Ray::emit(origin, direction, 200.0, Jones::horizontal(), 488.0, (0, 0, 255));
        let out = element.interact(&ray, &hit, &Budgets::default());
        let (transmitted, reflected) = (&out[0], &out[1]);
        assert!(reflected.intensity > transmitted.intensity);
        assert!((transmitted.intensity + reflected.intensity - 1.0).abs() < 1e-9);
    }
}
