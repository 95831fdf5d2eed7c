//! Traces a single ray through a scene with no elements at all: the
//! simplest possible escape termination.

use opticsim::polarization::PolarizationSpec;
use opticsim::source::SourceDescriptor;
use opticsim::space::Point;
use opticsim::{propagate, Budgets, Scene};

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    scene.push_source(SourceDescriptor {
        position: Point::new(0.0, 0.0),
        base_angle: 0.0,
        aperture_size: 0.0,
        ray_count: 1,
        spread: 0.0,
        ray_length: 100.0,
        wavelength: 633.0,
        color: (255, 0, 0),
        polarization_spec: PolarizationSpec::Horizontal,
    });

    let paths = propagate(&scene, &Budgets::default());
    for path in &paths {
        println!("{:?} rgba={:?} wavelength={}", path.points, path.rgba, path.wavelength_nm);
    }
}
