//! A three-ray fan through a 50/50 non-polarizing beamsplitter, producing
//! six finished polylines.

use opticsim::geometry::{Geometry, LineSegment};
use opticsim::polarization::PolarizationSpec;
use opticsim::source::SourceDescriptor;
use opticsim::space::Point;
use opticsim::{propagate, Budgets, Scene, Variant};

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    scene.push_named_element(
        Geometry::Flat(LineSegment::new(Point::new(50.0, -20.0), Point::new(50.0, 20.0))),
        Variant::Beamsplitter {
            transmission: 0.5,
            reflection: 0.5,
            is_polarizing: false,
            transmission_axis_deg: 0.0,
        },
        "50/50 splitter",
    );
    scene.push_source(SourceDescriptor {
        position: Point::new(0.0, 0.0),
        base_angle: 0.0,
        aperture_size: 10.0,
        ray_count: 3,
        spread: 5.0,
        ray_length: 150.0,
        wavelength: 633.0,
        color: (255, 128, 0),
        polarization_spec: PolarizationSpec::Horizontal,
    });

    let paths = propagate(&scene, &Budgets::default());
    println!("{} rays in, {} polylines out", 3, paths.len());
    for path in &paths {
        println!("{:?} rgba={:?}", path.points, path.rgba);
    }
}
