//! A ray bouncing between two parallel mirrors until the event-cap budget
//! ends the trace — exercises the driver's LIFO stack across many
//! interactions with a single element pair.

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
        Variant::Mirror { reflectivity: 0.98 },
        "right mirror",
    );
    scene.push_named_element(
        Geometry::Flat(LineSegment::new(Point::new(-50.0, -20.0), Point::new(-50.0, 20.0))),
        Variant::Mirror { reflectivity: 0.98 },
        "left mirror",
    );
    scene.push_source(SourceDescriptor {
        position: Point::new(0.0, 0.0),
        base_angle: 2.0,
        aperture_size: 0.0,
        ray_count: 1,
        spread: 0.0,
        ray_length: 1.0e5,
        wavelength: 532.0,
        color: (0, 255, 0),
        polarization_spec: PolarizationSpec::Horizontal,
    });

    let budgets = Budgets { max_events: 40, ..Budgets::default() };
    let paths = propagate(&scene, &budgets);
    for path in &paths {
        println!("{} points, final alpha {}", path.points.len(), path.rgba.3);
    }
}
