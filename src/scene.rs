//! The `Scene` aggregate: elements and sources, assembled by the caller and
//! handed to `propagate` as an immutable reference, mirroring `lasgun`'s
//! `Scene` (an owned collection of shapes/materials/lights).

use crate::element::{Element, ElementId, Variant};
use crate::geometry::Geometry;
use crate::source::SourceDescriptor;

/// An immutable description of the optical system to trace.
///
/// `Scene` owns its elements and sources; `ElementId`s are assigned by
/// insertion order as elements are added via `push_element`, and remain
/// stable for the lifetime of the `Scene`.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<Element>,
    sources: Vec<SourceDescriptor>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene { elements: Vec::new(), sources: Vec::new() }
    }

    /// Add an element, returning the `ElementId` assigned to it.
    pub fn push_element(&mut self, geometry: Geometry, variant: Variant) -> ElementId {
        let id = ElementId(self.elements.len() as u64);
        self.elements.push(Element::new(id, geometry, variant));
        id
    }

    /// Same as `push_element`, but attaches a human-readable name (used only
    /// for diagnostics/logging, never by the physics).
    pub fn push_named_element(&mut self, geometry: Geometry, variant: Variant, name: impl Into<String>) -> ElementId {
        let id = ElementId(self.elements.len() as u64);
        self.elements.push(Element::new(id, geometry, variant).named(name));
        id
    }

    pub fn push_source(&mut self, source: SourceDescriptor) {
        self.sources.push(source);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::LineSegment;
    use crate::space::Point;

    #[test]
    fn pushed_elements_get_sequential_ids() {
        let mut scene = Scene::new();
        let seg = Geometry::Flat(LineSegment::new(Point::new(0.0, -1.0), Point::new(0.0, 1.0)));
        let a = scene.push_element(seg, Variant::Mirror { reflectivity: 1.0 });
        let b = scene.push_element(seg, Variant::Mirror { reflectivity: 0.5 });
        assert_eq!(a, ElementId(0));
        assert_eq!(b, ElementId(1));
        assert_eq!(scene.elements().len(), 2);
    }

    #[test]
    fn empty_scene_has_no_elements_or_sources() {
        let scene = Scene::new();
        assert!(scene.elements().is_empty());
        assert!(scene.sources().is_empty());
    }
}
