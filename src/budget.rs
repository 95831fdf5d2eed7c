//! Configuration surface of the engine: the handful of budgets that bound an
//! otherwise unbounded branch-and-bound trace.

/// Termination and numerical-tolerance budgets for a single `propagate` call.
///
/// This is the entire configuration surface of the engine — there is no
/// config file or CLI parsing here, that belongs to the host application.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Budgets {
    /// Maximum number of element interactions any single branch may undergo
    /// before it is finalised.
    pub max_events: u32,

    /// Branches with intensity below this value are dropped without being
    /// extended further.
    pub min_intensity: f64,

    /// Distance (mm) an outgoing ray's origin is offset along its new
    /// direction to avoid immediately re-intersecting the element it just
    /// left.
    pub self_hit_epsilon: f64,

    /// Tolerance used throughout the geometry kernel to reject
    /// near-parallel, near-tangent, and near-zero-length cases.
    pub geometry_epsilon: f64,
}

impl Default for Budgets {
    fn default() -> Budgets {
        Budgets {
            max_events: 80,
            min_intensity: 0.02,
            self_hit_epsilon: 1e-3,
            geometry_epsilon: 1e-9,
        }
    }
}
