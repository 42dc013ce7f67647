use nalgebra::Vector2;

use crate::SimulationError;

/// Gravitational constant in N m²/kg².
pub const G: f64 = 6.67428e-11;

/// Astronomical unit in meters.
pub const AU: f64 = 149.6e6 * 1000.;

/// Default time step of one day, in seconds.
pub const TIMESTEP: f64 = 3600. * 24.;

/// Pairs closer than this (in meters) are rejected instead of producing an unbounded force.
pub const MIN_DISTANCE: f64 = 1.;

/// The part of a body the force law needs.
///
/// During a step every body is frozen into one of these,
/// so that all forces of a step are evaluated against the same generation of positions.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMass {
    pub mass: f64,
    pub position: Vector2<f64>,
    pub is_reference: bool,
}

impl PointMass {
    pub fn new(mass: f64, position: Vector2<f64>) -> Self {
        Self {
            mass,
            position,
            is_reference: false,
        }
    }
}

/// The force `other` exerts on a body, together with their separation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pull {
    pub force: Vector2<f64>,
    pub distance: f64,
}

/// Newtonian attraction of `other` on `body`.
///
/// The returned force points from `body` toward `other`.
pub fn attraction(body: &PointMass, other: &PointMass) -> Result<Pull, SimulationError> {
    let d = other.position - body.position;
    let distance = d.norm();

    // also catches NaN
    if !(distance >= MIN_DISTANCE) || !distance.is_finite() {
        return Err(SimulationError::DegenerateConfiguration {
            distance,
            bodies: None,
        });
    }

    let force = G * body.mass * other.mass / distance.powi(2);
    let theta = d.y.atan2(d.x);

    Ok(Pull {
        force: Vector2::new(force * theta.cos(), force * theta.sin()),
        distance,
    })
}
