use nalgebra::Vector2;

use crate::{
    gravity::{self, PointMass},
    trail::Trail,
    SimulationError,
};

/// An RGB color, only carried through for the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const BLUE: Self = Self::new(100, 149, 237);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const DARK_GREY: Self = Self::new(80, 78, 81);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// A celestial body: a point mass with a position history.
#[derive(Clone, Debug)]
pub struct Body {
    name: String,
    mass: f64,
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    radius: f64,
    color: Color,
    is_reference: bool,
    distance_to_reference: f64,
    trail: Trail,
}

impl Body {
    /// Create a body with the given mass (kg), position (m) and velocity (m/s).
    ///
    /// Fails if the mass is not positive or any input is not finite.
    pub fn new(
        mass: f64,
        position: Vector2<f64>,
        velocity: Vector2<f64>,
    ) -> Result<Self, SimulationError> {
        if !(mass > 0.) || !mass.is_finite() {
            return Err(SimulationError::InvalidMass { mass });
        }
        if !position.iter().all(|x| x.is_finite()) {
            return Err(SimulationError::NonFiniteInput {
                quantity: "position",
            });
        }
        if !velocity.iter().all(|x| x.is_finite()) {
            return Err(SimulationError::NonFiniteInput {
                quantity: "velocity",
            });
        }

        Ok(Self {
            name: String::new(),
            mass,
            position,
            velocity,
            radius: 1.,
            color: Color::WHITE,
            is_reference: false,
            distance_to_reference: 0.,
            trail: Trail::new(),
        })
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the on-screen radius (pixels) and color.
    #[must_use]
    pub fn with_appearance(mut self, radius: f64, color: Color) -> Self {
        self.radius = radius;
        self.color = color;
        self
    }

    /// Mark this body as the origin for distance reporting.
    #[must_use]
    pub fn reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name, or `body {index}` for unnamed bodies.
    pub fn display_name(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("body {index}")
        } else {
            self.name.clone()
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> &Vector2<f64> {
        &self.position
    }

    pub fn velocity(&self) -> &Vector2<f64> {
        &self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    /// Distance to the reference body as of the last force evaluation against it,
    /// `0` before that.
    pub fn distance_to_reference(&self) -> f64 {
        self.distance_to_reference
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub(crate) fn trail_mut(&mut self) -> &mut Trail {
        &mut self.trail
    }

    pub fn point_mass(&self) -> PointMass {
        PointMass {
            mass: self.mass,
            position: self.position,
            is_reference: self.is_reference,
        }
    }

    /// The gravitational force `other` exerts on this body, pointing toward `other`.
    ///
    /// Evaluating against the reference body also records the distance to it.
    pub fn attraction(&mut self, other: &Body) -> Result<Vector2<f64>, SimulationError> {
        let pull = gravity::attraction(&self.point_mass(), &other.point_mass())?;
        if other.is_reference {
            self.distance_to_reference = pull.distance;
        }
        Ok(pull.force)
    }

    /// Overwrite the dynamic state at the end of a step.
    pub(crate) fn commit(
        &mut self,
        position: Vector2<f64>,
        velocity: Vector2<f64>,
        distance_to_reference: Option<f64>,
    ) {
        self.position = position;
        self.velocity = velocity;
        if let Some(distance) = distance_to_reference {
            self.distance_to_reference = distance;
        }
        self.trail.push(position);
    }

    pub(crate) fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }
}
