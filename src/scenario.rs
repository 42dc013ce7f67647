//! Initial configuration of a simulation.
//!
//! A scenario is plain data: it can be built in code, e.g. [`Scenario::solar_system`],
//! or loaded from YAML:
//!
//! ```yaml
//! time_step: 86400.0      # seconds per step
//! trail_limit: ~          # keep every position
//! frame_rate: 60
//! viewport:
//!   width: 800.0
//!   height: 800.0
//!   pixels_per_au: 150.0
//! bodies:
//!   - name: Sun
//!     position_au: [0.0, 0.0]
//!     velocity: [0.0, 0.0] # m/s
//!     mass: 1.99892e30     # kg
//!     radius: 30.0         # pixels
//!     color: [255, 255, 0]
//!     reference: true
//!   - name: Earth
//!     position_au: [-1.0, 0.0]
//!     velocity: [0.0, 29783.0]
//!     mass: 5.9742e24
//!     radius: 16.0
//!     color: [100, 149, 237]
//! ```

use std::{error::Error, fmt, fs::File, io, io::BufReader, path::Path};

use nalgebra::Vector2;
use serde::Deserialize;

use crate::{
    gravity::{AU, TIMESTEP},
    Body, Color, Simulation, SimulationError, Viewport,
};

fn default_time_step() -> f64 {
    TIMESTEP
}

fn default_frame_rate() -> u32 {
    60
}

fn default_radius() -> f64 {
    10.
}

fn default_color() -> [u8; 3] {
    [255, 255, 255]
}

/// Screen size and zoom.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub pixels_per_au: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.,
            height: 800.,
            pixels_per_au: 150.,
        }
    }
}

/// Initial state of a single body.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    /// Initial position in astronomical units.
    pub position_au: [f64; 2],
    /// Initial velocity in m/s.
    #[serde(default)]
    pub velocity: [f64; 2],
    /// Mass in kg.
    pub mass: f64,
    /// On-screen radius in pixels.
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    #[serde(default)]
    pub reference: bool,
}

impl BodyConfig {
    pub fn build(&self) -> Result<Body, SimulationError> {
        let [x, y] = self.position_au;
        let body = Body::new(
            self.mass,
            Vector2::new(x * AU, y * AU),
            Vector2::from(self.velocity),
        )?
        .named(self.name.clone())
        .with_appearance(self.radius, Color::from(self.color));

        Ok(if self.reference {
            body.reference()
        } else {
            body
        })
    }
}

/// Everything needed to start a simulation and its display.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Scenario {
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    #[serde(default)]
    pub trail_limit: Option<usize>,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default)]
    pub viewport: ViewportConfig,
    pub bodies: Vec<BodyConfig>,
}

impl Scenario {
    /// The Sun and the four inner planets.
    pub fn solar_system() -> Self {
        let planet = |name: &str, au: f64, vy: f64, mass: f64, radius: f64, color: Color| {
            BodyConfig {
                name: name.to_owned(),
                position_au: [au, 0.],
                velocity: [0., vy],
                mass,
                radius,
                color: [color.r, color.g, color.b],
                reference: false,
            }
        };

        let mut sun = planet("Sun", 0., 0., 1.99892e30, 30., Color::YELLOW);
        sun.reference = true;

        Self {
            time_step: TIMESTEP,
            trail_limit: None,
            frame_rate: default_frame_rate(),
            viewport: ViewportConfig::default(),
            bodies: vec![
                sun,
                planet("Mercury", 0.387, -47_400., 3.30e23, 8., Color::DARK_GREY),
                planet("Venus", 0.723, -35_020., 4.8685e24, 14., Color::WHITE),
                planet("Earth", -1., 29_783., 5.9742e24, 16., Color::BLUE),
                planet("Mars", -1.524, 24_077., 6.39e23, 12., Color::RED),
            ],
        }
    }

    pub fn from_reader(reader: impl io::Read) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixels_per_au,
        )
    }

    pub fn build(&self) -> Result<Simulation, ScenarioError> {
        let bodies = self
            .bodies
            .iter()
            .map(|config| {
                config.build().map_err(|source| ScenarioError::InvalidBody {
                    name: config.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let simulation = Simulation::new(bodies)?.time_step(self.time_step)?;

        Ok(match self.trail_limit {
            Some(limit) => simulation.trail_limit(limit),
            None => simulation,
        })
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::solar_system()
    }
}

#[derive(Debug)]
pub enum ScenarioError {
    Io(io::Error),
    Yaml(serde_yaml::Error),
    InvalidBody {
        name: String,
        source: SimulationError,
    },
    Simulation(SimulationError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read scenario: {e}"),
            Self::Yaml(e) => write!(f, "failed to parse scenario: {e}"),
            Self::InvalidBody { name, source } => write!(f, "invalid body {name:?}: {source}"),
            Self::Simulation(e) => write!(f, "invalid scenario: {e}"),
        }
    }
}

impl Error for ScenarioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Yaml(e) => Some(e),
            Self::InvalidBody { source, .. } => Some(source),
            Self::Simulation(e) => Some(e),
        }
    }
}

impl From<io::Error> for ScenarioError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ScenarioError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e)
    }
}

impl From<SimulationError> for ScenarioError {
    fn from(e: SimulationError) -> Self {
        Self::Simulation(e)
    }
}
