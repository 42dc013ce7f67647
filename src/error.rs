use std::{error::Error, fmt};

/// Everything that can go wrong while building or stepping a [`Simulation`](crate::Simulation).
#[derive(Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// A body was given a mass that is not strictly positive and finite.
    InvalidMass { mass: f64 },
    /// An initial position or velocity contained NaN or infinity.
    NonFiniteInput { quantity: &'static str },
    /// The fixed time step is not strictly positive and finite.
    InvalidTimeStep { time_step: f64 },
    /// More than one body carries the reference flag.
    MultipleReferenceBodies { first: usize, second: usize },
    /// Two bodies are closer than [`MIN_DISTANCE`](crate::gravity::MIN_DISTANCE).
    ///
    /// `bodies` is only known when the pair was evaluated during a step.
    DegenerateConfiguration {
        distance: f64,
        bodies: Option<(usize, usize)>,
    },
    /// A step would have left a body with a NaN or infinite position or velocity.
    NonFiniteState { body: usize },
}

impl SimulationError {
    /// Attach the indices of the offending pair to a degenerate-configuration error.
    pub(crate) fn between(self, first: usize, second: usize) -> Self {
        match self {
            Self::DegenerateConfiguration { distance, .. } => Self::DegenerateConfiguration {
                distance,
                bodies: Some((first, second)),
            },
            other => other,
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMass { mass } => {
                write!(f, "mass must be positive and finite, got {mass} kg")
            }
            Self::NonFiniteInput { quantity } => write!(f, "initial {quantity} is not finite"),
            Self::InvalidTimeStep { time_step } => {
                write!(f, "time step must be positive and finite, got {time_step} s")
            }
            Self::MultipleReferenceBodies { first, second } => write!(
                f,
                "bodies {first} and {second} are both flagged as reference body"
            ),
            Self::DegenerateConfiguration {
                distance,
                bodies: Some((first, second)),
            } => write!(
                f,
                "degenerate configuration: bodies {first} and {second} are {distance} m apart"
            ),
            Self::DegenerateConfiguration {
                distance,
                bodies: None,
            } => write!(f, "degenerate configuration: bodies are {distance} m apart"),
            Self::NonFiniteState { body } => {
                write!(f, "step produced a non-finite state for body {body}")
            }
        }
    }
}

impl Error for SimulationError {}

/// Failure of one frame of the driver loop.
#[derive(Debug)]
pub enum FrameError<E> {
    Simulation(SimulationError),
    Surface(E),
}

impl<E: fmt::Display> fmt::Display for FrameError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulation(e) => write!(f, "simulation step failed: {e}"),
            Self::Surface(e) => write!(f, "rendering failed: {e}"),
        }
    }
}

impl<E: Error + 'static> Error for FrameError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Simulation(e) => Some(e),
            Self::Surface(e) => Some(e),
        }
    }
}
