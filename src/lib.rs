pub mod body;
pub mod clock;
pub mod console;
pub mod csv;
mod error;
pub mod gravity;
pub mod render;
pub mod scenario;
pub mod scene;
pub mod trail;
pub mod viewport;
#[cfg(feature = "visualization")]
pub mod visualization;

pub use body::{Body, Color};
pub use clock::FrameClock;
pub use console::Console;
pub use error::{FrameError, SimulationError};
pub use render::Surface;
pub use scenario::Scenario;
pub use scene::Scene;
pub use viewport::Viewport;

use gravity::{PointMass, G, TIMESTEP};
use nalgebra::{DMatrix, Vector2};

/// A fixed set of bodies advanced with forward Euler at a fixed time step.
#[derive(Clone, Debug)]
pub struct Simulation {
    bodies: Vec<Body>,
    time_step: f64,
    steps: usize,
}

impl Simulation {
    /// Create a simulation with the default time step of one day.
    ///
    /// At most one body may be flagged as reference.
    pub fn new(bodies: Vec<Body>) -> Result<Self, SimulationError> {
        let mut references = bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_reference())
            .map(|(i, _)| i);
        if let (Some(first), Some(second)) = (references.next(), references.next()) {
            return Err(SimulationError::MultipleReferenceBodies { first, second });
        }

        Ok(Self {
            bodies,
            time_step: TIMESTEP,
            steps: 0,
        })
    }

    /// Set the time step in seconds.
    pub fn time_step(mut self, time_step: f64) -> Result<Self, SimulationError> {
        if !(time_step > 0.) || !time_step.is_finite() {
            return Err(SimulationError::InvalidTimeStep { time_step });
        }
        self.time_step = time_step;
        Ok(self)
    }

    /// Keep only the `limit` most recent positions in every trail.
    #[must_use]
    pub fn trail_limit(mut self, limit: usize) -> Self {
        for body in &mut self.bodies {
            body.trail_mut().set_limit(Some(limit));
        }
        self
    }

    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Number of completed steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Simulated time in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.time_step
    }

    /// Advance every body by one time step.
    ///
    /// Forces are evaluated against a snapshot taken at the start of the step,
    /// so the result does not depend on the order of the bodies.
    /// On error no body is modified.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        let snapshot: Vec<PointMass> = self.bodies.iter().map(Body::point_mass).collect();
        let dt = self.time_step;

        let mut updates = Vec::with_capacity(snapshot.len());
        for (i, (p1, body)) in snapshot.iter().zip(&self.bodies).enumerate() {
            let mut total_force = Vector2::zeros();
            let mut distance_to_reference = None;
            for (j, p2) in snapshot.iter().enumerate() {
                if i == j {
                    continue;
                }
                let pull = gravity::attraction(p1, p2).map_err(|e| e.between(i, j))?;
                total_force += pull.force;
                if p2.is_reference {
                    distance_to_reference = Some(pull.distance);
                }
            }

            let velocity = body.velocity() + total_force / p1.mass * dt;
            let position = p1.position + velocity * dt;
            if !velocity.iter().chain(position.iter()).all(|x| x.is_finite()) {
                return Err(SimulationError::NonFiniteState { body: i });
            }

            updates.push((position, velocity, distance_to_reference));
        }

        for (body, (position, velocity, distance)) in self.bodies.iter_mut().zip(updates) {
            body.commit(position, velocity, distance);
        }
        self.steps += 1;

        Ok(())
    }

    /// Run `num_steps` steps and return all positions.
    ///
    /// Row `t` holds the positions after `t` steps, row 0 the starting positions.
    pub fn simulate(&mut self, num_steps: usize) -> Result<DMatrix<Vector2<f64>>, SimulationError> {
        let n = self.bodies.len();

        let mut positions = DMatrix::from_element(num_steps + 1, n, Vector2::zeros());
        for (i, body) in self.bodies.iter().enumerate() {
            positions[(0, i)] = *body.position();
        }

        for t in 0..num_steps {
            self.step()?;
            for (i, body) in self.bodies.iter().enumerate() {
                positions[(t + 1, i)] = *body.position();
            }
        }

        Ok(positions)
    }

    /// Draw the current state of all bodies.
    pub fn render<S: Surface>(&self, viewport: &Viewport, surface: &mut S) -> Result<(), S::Error> {
        render::render(&self.bodies, viewport, surface)
    }

    /// One frame of the driver loop: a single step followed by a full render.
    pub fn advance_frame<S: Surface>(
        &mut self,
        viewport: &Viewport,
        surface: &mut S,
    ) -> Result<(), FrameError<S::Error>> {
        self.step().map_err(FrameError::Simulation)?;
        self.render(viewport, surface).map_err(FrameError::Surface)
    }

    /// Total linear momentum in kg m/s.
    #[must_use]
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.bodies
            .iter()
            .map(|b| b.velocity() * b.mass())
            .sum()
    }

    /// Kinetic plus gravitational potential energy in joules.
    #[must_use]
    pub fn total_energy(&self) -> f64 {
        let kinetic: f64 = self.bodies.iter().map(Body::kinetic_energy).sum();

        let mut potential = 0.;
        for (i, b1) in self.bodies.iter().enumerate() {
            for b2 in &self.bodies[i + 1..] {
                let r = (b2.position() - b1.position()).norm();
                potential -= G * b1.mass() * b2.mass() / r;
            }
        }

        kinetic + potential
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::{
        gravity::AU,
        render::tests::{Call, Recorder},
    };

    fn sun_and_earth() -> Vec<Body> {
        vec![
            Body::new(1.99892e30, Vector2::zeros(), Vector2::zeros())
                .unwrap()
                .reference(),
            Body::new(5.9742e24, Vector2::new(-AU, 0.), Vector2::new(0., 29_783.)).unwrap(),
        ]
    }

    fn three_bodies() -> Vec<Body> {
        vec![
            Body::new(2e30, Vector2::new(1e9, 0.), Vector2::new(0., 1e3))
                .unwrap()
                .reference(),
            Body::new(6e24, Vector2::new(-AU, 0.5 * AU), Vector2::new(1e4, 2e4)).unwrap(),
            Body::new(7e23, Vector2::new(0.3 * AU, -1.2 * AU), Vector2::new(-2e4, 0.)).unwrap(),
        ]
    }

    #[test]
    fn single_body_stays_put() {
        let body = Body::new(1e30, Vector2::new(3., 4.), Vector2::zeros()).unwrap();
        let mut sim = Simulation::new(vec![body]).unwrap();

        for _ in 0..100 {
            sim.step().unwrap();
        }

        let body = &sim.bodies()[0];
        assert_eq!(*body.position(), Vector2::new(3., 4.));
        assert_eq!(*body.velocity(), Vector2::zeros());
        assert_eq!(body.trail().len(), 100);
    }

    #[test]
    fn trail_grows_by_one_per_step() {
        let mut sim = Simulation::new(three_bodies()).unwrap();
        let mut expected = vec![Vec::new(); 3];

        for k in 1..=20 {
            sim.step().unwrap();
            for (i, body) in sim.bodies().iter().enumerate() {
                expected[i].push(*body.position());
                assert_eq!(body.trail().len(), k);
            }
        }

        for (body, expected) in sim.bodies().iter().zip(expected) {
            let trail: Vec<_> = body.trail().iter().copied().collect();
            assert_eq!(trail, expected);
        }
    }

    #[test]
    fn distance_to_reference_is_pre_step_distance() {
        let mut sim = Simulation::new(three_bodies()).unwrap();

        for _ in 0..5 {
            let before: Vec<f64> = sim
                .bodies()
                .iter()
                .map(|b| (b.position() - sim.bodies()[0].position()).norm())
                .collect();
            sim.step().unwrap();

            for (body, distance) in sim.bodies().iter().zip(before).skip(1) {
                assert_relative_eq!(body.distance_to_reference(), distance, max_relative = 1e-12);
            }
            // nothing to measure against for the reference itself
            assert_eq!(sim.bodies()[0].distance_to_reference(), 0.);
        }
    }

    #[test]
    fn forward_euler_update() {
        let mut sim = Simulation::new(sun_and_earth()).unwrap();
        sim.step().unwrap();

        let sun_mass = 1.99892e30;
        let acc = G * sun_mass / (AU * AU);
        let v = Vector2::new(acc * TIMESTEP, 29_783.);
        let p = Vector2::new(-AU, 0.) + v * TIMESTEP;

        let earth = &sim.bodies()[1];
        assert_relative_eq!(*earth.velocity(), v, max_relative = 1e-12);
        assert_relative_eq!(*earth.position(), p, max_relative = 1e-12);
        assert_eq!(earth.trail().last(), Some(earth.position()));
    }

    #[test]
    fn deterministic() {
        let mut sim1 = Simulation::new(three_bodies()).unwrap();
        let mut sim2 = Simulation::new(three_bodies()).unwrap();

        let pos1 = sim1.simulate(200).unwrap();
        let pos2 = sim2.simulate(200).unwrap();

        assert_eq!(pos1, pos2);
    }

    #[test]
    fn independent_of_body_order() {
        let mut forward = Simulation::new(three_bodies()).unwrap();
        let mut reversed_bodies = three_bodies();
        reversed_bodies.reverse();
        let mut reversed = Simulation::new(reversed_bodies).unwrap();

        for _ in 0..50 {
            forward.step().unwrap();
            reversed.step().unwrap();
        }

        for (b1, b2) in forward.bodies().iter().zip(reversed.bodies().iter().rev()) {
            assert_relative_eq!(*b1.position(), *b2.position(), max_relative = 1e-12);
            assert_relative_eq!(*b1.velocity(), *b2.velocity(), max_relative = 1e-12);
            assert_relative_eq!(
                b1.distance_to_reference(),
                b2.distance_to_reference(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn conserves_momentum() {
        let mut sim = Simulation::new(three_bodies()).unwrap();
        let initial = sim.total_momentum();
        let scale: f64 = sim
            .bodies()
            .iter()
            .map(|b| b.mass() * b.velocity().norm())
            .sum();

        for _ in 0..365 {
            sim.step().unwrap();
        }

        assert_abs_diff_eq!(sim.total_momentum(), initial, epsilon = 1e-9 * scale);
    }

    #[test]
    fn energy_drift_is_bounded_over_a_year() {
        let mut sim = Simulation::new(sun_and_earth()).unwrap();
        let initial = sim.total_energy();

        for _ in 0..365 {
            sim.step().unwrap();
        }

        assert_relative_eq!(sim.total_energy(), initial, max_relative = 0.05);
    }

    #[test]
    fn simulate_rows_are_time_steps() {
        let mut sim = Simulation::new(sun_and_earth()).unwrap();
        let positions = sim.simulate(10).unwrap();

        assert_eq!(positions.shape(), (11, 2));
        assert_eq!(positions[(0, 1)], Vector2::new(-AU, 0.));
        assert_eq!(positions[(10, 1)], *sim.bodies()[1].position());
        assert_eq!(sim.steps(), 10);
        assert_relative_eq!(sim.elapsed(), 10. * TIMESTEP);
    }

    #[test]
    fn degenerate_pair_fails_without_mutation() {
        let bodies = vec![
            Body::new(1e20, Vector2::new(5., 5.), Vector2::new(1., 0.)).unwrap(),
            Body::new(1e20, Vector2::new(1e6, 0.), Vector2::zeros()).unwrap(),
            Body::new(1e20, Vector2::new(5., 5.), Vector2::zeros()).unwrap(),
        ];
        let mut sim = Simulation::new(bodies).unwrap();

        assert_eq!(
            sim.step(),
            Err(SimulationError::DegenerateConfiguration {
                distance: 0.,
                bodies: Some((0, 2)),
            })
        );
        assert_eq!(sim.steps(), 0);
        for body in sim.bodies() {
            assert!(body.trail().is_empty());
        }
        assert_eq!(*sim.bodies()[0].velocity(), Vector2::new(1., 0.));
    }

    #[test]
    fn non_finite_state_fails_without_mutation() {
        let bodies = vec![
            Body::new(1e300, Vector2::zeros(), Vector2::zeros()).unwrap(),
            Body::new(1e300, Vector2::new(10., 0.), Vector2::zeros()).unwrap(),
        ];
        let mut sim = Simulation::new(bodies).unwrap();

        assert_eq!(sim.step(), Err(SimulationError::NonFiniteState { body: 0 }));
        assert_eq!(*sim.bodies()[1].position(), Vector2::new(10., 0.));
        assert!(sim.bodies()[1].trail().is_empty());
    }

    #[test]
    fn rejects_second_reference() {
        let mut bodies = sun_and_earth();
        bodies.push(
            Body::new(1e30, Vector2::new(AU, AU), Vector2::zeros())
                .unwrap()
                .reference(),
        );

        assert_eq!(
            Simulation::new(bodies).unwrap_err(),
            SimulationError::MultipleReferenceBodies {
                first: 0,
                second: 2
            }
        );
    }

    #[test]
    fn rejects_invalid_time_step() {
        for dt in [0., -1., f64::NAN] {
            let result = Simulation::new(sun_and_earth()).unwrap().time_step(dt);
            assert!(matches!(result, Err(SimulationError::InvalidTimeStep { .. })));
        }
    }

    #[test]
    fn trail_limit_caps_history() {
        let mut sim = Simulation::new(sun_and_earth()).unwrap().trail_limit(5);
        sim.simulate(20).unwrap();

        for body in sim.bodies() {
            assert_eq!(body.trail().len(), 5);
            assert_eq!(body.trail().limit(), Some(5));
            assert_eq!(body.trail().last(), Some(body.position()));
        }
    }

    #[test]
    fn advance_frame_steps_then_renders() {
        let mut sim = Simulation::new(sun_and_earth()).unwrap();
        let viewport = Viewport::default();

        for _ in 0..3 {
            let mut recorder = Recorder::default();
            sim.advance_frame(&viewport, &mut recorder).unwrap();
            let label = recorder.calls.iter().find_map(|c| match c {
                Call::Label(1, _, text) => Some(text.clone()),
                _ => None,
            });
            assert!(label.is_some_and(|text| text.starts_with("149") && text.ends_with(" km")));
        }

        let mut recorder = Recorder::default();
        sim.advance_frame(&viewport, &mut recorder).unwrap();
        assert!(recorder.calls.contains(&Call::Polyline(1, 4)));
        assert!(recorder.calls.contains(&Call::Polyline(0, 4)));
    }
}
