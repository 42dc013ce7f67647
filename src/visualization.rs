use std::{
    io::{self, Write},
    time::Instant,
};

use blue_engine::{primitive_shapes::uv_sphere, Engine, ObjectStorage, WindowDescriptor};
use color_eyre::eyre::{eyre, Result};
use nalgebra::Vector2;

use crate::{render::TRAIL_WIDTH, scene::Sprite, Color, FrameClock, Scene, Simulation, Viewport};

/// Where unused trail markers are parked, outside of the visible `[-1, 1]` square.
const HIDDEN: (f32, f32) = (2., 2.);

fn object_name(body: usize) -> String {
    format!("body{body}")
}

fn marker_name(body: usize, marker: usize) -> String {
    format!("body{body}_trail{marker}")
}

/// Map pixels onto normalized device coordinates, y pointing up.
fn to_device(viewport: &Viewport, pixel: &Vector2<f64>) -> (f32, f32) {
    let x = 2. * pixel.x / viewport.width - 1.;
    let y = 1. - 2. * pixel.y / viewport.height;
    (x as f32, y as f32)
}

fn place(
    objects: &mut ObjectStorage,
    name: &str,
    (x, y): (f32, f32),
    color: Color,
) -> Result<()> {
    let obj = objects
        .get_mut(name)
        .ok_or_else(|| eyre!("no object named {name}"))?;

    obj.set_position(x, y, 0.);
    obj.set_uniform_color(
        f32::from(color.r) / 255.,
        f32::from(color.g) / 255.,
        f32::from(color.b) / 255.,
        1.,
    )
    .map_err(|e| eyre!("{e}"))?;

    Ok(())
}

/// Move the body sphere and its trail markers to match `sprite`.
fn sync_sprite(
    objects: &mut ObjectStorage,
    viewport: &Viewport,
    body: usize,
    sprite: &Sprite,
    markers: usize,
) -> Result<()> {
    place(
        objects,
        &object_name(body),
        to_device(viewport, &sprite.center),
        sprite.color,
    )?;

    for k in 0..markers {
        let position = match sprite.trail.get(k) {
            Some(p) => to_device(viewport, p),
            None => HIDDEN,
        };
        place(objects, &marker_name(body, k), position, sprite.color)?;
    }

    Ok(())
}

/// Labels of a frame on one line, named after their bodies.
fn caption(scene: &Scene, names: &[String]) -> String {
    scene
        .labels()
        .map(|(i, text)| match names.get(i) {
            Some(name) => format!("{name}: {text}"),
            None => format!("body {i}: {text}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Show a simulation in a window, one step per frame.
///
/// Bodies are spheres and trails a row of small markers. The engine has no text,
/// so the distance labels are kept up to date on one terminal line instead.
pub struct Visualizer {
    engine: Engine,
    simulation: Simulation,
    viewport: Viewport,
    frame_rate: u32,
    markers: usize,
}

impl Visualizer {
    /// Create a new visualizer with a window of the viewport's size.
    pub fn new(simulation: Simulation, viewport: Viewport) -> Result<Self> {
        Self::with_markers(simulation, viewport, crate::scene::TRAIL_MARKERS)
    }

    /// Like [`Visualizer::new`], drawing every trail with at most `markers` markers.
    pub fn with_markers(
        simulation: Simulation,
        viewport: Viewport,
        markers: usize,
    ) -> Result<Self> {
        let mut engine = Engine::new_config(WindowDescriptor {
            width: viewport.width as u32,
            height: viewport.height as u32,
            title: "Planet simulation",
            ..Default::default()
        })
        .map_err(|e| eyre!("{e}"))?;

        let marker_radius = TRAIL_WIDTH / viewport.width;
        for (i, body) in simulation.bodies().iter().enumerate() {
            let radius = 2. * body.radius() / viewport.width;
            uv_sphere(
                object_name(i),
                (8, 20, radius as f32),
                &mut engine.renderer,
                &mut engine.objects,
            )
            .map_err(|e| eyre!("{e}"))?;

            for k in 0..markers {
                uv_sphere(
                    marker_name(i, k),
                    (4, 8, marker_radius as f32),
                    &mut engine.renderer,
                    &mut engine.objects,
                )
                .map_err(|e| eyre!("{e}"))?;
            }
        }

        Ok(Self {
            engine,
            simulation,
            viewport,
            frame_rate: 60,
            markers,
        })
    }

    /// Steps per second. Frames drawn in between leave the bodies where they are.
    #[must_use]
    pub fn frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Run until the window is closed.
    ///
    /// If a step fails the bodies stay where they are and the error is reported once.
    pub fn visualize(self) -> Result<()> {
        let Self {
            mut engine,
            mut simulation,
            viewport,
            frame_rate,
            markers,
        } = self;

        let names: Vec<String> = simulation
            .bodies()
            .iter()
            .enumerate()
            .map(|(i, b)| b.display_name(i))
            .collect();
        let mut scene = Scene::new(markers);
        let mut clock = FrameClock::new(frame_rate);
        let mut caption_clock = FrameClock::new(4);
        let mut halted = false;

        engine
            .update_loop(move |_, _, objects, _, _, _| {
                let now = Instant::now();
                if halted || !clock.tick(now) {
                    return;
                }

                let frame = simulation
                    .advance_frame(&viewport, &mut scene)
                    .map_err(|e| eyre!("{e}"))
                    .and_then(|()| {
                        scene.sprites().iter().enumerate().try_for_each(|(i, sprite)| {
                            sync_sprite(objects, &viewport, i, sprite, markers)
                        })
                    });
                if let Err(e) = frame {
                    eprintln!("\nstopping after {} steps: {e}", simulation.steps());
                    halted = true;
                    return;
                }

                if caption_clock.tick(now) {
                    let mut stdout = io::stdout().lock();
                    // a closed stdout only loses the labels
                    let _ = write!(stdout, "\r{}", caption(&scene, &names));
                    let _ = stdout.flush();
                }
            })
            .map_err(|e| eyre!("{e}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_are_per_body() {
        assert_eq!(object_name(0), "body0");
        assert_eq!(object_name(12), "body12");
        assert_eq!(marker_name(1, 7), "body1_trail7");
    }

    #[test]
    fn device_corners() {
        let viewport = Viewport::default();

        assert_eq!(to_device(&viewport, &Vector2::new(0., 0.)), (-1., 1.));
        assert_eq!(to_device(&viewport, &Vector2::new(400., 400.)), (0., 0.));
        assert_eq!(to_device(&viewport, &Vector2::new(800., 800.)), (1., -1.));
    }

    #[test]
    fn caption_names_labeled_bodies() {
        let sim = crate::Scenario::solar_system().build().unwrap();
        let names: Vec<String> = sim.bodies().iter().map(|b| b.name().to_owned()).collect();
        let mut scene = Scene::default();

        sim.render(&Viewport::default(), &mut scene).unwrap();

        assert_eq!(
            caption(&scene, &names),
            "Mercury: 0.0 km, Venus: 0.0 km, Earth: 0.0 km, Mars: 0.0 km"
        );
    }
}
