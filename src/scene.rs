use std::convert::Infallible;

use nalgebra::Vector2;

use crate::{Color, Surface};

/// Default number of markers a trail is reduced to.
pub const TRAIL_MARKERS: usize = 48;

/// Everything drawn for one body in the last frame, in screen pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub center: Vector2<f64>,
    pub radius: f64,
    pub color: Color,
    /// Trail reduced to at most the scene's marker count, oldest first.
    pub trail: Vec<Vector2<f64>>,
    pub label: Option<String>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            center: Vector2::zeros(),
            radius: 0.,
            color: Color::WHITE,
            trail: Vec::new(),
            label: None,
        }
    }
}

/// Pick `count` points spread evenly over `points`, keeping the first and the last.
pub fn thin(points: &[Vector2<f64>], count: usize) -> Vec<Vector2<f64>> {
    if points.len() <= count {
        return points.to_vec();
    }

    match count {
        0 => Vec::new(),
        1 => points.last().copied().into_iter().collect(),
        _ => (0..count)
            .map(|k| points[k * (points.len() - 1) / (count - 1)])
            .collect(),
    }
}

/// A frame kept as data, one [`Sprite`] per body.
///
/// Backends with a fixed set of objects (spheres, markers) render into a scene
/// and then move their objects to match it.
#[derive(Clone, Debug)]
pub struct Scene {
    markers: usize,
    background: Color,
    sprites: Vec<Sprite>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(TRAIL_MARKERS)
    }
}

impl Scene {
    /// A scene that keeps at most `markers` points of every trail.
    #[must_use]
    pub fn new(markers: usize) -> Self {
        Self {
            markers,
            background: Color::BLACK,
            sprites: Vec::new(),
        }
    }

    #[must_use]
    pub fn markers(&self) -> usize {
        self.markers
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    #[must_use]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Labels of the last frame as `(body, text)`.
    pub fn labels(&self) -> impl Iterator<Item = (usize, &str)> {
        self.sprites
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.label.as_deref().map(|text| (i, text)))
    }

    fn sprite_mut(&mut self, body: usize) -> &mut Sprite {
        if body >= self.sprites.len() {
            self.sprites.resize_with(body + 1, Sprite::default);
        }
        &mut self.sprites[body]
    }
}

impl Surface for Scene {
    type Error = Infallible;

    fn begin_frame(&mut self, background: Color) -> Result<(), Infallible> {
        self.background = background;
        self.sprites.clear();
        Ok(())
    }

    fn circle(
        &mut self,
        body: usize,
        center: Vector2<f64>,
        radius: f64,
        color: Color,
    ) -> Result<(), Infallible> {
        let sprite = self.sprite_mut(body);
        sprite.center = center;
        sprite.radius = radius;
        sprite.color = color;
        Ok(())
    }

    fn polyline(
        &mut self,
        body: usize,
        points: &[Vector2<f64>],
        _width: f64,
        _color: Color,
    ) -> Result<(), Infallible> {
        let markers = self.markers;
        self.sprite_mut(body).trail = thin(points, markers);
        Ok(())
    }

    fn label(&mut self, body: usize, _anchor: Vector2<f64>, text: &str) -> Result<(), Infallible> {
        self.sprite_mut(body).label = Some(text.to_owned());
        Ok(())
    }
}
