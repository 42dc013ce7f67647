use nalgebra::Vector2;

use crate::gravity::AU;

/// Maps physical coordinates (meters) to screen pixels.
///
/// The origin is drawn at the center of the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Pixels per meter.
    pub scale: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixels_per_au: f64) -> Self {
        Self {
            width,
            height,
            scale: pixels_per_au / AU,
        }
    }

    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(self.width / 2., self.height / 2.)
    }

    pub fn to_screen(&self, position: &Vector2<f64>) -> Vector2<f64> {
        position * self.scale + self.center()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800., 800., 150.)
    }
}
