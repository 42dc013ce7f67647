use nalgebra::Vector2;

use crate::{body::Color, viewport::Viewport, Body};

/// Offset of a distance label from its body's screen position, in pixels.
pub const LABEL_OFFSET: [f64; 2] = [50., -30.];

/// Trail width in pixels.
pub const TRAIL_WIDTH: f64 = 2.;

/// Where a frame ends up.
///
/// All coordinates are in screen pixels. Calls are addressed by body index,
/// so retained-mode backends can keep one object per body.
pub trait Surface {
    type Error;

    /// Clear the screen to `background`.
    fn begin_frame(&mut self, _background: Color) -> Result<(), Self::Error> {
        Ok(())
    }

    fn circle(
        &mut self,
        body: usize,
        center: Vector2<f64>,
        radius: f64,
        color: Color,
    ) -> Result<(), Self::Error>;

    /// An open polyline through `points`.
    fn polyline(
        &mut self,
        body: usize,
        points: &[Vector2<f64>],
        width: f64,
        color: Color,
    ) -> Result<(), Self::Error>;

    /// Text centered on `anchor`.
    fn label(&mut self, body: usize, anchor: Vector2<f64>, text: &str) -> Result<(), Self::Error>;

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Distance label in kilometers, rounded to one decimal.
pub fn distance_label(distance: f64) -> String {
    format!("{:.1} km", distance / 1000.)
}

/// Draw one body: trail, disc, and for non-reference bodies the distance label.
pub fn render_body<S: Surface>(
    index: usize,
    body: &Body,
    viewport: &Viewport,
    surface: &mut S,
) -> Result<(), S::Error> {
    let center = viewport.to_screen(body.position());

    if body.trail().len() > 2 {
        let points: Vec<_> = body.trail().iter().map(|p| viewport.to_screen(p)).collect();
        surface.polyline(index, &points, TRAIL_WIDTH, body.color())?;
    }

    surface.circle(index, center, body.radius(), body.color())?;

    if !body.is_reference() {
        surface.label(
            index,
            center + Vector2::from(LABEL_OFFSET),
            &distance_label(body.distance_to_reference()),
        )?;
    }

    Ok(())
}

/// Draw a whole frame.
pub fn render<S: Surface>(
    bodies: &[Body],
    viewport: &Viewport,
    surface: &mut S,
) -> Result<(), S::Error> {
    surface.begin_frame(Color::BLACK)?;
    for (i, body) in bodies.iter().enumerate() {
        render_body(i, body, viewport, surface)?;
    }
    surface.end_frame()
}
