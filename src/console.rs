use std::io::{self, Write};

use nalgebra::Vector2;

use crate::{Color, Simulation, Surface};

/// Writes the distance labels of a frame as one line, e.g.
/// `  Mercury: 57900000.0 km, Venus: 108200000.0 km`.
///
/// Text has no lines to draw, so trails are left to the CSV export.
pub struct Console<W> {
    writer: W,
    names: Vec<String>,
    line: String,
}

impl Console<io::Stdout> {
    pub fn stdout(simulation: &Simulation) -> Self {
        Self::new(io::stdout(), simulation)
    }
}

impl<W: Write> Console<W> {
    pub fn new(writer: W, simulation: &Simulation) -> Self {
        let names = simulation
            .bodies()
            .iter()
            .enumerate()
            .map(|(i, b)| b.display_name(i))
            .collect();

        Self {
            writer,
            names,
            line: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Surface for Console<W> {
    type Error = io::Error;

    fn begin_frame(&mut self, _background: Color) -> io::Result<()> {
        self.line.clear();
        Ok(())
    }

    fn circle(&mut self, _: usize, _: Vector2<f64>, _: f64, _: Color) -> io::Result<()> {
        Ok(())
    }

    fn polyline(&mut self, _: usize, _: &[Vector2<f64>], _: f64, _: Color) -> io::Result<()> {
        Ok(())
    }

    fn label(&mut self, body: usize, _anchor: Vector2<f64>, text: &str) -> io::Result<()> {
        if !self.line.is_empty() {
            self.line.push_str(", ");
        }
        match self.names.get(body) {
            Some(name) => self.line.push_str(&format!("{name}: {text}")),
            None => self.line.push_str(&format!("body {body}: {text}")),
        }
        Ok(())
    }

    fn end_frame(&mut self) -> io::Result<()> {
        writeln!(self.writer, "  {}", self.line)?;
        self.writer.flush()
    }
}
