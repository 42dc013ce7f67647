use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use nalgebra::{DMatrix, Vector2};

use crate::{Body, Simulation};

fn column_name(body: &Body, i: usize) -> String {
    if body.name().is_empty() {
        i.to_string()
    } else {
        body.name().to_owned()
    }
}

fn write_header(writer: &mut impl Write, bodies: &[Body]) -> io::Result<()> {
    write!(writer, "t")?;
    for (i, body) in bodies.iter().enumerate() {
        let name = column_name(body, i);
        write!(writer, ",x_{name},y_{name}")?;
    }
    writeln!(writer)
}

/// Write the output of [`Simulation::simulate`] with one row per time step.
pub fn write_positions(
    writer: &mut impl Write,
    bodies: &[Body],
    positions: &DMatrix<Vector2<f64>>,
) -> io::Result<()> {
    write_header(writer, bodies)?;

    for (t, row) in positions.row_iter().enumerate() {
        write!(writer, "{t}")?;
        for p in row.iter() {
            write!(writer, ",{},{}", p.x, p.y)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write the trails of all bodies, one row per step still held in the trails.
pub fn write_trails(writer: &mut impl Write, simulation: &Simulation) -> io::Result<()> {
    let bodies = simulation.bodies();
    write_header(writer, bodies)?;

    let len = bodies.iter().map(|b| b.trail().len()).min().unwrap_or(0);
    let first_step = simulation.steps() + 1 - len;

    let mut trails: Vec<_> = bodies
        .iter()
        .map(|b| b.trail().iter().skip(b.trail().len() - len))
        .collect();
    for t in first_step..first_step + len {
        write!(writer, "{t}")?;
        for trail in &mut trails {
            if let Some(p) = trail.next() {
                write!(writer, ",{},{}", p.x, p.y)?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Like [`write_positions`], into a new file at `path`.
pub fn write_csv_positions(
    bodies: &[Body],
    positions: &DMatrix<Vector2<f64>>,
    path: impl AsRef<Path>,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_positions(&mut file, bodies, positions)?;
    file.flush()
}

/// Like [`write_trails`], into a new file at `path`.
pub fn write_csv_trails(simulation: &Simulation, path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_trails(&mut file, simulation)?;
    file.flush()
}
