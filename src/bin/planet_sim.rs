use std::{path::PathBuf, thread, time::Instant};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use nalgebra::{DMatrix, Vector2};
use planet_sim::{
    csv::{write_csv_positions, write_csv_trails},
    Console, FrameClock, Scenario, Simulation,
};

#[derive(Parser, Debug)]
#[command(about = "Simulate the Sun and the inner planets")]
struct Args {
    /// Scenario file (YAML). Defaults to the built-in inner solar system.
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of time steps (frames) to run.
    #[arg(short = 'n', long, default_value_t = 365)]
    steps: usize,

    /// Print progress and distances every this many steps, 0 to disable.
    #[arg(short, long, default_value_t = 30)]
    report_every: usize,

    /// Keep only this many positions per trail.
    #[arg(long)]
    trail_limit: Option<usize>,

    /// Write the trails to this CSV file when done.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write every position from the start, one row per step, to this CSV file.
    #[arg(long)]
    csv_positions: Option<PathBuf>,

    /// Pace the steps at the scenario's frame rate.
    #[arg(long)]
    realtime: bool,

    /// Open a window instead of running headless.
    #[cfg(feature = "visualization")]
    #[arg(long)]
    visualize: bool,
}

fn record(positions: &mut DMatrix<Vector2<f64>>, t: usize, simulation: &Simulation) {
    for (i, body) in simulation.bodies().iter().enumerate() {
        positions[(t, i)] = *body.position();
    }
}

fn run_headless(mut simulation: Simulation, scenario: &Scenario, args: &Args) -> Result<()> {
    let viewport = scenario.viewport();
    let clock = FrameClock::new(scenario.frame_rate);
    let mut console = Console::stdout(&simulation);

    let mut positions = args.csv_positions.as_ref().map(|_| {
        DMatrix::from_element(args.steps + 1, simulation.bodies().len(), Vector2::zeros())
    });
    if let Some(positions) = &mut positions {
        record(positions, 0, &simulation);
    }

    for t in 1..=args.steps {
        let start = Instant::now();

        if args.report_every > 0 && t % args.report_every == 0 {
            println!("{t} out of {} time steps done.", args.steps);
            simulation
                .advance_frame(&viewport, &mut console)
                .wrap_err_with(|| format!("frame {t} failed"))?;
        } else {
            simulation
                .step()
                .wrap_err_with(|| format!("step {t} failed"))?;
        }

        if let Some(positions) = &mut positions {
            record(positions, t, &simulation);
        }

        if args.realtime {
            thread::sleep(clock.remaining(start, Instant::now()));
        }
    }

    println!(
        "simulated {:.1} days",
        simulation.elapsed() / planet_sim::gravity::TIMESTEP
    );

    if let Some(path) = &args.csv {
        write_csv_trails(&simulation, path)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        println!("wrote trails to {}", path.display());
    }

    if let (Some(path), Some(positions)) = (&args.csv_positions, &positions) {
        write_csv_positions(simulation.bodies(), positions, path)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        println!("wrote positions to {}", path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::from_path(path)
            .wrap_err_with(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::solar_system(),
    };
    if let Some(limit) = args.trail_limit {
        scenario.trail_limit = Some(limit);
    }

    let simulation = scenario.build()?;

    #[cfg(feature = "visualization")]
    if args.visualize {
        return planet_sim::visualization::Visualizer::new(simulation, scenario.viewport())?
            .frame_rate(scenario.frame_rate)
            .visualize();
    }

    run_headless(simulation, &scenario, &args)
}
