use std::f64::consts::TAU;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::Vector2;
use planet_sim::{
    gravity::{AU, G},
    Body, Scenario, Simulation,
};

/// A star with `n - 1` light bodies on circular orbits spread over 0.3 to 3 AU.
fn ring(n: usize) -> Simulation {
    let star_mass = 2e30;
    let mut bodies = vec![Body::new(star_mass, Vector2::zeros(), Vector2::zeros())
        .unwrap()
        .reference()];

    for i in 1..n {
        let angle = TAU * i as f64 / n as f64;
        let r = AU * (0.3 + 2.7 * i as f64 / n as f64);
        let speed = (G * star_mass / r).sqrt();
        let direction = Vector2::new(angle.cos(), angle.sin());
        let tangent = Vector2::new(-direction.y, direction.x);
        bodies.push(Body::new(1e23, direction * r, tangent * speed).unwrap());
    }

    Simulation::new(bodies).unwrap()
}

fn step_bodies(c: &mut Criterion) {
    let mut group = c.benchmark_group("step bodies");
    for n in [5, 50, 200] {
        group.bench_with_input(BenchmarkId::new("direct", n), &n, |b, &n| {
            b.iter_batched_ref(
                || ring(n),
                |sim| sim.simulate(10).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
}

fn solar_system_year(c: &mut Criterion) {
    let scenario = Scenario::solar_system();

    c.bench_function("solar system year", |b| {
        b.iter_batched_ref(
            || scenario.build().unwrap(),
            |sim| {
                for _ in 0..365 {
                    sim.step().unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, step_bodies, solar_system_year);
criterion_main!(benches);
