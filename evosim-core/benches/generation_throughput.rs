use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evosim_core::Simulation;
use evosim_protocol::{SelectionZone, SimConfig};

fn stable_perf_config() -> SimConfig {
    SimConfig {
        grid_width: 128,
        grid_height: 128,
        population_size: 1_000,
        genome_length: 24,
        internal_neurons: 3,
        steps_per_generation: 300,
        mutation_rate: 0.01,
        steps_per_second: 30,
        selection_zone: SelectionZone::RightQuarter,
    }
}

fn bench_one_generation(c: &mut Criterion) {
    let config = stable_perf_config();
    c.bench_function(
        "generation throughput / 1000 individuals x 300 steps (seed 42)",
        |b| {
            b.iter_batched(
                || Simulation::new(config.clone(), 42).expect("simulation init"),
                |mut sim| black_box(sim.run_generation()),
                criterion::BatchSize::SmallInput,
            );
        },
    );
}

fn bench_step_burst(c: &mut Criterion) {
    let config = stable_perf_config();
    c.bench_function("step throughput / 100 steps (seed 42)", |b| {
        b.iter_batched(
            || Simulation::new(config.clone(), 42).expect("simulation init"),
            |mut sim| black_box(sim.step_n(100)),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_one_generation, bench_step_burst);
criterion_main!(benches);
