use crate::brain::BrainScratch;
use crate::genome::Genome;
use crate::individual::{Individual, StepContext};
use crate::Simulation;
use evosim_protocol::{GenerationStats, IndividualId, SelectionZone};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

impl Simulation {
    /// Places a full population for the genome pool. Placement is
    /// independent of parent positions: every individual gets a fresh
    /// uniform-random open cell.
    pub(crate) fn spawn_generation(&mut self, genomes: Vec<Genome>) {
        debug_assert_eq!(
            genomes.len(),
            self.config.population_size as usize,
            "genome pool must match the configured population size",
        );

        self.grid.clear();
        self.individuals.clear();
        self.step_in_generation = 0;

        let internal_neurons = self.config.internal_neurons;
        for (idx, genome) in genomes.into_iter().enumerate() {
            let (x, y) = self.random_open_cell();
            self.grid.place(x, y);
            self.individuals.push(Individual::new(
                IndividualId(idx as u32),
                genome,
                x,
                y,
                internal_neurons,
            ));
        }
    }

    pub(crate) fn random_genome_pool(&mut self) -> Vec<Genome> {
        let length = self.config.genome_length;
        (0..self.config.population_size)
            .map(|_| Genome::random(length, &mut self.rng))
            .collect()
    }

    /// Rejection sampling for an unoccupied cell. Config validation
    /// caps the population at the cell count, so this terminates.
    fn random_open_cell(&mut self) -> (i32, i32) {
        loop {
            let x = self.rng.random_range(0..self.grid.width());
            let y = self.rng.random_range(0..self.grid.height());
            if !self.grid.is_occupied(x, y) {
                return (x, y);
            }
        }
    }

    /// One simulation step for the whole population. Every individual
    /// senses and acts against the same pre-move occupancy snapshot;
    /// per-individual randomness is hash-derived, so the parallel phase
    /// is deterministic regardless of worker scheduling. Occupancy is
    /// rebuilt once after all moves commit.
    pub(crate) fn run_step(&mut self) {
        let ctx = StepContext {
            seed: self.seed,
            generation: self.generation,
            step: self.step_in_generation,
            steps_per_generation: self.config.steps_per_generation,
        };

        let grid = &self.grid;
        self.individuals
            .par_iter_mut()
            .for_each_init(BrainScratch::new, |scratch, individual| {
                individual.step(grid, ctx, scratch);
            });

        let positions: Vec<(i32, i32)> = self
            .individuals
            .iter()
            .map(|individual| (individual.x, individual.y))
            .collect();
        self.grid.rebuild(positions);

        self.step_in_generation += 1;
        self.debug_assert_consistent_state();
    }

    /// Selection and reproduction at the generation boundary: evaluate
    /// the survival zone over final positions, derive the next genome
    /// pool, and replace the population wholesale.
    pub(crate) fn finish_generation(&mut self) -> GenerationStats {
        let zone = self.config.selection_zone;
        let (width, height) = (self.grid.width(), self.grid.height());
        let survivor_indices: Vec<usize> = self
            .individuals
            .iter()
            .enumerate()
            .filter(|(_, individual)| in_zone(zone, individual.x, individual.y, width, height))
            .map(|(idx, _)| idx)
            .collect();

        let population = self.individuals.len() as u32;
        let survivors = survivor_indices.len() as u32;
        let stats = GenerationStats {
            generation: self.generation,
            population,
            survivors,
            survival_rate: survivors as f32 / population.max(1) as f32,
            extinction_fallback: survivor_indices.is_empty(),
        };
        debug!(
            generation = stats.generation,
            survivors = stats.survivors,
            survival_rate = stats.survival_rate,
            "generation complete",
        );

        let next_pool = self.reproduce(&survivor_indices);
        self.history.push(stats);
        self.generation += 1;
        self.spawn_generation(next_pool);
        stats
    }

    /// Parent sampling is uniform with replacement over the survivor
    /// set; a lone survivor therefore self-crosses into clones that
    /// still pick up per-bit mutation. Zero survivors fall back to a
    /// fresh random pool rather than crashing the run.
    fn reproduce(&mut self, survivor_indices: &[usize]) -> Vec<Genome> {
        if survivor_indices.is_empty() {
            warn!(
                generation = self.generation,
                "no survivors; restarting pool from random genomes",
            );
            return self.random_genome_pool();
        }

        let rate = self.config.mutation_rate;
        let population = self.config.population_size as usize;
        let rng = &mut self.rng;
        let individuals = &self.individuals;

        let mut pool = Vec::with_capacity(population);
        for _ in 0..population {
            let a = &individuals[survivor_indices[rng.random_range(0..survivor_indices.len())]];
            let b = &individuals[survivor_indices[rng.random_range(0..survivor_indices.len())]];
            let child = Genome::crossover(&a.genome, &b.genome, rng).mutated(rate, rng);
            pool.push(child);
        }
        pool
    }
}

/// Survival predicates: pure functions of final position and grid
/// dimensions.
pub fn in_zone(zone: SelectionZone, x: i32, y: i32, width: i32, height: i32) -> bool {
    match zone {
        SelectionZone::RightHalf => x >= width / 2,
        SelectionZone::LeftHalf => x < width / 2,
        SelectionZone::RightQuarter => x >= width * 3 / 4,
        SelectionZone::CenterCircle => {
            let cx = width as f32 / 2.0;
            let cy = height as f32 / 2.0;
            let radius = width.min(height) as f32 / 4.0;
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            dx * dx + dy * dy <= radius * radius
        }
        SelectionZone::Corners => {
            let quarter_w = width / 4;
            let quarter_h = height / 4;
            (x < quarter_w || x >= width - quarter_w)
                && (y < quarter_h || y >= height - quarter_h)
        }
    }
}
