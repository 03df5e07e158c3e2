use evosim_protocol::{
    BrainInspection, GenerationStats, IndividualSnapshot, SimConfig, WorldSnapshot,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

mod brain;
mod gene;
mod generation;
mod genome;
mod grid;
mod individual;
mod session;

#[cfg(test)]
mod tests;

pub use brain::{Brain, BrainScratch, Connection, Sink, Source, NUM_ACTIONS, NUM_SENSORS};
pub use gene::{Gene, GeneRecord, SinkKind, SourceKind, WEIGHT_LIMIT};
pub use generation::in_zone;
pub use genome::Genome;
pub use session::Session;

use grid::Grid;
use individual::Individual;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid sim config: {0}")]
    InvalidConfig(String),
}

/// One evolving run: a population on a grid, stepped through
/// generations of sense -> think -> act, selection, and reproduction.
/// Deterministic given (config, seed).
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    seed: u64,
    rng: ChaCha8Rng,
    generation: u32,
    step_in_generation: u32,
    individuals: Vec<Individual>,
    grid: Grid,
    history: Vec<GenerationStats>,
}

impl Simulation {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        validate_config(&config)?;

        let mut sim = Self {
            grid: Grid::new(config.grid_width, config.grid_height),
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            generation: 0,
            step_in_generation: 0,
            individuals: Vec::new(),
            history: Vec::new(),
        };
        let pool = sim.random_genome_pool();
        sim.spawn_generation(pool);
        Ok(sim)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn step_in_generation(&self) -> u32 {
        self.step_in_generation
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    pub fn last_survival_rate(&self) -> Option<f32> {
        self.history.last().map(|stats| stats.survival_rate)
    }

    /// Advances one step; at the generation boundary also runs
    /// selection + reproduction and returns the completed generation's
    /// stats.
    pub fn step(&mut self) -> Option<GenerationStats> {
        self.run_step();
        if self.step_in_generation >= self.config.steps_per_generation {
            Some(self.finish_generation())
        } else {
            None
        }
    }

    pub fn step_n(&mut self, count: u32) -> Vec<GenerationStats> {
        (0..count).filter_map(|_| self.step()).collect()
    }

    pub fn run_generation(&mut self) -> GenerationStats {
        loop {
            if let Some(stats) = self.step() {
                return stats;
            }
        }
    }

    pub fn run_generations(&mut self, count: u32) -> Vec<GenerationStats> {
        (0..count).map(|_| self.run_generation()).collect()
    }

    /// Tears the run down to its initial state; a new seed may be
    /// supplied, otherwise the original is reused.
    pub fn reset(&mut self, seed: Option<u64>) {
        self.seed = seed.unwrap_or(self.seed);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.generation = 0;
        self.step_in_generation = 0;
        self.history.clear();
        let pool = self.random_genome_pool();
        self.spawn_generation(pool);
    }

    /// Read-only view for renderers and the survival graph.
    pub fn snapshot(&self) -> WorldSnapshot {
        let individuals = self
            .individuals
            .iter()
            .map(|individual| IndividualSnapshot {
                id: individual.id,
                x: individual.x,
                y: individual.y,
                color: individual.genome.color(),
            })
            .collect();

        WorldSnapshot {
            generation: self.generation,
            step: self.step_in_generation,
            rng_seed: self.seed,
            config: self.config.clone(),
            individuals,
            last_survival_rate: self.last_survival_rate(),
            history: self.history.clone(),
        }
    }

    /// Exposes up to `count` randomly chosen individuals' full brain
    /// structure for the external inspector. Sampling uses its own
    /// derived rng so inspection never perturbs the run.
    pub fn inspect(&self, count: u32) -> Vec<BrainInspection> {
        let amount = (count as usize).min(self.individuals.len());
        let inspect_seed = self.seed
            ^ (u64::from(self.generation) + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (u64::from(self.step_in_generation) + 1).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        let mut rng = ChaCha8Rng::seed_from_u64(inspect_seed);

        let mut chosen = rand::seq::index::sample(&mut rng, self.individuals.len(), amount)
            .into_vec();
        chosen.sort_unstable();

        chosen
            .into_iter()
            .map(|idx| {
                let individual = &self.individuals[idx];
                BrainInspection {
                    id: individual.id,
                    x: individual.x,
                    y: individual.y,
                    color: individual.genome.color(),
                    edges: individual.brain.edge_views(),
                    neuron_outputs: individual.neuron_outputs.clone(),
                    sensor_readings: individual.last_sensors.to_vec(),
                    action_activations: individual.last_actions.to_vec(),
                }
            })
            .collect()
    }

    fn debug_assert_consistent_state(&self) {
        if cfg!(debug_assertions) {
            debug_assert_eq!(
                self.grid.occupant_count(),
                self.individuals.len(),
                "occupancy counts must cover exactly the population",
            );
            for individual in &self.individuals {
                debug_assert!(
                    self.grid.in_bounds(individual.x, individual.y),
                    "positions must stay within grid bounds",
                );
            }
        }
    }
}

pub fn validate_config(config: &SimConfig) -> Result<(), SimError> {
    if config.grid_width == 0 || config.grid_height == 0 {
        return Err(SimError::InvalidConfig(
            "grid dimensions must be greater than zero".to_owned(),
        ));
    }
    if config.population_size == 0 {
        return Err(SimError::InvalidConfig(
            "population_size must be greater than zero".to_owned(),
        ));
    }
    let cells = config.grid_width as u64 * config.grid_height as u64;
    if u64::from(config.population_size) > cells {
        return Err(SimError::InvalidConfig(format!(
            "population_size must not exceed the {cells} grid cells",
        )));
    }
    if config.genome_length == 0 {
        return Err(SimError::InvalidConfig(
            "genome_length must be greater than zero".to_owned(),
        ));
    }
    if config.steps_per_generation == 0 {
        return Err(SimError::InvalidConfig(
            "steps_per_generation must be greater than zero".to_owned(),
        ));
    }
    if !config.mutation_rate.is_finite() || !(0.0..=1.0).contains(&config.mutation_rate) {
        return Err(SimError::InvalidConfig(
            "mutation_rate must be within [0, 1]".to_owned(),
        ));
    }
    if config.steps_per_second == 0 {
        return Err(SimError::InvalidConfig(
            "steps_per_second must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}
