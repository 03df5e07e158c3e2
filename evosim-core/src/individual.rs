use crate::brain::{Brain, BrainScratch, NUM_ACTIONS, NUM_SENSORS};
use crate::genome::Genome;
use crate::grid::Grid;
use evosim_protocol::{Action, IndividualId, Sensor};

const RNG_GENERATION_MIX: u64 = 0x9E37_79B9_7F4A_7C15;
const RNG_STEP_MIX: u64 = 0xBF58_476D_1CE4_E5B9;
const RNG_INDIVIDUAL_MIX: u64 = 0x94D0_49BB_1331_11EB;
const RNG_STREAM_MIX: u64 = 0xD6E8_FF3A_5A9C_31F1;

// Per-step random streams, one per independent draw.
const STREAM_RANDOM_SENSOR: u64 = 0;
const STREAM_MOVE_X: u64 = 1;
const STREAM_MOVE_Y: u64 = 2;
const STREAM_MOVE_FORWARD: u64 = 3;
const STREAM_MOVE_RANDOM: u64 = 4;
const STREAM_MOVE_RANDOM_DX: u64 = 5;
const STREAM_MOVE_RANDOM_DY: u64 = 6;

const INITIAL_RESPONSIVENESS: f32 = 0.5;

/// Immutable per-step inputs shared by every individual, letting the
/// sense -> think -> act phase run data-parallel with all randomness
/// derived by hashing rather than drawn from a shared rng.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepContext {
    pub(crate) seed: u64,
    pub(crate) generation: u32,
    pub(crate) step: u32,
    pub(crate) steps_per_generation: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct Individual {
    pub(crate) id: IndividualId,
    pub(crate) genome: Genome,
    pub(crate) brain: Brain,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) last_dx: i32,
    pub(crate) last_dy: i32,
    pub(crate) age: u32,
    pub(crate) responsiveness: f32,
    /// Internal-neuron outputs carried across steps (previous-step read
    /// discipline for cyclic graphs).
    pub(crate) neuron_outputs: Vec<f32>,
    pub(crate) last_sensors: [f32; NUM_SENSORS],
    pub(crate) last_actions: [f32; NUM_ACTIONS],
}

impl Individual {
    pub(crate) fn new(
        id: IndividualId,
        genome: Genome,
        x: i32,
        y: i32,
        internal_neurons: u32,
    ) -> Self {
        let brain = Brain::express(&genome, internal_neurons);
        Self {
            id,
            genome,
            brain,
            x,
            y,
            last_dx: 0,
            last_dy: 0,
            age: 0,
            responsiveness: INITIAL_RESPONSIVENESS,
            neuron_outputs: vec![0.0; internal_neurons as usize],
            last_sensors: [0.0; NUM_SENSORS],
            last_actions: [0.0; NUM_ACTIONS],
        }
    }

    /// One full sense -> think -> act step. Reads only `grid`'s pre-move
    /// occupancy snapshot and this individual's own state, so steps for
    /// different individuals commute.
    pub(crate) fn step(&mut self, grid: &Grid, ctx: StepContext, scratch: &mut BrainScratch) {
        let sensors = self.compute_sensors(grid, ctx);
        let actions = self
            .brain
            .evaluate(&sensors, &mut self.neuron_outputs, scratch);
        self.last_sensors = sensors;
        self.last_actions = actions;
        self.apply_actions(&actions, grid, ctx);
        self.age = self.age.saturating_add(1);
    }

    /// All readings normalized into [0, 1] before they reach the brain.
    pub(crate) fn compute_sensors(&self, grid: &Grid, ctx: StepContext) -> [f32; NUM_SENSORS] {
        let mut sensors = [0.0f32; NUM_SENSORS];
        let max_x = (grid.width() - 1).max(1) as f32;
        let max_y = (grid.height() - 1).max(1) as f32;
        let steps = ctx.steps_per_generation.max(1) as f32;

        sensors[Sensor::LocX as usize] = self.x as f32 / max_x;
        sensors[Sensor::LocY as usize] = self.y as f32 / max_y;

        let edge_dist = self
            .x
            .min(self.y)
            .min(grid.width() - 1 - self.x)
            .min(grid.height() - 1 - self.y);
        let max_edge_dist = (grid.width().min(grid.height()) / 2).max(1);
        sensors[Sensor::BoundaryDist as usize] = edge_dist as f32 / max_edge_dist as f32;

        sensors[Sensor::Age as usize] = ctx.step as f32 / steps;
        sensors[Sensor::LastMoveDirX as usize] = (self.last_dx + 1) as f32 / 2.0;
        sensors[Sensor::LastMoveDirY as usize] = (self.last_dy + 1) as f32 / 2.0;
        sensors[Sensor::Random as usize] = self.sample_unit(ctx, STREAM_RANDOM_SENSOR);

        sensors[Sensor::NearestEdgeX as usize] = if self.x <= grid.width() - 1 - self.x {
            0.0
        } else {
            1.0
        };
        sensors[Sensor::NearestEdgeY as usize] = if self.y <= grid.height() - 1 - self.y {
            0.0
        } else {
            1.0
        };

        sensors[Sensor::PopulationDensity as usize] =
            grid.occupied_neighbor_cells(self.x, self.y) as f32 / 4.0;

        let forward = (self.x + self.last_dx, self.y + self.last_dy);
        sensors[Sensor::BlockedForward as usize] =
            if !grid.in_bounds(forward.0, forward.1) || grid.is_occupied(forward.0, forward.1) {
                1.0
            } else {
                0.0
            };

        let phase = std::f32::consts::TAU * ctx.step as f32 / steps;
        sensors[Sensor::Oscillator as usize] = (phase.sin() + 1.0) / 2.0;

        sensors
    }

    /// Combines the movement actions into one proposed displacement,
    /// clamps each axis to one cell and the landing position to the
    /// grid, then applies it. Occupancy is not an exclusion constraint,
    /// so no collision handling happens here.
    fn apply_actions(&mut self, actions: &[f32; NUM_ACTIONS], grid: &Grid, ctx: StepContext) {
        let mut dx = 0i32;
        let mut dy = 0i32;

        let move_x = actions[Action::MoveX as usize];
        if self.fires(move_x, ctx, STREAM_MOVE_X) {
            dx += if move_x > 0.0 { 1 } else { -1 };
        }

        let move_y = actions[Action::MoveY as usize];
        if self.fires(move_y, ctx, STREAM_MOVE_Y) {
            dy += if move_y > 0.0 { 1 } else { -1 };
        }

        if self.fires(actions[Action::MoveForward as usize], ctx, STREAM_MOVE_FORWARD) {
            dx += self.last_dx;
            dy += self.last_dy;
        }

        if self.fires(actions[Action::MoveRandom as usize], ctx, STREAM_MOVE_RANDOM) {
            dx += unit_offset(self.sample_unit(ctx, STREAM_MOVE_RANDOM_DX));
            dy += unit_offset(self.sample_unit(ctx, STREAM_MOVE_RANDOM_DY));
        }

        // Responsiveness rescales from tanh output to [0, 1] and blends
        // toward the requested level rather than jumping to it.
        let requested = (actions[Action::SetResponsiveness as usize] + 1.0) / 2.0;
        self.responsiveness = (self.responsiveness + requested) / 2.0;

        dx = dx.clamp(-1, 1);
        dy = dy.clamp(-1, 1);
        if dx == 0 && dy == 0 {
            return;
        }

        let (new_x, new_y) = grid.clamp(self.x + dx, self.y + dy);
        if (new_x, new_y) == (self.x, self.y) {
            return;
        }
        self.last_dx = new_x - self.x;
        self.last_dy = new_y - self.y;
        self.x = new_x;
        self.y = new_y;
    }

    /// Action firing: probability is signal magnitude scaled by the
    /// individual's current responsiveness.
    fn fires(&self, signal: f32, ctx: StepContext, stream: u64) -> bool {
        let probability = signal.abs() * self.responsiveness;
        self.sample_unit(ctx, stream) < probability
    }

    fn sample_unit(&self, ctx: StepContext, stream: u64) -> f32 {
        sample_unit(ctx, self.id, stream)
    }
}

/// Deterministic draw in [0, 1) keyed by (seed, generation, step,
/// individual, stream); identical across runs and thread schedules.
fn sample_unit(ctx: StepContext, id: IndividualId, stream: u64) -> f32 {
    let mixed = ctx.seed
        ^ (u64::from(ctx.generation) + 1).wrapping_mul(RNG_GENERATION_MIX)
        ^ (u64::from(ctx.step) + 1).wrapping_mul(RNG_STEP_MIX)
        ^ (u64::from(id.0) + 1).wrapping_mul(RNG_INDIVIDUAL_MIX)
        ^ (stream + 1).wrapping_mul(RNG_STREAM_MIX);
    let sample = (mix_u64(mixed) >> 40) as u32;
    sample as f32 / (1u32 << 24) as f32
}

fn unit_offset(sample: f32) -> i32 {
    // Uniform over {-1, 0, 1}.
    (sample * 3.0) as i32 - 1
}

fn mix_u64(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^= value >> 31;
    value
}
