use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndividualId(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub protocol_version: u32,
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            payload,
        }
    }
}

/// Survival zone evaluated against each individual's final position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionZone {
    RightHalf,
    LeftHalf,
    CenterCircle,
    Corners,
    RightQuarter,
}

impl SelectionZone {
    pub const ALL: [SelectionZone; 5] = [
        SelectionZone::RightHalf,
        SelectionZone::LeftHalf,
        SelectionZone::CenterCircle,
        SelectionZone::Corners,
        SelectionZone::RightQuarter,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sensor {
    LocX,
    LocY,
    BoundaryDist,
    Age,
    LastMoveDirX,
    LastMoveDirY,
    Random,
    NearestEdgeX,
    NearestEdgeY,
    PopulationDensity,
    BlockedForward,
    Oscillator,
}

impl Sensor {
    pub const ALL: [Sensor; 12] = [
        Sensor::LocX,
        Sensor::LocY,
        Sensor::BoundaryDist,
        Sensor::Age,
        Sensor::LastMoveDirX,
        Sensor::LastMoveDirY,
        Sensor::Random,
        Sensor::NearestEdgeX,
        Sensor::NearestEdgeY,
        Sensor::PopulationDensity,
        Sensor::BlockedForward,
        Sensor::Oscillator,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    MoveX,
    MoveY,
    MoveForward,
    MoveRandom,
    SetResponsiveness,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MoveX,
        Action::MoveY,
        Action::MoveForward,
        Action::MoveRandom,
        Action::SetResponsiveness,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub population_size: u32,
    pub genome_length: u32,
    pub internal_neurons: u32,
    pub steps_per_generation: u32,
    /// Per-bit point mutation probability applied to every child gene.
    pub mutation_rate: f32,
    /// Host loop pacing only; irrelevant to core correctness.
    pub steps_per_second: u32,
    pub selection_zone: SelectionZone,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_width: 128,
            grid_height: 128,
            population_size: 1000,
            genome_length: 24,
            internal_neurons: 3,
            steps_per_generation: 300,
            mutation_rate: 0.01,
            steps_per_second: 30,
            selection_zone: SelectionZone::RightQuarter,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EdgeSource {
    Sensor(Sensor),
    Internal(u32),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EdgeSink {
    Internal(u32),
    Action(Action),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BrainEdgeView {
    pub source: EdgeSource,
    pub sink: EdgeSink,
    pub weight: f32,
}

/// Full brain structure of one individual, exposed so an external
/// viewer can render sensor -> neuron -> action diagrams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrainInspection {
    pub id: IndividualId,
    pub x: i32,
    pub y: i32,
    pub color: [u8; 3],
    pub edges: Vec<BrainEdgeView>,
    /// Internal-neuron outputs from the last evaluated step.
    pub neuron_outputs: Vec<f32>,
    pub sensor_readings: Vec<f32>,
    pub action_activations: Vec<f32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndividualSnapshot {
    pub id: IndividualId,
    pub x: i32,
    pub y: i32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenerationStats {
    pub generation: u32,
    pub population: u32,
    pub survivors: u32,
    pub survival_rate: f32,
    /// True when zero survivors forced a restart from random genomes.
    pub extinction_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub generation: u32,
    pub step: u32,
    pub rng_seed: u64,
    pub config: SimConfig,
    pub individuals: Vec<IndividualSnapshot>,
    pub last_survival_rate: Option<f32>,
    pub history: Vec<GenerationStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum ClientCommand {
    Start { config: SimConfig, seed: u64 },
    Pause,
    Resume,
    Reset,
    Step { count: u32 },
    Inspect { count: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    StateSnapshot(WorldSnapshot),
    GenerationCompleted(GenerationStats),
    Inspection(Vec<BrainInspection>),
    Error(ApiError),
}
