pub(super) use super::*;
pub(super) use crate::brain::{Sink, Source};
pub(super) use crate::gene::{SinkKind, SourceKind};
pub(super) use crate::grid::Grid;
pub(super) use crate::individual::{Individual, StepContext};
pub(super) use evosim_protocol::{
    Action, ApiError, ClientCommand, IndividualId, SelectionZone, Sensor, SessionEvent,
    SessionState, SimConfig,
};
pub(super) use rand::SeedableRng;
pub(super) use rand_chacha::ChaCha8Rng;

mod sensing_and_actions;
mod support;
