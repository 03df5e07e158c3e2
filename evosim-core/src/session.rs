use crate::Simulation;
use evosim_protocol::{
    ApiError, ClientCommand, GenerationStats, SessionEvent, SessionState,
};

/// Command state machine wrapping one optional run. Hosts drive it by
/// calling `advance` at their own pace and feeding in commands between
/// calls; commands therefore always take effect at step granularity,
/// never mid-step.
#[derive(Debug, Default)]
pub struct Session {
    simulation: Option<Simulation>,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            simulation: None,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn handle(&mut self, command: ClientCommand) -> Vec<SessionEvent> {
        match command {
            ClientCommand::Start { config, seed } => match Simulation::new(config, seed) {
                Ok(simulation) => {
                    let snapshot = simulation.snapshot();
                    self.simulation = Some(simulation);
                    self.state = SessionState::Running;
                    vec![SessionEvent::StateSnapshot(snapshot)]
                }
                Err(err) => vec![error_event("invalid_config", err.to_string())],
            },
            ClientCommand::Pause => {
                if self.simulation.is_some() {
                    self.state = SessionState::Paused;
                    Vec::new()
                } else {
                    vec![error_event("no_run", "pause requires a started run")]
                }
            }
            ClientCommand::Resume => {
                if self.simulation.is_some() {
                    self.state = SessionState::Running;
                    Vec::new()
                } else {
                    vec![error_event("no_run", "resume requires a started run")]
                }
            }
            ClientCommand::Reset => {
                self.simulation = None;
                self.state = SessionState::Idle;
                Vec::new()
            }
            ClientCommand::Step { count } => match self.simulation.as_mut() {
                Some(simulation) => {
                    let mut events: Vec<SessionEvent> = simulation
                        .step_n(count.max(1))
                        .into_iter()
                        .map(SessionEvent::GenerationCompleted)
                        .collect();
                    events.push(SessionEvent::StateSnapshot(simulation.snapshot()));
                    events
                }
                None => vec![error_event("no_run", "step requires a started run")],
            },
            ClientCommand::Inspect { count } => match self.simulation.as_ref() {
                Some(simulation) => vec![SessionEvent::Inspection(simulation.inspect(count))],
                None => vec![error_event("no_run", "inspect requires a started run")],
            },
        }
    }

    /// One host tick: advances a single step while running. Returns the
    /// completed generation's stats when the step crossed a boundary.
    pub fn advance(&mut self) -> Option<GenerationStats> {
        if self.state != SessionState::Running {
            return None;
        }
        self.simulation.as_mut().and_then(Simulation::step)
    }
}

fn error_event(code: &str, message: impl Into<String>) -> SessionEvent {
    SessionEvent::Error(ApiError {
        code: code.to_owned(),
        message: message.into(),
    })
}
