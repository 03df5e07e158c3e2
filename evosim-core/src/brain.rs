use crate::gene::{SinkKind, SourceKind};
use crate::genome::Genome;
use evosim_protocol::{Action, BrainEdgeView, EdgeSink, EdgeSource, Sensor};
use std::collections::BTreeMap;

pub const NUM_SENSORS: usize = Sensor::ALL.len();
pub const NUM_ACTIONS: usize = Action::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    Sensor(u32),
    Internal(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sink {
    Internal(u32),
    Action(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub source: Source,
    pub sink: Sink,
    pub weight: f32,
}

/// Reusable accumulator buffer so per-step evaluation allocates nothing
/// after the first individual on each worker thread.
pub struct BrainScratch {
    pre: Vec<f32>,
}

impl BrainScratch {
    pub fn new() -> Self {
        Self { pre: Vec::new() }
    }
}

impl Default for BrainScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// The evaluable graph expressed from one genome. Built once per
/// individual; owns no mutable simulation state. The graph may contain
/// cycles among internal neurons; evaluation reads previous-step
/// outputs for internal sources, so no cycle handling is ever needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Brain {
    connections: Vec<Connection>,
    internal_count: u32,
}

impl Brain {
    /// Walks the genome once, resolves raw gene indices modulo the live
    /// catalog, drops edges whose endpoint cannot exist (an internal
    /// endpoint when the run has zero internal neurons), and sums the
    /// weights of duplicate (source, sink) pairs.
    pub fn express(genome: &Genome, internal_neurons: u32) -> Self {
        let mut merged: BTreeMap<(Source, Sink), f32> = BTreeMap::new();

        for gene in genome.genes() {
            let record = gene.unpack();
            let source = match record.source_kind {
                SourceKind::Sensor => Source::Sensor(record.source_index % NUM_SENSORS as u32),
                SourceKind::Internal => {
                    if internal_neurons == 0 {
                        continue;
                    }
                    Source::Internal(record.source_index % internal_neurons)
                }
            };
            let sink = match record.sink_kind {
                SinkKind::Action => Sink::Action(record.sink_index % NUM_ACTIONS as u32),
                SinkKind::Internal => {
                    if internal_neurons == 0 {
                        continue;
                    }
                    Sink::Internal(record.sink_index % internal_neurons)
                }
            };
            *merged.entry((source, sink)).or_insert(0.0) += record.weight;
        }

        let connections = merged
            .into_iter()
            .map(|((source, sink), weight)| Connection {
                source,
                sink,
                weight,
            })
            .collect();

        Self {
            connections,
            internal_count: internal_neurons,
        }
    }

    pub fn internal_count(&self) -> u32 {
        self.internal_count
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// One think step. `neurons` holds the previous step's internal
    /// outputs on entry and this step's on return. Internal sources are
    /// read at their previous-step values; action sinks see this step's
    /// internal outputs. All outputs are tanh-squashed into [-1, 1].
    pub fn evaluate(
        &self,
        sensors: &[f32; NUM_SENSORS],
        neurons: &mut [f32],
        scratch: &mut BrainScratch,
    ) -> [f32; NUM_ACTIONS] {
        debug_assert_eq!(neurons.len(), self.internal_count as usize);

        scratch.pre.clear();
        scratch.pre.resize(self.internal_count as usize, 0.0);

        for connection in &self.connections {
            let Sink::Internal(sink_idx) = connection.sink else {
                continue;
            };
            let value = match connection.source {
                Source::Sensor(idx) => sensors[idx as usize],
                Source::Internal(idx) => neurons[idx as usize],
            };
            scratch.pre[sink_idx as usize] += value * connection.weight;
        }

        for (neuron, pre) in neurons.iter_mut().zip(&scratch.pre) {
            *neuron = pre.tanh();
        }

        let mut action_inputs = [0.0f32; NUM_ACTIONS];
        for connection in &self.connections {
            let Sink::Action(sink_idx) = connection.sink else {
                continue;
            };
            let value = match connection.source {
                Source::Sensor(idx) => sensors[idx as usize],
                Source::Internal(idx) => neurons[idx as usize],
            };
            action_inputs[sink_idx as usize] += value * connection.weight;
        }

        action_inputs.map(f32::tanh)
    }

    /// Edge list in the protocol's viewer-facing shape.
    pub fn edge_views(&self) -> Vec<BrainEdgeView> {
        self.connections
            .iter()
            .map(|connection| BrainEdgeView {
                source: match connection.source {
                    Source::Sensor(idx) => EdgeSource::Sensor(Sensor::ALL[idx as usize]),
                    Source::Internal(idx) => EdgeSource::Internal(idx),
                },
                sink: match connection.sink {
                    Sink::Internal(idx) => EdgeSink::Internal(idx),
                    Sink::Action(idx) => EdgeSink::Action(Action::ALL[idx as usize]),
                },
                weight: connection.weight,
            })
            .collect()
    }
}
