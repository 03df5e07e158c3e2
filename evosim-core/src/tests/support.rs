use super::*;

/// Small grid, short generations, mutation off. Most tests start here
/// and override the fields they care about.
pub(super) fn test_config() -> SimConfig {
    SimConfig {
        grid_width: 16,
        grid_height: 16,
        population_size: 20,
        genome_length: 8,
        internal_neurons: 2,
        steps_per_generation: 10,
        mutation_rate: 0.0,
        steps_per_second: 30,
        selection_zone: SelectionZone::RightHalf,
    }
}

pub(super) fn sensor_to_action(sensor: Sensor, action: Action, weight: f32) -> Gene {
    Gene::from_parts(
        SourceKind::Sensor,
        sensor as u32,
        SinkKind::Action,
        action as u32,
        weight,
    )
}

/// Genome whose brain saturates `action` to +/-1 whenever `sensor`
/// reads well above zero. Three stacked max-weight genes push the
/// pre-activation past tanh's f32 saturation point.
pub(super) fn saturating_genome(pairs: &[(Sensor, Action, f32)]) -> Genome {
    let mut genes = Vec::new();
    for &(sensor, action, sign) in pairs {
        for _ in 0..3 {
            genes.push(sensor_to_action(sensor, action, sign * WEIGHT_LIMIT));
        }
    }
    Genome::new(genes)
}

pub(super) fn connection_weight(brain: &Brain, source: Source, sink: Sink) -> Option<f32> {
    brain
        .connections()
        .iter()
        .find(|connection| connection.source == source && connection.sink == sink)
        .map(|connection| connection.weight)
}

pub(super) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}",
    );
}
