use super::support::{assert_close, saturating_genome};
use super::*;
use crate::brain::BrainScratch;

fn ctx(step: u32) -> StepContext {
    StepContext {
        seed: 42,
        generation: 0,
        step,
        steps_per_generation: 100,
    }
}

fn lone_individual(grid: &mut Grid, x: i32, y: i32, genome: Genome) -> Individual {
    let individual = Individual::new(IndividualId(0), genome, x, y, 0);
    grid.place(x, y);
    individual
}

fn empty_genome() -> Genome {
    Genome::new(Vec::new())
}

#[test]
fn location_sensors_span_the_unit_interval() {
    let mut grid = Grid::new(100, 50);
    let origin = lone_individual(&mut grid, 0, 0, empty_genome());
    let sensors = origin.compute_sensors(&grid, ctx(0));
    assert_close(sensors[Sensor::LocX as usize], 0.0);
    assert_close(sensors[Sensor::LocY as usize], 0.0);
    assert_close(sensors[Sensor::NearestEdgeX as usize], 0.0);
    assert_close(sensors[Sensor::NearestEdgeY as usize], 0.0);
    assert_close(sensors[Sensor::BoundaryDist as usize], 0.0);

    let far = Individual::new(IndividualId(1), empty_genome(), 99, 49, 0);
    let sensors = far.compute_sensors(&grid, ctx(0));
    assert_close(sensors[Sensor::LocX as usize], 1.0);
    assert_close(sensors[Sensor::LocY as usize], 1.0);
    assert_close(sensors[Sensor::NearestEdgeX as usize], 1.0);
    assert_close(sensors[Sensor::NearestEdgeY as usize], 1.0);
}

#[test]
fn boundary_distance_peaks_at_the_grid_center() {
    let mut grid = Grid::new(20, 20);
    let center = lone_individual(&mut grid, 10, 10, empty_genome());
    let sensors = center.compute_sensors(&grid, ctx(0));
    // min(10, 10, 9, 9) = 9 cells from an edge, normalized by half the
    // shorter dimension.
    assert_close(sensors[Sensor::BoundaryDist as usize], 0.9);
}

#[test]
fn age_and_oscillator_track_the_step_counter() {
    let mut grid = Grid::new(16, 16);
    let individual = lone_individual(&mut grid, 4, 4, empty_genome());

    let at_start = individual.compute_sensors(&grid, ctx(0));
    assert_close(at_start[Sensor::Age as usize], 0.0);
    assert_close(at_start[Sensor::Oscillator as usize], 0.5);

    let quarter = individual.compute_sensors(&grid, ctx(25));
    assert_close(quarter[Sensor::Age as usize], 0.25);
    assert_close(quarter[Sensor::Oscillator as usize], 1.0);

    let half = individual.compute_sensors(&grid, ctx(50));
    assert_close(half[Sensor::Oscillator as usize], 0.5);
}

#[test]
fn population_density_counts_occupied_orthogonal_neighbors() {
    let mut grid = Grid::new(16, 16);
    let individual = lone_individual(&mut grid, 8, 8, empty_genome());

    let alone = individual.compute_sensors(&grid, ctx(0));
    assert_close(alone[Sensor::PopulationDensity as usize], 0.0);

    grid.place(7, 8);
    grid.place(8, 7);
    let crowded = individual.compute_sensors(&grid, ctx(0));
    assert_close(crowded[Sensor::PopulationDensity as usize], 0.5);
}

#[test]
fn blocked_forward_reports_occupied_and_out_of_bounds_cells() {
    let mut grid = Grid::new(16, 16);
    let mut individual = lone_individual(&mut grid, 8, 8, empty_genome());
    individual.last_dx = 1;

    let open = individual.compute_sensors(&grid, ctx(0));
    assert_close(open[Sensor::BlockedForward as usize], 0.0);

    grid.place(9, 8);
    let blocked = individual.compute_sensors(&grid, ctx(0));
    assert_close(blocked[Sensor::BlockedForward as usize], 1.0);

    let mut at_edge = Individual::new(IndividualId(1), empty_genome(), 15, 8, 0);
    at_edge.last_dx = 1;
    let sensors = at_edge.compute_sensors(&grid, ctx(0));
    assert_close(sensors[Sensor::BlockedForward as usize], 1.0);
}

#[test]
fn random_sensor_is_deterministic_and_in_unit_interval() {
    let mut grid = Grid::new(16, 16);
    let individual = lone_individual(&mut grid, 8, 8, empty_genome());

    let first = individual.compute_sensors(&grid, ctx(3))[Sensor::Random as usize];
    let again = individual.compute_sensors(&grid, ctx(3))[Sensor::Random as usize];
    assert_eq!(first, again);
    assert!((0.0..1.0).contains(&first));

    let other_step = individual.compute_sensors(&grid, ctx(4))[Sensor::Random as usize];
    assert_ne!(first, other_step);
}

// The brain saturates MoveX and SetResponsiveness to exactly +/-1.0,
// and responsiveness starts pinned at 1.0, so the firing probability is
// exactly 1.0 and the step is fully deterministic.
#[test]
fn saturated_move_x_steps_one_cell_east() {
    let genome = saturating_genome(&[
        (Sensor::LocX, Action::MoveX, 1.0),
        (Sensor::LocX, Action::SetResponsiveness, 1.0),
    ]);
    let mut grid = Grid::new(10, 10);
    let mut individual = lone_individual(&mut grid, 8, 5, genome);
    individual.responsiveness = 1.0;

    individual.step(&grid, ctx(0), &mut BrainScratch::new());

    assert_eq!((individual.x, individual.y), (9, 5));
    assert_eq!((individual.last_dx, individual.last_dy), (1, 0));
    assert_eq!(individual.age, 1);
    assert_close(individual.responsiveness, 1.0);
}

#[test]
fn negative_drive_steps_west() {
    let genome = saturating_genome(&[
        (Sensor::LocX, Action::MoveX, -1.0),
        (Sensor::LocX, Action::SetResponsiveness, 1.0),
    ]);
    let mut grid = Grid::new(10, 10);
    let mut individual = lone_individual(&mut grid, 8, 5, genome);
    individual.responsiveness = 1.0;

    individual.step(&grid, ctx(0), &mut BrainScratch::new());

    assert_eq!((individual.x, individual.y), (7, 5));
    assert_eq!((individual.last_dx, individual.last_dy), (-1, 0));
}

#[test]
fn landing_position_clamps_at_the_boundary() {
    let genome = saturating_genome(&[
        (Sensor::LocX, Action::MoveX, 1.0),
        (Sensor::LocX, Action::SetResponsiveness, 1.0),
    ]);
    let mut grid = Grid::new(10, 10);
    let mut individual = lone_individual(&mut grid, 9, 5, genome);
    individual.responsiveness = 1.0;

    individual.step(&grid, ctx(0), &mut BrainScratch::new());

    // The clamped landing equals the current cell, so no move happened
    // and the last-move direction is untouched.
    assert_eq!((individual.x, individual.y), (9, 5));
    assert_eq!((individual.last_dx, individual.last_dy), (0, 0));
}

#[test]
fn movement_can_share_a_cell_with_another_individual() {
    let genome = saturating_genome(&[
        (Sensor::LocX, Action::MoveX, 1.0),
        (Sensor::LocX, Action::SetResponsiveness, 1.0),
    ]);
    let mut grid = Grid::new(10, 10);
    grid.place(9, 5);
    let mut individual = lone_individual(&mut grid, 8, 5, genome);
    individual.responsiveness = 1.0;

    individual.step(&grid, ctx(0), &mut BrainScratch::new());

    assert_eq!((individual.x, individual.y), (9, 5));
}

#[test]
fn responsiveness_blends_toward_the_requested_level() {
    let genome = saturating_genome(&[(Sensor::LocX, Action::SetResponsiveness, 1.0)]);
    let mut grid = Grid::new(10, 10);
    let mut individual = lone_individual(&mut grid, 9, 5, genome);
    assert_close(individual.responsiveness, 0.5);

    individual.step(&grid, ctx(0), &mut BrainScratch::new());
    assert_close(individual.responsiveness, 0.75);

    individual.step(&grid, ctx(1), &mut BrainScratch::new());
    assert_close(individual.responsiveness, 0.875);
}

#[test]
fn zero_activation_never_fires_an_action() {
    let mut grid = Grid::new(10, 10);
    let mut individual = lone_individual(&mut grid, 5, 5, empty_genome());
    individual.responsiveness = 1.0;

    for step in 0..20 {
        individual.step(&grid, ctx(step), &mut BrainScratch::new());
    }

    assert_eq!((individual.x, individual.y), (5, 5));
    assert_eq!(individual.age, 20);
}
