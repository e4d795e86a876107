//! Determinism tests - the same scenario produces identical flights

use ballistic_core::{ScenarioConfig, Simulation};
use std::path::PathBuf;

fn test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

fn run_scenario(filename: &str) -> Simulation {
    let source = std::fs::read_to_string(test_data_path(filename)).expect("Failed to read file");
    let mut sim = ScenarioConfig::from_toml_str(&source)
        .expect("Failed to parse scenario")
        .build_simulation()
        .expect("Failed to build simulation");
    sim.launch_all();
    let failures = sim.run_until_settled(100_000);
    assert!(failures.is_empty(), "unexpected failures: {:?}", failures);
    sim
}

fn assert_identical(a: &Simulation, b: &Simulation) {
    assert_eq!(a.frames(), b.frames());
    for (pa, pb) in a.projectiles().iter().zip(b.projectiles()) {
        assert_eq!(pa.trajectory(), pb.trajectory());
        assert_eq!(pa.state(), pb.state());
        assert_eq!(pa.phase(), pb.phase());
    }
}

#[test]
fn test_outdoor_determinism() {
    let first = run_scenario("outdoor_pair.toml");
    let second = run_scenario("outdoor_pair.toml");
    assert_identical(&first, &second);
}

#[test]
fn test_linear_drag_determinism() {
    let first = run_scenario("indoor_linear.toml");
    let second = run_scenario("indoor_linear.toml");
    assert_identical(&first, &second);
}

#[test]
fn test_vacuum_determinism() {
    let first = run_scenario("vacuum.toml");
    let second = run_scenario("vacuum.toml");
    assert_identical(&first, &second);
}

#[test]
fn test_replay_after_reset_is_identical() {
    let mut sim = run_scenario("outdoor_pair.toml");
    let first: Vec<_> = sim.projectiles().iter().map(|p| p.trajectory().clone()).collect();

    sim.reset_all();
    sim.launch_all();
    sim.run_until_settled(100_000);
    let second: Vec<_> = sim.projectiles().iter().map(|p| p.trajectory().clone()).collect();

    assert_eq!(first, second);
    assert_eq!(sim.traces(), &first[..]);
}
