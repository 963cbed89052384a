//! Level descriptors and tuning files loaded from disk.

use haulage::level::{builtin, catalog, LevelDescriptor};
use haulage::mission::Archetype;
use haulage::{ConfigError, Simulation, Tuning};
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[rstest]
fn every_builtin_level_hosts_every_archetype() {
    assert_eq!(catalog().len(), 5);
    for level in catalog() {
        for archetype in Archetype::ALL {
            let sim = Simulation::new(level.clone(), archetype, Tuning::default(), 0);
            assert!(sim.is_ok(), "{} cannot host {archetype}", level.key);
        }
    }
}

#[rstest]
fn unknown_level_is_rejected() {
    assert!(matches!(builtin("LEVEL_99"), Err(ConfigError::UnknownLevel(_))));
}

#[rstest]
fn level_descriptor_round_trips_through_a_file() {
    let level = builtin("LEVEL_2").expect("level");
    let file = write_temp(&serde_json::to_string(&level).expect("json"));
    let loaded = LevelDescriptor::load(file.path()).expect("load");
    assert_eq!(loaded, level);
}

#[rstest]
fn minimal_descriptor_uses_defaults() {
    let file = write_temp(
        r#"{
            "key": "YARD",
            "name": "Yard",
            "map_width": 1600.0,
            "map_height": 1000.0,
            "spawn": [100.0, 100.0],
            "pickup_zone": { "x": 300.0, "y": 300.0, "width": 80.0, "height": 80.0 },
            "delivery_zone": { "x": 900.0, "y": 500.0, "width": 80.0, "height": 80.0 }
        }"#,
    );
    let level = LevelDescriptor::load(file.path()).expect("load");
    assert!(level.obstacles.is_empty());
    assert!(level.population.is_none());
    Simulation::new(level, Archetype::MultiStop, Tuning::default(), 0).expect("sim");
}

#[rstest]
fn zone_outside_the_map_is_rejected() {
    let file = write_temp(
        r#"{
            "key": "TINY",
            "name": "Tiny",
            "map_width": 500.0,
            "map_height": 500.0,
            "spawn": [100.0, 100.0],
            "pickup_zone": { "x": 300.0, "y": 300.0, "width": 80.0, "height": 80.0 },
            "delivery_zone": { "x": 900.0, "y": 500.0, "width": 80.0, "height": 80.0 }
        }"#,
    );
    assert!(matches!(
        LevelDescriptor::load(file.path()),
        Err(ConfigError::OutOfBounds { .. })
    ));
}

#[rstest]
fn partial_tuning_file_keeps_defaults() {
    let file = write_temp("[truck]\nmax_speed = 400.0\n\n[mission]\ntime_limit = 60.0\n");
    let tuning = Tuning::load(file.path()).expect("tuning");
    assert!((tuning.truck.max_speed - 400.0).abs() < f32::EPSILON);
    assert!((tuning.truck.acceleration - 200.0).abs() < f32::EPSILON);
    assert!((tuning.mission.time_limit - 60.0).abs() < f32::EPSILON);
    assert_eq!(tuning.mission.collision_penalty, 50);
}

#[rstest]
fn missing_tuning_file_names_the_path() {
    let err = Tuning::load("/nonexistent/haulage.toml").expect_err("missing file");
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/haulage.toml"));
}
