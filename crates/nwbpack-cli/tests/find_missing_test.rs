mod common;

use common::{find_missing_cmd, package_cmd, write_config};
use nwbpack_testing::TestWorld;
use predicates::prelude::*;

#[test]
fn lists_unpackaged_sessions_without_writing() {
    let world = TestWorld::new().unwrap();
    world
        .add_session("VG1-01", "230517_task", &["behavior"])
        .unwrap();
    world
        .add_session("VG1-02", "230601_resting-state", &["behavior"])
        .unwrap();
    let config = write_config(&world, 1);

    find_missing_cmd(&world, &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("VG1-01_230517_task"))
        .stdout(predicate::str::contains("VG1-02_230601_resting-state"))
        .stdout(predicate::str::contains("create"));

    assert!(!world.output_root().exists());
}

#[test]
fn up_to_date_store_reports_nothing_pending() {
    let world = TestWorld::new().unwrap();
    world
        .add_session("VG1-01", "230517_task", &["behavior"])
        .unwrap();
    let config = write_config(&world, 1);

    package_cmd(&world, &config).assert().success();

    find_missing_cmd(&world, &config)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "All sessions are packaged and up to date.",
        ));
}

#[test]
fn reports_orphans_and_stale_artifacts() {
    let world = TestWorld::new().unwrap();
    world
        .add_session("VG1-01", "230517_task", &["behavior"])
        .unwrap();
    world
        .add_artifact("VG1-01", "VG1-01_230517_task", "fp-from-an-older-scan")
        .unwrap();
    world
        .add_artifact("VG9-99", "VG9-99_220101_task", "fp-x")
        .unwrap();
    let config = write_config(&world, 1);

    find_missing_cmd(&world, &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("report_orphan"))
        .stdout(predicate::str::contains("raw data changed"));
}

#[test]
fn json_format_lists_pending_items_only() {
    let world = TestWorld::new().unwrap();
    world
        .add_session("VG1-01", "230517_task", &["behavior"])
        .unwrap();
    let config = write_config(&world, 1);

    let output = find_missing_cmd(&world, &config)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = plan["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["action"], "create");
}

#[test]
fn date_filter_narrows_the_listing() {
    let world = TestWorld::new().unwrap();
    world
        .add_session("VG1-01", "230517_task", &["behavior"])
        .unwrap();
    world
        .add_session("VG1-01", "230601_task", &["behavior"])
        .unwrap();
    let config = write_config(&world, 1);

    find_missing_cmd(&world, &config)
        .arg("--from-date")
        .arg("230601")
        .assert()
        .success()
        .stdout(predicate::str::contains("VG1-01_230601_task"))
        .stdout(predicate::str::contains("VG1-01_230517_task").not());
}

#[test]
fn unreadable_catalog_exits_nonzero() {
    let world = TestWorld::new().unwrap();
    let config = write_config(&world, 1);

    let mut cmd = assert_cmd::Command::cargo_bin("find-missing-nwb").unwrap();
    cmd.env_remove("NWBPACK_CONFIG")
        .env_remove("NWBPACK_SOURCE_DIR")
        .env_remove("NWBPACK_OUTPUT_DIR")
        .arg("--config")
        .arg(&config)
        .arg("--source-dir")
        .arg("/nonexistent/sessions")
        .arg("--output-dir")
        .arg(world.output_root());

    cmd.assert().code(1).stderr(predicate::str::contains("Error:"));
}

#[test]
fn bad_date_flag_is_a_usage_error() {
    let world = TestWorld::new().unwrap();
    let config = write_config(&world, 1);

    find_missing_cmd(&world, &config)
        .arg("--from-date")
        .arg("2023-05-17")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("YYMMDD"));
}
