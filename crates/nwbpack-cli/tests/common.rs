#![allow(dead_code)]

use assert_cmd::Command;
use nwbpack_testing::TestWorld;
use std::fs;
use std::path::PathBuf;

/// Write a config whose writer is a tiny shell stand-in for the real
/// converter: it copies a marker into the destination path.
pub fn write_config(world: &TestWorld, concurrency: usize) -> PathBuf {
    write_config_with_writer(
        world,
        concurrency,
        &["sh", "-c", "printf nwb-artifact > \"$0\"", "{dest}"],
    )
}

pub fn write_config_with_writer(
    world: &TestWorld,
    concurrency: usize,
    command: &[&str],
) -> PathBuf {
    let config_path = world
        .source_root()
        .parent()
        .unwrap()
        .join("config.toml");
    let command_toml = command
        .iter()
        .map(|c| format!("{:?}", c))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(
        &config_path,
        format!(
            "concurrency = {}\n\n[writer]\ncommand = [{}]\n",
            concurrency, command_toml
        ),
    )
    .unwrap();
    config_path
}

pub fn package_cmd(world: &TestWorld, config_path: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("package-nwb").expect("package-nwb binary");
    cmd.env_remove("NWBPACK_CONFIG")
        .env_remove("NWBPACK_SOURCE_DIR")
        .env_remove("NWBPACK_OUTPUT_DIR")
        .arg("--config")
        .arg(config_path)
        .arg("--source-dir")
        .arg(world.source_root())
        .arg("--output-dir")
        .arg(world.output_root());
    cmd
}

pub fn find_missing_cmd(world: &TestWorld, config_path: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("find-missing-nwb").expect("find-missing-nwb binary");
    cmd.env_remove("NWBPACK_CONFIG")
        .env_remove("NWBPACK_SOURCE_DIR")
        .env_remove("NWBPACK_OUTPUT_DIR")
        .arg("--config")
        .arg(config_path)
        .arg("--source-dir")
        .arg(world.source_root())
        .arg("--output-dir")
        .arg(world.output_root());
    cmd
}
