use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use acse_core::blob::{BlobWrite, SaveBuffer};
use acse_core::core_api::Engine;
use acse_core::generation::{Endian, Generation};
use acse_core::record::Field;
use acse_core::schema::{FieldEntry, Schema, SchemaRegistry};
use serde_json::Value;

const WW_FIRST: usize = 0x0C;
const NL_FIRST: usize = 0x20;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_acse"))
        .args(args)
        .output()
        .expect("failed to run acse CLI")
}

fn temp_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.sav", std::process::id(), nanos))
}

/// Writes a Wild World save where only player 0 ("Rosa", 1200 bells) exists.
fn wild_world_fixture(prefix: &str) -> PathBuf {
    let mut blob = SaveBuffer::zeroed(0x40000, 0);
    blob.write_u16(WW_FIRST + 0x2280, 0x3412, Endian::Little).unwrap();
    blob.write_bytes(WW_FIRST + 0x2282, &[0x12, 0x29, 0x2D, 0x1B]).unwrap();
    blob.write_bytes(WW_FIRST + 0x2276, &[0x08, 0x23, 0x28]).unwrap();
    blob.write_u32(WW_FIRST + 0x1B40, 1200, Endian::Little).unwrap();
    blob.write_u16(WW_FIRST + 0x1B22, 0x1234, Endian::Little).unwrap();
    blob.write_bytes(WW_FIRST + 0x2270, &[7, 14]).unwrap();

    let path = temp_path(prefix);
    fs::write(&path, blob.into_bytes()).expect("failed to write fixture");
    path
}

/// Writes a New Leaf save where only player 0 ("Ann") exists.
fn new_leaf_fixture(prefix: &str) -> PathBuf {
    let mut blob = SaveBuffer::zeroed(0x30000, 0);
    blob.write_u16(NL_FIRST + 0x55A6, 0x3412, Endian::Little).unwrap();
    blob.write_bytes(NL_FIRST + 0x55A8, &[b'A', 0, b'n', 0, b'n', 0]).unwrap();

    let path = temp_path(prefix);
    fs::write(&path, blob.into_bytes()).expect("failed to write fixture");
    path
}

#[test]
fn cli_prints_requested_fields_in_fixed_order() {
    let path = wild_world_fixture("acse_fields");
    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&["--bells", "--name", "--town-name", "-g", "ww", &path_arg]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["name=Rosa", "town_name=Hin", "bells=1200"]);
    let _ = fs::remove_file(path);
}

#[test]
fn cli_prints_birthday_and_pockets() {
    let path = wild_world_fixture("acse_pockets");
    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&[
        "--generation",
        "wild world",
        "--birthday",
        "--pockets",
        &path_arg,
    ]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "birthday=07-14");
    let pockets = lines[1].strip_prefix("pockets=").expect("missing pockets= prefix");
    let items: Vec<&str> = pockets.split(',').collect();
    assert_eq!(items.len(), 15);
    assert_eq!(items[0], "0x1234");
    assert!(items[1..].iter().all(|i| *i == "0x0000"));
    let _ = fs::remove_file(path);
}

#[test]
fn cli_json_dumps_the_whole_record() {
    let path = wild_world_fixture("acse_json");
    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&["-g", "ww", "--json", &path_arg]);
    assert!(output.status.success(), "{output:?}");

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(json["generation"], "WildWorld");
    assert_eq!(json["exists"], true);
    assert_eq!(json["values"]["Name"], "Rosa");
    assert_eq!(json["values"]["Bells"], 1200);
    let _ = fs::remove_file(path);
}

#[test]
fn cli_json_field_mode_uses_typed_values() {
    let path = wild_world_fixture("acse_json_fields");
    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&["-g", "ww", "--json", "--name", "--bells", &path_arg]);
    assert!(output.status.success(), "{output:?}");

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(json["name"], "Rosa");
    assert_eq!(json["bells"], 1200);
    let _ = fs::remove_file(path);
}

#[test]
fn cli_writes_edited_save() {
    let path = wild_world_fixture("acse_edit_in");
    let out = temp_path("acse_edit_out");
    let path_arg = path.to_string_lossy().to_string();
    let out_arg = out.to_string_lossy().to_string();

    let output = run_cli(&[
        "-g",
        "ww",
        "--set-name",
        "Tom",
        "--set-bells",
        "99999",
        "--output",
        &out_arg,
        &path_arg,
    ]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote edited save"));

    let edited = fs::read(&out).expect("missing edited save");
    let session = Engine::new()
        .open_bytes(&edited, Generation::WildWorld)
        .expect("edited save does not decode");
    let player = session.player(0).unwrap();
    assert_eq!(player.name(), "Tom");
    assert_eq!(player.bells(), 99_999);

    let original = fs::read(&path).unwrap();
    assert_eq!(original.len(), edited.len());

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(out);
}

#[test]
fn cli_rejects_edits_without_output() {
    let path = wild_world_fixture("acse_no_output");
    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&["-g", "ww", "--set-bells", "5", &path_arg]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--output"));
    let _ = fs::remove_file(path);
}

#[test]
fn cli_refuses_to_edit_an_empty_slot() {
    let path = wild_world_fixture("acse_empty_slot");
    let out = temp_path("acse_empty_slot_out");
    let path_arg = path.to_string_lossy().to_string();
    let out_arg = out.to_string_lossy().to_string();
    let output = run_cli(&[
        "-g",
        "ww",
        "--player",
        "1",
        "--set-bells",
        "5",
        "--output",
        &out_arg,
        &path_arg,
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    let _ = fs::remove_file(path);
}

#[test]
fn cli_verifies_roundtrip() {
    let path = wild_world_fixture("acse_roundtrip");
    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&["-g", "ww", "--verify-roundtrip", "--name", &path_arg]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["roundtrip=ok", "name=Rosa"]);
    let _ = fs::remove_file(path);
}

#[test]
fn cli_summary_lists_every_slot() {
    let path = wild_world_fixture("acse_summary");
    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&["-g", "ww", &path_arg]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Wild World save"));
    assert!(stdout.contains("Player 0: Rosa of Hin"));
    assert!(stdout.contains("Player 3: (empty)"));
    assert!(stdout.contains("Pockets:    1 items"));
    let _ = fs::remove_file(path);
}

#[test]
fn cli_loads_schema_overrides_from_json() {
    let path = wild_world_fixture("acse_schema");
    let schema_path = temp_path("acse_schema_json");
    let registry = SchemaRegistry::builtin();
    // Point the name at the town name to prove the override is used.
    let entries: Vec<FieldEntry> = registry
        .get(Generation::WildWorld)
        .unwrap()
        .entries()
        .iter()
        .map(|e| match e.field {
            Field::Name => FieldEntry::at(Field::Name, 0x2276).with_size(8),
            _ => *e,
        })
        .collect();
    let schema = Schema::new(entries);
    fs::write(&schema_path, serde_json::to_string(&schema).unwrap()).unwrap();

    let path_arg = path.to_string_lossy().to_string();
    let schema_arg = schema_path.to_string_lossy().to_string();
    let output = run_cli(&["-g", "ww", "--schema", &schema_arg, "--name", &path_arg]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "name=Hin");

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(schema_path);
}

#[test]
fn cli_reports_out_of_bounds_layouts() {
    let path = wild_world_fixture("acse_bounds");
    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&[
        "-g",
        "ww",
        "--first-offset",
        "0x3FFF0",
        "--player-count",
        "1",
        &path_arg,
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error decoding save file"));
    let _ = fs::remove_file(path);
}

#[test]
fn cli_refuses_edits_the_save_cannot_hold() {
    let path = new_leaf_fixture("acse_nl_bells");
    let out = temp_path("acse_nl_bells_out");
    let path_arg = path.to_string_lossy().to_string();
    let out_arg = out.to_string_lossy().to_string();
    let output = run_cli(&[
        "-g",
        "nl",
        "--set-bells",
        "99999",
        "--output",
        &out_arg,
        &path_arg,
    ]);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Bells is not stored in New Leaf saves"), "{stderr}");
    assert!(!out.exists());

    let output = run_cli(&[
        "-g",
        "nl",
        "--set-name",
        "Bea",
        "--output",
        &out_arg,
        &path_arg,
    ]);
    assert!(output.status.success(), "{output:?}");
    let edited = fs::read(&out).expect("missing edited save");
    let session = Engine::new()
        .open_bytes(&edited, Generation::NewLeaf)
        .expect("edited save does not decode");
    assert_eq!(session.player(0).unwrap().name(), "Bea");

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(out);
}

#[test]
fn cli_reports_overflowing_layouts() {
    let path = wild_world_fixture("acse_overflow");
    let path_arg = path.to_string_lossy().to_string();
    let first = format!("{:#x}", usize::MAX - 4);
    let output = run_cli(&["-g", "ww", "--first-offset", &first, &path_arg]);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error decoding save file"));
    let _ = fs::remove_file(path);
}
