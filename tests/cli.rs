use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tempfile::TempDir;

const DIAMOND: &str = "digraph diamond {
    a -> b; a -> c;
    b -> d; c -> d;
    isolated;
}
";

fn fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn graphxplorer(path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_graphxplorer"))
        .args(args)
        .arg(path)
        .args(["a"])
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn explores_with_both_strategies() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "diamond.dot", DIAMOND);

    let output = graphxplorer(&path, &["--n_workers", "4"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("--- Sequential ---\nExplored 4 nodes.\n"));
    assert!(text.contains("--- Parallel ---\nExplored 4 nodes.\n"));
    assert_eq!(text.matches("Finished successfully in ").count(), 2);
    assert!(!text.contains("Nodes:"));
}

#[test]
fn verbose_lists_nodes_by_distance() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "diamond.dot", DIAMOND);

    let output = graphxplorer(&path, &["--verbose", "--n-workers", "2"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let listing = "Nodes:\n\
                   \t- a at distance 0\n\
                   \t- b at distance 1\n\
                   \t- c at distance 1\n\
                   \t- d at distance 2\n";
    assert_eq!(text.matches(listing).count(), 2);
    assert!(!text.contains("isolated"));
}

#[test]
fn json_report() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "diamond.dot", DIAMOND);

    let output = graphxplorer(&path, &["--json", "--verbose", "--n_workers", "3"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["agree"], true);
    assert_eq!(value["n_workers"], 3);
    assert_eq!(value["sequential"]["strategy"], "Sequential");
    assert_eq!(value["parallel"]["explored"], 4);
    assert_eq!(value["parallel"]["nodes"][3]["name"], "d");
    assert_eq!(value["parallel"]["nodes"][3]["dist"], 2);
}

#[test]
fn quoted_starting_node() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "quoted.dot", "graph { \"new york\" -- boston }\n");

    let output = Command::new(env!("CARGO_BIN_EXE_graphxplorer"))
        .arg(&path)
        .arg("\"new york\"")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("Explored 2 nodes."));
}

#[test]
fn unknown_starting_node_fails() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "diamond.dot", DIAMOND);

    let output = Command::new(env!("CARGO_BIN_EXE_graphxplorer"))
        .arg(&path)
        .arg("nowhere")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere"));
}

#[test]
fn zero_workers_fails() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "diamond.dot", DIAMOND);

    let output = graphxplorer(&path, &["--n_workers", "0"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn syntax_error_fails() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "broken.dot", "digraph { a -> ; }\n");

    let output = graphxplorer(&path, &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().unwrap();

    let output = graphxplorer(&dir.path().join("missing.dot"), &[]);
    assert!(!output.status.success());
}

#[test]
fn starting_nodes_are_required() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir, "diamond.dot", DIAMOND);

    let output = Command::new(env!("CARGO_BIN_EXE_graphxplorer"))
        .arg(&path)
        .output()
        .unwrap();

    assert!(!output.status.success());
}
