use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn get_test_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target/tmp/tests").join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

const NETWORK: &str = "Graph with 6 nodes.
graph
[
\tnode [ id 1 ]
\tnode [ id 2 ]
\tnode [ id 3 ]
\tnode [ id 4 ]
\tnode [ id 5 ]
\tnode [ id 6 ]
\tedge [ source 1 target 2 weight 0.5 ]
\tedge [ source 2 target 3 weight 0.7 ]
\tedge [ source 3 target 2 weight 0.9 ]
\tedge [ source 4 target 5 ]
]
";

#[test]
fn test_cli_components() -> Result<(), Box<dyn std::error::Error>> {
    let dir = get_test_dir("components");
    let input = dir.join("net.gml");
    let summary = dir.join("net.bfs");
    let out_dir = dir.join("comps");
    fs::write(&input, NETWORK)?;

    let mut cmd = Command::cargo_bin("sparsenet")?;
    cmd.arg("components")
        .arg(&input)
        .arg(&summary)
        .arg("--out-dir")
        .arg(&out_dir);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3 edges explored"))
        .stdout(predicate::str::contains(
            "1 duplicate edges not counted in edge count",
        ))
        .stdout(predicate::str::contains("Components found:       3"))
        .stdout(predicate::str::contains("Largest component size: 3"));

    // {1,2,3}, {4,5}, {6}
    let comp1 = fs::read_to_string(out_dir.join("comp1.gml"))?;
    assert!(comp1.starts_with("Graph with 3 nodes."));
    assert!(comp1.contains("weight 0.900000"));
    let comp3 = fs::read_to_string(out_dir.join("comp3.gml"))?;
    assert!(comp3.contains("id 6"));
    assert!(!comp3.contains("edge"));
    assert!(!out_dir.join("comp4.gml").exists());

    let text = fs::read_to_string(&summary)?;
    assert!(text.contains("Node numbers range from 1 to 6"));
    assert!(text.contains("3 components found"));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn test_cli_refuses_existing_components() -> Result<(), Box<dyn std::error::Error>> {
    let dir = get_test_dir("existing");
    let input = dir.join("net.gml");
    fs::write(&input, NETWORK)?;
    fs::write(dir.join("comp1.gml"), "old")?;

    let mut cmd = Command::cargo_bin("sparsenet")?;
    cmd.arg("components")
        .arg(&input)
        .arg(dir.join("net.bfs"))
        .arg("-o")
        .arg(&dir);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("already exist"));

    assert_eq!(fs::read_to_string(dir.join("comp1.gml"))?, "old");

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn test_cli_directed_json() -> Result<(), Box<dyn std::error::Error>> {
    let dir = get_test_dir("directed");
    let input = dir.join("net.gml");
    let out_dir = dir.join("comps");
    fs::write(&input, NETWORK)?;

    // Directed: 2->3 and 3->2 are distinct, so nothing is merged
    let mut cmd = Command::cargo_bin("sparsenet")?;
    cmd.arg("components")
        .arg(&input)
        .arg(dir.join("net.bfs"))
        .arg("-o")
        .arg(&out_dir)
        .arg("--directed")
        .arg("--json");
    let output = cmd.assert().success().get_output().stdout.clone();

    let summary: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(summary["distinct_edges"], 4);
    assert_eq!(summary["duplicate_edges"], 0);
    assert_eq!(summary["component_count"], 3);
    assert_eq!(summary["singleton_count"], 1);

    let comp1 = fs::read_to_string(out_dir.join("comp1.gml"))?;
    assert!(comp1.contains("directed 1"));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn test_cli_stats_csv() -> Result<(), Box<dyn std::error::Error>> {
    let dir = get_test_dir("stats_csv");
    let input = dir.join("pairs.csv");
    fs::write(&input, "1,2,0.3\n2,1,0.8\n2,3\n7,8\n")?;

    let mut cmd = Command::cargo_bin("sparsenet")?;
    cmd.arg("stats").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Vertices:       5"))
        .stdout(predicate::str::contains("Edges:          3"))
        .stdout(predicate::str::contains("Duplicates:     1"))
        .stdout(predicate::str::contains("Number of components: 2"))
        .stdout(predicate::str::contains("Max component size:   3"));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn test_cli_bad_input() -> Result<(), Box<dyn std::error::Error>> {
    let dir = get_test_dir("bad_input");
    let input = dir.join("broken.gml");
    fs::write(&input, "graph [ node [ id 1 ] edge [ source 1 target 9 ] ]")?;

    let mut cmd = Command::cargo_bin("sparsenet")?;
    cmd.arg("stats").arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("undeclared node 9"));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn test_cli_empty_graph() -> Result<(), Box<dyn std::error::Error>> {
    let dir = get_test_dir("empty");
    let input = dir.join("empty.gml");
    fs::write(&input, "graph [ ]")?;

    let mut cmd = Command::cargo_bin("sparsenet")?;
    cmd.arg("stats").arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no vertices"));

    fs::remove_dir_all(dir)?;
    Ok(())
}
