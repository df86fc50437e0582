//! Runs the `traffic-controller` binary against the demo scripts

use std::path::Path;
use std::process::Command;

use lane_monitor::LaneSnapshot;

const CONFIG: &str = r#"
[logging]
level = "debug"

[timing]
frame_interval_ms = 100
run_for_secs = 2
realtime = false

[output]
log = true
json_lines = true

[[lanes]]
id = "north"
script = "demos/north.json"
frame_stride = 3

[lanes.zone]
polygon = [[0, 0], [0, 480], [640, 480], [640, 0]]

[[lanes]]
id = "south"
script = "demos/south.json"

[lanes.zone]
polygon = [[0, 0], [0, 480], [640, 480], [640, 0]]
"#;

#[test]
fn test_stdout_carries_only_json_lines() {
    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let config_path =
        std::env::temp_dir().join(format!("traffic-json-lines-{}.toml", std::process::id()));
    std::fs::write(&config_path, CONFIG).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_traffic-controller"))
        .arg("--config")
        .arg(&config_path)
        .current_dir(&workspace)
        .output()
        .unwrap();
    std::fs::remove_file(&config_path).unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(!lines.is_empty());
    for line in &lines {
        let snapshots: Vec<LaneSnapshot> = serde_json::from_str(line)
            .unwrap_or_else(|e| panic!("non-JSON line on stdout ({e}): {line}"));
        assert_eq!(snapshots.len(), 2);
    }

    // logs still happen, on stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Traffic Signal Controller"));
}
