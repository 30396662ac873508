use serde_json::Value;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

const OLD_HASH: &str = "1111aaaa1111aaaa1111aaaa1111aaaa1111aaaa1111aaaa1111aaaa1111aaaa";
const NEW_HASH: &str = "2222bbbb2222bbbb2222bbbb2222bbbb2222bbbb2222bbbb2222bbbb2222bbbb";

const OLD_SNAPSHOT: &str = r#"{
  "models": [
    {
      "name": "meta-llama/Llama-3-8B",
      "pricing": {
        "type": "tokens",
        "normalized_input_price": 3.0,
        "normalized_output_price": 6.0
      },
      "deprecated": 0,
      "replaced_by": null,
      "quantization": "fp8"
    },
    {
      "name": "openai/whisper-large",
      "pricing": {
        "type": "input_length",
        "normalized_input_price": 0.6,
        "normalized_output_price": null
      },
      "deprecated": 0,
      "replaced_by": null,
      "quantization": null
    },
    {
      "name": "stabilityai/sdxl",
      "pricing": {
        "type": "image_units",
        "normalized_input_price": 0.2,
        "normalized_output_price": null
      },
      "deprecated": 0,
      "replaced_by": null,
      "quantization": null
    }
  ],
  "timestamp": 1700000000
}
"#;

const NEW_SNAPSHOT: &str = r#"{
  "models": [
    {
      "name": "meta-llama/Llama-3-8B",
      "pricing": {
        "type": "tokens",
        "normalized_input_price": 2.0,
        "normalized_output_price": 6.0
      },
      "deprecated": 0,
      "replaced_by": null,
      "quantization": "fp8"
    },
    {
      "name": "mistralai/Mixtral-8x7B",
      "pricing": {
        "type": "tokens",
        "normalized_input_price": 24.0,
        "normalized_output_price": 24.0
      },
      "deprecated": 0,
      "replaced_by": null,
      "quantization": "bfloat16"
    },
    {
      "name": "openai/whisper-large",
      "pricing": {
        "type": "input_length",
        "normalized_input_price": 0.6,
        "normalized_output_price": null
      },
      "deprecated": 1700086400,
      "replaced_by": "openai/whisper-large-v3",
      "quantization": null
    }
  ],
  "timestamp": 1700086400
}
"#;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "modelwatch-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

/// A cache directory holding the old and new fixture snapshots
fn seeded_cache(prefix: &str) -> (PathBuf, PathBuf) {
    let root = unique_temp_dir(prefix);
    let cache = root.join("cache");
    write_file(&cache.join(format!("models_{OLD_HASH}.json")), OLD_SNAPSHOT);
    write_file(&cache.join(format!("models_{NEW_HASH}.json")), NEW_SNAPSHOT);
    (root, cache)
}

fn run_modelwatch(args: &[&str], home: &Path) -> (bool, Vec<u8>, Vec<u8>) {
    let bin = std::env::var("CARGO_BIN_EXE_modelwatch").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("modelwatch.exe");
        } else {
            path.push("modelwatch");
        }
        path.to_string_lossy().into_owned()
    });
    let mut cmd = Command::new(bin);
    cmd.args(args);
    // Keep any real config file out of the way
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join(".config"));
    cmd.env_remove("MODELWATCH_LOG");
    let output = cmd.output().expect("run modelwatch");
    (output.status.success(), output.stdout, output.stderr)
}

fn json_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

/// Serve `responses` to consecutive connections, one canned HTTP reply each
fn serve_json(responses: Vec<(u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buf = [0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let reason = if status == 200 { "OK" } else { "Error" };
            let reply = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(reply.as_bytes());
        }
    });
    format!("http://{addr}/models/list")
}

#[test]
fn diff_json_emits_one_event_per_line() {
    let (root, cache) = seeded_cache("diff-json");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, stderr) = run_modelwatch(
        &["diff", OLD_HASH, NEW_HASH, "--json", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let events = json_lines(&stdout);
    assert_eq!(events.len(), 4);

    assert_eq!(events[0]["event"], "added");
    assert_eq!(events[0]["model"], "mistralai/Mixtral-8x7B");
    assert_eq!(events[0]["details"]["quantization"], "bfloat16");

    assert_eq!(events[1]["event"], "removed");
    assert_eq!(events[1]["model"], "stabilityai/sdxl");
    assert!(events[1].get("details").is_none());

    // Modified models come in name order
    assert_eq!(events[2]["event"], "modified");
    assert_eq!(events[2]["model"], "meta-llama/Llama-3-8B");
    let pricing = &events[2]["details"]["pricing"];
    assert_eq!(pricing["old"]["normalized_input_price"].as_f64(), Some(3.0));
    assert_eq!(pricing["new"]["normalized_input_price"].as_f64(), Some(2.0));
    assert!(events[2]["details"].get("quantization").is_none());

    assert_eq!(events[3]["model"], "openai/whisper-large");
    let details = &events[3]["details"];
    assert_eq!(details["deprecated"]["old"], 0);
    assert_eq!(details["deprecated"]["new"], 1_700_086_400);
    assert_eq!(details["replaced_by"]["new"], "openai/whisper-large-v3");
    assert!(details.get("pricing").is_none());
}

#[test]
fn diff_text_lists_sections() {
    let (root, cache) = seeded_cache("diff-text");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, stderr) = run_modelwatch(
        &[
            "diff",
            OLD_HASH,
            NEW_HASH,
            "--color",
            "never",
            "--timezone",
            "UTC",
            "--cache-dir",
            &cache_arg,
        ],
        &root,
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let text = String::from_utf8_lossy(&stdout);
    assert!(text.contains(&format!("Comparing states: {OLD_HASH} -> {NEW_HASH}")));
    assert!(text.contains("[ADDED] Model: 'mistralai/Mixtral-8x7B'"));
    assert!(text.contains("[REMOVED] Model: 'stabilityai/sdxl'"));
    assert!(text.contains("[CHANGE] Model: 'meta-llama/Llama-3-8B'"));
    assert!(text.contains("  - Input Price: $0.03000 per 1M tokens"));
    assert!(text.contains("  + Input Price: $0.02000 per 1M tokens"));
    assert!(text.contains("[DEPRECATED] Model: 'openai/whisper-large'"));
    assert!(text.contains("  - Deprecated (timestamp): N/A"));
    assert!(text.contains("  + Deprecated (timestamp): 2023-11-15 22:13:20"));
    assert!(!text.contains("\x1b["));
}

#[test]
fn diff_reversed_swaps_added_and_removed() {
    let (root, cache) = seeded_cache("diff-reversed");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, _) = run_modelwatch(
        &["diff", NEW_HASH, OLD_HASH, "-j", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(ok);

    let events = json_lines(&stdout);
    assert_eq!(events[0]["event"], "added");
    assert_eq!(events[0]["model"], "stabilityai/sdxl");
    assert_eq!(events[1]["event"], "removed");
    assert_eq!(events[1]["model"], "mistralai/Mixtral-8x7B");
}

#[test]
fn diff_same_hash_skips_comparison() {
    let (root, cache) = seeded_cache("diff-same");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, _) = run_modelwatch(
        &["diff", OLD_HASH, OLD_HASH, "--cache-dir", &cache_arg],
        &root,
    );
    assert!(ok);
    assert_eq!(
        String::from_utf8_lossy(&stdout).trim(),
        "same hashes provided. No comparison needed."
    );
}

#[test]
fn diff_accepts_unique_prefixes() {
    let (root, cache) = seeded_cache("diff-prefix");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, stderr) = run_modelwatch(
        &["diff", "1111", "2222", "--json", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    assert_eq!(json_lines(&stdout).len(), 4);
}

#[test]
fn diff_missing_snapshot_fails() {
    let (root, cache) = seeded_cache("diff-missing");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, stderr) = run_modelwatch(
        &["diff", OLD_HASH, "deadbeef", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(!ok);
    assert!(stdout.is_empty());
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("Error: Snapshot deadbeef not found"), "stderr: {stderr}");
}

#[test]
fn identical_snapshots_report_no_differences() {
    let (root, cache) = seeded_cache("diff-identical");
    let copy_hash = "3333cccc";
    write_file(&cache.join(format!("models_{copy_hash}.json")), OLD_SNAPSHOT);
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, _) = run_modelwatch(
        &["diff", OLD_HASH, copy_hash, "--no-color", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(ok);
    assert!(
        String::from_utf8_lossy(&stdout).contains("No differences found between the two snapshots.")
    );

    let (ok, stdout, _) = run_modelwatch(
        &["diff", OLD_HASH, copy_hash, "--json", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(ok);
    assert!(json_lines(&stdout).is_empty());
}

#[test]
fn list_json_is_oldest_first() {
    let (root, cache) = seeded_cache("list-json");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, stderr) = run_modelwatch(&["list", "--json", "--cache-dir", &cache_arg], &root);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    let arr = json.as_array().expect("array output");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["hash"], OLD_HASH);
    assert_eq!(arr[0]["timestamp"], 1_700_000_000);
    assert_eq!(arr[0]["models"], 3);
    assert_eq!(arr[1]["hash"], NEW_HASH);
}

#[test]
fn list_skips_unrelated_and_corrupt_files() {
    let (root, cache) = seeded_cache("list-corrupt");
    write_file(&cache.join("models_broken.json"), "{ not json");
    write_file(&cache.join("notes.txt"), "hello");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, _) = run_modelwatch(&["list", "-j", "--cache-dir", &cache_arg], &root);
    assert!(ok);
    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json.as_array().map(Vec::len), Some(2));
}

#[test]
fn list_empty_cache() {
    let root = unique_temp_dir("list-empty");
    let cache = root.join("nothing-here");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, stdout, _) = run_modelwatch(&["list", "--cache-dir", &cache_arg], &root);
    assert!(ok);
    assert!(String::from_utf8_lossy(&stdout).contains("No snapshots found"));
}

#[test]
fn cache_dir_from_config_file() {
    let (root, cache) = seeded_cache("config");
    write_file(
        &root.join(".modelwatch.toml"),
        &format!("cache_dir = {:?}\n", cache.to_string_lossy()),
    );

    let (ok, stdout, stderr) = run_modelwatch(&["list", "--json"], &root);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json.as_array().map(Vec::len), Some(2));
}

#[test]
fn invalid_timezone_is_rejected() {
    let (root, cache) = seeded_cache("bad-tz");
    let cache_arg = cache.to_string_lossy().into_owned();

    let (ok, _, stderr) = run_modelwatch(
        &["list", "--timezone", "Mars/Olympus", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Mars/Olympus"));
}

#[test]
fn fetch_saves_then_reports_unchanged() {
    let root = unique_temp_dir("fetch");
    let cache = root.join("cache");
    let cache_arg = cache.to_string_lossy().into_owned();
    let body = r#"[
        {"model_name": "meta-llama/Llama-3-8B", "type": "text-generation",
         "pricing": {"type": "tokens", "cents_per_input_token": 0.000002, "cents_per_output_token": 0.000006},
         "quantization": "fp8"},
        {"model_name": "openai/whisper-large",
         "pricing": {"type": "input_length", "cents_per_input_sec": 0.01},
         "deprecated": null}
    ]"#
    .to_string();
    let url = serve_json(vec![(200, body.clone()), (200, body)]);

    let (ok, stdout, stderr) = run_modelwatch(
        &["fetch", "--api-url", &url, "--json", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    let first: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(first["changed"], true);
    assert_eq!(first["models"], 2);
    assert!(first["prev_hash"].is_null());
    let hash = first["hash"].as_str().expect("hash").to_string();
    assert_eq!(hash.len(), 64);

    let saved: Value = serde_json::from_str(
        &fs::read_to_string(cache.join(format!("models_{hash}.json"))).expect("snapshot file"),
    )
    .expect("snapshot json");
    let models = saved["models"].as_array().expect("models");
    assert_eq!(models[0]["name"], "meta-llama/Llama-3-8B");
    assert_eq!(models[0]["pricing"]["normalized_input_price"].as_f64(), Some(2.0));
    assert_eq!(models[1]["pricing"]["normalized_input_price"].as_f64(), Some(0.6));

    let (ok, stdout, _) = run_modelwatch(
        &["fetch", "--api-url", &url, "--json", "--cache-dir", &cache_arg],
        &root,
    );
    assert!(ok);
    let second: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(second["changed"], false);
    assert_eq!(second["hash"], hash.as_str());
}

#[test]
fn fetch_reports_http_errors() {
    let root = unique_temp_dir("fetch-error");
    let cache = root.join("cache");
    let cache_arg = cache.to_string_lossy().into_owned();
    let url = serve_json(vec![(500, "upstream down".to_string())]);

    let (ok, _, stderr) = run_modelwatch(
        &["fetch", "--api-url", &url, "--cache-dir", &cache_arg],
        &root,
    );
    assert!(!ok);
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(
        stderr.contains("Failed to fetch models: 500 upstream down"),
        "stderr: {stderr}"
    );
    assert!(!cache.exists() || fs::read_dir(&cache).expect("read cache").next().is_none());
}
