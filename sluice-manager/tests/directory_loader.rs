//! Integration tests for loading stream configurations from a directory.

mod common;

use common::ScriptedRuntime;
use sluice_core::StreamError;
use sluice_manager::loader::{DirectoryLoader, load_directory};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn nonexistent_path_is_empty() {
    let dir = tempdir().unwrap();
    let load = load_directory(dir.path().join("missing"));

    assert!(load.error.is_none());
    assert!(load.streams.is_empty());
}

#[test]
fn file_path_is_empty() {
    let dir = tempdir().unwrap();
    write(dir.path(), "foo.yaml", "input:\n  type: kafka\n");

    let load = load_directory(dir.path().join("foo.yaml"));
    assert!(load.is_ok());
    assert!(load.streams.is_empty());
}

#[test]
fn nested_files_become_streams() {
    let dir = tempdir().unwrap();
    write(dir.path(), "first.yaml", "input:\n  type: kafka\n");
    write(
        dir.path(),
        "nested/second.json",
        r#"{"output": {"type": "http_client"}}"#,
    );
    write(dir.path(), "nested/deeper/third.yaml", "buffer:\n  type: memory\n");
    write(dir.path(), "notes.txt", "not a config");
    write(dir.path(), "ignored.yml", "input:\n  type: kafka\n");

    let streams = load_directory(dir.path()).into_result().unwrap();

    let ids: Vec<&str> = streams.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["first", "nested_deeper_third", "nested_second"]);
    assert_eq!(streams["first"].input.kind, "kafka");
    assert_eq!(streams["first"].output.kind, "stdout");
    assert_eq!(streams["nested_second"].output.kind, "http_client");
    assert_eq!(streams["nested_deeper_third"].buffer.kind, "memory");
}

#[test]
fn colliding_ids_abort() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/b.yaml", "input:\n  type: kafka\n");
    write(dir.path(), "a/b.json", r#"{"input": {"type": "kafka"}}"#);

    let load = load_directory(dir.path());
    match load.error {
        Some(StreamError::Collision { ref id, ref path }) => {
            assert_eq!(id, "a_b");
            assert!(path.ends_with("a/b.yaml"));
        }
        ref other => panic!("expected collision, got {:?}", other),
    }

    let err = load.into_result().unwrap_err();
    assert!(err.to_string().contains("collision"));
}

#[test]
fn decode_error_keeps_earlier_streams() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.yaml", "input:\n  type: kafka\n");
    write(dir.path(), "b.yaml", "input: [unclosed\n");
    write(dir.path(), "c.yaml", "input:\n  type: kafka\n");

    let load = load_directory(dir.path());

    match &load.error {
        Some(StreamError::Decode { path: Some(path), .. }) => {
            assert!(path.ends_with("b.yaml"));
        }
        other => panic!("expected decode error, got {:?}", other),
    }
    assert_eq!(load.streams.keys().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn json_and_yaml_files_decode_the_same() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "from_json.json",
        r#"{"input": {"type": "kafka", "topics": ["foo"]}, "pipeline": {"threads": 2}}"#,
    );
    write(
        dir.path(),
        "from_yaml.yaml",
        "input:\n  type: kafka\n  topics: [ foo ]\npipeline:\n  threads: 2\n",
    );

    let streams = load_directory(dir.path()).into_result().unwrap();
    assert_eq!(streams["from_json"], streams["from_yaml"]);
}

#[test]
fn empty_file_is_default_config() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty.yaml", "");

    let streams = load_directory(dir.path()).into_result().unwrap();
    assert_eq!(streams["empty"], sluice_core::StreamConfig::default());
}

#[tokio::test]
async fn loaded_streams_apply_to_manager() {
    let dir = tempdir().unwrap();
    write(dir.path(), "ingest.yaml", "input:\n  type: kafka\n");
    write(dir.path(), "egress/http.json", r#"{"output": {"type": "http_client"}}"#);

    let loader = DirectoryLoader::new(dir.path());
    assert_eq!(loader.root(), dir.path());

    let streams = loader.load().into_result().unwrap();
    let runtime = ScriptedRuntime::new();
    let manager = common::scripted_manager(&runtime);

    manager
        .set_all(streams, Duration::from_millis(500))
        .await
        .unwrap();

    assert_eq!(manager.ids().await, vec!["egress_http", "ingest"]);
}

#[cfg(unix)]
#[test]
fn symlinked_files_are_loaded() {
    use std::os::unix::fs::symlink;

    let source = tempdir().unwrap();
    write(source.path(), "foo.yaml", "input:\n  type: kafka\n");
    write(source.path(), "nested/bar.json", r#"{"output": {"type": "drop"}}"#);

    let dir = tempdir().unwrap();
    symlink(source.path().join("foo.yaml"), dir.path().join("foo.yaml")).unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    symlink(
        source.path().join("nested/bar.json"),
        dir.path().join("nested/bar.json"),
    )
    .unwrap();

    let streams = load_directory(dir.path()).into_result().unwrap();
    assert_eq!(streams.keys().collect::<Vec<_>>(), vec!["foo", "nested_bar"]);
    assert_eq!(streams["foo"].input.kind, "kafka");
    assert_eq!(streams["nested_bar"].output.kind, "drop");
}

#[cfg(unix)]
#[test]
fn symlinked_directory_named_like_config_is_skipped() {
    use std::os::unix::fs::symlink;

    let source = tempdir().unwrap();
    write(source.path(), "inner.yaml", "input:\n  type: kafka\n");

    let dir = tempdir().unwrap();
    symlink(source.path(), dir.path().join("linked.yaml")).unwrap();

    let load = load_directory(dir.path());
    assert!(load.is_ok());
    assert!(load.streams.is_empty());
}

#[cfg(unix)]
#[test]
fn dangling_symlink_is_an_io_error() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    symlink(dir.path().join("missing.yaml"), dir.path().join("foo.yaml")).unwrap();

    match load_directory(dir.path()).error {
        Some(StreamError::Io { ref path, .. }) => assert!(path.ends_with("foo.yaml")),
        ref other => panic!("expected io error, got {:?}", other),
    }
}
