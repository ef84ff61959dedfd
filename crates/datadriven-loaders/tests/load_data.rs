use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use datadriven_annotate::{data, AttributeStore, DataEntry, TestMethod};
use datadriven_core::{DataDrivenError, DataLoader};
use datadriven_loaders::{load_data, LoaderRegistry};
use serde_json::json;

const HEADERED: &str = "label,expected,target\nempty string,true,\"\"\nplain string,false,hello\n";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn csv_extension_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cases.csv", HEADERED);

    let mut method = TestMethod::new("test_csv");
    let count = load_data(&path, &mut method).unwrap();

    assert_eq!(count, 2);
    assert_eq!(
        method.entries().unwrap()[1],
        DataEntry::new("plain string", json!({"expected": false, "target": "hello"}))
    );
}

#[test]
fn extension_match_ignores_case() {
    let dir = tempfile::tempdir().unwrap();
    let lower = write(dir.path(), "lower.csv", HEADERED);
    let upper = write(dir.path(), "upper.CSV", HEADERED);

    let mut a = TestMethod::new("test_lower");
    let mut b = TestMethod::new("test_upper");
    load_data(&lower, &mut a).unwrap();
    load_data(&upper, &mut b).unwrap();

    assert_eq!(a.entries().unwrap(), b.entries().unwrap());
}

#[test]
fn other_extensions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cases.txt", HEADERED);

    let mut method = TestMethod::new("test_txt");
    let err = load_data(&path, &mut method).unwrap_err();

    assert!(matches!(err, DataDrivenError::InvalidArgument(_)));
    let msg = err.to_string();
    assert!(msg.contains("cases.txt"), "{msg}");
    assert!(msg.contains("only csv"), "{msg}");
    assert!(!method.is_data_driven());
}

#[test]
fn missing_extension_is_rejected() {
    let mut method = TestMethod::new("test_noext");
    let err = load_data("fixtures/cases", &mut method).unwrap_err();
    assert!(matches!(err, DataDrivenError::InvalidArgument(_)));
}

#[test]
fn loads_append_after_existing_sources() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cases.csv", "a,1\nb,2\n");

    let mut method = TestMethod::new("test_append");
    method.data("inline", json!([0]));
    load_data(&path, &mut method).unwrap();

    let labels: Vec<String> = method
        .entries()
        .unwrap()
        .into_iter()
        .map(|e| e.label)
        .collect();
    assert_eq!(labels, vec!["inline", "a", "b"]);
}

struct LineLoader;

impl DataLoader for LineLoader {
    fn load(
        &self,
        path: &Path,
        target: &mut dyn AttributeStore,
    ) -> Result<usize, DataDrivenError> {
        let text = fs::read_to_string(path)?;
        let mut count = 0;
        for line in text.lines() {
            data(target, line, json!(line.len()));
            count += 1;
        }
        Ok(count)
    }
}

#[test]
fn registry_accepts_new_formats() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "words.LINES", "ab\ncde\n");

    let mut registry = LoaderRegistry::new();
    registry.register_loader(".lines", Arc::new(LineLoader));
    assert_eq!(registry.extensions(), vec!["csv", "lines"]);

    let mut method = TestMethod::new("test_lines");
    registry.load(&path, &mut method).unwrap();

    assert_eq!(
        method.entries().unwrap(),
        vec![
            DataEntry::new("ab", json!(2)),
            DataEntry::new("cde", json!(3)),
        ]
    );
}

#[test]
fn empty_registry_supports_nothing() {
    let registry = LoaderRegistry::empty();
    assert!(registry.get("csv").is_none());
    assert!(registry.extensions().is_empty());
}
