use datadriven_annotate::{expand, AttributeStore, DataEntry, TestCase};
use serde_json::json;

#[test]
fn method_is_created_on_first_use() {
    let mut case = TestCase::new("StringTest");
    case.method("test_upcase").data("lower", json!("abc"));
    case.method("test_upcase").data("mixed", json!("aBc"));

    assert_eq!(case.methods().len(), 1);
    let method = case.get("test_upcase").unwrap();
    assert_eq!(method.data_sources().unwrap().len(), 2);
}

#[test]
fn methods_keep_independent_sources() {
    let mut case = TestCase::new("MathTest");
    case.method("test_add").data("small", json!([1, 2]));
    case.method("test_sub").data("big", json!([100, 1]));
    case.method("test_plain");

    let names: Vec<&str> = case.methods().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["test_add", "test_sub", "test_plain"]);

    assert_eq!(
        case.get("test_add").unwrap().entries().unwrap(),
        vec![DataEntry::new("small", json!([1, 2]))]
    );
    assert_eq!(
        case.get("test_sub").unwrap().entries().unwrap(),
        vec![DataEntry::new("big", json!([100, 1]))]
    );
    assert!(!case.get("test_plain").unwrap().is_data_driven());
    assert!(case.get("test_missing").is_none());
}

#[test]
fn expand_preserves_registration_order() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut case = TestCase::new("OrderTest");
    let method = case.method("test_order");
    method
        .data_with(|| {
            let mut map = datadriven_annotate::LabeledData::new();
            map.insert("z-lazy".into(), json!(26));
            map.insert("a-lazy".into(), json!(1));
            Ok(map)
        })
        .data("middle", json!(13));

    let entries = expand(method.data_sources().unwrap()).unwrap();
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["z-lazy", "a-lazy", "middle"]);
}
