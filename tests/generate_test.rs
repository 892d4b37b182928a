//! Stylesheet generation from a snapshot loaded from disk.

use std::fs;

use strata::{
    Error, GenerateOptions, Snapshot, SnapshotData, StructuralError, StyleDecl, Value,
    WarningKind, generate,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn site() -> Snapshot {
    let json = fs::read_to_string(format!("{}/site.json", FIXTURES_DIR))
        .expect("Failed to read fixture");
    Snapshot::from_json(&json).expect("Fixture should load")
}

fn atomic() -> GenerateOptions {
    GenerateOptions {
        atomic: true,
        ..GenerateOptions::default()
    }
}

#[test]
fn test_generate_site() {
    let css = generate(&site(), &GenerateOptions::default()).unwrap();

    assert!(css.warnings.is_empty(), "{:?}", css.warnings);
    assert!(css.css_text.starts_with("@layer "));
    assert!(css.css_text.contains("color: red;"));
    assert!(css.css_text.contains("padding-top: 8px;"));
    assert!(css.css_text.contains("@media (min-width: 768px)"));
    assert!(css.css_text.contains("@media (min-width: 1024px)"));
    assert!(css.css_text.contains(":hover {"));
    assert!(css.css_text.contains("color: rgb(0, 128, 0);"));
    assert!(css.css_text.contains("background-color: #fafafa;"));

    // Token class first, local class last.
    let a = css.classes_of(&"A".into());
    let b = css.classes_of(&"B".into());
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 2);
    assert_eq!(a[0], b[0]);
    assert_ne!(a[1], b[1]);
}

#[test]
fn test_local_layer_comes_last() {
    let css = generate(&site(), &GenerateOptions::default()).unwrap();
    let statement = css.css_text.lines().next().unwrap();
    assert!(statement.ends_with(", local;"), "{statement}");
}

#[test]
fn test_generate_is_byte_identical() {
    let snapshot = site();
    for options in [GenerateOptions::default(), atomic()] {
        let first = generate(&snapshot, &options).unwrap();
        let second = generate(&site(), &options).unwrap();
        assert_eq!(first.css_text, second.css_text);
        assert_eq!(first.class_map, second.class_map);
    }
}

#[test]
fn test_edit_changes_only_affected_rules() {
    let before = generate(&site(), &GenerateOptions::default()).unwrap();
    let edited = site()
        .set_decl(StyleDecl::new("T", "base", "color", Value::keyword("maroon")))
        .unwrap();
    let after = generate(&edited, &GenerateOptions::default()).unwrap();

    assert_ne!(before.css_text, after.css_text);
    assert_eq!(
        before.css_text.replace("color: red;", "color: maroon;"),
        after.css_text
    );
    assert_eq!(before.class_map, after.class_map);
}

#[test]
fn test_atomic_class_map() {
    let css = generate(&site(), &atomic()).unwrap();

    // A: two token atoms and two local atoms.
    assert_eq!(css.classes_of(&"A".into()).len(), 4);
    // B: two token atoms and one local atom.
    assert_eq!(css.classes_of(&"B".into()).len(), 3);
    // Token atoms are shared.
    assert_eq!(
        css.classes_of(&"A".into())[..2],
        css.classes_of(&"B".into())[..2]
    );
}

#[test]
fn test_skipped_declarations_are_reported() {
    let mut data = site().to_data();
    data.decls
        .push(StyleDecl::new("T", "md", "width", Value::invalid("10p")));
    let snapshot = Snapshot::from_data(data).unwrap();

    let css = generate(&snapshot, &GenerateOptions::default()).unwrap();
    assert_eq!(css.warnings.len(), 1);
    assert_eq!(css.warnings[0].kind, WarningKind::InvalidValue);
    assert!(css.warnings[0].message.contains("width"));
    assert!(!css.css_text.contains("10p"));
}

#[test]
fn test_dangling_selection_fails() {
    let mut data = site().to_data();
    data.selections[0].values.push("ghost".into());
    let snapshot = Snapshot::from_data(data).unwrap();

    match generate(&snapshot, &GenerateOptions::default()) {
        Err(Error::Structural(StructuralError::SelectionUnknownStyleSource {
            style_source_id,
            ..
        })) => assert_eq!(style_source_id.as_str(), "ghost"),
        other => panic!("expected a structural error, got {other:?}"),
    }
}

#[test]
fn test_shared_local_source_fails() {
    let mut data: SnapshotData = site().to_data();
    let a_local = data.selections[0]
        .values
        .iter()
        .find(|id| id.as_str() == "A-local")
        .cloned()
        .unwrap();
    data.selections[1].values.push(a_local);
    let snapshot = Snapshot::from_data(data).unwrap();

    let err = generate(&snapshot, &GenerateOptions::default()).unwrap_err();
    assert!(err.to_string().starts_with("structural error"), "{err}");
}
