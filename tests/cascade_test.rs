//! Cascade resolution over a snapshot loaded from disk.

use std::fs::File;
use std::io::Write;

use strata::{
    Breakpoint, InstanceId, Property, Snapshot, SnapshotData, StyleDecl, Value, resolve,
    resolve_style, resolve_with_origin,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{}/{}", FIXTURES_DIR, name)
}

fn site() -> Snapshot {
    let file = File::open(fixture_path("site.json")).expect("Failed to open fixture");
    let data = SnapshotData::from_reader(file).expect("Failed to parse fixture");
    Snapshot::from_data(data).expect("Fixture should load")
}

fn color(snapshot: &Snapshot, instance: &str, breakpoint: &str, state: Option<&str>) -> Option<Value> {
    resolve(
        snapshot,
        &instance.into(),
        &Property::from("color"),
        &breakpoint.into(),
        state,
    )
}

// ============================================================================
// Token / local scenario
// ============================================================================

#[test]
fn test_token_then_local_scenario() {
    let snapshot = site();
    snapshot.validate().expect("Fixture should be consistent");

    assert_eq!(color(&snapshot, "A", "base", None), Some(Value::keyword("red")));
    assert_eq!(color(&snapshot, "A", "md", None), Some(Value::keyword("blue")));
    // Nothing more specific at lg, so the md value falls through.
    assert_eq!(color(&snapshot, "A", "lg", None), Some(Value::keyword("blue")));
}

#[test]
fn test_states_fall_back_per_breakpoint() {
    let snapshot = site();
    let green = Value::Rgb {
        r: 0.0,
        g: 128.0,
        b: 0.0,
        alpha: 1.0,
    };

    assert_eq!(color(&snapshot, "A", "lg", Some(":hover")), Some(green));
    assert_eq!(
        color(&snapshot, "A", "md", Some(":hover")),
        Some(Value::keyword("blue"))
    );
    assert_eq!(
        color(&snapshot, "A", "base", Some(":focus")),
        Some(Value::keyword("red"))
    );
}

#[test]
fn test_shared_token_reaches_every_instance() {
    let snapshot = site();
    // B selects the token after its local source; the local still ranks last.
    assert_eq!(color(&snapshot, "B", "lg", None), Some(Value::keyword("red")));

    let style = resolve_style(&snapshot, &"B".into(), &"base".into(), None);
    assert_eq!(style.len(), 3);
    assert_eq!(
        style.get(&Property::from("paddingTop")),
        Some(&Value::px(8.0))
    );
}

#[test]
fn test_origin_points_at_declaration() {
    let snapshot = site();
    let resolved = resolve_with_origin(
        &snapshot,
        &"A".into(),
        &Property::from("color"),
        &"lg".into(),
        None,
    )
    .expect("color should resolve");

    assert_eq!(resolved.style_source_id.as_str(), "A-local");
    assert_eq!(resolved.breakpoint_id.as_str(), "md");
    assert!(resolved.is_cascaded(&"lg".into()));
    assert!(!resolved.stated);
}

#[test]
fn test_unknown_inputs_resolve_to_nothing() {
    let snapshot = site();
    assert_eq!(color(&snapshot, "nobody", "base", None), None);
    assert_eq!(color(&snapshot, "A", "missing", None), None);
    assert_eq!(
        resolve(&snapshot, &InstanceId::from("A"), &"opacity".into(), &"lg".into(), None),
        None
    );
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_edits_leave_older_revisions_untouched() {
    let before = site();
    let after = before
        .set_decl(StyleDecl::new("T", "lg", "color", Value::keyword("purple")))
        .unwrap();

    // The local source still outranks the token, whatever the breakpoint.
    assert_eq!(color(&after, "A", "lg", None), Some(Value::keyword("blue")));
    assert_eq!(color(&after, "B", "lg", None), Some(Value::keyword("purple")));
    assert_eq!(color(&before, "B", "lg", None), Some(Value::keyword("red")));
}

#[test]
fn test_new_breakpoint_joins_the_cascade() {
    let snapshot = site()
        .add_breakpoint(Breakpoint::min("xl", 1280))
        .unwrap()
        .set_decl(StyleDecl::new("T", "xl", "color", Value::keyword("black")))
        .unwrap();

    assert_eq!(color(&snapshot, "B", "xl", None), Some(Value::keyword("black")));
    assert_eq!(color(&snapshot, "B", "lg", None), Some(Value::keyword("red")));

    let removed = snapshot.remove_breakpoint(&"xl".into()).unwrap();
    assert_eq!(color(&removed, "B", "xl", None), None);
    assert_eq!(removed.decl_count(), site().decl_count());
}

#[test]
fn test_convert_local_to_token_keeps_values() {
    let snapshot = site();
    let converted = snapshot
        .convert_local_to_token(&"A".into(), "T2", "Callout")
        .unwrap();

    for bp in ["base", "md", "lg"] {
        for state in [None, Some(":hover")] {
            assert_eq!(
                color(&converted, "A", bp, state),
                color(&snapshot, "A", bp, state),
                "{bp} {state:?}"
            );
        }
    }
    assert!(converted.local_source_of(&"A".into()).is_none());
}

#[test]
fn test_snapshot_file_round_trip() {
    let snapshot = site();
    let json = snapshot.to_data().to_json_pretty().unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let reopened = File::open(file.path()).unwrap();
    let data = SnapshotData::from_reader(reopened).unwrap();
    let reloaded = Snapshot::from_data(data).unwrap();

    assert_eq!(reloaded.to_data(), snapshot.to_data());
}
