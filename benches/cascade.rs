//! Benchmarks for resolution, parsing and stylesheet generation.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use strata::{
    Breakpoint, BreakpointId, GenerateOptions, InstanceId, Property, Snapshot, StyleDecl, StyleMap, Value,
    evaluate_unit_value, generate, parse_value, resolve, resolve_style,
};

const PROPERTIES: [&str; 6] = [
    "color",
    "width",
    "paddingTop",
    "marginLeft",
    "fontSize",
    "lineHeight",
];

/// A page of `instances` cards sharing a few tokens, each with local overrides.
fn build_snapshot(instances: usize) -> Snapshot {
    let mut snapshot = Snapshot::new()
        .add_breakpoint(Breakpoint::min("wide", 1440))
        .unwrap();
    let breakpoints: Vec<String> = snapshot
        .breakpoints()
        .iter()
        .map(|bp| bp.id.to_string())
        .collect();

    for t in 0..4 {
        let token = format!("token-{t}");
        snapshot = snapshot.create_token(token.as_str(), format!("Token {t}")).unwrap();
        for (i, property) in PROPERTIES.iter().enumerate() {
            let bp = &breakpoints[(t + i) % breakpoints.len()];
            snapshot = snapshot
                .set_decl(StyleDecl::new(
                    token.as_str(),
                    bp.as_str(),
                    *property,
                    Value::px((t * 10 + i) as f64),
                ))
                .unwrap();
        }
    }

    for n in 0..instances {
        let instance = InstanceId::from(format!("card-{n}"));
        for t in 0..(n % 4 + 1) {
            snapshot = snapshot
                .attach_token(&instance, &format!("token-{t}").into(), None)
                .unwrap();
        }
        let (next, local) = snapshot
            .ensure_local_source(&instance, format!("local-{n}"))
            .unwrap();
        let bp = &breakpoints[n % breakpoints.len()];
        snapshot = next
            .set_decl(StyleDecl::new(local, bp.as_str(), "color", Value::keyword("red")))
            .unwrap()
            .set_decl(
                StyleDecl::new(format!("local-{n}"), "base", "width", Value::px(n as f64))
                    .with_state(":hover"),
            )
            .unwrap();
    }

    snapshot
}

fn bench_resolve(c: &mut Criterion) {
    let snapshot = build_snapshot(200);
    let instance = InstanceId::from("card-7");
    let property = Property::from("color");
    let active = BreakpointId::from("mobile-portrait");

    c.bench_function("resolve", |b| {
        b.iter(|| resolve(black_box(&snapshot), &instance, &property, &active, None));
    });

    c.bench_function("resolve_style", |b| {
        b.iter(|| resolve_style(black_box(&snapshot), &instance, &active, Some(":hover")));
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut current = StyleMap::new();
    current.insert(Property::from("width"), Value::px(10.0));
    let width = Property::from("width");

    c.bench_function("parse_value", |b| {
        b.iter(|| parse_value(&width, black_box("12.5"), &current, None));
    });

    c.bench_function("evaluate_unit_value", |b| {
        b.iter(|| evaluate_unit_value(black_box("16px * 2 + 4 / 2")));
    });
}

fn bench_generate(c: &mut Criterion) {
    let snapshot = build_snapshot(200);

    c.bench_function("generate", |b| {
        b.iter(|| generate(black_box(&snapshot), &GenerateOptions::default()).unwrap());
    });

    let atomic = GenerateOptions {
        atomic: true,
        ..GenerateOptions::default()
    };
    c.bench_function("generate_atomic", |b| {
        b.iter(|| generate(black_box(&snapshot), &atomic).unwrap());
    });
}

criterion_group!(benches, bench_resolve, bench_parse, bench_generate);
criterion_main!(benches);
