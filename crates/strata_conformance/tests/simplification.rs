//! Simplification scenarios: helper blocks disappear, connectivity does not.

use std::collections::BTreeSet;

use strata_conformance::{helper_board, leaf, net, DIGITAL_LINK};
use strata_diagnostics::DiagnosticSink;
use strata_diagram::{
    is_internal_name, ConnectivityIndex, DiagramBlock, DiagramLink, SimplifyError, SimplifyOptions,
};
use strata_ir::{Constraint, Design, HierarchyBlock};
use strata_path::Path;

fn port(block: &str, port: &str) -> Path {
    Path::empty().append_block([block]).append_port([port])
}

fn reachable(model: &DiagramBlock, start: &Path) -> BTreeSet<Path> {
    ConnectivityIndex::build(model)
        .propagate(start)
        .ports
        .into_iter()
        .filter(|p| !p.blocks().iter().any(|b| is_internal_name(b)))
        .collect()
}

#[test]
fn helpers_are_removed() {
    let mut model = DiagramBlock::from_design(&helper_board()).unwrap();
    let sink = DiagnosticSink::new();
    model.simplify_recursive(SimplifyOptions::default(), &sink).unwrap();
    assert!(sink.take_all().is_empty());
    let names: Vec<&str> = model.subblocks.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["osc", "mcu"]);
    assert!(!model.sublinks.contains_key("vin"));
    assert!(!model.sublinks.contains_key("clk_raw"));
    match &model.sublinks["clk"] {
        DiagramLink::Link(clk) => {
            assert_eq!(clk.ports["source"], vec![port("osc", "out")]);
            assert_eq!(clk.ports["sinks"], vec![port("mcu", "clk")]);
        }
        other => panic!("expected link, got {other:?}"),
    }
    match &model.sublinks["pwr"] {
        DiagramLink::Link(pwr) => {
            assert_eq!(pwr.ports["source"], vec![Path::empty().append_port(["vin"])]);
        }
        other => panic!("expected link, got {other:?}"),
    }
}

#[test]
fn connectivity_is_preserved() {
    let before = DiagramBlock::from_design(&helper_board()).unwrap();
    let mut after = before.clone();
    after
        .simplify_recursive(SimplifyOptions::default(), &DiagnosticSink::new())
        .unwrap();
    for start in [port("osc", "vdd"), port("mcu", "vdd"), port("osc", "out"), port("mcu", "clk")] {
        let was = reachable(&before, &start);
        let now = reachable(&after, &start);
        assert!(was.is_subset(&now), "{start}: {was:?} not within {now:?}");
    }
    assert!(reachable(&after, &port("osc", "out")).contains(&port("mcu", "clk")));
    assert!(reachable(&after, &port("mcu", "vdd")).contains(&Path::empty().append_port(["vin"])));
}

#[test]
fn simplification_is_idempotent() {
    let mut model = DiagramBlock::from_design(&helper_board()).unwrap();
    let sink = DiagnosticSink::new();
    model.simplify_recursive(SimplifyOptions::default(), &sink).unwrap();
    let once = model.clone();
    assert_eq!(model.collapse_bridges().unwrap(), 0);
    assert_eq!(model.collapse_adapters(&sink).unwrap(), 0);
    model.simplify_recursive(SimplifyOptions::default(), &sink).unwrap();
    assert_eq!(model, once);
}

#[test]
fn disabled_simplification_keeps_helpers() {
    let mut model = DiagramBlock::from_design(&helper_board()).unwrap();
    let options = SimplifyOptions {
        collapse_bridges: false,
        collapse_adapters: false,
    };
    let before = model.clone();
    model.simplify_recursive(options, &DiagnosticSink::new()).unwrap();
    assert_eq!(model, before);
}

#[test]
fn bridge_with_extra_port_is_malformed() {
    let design = Design::new(
        HierarchyBlock::new("lib.Board")
            .with_link("pwr", net(DIGITAL_LINK))
            .with_block("(bridge)x", leaf("lib.Bridge", &["outer_port", "inner_link", "spare"]))
            .with_constraint(
                "b",
                Constraint::connected(&["pwr", "source"], &["(bridge)x", "inner_link"]),
            ),
    );
    let mut model = DiagramBlock::from_design(&design).unwrap();
    let err = model.collapse_bridges().unwrap_err();
    assert!(matches!(err, SimplifyError::MalformedHelper { .. }));
}
