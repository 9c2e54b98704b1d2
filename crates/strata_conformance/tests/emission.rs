//! Direction and edge-emission scenarios run through the full pipeline.

use strata_conformance::{leaf, net, power_board, run_pipeline, ELECTRICAL_LINK};
use strata_config::{load_config_from_str, StrataConfig};
use strata_graph::ElementKind;
use strata_ir::{BlockLike, Constraint, Design, HierarchyBlock, PortLike};

fn edge_ends(result: &strata_conformance::PipelineResult, id: &str) -> (String, String, bool) {
    let edge = result
        .loaded
        .request
        .edge(id)
        .unwrap_or_else(|| panic!("missing edge {id}"));
    (edge.source.clone(), edge.target.clone(), edge.directed)
}

#[test]
fn high_fanout_net_uses_tunnels() {
    let result = run_pipeline(&power_board(4), &StrataConfig::default()).unwrap();
    let request = &result.loaded.request;
    let tunnels: Vec<&str> = request
        .nodes
        .iter()
        .filter(|n| n.id.starts_with("tunnel:"))
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(
        tunnels,
        vec![
            "tunnel:vcc:sources_0",
            "tunnel:vcc:sinks_0",
            "tunnel:vcc:sinks_1",
            "tunnel:vcc:sinks_2",
            "tunnel:vcc:sinks_3",
        ]
    );
    assert!(request
        .nodes
        .iter()
        .filter(|n| n.id.starts_with("tunnel:"))
        .all(|n| n.label == "vcc" && n.ports.len() == 1));
    assert_eq!(
        edge_ends(&result, "edge:vcc_reg.vout"),
        ("port:reg.vout".into(), "tunnel:vcc:sources_0:port".into(), true)
    );
    assert_eq!(
        edge_ends(&result, "edge:vcc_load2.vin"),
        ("tunnel:vcc:sinks_2:port".into(), "port:load2.vin".into(), true)
    );
    assert!(request.edge("edge:vcc_reg.vout_load0.vin").is_none());
    let mapped = result.loaded.elements.get("tunnel:vcc:sinks_3").unwrap();
    assert_eq!(mapped.kind, ElementKind::Tunnel);
    assert_eq!(mapped.path.to_string(), "vcc");
}

#[test]
fn fanout_at_threshold_draws_direct_edges() {
    let result = run_pipeline(&power_board(3), &StrataConfig::default()).unwrap();
    let request = &result.loaded.request;
    assert!(request.nodes.iter().all(|n| !n.id.starts_with("tunnel:")));
    for i in 0..3 {
        let id = format!("edge:vcc_reg.vout_load{i}.vin");
        assert_eq!(
            edge_ends(&result, &id),
            ("port:reg.vout".into(), format!("port:load{i}.vin"), true)
        );
    }
}

#[test]
fn configured_threshold_applies() {
    let config = load_config_from_str("[fanout]\nthreshold = 10\n").unwrap();
    let result = run_pipeline(&power_board(4), &config).unwrap();
    assert!(result.loaded.request.nodes.iter().all(|n| !n.id.starts_with("tunnel:")));
    assert_eq!(
        result
            .loaded
            .request
            .edges
            .iter()
            .filter(|e| e.id.starts_with("edge:vcc_"))
            .count(),
        4
    );
}

#[test]
fn anonymous_net_tunnels_use_source_port_name() {
    let mut top = HierarchyBlock::new("lib.Board")
        .with_link("_anon_3", net(ELECTRICAL_LINK))
        .with_block("reg", leaf("lib.Regulator", &["vout"]))
        .with_constraint("s", Constraint::connected(&["_anon_3", "source"], &["reg", "vout"]));
    for i in 0..4 {
        let name = format!("cap{i}");
        top = top.with_block(&name, leaf("lib.Capacitor", &["pwr"])).with_constraint(
            &format!("k{i}"),
            Constraint::connected(&["_anon_3", "sinks"], &[name.as_str(), "pwr"]),
        );
    }
    let result = run_pipeline(&Design::new(top), &StrataConfig::default()).unwrap();
    let tunnel = result.loaded.request.node("tunnel:_anon_3:sinks_0").unwrap();
    assert_eq!(tunnel.label, "vout");
}

/// `load0.vin` is a sink of `vcc`, so inside `load0` it drives the
/// exported `cap.pwr`.
#[test]
fn export_of_parent_sink_drives_interior() {
    let result = run_pipeline(&power_board(2), &StrataConfig::default()).unwrap();
    assert_eq!(result.loaded.depth, 2);
    assert_eq!(
        edge_ends(&result, "edge:load0.vin_load0.vin_load0.cap.pwr"),
        ("port:load0.vin".into(), "port:load0.cap.pwr".into(), true)
    );
    let cap = result.loaded.request.node("block:load0.cap").unwrap();
    assert_eq!(cap.parent.as_deref(), Some("block:load0"));
    assert_eq!(result.error_count, 0);
    assert_eq!(result.warning_count, 0);
}

/// `supply.vout` is the source of `vcc`, so inside `supply` the exterior is
/// driven by the exported `reg.vout`.
#[test]
fn export_of_parent_source_is_driven_by_interior() {
    let supply = HierarchyBlock::new("lib.Supply")
        .with_port("vout", PortLike::port("lib.Source"))
        .with_block("reg", leaf("lib.Regulator", &["vout"]))
        .with_constraint("e", Constraint::exported(&["vout"], &["reg", "vout"]));
    let design = Design::new(
        HierarchyBlock::new("lib.Board")
            .with_link("vcc", net(ELECTRICAL_LINK))
            .with_block("supply", BlockLike::Hierarchy(supply))
            .with_block("mcu", leaf("lib.Mcu", &["vdd"]))
            .with_constraint("s", Constraint::connected(&["vcc", "source"], &["supply", "vout"]))
            .with_constraint("k", Constraint::connected(&["vcc", "sinks"], &["mcu", "vdd"])),
    );
    let result = run_pipeline(&design, &StrataConfig::default()).unwrap();
    assert_eq!(
        edge_ends(&result, "edge:supply.vout_supply.reg.vout_supply.vout"),
        ("port:supply.reg.vout".into(), "port:supply.vout".into(), true)
    );
}

#[test]
fn unknown_link_type_is_reported_and_still_drawn() {
    let design = Design::new(
        HierarchyBlock::new("lib.Board")
            .with_link("sig", net("vendor.MysteryLink"))
            .with_block("a", leaf("lib.A", &["out"]))
            .with_block("b", leaf("lib.B", &["in"]))
            .with_constraint("s", Constraint::connected(&["sig", "source"], &["a", "out"]))
            .with_constraint("k", Constraint::connected(&["sig", "sinks"], &["b", "in"])),
    );
    let result = run_pipeline(&design, &StrataConfig::default()).unwrap();
    assert_eq!(result.codes(), vec!["W401", "W401"]);
    assert_eq!(
        edge_ends(&result, "edge:sig_a.out_b.in"),
        ("port:a.out".into(), "port:b.in".into(), true)
    );

    let config = load_config_from_str(
        "[directions.\"vendor.MysteryLink\"]\nsource = [\"source\"]\nsink = [\"sinks\"]\n",
    )
    .unwrap();
    let result = run_pipeline(&design, &config).unwrap();
    assert!(result.codes().is_empty());
}

#[test]
fn sink_only_net_draws_undirected_edges() {
    let design = Design::new(
        HierarchyBlock::new("lib.Board")
            .with_link("gnd", net(ELECTRICAL_LINK))
            .with_block("a", leaf("lib.A", &["gnd"]))
            .with_block("b", leaf("lib.B", &["gnd"]))
            .with_constraint("k0", Constraint::connected(&["gnd", "sinks"], &["a", "gnd"]))
            .with_constraint("k1", Constraint::connected(&["gnd", "sinks"], &["b", "gnd"])),
    );
    let result = run_pipeline(&design, &StrataConfig::default()).unwrap();
    assert_eq!(result.codes(), vec!["W404"]);
    let (_, _, directed) = edge_ends(&result, "edge:gnd_a.gnd_b.gnd");
    assert!(!directed);
    assert!(result.loaded.request.edge("edge:gnd_b.gnd_a.gnd").is_none());
}
