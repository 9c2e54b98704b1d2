//! Collapsing compiler-generated bridge and adapter blocks.
//!
//! A bridge joins an exported port to an internal link; an adapter converts
//! between two port types. Neither adds anything to a drawing, so both are
//! replaced by direct attachments. Replacements happen in place, keeping the
//! position of the attachment in its port list.

use crate::error::SimplifyError;
use crate::errors::warn_adapter_not_collapsible;
use crate::model::{DiagramBlock, DiagramLink, ADAPTER_PREFIX, BRIDGE_PREFIX};
use log::debug;
use strata_diagnostics::DiagnosticSink;
use strata_path::Path;

/// Which helper blocks [`DiagramBlock::simplify_recursive`] collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// Collapse `(bridge)` blocks.
    pub collapse_bridges: bool,
    /// Collapse `(adapter)` blocks.
    pub collapse_adapters: bool,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            collapse_bridges: true,
            collapse_adapters: true,
        }
    }
}

fn malformed(path: &Path, reason: impl Into<String>) -> SimplifyError {
    SimplifyError::MalformedHelper {
        path: path.clone(),
        reason: reason.into(),
    }
}

/// The single attachment of a helper port.
fn helper_port(helper: &DiagramBlock, name: &str) -> Result<Path, SimplifyError> {
    match helper.ports.get(name).map(Vec::as_slice) {
        Some([only]) => Ok(only.clone()),
        Some(attached) => Err(malformed(
            &helper.path,
            format!("port '{name}' has {} connections, expected 1", attached.len()),
        )),
        None => Err(malformed(&helper.path, format!("missing port '{name}'"))),
    }
}

fn replace_entry(entries: &mut [Path], old: &Path, new: Path) -> bool {
    match entries.iter_mut().find(|entry| *entry == old) {
        Some(entry) => {
            *entry = new;
            true
        }
        None => false,
    }
}

fn helper_names(block: &DiagramBlock, prefix: &str) -> Vec<String> {
    block
        .subblocks
        .keys()
        .filter(|name| name.starts_with(prefix))
        .cloned()
        .collect()
}

/// How one adapter collapses: one neighbouring net is removed and its far
/// end is attached to the other.
struct AdapterPlan {
    removed_net: String,
    removed_side: Path,
    kept_net: String,
    kept_link_port: Path,
    kept_side: Path,
}

impl DiagramBlock {
    /// Collapses every direct `(bridge)` sub-block.
    ///
    /// The bridge's `inner_link` attachment on the internal link is replaced
    /// by the exterior port it was exported through; the export pseudo-link
    /// and the bridge are removed. Returns how many bridges were collapsed.
    pub fn collapse_bridges(&mut self) -> Result<usize, SimplifyError> {
        let names = helper_names(self, BRIDGE_PREFIX);
        for name in &names {
            self.collapse_bridge(name)?;
        }
        Ok(names.len())
    }

    fn collapse_bridge(&mut self, name: &str) -> Result<(), SimplifyError> {
        let bridge = self
            .subblocks
            .get(name)
            .ok_or_else(|| malformed(&self.path, format!("no sub-block '{name}'")))?;
        if bridge.ports.len() != 2 {
            return Err(malformed(&bridge.path, "a bridge has exactly two ports"));
        }
        let inner_link = helper_port(bridge, "inner_link")?;
        let outer_port = helper_port(bridge, "outer_port")?;
        let bridge_side = bridge.path.append_port(["inner_link"]);
        let bridge_path = bridge.path.clone();

        let export_name = outer_port.ports().join(".");
        if !matches!(self.sublinks.get(&export_name), Some(DiagramLink::Export(_))) {
            return Err(malformed(
                &bridge_path,
                format!("no export through '{outer_port}'"),
            ));
        }
        let net = inner_link
            .links()
            .first()
            .and_then(|link| self.sublinks.get_mut(link));
        let Some(DiagramLink::Link(net)) = net else {
            return Err(malformed(
                &bridge_path,
                format!("'{inner_link}' is not on a link"),
            ));
        };
        let attached = inner_link
            .ports()
            .first()
            .and_then(|port| net.ports.get_mut(port));
        let replaced = attached
            .map(|attached| replace_entry(attached, &bridge_side, outer_port))
            .unwrap_or(false);
        if !replaced {
            return Err(malformed(
                &bridge_path,
                format!("'{inner_link}' does not list the bridge"),
            ));
        }

        self.sublinks.shift_remove(&export_name);
        self.subblocks.shift_remove(name);
        debug!("collapsed bridge {bridge_path}");
        Ok(())
    }

    /// Collapses every direct `(adapter)` sub-block that has a two-ended net
    /// on one side and a link on the other.
    ///
    /// The far end of the two-ended net takes the adapter's place on the
    /// other link; the two-ended net and the adapter are removed. Adapters
    /// that do not fit are left in place with a W402 warning. Returns how
    /// many adapters were collapsed.
    pub fn collapse_adapters(&mut self, sink: &DiagnosticSink) -> Result<usize, SimplifyError> {
        let mut collapsed = 0;
        for name in helper_names(self, ADAPTER_PREFIX) {
            if self.collapse_adapter(&name, sink)? {
                collapsed += 1;
            }
        }
        Ok(collapsed)
    }

    /// The key of the sub-link an adapter attachment points at: its link
    /// name, or for an export its exterior port names.
    fn attached_net(&self, attachment: &Path, adapter: &Path) -> Result<String, SimplifyError> {
        if let Some(link) = attachment.links().first() {
            if self.sublinks.contains_key(link) {
                return Ok(link.clone());
            }
        }
        let export_name = attachment.ports().join(".");
        if self.sublinks.contains_key(&export_name) {
            return Ok(export_name);
        }
        Err(malformed(
            adapter,
            format!("'{attachment}' is not attached to a net"),
        ))
    }

    fn collapse_adapter(
        &mut self,
        name: &str,
        sink: &DiagnosticSink,
    ) -> Result<bool, SimplifyError> {
        let adapter = self
            .subblocks
            .get(name)
            .ok_or_else(|| malformed(&self.path, format!("no sub-block '{name}'")))?;
        if adapter.ports.len() != 2 {
            return Err(malformed(&adapter.path, "an adapter has exactly two ports"));
        }
        let adapter_path = adapter.path.clone();
        let src_port = helper_port(adapter, "src")?;
        let dst_port = helper_port(adapter, "dst")?;
        let src_side = adapter_path.append_port(["src"]);
        let dst_side = adapter_path.append_port(["dst"]);
        let src_net = self.attached_net(&src_port, &adapter_path)?;
        let dst_net = self.attached_net(&dst_port, &adapter_path)?;

        let two_ended = |key: &str| {
            self.sublinks
                .get(key)
                .is_some_and(|link| link.all_ports().len() == 2)
        };
        let is_link = |key: &str| matches!(self.sublinks.get(key), Some(DiagramLink::Link(_)));
        let plan = if two_ended(&src_net) && is_link(&dst_net) {
            AdapterPlan {
                removed_net: src_net,
                removed_side: src_side,
                kept_net: dst_net,
                kept_link_port: dst_port,
                kept_side: dst_side,
            }
        } else if two_ended(&dst_net) && is_link(&src_net) {
            AdapterPlan {
                removed_net: dst_net,
                removed_side: dst_side,
                kept_net: src_net,
                kept_link_port: src_port,
                kept_side: src_side,
            }
        } else {
            sink.emit(warn_adapter_not_collapsible(&adapter_path, &src_port, &dst_port));
            return Ok(false);
        };

        self.apply_adapter_plan(&adapter_path, plan)?;
        self.subblocks.shift_remove(name);
        debug!("collapsed adapter {adapter_path}");
        Ok(true)
    }

    fn apply_adapter_plan(
        &mut self,
        adapter: &Path,
        plan: AdapterPlan,
    ) -> Result<(), SimplifyError> {
        let far = {
            let removed = self
                .sublinks
                .get(&plan.removed_net)
                .ok_or_else(|| malformed(adapter, "adapter net disappeared"))?;
            let ends = removed.all_ports();
            let Some(at) = ends.iter().position(|end| **end == plan.removed_side) else {
                return Err(malformed(
                    adapter,
                    format!("'{}' does not list the adapter", removed.path()),
                ));
            };
            ends[1 - at].clone()
        };

        let Some(DiagramLink::Link(kept)) = self.sublinks.get_mut(&plan.kept_net) else {
            return Err(malformed(adapter, "adapter link disappeared"));
        };
        let replaced = plan
            .kept_link_port
            .ports()
            .first()
            .and_then(|port| kept.ports.get_mut(port))
            .map(|attached| replace_entry(attached, &plan.kept_side, far.clone()))
            .unwrap_or(false);
        if !replaced {
            return Err(malformed(
                adapter,
                format!("'{}' does not list the adapter", plan.kept_link_port),
            ));
        }

        let removed = self.sublinks.shift_remove(&plan.removed_net);
        let target = self
            .subblock_port(&far)
            .map(|(block, port)| (block.to_string(), port.to_string()));
        if let (Some(removed), Some((block, port))) = (removed, target) {
            let attached = self
                .subblocks
                .get_mut(&block)
                .and_then(|sub| sub.ports.get_mut(&port));
            for entry in attached.into_iter().flatten() {
                if removed.is_referenced_by(entry) {
                    *entry = plan.kept_link_port.clone();
                }
            }
        }
        Ok(())
    }

    /// Collapses helpers in this block, then in every sub-block.
    pub fn simplify_recursive(
        &mut self,
        options: SimplifyOptions,
        sink: &DiagnosticSink,
    ) -> Result<(), SimplifyError> {
        if options.collapse_bridges {
            self.collapse_bridges()?;
        }
        if options.collapse_adapters {
            self.collapse_adapters(sink)?;
        }
        for sub in self.subblocks.values_mut() {
            sub.simplify_recursive(options, sink)?;
        }
        Ok(())
    }
}
