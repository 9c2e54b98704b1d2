//! A flat listing of every element in a design.

use crate::context::{NodeKind, TransformContext};
use crate::error::{TransformError, VisitResult};
use crate::traverse::Transform;
use strata_ir::{Design, HierarchyBlock, Link, LinkArray, PortLike};
use strata_path::Path;

/// Every block, link and port of a design, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct DesignIndex {
    entries: Vec<(Path, NodeKind)>,
}

impl DesignIndex {
    /// Walks `design` and records each element it contains.
    pub fn build(design: &Design) -> Result<Self, TransformError> {
        let mut index = DesignIndex::default();
        index.transform_design(design)?;
        Ok(index)
    }

    /// The recorded `(path, kind)` pairs in preorder.
    pub fn entries(&self) -> &[(Path, NodeKind)] {
        &self.entries
    }

    /// Counts the recorded elements of one kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.entries.iter().filter(|(_, k)| *k == kind).count()
    }

    /// Returns the kind recorded at `path`, if any.
    pub fn kind_of(&self, path: &Path) -> Option<NodeKind> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, kind)| *kind)
    }
}

impl Transform for DesignIndex {
    fn visit_block(
        &mut self,
        context: &TransformContext<'_>,
        _block: &mut HierarchyBlock,
    ) -> VisitResult {
        self.entries.push((context.path.clone(), NodeKind::Block));
        Ok(())
    }

    fn visit_link(&mut self, context: &TransformContext<'_>, _link: &mut Link) -> VisitResult {
        self.entries.push((context.path.clone(), NodeKind::Link));
        Ok(())
    }

    fn visit_linkarray(
        &mut self,
        context: &TransformContext<'_>,
        _array: &mut LinkArray,
    ) -> VisitResult {
        self.entries.push((context.path.clone(), NodeKind::LinkArray));
        Ok(())
    }

    fn visit_portlike(
        &mut self,
        context: &TransformContext<'_>,
        port: &mut PortLike,
    ) -> VisitResult {
        let kind = match port {
            PortLike::Port(_) => NodeKind::Port,
            PortLike::Bundle(_) => NodeKind::Bundle,
            PortLike::Array(_) => NodeKind::PortArray,
            PortLike::LibraryRef(_) => return Ok(()),
        };
        self.entries.push((context.path.clone(), kind));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_ir::{BlockLike, LinkLike, Members, PortArray};

    #[test]
    fn lists_everything() {
        let gpio = PortArray {
            self_class: None,
            ports: Some(
                [("0", PortLike::port("lib.Io")), ("1", PortLike::port("lib.Io"))]
                    .into_iter()
                    .collect::<Members<_>>(),
            ),
        };
        let mcu = HierarchyBlock::new("lib.Mcu").with_port("gpio", PortLike::Array(gpio));
        let design = Design::new(
            HierarchyBlock::new("lib.Top")
                .with_link("net", LinkLike::Link(Link::new("lib.Net")))
                .with_link("bus", LinkLike::Array(LinkArray::default()))
                .with_block("mcu", BlockLike::Hierarchy(mcu)),
        );
        let index = DesignIndex::build(&design).unwrap();
        assert_eq!(index.count(NodeKind::Block), 2);
        assert_eq!(index.count(NodeKind::Link), 1);
        assert_eq!(index.count(NodeKind::LinkArray), 1);
        assert_eq!(index.count(NodeKind::PortArray), 1);
        assert_eq!(index.count(NodeKind::Port), 2);
        let element = Path::empty().append_block(["mcu"]).append_port(["gpio", "1"]);
        assert_eq!(index.kind_of(&element), Some(NodeKind::Port));
        assert_eq!(index.entries()[0].0, Path::empty());
    }
}
