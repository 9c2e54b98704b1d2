//! The traversal engine.

use crate::context::{NodeKind, TransformContext};
use crate::error::{TransformError, VisitResult};
use log::{debug, trace};
use strata_ir::{BlockLike, Design, HierarchyBlock, Link, LinkArray, LinkLike, PortLike};

/// A preorder, in-place rewrite over a copy of a design.
///
/// Every callback defaults to doing nothing. The `visit_*like` callbacks run
/// on the wrapper before it is resolved, so they may replace it (for example
/// swapping a library reference for an elaborated block); the engine then
/// descends into whatever the wrapper holds afterwards.
pub trait Transform {
    /// Called for every hierarchy block, the root included.
    fn visit_block(
        &mut self,
        _context: &TransformContext<'_>,
        _block: &mut HierarchyBlock,
    ) -> VisitResult {
        Ok(())
    }

    /// Called for every elaborated link.
    fn visit_link(&mut self, _context: &TransformContext<'_>, _link: &mut Link) -> VisitResult {
        Ok(())
    }

    /// Called for every link array.
    fn visit_linkarray(
        &mut self,
        _context: &TransformContext<'_>,
        _array: &mut LinkArray,
    ) -> VisitResult {
        Ok(())
    }

    /// Called for every sub-block wrapper.
    fn visit_blocklike(
        &mut self,
        _context: &TransformContext<'_>,
        _block: &mut BlockLike,
    ) -> VisitResult {
        Ok(())
    }

    /// Called for every port wrapper, nested ports included.
    fn visit_portlike(
        &mut self,
        _context: &TransformContext<'_>,
        _port: &mut PortLike,
    ) -> VisitResult {
        Ok(())
    }

    /// Called for every link wrapper, nested links included.
    fn visit_linklike(
        &mut self,
        _context: &TransformContext<'_>,
        _link: &mut LinkLike,
    ) -> VisitResult {
        Ok(())
    }

    /// Copies `design`, runs the callbacks over the copy and returns it.
    ///
    /// The root block gets `visit_block`; then its ports, links and sub-blocks
    /// are traversed in declaration order.
    fn transform_design(&mut self, design: &Design) -> Result<Design, TransformError>
    where
        Self: Sized,
    {
        let mut copy = design.clone();
        let root = TransformContext::root(design);
        debug!("transform started");
        traverse_block(self, &root, &mut copy.contents)?;
        debug!("transform finished");
        Ok(copy)
    }
}

fn wrap(
    context: &TransformContext<'_>,
    kind: NodeKind,
    result: VisitResult,
) -> Result<(), TransformError> {
    result.map_err(|source| TransformError::Visit {
        path: context.path.clone(),
        kind,
        source,
    })
}

fn traverse_block<T: Transform>(
    transform: &mut T,
    context: &TransformContext<'_>,
    block: &mut HierarchyBlock,
) -> Result<(), TransformError> {
    trace!("visiting block {}", context.path);
    wrap(context, NodeKind::Block, transform.visit_block(context, block))?;
    for (name, port) in block.ports.iter_mut() {
        traverse_portlike(transform, &context.append_port(name), port)?;
    }
    for (name, link) in block.links.iter_mut() {
        traverse_linklike(transform, &context.append_link(name), link)?;
    }
    for (name, sub) in block.blocks.iter_mut() {
        traverse_blocklike(transform, &context.append_block(name), sub)?;
    }
    Ok(())
}

fn traverse_blocklike<T: Transform>(
    transform: &mut T,
    context: &TransformContext<'_>,
    block: &mut BlockLike,
) -> Result<(), TransformError> {
    wrap(context, NodeKind::BlockLike, transform.visit_blocklike(context, block))?;
    match block {
        BlockLike::Hierarchy(block) => traverse_block(transform, context, block),
        BlockLike::LibraryRef(_) => Err(TransformError::UnelaboratedReference {
            path: context.path.clone(),
            kind: NodeKind::BlockLike,
        }),
    }
}

fn traverse_portlike<T: Transform>(
    transform: &mut T,
    context: &TransformContext<'_>,
    port: &mut PortLike,
) -> Result<(), TransformError> {
    trace!("visiting port {}", context.path);
    wrap(context, NodeKind::PortLike, transform.visit_portlike(context, port))?;
    match port {
        PortLike::Port(_) => Ok(()),
        PortLike::Bundle(bundle) => {
            for (name, inner) in bundle.ports.iter_mut() {
                traverse_portlike(transform, &context.append_port(name), inner)?;
            }
            Ok(())
        }
        PortLike::Array(array) => match array.ports.as_mut() {
            Some(elements) => {
                for (name, inner) in elements.iter_mut() {
                    traverse_portlike(transform, &context.append_port(name), inner)?;
                }
                Ok(())
            }
            None => Err(TransformError::UnelaboratedReference {
                path: context.path.clone(),
                kind: NodeKind::PortArray,
            }),
        },
        PortLike::LibraryRef(_) => Err(TransformError::UnelaboratedReference {
            path: context.path.clone(),
            kind: NodeKind::PortLike,
        }),
    }
}

fn traverse_linklike<T: Transform>(
    transform: &mut T,
    context: &TransformContext<'_>,
    link: &mut LinkLike,
) -> Result<(), TransformError> {
    trace!("visiting link {}", context.path);
    wrap(context, NodeKind::LinkLike, transform.visit_linklike(context, link))?;
    match link {
        LinkLike::Link(link) => {
            wrap(context, NodeKind::Link, transform.visit_link(context, link))?;
            for (name, port) in link.ports.iter_mut() {
                traverse_portlike(transform, &context.append_port(name), port)?;
            }
            for (name, inner) in link.links.iter_mut() {
                traverse_linklike(transform, &context.append_link(name), inner)?;
            }
            Ok(())
        }
        LinkLike::Array(array) => {
            wrap(context, NodeKind::LinkArray, transform.visit_linkarray(context, array))?;
            for (name, port) in array.ports.iter_mut() {
                traverse_portlike(transform, &context.append_port(name), port)?;
            }
            for (name, inner) in array.links.iter_mut() {
                traverse_linklike(transform, &context.append_link(name), inner)?;
            }
            Ok(())
        }
        LinkLike::LibraryRef(_) => Err(TransformError::UnelaboratedReference {
            path: context.path.clone(),
            kind: NodeKind::LinkLike,
        }),
    }
}
