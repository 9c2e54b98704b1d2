//! Resolving local references against the design tree.

use crate::error::FollowError;
use crate::path::Path;
use strata_ir::{
    BlockLike, Bundle, HierarchyBlock, Link, LinkArray, LinkLike, LocalPath, LocalStep, Port,
    PortArray, PortLike, ValInit,
};

/// A borrowed node of the design tree that a [`Path`] can point at.
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    /// A hierarchy block.
    Block(&'a HierarchyBlock),
    /// A link.
    Link(&'a Link),
    /// A link array.
    LinkArray(&'a LinkArray),
    /// A leaf port.
    Port(&'a Port),
    /// A bundle.
    Bundle(&'a Bundle),
    /// A port array.
    PortArray(&'a PortArray),
    /// A parameter declaration.
    Param(&'a ValInit),
}

impl<'a> Element<'a> {
    /// A short name for the element kind, used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Block(_) => "block",
            Element::Link(_) => "link",
            Element::LinkArray(_) => "link array",
            Element::Port(_) => "port",
            Element::Bundle(_) => "bundle",
            Element::PortArray(_) => "port array",
            Element::Param(_) => "param",
        }
    }

    fn param(&self, name: &str) -> Option<&'a ValInit> {
        match *self {
            Element::Port(port) => port.params.get(name),
            Element::Bundle(bundle) => bundle.params.get(name),
            Element::Block(block) => block.params.get(name),
            Element::Link(link) => link.params.get(name),
            _ => None,
        }
    }

    fn port(&self, name: &str) -> Option<&'a PortLike> {
        match *self {
            Element::Bundle(bundle) => bundle.ports.get(name),
            Element::Link(link) => link.ports.get(name),
            Element::LinkArray(array) => array.ports.get(name),
            Element::Block(block) => block.ports.get(name),
            Element::PortArray(array) => array.ports.as_ref().and_then(|p| p.get(name)),
            _ => None,
        }
    }

    fn block(&self, name: &str) -> Option<&'a BlockLike> {
        match *self {
            Element::Block(block) => block.blocks.get(name),
            _ => None,
        }
    }

    fn link(&self, name: &str) -> Option<&'a LinkLike> {
        match *self {
            Element::Block(block) => block.links.get(name),
            Element::Link(link) => link.links.get(name),
            Element::LinkArray(array) => array.links.get(name),
            _ => None,
        }
    }
}

/// Resolves a port-like wrapper, or `None` for a library reference.
pub fn resolve_portlike(port: &PortLike) -> Option<Element<'_>> {
    match port {
        PortLike::Port(port) => Some(Element::Port(port)),
        PortLike::Bundle(bundle) => Some(Element::Bundle(bundle)),
        PortLike::Array(array) => Some(Element::PortArray(array)),
        PortLike::LibraryRef(_) => None,
    }
}

/// Resolves a block-like wrapper, or `None` for a library reference.
pub fn resolve_blocklike(block: &BlockLike) -> Option<Element<'_>> {
    match block {
        BlockLike::Hierarchy(block) => Some(Element::Block(block)),
        BlockLike::LibraryRef(_) => None,
    }
}

/// Resolves a link-like wrapper, or `None` for a library reference.
pub fn resolve_linklike(link: &LinkLike) -> Option<Element<'_>> {
    match link {
        LinkLike::Link(link) => Some(Element::Link(link)),
        LinkLike::Array(array) => Some(Element::LinkArray(array)),
        LinkLike::LibraryRef(_) => None,
    }
}

/// The result of [`Path::follow_partial`].
#[derive(Debug, Clone)]
pub struct PartialFollow<'a> {
    /// Steps that could not be consumed, in order. Empty on a full match.
    pub remaining: Vec<LocalStep>,
    /// The deepest path reached.
    pub path: Path,
    /// The node at `path`.
    pub element: Element<'a>,
}

/// Where a single name step leads.
enum StepTarget<'a> {
    Found(Path, Element<'a>),
    Unresolved,
    NoMember,
}

impl Path {
    /// Follows `reference` from `start` (which sits at `self`), consuming as
    /// many steps as resolve.
    ///
    /// Each name step tries, in order: a param, a port, a port-array element,
    /// a sub-block, a sub-link. Walking stops at the first step that matches
    /// nothing, or at a reserved-parameter step, and the rest are returned
    /// as `remaining`. A step naming an unresolved library reference is an
    /// error.
    pub fn follow_partial<'a>(
        &self,
        reference: &LocalPath,
        start: Element<'a>,
    ) -> Result<PartialFollow<'a>, FollowError> {
        let mut path = self.clone();
        let mut element = start;
        for (index, step) in reference.steps.iter().enumerate() {
            let name = match step {
                LocalStep::Name(name) => name,
                LocalStep::Reserved { .. } => {
                    return Ok(PartialFollow {
                        remaining: reference.steps[index..].to_vec(),
                        path,
                        element,
                    })
                }
            };
            match step_into(&path, element, name) {
                StepTarget::Found(next_path, next) => {
                    path = next_path;
                    element = next;
                }
                StepTarget::NoMember => {
                    return Ok(PartialFollow {
                        remaining: reference.steps[index..].to_vec(),
                        path,
                        element,
                    })
                }
                StepTarget::Unresolved => {
                    return Err(FollowError::UnresolvedStep {
                        from: self.clone(),
                        reference: reference.to_string(),
                        at: path,
                        step: name.clone(),
                    })
                }
            }
        }
        Ok(PartialFollow {
            remaining: Vec::new(),
            path,
            element,
        })
    }

    /// Follows `reference` from `start` and requires every step to resolve.
    ///
    /// Returns the destination path and node.
    pub fn follow<'a>(
        &self,
        reference: &LocalPath,
        start: Element<'a>,
    ) -> Result<(Path, Element<'a>), FollowError> {
        let partial = self.follow_partial(reference, start)?;
        match partial.remaining.first().cloned() {
            None => Ok((partial.path, partial.element)),
            Some(LocalStep::Name(step)) if !matches!(partial.element, Element::Param(_)) => {
                Err(FollowError::UnresolvedStep {
                    from: self.clone(),
                    reference: reference.to_string(),
                    at: partial.path,
                    step,
                })
            }
            Some(_) => Err(FollowError::TrailingSteps {
                from: self.clone(),
                reference: reference.to_string(),
                remaining: LocalPath::new(partial.remaining).to_string(),
                at: partial.path,
            }),
        }
    }
}

fn step_into<'a>(path: &Path, element: Element<'a>, name: &str) -> StepTarget<'a> {
    if let Some(param) = element.param(name) {
        return StepTarget::Found(path.append_param(name), Element::Param(param));
    }
    if let Some(port) = element.port(name) {
        return match (path.try_append_port([name]), resolve_portlike(port)) {
            (Ok(next), Some(resolved)) => StepTarget::Found(next, resolved),
            _ => StepTarget::Unresolved,
        };
    }
    if let Some(block) = element.block(name) {
        return match (path.try_append_block([name]), resolve_blocklike(block)) {
            (Ok(next), Some(resolved)) => StepTarget::Found(next, resolved),
            _ => StepTarget::Unresolved,
        };
    }
    if let Some(link) = element.link(name) {
        return match (path.try_append_link([name]), resolve_linklike(link)) {
            (Ok(next), Some(resolved)) => StepTarget::Found(next, resolved),
            _ => StepTarget::Unresolved,
        };
    }
    StepTarget::NoMember
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_ir::{Constraint, LibraryPath, Members, ReservedParam};

    fn design() -> HierarchyBlock {
        let mut bus = Bundle::default();
        bus.ports.push("sda", PortLike::port("lib.Digital"));
        bus.params.push("frequency", ValInit::Range);
        let gpio = PortArray {
            self_class: None,
            ports: Some(
                [("0", PortLike::port("lib.Digital"))]
                    .into_iter()
                    .collect::<Members<_>>(),
            ),
        };
        let mcu = HierarchyBlock::new("lib.Mcu")
            .with_port("i2c", PortLike::Bundle(bus))
            .with_port("gpio", PortLike::Array(gpio))
            .with_port("spi", PortLike::Array(PortArray::default()))
            .with_port("vdd", PortLike::LibraryRef(LibraryPath::new("lib.Power")));
        HierarchyBlock::new("lib.Top")
            .with_block("mcu", BlockLike::Hierarchy(mcu))
            .with_block("lib_only", BlockLike::LibraryRef(LibraryPath::new("lib.X")))
            .with_link(
                "net",
                LinkLike::Link(
                    Link::new("lib.Net").with_port("sinks", PortLike::port("lib.Digital")),
                ),
            )
            .with_constraint("c", Constraint::connected(&["net", "sinks"], &["mcu", "i2c"]))
    }

    #[test]
    fn follow_into_bundle_param() {
        let top = design();
        let reference = LocalPath::from_names(["mcu", "i2c", "frequency"]);
        let (path, element) = Path::empty().follow(&reference, Element::Block(&top)).unwrap();
        assert_eq!(
            path,
            Path::empty()
                .append_block(["mcu"])
                .append_port(["i2c"])
                .append_param("frequency")
        );
        assert!(matches!(element, Element::Param(ValInit::Range)));
    }

    #[test]
    fn follow_link_port() {
        let top = design();
        let reference = LocalPath::from_names(["net", "sinks"]);
        let (path, element) = Path::empty().follow(&reference, Element::Block(&top)).unwrap();
        assert_eq!(path.to_string(), "net.sinks");
        assert_eq!(path.links(), ["net".to_string()]);
        assert_eq!(element.kind(), "port");
    }

    #[test]
    fn follow_array_element() {
        let top = design();
        let reference = LocalPath::from_names(["mcu", "gpio", "0"]);
        let (path, _) = Path::empty().follow(&reference, Element::Block(&top)).unwrap();
        assert_eq!(path.ports(), ["gpio".to_string(), "0".to_string()]);
    }

    #[test]
    fn missing_name_is_unresolved() {
        let top = design();
        let reference = LocalPath::from_names(["mcu", "nope"]);
        let err = Path::empty()
            .follow(&reference, Element::Block(&top))
            .unwrap_err();
        match err {
            FollowError::UnresolvedStep { at, step, .. } => {
                assert_eq!(at, Path::empty().append_block(["mcu"]));
                assert_eq!(step, "nope");
            }
            other => panic!("expected UnresolvedStep, got {other:?}"),
        }
    }

    #[test]
    fn library_reference_is_unresolved() {
        let top = design();
        for names in [vec!["lib_only"], vec!["mcu", "vdd"]] {
            let reference = LocalPath::from_names(names);
            let err = Path::empty()
                .follow_partial(&reference, Element::Block(&top))
                .unwrap_err();
            assert!(matches!(err, FollowError::UnresolvedStep { .. }));
        }
    }

    #[test]
    fn unelaborated_array_element_is_unresolved() {
        let top = design();
        let reference = LocalPath::from_names(["mcu", "spi", "0"]);
        let err = Path::empty()
            .follow(&reference, Element::Block(&top))
            .unwrap_err();
        assert!(matches!(err, FollowError::UnresolvedStep { ref step, .. } if step == "0"));
    }

    #[test]
    fn reserved_step_is_trailing() {
        let top = design();
        let reference =
            LocalPath::from_names(["mcu", "i2c"]).with_reserved(ReservedParam::ConnectedLink);
        let partial = Path::empty()
            .follow_partial(&reference, Element::Block(&top))
            .unwrap();
        assert_eq!(partial.remaining.len(), 1);
        assert_eq!(partial.path.to_string(), "mcu.i2c");

        let err = Path::empty()
            .follow(&reference, Element::Block(&top))
            .unwrap_err();
        assert!(matches!(err, FollowError::TrailingSteps { ref remaining, .. } if remaining == "(link)"));
    }

    #[test]
    fn steps_past_param_are_trailing() {
        let top = design();
        let reference = LocalPath::from_names(["mcu", "i2c", "frequency", "x"]);
        let err = Path::empty()
            .follow(&reference, Element::Block(&top))
            .unwrap_err();
        assert!(matches!(err, FollowError::TrailingSteps { .. }));
    }

    #[test]
    fn follow_from_nested_start() {
        let top = design();
        let BlockLike::Hierarchy(mcu) = top.blocks.get("mcu").unwrap() else {
            panic!("mcu should be elaborated");
        };
        let start = Path::empty().append_block(["mcu"]);
        let (path, _) = start
            .follow(&LocalPath::from_names(["i2c", "sda"]), Element::Block(mcu))
            .unwrap();
        assert_eq!(path.to_string(), "mcu.i2c.sda");
    }
}
