//! `strata tree`: list every block, link and port of a design.

use strata_diagram::is_internal_name;
use strata_transform::{DesignIndex, NodeKind};

use crate::pipeline::read_design;
use crate::{GlobalArgs, TreeArgs};

/// Runs the `strata tree` command.
pub fn run(args: &TreeArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let design = read_design(&args.design)?;
    let index = DesignIndex::build(&design)?;
    print!("{}", render_tree(&index));
    Ok(0)
}

/// One line per element, indented by depth. Wrapper entries are skipped
/// since they repeat the element they wrap.
fn render_tree(index: &DesignIndex) -> String {
    let mut out = String::new();
    for (path, kind) in index.entries() {
        if matches!(kind, NodeKind::BlockLike | NodeKind::PortLike | NodeKind::LinkLike) {
            continue;
        }
        let depth = path.names().count();
        let name = path.names().last().unwrap_or("(root)");
        let marker = if is_internal_name(name) { " (helper)" } else { "" };
        out.push_str(&format!("{}{name} [{kind}]{marker}\n", "  ".repeat(depth)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_ir::{BlockLike, Design, HierarchyBlock, PortLike};

    #[test]
    fn tree_marks_helpers() {
        let design = Design::new(
            HierarchyBlock::new("lib.Top")
                .with_port("pwr", PortLike::port("lib.Port"))
                .with_block(
                    "(bridge)pwr",
                    BlockLike::Hierarchy(
                        HierarchyBlock::new("lib.Bridge")
                            .with_port("outer_port", PortLike::port("lib.Port")),
                    ),
                ),
        );
        let index = DesignIndex::build(&design).unwrap();
        let text = render_tree(&index);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "(root) [Block]");
        assert!(lines.contains(&"  pwr [Port]"));
        assert!(lines.contains(&"  (bridge)pwr [Block] (helper)"));
        assert!(lines.contains(&"    outer_port [Port]"));
    }
}
