//! Cursor-tracking depth-first traversal.
//!
//! A [`TreeVisitor`] walks one tree in deterministic pre-order (source order,
//! left to right, top to bottom), visiting every node exactly once. Each
//! visit receives a [`Cursor`]: an ephemeral, stack-allocated chain of
//! ancestor nodes from the current node up to the root. Cursors are rebuilt
//! on every traversal and only support read-only lookups.
//!
//! Traversal is always synchronous and driven by one caller over one tree.

use crate::tree::Tree;

/// Ancestor chain for the node currently being visited.
///
/// The head is the current node; following `parent` links walks up to the
/// root. Never persisted beyond the traversal that built it.
pub struct Cursor<'a, T> {
    node: &'a T,
    parent: Option<&'a Cursor<'a, T>>,
}

impl<'a, T: Tree> Cursor<'a, T> {
    pub fn root(node: &'a T) -> Cursor<'a, T> {
        Cursor { node, parent: None }
    }

    /// Cursor for a child of this cursor's node.
    pub fn child<'b>(&'b self, node: &'b T) -> Cursor<'b, T> {
        Cursor {
            node,
            parent: Some(self),
        }
    }

    pub fn node(&self) -> &T {
        self.node
    }

    pub fn parent_node(&self) -> Option<&T> {
        self.parent.map(|cursor| cursor.node)
    }

    /// The current node followed by every ancestor up to the root.
    pub fn ancestors(&self) -> Ancestors<'_, T> {
        Ancestors {
            current: Some(self),
        }
    }
}

pub struct Ancestors<'a, T> {
    current: Option<&'a Cursor<'a, T>>,
}

impl<'a, T> Iterator for Ancestors<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let cursor = self.current?;
        self.current = cursor.parent;
        Some(cursor.node)
    }
}

/// Read-only depth-first visitor with ancestor context.
///
/// Override [`visit_tree`](TreeVisitor::visit_tree) to observe nodes; call
/// [`walk_children`] from the override to keep descending. The terminal
/// [`visit_end`](TreeVisitor::visit_end) hook runs once after the full
/// traversal and can read accumulated state.
pub trait TreeVisitor<T: Tree> {
    fn visit_tree(&mut self, tree: &T, cursor: &Cursor<'_, T>) {
        walk_children(self, tree, cursor);
    }

    fn visit_end(&mut self) {}
}

/// Visit every child of `tree`, threading the cursor down.
pub fn walk_children<T: Tree, V: TreeVisitor<T> + ?Sized>(
    visitor: &mut V,
    tree: &T,
    cursor: &Cursor<'_, T>,
) {
    for child in tree.children() {
        let child_cursor = cursor.child(child);
        visitor.visit_tree(child, &child_cursor);
    }
}

/// Drive a full traversal of `root`, then fire `visit_end`.
pub fn visit<T: Tree, V: TreeVisitor<T> + ?Sized>(visitor: &mut V, root: &T) {
    let cursor = Cursor::root(root);
    visitor.visit_tree(root, &cursor);
    visitor.visit_end();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Formatting, TreeId};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Node {
        id: TreeId,
        label: &'static str,
        formatting: Formatting,
        children: Vec<Node>,
    }

    impl Node {
        fn new(label: &'static str, children: Vec<Node>) -> Node {
            Node {
                id: TreeId::next(),
                label,
                formatting: Formatting::none(),
                children,
            }
        }
    }

    impl Tree for Node {
        fn id(&self) -> TreeId {
            self.id
        }

        fn formatting(&self) -> &Formatting {
            &self.formatting
        }

        fn children(&self) -> Vec<&Node> {
            self.children.iter().collect()
        }

        fn map_prefixes(&self, f: &mut dyn FnMut(&str) -> String) -> Node {
            Node {
                id: self.id,
                label: self.label,
                formatting: Formatting::new(f(&self.formatting.prefix)),
                children: self.children.iter().map(|c| c.map_prefixes(f)).collect(),
            }
        }
    }

    struct Collector {
        order: Vec<&'static str>,
        depths: Vec<usize>,
        ended: usize,
    }

    impl TreeVisitor<Node> for Collector {
        fn visit_tree(&mut self, tree: &Node, cursor: &Cursor<'_, Node>) {
            self.order.push(tree.label);
            self.depths.push(cursor.ancestors().count());
            walk_children(self, tree, cursor);
        }

        fn visit_end(&mut self) {
            self.ended += 1;
        }
    }

    fn sample() -> Node {
        Node::new(
            "root",
            vec![
                Node::new("a", vec![Node::new("a1", vec![]), Node::new("a2", vec![])]),
                Node::new("b", vec![]),
            ],
        )
    }

    #[test]
    fn traversal_is_preorder_source_order() {
        let root = sample();
        let mut collector = Collector {
            order: vec![],
            depths: vec![],
            ended: 0,
        };
        visit(&mut collector, &root);
        assert_eq!(collector.order, ["root", "a", "a1", "a2", "b"]);
    }

    #[test]
    fn cursor_tracks_ancestor_depth() {
        let root = sample();
        let mut collector = Collector {
            order: vec![],
            depths: vec![],
            ended: 0,
        };
        visit(&mut collector, &root);
        // root=1 (itself), a=2, a1=3, a2=3, b=2
        assert_eq!(collector.depths, [1, 2, 3, 3, 2]);
    }

    #[test]
    fn visit_end_fires_once_after_traversal() {
        let root = sample();
        let mut collector = Collector {
            order: vec![],
            depths: vec![],
            ended: 0,
        };
        visit(&mut collector, &root);
        assert_eq!(collector.ended, 1);
    }

    #[test]
    fn cursor_exposes_parent_node() {
        struct ParentCheck {
            parent_of_a1: Option<&'static str>,
        }

        impl TreeVisitor<Node> for ParentCheck {
            fn visit_tree(&mut self, tree: &Node, cursor: &Cursor<'_, Node>) {
                if tree.label == "a1" {
                    self.parent_of_a1 = cursor.parent_node().map(|p| p.label);
                }
                walk_children(self, tree, cursor);
            }
        }

        let root = sample();
        let mut check = ParentCheck { parent_of_a1: None };
        visit(&mut check, &root);
        assert_eq!(check.parent_of_a1, Some("a"));
    }
}
