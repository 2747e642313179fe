use alloc::{collections::VecDeque, format, string::String};
use core::fmt;

use crate::{store::NodeId, AvlTree};

impl<K: Ord + fmt::Display> AvlTree<K> {
    /// Renders the shape of the tree in Graphviz DOT format.
    ///
    /// Nodes are labelled `key:height` and laid out one rank per tree level; missing children are
    /// drawn as points. Node identifiers are derived from arena handles, so any key text is safe.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let id = node.index();
                let label = escape_label(self.nodes.key(node));
                let height = self.nodes.links(node).height();
                write!(w, "\"graph{name}-n{id}\" [label=\"{label}:{height}\"]; ")?;

                let node_links = self.nodes.links(node);
                for child in [node_links.left(), node_links.right()] {
                    match child {
                        Some(child) => {
                            let child_id = child.index();

                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-n{id}\" -> \"graph{name}-n{child_id}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-n{id}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

// Renders `key` for use inside a double-quoted DOT string.
fn escape_label<K: fmt::Display>(key: &K) -> String {
    let mut out = String::new();

    for c in format!("{key}").chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }

    out
}
