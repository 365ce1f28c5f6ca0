//! Graphviz export for visualization tooling.
//!
//! Emits a `digraph DD` with one line per reachable node and two edges per
//! internal node: the then edge solid, the else edge dashed, and either
//! additionally dotted when the edge handle is complemented. Terminals are
//! boxes labeled with their value, so mixed BDD/ADD/ZDD root sets render
//! into one picture.

use std::io;
use std::path::Path;

use crate::manager::Dd;
use crate::reference::Ref;

impl Dd {
    /// Renders everything reachable from `roots` as a Graphviz digraph.
    pub fn to_dot(&self, roots: &[Ref]) -> Result<String, std::fmt::Error> {
        use std::fmt::Write as _;

        let mut dot = String::new();
        writeln!(dot, "digraph DD {{")?;

        let all_nodes = self.descendants(roots.iter().copied());

        for &id in &all_nodes {
            let node = self.node(id);
            if node.is_terminal() {
                writeln!(dot, "node{} [label=\"{}\" shape=box]", id, node.value)?;
            } else {
                writeln!(dot, "node{} [label=\"x{}\"]", id, node.variable.id())?;
            }
        }

        for &id in &all_nodes {
            let node = self.node(id);
            if node.is_terminal() {
                continue;
            }

            let high_style = if node.high.is_complemented() {
                "\"solid,dotted\""
            } else {
                "solid"
            };
            writeln!(dot, "node{} -> node{} [style={}]", id, node.high.index(), high_style)?;

            let low_style = if node.low.is_complemented() {
                "\"dashed,dotted\""
            } else {
                "dashed"
            };
            writeln!(dot, "node{} -> node{} [style={}]", id, node.low.index(), low_style)?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }

    /// Writes [`to_dot`](Dd::to_dot) output to a file.
    pub fn write_dot<P: AsRef<Path>>(&self, path: P, roots: &[Ref]) -> io::Result<()> {
        let dot = self
            .to_dot(roots)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        std::fs::write(path, dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_shape() {
        let dd = Dd::new(3);
        let x1 = dd.ith_var(1);
        let x2 = dd.ith_var(2);
        let f = dd.apply_and(x1, x2);

        let dot = dd.to_dot(&[f]).unwrap();
        assert!(dot.starts_with("digraph DD {"));
        assert!(dot.trim_end().ends_with('}'));

        // Internal nodes carry variable labels, the terminal is a box.
        assert!(dot.contains("[label=\"x1\"]"));
        assert!(dot.contains("[label=\"x2\"]"));
        assert!(dot.contains("shape=box"));

        // x1 ∧ x2 has complemented else edges to the terminal.
        assert!(dot.contains("[style=solid]"));
        assert!(dot.contains("[style=\"dashed,dotted\"]"));
    }

    #[test]
    fn test_dot_mixed_roots() {
        let dd = Dd::new(3);
        let f = dd.apply_or(dd.ith_var(1), dd.ith_var(2));
        let g = dd.add_ith_var(3);

        let dot = dd.to_dot(&[f, g]).unwrap();
        // ADD terminals appear with their values.
        assert!(dot.contains("[label=\"0\" shape=box]"));
        assert!(dot.contains("[label=\"1\" shape=box]"));
        assert!(dot.contains("[label=\"x3\"]"));
    }

    #[test]
    fn test_write_dot() {
        let dd = Dd::new(2);
        let f = dd.ith_var(1);

        let path = std::env::temp_dir().join("ananke_dd_dot_test.dot");
        dd.write_dot(&path, &[f]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, dd.to_dot(&[f]).unwrap());
        std::fs::remove_file(&path).ok();
    }
}
