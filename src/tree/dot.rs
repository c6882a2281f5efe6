//! Graphviz 输出：按 Euler 序中的父子关系绘制有根树，并标注深度与首次出现位置。
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use crate::tree::index::LcaIndex;
use crate::tree::index_vec::Idx;

impl LcaIndex {
    pub fn to_dot(&self) -> String {
        let tour = self.euler_tour();
        let mut dot = String::new();
        let _ = writeln!(&mut dot, "digraph RootedTree {{");
        let _ = writeln!(&mut dot, "    rankdir=TB;");
        let _ = writeln!(&mut dot, "    node [fontname=\"Helvetica\"];");

        // tour order keeps siblings in visiting order
        let mut emitted = vec![false; tour.node_count()];
        for (position, &node) in tour.nodes().iter().enumerate() {
            if emitted[node.index()] {
                continue;
            }
            emitted[node.index()] = true;

            let fill = if Some(node) == tour.root() {
                "#c8e6c9"
            } else {
                "#e3f2fd"
            };
            let _ = writeln!(
                &mut dot,
                "    node_{} [label=\"{}\\ndepth {}\\nfirst {}\", shape=circle, style=filled, fillcolor=\"{}\"];",
                node.index(),
                node.index(),
                tour.depths()[position],
                position,
                fill
            );
            if let Some(parent) = tour.parent(node) {
                let _ = writeln!(
                    &mut dot,
                    "    node_{} -> node_{};",
                    parent.index(),
                    node.index()
                );
            }
        }

        let _ = writeln!(&mut dot, "}}");
        dot
    }

    pub fn write_dot<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_dot())
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::adjacency::Adjacency;
    use crate::tree::index::LcaIndex;

    #[test]
    fn dot_lists_parent_edges_in_visiting_order() {
        let adjacency = Adjacency::from_edges(4, [(0, 2), (0, 1), (2, 3)]).unwrap();
        let dot = LcaIndex::build(&adjacency).unwrap().to_dot();

        assert!(dot.starts_with("digraph RootedTree {"));
        assert!(dot.contains("node_0 [label=\"0\\ndepth 0\\nfirst 0\""));
        assert!(dot.contains("node_3 [label=\"3\\ndepth 2\\nfirst 2\""));
        let to_two = dot.find("node_0 -> node_2;").unwrap();
        let to_one = dot.find("node_0 -> node_1;").unwrap();
        assert!(to_two < to_one);
        assert!(dot.contains("node_2 -> node_3;"));
        assert_eq!(dot.matches("->").count(), 3);
    }
}
