//! The dependency graph derived from a manifest snapshot.
//!
//! Nodes are canonical target names; an edge A -> B means "A depends on
//! B", so B's compiled artifact and public headers must be visible when
//! building A. Construction checks referential integrity exhaustively;
//! cycle detection and ordering assume a fully resolvable graph.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::Manifest;
use crate::resolver::errors::{ResolveError, ValidationErrors};
use crate::util::InternedString;

/// DFS visit state. Gray marks a node still on the traversal stack; a
/// back edge into a gray node is a cycle.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// The directed dependency graph over one manifest.
#[derive(Debug, Clone)]
pub struct DepGraph {
    /// Target graph; edge direction is dependent -> dependency
    graph: DiGraph<InternedString, ()>,

    /// Map from canonical name to node index
    nodes: HashMap<InternedString, NodeIndex>,
}

impl DepGraph {
    /// Build the graph from a manifest snapshot.
    ///
    /// Every declared dependency name (after alias canonicalization)
    /// must resolve to a registered target, and every alias must point
    /// at one. All unknown-name errors across the whole manifest are
    /// collected before returning; a partially-broken graph is never
    /// handed to cycle detection.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, ValidationErrors> {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for target in manifest.targets() {
            let node = graph.add_node(target.name());
            nodes.insert(target.name(), node);
        }

        let mut errors = Vec::new();

        for (alias, canonical) in manifest.aliases() {
            if !nodes.contains_key(&canonical) {
                errors.push(ResolveError::UnknownDependency {
                    target: alias.to_string(),
                    missing: canonical.to_string(),
                });
            }
        }

        for target in manifest.targets() {
            let from = nodes[&target.name()];

            for dep in target.deps() {
                let Some(canonical) = manifest.canonicalize(dep) else {
                    errors.push(ResolveError::UnknownDependency {
                        target: target.name().to_string(),
                        missing: dep.to_string(),
                    });
                    continue;
                };

                let to = nodes[&canonical];

                // Declaring the same logical dependency twice collapses
                // to one edge.
                if !graph.contains_edge(from, to) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }

        Ok(DepGraph { graph, nodes })
    }

    /// Number of targets in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if the graph has no targets.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Check if a canonical name is present.
    pub fn contains(&self, name: InternedString) -> bool {
        self.nodes.contains_key(&name)
    }

    /// Direct dependencies of a target, ascending by name.
    pub fn deps(&self, name: InternedString) -> Vec<InternedString> {
        match self.nodes.get(&name) {
            Some(&node) => self
                .sorted_neighbors(node)
                .into_iter()
                .map(|n| self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Targets that directly depend on the given target, ascending by name.
    pub fn dependents(&self, name: InternedString) -> Vec<InternedString> {
        match self.nodes.get(&name) {
            Some(&node) => {
                let mut names: Vec<InternedString> = self
                    .graph
                    .neighbors_directed(node, petgraph::Direction::Incoming)
                    .map(|n| self.graph[n])
                    .collect();
                names.sort();
                names
            }
            None => Vec::new(),
        }
    }

    /// Find a dependency cycle, if one exists.
    ///
    /// Depth-first traversal with an in-progress mark per node; a back
    /// edge into an in-progress node closes a cycle. The returned path
    /// is rotated to start at its lexically smallest member and ends by
    /// repeating that name, so the same cycle is always reported the
    /// same way.
    pub fn find_cycle(&self) -> Option<Vec<InternedString>> {
        let mut marks = vec![Mark::White; self.graph.node_count()];

        for root in self.sorted_nodes() {
            if marks[root.index()] != Mark::White {
                continue;
            }

            // Explicit stack of (node, sorted children, cursor); the
            // stack itself is the current DFS path, and depth is not
            // bounded by the call stack.
            let mut stack = vec![(root, self.sorted_neighbors(root), 0usize)];
            marks[root.index()] = Mark::Gray;

            while let Some(frame) = stack.last_mut() {
                if frame.2 < frame.1.len() {
                    let next = frame.1[frame.2];
                    frame.2 += 1;

                    match marks[next.index()] {
                        Mark::Gray => {
                            // Back edge: the cycle is the stack suffix
                            // from the revisited node to here.
                            let start = stack
                                .iter()
                                .position(|&(n, _, _)| n == next)
                                .expect("in-progress node is on the traversal stack");
                            let cycle = stack[start..]
                                .iter()
                                .map(|&(n, _, _)| self.graph[n])
                                .collect();
                            return Some(normalize_cycle(cycle));
                        }
                        Mark::White => {
                            marks[next.index()] = Mark::Gray;
                            stack.push((next, self.sorted_neighbors(next), 0));
                        }
                        Mark::Black => {}
                    }
                } else {
                    let node = frame.0;
                    marks[node.index()] = Mark::Black;
                    stack.pop();
                }
            }
        }

        None
    }

    /// Topological order: every dependency strictly before each of its
    /// dependents.
    ///
    /// Depth-first post-order emission, visiting roots and adjacency in
    /// ascending lexical name order, so the output is identical across
    /// runs given the same manifest. An edge-free graph comes out in
    /// pure lexical order. Requires an acyclic graph.
    pub fn topo_order(&self) -> Vec<InternedString> {
        let mut visited = vec![false; self.graph.node_count()];
        let mut order = Vec::with_capacity(self.graph.node_count());

        for root in self.sorted_nodes() {
            if visited[root.index()] {
                continue;
            }
            visited[root.index()] = true;

            // Explicit stack so chain depth is not bounded by the call
            // stack; a node is emitted once its children are exhausted.
            let mut stack = vec![(root, self.sorted_neighbors(root), 0usize)];

            while let Some(frame) = stack.last_mut() {
                if frame.2 < frame.1.len() {
                    let next = frame.1[frame.2];
                    frame.2 += 1;

                    if !visited[next.index()] {
                        visited[next.index()] = true;
                        stack.push((next, self.sorted_neighbors(next), 0));
                    }
                } else {
                    let node = frame.0;
                    order.push(self.graph[node]);
                    stack.pop();
                }
            }
        }

        order
    }

    /// All nodes, ascending by target name.
    fn sorted_nodes(&self) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        nodes.sort_by_key(|&n| self.graph[n]);
        nodes
    }

    /// Outgoing neighbors of a node, ascending by target name.
    fn sorted_neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        next.sort_by_key(|&n| self.graph[n]);
        next
    }
}

/// Rotate a cycle to start at its lexically smallest member and close it
/// by repeating that name.
fn normalize_cycle(cycle: Vec<InternedString>) -> Vec<InternedString> {
    let smallest = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, name)| *name)
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut rotated: Vec<InternedString> = cycle[smallest..]
        .iter()
        .chain(cycle[..smallest].iter())
        .copied()
        .collect();
    rotated.push(rotated[0]);
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Target;

    fn manifest_of(targets: &[(&str, &[&str])]) -> Manifest {
        let mut manifest = Manifest::new();
        for (name, deps) in targets {
            manifest
                .add_target(Target::new(
                    *name,
                    deps.iter().map(InternedString::new).collect(),
                    vec![],
                    None,
                ))
                .unwrap();
        }
        manifest
    }

    #[test]
    fn test_unknown_deps_collected_for_all_targets() {
        let manifest = manifest_of(&[
            ("flags", &["strings", "ghost"]),
            ("log", &["phantom"]),
            ("strings", &[]),
        ]);

        let errors = DepGraph::from_manifest(&manifest).unwrap_err();
        assert_eq!(errors.len(), 2);

        let missing: Vec<String> = errors
            .iter()
            .map(|e| match e {
                ResolveError::UnknownDependency { missing, .. } => missing.clone(),
                other => panic!("unexpected error: {other}"),
            })
            .collect();
        assert!(missing.contains(&"ghost".to_string()));
        assert!(missing.contains(&"phantom".to_string()));
    }

    #[test]
    fn test_duplicate_declared_dep_collapses_to_one_edge() {
        let manifest = manifest_of(&[("app", &["base", "base"]), ("base", &[])]);

        let graph = DepGraph::from_manifest(&manifest).unwrap();
        assert_eq!(graph.deps(InternedString::new("app")).len(), 1);
    }

    #[test]
    fn test_find_cycle_reports_normalized_path() {
        // c -> a -> b -> c, discovered from whichever root; the report
        // always starts at `a`.
        let manifest = manifest_of(&[("c", &["a"]), ("a", &["b"]), ("b", &["c"])]);

        let graph = DepGraph::from_manifest(&manifest).unwrap();
        let cycle = graph.find_cycle().unwrap();

        let names: Vec<&str> = cycle.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "a"]);
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let manifest = manifest_of(&[("base", &["base"])]);

        let graph = DepGraph::from_manifest(&manifest).unwrap();
        let cycle = graph.find_cycle().unwrap();
        let names: Vec<&str> = cycle.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["base", "base"]);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycle() {
        let manifest = manifest_of(&[
            ("strings", &["base"]),
            ("base", &[]),
            ("flags", &["strings", "base"]),
        ]);

        let graph = DepGraph::from_manifest(&manifest).unwrap();
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_topo_order_deps_before_dependents() {
        let manifest = manifest_of(&[
            ("flags", &["strings"]),
            ("strings", &["base"]),
            ("base", &[]),
        ]);

        let graph = DepGraph::from_manifest(&manifest).unwrap();
        let order = graph.topo_order();

        let pos = |name: &str| {
            order
                .iter()
                .position(|n| n.as_str() == name)
                .unwrap_or_else(|| panic!("{name} missing from order"))
        };
        assert!(pos("base") < pos("strings"));
        assert!(pos("strings") < pos("flags"));
    }

    #[test]
    fn test_edge_free_graph_orders_lexically() {
        let manifest = manifest_of(&[("zlib", &[]), ("absl", &[]), ("fmt", &[])]);

        let graph = DepGraph::from_manifest(&manifest).unwrap();
        let names: Vec<&str> = graph.topo_order().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["absl", "fmt", "zlib"]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        // One linear chain, far deeper than the call stack could take
        // recursively: t000000 -> t000001 -> ... -> t099999.
        let n = 100_000usize;
        let mut manifest = Manifest::new();
        for i in 0..n {
            let deps = if i + 1 < n {
                vec![InternedString::new(format!("t{:06}", i + 1))]
            } else {
                vec![]
            };
            manifest
                .add_target(Target::new(format!("t{:06}", i), deps, vec![], None))
                .unwrap();
        }

        let graph = DepGraph::from_manifest(&manifest).unwrap();
        assert!(graph.find_cycle().is_none());

        let order = graph.topo_order();
        assert_eq!(order.len(), n);
        // The chain's leaf builds first, the head last.
        assert_eq!(order[0].as_str(), format!("t{:06}", n - 1));
        assert_eq!(order[n - 1].as_str(), "t000000");
    }

    #[test]
    fn test_dependents_inverse_of_deps() {
        let manifest = manifest_of(&[
            ("flags", &["base"]),
            ("strings", &["base"]),
            ("base", &[]),
        ]);

        let graph = DepGraph::from_manifest(&manifest).unwrap();
        let dependents = graph.dependents(InternedString::new("base"));
        let names: Vec<&str> = dependents.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["flags", "strings"]);
    }
}
