//! The table-dependency graph component B's schema reflector builds before
//! emitting DDL or sequencing plaindata transfer: tables must be created
//! (and loaded) in an order that respects their foreign keys.

pub mod error;
pub mod types;

use error::DagError;
use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use types::{DependencyEdge, TableNode};

/// A directed graph of tables, edges pointing from a table to the tables
/// its foreign keys reference.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<TableNode, ()>,
    index_of: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index_of: HashMap::new(),
        }
    }

    pub fn add_table(&mut self, name: impl Into<String>) -> Result<(), DagError> {
        let name = name.into();
        if self.index_of.contains_key(&name) {
            return Err(DagError::duplicate_node(name));
        }
        let idx = self.graph.add_node(TableNode::new(name.clone()));
        self.index_of.insert(name, idx);
        Ok(())
    }

    pub fn add_dependency(&mut self, edge: DependencyEdge) -> Result<(), DagError> {
        let from = *self
            .index_of
            .get(&edge.from)
            .ok_or_else(|| DagError::not_found(format!("table '{}' not in graph", edge.from)))?;
        let to = *self
            .index_of
            .get(&edge.to)
            .ok_or_else(|| DagError::not_found(format!("table '{}' not in graph", edge.to)))?;
        self.graph.add_edge(from, to, ());
        Ok(())
    }

    /// Returns tables in dependency order: a table appears only after every
    /// table its foreign keys point to. Used both to sequence DDL creation
    /// (parents first) and, in reverse, to sequence plaindata loads
    /// (children can't load until their FK targets exist).
    pub fn topological_order(&self) -> Result<Vec<String>, DagError> {
        toposort(&self.graph, None)
            .map(|order| {
                order
                    .into_iter()
                    .rev()
                    .map(|idx| self.graph[idx].name.clone())
                    .collect()
            })
            .map_err(|cycle| {
                let stuck = cycle.node_id();
                let members: Vec<String> = kosaraju_scc(&self.graph)
                    .into_iter()
                    .find(|scc| scc.contains(&stuck))
                    .map(|scc| scc.into_iter().map(|idx| self.graph[idx].name.clone()).collect())
                    .unwrap_or_else(|| vec![self.graph[stuck].name.clone()]);
                DagError::cycle_detected(members)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(from: &str, to: &str) -> DependencyEdge {
        DependencyEdge {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn orders_parents_before_children() {
        let mut g = DependencyGraph::new();
        g.add_table("orders").unwrap();
        g.add_table("customers").unwrap();
        g.add_dependency(dep("orders", "customers")).unwrap();

        let order = g.topological_order().unwrap();
        let customers_pos = order.iter().position(|t| t == "customers").unwrap();
        let orders_pos = order.iter().position(|t| t == "orders").unwrap();
        assert!(customers_pos < orders_pos);
    }

    #[test]
    fn duplicate_table_is_rejected() {
        let mut g = DependencyGraph::new();
        g.add_table("orders").unwrap();
        assert!(matches!(
            g.add_table("orders"),
            Err(DagError::DuplicateNode { .. })
        ));
    }

    #[test]
    fn cycle_is_reported_with_its_members() {
        let mut g = DependencyGraph::new();
        g.add_table("a").unwrap();
        g.add_table("b").unwrap();
        g.add_dependency(dep("a", "b")).unwrap();
        g.add_dependency(dep("b", "a")).unwrap();

        match g.topological_order() {
            Err(DagError::CycleDetected(members)) => {
                assert!(members.contains(&"a".to_string()));
                assert!(members.contains(&"b".to_string()));
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }
}
