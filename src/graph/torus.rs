//! Torus mesh builders. Each function only ever adds the two ("forward")
//! edges `(i+1, j)` and `(i, j+1)` (plus the third axis in 3D) per vertex —
//! an undirected [`super::Graph::add_edge`] call adds the reverse edge
//! automatically, so this still yields the full 4-/6-regular mesh without
//! double-inserting the shared edge between two neighbours. Directed
//! builders add only the forward half, giving 2-/3-regular directed
//! degree.
//!
//! The probabilistic variants draw a fresh `u in [0, 99]` per candidate
//! edge and include it iff `u < 60` (2D) or `u < 40` (3D) — strict
//! less-than, confirmed against the source's own comparison, not the
//! inclusive `<=` an earlier revision used.

use rand::Rng;

use super::Graph;

fn wrap(i: i64, s: i64) -> i64 {
    ((i % s) + s) % s
}

/// Full undirected 2D torus: every vertex gets edges to `(i+1,j)` and
/// `(i,j+1)`.
pub fn torus_2d(shape: usize) -> Graph {
    build_2d(shape, false, |_, _, _| true, |_, _, _| true)
}

/// Directed 2D torus: only the forward edges, unconditionally.
pub fn torus_2d_directed(shape: usize) -> Graph {
    build_2d(shape, true, |_, _, _| true, |_, _, _| true)
}

/// Undirected 2D torus where each of the two forward candidate edges is
/// included independently with probability 0.6.
pub fn torus_2d_60(shape: usize) -> Graph {
    let mut rng1 = rand::thread_rng();
    let mut rng2 = rand::thread_rng();
    build_2d(
        shape,
        false,
        |_, _, _| rng1.gen_range(0..100) < 60,
        |_, _, _| rng2.gen_range(0..100) < 60,
    )
}

/// Directed 2D torus: the first forward edge is always present, the
/// second is present with probability 0.6.
pub fn torus_2d_60_directed(shape: usize) -> Graph {
    let mut rng = rand::thread_rng();
    build_2d(shape, true, |_, _, _| true, |_, _, _| rng.gen_range(0..100) < 60)
}

fn build_2d(
    shape: usize,
    directed: bool,
    mut include_row: impl FnMut(usize, usize, usize) -> bool,
    mut include_col: impl FnMut(usize, usize, usize) -> bool,
) -> Graph {
    let s = shape as i64;
    let mut g = Graph::new(shape * shape, directed);
    for i in 0..shape {
        for j in 0..shape {
            let k = i * shape + j;
            let row_neighbour = (wrap(i as i64 + 1, s) as usize) * shape + j;
            let col_neighbour = i * shape + wrap(j as i64 + 1, s) as usize;
            if include_row(i, j, shape) {
                g.add_edge(k as u32, row_neighbour as u32);
            }
            if include_col(i, j, shape) {
                g.add_edge(k as u32, col_neighbour as u32);
            }
        }
    }
    g
}

fn torus_index_3d(i: usize, j: usize, l: usize, shape: usize) -> usize {
    i * shape * shape + j * shape + l
}

/// Full undirected 3D torus: every vertex gets edges to `(i+1,j,l)`,
/// `(i,j+1,l)`, `(i,j,l+1)`.
pub fn torus_3d(shape: usize) -> Graph {
    build_3d(shape, false, |_| true, |_| true, |_| true)
}

/// Directed 3D torus: only the forward edges, unconditionally.
pub fn torus_3d_directed(shape: usize) -> Graph {
    build_3d(shape, true, |_| true, |_| true, |_| true)
}

/// Undirected 3D torus where each of the three forward candidate edges is
/// included independently with probability 0.4.
pub fn torus_3d_40(shape: usize) -> Graph {
    let mut rng1 = rand::thread_rng();
    let mut rng2 = rand::thread_rng();
    let mut rng3 = rand::thread_rng();
    build_3d(
        shape,
        false,
        |_| rng1.gen_range(0..100) < 40,
        |_| rng2.gen_range(0..100) < 40,
        |_| rng3.gen_range(0..100) < 40,
    )
}

/// Directed 3D torus: the first forward edge is always present, the other
/// two are each present with probability 0.4.
pub fn torus_3d_40_directed(shape: usize) -> Graph {
    let mut rng1 = rand::thread_rng();
    let mut rng2 = rand::thread_rng();
    build_3d(
        shape,
        true,
        |_| true,
        |_| rng1.gen_range(0..100) < 40,
        |_| rng2.gen_range(0..100) < 40,
    )
}

fn build_3d(
    shape: usize,
    directed: bool,
    mut include_x: impl FnMut(usize) -> bool,
    mut include_y: impl FnMut(usize) -> bool,
    mut include_z: impl FnMut(usize) -> bool,
) -> Graph {
    let s = shape as i64;
    let mut g = Graph::new(shape * shape * shape, directed);
    for i in 0..shape {
        for j in 0..shape {
            for l in 0..shape {
                let k = torus_index_3d(i, j, l, shape);
                let x_neighbour = torus_index_3d(wrap(i as i64 + 1, s) as usize, j, l, shape);
                let y_neighbour = torus_index_3d(i, wrap(j as i64 + 1, s) as usize, l, shape);
                let z_neighbour = torus_index_3d(i, j, wrap(l as i64 + 1, s) as usize, shape);
                if include_x(k) {
                    g.add_edge(k as u32, x_neighbour as u32);
                }
                if include_y(k) {
                    g.add_edge(k as u32, y_neighbour as u32);
                }
                if include_z(k) {
                    g.add_edge(k as u32, z_neighbour as u32);
                }
            }
        }
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_2d_has_expected_vertex_and_edge_count() {
        let g = torus_2d(10);
        assert_eq!(g.num_vertices(), 100);
        // 2 forward edges per vertex, undirected doubling -> 4 per vertex / 2.
        assert_eq!(g.num_edges(), 200);
        for v in 0..g.num_vertices() {
            assert_eq!(g.neighbours(v).len(), 4);
        }
    }

    #[test]
    fn torus_2d_directed_has_out_degree_two() {
        let g = torus_2d_directed(10);
        assert_eq!(g.num_vertices(), 100);
        for v in 0..g.num_vertices() {
            assert_eq!(g.children(v).len(), 2);
        }
    }

    #[test]
    fn torus_3d_has_expected_vertex_count_and_degree() {
        let g = torus_3d(5);
        assert_eq!(g.num_vertices(), 125);
        for v in 0..g.num_vertices() {
            assert_eq!(g.neighbours(v).len(), 6);
        }
    }

    #[test]
    fn torus_3d_directed_has_out_degree_three() {
        let g = torus_3d_directed(5);
        for v in 0..g.num_vertices() {
            assert_eq!(g.children(v).len(), 3);
        }
    }

    #[test]
    fn wrap_handles_negative_and_overflow_indices() {
        assert_eq!(wrap(-1, 5), 4);
        assert_eq!(wrap(5, 5), 0);
        assert_eq!(wrap(3, 5), 3);
    }

    #[test]
    fn torus_2d_60_never_exceeds_the_full_degree() {
        let g = torus_2d_60(20);
        assert_eq!(g.num_vertices(), 400);
        for v in 0..g.num_vertices() {
            assert!(g.neighbours(v).len() <= 4);
        }
    }
}
