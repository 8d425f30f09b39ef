//! Picks `count` distinct seed vertices for the spanning-tree driver's
//! workers, spreading them out by claiming each seed's immediate
//! neighbourhood so two seeds rarely land adjacent to each other.

use rand::Rng;

use super::Graph;

/// Returns `count` distinct vertex indices. If `count` exceeds the number
/// of vertices still claimable after neighbourhood-claiming runs dry, the
/// remaining slots are filled with any still-unclaimed vertex, then with
/// repeats of the last root as a last resort — the driver only needs
/// `count` roots to exist, not that they be maximally spread.
pub fn stub_spanning(g: &Graph, count: usize) -> Vec<usize> {
    let n = g.num_vertices();
    assert!(n > 0, "cannot seed a spanning tree over an empty graph");
    let mut rng = rand::thread_rng();
    let mut claimed = vec![false; n];
    let mut roots = Vec::with_capacity(count);

    let mut attempts = 0usize;
    while roots.len() < count && attempts < n * 4 {
        attempts += 1;
        let candidate = rng.gen_range(0..n);
        if claimed[candidate] {
            continue;
        }
        claimed[candidate] = true;
        roots.push(candidate);
        for &w in g.neighbours(candidate) {
            claimed[w as usize] = true;
        }
    }

    if roots.len() < count {
        for v in 0..n {
            if roots.len() >= count {
                break;
            }
            if !claimed[v] {
                roots.push(v);
                claimed[v] = true;
            }
        }
    }
    while roots.len() < count {
        roots.push(*roots.last().unwrap_or(&0));
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::torus::torus_2d;

    #[test]
    fn returns_the_requested_number_of_roots() {
        let g = torus_2d(10);
        let roots = stub_spanning(&g, 8);
        assert_eq!(roots.len(), 8);
        for r in &roots {
            assert!(*r < g.num_vertices());
        }
    }

    #[test]
    fn roots_are_distinct_when_the_graph_is_large_enough() {
        let g = torus_2d(20);
        let roots = stub_spanning(&g, 4);
        let mut sorted = roots.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), roots.len());
    }

    #[test]
    fn a_single_root_request_always_succeeds() {
        let g = torus_2d(3);
        let roots = stub_spanning(&g, 1);
        assert_eq!(roots.len(), 1);
    }
}
