//! The parallel spanning-tree driver: spawns one worker per seed vertex,
//! synchronizes them on a barrier, and runs the take/expand/steal loop
//! that exercises whichever deque algorithm the caller selected.
//!
//! Workers are spawned with [`std::thread::scope`], so the driver's
//! stack-local `colors`/`parents`/`visited`/`counter`/per-worker deque
//! state outlives every worker without needing `Arc` around the whole
//! thing — the source's raw-pointer-plus-`pthread_create` approach can't
//! express this, and scoped threads make the sharing lifetime-checked
//! instead of refcounted.

use std::sync::atomic::{AtomicI64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;
use std::time::Instant;

use rand::Rng;
use tracing::{info, instrument};

use crate::affinity::AffinityHook;
use crate::deque::{factory, AlgorithmType, DequeHandle};
use crate::graph::cycle::is_tree;
use crate::graph::{build_from_parents, Graph, GraphType};
use crate::params::ExperimentResult;
use crate::report::Report;
use crate::task_array::EMPTY;

/// Runs the traversal and returns the resulting spanning tree (as a fresh
/// [`Graph`] reconstructed from the `parents` array). `roots.len()` is the
/// worker count; each worker owns `roots[i]` as its seed vertex and deque
/// `i`.
pub fn spanning_tree(
    graph: &Graph,
    roots: &[usize],
    algorithm: AlgorithmType,
    struct_size: usize,
    affinity: &dyn AffinityHook,
    report: &Report,
) -> Graph {
    let num_threads = roots.len();
    let num_vertices = graph.num_vertices();

    let colors: Vec<AtomicI64> = (0..num_vertices).map(|_| AtomicI64::new(0)).collect();
    let parents: Vec<AtomicI64> = (0..num_vertices).map(|_| AtomicI64::new(-1)).collect();
    let visited: Vec<AtomicU8> = (0..num_vertices).map(|_| AtomicU8::new(0)).collect();
    let counter = AtomicUsize::new(0);
    let barrier = Barrier::new(num_threads.max(1));

    let deques: Vec<DequeHandle> = (0..num_threads)
        .map(|_| factory::build(algorithm, struct_size, num_threads))
        .collect();

    thread::scope(|scope| {
        for worker_id in 0..num_threads {
            let colors = &colors;
            let parents = &parents;
            let visited = &visited;
            let counter = &counter;
            let deques = &deques;
            let report = &report;
            let barrier = &barrier;
            let graph = &graph;
            let root = roots[worker_id];
            scope.spawn(move || {
                affinity.pin(worker_id);
                barrier.wait();
                run_worker(
                    worker_id, root, graph, deques, colors, parents, visited, counter, report,
                );
            });
        }
    });

    if num_threads > 0 {
        parents[roots[0]].store(-1, Ordering::Relaxed);
        for i in 1..num_threads {
            parents[roots[i]].store(roots[i - 1] as i64, Ordering::Relaxed);
        }
    }

    let raw_parents: Vec<i64> = parents.iter().map(|p| p.load(Ordering::Relaxed)).collect();
    build_from_parents(&raw_parents, num_vertices)
}

fn try_claim(colors: &[AtomicI64], w: usize, label: i64) -> bool {
    colors[w]
        .compare_exchange(0, label, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
}

fn mark_visited(visited: &[AtomicU8], counter: &AtomicUsize, w: usize) {
    if visited[w].swap(1, Ordering::AcqRel) == 0 {
        counter.fetch_add(1, Ordering::AcqRel);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_worker(
    worker_id: usize,
    root: usize,
    graph: &Graph,
    deques: &[DequeHandle],
    colors: &[AtomicI64],
    parents: &[AtomicI64],
    visited: &[AtomicU8],
    counter: &AtomicUsize,
    report: &Report,
) {
    let num_threads = deques.len();
    let num_vertices = graph.num_vertices();
    let label = worker_id as i64;
    let mut rng = rand::thread_rng();

    try_claim(colors, root, label);
    mark_visited(visited, counter, root);

    // Which branch a worker takes is a fact about the DequeHandle shape
    // the factory returned for this algorithm, not a separately-tracked
    // boolean: the labelled branch is exactly the one the original calls
    // "special execution" for WS_NC_MULT / B_WS_NC_MULT.
    match &deques[worker_id] {
        DequeHandle::Unlabelled(own) => {
            own.put(root as i32);
            report.record_put();
            while counter.load(Ordering::Acquire) < num_vertices {
                if !own.is_empty() {
                    let v = own.take();
                    if v == EMPTY {
                        continue;
                    }
                    report.record_take();
                    for &w in graph.neighbours(v as usize) {
                        if try_claim(colors, w as usize, label) {
                            parents[w as usize].store(v as i64, Ordering::Relaxed);
                            own.put(w as i32);
                            report.record_put();
                            mark_visited(visited, counter, w as usize);
                        }
                    }
                } else if num_threads > 1 {
                    let peer = random_peer(&mut rng, worker_id, num_threads);
                    if let DequeHandle::Unlabelled(peer_deque) = &deques[peer] {
                        let stolen = peer_deque.steal();
                        if stolen != EMPTY {
                            report.record_steal();
                            own.put(stolen);
                            report.record_put();
                        }
                    }
                }
            }
        }
        DequeHandle::Labelled(own) => {
            own.put(root as i32, worker_id);
            report.record_put();
            while counter.load(Ordering::Acquire) < num_vertices {
                if !own.is_empty(worker_id) {
                    let v = own.take(worker_id);
                    if v == EMPTY {
                        continue;
                    }
                    report.record_take();
                    for &w in graph.neighbours(v as usize) {
                        if try_claim(colors, w as usize, label) {
                            parents[w as usize].store(v as i64, Ordering::Relaxed);
                            own.put(w as i32, worker_id);
                            report.record_put();
                            mark_visited(visited, counter, w as usize);
                        }
                    }
                } else if num_threads > 1 {
                    let peer = random_peer(&mut rng, worker_id, num_threads);
                    if let DequeHandle::Labelled(peer_deque) = &deques[peer] {
                        let stolen = peer_deque.steal(worker_id);
                        if stolen != EMPTY {
                            report.record_steal();
                            own.put(stolen, worker_id);
                            report.record_put();
                        }
                    }
                }
            }
        }
    }
}

fn random_peer(rng: &mut impl Rng, worker_id: usize, num_threads: usize) -> usize {
    let peer = rng.gen_range(0..num_threads - 1);
    if peer >= worker_id {
        peer + 1
    } else {
        peer
    }
}

/// Runs one experiment: builds the graph, seeds `num_threads` roots, runs
/// [`spanning_tree`], and asserts the result is a tree before packaging an
/// [`ExperimentResult`]. The assertion is the one place the driver aborts
/// the process — a non-tree result means a correctness bug in a deque or
/// in this loop, not a recoverable runtime condition.
#[instrument(skip_all, fields(graph_type = ?graph_type, shape, num_threads, algorithm = ?algorithm))]
pub fn experiment(
    graph_type: GraphType,
    shape: usize,
    directed: bool,
    num_threads: usize,
    algorithm: AlgorithmType,
    affinity: &dyn AffinityHook,
) -> ExperimentResult {
    let graph = crate::graph::graph_factory(graph_type, shape, directed);
    let roots = crate::graph::seed::stub_spanning(&graph, num_threads.max(1));
    let report = Report::new();

    let start = Instant::now();
    let tree = spanning_tree(&graph, &roots, algorithm, 64, affinity, &report);
    let elapsed = start.elapsed();

    assert!(
        is_tree(&tree),
        "spanning_tree produced a non-tree result for {algorithm:?} on {graph_type:?}({shape})"
    );

    ExperimentResult {
        num_threads,
        execution_time_ns: elapsed.as_nanos(),
        takes: report.takes(),
        puts: report.puts(),
        steals: report.steals(),
        graph_type,
        algorithm,
    }
}

/// Sweeps every algorithm across thread counts `1..=hardware_concurrency`,
/// mirroring `experimentComplete`.
pub fn experiment_complete(graph_type: GraphType, shape: usize, directed: bool) -> Vec<ExperimentResult> {
    let affinity = crate::affinity::OsAffinityHook::new();
    let max_threads = num_cpus::get();
    let mut results = Vec::with_capacity(max_threads * AlgorithmType::ALL.len());
    for num_threads in 1..=max_threads {
        for algorithm in AlgorithmType::ALL {
            info!(num_threads, ?algorithm, "running experiment");
            results.push(experiment(graph_type, shape, directed, num_threads, algorithm, &affinity));
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affinity::NoopAffinityHook;
    use crate::graph::cycle::cycle_type;
    use crate::graph::torus::torus_2d;
    use crate::graph::GraphCycleType;

    #[test]
    fn single_worker_spanning_tree_visits_every_vertex() {
        let graph = torus_2d(10);
        let report = Report::new();
        let affinity = NoopAffinityHook;
        let tree = spanning_tree(&graph, &[0], AlgorithmType::ChaseLev, 16, &affinity, &report);
        assert_eq!(tree.num_vertices(), 100);
        assert_eq!(cycle_type(&tree), GraphCycleType::Tree);
    }

    #[test]
    fn multi_worker_spanning_tree_is_a_tree_for_every_algorithm() {
        let graph = torus_2d(12);
        let affinity = NoopAffinityHook;
        for algorithm in AlgorithmType::ALL {
            let roots = crate::graph::seed::stub_spanning(&graph, 4);
            let report = Report::new();
            let tree = spanning_tree(&graph, &roots, algorithm, 16, &affinity, &report);
            assert_eq!(
                cycle_type(&tree),
                GraphCycleType::Tree,
                "algorithm {algorithm:?} did not produce a tree"
            );
        }
    }

    #[test]
    fn experiment_reports_a_tree_shaped_result() {
        let affinity = NoopAffinityHook;
        let result = experiment(GraphType::Torus2d, 10, false, 3, AlgorithmType::IdempotentFifo, &affinity);
        assert_eq!(result.num_threads, 3);
        assert!(result.puts >= 100);
    }
}
