//! Stepwise search over a weighted, directed adjacency list.
//!
//! Vertices are identified by their insertion index `0..n`. Where a vertex
//! is drawn belongs to whoever renders the graph; the engine only tracks the
//! edges, the per-vertex tables and a [`VertexMark`] per vertex for display.

use std::fmt;

use crate::error::{EditError, TraceError};
use crate::frontier::{Entry, Frontier, FrontierKind};
use crate::state::{SearchState, Step, Termination};
use crate::UNREACHABLE;

/// A directed edge to `to` with an integer `weight` (may be negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub to: usize,
    pub weight: i32,
}

/// The algorithms the graph engine can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphAlgorithm {
    Bfs,
    Dfs,
    Dijkstra,
    BellmanFord,
}

impl GraphAlgorithm {
    pub const ALL: [Self; 4] = [Self::Bfs, Self::Dfs, Self::Dijkstra, Self::BellmanFord];

    /// The frontier this algorithm expands from. Bellman-Ford walks the edge
    /// list with a cursor instead.
    pub const fn frontier_kind(self) -> Option<FrontierKind> {
        match self {
            Self::Bfs => Some(FrontierKind::Queue),
            Self::Dfs => Some(FrontierKind::Stack),
            Self::Dijkstra => Some(FrontierKind::MinHeap),
            Self::BellmanFord => None,
        }
    }
}

impl fmt::Display for GraphAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Dijkstra => "Dijkstra",
            Self::BellmanFord => "Bellman-Ford",
        })
    }
}

/// How a vertex should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexMark {
    #[default]
    Unvisited,
    /// Popped from the frontier, or improved by a Bellman-Ford relaxation.
    Expanded,
    /// On the traced path.
    Path,
    Source,
    Sink,
    /// Target of an edge that still relaxed after the last round.
    Cycle,
}

/// Bellman-Ford position: which edge of which vertex in which round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    round: usize,
    vertex: usize,
    edge: usize,
    relaxed: bool,
}

/// A graph search that advances one bounded unit of work per
/// [`step`](Self::step).
#[derive(Debug, Clone, Default)]
pub struct GraphSearch {
    adjacency: Vec<Vec<Edge>>,
    distances: Vec<i32>,
    visited: Vec<bool>,
    parents: Vec<Option<usize>>,
    marks: Vec<VertexMark>,
    algorithm: Option<GraphAlgorithm>,
    frontier: Option<Frontier<usize>>,
    cursor: Cursor,
    state: SearchState,
    source: usize,
    sink: Option<usize>,
}

impl GraphSearch {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Outgoing edges of `v` in insertion order (empty for unknown ids).
    pub fn edges(&self, v: usize) -> &[Edge] {
        self.adjacency.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every edge as `(from, edge)`.
    pub fn all_edges(&self) -> impl Iterator<Item = (usize, Edge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, es)| es.iter().map(move |&e| (u, e)))
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn algorithm(&self) -> Option<GraphAlgorithm> {
        self.algorithm
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// The pinned sink, or the highest-indexed vertex. `None` when empty.
    pub fn sink(&self) -> Option<usize> {
        self.sink.or_else(|| self.adjacency.len().checked_sub(1))
    }

    pub fn distance(&self, v: usize) -> Option<i32> {
        self.distances.get(v).copied().filter(|&d| d != UNREACHABLE)
    }

    pub fn distances(&self) -> &[i32] {
        &self.distances
    }

    pub fn is_visited(&self, v: usize) -> bool {
        self.visited.get(v).copied().unwrap_or(false)
    }

    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    pub fn vertex_marks(&self) -> &[VertexMark] {
        &self.marks
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.as_ref().map_or(0, Frontier::len)
    }

    /// Current Bellman-Ford round, vertex and edge index.
    pub fn bellman_ford_cursor(&self) -> (usize, usize, usize) {
        (self.cursor.round, self.cursor.vertex, self.cursor.edge)
    }

    // -------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------

    fn check_vertex(&self, id: usize) -> Result<(), EditError> {
        if id < self.adjacency.len() {
            Ok(())
        } else {
            Err(EditError::UnknownVertex {
                id,
                len: self.adjacency.len(),
            })
        }
    }

    /// Append a vertex with no edges and return its id. Resets the engine.
    pub fn add_vertex(&mut self) -> usize {
        self.adjacency.push(Vec::new());
        self.reset();
        self.adjacency.len() - 1
    }

    /// Insert the directed edge `from -> to`. Resets the engine.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: i32) -> Result<(), EditError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        self.adjacency[from].push(Edge { to, weight });
        self.reset();
        Ok(())
    }

    /// Search from `id` from now on. Resets the engine.
    pub fn set_source(&mut self, id: usize) -> Result<(), EditError> {
        self.check_vertex(id)?;
        self.source = id;
        self.reset();
        Ok(())
    }

    /// Pin the traced destination to `id` instead of the last vertex.
    pub fn set_sink(&mut self, id: usize) -> Result<(), EditError> {
        self.check_vertex(id)?;
        self.sink = Some(id);
        self.reset();
        Ok(())
    }

    /// Drop every vertex and edge; source and sink go back to their defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
        log::debug!("graph cleared");
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Discard any search in progress: every vertex is unmarked and
    /// unreached except the source (distance 0, visited).
    pub fn reset(&mut self) {
        let n = self.adjacency.len();
        self.distances = vec![UNREACHABLE; n];
        self.visited = vec![false; n];
        self.parents = vec![None; n];
        self.marks = vec![VertexMark::Unvisited; n];
        if self.source < n {
            self.distances[self.source] = 0;
            self.visited[self.source] = true;
        }
        self.algorithm = None;
        self.frontier = None;
        self.cursor = Cursor::default();
        self.state = SearchState::Idle;
    }

    /// Reset and seed `algorithm` from the source.
    ///
    /// With no vertices the search is finished straight away.
    pub fn set_up(&mut self, algorithm: GraphAlgorithm) {
        self.reset();
        self.algorithm = Some(algorithm);
        if self.adjacency.is_empty() {
            self.state = SearchState::Finished(Termination::FrontierExhausted);
            log::debug!("graph {algorithm} set up on an empty graph");
            return;
        }
        self.frontier = algorithm.frontier_kind().map(|kind| {
            let mut f = Frontier::new(kind);
            f.push(self.source, 0.0);
            f
        });
        self.state = SearchState::Running;
        log::debug!(
            "graph {algorithm} set up on {} vertices from {}",
            self.adjacency.len(),
            self.source
        );
    }

    /// Advance the search by one unit of work.
    pub fn step(&mut self) -> Step<usize> {
        let Some(algorithm) = self.algorithm else {
            return Step::Idle;
        };
        if let SearchState::Finished(t) = self.state {
            return Step::Finished(t);
        }
        match algorithm {
            GraphAlgorithm::Bfs | GraphAlgorithm::Dfs => self.step_traversal(),
            GraphAlgorithm::Dijkstra => self.step_dijkstra(),
            GraphAlgorithm::BellmanFord => self.step_bellman_ford(),
        }
    }

    /// Step until the search finishes or `max_steps` steps have run.
    ///
    /// Dijkstra never finishes on a graph with a reachable negative cycle,
    /// hence the bound.
    pub fn advance(&mut self, max_steps: usize) -> SearchState {
        for _ in 0..max_steps {
            if !self.state.is_running() {
                break;
            }
            self.step();
        }
        self.state
    }

    fn pop(&mut self) -> Option<Entry<usize>> {
        self.frontier.as_mut().and_then(Frontier::pop)
    }

    fn push(&mut self, v: usize, key: f64) {
        if let Some(f) = self.frontier.as_mut() {
            f.push(v, key);
        }
    }

    fn step_traversal(&mut self) -> Step<usize> {
        let Some(Entry { node: u, .. }) = self.pop() else {
            return self.finish(Termination::FrontierExhausted);
        };
        self.marks[u] = VertexMark::Expanded;
        for i in 0..self.adjacency[u].len() {
            let Edge { to, weight } = self.adjacency[u][i];
            if !self.visited[to] {
                self.visited[to] = true;
                self.parents[to] = Some(u);
                self.distances[to] = self.distances[u].saturating_add(weight);
                self.push(to, 0.0);
            }
        }
        Step::Expanded(u)
    }

    fn step_dijkstra(&mut self) -> Step<usize> {
        let Some(Entry { node: u, key }) = self.pop() else {
            return self.finish(Termination::FrontierExhausted);
        };
        if key > f64::from(self.distances[u]) {
            return Step::Stale(u);
        }
        self.visited[u] = true;
        self.marks[u] = VertexMark::Expanded;
        let du = self.distances[u];
        for i in 0..self.adjacency[u].len() {
            let Edge { to, weight } = self.adjacency[u][i];
            let nd = du.saturating_add(weight);
            // The source keeps distance 0 and no parent.
            if to != self.source && nd < self.distances[to] {
                self.distances[to] = nd;
                self.parents[to] = Some(u);
                self.push(to, f64::from(nd));
            }
        }
        Step::Expanded(u)
    }

    /// Relax `u -> to` if `u` is reached and the edge improves `to`.
    ///
    /// Edges into the source never relax; a negative cycle through it is
    /// left to the verification pass.
    fn relax(&mut self, u: usize, Edge { to, weight }: Edge) -> bool {
        let du = self.distances[u];
        if du == UNREACHABLE || to == self.source {
            return false;
        }
        let nd = du.saturating_add(weight);
        if nd < self.distances[to] {
            self.distances[to] = nd;
            self.parents[to] = Some(u);
            true
        } else {
            false
        }
    }

    fn step_bellman_ford(&mut self) -> Step<usize> {
        let n = self.adjacency.len();
        let c = self.cursor;

        if c.round + 1 < n {
            if c.vertex < n {
                if let Some(&edge) = self.adjacency[c.vertex].get(c.edge) {
                    let improved = self.relax(c.vertex, edge);
                    if improved {
                        self.marks[edge.to] = VertexMark::Expanded;
                        self.cursor.relaxed = true;
                    }
                    self.cursor.edge += 1;
                    return Step::Relaxed {
                        from: c.vertex,
                        to: edge.to,
                        improved,
                    };
                }
                self.cursor.vertex += 1;
                self.cursor.edge = 0;
                return Step::Advanced;
            }
            // End of a round. A quiet round means every later one is too.
            self.cursor = Cursor {
                round: if c.relaxed { c.round + 1 } else { n - 1 },
                ..Cursor::default()
            };
            return Step::Advanced;
        }

        let offending = self
            .all_edges()
            .find(|&(u, e)| {
                let du = self.distances[u];
                du != UNREACHABLE && du.saturating_add(e.weight) < self.distances[e.to]
            })
            .map(|(_, e)| e.to);
        match offending {
            Some(v) => {
                self.marks[v] = VertexMark::Cycle;
                log::warn!("graph contains a negative weight cycle reaching vertex {v}");
                self.finish(Termination::NegativeCycle { vertex: v })
            }
            None => self.finish(Termination::Converged),
        }
    }

    fn finish(&mut self, t: Termination) -> Step<usize> {
        self.state = SearchState::Finished(t);
        self.frontier = None;
        if let Some(alg) = self.algorithm {
            log::info!("graph {alg} finished: {t:?}");
        }
        Step::Finished(t)
    }

    // -------------------------------------------------------------------
    // Path reconstruction
    // -------------------------------------------------------------------

    /// Follow parents from the sink back to the source and mark the path.
    ///
    /// Returns the vertices from source to sink. On failure the marks are
    /// left as the search left them.
    pub fn trace_path(&mut self) -> Result<Vec<usize>, TraceError> {
        let Some(sink) = self.sink() else {
            log::warn!("cannot trace a path: the graph is empty");
            return Err(TraceError::Empty);
        };
        match self.state {
            SearchState::Finished(Termination::NegativeCycle { vertex }) => {
                return Err(TraceError::NegativeCycle { vertex });
            }
            SearchState::Finished(_) => {}
            _ => return Err(TraceError::NotFinished),
        }

        let mut path = vec![sink];
        let mut cur = sink;
        while cur != self.source {
            match self.parents[cur] {
                // A chain longer than the vertex count has looped.
                Some(p) if path.len() <= self.adjacency.len() => {
                    path.push(p);
                    cur = p;
                }
                _ => {
                    log::warn!("no path from {} to {sink}", self.source);
                    return Err(TraceError::Unreached);
                }
            }
        }

        for &v in &path {
            self.marks[v] = VertexMark::Path;
        }
        self.marks[self.source] = VertexMark::Source;
        self.marks[sink] = VertexMark::Sink;
        path.reverse();
        log::info!("path {path:?} traced");
        Ok(path)
    }
}
