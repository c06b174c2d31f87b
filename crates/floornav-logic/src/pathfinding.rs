//! 3-D A* over a [`FloorSet`] snapshot.
//!
//! Nodes are `(floor, row, col)`. Edges are the planar axis moves not blocked
//! by a wall, stair hops to the floor directly above/below, and elevator hops
//! to any other floor marking the same cell. Every edge costs one step.
//!
//! The heuristic is Manhattan distance on `(row, col)` plus
//! `floor_penalty * |Δfloor|` (see [`AStarSettings`]). Frontier ties on `f`
//! are broken by node order (floor, row, col), so results are deterministic.
//!
//! The planner borrows the floor set immutably for the whole search; it holds
//! no state between queries.

use crate::config::AStarSettings;
use crate::error::QueryError;
use crate::floor_set::{FloorSet, NavNode};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A walkable route from start to goal, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    nodes: Vec<NavNode>,
}

impl Route {
    /// `nodes` must be non-empty and each consecutive pair one edge apart.
    pub(crate) fn from_nodes(nodes: Vec<NavNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// Number of edges walked (nodes minus one).
    pub fn steps(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn start(&self) -> NavNode {
        self.nodes[0]
    }

    pub fn goal(&self) -> NavNode {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of edges that change floor.
    pub fn floor_changes(&self) -> usize {
        self.nodes
            .windows(2)
            .filter(|w| w[0].floor != w[1].floor)
            .count()
    }

    /// Nodes of the route that lie on `floor`, in walking order.
    pub fn on_floor(&self, floor: usize) -> impl Iterator<Item = &NavNode> {
        self.nodes.iter().filter(move |n| n.floor == floor)
    }
}

/// Outcome of one search. An unreachable goal is a normal result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    Found(Route),
    NoPath,
}

/// Search outcome plus statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub outcome: PathOutcome,
    pub nodes_expanded: usize,
}

impl PathResult {
    pub fn route(&self) -> Option<&Route> {
        match &self.outcome {
            PathOutcome::Found(route) => Some(route),
            PathOutcome::NoPath => None,
        }
    }

    pub fn into_route(self) -> Option<Route> {
        match self.outcome {
            PathOutcome::Found(route) => Some(route),
            PathOutcome::NoPath => None,
        }
    }

    pub fn steps(&self) -> Option<usize> {
        self.route().map(Route::steps)
    }

    pub fn is_found(&self) -> bool {
        matches!(self.outcome, PathOutcome::Found(_))
    }
}

/// Frontier entry; `BinaryHeap` is a max-heap so the ordering is reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier {
    f: usize,
    node: NavNode,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* pathfinder over a borrowed floor set.
pub struct PathPlanner<'a> {
    floors: &'a FloorSet,
    settings: AStarSettings,
}

impl<'a> PathPlanner<'a> {
    pub fn new(floors: &'a FloorSet, settings: AStarSettings) -> Self {
        Self { floors, settings }
    }

    /// Planner with an admissible heuristic (floor penalty 0).
    pub fn with_defaults(floors: &'a FloorSet) -> Self {
        Self::new(floors, AStarSettings::default())
    }

    pub fn settings(&self) -> &AStarSettings {
        &self.settings
    }

    /// Route between two rooms, each resolved to its smallest member cell.
    pub fn find_room_path(
        &self,
        start_room: &str,
        start_floor: usize,
        end_room: &str,
        end_floor: usize,
    ) -> Result<PathResult, QueryError> {
        let start = self.floors.resolve_room(start_room, start_floor)?;
        let goal = self.floors.resolve_room(end_room, end_floor)?;
        self.find_path(start, goal)
    }

    /// Route between two concrete nodes.
    pub fn find_path(&self, start: NavNode, goal: NavNode) -> Result<PathResult, QueryError> {
        self.floors.check_node(start)?;
        self.floors.check_node(goal)?;
        trace!("[AStar] find_path: start={} goal={}", start, goal);

        let mut open_set = BinaryHeap::new();
        let mut closed_set: HashSet<NavNode> = HashSet::new();
        let mut came_from: HashMap<NavNode, NavNode> = HashMap::new();
        let mut g_scores: HashMap<NavNode, usize> = HashMap::new();

        g_scores.insert(start, 0);
        open_set.push(Frontier {
            f: self.heuristic(start, goal),
            node: start,
        });

        let mut nodes_expanded = 0;

        while let Some(Frontier { node: current, .. }) = open_set.pop() {
            if current == goal {
                let route = reconstruct(&came_from, goal);
                trace!(
                    "[AStar] found {} steps after expanding {} nodes",
                    route.steps(),
                    nodes_expanded
                );
                return Ok(PathResult {
                    outcome: PathOutcome::Found(route),
                    nodes_expanded,
                });
            }
            if !closed_set.insert(current) {
                continue;
            }
            nodes_expanded += 1;

            let g_current = g_scores.get(&current).copied().unwrap_or(usize::MAX);
            for neighbor in self.floors.neighbors(current) {
                if closed_set.contains(&neighbor) {
                    continue;
                }
                let tentative_g = g_current + 1;
                let known = g_scores.get(&neighbor).copied().unwrap_or(usize::MAX);
                if tentative_g < known {
                    came_from.insert(neighbor, current);
                    g_scores.insert(neighbor, tentative_g);
                    open_set.push(Frontier {
                        f: tentative_g.saturating_add(self.heuristic(neighbor, goal)),
                        node: neighbor,
                    });
                }
            }
        }

        debug!(
            "[AStar] no path {} -> {} after expanding {} nodes",
            start, goal, nodes_expanded
        );
        Ok(PathResult {
            outcome: PathOutcome::NoPath,
            nodes_expanded,
        })
    }

    /// Manhattan distance on `(row, col)` plus the floor-change penalty.
    /// Saturates rather than overflowing for very large penalties.
    pub fn heuristic(&self, from: NavNode, to: NavNode) -> usize {
        let vertical = self
            .settings
            .floor_penalty
            .saturating_mul(from.floor.abs_diff(to.floor));
        from.cell.manhattan(to.cell).saturating_add(vertical)
    }
}

fn reconstruct(came_from: &HashMap<NavNode, NavNode>, goal: NavNode) -> Route {
    let mut nodes = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        nodes.push(prev);
        current = prev;
    }
    nodes.reverse();
    Route::from_nodes(nodes)
}
