//! All-pairs walking distances between rooms.
//!
//! Each room is represented by its smallest member cell and every unordered
//! pair is searched with [`PathPlanner`]. This is O(R²) independent searches,
//! so long runs accept a [`CancelToken`] checked between searches.

use crate::config::AStarSettings;
use crate::error::Cancelled;
use crate::floor_set::{FloorSet, NavNode, RoomRef};
use crate::pathfinding::PathPlanner;
use crate::shared::CancelToken;
use log::info;

/// Distance for one unordered pair of rooms. `None` means unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceEntry {
    pub a: RoomRef,
    pub b: RoomRef,
    pub steps: Option<usize>,
}

impl DistanceEntry {
    /// `"Kitchen (F1) <-> Office (F2) : 14 steps"` or `"... : No path"`.
    pub fn describe(&self) -> String {
        match self.steps {
            Some(steps) => format!("{} <-> {} : {} steps", self.a, self.b, steps),
            None => format!("{} <-> {} : No path", self.a, self.b),
        }
    }
}

/// Pairwise room distances for a whole plan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DistanceMatrix {
    rooms: Vec<RoomRef>,
    entries: Vec<DistanceEntry>,
}

impl DistanceMatrix {
    /// Rooms in floor order, then name order.
    pub fn rooms(&self) -> &[RoomRef] {
        &self.rooms
    }

    /// Pairs `(i, j)` with `i < j` in room order.
    pub fn entries(&self) -> &[DistanceEntry] {
        &self.entries
    }

    /// Distance between two rooms in either order. `Some(None)` is unreachable;
    /// `None` means one of the rooms is not in the matrix.
    pub fn get(&self, a: &RoomRef, b: &RoomRef) -> Option<Option<usize>> {
        if a == b {
            return self.rooms.contains(a).then_some(Some(0));
        }
        self.entries
            .iter()
            .find(|e| (&e.a == a && &e.b == b) || (&e.a == b && &e.b == a))
            .map(|e| e.steps)
    }

    pub fn unreachable_pairs(&self) -> usize {
        self.entries.iter().filter(|e| e.steps.is_none()).count()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(DistanceEntry::describe).collect()
    }
}

/// Compute the distance matrix for every room in `floors`.
pub fn distance_matrix(floors: &FloorSet, settings: &AStarSettings) -> DistanceMatrix {
    match compute(floors, settings, None) {
        Ok(matrix) => matrix,
        // Without a token there is nothing to cancel.
        Err(_) => DistanceMatrix::default(),
    }
}

/// As [`distance_matrix`], but stops early once `cancel` fires.
pub fn distance_matrix_cancellable(
    floors: &FloorSet,
    settings: &AStarSettings,
    cancel: &CancelToken,
) -> Result<DistanceMatrix, Cancelled> {
    compute(floors, settings, Some(cancel))
}

fn compute(
    floors: &FloorSet,
    settings: &AStarSettings,
    cancel: Option<&CancelToken>,
) -> Result<DistanceMatrix, Cancelled> {
    let nodes: Vec<(RoomRef, NavNode)> = floors
        .room_refs()
        .into_iter()
        .filter_map(|room| {
            let node = floors.resolve_room(&room.name, room.floor).ok()?;
            Some((room, node))
        })
        .collect();

    let total = nodes.len() * nodes.len().saturating_sub(1) / 2;
    let planner = PathPlanner::new(floors, settings.clone());
    let mut entries = Vec::with_capacity(total);

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(Cancelled {
                    completed: entries.len(),
                    total,
                });
            }
            let (room_a, node_a) = &nodes[i];
            let (room_b, node_b) = &nodes[j];
            // Both nodes come from resolve_room, so the query cannot be rejected.
            let steps = planner
                .find_path(*node_a, *node_b)
                .ok()
                .and_then(|result| result.steps());
            entries.push(DistanceEntry {
                a: room_a.clone(),
                b: room_b.clone(),
                steps,
            });
        }
    }

    let matrix = DistanceMatrix {
        rooms: nodes.into_iter().map(|(room, _)| room).collect(),
        entries,
    };
    info!(
        "distance matrix: {} rooms, {} pairs, {} unreachable",
        matrix.rooms.len(),
        matrix.entries.len(),
        matrix.unreachable_pairs()
    );
    Ok(matrix)
}
