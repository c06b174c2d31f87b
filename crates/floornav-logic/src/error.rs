//! Error types for edits, queries, documents and configuration.
//!
//! "No path" is deliberately absent: an unreachable goal is a normal
//! search outcome (see [`crate::pathfinding::PathOutcome`]).

use crate::grid::{Cell, GridSize, WallKey};
use thiserror::Error;

/// A rejected edit. The floor set is unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("cell {cell} is outside the {}x{} grid", .size.rows, .size.cols)]
    OutOfBounds { cell: Cell, size: GridSize },

    #[error("{key} is not an interior edge of the {}x{} grid", .size.rows, .size.cols)]
    InvalidWall { key: WallKey, size: GridSize },

    #[error("floor {0} does not exist")]
    UnknownFloor(usize),

    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("label for room '{0}' must not be empty")]
    EmptyLabel(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("cell {cell} already belongs to room '{room}'")]
    AlreadyMember { room: String, cell: Cell },

    #[error("cell {cell} is not adjacent to any cell of room '{room}'")]
    DisconnectedPaint { room: String, cell: Cell },

    #[error("removing cell {cell} would split room '{room}'")]
    WouldSplitRoom { room: String, cell: Cell },

    #[error("cell {0} does not belong to any room")]
    CellNotInRoom(Cell),

    #[error("cannot remove the last remaining floor")]
    LastFloor,
}

/// A rejected pathfinding or distance query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("floor {0} does not exist")]
    UnknownFloor(usize),

    #[error("room '{room}' not found on floor {floor}")]
    UnknownRoom { room: String, floor: usize },

    #[error("node {cell} on floor {floor} is outside the {}x{} grid", .size.rows, .size.cols)]
    OutOfBounds {
        floor: usize,
        cell: Cell,
        size: GridSize,
    },
}

/// Returned when a [`crate::shared::CancelToken`] fires mid-computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled after {completed} of {total} searches")]
pub struct Cancelled {
    pub completed: usize,
    pub total: usize,
}

/// One problem found while validating an imported document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIssue {
    #[error("document contains no floors")]
    NoFloors,

    #[error("floor {floor}: grid must be at least 1x1, got {rows}x{cols}")]
    EmptyGrid { floor: usize, rows: i64, cols: i64 },

    #[error("floor {floor}: grid {rows}x{cols} differs from floor 0 ({expected_rows}x{expected_cols})")]
    GridMismatch {
        floor: usize,
        rows: i64,
        cols: i64,
        expected_rows: i64,
        expected_cols: i64,
    },

    #[error("floor {floor}: {field} entry [{row}, {col}] is out of range")]
    OutOfRange {
        floor: usize,
        field: String,
        row: i64,
        col: i64,
    },

    #[error("floor {floor}: room name is empty")]
    EmptyRoomName { floor: usize },

    #[error("floor {floor}: room '{room}' has no cells")]
    EmptyRoom { floor: usize, room: String },

    #[error("floor {floor}: room '{room}' is not 4-connected ({components} components)")]
    DisconnectedRoom {
        floor: usize,
        room: String,
        components: usize,
    },

    #[error("floor {floor}: cell {cell} is claimed by both '{first}' and '{second}'")]
    SharedCell {
        floor: usize,
        cell: Cell,
        first: String,
        second: String,
    },
}

/// Failure to read, write or accept a plan document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] Box<bincode::ErrorKind>),

    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("document rejected with {} issue(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<DocumentIssue>),
}

fn summarize(issues: &[DocumentIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Invalid or unreadable planner configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure of an operation through [`crate::shared::SharedPlan`].
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("plan lock poisoned by a panicked writer")]
    Poisoned,

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}
