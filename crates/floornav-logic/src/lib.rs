//! Pure planning logic for FloorNav.
//!
//! This crate holds everything needed to edit a multi-floor building plan
//! and route through it: room painting, wall and connector toggles, 3-D A*,
//! all-pairs room distances and plan documents. No UI, no global state and
//! no I/O beyond the `Read`/`Write` handles callers pass in, so every piece
//! is unit-testable and can sit behind any front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Planner configuration (grid size, A* floor penalty, floor naming) |
//! | [`directions`] | Turn-by-turn walking legs for a route |
//! | [`distances`] | All-pairs room distance matrix, cancellable |
//! | [`document`] | JSON plan documents with full validation, bincode snapshots |
//! | [`edit`] | Serializable edit commands and their dispatch |
//! | [`error`] | Typed failures for edits, queries, documents and config |
//! | [`floor`] | One floor: rooms, walls, stairs and elevators |
//! | [`floor_set`] | Ordered floors sharing one grid size, 3-D adjacency |
//! | [`grid`] | Cells, directions, wall keys, grid sizes |
//! | [`pathfinding`] | 3-D A* over a floor set |
//! | [`shared`] | Lock-protected plan handle and cancel tokens |

pub mod config;
pub mod directions;
pub mod distances;
pub mod document;
pub mod edit;
pub mod error;
pub mod floor;
pub mod floor_set;
pub mod grid;
pub mod pathfinding;
pub mod shared;

pub use config::{AStarSettings, FloorSection, PlannerConfig};
pub use directions::{Directions, Leg};
pub use distances::{distance_matrix, DistanceEntry, DistanceMatrix};
pub use document::PlanDocument;
pub use edit::{EditCommand, EditOutcome};
pub use error::{DocumentError, DocumentIssue, EditError, QueryError};
pub use floor::{GridFloor, Room};
pub use floor_set::{FloorSet, NavNode, RoomRef};
pub use grid::{Cell, ConnectorKind, Direction, GridSize, WallKey, WallOrientation};
pub use pathfinding::{PathOutcome, PathPlanner, PathResult, Route};
pub use shared::{CancelToken, SharedPlan};
