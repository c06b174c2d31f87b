//! Thread-safe handle enforcing single-writer / many-reader access to a plan.
//!
//! Edits take the write lock, so they are serialized and never overlap a
//! search. Path queries, distance matrices and exports take the read lock and
//! may run concurrently with each other; each one sees a stable snapshot for
//! its whole duration.

use crate::config::AStarSettings;
use crate::distances::{distance_matrix_cancellable, DistanceMatrix};
use crate::document::PlanDocument;
use crate::edit::{EditCommand, EditOutcome};
use crate::error::SharedError;
use crate::floor_set::{FloorSet, NavNode};
use crate::pathfinding::{PathPlanner, PathResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Cooperative cancellation flag, cheap to clone across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Shared, lock-protected floor set.
#[derive(Debug, Clone)]
pub struct SharedPlan {
    inner: Arc<RwLock<FloorSet>>,
    settings: AStarSettings,
}

impl SharedPlan {
    pub fn new(floors: FloorSet, settings: AStarSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(floors)),
            settings,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, FloorSet>, SharedError> {
        self.inner.read().map_err(|_| SharedError::Poisoned)
    }

    /// Apply one edit under the write lock.
    pub fn apply(&self, command: EditCommand) -> Result<EditOutcome, SharedError> {
        let mut floors = self.inner.write().map_err(|_| SharedError::Poisoned)?;
        Ok(floors.apply(command)?)
    }

    pub fn find_path(&self, start: NavNode, goal: NavNode) -> Result<PathResult, SharedError> {
        let floors = self.read()?;
        let planner = PathPlanner::new(&floors, self.settings.clone());
        Ok(planner.find_path(start, goal)?)
    }

    pub fn find_room_path(
        &self,
        start_room: &str,
        start_floor: usize,
        end_room: &str,
        end_floor: usize,
    ) -> Result<PathResult, SharedError> {
        let floors = self.read()?;
        let planner = PathPlanner::new(&floors, self.settings.clone());
        Ok(planner.find_room_path(start_room, start_floor, end_room, end_floor)?)
    }

    pub fn distance_matrix(&self, cancel: &CancelToken) -> Result<DistanceMatrix, SharedError> {
        let floors = self.read()?;
        Ok(distance_matrix_cancellable(&floors, &self.settings, cancel)?)
    }

    pub fn export(&self) -> Result<PlanDocument, SharedError> {
        let floors = self.read()?;
        Ok(PlanDocument::from_floor_set(&floors))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Result<FloorSet, SharedError> {
        Ok(self.read()?.clone())
    }
}
