//! One floor of a plan: rooms, wall segments and connector markers.
//!
//! Every mutation goes through a method that keeps three invariants:
//! 1. Each room is a non-empty, 4-connected set of cells.
//! 2. No two rooms on the floor share a cell.
//! 3. Only interior wall keys are stored (see [`crate::grid`]).
//!
//! Painting runs **perimeter reconciliation** on the painted cell: the four
//! incident edges get a wall iff the neighbour across is not in the same
//! room. It never looks further than those four edges, so repainting an
//! enclosed room cannot leave stray walls behind. Manual wall toggles are the
//! escape hatch for doors and are never reverted automatically.
//!
//! Every edit validates first and mutates second, so an `Err` means the floor
//! is untouched.

use crate::error::EditError;
use crate::grid::{Cell, ConnectorKind, Direction, GridSize, WallKey, WallOrientation};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A named room: its cells and a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    cells: BTreeSet<Cell>,
    label: String,
}

impl Room {
    pub(crate) fn new(label: impl Into<String>, cells: BTreeSet<Cell>) -> Self {
        Self {
            cells,
            label: label.into(),
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// The lexicographically smallest member cell (row, then column).
    ///
    /// Rooms stored on a floor are never empty, so this is `Some` for any
    /// room obtained from a [`GridFloor`].
    pub fn representative(&self) -> Option<Cell> {
        self.cells.first().copied()
    }
}

/// What a successful paint did besides adding the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Painted {
    /// The target room did not exist before this paint.
    pub created_room: bool,
    /// Room the cell was taken from, if any.
    pub displaced: Option<String>,
    /// `displaced` lost its last cell and was destroyed.
    pub displaced_destroyed: bool,
}

/// Grid state for a single floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFloor {
    name: String,
    size: GridSize,
    rooms: BTreeMap<String, Room>,
    horizontal_walls: BTreeSet<Cell>,
    vertical_walls: BTreeSet<Cell>,
    stairs: BTreeSet<Cell>,
    elevators: BTreeSet<Cell>,
}

impl GridFloor {
    pub fn new(name: impl Into<String>, size: GridSize) -> Self {
        Self {
            name: name.into(),
            size,
            rooms: BTreeMap::new(),
            horizontal_walls: BTreeSet::new(),
            vertical_walls: BTreeSet::new(),
            stairs: BTreeSet::new(),
            elevators: BTreeSet::new(),
        }
    }

    /// Assemble a floor from already-validated parts (document import).
    pub(crate) fn from_parts(
        name: String,
        size: GridSize,
        rooms: BTreeMap<String, Room>,
        horizontal_walls: BTreeSet<Cell>,
        vertical_walls: BTreeSet<Cell>,
        stairs: BTreeSet<Cell>,
        elevators: BTreeSet<Cell>,
    ) -> Self {
        Self {
            name,
            size,
            rooms,
            horizontal_walls,
            vertical_walls,
            stairs,
            elevators,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Rooms in name order.
    pub fn rooms(&self) -> impl Iterator<Item = (&str, &Room)> {
        self.rooms.iter().map(|(name, room)| (name.as_str(), room))
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Name of the room owning `cell`, if any.
    pub fn room_at(&self, cell: Cell) -> Option<&str> {
        self.rooms
            .iter()
            .find(|(_, room)| room.contains(cell))
            .map(|(name, _)| name.as_str())
    }

    pub fn has_wall(&self, key: WallKey) -> bool {
        self.walls(key.orientation).contains(&key.cell)
    }

    /// True if a wall separates two adjacent cells. Non-adjacent pairs report `false`.
    pub fn wall_between(&self, a: Cell, b: Cell) -> bool {
        WallKey::between(a, b).is_some_and(|key| self.has_wall(key))
    }

    /// Stored wall keys of one orientation.
    pub fn walls(&self, orientation: WallOrientation) -> &BTreeSet<Cell> {
        match orientation {
            WallOrientation::Horizontal => &self.horizontal_walls,
            WallOrientation::Vertical => &self.vertical_walls,
        }
    }

    pub fn wall_count(&self) -> usize {
        self.horizontal_walls.len() + self.vertical_walls.len()
    }

    pub fn connectors(&self, kind: ConnectorKind) -> &BTreeSet<Cell> {
        match kind {
            ConnectorKind::Stair => &self.stairs,
            ConnectorKind::Elevator => &self.elevators,
        }
    }

    pub fn is_connector(&self, cell: Cell, kind: ConnectorKind) -> bool {
        self.connectors(kind).contains(&cell)
    }

    /// Planar move from `cell` in `dir`, if it stays on the grid and no wall blocks it.
    pub fn step(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        let next = cell.step(dir, self.size)?;
        (!self.wall_between(cell, next)).then_some(next)
    }

    /// Cells reachable from `cell` in one planar step.
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.step(cell, dir))
    }

    // ── Edits ───────────────────────────────────────────────────────────

    /// Paint `cell` into `room`, creating the room on first paint.
    ///
    /// A non-empty room only grows by cells 4-adjacent to it. A cell owned by
    /// another room is taken from it, unless that would split the other room.
    pub fn paint(&mut self, room: &str, cell: Cell) -> Result<Painted, EditError> {
        if room.is_empty() {
            return Err(EditError::EmptyRoomName);
        }
        self.check_bounds(cell)?;

        if let Some(target) = self.rooms.get(room) {
            if target.contains(cell) {
                return Err(EditError::AlreadyMember {
                    room: room.to_string(),
                    cell,
                });
            }
            if !cell.neighbors(self.size).any(|(_, n)| target.contains(n)) {
                debug!(
                    "[{}] rejected paint of {} into '{}': not adjacent",
                    self.name, cell, room
                );
                return Err(EditError::DisconnectedPaint {
                    room: room.to_string(),
                    cell,
                });
            }
        }

        let displaced = self.room_at(cell).map(str::to_string);
        if let Some(other) = &displaced {
            if self.removal_splits(other, cell) {
                debug!(
                    "[{}] rejected paint of {} into '{}': would split '{}'",
                    self.name, cell, room, other
                );
                return Err(EditError::WouldSplitRoom {
                    room: other.clone(),
                    cell,
                });
            }
        }

        // Validation done; everything below succeeds.
        let mut displaced_destroyed = false;
        if let Some(other) = &displaced {
            displaced_destroyed = self.remove_cell(other, cell);
        }

        let created_room = !self.rooms.contains_key(room);
        self.rooms
            .entry(room.to_string())
            .or_insert_with(|| Room::new(room, BTreeSet::new()))
            .cells
            .insert(cell);
        self.reconcile_perimeter(room, cell);

        debug!("[{}] painted {} into '{}'", self.name, cell, room);
        Ok(Painted {
            created_room,
            displaced,
            displaced_destroyed,
        })
    }

    /// Remove `cell` from whichever room owns it. Returns that room's name.
    ///
    /// Remaining neighbours in the room are walled off from the freed cell;
    /// walls between the freed cell and unowned cells are dropped; walls
    /// facing other rooms stay.
    pub fn erase(&mut self, cell: Cell) -> Result<String, EditError> {
        self.check_bounds(cell)?;
        let room = self
            .room_at(cell)
            .map(str::to_string)
            .ok_or(EditError::CellNotInRoom(cell))?;
        if self.removal_splits(&room, cell) {
            return Err(EditError::WouldSplitRoom { room, cell });
        }

        self.remove_cell(&room, cell);
        let neighbors: Vec<Cell> = cell.neighbors(self.size).map(|(_, n)| n).collect();
        for n in neighbors {
            let Some(key) = WallKey::between(cell, n) else {
                continue;
            };
            match self.room_at(n).map(|owner| owner == room) {
                Some(true) => {
                    self.walls_mut(key.orientation).insert(key.cell);
                }
                Some(false) => {}
                None => {
                    self.walls_mut(key.orientation).remove(&key.cell);
                }
            }
        }

        debug!("[{}] erased {} from '{}'", self.name, cell, room);
        Ok(room)
    }

    /// Flip a wall segment. Returns whether the wall is present afterwards.
    pub fn toggle_wall(&mut self, key: WallKey) -> Result<bool, EditError> {
        if !self.size.is_valid_wall(key) {
            return Err(EditError::InvalidWall {
                key,
                size: self.size,
            });
        }
        let walls = self.walls_mut(key.orientation);
        let present = if walls.remove(&key.cell) {
            false
        } else {
            walls.insert(key.cell);
            true
        };
        debug!("[{}] toggled {} -> {}", self.name, key, present);
        Ok(present)
    }

    /// Flip a stair or elevator marker. Returns whether the marker is present afterwards.
    pub fn toggle_connector(&mut self, cell: Cell, kind: ConnectorKind) -> Result<bool, EditError> {
        self.check_bounds(cell)?;
        let set = match kind {
            ConnectorKind::Stair => &mut self.stairs,
            ConnectorKind::Elevator => &mut self.elevators,
        };
        let present = if set.remove(&cell) {
            false
        } else {
            set.insert(cell);
            true
        };
        debug!(
            "[{}] toggled {} at {} -> {}",
            self.name,
            kind.name(),
            cell,
            present
        );
        Ok(present)
    }

    /// Delete a room and the walls private to it. Returns the number of walls removed.
    ///
    /// A wall on the room's boundary survives when the cell across belongs to
    /// another room, which keeps that room enclosed.
    pub fn delete_room(&mut self, room: &str) -> Result<usize, EditError> {
        let removed_room = self
            .rooms
            .remove(room)
            .ok_or_else(|| EditError::RoomNotFound(room.to_string()))?;

        let mut removed_walls = 0;
        for &cell in removed_room.cells() {
            for (_, n) in cell.neighbors(self.size) {
                if self.room_at(n).is_some() {
                    continue;
                }
                if let Some(key) = WallKey::between(cell, n) {
                    if self.walls_mut(key.orientation).remove(&key.cell) {
                        removed_walls += 1;
                    }
                }
            }
        }

        debug!(
            "[{}] deleted room '{}' ({} cells, {} walls removed)",
            self.name,
            room,
            removed_room.len(),
            removed_walls
        );
        Ok(removed_walls)
    }

    pub fn set_label(&mut self, room: &str, label: impl Into<String>) -> Result<(), EditError> {
        let label = label.into();
        let entry = self
            .rooms
            .get_mut(room)
            .ok_or_else(|| EditError::RoomNotFound(room.to_string()))?;
        if label.is_empty() {
            return Err(EditError::EmptyLabel(room.to_string()));
        }
        entry.label = label;
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn check_bounds(&self, cell: Cell) -> Result<(), EditError> {
        if self.size.contains(cell) {
            Ok(())
        } else {
            Err(EditError::OutOfBounds {
                cell,
                size: self.size,
            })
        }
    }

    fn walls_mut(&mut self, orientation: WallOrientation) -> &mut BTreeSet<Cell> {
        match orientation {
            WallOrientation::Horizontal => &mut self.horizontal_walls,
            WallOrientation::Vertical => &mut self.vertical_walls,
        }
    }

    /// Would taking `cell` out of `room` leave it in more than one piece?
    fn removal_splits(&self, room: &str, cell: Cell) -> bool {
        let Some(existing) = self.rooms.get(room) else {
            return false;
        };
        if existing.len() <= 2 {
            return false;
        }
        let mut rest = existing.cells.clone();
        rest.remove(&cell);
        count_components(&rest) > 1
    }

    /// Remove a cell from a room, dropping the room if it empties. Returns true if dropped.
    fn remove_cell(&mut self, room: &str, cell: Cell) -> bool {
        let emptied = match self.rooms.get_mut(room) {
            Some(entry) => {
                entry.cells.remove(&cell);
                entry.cells.is_empty()
            }
            None => false,
        };
        if emptied {
            self.rooms.remove(room);
            debug!("[{}] room '{}' lost its last cell", self.name, room);
        }
        emptied
    }

    fn reconcile_perimeter(&mut self, room: &str, cell: Cell) {
        let size = self.size;
        for (_, n) in cell.neighbors(size) {
            let Some(key) = WallKey::between(cell, n) else {
                continue;
            };
            let same_room = self.rooms.get(room).is_some_and(|r| r.contains(n));
            let walls = self.walls_mut(key.orientation);
            if same_room {
                walls.remove(&key.cell);
            } else {
                walls.insert(key.cell);
            }
        }
    }
}

/// Number of 4-connected components in a cell set.
pub fn count_components(cells: &BTreeSet<Cell>) -> usize {
    let mut seen: BTreeSet<Cell> = BTreeSet::new();
    let mut components = 0;
    for &start in cells {
        if !seen.insert(start) {
            continue;
        }
        components += 1;
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for next in orthogonal(current) {
                if cells.contains(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    components
}

/// Axis neighbours without a grid bound (the set itself bounds the search).
fn orthogonal(cell: Cell) -> impl Iterator<Item = Cell> {
    let Cell { row, col } = cell;
    [
        row.checked_sub(1).map(|r| Cell::new(r, col)),
        Some(Cell::new(row + 1, col)),
        col.checked_sub(1).map(|c| Cell::new(row, c)),
        Some(Cell::new(row, col + 1)),
    ]
    .into_iter()
    .flatten()
}
