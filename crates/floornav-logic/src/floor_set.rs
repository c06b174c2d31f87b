//! Ordered collection of floors plus the cross-floor connector graph.
//!
//! Floor index is positional: it is the unit of "up"/"down" for stairs and
//! for the A* floor penalty. All floors share one [`GridSize`].

use crate::config::{FloorSection, PlannerConfig};
use crate::error::{EditError, QueryError};
use crate::floor::GridFloor;
use crate::grid::{Cell, ConnectorKind, GridSize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A search node: one cell on one floor. Orders by floor, then row, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NavNode {
    pub floor: usize,
    pub cell: Cell,
}

impl NavNode {
    pub const fn new(floor: usize, row: usize, col: usize) -> Self {
        Self {
            floor,
            cell: Cell::new(row, col),
        }
    }
}

impl fmt::Display for NavNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}{}", self.floor, self.cell)
    }
}

/// A room identified across the whole plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomRef {
    pub floor: usize,
    pub name: String,
}

impl fmt::Display for RoomRef {
    /// `"Kitchen (F1)"`, with a 1-based floor number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (F{})", self.name, self.floor + 1)
    }
}

/// All floors of a plan.
///
/// `naming` only decides names for floors added later; it is not part of the
/// plan's state and is ignored by equality.
#[derive(Debug, Clone)]
pub struct FloorSet {
    size: GridSize,
    floors: Vec<GridFloor>,
    naming: FloorSection,
}

impl PartialEq for FloorSet {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.floors == other.floors
    }
}

impl Eq for FloorSet {}

impl FloorSet {
    /// An empty plan with no floors.
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            floors: Vec::new(),
            naming: FloorSection::default(),
        }
    }

    /// A plan with `count` empty floors named "Floor 1", "Floor 2", ...
    pub fn with_floors(size: GridSize, count: usize) -> Self {
        let mut set = Self::new(size);
        for _ in 0..count {
            set.add_default_floor();
        }
        set
    }

    /// A plan sized and named from configuration.
    pub fn from_config(config: &PlannerConfig, count: usize) -> Self {
        let mut set = Self::new(config.grid.size());
        set.set_naming(config.floors.clone());
        for _ in 0..count {
            set.add_default_floor();
        }
        set
    }

    pub(crate) fn from_floors(size: GridSize, floors: Vec<GridFloor>) -> Self {
        Self {
            size,
            floors,
            naming: FloorSection::default(),
        }
    }

    /// Naming used by [`FloorSet::add_default_floor`] from now on.
    pub fn set_naming(&mut self, naming: FloorSection) {
        self.naming = naming;
    }

    pub fn naming(&self) -> &FloorSection {
        &self.naming
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn floors(&self) -> &[GridFloor] {
        &self.floors
    }

    pub fn floor(&self, index: usize) -> Option<&GridFloor> {
        self.floors.get(index)
    }

    pub(crate) fn floor_mut(&mut self, index: usize) -> Result<&mut GridFloor, EditError> {
        self.floors
            .get_mut(index)
            .ok_or(EditError::UnknownFloor(index))
    }

    /// Append a floor on top. Returns its index. An empty name gets the
    /// default name for that position.
    pub fn add_floor(&mut self, name: impl Into<String>) -> usize {
        let mut name = name.into();
        if name.is_empty() {
            name = self.naming.default_name(self.floors.len());
        }
        self.floors.push(GridFloor::new(name, self.size));
        self.floors.len() - 1
    }

    pub fn add_default_floor(&mut self) -> usize {
        self.add_floor(self.naming.default_name(self.floors.len()))
    }

    /// Remove a floor; floors above shift down one index. The last floor cannot be removed.
    pub fn remove_floor(&mut self, index: usize) -> Result<GridFloor, EditError> {
        if index >= self.floors.len() {
            return Err(EditError::UnknownFloor(index));
        }
        if self.floors.len() == 1 {
            return Err(EditError::LastFloor);
        }
        Ok(self.floors.remove(index))
    }

    // ── Nodes & adjacency ───────────────────────────────────────────────

    pub fn check_node(&self, node: NavNode) -> Result<(), QueryError> {
        if node.floor >= self.floors.len() {
            return Err(QueryError::UnknownFloor(node.floor));
        }
        if !self.size.contains(node.cell) {
            return Err(QueryError::OutOfBounds {
                floor: node.floor,
                cell: node.cell,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Every node reachable from `node` in one step (cost 1 each).
    ///
    /// - planar: the open axis neighbours on the same floor
    /// - stairs: same cell one floor up or down, if that cell is also a stair
    /// - elevator: same cell on every other floor that marks it an elevator
    pub fn neighbors(&self, node: NavNode) -> Vec<NavNode> {
        let Some(floor) = self.floors.get(node.floor) else {
            return Vec::new();
        };
        let mut out: Vec<NavNode> = floor
            .open_neighbors(node.cell)
            .map(|cell| NavNode {
                floor: node.floor,
                cell,
            })
            .collect();
        out.extend(self.vertical_neighbors(node));
        out
    }

    /// Cross-floor neighbours of `node` only.
    pub fn vertical_neighbors(&self, node: NavNode) -> Vec<NavNode> {
        let mut out = Vec::new();
        let Some(floor) = self.floors.get(node.floor) else {
            return out;
        };
        let cell = node.cell;

        if floor.is_connector(cell, ConnectorKind::Stair) {
            let below = node.floor.checked_sub(1);
            let above = Some(node.floor + 1);
            for f in [below, above].into_iter().flatten() {
                if self.marks(f, cell, ConnectorKind::Stair) {
                    out.push(NavNode { floor: f, cell });
                }
            }
        }

        if floor.is_connector(cell, ConnectorKind::Elevator) {
            for f in 0..self.floors.len() {
                if f != node.floor
                    && self.marks(f, cell, ConnectorKind::Elevator)
                    && !out.contains(&NavNode { floor: f, cell })
                {
                    out.push(NavNode { floor: f, cell });
                }
            }
        }
        out
    }

    /// Connector used by a vertical step from `from` to `to`, if that step exists.
    /// Elevator wins when both kinds link the two nodes.
    pub fn connector_between(&self, from: NavNode, to: NavNode) -> Option<ConnectorKind> {
        if from.cell != to.cell || from.floor == to.floor {
            return None;
        }
        let both = |kind| self.marks(from.floor, from.cell, kind) && self.marks(to.floor, to.cell, kind);
        if both(ConnectorKind::Elevator) {
            Some(ConnectorKind::Elevator)
        } else if both(ConnectorKind::Stair) && from.floor.abs_diff(to.floor) == 1 {
            Some(ConnectorKind::Stair)
        } else {
            None
        }
    }

    fn marks(&self, floor: usize, cell: Cell, kind: ConnectorKind) -> bool {
        self.floors
            .get(floor)
            .is_some_and(|f| f.is_connector(cell, kind))
    }

    // ── Rooms ───────────────────────────────────────────────────────────

    /// Every room in the plan, in floor order then name order.
    pub fn room_refs(&self) -> Vec<RoomRef> {
        self.floors
            .iter()
            .enumerate()
            .flat_map(|(floor, f)| {
                f.rooms().map(move |(name, _)| RoomRef {
                    floor,
                    name: name.to_string(),
                })
            })
            .collect()
    }

    /// Concrete search node for a room: its lexicographically smallest cell.
    pub fn resolve_room(&self, room: &str, floor: usize) -> Result<NavNode, QueryError> {
        let f = self
            .floors
            .get(floor)
            .ok_or(QueryError::UnknownFloor(floor))?;
        f.room(room)
            .and_then(|r| r.representative())
            .map(|cell| NavNode { floor, cell })
            .ok_or_else(|| QueryError::UnknownRoom {
                room: room.to_string(),
                floor,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_floors() -> FloorSet {
        FloorSet::with_floors(GridSize::square(5), 3)
    }

    #[test]
    fn default_floor_names() {
        let set = three_floors();
        let names: Vec<_> = set.floors().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Floor 1", "Floor 2", "Floor 3"]);
    }

    #[test]
    fn empty_floor_name_gets_default() {
        let mut set = three_floors();
        let index = set.add_floor("");
        assert_eq!(set.floor(index).unwrap().name(), "Floor 4");
    }

    #[test]
    fn configured_prefix_names_later_floors() {
        let mut config = PlannerConfig::default();
        config.floors.default_name_prefix = "Level".to_string();
        let mut set = FloorSet::from_config(&config, 2);
        set.add_default_floor();
        set.add_floor("");
        let names: Vec<_> = set.floors().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Level 1", "Level 2", "Level 3", "Level 4"]);
    }

    #[test]
    fn naming_is_not_part_of_equality() {
        let mut config = PlannerConfig::default();
        config.floors.default_name_prefix = "Level".to_string();
        let configured = FloorSet::from_config(&config, 1);
        let mut plain = FloorSet::new(configured.size());
        plain.add_floor("Level 1");
        assert_eq!(configured, plain);
    }

    #[test]
    fn last_floor_cannot_be_removed() {
        let mut set = FloorSet::with_floors(GridSize::square(3), 2);
        assert!(set.remove_floor(0).is_ok());
        assert_eq!(set.remove_floor(0), Err(EditError::LastFloor));
        assert_eq!(set.remove_floor(7), Err(EditError::UnknownFloor(7)));
    }

    #[test]
    fn stairs_link_adjacent_floors_only() {
        let mut set = three_floors();
        let cell = Cell::new(2, 2);
        for f in 0..3 {
            set.floor_mut(f)
                .unwrap()
                .toggle_connector(cell, ConnectorKind::Stair)
                .unwrap();
        }
        let up = set.vertical_neighbors(NavNode { floor: 0, cell });
        assert_eq!(up, vec![NavNode { floor: 1, cell }]);
        let middle = set.vertical_neighbors(NavNode { floor: 1, cell });
        assert_eq!(
            middle,
            vec![NavNode { floor: 0, cell }, NavNode { floor: 2, cell }]
        );
    }

    #[test]
    fn stairs_need_matching_marker() {
        let mut set = three_floors();
        let cell = Cell::new(1, 1);
        set.floor_mut(0)
            .unwrap()
            .toggle_connector(cell, ConnectorKind::Stair)
            .unwrap();
        set.floor_mut(2)
            .unwrap()
            .toggle_connector(cell, ConnectorKind::Stair)
            .unwrap();
        assert!(set.vertical_neighbors(NavNode { floor: 0, cell }).is_empty());
    }

    #[test]
    fn elevators_skip_floors() {
        let mut set = three_floors();
        let cell = Cell::new(2, 2);
        for f in [0, 2] {
            set.floor_mut(f)
                .unwrap()
                .toggle_connector(cell, ConnectorKind::Elevator)
                .unwrap();
        }
        let from_ground = NavNode { floor: 0, cell };
        let top = NavNode { floor: 2, cell };
        assert_eq!(set.vertical_neighbors(from_ground), vec![top]);
        assert_eq!(
            set.connector_between(from_ground, top),
            Some(ConnectorKind::Elevator)
        );
    }

    #[test]
    fn neighbors_combine_planar_and_vertical() {
        let mut set = FloorSet::with_floors(GridSize::square(3), 2);
        let cell = Cell::new(1, 1);
        for f in 0..2 {
            set.floor_mut(f)
                .unwrap()
                .toggle_connector(cell, ConnectorKind::Stair)
                .unwrap();
        }
        let n = set.neighbors(NavNode { floor: 0, cell });
        assert_eq!(n.len(), 5);
        assert!(n.contains(&NavNode { floor: 1, cell }));
    }

    #[test]
    fn resolve_room_uses_smallest_cell() {
        let mut set = three_floors();
        let floor = set.floor_mut(1).unwrap();
        floor.paint("Lab", Cell::new(3, 3)).unwrap();
        floor.paint("Lab", Cell::new(3, 2)).unwrap();
        floor.paint("Lab", Cell::new(2, 2)).unwrap();
        assert_eq!(set.resolve_room("Lab", 1), Ok(NavNode::new(1, 2, 2)));
        assert!(matches!(
            set.resolve_room("Lab", 0),
            Err(QueryError::UnknownRoom { .. })
        ));
        assert_eq!(set.resolve_room("Lab", 9), Err(QueryError::UnknownFloor(9)));
    }

    #[test]
    fn room_refs_are_ordered() {
        let mut set = three_floors();
        set.floor_mut(1).unwrap().paint("b", Cell::new(0, 0)).unwrap();
        set.floor_mut(1).unwrap().paint("a", Cell::new(4, 4)).unwrap();
        set.floor_mut(0).unwrap().paint("z", Cell::new(0, 0)).unwrap();
        let refs: Vec<String> = set.room_refs().iter().map(|r| r.to_string()).collect();
        assert_eq!(refs, vec!["z (F1)", "a (F2)", "b (F2)"]);
    }

    #[test]
    fn check_node_bounds() {
        let set = three_floors();
        assert!(set.check_node(NavNode::new(2, 4, 4)).is_ok());
        assert_eq!(
            set.check_node(NavNode::new(3, 0, 0)),
            Err(QueryError::UnknownFloor(3))
        );
        assert!(matches!(
            set.check_node(NavNode::new(0, 5, 0)),
            Err(QueryError::OutOfBounds { .. })
        ));
    }
}
