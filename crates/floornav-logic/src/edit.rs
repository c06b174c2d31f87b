//! Editor commands and their single dispatch point.
//!
//! An editor front end translates clicks into [`EditCommand`] values and
//! feeds them to [`FloorSet::apply`]; there is no mutable "mode" flag. The
//! commands are serde-tagged so edit scripts can be stored as JSON:
//!
//! ```
//! use floornav_logic::edit::EditCommand;
//!
//! let script = r#"[
//!     { "op": "paint", "floor": 0, "room": "Lobby", "cell": [2, 2] },
//!     { "op": "toggle_connector", "floor": 0, "cell": [2, 2], "kind": "elevator" }
//! ]"#;
//! let commands: Vec<EditCommand> = serde_json::from_str(script).unwrap();
//! assert_eq!(commands.len(), 2);
//! ```

use crate::error::EditError;
use crate::floor_set::FloorSet;
use crate::grid::{Cell, ConnectorKind, WallKey};
use log::debug;
use serde::{Deserialize, Serialize};

/// One discrete edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    Paint {
        floor: usize,
        room: String,
        cell: Cell,
    },
    Erase {
        floor: usize,
        cell: Cell,
    },
    ToggleWall {
        floor: usize,
        wall: WallKey,
    },
    ToggleConnector {
        floor: usize,
        cell: Cell,
        kind: ConnectorKind,
    },
    DeleteRoom {
        floor: usize,
        room: String,
    },
    SetLabel {
        floor: usize,
        room: String,
        label: String,
    },
    AddFloor {
        #[serde(default)]
        name: Option<String>,
    },
    RemoveFloor {
        floor: usize,
    },
}

/// What a successful edit changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Painted {
        created_room: bool,
        displaced: Option<String>,
    },
    Erased {
        room: String,
    },
    WallToggled {
        present: bool,
    },
    ConnectorToggled {
        present: bool,
    },
    RoomDeleted {
        walls_removed: usize,
    },
    LabelSet,
    FloorAdded {
        index: usize,
    },
    FloorRemoved {
        name: String,
    },
}

impl FloorSet {
    /// Apply one edit. On `Err` the floor set is unchanged.
    pub fn apply(&mut self, command: EditCommand) -> Result<EditOutcome, EditError> {
        debug!("apply {:?}", command);
        match command {
            EditCommand::Paint { floor, room, cell } => {
                let painted = self.floor_mut(floor)?.paint(&room, cell)?;
                Ok(EditOutcome::Painted {
                    created_room: painted.created_room,
                    displaced: painted.displaced,
                })
            }
            EditCommand::Erase { floor, cell } => {
                let room = self.floor_mut(floor)?.erase(cell)?;
                Ok(EditOutcome::Erased { room })
            }
            EditCommand::ToggleWall { floor, wall } => {
                let present = self.floor_mut(floor)?.toggle_wall(wall)?;
                Ok(EditOutcome::WallToggled { present })
            }
            EditCommand::ToggleConnector { floor, cell, kind } => {
                let present = self.floor_mut(floor)?.toggle_connector(cell, kind)?;
                Ok(EditOutcome::ConnectorToggled { present })
            }
            EditCommand::DeleteRoom { floor, room } => {
                let walls_removed = self.floor_mut(floor)?.delete_room(&room)?;
                Ok(EditOutcome::RoomDeleted { walls_removed })
            }
            EditCommand::SetLabel { floor, room, label } => {
                self.floor_mut(floor)?.set_label(&room, label)?;
                Ok(EditOutcome::LabelSet)
            }
            EditCommand::AddFloor { name } => {
                let index = match name {
                    Some(name) => self.add_floor(name),
                    None => self.add_default_floor(),
                };
                Ok(EditOutcome::FloorAdded { index })
            }
            EditCommand::RemoveFloor { floor } => {
                let removed = self.remove_floor(floor)?;
                Ok(EditOutcome::FloorRemoved {
                    name: removed.name().to_string(),
                })
            }
        }
    }

    /// Apply commands in order, stopping at the first failure.
    ///
    /// Returns the outcomes of the commands that succeeded; on failure, the
    /// index of the failing command alongside its error. Earlier commands stay
    /// applied.
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = EditCommand>,
    ) -> Result<Vec<EditOutcome>, (usize, EditError)> {
        let mut outcomes = Vec::new();
        for (i, command) in commands.into_iter().enumerate() {
            match self.apply(command) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => return Err((i, e)),
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSize;

    fn paint(floor: usize, room: &str, row: usize, col: usize) -> EditCommand {
        EditCommand::Paint {
            floor,
            room: room.to_string(),
            cell: Cell::new(row, col),
        }
    }

    #[test]
    fn dispatch_routes_to_floor() {
        let mut set = FloorSet::with_floors(GridSize::square(5), 2);
        let outcome = set.apply(paint(1, "A", 2, 2)).unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Painted {
                created_room: true,
                displaced: None
            }
        );
        assert!(set.floor(1).unwrap().room("A").is_some());
        assert!(set.floor(0).unwrap().room("A").is_none());
    }

    #[test]
    fn unknown_floor_rejected() {
        let mut set = FloorSet::with_floors(GridSize::square(5), 1);
        assert_eq!(
            set.apply(paint(3, "A", 0, 0)),
            Err(EditError::UnknownFloor(3))
        );
    }

    #[test]
    fn floor_commands() {
        let mut set = FloorSet::with_floors(GridSize::square(5), 1);
        assert_eq!(
            set.apply(EditCommand::AddFloor { name: None }),
            Ok(EditOutcome::FloorAdded { index: 1 })
        );
        assert_eq!(set.floor(1).unwrap().name(), "Floor 2");
        assert_eq!(
            set.apply(EditCommand::RemoveFloor { floor: 0 }),
            Ok(EditOutcome::FloorRemoved {
                name: "Floor 1".into()
            })
        );
        assert_eq!(
            set.apply(EditCommand::RemoveFloor { floor: 0 }),
            Err(EditError::LastFloor)
        );
    }

    #[test]
    fn apply_all_stops_at_first_failure() {
        let mut set = FloorSet::with_floors(GridSize::square(5), 1);
        let result = set.apply_all(vec![
            paint(0, "A", 2, 2),
            paint(0, "A", 4, 4),
            paint(0, "A", 2, 3),
        ]);
        let (index, err) = result.unwrap_err();
        assert_eq!(index, 1);
        assert!(matches!(err, EditError::DisconnectedPaint { .. }));
        assert_eq!(set.floor(0).unwrap().room("A").unwrap().len(), 1);
    }

    #[test]
    fn commands_parse_from_json() {
        let json = r#"[
            { "op": "paint", "floor": 0, "room": "Hall", "cell": [1, 1] },
            { "op": "toggle_wall", "floor": 0, "wall": { "orientation": "horizontal", "cell": [0, 1] } },
            { "op": "delete_room", "floor": 0, "room": "Hall" },
            { "op": "add_floor" }
        ]"#;
        let commands: Vec<EditCommand> = serde_json::from_str(json).unwrap();
        assert_eq!(commands[0], paint(0, "Hall", 1, 1));
        assert_eq!(
            commands[1],
            EditCommand::ToggleWall {
                floor: 0,
                wall: WallKey::horizontal(0, 1)
            }
        );
        assert_eq!(commands[3], EditCommand::AddFloor { name: None });
    }
}
