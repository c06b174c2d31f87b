//! Save/Load of a whole plan.
//!
//! The portable form is a JSON array with one record per floor, in floor
//! order:
//!
//! ```json
//! [{ "name": "Floor 1", "rows": 40, "cols": 40,
//!    "rooms": { "Lobby": { "cells": [[2, 2], [2, 3]], "label": "Lobby" } },
//!    "horizontal_walls": [[1, 2]], "vertical_walls": [[2, 1]],
//!    "stairs": [], "elevators": [[2, 2]] }]
//! ```
//!
//! Import validates everything before building any state and rejects the
//! whole document if a single issue is found. Coordinates are read as signed
//! integers so sentinel boundary walls (`-1`) are reported as out-of-range
//! rather than failing to parse.
//!
//! A compact bincode snapshot with a format version is also provided for
//! fast local saves.

use crate::error::{DocumentError, DocumentIssue};
use crate::floor::{count_components, GridFloor, Room};
use crate::floor_set::FloorSet;
use crate::grid::{Cell, ConnectorKind, GridSize, WallOrientation};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

/// Version number for the binary snapshot format (increment when it changes).
const SNAPSHOT_VERSION: u32 = 1;

/// Grid size assumed for records that omit `rows`/`cols`.
const DEFAULT_GRID_DIM: i64 = 40;

fn default_dim() -> i64 {
    DEFAULT_GRID_DIM
}

/// A `[row, col]` pair as stored in documents.
pub type CellRecord = [i64; 2];

/// One room as stored in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub cells: Vec<CellRecord>,
    /// Empty or missing means "same as the room name".
    #[serde(default)]
    pub label: String,
}

/// One floor as stored in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_dim")]
    pub rows: i64,
    #[serde(default = "default_dim")]
    pub cols: i64,
    #[serde(default)]
    pub rooms: BTreeMap<String, RoomRecord>,
    #[serde(default, alias = "h_walls")]
    pub horizontal_walls: Vec<CellRecord>,
    #[serde(default, alias = "v_walls")]
    pub vertical_walls: Vec<CellRecord>,
    #[serde(default)]
    pub stairs: Vec<CellRecord>,
    #[serde(default)]
    pub elevators: Vec<CellRecord>,
}

/// Serializable form of a [`FloorSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanDocument {
    pub floors: Vec<FloorRecord>,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    floors: Vec<FloorRecord>,
}

fn to_record(cell: Cell) -> CellRecord {
    [cell.row as i64, cell.col as i64]
}

fn records(cells: &BTreeSet<Cell>) -> Vec<CellRecord> {
    cells.iter().copied().map(to_record).collect()
}

impl PlanDocument {
    // ── Export ──────────────────────────────────────────────────────────

    pub fn from_floor_set(floors: &FloorSet) -> Self {
        let size = floors.size();
        let floors = floors
            .floors()
            .iter()
            .map(|floor| FloorRecord {
                name: floor.name().to_string(),
                rows: size.rows as i64,
                cols: size.cols as i64,
                rooms: floor
                    .rooms()
                    .map(|(name, room)| {
                        (
                            name.to_string(),
                            RoomRecord {
                                cells: records(room.cells()),
                                label: room.label().to_string(),
                            },
                        )
                    })
                    .collect(),
                horizontal_walls: records(floor.walls(WallOrientation::Horizontal)),
                vertical_walls: records(floor.walls(WallOrientation::Vertical)),
                stairs: records(floor.connectors(ConnectorKind::Stair)),
                elevators: records(floor.connectors(ConnectorKind::Elevator)),
            })
            .collect();
        Self { floors }
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), DocumentError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn write_snapshot<W: Write>(&self, writer: W) -> Result<(), DocumentError> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            floors: self.floors.clone(),
        };
        bincode::serialize_into(writer, &snapshot)?;
        Ok(())
    }

    // ── Import ──────────────────────────────────────────────────────────

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self, DocumentError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn read_snapshot<R: Read>(reader: R) -> Result<Self, DocumentError> {
        let snapshot: Snapshot = bincode::deserialize_from(reader)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DocumentError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        Ok(Self {
            floors: snapshot.floors,
        })
    }

    /// Every problem that would stop this document from loading.
    pub fn validate(&self) -> Vec<DocumentIssue> {
        let mut issues = Vec::new();
        let Some(first) = self.floors.first() else {
            issues.push(DocumentIssue::NoFloors);
            return issues;
        };

        for (index, floor) in self.floors.iter().enumerate() {
            if floor.rows <= 0 || floor.cols <= 0 {
                issues.push(DocumentIssue::EmptyGrid {
                    floor: index,
                    rows: floor.rows,
                    cols: floor.cols,
                });
                continue;
            }
            if (floor.rows, floor.cols) != (first.rows, first.cols) {
                issues.push(DocumentIssue::GridMismatch {
                    floor: index,
                    rows: floor.rows,
                    cols: floor.cols,
                    expected_rows: first.rows,
                    expected_cols: first.cols,
                });
            }
            validate_floor(index, floor, &mut issues);
        }
        issues
    }

    /// Validate and build the live floor set. Nothing is built if any issue is found.
    pub fn to_floor_set(&self) -> Result<FloorSet, DocumentError> {
        let issues = self.validate();
        if !issues.is_empty() {
            warn!("rejected plan document: {} issue(s)", issues.len());
            return Err(DocumentError::Invalid(issues));
        }

        // Validation guarantees at least one floor with a positive, shared size.
        let first = &self.floors[0];
        let size = GridSize::new(first.rows as usize, first.cols as usize);
        let floors = self
            .floors
            .iter()
            .enumerate()
            .map(|(index, record)| build_floor(index, record, size))
            .collect();
        let set = FloorSet::from_floors(size, floors);
        info!(
            "loaded plan: {} floor(s), {}x{} grid, {} room(s)",
            set.len(),
            size.rows,
            size.cols,
            set.room_refs().len()
        );
        Ok(set)
    }

    /// Parse and validate a JSON plan in one go.
    pub fn import_json<R: Read>(reader: R) -> Result<FloorSet, DocumentError> {
        Self::read_json(reader)?.to_floor_set()
    }

    /// Export a floor set as pretty JSON.
    pub fn export_json<W: Write>(floors: &FloorSet, writer: W) -> Result<(), DocumentError> {
        let document = Self::from_floor_set(floors);
        document.write_json(writer)?;
        info!("saved plan: {} floor(s)", document.floors.len());
        Ok(())
    }
}

fn in_range(cell: &CellRecord, max_row: i64, max_col: i64) -> bool {
    (0..max_row).contains(&cell[0]) && (0..max_col).contains(&cell[1])
}

fn to_cell(cell: &CellRecord) -> Cell {
    Cell::new(cell[0] as usize, cell[1] as usize)
}

fn validate_floor(index: usize, floor: &FloorRecord, issues: &mut Vec<DocumentIssue>) {
    let (rows, cols) = (floor.rows, floor.cols);
    let mut out_of_range = |field: String, cells: &[CellRecord], max_row: i64, max_col: i64| {
        for cell in cells.iter().filter(|c| !in_range(c, max_row, max_col)) {
            issues.push(DocumentIssue::OutOfRange {
                floor: index,
                field: field.clone(),
                row: cell[0],
                col: cell[1],
            });
        }
    };

    // Walls must name interior edges.
    out_of_range("horizontal_walls".into(), floor.horizontal_walls.as_slice(), rows - 1, cols);
    out_of_range("vertical_walls".into(), floor.vertical_walls.as_slice(), rows, cols - 1);
    out_of_range("stairs".into(), floor.stairs.as_slice(), rows, cols);
    out_of_range("elevators".into(), floor.elevators.as_slice(), rows, cols);
    for (name, room) in &floor.rooms {
        out_of_range(format!("rooms.{}.cells", name), room.cells.as_slice(), rows, cols);
    }

    let mut owners: BTreeMap<Cell, &str> = BTreeMap::new();
    for (name, room) in &floor.rooms {
        if name.is_empty() {
            issues.push(DocumentIssue::EmptyRoomName { floor: index });
        }
        let cells: BTreeSet<Cell> = room
            .cells
            .iter()
            .filter(|c| in_range(c, rows, cols))
            .map(to_cell)
            .collect();
        if room.cells.is_empty() {
            issues.push(DocumentIssue::EmptyRoom {
                floor: index,
                room: name.clone(),
            });
            continue;
        }
        let components = count_components(&cells);
        if components > 1 {
            issues.push(DocumentIssue::DisconnectedRoom {
                floor: index,
                room: name.clone(),
                components,
            });
        }
        for cell in cells {
            if let Some(first) = owners.insert(cell, name.as_str()) {
                issues.push(DocumentIssue::SharedCell {
                    floor: index,
                    cell,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
        }
    }
}

fn build_floor(index: usize, record: &FloorRecord, size: GridSize) -> GridFloor {
    let cells = |list: &[CellRecord]| list.iter().map(to_cell).collect::<BTreeSet<Cell>>();
    let rooms = record
        .rooms
        .iter()
        .map(|(name, room)| {
            let label = if room.label.is_empty() {
                name.clone()
            } else {
                room.label.clone()
            };
            (name.clone(), Room::new(label, cells(&room.cells)))
        })
        .collect();
    let name = if record.name.is_empty() {
        format!("Floor {}", index + 1)
    } else {
        record.name.clone()
    };
    GridFloor::from_parts(
        name,
        size,
        rooms,
        cells(&record.horizontal_walls),
        cells(&record.vertical_walls),
        cells(&record.stairs),
        cells(&record.elevators),
    )
}
