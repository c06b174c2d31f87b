//! Turn-by-turn directions for a [`Route`].
//!
//! Runs of planar steps in the same compass direction collapse into a single
//! [`Leg::Walk`]; consecutive floor changes through the same kind of
//! connector in the same vertical direction collapse into one [`Leg::Stairs`]
//! or [`Leg::Elevator`]. Floors
//! are shown 1-based in sentences.

use crate::floor_set::{FloorSet, NavNode};
use crate::grid::{ConnectorKind, Direction};
use crate::pathfinding::Route;

/// One instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Walk {
        floor: usize,
        direction: Direction,
        steps: usize,
    },
    Stairs {
        from_floor: usize,
        to_floor: usize,
    },
    Elevator {
        from_floor: usize,
        to_floor: usize,
    },
}

impl Leg {
    pub fn sentence(&self) -> String {
        match *self {
            Leg::Walk {
                floor,
                direction,
                steps,
            } => format!(
                "On floor {}, walk {} {} {}.",
                floor + 1,
                direction.name(),
                steps,
                if steps == 1 { "step" } else { "steps" }
            ),
            Leg::Stairs {
                from_floor,
                to_floor,
            } => format!(
                "Take the stairs {} from floor {} to floor {}.",
                updown(from_floor, to_floor),
                from_floor + 1,
                to_floor + 1
            ),
            Leg::Elevator {
                from_floor,
                to_floor,
            } => format!(
                "Take the elevator {} from floor {} to floor {}.",
                updown(from_floor, to_floor),
                from_floor + 1,
                to_floor + 1
            ),
        }
    }
}

fn updown(from: usize, to: usize) -> &'static str {
    if to > from {
        "up"
    } else {
        "down"
    }
}

/// Legs of a route plus where it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directions {
    legs: Vec<Leg>,
    destination: String,
}

impl Directions {
    /// Build directions for `route`, naming the destination after the room
    /// containing the goal cell (or the cell itself when it is unowned).
    pub fn from_route(floors: &FloorSet, route: &Route) -> Self {
        let mut legs: Vec<Leg> = Vec::new();
        for pair in route.nodes().windows(2) {
            let leg = leg_for(floors, pair[0], pair[1]);
            let merged = match (legs.last_mut(), leg) {
                (
                    Some(Leg::Walk {
                        floor,
                        direction,
                        steps,
                    }),
                    Leg::Walk {
                        floor: f,
                        direction: d,
                        ..
                    },
                ) if *floor == f && *direction == d => {
                    *steps += 1;
                    true
                }
                (
                    Some(Leg::Stairs {
                        from_floor,
                        to_floor,
                    }),
                    Leg::Stairs { to_floor: next, .. },
                )
                | (
                    Some(Leg::Elevator {
                        from_floor,
                        to_floor,
                    }),
                    Leg::Elevator { to_floor: next, .. },
                ) if (*to_floor > *from_floor) == (next > *to_floor) => {
                    *to_floor = next;
                    true
                }
                _ => false,
            };
            if !merged {
                legs.push(leg);
            }
        }

        let goal = route.goal();
        let place = floors
            .floor(goal.floor)
            .and_then(|f| f.room(f.room_at(goal.cell)?))
            .map(|room| room.label().to_string())
            .unwrap_or_else(|| goal.cell.to_string());
        Self {
            legs,
            destination: format!("{} on floor {}", place, goal.floor + 1),
        }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// One sentence per leg, then the arrival sentence.
    pub fn sentences(&self) -> Vec<String> {
        let mut out: Vec<String> = self.legs.iter().map(Leg::sentence).collect();
        out.push(format!("You have arrived at {}.", self.destination));
        out
    }
}

fn leg_for(floors: &FloorSet, from: NavNode, to: NavNode) -> Leg {
    if from.floor == to.floor {
        // Planar route edges are always between adjacent cells.
        let direction = Direction::between(from.cell, to.cell).unwrap_or(Direction::North);
        return Leg::Walk {
            floor: from.floor,
            direction,
            steps: 1,
        };
    }
    let kind = floors.connector_between(from, to).unwrap_or(
        if from.floor.abs_diff(to.floor) == 1 {
            ConnectorKind::Stair
        } else {
            ConnectorKind::Elevator
        },
    );
    match kind {
        ConnectorKind::Stair => Leg::Stairs {
            from_floor: from.floor,
            to_floor: to.floor,
        },
        ConnectorKind::Elevator => Leg::Elevator {
            from_floor: from.floor,
            to_floor: to.floor,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, GridSize};
    use crate::pathfinding::PathPlanner;

    fn route(set: &FloorSet, start: NavNode, goal: NavNode) -> Route {
        PathPlanner::with_defaults(set)
            .find_path(start, goal)
            .unwrap()
            .into_route()
            .unwrap()
    }

    #[test]
    fn straight_walk_is_one_leg() {
        let mut set = FloorSet::with_floors(GridSize::square(5), 1);
        set.floor_mut(0)
            .unwrap()
            .paint("Office", Cell::new(0, 4))
            .unwrap();
        // Office is enclosed, so walk to the cell beside it.
        let r = route(&set, NavNode::new(0, 0, 0), NavNode::new(0, 0, 3));
        let directions = Directions::from_route(&set, &r);
        assert_eq!(
            directions.legs(),
            &[Leg::Walk {
                floor: 0,
                direction: Direction::East,
                steps: 3
            }]
        );
        assert_eq!(
            directions.sentences(),
            vec![
                "On floor 1, walk east 3 steps.".to_string(),
                "You have arrived at (0, 3) on floor 1.".to_string(),
            ]
        );
    }

    #[test]
    fn stair_hops_merge() {
        let mut set = FloorSet::with_floors(GridSize::square(3), 3);
        for f in 0..3 {
            set.floor_mut(f)
                .unwrap()
                .toggle_connector(Cell::new(0, 0), ConnectorKind::Stair)
                .unwrap();
        }
        set.floor_mut(2).unwrap().paint("Roof", Cell::new(0, 0)).unwrap();
        let r = route(&set, NavNode::new(0, 0, 0), NavNode::new(2, 0, 0));
        let directions = Directions::from_route(&set, &r);
        assert_eq!(
            directions.legs(),
            &[Leg::Stairs {
                from_floor: 0,
                to_floor: 2
            }]
        );
        assert_eq!(
            directions.sentences(),
            vec![
                "Take the stairs up from floor 1 to floor 3.".to_string(),
                "You have arrived at Roof on floor 3.".to_string(),
            ]
        );
    }

    #[test]
    fn elevator_leg_and_singular_step() {
        let mut set = FloorSet::with_floors(GridSize::square(3), 2);
        for f in 0..2 {
            set.floor_mut(f)
                .unwrap()
                .toggle_connector(Cell::new(1, 1), ConnectorKind::Elevator)
                .unwrap();
        }
        let r = route(&set, NavNode::new(1, 1, 2), NavNode::new(0, 1, 1));
        let sentences = Directions::from_route(&set, &r).sentences();
        assert_eq!(sentences[0], "On floor 2, walk west 1 step.");
        assert_eq!(sentences[1], "Take the elevator down from floor 2 to floor 1.");
    }

    #[test]
    fn zero_length_route_only_arrives() {
        let set = FloorSet::with_floors(GridSize::square(3), 1);
        let node = NavNode::new(0, 1, 1);
        let directions = Directions::from_route(&set, &route(&set, node, node));
        assert!(directions.legs().is_empty());
        assert_eq!(directions.sentences().len(), 1);
    }

    #[test]
    fn reversing_on_stairs_starts_a_new_leg() {
        let mut set = FloorSet::with_floors(GridSize::square(3), 2);
        for f in 0..2 {
            set.floor_mut(f)
                .unwrap()
                .toggle_connector(Cell::new(0, 0), ConnectorKind::Stair)
                .unwrap();
        }
        let there_and_back = Route::from_nodes(vec![
            NavNode::new(0, 0, 0),
            NavNode::new(1, 0, 0),
            NavNode::new(0, 0, 0),
        ]);
        let directions = Directions::from_route(&set, &there_and_back);
        assert_eq!(
            directions.legs(),
            &[
                Leg::Stairs {
                    from_floor: 0,
                    to_floor: 1
                },
                Leg::Stairs {
                    from_floor: 1,
                    to_floor: 0
                },
            ]
        );
        assert_eq!(
            directions.sentences()[1],
            "Take the stairs down from floor 2 to floor 1."
        );
    }
}
