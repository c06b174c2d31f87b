use floornav_logic::config::AStarSettings;
use floornav_logic::document::PlanDocument;
use floornav_logic::edit::EditCommand;
use floornav_logic::floor::count_components;
use floornav_logic::floor_set::{FloorSet, NavNode};
use floornav_logic::grid::{Cell, ConnectorKind, GridSize, WallKey};
use floornav_logic::pathfinding::{PathOutcome, PathPlanner};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use std::collections::{HashMap, VecDeque};

const N: usize = 5;
const FLOORS: usize = 3;

fn arb_cell() -> impl Strategy<Value = Cell> {
    (0..N, 0..N).prop_map(|(row, col)| Cell::new(row, col))
}

fn arb_node() -> impl Strategy<Value = NavNode> {
    (0..FLOORS, arb_cell()).prop_map(|(floor, cell)| NavNode { floor, cell })
}

fn arb_room() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "B", "C"]).prop_map(str::to_string)
}

fn arb_wall() -> impl Strategy<Value = WallKey> {
    prop_oneof![
        (0..N - 1, 0..N).prop_map(|(r, c)| WallKey::horizontal(r, c)),
        (0..N, 0..N - 1).prop_map(|(r, c)| WallKey::vertical(r, c)),
    ]
}

/// Edits that only touch room membership (no manual wall toggles).
fn arb_room_edit() -> impl Strategy<Value = EditCommand> {
    prop_oneof![
        6 => (0..FLOORS, arb_room(), arb_cell())
            .prop_map(|(floor, room, cell)| EditCommand::Paint { floor, room, cell }),
        1 => (0..FLOORS, arb_cell()).prop_map(|(floor, cell)| EditCommand::Erase { floor, cell }),
        1 => (0..FLOORS, arb_room()).prop_map(|(floor, room)| EditCommand::DeleteRoom { floor, room }),
    ]
}

fn arb_edit() -> impl Strategy<Value = EditCommand> {
    prop_oneof![
        3 => arb_room_edit(),
        3 => (0..FLOORS, arb_wall()).prop_map(|(floor, wall)| EditCommand::ToggleWall { floor, wall }),
        1 => (
            0..FLOORS,
            arb_cell(),
            prop_oneof![Just(ConnectorKind::Stair), Just(ConnectorKind::Elevator)],
        )
            .prop_map(|(floor, cell, kind)| EditCommand::ToggleConnector { floor, cell, kind }),
    ]
}

/// Apply every command, checking that rejected ones change nothing.
fn build(commands: Vec<EditCommand>) -> Result<FloorSet, TestCaseError> {
    let mut set = FloorSet::with_floors(GridSize::square(N), FLOORS);
    for command in commands {
        let before = set.clone();
        if set.apply(command).is_err() {
            prop_assert_eq!(&set, &before);
        }
    }
    Ok(set)
}

fn bfs_steps(set: &FloorSet, start: NavNode, goal: NavNode) -> Option<usize> {
    let mut dist: HashMap<NavNode, usize> = HashMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let d = dist[&current];
        if current == goal {
            return Some(d);
        }
        for next in set.neighbors(current) {
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        // Do not write `.proptest-regressions` files into the repo.
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_rooms_stay_connected_and_exclusive(commands in prop::collection::vec(arb_edit(), 0..40)) {
        let set = build(commands)?;
        for floor in set.floors() {
            let mut owned = 0;
            for (name, room) in floor.rooms() {
                prop_assert!(!room.is_empty());
                prop_assert_eq!(count_components(room.cells()), 1);
                for &cell in room.cells() {
                    prop_assert_eq!(floor.room_at(cell), Some(name));
                }
                owned += room.len();
            }
            let distinct = (0..N)
                .flat_map(|r| (0..N).map(move |c| Cell::new(r, c)))
                .filter(|&c| floor.room_at(c).is_some())
                .count();
            prop_assert_eq!(owned, distinct);
        }
    }

    #[test]
    fn prop_room_edits_keep_rooms_enclosed(commands in prop::collection::vec(arb_room_edit(), 0..40)) {
        let set = build(commands)?;
        for floor in set.floors() {
            for (name, room) in floor.rooms() {
                for &cell in room.cells() {
                    for (_, n) in cell.neighbors(set.size()) {
                        let inside = floor.room_at(n) == Some(name);
                        prop_assert_eq!(floor.wall_between(cell, n), !inside);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_astar_matches_bfs(
        commands in prop::collection::vec(arb_edit(), 0..60),
        start in arb_node(),
        goal in arb_node(),
    ) {
        let set = build(commands)?;
        let result = PathPlanner::new(&set, AStarSettings::default())
            .find_path(start, goal)
            .unwrap();
        match (bfs_steps(&set, start, goal), &result.outcome) {
            (Some(expected), PathOutcome::Found(route)) => {
                prop_assert_eq!(route.steps(), expected);
                prop_assert_eq!(route.start(), start);
                prop_assert_eq!(route.goal(), goal);
                for pair in route.nodes().windows(2) {
                    prop_assert!(set.neighbors(pair[0]).contains(&pair[1]));
                }
            }
            (None, PathOutcome::NoPath) => {}
            (expected, outcome) => {
                prop_assert!(false, "bfs {:?} but astar {:?}", expected, outcome);
            }
        }
    }

    #[test]
    fn prop_search_is_deterministic(
        commands in prop::collection::vec(arb_edit(), 0..40),
        start in arb_node(),
        goal in arb_node(),
    ) {
        let set = build(commands)?;
        let planner = PathPlanner::new(&set, AStarSettings::default());
        prop_assert_eq!(planner.find_path(start, goal).unwrap(), planner.find_path(start, goal).unwrap());
    }

    #[test]
    fn prop_document_round_trip(commands in prop::collection::vec(arb_edit(), 0..40)) {
        let set = build(commands)?;
        let json = PlanDocument::from_floor_set(&set).to_json_string().unwrap();
        let loaded = PlanDocument::from_json_str(&json).unwrap().to_floor_set().unwrap();
        prop_assert_eq!(loaded, set);
    }
}
