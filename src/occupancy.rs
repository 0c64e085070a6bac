// Occupancy model built fresh from each turn's board
//
// Records which cells are blocked and why, where every head sits and how long its snake is,
// which cells a hostile head could step into next turn, plus food and chaseable tails.

use std::collections::{HashMap, HashSet};

use crate::types::{Battlesnake, Board, Coord};

/// Why a cell is blocked this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Wall,
    Body,
    /// Second-to-last segment. Stays put next turn if the snake just ate.
    FutureTail,
    Head { length: usize },
}

impl CellKind {
    /// Obstacles the flood fill never expands through.
    /// A `FutureTail` only blocks the immediate move.
    pub fn is_standing_obstacle(&self) -> bool {
        !matches!(self, CellKind::FutureTail)
    }
}

#[derive(Debug, Clone)]
pub struct OccupancyModel {
    width: i32,
    height: i32,
    cells: HashMap<Coord, CellKind>,
    enemy_reach: HashMap<Coord, usize>,
    food: HashSet<Coord>,
    tails: HashSet<Coord>,
}

impl OccupancyModel {
    /// Builds the model for `board` as seen by the snake with id `you.id`.
    ///
    /// Snakes with no body are ignored, as are other snakes with no health. `you` is always
    /// marked, even at zero health or when missing from `board.snakes`.
    pub fn build(board: &Board, you: &Battlesnake) -> Self {
        let mut model = OccupancyModel {
            width: board.width,
            height: board.height,
            cells: HashMap::new(),
            enemy_reach: HashMap::new(),
            food: board.food.iter().copied().collect(),
            tails: HashSet::new(),
        };

        model.mark_walls();

        let you_listed = board.snakes.iter().any(|s| s.id == you.id);
        let extra = if you_listed { None } else { Some(you) };

        for snake in board.snakes.iter().chain(extra) {
            if snake.body.is_empty() || (snake.id != you.id && snake.health <= 0) {
                continue;
            }
            model.mark_snake(snake);
            if snake.id != you.id {
                model.mark_enemy_reach(snake);
            }
        }

        model
    }

    fn mark_walls(&mut self) {
        for x in 0..self.width {
            self.cells.insert(Coord::new(x, -1), CellKind::Wall);
            self.cells.insert(Coord::new(x, self.height), CellKind::Wall);
        }
        for y in 0..self.height {
            self.cells.insert(Coord::new(-1, y), CellKind::Wall);
            self.cells.insert(Coord::new(self.width, y), CellKind::Wall);
        }
    }

    /// Writes segments tail-first so a stacked head keeps its head tag.
    fn mark_snake(&mut self, snake: &Battlesnake) {
        let body = &snake.body;
        let last = body.len() - 1;

        self.tails.insert(body[last]);

        if last >= 2 {
            self.cells.insert(body[last - 1], CellKind::FutureTail);
            for segment in body[1..last - 1].iter().rev() {
                self.cells.insert(*segment, CellKind::Body);
            }
        }

        self.cells.insert(
            body[0],
            CellKind::Head {
                length: body.len(),
            },
        );
    }

    fn mark_enemy_reach(&mut self, snake: &Battlesnake) {
        let length = snake.body.len();
        for cell in snake.body[0].neighbors().iter() {
            if !self.in_bounds(cell) {
                continue;
            }
            let entry = self.enemy_reach.entry(*cell).or_insert(length);
            *entry = (*entry).max(length);
        }
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    pub fn cell(&self, coord: &Coord) -> Option<CellKind> {
        self.cells.get(coord).copied()
    }

    /// Blocked for this turn's move: walls, bodies, future tails and heads
    pub fn is_blocked(&self, coord: &Coord) -> bool {
        self.cells.contains_key(coord)
    }

    /// Longest hostile snake whose head could move onto `coord` next turn
    pub fn enemy_reach(&self, coord: &Coord) -> Option<usize> {
        self.enemy_reach.get(coord).copied()
    }

    pub fn is_food(&self, coord: &Coord) -> bool {
        self.food.contains(coord)
    }

    /// A tail that will move away next turn. Excludes tails stacked on a future tail.
    pub fn is_current_tail(&self, coord: &Coord) -> bool {
        self.tails.contains(coord) && self.cell(coord) != Some(CellKind::FutureTail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(id: &str, health: i32, body: &[(i32, i32)]) -> Battlesnake {
        let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord::new(x, y)).collect();
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health,
            head: body.first().copied().unwrap_or(Coord::new(0, 0)),
            length: body.len() as i32,
            body,
            latency: "0".to_string(),
            shout: None,
        }
    }

    fn board(snakes: Vec<Battlesnake>, food: &[(i32, i32)]) -> Board {
        Board {
            height: 11,
            width: 11,
            food: food.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
            snakes,
            hazards: vec![],
        }
    }

    #[test]
    fn test_walls_surround_board_only() {
        let you = snake("me", 100, &[(5, 5), (5, 4), (5, 3)]);
        let model = OccupancyModel::build(&board(vec![you.clone()], &[]), &you);

        assert_eq!(model.cell(&Coord::new(-1, 0)), Some(CellKind::Wall));
        assert_eq!(model.cell(&Coord::new(11, 10)), Some(CellKind::Wall));
        assert_eq!(model.cell(&Coord::new(4, -1)), Some(CellKind::Wall));
        assert_eq!(model.cell(&Coord::new(4, 11)), Some(CellKind::Wall));
        assert_eq!(model.cell(&Coord::new(0, 0)), None);
        assert_eq!(model.cell(&Coord::new(10, 10)), None);
    }

    #[test]
    fn test_segments_are_classified() {
        let you = snake("me", 100, &[(5, 5), (5, 4), (5, 3), (5, 2), (5, 1)]);
        let model = OccupancyModel::build(&board(vec![you.clone()], &[]), &you);

        assert_eq!(model.cell(&Coord::new(5, 5)), Some(CellKind::Head { length: 5 }));
        assert_eq!(model.cell(&Coord::new(5, 4)), Some(CellKind::Body));
        assert_eq!(model.cell(&Coord::new(5, 3)), Some(CellKind::Body));
        assert_eq!(model.cell(&Coord::new(5, 2)), Some(CellKind::FutureTail));
        assert_eq!(model.cell(&Coord::new(5, 1)), None);
        assert!(model.is_current_tail(&Coord::new(5, 1)));
    }

    #[test]
    fn test_stacked_start_keeps_head_tag() {
        let you = snake("me", 100, &[(1, 1), (1, 1), (1, 1)]);
        let model = OccupancyModel::build(&board(vec![you.clone()], &[]), &you);

        assert_eq!(model.cell(&Coord::new(1, 1)), Some(CellKind::Head { length: 3 }));
        assert!(model.is_blocked(&Coord::new(1, 1)));
    }

    #[test]
    fn test_tail_on_future_tail_is_not_chaseable() {
        // Just ate: the last two segments share a cell
        let you = snake("me", 100, &[(5, 5), (5, 4), (5, 3), (5, 3)]);
        let model = OccupancyModel::build(&board(vec![you.clone()], &[]), &you);

        assert_eq!(model.cell(&Coord::new(5, 3)), Some(CellKind::FutureTail));
        assert!(!model.is_current_tail(&Coord::new(5, 3)));
    }

    #[test]
    fn test_short_snakes_do_not_panic() {
        let you = snake("me", 100, &[(2, 2)]);
        let pair = snake("pair", 100, &[(8, 8), (8, 7)]);
        let empty = snake("empty", 100, &[]);
        let model = OccupancyModel::build(&board(vec![you.clone(), pair, empty], &[]), &you);

        assert_eq!(model.cell(&Coord::new(2, 2)), Some(CellKind::Head { length: 1 }));
        assert!(model.tails.contains(&Coord::new(2, 2)));
        assert_eq!(model.cell(&Coord::new(8, 8)), Some(CellKind::Head { length: 2 }));
        assert_eq!(model.cell(&Coord::new(8, 7)), None);
        assert!(model.is_current_tail(&Coord::new(8, 7)));
    }

    #[test]
    fn test_enemy_reach_keeps_longest_and_skips_self() {
        let you = snake("me", 100, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        let small = snake("small", 100, &[(5, 5), (4, 5)]);
        let big = snake("big", 100, &[(5, 7), (4, 7), (3, 7), (2, 7)]);
        let model = OccupancyModel::build(&board(vec![you.clone(), small, big], &[]), &you);

        assert_eq!(model.enemy_reach(&Coord::new(5, 6)), Some(4));
        assert_eq!(model.enemy_reach(&Coord::new(5, 4)), Some(2));
        assert_eq!(model.enemy_reach(&Coord::new(1, 0)), None);
    }

    #[test]
    fn test_enemy_reach_stays_on_board() {
        let you = snake("me", 100, &[(5, 5)]);
        let corner = snake("corner", 100, &[(0, 0), (1, 0)]);
        let model = OccupancyModel::build(&board(vec![you.clone(), corner], &[]), &you);

        assert_eq!(model.enemy_reach(&Coord::new(-1, 0)), None);
        assert_eq!(model.enemy_reach(&Coord::new(0, 1)), Some(2));
    }

    #[test]
    fn test_dead_snakes_are_ignored() {
        let you = snake("me", 100, &[(5, 5)]);
        let ghost = snake("ghost", 0, &[(3, 3), (3, 4), (3, 5)]);
        let model = OccupancyModel::build(&board(vec![you.clone(), ghost], &[(1, 1)]), &you);

        assert!(!model.is_blocked(&Coord::new(3, 3)));
        assert!(model.is_food(&Coord::new(1, 1)));
    }

    #[test]
    fn test_self_at_zero_health_is_still_marked() {
        let you = snake("me", 0, &[(5, 5), (5, 4), (5, 3)]);
        let model = OccupancyModel::build(&board(vec![you.clone()], &[]), &you);

        assert_eq!(model.cell(&Coord::new(5, 5)), Some(CellKind::Head { length: 3 }));
        assert_eq!(model.cell(&Coord::new(5, 4)), Some(CellKind::FutureTail));
        assert!(model.is_blocked(&Coord::new(5, 4)));
    }

    #[test]
    fn test_unlisted_self_is_marked() {
        let you = snake("me", 100, &[(5, 5), (5, 4), (5, 3)]);
        let model = OccupancyModel::build(&board(vec![], &[]), &you);

        assert_eq!(model.cell(&Coord::new(5, 4)), Some(CellKind::FutureTail));
        assert_eq!(model.enemy_reach(&Coord::new(5, 6)), None);
    }
}
