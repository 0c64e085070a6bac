// Move evaluation engine
//
// Builds an EvaluationContext once per turn, filters out moves into blocked cells, scores the
// rest with the local and global heuristics and picks the best. Nothing here outlives the call.

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use crate::config::Config;
use crate::heuristics::{global_score, local_score};
use crate::occupancy::OccupancyModel;
use crate::types::{Battlesnake, Board, Coord, Direction};

/// Everything the heuristics need for one turn
pub struct EvaluationContext<'a> {
    pub model: OccupancyModel,
    pub head: Coord,
    pub length: usize,
    pub health: i32,
    pub turn: i32,
    pub config: &'a Config,
}

impl<'a> EvaluationContext<'a> {
    /// Returns `None` when `you` has no body to move
    pub fn new(board: &Board, you: &Battlesnake, turn: i32, config: &'a Config) -> Option<Self> {
        let head = *you.body.first()?;
        Some(EvaluationContext {
            model: OccupancyModel::build(board, you),
            head,
            length: you.body.len(),
            health: you.health,
            turn,
            config,
        })
    }

    pub fn destination(&self, dir: Direction) -> Coord {
        dir.apply(&self.head, self.config.board.orientation)
    }

    pub fn is_hungry(&self) -> bool {
        self.health < self.config.heuristics.health_threshold
    }

    /// Hungry, or still short enough that growing is worth it
    pub fn is_food_urgent(&self) -> bool {
        self.is_hungry() || self.length < self.config.heuristics.size_to_diet
    }

    /// Whether a strictly longer enemy could move onto `coord` next turn
    pub fn claimed_by_larger(&self, coord: &Coord) -> bool {
        self.model
            .enemy_reach(coord)
            .map_or(false, |length| length > self.length)
    }
}

/// Score breakdown for one candidate move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveScore {
    pub direction: Direction,
    pub local: i32,
    pub global: i32,
}

impl MoveScore {
    pub fn total(&self) -> i32 {
        self.local + self.global
    }
}

impl fmt::Display for MoveScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={} (local {}, global {})",
            self.direction.as_str(),
            self.total(),
            self.local,
            self.global
        )
    }
}

/// The chosen move plus every legal candidate, best first
#[derive(Debug, Clone)]
pub struct Decision {
    pub direction: Direction,
    pub rankings: Vec<MoveScore>,
}

impl Decision {
    fn fallback() -> Self {
        Decision {
            direction: Direction::fallback(),
            rankings: Vec::new(),
        }
    }

    pub fn best_score(&self) -> Option<i32> {
        self.rankings.first().map(MoveScore::total)
    }
}

/// Keeps the moves whose destination is free this turn, in the order given
pub fn legal_moves(ctx: &EvaluationContext, candidates: &[Direction]) -> Vec<Direction> {
    candidates
        .iter()
        .copied()
        .filter(|&dir| !ctx.model.is_blocked(&ctx.destination(dir)))
        .collect()
}

/// Scores every legal move. Candidates are shuffled first so equal totals
/// keep a random order through the stable sort.
pub fn rank_moves<R: Rng + ?Sized>(ctx: &EvaluationContext, rng: &mut R) -> Vec<MoveScore> {
    let mut order = Direction::all();
    order.shuffle(rng);

    let mut rankings: Vec<MoveScore> = legal_moves(ctx, &order)
        .into_iter()
        .map(|direction| MoveScore {
            direction,
            local: local_score(ctx, direction),
            global: global_score(ctx, direction),
        })
        .collect();

    rankings.sort_by(|a, b| b.total().cmp(&a.total()));
    rankings
}

/// Picks a move for `you` on `board`. Never fails: with nothing legal the fallback move is returned.
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    you: &Battlesnake,
    turn: i32,
    config: &Config,
    rng: &mut R,
) -> Decision {
    let ctx = match EvaluationContext::new(board, you, turn, config) {
        Some(ctx) => ctx,
        None => {
            warn!("Turn {}: snake {} has no body, falling back", turn, you.id);
            return Decision::fallback();
        }
    };

    let rankings = rank_moves(&ctx, rng);
    let direction = match rankings.first() {
        Some(best) => best.direction,
        None => {
            warn!(
                "Turn {}: no legal moves available, falling back to {}",
                turn,
                Direction::fallback().as_str()
            );
            return Decision::fallback();
        }
    };

    info!(
        "Turn {}: move rankings [{}]",
        turn,
        rankings
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Decision {
        direction,
        rankings,
    }
}
