// Move scoring
//
// `local_score` looks one ring past the destination cell. `global_score` flood fills
// outwards from the destination for a number of layers that grows with the turn count.

use std::collections::HashSet;

use crate::config::ScoresConfig;
use crate::engine::EvaluationContext;
use crate::occupancy::CellKind;
use crate::types::{Coord, Direction};

/// One-ply score of moving in `dir`: crowding, head-to-head risk and adjacent food
pub fn local_score(ctx: &EvaluationContext, dir: Direction) -> i32 {
    let scores = &ctx.config.scores;
    let destination = ctx.destination(dir);

    let food_bonus = if ctx.is_hungry() || ctx.turn < ctx.config.heuristics.early_game_turns {
        scores.adjacent_food_bonus * scores.urgent_food_multiplier
    } else {
        scores.adjacent_food_bonus
    };

    let mut score = scores.local_base_score;
    for neighbor in destination.neighbors().iter() {
        match ctx.model.cell(neighbor) {
            Some(CellKind::Head { length }) => score += battle_score(length, ctx.length, scores),
            Some(_) => score -= scores.occupied_penalty,
            None => {
                if ctx.model.is_food(neighbor) && !ctx.claimed_by_larger(neighbor) {
                    score += food_bonus;
                }
            }
        }
    }
    score
}

/// Head-to-head outcome next to a head of `enemy_length`: ties lose too
fn battle_score(enemy_length: usize, own_length: usize, scores: &ScoresConfig) -> i32 {
    if enemy_length >= own_length {
        -scores.losing_battle_penalty
    } else {
        scores.winning_battle_bonus
    }
}

/// Flood fill score of moving in `dir`, at the depth for the current turn
pub fn global_score(ctx: &EvaluationContext, dir: Direction) -> i32 {
    let depth = ctx.config.heuristics.search_depth(ctx.turn);
    flood_score(ctx, ctx.destination(dir), depth)
}

/// Breadth-first walk from `start` over at most `depth` further layers.
///
/// Every visited cell is worth `area_reward`. Food and chaseable tails earn a bonus scaled by
/// `depth - layer + 1`. A cell that a longer enemy can reach within `time_to_avoid_heads`
/// layers is penalized on the same scale and not expanded.
pub fn flood_score(ctx: &EvaluationContext, start: Coord, depth: u32) -> i32 {
    let heuristics = &ctx.config.heuristics;
    let scores = &ctx.config.scores;

    let food_weight = if ctx.is_food_urgent() {
        scores.food_weight * scores.urgent_food_multiplier
    } else {
        scores.food_weight
    };
    let chase_tails =
        ctx.turn >= heuristics.time_to_chase_tails && ctx.length > scores.tail_chase_min_length;

    let mut queue: Vec<(Coord, u32)> = vec![(start, 0)];
    let mut visited: HashSet<Coord> = HashSet::new();
    visited.insert(start);

    let mut score = 0;
    let mut cursor = 0;
    while cursor < queue.len() {
        let (cell, layer) = queue[cursor];
        cursor += 1;

        let weight = (depth - layer + 1) as i32;
        score += scores.area_reward;

        if layer < heuristics.time_to_avoid_heads && ctx.claimed_by_larger(&cell) {
            score -= scores.contested_penalty * weight;
            continue;
        }

        if ctx.model.is_food(&cell) {
            score += food_weight * weight;
        }
        if chase_tails && ctx.model.is_current_tail(&cell) {
            score += scores.tail_chase_bonus * weight;
        }

        if layer >= depth {
            continue;
        }

        for next in cell.neighbors().iter() {
            if visited.contains(next) {
                continue;
            }
            if ctx.model.cell(next).map_or(false, |kind| kind.is_standing_obstacle()) {
                continue;
            }
            visited.insert(*next);
            queue.push((*next, layer + 1));
        }
    }

    score
}
