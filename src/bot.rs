// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// Each turn is scored from scratch: an occupancy model of the board, a one-ring local check
// around every candidate destination and a flood fill whose depth grows with the turn count.
// For more info see docs.battlesnake.com

use log::info;
use rand::Rng;
use serde_json::{json, Value};
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::engine::{self, Decision};
use crate::types::{Battlesnake, Board, Game};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            debug_logger: DebugLogger::disabled(),
        }
    }

    /// Attaches a logger that records every move to JSONL
    pub fn with_debug_logger(mut self, debug_logger: DebugLogger) -> Self {
        self.debug_logger = debug_logger;
        self
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "floodfill-snake",
            "color": "#0F52BA",
            "head": "bwc-snowman",
            "tail": "bwc-bonhomme",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, board: &Board, _you: &Battlesnake) {
        info!(
            "GAME START {} ({}x{}, {} snakes)",
            game.id,
            board.width,
            board.height,
            board.snakes.len()
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// # Arguments
    /// * `_game` - Current game metadata
    /// * `turn` - Current turn number
    /// * `board` - Current board state
    /// * `you` - Your snake's current state
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Value {
        let start_time = Instant::now();

        let decision = {
            let mut rng = rand::rng();
            self.decide(*turn, board, you, &mut rng)
        };

        info!(
            "Turn {}: Chose {} (score: {:?}, time: {}us)",
            turn,
            decision.direction.as_str(),
            decision.best_score(),
            start_time.elapsed().as_micros()
        );

        self.debug_logger
            .log_move(*turn, you.id.clone(), board.clone(), decision.direction);

        json!({ "move": decision.direction.as_str() })
    }

    /// Synchronous decision with a caller-supplied random source
    pub fn decide<R: Rng + ?Sized>(
        &self,
        turn: i32,
        board: &Board,
        you: &Battlesnake,
        rng: &mut R,
    ) -> Decision {
        engine::choose_move(board, you, turn, &self.config, rng)
    }
}
