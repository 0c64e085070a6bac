// Library exports for the flood fill Battlesnake
// This allows the replay tool and the integration tests to use the core engine

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod engine;
pub mod heuristics;
pub mod occupancy;
pub mod replay;
pub mod types;
