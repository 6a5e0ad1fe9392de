// Library exports for the snake move-selection engine
// This allows the replay tool, the server binary and the tests to share the core logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod pathfinder;
pub mod reachability;
pub mod replay;
pub mod simple_profiler;
pub mod target;
pub mod types;
