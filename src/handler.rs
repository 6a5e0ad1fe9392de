// HTTP handler bindings for the host adapter
//
// Thin wrappers that bind Rocket routes to the Bot. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting the Bot and DebugLogger from Rocket's managed state
// - Delegating to Bot methods
// - Serializing responses

use log::warn;
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use snake_pathfinder::bot::Bot;
use snake_pathfinder::debug_logger::DebugLogger;
use snake_pathfinder::types::BoardSnapshot;

/// Body of POST /move
#[derive(Deserialize, Debug)]
pub struct MoveRequest {
    #[serde(default)]
    pub turn: i32,
    pub timeout_ms: Option<u64>,
    pub board: BoardSnapshot,
}

/// GET / endpoint
/// Returns agent metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    logger: &rocket::State<DebugLogger>,
    move_req: Json<MoveRequest>,
) -> Json<Value> {
    let req = move_req.into_inner();

    if let Err(e) = req.board.validate() {
        warn!("Turn {}: rejecting malformed board ({}), keeping heading", req.turn, e);
        return Json(json!({
            "move": req.board.heading.as_str(),
            "stage": "invalid_board",
        }));
    }

    let budget = Duration::from_millis(
        req.timeout_ms
            .unwrap_or(bot.config().timing.default_budget_ms),
    );
    let decision = bot.get_move(req.turn, req.board.clone(), budget).await;
    logger.log_decision(req.turn, req.board, &decision);

    Json(json!({
        "move": decision.direction.as_str(),
        "stage": decision.stage.as_str(),
    }))
}
