// HTTP handler bindings for Battlesnake API endpoints
//
// Thin wrappers that bind Rocket routes to the Bot. Handlers deserialize the request,
// pull the Bot out of Rocket's managed state and hand the parsed game state over.
// The move engine itself never sees HTTP.

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use floodfill_snake::bot::Bot;
use floodfill_snake::types::GameState;

/// GET / endpoint
/// Returns bot metadata and appearance configuration
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
#[post("/start", format = "json", data = "<req>")]
pub fn start(bot: &rocket::State<Bot>, req: Json<GameState>) -> Status {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();
    bot.start(&game, &turn, &board, &you);

    Status::Ok
}

/// POST /move endpoint
/// Called each turn; answers with `{"move": "<direction>"}`
#[post("/move", format = "json", data = "<req>")]
pub async fn get_move(bot: &rocket::State<Bot>, req: Json<GameState>) -> Json<Value> {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();

    Json(bot.get_move(&game, &turn, &board, &you).await)
}

/// POST /end endpoint
#[post("/end", format = "json", data = "<req>")]
pub fn end(bot: &rocket::State<Bot>, req: Json<GameState>) -> Status {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();
    bot.end(&game, &turn, &board, &you);

    Status::Ok
}
