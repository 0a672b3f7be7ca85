use axum::{
    Router,
    extract::{Json, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::core::catalog::{
    ACHIEVEMENTS, ASSETS, DEFAULT_BURN_RATE, DEFAULT_FIRM_NAME, MARKET_EVENTS, find_asset,
};
use crate::core::{
    Achievement, AllocationSlice, Asset, Game, GameConfig, GameError, GameState, JsonFileStore,
    Liquidation, LogRecord, MarketEvent, ProgressSnapshot, Purchase, QuarterOutcome, Sale,
    Settings, WhatIfResult, entropy_seed, normalize_quantity, parse_quantity,
};

const MAX_QUARTERS: u32 = 1_000;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "firmsim",
    about = "Quarter-by-quarter investment firm simulator (macro walk, market events, rivals, client trust)"
)]
pub struct Cli {
    #[arg(long, help = "Seed for every random draw; defaults to the wall clock")]
    seed: Option<u64>,
    #[arg(long, default_value_t = 8, help = "Quarters to play before stopping")]
    quarters: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_BURN_RATE,
        help = "Operating cost per quarter, scaled by the difficulty factor"
    )]
    burn_rate: f64,
    #[arg(long, default_value = DEFAULT_FIRM_NAME)]
    firm_name: String,
    #[arg(
        long,
        help = "JSON file holding achievements and high scores between sessions"
    )]
    snapshot_path: Option<PathBuf>,
    #[arg(
        long = "buy",
        value_name = "ASSET[:QTY]",
        help = "Opening purchase, repeatable, e.g. --buy bonds:5"
    )]
    buys: Vec<String>,
    #[arg(long, help = "Print a forecast for the first quarter before playing")]
    what_if: bool,
    #[arg(long, help = "Liquidate the portfolio after the last quarter")]
    sell_all: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct BuyOrder {
    asset_id: &'static str,
    quantity: u32,
}

#[derive(Debug, Clone)]
struct SessionPlan {
    config: GameConfig,
    quarters: u32,
    snapshot_path: Option<PathBuf>,
    buys: Vec<BuyOrder>,
    what_if: bool,
    sell_all: bool,
}

fn parse_buy_order(raw: &str) -> Result<BuyOrder, String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, qty)) => (id.trim(), parse_quantity(qty)),
        None => (raw.trim(), 1),
    };
    let asset = find_asset(id).ok_or_else(|| {
        let known: Vec<_> = ASSETS.iter().map(|a| a.id).collect();
        format!("--buy: unknown asset '{id}' (expected one of {})", known.join(", "))
    })?;
    Ok(BuyOrder {
        asset_id: asset.id,
        quantity,
    })
}

fn build_plan(cli: Cli) -> Result<SessionPlan, String> {
    if cli.quarters == 0 {
        return Err("--quarters must be > 0".to_string());
    }

    if cli.quarters > MAX_QUARTERS {
        return Err(format!("--quarters must be <= {MAX_QUARTERS}"));
    }

    if !cli.burn_rate.is_finite() || cli.burn_rate < 0.0 {
        return Err("--burn-rate must be >= 0".to_string());
    }

    let firm_name = cli.firm_name.trim();
    if firm_name.is_empty() {
        return Err("--firm-name must not be empty".to_string());
    }

    let buys = cli
        .buys
        .iter()
        .map(|raw| parse_buy_order(raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SessionPlan {
        config: GameConfig {
            burn_rate: cli.burn_rate,
            firm_name: firm_name.to_string(),
            seed: cli.seed.unwrap_or_else(entropy_seed),
        },
        quarters: cli.quarters,
        snapshot_path: cli.snapshot_path,
        buys,
        what_if: cli.what_if,
        sell_all: cli.sell_all,
    })
}

fn open_game(plan: &SessionPlan) -> Result<Game, String> {
    let game = Game::from_config(&plan.config);
    match &plan.snapshot_path {
        Some(path) => game
            .with_store(Box::new(JsonFileStore::new(path)))
            .map_err(|e| format!("--snapshot-path {}: {e}", path.display())),
        None => Ok(game),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionSummary<'a> {
    firm_name: &'a str,
    seed: u64,
    state: &'a GameState,
    net_worth: f64,
    allocation: Vec<AllocationSlice>,
    progress: &'a ProgressSnapshot,
    log: &'a [LogRecord],
}

pub fn run_cli(cli: Cli) -> Result<(), String> {
    let plan = build_plan(cli)?;
    let mut game = open_game(&plan)?;
    tracing::info!(
        seed = plan.config.seed,
        firm = %plan.config.firm_name,
        quarters = plan.quarters,
        "session started"
    );

    for order in &plan.buys {
        if let Err(e) = game.buy(order.asset_id, order.quantity) {
            tracing::warn!(asset = order.asset_id, quantity = order.quantity, error = %e, "opening buy skipped");
        }
    }

    if plan.what_if {
        if let Some(forecast) = game.run_what_if() {
            print_json_line(&forecast)?;
        }
    }

    for _ in 0..plan.quarters {
        let outcome = game.advance_quarter();
        print_json_line(&outcome)?;
        if !matches!(outcome, QuarterOutcome::Advanced(_)) {
            break;
        }
    }

    if plan.sell_all {
        game.sell_all();
    }

    let summary = SessionSummary {
        firm_name: &game.settings().firm_name,
        seed: plan.config.seed,
        state: game.state(),
        net_worth: game.net_worth(),
        allocation: game.allocation(),
        progress: game.progress().snapshot(),
        log: game.journal().records(),
    };
    print_json_line(&summary)
}

fn print_json_line<T: Serialize>(value: &T) -> Result<(), String> {
    let line = serde_json::to_string(value).map_err(|e| format!("failed to encode output: {e}"))?;
    println!("{line}");
    Ok(())
}

type SharedGame = Arc<Mutex<Game>>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BuyPayload {
    asset_id: String,
    quantity: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SellPayload {
    asset_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SettingsPayload {
    burn_rate: Option<f64>,
    firm_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateResponse {
    settings: Settings,
    state: GameState,
    net_worth: f64,
    allocation: Vec<AllocationSlice>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogResponse {
    assets: &'static [Asset],
    events: &'static [MarketEvent],
    achievements: &'static [Achievement],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogResponse {
    records: Vec<LogRecord>,
    ticker: Vec<LogRecord>,
}

#[derive(Debug, Serialize)]
struct SellResponse {
    sale: Option<Sale>,
}

#[derive(Debug, Serialize)]
struct SellAllResponse {
    liquidation: Option<Liquidation>,
}

#[derive(Debug, Serialize)]
struct WhatIfResponse {
    forecast: Option<WhatIfResult>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn quantity_from_json(value: Option<&serde_json::Value>) -> u32 {
    match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .map_or(1, normalize_quantity),
        Some(serde_json::Value::String(s)) => parse_quantity(s),
        _ => 1,
    }
}

fn default_cli_for_api() -> Cli {
    Cli {
        seed: None,
        quarters: 1,
        burn_rate: DEFAULT_BURN_RATE,
        firm_name: DEFAULT_FIRM_NAME.to_string(),
        snapshot_path: None,
        buys: Vec::new(),
        what_if: false,
        sell_all: false,
    }
}

pub async fn run_http_server(port: u16, snapshot_path: Option<PathBuf>) -> std::io::Result<()> {
    let mut cli = default_cli_for_api();
    cli.snapshot_path = snapshot_path;
    let plan = build_plan(cli).map_err(std::io::Error::other)?;
    let game = open_game(&plan).map_err(std::io::Error::other)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(Arc::new(Mutex::new(game)));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, seed = plan.config.seed, "firmsim HTTP API listening");

    axum::serve(listener, app).await
}

fn router(game: SharedGame) -> Router {
    Router::new()
        .route("/api/state", get(state_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/log", get(log_handler))
        .route("/api/progress", get(progress_handler))
        .route("/api/buy", post(buy_handler))
        .route("/api/sell", post(sell_handler))
        .route("/api/sell-all", post(sell_all_handler))
        .route("/api/quarter", post(quarter_handler))
        .route("/api/what-if", post(what_if_handler))
        .route("/api/restart", post(restart_handler))
        .route("/api/settings", post(settings_handler))
        .fallback(not_found_handler)
        .with_state(game)
}

fn state_response(game: &Game) -> StateResponse {
    StateResponse {
        settings: game.settings().clone(),
        state: game.state().clone(),
        net_worth: game.net_worth(),
        allocation: game.allocation(),
    }
}

async fn state_handler(State(game): State<SharedGame>) -> Response {
    let game = game.lock().await;
    json_response(StatusCode::OK, state_response(&game))
}

async fn catalog_handler() -> Response {
    json_response(
        StatusCode::OK,
        CatalogResponse {
            assets: &ASSETS,
            events: &MARKET_EVENTS,
            achievements: &ACHIEVEMENTS,
        },
    )
}

async fn log_handler(State(game): State<SharedGame>) -> Response {
    let game = game.lock().await;
    json_response(
        StatusCode::OK,
        LogResponse {
            records: game.journal().records().to_vec(),
            ticker: game.journal().ticker().to_vec(),
        },
    )
}

async fn progress_handler(State(game): State<SharedGame>) -> Response {
    let game = game.lock().await;
    json_response(StatusCode::OK, game.progress().snapshot().clone())
}

async fn buy_handler(State(game): State<SharedGame>, Json(payload): Json<BuyPayload>) -> Response {
    let quantity = quantity_from_json(payload.quantity.as_ref());
    let mut game = game.lock().await;
    match game.buy(&payload.asset_id, quantity) {
        Ok(purchase) => json_response::<Purchase>(StatusCode::OK, purchase),
        Err(err) => game_error_response(&err),
    }
}

async fn sell_handler(State(game): State<SharedGame>, Json(payload): Json<SellPayload>) -> Response {
    let mut game = game.lock().await;
    let sale = game.sell_one(&payload.asset_id);
    json_response(StatusCode::OK, SellResponse { sale })
}

async fn sell_all_handler(State(game): State<SharedGame>) -> Response {
    let mut game = game.lock().await;
    let liquidation = game.sell_all();
    json_response(StatusCode::OK, SellAllResponse { liquidation })
}

async fn quarter_handler(State(game): State<SharedGame>) -> Response {
    let mut game = game.lock().await;
    json_response(StatusCode::OK, game.advance_quarter())
}

async fn what_if_handler(State(game): State<SharedGame>) -> Response {
    let mut game = game.lock().await;
    let forecast = game.run_what_if();
    json_response(StatusCode::OK, WhatIfResponse { forecast })
}

async fn restart_handler(State(game): State<SharedGame>) -> Response {
    let mut game = game.lock().await;
    game.restart();
    json_response(StatusCode::OK, state_response(&game))
}

async fn settings_handler(
    State(game): State<SharedGame>,
    Json(payload): Json<SettingsPayload>,
) -> Response {
    let mut game = game.lock().await;
    if let Some(burn_rate) = payload.burn_rate {
        if let Err(err) = game.set_burn_rate(burn_rate) {
            return game_error_response(&err);
        }
    }
    if let Some(name) = payload.firm_name.as_deref() {
        if let Err(err) = game.set_firm_name(name) {
            return game_error_response(&err);
        }
    }
    json_response(StatusCode::OK, game.settings().clone())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn game_error_status(err: &GameError) -> StatusCode {
    match err {
        GameError::InsufficientCapital { .. } | GameError::Bankrupt => StatusCode::CONFLICT,
        GameError::UnknownAsset(_) => StatusCode::NOT_FOUND,
        GameError::InvalidBurnRate(_) | GameError::EmptyFirmName => StatusCode::BAD_REQUEST,
    }
}

fn game_error_response(err: &GameError) -> Response {
    error_response(game_error_status(err), &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
