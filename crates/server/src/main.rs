//! Dynasty-Scout — league analysis server for the dynasty dashboard
//!
//! Usage:
//!   dynasty-scout serve --port 3001          — Launch the JSON API server
//!   dynasty-scout report --top 25            — One-shot terminal report

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use engine::{ScoutService, SleeperClient};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

const APP_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH"));

/// Demo league used when neither --league nor SLEEPER_LEAGUE_ID is set
const DEFAULT_LEAGUE_ID: &str = "992096661296837632";

#[derive(Parser)]
#[command(name = "dynasty-scout")]
#[command(about = "Dynasty league valuation and trade analysis", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Sleeper league id (falls back to SLEEPER_LEAGUE_ID, then the demo league)
    #[arg(long, global = true)]
    league: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the JSON API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value_t = 3001)]
        port: u16,
    },
    /// Print a one-shot league report to the terminal
    Report {
        /// Number of top-valued players to show
        #[arg(long, default_value_t = 25)]
        top: usize,
    },
}

#[derive(Clone)]
struct AppState {
    service: Arc<ScoutService<SleeperClient>>,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug,engine=debug,dynasty_scout=debug")
    } else {
        EnvFilter::new("info,engine=info,dynasty_scout=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(filter)
        .init();
}

fn resolve_league_id(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("SLEEPER_LEAGUE_ID").ok())
        .unwrap_or_else(|| DEFAULT_LEAGUE_ID.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    dotenvy::dotenv().ok();

    let league_id = resolve_league_id(cli.league);

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(&host, port, league_id).await?;
        }
        Commands::Report { top } => {
            cmd_report(league_id, top).await?;
        }
    }

    Ok(())
}

// ============================================================================
// Serve command — Axum JSON API
// ============================================================================

async fn cmd_serve(host: &str, port: u16, league_id: String) -> anyhow::Result<()> {
    info!("Dynasty-Scout v{} starting...", APP_VERSION);
    info!("League: {}", league_id);

    let state = AppState {
        service: Arc::new(ScoutService::with_system_clock(SleeperClient::new(
            league_id,
        ))),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Front-end bundle location: next to the binary, else ./dist
    let exe_path = std::env::current_exe().unwrap_or_default();
    let exe_dir = exe_path.parent().unwrap_or(std::path::Path::new("."));
    let dist_dir = exe_dir.join("dist");
    let static_dir = if dist_dir.exists() {
        dist_dir
    } else {
        std::path::PathBuf::from("dist")
    };

    let api_routes = Router::new()
        .route("/health", get(api_health))
        .route("/league", get(api_league))
        .route("/teams", get(api_teams))
        .route("/values", get(api_values))
        .route("/trade/analyze", post(api_trade_analyze))
        .route("/network", get(api_network))
        .route("/trades", get(api_trades))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&static_dir))
        .layer(cors);

    let addr: std::net::SocketAddr = format!("{}:{}", host, port).parse()?;
    println!("\n=== Dynasty-Scout v{} ===", APP_VERSION);
    println!("Listening on http://{}", addr);
    println!("\nEndpoints:");
    println!("  GET  /api/health         - Health check");
    println!("  GET  /api/league         - League metadata");
    println!("  GET  /api/teams          - Standings");
    println!("  GET  /api/values         - Ranked dynasty values (?position=&limit=)");
    println!("  POST /api/trade/analyze  - Trade fairness analysis");
    println!("  GET  /api/network        - Trade relationship network");
    println!("  GET  /api/trades         - League trade history");
    println!("\nPress Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health
async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "dynasty-scout",
        "version": APP_VERSION,
    }))
}

/// GET /api/league — league metadata passthrough
async fn api_league(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.service.league().await {
        Ok(league) => Json(serde_json::json!({
            "success": true,
            "league": league,
        })),
        Err(e) => {
            error!("League fetch failed: {}", e);
            Json(serde_json::json!({
                "success": false,
                "error": format!("Failed to fetch league: {}", e),
            }))
        }
    }
}

/// GET /api/teams — standings
async fn api_teams(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.service.teams().await {
        Ok(teams) => Json(serde_json::json!({
            "success": true,
            "teams": teams,
        })),
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch teams: {}", e),
        })),
    }
}

/// GET /api/values — ranked dynasty values with optional filters
async fn api_values(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let position = params.get("position").map(|p| p.to_uppercase());
    let limit: usize = params
        .get("limit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(100);

    match state.service.player_values().await {
        Ok(values) => {
            let filtered: Vec<_> = values
                .iter()
                .filter(|v| match &position {
                    Some(p) => v.position.label() == p.as_str(),
                    None => true,
                })
                .take(limit)
                .cloned()
                .collect();
            Json(serde_json::json!({
                "success": true,
                "total_pool": values.len(),
                "values": filtered,
            }))
        }
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to compute values: {}", e),
        })),
    }
}

/// Request body for trade analysis: the player ids each side receives,
/// plus optional roster ids for the context-adjusted variant
#[derive(Deserialize)]
struct TradeQuery {
    side_a: Vec<String>,
    side_b: Vec<String>,
    roster_a: Option<u64>,
    roster_b: Option<u64>,
}

/// POST /api/trade/analyze — fairness analysis of a proposed trade
async fn api_trade_analyze(
    State(state): State<AppState>,
    Json(query): Json<TradeQuery>,
) -> Json<serde_json::Value> {
    match state
        .service
        .analyze_trade(&query.side_a, &query.side_b, query.roster_a, query.roster_b)
        .await
    {
        Ok(analysis) => Json(serde_json::json!({
            "success": true,
            "analysis": analysis,
        })),
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Trade analysis failed: {}", e),
        })),
    }
}

/// GET /api/network — trade relationship network
async fn api_network(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.service.network().await {
        Ok(summary) => Json(serde_json::json!({
            "success": true,
            "network": summary,
        })),
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to score network: {}", e),
        })),
    }
}

/// GET /api/trades — trade history (sample data when the league has none)
async fn api_trades(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.service.trades_view().await {
        Ok(view) => Json(serde_json::json!({
            "success": true,
            "sample": view.sample,
            "note": view.note,
            "trades": view.trades,
        })),
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch trades: {}", e),
        })),
    }
}

// ============================================================================
// Report command — one-shot terminal report
// ============================================================================

async fn cmd_report(league_id: String, top: usize) -> anyhow::Result<()> {
    println!("\n=== Dynasty-Scout v{} ===", APP_VERSION);

    let service = ScoutService::with_system_clock(SleeperClient::new(league_id.clone()));

    let league = service.league().await?;
    println!(
        "League: {} ({} season, {})",
        league.name.as_deref().unwrap_or("?"),
        league.season.as_deref().unwrap_or("?"),
        league.status.as_deref().unwrap_or("?"),
    );

    // Top dynasty values
    let values = service.player_values().await?;
    println!("\nTop {} Dynasty Values:", top.min(values.len()));
    println!(
        "  {:>4}  {:<26} {:>3} {:>4} {:>6} {:>7}",
        "#", "Player", "Pos", "Team", "Value", "Trend"
    );
    println!("  {}", "-".repeat(58));
    for v in values.iter().take(top) {
        println!(
            "  {:>4}  {:<26} {:>3} {:>4} {:>6} {:>7}",
            v.dynasty_rank,
            v.name,
            v.position.label(),
            v.team,
            v.value,
            format!("{:?}", v.trend).to_lowercase(),
        );
    }

    // Standings
    let teams = service.teams().await?;
    if teams.is_empty() {
        println!("\nNo rosters yet (pre-draft league).");
    } else {
        println!("\nStandings:");
        println!(
            "  {:>2}  {:<28} {:>6} {:>9} {:>9}",
            "#", "Team", "W-L-T", "PF", "PA"
        );
        println!("  {}", "-".repeat(60));
        for t in &teams {
            println!(
                "  {:>2}  {:<28} {:>6} {:>9.2} {:>9.2}",
                t.standing,
                t.team_name,
                format!("{}-{}-{}", t.wins, t.losses, t.ties),
                t.points_for,
                t.points_against,
            );
        }
    }

    // Trade network
    let network = service.network().await?;
    if network.total_trades == 0 {
        println!("\nNo trading history yet — all teams neutral and isolated.");
    } else {
        println!("\nTrade Network ({} completed trades):", network.total_trades);
        println!("  Most active traders:");
        for a in &network.top_traders {
            println!("    roster {:>2} — {} trades", a.roster_id, a.trades);
        }
        if !network.isolated_teams.is_empty() {
            let ids: Vec<String> = network
                .isolated_teams
                .iter()
                .map(|id| id.to_string())
                .collect();
            println!("  Isolated teams: {}", ids.join(", "));
        }
    }

    Ok(())
}
