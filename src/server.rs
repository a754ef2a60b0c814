//! Server initialization for the stdio (MCP) and HTTP (JSON API + MCP) transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire the database
//! into the MCP tool handler and the axum router.

use anyhow::Result;
use flashdeck::api::{self, AppState};
use flashdeck::config::FlashdeckConfig;
use flashdeck::db;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

use crate::tools::StudyTools;

/// Shared setup: open DB and wrap it with the config for sharing.
fn setup_shared_state(
    config: FlashdeckConfig,
) -> Result<(Arc<Mutex<rusqlite::Connection>>, Arc<FlashdeckConfig>)> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;

    let report = db::check_database_health(&conn)?;
    if !report.integrity_ok {
        tracing::warn!(details = %report.integrity_details, "database integrity check failed; run `flashdeck doctor`");
    }
    if report.orphan_cards > 0 {
        tracing::warn!(count = report.orphan_cards, "cards without a schedule will never come due");
    }
    tracing::info!(
        db = %db_path.display(),
        decks = report.deck_count,
        cards = report.card_count,
        "database ready"
    );

    Ok((Arc::new(Mutex::new(conn)), Arc::new(config)))
}

/// Dispatch on `server.transport`.
pub async fn serve(config: FlashdeckConfig) -> Result<()> {
    match config.server.transport.as_str() {
        "http" => serve_http(config).await,
        _ => serve_stdio(config).await,
    }
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: FlashdeckConfig) -> Result<()> {
    tracing::info!("starting flashdeck MCP server on stdio");

    let (db, config) = setup_shared_state(config)?;

    let tools = StudyTools::new(db, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the JSON API with the MCP service mounted at `/mcp` (Streamable HTTP).
pub async fn serve_http(config: FlashdeckConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(addr = %bind_addr, "starting flashdeck HTTP server");

    let (db, config) = setup_shared_state(config)?;

    let mcp_db = Arc::clone(&db);
    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(StudyTools::new(mcp_db.clone(), config.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = api::router(AppState::new(db)).nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening: API at http://{bind_addr}/api, MCP at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
