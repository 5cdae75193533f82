//! Clinic check-in relay.
//!
//! The kiosk posts a check-in here, we check it again with the shared
//! [`intake`] schema and hand it to the intake sheet (an Apps Script web app).
//! The sheet is the system of record, the relay keeps nothing.
//!
//!
//!
//! # Request Flow
//!
//! `POST /checkin` with a JSON body.
//!
//! 1. No `APPS_SCRIPT_URL` configured: 500, nothing leaves the box
//! 2. Body is not JSON: 400
//! 3. Honeypot (`company`) filled: 200 `{"ok": true}`, nothing leaves the box
//! 4. Schema rejects the record: 400 with per-field messages under `details`
//! 5. Forward the record (minus honeypot) to the sheet, one attempt
//! 6. Sheet answers non-2xx: 502 `{"ok": false, "error": "GAS error", "details": "<body>"}`
//! 7. Sheet answers JSON with `"ok": false`: 502 with the parsed body as `details`
//! 8. Anything else from the sheet: 200 with the parsed JSON or raw text as `result`
//!
//! Network failures reaching the sheet surface as 500 `Unexpected error`.
//!
//!
//!
//! # Configuration
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `APPS_SCRIPT_URL` | none | also read from `/run/secrets/APPS_SCRIPT_URL` |
//! | `RUST_PORT` | `1111` | |
//! | `RUST_LOG` | | tracing filter |
//!
//!
//!
//! # Commands
//!
//! Run locally.
//! ```sh
//! RUST_LOG=info APPS_SCRIPT_URL=https://script.google.com/macros/s/.../exec cargo run -p checkin
//! ```
//!
//! Try it.
//! ```sh
//! curl -X POST localhost:1111/checkin \
//!   -H 'Content-Type: application/json' \
//!   -d '{"kind":"new","name":"Jo Smith","phone":"555-123-4567","reason":"scheduled"}'
//! ```
use std::{io, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    routing::post,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod upstream;
pub mod utils;

use routes::checkin_handler;
use state::State;

pub async fn start_server() -> io::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new();

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/checkin", post(checkin_handler))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
