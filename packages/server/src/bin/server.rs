//! Presence relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 127.0.0.1 --port 3000 --max-participants 32
//! cargo run --bin hiroba-server -- --protocol https --ssl-key-path key.pem --ssl-cert-path cert.pem
//! ```

use hiroba_server::{
    app::build_app_state,
    config::ServerConfig,
    domain::{Room, RoomId, Timestamp},
    ui::Server,
};
use hiroba_shared::{logger::setup_logger, time::now_millis};

#[tokio::main]
async fn main() {
    let config = ServerConfig::load();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    let room = match config.max_participants {
        Some(capacity) => {
            Room::with_capacity(RoomId::main(), Timestamp::new(now_millis()), capacity)
        }
        None => Room::new(RoomId::main(), Timestamp::new(now_millis())),
    };
    tracing::info!("Room {} created!", room.id);

    let bound = match Server::new(build_app_state(room)).bind(&config).await {
        Ok(bound) => bound,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let address = local_ip_address::local_ip().map_or_else(
        |e| {
            tracing::warn!("Failed to get local ip address: {e:?}");
            "localhost".to_string()
        },
        |ip| ip.to_string(),
    );
    tracing::info!(
        "WebSocket server running on {} (bound to {})",
        config.advertised_url(&address, bound.local_addr().port()),
        bound.local_addr()
    );
    tracing::info!("Environment: {}", config.environment);

    if let Err(e) = bound.serve().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
