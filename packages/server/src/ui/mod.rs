//! UI 層
//!
//! WebSocket / HTTP のエンドポイントと、接続ごとのライフサイクル制御を提供します。

mod handler;
pub mod lifecycle;
mod server;
mod signal;
pub mod state;

pub use lifecycle::{ConnectionLifecycle, ConnectionPhase, LifecycleError};
pub use server::{BoundServer, Server, ServerError};
pub use signal::shutdown_signal;
