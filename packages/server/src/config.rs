//! Command-line and environment configuration.
//!
//! Every option can also come from the environment, and a `.env` file in the
//! working directory is loaded first. Variables already set in the process
//! environment take precedence over the file.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};

/// Transport the server listens with
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    /// Plaintext HTTP / `ws://`
    #[default]
    Http,
    /// TLS with the configured key and certificate / `wss://`
    Https,
}

impl Protocol {
    /// WebSocket scheme matching this protocol
    pub fn websocket_scheme(self) -> &'static str {
        match self {
            Protocol::Http => "ws",
            Protocol::Https => "wss",
        }
    }
}

/// PEM files used to serve TLS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time presence relay for a shared space", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Serve plaintext (`http`) or TLS (`https`)
    #[arg(long, env = "PROTOCOL", value_enum, default_value_t = Protocol::Http)]
    pub protocol: Protocol,

    /// PEM private key, required with `--protocol https`
    #[arg(long, env = "SSL_KEY_PATH", required_if_eq("protocol", "https"))]
    pub ssl_key_path: Option<PathBuf>,

    /// PEM certificate chain, required with `--protocol https`
    #[arg(long, env = "SSL_CERT_PATH", required_if_eq("protocol", "https"))]
    pub ssl_cert_path: Option<PathBuf>,

    /// Environment label shown at startup
    #[arg(long, env = "APP_ENV", default_value = "development")]
    pub environment: String,

    /// Maximum number of simultaneous participants (unbounded when omitted)
    #[arg(long, env = "HIROBA_MAX_PARTICIPANTS")]
    pub max_participants: Option<usize>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// Load `.env` from the working directory (if any), then parse the command line
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    /// Load `env_file` (a missing file is ignored), then parse `args`
    pub fn try_load_from<I, T>(env_file: impl AsRef<Path>, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let _ = dotenvy::from_path(env_file.as_ref());
        Self::try_parse_from(args)
    }

    /// Key and certificate to serve with, when TLS is selected
    pub fn tls_files(&self) -> Option<TlsFiles> {
        match (self.protocol, &self.ssl_cert_path, &self.ssl_key_path) {
            (Protocol::Https, Some(cert), Some(key)) => Some(TlsFiles {
                cert: cert.clone(),
                key: key.clone(),
            }),
            _ => None,
        }
    }

    /// WebSocket URL advertised in the startup banner
    pub fn advertised_url(&self, address: &str, port: u16) -> String {
        format!(
            "{}://{}:{}",
            self.protocol.websocket_scheme(),
            address,
            port
        )
    }
}
