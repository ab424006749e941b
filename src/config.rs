use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::{analysis, genius};

/// Lyrics search, scraping and emotional analysis server.
///
/// Every option can also be set through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "lyrics-insight")]
#[command(version)]
pub struct Config {
    #[arg(long, default_value = "127.0.0.1", env = "HOST")]
    pub host: IpAddr,

    #[arg(short, long, default_value_t = 3000, env = "PORT")]
    pub port: u16,

    /// Genius API bearer token
    #[arg(long, env = "GENIUS_API_KEY", hide_env_values = true)]
    pub genius_api_key: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, default_value = genius::DEFAULT_API_URL, env = "GENIUS_API_URL")]
    pub genius_api_url: String,

    #[arg(long, default_value = analysis::DEFAULT_API_URL, env = "GEMINI_API_URL")]
    pub gemini_api_url: String,

    #[arg(long, default_value = analysis::DEFAULT_MODEL, env = "GEMINI_MODEL")]
    pub gemini_model: String,

    /// Timeout applied to every outbound request, in seconds
    #[arg(long, default_value_t = 15, env = "HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: u64,

    /// Lyrics are cut to this many characters before analysis
    #[arg(long, default_value_t = analysis::DEFAULT_MAX_CHARS, env = "ANALYSIS_MAX_CHARS")]
    pub analysis_max_chars: usize,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
