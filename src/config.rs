use std::net::SocketAddr;

use clap::Parser;

use crate::database::EngineOptions;

#[derive(Debug, Clone, Parser)]
#[command(name = "fasterapi", about = "Serve the fasterapi application")]
pub struct Config {
    /// SQLite connection URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://fasterapi.db")]
    pub database_url: String,

    /// Address to listen on
    #[arg(long, env = "FASTERAPI_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,

    /// Log every SQL statement
    #[arg(long, env = "FASTERAPI_ECHO")]
    pub echo: bool,
}

impl Config {
    pub fn engine_options(&self) -> EngineOptions {
        let mut options = EngineOptions::for_url(&self.database_url).echo(self.echo);
        if !options.static_pool {
            options.max_connections = self.max_connections;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_arguments() {
        let config = Config::try_parse_from([
            "fasterapi",
            "--database-url",
            "sqlite://app.db",
            "--addr",
            "0.0.0.0:9000",
            "--max-connections",
            "8",
            "--echo",
        ])
        .expect("Failed to parse arguments");

        assert_eq!(config.database_url, "sqlite://app.db");
        assert_eq!(config.addr.port(), 9000);

        let options = config.engine_options();
        assert_eq!(options.max_connections, 8);
        assert!(options.echo);
        assert!(!options.static_pool);
    }

    #[test]
    fn test_in_memory_url_ignores_pool_size() {
        let config = Config::try_parse_from([
            "fasterapi",
            "--database-url",
            "sqlite::memory:",
            "--max-connections",
            "8",
        ])
        .expect("Failed to parse arguments");

        let options = config.engine_options();
        assert!(options.static_pool);
        assert_eq!(options.max_connections, 1);
    }
}
