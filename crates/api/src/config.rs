/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL URL. `None` selects the in-memory backend.
    pub database_url: Option<String>,
    /// Broadcast buffer size for the event bus (default: `1024`).
    pub event_bus_capacity: usize,
    /// Endpoints that receive every registry event via HTTP POST.
    pub webhook_urls: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory backend)  |
    /// | `EVENT_BUS_CAPACITY`   | `1024`                     |
    /// | `WEBHOOK_URLS`         | empty                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let event_bus_capacity: usize = std::env::var("EVENT_BUS_CAPACITY")
            .unwrap_or_else(|_| paycode_events::bus::DEFAULT_CAPACITY.to_string())
            .parse()
            .expect("EVENT_BUS_CAPACITY must be a valid usize");

        let webhook_urls = split_list(&std::env::var("WEBHOOK_URLS").unwrap_or_default());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            event_bus_capacity,
            webhook_urls,
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_skips_empty_entries() {
        assert_eq!(
            split_list(" http://a.test , ,http://b.test,"),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(split_list("").is_empty());
    }
}
