use std::path::PathBuf;
use std::time::Duration;

use mga_core::defaults::{AnalyzerDefaults, EmptyInputPolicy};

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
    /// Analyzer defaults and limits.
    pub analyzer: AnalyzerDefaults,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                    |
    /// |--------------------------|--------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                  |
    /// | `PORT`                   | `3000`                                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`                    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                       |
    /// | `PROJECT_ROOT`           | current directory                          |
    /// | `ANALYZER_BINARY`        | `./cmake-build-debug/markov_graph_analyzer`|
    /// | `ANALYZER_DEFAULT_INPUT` | `<root>/data/exemple_valid_step3.txt`      |
    /// | `ANALYZER_TIMEOUT_SECS`  | `20`                                       |
    /// | `ANALYZER_EMPTY_INPUT`   | `fallback`                                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let analyzer = analyzer_from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            analyzer,
        }
    }
}

/// Build [`AnalyzerDefaults`] from `PROJECT_ROOT` and the `ANALYZER_*` vars.
fn analyzer_from_env() -> AnalyzerDefaults {
    let project_root = match std::env::var("PROJECT_ROOT") {
        Ok(root) => PathBuf::from(root),
        Err(_) => std::env::current_dir().expect("current directory must be accessible"),
    };

    let mut analyzer = AnalyzerDefaults::for_root(project_root);

    if let Ok(binary) = std::env::var("ANALYZER_BINARY") {
        analyzer.binary = binary;
    }

    if let Ok(infile) = std::env::var("ANALYZER_DEFAULT_INPUT") {
        analyzer.infile = infile;
    }

    if let Ok(secs) = std::env::var("ANALYZER_TIMEOUT_SECS") {
        let secs: u64 = secs
            .parse()
            .expect("ANALYZER_TIMEOUT_SECS must be a valid u64");
        analyzer.timeout = Duration::from_secs(secs);
    }

    if let Ok(policy) = std::env::var("ANALYZER_EMPTY_INPUT") {
        analyzer.empty_input = EmptyInputPolicy::parse(&policy)
            .unwrap_or_else(|e| panic!("ANALYZER_EMPTY_INPUT: {e}"));
    }

    analyzer
}
