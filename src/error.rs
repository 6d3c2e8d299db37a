use thiserror::Error;

pub type Result<T> = std::result::Result<T, GhstatError>;

#[derive(Error, Debug)]
pub enum GhstatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Too many requests in a short amount of time ({context}); hit the anti-abuse limit")]
    RateLimited { context: String },
    #[error("Request failed with status {status} ({context})")]
    Api { status: u16, context: String },
    #[error("GraphQL error ({context}): {message}")]
    GraphQl { context: String, message: String },
    #[error(
        "Cache record {index} does not belong to repository {repository}; refusing to attribute LOC"
    )]
    IdentityAlignment { index: usize, repository: String },
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Template error: {0}")]
    Template(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl GhstatError {
    /// Errors coming back from the remote API, as opposed to local faults.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            GhstatError::Http(_)
                | GhstatError::RateLimited { .. }
                | GhstatError::Api { .. }
                | GhstatError::GraphQl { .. }
        )
    }
}
