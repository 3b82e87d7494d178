//! Error types for the auditforge CLI

use thiserror::Error;

/// Result type alias for auditforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// GitHub API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Check your GitHub token (GITHUB_ACCESS_TOKEN).")]
    Unauthorized,

    #[error("Access denied. The token lacks permission for this operation.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to the GitHub API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Job-file and credential errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Job file {0} not found. Create one based on config.json.example.")]
    NotFound(String),

    #[error("Failed to parse job file: {0}")]
    Parse(String),

    #[error("Invalid job file: {0}")]
    Invalid(String),

    #[error("A GitHub token is required. Pass --github-token or set GITHUB_ACCESS_TOKEN.")]
    MissingToken,

    #[error("An organization is required. Pass --organization or set GITHUB_ORGANIZATION.")]
    MissingOrganization,
}

/// Errors from the git subprocess layer
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Launch(String),

    #[error("git {context} failed: {stderr}")]
    Command { context: String, stderr: String },

    #[error("source repository {0} is not reachable: {1}")]
    Unreachable(String, String),

    #[error("could not replace existing directory `{path}`: {reason}")]
    RemoveDir { path: String, reason: String },

    #[error("destination `{0}` contains no files after subtree merge")]
    EmptyMerge(String),

    #[error("working copy error: {0}")]
    Workspace(String),
}
