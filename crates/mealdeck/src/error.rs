//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use mealdeck_config::ConfigError;
use mealdeck_core::{CoreError, FormErrors};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the food API at {url}")]
    #[diagnostic(
        code(mealdeck::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(mealdeck::not_found),
        help("Run: mealdeck {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(mealdeck::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mealdeck::validation))]
    Validation { field: String, reason: String },

    #[error("Meal form is invalid")]
    #[diagnostic(
        code(mealdeck::invalid_meal),
        help("{details}")
    )]
    InvalidMeal { details: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No food API base URL configured")]
    #[diagnostic(
        code(mealdeck::no_base_url),
        help(
            "Pass --base-url, set MEALDECK_API_BASE_URL, or run:\n\
             mealdeck config set api.base_url https://your-api.example.com\n\
             Config file: {path}"
        )
    )]
    NoBaseUrl { path: String },

    #[error(transparent)]
    #[diagnostic(code(mealdeck::config))]
    Config(Box<figment::Error>),

    #[error(transparent)]
    #[diagnostic(code(mealdeck::settings))]
    Settings(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(mealdeck::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(mealdeck::timeout),
        help("Increase timeout with --timeout or check API responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize config: {0}")]
    #[diagnostic(code(mealdeck::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::InvalidMeal { .. }
            | Self::NoBaseUrl { .. }
            | Self::Settings(ConfigError::Validation { .. } | ConfigError::UnknownKey(_))
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// A 404 for a specific meal.
    pub fn meal_not_found(id: &str) -> Self {
        Self::NotFound {
            resource_type: "meal".into(),
            identifier: id.into(),
            list_command: "meals list".into(),
        }
    }

    pub fn invalid_meal(errors: &FormErrors) -> Self {
        let details = errors
            .errors()
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("\n");
        Self::InvalidMeal { details }
    }
}

// ── ConfigError → CliError mapping ──────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Figment(inner) => Self::Config(inner),
            other => Self::Settings(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RequestFailed {
                status,
                status_text,
            } => CliError::ApiError {
                status: Some(status),
                message: format!("API Error: {status} {status_text}"),
            },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::ValidationFailed(errors) => CliError::invalid_meal(&errors),

            CoreError::Config { message } => CliError::Validation {
                field: "api.base_url".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                status: None,
                message,
            },
        }
    }
}
