/// Configuration and initialization errors. The only errors fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid config value for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("missing provider credential or endpoint: {name}")]
    MissingCredential { name: String },
}
