use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("cannot read items: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid items JSON: {0}")]
    Json(#[from] serde_json::Error),
}
