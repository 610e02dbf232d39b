use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaziwaError {
    #[error("Config directory not found at {0}. Run 'maziwa init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Farmer '{0}' not found in farmers.toml")]
    FarmerNotFound(String),

    #[error("Farmer id '{0}' is already registered")]
    FarmerExists(String),

    #[error("Select a farmer or a date range to generate a report.")]
    InvalidCriteria,

    #[error("Invalid quantity '{qty}': {reason}")]
    InvalidQuantity { qty: String, reason: String },

    #[error("Invalid quality grade '{0}'. Use 'good', 'fair', or 'poor'.")]
    InvalidQuality(String),

    #[error("Invalid time '{0}'. Expected HH:MM (e.g., 08:30)")]
    InvalidTime(String),

    #[error("Invalid {flag} value '{value}'. Expected YYYY-MM-DD")]
    InvalidDate { flag: String, value: String },

    #[error("Milk price must be a positive number (got {0})")]
    InvalidPrice(f64),

    #[error("GEMINI_API_KEY is not set. Export it to use the tips command.")]
    TipsApiKeyMissing,

    #[error("Tips request failed: {0}")]
    TipsRequest(String),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MaziwaError>;
