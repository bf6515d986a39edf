use std::path::PathBuf;

/// Where the SQLite store keeps its `logs` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Private in-memory database, gone once the connection closes.
    Memory,
    /// Database file on disk, created if missing.
    File(PathBuf),
}

/// Parse a location string and infer the kind of database it names.
///
/// Examples:
/// - ":memory:" or "sqlite::memory:"
/// - "sqlite:///var/log/app/logs.db"
/// - "sqlite:logs.db"
/// - "logs.db"
pub fn parse_location(location: &str) -> Result<StoreLocation, LocationError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(LocationError::Empty);
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower == ":memory:" || lower == "sqlite::memory:" || lower == "sqlite://:memory:" {
        return Ok(StoreLocation::Memory);
    }

    let path = if lower.starts_with("sqlite://") {
        &trimmed["sqlite://".len()..]
    } else if lower.starts_with("sqlite:") {
        &trimmed["sqlite:".len()..]
    } else if let Some((scheme, _)) = trimmed.split_once("://") {
        return Err(LocationError::UnknownScheme(scheme.to_string()));
    } else {
        trimmed
    };

    // Drop connection options such as "?mode=rwc"; the store picks its own.
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() {
        return Err(LocationError::Empty);
    }

    Ok(StoreLocation::File(PathBuf::from(path)))
}

/// Error type returned when parsing a storage location.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LocationError {
    #[error("empty storage location")]
    Empty,

    #[error("unknown or unsupported location scheme: {0}")]
    UnknownScheme(String),
}
