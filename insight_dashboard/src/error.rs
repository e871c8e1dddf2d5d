// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

/// A cell that could not be coerced to its column type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    /// Not a number after stripping `$`, `,` and `%`.
    #[error("invalid number {0:?}")]
    Number(String),
    /// Not a year, a decimal year or a date.
    #[error("invalid year {0:?}")]
    Year(String),
    /// Neither `Actual` nor `Forecast`.
    #[error("invalid revenue kind {0:?}")]
    Kind(String),
}

/// Errors returned while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A record did not match the row type, including cells that failed coercion.
    #[error("failed to parse {path}{}", .row.map(|r| format!(" at line {r}")).unwrap_or_default())]
    Csv {
        /// File that was parsed.
        path: PathBuf,
        /// Line of the offending record, when known.
        row: Option<u64>,
        /// Underlying error.
        source: csv::Error,
    },
    /// The boundary file is not a GeoJSON feature collection.
    #[error("failed to parse regions from {path}")]
    GeoJson {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// The parsing task panicked or was cancelled.
    #[error("dataset parsing task failed")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors returned while reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`DashboardConfig`](crate::DashboardConfig).
    #[error("invalid config")]
    Toml(#[from] toml::de::Error),
}

/// Errors returned by a [`SessionStore`](crate::SessionStore).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("session store I/O failed")]
    Io(#[from] std::io::Error),
    /// The backing file or a stored value is not valid JSON.
    #[error("session store holds invalid JSON")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_errors_name_the_line() {
        let source = csv::ReaderBuilder::new()
            .from_reader("a,b\n1\n".as_bytes())
            .records()
            .find_map(Result::err)
            .expect("short record");
        let err = LoadError::Csv {
            path: PathBuf::from("data/viewership.csv"),
            row: Some(2),
            source,
        };
        assert_eq!(err.to_string(), "failed to parse data/viewership.csv at line 2");
    }

    #[test]
    fn io_errors_convert_into_storage_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(StorageError::from(io), StorageError::Io(_)));
    }
}
