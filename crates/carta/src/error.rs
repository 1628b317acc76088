// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use std::path::PathBuf;
use thiserror::Error;
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Metric data error: {0}")]
    Data(#[from] DataError),
    #[error("Chart rendering error: {0}")]
    Render(#[from] RenderError),
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read report configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML configuration: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Missing required configuration: {field}")]
    MissingRequiredConfig { field: String },
    #[error("Invalid configuration value: {field} = {value}")]
    InvalidValue { field: String, value: String },
}
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read metric file '{}': {source}", path.display())]
    MetricFileError {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },
    #[error("Failed to open metric file '{}': {source}", path.display())]
    MetricFileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Column '{column}' not found in metric table")]
    ColumnNotFound { column: String },
    #[error("Column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType { column: String, dtype: String },
    #[error("No metric files were loaded")]
    EmptyInput,
    #[error("Table operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {reason}")]
    Drawing { reason: String },
    #[error("Failed to convert chart '{}' to PDF: {reason}", path.display())]
    PdfConversion { path: PathBuf, reason: String },
    #[error("Failed to write chart '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create output directory '{}': {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
pub type Result<T> = std::result::Result<T, ReportError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
impl From<polars::error::PolarsError> for ReportError {
    fn from(err: polars::error::PolarsError) -> Self {
        ReportError::Data(DataError::Polars(err))
    }
}
impl ReportError {
    pub fn category(&self) -> &'static str {
        match self {
            ReportError::Config(_) => "Configuration",
            ReportError::Data(_) => "Data",
            ReportError::Render(_) => "Render",
        }
    }
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ReportError::Data(DataError::MetricFileOpen { .. }) => vec![
                "Run the evaluation step so every metric CSV exists".to_string(),
                "Check --input-dir points at the metrics directory".to_string(),
            ],
            ReportError::Data(DataError::ColumnNotFound { .. }) => vec![
                "Compare the CSV header with the configured column names".to_string(),
            ],
            ReportError::Config(ConfigError::YamlParseError { .. }) => vec![
                "Validate the YAML syntax of the configuration file".to_string(),
            ],
            ReportError::Render(RenderError::Write { .. } | RenderError::OutputDirectory { .. }) => {
                vec!["Check --output-dir exists or can be created and is writable".to_string()]
            }
            _ => vec!["Check the error message for specific guidance".to_string()],
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            ReportError::Data(DataError::EmptyInput) => {
                "No metric files are configured. Add vertex counts and nesting combinations to the input grid.".to_string()
            }
            ReportError::Config(ConfigError::ConfigFileError { path, .. }) => {
                format!("Unable to load report configuration from '{path}'.")
            }
            _ => self.to_string(),
        }
    }
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReportError::Config(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
    pub fn color_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Error => "\x1b[31m",
            ErrorSeverity::Critical => "\x1b[35m",
        }
    }
}
pub struct ErrorReporter {
    pub show_suggestions: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_suggestions: true,
            colored_output: true,
        }
    }
    pub fn plain() -> Self {
        Self {
            show_suggestions: true,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &ReportError) -> String {
        let severity = error.severity();
        let mut output = String::new();
        if self.colored_output {
            output.push_str(severity.color_code());
        }
        output.push_str(&format!(
            "[{}] {}: {}\n",
            severity.as_str(),
            error.category(),
            error.user_message()
        ));
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        if self.show_suggestions {
            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                output.push_str("\nSuggestions:\n");
                for suggestion in suggestions {
                    output.push_str(&format!("  • {suggestion}\n"));
                }
            }
        }
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
