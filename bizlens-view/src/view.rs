use bizlens_core::{ConfigError, DataError, RecommendError, ReportError, SegmentationError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("View error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;

impl From<RecommendError> for ViewError {
    fn from(err: RecommendError) -> Self {
        if err.is_invalid_argument() {
            Self::InvalidInput(err.to_string())
        } else {
            Self::ExecutionFailed(err.to_string())
        }
    }
}

impl From<ReportError> for ViewError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidRange { .. } => Self::InvalidInput(err.to_string()),
            other => Self::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<DataError> for ViewError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotEnoughRows { .. } => Self::InvalidInput(err.to_string()),
            other => Self::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<SegmentationError> for ViewError {
    fn from(err: SegmentationError) -> Self {
        Self::ExecutionFailed(err.to_string())
    }
}

impl From<ConfigError> for ViewError {
    fn from(err: ConfigError) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        Self::ExecutionFailed(format!("Failed to serialize view data: {}", err))
    }
}

/// Output from rendering a view.
///
/// `content` is a human-readable summary; `data` holds the chart and table
/// payloads the presentation layer draws.
#[derive(Debug, Clone, Serialize)]
pub struct ViewOutput {
    pub content: String,
    pub data: Option<Value>,
}

impl ViewOutput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl fmt::Display for ViewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// Core trait that every dashboard view implements.
///
/// A view is one tab of the dashboard: it takes the selector values as JSON,
/// fetches its data, runs its analysis and returns what to display.
pub trait View: Send + Sync {
    /// Unique identifier, used to select the view.
    fn name(&self) -> &str;

    /// Tab label.
    fn title(&self) -> &str;

    /// Human-readable description of the analysis.
    fn description(&self) -> &str;

    /// JSON schema of the selector parameters `render` accepts.
    fn parameter_schema(&self) -> Value;

    /// Renders the view. The input should match the parameter schema.
    fn render(&self, params: Value) -> Result<ViewOutput>;
}

/// Parses view parameters, treating `null` as an empty object.
pub fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params)
        .map_err(|e| ViewError::InvalidInput(format!("Invalid parameters: {}", e)))
}
