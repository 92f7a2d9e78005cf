use thiserror::Error;

pub type PickerResult<T> = Result<T, PickerError>;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("invalid picker config: {0}")]
    InvalidConfig(String),

    #[error("malformed value: {0}")]
    MalformedValue(String),

    #[error("malformed preset: {0}")]
    MalformedPreset(String),

    #[error("text `{text}` does not match format `{format}`")]
    UnparseableText { text: String, format: String },

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
