use thiserror::Error;

/// Everything that can go wrong while talking to the DSB service.
///
/// Protocol level problems (`Decode`, `Api`, `EmptyResult` and transport
/// errors on the data request) abort a fetch. Problems with a single
/// document are caught at the dispatch boundary and only drop that document.
#[derive(Error, Debug)]
pub enum DsbError {
    #[error("Failed to decode server response: {0}")]
    Decode(String),

    #[error("Server reported an error: {message}")]
    Api { message: String },

    #[error("Timetable data could not be found")]
    EmptyResult,

    #[error("Failed to parse timetable document: {0}")]
    DocumentParse(String),

    #[error("Failed to recognize image text: {0}")]
    Ocr(String),

    #[error("Invalid image response (content type: {content_type})")]
    InvalidImageResponse { content_type: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Middleware(#[from] reqwest_middleware::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl DsbError {
    /// Whether this error aborts the whole fetch when it is raised by the
    /// protocol layer.
    ///
    /// Per-document failures return `false`. Transport errors are reported
    /// as fatal here; the dispatcher still treats them as non-fatal when they
    /// happen while downloading a single document.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DsbError::DocumentParse(_) | DsbError::Ocr(_) | DsbError::InvalidImageResponse { .. }
        )
    }
}

pub type Result<T, E = DsbError> = std::result::Result<T, E>;
