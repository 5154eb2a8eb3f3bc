//! Error type shared by every fallible engine operation.

/// Failure raised while mounting, drawing, or loading a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// No element with the configured id exists, or it is not a `<canvas>`.
    #[error("canvas element not found: {0}")]
    CanvasNotFound(String),
    /// The canvas refused to hand out a 2D rendering context.
    #[error("2d context unavailable: {0}")]
    Context(String),
    /// The page is missing `window`/`document`, or a DOM call failed.
    #[error("DOM unavailable: {0}")]
    Dom(String),
    /// The engine was already borrowed by an in-flight handler.
    #[error("engine busy")]
    Busy,
    /// A drawing call on the 2D context failed.
    #[error("canvas call failed: {0}")]
    Canvas(String),
    /// The HTTP request itself failed (network, CORS, aborted).
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// The payload could not be turned into a grid.
    #[error("malformed map payload: {0}")]
    Parse(String),
    /// The payload parsed but described a grid with no cells.
    #[error("map payload has no cells")]
    EmptyGrid,
    /// `load_map` was called without a configured map URL.
    #[error("no map URL configured")]
    NoMapUrl,
    /// A hex detail fetch was requested without a configured hex URL.
    #[error("no hex URL configured")]
    NoHexUrl,
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
