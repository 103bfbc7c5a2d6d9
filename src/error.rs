use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terrain needs at least 3 vertices, got {0}")]
    DegenerateTerrain(usize),
    #[error("field width has to be positive, got {0}")]
    InvalidFieldWidth(f64),
    #[error("couldn't find {0}")]
    MissingKey(&'static str),
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    #[error("json error: {0}")]
    Json(#[from] json::Error),
    #[error("error while reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn render loop: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("render loop thread panicked")]
    RenderLoopPanicked,
}
