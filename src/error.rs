use std::path::PathBuf;

use thiserror::Error;

pub use crate::{
    io::{ObjError, StlError},
    mesh::MeshValidationError,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "http")]
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} cannot be fetched: built without the `http` feature")]
    HttpDisabled { url: String },
    #[error("unsupported model format: {0} (expected .obj or .stl)")]
    UnknownFormat(String),
    #[error(transparent)]
    Obj(#[from] ObjError),
    #[error(transparent)]
    Stl(#[from] StlError),
    #[error("model is invalid: {0}")]
    Invalid(#[from] MeshValidationError),
    #[error("model has no triangles")]
    EmptyMesh,
    #[error("load cancelled")]
    Cancelled,
    #[error("load task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fov_y_degrees must be inside (0, 180), got {0}")]
    InvalidFov(f32),
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("coverage must be inside (0, 1], got {0}")]
    InvalidCoverage(f32),
    #[error("cell_aspect must be positive and finite, got {0}")]
    InvalidCellAspect(f32),
    #[error("fps must be between 1 and 240, got {0}")]
    InvalidFps(u32),
    #[error("unknown {field} `{value}`")]
    UnknownValue { field: &'static str, value: String },
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
