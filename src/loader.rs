//! Asynchronous, cancellable subject loading.
//!
//! A [`LoadTask`] owns a tokio task that fetches the model bytes, decodes
//! them on the blocking pool and resolves to the finished [`Mesh`]. Nothing
//! is handed to the viewer until the whole mesh is ready, so framing never
//! sees partial geometry.

use std::{
    fmt,
    future::Future,
    path::PathBuf,
    pin::Pin,
    str::FromStr,
    task::{Context, Poll},
};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    error::LoadError,
    io::{decode_mesh, MeshFormat},
    Mesh,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelSource {
    File(PathBuf),
    Url(String),
}

impl ModelSource {
    /// `http://` and `https://` locations are URLs, everything else a path.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ModelSource::Url(trimmed.to_string())
        } else {
            ModelSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn format(&self) -> Result<MeshFormat, LoadError> {
        let location = self.to_string();
        MeshFormat::from_location(&location).ok_or(LoadError::UnknownFormat(location))
    }
}

impl FromStr for ModelSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::File(path) => write!(f, "{}", path.display()),
            ModelSource::Url(url) => f.write_str(url),
        }
    }
}

async fn fetch_bytes(source: &ModelSource) -> Result<Vec<u8>, LoadError> {
    match source {
        ModelSource::File(path) => tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        }),
        #[cfg(feature = "http")]
        ModelSource::Url(url) => {
            let http = |source| LoadError::Http {
                url: url.clone(),
                source,
            };
            let resp = reqwest::get(url.as_str()).await.map_err(http)?;
            let resp = resp.error_for_status().map_err(http)?;
            let bytes = resp.bytes().await.map_err(http)?;
            Ok(bytes.to_vec())
        }
        #[cfg(not(feature = "http"))]
        ModelSource::Url(url) => Err(LoadError::HttpDisabled { url: url.clone() }),
    }
}

/// Fetches and decodes `source` to completion.
pub async fn load_mesh(source: ModelSource) -> Result<Mesh, LoadError> {
    let format = source.format()?;
    let bytes = fetch_bytes(&source).await?;
    let byte_len = bytes.len();
    let mesh = tokio::task::spawn_blocking(move || decode_mesh(&bytes, format))
        .await
        .map_err(|e| LoadError::Task(e.to_string()))??;
    info!(
        %source,
        bytes = byte_len,
        vertices = mesh.positions.len(),
        triangles = mesh.triangle_count(),
        "model loaded"
    );
    Ok(mesh)
}

/// Handle to an in-flight load. Await it for the result.
pub struct LoadTask {
    source: ModelSource,
    handle: JoinHandle<Result<Mesh, LoadError>>,
    cancelled: bool,
}

impl LoadTask {
    pub fn spawn(runtime: &Handle, source: ModelSource) -> Self {
        debug!(%source, "load started");
        let handle = runtime.spawn(load_mesh(source.clone()));
        Self {
            source,
            handle,
            cancelled: false,
        }
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Aborts the load. Awaiting the task afterwards yields
    /// [`LoadError::Cancelled`] even if the fetch had already finished.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            debug!(source = %self.source, "load cancelled");
        }
        self.cancelled = true;
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for LoadTask {
    type Output = Result<Mesh, LoadError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let cancelled = self.cancelled;
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            _ if cancelled => Err(LoadError::Cancelled),
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(LoadError::Cancelled),
            Err(e) => Err(LoadError::Task(e.to_string())),
        })
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadTask, ModelSource};
    use crate::{error::LoadError, io::MeshFormat};
    use std::path::PathBuf;
    use tokio::runtime::Handle;

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 2 0 0\nv 0 2 0\nf 1 2 3\n";

    #[test]
    fn source_parsing() {
        assert_eq!(
            ModelSource::parse("https://example.com/a.obj"),
            ModelSource::Url("https://example.com/a.obj".into())
        );
        assert_eq!(
            ModelSource::parse("HTTP://example.com/a.stl").format().unwrap(),
            MeshFormat::Stl
        );
        assert_eq!(
            ModelSource::parse(" models/a.obj "),
            ModelSource::File(PathBuf::from("models/a.obj"))
        );
        assert!(matches!(
            ModelSource::parse("a.ply").format(),
            Err(LoadError::UnknownFormat(_))
        ));
    }

    #[tokio::test]
    async fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, TRIANGLE_OBJ).unwrap();

        let task = LoadTask::spawn(&Handle::current(), ModelSource::File(path));
        let mesh = task.await.unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let task = LoadTask::spawn(&Handle::current(), ModelSource::File(dir.path().join("gone.stl")));
        assert!(matches!(task.await, Err(LoadError::Io { .. })));
    }

    #[tokio::test]
    async fn cancelled_load_never_yields_a_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, TRIANGLE_OBJ).unwrap();

        let mut task = LoadTask::spawn(&Handle::current(), ModelSource::File(path));
        task.cancel();
        assert!(task.is_cancelled());
        assert!(matches!(task.await, Err(LoadError::Cancelled)));
    }

    #[cfg(not(feature = "http"))]
    #[tokio::test]
    async fn urls_need_the_http_feature() {
        let task = LoadTask::spawn(&Handle::current(), ModelSource::parse("https://example.com/a.obj"));
        assert!(matches!(task.await, Err(LoadError::HttpDisabled { .. })));
    }
}
