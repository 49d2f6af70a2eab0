use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server did not report a content length")]
    MissingContentLength,
}

/// Streamed status of a demo download.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadProgress {
    /// Rounded percent downloaded so far; never decreases.
    Pending(u8),
    /// The download failed; loading/progress state should reset while
    /// whatever is currently displayed stays untouched.
    Failed(String),
}

/// Volume bytes ready for decoding, regardless of where they came from.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Descriptor of a downloadable demonstration volume.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoFile {
    pub name: String,
    pub byte_size: u64,
    pub url: String,
}

/// Acquires volume bytes from a user-picked local file or a streamed
/// demo download. Both paths converge on the same [`LoadedFile`]; a
/// failed download leaves whatever is currently displayed untouched.
#[derive(Clone, Debug, Default)]
pub struct FileLoader {
    client: reqwest::Client,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap bytes the UI shell already holds (local file pick).
    pub fn local(name: impl Into<String>, bytes: Vec<u8>) -> LoadedFile {
        LoadedFile {
            name: name.into(),
            bytes,
        }
    }

    /// Build demo descriptors by probing each URL with a HEAD request.
    /// A missing content-length yields a zero size, matching servers
    /// that refuse to report one.
    pub async fn probe_demo_files(&self, urls: &[&str]) -> Result<Vec<DemoFile>, LoadError> {
        let mut files = Vec::with_capacity(urls.len());
        for url in urls {
            let response = self.client.head(*url).send().await?.error_for_status()?;
            // HEAD responses have no body, so read the header itself.
            let byte_size = response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
                .unwrap_or(0);
            files.push(DemoFile {
                name: file_name(url).to_owned(),
                byte_size,
                url: (*url).to_owned(),
            });
        }
        Ok(files)
    }

    /// Stream a demo file chunk by chunk, reporting [`LoadProgress`]
    /// over `progress`, and assemble the bytes only once the stream
    /// completes. Percent is rounded and never decreases even if the
    /// server understates the content length; a failure is mirrored to
    /// the status stream before the error returns.
    pub async fn fetch_demo(
        &self,
        file: &DemoFile,
        progress: &UnboundedSender<LoadProgress>,
    ) -> Result<LoadedFile, LoadError> {
        match self.stream_demo(file, progress).await {
            Ok(loaded) => Ok(loaded),
            Err(err) => {
                warn!(name = %file.name, %err, "demo download failed");
                // A closed progress channel just means nobody is
                // watching anymore.
                let _ = progress.send(LoadProgress::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    async fn stream_demo(
        &self,
        file: &DemoFile,
        progress: &UnboundedSender<LoadProgress>,
    ) -> Result<LoadedFile, LoadError> {
        debug!(name = %file.name, url = %file.url, "starting demo download");
        let mut response = self.client.get(&file.url).send().await?.error_for_status()?;
        let total = response
            .content_length()
            .ok_or(LoadError::MissingContentLength)?;

        let mut bytes = Vec::with_capacity(total as usize);
        let mut reported: u8 = 0;
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
            reported = rounded_percent(bytes.len() as u64, total).max(reported);
            let _ = progress.send(LoadProgress::Pending(reported));
        }

        info!(name = %file.name, bytes = bytes.len(), "demo download complete");
        Ok(LoadedFile {
            name: file.name.clone(),
            bytes,
        })
    }
}

fn rounded_percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((loaded as f64 / total as f64 * 100.0).round() as u64).min(100) as u8
}

/// Tail component of a slash-separated path or URL.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Human-readable byte count, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_owned();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    let mut formatted = format!("{value:.2}");
    if formatted.contains('.') {
        formatted = formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned();
    }
    format!("{formatted} {}", UNITS[exponent])
}
