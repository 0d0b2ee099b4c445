//! Request-scoped working storage for uploads and their link artifacts.
//!
//! Every upload gets its own directory under the store root, named by a fresh
//! UUID. The raw capture is stashed there while it is processed and the
//! newline-joined link list is persisted next to it. Downloading the artifact
//! claims it (rename), so a concurrent download finds nothing; the directory
//! is removed once the whole file has been read, and the claim is undone if
//! the reader goes away early. Directories that are never downloaded are
//! removed by [`ArtifactStore::sweep`].

use anyhow::{Context, Result};
use axum::body::Bytes;
use futures::{Stream, StreamExt};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::str::FromStr;
use std::task::{self, Poll};
use std::time::Duration;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::rewrite::RewriteResult;

/// File name of the downloadable link list.
pub const ARTIFACT_NAME: &str = "filtered_urls.txt";
const UPLOAD_NAME: &str = "capture.har";
const PART_SUFFIX: &str = ".part";
const TAKEN_SUFFIX: &str = ".taken";

/// Token naming one request directory.
///
/// Only ever built from a UUID, so it can't smuggle path components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for ArtifactId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_for(&self, id: ArtifactId) -> PathBuf {
        self.root.join(id.to_string())
    }

    /// Allocates a fresh request directory.
    pub async fn begin_upload(&self) -> Result<UploadSlot> {
        let id = ArtifactId::new();
        let dir = self.dir_for(id);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create request dir {}", dir.display()))?;
        Ok(UploadSlot { id, dir })
    }

    /// Claims the artifact for `id` for streaming.
    ///
    /// Returns `None` if it was never written, is claimed by another reader,
    /// was already delivered, or was swept.
    pub async fn claim(&self, id: ArtifactId) -> Result<Option<ClaimedArtifact>> {
        let dir = self.dir_for(id);
        let original = dir.join(ARTIFACT_NAME);
        let claimed = with_suffix(&original, TAKEN_SUFFIX);

        match tokio::fs::rename(&original, &claimed).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("claim artifact {}", original.display()))
            }
        }

        // Built before opening so a failed open still releases the claim.
        let claim = Claim {
            id,
            dir,
            original,
            claimed,
            delivered: false,
        };
        let file = tokio::fs::File::open(&claim.claimed)
            .await
            .with_context(|| format!("open artifact {}", claim.claimed.display()))?;
        Ok(Some(ClaimedArtifact {
            reader: ReaderStream::new(file),
            claim,
        }))
    }

    /// Removes request directories whose last modification is at least
    /// `max_age` ago. Entries that are not request directories are left alone.
    pub async fn sweep(&self, max_age: Duration) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| format!("read work dir {}", self.root.display()))
            }
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let is_request_dir = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.parse::<ArtifactId>().is_ok());
            if !is_request_dir {
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_dir() => m,
                _ => continue,
            };
            let age = metadata
                .modified()
                .ok()
                .and_then(|t| t.elapsed().ok())
                .unwrap_or(Duration::ZERO);
            if age < max_age {
                continue;
            }

            let path = entry.path();
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("sweep failed for {}: {}", path.display(), e),
            }
        }

        if removed > 0 {
            tracing::info!("swept {} request dirs from {}", removed, self.root.display());
        }
        Ok(removed)
    }

    /// Removes every request directory regardless of age.
    pub async fn clear(&self) -> Result<usize> {
        self.sweep(Duration::ZERO).await
    }
}

/// Working directory for one in-flight upload.
#[derive(Debug)]
pub struct UploadSlot {
    id: ArtifactId,
    dir: PathBuf,
}

impl UploadSlot {
    pub fn id(&self) -> ArtifactId {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the raw upload into the request directory.
    pub async fn stash_upload(&self, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(UPLOAD_NAME);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(path)
    }

    /// Deletes the stashed upload; a missing file is fine.
    pub async fn discard_upload(&self) -> Result<()> {
        let path = self.dir.join(UPLOAD_NAME);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove upload {}", path.display())),
        }
    }

    /// Writes the link list as the downloadable artifact.
    ///
    /// Written to a `.part` file first and renamed, so a concurrent download
    /// never sees a half-written list.
    pub async fn persist(&self, result: &RewriteResult) -> Result<()> {
        let final_path = self.dir.join(ARTIFACT_NAME);
        let part = with_suffix(&final_path, PART_SUFFIX);
        tokio::fs::write(&part, result.to_text())
            .await
            .with_context(|| format!("write artifact {}", part.display()))?;
        tokio::fs::rename(&part, &final_path)
            .await
            .with_context(|| format!("finalize artifact {}", final_path.display()))?;
        Ok(())
    }

    /// Removes the whole request directory (failed upload).
    pub async fn abandon(self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove request dir {}", self.dir.display())),
        }
    }
}

/// An artifact being read out by exactly one download.
///
/// Reading to end of file marks it delivered and its request directory is
/// removed on drop. Dropped before that (client disconnect, read error), the
/// artifact is renamed back so it can be downloaded again.
pub struct ClaimedArtifact {
    reader: ReaderStream<tokio::fs::File>,
    claim: Claim,
}

impl ClaimedArtifact {
    /// Reads the remaining content, completing the delivery.
    pub async fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = self.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }
}

impl Stream for ClaimedArtifact {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let next = Pin::new(&mut this.reader).poll_next(cx);
        if let Poll::Ready(None) = next {
            this.claim.delivered = true;
        }
        next
    }
}

struct Claim {
    id: ArtifactId,
    dir: PathBuf,
    original: PathBuf,
    claimed: PathBuf,
    delivered: bool,
}

impl Drop for Claim {
    fn drop(&mut self) {
        if self.delivered {
            match std::fs::remove_dir_all(&self.dir) {
                Ok(()) => tracing::debug!("artifact {} delivered", self.id),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("failed to remove request dir {}: {}", self.dir.display(), e)
                }
            }
        } else if let Err(e) = std::fs::rename(&self.claimed, &self.original) {
            tracing::warn!("failed to release artifact {}: {}", self.id, e);
        } else {
            tracing::debug!("artifact {} released after incomplete download", self.id);
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(suffix);
    PathBuf::from(o)
}
