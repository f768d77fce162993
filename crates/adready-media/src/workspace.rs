//! Scoped per-request working directory.
//!
//! Every artifact of a video analysis (staged source, extracted audio,
//! extracted frames) is written inside one [`Workspace`]. The directory is
//! backed by [`tempfile::TempDir`], so it is removed recursively when the
//! workspace is dropped: on success, on error, and when the owning future is
//! cancelled.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

use crate::error::MediaResult;

const WORKSPACE_PREFIX: &str = "adready-";

/// Exclusively owned temporary directory for one analysis.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace under `root`, or under the system temp dir.
    pub fn create(root: Option<&Path>) -> MediaResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);

        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        debug!(path = %dir.path().display(), "Created analysis workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the uploaded source into the workspace.
    pub async fn stage_source(&self, bytes: &[u8], extension: &str) -> MediaResult<PathBuf> {
        let path = self.dir.path().join(format!("source.{}", extension));
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "Staged source media");
        Ok(path)
    }

    /// Output path for the frame at `index`.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.path().join(format!("frame_{:02}.jpg", index))
    }

    /// Output path for the isolated opening audio.
    pub fn audio_path(&self) -> PathBuf {
        self.dir.path().join("opening_audio.mp3")
    }

    /// Remove the workspace now and surface any error.
    ///
    /// Dropping the workspace also removes it, but silently.
    pub fn close(self) -> MediaResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!(path = %path.display(), "Removed analysis workspace");
        Ok(())
    }
}
