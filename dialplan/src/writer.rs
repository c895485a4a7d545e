use crate::model::GeneratedArtifact;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Persists generated dialplans under one output directory.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    output_dir: PathBuf,
}

impl ConfigWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, switchboard_id: i64) -> PathBuf {
        self.output_dir.join(format!("user_{switchboard_id}.conf"))
    }

    /// Replaces the whole dialplan file of a switchboard.
    ///
    /// The text goes to a temporary sibling first and is renamed over the
    /// target, so the telephony engine never reads half a file.
    pub async fn write(&self, switchboard_id: i64, text: String) -> io::Result<GeneratedArtifact> {
        fs::create_dir_all(&self.output_dir).await?;
        let path = self.path_for(switchboard_id);
        let tmp = path.with_extension("conf.tmp");
        let written = match fs::write(&tmp, text.as_bytes()).await {
            Ok(()) => fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(GeneratedArtifact {
            switchboard_id,
            path,
            text,
        })
    }
}
