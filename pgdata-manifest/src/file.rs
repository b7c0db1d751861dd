use std::path::{Path, PathBuf};

use crate::{Error, Manifest, Result};

/// A pgdata.toml file with both raw content and parsed manifest.
pub struct ConfigFile {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl ConfigFile {
    /// Open and parse a pgdata.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}
