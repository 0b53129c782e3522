//! Installed-version markers

use arcade_errors::{Error, InstallError};
use arcade_types::{InstalledMarker, Platform, TitleId};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Reads and writes the per-title marker files under the apps root
#[derive(Debug, Clone)]
pub struct VersionStore {
    apps_dir: PathBuf,
    platform: Platform,
}

impl VersionStore {
    pub fn new(apps_dir: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            apps_dir: apps_dir.into(),
            platform,
        }
    }

    #[must_use]
    pub fn apps_dir(&self) -> &Path {
        &self.apps_dir
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Directory a title is installed into
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a single plain path component.
    pub fn install_dir(&self, id: &TitleId) -> Result<PathBuf, Error> {
        let mut components = Path::new(id.as_str()).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.apps_dir.join(id.as_str())),
            _ => Err(InstallError::FilesystemError {
                operation: "resolve_install_dir".to_string(),
                path: id.to_string(),
                message: "title id is not a valid directory name".to_string(),
            }
            .into()),
        }
    }

    /// Marker file inside the title's install directory
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a valid directory name.
    pub fn marker_path(&self, id: &TitleId) -> Result<PathBuf, Error> {
        Ok(self
            .install_dir(id)?
            .join(self.platform.marker_file_name()))
    }

    /// Installed marker for `id`
    ///
    /// A missing, unreadable or corrupt marker all read as "not installed".
    pub async fn read(&self, id: &TitleId) -> Option<InstalledMarker> {
        let path = self.marker_path(id).ok()?;
        let contents = match fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable marker");
                return None;
            }
        };
        match serde_json::from_slice(&contents) {
            Ok(marker) => Some(marker),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt marker ignored");
                None
            }
        }
    }

    /// Persist `marker`, replacing any previous one atomically
    ///
    /// # Errors
    ///
    /// Returns `InstallError::MarkerWriteFailed` if the temp file cannot be
    /// written or renamed into place.
    pub async fn write(&self, marker: &InstalledMarker) -> Result<(), Error> {
        let dir = self.install_dir(&marker.id)?;
        let path = dir.join(self.platform.marker_file_name());
        let failed = |message: String| -> Error {
            InstallError::MarkerWriteFailed {
                path: path.display().to_string(),
                message,
            }
            .into()
        };

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| failed(e.to_string()))?;

        let body = serde_json::to_vec(marker).map_err(|e| failed(e.to_string()))?;
        let temp_path = dir.join(format!(
            ".{}.{}.tmp",
            self.platform.marker_file_name(),
            uuid::Uuid::new_v4()
        ));

        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&body).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &path).await
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                tracing::warn!(path = %temp_path.display(), error = %cleanup, "failed to remove temporary marker");
            }
            return Err(failed(e.to_string()));
        }
        tracing::debug!(title = %marker.id, version = %marker.version, "marker written");
        Ok(())
    }

    /// Delete the marker and the whole install directory
    ///
    /// Removing a title that is not installed succeeds.
    ///
    /// # Errors
    ///
    /// Returns `InstallError::FilesystemError` if the directory exists but
    /// cannot be removed.
    pub async fn remove(&self, id: &TitleId) -> Result<(), Error> {
        let dir = self.install_dir(id)?;
        let marker = dir.join(self.platform.marker_file_name());

        // marker first, so a partially removed directory never looks installed
        match fs::remove_file(&marker).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(fs_error("remove_marker", &marker, &e)),
        }
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::debug!(title = %id, dir = %dir.display(), "install removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(fs_error("remove_install_dir", &dir, &e)),
        }
    }

    /// Whether anything exists at the title's install directory
    pub async fn has_install_dir(&self, id: &TitleId) -> bool {
        match self.install_dir(id) {
            Ok(dir) => fs::try_exists(&dir).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Every readable marker under the apps root, sorted by title id
    ///
    /// # Errors
    ///
    /// Returns an error if the apps root exists but cannot be listed.
    pub async fn list(&self) -> Result<Vec<InstalledMarker>, Error> {
        let mut entries = match fs::read_dir(&self.apps_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(fs_error("list_apps", &self.apps_dir, &e)),
        };

        let mut markers = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| fs_error("list_apps", &self.apps_dir, &e))?
        {
            let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
            if !is_dir {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(TitleId::from) else {
                continue;
            };
            if let Some(marker) = self.read(&name).await {
                markers.push(marker);
            }
        }
        markers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(markers)
    }
}

fn fs_error(operation: &str, path: &Path, error: &std::io::Error) -> Error {
    InstallError::FilesystemError {
        operation: operation.to_string(),
        path: path.display().to_string(),
        message: error.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_install_dir_rejects_traversal() {
        let store = VersionStore::new("/apps", Platform::Windows);
        assert_eq!(
            store.install_dir(&TitleId::from("g1")).unwrap(),
            PathBuf::from("/apps/g1")
        );
        assert!(store.install_dir(&TitleId::from("../etc")).is_err());
        assert!(store.install_dir(&TitleId::from("a/b")).is_err());
        assert!(store.install_dir(&TitleId::from("")).is_err());
        assert!(store.install_dir(&TitleId::from("..")).is_err());
    }

    #[test]
    fn test_marker_name_follows_platform() {
        let id = TitleId::from("g1");
        let mac = VersionStore::new("/apps", Platform::MacOs);
        assert!(mac.marker_path(&id).unwrap().ends_with("g1/macver.json"));
        let win = VersionStore::new("/apps", Platform::Windows);
        assert!(win.marker_path(&id).unwrap().ends_with("g1/winver.json"));
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_files() {
        let temp = tempdir().unwrap();
        let store = VersionStore::new(temp.path(), Platform::Linux);
        store
            .write(&InstalledMarker::new(TitleId::from("g1"), "1"))
            .await
            .unwrap();
        store
            .write(&InstalledMarker::new(TitleId::from("g1"), "2"))
            .await
            .unwrap();

        let names: Vec<_> = std::fs::read_dir(temp.path().join("g1"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["linuxver.json".to_string()]);
        assert_eq!(
            store.read(&TitleId::from("g1")).await.unwrap().version,
            "2"
        );
    }
}
