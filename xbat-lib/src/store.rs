//! Local token cache.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::auth::AccessToken;
use crate::error::StoreError;

/// The single recognized field in the cache file.
const TOKEN_KEY: &str = "ACCESS_TOKEN";

/// Single-record token cache backed by a `KEY=VALUE` file.
///
/// The file holds at most one credential (`ACCESS_TOKEN=<token>`) and is
/// overwritten wholesale on every save. A missing or unrecognizable file
/// is the normal "no credential yet" state, not a fault.
///
/// Saves go through a sibling temporary file that is synced and then
/// renamed over the final path, so a crash mid-write never leaves a
/// partial record visible to a later load. Concurrent invocations may
/// still race on the file; the atomic rename bounds the damage to a
/// redundant re-issuance.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached credential, if any.
    ///
    /// Returns `Ok(None)` when the file does not exist, carries no
    /// `ACCESS_TOKEN` line, or the token value is empty.
    pub async fn load(&self) -> Result<Option<AccessToken>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        for line in contents.lines() {
            let value = line
                .trim()
                .strip_prefix(TOKEN_KEY)
                .and_then(|rest| rest.strip_prefix('='));
            if let Some(value) = value {
                if !value.is_empty() {
                    return Ok(Some(AccessToken::new(value)));
                }
            }
        }

        Ok(None)
    }

    /// Persists `token` as the sole record, replacing any previous one.
    ///
    /// The record is durable on disk before this returns successfully.
    pub async fn save(&self, token: &AccessToken) -> Result<(), StoreError> {
        self.write_atomic(token).await.map_err(|err| StoreError::Write {
            path: self.path.clone(),
            source: err,
        })
    }

    async fn write_atomic(&self, token: &AccessToken) -> Result<(), std::io::Error> {
        let tmp_path = self.temp_path();

        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(format!("{TOKEN_KEY}={}\n", token.access_token).as_bytes())
            .await?;
        file.sync_all().await?;
        drop(file);

        // The token grants API access; keep it out of other users' reach.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        if let Err(err) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err);
        }

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| TOKEN_KEY.to_ascii_lowercase());
        self.path.with_file_name(format!("{file_name}.tmp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_at(dir: &tempfile::TempDir, name: &str) -> TokenStore {
        TokenStore::new(dir.path().join(name))
    }

    #[tokio::test]
    async fn load_returns_none_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, ".env.xbat");
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, ".env.xbat");

        store.save(&AccessToken::new("abc123")).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(AccessToken::new("abc123")));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "ACCESS_TOKEN=abc123\n");
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, ".env.xbat");

        store.save(&AccessToken::new("old")).await.unwrap();
        store.save(&AccessToken::new("new")).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "ACCESS_TOKEN=new\n");
    }

    #[tokio::test]
    async fn save_leaves_no_temporary_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, ".env.xbat");

        store.save(&AccessToken::new("abc123")).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec![".env.xbat".to_string()]);
    }

    #[tokio::test]
    async fn load_ignores_files_without_a_token_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, ".env.xbat");

        std::fs::write(store.path(), "SOME_OTHER_KEY=value\n").unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        std::fs::write(store.path(), "ACCESS_TOKEN=\n").unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn load_finds_the_token_among_other_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, ".env.xbat");

        std::fs::write(store.path(), "OTHER=1\nACCESS_TOKEN=tok\n").unwrap();
        assert_eq!(store.load().await.unwrap(), Some(AccessToken::new("tok")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn saved_file_is_owner_readable_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, ".env.xbat");
        store.save(&AccessToken::new("abc123")).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
