//! ハンドル保存ストア
//!
//! キー → [`DirectoryHandle`] をJSONファイルに永続化する。
//! 書き込みはトランザクション単位で、一時ファイルへの書き出し + rename により
//! 全部反映されるか全く反映されないかのどちらかになる。

use super::handle::DirectoryHandle;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// ストアファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    /// バージョン（互換性チェック用）
    version: u32,
    entries: BTreeMap<String, DirectoryHandle>,
}

impl StoreFile {
    const CURRENT_VERSION: u32 = 1;
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

/// 永続キー・バリューストア
#[derive(Debug, Clone)]
pub struct HandleStore {
    path: PathBuf,
}

impl HandleStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// トランザクション開始（現在の内容をスナップショットとして読む）
    pub async fn transaction(&self, mode: TxMode) -> Result<Transaction<'_>, StoreError> {
        let snapshot = self.load().await?;
        Ok(Transaction {
            store: self,
            mode,
            snapshot,
            dirty: false,
        })
    }

    /// 上書き保存（同じ値の再保存も可）
    pub async fn put(&self, key: &str, handle: &DirectoryHandle) -> Result<(), StoreError> {
        let mut tx = self.transaction(TxMode::ReadWrite).await?;
        tx.put(key, handle.clone())?;
        tx.commit().await
    }

    /// 値の取得（無ければ `None`）
    pub async fn get(&self, key: &str) -> Result<Option<DirectoryHandle>, StoreError> {
        let tx = self.transaction(TxMode::ReadOnly).await?;
        let value = tx.get(key).cloned();
        tx.commit().await?;
        Ok(value)
    }

    async fn load(&self) -> Result<StoreFile, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(e) => return Err(e.into()),
        };

        let file: StoreFile = serde_json::from_slice(&bytes)?;
        if file.version != StoreFile::CURRENT_VERSION {
            return Err(StoreError::Version {
                found: file.version,
                expected: StoreFile::CURRENT_VERSION,
            });
        }
        Ok(file)
    }

    async fn persist(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let content = serde_json::to_vec_pretty(file)?;
        if let Err(e) = write_synced(&tmp, &content).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// 内容をディスクまで同期してから返す（rename前に必須）
async fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await
}

/// ストアのトランザクション
///
/// `commit` しなければ変更は捨てられる。
#[derive(Debug)]
pub struct Transaction<'a> {
    store: &'a HandleStore,
    mode: TxMode,
    snapshot: StoreFile,
    dirty: bool,
}

impl<'a> Transaction<'a> {
    pub fn mode(&self) -> TxMode {
        self.mode
    }

    pub fn get(&self, key: &str) -> Option<&DirectoryHandle> {
        self.snapshot.entries.get(key)
    }

    pub fn put(&mut self, key: &str, handle: DirectoryHandle) -> Result<(), StoreError> {
        if self.mode == TxMode::ReadOnly {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "write in a read-only transaction",
            )));
        }
        self.snapshot.entries.insert(key.to_string(), handle);
        self.dirty = true;
        Ok(())
    }

    pub async fn commit(mut self) -> Result<(), StoreError> {
        if self.dirty {
            self.store.persist(&self.snapshot).await?;
            self.dirty = false;
        }
        Ok(())
    }

    pub fn rollback(mut self) {
        self.dirty = false;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.dirty {
            log::debug!("handle store transaction dropped without commit; changes discarded");
        }
    }
}
