//! ディレクトリハンドルとアクセス権
//!
//! [`DirectoryHandle`] は保存可能な参照にすぎず、使うたびに
//! [`DirectoryAccess`] で権限を確認し直す。

use crate::error::FolderError;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// ディレクトリへの参照（ストアにそのまま保存できる）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryHandle {
    name: String,
    path: PathBuf,
}

impl DirectoryHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    /// 表示名（最後のパス要素）
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// 要求すれば許可される可能性がある
    Prompt,
}

/// ディレクトリ操作の能力
///
/// 権限確認・サブディレクトリ取得・書き込みストリーム生成をまとめたもの。
#[allow(async_fn_in_trait)]
pub trait DirectoryAccess {
    async fn query_permission(
        &self,
        dir: &DirectoryHandle,
        mode: AccessMode,
    ) -> Result<PermissionState, FolderError>;

    async fn request_permission(
        &self,
        dir: &DirectoryHandle,
        mode: AccessMode,
    ) -> Result<PermissionState, FolderError>;

    /// 子ディレクトリを取得（`create` なら無ければ作成）
    async fn get_directory(
        &self,
        parent: &DirectoryHandle,
        name: &str,
        create: bool,
    ) -> Result<DirectoryHandle, FolderError>;

    async fn create_writable(
        &self,
        dir: &DirectoryHandle,
        file_name: &str,
    ) -> Result<WritableFile, FolderError>;
}

/// 1階層分の名前として使えるか
fn validate_entry_name(name: &str) -> Result<(), FolderError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        Err(FolderError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

/// ローカルファイルシステム
#[derive(Debug, Clone, Default)]
pub struct LocalDirectoryAccess {
    /// 権限がない場合に対話で再確認する
    pub interactive: bool,
}

impl LocalDirectoryAccess {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }

    async fn permission_of(
        &self,
        dir: &DirectoryHandle,
        mode: AccessMode,
    ) -> Result<PermissionState, FolderError> {
        let metadata = match tokio::fs::metadata(dir.path()).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FolderError::NotFound(dir.path().display().to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Ok(PermissionState::Denied)
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_dir() {
            return Err(FolderError::NotADirectory(dir.path().display().to_string()));
        }

        match mode {
            AccessMode::Read => Ok(PermissionState::Granted),
            AccessMode::ReadWrite => check_writable(dir.path()).await,
        }
    }
}

/// 実際に一時ファイルを作って書き込めるか確かめる
///
/// モードビットだけでは所有者・ACL・読み取り専用マウントを判断できない。
async fn check_writable(dir: &Path) -> Result<PermissionState, FolderError> {
    let dir_buf = dir.to_path_buf();
    let attempt = tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix(".consent-access-")
            .tempfile_in(&dir_buf)
            .map(drop)
    })
    .await
    .map_err(|e| FolderError::Io(io::Error::new(io::ErrorKind::Other, e)))?;

    match attempt {
        Ok(()) => Ok(PermissionState::Granted),
        Err(e) if is_access_denied(&e) => Ok(PermissionState::Denied),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(FolderError::NotFound(dir.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// EACCES / EPERM / EROFS
fn is_access_denied(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem
    )
}

impl DirectoryAccess for LocalDirectoryAccess {
    async fn query_permission(
        &self,
        dir: &DirectoryHandle,
        mode: AccessMode,
    ) -> Result<PermissionState, FolderError> {
        self.permission_of(dir, mode).await
    }

    async fn request_permission(
        &self,
        dir: &DirectoryHandle,
        mode: AccessMode,
    ) -> Result<PermissionState, FolderError> {
        let state = self.permission_of(dir, mode).await?;
        if state == PermissionState::Granted || !self.interactive {
            return Ok(state);
        }

        let prompt = format!(
            "{} への書き込み権限がありません。権限を付与してから再確認しますか？",
            dir.path().display()
        );
        let retry = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(true)
                .interact()
                .unwrap_or(false)
        })
        .await
        .unwrap_or(false);

        if retry {
            self.permission_of(dir, mode).await
        } else {
            Ok(PermissionState::Denied)
        }
    }

    async fn get_directory(
        &self,
        parent: &DirectoryHandle,
        name: &str,
        create: bool,
    ) -> Result<DirectoryHandle, FolderError> {
        validate_entry_name(name)?;
        if !tokio::fs::try_exists(parent.path()).await? {
            return Err(FolderError::NotFound(parent.path().display().to_string()));
        }

        let path = parent.path().join(name);
        match tokio::fs::metadata(&path).await {
            Ok(m) if m.is_dir() => return Ok(DirectoryHandle::new(path)),
            Ok(_) => return Err(FolderError::NotADirectory(path.display().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if !create {
            return Err(FolderError::NotFound(path.display().to_string()));
        }

        match tokio::fs::create_dir(&path).await {
            Ok(()) => log::info!("created directory {}", path.display()),
            // 同時作成は成功扱い
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) if is_access_denied(&e) => {
                return Err(FolderError::PermissionDenied(parent.path().display().to_string()))
            }
            Err(e) => return Err(e.into()),
        }
        Ok(DirectoryHandle::new(path))
    }

    async fn create_writable(
        &self,
        dir: &DirectoryHandle,
        file_name: &str,
    ) -> Result<WritableFile, FolderError> {
        validate_entry_name(file_name)?;
        Ok(WritableFile::create(dir.path().join(file_name)).await?)
    }
}

/// 書き込みストリーム
///
/// 一時ファイル（`<name>.crswap`）に書き、[`WritableFile::close`] で本来の名前へ移す。
/// close せずに破棄した場合は一時ファイルを削除する。
#[derive(Debug)]
pub struct WritableFile {
    target: PathBuf,
    swap: PathBuf,
    file: Option<tokio::fs::File>,
}

impl WritableFile {
    pub async fn create(target: PathBuf) -> io::Result<Self> {
        let mut swap = target.clone().into_os_string();
        swap.push(".crswap");
        let swap = PathBuf::from(swap);
        let file = tokio::fs::File::create(&swap).await?;
        Ok(Self {
            target,
            swap,
            file: Some(file),
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stream already closed"))?;
        file.write_all(bytes).await
    }

    /// 書き込みを確定する
    pub async fn close(mut self) -> io::Result<PathBuf> {
        if let Some(mut file) = self.file.take() {
            let flushed = async {
                file.flush().await?;
                file.sync_all().await
            }
            .await;
            drop(file);
            if let Err(e) = flushed {
                let _ = tokio::fs::remove_file(&self.swap).await;
                return Err(e);
            }
        }

        if let Err(e) = tokio::fs::rename(&self.swap, &self.target).await {
            let _ = tokio::fs::remove_file(&self.swap).await;
            return Err(e);
        }
        Ok(self.target.clone())
    }

    /// 書き込みを破棄する
    pub async fn abort(mut self) -> io::Result<()> {
        if let Some(file) = self.file.take() {
            drop(file);
            tokio::fs::remove_file(&self.swap).await?;
        }
        Ok(())
    }
}

impl Drop for WritableFile {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            let _ = std::fs::remove_file(&self.swap);
        }
    }
}

/// ファイルを書き出して必ず close/abort する
pub async fn write_file<A: DirectoryAccess>(
    access: &A,
    dir: &DirectoryHandle,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, FolderError> {
    let mut writable = access.create_writable(dir, file_name).await?;
    if let Err(e) = writable.write(bytes).await {
        if let Err(abort_err) = writable.abort().await {
            log::warn!("failed to discard partial write: {}", abort_err);
        }
        return Err(e.into());
    }
    Ok(writable.close().await?)
}
