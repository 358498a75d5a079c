//! 保存先フォルダの選択

use super::handle::DirectoryHandle;
use crate::error::PickError;
use std::path::{Path, PathBuf};

/// ユーザーにディレクトリを選ばせるもの
#[allow(async_fn_in_trait)]
pub trait DirectoryPicker {
    async fn pick(&self) -> Result<DirectoryHandle, PickError>;
}

fn resolve_directory(path: &Path) -> Result<DirectoryHandle, PickError> {
    let resolved = path
        .canonicalize()
        .map_err(|e| PickError::Blocked(format!("{}: {}", path.display(), e)))?;
    if !resolved.is_dir() {
        return Err(PickError::Blocked(format!(
            "{} is not a directory",
            resolved.display()
        )));
    }
    Ok(DirectoryHandle::new(resolved))
}

/// 引数で指定済みのフォルダ
#[derive(Debug, Clone)]
pub struct FixedPicker {
    path: PathBuf,
}

impl FixedPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DirectoryPicker for FixedPicker {
    async fn pick(&self) -> Result<DirectoryHandle, PickError> {
        resolve_directory(&self.path)
    }
}

/// 対話入力でフォルダを選ぶ（空入力はキャンセル）
#[derive(Debug, Clone, Default)]
pub struct PromptPicker;

impl DirectoryPicker for PromptPicker {
    async fn pick(&self) -> Result<DirectoryHandle, PickError> {
        let answer = tokio::task::spawn_blocking(|| {
            dialoguer::Input::<String>::new()
                .with_prompt("保存先フォルダのパス（空でキャンセル）")
                .allow_empty(true)
                .interact_text()
        })
        .await
        .map_err(|e| PickError::Blocked(e.to_string()))?
        .map_err(|_| PickError::Unsupported)?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(PickError::Cancelled);
        }
        resolve_directory(Path::new(answer))
    }
}
