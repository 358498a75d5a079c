//! 同意書の保存・送信フロー
//!
//! 送信: 入力チェック → 保存先の初期化 → PDF生成 → `consent forms/<日付>/` へ書き出し

use crate::clock::Clock;
use crate::error::{FolderError, Result, StoreError};
use crate::export::{CanvasProvider, ConsentPdfGenerator};
use crate::folder::{write_file, DirectoryAccess, DirectoryHandle, FolderManager, FolderOutcome};
use crate::status::StatusEvent;
use consent_forms_common::naming::{consent_file_name, CONSENT_FOLDER_NAME};
use consent_forms_common::{ConsentForm, ValidationError};
use std::path::PathBuf;

pub const MSG_FOLDER_NOT_CONFIGURED: &str = "Save folder not configured.";
pub const MSG_PERMISSION_DENIED: &str = "Folder permission denied. Please reselect the save folder.";
pub const MSG_DATE_FOLDER_FAILED: &str = "Could not create date folder.";
pub const MSG_CHOOSE_FOLDER: &str = "Save folder not configured. Please choose a folder on setup.";

/// フォーム入力JSONを読む（空の署名は氏名で補う）
pub fn parse_form(json: &str) -> Result<ConsentForm> {
    Ok(ConsentForm::from_json(json)?.with_default_signature())
}

/// 1回の保存の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResult {
    Saved {
        filename: String,
        path: PathBuf,
        /// 実際に書き込んだ日付フォルダ名
        date_folder: String,
    },
    Failed { message: String },
}

impl SaveResult {
    fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// 送信の結果
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// 入力不備（I/Oは一切行っていない）
    Invalid(ValidationError),
    /// 保存先が使えない
    FolderUnavailable(FolderOutcome),
    Saved {
        filename: String,
        path: PathBuf,
        date_folder: String,
    },
    Failed { message: String },
}

impl SubmitOutcome {
    /// 表示用メッセージ
    pub fn status(&self) -> StatusEvent {
        match self {
            Self::Invalid(e) => StatusEvent::error(e.to_string()),
            Self::FolderUnavailable(_) => StatusEvent::error(MSG_CHOOSE_FOLDER),
            Self::Saved {
                filename,
                date_folder,
                ..
            } => StatusEvent::success(format!(
                "Saved {} in {}/{}.",
                filename, CONSENT_FOLDER_NAME, date_folder
            )),
            Self::Failed { message } => StatusEvent::error(message.clone()),
        }
    }
}

/// 生成と保存先をまとめたもの
pub struct ConsentWorkflow<P, A, C> {
    generator: ConsentPdfGenerator<P>,
    folders: FolderManager<A, C>,
}

impl<P: CanvasProvider, A: DirectoryAccess, C: Clock> ConsentWorkflow<P, A, C> {
    pub fn new(generator: ConsentPdfGenerator<P>, folders: FolderManager<A, C>) -> Self {
        Self { generator, folders }
    }

    pub fn folders(&self) -> &FolderManager<A, C> {
        &self.folders
    }

    pub fn folders_mut(&mut self) -> &mut FolderManager<A, C> {
        &mut self.folders
    }

    /// 指定フォルダの当日フォルダへ同意書を保存
    ///
    /// 失敗はすべて [`SaveResult::Failed`] として返す。
    pub async fn save_to_folder(
        &self,
        form: &ConsentForm,
        consent_folder: Option<&DirectoryHandle>,
    ) -> SaveResult {
        let Some(consent_folder) = consent_folder else {
            return SaveResult::failed(MSG_FOLDER_NOT_CONFIGURED);
        };

        match self.try_save(form, consent_folder).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("consent save failed: {}", e);
                SaveResult::failed(format!("Save failed: {} {}", e.kind(), e))
            }
        }
    }

    async fn try_save(
        &self,
        form: &ConsentForm,
        consent_folder: &DirectoryHandle,
    ) -> Result<SaveResult> {
        if !self.folders.check_permission(consent_folder).await? {
            return Ok(SaveResult::failed(MSG_PERMISSION_DENIED));
        }

        // 日付フォルダとファイル名は同じ時刻から作る
        let now = self.folders.now();
        let date_folder = match self.folders.ensure_date_folder_at(consent_folder, now).await {
            Ok(folder) => folder,
            Err(FolderError::PermissionDenied(path)) => {
                log::warn!("date folder creation denied in {}", path);
                return Ok(SaveResult::failed(MSG_PERMISSION_DENIED));
            }
            Err(e) => {
                log::warn!("date folder unavailable: {}", e);
                return Ok(SaveResult::failed(MSG_DATE_FOLDER_FAILED));
            }
        };

        let filename = consent_file_name(&form.full_name, now);
        // 生成に失敗したら空ファイルを残さない
        let document = self.generator.generate(form).await?;
        let path = write_file(
            self.folders.access(),
            &date_folder,
            &filename,
            &document.bytes,
        )
        .await?;

        log::info!("saved consent form to {}", path.display());
        Ok(SaveResult::Saved {
            filename,
            path,
            date_folder: date_folder.name().to_string(),
        })
    }

    /// 送信処理
    ///
    /// ストアの構造的エラーのみ `Err` になる。
    pub async fn submit(&mut self, form: ConsentForm) -> std::result::Result<SubmitOutcome, StoreError> {
        let form = form.with_default_signature();
        if let Err(e) = form.validate() {
            return Ok(SubmitOutcome::Invalid(e));
        }

        let outcome = self.folders.initialize().await?;
        let Some(handle) = outcome.handle.clone() else {
            return Ok(SubmitOutcome::FolderUnavailable(outcome));
        };

        Ok(match self.save_to_folder(&form, Some(&handle)).await {
            SaveResult::Saved {
                filename,
                path,
                date_folder,
            } => SubmitOutcome::Saved {
                filename,
                path,
                date_folder,
            },
            SaveResult::Failed { message } => SubmitOutcome::Failed { message },
        })
    }
}
