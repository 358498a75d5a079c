//! 保存先フォルダのライフサイクル管理
//!
//! 状態遷移: Uninitialized → NoHandle → PermissionDenied → Ready（途中の失敗は Error）
//!
//! - `initialize`: 保存済みハンドルを読み、権限を確認し、当日フォルダを用意する
//! - `pick_new`: フォルダを選び直し、`consent forms` フォルダを用意して保存する
//!
//! フォルダ操作の失敗はすべて「ハンドルなし」の結果として返す。
//! ストアの構造的エラーだけは `Err` で伝播する。

pub mod handle;
pub mod picker;
pub mod store;

pub use handle::{
    write_file, AccessMode, DirectoryAccess, DirectoryHandle, LocalDirectoryAccess,
    PermissionState, WritableFile,
};
pub use picker::{DirectoryPicker, FixedPicker, PromptPicker};
pub use store::{HandleStore, Transaction, TxMode};

use crate::clock::{Clock, SystemClock};
use crate::error::{FolderError, PickError, StoreError};
use crate::status::StatusEvent;
use consent_forms_common::naming::{date_folder_name, CONSENT_FOLDER_NAME};

/// ストア上のハンドルのキー
pub const CONSENT_HANDLE_KEY: &str = "consent-directory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderState {
    Uninitialized,
    NoHandle,
    PermissionDenied,
    Ready,
    Error(String),
}

/// ライフサイクル操作の結果
#[derive(Debug, Clone)]
pub struct FolderOutcome {
    pub state: FolderState,
    /// 使用可能な `consent forms` フォルダ（Ready のときのみ）
    pub handle: Option<DirectoryHandle>,
    /// 当日フォルダ（Ready のときのみ）
    pub date_folder: Option<DirectoryHandle>,
    pub status: StatusEvent,
}

impl FolderOutcome {
    fn unusable(state: FolderState, status: StatusEvent) -> Self {
        Self {
            state,
            handle: None,
            date_folder: None,
            status,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == FolderState::Ready
    }
}

pub struct FolderManager<A, C = SystemClock> {
    store: HandleStore,
    access: A,
    clock: C,
    state: FolderState,
}

impl<A: DirectoryAccess, C: Clock> FolderManager<A, C> {
    pub fn new(store: HandleStore, access: A, clock: C) -> Self {
        Self {
            store,
            access,
            clock,
            state: FolderState::Uninitialized,
        }
    }

    pub fn state(&self) -> &FolderState {
        &self.state
    }

    pub fn access(&self) -> &A {
        &self.access
    }

    pub fn store(&self) -> &HandleStore {
        &self.store
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// 当日フォルダ名（呼び出しごとに再計算）
    pub fn today_folder_name(&self) -> String {
        date_folder_name(self.clock.now())
    }

    /// 書き込み権限の確認（query で未許可なら request）
    pub async fn check_permission(&self, handle: &DirectoryHandle) -> Result<bool, FolderError> {
        let mode = AccessMode::ReadWrite;
        if self.access.query_permission(handle, mode).await? == PermissionState::Granted {
            return Ok(true);
        }
        Ok(self.access.request_permission(handle, mode).await? == PermissionState::Granted)
    }

    /// 当日フォルダを用意（既にあればそれを返す）
    pub async fn ensure_date_folder(
        &self,
        handle: &DirectoryHandle,
    ) -> Result<DirectoryHandle, FolderError> {
        self.ensure_date_folder_at(handle, self.clock.now()).await
    }

    /// `now` の日付のフォルダを用意
    pub async fn ensure_date_folder_at(
        &self,
        handle: &DirectoryHandle,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<DirectoryHandle, FolderError> {
        self.access
            .get_directory(handle, &date_folder_name(now), true)
            .await
    }

    fn saving_to(date_folder: &DirectoryHandle) -> StatusEvent {
        StatusEvent::success(format!(
            "Saving to: {}/{}",
            CONSENT_FOLDER_NAME,
            date_folder.name()
        ))
    }

    fn finish(&mut self, outcome: FolderOutcome) -> FolderOutcome {
        self.state = outcome.state.clone();
        outcome
    }

    pub async fn initialize(&mut self) -> Result<FolderOutcome, StoreError> {
        let stored = match self.store.get(CONSENT_HANDLE_KEY).await {
            Ok(stored) => stored,
            Err(e) => {
                self.state = FolderState::Error(e.to_string());
                return Err(e);
            }
        };

        let Some(handle) = stored else {
            log::info!("no consent folder stored");
            return Ok(self.finish(FolderOutcome::unusable(
                FolderState::NoHandle,
                StatusEvent::success("No save folder selected."),
            )));
        };

        let outcome = match self.prepare(&handle).await {
            Ok(Some(date_folder)) => FolderOutcome {
                state: FolderState::Ready,
                handle: Some(handle),
                status: Self::saving_to(&date_folder),
                date_folder: Some(date_folder),
            },
            Ok(None) => FolderOutcome::unusable(
                FolderState::PermissionDenied,
                StatusEvent::error("Permission needed to access save folder."),
            ),
            Err(e) => {
                log::warn!("stored consent folder unusable: {}", e);
                FolderOutcome::unusable(
                    FolderState::Error(e.to_string()),
                    StatusEvent::error("Could not access saved folder."),
                )
            }
        };
        Ok(self.finish(outcome))
    }

    /// 権限確認 → 当日フォルダ作成。権限がなければ `Ok(None)`
    ///
    /// 確認後に作成が拒否された場合も権限なしとして扱う。
    async fn prepare(
        &self,
        handle: &DirectoryHandle,
    ) -> Result<Option<DirectoryHandle>, FolderError> {
        if !self.check_permission(handle).await? {
            return Ok(None);
        }
        match self.ensure_date_folder(handle).await {
            Ok(date_folder) => Ok(Some(date_folder)),
            Err(FolderError::PermissionDenied(path)) => {
                log::warn!("date folder creation denied in {}", path);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn pick_new<P: DirectoryPicker>(
        &mut self,
        picker: &P,
    ) -> Result<FolderOutcome, StoreError> {
        let root = match picker.pick().await {
            Ok(root) => root,
            Err(PickError::Unsupported) => {
                return Ok(self.finish(FolderOutcome::unusable(
                    FolderState::NoHandle,
                    StatusEvent::error(PickError::Unsupported.to_string()),
                )))
            }
            Err(e) => return Ok(self.finish(Self::selection_failed(&e))),
        };

        let consent_folder = if root.name().to_lowercase() == CONSENT_FOLDER_NAME {
            root
        } else {
            match self.access.get_directory(&root, CONSENT_FOLDER_NAME, true).await {
                Ok(folder) => folder,
                Err(e) => return Ok(self.finish(Self::selection_failed(&e))),
            }
        };

        if let Err(e) = self.store.put(CONSENT_HANDLE_KEY, &consent_folder).await {
            self.state = FolderState::Error(e.to_string());
            return Err(e);
        }
        log::info!("consent folder set to {}", consent_folder.path().display());

        let outcome = match self.prepare(&consent_folder).await {
            Ok(Some(date_folder)) => FolderOutcome {
                state: FolderState::Ready,
                handle: Some(consent_folder),
                status: Self::saving_to(&date_folder),
                date_folder: Some(date_folder),
            },
            Ok(None) => FolderOutcome::unusable(
                FolderState::PermissionDenied,
                StatusEvent::error("Permission needed to access save folder."),
            ),
            Err(e) => Self::selection_failed(&e),
        };
        Ok(self.finish(outcome))
    }

    fn selection_failed(reason: &dyn std::fmt::Display) -> FolderOutcome {
        let message = format!("Folder selection cancelled or blocked. {}", reason);
        FolderOutcome::unusable(
            FolderState::NoHandle,
            StatusEvent::error(message.trim().to_string()),
        )
    }
}
