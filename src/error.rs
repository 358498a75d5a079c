use thiserror::Error;

/// ハンドル保存ストアの構造的エラー（呼び出し元へそのまま伝播する）
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("handle store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("handle store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("handle store version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// フォルダ操作エラー（ライフサイクル境界で「ハンドルなし」に変換される）
#[derive(Error, Debug)]
pub enum FolderError {
    #[error("permission to {0} was denied")]
    PermissionDenied(String),

    #[error("{0} could not be found")]
    NotFound(String),

    #[error("{0} is not a directory")]
    NotADirectory(String),

    #[error("invalid directory name: {0:?}")]
    InvalidName(String),

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),
}

/// フォルダ選択の中断
#[derive(Error, Debug)]
pub enum PickError {
    #[error("selection was cancelled")]
    Cancelled,

    #[error("Folder saving is not supported in this environment.")]
    Unsupported,

    #[error("selection was blocked: {0}")]
    Blocked(String),
}

/// アセット取得エラー（プロフィール・ロゴとも握りつぶして縮退する）
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("asset request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid asset URL: {0}")]
    Url(String),

    #[error("asset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConsentError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] consent_forms_common::Error),

    #[error("PDF library not loaded.")]
    RendererUnavailable,

    #[error("PDF generation failed: {0}")]
    PdfGeneration(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Folder(#[from] FolderError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsentError {
    /// エラー種別名（保存失敗メッセージの先頭に付ける）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Common(consent_forms_common::Error::Validation(_)) => "ValidationError",
            Self::Common(_) | Self::JsonParse(_) => "JsonError",
            Self::RendererUnavailable => "RendererUnavailableError",
            Self::PdfGeneration(_) => "PdfGenerationError",
            Self::Store(_) => "StorageTransactionError",
            Self::Folder(FolderError::PermissionDenied(_)) => "PermissionError",
            Self::Folder(FolderError::NotFound(_)) => "NotFoundError",
            Self::Folder(_) => "FolderError",
            Self::Asset(_) => "NetworkFetchError",
            Self::Io(_) => "IoError",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsentError>;
