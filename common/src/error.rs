//! エラー型定義

use thiserror::Error;

/// 入力チェックエラー（I/O前に処理を打ち切る）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please complete all required fields.")]
    MissingRequiredFields,

    #[error("Please confirm you agree to the terms and conditions.")]
    TermsNotAccepted,
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
