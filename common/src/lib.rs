//! Consent Forms Common Library
//!
//! CLI・描画バックエンドで共有される型とユーティリティ
//! （フォーム型・セクション構成・折り返し・ページ寸法・命名規則）

pub mod types;
pub mod layout;
pub mod metrics;
pub mod text;
pub mod sections;
pub mod naming;
pub mod error;

pub use types::{ConsentForm, MergePolicy, MergedDocumentData, PhotographerProfile};
pub use metrics::{FontFace, FontMetrics, StandardFont};
pub use text::{sanitize, wrap_text};
pub use sections::{build_sections, consent_sections, Section};
pub use naming::{consent_file_name, date_folder_name, slugify, CONSENT_FOLDER_NAME};
pub use error::{Error, Result, ValidationError};
