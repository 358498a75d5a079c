//! 同意書の入力データ型
//!
//! フォーム入力（[`ConsentForm`]）・撮影者プロフィール（[`PhotographerProfile`]）と、
//! 両者を突き合わせた描画用スナップショット（[`MergedDocumentData`]）。

use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};

/// 値が空白以外の文字を含むか
pub fn has_text(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// フォーム入力
///
/// 必須: `full_name` / `email` / `phone` / `session_date` と `accept_terms = true`。
/// 必須項目は空文字で読み込み、[`ConsentForm::validate`] で弾く。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub session_date: String,
    pub signature: String,
    pub notes: Option<String>,

    #[serde(deserialize_with = "checked")]
    pub accept_terms: bool,
    #[serde(deserialize_with = "checked")]
    pub usage_portfolio: bool,
    #[serde(deserialize_with = "checked")]
    pub usage_web: bool,
    #[serde(deserialize_with = "checked")]
    pub usage_publishers: bool,

    // SNSアカウント
    pub fabswinger: Option<String>,
    pub spicymatch: Option<String>,
    pub instagram: Option<String>,

    // 撮影者情報（空ならプロフィールで補完）
    pub photographer_name: Option<String>,
    pub business_name: Option<String>,
    pub photographer_email: Option<String>,
    pub photographer_phone: Option<String>,
    pub photographer_instagram: Option<String>,
}

/// チェックボックス値: bool、またはHTMLフォーム由来の文字列（"on" 等）
fn checked<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checked {
        Flag(bool),
        Text(String),
    }

    Ok(match Option::<Checked>::deserialize(deserializer)? {
        Some(Checked::Flag(flag)) => flag,
        Some(Checked::Text(text)) => {
            let text = text.trim();
            !text.is_empty() && !text.eq_ignore_ascii_case("false") && text != "0"
        }
        None => false,
    })
}

impl ConsentForm {
    /// フォーム入力JSONを読む
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 必須項目と規約同意のチェック
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [&self.full_name, &self.email, &self.phone, &self.session_date];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(ValidationError::MissingRequiredFields);
        }
        if !self.accept_terms {
            return Err(ValidationError::TermsNotAccepted);
        }
        Ok(())
    }

    /// 署名が空なら氏名を署名として使う
    pub fn with_default_signature(mut self) -> Self {
        if self.signature.trim().is_empty() {
            self.signature = self.full_name.clone();
        }
        self
    }

    /// いずれかのSNSアカウントが入力されているか
    pub fn has_social_handle(&self) -> bool {
        [&self.fabswinger, &self.spicymatch, &self.instagram]
            .iter()
            .any(|v| has_text(v.as_deref()))
    }
}

/// 撮影者プロフィール（photographer.json）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotographerProfile {
    #[serde(rename = "photographerName")]
    pub photographer_name: Option<String>,
    #[serde(rename = "businessName")]
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    #[serde(rename = "Instagram")]
    pub instagram: Option<String>,
}

impl PhotographerProfile {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 統合ルール
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    /// SNSアカウントがあれば「Web・SNSでの使用」をオンとみなす
    pub infer_web_use_from_handles: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            infer_web_use_from_handles: true,
        }
    }
}

/// 描画用データ（フォーム + プロフィール補完）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedDocumentData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub session_date: String,
    pub signature: String,
    pub notes: String,

    pub usage_portfolio: bool,
    pub usage_web: bool,
    pub usage_publishers: bool,

    pub fabswinger: String,
    pub spicymatch: String,
    pub instagram: String,

    pub photographer_name: String,
    pub business_name: String,
    pub photographer_email: String,
    pub photographer_phone: String,
    pub photographer_instagram: String,
}

/// フォーム値を優先し、空ならプロフィール値
fn prefer(form: Option<&str>, profile: Option<&str>) -> String {
    [form, profile]
        .into_iter()
        .flatten()
        .find(|v| has_text(Some(*v)))
        .unwrap_or_default()
        .to_string()
}

fn text_or_empty(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl MergedDocumentData {
    pub fn merge(form: &ConsentForm, profile: &PhotographerProfile, policy: MergePolicy) -> Self {
        let usage_web = form.usage_web
            || (policy.infer_web_use_from_handles && form.has_social_handle());

        Self {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            session_date: form.session_date.clone(),
            signature: form.signature.clone(),
            notes: text_or_empty(form.notes.as_deref()),

            usage_portfolio: form.usage_portfolio,
            usage_web,
            usage_publishers: form.usage_publishers,

            fabswinger: text_or_empty(form.fabswinger.as_deref()),
            spicymatch: text_or_empty(form.spicymatch.as_deref()),
            instagram: text_or_empty(form.instagram.as_deref()),

            photographer_name: prefer(
                form.photographer_name.as_deref(),
                profile.photographer_name.as_deref(),
            ),
            business_name: prefer(form.business_name.as_deref(), profile.business_name.as_deref()),
            photographer_email: prefer(form.photographer_email.as_deref(), profile.email.as_deref()),
            photographer_phone: prefer(
                form.photographer_phone.as_deref(),
                profile.telephone.as_deref(),
            ),
            photographer_instagram: prefer(
                form.photographer_instagram.as_deref(),
                profile.instagram.as_deref(),
            ),
        }
    }
}
