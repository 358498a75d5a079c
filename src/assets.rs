//! アセット取得（撮影者プロフィール・ロゴ）
//!
//! 取得元はローカルディレクトリかHTTP(S)。
//! 失敗してもエラーにはせず、空プロフィール / ロゴなしで続行する。

use crate::error::AssetError;
use consent_forms_common::PhotographerProfile;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Url;
use std::path::PathBuf;

pub const DEFAULT_PROFILE_PATH: &str = "photographer.json";
pub const DEFAULT_LOGO_PATH: &str = "assets/logo_trans.png";

#[derive(Debug, Clone)]
pub enum AssetSource {
    Local(PathBuf),
    Remote(Url),
}

impl AssetSource {
    /// `http://` / `https://` で始まればリモート、それ以外はディレクトリ
    pub fn parse(base: &str) -> Result<Self, AssetError> {
        let lower = base.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            // 相対パスを連結できるよう末尾を `/` にそろえる
            let normalized = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{}/", base)
            };
            let url = Url::parse(&normalized).map_err(|e| AssetError::Url(e.to_string()))?;
            Ok(Self::Remote(url))
        } else {
            Ok(Self::Local(PathBuf::from(base)))
        }
    }

    /// 相対パスのアセットを取得（キャッシュを使わない）
    pub async fn fetch(&self, relative: &str) -> Result<Vec<u8>, AssetError> {
        match self {
            Self::Local(dir) => Ok(tokio::fs::read(dir.join(relative)).await?),
            Self::Remote(base) => {
                let url = base
                    .join(relative)
                    .map_err(|e| AssetError::Url(e.to_string()))?;
                let response = reqwest::Client::new()
                    .get(url)
                    .header(CACHE_CONTROL, "no-cache")
                    .header(PRAGMA, "no-cache")
                    .send()
                    .await?
                    .error_for_status()?;
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

/// 同意書生成に使うアセット一式
#[derive(Debug, Clone)]
pub struct Assets {
    pub source: AssetSource,
    pub profile_path: String,
    pub logo_path: String,
}

impl Assets {
    pub fn new(source: AssetSource) -> Self {
        Self {
            source,
            profile_path: DEFAULT_PROFILE_PATH.to_string(),
            logo_path: DEFAULT_LOGO_PATH.to_string(),
        }
    }

    async fn try_fetch_profile(&self) -> Result<PhotographerProfile, AssetError> {
        let bytes = self.source.fetch(&self.profile_path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// 撮影者プロフィール（取得できなければ空）
    pub async fn fetch_profile(&self) -> PhotographerProfile {
        match self.try_fetch_profile().await {
            Ok(profile) => profile,
            Err(e) => {
                log::debug!("photographer profile unavailable: {}", e);
                PhotographerProfile::default()
            }
        }
    }

    /// ロゴ画像のバイト列（取得できなければ `None`）
    pub async fn fetch_logo(&self) -> Option<Vec<u8>> {
        match self.source.fetch(&self.logo_path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("logo unavailable: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_source() {
        assert!(matches!(AssetSource::parse("./site").unwrap(), AssetSource::Local(_)));
        match AssetSource::parse("https://example.com/consent").unwrap() {
            AssetSource::Remote(url) => {
                assert_eq!(
                    url.join("photographer.json").unwrap().as_str(),
                    "https://example.com/consent/photographer.json"
                );
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_profile_from_local_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("photographer.json"),
            r#"{"photographerName":"Sam Lens","telephone":"01234 567890"}"#,
        )
        .unwrap();

        let assets = Assets::new(AssetSource::Local(dir.path().to_path_buf()));
        let profile = assets.fetch_profile().await;
        assert_eq!(profile.photographer_name.as_deref(), Some("Sam Lens"));
        assert_eq!(profile.telephone.as_deref(), Some("01234 567890"));
    }

    #[tokio::test]
    async fn test_missing_assets_degrade() {
        let dir = tempdir().unwrap();
        let assets = Assets::new(AssetSource::Local(dir.path().to_path_buf()));
        assert!(assets.fetch_profile().await.is_empty());
        assert!(assets.fetch_logo().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_profile_degrades() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("photographer.json"), "<html>").unwrap();
        let assets = Assets::new(AssetSource::Local(dir.path().to_path_buf()));
        assert!(assets.fetch_profile().await.is_empty());
    }
}
