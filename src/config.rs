use crate::assets::{AssetSource, Assets, DEFAULT_LOGO_PATH, DEFAULT_PROFILE_PATH};
use crate::error::{ConsentError, Result};
use consent_forms_common::MergePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// アセット取得元を上書きする環境変数
pub const ASSETS_ENV: &str = "CONSENT_FORMS_ASSETS";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// アセットのディレクトリまたは http(s) URL
    pub asset_base: String,
    pub profile_path: String,
    pub logo_path: String,
    /// ハンドル保存ストア（未指定ならデータディレクトリ配下）
    pub store_path: Option<PathBuf>,
    pub infer_web_use_from_handles: bool,
    pub interactive_permissions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_base: ".".into(),
            profile_path: DEFAULT_PROFILE_PATH.into(),
            logo_path: DEFAULT_LOGO_PATH.into(),
            store_path: None,
            infer_web_use_from_handles: true,
            interactive_permissions: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        // 環境変数を優先
        if let Ok(base) = std::env::var(ASSETS_ENV) {
            if !base.trim().is_empty() {
                config.asset_base = base;
            }
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConsentError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("consent-forms").join("config.json"))
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let data = dirs::data_dir()
            .ok_or_else(|| ConsentError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("consent-forms").join("handles.json"))
    }

    pub fn assets(&self) -> Result<Assets> {
        let mut assets = Assets::new(AssetSource::parse(&self.asset_base)?);
        assets.profile_path = self.profile_path.clone();
        assets.logo_path = self.logo_path.clone();
        Ok(assets)
    }

    pub fn merge_policy(&self) -> MergePolicy {
        MergePolicy {
            infer_web_use_from_handles: self.infer_web_use_from_handles,
        }
    }

    pub fn set_asset_base(&mut self, base: String) -> Result<()> {
        AssetSource::parse(&base)?;
        self.asset_base = base;
        self.save()
    }
}
