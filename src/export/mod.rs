//! 同意書PDFの生成
//!
//! プロフィール取得 → セクション構成 → ロゴ取得 → 描画 の順で1文書を作る。

pub mod canvas;
pub mod pdf;

pub use canvas::{
    CanvasProvider, DrawOp, LogoImage, PdfCanvas, PrintPdfProvider, RecordingCanvas,
    RecordingProvider, TextStyle, UnavailableProvider,
};
pub use pdf::{render_document, RenderedDocument};

use crate::assets::Assets;
use crate::error::Result;
use consent_forms_common::{consent_sections, ConsentForm, MergePolicy};

/// 同意書PDFジェネレータ
#[derive(Debug, Clone)]
pub struct ConsentPdfGenerator<P> {
    provider: P,
    assets: Assets,
    policy: MergePolicy,
}

impl<P: CanvasProvider> ConsentPdfGenerator<P> {
    pub fn new(provider: P, assets: Assets, policy: MergePolicy) -> Self {
        Self {
            provider,
            assets,
            policy,
        }
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// フォームから文書を生成
    ///
    /// プロフィール・ロゴが取れなくても失敗にはしない。
    pub async fn generate(&self, form: &ConsentForm) -> Result<RenderedDocument> {
        let profile = self.assets.fetch_profile().await;
        let sections = consent_sections(form, &profile, self.policy);
        let logo = self.assets.fetch_logo().await;
        render_document(&self.provider, &sections, logo.as_deref())
    }
}
