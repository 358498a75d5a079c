//! レイアウト設定モジュール
//!
//! pt基準のページ・本文レイアウト定義（Source of Truth）
//! 描画側（printpdf / 記録キャンバス）はすべてここの値を参照する

// ============================================
// ページ寸法（pt）
// ============================================

/// A4縦（pt）
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

/// 余白（pt）
pub const MARGIN_PT: f32 = 48.0;

/// 本文幅（pt）
pub const CONTENT_WIDTH_PT: f32 = PAGE_WIDTH_PT - MARGIN_PT * 2.0; // 499.28pt

// ============================================
// ヘッダー
// ============================================

/// ロゴ幅（高さはアスペクト比から算出）
pub const LOGO_WIDTH_PT: f32 = 90.0;
/// ロゴ下の余白。ロゴが使えない場合もこの分だけ進める
pub const LOGO_GAP_PT: f32 = 16.0;

pub const DOCUMENT_TITLE: &str = "Legal Consent Form";
pub const DOCUMENT_TITLE_SIZE: f32 = 18.0;
pub const DOCUMENT_TITLE_ADVANCE_PT: f32 = 24.0;
pub const DOCUMENT_TITLE_GAP_PT: f32 = 4.0;

// ============================================
// セクション・本文
// ============================================

pub const SECTION_TITLE_SIZE: f32 = 12.0;
/// セクション見出しの改ページ判定に必要な高さ
pub const SECTION_TITLE_RESERVE_PT: f32 = 20.0;
pub const SECTION_TITLE_ADVANCE_PT: f32 = 16.0;

pub const BODY_SIZE: f32 = 10.0;
/// 1行描画前の改ページ判定に必要な高さ
pub const LINE_RESERVE_PT: f32 = 14.0;
pub const LINE_ADVANCE_PT: f32 = 12.0;
/// グループ（行・チェックボックス・段落・箇条書き）後の間隔
pub const GROUP_GAP_PT: f32 = 6.0;

pub const BULLET_PREFIX: &str = "\u{2022} ";
pub const CHECKED_PREFIX: &str = "[x]";
pub const UNCHECKED_PREFIX: &str = "[ ]";

// ============================================
// 色
// ============================================

/// 正規化RGB（各成分 0.0〜1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// 範囲外の値は [0, 1] に丸める
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
}

/// タイトル色
pub const TITLE_COLOR: Rgb = Rgb { r: 0.98, g: 0.77, b: 0.38 };

// ============================================
// 変換係数
// ============================================

/// pt → mm変換 (1pt = 25.4/72 mm ≈ 0.353mm)
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * PT_TO_MM
}

/// ロゴの描画高さ（幅固定・アスペクト比維持）
pub fn logo_height_pt(pixel_width: u32, pixel_height: u32) -> f32 {
    if pixel_width == 0 {
        return 0.0;
    }
    pixel_height as f32 / pixel_width as f32 * LOGO_WIDTH_PT
}
