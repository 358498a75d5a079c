use super::canvas::{CanvasProvider, LogoImage, PdfCanvas, TextStyle};
use crate::error::Result;
use consent_forms_common::layout::*;
use consent_forms_common::{sanitize, wrap_text, FontFace, Section, StandardFont};

/// 描画結果
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub logo_embedded: bool,
    /// 最終ページのカーソル位置（pt・下から）
    pub final_cursor: f32,
}

const BODY_STYLE: TextStyle = TextStyle {
    face: FontFace::Regular,
    size: BODY_SIZE,
    color: Rgb::BLACK,
};

const SECTION_TITLE_STYLE: TextStyle = TextStyle {
    face: FontFace::Bold,
    size: SECTION_TITLE_SIZE,
    color: Rgb::BLACK,
};

const DOCUMENT_TITLE_STYLE: TextStyle = TextStyle {
    face: FontFace::Bold,
    size: DOCUMENT_TITLE_SIZE,
    color: TITLE_COLOR,
};

/// ページと縦カーソル（1文書の描画中だけ存在する）
struct PageCursor<C: PdfCanvas> {
    canvas: C,
    y: f32,
    metrics: StandardFont,
}

impl<C: PdfCanvas> PageCursor<C> {
    fn new(canvas: C) -> Self {
        Self {
            canvas,
            y: PAGE_HEIGHT_PT - MARGIN_PT,
            metrics: StandardFont::new(FontFace::Regular),
        }
    }

    /// 残りが足りなければ改ページ
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < MARGIN_PT {
            self.canvas.add_page();
            self.y = PAGE_HEIGHT_PT - MARGIN_PT;
        }
    }

    /// ロゴ（1ページ目のみ）。使えなければ固定量だけ進める
    fn draw_logo(&mut self, logo_bytes: Option<&[u8]>) -> bool {
        let logo = logo_bytes.and_then(|bytes| match LogoImage::decode(bytes) {
            Ok(logo) if logo.width > 0 && logo.height > 0 => Some(logo),
            Ok(_) => None,
            Err(e) => {
                log::warn!("logo could not be embedded: {}", e);
                None
            }
        });

        match logo {
            Some(logo) => {
                let height = logo_height_pt(logo.width, logo.height);
                self.canvas
                    .draw_image(&logo, MARGIN_PT, self.y - height, LOGO_WIDTH_PT, height);
                self.y -= height + LOGO_GAP_PT;
                true
            }
            None => {
                self.y -= LOGO_GAP_PT;
                false
            }
        }
    }

    fn draw_document_title(&mut self) {
        self.canvas
            .draw_text(&sanitize(DOCUMENT_TITLE), MARGIN_PT, self.y, DOCUMENT_TITLE_STYLE);
        self.y -= DOCUMENT_TITLE_ADVANCE_PT + DOCUMENT_TITLE_GAP_PT;
    }

    /// 折り返して1行ずつ描画
    fn draw_wrapped(&mut self, text: &str) {
        for line in wrap_text(text, &self.metrics, BODY_SIZE, CONTENT_WIDTH_PT) {
            self.ensure_space(LINE_RESERVE_PT);
            self.canvas.draw_text(&line, MARGIN_PT, self.y, BODY_STYLE);
            self.y -= LINE_ADVANCE_PT;
        }
    }

    fn draw_section(&mut self, section: &Section) {
        self.ensure_space(SECTION_TITLE_RESERVE_PT);
        self.canvas
            .draw_text(&sanitize(&section.title), MARGIN_PT, self.y, SECTION_TITLE_STYLE);
        self.y -= SECTION_TITLE_ADVANCE_PT;

        if !section.rows.is_empty() {
            for (label, value) in &section.rows {
                self.draw_wrapped(&format!("{}: {}", label, value));
            }
            self.y -= GROUP_GAP_PT;
        }

        if !section.checkboxes.is_empty() {
            for (label, checked) in &section.checkboxes {
                let mark = if *checked { CHECKED_PREFIX } else { UNCHECKED_PREFIX };
                self.draw_wrapped(&format!("{} {}", mark, label));
            }
            self.y -= GROUP_GAP_PT;
        }

        for paragraph in &section.paragraphs {
            self.draw_wrapped(paragraph);
            self.y -= GROUP_GAP_PT;
        }

        if !section.bullets.is_empty() {
            for item in &section.bullets {
                self.draw_wrapped(&format!("{}{}", BULLET_PREFIX, item));
            }
            self.y -= GROUP_GAP_PT;
        }
    }
}

/// セクション一覧を A4 ページに流し込んで文書を作る
///
/// バックエンドが使えなければページを作る前に失敗する。
pub fn render_document<P: CanvasProvider>(
    provider: &P,
    sections: &[Section],
    logo_bytes: Option<&[u8]>,
) -> Result<RenderedDocument> {
    let canvas = provider.open(DOCUMENT_TITLE)?;
    let mut cursor = PageCursor::new(canvas);

    let logo_embedded = cursor.draw_logo(logo_bytes);
    cursor.draw_document_title();
    for section in sections {
        cursor.draw_section(section);
    }

    let PageCursor { canvas, y, .. } = cursor;
    let page_count = canvas.page_count();
    let bytes = canvas.finish()?;
    log::debug!("rendered consent document: {} page(s), {} bytes", page_count, bytes.len());

    Ok(RenderedDocument {
        bytes,
        page_count,
        logo_embedded,
        final_cursor: y,
    })
}
