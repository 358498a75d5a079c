//! 描画先（PDFバックエンド）の抽象
//!
//! 座標はすべてpt・左下原点。`printpdf` 実装と、描画命令を記録するだけの実装を持つ。

use crate::error::{ConsentError, Result};
use consent_forms_common::layout::{pt_to_mm, Rgb, PAGE_HEIGHT_PT, PAGE_WIDTH_PT};
use consent_forms_common::FontFace;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef,
    Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Px,
};
use serde::{Deserialize, Serialize};

/// 文字の書式
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Rgb,
}

/// デコード済みロゴ（RGB8）
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl LogoImage {
    /// PNG等をデコード（透過部分は白で合成）
    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        let rgb = decoded
            .pixels()
            .flat_map(|p| {
                let [r, g, b, a] = p.0;
                let alpha = a as u16;
                let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
                [blend(r), blend(g), blend(b)]
            })
            .collect();
        Ok(Self { width, height, rgb })
    }
}

/// ページへの描画
pub trait PdfCanvas {
    fn add_page(&mut self);

    fn page_count(&self) -> usize;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);

    fn draw_image(&mut self, image: &LogoImage, x: f32, y: f32, width: f32, height: f32);

    /// 文書を確定してバイト列にする
    fn finish(self) -> Result<Vec<u8>>;
}

/// 1ページ目を持つキャンバスを開く
///
/// バックエンドが使えない場合は [`ConsentError::RendererUnavailable`]。
pub trait CanvasProvider {
    type Canvas: PdfCanvas;

    fn open(&self, title: &str) -> Result<Self::Canvas>;
}

// ============================================
// printpdf
// ============================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PrintPdfProvider;

pub struct PrintPdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    pages: usize,
}

fn page_size_mm() -> (Mm, Mm) {
    (Mm(pt_to_mm(PAGE_WIDTH_PT)), Mm(pt_to_mm(PAGE_HEIGHT_PT)))
}

impl CanvasProvider for PrintPdfProvider {
    type Canvas = PrintPdfCanvas;

    fn open(&self, title: &str) -> Result<PrintPdfCanvas> {
        let (width, height) = page_size_mm();
        let (doc, page1, layer1) = PdfDocument::new(title, width, height, "Layer 1");

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ConsentError::PdfGeneration(format!("font error: {:?}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ConsentError::PdfGeneration(format!("font error: {:?}", e)))?;

        let layer = doc.get_page(page1).get_layer(layer1);
        Ok(PrintPdfCanvas {
            doc,
            layer,
            regular,
            bold,
            pages: 1,
        })
    }
}

impl PdfCanvas for PrintPdfCanvas {
    fn add_page(&mut self) {
        let (width, height) = page_size_mm();
        let (page, layer) = self.doc.add_page(width, height, "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let font = match style.face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        };
        let Rgb { r, g, b } = style.color;
        self.layer
            .set_fill_color(printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None)));
        self.layer
            .use_text(text, style.size, Mm(pt_to_mm(x)), Mm(pt_to_mm(y)), font);
    }

    fn draw_image(&mut self, image: &LogoImage, x: f32, y: f32, width: f32, height: f32) {
        let xobject = ImageXObject {
            width: Px(image.width as usize),
            height: Px(image.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: image.rgb.clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };
        // 72dpi で 1px = 1pt、そこから目的の大きさへ拡縮
        Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(pt_to_mm(x))),
                translate_y: Some(Mm(pt_to_mm(y))),
                scale_x: Some(width / image.width as f32),
                scale_y: Some(height / image.height as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ConsentError::PdfGeneration(format!("save error: {:?}", e)))
    }
}

// ============================================
// 記録用（プレビュー・検証）
// ============================================

/// 記録された描画命令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Page {
        page: usize,
    },
    Text {
        page: usize,
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    Image {
        page: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// 描画命令をJSONとして出力するバックエンド
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingProvider;

#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    pages: usize,
}

impl RecordingCanvas {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// `finish` の出力を読み戻す
    pub fn parse(bytes: &[u8]) -> Result<Vec<DrawOp>> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl CanvasProvider for RecordingProvider {
    type Canvas = RecordingCanvas;

    fn open(&self, _title: &str) -> Result<RecordingCanvas> {
        let mut canvas = RecordingCanvas::default();
        canvas.add_page();
        Ok(canvas)
    }
}

impl PdfCanvas for RecordingCanvas {
    fn add_page(&mut self) {
        self.pages += 1;
        self.ops.push(DrawOp::Page { page: self.pages });
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            page: self.pages,
            x,
            y,
            size: style.size,
            bold: style.face == FontFace::Bold,
            text: text.to_string(),
        });
    }

    fn draw_image(&mut self, _image: &LogoImage, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Image {
            page: self.pages,
            x,
            y,
            width,
            height,
        });
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.ops)?)
    }
}

/// 使用不可のバックエンド
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableProvider;

impl CanvasProvider for UnavailableProvider {
    type Canvas = RecordingCanvas;

    fn open(&self, _title: &str) -> Result<RecordingCanvas> {
        Err(ConsentError::RendererUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_forms_common::layout::BODY_SIZE;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_logo_decode() {
        let logo = LogoImage::decode(&png_bytes(4, 2)).unwrap();
        assert_eq!((logo.width, logo.height), (4, 2));
        assert_eq!(logo.rgb.len(), 4 * 2 * 3);
        assert_eq!(&logo.rgb[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_logo_decode_rejects_garbage() {
        assert!(LogoImage::decode(b"not a png").is_err());
    }

    #[test]
    fn test_recording_canvas_roundtrip() {
        let mut canvas = RecordingProvider.open("t").unwrap();
        let style = TextStyle {
            face: FontFace::Bold,
            size: BODY_SIZE,
            color: Rgb::BLACK,
        };
        canvas.draw_text("hello", 48.0, 700.0, style);
        canvas.add_page();
        assert_eq!(canvas.page_count(), 2);

        let ops = RecordingCanvas::parse(&canvas.finish().unwrap()).unwrap();
        assert_eq!(ops.len(), 3);
        assert!(matches!(&ops[1], DrawOp::Text { page: 1, bold: true, text, .. } if text == "hello"));
        assert_eq!(ops[2], DrawOp::Page { page: 2 });
    }

    #[test]
    fn test_unavailable_provider() {
        assert!(matches!(
            UnavailableProvider.open("t"),
            Err(ConsentError::RendererUnavailable)
        ));
    }

    #[test]
    fn test_printpdf_canvas_produces_pdf() {
        let mut canvas = PrintPdfProvider.open("Legal Consent Form").unwrap();
        let style = TextStyle {
            face: FontFace::Regular,
            size: BODY_SIZE,
            color: Rgb::BLACK,
        };
        canvas.draw_text("Full Name: Jane Doe", 48.0, 780.0, style);
        let logo = LogoImage::decode(&png_bytes(8, 4)).unwrap();
        canvas.draw_image(&logo, 48.0, 700.0, 90.0, 45.0);
        canvas.add_page();
        assert_eq!(canvas.page_count(), 2);

        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
