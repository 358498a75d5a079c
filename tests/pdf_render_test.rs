//! 同意書の描画（セクション構成・ページ割り・ロゴ）の統合テスト

use consent_forms::assets::{AssetSource, Assets};
use consent_forms::error::ConsentError;
use consent_forms::export::{
    render_document, ConsentPdfGenerator, DrawOp, PrintPdfProvider, RecordingCanvas,
    RecordingProvider, UnavailableProvider,
};
use consent_forms_common::layout::{LOGO_GAP_PT, LOGO_WIDTH_PT, MARGIN_PT, PAGE_HEIGHT_PT};
use consent_forms_common::{ConsentForm, MergePolicy};
use std::path::Path;
use tempfile::tempdir;

fn form() -> ConsentForm {
    ConsentForm {
        full_name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "07700 900123".to_string(),
        session_date: "2026-10-16".to_string(),
        signature: "Jane Doe".to_string(),
        accept_terms: true,
        instagram: Some("jane.shoots".to_string()),
        ..Default::default()
    }
}

fn write_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([250, 196, 97, 255]));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    img.save(path).unwrap();
}

fn recorded_lines(bytes: &[u8]) -> Vec<(usize, f32, String)> {
    RecordingCanvas::parse(bytes)
        .unwrap()
        .into_iter()
        .filter_map(|op| match op {
            DrawOp::Text { page, y, text, .. } => Some((page, y, text)),
            _ => None,
        })
        .collect()
}

fn lines_between(lines: &[(usize, f32, String)], from: &str, to: &str) -> Vec<String> {
    lines
        .iter()
        .map(|(_, _, text)| text.clone())
        .skip_while(|text| text != from)
        .skip(1)
        .take_while(|text| text != to)
        .collect()
}

async fn render(form: &ConsentForm, assets_dir: &Path) -> consent_forms::export::RenderedDocument {
    let assets = Assets::new(AssetSource::Local(assets_dir.to_path_buf()));
    ConsentPdfGenerator::new(RecordingProvider, assets, MergePolicy::default())
        .generate(form)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_notes_add_two_paragraphs() {
    let dir = tempdir().unwrap();

    let plain = recorded_lines(&render(&form(), dir.path()).await.bytes);
    let mut noted_form = form();
    noted_form.notes = Some("No face shots.".to_string());
    let noted = recorded_lines(&render(&noted_form, dir.path()).await.bytes);

    let plain_c = lines_between(&plain, "C. Consent Agreement", "D. Permitted Uses of Photographs");
    let noted_c = lines_between(&noted, "C. Consent Agreement", "D. Permitted Uses of Photographs");

    assert!(!plain_c.iter().any(|l| l.contains("No face shots.")));
    assert_eq!(noted_c[..plain_c.len()], plain_c[..]);
    let extra = noted_c[plain_c.len()..].join(" ");
    assert!(extra.starts_with("Client restrictions or notes: No face shots."));
    assert!(extra.ends_with("The Photographer acknowledges and agrees to follow the above restrictions or notes."));
}

#[tokio::test]
async fn test_missing_logo_uses_fallback_offset() {
    let without = tempdir().unwrap();
    let with = tempdir().unwrap();
    write_png(&with.path().join("assets/logo_trans.png"), 180, 60);

    let plain = render(&form(), without.path()).await;
    let logo = render(&form(), with.path()).await;
    assert!(!plain.logo_embedded);
    assert!(logo.logo_embedded);

    let plain_lines = recorded_lines(&plain.bytes);
    let logo_lines = recorded_lines(&logo.bytes);

    let top = PAGE_HEIGHT_PT - MARGIN_PT;
    let logo_height = LOGO_WIDTH_PT * 60.0 / 180.0;
    assert!((plain_lines[0].1 - (top - LOGO_GAP_PT)).abs() < 0.001);
    assert!((logo_lines[0].1 - (top - logo_height - LOGO_GAP_PT)).abs() < 0.001);

    // ロゴの有無にかかわらず全セクションが出る
    for lines in [&plain_lines, &logo_lines] {
        let titles: Vec<&str> = lines
            .iter()
            .map(|(_, _, t)| t.as_str())
            .filter(|t| t.len() > 2 && t.as_bytes()[1] == b'.' && t.as_bytes()[0].is_ascii_uppercase())
            .collect();
        assert_eq!(
            titles,
            vec![
                "A. Client Information",
                "B. Photographer Information",
                "C. Consent Agreement",
                "D. Permitted Uses of Photographs",
                "E. Data Protection Notice (UK GDPR)",
                "F. Withdrawal of Consent",
                "G. Signatures",
            ]
        );
    }

    let image = RecordingCanvas::parse(&logo.bytes)
        .unwrap()
        .into_iter()
        .find_map(|op| match op {
            DrawOp::Image { page, width, height, .. } => Some((page, width, height)),
            _ => None,
        })
        .unwrap();
    assert_eq!(image.0, 1);
    assert!((image.1 - LOGO_WIDTH_PT).abs() < 0.001);
    assert!((image.2 - logo_height).abs() < 0.001);
}

#[tokio::test]
async fn test_profile_fills_photographer_section() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("photographer.json"),
        r#"{"photographerName":"Sam Lens","businessName":"Lens Ltd","Instagram":"samlens"}"#,
    )
    .unwrap();

    let mut form = form();
    form.photographer_name = Some("Alex Form".to_string());
    let lines = recorded_lines(&render(&form, dir.path()).await.bytes);
    let texts: Vec<&str> = lines.iter().map(|(_, _, t)| t.as_str()).collect();

    assert!(texts.contains(&"Photographer Name: Alex Form"));
    assert!(texts.contains(&"Business / Trading Name: Lens Ltd"));
    assert!(texts.contains(&"Instagram: samlens"));
    assert!(texts.contains(&"[x] Use on Photographer website or social media"));
    assert!(texts.contains(&"[ ] Sharing with third-party publishers (e.g., magazines)"));
    assert!(texts.contains(&"\u{2022} Instagram: jane.shoots"));
}

#[tokio::test]
async fn test_long_notes_paginate() {
    let dir = tempdir().unwrap();
    let mut form = form();
    form.notes = Some("Please avoid tattoos and identifying marks. ".repeat(120));

    let document = render(&form, dir.path()).await;
    assert!(document.page_count >= 2);

    let lines = recorded_lines(&document.bytes);
    assert!(lines.iter().all(|(_, y, _)| *y >= MARGIN_PT));
    let last = lines.last().unwrap();
    assert_eq!(last.0, document.page_count);
    assert_eq!(last.2, "Photographer Date: 2026-10-16");
}

#[test]
fn test_unavailable_renderer() {
    let result = render_document(&UnavailableProvider, &[], None);
    assert!(matches!(result, Err(ConsentError::RendererUnavailable)));
}

#[tokio::test]
async fn test_printpdf_output_with_logo() {
    let dir = tempdir().unwrap();
    write_png(&dir.path().join("assets/logo_trans.png"), 32, 16);
    let assets = Assets::new(AssetSource::Local(dir.path().to_path_buf()));

    let document = ConsentPdfGenerator::new(PrintPdfProvider, assets, MergePolicy::default())
        .generate(&form())
        .await
        .unwrap();
    assert!(document.logo_embedded);
    assert!(document.bytes.starts_with(b"%PDF"));
}
