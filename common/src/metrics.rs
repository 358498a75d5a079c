//! 標準フォント（Helvetica / Helvetica-Bold）の文字幅
//!
//! 幅は 1/1000 em 単位（AFM値）。ASCII 0x20〜0x7E を表で持ち、
//! それ以外は代表値で近似する。

/// テキスト幅を測るもの
///
/// `(text, size)` → 幅（pt）
pub trait FontMetrics {
    fn text_width(&self, text: &str, size: f32) -> f32;
}

impl<F> FontMetrics for F
where
    F: Fn(&str, f32) -> f32,
{
    fn text_width(&self, text: &str, size: f32) -> f32 {
        self(text, size)
    }
}

/// 描画に使う2書体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// 標準フォントの幅テーブル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFont {
    face: FontFace,
}

impl StandardFont {
    pub const fn new(face: FontFace) -> Self {
        Self { face }
    }

    pub fn face(&self) -> FontFace {
        self.face
    }

    /// 1文字の幅（1/1000 em）
    pub fn char_width(&self, ch: char) -> u16 {
        let table = match self.face {
            FontFace::Regular => &HELVETICA,
            FontFace::Bold => &HELVETICA_BOLD,
        };
        match ch {
            ' '..='~' => table[ch as usize - 0x20],
            '\u{2022}' => 350,
            '\u{00A0}' => table[0],
            _ => 556,
        }
    }
}

impl FontMetrics for StandardFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        let regular = StandardFont::new(FontFace::Regular);
        assert_eq!(regular.char_width(' '), 278);
        assert_eq!(regular.char_width('W'), 944);
        assert_eq!(regular.char_width('i'), 222);
        assert_eq!(regular.char_width('~'), 584);

        let bold = StandardFont::new(FontFace::Bold);
        assert_eq!(bold.char_width('i'), 278);
        assert!(bold.text_width("Client", 10.0) > regular.text_width("Client", 10.0));
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let font = StandardFont::new(FontFace::Regular);
        let w10 = font.text_width("Consent", 10.0);
        let w20 = font.text_width("Consent", 20.0);
        assert!((w20 - w10 * 2.0).abs() < 0.001);
        assert_eq!(font.text_width("", 10.0), 0.0);
    }

    #[test]
    fn test_closure_metrics() {
        let mono = |text: &str, size: f32| text.chars().count() as f32 * size;
        assert_eq!(mono.text_width("abc", 2.0), 6.0);
    }
}
