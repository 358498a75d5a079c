//! テキスト整形・折り返し
//!
//! 標準フォント（Latin-1相当）で描けない記号をASCIIに寄せてから、
//! 単語単位の貪欲法で折り返す。

use crate::metrics::FontMetrics;

/// 描画前のテキスト正規化
///
/// ダッシュ類 → `-`、曲がり引用符 → `'` / `"`、ノーブレークスペース → 空白。
/// 1文字を1文字に置き換えるだけなので文字数は変わらない。
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{00A0}' => ' ',
            other => other,
        })
        .collect()
}

/// 最大幅に収まるよう単語単位で折り返す
///
/// 1語が最大幅を超える場合はその語だけの行にする（分割しない）。
/// 空白のみの入力は0行。
pub fn wrap_text<M: FontMetrics + ?Sized>(
    text: &str,
    metrics: &M,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let sanitized = sanitize(text);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in sanitized.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if metrics.text_width(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{FontFace, StandardFont};

    /// 1文字 = 1pt × size
    fn mono(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size
    }

    #[test]
    fn test_sanitize_replaces_typographic_marks() {
        let input = "third\u{2011}party \u{201C}quoted\u{201D} it\u{2019}s\u{00A0}ok \u{2014} done";
        assert_eq!(sanitize(input), "third-party \"quoted\" it's ok - done");
    }

    #[test]
    fn test_sanitize_is_idempotent_and_length_preserving() {
        let samples = [
            "",
            "plain ascii",
            "\u{2010}\u{2011}\u{2012}\u{2013}\u{2014}\u{2212}",
            "\u{2018}a\u{2019} \u{201C}b\u{201D}\u{00A0}",
            "caf\u{00E9} \u{2022} bullet",
        ];
        for s in samples {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once);
            assert_eq!(once.chars().count(), s.chars().count());
        }
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap_text(text, &mono, 1.0, 10.0);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        for line in &lines {
            assert!(mono(line, 1.0) <= 10.0);
        }
    }

    #[test]
    fn test_wrap_rejoins_to_normalized_text() {
        let text = "  Personal   data will\tbe processed\n lawfully, fairly,  and transparently. ";
        let font = StandardFont::new(FontFace::Regular);
        let lines = wrap_text(text, &font, 10.0, 120.0);
        assert!(lines.len() > 1);
        let normalized: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(lines.join(" "), normalized.join(" "));
        for line in &lines {
            assert!(font.text_width(line, 10.0) <= 120.0);
        }
    }

    #[test]
    fn test_wrap_keeps_overlong_word_whole() {
        let lines = wrap_text("a supercalifragilistic b", &mono, 1.0, 5.0);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_empty_input() {
        assert!(wrap_text("", &mono, 1.0, 10.0).is_empty());
        assert!(wrap_text("   \n\t", &mono, 1.0, 10.0).is_empty());
    }

    #[test]
    fn test_wrap_sanitizes_before_measuring() {
        let lines = wrap_text("Sharing with third\u{2011}party publishers", &mono, 1.0, 100.0);
        assert_eq!(lines, vec!["Sharing with third-party publishers"]);
    }
}
