//! 保存先フォルダ名・ファイル名の生成

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

/// 同意書を保存する最上位フォルダ名
pub const CONSENT_FOLDER_NAME: &str = "consent forms";

lazy_static! {
    static ref NON_ALNUM_RUN: Regex = Regex::new(r"[^A-Za-z0-9]+").unwrap();
}

/// 日付フォルダ名（UTCのYYYY-MM-DD）
///
/// 日付をまたぐ場合に備え、呼び出しのたびに計算する。
pub fn date_folder_name(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// ファイル名用の氏名スラッグ
///
/// 英数字以外の連続を1つのハイフンにまとめ、前後のハイフンを除いて小文字化。
/// 結果が空なら `"consent"`。
pub fn slugify(name: &str) -> String {
    let collapsed = NON_ALNUM_RUN.replace_all(name.trim(), "-");
    let slug = collapsed.trim_matches('-').to_lowercase();
    if slug.is_empty() {
        "consent".to_string()
    } else {
        slug
    }
}

/// ISO 8601タイムスタンプ（`:` と `.` を `-` に置換）
///
/// 例: `2026-10-16T09:05:03.042Z` → `2026-10-16T09-05-03-042Z`
pub fn file_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

/// 保存ファイル名: `<slug>-<timestamp>.pdf`
pub fn consent_file_name(full_name: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}.pdf", slugify(full_name), file_timestamp(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 3).unwrap() + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Jane O'Brien!!"), "jane-o-brien");
        assert_eq!(slugify("  Ada   Lovelace "), "ada-lovelace");
        assert_eq!(slugify("--Zoë--"), "zo");
        assert_eq!(slugify(""), "consent");
        assert_eq!(slugify("   "), "consent");
        assert_eq!(slugify("!!!"), "consent");
    }

    #[test]
    fn test_date_folder_name() {
        assert_eq!(date_folder_name(fixed_now()), "2026-10-16");
    }

    #[test]
    fn test_file_timestamp() {
        assert_eq!(file_timestamp(fixed_now()), "2026-10-16T09-05-03-042Z");
    }

    #[test]
    fn test_consent_file_name() {
        assert_eq!(
            consent_file_name("Jane O'Brien!!", fixed_now()),
            "jane-o-brien-2026-10-16T09-05-03-042Z.pdf"
        );
        assert_eq!(
            consent_file_name("", fixed_now()),
            "consent-2026-10-16T09-05-03-042Z.pdf"
        );
    }
}
