//! 同意書のセクション構成
//!
//! [`MergedDocumentData`] から A〜G の固定順セクションを組み立てる。
//! 純粋関数のみ（ネットワーク・描画なし）。

use crate::types::{
    has_text, ConsentForm, MergePolicy, MergedDocumentData, PhotographerProfile,
};

/// 1セクション（見出し + 内容グループ）
///
/// 描画順は rows → checkboxes → paragraphs → bullets。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub title: String,
    pub rows: Vec<(String, String)>,
    pub checkboxes: Vec<(String, bool)>,
    pub paragraphs: Vec<String>,
    pub bullets: Vec<String>,
}

impl Section {
    fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn with_rows<S: AsRef<str>>(mut self, rows: &[(&str, S)]) -> Self {
        self.rows = rows
            .iter()
            .map(|(label, value)| (label.to_string(), value.as_ref().to_string()))
            .collect();
        self
    }

    fn with_checkboxes(mut self, checkboxes: &[(&str, bool)]) -> Self {
        self.checkboxes = checkboxes
            .iter()
            .map(|(label, checked)| (label.to_string(), *checked))
            .collect();
        self
    }

    fn with_paragraphs<I, S>(mut self, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paragraphs = paragraphs.into_iter().map(Into::into).collect();
        self
    }

    fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }
}

const CONSENT_STATEMENT: &str = "The Client hereby grants the Photographer permission to create and deliver photographs as part of the agreed session. The Client confirms that they provide explicit, informed consent under UK GDPR for the processing of their personal data solely for the purposes of conducting the session and delivering the photographs.";

const NOTES_ACKNOWLEDGEMENT: &str =
    "The Photographer acknowledges and agrees to follow the above restrictions or notes.";

const DATA_PROTECTION_NOTICE: [&str; 4] = [
    "Personal data will be processed lawfully, fairly, and transparently.",
    "No personal data or photographs will be shared with third parties without explicit written consent.",
    "All photographs will be permanently deleted once the Client confirms successful receipt.",
    "The Client has the right to access, correct, delete, or withdraw consent at any time.",
];

const WITHDRAWAL_STATEMENT: &str = "The Client may withdraw consent at any time by providing written notice to the Photographer. Following withdrawal, all retained photographs and personal data will be deleted without undue delay.";

/// 入力のあるSNSだけを「サイト名: アカウント」で列挙
pub fn social_media_entries(data: &MergedDocumentData) -> Vec<String> {
    [
        ("Fabswinger.com", &data.fabswinger),
        ("SpicyMatch", &data.spicymatch),
        ("Instagram", &data.instagram),
    ]
    .into_iter()
    .filter(|(_, value)| has_text(Some(value.as_str())))
    .map(|(label, value)| format!("{}: {}", label, value.trim()))
    .collect()
}

/// 同意条項の段落（備考があれば2文追加）
fn consent_paragraphs(data: &MergedDocumentData) -> Vec<String> {
    let mut paragraphs = vec![CONSENT_STATEMENT.to_string()];
    if has_text(Some(data.notes.as_str())) {
        paragraphs.push(format!("Client restrictions or notes: {}", data.notes.trim()));
        paragraphs.push(NOTES_ACKNOWLEDGEMENT.to_string());
    }
    paragraphs
}

/// セクション一覧を構築
pub fn build_sections(data: &MergedDocumentData) -> Vec<Section> {
    vec![
        Section::titled("A. Client Information").with_rows(&[
            ("Full Name", &data.full_name),
            ("Email Address", &data.email),
            ("Telephone Number", &data.phone),
            ("Photo Session Date", &data.session_date),
        ]),
        Section::titled("B. Photographer Information").with_rows(&[
            ("Photographer Name", &data.photographer_name),
            ("Business / Trading Name", &data.business_name),
            ("Email", &data.photographer_email),
            ("Telephone", &data.photographer_phone),
            ("Instagram", &data.photographer_instagram),
        ]),
        Section::titled("C. Consent Agreement").with_paragraphs(consent_paragraphs(data)),
        Section::titled("D. Permitted Uses of Photographs")
            .with_checkboxes(&[
                ("Delivery of photographs to the Client (mandatory)", true),
                ("Use in Photographer offline portfolio", data.usage_portfolio),
                ("Use on Photographer website or social media", data.usage_web),
                (
                    "Sharing with third\u{2011}party publishers (e.g., magazines)",
                    data.usage_publishers,
                ),
            ])
            .with_paragraphs(["Permitted social media sites and usernames (if applicable):"])
            .with_bullets(social_media_entries(data)),
        Section::titled("E. Data Protection Notice (UK GDPR)").with_bullets(DATA_PROTECTION_NOTICE),
        Section::titled("F. Withdrawal of Consent").with_paragraphs([WITHDRAWAL_STATEMENT]),
        Section::titled("G. Signatures").with_rows(&[
            ("Client Name", &data.full_name),
            ("Client Digital Signature", &data.signature),
            ("Client Date", &data.session_date),
            ("Photographer Name", &data.photographer_name),
            ("Photographer Digital Signature", &data.photographer_name),
            ("Photographer Date", &data.session_date),
        ]),
    ]
}

/// フォーム + プロフィール → セクション一覧
pub fn consent_sections(
    form: &ConsentForm,
    profile: &PhotographerProfile,
    policy: MergePolicy,
) -> Vec<Section> {
    build_sections(&MergedDocumentData::merge(form, profile, policy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ConsentForm {
        ConsentForm {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "07700 900123".to_string(),
            session_date: "2026-10-16".to_string(),
            signature: "Jane Doe".to_string(),
            accept_terms: true,
            ..Default::default()
        }
    }

    fn sections_for(form: &ConsentForm) -> Vec<Section> {
        consent_sections(form, &PhotographerProfile::default(), MergePolicy::default())
    }

    #[test]
    fn test_fixed_section_order() {
        let titles: Vec<String> = sections_for(&form()).into_iter().map(|s| s.title).collect();
        assert_eq!(titles.len(), 7);
        for (title, letter) in titles.iter().zip(["A", "B", "C", "D", "E", "F", "G"]) {
            assert!(title.starts_with(&format!("{}. ", letter)), "{}", title);
        }
    }

    #[test]
    fn test_deterministic() {
        let f = ConsentForm {
            instagram: Some("@jane".to_string()),
            notes: Some("No face shots".to_string()),
            ..form()
        };
        assert_eq!(sections_for(&f), sections_for(&f));
    }

    #[test]
    fn test_instagram_bullet_only_when_present() {
        let with = ConsentForm {
            instagram: Some("  jane.doe ".to_string()),
            ..form()
        };
        let sections = sections_for(&with);
        assert_eq!(sections[3].bullets, vec!["Instagram: jane.doe"]);

        let blank = ConsentForm {
            instagram: Some("   ".to_string()),
            ..form()
        };
        assert!(sections_for(&blank)[3].bullets.is_empty());
        assert!(sections_for(&form())[3].bullets.is_empty());
    }

    #[test]
    fn test_social_entries_keep_platform_order() {
        let f = ConsentForm {
            instagram: Some("ig".to_string()),
            fabswinger: Some("fab".to_string()),
            spicymatch: Some("spicy".to_string()),
            ..form()
        };
        assert_eq!(
            sections_for(&f)[3].bullets,
            vec!["Fabswinger.com: fab", "SpicyMatch: spicy", "Instagram: ig"]
        );
    }

    #[test]
    fn test_notes_add_two_paragraphs() {
        let plain = sections_for(&form());
        let noted = sections_for(&ConsentForm {
            notes: Some(" No face shots ".to_string()),
            ..form()
        });
        assert_eq!(plain[2].paragraphs.len(), 1);
        assert_eq!(noted[2].paragraphs.len(), 3);
        assert_eq!(noted[2].paragraphs[1], "Client restrictions or notes: No face shots");
        assert_eq!(noted[2].paragraphs[2], NOTES_ACKNOWLEDGEMENT);
    }

    #[test]
    fn test_permitted_uses_checkboxes() {
        let f = ConsentForm {
            usage_portfolio: true,
            ..form()
        };
        let checks: Vec<bool> = sections_for(&f)[3].checkboxes.iter().map(|c| c.1).collect();
        assert_eq!(checks, vec![true, true, false, false]);
    }

    #[test]
    fn test_photographer_rows_from_profile() {
        let profile = PhotographerProfile {
            photographer_name: Some("Sam Lens".to_string()),
            ..Default::default()
        };
        let sections = consent_sections(&form(), &profile, MergePolicy::default());
        assert_eq!(
            sections[1].rows[0],
            ("Photographer Name".to_string(), "Sam Lens".to_string())
        );
        assert_eq!(sections[6].rows[4].1, "Sam Lens");
    }
}
