//! 言語カタログ
//!
//! OCRエンジンへ渡す言語コードの一覧。タブ区切りの
//! `コード<TAB>表示名` 形式を読み、不正な行は黙って飛ばす。

use std::path::Path;

use crate::error::Result;

/// バンドルされた既定カタログ
const BUNDLED_CATALOG: &str = include_str!("../data/languages.txt");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

/// タブ区切りテキストを言語一覧にする
pub fn parse_catalog(content: &str) -> Vec<Language> {
    let mut languages = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(2, '\t');
        let (Some(code), Some(name)) = (parts.next(), parts.next()) else {
            continue;
        };
        let code = code.trim();
        let name = name.trim();
        if code.is_empty() || name.is_empty() {
            continue;
        }

        languages.push(Language {
            code: code.to_string(),
            name: name.to_string(),
        });
    }

    languages
}

/// ファイルから言語一覧を読む
pub fn load_catalog(path: &Path) -> Result<Vec<Language>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_catalog(&content))
}

/// バンドルされた既定カタログ
pub fn bundled_catalog() -> Vec<Language> {
    parse_catalog(BUNDLED_CATALOG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let content = "eng\tEnglish\njpn\tJapanese\n";
        let languages = parse_catalog(content);
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[0].code, "eng");
        assert_eq!(languages[1].name, "Japanese");
    }

    #[test]
    fn test_parse_catalog_skips_malformed_lines() {
        let content = "eng\tEnglish\n\nno-tab-here\n\tno-code\ndeu\tGerman\n";
        let languages = parse_catalog(content);
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[1].code, "deu");
    }

    #[test]
    fn test_bundled_catalog_has_entries() {
        let languages = bundled_catalog();
        assert!(!languages.is_empty());
        assert!(languages.iter().any(|l| l.code == "eng"));
    }
}
