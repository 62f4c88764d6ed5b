use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;

/// スキルラベルの正規形（NFKC → trim → lowercase）
///
/// 全角英数字（"ＡＷＳ" など）は NFKC で半角に畳み込まれる。
pub fn normalize(label: &str) -> String {
    label.nfkc().collect::<String>().trim().to_lowercase()
}

/// `None` は空文字として扱う
pub fn normalize_opt(label: Option<&str>) -> String {
    label.map(normalize).unwrap_or_default()
}

fn is_token_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '/' | '-' | '_')
}

/// 正規化したラベルを単語集合に分割する（Jaccard 用）
///
/// 区切り: 空白 / `,` / `/` / `-` / `_`。空トークンは捨てる。
pub fn tokenize(label: &str) -> BTreeSet<String> {
    normalize(label)
        .split(is_token_separator)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// 空白のみのラベルを除外しつつ正規化した集合を作る
pub fn normalize_skill_set<S: AsRef<str>>(skills: &[S]) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| normalize(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize("  JavaScript "), "javascript");
        assert_eq!(normalize("SQL"), "sql");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn folds_fullwidth_forms() {
        assert_eq!(normalize("ＡＷＳ"), "aws");
        assert_eq!(normalize("Ｊａｖａ"), "java");
    }

    #[test]
    fn missing_label_normalizes_to_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some(" Rust ")), "rust");
    }

    #[test]
    fn splits_on_all_separators() {
        let tokens = tokenize("Spring Boot, REST/API-design_patterns");
        let expected: BTreeSet<String> = ["spring", "boot", "rest", "api", "design", "patterns"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn single_word_is_singleton_and_blank_is_empty() {
        assert_eq!(tokenize("Python").len(), 1);
        assert!(tokenize(" -- , ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn skill_set_drops_blank_entries() {
        let set = normalize_skill_set(&["Java", " ", "java", "SQL"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("java"));
        assert!(set.contains("sql"));
    }
}
