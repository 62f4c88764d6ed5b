use crate::normalize::tokenize;

/// 編集距離（挿入・削除・置換いずれもコスト 1）
///
/// 短い方の長さ + 1 の行バッファ 1 本だけで DP を回す。
/// 文字単位（Unicode scalar value）で数える。
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, long_char) in long.iter().enumerate() {
        // row[j] は直前行の値、diagonal は直前行の row[j - 1]
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, short_char) in short.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(long_char != short_char);
            row[j + 1] = (above + 1).min(row[j] + 1).min(substitution);
            diagonal = above;
        }
    }

    row[short.len()]
}

/// `1 - distance / max(len)`。両方空なら 1.0。
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// トークン集合の Jaccard 係数
///
/// 両方空 → 1.0、片方だけ空 → 0.0。
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    match (tokens_a.is_empty(), tokens_b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f64 / union as f64
}

/// fuzzy 段階で使う合成類似度
pub fn label_similarity(a: &str, b: &str) -> f64 {
    levenshtein_similarity(a, b).max(jaccard_similarity(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "a",
        "java",
        "javascript",
        "python",
        "pyhton",
        "spring boot",
        "boot spring",
        "kitten",
        "sitting",
        "machine learning",
        "ｒｕｓｔ",
        "café",
    ];

    #[test]
    fn distance_matches_reference_implementation() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(
                    levenshtein_distance(a, b),
                    strsim::levenshtein(a, b),
                    "distance({a:?}, {b:?})"
                );
            }
        }
    }

    #[test]
    fn distance_is_symmetric() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(levenshtein_distance(a, b), levenshtein_distance(b, a));
            }
        }
    }

    #[test]
    fn classic_distances() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("python", "pyhton"), 2);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", ""), 0);
    }

    #[test]
    fn self_similarity_is_one() {
        for a in SAMPLES {
            assert_eq!(levenshtein_similarity(a, a), 1.0);
            assert_eq!(jaccard_similarity(a, a), 1.0);
        }
    }

    #[test]
    fn levenshtein_similarity_of_transposed_typo() {
        let sim = levenshtein_similarity("python", "pyhton");
        assert!((sim - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(levenshtein_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn similarities_are_symmetric_and_bounded() {
        for a in SAMPLES {
            for b in SAMPLES {
                let lev = levenshtein_similarity(a, b);
                let jac = jaccard_similarity(a, b);
                assert_eq!(lev, levenshtein_similarity(b, a));
                assert_eq!(jac, jaccard_similarity(b, a));
                assert!((0.0..=1.0).contains(&lev));
                assert!((0.0..=1.0).contains(&jac));
            }
        }
    }

    #[test]
    fn jaccard_handles_word_order_and_empties() {
        assert_eq!(jaccard_similarity("spring boot", "boot spring"), 1.0);
        assert!((jaccard_similarity("spring boot", "spring") - 0.5).abs() < 1e-12);
        assert_eq!(jaccard_similarity("", ""), 1.0);
        assert_eq!(jaccard_similarity("", "java"), 0.0);
        assert_eq!(jaccard_similarity("java", " , "), 0.0);
    }

    #[test]
    fn label_similarity_takes_the_better_metric() {
        let sim = label_similarity("spring boot", "boot spring");
        assert_eq!(sim, 1.0);
        assert!(label_similarity("python", "pyhton") < 0.75);
    }
}
