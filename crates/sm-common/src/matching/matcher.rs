use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::similarity::label_similarity;
use crate::normalize::normalize;
use crate::synonyms::SynonymTable;

/// どの段階でスコアが決まったか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Synonym,
    Fuzzy,
    /// 候補スキルが空、または必須ラベルが空白
    #[serde(rename = "none")]
    Unmatched,
}

/// 必須スキル 1 件に対する最良マッチ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub score: f64,
    pub kind: MatchKind,
    /// 最良スコアを出した候補スキル（正規化済み）
    pub matched_with: Option<String>,
}

impl SkillMatch {
    fn unmatched() -> Self {
        Self {
            score: 0.0,
            kind: MatchKind::Unmatched,
            matched_with: None,
        }
    }
}

/// 完全一致 → 同義グループ一致 → fuzzy 類似度 の順に評価する
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    synonyms: &'a SynonymTable,
    synonym_confidence: f64,
}

impl<'a> Matcher<'a> {
    pub fn new(synonyms: &'a SynonymTable, synonym_confidence: f64) -> Self {
        Self {
            synonyms,
            synonym_confidence,
        }
    }

    /// `candidates` は正規化済みラベルの集合であること
    pub fn best_match(&self, required: &str, candidates: &BTreeSet<String>) -> f64 {
        self.best_match_detail(required, candidates).score
    }

    pub fn best_match_detail(&self, required: &str, candidates: &BTreeSet<String>) -> SkillMatch {
        let required = normalize(required);
        if required.is_empty() {
            return SkillMatch::unmatched();
        }

        if candidates.contains(&required) {
            return SkillMatch {
                score: 1.0,
                kind: MatchKind::Exact,
                matched_with: Some(required),
            };
        }

        if let Some(group) = self.synonyms.group_of(&required) {
            let synonym = candidates
                .iter()
                .find(|candidate| self.synonyms.group_of(candidate) == Some(group));
            if let Some(candidate) = synonym {
                return SkillMatch {
                    score: self.synonym_confidence,
                    kind: MatchKind::Synonym,
                    matched_with: Some(candidate.clone()),
                };
            }
        }

        let mut best: Option<(&String, f64)> = None;
        for candidate in candidates {
            let score = label_similarity(&required, candidate);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((candidate, score)),
            }
        }

        match best {
            None => SkillMatch::unmatched(),
            Some((candidate, score)) => SkillMatch {
                score,
                kind: MatchKind::Fuzzy,
                matched_with: (score > 0.0).then(|| candidate.clone()),
            },
        }
    }
}
