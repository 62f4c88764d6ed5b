use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::matcher::{Matcher, SkillMatch};
use crate::catalog::RequiredSkill;
use crate::error::ConfigError;
use crate::normalize::{normalize, normalize_skill_set};
use crate::synonyms::SynonymTable;

/// これ以上なら matched（満額加点）
pub const MATCH_THRESHOLD: f64 = 0.75;
/// 閾値未満のスキルに与える部分点の係数
pub const PARTIAL_CREDIT_FACTOR: f64 = 0.3;
/// 同義グループ一致時のスコア
pub const SYNONYM_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub match_threshold: f64,
    pub partial_credit_factor: f64,
    pub synonym_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_threshold: MATCH_THRESHOLD,
            partial_credit_factor: PARTIAL_CREDIT_FACTOR,
            synonym_confidence: SYNONYM_CONFIDENCE,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("match_threshold", self.match_threshold),
            ("partial_credit_factor", self.partial_credit_factor),
            ("synonym_confidence", self.synonym_confidence),
        ];

        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }

        Ok(())
    }
}

/// 候補者スキル × 必須スキル群 の評価結果
///
/// `matched` と `missing` は呼び出し側のラベル表記のまま、入力順で並ぶ。
/// 両者を合わせると（正規化後の重複を除いた）必須スキル全体になる。空白ラベルは `missing` 側。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileScore {
    pub score: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub per_skill: BTreeMap<String, f64>,
    pub details: BTreeMap<String, SkillMatch>,
}

impl ProfileScore {
    pub fn required_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    pub fn summary(&self) -> String {
        let list = |labels: &[String]| {
            if labels.is_empty() {
                "なし".to_string()
            } else {
                labels.join(", ")
            }
        };

        if self.required_count() == 0 {
            return "必須スキル要件なし".to_string();
        }

        format!(
            "必須スキル{}件中{}件に合致 (スコア {:.0}% / 一致: {} / 不足: {})",
            self.required_count(),
            self.matched.len(),
            self.score * 100.0,
            list(&self.matched),
            list(&self.missing)
        )
    }
}

/// 必須スキルごとの最良マッチを集計して総合スコアを出す
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    matcher: Matcher<'a>,
    config: ScoringConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(synonyms: &'a SynonymTable, config: ScoringConfig) -> Self {
        Self {
            matcher: Matcher::new(synonyms, config.synonym_confidence),
            config,
        }
    }

    pub fn matcher(&self) -> &Matcher<'a> {
        &self.matcher
    }

    /// 重みなし: 寄与の単純平均
    pub fn score_profile<C, R>(&self, candidates: &[C], required: &[R]) -> ProfileScore
    where
        C: AsRef<str>,
        R: AsRef<str>,
    {
        let required = required.iter().map(|label| (label.as_ref(), 1.0));
        self.evaluate(candidates, required)
    }

    /// 重み付き: Σ(寄与 × 重み) / Σ重み
    ///
    /// 0 以下・非有限の重みは 0 として扱う（スキル自体は matched/missing に残る）。
    pub fn score_profile_weighted<C>(
        &self,
        candidates: &[C],
        required: &[RequiredSkill],
    ) -> ProfileScore
    where
        C: AsRef<str>,
    {
        let required = required.iter().map(|skill| {
            let weight = if skill.weight.is_finite() && skill.weight > 0.0 {
                skill.weight
            } else {
                warn!(
                    skill = %skill.label,
                    weight = skill.weight,
                    "non-positive skill weight treated as zero"
                );
                0.0
            };
            (skill.label.as_str(), weight)
        });
        self.evaluate(candidates, required)
    }

    fn evaluate<'r, C, I>(&self, candidates: &[C], required: I) -> ProfileScore
    where
        C: AsRef<str>,
        I: IntoIterator<Item = (&'r str, f64)>,
    {
        let candidate_set = normalize_skill_set(candidates);
        let required = distinct_required(required);

        let mut result = ProfileScore::default();
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for (label, weight) in required {
            let skill_match = self.matcher.best_match_detail(label, &candidate_set);
            let contribution = if skill_match.score >= self.config.match_threshold {
                result.matched.push(label.to_string());
                skill_match.score
            } else {
                result.missing.push(label.to_string());
                skill_match.score * self.config.partial_credit_factor
            };

            weighted_sum += contribution * weight;
            total_weight += weight;
            result.per_skill.insert(label.to_string(), skill_match.score);
            result.details.insert(label.to_string(), skill_match);
        }

        result.score = if total_weight > 0.0 {
            (weighted_sum / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };

        debug!(
            candidate_skills = candidate_set.len(),
            required_skills = result.required_count(),
            matched = result.matched.len(),
            score = result.score,
            "profile scored"
        );

        result
    }
}

/// 正規化後に重複するラベルは最初の 1 件だけ残す（空白ラベルも 1 件の要件として残る）
fn distinct_required<'r, I>(required: I) -> Vec<(&'r str, f64)>
where
    I: IntoIterator<Item = (&'r str, f64)>,
{
    let mut kept_weights: HashMap<String, f64> = HashMap::new();
    let mut distinct = Vec::new();

    for (label, weight) in required {
        match kept_weights.entry(normalize(label)) {
            Entry::Vacant(slot) => {
                slot.insert(weight);
                distinct.push((label, weight));
            }
            Entry::Occupied(kept) if *kept.get() != weight => {
                warn!(
                    skill = label,
                    kept_weight = *kept.get(),
                    dropped_weight = weight,
                    "duplicate required skill ignored; first weight wins"
                );
            }
            Entry::Occupied(_) => {
                debug!(skill = label, "duplicate required skill ignored");
            }
        }
    }

    distinct
}
