use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scoring::{ProfileScore, Scorer};
use crate::catalog::{JobCatalog, JobProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJob {
    pub job: String,
    pub score: ProfileScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankOptions {
    /// 返却する件数の上限（スコア降順で切り詰め）
    pub limit: Option<usize>,
    /// これ未満の総合スコアは除外
    pub min_score: f64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            limit: None,
            min_score: 0.0,
        }
    }
}

/// 候補者スキルをカタログ全件に当ててランキングする
pub struct JobRanker<'a> {
    catalog: &'a JobCatalog,
    scorer: Scorer<'a>,
}

impl<'a> JobRanker<'a> {
    pub fn new(catalog: &'a JobCatalog, scorer: Scorer<'a>) -> Self {
        Self { catalog, scorer }
    }

    pub fn list_jobs(&self) -> Vec<&'a str> {
        self.catalog.names()
    }

    /// 重み 1.0 のみのプロファイルは重みなし集計、それ以外は重み付き集計
    pub fn score_job<C>(&self, candidates: &[C], profile: &JobProfile) -> ProfileScore
    where
        C: AsRef<str>,
    {
        if profile.is_weighted() {
            self.scorer.score_profile_weighted(candidates, &profile.skills)
        } else {
            self.scorer.score_profile(candidates, &profile.labels())
        }
    }

    /// 最高スコアの求人。同点ならカタログ上で先のもの。カタログが空なら None。
    pub fn find_best_job<C: AsRef<str>>(&self, candidates: &[C]) -> Option<RankedJob> {
        let mut best: Option<RankedJob> = None;

        for profile in self.catalog.profiles() {
            let score = self.score_job(candidates, profile);
            let replace = match &best {
                None => true,
                Some(current) => score.score > current.score.score,
            };
            if replace {
                best = Some(RankedJob {
                    job: profile.name.clone(),
                    score,
                });
            }
        }

        if let Some(best) = &best {
            debug!(job = %best.job, score = best.score.score, "best job selected");
        }
        best
    }

    /// スコア降順。同点はカタログ順を保つ（安定ソート）。
    pub fn score_all_jobs<C: AsRef<str>>(&self, candidates: &[C]) -> Vec<RankedJob> {
        let mut ranked: Vec<_> = self
            .catalog
            .profiles()
            .iter()
            .map(|profile| RankedJob {
                job: profile.name.clone(),
                score: self.score_job(candidates, profile),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .score
                .partial_cmp(&a.score.score)
                .unwrap_or(Ordering::Equal)
        });

        ranked
    }

    pub fn rank_jobs<C>(&self, candidates: &[C], options: &RankOptions) -> Vec<RankedJob>
    where
        C: AsRef<str>,
    {
        let mut ranked: Vec<_> = self
            .score_all_jobs(candidates)
            .into_iter()
            .filter(|job| job.score.score >= options.min_score)
            .collect();

        if let Some(limit) = options.limit {
            ranked.truncate(limit);
        }

        debug!(
            catalog_size = self.catalog.len(),
            returned = ranked.len(),
            "jobs ranked"
        );
        ranked
    }
}
