use crate::catalog::{JobCatalog, RequiredSkill};
use crate::error::ConfigError;
use crate::matching::matcher::SkillMatch;
use crate::matching::ranker::{JobRanker, RankOptions, RankedJob};
use crate::matching::scoring::{ProfileScore, Scorer, ScoringConfig};
use crate::normalize::normalize_skill_set;
use crate::synonyms::SynonymTable;

/// 同義語辞書・求人カタログ・閾値を束ねたマッチングエンジン
///
/// 構築後は不変（`Send + Sync`）。`Arc` で共有してそのまま並行に呼んでよい。
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    synonyms: SynonymTable,
    catalog: JobCatalog,
    scoring: ScoringConfig,
}

impl SkillMatcher {
    pub fn new(
        synonyms: SynonymTable,
        catalog: JobCatalog,
        scoring: ScoringConfig,
    ) -> Result<Self, ConfigError> {
        scoring.validate()?;
        Ok(Self {
            synonyms,
            catalog,
            scoring,
        })
    }

    /// 組み込み辞書・組み込みカタログ・既定閾値
    pub fn builtin() -> Self {
        Self {
            synonyms: SynonymTable::builtin(),
            catalog: JobCatalog::builtin(),
            scoring: ScoringConfig::default(),
        }
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn catalog(&self) -> &JobCatalog {
        &self.catalog
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn scorer(&self) -> Scorer<'_> {
        Scorer::new(&self.synonyms, self.scoring)
    }

    pub fn ranker(&self) -> JobRanker<'_> {
        JobRanker::new(&self.catalog, self.scorer())
    }

    /// 生の候補者スキル一覧に対する単発の best match
    pub fn best_match<C: AsRef<str>>(&self, required: &str, candidates: &[C]) -> f64 {
        self.best_match_detail(required, candidates).score
    }

    pub fn best_match_detail<C>(&self, required: &str, candidates: &[C]) -> SkillMatch
    where
        C: AsRef<str>,
    {
        let candidates = normalize_skill_set(candidates);
        self.scorer().matcher().best_match_detail(required, &candidates)
    }

    pub fn score_profile<C, R>(&self, candidates: &[C], required: &[R]) -> ProfileScore
    where
        C: AsRef<str>,
        R: AsRef<str>,
    {
        self.scorer().score_profile(candidates, required)
    }

    pub fn score_profile_weighted<C: AsRef<str>>(
        &self,
        candidates: &[C],
        required: &[RequiredSkill],
    ) -> ProfileScore {
        self.scorer().score_profile_weighted(candidates, required)
    }

    pub fn list_jobs(&self) -> Vec<&str> {
        self.catalog.names()
    }

    pub fn find_best_job<C: AsRef<str>>(&self, candidates: &[C]) -> Option<RankedJob> {
        self.ranker().find_best_job(candidates)
    }

    pub fn score_all_jobs<C: AsRef<str>>(&self, candidates: &[C]) -> Vec<RankedJob> {
        self.ranker().score_all_jobs(candidates)
    }

    pub fn rank_jobs<C>(&self, candidates: &[C], options: &RankOptions) -> Vec<RankedJob>
    where
        C: AsRef<str>,
    {
        self.ranker().rank_jobs(candidates, options)
    }
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}
