use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use sm_common::normalize::normalize_opt;
use sm_common::{ProfileScore, RankOptions, RankedJob, RequiredSkill};

use crate::error::ApiError;
use crate::SharedState;

/// 必須スキル入力。`weight` を明示したものが 1 件でもあれば重み付き集計にする。
///
/// `null` は空ラベル扱い（不足スキルとして数える）。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequiredSkillInput {
    Blank,
    Label(String),
    Weighted {
        label: Option<String>,
        weight: Option<f64>,
    },
}

impl RequiredSkillInput {
    fn label(&self) -> &str {
        match self {
            RequiredSkillInput::Blank => "",
            RequiredSkillInput::Label(label) => label,
            RequiredSkillInput::Weighted { label, .. } => label.as_deref().unwrap_or_default(),
        }
    }

    fn explicit_weight(&self) -> Option<f64> {
        match self {
            RequiredSkillInput::Blank | RequiredSkillInput::Label(_) => None,
            RequiredSkillInput::Weighted { weight, .. } => *weight,
        }
    }

    fn to_required_skill(&self) -> RequiredSkill {
        match self.explicit_weight() {
            Some(weight) => RequiredSkill::weighted(self.label(), weight),
            None => RequiredSkill::new(self.label()),
        }
    }
}

/// 候補者スキル。リスト自体の `null` も要素の `null` も空として扱う。
type CandidateSkills = Option<Vec<Option<String>>>;

fn candidate_labels(skills: CandidateSkills) -> Vec<String> {
    skills
        .unwrap_or_default()
        .iter()
        .map(|skill| normalize_opt(skill.as_deref()))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoreRequest {
    pub candidate_skills: CandidateSkills,
    pub required_skills: Option<Vec<RequiredSkillInput>>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub result: ProfileScore,
    pub weighted: bool,
    pub summary: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CandidateRequest {
    pub candidate_skills: CandidateSkills,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RankRequest {
    pub candidate_skills: CandidateSkills,
    pub limit: Option<usize>,
    pub min_score: Option<f64>,
}

impl RankRequest {
    fn options(&self) -> Result<RankOptions, ApiError> {
        let min_score = self.min_score.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&min_score) {
            return Err(ApiError::BadRequest(
                "min_score must be within [0, 1]".into(),
            ));
        }
        if self.limit == Some(0) {
            return Err(ApiError::BadRequest("limit must be positive".into()));
        }

        Ok(RankOptions {
            limit: self.limit,
            min_score,
        })
    }
}

pub async fn score_profile(
    State(state): State<SharedState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let candidates = candidate_labels(request.candidate_skills);
    let required = request.required_skills.unwrap_or_default();
    let weighted = required.iter().any(|skill| skill.explicit_weight().is_some());

    let result = if weighted {
        let required: Vec<RequiredSkill> =
            required.iter().map(RequiredSkillInput::to_required_skill).collect();
        state.matcher.score_profile_weighted(&candidates, &required)
    } else {
        let labels: Vec<&str> = required.iter().map(RequiredSkillInput::label).collect();
        state.matcher.score_profile(&candidates, &labels)
    };

    let summary = result.summary();
    Ok(Json(ScoreResponse {
        result,
        weighted,
        summary,
    }))
}

pub async fn best_job(
    State(state): State<SharedState>,
    Json(request): Json<CandidateRequest>,
) -> Result<Json<RankedJob>, ApiError> {
    let candidates = candidate_labels(request.candidate_skills);

    state
        .matcher
        .find_best_job(&candidates)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("job catalog is empty".into()))
}

pub async fn rank_jobs(
    State(state): State<SharedState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<Vec<RankedJob>>, ApiError> {
    let options = request.options()?;
    let candidates = candidate_labels(request.candidate_skills);

    Ok(Json(state.matcher.rank_jobs(&candidates, &options)))
}
