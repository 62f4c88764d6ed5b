use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::SkillMatcher;
use crate::error::ConfigError;
use crate::matching::scoring::ScoringConfig;
use crate::normalize::normalize;
use crate::synonyms::{SynonymGroup, SynonymTable};

fn default_weight() -> f64 {
    1.0
}

/// 必須スキル（重みは省略時 1.0）
///
/// JSON では `"Java"` と `{"label": "Java", "weight": 3.0}` のどちらも受け付ける。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RequiredSkillRepr")]
pub struct RequiredSkill {
    pub label: String,
    pub weight: f64,
}

impl RequiredSkill {
    pub fn new(label: impl Into<String>) -> Self {
        Self::weighted(label, default_weight())
    }

    pub fn weighted(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }

    pub fn has_default_weight(&self) -> bool {
        self.weight == default_weight()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequiredSkillRepr {
    Label(String),
    Weighted {
        label: String,
        #[serde(default = "default_weight")]
        weight: f64,
    },
}

impl From<RequiredSkillRepr> for RequiredSkill {
    fn from(repr: RequiredSkillRepr) -> Self {
        match repr {
            RequiredSkillRepr::Label(label) => Self::new(label),
            RequiredSkillRepr::Weighted { label, weight } => Self::weighted(label, weight),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    pub name: String,
    pub skills: Vec<RequiredSkill>,
}

impl JobProfile {
    pub fn new<I, S>(name: impl Into<String>, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            skills: skills.into_iter().map(RequiredSkill::new).collect(),
        }
    }

    pub fn weighted(name: impl Into<String>, skills: Vec<RequiredSkill>) -> Self {
        Self {
            name: name.into(),
            skills,
        }
    }

    /// 1.0 以外の重みを 1 つでも持つか
    pub fn is_weighted(&self) -> bool {
        self.skills.iter().any(|skill| !skill.has_default_weight())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.skills.iter().map(|skill| skill.label.as_str()).collect()
    }
}

const BUILTIN_JOBS: &[(&str, &[&str])] = &[
    (
        "Backend Developer",
        &["Java", "Spring Boot", "SQL", "REST API", "Docker"],
    ),
    (
        "Frontend Developer",
        &["JavaScript", "TypeScript", "React", "HTML", "CSS"],
    ),
    (
        "Full Stack Developer",
        &["JavaScript", "Node.js", "React", "SQL", "Git"],
    ),
    (
        "PHP Developer",
        &["PHP", "Symfony", "MySQL", "JavaScript", "Git"],
    ),
    (
        "Data Scientist",
        &["Python", "Machine Learning", "Pandas", "SQL", "Statistics"],
    ),
    (
        "DevOps Engineer",
        &["Docker", "Kubernetes", "CI/CD", "AWS", "Linux"],
    ),
    (
        "Mobile Developer",
        &["Kotlin", "Swift", "Flutter", "Android", "iOS"],
    ),
    (
        "QA Engineer",
        &["Selenium", "JUnit", "Test Automation", "Agile"],
    ),
];

/// 求人プロファイルの静的カタログ
///
/// 並び順 = 登録順。同点時のタイブレークはこの順序に依存する。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobCatalog {
    profiles: Vec<JobProfile>,
}

impl JobCatalog {
    /// 空名・重複名（正規化後）を拒否する
    pub fn new(profiles: Vec<JobProfile>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for (position, profile) in profiles.iter().enumerate() {
            let key = normalize(&profile.name);
            if key.is_empty() {
                return Err(ConfigError::EmptyJobName(position));
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateJob(profile.name.clone()));
            }
        }

        Ok(Self { profiles })
    }

    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_JOBS
                .iter()
                .map(|(name, skills)| JobProfile::new(*name, skills.iter().copied()))
                .collect(),
        }
    }

    pub fn profiles(&self) -> &[JobProfile] {
        &self.profiles
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&JobProfile> {
        let key = normalize(name);
        self.profiles.iter().find(|p| normalize(&p.name) == key)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// 起動時に一度だけ読む設定ファイル（JSON）
///
/// 省略したセクションは組み込みの辞書・カタログ・既定閾値で補う。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub synonyms: Option<Vec<SynonymGroup>>,
    pub jobs: Option<Vec<JobProfile>>,
    pub scoring: Option<ScoringConfig>,
}

impl CatalogFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            synonym_groups = file.synonyms.as_ref().map(Vec::len),
            jobs = file.jobs.as_ref().map(Vec::len),
            "loaded catalog file"
        );
        Ok(file)
    }

    /// 検証したうえで不変のエンジンを組み立てる
    pub fn into_matcher(self) -> Result<SkillMatcher, ConfigError> {
        let synonyms = match self.synonyms {
            Some(groups) => {
                if let Some(position) = groups.iter().position(|g| g.id.trim().is_empty()) {
                    return Err(ConfigError::EmptyGroupId(position));
                }
                SynonymTable::new(groups)
            }
            None => SynonymTable::builtin(),
        };

        let catalog = match self.jobs {
            Some(jobs) => JobCatalog::new(jobs)?,
            None => JobCatalog::builtin(),
        };

        let scoring = self.scoring.unwrap_or_default();
        SkillMatcher::new(synonyms, catalog, scoring)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn required_skill_accepts_string_or_object() {
        let skills: Vec<RequiredSkill> =
            serde_json::from_str(r#"["Java", {"label": "SQL", "weight": 3.0}, {"label": "Git"}]"#)
                .unwrap();
        assert_eq!(
            skills,
            vec![
                RequiredSkill::new("Java"),
                RequiredSkill::weighted("SQL", 3.0),
                RequiredSkill::new("Git"),
            ]
        );
    }

    #[test]
    fn detects_weighted_profiles() {
        let plain = JobProfile::new("Backend", ["Java", "SQL"]);
        assert!(!plain.is_weighted());

        let weighted = JobProfile::weighted(
            "Backend",
            vec![RequiredSkill::weighted("Java", 3.0), RequiredSkill::new("SQL")],
        );
        assert!(weighted.is_weighted());
        assert_eq!(weighted.labels(), vec!["Java", "SQL"]);
    }

    #[test]
    fn builtin_catalog_keeps_declaration_order() {
        let catalog = JobCatalog::builtin();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.names()[0], "Backend Developer");
        assert_eq!(catalog.names()[1], "Frontend Developer");
        assert!(catalog.get("data scientist").is_some());
    }

    #[test]
    fn rejects_duplicate_and_empty_names() {
        let err = JobCatalog::new(vec![
            JobProfile::new("Backend", ["Java"]),
            JobProfile::new(" backend ", ["Go"]),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateJob(name) if name == " backend "));

        let err = JobCatalog::new(vec![JobProfile::new("  ", ["Java"])]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyJobName(0)));
    }

    #[test]
    fn loads_catalog_file_and_builds_matcher() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "synonyms": [{{"id": "js", "members": ["javascript", "js"]}}],
                "jobs": [
                    {{"name": "Frontend", "skills": ["JavaScript", "CSS"]}},
                    {{"name": "Data", "skills": [{{"label": "Python", "weight": 2.0}}, "SQL"]}}
                ],
                "scoring": {{"match_threshold": 0.8}}
            }}"#
        )
        .unwrap();

        let loaded = CatalogFile::load(file.path()).unwrap();
        let matcher = loaded.into_matcher().unwrap();

        assert_eq!(matcher.list_jobs(), vec!["Frontend", "Data"]);
        assert_eq!(matcher.scoring_config().match_threshold, 0.8);
        assert_eq!(matcher.scoring_config().partial_credit_factor, 0.3);
        assert_eq!(matcher.synonyms().group_of("js"), Some("js"));
    }

    #[test]
    fn empty_file_falls_back_to_builtins() {
        let matcher = serde_json::from_str::<CatalogFile>("{}")
            .unwrap()
            .into_matcher()
            .unwrap();
        assert_eq!(matcher.list_jobs(), JobCatalog::builtin().names());
        assert_eq!(matcher.scoring_config(), &ScoringConfig::default());
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let err = CatalogFile::load("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = CatalogFile::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_blank_group_ids_and_bad_thresholds() {
        let file = CatalogFile {
            synonyms: Some(vec![SynonymGroup::new(" ", ["a"])]),
            ..CatalogFile::default()
        };
        assert!(matches!(file.into_matcher(), Err(ConfigError::EmptyGroupId(0))));

        let file = CatalogFile {
            scoring: Some(ScoringConfig {
                match_threshold: -0.1,
                ..ScoringConfig::default()
            }),
            ..CatalogFile::default()
        };
        assert!(matches!(
            file.into_matcher(),
            Err(ConfigError::OutOfRange { name: "match_threshold", .. })
        ));
    }
}
