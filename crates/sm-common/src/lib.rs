pub mod catalog;
pub mod engine;
pub mod error;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod synonyms;

pub use catalog::{CatalogFile, JobCatalog, JobProfile, RequiredSkill};
pub use engine::SkillMatcher;
pub use error::ConfigError;
pub use matching::{
    matcher::{MatchKind, SkillMatch},
    ranker::{JobRanker, RankOptions, RankedJob},
    scoring::{ProfileScore, ScoringConfig},
};
pub use synonyms::{SynonymGroup, SynonymTable};
