use std::path::PathBuf;

use thiserror::Error;

/// 起動時の設定（同義語辞書・求人カタログ・閾値）読み込みエラー
///
/// スコアリング自体はエラーを返さない。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("synonym group at position {0} has an empty id")]
    EmptyGroupId(usize),
    #[error("job profile at position {0} has an empty name")]
    EmptyJobName(usize),
    #[error("duplicate job profile name: {0}")]
    DuplicateJob(String),
}
