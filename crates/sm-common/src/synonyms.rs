use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// 同義スキル群（例: javascript = {js, ecmascript, es6, ...}）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub id: String,
    pub members: Vec<String>,
}

impl SynonymGroup {
    pub fn new<I, S>(id: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// 組み込みの同義語辞書
///
/// NOTE: canonical 名も members に含めること（group_of は members しか見ない）。
const BUILTIN_GROUPS: &[(&str, &[&str])] = &[
    // Languages
    (
        "javascript",
        &[
            "javascript",
            "js",
            "java script",
            "ecmascript",
            "es6",
            "es2015",
        ],
    ),
    ("typescript", &["typescript", "ts", "type script"]),
    ("python", &["python", "py", "python3", "python 3"]),
    ("csharp", &["c#", "csharp", "c sharp"]),
    ("cpp", &["c++", "cpp", "cplusplus"]),
    ("golang", &["go", "golang", "go lang"]),
    ("kotlin", &["kotlin", "kt"]),
    ("php", &["php", "php7", "php8"]),
    ("ruby", &["ruby", "rb"]),
    // Web
    ("html", &["html", "html5", "hypertext markup language"]),
    ("css", &["css", "css3", "cascading style sheets"]),
    ("sass", &["sass", "scss"]),
    ("nodejs", &["nodejs", "node.js", "node js", "node"]),
    ("react", &["react", "reactjs", "react.js", "react js"]),
    ("vue", &["vue", "vuejs", "vue.js", "vue js"]),
    ("angular", &["angular", "angularjs", "angular.js"]),
    // Backend frameworks
    (
        "spring",
        &["spring", "spring boot", "springboot", "spring framework"],
    ),
    ("django", &["django", "django rest framework", "drf"]),
    ("symfony", &["symfony", "symfony framework"]),
    ("laravel", &["laravel", "laravel framework"]),
    ("dotnet", &[".net", "dotnet", "asp.net", ".net core"]),
    // Data
    ("sql", &["sql", "structured query language", "t-sql", "pl/sql"]),
    ("postgresql", &["postgresql", "postgres", "psql"]),
    ("mongodb", &["mongodb", "mongo"]),
    (
        "machinelearning",
        &["machine learning", "machinelearning", "ml"],
    ),
    (
        "deeplearning",
        &["deep learning", "deeplearning", "neural networks"],
    ),
    ("tensorflow", &["tensorflow", "tensor flow", "tf"]),
    ("pytorch", &["pytorch", "torch", "py torch"]),
    // Cloud / infra
    ("aws", &["aws", "amazon web services"]),
    ("gcp", &["gcp", "google cloud", "google cloud platform"]),
    ("azure", &["azure", "microsoft azure"]),
    ("kubernetes", &["kubernetes", "k8s", "kube"]),
    ("docker", &["docker", "docker compose", "containers"]),
    (
        "cicd",
        &[
            "ci/cd",
            "cicd",
            "continuous integration",
            "continuous delivery",
        ],
    ),
    // Testing
    ("junit", &["junit", "junit5"]),
    ("pytest", &["pytest", "py.test"]),
    // Ways of working
    ("agile", &["agile", "scrum", "kanban"]),
    ("git", &["git", "github", "gitlab"]),
];

/// 正規化済みラベル → 同義グループ の読み取り専用テーブル
///
/// 構築後は不変。スコアリング中に書き換えられることはない。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<SynonymGroup>")]
pub struct SynonymTable {
    groups: Vec<SynonymGroup>,
    index: HashMap<String, usize>,
}

impl SynonymTable {
    /// グループ順を保ったまま索引を作る。同じラベルが複数グループにある場合は先勝ち。
    pub fn new(groups: Vec<SynonymGroup>) -> Self {
        let mut index = HashMap::new();
        for (position, group) in groups.iter().enumerate() {
            for member in &group.members {
                let key = normalize(member);
                if key.is_empty() {
                    continue;
                }
                index.entry(key).or_insert(position);
            }
        }

        Self { groups, index }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_GROUPS
                .iter()
                .map(|(id, members)| SynonymGroup::new(*id, members.iter().copied()))
                .collect(),
        )
    }

    /// 正規化済みラベルが属するグループ id
    pub fn group_of(&self, normalized_label: &str) -> Option<&str> {
        self.index
            .get(normalized_label)
            .map(|&position| self.groups[position].id.as_str())
    }

    pub fn groups(&self) -> &[SynonymGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl From<Vec<SynonymGroup>> for SynonymTable {
    fn from(groups: Vec<SynonymGroup>) -> Self {
        Self::new(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_resolves_aliases() {
        let table = SynonymTable::builtin();
        assert_eq!(table.group_of("js"), Some("javascript"));
        assert_eq!(table.group_of("javascript"), Some("javascript"));
        assert_eq!(table.group_of("k8s"), Some("kubernetes"));
        assert_eq!(table.group_of("spring boot"), Some("spring"));
        assert_eq!(table.group_of("c#"), Some("csharp"));
    }

    #[test]
    fn unknown_and_typo_labels_have_no_group() {
        let table = SynonymTable::builtin();
        assert_eq!(table.group_of("pyhton"), None);
        assert_eq!(table.group_of("cobol"), None);
        assert_eq!(table.group_of(""), None);
    }

    #[test]
    fn java_and_javascript_are_distinct() {
        let table = SynonymTable::builtin();
        assert_eq!(table.group_of("java"), None);
        assert_ne!(table.group_of("sql"), table.group_of("java"));
    }

    #[test]
    fn first_group_wins_on_shared_member() {
        let table = SynonymTable::new(vec![
            SynonymGroup::new("first", ["shared", "alpha"]),
            SynonymGroup::new("second", ["shared", "beta"]),
        ]);
        assert_eq!(table.group_of("shared"), Some("first"));
        assert_eq!(table.group_of("beta"), Some("second"));
    }

    #[test]
    fn members_are_normalized_on_build() {
        let table = SynonymTable::new(vec![SynonymGroup::new("rust", ["  Rust ", "RustLang"])]);
        assert_eq!(table.group_of("rust"), Some("rust"));
        assert_eq!(table.group_of("rustlang"), Some("rust"));
    }

    #[test]
    fn deserializes_from_group_list() {
        let table: SynonymTable = serde_json::from_str(
            r#"[{"id":"js","members":["JavaScript","JS"]},{"id":"db","members":["SQL"]}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.group_of("javascript"), Some("js"));
        assert_eq!(table.group_of("sql"), Some("db"));
    }

    #[test]
    fn empty_table_matches_nothing() {
        let table = SynonymTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.group_of("js"), None);
    }
}
