pub mod embedding;
pub mod feedback;
pub mod logging;
pub mod matcher;
pub mod matching;
pub mod model_store;
pub mod shared;
pub mod training;

pub use matcher::{JobMatcher, MatcherConfig};
pub use matching::MatchResult;
pub use shared::SharedMatcher;

use serde::{Deserialize, Serialize};

// Commonly used data models for matching functions.

/// 学歴エントリ（学位 + 専攻）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
}

/// 候補者プロフィール
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub industries: Vec<String>,
}

/// 求人情報
///
/// `max_experience` 未設定は上限なし扱い。`education_required` は
/// 序数テーブルと大文字小文字を無視して照合される自由文字列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub min_experience: f64,
    #[serde(default)]
    pub max_experience: Option<f64>,
    #[serde(default)]
    pub education_required: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub job_url: String,
    #[serde(default = "default_job_source")]
    pub job_source: String,
}

fn default_job_source() -> String {
    "synthetic".to_string()
}

impl Default for JobPosting {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            company: String::new(),
            industry: String::new(),
            city: String::new(),
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            min_experience: 0.0,
            max_experience: None,
            education_required: String::new(),
            description: String::new(),
            job_url: String::new(),
            job_source: default_job_source(),
        }
    }
}
