pub mod explanation;
pub mod scoring;
pub mod tables;
pub mod weights;

pub use scoring::{SkillOverlap, SubScores};
pub use tables::ExperienceParams;
pub use weights::{Weights, DEFAULT_WEIGHTS};

use serde::{Deserialize, Serialize};

/// マッチング結果（呼び出しごとの不変な出力）
///
/// 同一入力・同一モデル状態なら常にビット単位で同一になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: String,
    pub company: String,
    pub title: String,
    pub industry: String,
    pub city: String,
    /// 校正済み信頼度（% 小数1桁、5.0〜95.0）
    pub confidence: f64,
    /// 必須スキル一致率（% 小数1桁）
    pub skill_match_score: f64,
    pub experience_match_score: f64,
    pub education_match_score: f64,
    /// 小文字化済み
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub explanation: String,
    #[serde(default)]
    pub job_url: String,
    #[serde(default)]
    pub job_source: String,
}

/// スコアの出力表現（小数1桁）へ丸める
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
