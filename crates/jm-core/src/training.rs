use crate::matching::scoring::{exact_skill_overlap, education_score, experience_score};
use crate::matching::tables::ExperienceParams;
use crate::matching::weights::Weights;
use crate::EducationEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// グリッドサーチ起動に必要なラベル付きサンプル数
pub const MIN_LABELED_SAMPLES: usize = 10;

const SEMANTIC_GRID: [f64; 3] = [0.2, 0.3, 0.4];
const EXACT_GRID: [f64; 3] = [0.3, 0.35, 0.4];
const EXPERIENCE_GRID: [f64; 3] = [0.15, 0.2, 0.25];

/// 学習サンプル
///
/// 欠損フィールドは固定の既定値で補完される（経験 0年、要件 0〜10年、
/// 学歴なし、要件学位 bachelors）。`was_hired` が無いサンプルは
/// コーパス統計にのみ寄与し、重み最適化には使われない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    #[serde(default)]
    pub candidate_skills: Vec<String>,
    #[serde(default)]
    pub job_skills: Vec<String>,
    #[serde(default)]
    pub was_hired: Option<bool>,
    #[serde(default)]
    pub candidate_experience: f64,
    #[serde(default)]
    pub job_min_experience: f64,
    #[serde(default = "default_max_experience")]
    pub job_max_experience: f64,
    #[serde(default)]
    pub candidate_education: Vec<EducationEntry>,
    #[serde(default = "default_job_education")]
    pub job_education: String,
}

fn default_max_experience() -> f64 {
    10.0
}

fn default_job_education() -> String {
    "bachelors".to_string()
}

impl Default for TrainingSample {
    fn default() -> Self {
        Self {
            candidate_skills: Vec::new(),
            job_skills: Vec::new(),
            was_hired: None,
            candidate_experience: 0.0,
            job_min_experience: 0.0,
            job_max_experience: default_max_experience(),
            candidate_education: Vec::new(),
            job_education: default_job_education(),
        }
    }
}

/// 最適化時の内部 raw スコア
///
/// skill_exact + experience + education のみを合算する。semantic と
/// industry はこの内部チェックには寄与しない（match 側は5成分すべてを
/// 使う）。
fn partial_raw_score(
    sample: &TrainingSample,
    weights: &Weights,
    exp_params: &ExperienceParams,
    education_levels: &BTreeMap<String, u32>,
) -> f64 {
    let overlap = exact_skill_overlap(&sample.candidate_skills, &sample.job_skills);
    let experience = experience_score(
        sample.candidate_experience,
        sample.job_min_experience,
        Some(sample.job_max_experience),
        exp_params,
    );
    let education = education_score(
        &sample.candidate_education,
        &sample.job_education,
        education_levels,
    );

    weights.skill_exact * overlap.score
        + weights.experience * experience
        + weights.education * education
}

/// 27通りの重み組み合わせを列挙し、最も精度の高いものを返す
///
/// education/industry は残余の 67%/33%。精度が真に上回った組だけが
/// 採用され、同点は列挙順で先に出た組が勝つ。決定論的な順序は
/// テストで前提にされている。
pub fn optimize_weights(
    labeled: &[&TrainingSample],
    exp_params: &ExperienceParams,
    education_levels: &BTreeMap<String, u32>,
    fallback: Weights,
) -> Weights {
    let mut best_accuracy = 0.0_f64;
    let mut best = fallback;

    for &skill_semantic in &SEMANTIC_GRID {
        for &skill_exact in &EXACT_GRID {
            for &experience in &EXPERIENCE_GRID {
                let remaining = 1.0 - skill_semantic - skill_exact - experience;
                let candidate = Weights {
                    skill_semantic,
                    skill_exact,
                    experience,
                    education: remaining * 0.67,
                    industry: remaining * 0.33,
                };

                let correct = labeled
                    .iter()
                    .filter(|sample| {
                        let score =
                            partial_raw_score(sample, &candidate, exp_params, education_levels);
                        (score > 0.5) == sample.was_hired.unwrap_or(false)
                    })
                    .count();
                let accuracy = correct as f64 / labeled.len() as f64;

                if accuracy > best_accuracy {
                    best_accuracy = accuracy;
                    best = candidate;
                }
            }
        }
    }

    info!(
        accuracy = best_accuracy,
        skill_semantic = best.skill_semantic,
        skill_exact = best.skill_exact,
        experience = best.experience,
        education = best.education,
        industry = best.industry,
        "weight grid search complete"
    );

    best
}
