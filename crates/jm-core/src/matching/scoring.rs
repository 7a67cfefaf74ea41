use super::tables::{ExperienceParams, RELATED_INDUSTRIES};
use super::weights::Weights;
use crate::embedding::{cosine_similarity, SkillEmbedder};
use crate::EducationEntry;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// 必須スキルとの照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct SkillOverlap {
    /// |matched ∩ required| / |required|（required 空なら名目上 1.0）
    pub score: f64,
    /// 小文字化済み、求人の必須スキル初出順
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// 5つのサブスコア（各 0.0〜1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub skill_semantic: f64,
    pub skill_exact: f64,
    pub experience: f64,
    pub education: f64,
    pub industry: f64,
}

impl SubScores {
    /// 重み付き線形結合（校正前の raw スコア）
    pub fn raw(&self, weights: &Weights) -> f64 {
        weights.skill_semantic * self.skill_semantic
            + weights.skill_exact * self.skill_exact
            + weights.experience * self.experience
            + weights.education * self.education
            + weights.industry * self.industry
    }
}

/// 意味的スキル類似度
///
/// モデル未学習、またはどちらかのスキル列が空なら 0。
pub fn semantic_score(
    embedder: &SkillEmbedder,
    trained: bool,
    candidate_skills: &[String],
    job_skills: &[String],
) -> f64 {
    if !trained || candidate_skills.is_empty() || job_skills.is_empty() {
        return 0.0;
    }

    match (embedder.embed(candidate_skills), embedder.embed(job_skills)) {
        (Ok(candidate_vec), Ok(job_vec)) => cosine_similarity(&candidate_vec, &job_vec),
        _ => {
            debug!("embedder unavailable; semantic score degraded to 0");
            0.0
        }
    }
}

/// 必須スキルとの完全一致スコア
pub fn exact_skill_overlap(candidate_skills: &[String], job_skills: &[String]) -> SkillOverlap {
    if job_skills.is_empty() {
        return SkillOverlap {
            score: 1.0,
            matched: Vec::new(),
            missing: Vec::new(),
        };
    }

    let candidate_set: HashSet<String> =
        candidate_skills.iter().map(|s| s.to_lowercase()).collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for skill in job_skills {
        let lower = skill.to_lowercase();
        if !seen.insert(lower.clone()) {
            continue;
        }
        if candidate_set.contains(&lower) {
            matched.push(lower);
        } else {
            missing.push(lower);
        }
    }

    let required_total = matched.len() + missing.len();
    SkillOverlap {
        score: matched.len() as f64 / required_total as f64,
        matched,
        missing,
    }
}

/// 構造化スキルの無い求人向けのタイトル/説明文との関連度
///
/// 完全部分一致 +1、4文字以上のスキルは 3文字以上の構成語一致で +0.5。
/// 一致が1件でもあれば下限 0.4、皆無なら一律 0.3。
pub fn title_relevance(candidate_skills: &[String], job_title: &str, job_description: &str) -> f64 {
    if candidate_skills.is_empty() {
        return 0.3;
    }

    let text = format!("{} {}", job_title, job_description).to_lowercase();

    let mut matches = 0.0_f64;
    for skill in candidate_skills {
        let lower = skill.to_lowercase();
        if text.contains(&lower) {
            matches += 1.0;
        } else if lower.len() > 3
            && lower
                .split_whitespace()
                .any(|word| word.len() > 2 && text.contains(word))
        {
            matches += 0.5;
        }
    }

    if matches > 0.0 {
        let score = (matches / candidate_skills.len().min(5) as f64).min(1.0);
        score.max(0.4)
    } else {
        0.3
    }
}

/// 経験年数スコア
///
/// 要件以上なら 1.0（上限を threshold 年超えると overqualified_penalty）。
/// 要件未満は (years/min) × underqualified_penalty。上限なし・上限 0 は
/// 過剰資格チェックの対象外。
pub fn experience_score(
    candidate_years: f64,
    min_experience: f64,
    max_experience: Option<f64>,
    params: &ExperienceParams,
) -> f64 {
    if candidate_years >= min_experience {
        if let Some(max) = max_experience {
            if max > 0.0 && candidate_years > max + params.overqualified_threshold {
                return params.overqualified_penalty;
            }
        }
        1.0
    } else {
        let ratio = if min_experience > 0.0 {
            candidate_years / min_experience
        } else {
            1.0
        };
        ratio * params.underqualified_penalty
    }
}

/// 学歴スコア
///
/// 要件なし・要件がテーブル外なら 1.0、学歴未記録は 0.5、
/// 記録ありで要件未満はレベル比。
pub fn education_score(
    education: &[EducationEntry],
    required: &str,
    levels: &BTreeMap<String, u32>,
) -> f64 {
    if required.is_empty() {
        return 1.0;
    }

    let required_level = levels
        .get(required.to_lowercase().as_str())
        .copied()
        .unwrap_or(0);

    if education.is_empty() {
        return 0.5;
    }

    let candidate_level = education
        .iter()
        .map(|entry| {
            levels
                .get(entry.degree.to_lowercase().as_str())
                .copied()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);

    if candidate_level >= required_level {
        1.0
    } else if candidate_level > 0 {
        candidate_level as f64 / required_level as f64
    } else {
        0.5
    }
}

/// 業界スコア
///
/// 完全一致 1.0、関連テーブル一致 0.7、それ以外 0.3。
/// どちらか不明なら中立の 0.5。
pub fn industry_score(candidate_industries: &[String], job_industry: &str) -> f64 {
    if job_industry.is_empty() || candidate_industries.is_empty() {
        return 0.5;
    }

    let job_lower = job_industry.to_lowercase();
    let candidate_lower: Vec<String> = candidate_industries
        .iter()
        .map(|i| i.to_lowercase())
        .collect();

    if candidate_lower.iter().any(|industry| *industry == job_lower) {
        return 1.0;
    }

    let related = RELATED_INDUSTRIES
        .get(job_lower.as_str())
        .copied()
        .unwrap_or(&[]);
    if candidate_lower
        .iter()
        .any(|industry| related.contains(&industry.as_str()))
    {
        return 0.7;
    }

    0.3
}
