use crate::embedding::SkillEmbedder;
use crate::feedback::{Calibration, FeedbackLog, FeedbackRecord, FeedbackType};
use crate::matching::explanation::generate_explanation;
use crate::matching::scoring::{
    exact_skill_overlap, education_score, experience_score, industry_score, semantic_score,
    title_relevance, SubScores,
};
use crate::matching::tables::{default_education_levels, ExperienceParams};
use crate::matching::weights::Weights;
use crate::matching::{round1, MatchResult};
use crate::training::{optimize_weights, TrainingSample, MIN_LABELED_SAMPLES};
use crate::{Candidate, JobPosting};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// マッチャーの動作設定（環境変数から上書き可能）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// 重み最適化を起動する最小ラベル数
    pub min_labeled_samples: usize,
    /// 再校正を走らせる記録間隔
    pub recalibration_trigger: usize,
    /// 再校正が遡る履歴件数
    pub recalibration_window: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_labeled_samples: MIN_LABELED_SAMPLES,
            recalibration_trigger: 20,
            recalibration_window: 100,
        }
    }
}

impl MatcherConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_labeled_samples: env_usize("JM_MIN_LABELED_SAMPLES", defaults.min_labeled_samples),
            recalibration_trigger: env_usize("JM_FEEDBACK_TRIGGER", defaults.recalibration_trigger),
            recalibration_window: env_usize("JM_FEEDBACK_WINDOW", defaults.recalibration_window),
        }
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// 候補者と求人を突き合わせる学習可能なマッチングエンジン
///
/// `match_candidate` は読み取り専用の純関数。`train` と
/// `record_feedback` だけが状態を変更する（共有する場合は
/// `SharedMatcher` で直列化する）。
#[derive(Debug, Clone, PartialEq)]
pub struct JobMatcher {
    pub(crate) embedder: SkillEmbedder,
    pub(crate) weights: Weights,
    pub(crate) exp_params: ExperienceParams,
    pub(crate) education_levels: BTreeMap<String, u32>,
    pub(crate) calibration: Calibration,
    pub(crate) feedback: FeedbackLog,
    pub(crate) trained: bool,
    pub(crate) config: MatcherConfig,
}

impl Default for JobMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl JobMatcher {
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            embedder: SkillEmbedder::new(),
            weights: Weights::default(),
            exp_params: ExperienceParams::default(),
            education_levels: default_education_levels(),
            calibration: Calibration::default(),
            feedback: FeedbackLog::default(),
            trained: false,
            config,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn feedback(&self) -> &FeedbackLog {
        &self.feedback
    }

    pub fn embedder(&self) -> &SkillEmbedder {
        &self.embedder
    }

    /// 学習: 埋め込みモデルを全スキル列で fit し、ラベルが足りれば
    /// 重みをグリッドサーチで置き換える
    ///
    /// ラベル不足はエラーではない（デフォルト重みのまま学習済みになる）。
    pub fn train(&mut self, samples: &[TrainingSample]) {
        let mut documents = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            documents.push(sample.candidate_skills.clone());
            documents.push(sample.job_skills.clone());
        }
        self.embedder.fit(&documents);

        let labeled: Vec<&TrainingSample> =
            samples.iter().filter(|s| s.was_hired.is_some()).collect();
        if labeled.len() >= self.config.min_labeled_samples {
            self.weights = optimize_weights(
                &labeled,
                &self.exp_params,
                &self.education_levels,
                self.weights,
            );
        } else {
            debug!(
                labeled = labeled.len(),
                required = self.config.min_labeled_samples,
                "not enough labeled samples; keeping current weights"
            );
        }

        self.trained = true;
        info!(
            documents = documents.len(),
            vocabulary = self.embedder.vocabulary_len(),
            labeled = labeled.len(),
            "matcher trained"
        );
    }

    /// 候補者1名と求人1件のマッチング（純関数・読み取り専用）
    pub fn match_candidate(&self, candidate: &Candidate, job: &JobPosting) -> MatchResult {
        // 構造化スキルの無い求人はタイトル/説明文から関連度を推定する
        let relevance = if job.required_skills.is_empty() {
            title_relevance(&candidate.skills, &job.title, &job.description)
        } else {
            0.0
        };

        let skill_semantic = semantic_score(
            &self.embedder,
            self.trained,
            &candidate.skills,
            &job.required_skills,
        );

        let overlap = exact_skill_overlap(&candidate.skills, &job.required_skills);
        let mut skill_exact = overlap.score;
        let mut matched_skills = overlap.matched;
        let missing_skills = overlap.missing;

        if job.required_skills.is_empty() && relevance > 0.0 {
            skill_exact = relevance;
            // タイトル/説明文に現れた候補者スキルを擬似マッチとして列挙
            let text = format!("{} {}", job.title, job.description).to_lowercase();
            for skill in &candidate.skills {
                let lower = skill.to_lowercase();
                if text.contains(&lower) && !matched_skills.contains(&lower) {
                    matched_skills.push(lower);
                }
            }
        }

        let experience = experience_score(
            candidate.experience_years,
            job.min_experience,
            job.max_experience,
            &self.exp_params,
        );
        let education = education_score(
            &candidate.education,
            &job.education_required,
            &self.education_levels,
        );
        let industry = industry_score(&candidate.industries, &job.industry);

        let sub_scores = SubScores {
            skill_semantic,
            skill_exact,
            experience,
            education,
            industry,
        };
        let mut raw_score = sub_scores.raw(&self.weights);
        if relevance > 0.0 && raw_score < 0.5 {
            raw_score = raw_score.max(relevance * 0.7);
        }

        let confidence = self.calibration.confidence(raw_score);
        let explanation =
            generate_explanation(experience, &matched_skills, &missing_skills, confidence);

        MatchResult {
            job_id: job.id.clone(),
            company: job.company.clone(),
            title: job.title.clone(),
            industry: job.industry.clone(),
            city: job.city.clone(),
            confidence: round1(confidence),
            skill_match_score: round1(skill_exact * 100.0),
            experience_match_score: round1(experience * 100.0),
            education_match_score: round1(education * 100.0),
            matched_skills,
            missing_skills,
            explanation,
            job_url: job.job_url.clone(),
            job_source: job.job_source.clone(),
        }
    }

    /// フィードバックを記録し、規定の間隔で信頼度を再校正する
    pub fn record_feedback(
        &mut self,
        result: &MatchResult,
        was_successful: bool,
        feedback_type: FeedbackType,
    ) {
        self.feedback.push(FeedbackRecord {
            job_id: result.job_id.clone(),
            predicted_confidence: result.confidence,
            was_successful,
            feedback_type,
            timestamp: Utc::now(),
        });

        let count = self.feedback.len();
        if count >= self.config.recalibration_trigger
            && count % self.config.recalibration_trigger == 0
        {
            self.feedback.recalibrate(
                &mut self.calibration,
                self.config.recalibration_trigger,
                self.config.recalibration_window,
            );
            info!(
                records = count,
                shift = self.calibration.shift,
                "confidence recalibrated from feedback"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EducationEntry;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn full_candidate() -> Candidate {
        Candidate {
            skills: skills(&["python", "react", "sql", "aws", "docker"]),
            experience_years: 5.0,
            education: vec![EducationEntry {
                degree: "Bachelors".into(),
                field: Some("Computer Science".into()),
            }],
            industries: vec!["Technology".into()],
        }
    }

    fn full_job() -> JobPosting {
        JobPosting {
            id: "job_001".into(),
            title: "Senior Software Engineer".into(),
            company: "Tech Corp".into(),
            industry: "Technology".into(),
            city: "San Francisco".into(),
            required_skills: skills(&["python", "react", "aws", "postgresql", "docker"]),
            min_experience: 3.0,
            max_experience: Some(8.0),
            education_required: "bachelors".into(),
            ..JobPosting::default()
        }
    }

    fn training_corpus() -> Vec<TrainingSample> {
        vec![
            TrainingSample {
                candidate_skills: skills(&["python", "react", "sql", "aws"]),
                job_skills: skills(&["python", "react", "aws", "postgresql", "docker"]),
                ..TrainingSample::default()
            },
            TrainingSample {
                candidate_skills: skills(&["java", "spring", "sql"]),
                job_skills: skills(&["python", "django", "postgresql"]),
                ..TrainingSample::default()
            },
            TrainingSample {
                candidate_skills: skills(&["docker", "aws", "python"]),
                job_skills: skills(&["docker", "kubernetes", "aws"]),
                ..TrainingSample::default()
            },
        ]
    }

    #[test]
    fn match_reproduces_the_reference_scenario() {
        let mut matcher = JobMatcher::new();
        matcher.train(&training_corpus());

        let result = matcher.match_candidate(&full_candidate(), &full_job());

        assert_eq!(result.skill_match_score, 80.0);
        assert_eq!(result.experience_match_score, 100.0);
        assert_eq!(result.missing_skills, vec!["postgresql"]);
        assert_eq!(
            result.matched_skills,
            vec!["python", "react", "aws", "docker"]
        );
        assert_eq!(result.job_id, "job_001");
        assert_eq!(result.job_source, "synthetic");
    }

    #[test]
    fn match_is_a_pure_function() {
        let mut matcher = JobMatcher::new();
        matcher.train(&training_corpus());

        let first = matcher.match_candidate(&full_candidate(), &full_job());
        let second = matcher.match_candidate(&full_candidate(), &full_job());
        assert_eq!(first, second);
    }

    #[test]
    fn untrained_matcher_still_matches_with_zero_semantic_score() {
        let matcher = JobMatcher::new();
        let result = matcher.match_candidate(&full_candidate(), &full_job());

        // exact skill scoring is unaffected by the missing embedding model
        assert_eq!(result.skill_match_score, 80.0);
        assert!(result.confidence >= 5.0 && result.confidence <= 95.0);

        let mut trained = JobMatcher::new();
        trained.train(&training_corpus());
        let trained_result = trained.match_candidate(&full_candidate(), &full_job());
        assert!(trained_result.confidence >= result.confidence);
    }

    #[test]
    fn underqualified_candidate_gets_scaled_experience_score() {
        let matcher = JobMatcher::new();
        let mut candidate = full_candidate();
        candidate.experience_years = 1.0;
        let mut job = full_job();
        job.min_experience = 5.0;
        job.max_experience = None;

        let result = matcher.match_candidate(&candidate, &job);
        assert_eq!(result.experience_match_score, 14.0);
        assert!(result
            .explanation
            .contains("May need more experience for this role."));
    }

    #[test]
    fn job_without_required_skills_uses_title_relevance() {
        let matcher = JobMatcher::new();
        let candidate = full_candidate();
        let mut job = full_job();
        job.required_skills = Vec::new();
        job.title = "Graphic Designer".into();
        job.description = "Own the visual identity of the brand.".into();

        let result = matcher.match_candidate(&candidate, &job);
        // nothing overlaps: the 0.3 relevance floor applies, not 100%
        assert_eq!(result.skill_match_score, 30.0);
        assert!(result.matched_skills.is_empty());
    }

    #[test]
    fn title_relevance_lists_pseudo_matched_skills() {
        let matcher = JobMatcher::new();
        let candidate = full_candidate();
        let mut job = full_job();
        job.required_skills = Vec::new();
        job.title = "Python Engineer".into();
        job.description = "Deploy services on AWS with Docker.".into();

        let result = matcher.match_candidate(&candidate, &job);
        assert!(result.skill_match_score >= 40.0);
        assert_eq!(result.matched_skills, vec!["python", "aws", "docker"]);
    }

    #[test]
    fn confidence_stays_inside_bounds_across_extremes() {
        let mut matcher = JobMatcher::new();
        matcher.train(&training_corpus());

        let perfect = matcher.match_candidate(&full_candidate(), &full_job());
        assert!(perfect.confidence <= 95.0);

        let empty = Candidate::default();
        let result = matcher.match_candidate(&empty, &full_job());
        assert!(result.confidence >= 5.0);
    }

    #[test]
    fn feedback_recalibrates_on_every_twentieth_record() {
        let mut matcher = JobMatcher::new();
        matcher.train(&training_corpus());
        let result = matcher.match_candidate(&full_candidate(), &full_job());

        for _ in 0..19 {
            matcher.record_feedback(&result, false, FeedbackType::Application);
        }
        assert_eq!(matcher.calibration().shift, 0.0);

        matcher.record_feedback(&result, false, FeedbackType::Application);
        assert!(matcher.calibration().shift < 0.0);

        // between triggers the shift stays put
        let after_twenty = matcher.calibration().shift;
        matcher.record_feedback(&result, false, FeedbackType::Interview);
        assert_eq!(matcher.calibration().shift, after_twenty);
    }

    #[test]
    fn too_few_labels_keep_default_weights() {
        let mut matcher = JobMatcher::new();
        let mut samples = training_corpus();
        samples[0].was_hired = Some(true);
        matcher.train(&samples);

        assert!(matcher.is_trained());
        assert_eq!(*matcher.weights(), Weights::default());
    }

    #[test]
    fn enough_labels_replace_weights_wholesale() {
        let mut matcher = JobMatcher::new();
        let samples: Vec<TrainingSample> = (0..12)
            .map(|i| TrainingSample {
                candidate_skills: if i % 2 == 0 {
                    skills(&["python", "sql"])
                } else {
                    Vec::new()
                },
                job_skills: skills(&["python", "sql"]),
                was_hired: Some(i % 2 == 0),
                candidate_experience: 5.0,
                job_min_experience: 3.0,
                ..TrainingSample::default()
            })
            .collect();
        matcher.train(&samples);

        // the separable corpus selects the first enumerated combination
        assert_eq!(matcher.weights().skill_semantic, 0.2);
        assert_eq!(matcher.weights().skill_exact, 0.3);
        assert_eq!(matcher.weights().experience, 0.15);
    }

    #[test]
    fn config_defaults_match_documented_constants() {
        let config = MatcherConfig::default();
        assert_eq!(config.min_labeled_samples, 10);
        assert_eq!(config.recalibration_trigger, 20);
        assert_eq!(config.recalibration_window, 100);
    }
}
