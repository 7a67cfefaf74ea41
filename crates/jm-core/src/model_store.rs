//! Versioned persistence for the embedding model and the matcher.
//!
//! Two related JSON artifacts: `embedder.json` holds the corpus statistics
//! (vocabulary / IDF / co-occurrence), `matcher.json` holds weights,
//! experience params, the education table, calibration, and the feedback
//! history. A matcher cannot be restored without its embedder, so `load`
//! reads the embedder artifact first.

use crate::embedding::SkillEmbedder;
use crate::feedback::{Calibration, FeedbackLog};
use crate::matcher::{JobMatcher, MatcherConfig};
use crate::matching::tables::ExperienceParams;
use crate::matching::weights::Weights;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const SCHEMA_VERSION: u32 = 1;

const EMBEDDER_FILE: &str = "embedder.json";
const MATCHER_FILE: &str = "matcher.json";

#[derive(Debug, Error)]
pub enum ModelStoreError {
    #[error("model artifact io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },
}

#[derive(Debug, Serialize, Deserialize)]
struct EmbedderArtifact {
    schema_version: u32,
    embedder: SkillEmbedder,
}

#[derive(Debug, Serialize, Deserialize)]
struct MatcherArtifact {
    schema_version: u32,
    weights: Weights,
    exp_params: ExperienceParams,
    education_levels: BTreeMap<String, u32>,
    calibration: Calibration,
    feedback: FeedbackLog,
    trained: bool,
}

/// Write both artifacts into `dir`, creating it if needed.
pub fn save(matcher: &JobMatcher, dir: &Path) -> Result<(), ModelStoreError> {
    fs::create_dir_all(dir)?;

    let embedder = EmbedderArtifact {
        schema_version: SCHEMA_VERSION,
        embedder: matcher.embedder.clone(),
    };
    fs::write(
        dir.join(EMBEDDER_FILE),
        serde_json::to_vec_pretty(&embedder)?,
    )?;

    let artifact = MatcherArtifact {
        schema_version: SCHEMA_VERSION,
        weights: matcher.weights,
        exp_params: matcher.exp_params,
        education_levels: matcher.education_levels.clone(),
        calibration: matcher.calibration,
        feedback: matcher.feedback.clone(),
        trained: matcher.trained,
    };
    fs::write(
        dir.join(MATCHER_FILE),
        serde_json::to_vec_pretty(&artifact)?,
    )?;

    info!(dir = %dir.display(), "model artifacts saved");
    Ok(())
}

/// Restore a matcher from `dir` with the default runtime config.
pub fn load(dir: &Path) -> Result<JobMatcher, ModelStoreError> {
    load_with_config(dir, MatcherConfig::default())
}

/// Restore a matcher from `dir`. The embedder artifact must load first;
/// without it the matcher state is not usable.
pub fn load_with_config(dir: &Path, config: MatcherConfig) -> Result<JobMatcher, ModelStoreError> {
    let embedder: EmbedderArtifact = serde_json::from_slice(&fs::read(dir.join(EMBEDDER_FILE))?)?;
    check_version(embedder.schema_version)?;

    let artifact: MatcherArtifact = serde_json::from_slice(&fs::read(dir.join(MATCHER_FILE))?)?;
    check_version(artifact.schema_version)?;

    Ok(JobMatcher {
        embedder: embedder.embedder,
        weights: artifact.weights,
        exp_params: artifact.exp_params,
        education_levels: artifact.education_levels,
        calibration: artifact.calibration,
        feedback: artifact.feedback,
        trained: artifact.trained,
        config,
    })
}

fn check_version(found: u32) -> Result<(), ModelStoreError> {
    if found != SCHEMA_VERSION {
        return Err(ModelStoreError::SchemaVersion {
            found,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::TrainingSample;

    fn trained_matcher() -> JobMatcher {
        let mut matcher = JobMatcher::new();
        matcher.train(&[
            TrainingSample {
                candidate_skills: vec!["python".into(), "sql".into()],
                job_skills: vec!["python".into(), "aws".into()],
                ..TrainingSample::default()
            },
            TrainingSample {
                candidate_skills: vec!["java".into()],
                job_skills: vec!["java".into(), "spring".into()],
                ..TrainingSample::default()
            },
        ]);
        matcher
    }

    #[test]
    fn save_and_load_round_trip_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = trained_matcher();

        save(&matcher, dir.path()).unwrap();
        let restored = load(dir.path()).unwrap();

        assert_eq!(restored, matcher);
    }

    #[test]
    fn save_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        save(&trained_matcher(), dir.path()).unwrap();

        assert!(dir.path().join("embedder.json").exists());
        assert!(dir.path().join("matcher.json").exists());
    }

    #[test]
    fn load_fails_without_the_embedder_artifact() {
        let dir = tempfile::tempdir().unwrap();
        save(&trained_matcher(), dir.path()).unwrap();
        fs::remove_file(dir.path().join("embedder.json")).unwrap();

        assert!(matches!(load(dir.path()), Err(ModelStoreError::Io(_))));
    }

    #[test]
    fn load_rejects_unknown_schema_versions() {
        let dir = tempfile::tempdir().unwrap();
        save(&trained_matcher(), dir.path()).unwrap();

        let path = dir.path().join("embedder.json");
        let bumped = fs::read_to_string(&path)
            .unwrap()
            .replace("\"schema_version\": 1", "\"schema_version\": 99");
        fs::write(&path, bumped).unwrap();

        assert!(matches!(
            load(dir.path()),
            Err(ModelStoreError::SchemaVersion { found: 99, .. })
        ));
    }

    #[test]
    fn identical_models_serialize_identically() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();

        save(&trained_matcher(), dir_a.path()).unwrap();
        save(&trained_matcher(), dir_b.path()).unwrap();

        let a = fs::read(dir_a.path().join("embedder.json")).unwrap();
        let b = fs::read(dir_b.path().join("embedder.json")).unwrap();
        assert_eq!(a, b);
    }
}
