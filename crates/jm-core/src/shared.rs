use crate::feedback::FeedbackType;
use crate::matcher::JobMatcher;
use crate::matching::MatchResult;
use crate::model_store::{self, ModelStoreError};
use crate::training::TrainingSample;
use crate::{Candidate, JobPosting};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 複数リクエストから共有するためのマッチャーハンドル
///
/// `match_candidate` は読み取りロック、`train` / `record_feedback` は
/// 書き込みロックを取る。変更系は常にこのハンドル経由で直列化され、
/// グローバル状態は存在しない。
#[derive(Debug, Clone)]
pub struct SharedMatcher {
    inner: Arc<RwLock<JobMatcher>>,
}

impl SharedMatcher {
    pub fn new(matcher: JobMatcher) -> Self {
        Self {
            inner: Arc::new(RwLock::new(matcher)),
        }
    }

    pub fn match_candidate(&self, candidate: &Candidate, job: &JobPosting) -> MatchResult {
        self.read().match_candidate(candidate, job)
    }

    pub fn train(&self, samples: &[TrainingSample]) {
        self.write().train(samples);
    }

    pub fn record_feedback(
        &self,
        result: &MatchResult,
        was_successful: bool,
        feedback_type: FeedbackType,
    ) {
        self.write()
            .record_feedback(result, was_successful, feedback_type);
    }

    pub fn is_trained(&self) -> bool {
        self.read().is_trained()
    }

    pub fn save(&self, dir: &Path) -> Result<(), ModelStoreError> {
        model_store::save(&self.read(), dir)
    }

    pub fn load(dir: &Path) -> Result<Self, ModelStoreError> {
        Ok(Self::new(model_store::load(dir)?))
    }

    // 書き込み側は単発の純計算のみで、パニックしても壊れた途中状態を
    // 残さない。毒化したロックは回復して続行する。
    fn read(&self) -> RwLockReadGuard<'_, JobMatcher> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, JobMatcher> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
