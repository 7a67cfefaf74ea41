use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// フィードバック種別（応募 → 面接 → 採用の段階）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedbackType {
    Application,
    Interview,
    Hire,
}

/// マッチ結果1件に対する成否フィードバック
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub job_id: String,
    /// 記録時点の予測信頼度（%）
    pub predicted_confidence: f64,
    pub was_successful: bool,
    pub feedback_type: FeedbackType,
    pub timestamp: DateTime<Utc>,
}

/// 信頼度の校正パラメータ
///
/// `shift` だけが再校正で動く。`scale` は一度も変更されない。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub scale: f64,
    pub shift: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            scale: 1.0,
            shift: 0.0,
        }
    }
}

impl Calibration {
    /// raw スコアをロジスティック変換で信頼度%へ（5〜95にクランプ）
    pub fn confidence(&self, raw_score: f64) -> f64 {
        let adjusted = raw_score * self.scale + self.shift;
        let confidence = 100.0 / (1.0 + (-10.0 * (adjusted - 0.5)).exp());
        confidence.clamp(5.0, 95.0)
    }
}

/// フィードバック履歴
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackLog {
    records: Vec<FeedbackRecord>,
}

impl FeedbackLog {
    pub fn push(&mut self, record: FeedbackRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    /// 直近 `window` 件の平均予測と平均実績の差で `shift` を微調整する
    ///
    /// 履歴が `min_records` 未満なら何もしない。
    pub fn recalibrate(&self, calibration: &mut Calibration, min_records: usize, window: usize) {
        if self.records.len() < min_records {
            return;
        }

        let start = self.records.len().saturating_sub(window);
        let recent = &self.records[start..];

        let predicted_mean = recent
            .iter()
            .map(|r| r.predicted_confidence / 100.0)
            .sum::<f64>()
            / recent.len() as f64;
        let actual_mean =
            recent.iter().filter(|r| r.was_successful).count() as f64 / recent.len() as f64;

        calibration.shift += (actual_mean - predicted_mean) * 0.1;
    }
}
