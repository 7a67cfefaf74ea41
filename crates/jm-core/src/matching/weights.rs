use serde::{Deserialize, Serialize};

/// デフォルト重み（学習前、またはラベル不足でグリッドサーチが走らない場合）
pub const DEFAULT_WEIGHTS: Weights = Weights {
    skill_semantic: 0.30,
    skill_exact: 0.35,
    experience: 0.20,
    education: 0.10,
    industry: 0.05,
};

/// 5成分の重みベクトル（非負、合計 1.0 を想定）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub skill_semantic: f64,
    pub skill_exact: f64,
    pub experience: f64,
    pub education: f64,
    pub industry: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skill_semantic + self.skill_exact + self.experience + self.education + self.industry
    }
}

impl Default for Weights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}
