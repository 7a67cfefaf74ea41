use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 学位名 → 序数レベル
///
/// 照合は小文字化した完全一致。テーブル外の学位はレベル 0 扱い。
pub static EDUCATION_LEVELS: Lazy<BTreeMap<&'static str, u32>> = Lazy::new(|| {
    BTreeMap::from([
        ("phd", 5),
        ("doctorate", 5),
        ("masters", 4),
        ("mba", 4),
        ("bachelors", 3),
        ("associates", 2),
        ("high school", 1),
        ("diploma", 1),
    ])
});

/// 求人側業界 → 関連業界（部分一致 0.7 の対象）
///
/// 手作業管理の非対称テーブル。行が無い業界（research など）は
/// 逆方向の関連を持たない。
pub static RELATED_INDUSTRIES: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| {
        HashMap::from([
            ("technology", &["consulting", "finance"][..]),
            ("finance", &["technology", "consulting"][..]),
            ("healthcare", &["technology", "research"][..]),
            ("consulting", &["technology", "finance"][..]),
        ])
    });

/// マッチャーに載せる学位テーブルの初期値（アーティファクトに保存される）
pub fn default_education_levels() -> BTreeMap<String, u32> {
    EDUCATION_LEVELS
        .iter()
        .map(|(degree, level)| ((*degree).to_string(), *level))
        .collect()
}

/// 経験年数スコアのパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceParams {
    /// 要件未達時の係数（years/min に掛ける）
    pub underqualified_penalty: f64,
    /// 大幅な過剰資格に適用する係数
    pub overqualified_penalty: f64,
    /// 上限超過を過剰資格とみなすまでの年数
    pub overqualified_threshold: f64,
}

impl Default for ExperienceParams {
    fn default() -> Self {
        Self {
            underqualified_penalty: 0.7,
            overqualified_penalty: 0.95,
            overqualified_threshold: 5.0,
        }
    }
}
