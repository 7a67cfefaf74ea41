pub mod similarity;

pub use similarity::cosine_similarity;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedError {
    #[error("embedder has not been fitted; call fit() with a skill corpus first")]
    NotFitted,
}

/// スキル列の疎ベクトル表現
///
/// 語彙インデックス昇順のエントリ列。`fit` 済み語彙に一切重ならない
/// 入力はゼロベクトル（エントリなし）になる。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillVector {
    entries: Vec<(usize, f64)>,
}

impl SkillVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }
}

/// TF-IDF ベースのスキル埋め込みモデル
///
/// `fit` が語彙・IDF・共起統計を学習コーパスから構築する。2回目の
/// `fit` は前回の統計を引き継がず、全て作り直す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillEmbedder {
    /// スキル → 語彙インデックス（ソート済みユニークスキルの昇順採番）
    vocabulary: BTreeMap<String, usize>,
    /// スキル → IDF（ln((N+1)/(df+1)) + 1）
    idf: BTreeMap<String, f64>,
    /// スキル → 同一文書内の共起確率分布（各行の合計は 1.0）
    cooccurrence: BTreeMap<String, BTreeMap<String, f64>>,
    fitted: bool,
}

impl SkillEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// スキル文書集合から語彙・IDF・共起統計を構築する
    pub fn fit(&mut self, documents: &[Vec<String>]) {
        self.vocabulary.clear();
        self.idf.clear();
        self.cooccurrence.clear();

        let lowered: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| doc.iter().map(|s| s.to_lowercase()).collect())
            .collect();

        let unique_skills: BTreeSet<&str> = lowered
            .iter()
            .flat_map(|doc| doc.iter().map(String::as_str))
            .collect();
        for (idx, skill) in unique_skills.iter().enumerate() {
            self.vocabulary.insert((*skill).to_string(), idx);
        }

        // IDF（スムージング付き）
        let doc_count = lowered.len() as f64;
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &lowered {
            let unique: BTreeSet<&str> = doc.iter().map(String::as_str).collect();
            for skill in unique {
                *doc_freq.entry(skill).or_insert(0) += 1;
            }
        }
        for skill in self.vocabulary.keys() {
            let df = doc_freq.get(skill.as_str()).copied().unwrap_or(0) as f64;
            self.idf
                .insert(skill.clone(), ((doc_count + 1.0) / (df + 1.0)).ln() + 1.0);
        }

        // 共起カウント: 同一文書内で値の異なる位置の順序対を多重度込みで数える
        let mut counts: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for doc in &lowered {
            for first in doc {
                for second in doc {
                    if first != second {
                        *counts
                            .entry(first.clone())
                            .or_default()
                            .entry(second.clone())
                            .or_insert(0.0) += 1.0;
                    }
                }
            }
        }

        // 行ごとに確率へ正規化
        for (skill, row) in counts {
            let total: f64 = row.values().sum();
            if total > 0.0 {
                let normalized = row.into_iter().map(|(other, c)| (other, c / total)).collect();
                self.cooccurrence.insert(skill, normalized);
            }
        }

        self.fitted = true;
    }

    /// スキル列を L2 正規化済みの疎ベクトルへ変換する
    ///
    /// 重み = クエリ内 TF × コーパス IDF。語彙外スキルは無視される。
    /// 未 `fit` の呼び出しは即エラー（`match` 側の 0 退避とは別挙動）。
    pub fn embed(&self, skills: &[String]) -> Result<SkillVector, EmbedError> {
        if !self.fitted {
            return Err(EmbedError::NotFitted);
        }

        let lowered: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();
        if lowered.is_empty() {
            return Ok(SkillVector::default());
        }

        let list_len = lowered.len() as f64;
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for skill in &lowered {
            if let Some(&idx) = self.vocabulary.get(skill) {
                let tf = lowered.iter().filter(|s| *s == skill).count() as f64 / list_len;
                let idf = self.idf.get(skill).copied().unwrap_or(1.0);
                weights.insert(idx, tf * idf);
            }
        }

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Ok(SkillVector::default());
        }

        Ok(SkillVector {
            entries: weights.into_iter().map(|(idx, w)| (idx, w / norm)).collect(),
        })
    }

    /// 共起確率の高い順に最大 `top_k` 件の関連スキルを返す
    ///
    /// 未知スキルは空。同率は名前昇順で安定。
    pub fn related_skills(&self, skill: &str, top_k: usize) -> Vec<(String, f64)> {
        let key = skill.to_lowercase();
        let Some(row) = self.cooccurrence.get(&key) else {
            return Vec::new();
        };

        let mut related: Vec<(String, f64)> =
            row.iter().map(|(other, p)| (other.clone(), *p)).collect();
        related.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        related.truncate(top_k);
        related
    }

    #[cfg(test)]
    pub(crate) fn cooccurrence_rows(&self) -> &BTreeMap<String, BTreeMap<String, f64>> {
        &self.cooccurrence
    }

    #[cfg(test)]
    pub(crate) fn idf_of(&self, skill: &str) -> Option<f64> {
        self.idf.get(skill).copied()
    }
}
