use super::SkillVector;
use std::cmp::Ordering;

/// コサイン類似度（0.0〜1.0）
///
/// 正規化済み疎ベクトル同士の内積。インデックス昇順のマージで計算し、
/// 結果を [0, 1] にクランプする。ゼロベクトルとの類似度は 0。
pub fn cosine_similarity(a: &SkillVector, b: &SkillVector) -> f64 {
    let lhs = a.entries();
    let rhs = b.entries();

    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < lhs.len() && j < rhs.len() {
        match lhs[i].0.cmp(&rhs[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += lhs[i].1 * rhs[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    dot.clamp(0.0, 1.0)
}
