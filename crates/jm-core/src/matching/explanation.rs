/// 信頼度バンドに応じた定型の説明文を生成する
///
/// 掲載順: バンド見出し → 一致スキル（最大5件）→ 不足スキル
/// （3件以下は列挙、それ以上は件数）→ 経験年数の注意書き
/// （経験サブスコア 0.8 未満のとき）。
pub fn generate_explanation(
    experience_score: f64,
    matched_skills: &[String],
    missing_skills: &[String],
    confidence: f64,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if confidence >= 75.0 {
        parts.push("Strong match!".to_string());
    } else if confidence >= 50.0 {
        parts.push("Good potential match.".to_string());
    } else {
        parts.push("Partial match.".to_string());
    }

    if !matched_skills.is_empty() {
        let top: Vec<&str> = matched_skills.iter().take(5).map(String::as_str).collect();
        parts.push(format!("Key matching skills: {}.", top.join(", ")));
    }

    if !missing_skills.is_empty() {
        if missing_skills.len() <= 3 {
            parts.push(format!("Consider developing: {}.", missing_skills.join(", ")));
        } else {
            parts.push(format!("Missing {} required skills.", missing_skills.len()));
        }
    }

    if experience_score < 0.8 {
        parts.push("May need more experience for this role.".to_string());
    }

    parts.join(" ")
}
