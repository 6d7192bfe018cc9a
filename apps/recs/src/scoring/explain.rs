//! "Why this" text and evidence lines shown next to each recommendation.

use crate::models::catalog::Career;
use crate::models::user::UserProfile;
use crate::scoring::career_scorer::CareerScore;
use crate::scoring::subject::{subject_label, year_token};

/// Readable names for inquiry-skill codes. Unknown codes are shown as-is.
fn skill_name(code: &str) -> &str {
    match code {
        "QP" => "questioning & predicting",
        "PC" => "planning & conducting",
        "PAD" => "processing & analysing data",
        "EVAL" => "evaluating",
        "COMM" => "communicating",
        other => other,
    }
}

/// Explains a unit from its first signal node.
pub fn why_for_unit(user: &UserProfile, signals: &[String]) -> String {
    let Some(node) = signals.first() else {
        return "This activity is a good next step for your science learning.".to_string();
    };

    let subject = subject_label(node);
    let year = year_token(node);
    let has_same_subject = user.knowledge.keys().any(|k| subject_label(k) == subject);

    if has_same_subject {
        let this = if year.is_empty() {
            "this".to_string()
        } else {
            format!("this {year}")
        };
        format!("You’ve already learned some {subject}, so {this} activity is the next step to extend it.")
    } else {
        format!("This activity introduces {subject} at a level that suits you.")
    }
}

pub fn why_for_career(scored: &CareerScore) -> String {
    let mut parts = vec!["This career is connected to the science areas you’ve been learning.".to_string()];

    if !scored.gate_pass && !scored.unmet_skills.is_empty() {
        let missing: Vec<&str> = scored
            .unmet_skills
            .iter()
            .take(2)
            .map(|(code, _)| skill_name(code))
            .collect();
        parts.push(format!("You still need inquiry skills like {}.", missing.join(", ")));
    }

    if !scored.threshold_pass {
        if let Some(top) = scored.unmet_nodes.first() {
            parts.push(format!(
                "You also need a bit more on {}.",
                subject_label(&top.node)
            ));
        }
    }

    parts.push("We relaxed the rules to show this career to you now.".to_string());
    parts.join(" ")
}

/// Evidence lines: covered weight and the nominal threshold, flagged as relaxed.
pub fn career_evidence(career: &Career, scored: &CareerScore) -> Vec<String> {
    vec![
        format!("covered={:.2}", scored.covered),
        format!("required_threshold={} (relaxed to 40%)", career.threshold_label()),
    ]
}

pub fn why_for_career_video() -> String {
    "This video is about the career we just recommended to you.".to_string()
}

pub fn why_for_discipline_video(discipline: &str) -> String {
    format!("This video is related to the {discipline} you are learning.")
}
