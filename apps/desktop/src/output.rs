//! Plain-text rendering for CLI output.

use shared::domain::{format_years, AnalysisResult, HistoryEntry, JobPosting};

pub const NO_JOBS_WARNING: &str = "warning: no job positions available";
pub const NO_HISTORY_MESSAGE: &str = "No analysis history available";

pub fn job_lines(jobs: &[JobPosting]) -> Vec<String> {
    if jobs.is_empty() {
        return vec![NO_JOBS_WARNING.to_string()];
    }
    jobs.iter()
        .map(|job| format!("{}  {}", job.id, job.job_title))
        .collect()
}

pub fn analysis_summary(result: &AnalysisResult) -> String {
    let mut lines = vec![
        format!(
            "Match Score: {} ({})",
            result.rank,
            result.tier().verdict()
        ),
        format!(
            "Total Experience: {} years",
            format_years(result.total_experience)
        ),
        format!(
            "Skills ({}): {}",
            result.skills.len(),
            result.skills.join(", ")
        ),
        format!(
            "Project Categories: {}",
            result.project_categories.join(", ")
        ),
    ];
    if let Some(suggestions) = result.visible_suggestions() {
        lines.push("Suggestions:".to_string());
        lines.extend(
            suggestions
                .iter()
                .enumerate()
                .map(|(index, suggestion)| format!("  {}. {suggestion}", index + 1)),
        );
    }
    lines.push(String::new());
    lines.join("\n")
}

/// One line per entry, numbered from the oldest as `#1`.
pub fn history_lines(history: &[HistoryEntry]) -> Vec<String> {
    if history.is_empty() {
        return vec![NO_HISTORY_MESSAGE.to_string()];
    }
    let total = history.len();
    history
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!(
                "#{:<3} {}  [{}] {:>4}  {}  ({} years, {} skills)",
                total - index,
                entry.analyzed_at.format("%Y-%m-%d"),
                entry.tier().name(),
                entry.rank.to_string(),
                entry.job_title,
                format_years(entry.total_experience),
                entry.skills.len(),
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/output_tests.rs"]
mod tests;
