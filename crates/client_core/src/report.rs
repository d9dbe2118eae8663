//! Plain-text analysis report, rendered client-side from an
//! [`AnalysisResult`] and saved as `Resume_Analysis_Report_<millis>.txt`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use shared::domain::{format_years, AnalysisResult};
use tracing::info;

use crate::ClientError;

pub const REPORT_FILE_PREFIX: &str = "Resume_Analysis_Report_";
const BULLET: &str = "•";

pub fn render_report(result: &AnalysisResult, generated_at: NaiveDateTime) -> String {
    let mut lines = vec![
        "RESUME ANALYSIS REPORT".to_string(),
        "======================".to_string(),
        String::new(),
        format!("Match Score: {}", result.rank),
        format!("Status: {}", result.tier().verdict()),
        String::new(),
        format!(
            "TOTAL EXPERIENCE: {} years",
            format_years(result.total_experience)
        ),
        String::new(),
        format!("SKILLS IDENTIFIED ({}):", result.skills.len()),
    ];
    lines.extend(result.skills.iter().map(|skill| format!("{BULLET} {skill}")));
    lines.push(String::new());
    lines.push("PROJECT CATEGORIES:".to_string());
    lines.extend(
        result
            .project_categories
            .iter()
            .map(|category| format!("{BULLET} {category}")),
    );

    if let Some(suggestions) = result.visible_suggestions() {
        lines.push(String::new());
        lines.push("SUGGESTIONS FOR IMPROVEMENT:".to_string());
        lines.extend(
            suggestions
                .iter()
                .enumerate()
                .map(|(index, suggestion)| format!("{}. {suggestion}", index + 1)),
        );
    }

    lines.push(String::new());
    lines.push(format!(
        "Report generated on: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(String::new());
    lines.join("\n")
}

pub fn report_file_name(now: DateTime<Utc>) -> String {
    format!("{REPORT_FILE_PREFIX}{}.txt", now.timestamp_millis())
}

/// Writes `contents` to `dir/file_name`, creating `dir` if needed.
pub async fn save_report(
    dir: &Path,
    file_name: &str,
    contents: &str,
) -> Result<PathBuf, ClientError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ClientError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| ClientError::Io {
            path: path.clone(),
            source,
        })?;
    info!(path = %path.display(), "saved analysis report");
    Ok(path)
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
