use super::*;

use chrono::NaiveDate;
use client_core::ClientError;
use shared::domain::{format_years, HistoryId, MatchScore, MatchTier};

use crate::controller::events::{UiErrorCategory, UiErrorContext};

fn job(id: i64, title: &str) -> JobPosting {
    JobPosting {
        id: JobId(id),
        job_title: title.to_string(),
        job_description: None,
    }
}

fn pdf(name: &str) -> FileCandidate {
    FileCandidate::from_path(Path::new(&format!("/tmp/{name}")))
}

fn sample_result() -> AnalysisResult {
    AnalysisResult {
        rank: MatchScore::new(85),
        total_experience: 3.0,
        skills: vec!["Python".to_string(), "SQL".to_string()],
        project_categories: vec!["Web".to_string()],
        suggestions: Some(vec!["Add more metrics".to_string()]),
    }
}

fn history_entry(id: i64) -> HistoryEntry {
    HistoryEntry {
        id: HistoryId(id),
        analyzed_at: "2026-10-01T08:30:00Z".parse().expect("timestamp"),
        job_title: "A".to_string(),
        rank: MatchScore::new(65),
        total_experience: 2.0,
        skills: vec!["Go".to_string()],
        project_categories: vec!["Infra".to_string()],
        suggestions: None,
    }
}

fn transport_error(context: UiErrorContext) -> UiError {
    UiError::new(UiErrorCategory::Transport, context, "connection refused")
}

fn loaded_state(now: Instant) -> AppState {
    let mut state = AppState::new();
    state.apply(UiEvent::JobsLoaded(vec![job(1, "A"), job(2, "B")]), now);
    state
}

fn analyze_request_id(commands: &[BackendCommand]) -> RequestId {
    match commands {
        [BackendCommand::Analyze { request_id, .. }] => *request_id,
        other => panic!("expected a single analyze command, got {other:?}"),
    }
}

fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 17)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid timestamp")
}

#[test]
fn mount_requests_job_list() {
    let mut state = AppState::new();
    assert!(!state.jobs_pending());
    assert_eq!(state.on_mount(), vec![BackendCommand::LoadJobs]);
    assert!(state.jobs_pending());

    state.apply(UiEvent::JobsLoaded(vec![job(1, "A")]), Instant::now());
    assert!(!state.jobs_pending());
}

#[test]
fn job_load_failure_stops_pending_indicator() {
    let now = Instant::now();
    let mut state = AppState::new();
    state.on_mount();
    state.apply(
        UiEvent::JobsFailed(transport_error(UiErrorContext::LoadJobs)),
        now,
    );
    assert!(!state.jobs_pending());
    assert!(!state.jobs_loaded());
    assert_eq!(state.job_options().len(), 1, "only the placeholder remains");
}

#[test]
fn job_selector_offers_placeholder_plus_each_job() {
    let state = loaded_state(Instant::now());
    assert!(state.jobs_loaded());
    assert_eq!(
        state.job_options(),
        vec![
            (None, "-- Choose a position --".to_string()),
            (Some(JobId(1)), "A".to_string()),
            (Some(JobId(2)), "B".to_string()),
        ]
    );
}

#[test]
fn empty_job_list_warns() {
    let now = Instant::now();
    let mut state = AppState::new();
    state.apply(UiEvent::JobsLoaded(Vec::new()), now);
    let toast = state.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Warning);
    assert_eq!(toast.message, "No job positions available");
    assert!(state.inline_error().is_none());
}

#[test]
fn job_load_failure_sets_inline_error_and_error_toast() {
    let now = Instant::now();
    let mut state = AppState::new();
    state.apply(
        UiEvent::JobsFailed(transport_error(UiErrorContext::LoadJobs)),
        now,
    );
    assert_eq!(state.inline_error(), Some("Failed to load jobs"));
    let toast = state.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Failed to connect to backend");
}

#[test]
fn pdf_selection_is_staged_and_clears_error() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("notes.txt"), now);
    assert_eq!(state.inline_error(), Some("Please select a PDF file"));

    state.select_file(pdf("cv.pdf"), now);
    assert_eq!(
        state.staged_resume().map(|r| r.file_name.as_str()),
        Some("cv.pdf")
    );
    assert!(state.inline_error().is_none());
    let toast = state.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "cv.pdf selected");
}

#[test]
fn non_pdf_selection_clears_previously_staged_file() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_file(pdf("photo.png"), now);

    assert!(state.staged_resume().is_none());
    assert_eq!(state.inline_error(), Some("Please select a PDF file"));
    let toast = state.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Invalid file type");
}

#[test]
fn latest_pdf_selection_replaces_prior_one() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("old.pdf"), now);
    state.select_file(pdf("new.pdf"), now);
    assert_eq!(
        state.staged_resume().map(|r| r.file_name.as_str()),
        Some("new.pdf")
    );
}

#[test]
fn submit_without_file_is_guarded() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_job(Some(JobId(1)));

    assert!(state.submit(now).is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.inline_error(), Some("Please upload your resume"));
    let toast = state.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Warning);
    assert_eq!(toast.message, "Please select a resume file");
}

#[test]
fn submit_without_job_is_guarded() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);

    assert!(state.submit(now).is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.inline_error(), Some("Please select a job position"));
    assert_eq!(state.toast().map(|t| t.kind), Some(ToastKind::Warning));
}

#[test]
fn submit_dispatches_analysis_and_sets_loading() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_job(Some(JobId(2)));

    let commands = state.submit(now);
    match commands.as_slice() {
        [BackendCommand::Analyze {
            target,
            resume_path,
            ..
        }] => {
            assert_eq!(*target, JobTarget::Posting(JobId(2)));
            assert_eq!(resume_path, Path::new("/tmp/cv.pdf"));
        }
        other => panic!("unexpected commands: {other:?}"),
    }
    assert!(state.is_loading());
    assert!(!state.can_submit());
    assert!(state.inline_error().is_none());
    assert_eq!(
        state.toast().map(|t| t.message.as_str()),
        Some("Analyzing your resume...")
    );

    assert!(state.submit(now).is_empty(), "re-entry while loading");
}

#[test]
fn custom_description_satisfies_job_guard_and_wins() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_job(Some(JobId(1)));
    state.set_custom_description("Backend engineer, Rust and Postgres".to_string());

    match state.submit(now).as_slice() {
        [BackendCommand::Analyze { target, .. }] => assert_eq!(
            *target,
            JobTarget::Custom("Backend engineer, Rust and Postgres".to_string())
        ),
        other => panic!("unexpected commands: {other:?}"),
    }
}

#[test]
fn analysis_success_stores_result_and_clears_loading() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_job(Some(JobId(1)));
    let request_id = analyze_request_id(&state.submit(now));

    state.apply(
        UiEvent::AnalysisSucceeded {
            request_id,
            result: sample_result(),
        },
        now,
    );
    assert!(!state.is_loading());
    let result = state.results().expect("results");
    assert_eq!(result.rank.to_string(), "85%");
    assert_eq!(result.tier().verdict(), "Excellent Match!");
    assert_eq!(format!("{} years", format_years(result.total_experience)), "3 years");
    assert_eq!(result.skills.len(), 2);
    assert_eq!(result.project_categories.len(), 1);
    assert_eq!(result.visible_suggestions().map(<[String]>::len), Some(1));
    assert_eq!(state.toast().map(|t| t.kind), Some(ToastKind::Success));
}

#[test]
fn analysis_failure_sets_generic_error_and_clears_loading() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_job(Some(JobId(1)));
    let request_id = analyze_request_id(&state.submit(now));

    let err = ClientError::Rejected {
        message: "Error: bad pdf".to_string(),
    };
    state.apply(
        UiEvent::AnalysisFailed {
            request_id,
            error: UiError::from_client(UiErrorContext::Analyze, &err),
        },
        now,
    );
    assert!(!state.is_loading());
    assert!(state.results().is_none());
    assert_eq!(state.inline_error(), Some("Failed to analyze resume"));
    let toast = state.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Error analyzing resume");
}

#[test]
fn result_arriving_after_reset_still_applies() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_job(Some(JobId(1)));
    let request_id = analyze_request_id(&state.submit(now));

    state.reset(now);
    assert!(state.is_loading());
    state.apply(
        UiEvent::AnalysisSucceeded {
            request_id,
            result: sample_result(),
        },
        now,
    );
    assert!(state.results().is_some());
    assert!(!state.is_loading());
}

#[test]
fn unknown_request_id_is_ignored() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.apply(
        UiEvent::AnalysisSucceeded {
            request_id: RequestId(99),
            result: sample_result(),
        },
        now,
    );
    assert!(state.results().is_none());
}

#[test]
fn reset_clears_form_and_results_and_restores_guards() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_job(Some(JobId(1)));
    let request_id = analyze_request_id(&state.submit(now));
    state.apply(
        UiEvent::AnalysisSucceeded {
            request_id,
            result: sample_result(),
        },
        now,
    );
    state.toggle_history();

    state.reset(now);
    assert!(state.staged_resume().is_none());
    assert!(state.selected_job().is_none());
    assert!(state.results().is_none());
    assert!(state.inline_error().is_none());
    assert!(state.custom_description().is_empty());
    assert!(state.history_visible(), "reset leaves history visibility alone");
    let toast = state.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Info);
    assert_eq!(toast.message, "Ready for new analysis");

    assert!(state.submit(now).is_empty());
    assert_eq!(state.inline_error(), Some("Please upload your resume"));
}

#[test]
fn toggling_history_fetches_once_and_reuses_data() {
    let now = Instant::now();
    let mut state = loaded_state(now);

    assert_eq!(state.toggle_history(), vec![BackendCommand::LoadHistory]);
    assert!(state.history_visible());
    assert!(state.history().is_empty());

    state.apply(UiEvent::HistoryLoaded(vec![history_entry(1)]), now);
    assert_eq!(state.history().len(), 1);
    assert_eq!(
        state.toast().map(|t| t.message.as_str()),
        Some("Loaded 1 past analyses")
    );

    assert!(state.toggle_history().is_empty());
    assert!(!state.history_visible());
    assert_eq!(state.history().len(), 1, "hiding keeps fetched data");

    assert!(state.toggle_history().is_empty(), "no refetch on re-show");
    assert!(state.history_visible());
}

#[test]
fn toggling_while_fetch_in_flight_does_not_refetch() {
    let mut state = AppState::new();
    assert_eq!(state.toggle_history(), vec![BackendCommand::LoadHistory]);
    assert!(state.toggle_history().is_empty());
    assert!(state.toggle_history().is_empty());
}

#[test]
fn reset_makes_held_history_stale() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.toggle_history();
    state.apply(UiEvent::HistoryLoaded(vec![history_entry(1)]), now);
    state.toggle_history();

    state.reset(now);
    assert_eq!(state.toggle_history(), vec![BackendCommand::LoadHistory]);
}

#[test]
fn analysis_landing_during_history_fetch_forces_refetch() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_job(Some(JobId(1)));
    let request_id = analyze_request_id(&state.submit(now));

    assert_eq!(state.toggle_history(), vec![BackendCommand::LoadHistory]);
    state.apply(
        UiEvent::AnalysisSucceeded {
            request_id,
            result: sample_result(),
        },
        now,
    );
    state.apply(UiEvent::HistoryLoaded(vec![history_entry(1)]), now);
    assert_eq!(state.history().len(), 1, "answer is still shown");

    assert!(state.toggle_history().is_empty());
    assert_eq!(state.toggle_history(), vec![BackendCommand::LoadHistory]);
}

#[test]
fn reset_during_history_fetch_forces_refetch() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    assert_eq!(state.toggle_history(), vec![BackendCommand::LoadHistory]);
    state.reset(now);
    state.apply(UiEvent::HistoryLoaded(vec![history_entry(1)]), now);

    state.toggle_history();
    assert_eq!(state.toggle_history(), vec![BackendCommand::LoadHistory]);

    state.apply(UiEvent::HistoryLoaded(vec![history_entry(2)]), now);
    state.toggle_history();
    assert!(state.toggle_history().is_empty(), "fresh data is reused");
}

#[test]
fn history_failure_reports_error_and_allows_retry() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.toggle_history();
    state.apply(
        UiEvent::HistoryFailed(transport_error(UiErrorContext::LoadHistory)),
        now,
    );
    assert!(state.history().is_empty());
    assert_eq!(state.inline_error(), Some("Failed to load history"));
    assert_eq!(state.toast().map(|t| t.kind), Some(ToastKind::Error));

    state.toggle_history();
    assert_eq!(state.toggle_history(), vec![BackendCommand::LoadHistory]);
}

#[test]
fn toast_expires_after_four_seconds() {
    let shown = Instant::now();
    let mut state = AppState::new();
    state.show_toast("hello", ToastKind::Info, shown);

    state.tick(shown + Duration::from_millis(3999));
    assert!(state.toast().is_some());

    state.tick(shown + Duration::from_millis(4000));
    assert!(state.toast().is_none());
}

#[test]
fn newer_toast_replaces_older_and_restarts_timer() {
    let shown = Instant::now();
    let mut state = AppState::new();
    state.show_toast("first", ToastKind::Info, shown);
    let replaced = shown + Duration::from_millis(3000);
    state.show_toast("second", ToastKind::Error, replaced);

    state.tick(shown + Duration::from_millis(4500));
    let toast = state.toast().expect("replacement still visible");
    assert_eq!(toast.message, "second");
    assert_eq!(toast.remaining(shown + Duration::from_millis(4500)), Duration::from_millis(2500));

    state.tick(replaced + TOAST_TTL);
    assert!(state.toast().is_none());
}

#[test]
fn download_requires_results() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    assert!(!state.can_download_report());
    assert!(state
        .download_report(PathBuf::from("/tmp"), "r.txt".to_string(), generated_at(), now)
        .is_empty());
}

#[test]
fn download_renders_report_and_reports_success() {
    let now = Instant::now();
    let mut state = loaded_state(now);
    state.select_file(pdf("cv.pdf"), now);
    state.select_job(Some(JobId(1)));
    let request_id = analyze_request_id(&state.submit(now));
    state.apply(
        UiEvent::AnalysisSucceeded {
            request_id,
            result: sample_result(),
        },
        now,
    );

    let commands = state.download_report(
        PathBuf::from("/tmp/reports"),
        "Resume_Analysis_Report_1.txt".to_string(),
        generated_at(),
        now,
    );
    assert_eq!(
        state.toast().map(|t| t.message.as_str()),
        Some("Generating report...")
    );
    match commands.as_slice() {
        [BackendCommand::SaveReport {
            dir,
            file_name,
            contents,
        }] => {
            assert_eq!(dir, Path::new("/tmp/reports"));
            assert_eq!(file_name, "Resume_Analysis_Report_1.txt");
            for expected in [
                "Match Score: 85%",
                "Status: Excellent Match!",
                "TOTAL EXPERIENCE: 3 years",
                "• Python",
                "• SQL",
                "• Web",
                "SUGGESTIONS FOR IMPROVEMENT:\n1. Add more metrics",
            ] {
                assert!(contents.contains(expected), "missing {expected:?}");
            }
        }
        other => panic!("unexpected commands: {other:?}"),
    }

    state.apply(
        UiEvent::ReportSaved(PathBuf::from("/tmp/reports/Resume_Analysis_Report_1.txt")),
        now,
    );
    assert_eq!(
        state.toast().map(|t| t.message.as_str()),
        Some("Report downloaded!")
    );
    assert!(state.last_report_path().is_some());
}

#[test]
fn tier_labels_match_report_and_history_badges() {
    let entry = history_entry(3);
    assert_eq!(entry.tier(), MatchTier::Good);
    let mut result = sample_result();
    result.rank = entry.rank;
    let report = render_report(&result, generated_at());
    assert!(report.contains(&format!("Status: {}", entry.tier().verdict())));
}
