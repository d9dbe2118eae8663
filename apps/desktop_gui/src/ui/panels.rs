//! Panel rendering. Panels only read [`AppState`] and push [`UiAction`]s.

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use shared::domain::{format_years, AnalysisResult, HistoryEntry};

use crate::controller::reducer::AppState;
use crate::ui::app::UiAction;
use crate::ui::theme::{tier_color, ThemePreset};
use crate::ui::widgets::{score_card, section_heading, tag_chip, tier_badge};

const SKILL_TAG_COLOR: egui::Color32 = egui::Color32::from_rgb(88, 101, 242);
const CATEGORY_TAG_COLOR: egui::Color32 = egui::Color32::from_rgb(38, 139, 150);

pub fn show_header(
    ctx: &egui::Context,
    state: &AppState,
    theme: ThemePreset,
    api_base_url: &str,
    actions: &mut Vec<UiAction>,
) {
    egui::TopBottomPanel::top("header")
        .frame(
            egui::Frame::NONE
                .fill(ctx.style().visuals.panel_fill)
                .inner_margin(egui::Margin::symmetric(16, 10)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.heading("ATS Resume Analyzer");
                    ui.label(
                        egui::RichText::new("Analyze your resume against job descriptions")
                            .weak(),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let history_label = if state.history_visible() {
                        "Hide History"
                    } else {
                        "View History"
                    };
                    if ui.button(history_label).clicked() {
                        actions.push(UiAction::ToggleHistory);
                    }
                    let theme_label = format!("{} theme", theme.toggled().label());
                    if ui.button(theme_label).clicked() {
                        actions.push(UiAction::ToggleTheme);
                    }
                    ui.label(egui::RichText::new(api_base_url).small().weak())
                        .on_hover_text("Analysis service");
                });
            });
        });
}

pub fn show_history_panel(ctx: &egui::Context, state: &AppState) {
    if !state.history_visible() {
        return;
    }
    egui::SidePanel::right("history_panel")
        .resizable(true)
        .default_width(320.0)
        .min_width(260.0)
        .show(ctx, |ui| {
            section_heading(ui, "Analysis History");
            ui.separator();
            let history = state.history();
            if history.is_empty() {
                ui.label(egui::RichText::new("No analysis history available").weak());
                return;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (index, entry) in history.iter().enumerate() {
                        history_card(ui, entry, history_number(history.len(), index));
                        ui.add_space(6.0);
                    }
                });
        });
}

fn history_card(ui: &mut egui::Ui, entry: &HistoryEntry, number: usize) {
    egui::Frame::group(ui.style())
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("Analysis #{number}")).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(local_date(entry.analyzed_at)).small().weak());
                });
            });
            ui.label(format!("Job: {}", entry.job_title));
            ui.horizontal(|ui| {
                ui.label("Score:");
                ui.label(
                    egui::RichText::new(entry.rank.to_string())
                        .strong()
                        .color(tier_color(entry.tier())),
                );
                tier_badge(ui, entry.tier());
            });
            ui.label(format!(
                "Experience: {} years",
                format_years(entry.total_experience)
            ));
            ui.label(format!("Skills: {} identified", entry.skills.len()));
            ui.label(format!(
                "Categories: {}",
                entry.project_categories.join(", ")
            ));
        });
}

/// Entries arrive newest first; numbering counts up from the oldest.
pub fn history_number(total: usize, index: usize) -> usize {
    total.saturating_sub(index)
}

pub fn local_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn show_upload_form(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    let busy = state.is_loading();

    section_heading(ui, "Upload Your Resume (PDF)");
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!busy, egui::Button::new("Choose PDF..."))
            .clicked()
        {
            actions.push(UiAction::PickFile);
        }
        match state.staged_resume() {
            Some(resume) => {
                ui.label(format!("Selected: {}", resume.file_name))
                    .on_hover_text(resume.path.display().to_string());
            }
            None => {
                ui.label(egui::RichText::new("No file selected, or drop a PDF here").weak());
            }
        }
    });

    section_heading(ui, "Select Job Position");
    ui.add_enabled_ui(!busy, |ui| {
        ui.horizontal(|ui| {
            let mut selected = state.selected_job();
            egui::ComboBox::from_id_salt("job_select")
                .width(320.0)
                .selected_text(state.selected_job_title())
                .show_ui(ui, |ui| {
                    for (id, title) in state.job_options() {
                        ui.selectable_value(&mut selected, id, title);
                    }
                });
            if selected != state.selected_job() {
                actions.push(UiAction::SelectJob(selected));
            }
            if state.jobs_pending() {
                ui.spinner();
                ui.label(egui::RichText::new("Loading positions...").weak());
            }
        });

        if let Some(description) = state
            .selected_job()
            .and_then(|id| state.jobs().iter().find(|job| job.id == id))
            .and_then(|job| job.job_description.as_deref())
        {
            ui.label(egui::RichText::new(description).small().weak());
        }

        egui::CollapsingHeader::new("Or paste a custom job description")
            .id_salt("custom_description")
            .default_open(!state.custom_description().is_empty())
            .show(ui, |ui| {
                let mut draft = state.custom_description().to_string();
                let response = ui.add(
                    egui::TextEdit::multiline(&mut draft)
                        .desired_rows(5)
                        .desired_width(f32::INFINITY)
                        .hint_text("Custom text takes precedence over the selected position"),
                );
                if response.changed() {
                    actions.push(UiAction::SetCustomDescription(draft));
                }
            });
    });

    if let Some(error) = state.inline_error() {
        ui.add_space(4.0);
        ui.colored_label(egui::Color32::from_rgb(207, 76, 76), error);
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let submit = if busy {
            egui::Button::new("Analyzing...")
        } else {
            egui::Button::new(egui::RichText::new("Analyze Resume").strong())
        };
        if ui.add_enabled(state.can_submit(), submit).clicked() {
            actions.push(UiAction::Submit);
        }
        if busy {
            ui.spinner();
        }
        if ui.button("Reset").clicked() {
            actions.push(UiAction::Reset);
        }
    });
}

pub fn show_results(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<UiAction>) {
    let Some(result) = state.results() else {
        return;
    };

    ui.add_space(12.0);
    ui.separator();
    section_heading(ui, "Analysis Results");
    score_card(ui, result.rank);
    ui.add_space(8.0);

    ui.columns(3, |columns| {
        info_card(&mut columns[0], "Total Experience", |ui| {
            ui.label(
                egui::RichText::new(format!("{} years", format_years(result.total_experience)))
                    .size(18.0),
            );
        });
        info_card(&mut columns[1], "Skills Found", |ui| {
            ui.label(format!("{} skills", result.skills.len()));
            tag_row(ui, &result.skills, SKILL_TAG_COLOR);
        });
        info_card(&mut columns[2], "Project Categories", |ui| {
            tag_row(ui, &result.project_categories, CATEGORY_TAG_COLOR);
        });
    });

    suggestions(ui, result);

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let enabled = state.can_download_report();
        if ui
            .add_enabled(enabled, egui::Button::new("Download Report"))
            .clicked()
        {
            actions.push(UiAction::DownloadReport);
        }
        if ui
            .add_enabled(enabled, egui::Button::new("Save As..."))
            .clicked()
        {
            actions.push(UiAction::SaveReportAs);
        }
        if ui
            .add_enabled(enabled, egui::Button::new("Copy Report"))
            .clicked()
        {
            actions.push(UiAction::CopyReport);
        }
    });
    if let Some(path) = state.last_report_path() {
        ui.label(
            egui::RichText::new(format!("Last report: {}", path.display()))
                .small()
                .weak(),
        );
    }
}

fn info_card(ui: &mut egui::Ui, title: &str, body: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::group(ui.style())
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(title).strong());
            body(ui);
        });
}

fn tag_row(ui: &mut egui::Ui, tags: &[String], color: egui::Color32) {
    ui.horizontal_wrapped(|ui| {
        for tag in tags {
            tag_chip(ui, tag, color);
        }
    });
}

fn suggestions(ui: &mut egui::Ui, result: &AnalysisResult) {
    let Some(suggestions) = result.visible_suggestions() else {
        return;
    };
    ui.add_space(8.0);
    info_card(ui, "AI Suggestions for Improvement", |ui| {
        for (index, suggestion) in suggestions.iter().enumerate() {
            ui.label(format!("{}. {suggestion}", index + 1));
        }
    });
}
