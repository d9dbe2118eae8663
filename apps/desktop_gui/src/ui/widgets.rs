//! Small reusable widgets: score card, tag chips, tier badge, toast overlay.

use std::time::Instant;

use eframe::egui;
use shared::domain::{MatchScore, MatchTier};

use crate::controller::reducer::Toast;
use crate::ui::theme::{lighten_color, tier_color, toast_color};

pub fn section_heading(ui: &mut egui::Ui, title: &str) {
    ui.add_space(6.0);
    ui.label(egui::RichText::new(title).strong().size(16.0));
    ui.add_space(2.0);
}

pub fn tag_chip(ui: &mut egui::Ui, text: &str, base: egui::Color32) {
    egui::Frame::NONE
        .fill(lighten_color(base, 0.8))
        .stroke(egui::Stroke::new(1.0, base))
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).color(base.gamma_multiply(0.9)));
        });
}

pub fn tier_badge(ui: &mut egui::Ui, tier: MatchTier) {
    let color = tier_color(tier);
    egui::Frame::NONE
        .fill(color)
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(tier.name())
                    .small()
                    .strong()
                    .color(egui::Color32::WHITE),
            );
        });
}

/// Large percentage with the tier verdict and a colored bar.
pub fn score_card(ui: &mut egui::Ui, score: MatchScore) {
    let tier = score.tier();
    let color = tier_color(tier);
    egui::Frame::NONE
        .fill(lighten_color(color, 0.85))
        .stroke(egui::Stroke::new(1.5, color))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(score.to_string())
                        .size(40.0)
                        .strong()
                        .color(color),
                );
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new("Match Score").weak());
                    ui.label(egui::RichText::new(tier.verdict()).strong().color(color));
                });
            });
            ui.add(
                egui::ProgressBar::new(f32::from(score.value()) / 100.0)
                    .fill(color)
                    .desired_height(8.0),
            );
        });
}

/// Floating notification in the top-right corner, faded over its last second.
pub fn show_toast(ctx: &egui::Context, toast: &Toast, now: Instant) {
    let remaining = toast.remaining(now).as_secs_f32();
    let alpha = remaining.clamp(0.0, 1.0);
    let fill = toast_color(toast.kind).gamma_multiply(0.35 + 0.65 * alpha);

    egui::Area::new(egui::Id::new("toast_overlay"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::NONE
                .fill(fill)
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::symmetric(14, 10))
                .show(ui, |ui| {
                    ui.set_max_width(320.0);
                    ui.label(
                        egui::RichText::new(&toast.message)
                            .color(egui::Color32::WHITE)
                            .strong(),
                    );
                });
        });
}
