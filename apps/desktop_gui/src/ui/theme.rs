//! Theme presets, persisted appearance settings, and tier/toast colors.

use std::collections::BTreeMap;

use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::MatchTier;

use crate::controller::reducer::ToastKind;

pub const SETTINGS_STORAGE_KEY: &str = "resume_analyzer.settings";
pub const MIN_TEXT_SCALE: f32 = 0.8;
pub const MAX_TEXT_SCALE: f32 = 1.4;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(88, 101, 242);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreset {
    #[default]
    Light,
    Dark,
}

impl ThemePreset {
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Appearance preferences kept in eframe storage between runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedDesktopSettings {
    #[serde(default)]
    pub theme: ThemePreset,
    #[serde(default = "default_text_scale")]
    pub text_scale: f32,
}

fn default_text_scale() -> f32 {
    1.0
}

impl Default for PersistedDesktopSettings {
    fn default() -> Self {
        Self {
            theme: ThemePreset::default(),
            text_scale: default_text_scale(),
        }
    }
}

impl PersistedDesktopSettings {
    pub fn from_storage_text(text: &str) -> Option<Self> {
        serde_json::from_str::<Self>(text)
            .ok()
            .map(Self::sanitized)
    }

    pub fn sanitized(mut self) -> Self {
        if !self.text_scale.is_finite() {
            self.text_scale = default_text_scale();
        }
        self.text_scale = self.text_scale.clamp(MIN_TEXT_SCALE, MAX_TEXT_SCALE);
        self
    }
}

pub fn visuals_for_theme(preset: ThemePreset) -> egui::Visuals {
    let mut visuals = match preset {
        ThemePreset::Light => egui::Visuals::light(),
        ThemePreset::Dark => {
            let mut v = egui::Visuals::dark();
            v.window_fill = egui::Color32::from_rgb(40, 44, 52);
            v.panel_fill = egui::Color32::from_rgb(33, 37, 43);
            v.extreme_bg_color = egui::Color32::from_rgb(24, 26, 31);
            v.faint_bg_color = egui::Color32::from_rgb(52, 57, 66);
            v
        }
    };
    visuals.hyperlink_color = ACCENT;
    visuals.selection.bg_fill = ACCENT;
    visuals.widgets.hovered.bg_fill = ACCENT.gamma_multiply(0.85);
    visuals.window_corner_radius = egui::CornerRadius::same(10);
    visuals
}

pub fn scaled_text_styles(text_scale: f32) -> BTreeMap<egui::TextStyle, egui::FontId> {
    let mut styles = egui::Style::default().text_styles;
    for font in styles.values_mut() {
        font.size *= text_scale;
    }
    styles
}

pub fn lighten_color(c: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round() as u8
    };
    egui::Color32::from_rgb(mix(c.r()), mix(c.g()), mix(c.b()))
}

pub fn tier_color(tier: MatchTier) -> egui::Color32 {
    match tier {
        MatchTier::Excellent => egui::Color32::from_rgb(46, 160, 67),
        MatchTier::Good => egui::Color32::from_rgb(214, 158, 46),
        MatchTier::NeedsImprovement => egui::Color32::from_rgb(207, 76, 76),
    }
}

pub fn toast_color(kind: ToastKind) -> egui::Color32 {
    match kind {
        ToastKind::Info => egui::Color32::from_rgb(52, 120, 198),
        ToastKind::Success => egui::Color32::from_rgb(46, 160, 67),
        ToastKind::Warning => egui::Color32::from_rgb(214, 142, 30),
        ToastKind::Error => egui::Color32::from_rgb(200, 60, 60),
    }
}
