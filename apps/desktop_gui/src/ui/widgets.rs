use client_core::forms::parse_hex_color;
use eframe::egui;
use egui::Color32;
use shared::domain::{CompilationStatus, DEFAULT_SUBJECT_COLOR};

pub fn status_color(status: CompilationStatus) -> Color32 {
    match status {
        CompilationStatus::Success => Color32::from_rgb(16, 185, 129),
        CompilationStatus::Error => Color32::from_rgb(239, 68, 68),
        CompilationStatus::Unknown => Color32::from_rgb(156, 163, 175),
    }
}

pub fn status_badge(ui: &mut egui::Ui, status: CompilationStatus) {
    ui.colored_label(status_color(status), status.as_str());
}

pub fn hex_to_color(value: &str) -> Color32 {
    let [r, g, b] = parse_hex_color(value)
        .or_else(|| parse_hex_color(DEFAULT_SUBJECT_COLOR))
        .unwrap_or([59, 130, 246]);
    Color32::from_rgb(r, g, b)
}

pub fn color_swatch(ui: &mut egui::Ui, hex: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 2.0, hex_to_color(hex));
}

pub fn stat_card(ui: &mut egui::Ui, label: &str, value: u64) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.set_min_width(150.0);
            ui.label(label);
            ui.label(egui::RichText::new(value.to_string()).size(26.0).strong());
        });
}

pub fn tag_chip(ui: &mut egui::Ui, text: &str) {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.small(text);
        });
}

/// Required-field label, marked with an asterisk.
pub fn required_label(ui: &mut egui::Ui, text: &str) {
    ui.label(format!("{text} *"));
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format_scaled_unit(bytes, MB, "MB")
    } else if bytes >= KB {
        format_scaled_unit(bytes, KB, "KB")
    } else {
        format!("{bytes} B")
    }
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let rendered = format!("{value:.1}");
    let rendered = rendered.trim_end_matches(".0");
    format!("{rendered} {unit_label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_file_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(2 * 1024 * 1024), "2 MB");
    }

    #[test]
    fn invalid_subject_color_falls_back_to_default_blue() {
        assert_eq!(hex_to_color("not-a-color"), Color32::from_rgb(59, 130, 246));
        assert_eq!(hex_to_color("#10B981"), Color32::from_rgb(16, 185, 129));
    }
}
