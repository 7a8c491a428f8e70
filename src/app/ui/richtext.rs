use eframe::egui;

use crate::mentions::{extract_mentions, Segment};

/// Renders free text with `@handle` tokens as clickable links. Returns the
/// handle that was clicked this frame, if any.
pub fn render_rich_text(ui: &mut egui::Ui, text: &str) -> Option<String> {
    let mut clicked = None;
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for segment in extract_mentions(text) {
            match segment {
                Segment::Text(value) => {
                    ui.label(value);
                }
                Segment::Mention(handle) => {
                    if ui.link(format!("@{handle}")).clicked() {
                        clicked = Some(handle);
                    }
                }
            }
        }
    });
    clicked
}
