// src/ui/helpers.rs
use egui::{Button, Color32, ProgressBar, RichText, Ui, Vec2};
use crate::loader::{LoadStatus, Loadable};

pub fn big_list_button(ui: &mut Ui, label: String, width: f32, height: f32, enabled: bool) -> bool {
    ui.add_enabled(enabled, Button::new(label).min_size(Vec2::new(width, height))).clicked()
}

/// Pinta el indicador de una carga pendiente/fallida. Devuelve `true` si lo pintó,
/// es decir, si el contenido todavía no se puede mostrar.
pub fn status_label<T: Loadable>(ui: &mut Ui, status: &LoadStatus<T>) -> bool {
    let Some(text) = status.indicator() else {
        return false;
    };
    match status {
        LoadStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(text);
            });
        }
        LoadStatus::Failed(_) => {
            ui.label(RichText::new(text).color(Color32::LIGHT_RED));
        }
        _ => {
            ui.label(RichText::new(text).italics());
        }
    }
    true
}

/// Barra con el porcentaje y una etiqueta debajo.
pub fn labeled_progress(ui: &mut Ui, percent: u32, label: String) {
    ui.add(ProgressBar::new(percent as f32 / 100.0).show_percentage());
    ui.label(RichText::new(label).small());
}
