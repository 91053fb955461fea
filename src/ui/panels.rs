use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::load_file;
use crate::projection::View;
use crate::state::{AppState, ViewState};

// ---------------------------------------------------------------------------
// Left side panel – selectors
// ---------------------------------------------------------------------------

/// Render the left panel: group / marker / genre selectors, the view
/// toggle and the participant genre toggles.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, now: f64) {
    ui.heading("Filters");
    ui.separator();

    let Some(current) = state.view.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut next: Option<ViewState> = None;
    let store = &state.store;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Group");
            egui::ComboBox::from_id_salt("group_filter")
                .selected_text(&current.selection.group)
                .show_ui(ui, |ui: &mut Ui| {
                    for group in &store.groups {
                        if ui
                            .selectable_label(current.selection.group == *group, group)
                            .clicked()
                        {
                            next = Some(current.with_group(group.clone()));
                        }
                    }
                });

            ui.strong("Marker");
            egui::ComboBox::from_id_salt("marker_filter")
                .selected_text(&current.selection.marker)
                .show_ui(ui, |ui: &mut Ui| {
                    for marker in &store.markers {
                        if ui
                            .selectable_label(current.selection.marker == *marker, marker)
                            .clicked()
                        {
                            next = Some(current.with_marker(marker.clone()));
                        }
                    }
                });

            ui.strong("Genre");
            egui::ComboBox::from_id_salt("genre_filter")
                .selected_text(current.selection.genre.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for genre in &store.genres {
                        let text = RichText::new(genre.as_str()).color(state.colors.line_color(genre));
                        if ui
                            .selectable_label(current.selection.genre == *genre, text)
                            .clicked()
                        {
                            next = Some(current.with_genre(genre.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- View toggle ----
            ui.strong("View");
            ui.horizontal(|ui: &mut Ui| {
                for view in View::ALL {
                    if ui
                        .selectable_label(current.view == view, view.to_string())
                        .clicked()
                    {
                        next = Some(current.with_view(view));
                    }
                }
            });
            ui.separator();

            // ---- Participant chart genres ----
            ui.strong("Participant genres");
            for genre in &store.genres {
                let mut checked = current.participant_genres.contains(genre);
                let text = RichText::new(genre.as_str()).color(state.colors.line_color(genre));
                if ui.checkbox(&mut checked, text).changed() {
                    next = Some(current.toggling_participant_genre(genre));
                }
            }
        });

    if let Some(next) = next {
        state.apply_view(next, now);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, now: f64) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, now);
                ui.close_menu();
            }
            if ui.button("Reload configured sources").clicked() {
                state.load_configured_sources(now);
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.store.is_empty() {
            ui.label(format!(
                "{} samples loaded, {} selected",
                state.store.len(),
                state.derived.filtered.len()
            ));
        }

        ui.separator();

        if ui.button("Replay").clicked() {
            let pb = &state.config.playback;
            state
                .playback
                .start(state.derived.filtered.len(), pb.step, pb.interval_s, now);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a file and add its samples to the loaded data.
pub fn open_file_dialog(state: &mut AppState, now: f64) {
    let file = rfd::FileDialog::new()
        .set_title("Open motion data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_file(&path) {
            Ok(samples) => {
                log::info!("Loaded {} samples from {}", samples.len(), path.display());
                state.status_message = None;
                state.append_samples(samples, now);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
