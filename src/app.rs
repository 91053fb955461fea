use eframe::egui::{self, Ui};

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HeadMotionApp {
    pub state: AppState,
}

impl HeadMotionApp {
    /// Create the app and load the configured sources.
    pub fn new(config: ViewerConfig, now: f64) -> Self {
        let mut state = AppState::new(config);
        state.load_configured_sources(now);
        Self { state }
    }
}

impl eframe::App for HeadMotionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.state.playback.advance(now);
        if self.state.playback.is_active() {
            ctx.request_repaint();
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, now);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, now);
            });

        // ---- Central panel: head, projections and displacement charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central(ui, &self.state);
        });
    }
}

fn central(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        plot::empty_state(ui);
        return;
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                plot::head_view(&mut cols[0], state, view.view);
                plot::axes_plot(&mut cols[1], state, view.view, &view.selection.genre);
            });

            ui.heading("Displacement");
            plot::displacement_plot(ui, state);

            ui.heading("All groups");
            plot::cumulative_plot(ui, "cumulative_all", state, &state.overview, None);

            ui.heading(format!("Group {}", view.selection.group));
            plot::cumulative_plot(ui, "cumulative_group", state, &state.derived.group, None);

            ui.heading(format!(
                "Participant {} / {}",
                view.selection.group, view.selection.marker
            ));
            plot::cumulative_plot(
                ui,
                "cumulative_participant",
                state,
                &state.derived.participant,
                Some(&view.selection.genre),
            );
            plot::summary_table(ui, "participant_summary", state, &state.derived.participant);
        });
}
