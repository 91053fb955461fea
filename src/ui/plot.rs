use eframe::egui::{Color32, Pos2, Sense, Stroke, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, VLine};

use crate::data::model::{AggregatedGenreSeries, Genre};
use crate::projection::{View, head_offset, scatter_points};
use crate::state::AppState;

/// Number of colour bands used for time-encoded scatter points.
const TIME_BANDS: usize = 12;

// ---------------------------------------------------------------------------
// Head (animated disc)
// ---------------------------------------------------------------------------

/// Eye positions as fractions of the head radius, per view.
fn eye_positions(view: View) -> &'static [[f32; 2]] {
    match view {
        View::Front => &[[-0.42, -0.17], [0.42, -0.17]],
        View::Top => &[[-0.42, 0.89], [0.42, 0.89]],
        View::Side => &[[0.89, -0.17]],
    }
}

/// Draw the head, translated by the current playback sample.
pub fn head_view(ui: &mut Ui, state: &AppState, view: View) {
    let size = ui.available_width().min(280.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
    let painter = ui.painter_at(rect);

    // The offsets are in the units of a 100 px radius head.
    let radius = size * 0.3;
    let px = radius / 100.0;
    let [dx, dy] = state
        .current_sample()
        .map(|s| head_offset(view, s, state.config.playback.head_scale))
        .unwrap_or([0.0, 0.0]);
    let center = rect.center() + Vec2::new(dx as f32 * px, dy as f32 * px);

    let outline = Stroke::new(1.0, Color32::from_gray(100));
    painter.circle(center, radius, Color32::from_rgb(0xFD, 0xE6, 0x6B), outline);

    // Graticule: equator and prime meridian of the visible hemisphere.
    let thin = Stroke::new(0.5, Color32::from_gray(100));
    painter.line_segment([center - Vec2::new(radius, 0.0), center + Vec2::new(radius, 0.0)], thin);
    painter.line_segment([center - Vec2::new(0.0, radius), center + Vec2::new(0.0, radius)], thin);

    for [ex, ey] in eye_positions(view) {
        let eye = Pos2::new(center.x + ex * radius, center.y + ey * radius);
        painter.circle_filled(eye, radius * 0.1, Color32::from_gray(0x33));
    }
}

// ---------------------------------------------------------------------------
// Projection scatter
// ---------------------------------------------------------------------------

/// Scatter of the selection on the view's axis pair, revealed with playback
/// and coloured from light (early) to dark (late).
pub fn axes_plot(ui: &mut Ui, state: &AppState, view: View, genre: &Genre) {
    let (x_axis, y_axis) = view.axes();
    let filtered = &state.derived.filtered;
    let coords = scatter_points(filtered, x_axis, y_axis);

    let (t_min, t_max) = filtered
        .iter()
        .map(|s| s.time_s)
        .filter(|t| t.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t), hi.max(t)));
    let span = t_max - t_min;

    let mut bands: Vec<Vec<[f64; 2]>> = vec![Vec::new(); TIME_BANDS];
    for (i, (sample, xy)) in filtered.iter().zip(coords).enumerate() {
        if !state.playback.is_revealed(i) {
            continue;
        }
        let t = if span > 0.0 { (sample.time_s - t_min) / span } else { 0.0 };
        let band = ((t * TIME_BANDS as f64) as usize).min(TIME_BANDS - 1);
        bands[band].push(xy);
    }

    let [lo, hi] = state.config.axes.position_domain;
    Plot::new(("axes_plot", view.to_string()))
        .height(280.0)
        .data_aspect(1.0)
        .include_x(lo)
        .include_x(hi)
        .include_y(lo)
        .include_y(hi)
        .x_axis_label(x_axis.column())
        .y_axis_label(y_axis.column())
        .show(ui, |plot_ui| {
            for (b, pts) in bands.into_iter().enumerate() {
                if pts.is_empty() {
                    continue;
                }
                let t = (b as f64 + 0.5) / TIME_BANDS as f64;
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .radius(2.5)
                        .color(state.colors.time_color(genre, t)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Instantaneous displacement of the selection
// ---------------------------------------------------------------------------

/// One line per block of the selection, with a marker at the head's time.
pub fn displacement_plot(ui: &mut Ui, state: &AppState) {
    let now_t = state.current_sample().map(|s| s.time_s);

    Plot::new("displacement_plot")
        .height(220.0)
        .legend(Legend::default())
        .include_y(0.0)
        .x_axis_label("Time (s)")
        .y_axis_label("Displacement (mm)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for gs in &state.derived.instantaneous {
                let name = match &gs.block {
                    Some(block) => format!("{} · block {block}", gs.genre),
                    None => gs.genre.to_string(),
                };
                let points: PlotPoints = gs.series.iter().map(|p| [p.time_s, p.disp]).collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&name)
                        .color(state.colors.line_color(&gs.genre))
                        .width(1.0),
                );
            }
            if let Some(t) = now_t {
                plot_ui.vline(VLine::new(t).color(Color32::from_gray(120)));
            }
        });
}

// ---------------------------------------------------------------------------
// Cumulative per-genre charts
// ---------------------------------------------------------------------------

/// Averaged cumulative displacement per genre on the shared time axis.
pub fn cumulative_plot(
    ui: &mut Ui,
    id: &str,
    state: &AppState,
    series: &[AggregatedGenreSeries],
    highlight: Option<&Genre>,
) {
    if series.is_empty() {
        ui.label("No data for this selection.");
        return;
    }
    let domain = state.time_domain;

    let mut plot = Plot::new(id);
    if domain.span() > 0.0 {
        plot = plot.include_x(domain.min).include_x(domain.max);
    }
    plot.height(220.0)
        .legend(Legend::default())
        .include_y(0.0)
        .include_y(state.config.axes.displacement_max)
        .x_axis_label("Time (seconds)")
        .y_axis_label("Displacement (mm)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for agg in series {
                let width = if highlight == Some(&agg.genre) { 3.0 } else { 1.5 };
                let points: PlotPoints = agg.series.iter().map(|p| [p.time_s, p.disp]).collect();
                plot_ui.line(
                    Line::new(points)
                        .name(agg.genre.as_str())
                        .color(state.colors.line_color(&agg.genre))
                        .width(width),
                );
            }
        });
}

/// Runs, points and mean displacement per genre.
pub fn summary_table(ui: &mut Ui, id: &str, state: &AppState, series: &[AggregatedGenreSeries]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(50.0))
            .column(Column::auto().at_least(60.0))
            .column(Column::remainder())
            .header(18.0, |mut header| {
                for title in ["Genre", "Runs", "Points", "Mean (mm)"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for agg in series {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.colored_label(state.colors.line_color(&agg.genre), agg.genre.as_str());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(agg.runs.to_string());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(agg.series.len().to_string());
                        });
                        row.col(|ui: &mut Ui| {
                            let mean = agg
                                .mean_disp()
                                .map(|m| format!("{m:.3}"))
                                .unwrap_or_else(|| "–".to_string());
                            ui.label(mean);
                        });
                    });
                }
            });
    });
}

/// Placeholder shown before any data has loaded.
pub fn empty_state(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("No motion data loaded  (File → Open…)");
    });
}
