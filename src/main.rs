use eframe::egui;
use head_motion_viewer::app::HeadMotionApp;
use head_motion_viewer::config::ViewerConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::load().unwrap_or_else(|e| {
        log::warn!("{e}; using default configuration");
        ViewerConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Head Motion – Displacement Viewer",
        options,
        Box::new(|cc| {
            let now = cc.egui_ctx.input(|i| i.time);
            Ok(Box::new(HeadMotionApp::new(config, now)))
        }),
    )
}
