mod app;

use app::ForgeryApp;
use forgery_detect::{DetectorConfig, ForgeryDetector};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("forgery_detect=info")),
        )
        .with_target(false)
        .init();

    let detector = ForgeryDetector::new(DetectorConfig::default());
    if let Some(err) = detector.model_error() {
        app::show_error(&err.user_message());
    }

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(app::TITLE)
            .with_inner_size([420.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        app::TITLE,
        native_options,
        Box::new(|_cc| Ok(Box::new(ForgeryApp::new(detector)))),
    )
}
