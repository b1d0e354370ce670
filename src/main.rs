mod actions;
mod app;
mod canvas;
mod config;
mod display;
mod error;
mod gradient;
mod host;
mod panel;
mod reaction_diffusion;
mod session;
mod types;
mod uniforms;

use config::AppConfig;

fn main() -> eframe::Result<()> {
    use env_logger::Env;
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::load_or_default(&AppConfig::default_path());
    let [width, height] = app::initial_window_size(&config);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Reaction-Diffusion Playground",
        options,
        Box::new(move |cc| Ok(Box::new(app::PanelApp::new(cc, config)))),
    )
}
