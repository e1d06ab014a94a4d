mod settings;
mod webkit_host;
mod window;

use std::path::PathBuf;

use libadwaita as adw;
use libadwaita::prelude::*;

const APP_ID: &str = "dev.aceview.AceView";

fn main() {
    env_logger::init();

    // GTK would try to interpret the file argument itself
    let file: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_startup(|_app| {
        let style_manager = adw::StyleManager::default();
        style_manager.set_color_scheme(adw::ColorScheme::ForceDark);
    });

    app.connect_activate(move |app| {
        window::build_window(app, file.clone());
    });

    app.run_with_args(&["aceview"]);
}
