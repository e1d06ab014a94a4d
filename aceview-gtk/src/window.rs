use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use libadwaita::prelude::*;
use webkit6::prelude::*;

use aceview_editor::assets;
use aceview_editor::{Editor, EditorError, HighlightMode};

use crate::settings::{self, Settings};
use crate::webkit_host::WebKitHost;

/// Build the main window, bootstrap the editor in it and open `file`.
pub fn build_window(app: &adw::Application, file: Option<PathBuf>) {
    let settings = Rc::new(RefCell::new(settings::load()));

    let title = file
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "aceview".to_string());

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title(title.as_str())
        .default_width(settings.borrow().window_width)
        .default_height(settings.borrow().window_height)
        .build();

    let main_box = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let read_only_btn = gtk4::ToggleButton::builder()
        .icon_name("changes-prevent-symbolic")
        .tooltip_text("Read-only")
        .active(settings.borrow().read_only)
        .sensitive(false)
        .build();
    header.pack_end(&read_only_btn);
    main_box.append(&header);

    let host = WebKitHost::new(&settings.borrow());
    let webview = host.webview().clone();
    main_box.append(&webview);

    let status_label = gtk4::Label::new(None);
    status_label.add_css_class("status-bar");
    status_label.set_halign(gtk4::Align::Start);
    status_label.set_margin_start(8);
    status_label.set_margin_end(8);
    main_box.append(&status_label);

    window.set_content(Some(&main_box));
    // The WebView needs to be mapped before it will finish loading
    window.present();

    // Bootstrap spins the main loop; don't hold the settings borrow across it
    let startup_settings = settings.borrow().clone();
    let editor = match start_editor(host, &startup_settings, file.as_deref()) {
        Ok(editor) => Rc::new(editor),
        Err(e) => {
            log::error!("Editor failed to start: {}", e);
            webview.load_html(&error_html(&e), None);
            return;
        }
    };

    match editor.lines() {
        Ok(lines) => status_label.set_text(&lines_text(lines)),
        Err(e) => log::warn!("Failed to read line count: {}", e),
    }

    let label = status_label.clone();
    editor.connect_lines_changed(move |lines| label.set_text(&lines_text(lines)));

    let win = window.downgrade();
    editor.connect_text_changed(move || {
        if let Some(win) = win.upgrade() {
            let current = win.title().map(|t| t.to_string()).unwrap_or_default();
            if !current.starts_with('*') {
                win.set_title(Some(&format!("*{}", current)));
            }
        }
    });

    let editor_for_toggle = editor.clone();
    read_only_btn.connect_toggled(move |btn| {
        if let Err(e) = editor_for_toggle.set_read_only(btn.is_active()) {
            log::warn!("Failed to toggle read-only: {}", e);
        }
    });
    read_only_btn.set_sensitive(true);

    // The toggle and close handlers hold the editor, so it lives as long as the window
    let settings_for_close = settings.clone();
    window.connect_close_request(move |win| {
        let mut s = settings_for_close.borrow_mut();
        record_close_state(&mut s, win.default_size(), editor.is_read_only());
        settings::save(&s);
        glib::Propagation::Proceed
    });
}

/// Fold the window size and the editor's read-only flag into `settings`.
fn record_close_state(
    settings: &mut Settings,
    (width, height): (i32, i32),
    read_only: Result<bool, EditorError>,
) {
    settings.window_width = width;
    settings.window_height = height;
    match read_only {
        Ok(read_only) => settings.read_only = read_only,
        Err(e) => log::warn!("Keeping saved read-only flag: {}", e),
    }
}

fn start_editor(
    host: WebKitHost,
    settings: &Settings,
    file: Option<&Path>,
) -> Result<Editor<WebKitHost>, EditorError> {
    let ace_dir = if settings.ace_dir.is_empty() {
        assets::default_ace_dir()?
    } else {
        PathBuf::from(&settings.ace_dir)
    };
    let page = assets::ensure_page_extracted(&ace_dir)?;

    let editor = Editor::new(host, page)?;
    editor.set_theme(settings.theme)?;

    let mut mode = settings.highlight_mode;
    if let Some(path) = file {
        match std::fs::read_to_string(path) {
            Ok(contents) => editor.set_text(&contents)?,
            Err(e) => log::warn!("Failed to read {:?}: {}", path, e),
        }
        if let Some(guessed) = HighlightMode::from_path(path) {
            mode = guessed;
        }
    }
    editor.set_highlight_mode(mode)?;
    editor.set_read_only(settings.read_only)?;
    editor.goto_line(1)?;

    Ok(editor)
}

fn lines_text(lines: u32) -> String {
    if lines == 1 {
        "1 line".to_string()
    } else {
        format!("{} lines", lines)
    }
}

fn error_html(error: &EditorError) -> String {
    let message = error
        .to_string()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        "<html><body style='background:#272822;color:#f8f8f2;font-family:monospace;padding:2em'>\
         <h3>Editor failed to load</h3><p>{}</p></body></html>",
        message
    )
}
