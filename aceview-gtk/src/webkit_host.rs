use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;
use webkit6::prelude::*;

use aceview_editor::error::{EditorError, Result};
use aceview_editor::host::{decode_guarded, guard_script, js_string_literal, MessageHandler};
use aceview_editor::ScriptHost;
use serde_json::Value;

use crate::settings::Settings;

/// [`ScriptHost`] backed by a WebKitGTK `WebView`.
///
/// Blocking calls spin the thread-default main context until WebKit answers, so
/// they must only be made from the GTK main thread.
pub struct WebKitHost {
    webview: webkit6::WebView,
    content_manager: webkit6::UserContentManager,
}

impl WebKitHost {
    pub fn new(settings: &Settings) -> Self {
        let content_manager = webkit6::UserContentManager::new();

        let webview = webkit6::WebView::builder()
            .user_content_manager(&content_manager)
            .hexpand(true)
            .vexpand(true)
            .build();

        if let Some(wk_settings) = webkit6::prelude::WebViewExt::settings(&webview) {
            wk_settings.set_enable_javascript(true);
            wk_settings.set_enable_developer_extras(settings.developer_extras);
            // The page and the Ace build are both local files
            wk_settings.set_allow_file_access_from_file_urls(true);
        }

        WebKitHost {
            webview,
            content_manager,
        }
    }

    pub fn webview(&self) -> &webkit6::WebView {
        &self.webview
    }
}

/// Iterate `context` until `done` is set. There is no other exit.
fn wait_until(context: &glib::MainContext, done: &Cell<bool>) {
    while !done.get() {
        context.iteration(true);
    }
}

impl ScriptHost for WebKitHost {
    /// Load `uri` and iterate the thread-default main context until WebKit
    /// reports `LoadEvent::Finished`.
    ///
    /// Must be called on the GTK main thread, and the `WebView` should be in
    /// a presented window: an unmapped view may never finish loading, and
    /// this call then never returns.
    fn load(&self, uri: &str) -> Result<()> {
        let finished = Rc::new(Cell::new(false));
        let failure: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

        let f = failure.clone();
        let failed_id = self
            .webview
            .connect_load_failed(move |_wv, _event, failing_uri, error| {
                log::error!("Failed to load {}: {}", failing_uri, error);
                *f.borrow_mut() = Some(error.to_string());
                false
            });

        let done = finished.clone();
        let changed_id = self.webview.connect_load_changed(move |_wv, event| {
            // WebKit also reports Finished after a failed load
            if event == webkit6::LoadEvent::Finished {
                done.set(true);
            }
        });

        self.webview.load_uri(uri);
        wait_until(&glib::MainContext::ref_thread_default(), &finished);

        self.webview.disconnect(failed_id);
        self.webview.disconnect(changed_id);

        let reason = failure.borrow_mut().take();
        match reason {
            Some(reason) => Err(EditorError::ResourceLoad {
                uri: uri.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Run `code` and iterate the thread-default main context until WebKit's
    /// completion callback fires. Same threading rules as [`load`](Self::load);
    /// a page stuck in a script loop blocks the caller forever.
    fn evaluate(&self, code: &str) -> Result<Value> {
        let finished = Rc::new(Cell::new(false));
        let outcome: Rc<RefCell<Option<std::result::Result<String, String>>>> =
            Rc::new(RefCell::new(None));

        let done = finished.clone();
        let out = outcome.clone();
        self.webview.evaluate_javascript(
            &guard_script(code),
            None,
            None,
            None::<&gtk4::gio::Cancellable>,
            move |result| {
                *out.borrow_mut() = Some(match result {
                    Ok(value) => Ok(value.to_str().to_string()),
                    Err(e) => Err(e.to_string()),
                });
                done.set(true);
            },
        );
        wait_until(&glib::MainContext::ref_thread_default(), &finished);

        let result = outcome.borrow_mut().take();
        match result {
            Some(Ok(text)) => decode_guarded(&text),
            Some(Err(e)) => Err(EditorError::Host(e)),
            None => Err(EditorError::Host(
                "evaluation finished without a result".to_string(),
            )),
        }
    }

    fn register_handler(&self, name: &str, handler: MessageHandler) -> Result<()> {
        self.content_manager
            .register_script_message_handler(name, None);
        self.content_manager
            .connect_script_message_received(Some(name), move |_ucm, value| {
                handler(value.to_str().as_str());
            });

        // Give the page a stable entry point that doesn't depend on WebKit
        let shim = format!(
            "window.aceviewPost = function (message) {{ \
             window.webkit.messageHandlers[{}].postMessage(message); }}; true;",
            js_string_literal(name)
        );
        self.evaluate(&shim)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_until_returns_once_flag_is_set_from_the_loop() {
        let context = glib::MainContext::new();
        let done = Rc::new(Cell::new(false));
        let turns = Rc::new(Cell::new(0));

        let d = done.clone();
        let t = turns.clone();
        context
            .with_thread_default(|| {
                glib::idle_add_local(move || {
                    t.set(t.get() + 1);
                    if t.get() == 3 {
                        d.set(true);
                        glib::ControlFlow::Break
                    } else {
                        glib::ControlFlow::Continue
                    }
                });
                wait_until(&context, &done);
            })
            .unwrap();

        assert!(done.get());
        assert_eq!(turns.get(), 3);
    }
}
