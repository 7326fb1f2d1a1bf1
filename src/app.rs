//! App manager for the single tag read/write screen

pub mod reconcile;

use std::sync::Arc;

use crossbeam::channel::{Receiver, Sender};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tagnote_macros::impl_default_for;
use tracing::{debug, error, warn};

use crate::{
    build, logging,
    tag::{NdefTag, write_to_tag},
};
use reconcile::{AppReconcileMessage as AppMessage, FfiReconcile};
use tagnote_nfc::{first_text, payload::TextPayload, writer};

pub static APP: OnceCell<App> = OnceCell::new();

/// Language code stamped into every outgoing text record
const WRITE_LANGUAGE_CODE: &str = "en";

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct AppState {
    /// Text of the most recently read tag
    pub last_read: Option<TextPayload>,

    /// Whether the platform should route discovered tags to this screen
    pub dispatch_enabled: bool,
}

impl_default_for!(AppState);
impl AppState {
    pub fn new() -> Self {
        Self {
            last_read: None,
            dispatch_enabled: false,
        }
    }
}

#[derive(Clone)]
pub struct App {
    state: Arc<RwLock<AppState>>,

    /// The most recently detected tag, present only while one is in the field
    tag: Arc<RwLock<Option<Arc<Box<dyn NdefTag>>>>>,

    reconciler: Sender<AppMessage>,
    reconcile_receiver: Arc<Receiver<AppMessage>>,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum AppAction {
    ScreenResumed,
    ScreenPaused,
    TagScanned { message: Vec<u8> },
    TagLost,
    WriteTag { text: String },
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, uniffi::Enum)]
pub enum TagStatus {
    NoTagDetected,
    WriteSuccess,
    WriteFailed,
}

impl TagStatus {
    /// The short user facing status line for each outcome
    pub fn message(&self) -> &'static str {
        match self {
            TagStatus::NoTagDetected => "No NFC Tag Detected",
            TagStatus::WriteSuccess => "Text Written Successfully!",
            TagStatus::WriteFailed => "Error during Writing, Try Again!",
        }
    }
}

impl_default_for!(App);
impl App {
    /// Create a new instance of the app
    pub fn new() -> Self {
        // one time init
        logging::init();

        let (sender, receiver) = crossbeam::channel::bounded(1000);

        Self {
            state: Arc::new(RwLock::new(AppState::new())),
            tag: Arc::new(RwLock::new(None)),
            reconciler: sender,
            reconcile_receiver: Arc::new(receiver),
        }
    }

    /// Fetch global instance of the app, or create one if it doesn't exist
    pub fn global() -> &'static App {
        APP.get_or_init(App::new)
    }

    /// Handle event received from frontend
    pub fn handle_action(&self, action: AppAction) {
        match action {
            AppAction::ScreenResumed => self.set_dispatch_enabled(true),
            AppAction::ScreenPaused => self.set_dispatch_enabled(false),

            AppAction::TagScanned { message } => self.tag_scanned(&message),

            AppAction::TagLost => {
                debug!("tag left the field");
                *self.tag.write() = None;
            }

            AppAction::WriteTag { text } => self.write_tag(&text),
        }
    }

    /// Platform hands over the tag it discovered via foreground dispatch
    pub fn register_tag(&self, tag: Box<dyn NdefTag>) {
        debug!("tag detected: {tag:?}");
        *self.tag.write() = Some(Arc::new(tag));
    }

    pub fn tag_present(&self) -> bool {
        self.tag.read().is_some()
    }

    pub fn get_state(&self) -> AppState {
        self.state.read().clone()
    }

    pub fn listen_for_updates(&self, updater: Box<dyn FfiReconcile>) {
        let reconcile_receiver = self.reconcile_receiver.clone();

        std::thread::spawn(move || {
            while let Ok(message) = reconcile_receiver.recv() {
                updater.reconcile(message);
            }
        });
    }

    fn set_dispatch_enabled(&self, enabled: bool) {
        debug!("foreground dispatch enabled: {enabled}");

        self.state.write().dispatch_enabled = enabled;
        self.send_update(AppMessage::ForegroundDispatchChanged(enabled));
    }

    fn tag_scanned(&self, message: &[u8]) {
        debug!("tag scanned: {}", hex::encode(message));

        let records = match tagnote_nfc::decode(message) {
            Ok(records) => records,
            Err(error) => {
                warn!("ignoring malformed tag payload: {error}");
                return;
            }
        };

        let Some(text) = first_text(&records) else {
            warn!("scanned message has no text record");
            return;
        };

        debug!("tag contents: {}", text.text);

        self.state.write().last_read = Some(text.clone());
        self.send_update(AppMessage::TagContentsChanged(text));
    }

    fn write_tag(&self, text: &str) {
        let tag = self.tag.read().clone();

        // never touch the NFC stack without a tag in the field
        let Some(tag) = tag else {
            self.send_update(AppMessage::StatusChanged(TagStatus::NoTagDetected));
            return;
        };

        let message = match writer::encode_text_message(text, WRITE_LANGUAGE_CODE) {
            Ok(message) => message,
            Err(error) => {
                error!("unable to encode text record: {error}");
                self.send_update(AppMessage::StatusChanged(TagStatus::WriteFailed));
                return;
            }
        };

        match write_to_tag(tag.as_ref().as_ref(), message) {
            Ok(()) => {
                self.send_update(AppMessage::StatusChanged(TagStatus::WriteSuccess));
            }
            Err(error) => {
                error!("write error: {error}");
                self.send_update(AppMessage::StatusChanged(TagStatus::WriteFailed));
            }
        }
    }

    fn send_update(&self, message: AppMessage) {
        if let Err(error) = self.reconciler.send(message) {
            error!("failed to send update to frontend: {error}");
        }
    }
}

/// Representation of our app over FFI. Essentially a wrapper of [`App`].
#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Object)]
pub struct FfiApp;

#[uniffi::export]
impl FfiApp {
    /// FFI constructor which wraps in an Arc
    #[uniffi::constructor(name = "new")]
    pub fn global() -> Arc<Self> {
        Arc::new(Self)
    }

    /// Frontend calls this method to send events to the rust side
    pub fn dispatch(&self, action: AppAction) {
        self.inner().handle_action(action);
    }

    pub fn register_tag(&self, tag: Box<dyn NdefTag>) {
        self.inner().register_tag(tag);
    }

    pub fn tag_present(&self) -> bool {
        self.inner().tag_present()
    }

    pub fn get_state(&self) -> AppState {
        self.inner().get_state()
    }

    pub fn listen_for_updates(&self, updater: Box<dyn FfiReconcile>) {
        self.inner().listen_for_updates(updater);
    }

    pub fn version(&self) -> String {
        build::version()
    }

    pub fn git_short_hash(&self) -> String {
        build::git_short_hash()
    }
}

impl FfiApp {
    fn inner(&self) -> &App {
        App::global()
    }
}

#[uniffi::export]
fn tag_status_message(status: TagStatus) -> String {
    status.message().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::TagError;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct MockTag {
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail_write: bool,
    }

    impl NdefTag for MockTag {
        fn connect(&self) -> Result<(), TagError> {
            self.calls.lock().push("connect");
            Ok(())
        }

        fn write_message(&self, _message: Vec<u8>) -> Result<(), TagError> {
            self.calls.lock().push("write");
            if self.fail_write {
                return Err(TagError::Write("simulated io error".to_string()));
            }
            Ok(())
        }

        fn close(&self) -> Result<(), TagError> {
            self.calls.lock().push("close");
            Ok(())
        }
    }

    fn next_update(app: &App) -> AppMessage {
        app.reconcile_receiver
            .try_recv()
            .expect("expected a reconcile message")
    }

    #[test]
    fn write_with_no_tag_never_touches_the_stack() {
        let app = App::new();

        app.handle_action(AppAction::WriteTag {
            text: "hello".to_string(),
        });

        assert_eq!(
            next_update(&app),
            AppMessage::StatusChanged(TagStatus::NoTagDetected)
        );
        assert!(!app.tag_present());
    }

    #[test]
    fn successful_write_reports_success() {
        let app = App::new();

        let calls = Arc::new(Mutex::new(Vec::new()));
        app.register_tag(Box::new(MockTag {
            calls: calls.clone(),
            fail_write: false,
        }));

        app.handle_action(AppAction::WriteTag {
            text: "hello".to_string(),
        });

        assert_eq!(
            next_update(&app),
            AppMessage::StatusChanged(TagStatus::WriteSuccess)
        );
        assert_eq!(*calls.lock(), vec!["connect", "write", "close"]);
    }

    #[test]
    fn failed_write_reports_failure_without_panicking() {
        let app = App::new();

        let calls = Arc::new(Mutex::new(Vec::new()));
        app.register_tag(Box::new(MockTag {
            calls: calls.clone(),
            fail_write: true,
        }));

        app.handle_action(AppAction::WriteTag {
            text: "hello".to_string(),
        });

        assert_eq!(
            next_update(&app),
            AppMessage::StatusChanged(TagStatus::WriteFailed)
        );
        // the session is still closed after the failed write
        assert_eq!(*calls.lock(), vec!["connect", "write", "close"]);
    }

    #[test]
    fn scanned_tag_updates_screen_contents() {
        let app = App::new();

        let message = writer::encode_text_message("note on a tag", "en").unwrap();
        app.handle_action(AppAction::TagScanned { message });

        let AppMessage::TagContentsChanged(text) = next_update(&app) else {
            panic!("expected tag contents update")
        };

        assert_eq!(text.text, "note on a tag");
        assert_eq!(app.get_state().last_read.unwrap().text, "note on a tag");
    }

    #[test]
    fn malformed_scan_is_ignored() {
        let app = App::new();

        app.handle_action(AppAction::TagScanned {
            message: vec![0x00, 0x01],
        });

        assert!(app.reconcile_receiver.try_recv().is_err());
        assert_eq!(app.get_state().last_read, None);
    }

    #[test]
    fn lifecycle_toggles_foreground_dispatch() {
        let app = App::new();

        app.handle_action(AppAction::ScreenResumed);
        assert!(app.get_state().dispatch_enabled);
        assert_eq!(
            next_update(&app),
            AppMessage::ForegroundDispatchChanged(true)
        );

        app.handle_action(AppAction::ScreenPaused);
        assert!(!app.get_state().dispatch_enabled);
        assert_eq!(
            next_update(&app),
            AppMessage::ForegroundDispatchChanged(false)
        );
    }

    #[test]
    fn tag_lost_clears_the_detected_tag() {
        let app = App::new();

        app.register_tag(Box::new(MockTag::default()));
        assert!(app.tag_present());

        app.handle_action(AppAction::TagLost);
        assert!(!app.tag_present());
    }

    #[test]
    fn status_messages_match_the_screen_toasts() {
        assert_eq!(TagStatus::NoTagDetected.message(), "No NFC Tag Detected");
        assert_eq!(
            TagStatus::WriteSuccess.message(),
            "Text Written Successfully!"
        );
        assert_eq!(
            TagStatus::WriteFailed.message(),
            "Error during Writing, Try Again!"
        );
    }
}
