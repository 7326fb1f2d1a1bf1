//! Send updates from rust to the frontend

use tagnote_nfc::payload::TextPayload;

use crate::app::TagStatus;

#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum AppReconcileMessage {
    /// A tag was read, the screen shows its text
    TagContentsChanged(TextPayload),

    /// Outcome of a write attempt, shown as a toast
    StatusChanged(TagStatus),

    /// The platform should enable or disable foreground dispatch
    ForegroundDispatchChanged(bool),
}

#[uniffi::export(callback_interface)]
pub trait FfiReconcile: Send + Sync + 'static {
    /// Essentially a callback to the frontend
    fn reconcile(&self, message: AppReconcileMessage);
}
