//! Tag I/O seam between the app and the platform NFC stack.

/// A writable NDEF tag, implemented by the platform on top of its tag
/// technology handle (CoreNFC session or android.nfc.tech.Ndef).
#[uniffi::export(callback_interface)]
pub trait NdefTag: Send + Sync + std::fmt::Debug + 'static {
    fn connect(&self) -> Result<(), TagError>;
    fn write_message(&self, message: Vec<u8>) -> Result<(), TagError>;
    fn close(&self) -> Result<(), TagError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum TagError {
    #[error("could not connect to tag: {0}")]
    Connect(String),

    #[error("could not write to tag: {0}")]
    Write(String),

    #[error("could not close tag connection: {0}")]
    Close(String),

    #[error("unexpected error from tag callback: {0}")]
    Unexpected(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for TagError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Unexpected(error.reason)
    }
}

/// Connect, write and close as one synchronous call. The connection is
/// closed even when the write fails, a failed close on its own is also a
/// write failure.
pub fn write_to_tag(tag: &dyn NdefTag, message: Vec<u8>) -> Result<(), TagError> {
    tag.connect()?;
    let written = tag.write_message(message);
    let closed = tag.close();

    written?;
    closed
}
