use tagnote_macros::impl_default_for;

use crate::{NdefError, payload::TextPayload, record::NdefRecord, writer};

impl_default_for!(FfiNdefCodec);

/// Stateless codec handle for the frontend.
#[derive(Debug, Clone, uniffi::Object)]
pub struct FfiNdefCodec;

#[uniffi::export]
impl FfiNdefCodec {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self
    }

    /// Decode a scanned buffer, bare message or Type 2 dump.
    #[uniffi::method]
    pub fn decode(&self, data: Vec<u8>) -> Result<Vec<NdefRecord>, NdefError> {
        crate::decode(&data)
    }

    #[uniffi::method]
    pub fn first_text(&self, records: Vec<NdefRecord>) -> Option<TextPayload> {
        crate::first_text(&records)
    }

    /// Encode a string as a bare single record text message.
    #[uniffi::method]
    pub fn encode_text(&self, text: String, language: String) -> Result<Vec<u8>, NdefError> {
        writer::encode_text_message(&text, &language)
    }

    /// Frame a message for the data area of a Type 2 tag.
    #[uniffi::method]
    pub fn wrap_type2_frame(&self, message: Vec<u8>) -> Result<Vec<u8>, NdefError> {
        writer::wrap_tlv(&message)
    }
}
