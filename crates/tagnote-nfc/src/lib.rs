use tracing::debug;
use winnow::error::ErrMode;

uniffi::setup_scaffolding!();

pub mod ffi;
pub mod header;
pub mod message_info;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;
pub mod writer;

pub use header::NdefHeader;
pub use payload::{NdefPayload, TextPayload, TextPayloadFormat};
pub use record::NdefRecord;

/// Tag of the NDEF message TLV on a Type 2 tag
pub const NDEF_MESSAGE_TLV: u8 = 0x03;

/// Capability container magic bytes, the first byte of a Type 2 dump
/// (E1h for the static layout, E2h for the extended one)
pub const TYPE2_CC_MAGIC: [u8; 2] = [0xE1, 0xE2];

/// Terminator TLV closing out the tag data area
pub const TERMINATOR_TLV: u8 = 0xFE;

/// Well known record type of a text record
pub const TEXT_RECORD_TYPE: &[u8] = b"T";

/// A language code lives in the low 6 bits of the status byte
pub const MAX_LANGUAGE_CODE_LENGTH: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NdefError {
    #[error("error parsing the NDEF message: {0}")]
    Parse(String),

    #[error("not enough data for a complete NDEF message")]
    Incomplete,

    #[error("no NDEF message TLV found in tag dump")]
    MessageTlvNotFound,

    #[error("language code is {0} bytes, max is 63")]
    LanguageCodeTooLong(u64),

    #[error("message is too long for the TLV length field")]
    MessageTooLong,
}

/// Decode a scanned buffer into NDEF records.
///
/// Accepts either bare NDEF message bytes, as delivered by a platform
/// intent, or a Type 2 TLV framed dump read block wise from a chip. A dump
/// starts with the capability container magic or, with the container
/// stripped, the message TLV itself; a well formed bare message starts
/// with a record that has the message begin flag set. Anything else is
/// handed to the TLV scan, since a buffer whose first byte lacks the
/// message begin flag cannot be a valid bare message.
pub fn decode(data: &[u8]) -> Result<Vec<NdefRecord>, NdefError> {
    debug!("decoding {} bytes: {}", data.len(), hex::encode(data));

    let message = match data.first() {
        None => return Err(NdefError::Incomplete),
        Some(magic) if TYPE2_CC_MAGIC.contains(magic) => tlv_message_bytes(data)?,
        Some(first) if first & 0b1000_0000 != 0 => data,
        Some(_) => tlv_message_bytes(data)?,
    };

    let mut stream = parser::stream::new(message);
    match parser::parse_ndef_message(&mut stream) {
        Ok(records) => Ok(records),
        Err(ErrMode::Incomplete(_)) => Err(NdefError::Incomplete),
        Err(error) => Err(NdefError::Parse(error.to_string())),
    }
}

/// The first text payload of a message, the one the screen displays.
pub fn first_text(records: &[NdefRecord]) -> Option<TextPayload> {
    records.iter().find_map(|record| match &record.payload {
        NdefPayload::Text(text) => Some(text.clone()),
        NdefPayload::Data(_) => None,
    })
}

/// Slice the NDEF message out of a Type 2 tag dump: skip to the message
/// TLV, then read the one byte or 0xFF + u16 length field.
fn tlv_message_bytes(data: &[u8]) -> Result<&[u8], NdefError> {
    let tlv_start = data
        .iter()
        .position(|&byte| byte == NDEF_MESSAGE_TLV)
        .ok_or(NdefError::MessageTlvNotFound)?;

    let rest = &data[tlv_start + 1..];
    let (length, length_field) = match *rest {
        [0xFF, high, low, ..] => (u16::from_be_bytes([high, low]) as usize, 3),
        [length, ..] => (length as usize, 1),
        [] => return Err(NdefError::Incomplete),
    };

    rest.get(length_field..length_field + length)
        .ok_or(NdefError::Incomplete)
}
