use crate::ndef_type::NdefType;

/// The leading bytes of an NDEF record: flag byte, type length, payload
/// length (one byte in short record form, four otherwise) and an optional
/// id length.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: NdefType,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    /// Pack the five flag bits and the TNF back into the record's first byte.
    pub fn flag_byte(&self) -> u8 {
        let mut byte = self.type_name_format.to_bits();

        if self.message_begin {
            byte |= 0b1000_0000;
        }
        if self.message_end {
            byte |= 0b0100_0000;
        }
        if self.chunked {
            byte |= 0b0010_0000;
        }
        if self.short_record {
            byte |= 0b0001_0000;
        }
        if self.has_id_length {
            byte |= 0b0000_1000;
        }

        byte
    }
}
