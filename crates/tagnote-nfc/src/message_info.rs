#[derive(Debug, PartialEq, Eq, Clone, Copy, uniffi::Record)]
pub struct MessageInfo {
    /// Length of the NDEF message inside the TLV
    pub message_length: u16,

    /// Full frame length: TLV tag, length field, message and terminator
    pub frame_length: u32,
}

impl MessageInfo {
    pub fn new(message_length: u16) -> Self {
        Self {
            message_length,
            frame_length: total_with_frame(message_length),
        }
    }
}

fn total_with_frame(message_length: u16) -> u32 {
    // one length byte covers 0..=254, above that a 0xFF marker plus a u16
    let length_field = if message_length < 255 { 1 } else { 3 };

    // tag byte + length field + message + terminator TLV
    1 + length_field + message_length as u32 + 1
}
