//! Serialize NDEF records for writing back to a tag.

use crate::{
    MAX_LANGUAGE_CODE_LENGTH, NDEF_MESSAGE_TLV, NdefError, TERMINATOR_TLV, TEXT_RECORD_TYPE,
    header::NdefHeader,
    message_info::MessageInfo,
    ndef_type::NdefType,
    payload::{NdefPayload, TextPayload, TextPayloadFormat},
    record::NdefRecord,
};

/// Build the payload of a well known text record: status byte, language
/// code, then the text itself.
pub fn text_record_payload(
    text: &str,
    language: &str,
    format: TextPayloadFormat,
) -> Result<Vec<u8>, NdefError> {
    let language = language.as_bytes();
    if language.len() > MAX_LANGUAGE_CODE_LENGTH {
        return Err(NdefError::LanguageCodeTooLong(language.len() as u64));
    }

    let text_bytes: Vec<u8> = match format {
        TextPayloadFormat::Utf8 => text.as_bytes().to_vec(),
        TextPayloadFormat::Utf16 => text
            .encode_utf16()
            .flat_map(|unit| unit.to_be_bytes())
            .collect(),
    };

    let mut status = language.len() as u8;
    if format == TextPayloadFormat::Utf16 {
        status |= 0b1000_0000;
    }

    let mut payload = Vec::with_capacity(1 + language.len() + text_bytes.len());
    payload.push(status);
    payload.extend_from_slice(language);
    payload.extend_from_slice(&text_bytes);

    Ok(payload)
}

/// Build a complete single record text message as an [`NdefRecord`].
pub fn text_record(text: &str, language: &str) -> Result<NdefRecord, NdefError> {
    let payload = text_record_payload(text, language, TextPayloadFormat::Utf8)?;

    let header = NdefHeader {
        message_begin: true,
        message_end: true,
        chunked: false,
        short_record: payload.len() <= u8::MAX as usize,
        has_id_length: false,
        type_name_format: NdefType::WellKnown,
        type_length: TEXT_RECORD_TYPE.len() as u8,
        payload_length: payload.len() as u32,
        id_length: None,
    };

    Ok(NdefRecord {
        header,
        type_: TEXT_RECORD_TYPE.to_vec(),
        id: None,
        payload: NdefPayload::Text(TextPayload {
            format: TextPayloadFormat::Utf8,
            language: language.to_string(),
            text: text.to_string(),
        }),
    })
}

/// Serialize one record, header included.
pub fn encode_record(record: &NdefRecord) -> Result<Vec<u8>, NdefError> {
    let payload = match &record.payload {
        NdefPayload::Text(text) => text_record_payload(&text.text, &text.language, text.format)?,
        NdefPayload::Data(data) => data.clone(),
    };

    let header = &record.header;

    let mut out = Vec::with_capacity(payload.len() + 8);
    out.push(header.flag_byte());
    out.push(header.type_length);

    if header.short_record {
        out.push(payload.len() as u8);
    } else {
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    }

    if let Some(id_length) = header.id_length {
        out.push(id_length);
    }

    out.extend_from_slice(&record.type_);
    if let Some(id) = &record.id {
        out.extend_from_slice(id);
    }
    out.extend_from_slice(&payload);

    Ok(out)
}

/// Encode a string as a bare single record NDEF text message, the byte
/// form the platform builds its NdefMessage from.
pub fn encode_text_message(text: &str, language: &str) -> Result<Vec<u8>, NdefError> {
    encode_record(&text_record(text, language)?)
}

/// Frame a message for the data area of a Type 2 tag.
pub fn wrap_tlv(message: &[u8]) -> Result<Vec<u8>, NdefError> {
    if message.len() > u16::MAX as usize {
        return Err(NdefError::MessageTooLong);
    }

    let info = MessageInfo::new(message.len() as u16);
    let mut out = Vec::with_capacity(info.frame_length as usize);

    out.push(NDEF_MESSAGE_TLV);
    if message.len() < 255 {
        out.push(message.len() as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(message.len() as u16).to_be_bytes());
    }

    out.extend_from_slice(message);
    out.push(TERMINATOR_TLV);

    Ok(out)
}
