use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::{any, take},
};

use crate::{
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{NdefPayload, TextPayload, TextPayloadFormat},
    record::NdefRecord,
};

pub mod stream {
    use winnow::{Bytes, Partial};

    pub type Stream<'i> = Partial<&'i Bytes>;

    pub fn new(bytes: &[u8]) -> Stream<'_> {
        Partial::new(Bytes::new(bytes))
    }
}

use stream::Stream;

/// Parse records until one carries the message end flag.
pub fn parse_ndef_message(input: &mut Stream<'_>) -> ModalResult<Vec<NdefRecord>> {
    let mut records = Vec::new();

    loop {
        let record = parse_ndef_record.parse_next(input)?;
        let message_end = record.header.message_end;
        records.push(record);

        if message_end {
            break;
        }
    }

    Ok(records)
}

pub fn parse_ndef_record(input: &mut Stream<'_>) -> ModalResult<NdefRecord> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, header.payload_length, &type_)?;

    Ok(NdefRecord {
        header,
        type_,
        id,
        payload,
    })
}

// private

fn parse_flag_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

pub(crate) fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_flag_byte(input)?;

    let type_length = winnow::binary::u8.parse_next(input)?;
    let type_name_format = NdefType::from_bits(type_name_format);

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(any.parse_next(input)?)
    } else {
        None
    };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format,
        type_length,
        payload_length,
        id_length,
    })
}

pub(crate) fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

pub(crate) fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    if let Some(id_len) = id_length {
        take(id_len as usize)
            .map(|s: &[u8]| Some(s.to_vec()))
            .parse_next(input)
    } else {
        Ok(None)
    }
}

pub(crate) fn parse_payload(
    input: &mut Stream<'_>,
    payload_length: u32,
    type_: &[u8],
) -> ModalResult<NdefPayload> {
    if type_ == crate::TEXT_RECORD_TYPE {
        // status byte: encoding selector, reserved bit, language code length
        let (is_utf16, _reserved, language_code_length): (bool, bool, u8) =
            bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bool, take_bits(6_u8)))
                .parse_next(input)?;

        let language_code = take(language_code_length as usize).parse_next(input)?;

        // payload must cover the status byte and the language code
        let remaining_length = payload_length
            .checked_sub(language_code_length as u32 + 1)
            .ok_or_else(|| ErrMode::Cut(ContextError::new()))?;

        let text = take(remaining_length as usize).parse_next(input)?;

        let parsed_text = if is_utf16 {
            String::from_utf16_lossy(
                &text
                    .chunks_exact(2)
                    .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                    .collect::<Vec<u16>>(),
            )
        } else {
            String::from_utf8_lossy(text).to_string()
        };

        let parsed_text = TextPayload {
            format: if is_utf16 {
                TextPayloadFormat::Utf16
            } else {
                TextPayloadFormat::Utf8
            },
            language: String::from_utf8_lossy(language_code).to_string(),
            text: parsed_text,
        };

        Ok(NdefPayload::Text(parsed_text))
    } else {
        take(payload_length as usize)
            .map(|s: &[u8]| NdefPayload::Data(s.to_vec()))
            .parse_next(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_stream(bytes: Vec<u8>) -> Stream<'static> {
        let bytes = Box::leak(bytes.into_boxed_slice());
        stream::new(bytes)
    }

    /// `D1 01 08 54` + text payload: single short text record, "hello" in "en"
    fn hello_record_bytes() -> Vec<u8> {
        vec![
            0xD1, 0x01, 0x08, 0x54, 0x02, b'e', b'n', b'h', b'e', b'l', b'l', b'o',
        ]
    }

    #[test]
    fn known_header_parse() {
        let mut header_bytes = owned_stream(vec![0xD1, 0x01, 0x0D, 0x55, 0x02]);
        let header: NdefHeader = parse_header(&mut header_bytes).unwrap();

        assert!(header.message_begin);
        assert!(header.message_end);
        assert!(!header.chunked);
        assert!(header.short_record);
        assert!(!header.has_id_length);
        assert_eq!(header.type_name_format, NdefType::WellKnown);
        assert_eq!(header.type_length, 1);
        assert_eq!(header.payload_length, 13);
    }

    #[test]
    fn parse_single_text_record() {
        let mut data = owned_stream(hello_record_bytes());
        let records = parse_ndef_message(&mut data).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].type_, b"T");

        let NdefPayload::Text(text) = &records[0].payload else {
            panic!("payload is not text")
        };

        assert_eq!(text.text, "hello");
        assert_eq!(text.language, "en");
        assert_eq!(text.format, TextPayloadFormat::Utf8);
    }

    #[test]
    fn status_byte_high_bit_selects_utf16() {
        // status 0x82: UTF-16, language code length 2; "hi" as big endian UTF-16
        let mut data = owned_stream(vec![
            0xD1, 0x01, 0x07, 0x54, 0x82, b'e', b'n', 0x00, b'h', 0x00, b'i',
        ]);

        let records = parse_ndef_message(&mut data).unwrap();
        let NdefPayload::Text(text) = &records[0].payload else {
            panic!("payload is not text")
        };

        assert_eq!(text.format, TextPayloadFormat::Utf16);
        assert_eq!(text.text, "hi");
    }

    #[test]
    fn language_code_length_is_low_six_bits() {
        // status 0x05: UTF-8, 5 byte language code "en-US"
        let mut data = owned_stream(vec![
            0xD1, 0x01, 0x08, 0x54, 0x05, b'e', b'n', b'-', b'U', b'S', b'h', b'i',
        ]);

        let records = parse_ndef_message(&mut data).unwrap();
        let NdefPayload::Text(text) = &records[0].payload else {
            panic!("payload is not text")
        };

        assert_eq!(text.language, "en-US");
        assert_eq!(text.text, "hi");
    }

    #[test]
    fn non_text_record_parses_as_data() {
        // well known URI record, payload is carried raw
        let mut data = owned_stream(vec![0xD1, 0x01, 0x03, 0x55, 0x04, b'h', b'i']);

        let records = parse_ndef_message(&mut data).unwrap();
        assert_eq!(records[0].type_, b"U");
        assert_eq!(
            records[0].payload,
            NdefPayload::Data(vec![0x04, b'h', b'i'])
        );
    }

    #[test]
    fn records_parse_until_message_end() {
        // first record MB set, second record ME set
        let mut message = vec![0x91, 0x01, 0x03, 0x55, 0x04, b'h', b'i'];
        message.extend_from_slice(&[0x51, 0x01, 0x05, 0x54, 0x02, b'e', b'n', b'h', b'i']);

        let mut data = owned_stream(message);
        let records = parse_ndef_message(&mut data).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].header.message_begin);
        assert!(!records[0].header.message_end);
        assert!(records[1].header.message_end);
    }

    #[test]
    fn truncated_record_is_incomplete() {
        let full = hello_record_bytes();
        let mut data = owned_stream(full[..6].to_vec());

        let result = parse_ndef_message(&mut data);
        assert!(matches!(result, Err(ErrMode::Incomplete(_))));
    }

    #[test]
    fn payload_shorter_than_language_code_is_an_error() {
        // status byte claims a 10 byte language code but payload length is 3
        let mut data = owned_stream(vec![
            0xD1, 0x01, 0x03, 0x54, 0x0A, b'e', b'n', b'x', b'x', b'x', b'x', b'x', b'x', b'x',
            b'x',
        ]);

        let result = parse_ndef_message(&mut data);
        assert!(matches!(result, Err(ErrMode::Cut(_))));
    }
}
