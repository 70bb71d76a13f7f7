// Copyright 2025 jonefeewang@gmail.com
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A single format-0 message: CRC-32 framed, with a nullable key and a value
//! that is transparently compressed according to the attribute byte.

use bytes::Bytes;
use tracing::{trace, warn};

use crate::message::compression::CompressionCodec;
use crate::message::constants::{MAGIC, MESSAGE_OVERHEAD};
use crate::protocol::{Crc32Field, PacketDecoder, PacketEncoder};
use crate::{AppError, AppResult};

/// One record of the log. Always holds the decompressed value; the wire form
/// is produced by `encode` and read back by `decode`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub codec: CompressionCodec,
    pub key: Option<Bytes>,
    pub value: Option<Bytes>,
}

impl Message {
    pub fn new(codec: CompressionCodec, key: Option<Bytes>, value: Option<Bytes>) -> Self {
        Message { codec, key, value }
    }

    /// Writes the message into `encoder`.
    ///
    /// The value is transformed before anything is written, so a codec error
    /// leaves the encoder untouched. Write errors from the encoder are returned
    /// as is.
    pub fn encode(&self, encoder: &mut PacketEncoder) -> AppResult<()> {
        let wire_value = self.codec.compress(self.value.as_ref())?;

        encoder.push(Crc32Field::new())?;
        encoder.put_i8(MAGIC)?;
        encoder.put_i8(self.codec.attributes())?;
        encoder.put_bytes(self.key.as_deref())?;
        encoder.put_bytes(wire_value.as_deref())?;
        encoder.pop()?;

        trace!(
            "encoded {} message, key: {:?} bytes, wire value: {:?} bytes",
            self.codec,
            self.key.as_ref().map(Bytes::len),
            wire_value.as_ref().map(Bytes::len)
        );
        Ok(())
    }

    /// Reads one message from `decoder`.
    ///
    /// Only the format version is looked at before the checksum has been
    /// verified; the codec and the value are interpreted afterwards, so a
    /// corrupted message is reported as `ChecksumMismatch`. `UnsupportedFormat`
    /// is therefore only reported for a message whose checksum is valid, or
    /// whose fields cannot be read at all.
    ///
    /// On error the decoder's region stack is left as it was before the call.
    pub fn decode(decoder: &mut PacketDecoder) -> AppResult<Message> {
        let depth = decoder.region_depth();
        let result = Message::decode_framed(decoder);
        if result.is_err() {
            decoder.truncate_regions(depth);
        }
        result
    }

    fn decode_framed(decoder: &mut PacketDecoder) -> AppResult<Message> {
        decoder.push(Crc32Field::new())?;
        let magic = decoder.get_i8()?;
        let attributes = decoder.get_i8()?;

        let fields = decoder
            .get_bytes()
            .and_then(|key| Ok((key, decoder.get_bytes()?)));
        let (key, wire_value) = match fields {
            Ok(fields) => fields,
            // an unknown format may lay out its fields differently
            Err(_) if magic != MAGIC => return Err(AppError::UnsupportedFormat(magic)),
            Err(e) => return Err(e),
        };

        decoder.pop()?;

        if magic != MAGIC {
            warn!("unsupported message format version {}", magic);
            return Err(AppError::UnsupportedFormat(magic));
        }
        let codec = CompressionCodec::from_attributes(attributes)?;
        let value = codec.decompress(wire_value)?;

        trace!(
            "decoded {} message, key: {:?} bytes, value: {:?} bytes",
            codec,
            key.as_ref().map(Bytes::len),
            value.as_ref().map(Bytes::len)
        );
        Ok(Message { codec, key, value })
    }

    /// Encodes the message into a fresh buffer.
    pub fn to_bytes(&self) -> AppResult<Bytes> {
        let mut encoder = PacketEncoder::new();
        self.encode(&mut encoder)?;
        encoder.finish()
    }

    /// Decodes a buffer holding exactly one message.
    pub fn from_bytes(raw: Bytes) -> AppResult<Message> {
        let mut decoder = PacketDecoder::new(raw);
        let message = Message::decode(&mut decoder)?;
        if decoder.remaining() > 0 {
            return Err(AppError::MalformedProtocol(format!(
                "{} trailing bytes after message",
                decoder.remaining()
            )));
        }
        Ok(message)
    }

    /// Wire size of the message with its value stored as is. Exact for
    /// `CompressionCodec::None`; a gzip value may end up smaller or larger.
    pub fn uncompressed_size(&self) -> usize {
        MESSAGE_OVERHEAD
            + self.key.as_ref().map_or(0, Bytes::len)
            + self.value.as_ref().map_or(0, Bytes::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::constants::{ATTRIBUTES_OFFSET, CRC_LENGTH, KEY_OFFSET, MAGIC_OFFSET};

    /// Recomputes the checksum after the test tampered with the body.
    fn reseal(raw: &mut [u8]) {
        let crc = crc32fast::hash(&raw[CRC_LENGTH..]);
        raw[..CRC_LENGTH].copy_from_slice(&crc.to_be_bytes());
    }

    #[test]
    fn test_encode_layout() {
        let message = Message::new(
            CompressionCodec::None,
            Some(Bytes::from_static(b"k")),
            Some(Bytes::from_static(b"vv")),
        );
        let raw = message.to_bytes().unwrap();

        let mut expected = vec![MAGIC as u8, 0x00, 0, 0, 0, 1, b'k', 0, 0, 0, 2, b'v', b'v'];
        let crc = crc32fast::hash(&expected);
        let mut framed = crc.to_be_bytes().to_vec();
        framed.append(&mut expected);

        assert_eq!(raw.as_ref(), framed.as_slice());
        assert_eq!(raw.len(), message.uncompressed_size());
        assert_eq!(raw[KEY_OFFSET], b'k');
    }

    #[test]
    fn test_null_fields_layout() {
        let message = Message::default();
        let raw = message.to_bytes().unwrap();

        assert_eq!(raw.len(), MESSAGE_OVERHEAD);
        assert_eq!(&raw[6..10], &[0xff; 4]);
        assert_eq!(&raw[10..14], &[0xff; 4]);
        assert_eq!(Message::from_bytes(raw).unwrap(), message);
    }

    #[test]
    fn test_reserved_attribute_bits_ignored() {
        let message = Message::new(
            CompressionCodec::Gzip,
            None,
            Some(Bytes::from_static(b"payload")),
        );
        let mut raw = message.to_bytes().unwrap().to_vec();
        assert_eq!(raw[ATTRIBUTES_OFFSET], 0x01);

        raw[ATTRIBUTES_OFFSET] = 0x09;
        reseal(&mut raw);
        let decoded = Message::from_bytes(Bytes::from(raw)).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_unsupported_format() {
        let mut raw = Message::default().to_bytes().unwrap().to_vec();
        raw[MAGIC_OFFSET] = 1;
        reseal(&mut raw);
        assert!(matches!(
            Message::from_bytes(Bytes::from(raw)),
            Err(AppError::UnsupportedFormat(1))
        ));
    }

    #[test]
    fn test_format_change_without_reseal_is_checksum_error() {
        let mut raw = Message::default().to_bytes().unwrap().to_vec();
        raw[MAGIC_OFFSET] = 1;
        assert!(matches!(
            Message::from_bytes(Bytes::from(raw)),
            Err(AppError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_uncompressed_size_is_not_a_bound_for_gzip() {
        let message = Message::new(CompressionCodec::Gzip, None, Some(Bytes::from_static(b"v")));
        // gzip header and trailer outweigh a one byte value
        assert!(message.to_bytes().unwrap().len() > message.uncompressed_size());
    }

    #[test]
    fn test_unsupported_format_with_unreadable_fields() {
        let mut raw = vec![0u8; CRC_LENGTH];
        raw.extend_from_slice(&[2, 0, 0x7f]);
        reseal(&mut raw);
        assert!(matches!(
            Message::from_bytes(Bytes::from(raw)),
            Err(AppError::UnsupportedFormat(2))
        ));
    }

    #[test]
    fn test_encode_failure_leaves_encoder_untouched() {
        let message = Message::new(
            CompressionCodec::Snappy,
            None,
            Some(Bytes::from_static(b"v")),
        );
        let mut encoder = PacketEncoder::new();
        assert!(matches!(
            message.encode(&mut encoder),
            Err(AppError::UnsupportedCodec(CompressionCodec::Snappy))
        ));
        assert!(encoder.is_empty());
    }

    #[test]
    fn test_failed_decode_leaves_no_open_region() {
        let raw = Message::new(CompressionCodec::None, None, Some(Bytes::from_static(b"v")))
            .to_bytes()
            .unwrap();

        // truncated inside the value
        let mut decoder = PacketDecoder::new(raw.slice(..raw.len() - 1));
        assert!(Message::decode(&mut decoder).is_err());
        assert_eq!(decoder.region_depth(), 0);

        // checksum failure
        let mut corrupted = raw.to_vec();
        corrupted[MAGIC_OFFSET + 1] ^= 0x40;
        let mut decoder = PacketDecoder::new(Bytes::from(corrupted));
        assert!(matches!(
            Message::decode(&mut decoder),
            Err(AppError::ChecksumMismatch { .. })
        ));
        assert_eq!(decoder.region_depth(), 0);
    }

    #[test]
    fn test_trailing_bytes() {
        let mut raw = Message::default().to_bytes().unwrap().to_vec();
        raw.push(0);
        assert!(matches!(
            Message::from_bytes(Bytes::from(raw)),
            Err(AppError::MalformedProtocol(_))
        ));
    }

    #[test]
    fn test_consecutive_messages_share_decoder() {
        let first = Message::new(CompressionCodec::None, None, Some(Bytes::from_static(b"a")));
        let second = Message::new(
            CompressionCodec::Gzip,
            Some(Bytes::from_static(b"k")),
            Some(Bytes::from_static(b"b")),
        );
        let mut encoder = PacketEncoder::new();
        first.encode(&mut encoder).unwrap();
        second.encode(&mut encoder).unwrap();

        let mut decoder = PacketDecoder::new(encoder.finish().unwrap());
        assert_eq!(Message::decode(&mut decoder).unwrap(), first);
        assert_eq!(Message::decode(&mut decoder).unwrap(), second);
        assert_eq!(decoder.remaining(), 0);
    }
}
