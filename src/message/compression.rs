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

use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

use bytes::Bytes;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::trace;

use crate::message::constants::COMPRESSION_CODEC_MASK;
use crate::{AppError, AppResult};

/// Compression applied to a message value.
///
/// The numeric value is the codec id stored in the low three bits of the
/// attribute byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionCodec {
    #[default]
    None,
    Gzip,
    Snappy,
}

impl CompressionCodec {
    /// Extracts the codec from an attribute byte, ignoring the reserved bits.
    pub fn from_attributes(attributes: i8) -> AppResult<Self> {
        CompressionCodec::try_from(attributes & COMPRESSION_CODEC_MASK)
    }

    /// The attribute byte carrying this codec, reserved bits zeroed.
    pub fn attributes(self) -> i8 {
        i8::from(self) & COMPRESSION_CODEC_MASK
    }

    /// Turns an in-memory value into the bytes written on the wire.
    ///
    /// A gzip message must carry a value; a null one is refused here rather
    /// than producing a message that can never be decoded.
    pub fn compress(self, value: Option<&Bytes>) -> AppResult<Option<Bytes>> {
        match self {
            CompressionCodec::None => Ok(value.cloned()),
            CompressionCodec::Gzip => {
                let value = value.ok_or_else(|| {
                    AppError::MalformedMessage("gzip codec requires a non-null value".to_string())
                })?;
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(value).map_err(AppError::Compression)?;
                let compressed = encoder.finish().map_err(AppError::Compression)?;
                trace!(
                    "gzip compressed value from {} to {} bytes",
                    value.len(),
                    compressed.len()
                );
                Ok(Some(Bytes::from(compressed)))
            }
            CompressionCodec::Snappy => Err(AppError::UnsupportedCodec(self)),
        }
    }

    /// Turns wire bytes back into the in-memory value.
    pub fn decompress(self, wire_value: Option<Bytes>) -> AppResult<Option<Bytes>> {
        match self {
            CompressionCodec::None => Ok(wire_value),
            CompressionCodec::Gzip => {
                let wire_value = wire_value.ok_or_else(|| {
                    AppError::MalformedMessage("gzip message has a null value".to_string())
                })?;
                // every member of a concatenated stream belongs to the value
                let mut decoder = MultiGzDecoder::new(wire_value.as_ref());
                let mut decompressed = Vec::with_capacity(wire_value.len());
                decoder
                    .read_to_end(&mut decompressed)
                    .map_err(AppError::Compression)?;
                trace!(
                    "gzip decompressed value from {} to {} bytes",
                    wire_value.len(),
                    decompressed.len()
                );
                Ok(Some(Bytes::from(decompressed)))
            }
            CompressionCodec::Snappy => Err(AppError::UnsupportedCodec(self)),
        }
    }
}

impl TryFrom<i8> for CompressionCodec {
    type Error = AppError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CompressionCodec::None),
            1 => Ok(CompressionCodec::Gzip),
            2 => Ok(CompressionCodec::Snappy),
            invalid => Err(AppError::UnknownCodec(invalid)),
        }
    }
}

impl From<CompressionCodec> for i8 {
    fn from(value: CompressionCodec) -> Self {
        match value {
            CompressionCodec::None => 0,
            CompressionCodec::Gzip => 1,
            CompressionCodec::Snappy => 2,
        }
    }
}

impl Display for CompressionCodec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CompressionCodec::None => "none",
            CompressionCodec::Gzip => "gzip",
            CompressionCodec::Snappy => "snappy",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for CompressionCodec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CompressionCodec::None),
            "gzip" => Ok(CompressionCodec::Gzip),
            "snappy" => Ok(CompressionCodec::Snappy),
            other => Err(AppError::InvalidValue(format!(
                "compression codec: {}",
                other
            ))),
        }
    }
}
