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

//! Message Format Constants
//!
//! Offsets and lengths of the fixed part of a format-0 message, plus the
//! special values used by the codec.
//!
//! # Message Format
//!
//! - CRC (4 bytes), CRC-32 over every following field
//! - Magic / format version (1 byte)
//! - Attributes (1 byte), bits 0-2 hold the compression codec
//! - Key length (4 bytes, -1 for a null key)
//! - Key (variable length)
//! - Value length (4 bytes, -1 for a null value)
//! - Value (variable length, compressed according to the codec)

// Message field offsets and lengths
pub const CRC_OFFSET: usize = 0;
pub const CRC_LENGTH: usize = 4;
pub const MAGIC_OFFSET: usize = CRC_OFFSET + CRC_LENGTH;
pub const MAGIC_LENGTH: usize = 1;
pub const ATTRIBUTES_OFFSET: usize = MAGIC_OFFSET + MAGIC_LENGTH;
pub const ATTRIBUTES_LENGTH: usize = 1;
pub const KEY_SIZE_OFFSET: usize = ATTRIBUTES_OFFSET + ATTRIBUTES_LENGTH;
pub const KEY_SIZE_LENGTH: usize = 4;
pub const KEY_OFFSET: usize = KEY_SIZE_OFFSET + KEY_SIZE_LENGTH;
pub const VALUE_SIZE_LENGTH: usize = 4;

/// Bytes a message occupies besides its key and value.
pub const MESSAGE_OVERHEAD: usize =
    CRC_LENGTH + MAGIC_LENGTH + ATTRIBUTES_LENGTH + KEY_SIZE_LENGTH + VALUE_SIZE_LENGTH;

// Special values and defaults

/// The only message format version this codec understands
pub const MAGIC: i8 = 0;
/// Attribute bits holding the compression codec id
pub const COMPRESSION_CODEC_MASK: i8 = 0x07;
