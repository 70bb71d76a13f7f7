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

//! Encoding context for the message codec.
//!
//! `PacketEncoder` and `PacketDecoder` provide big-endian fixed-width
//! integers, nullable length-prefixed byte fields and a stack of push regions
//! for fields (the CRC-32 checksum) that cover bytes written after them.

pub use crc32_field::Crc32Field;
pub use packet_decoder::PacketDecoder;
pub use packet_encoder::PacketEncoder;

/// Length prefix written for a null byte field.
pub const NULL_LENGTH: i32 = -1;

mod crc32_field;
mod packet_decoder;
mod packet_encoder;
