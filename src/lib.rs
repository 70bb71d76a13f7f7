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

//! Wire codec for a single message of a log/queue protocol.
//!
//! A [`Message`] is framed by a CRC-32 checksum, carries a format-version
//! byte, an attribute byte with the compression codec, a nullable key and a
//! value that is gzip-compressed on the wire when the codec asks for it.
//! [`PacketEncoder`] and [`PacketDecoder`] are the encoding context the codec
//! writes to and reads from.

pub mod message;
pub mod protocol;
pub mod service;

pub use message::{CompressionCodec, Message};
pub use protocol::{Crc32Field, PacketDecoder, PacketEncoder};
pub use service::{
    global_config, setup_local_tracing, setup_local_tracing_with, AppError, AppResult,
    CodecConfig, GLOBAL_CONFIG,
};
