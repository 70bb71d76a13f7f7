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

use crate::message::CompressionCodec;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// primitive read/write errors
    #[error("truncated input: need {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    #[error("buffer exhausted: need {needed} bytes, {remaining} remaining")]
    BufferExhausted { needed: usize, remaining: usize },

    #[error("malformed protocol: {0}")]
    MalformedProtocol(String),

    #[error("illegal state: {0}")]
    IllegalState(String),

    /// message format errors
    #[error("checksum mismatch: stored {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("unsupported message format version: {0}")]
    UnsupportedFormat(i8),

    #[error("unknown compression codec id: {0}")]
    UnknownCodec(i8),

    #[error("unsupported compression codec: {0}")]
    UnsupportedCodec(CompressionCodec),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("compression error: {0}")]
    Compression(#[source] std::io::Error),

    /// general errors
    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("config file error: {0}")]
    ConfigFileError(#[from] config::ConfigError),
}
