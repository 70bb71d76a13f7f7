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

use bytes::{BufMut, Bytes, BytesMut};

use crate::protocol::{Crc32Field, NULL_LENGTH};
use crate::{AppError, AppResult};

///
/// Implement the fixed-width put methods. Every put checks the capacity
/// limit first, so a failed put leaves the buffer untouched.
///
macro_rules! implement_put {
    ($name:ident, $inner_type:ty, $write_method:ident, $size:expr) => {
        pub fn $name(&mut self, value: $inner_type) -> AppResult<()> {
            self.ensure_capacity($size)?;
            self.buffer.$write_method(value);
            Ok(())
        }
    };
}

/// Writes protocol primitives into a growable buffer.
///
/// Fields whose value depends on bytes written later (a checksum) are handled
/// with push regions: `push` reserves the field, `pop` fills it in once the
/// enclosed bytes are known. Regions nest and are closed in LIFO order.
#[derive(Debug)]
pub struct PacketEncoder {
    buffer: BytesMut,
    capacity_limit: usize,
    stack: Vec<Crc32Field>,
}

impl Default for PacketEncoder {
    fn default() -> Self {
        PacketEncoder::new()
    }
}

impl PacketEncoder {
    /// An encoder without a capacity limit.
    pub fn new() -> Self {
        PacketEncoder::with_capacity_limit(usize::MAX)
    }

    /// An encoder that refuses to grow past `limit` bytes.
    pub fn with_capacity_limit(limit: usize) -> Self {
        PacketEncoder {
            buffer: BytesMut::new(),
            capacity_limit: limit,
            stack: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity_limit.saturating_sub(self.buffer.len())
    }

    fn ensure_capacity(&self, needed: usize) -> AppResult<()> {
        let remaining = self.remaining_capacity();
        if needed > remaining {
            return Err(AppError::BufferExhausted { needed, remaining });
        }
        Ok(())
    }

    implement_put!(put_i8, i8, put_i8, 1);
    implement_put!(put_i32, i32, put_i32, 4);

    /// Writes a length-prefixed byte field, `None` is written as length -1.
    pub fn put_bytes(&mut self, value: Option<&[u8]>) -> AppResult<()> {
        match value {
            Some(value) => {
                let length = i32::try_from(value.len()).map_err(|_| {
                    AppError::MalformedProtocol(format!(
                        "byte field of {} bytes does not fit an i32 length",
                        value.len()
                    ))
                })?;
                self.ensure_capacity(4 + value.len())?;
                self.buffer.put_i32(length);
                self.buffer.put_slice(value);
            }
            None => self.put_i32(NULL_LENGTH)?,
        }
        Ok(())
    }

    /// Writes bytes without a length prefix.
    pub fn put_raw_bytes(&mut self, value: &[u8]) -> AppResult<()> {
        self.ensure_capacity(value.len())?;
        self.buffer.put_slice(value);
        Ok(())
    }

    /// Reserves space for `field` at the current position.
    pub fn push(&mut self, mut field: Crc32Field) -> AppResult<()> {
        self.ensure_capacity(Crc32Field::WIDTH)?;
        field.save_offset(self.buffer.len());
        self.buffer.put_bytes(0, Crc32Field::WIDTH);
        self.stack.push(field);
        Ok(())
    }

    /// Closes the innermost region and backfills its field.
    pub fn pop(&mut self) -> AppResult<()> {
        let field = self.stack.pop().ok_or_else(|| {
            AppError::IllegalState("pop called without a pending push region".to_string())
        })?;
        field.run(self.buffer.as_mut());
        Ok(())
    }

    /// Returns the encoded bytes. All regions must have been popped.
    pub fn finish(self) -> AppResult<Bytes> {
        if !self.stack.is_empty() {
            return Err(AppError::IllegalState(format!(
                "{} push region(s) still open",
                self.stack.len()
            )));
        }
        Ok(self.buffer.freeze())
    }
}
