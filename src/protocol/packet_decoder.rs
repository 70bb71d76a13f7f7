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

use bytes::Bytes;

use crate::protocol::{Crc32Field, NULL_LENGTH};
use crate::{AppError, AppResult};

///
/// Implement the fixed-width get methods on top of `take`.
///
macro_rules! implement_get {
    ($name:ident, $inner_type:ty, $size:expr) => {
        pub fn $name(&mut self) -> AppResult<$inner_type> {
            let mut raw = [0u8; $size];
            raw.copy_from_slice(self.take($size)?);
            Ok(<$inner_type>::from_be_bytes(raw))
        }
    };
}

/// Reads protocol primitives from a received buffer.
///
/// Byte fields are returned as slices of the input `Bytes`, no copy is made.
/// A pushed `Crc32Field` remembers where its region starts; the matching
/// `pop` recomputes the checksum over everything read since.
#[derive(Debug)]
pub struct PacketDecoder {
    raw: Bytes,
    offset: usize,
    stack: Vec<Crc32Field>,
}

impl PacketDecoder {
    pub fn new(raw: Bytes) -> Self {
        PacketDecoder {
            raw,
            offset: 0,
            stack: Vec::new(),
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.raw.len() - self.offset
    }

    fn take(&mut self, needed: usize) -> AppResult<&[u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(AppError::TruncatedInput { needed, remaining });
        }
        let start = self.offset;
        self.offset += needed;
        Ok(&self.raw[start..self.offset])
    }

    implement_get!(get_i8, i8, 1);
    implement_get!(get_i32, i32, 4);

    /// Reads a length-prefixed byte field, length -1 is `None`.
    pub fn get_bytes(&mut self) -> AppResult<Option<Bytes>> {
        let length = self.get_i32()?;
        match length {
            NULL_LENGTH => Ok(None),
            length if length < NULL_LENGTH => Err(AppError::MalformedProtocol(format!(
                "invalid byte field length {}",
                length
            ))),
            length => self.get_raw_bytes(length as usize).map(Some),
        }
    }

    /// Reads exactly `length` bytes without a length prefix.
    pub fn get_raw_bytes(&mut self, length: usize) -> AppResult<Bytes> {
        let remaining = self.remaining();
        if length > remaining {
            return Err(AppError::TruncatedInput {
                needed: length,
                remaining,
            });
        }
        let start = self.offset;
        self.offset += length;
        Ok(self.raw.slice(start..self.offset))
    }

    /// Number of regions pushed and not yet popped.
    pub fn region_depth(&self) -> usize {
        self.stack.len()
    }

    /// Drops regions opened past `depth`, used when a read is abandoned
    /// half way through.
    pub fn truncate_regions(&mut self, depth: usize) {
        self.stack.truncate(depth);
    }

    /// Opens a region at the current position, consuming the stored field.
    pub fn push(&mut self, mut field: Crc32Field) -> AppResult<()> {
        field.save_offset(self.offset);
        self.take(Crc32Field::WIDTH)?;
        self.stack.push(field);
        Ok(())
    }

    /// Closes the innermost region and verifies its field.
    pub fn pop(&mut self) -> AppResult<()> {
        let field = self.stack.pop().ok_or_else(|| {
            AppError::IllegalState("pop called without a pending push region".to_string())
        })?;
        field.check(&self.raw[field.start_offset()..self.offset])
    }
}
