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

use tracing::error;

use crate::{AppError, AppResult};

/// A push region whose value is the CRC-32 (IEEE) of every byte that follows
/// it up to the matching pop.
///
/// On encode the four bytes are reserved at push time and backfilled at pop
/// time. On decode the stored value is read at push time and compared with the
/// recomputed one at pop time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Crc32Field {
    start_offset: usize,
}

impl Crc32Field {
    /// Width of the checksum on the wire.
    pub const WIDTH: usize = 4;

    pub fn new() -> Self {
        Crc32Field::default()
    }

    pub(crate) fn save_offset(&mut self, offset: usize) {
        self.start_offset = offset;
    }

    pub(crate) fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Backfills the checksum. `buf` is the whole encoder buffer.
    pub(crate) fn run(&self, buf: &mut [u8]) {
        let covered_start = self.start_offset + Self::WIDTH;
        let crc = crc32fast::hash(&buf[covered_start..]);
        buf[self.start_offset..covered_start].copy_from_slice(&crc.to_be_bytes());
    }

    /// Verifies the stored checksum. `region` runs from the checksum field to
    /// the current decoder position.
    pub(crate) fn check(&self, region: &[u8]) -> AppResult<()> {
        let (stored, covered) = region.split_at(Self::WIDTH);
        let mut stored_bytes = [0u8; Self::WIDTH];
        stored_bytes.copy_from_slice(stored);
        let expected = u32::from_be_bytes(stored_bytes);
        let actual = crc32fast::hash(covered);
        if expected != actual {
            error!(
                "crc mismatch at offset {}: stored {:#010x}, computed {:#010x}",
                self.start_offset, expected, actual
            );
            return Err(AppError::ChecksumMismatch { expected, actual });
        }
        Ok(())
    }
}
