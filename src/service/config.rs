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

use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::{AppError, AppResult};

pub static GLOBAL_CONFIG: OnceCell<CodecConfig> = OnceCell::new();

/// Returns the process-wide configuration, or the defaults if none was installed.
pub fn global_config() -> &'static CodecConfig {
    GLOBAL_CONFIG.get_or_init(CodecConfig::default)
}

/// Default upper bound for one encoded message, 1 MiB.
pub const DEFAULT_MAX_MSG_SIZE: usize = 1_048_576;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Capacity limit handed to the packet encoder.
    pub max_msg_size: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            max_msg_size: DEFAULT_MAX_MSG_SIZE,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CodecConfig {
    pub general: GeneralConfig,
}

impl CodecConfig {
    /// Loads the config file at `path`, then applies `WIREMSG_` environment
    /// overrides (e.g. `WIREMSG_GENERAL__MAX_MSG_SIZE`).
    pub fn set_up_config<P: AsRef<Path>>(path: P) -> AppResult<CodecConfig> {
        let path_str = path
            .as_ref()
            .to_str()
            .ok_or(AppError::InvalidValue(format!(
                "config file path: {}",
                path.as_ref().to_string_lossy()
            )))?;
        let config = config::Config::builder()
            .add_source(config::File::with_name(path_str))
            .add_source(
                config::Environment::with_prefix("WIREMSG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let codec_config: CodecConfig = config.try_deserialize()?;
        if codec_config.general.max_msg_size == 0 {
            return Err(AppError::InvalidValue(
                "general.max_msg_size must be greater than 0".to_string(),
            ));
        }

        Ok(codec_config)
    }
}
