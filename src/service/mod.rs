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

pub use app_error::{AppError, AppResult};
pub use config::{global_config, CodecConfig, GeneralConfig, DEFAULT_MAX_MSG_SIZE, GLOBAL_CONFIG};
pub use tracing_config::{setup_local_tracing, setup_local_tracing_with};

mod app_error;
mod config;
mod tracing_config;
