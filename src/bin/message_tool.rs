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

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use wiremsg::{
    global_config, setup_local_tracing_with, AppResult, CodecConfig, CompressionCodec, Message,
    PacketEncoder, GLOBAL_CONFIG,
};

#[derive(Parser)]
#[command(version)]
struct Cli {
    /// path to config file
    #[arg(short, long)]
    conf: Option<PathBuf>,
    /// log level (v: info, vv: debug, vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode one message and write its wire bytes to a file
    Encode {
        #[arg(short, long)]
        key: Option<String>,
        #[arg(long)]
        value: Option<String>,
        #[arg(long, default_value = "none")]
        codec: CompressionCodec,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Decode a file holding exactly one message and print it
    Decode {
        #[arg(short, long)]
        file: PathBuf,
    },
    PrintConfig,
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let directive = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_local_tracing_with(directive)?;

    if let Some(conf) = &cli.conf {
        let codec_config = CodecConfig::set_up_config(conf)?;
        GLOBAL_CONFIG
            .set(codec_config)
            .expect("set codec config failed");
    }

    match cli.command {
        Commands::Encode {
            key,
            value,
            codec,
            out,
        } => encode_message(key, value, codec, &out),
        Commands::Decode { file } => decode_message(&file),
        Commands::PrintConfig => {
            println!("{:#?}", global_config());
            Ok(())
        }
    }
}

fn encode_message(
    key: Option<String>,
    value: Option<String>,
    codec: CompressionCodec,
    out: &Path,
) -> AppResult<()> {
    let message = Message::new(codec, key.map(Bytes::from), value.map(Bytes::from));
    let max_msg_size = global_config().general.max_msg_size;
    debug!("encoding with capacity limit {}", max_msg_size);

    let mut encoder = PacketEncoder::with_capacity_limit(max_msg_size);
    message.encode(&mut encoder)?;
    let raw = encoder.finish()?;
    fs::write(out, &raw)?;

    info!("wrote {} bytes to {}", raw.len(), out.display());
    Ok(())
}

fn decode_message(file: &Path) -> AppResult<()> {
    let raw = Bytes::from(fs::read(file)?);
    debug!("read {} bytes from {}", raw.len(), file.display());

    let message = Message::from_bytes(raw)?;
    println!("Codec: {}", message.codec);
    println!("Key: {}", display_field(message.key.as_ref()));
    println!("Value: {}", display_field(message.value.as_ref()));
    Ok(())
}

fn display_field(field: Option<&Bytes>) -> String {
    match field {
        Some(bytes) => format!("{:?} ({} bytes)", String::from_utf8_lossy(bytes), bytes.len()),
        None => "null".to_string(),
    }
}
