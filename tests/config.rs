use std::io::Write;

use bytes::Bytes;
use wiremsg::service::DEFAULT_MAX_MSG_SIZE;
use wiremsg::{
    global_config, AppError, AppResult, CodecConfig, CompressionCodec, Message, PacketEncoder,
};

#[test]
fn test_default_config() {
    assert_eq!(global_config().general.max_msg_size, DEFAULT_MAX_MSG_SIZE);
}

#[test]
fn test_config_limit_bounds_encoder() -> AppResult<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[general]\nmax_msg_size = 64")?;
    let codec_config = CodecConfig::set_up_config(file.path())?;

    let small = Message::new(CompressionCodec::None, None, Some(Bytes::from_static(b"fits")));
    let mut encoder = PacketEncoder::with_capacity_limit(codec_config.general.max_msg_size);
    small.encode(&mut encoder)?;

    let large = Message::new(CompressionCodec::None, None, Some(Bytes::from(vec![0u8; 64])));
    let mut encoder = PacketEncoder::with_capacity_limit(codec_config.general.max_msg_size);
    assert!(matches!(
        large.encode(&mut encoder),
        Err(AppError::BufferExhausted { .. })
    ));
    Ok(())
}
