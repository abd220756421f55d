use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// XOR over the record payload did not reduce to zero.
    #[error("Checksum mismatch: payload reduces to {residue:#04x}")]
    ChecksumMismatch { residue: u8 },
    #[error("Invalid timestamp: {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}")]
    InvalidTimestamp {
        year:   u16,
        month:  u8,
        day:    u8,
        hour:   u8,
        minute: u8,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
