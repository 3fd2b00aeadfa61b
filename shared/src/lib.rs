use std::{error::Error, fmt::Display};

pub mod authority_msg;
pub mod follower_msg;
pub mod game_state;
pub mod paddle;
pub mod simulation;

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub enum DeserializeMessageError {
    HandshakeRefused,
    InvalidBallPosition,
    InvalidByteCount,
    InvalidPaddlePosition,
}

impl Display for DeserializeMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeserializeMessageError::HandshakeRefused => Display::fmt("handshake refused", f),
            DeserializeMessageError::InvalidBallPosition => {
                Display::fmt("invalid ball position", f)
            }
            DeserializeMessageError::InvalidByteCount => Display::fmt("invalid amount of bytes", f),
            DeserializeMessageError::InvalidPaddlePosition => {
                Display::fmt("invalid paddle position", f)
            }
        }
    }
}

impl Error for DeserializeMessageError {}

fn validate_byte_count(slice: &[u8], exp_len: usize) -> Result<(), DeserializeMessageError> {
    if slice.len() != exp_len {
        Err(DeserializeMessageError::InvalidByteCount)
    } else {
        Ok(())
    }
}

/// every position travels as a single two's complement byte.
/// the checks in [`game_state`] guarantee no position is wider than an `i8`.
fn position_to_byte(pos: i16) -> u8 {
    pos as i8 as u8
}

fn byte_to_position(byte: u8) -> i16 {
    byte as i8 as i16
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_serialize {
    ($message:expr, $expected:expr $(,)?) => {
        assert_eq!(Vec::<u8>::from($message), $expected)
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_deserialize {
    ($type:tt, $bytes:expr, $expected:expr $(,)?) => {
        assert_eq!($type::try_from($bytes.as_slice()), $expected)
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_serialize_and_back {
    ($message:expr $(,)?) => {
        assert_eq!(
            Vec::<u8>::from($message.clone()).as_slice().try_into(),
            Ok($message)
        )
    };
}
