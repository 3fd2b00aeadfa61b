use super::{
    byte_to_position,
    game_state::{Paddle, MAX_PADDLE_Y},
    position_to_byte, validate_byte_count, DeserializeMessageError,
};

/// number of bytes in a serialized [`InputReport`].
pub const INPUT_REPORT_LEN: usize = 2;

/// number of bytes in a serialized [`HandshakeAck`]. a probe requests exactly this many.
pub const HANDSHAKE_ACK_LEN: usize = 1;

/// the follower's reply when the authority polls it for input:
/// its own paddle position followed by its action button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputReport {
    pub paddle: i16,
    pub action: bool,
}

impl InputReport {
    pub fn of(paddle: &Paddle) -> Self {
        Self {
            paddle: paddle.y,
            action: paddle.action,
        }
    }

    pub fn apply_to(&self, paddle: &mut Paddle) {
        paddle.y = self.paddle;
        paddle.action = self.action;
    }

    /// replaces the fields whose bytes arrived and keeps the rest.
    pub fn overlay(mut self, bytes: &[u8]) -> Self {
        let mut fields = bytes.iter().copied();
        if let Some(byte) = fields.next() {
            self.paddle = Paddle::clamp_y(byte_to_position(byte));
        }
        if let Some(byte) = fields.next() {
            self.action = byte != 0;
        }
        self
    }
}

impl From<InputReport> for Vec<u8> {
    fn from(value: InputReport) -> Self {
        vec![position_to_byte(value.paddle), value.action as u8]
    }
}

impl TryFrom<&[u8]> for InputReport {
    type Error = DeserializeMessageError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        validate_byte_count(value, INPUT_REPORT_LEN)?;
        let paddle = byte_to_position(value[0]);
        if !(0..=MAX_PADDLE_Y).contains(&paddle) {
            return Err(DeserializeMessageError::InvalidPaddlePosition);
        }
        Ok(InputReport {
            paddle,
            action: value[1] != 0,
        })
    }
}

/// the listener's affirmative reply to a handshake probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandshakeAck;

impl From<HandshakeAck> for Vec<u8> {
    fn from(_: HandshakeAck) -> Self {
        vec![1]
    }
}

impl TryFrom<&[u8]> for HandshakeAck {
    type Error = DeserializeMessageError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        validate_byte_count(value, HANDSHAKE_ACK_LEN)?;
        match value[0] {
            0 => Err(DeserializeMessageError::HandshakeRefused),
            _ => Ok(HandshakeAck),
        }
    }
}
