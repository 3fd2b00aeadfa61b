use super::{
    byte_to_position,
    game_state::{GameState, Paddle, Role, BALL_OVERSHOOT, MAX_BALL_X, MAX_BALL_Y, MAX_PADDLE_Y},
    position_to_byte, validate_byte_count, DeserializeMessageError,
};

/// number of bytes in a serialized [`Snapshot`].
pub const SNAPSHOT_LEN: usize = 5;

/// the state the authority pushes to the follower once per frame, after the physics step.
/// serialized as one byte per field, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub authority_paddle: i16,
    pub ball_x: i16,
    pub ball_y: i16,
    pub authority_score: u8,
    pub follower_score: u8,
}

impl Snapshot {
    pub fn of(state: &GameState) -> Self {
        Self {
            authority_paddle: state.paddles[Role::Authority.side()].y,
            ball_x: state.ball.x,
            ball_y: state.ball.y,
            authority_score: state.scores[Role::Authority.side()],
            follower_score: state.scores[Role::Follower.side()],
        }
    }

    /// copies the snapshot into a follower's mirror of the game.
    pub fn apply_to(&self, mirror: &mut GameState) {
        mirror.paddles[Role::Authority.side()].y = self.authority_paddle;
        mirror.ball.x = self.ball_x;
        mirror.ball.y = self.ball_y;
        mirror.scores[Role::Authority.side()] = self.authority_score;
        mirror.scores[Role::Follower.side()] = self.follower_score;
    }

    /// replaces the fields whose bytes arrived and keeps the rest, so a truncated transfer only
    /// leaves the missing fields stale. incoming positions are clamped into their legal ranges.
    pub fn overlay(mut self, bytes: &[u8]) -> Self {
        let mut fields = bytes.iter().copied();
        if let Some(byte) = fields.next() {
            self.authority_paddle = Paddle::clamp_y(byte_to_position(byte));
        }
        if let Some(byte) = fields.next() {
            self.ball_x = byte_to_position(byte).clamp(0, MAX_BALL_X);
        }
        if let Some(byte) = fields.next() {
            self.ball_y =
                byte_to_position(byte).clamp(-BALL_OVERSHOOT, MAX_BALL_Y + BALL_OVERSHOOT);
        }
        if let Some(byte) = fields.next() {
            self.authority_score = byte;
        }
        if let Some(byte) = fields.next() {
            self.follower_score = byte;
        }
        self
    }
}

impl From<Snapshot> for Vec<u8> {
    fn from(value: Snapshot) -> Self {
        vec![
            position_to_byte(value.authority_paddle),
            position_to_byte(value.ball_x),
            position_to_byte(value.ball_y),
            value.authority_score,
            value.follower_score,
        ]
    }
}

impl TryFrom<&[u8]> for Snapshot {
    type Error = DeserializeMessageError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        validate_byte_count(value, SNAPSHOT_LEN)?;
        let authority_paddle = byte_to_position(value[0]);
        if !(0..=MAX_PADDLE_Y).contains(&authority_paddle) {
            return Err(DeserializeMessageError::InvalidPaddlePosition);
        }
        let ball_x = byte_to_position(value[1]);
        let ball_y = byte_to_position(value[2]);
        if !(0..=MAX_BALL_X).contains(&ball_x)
            || !(-BALL_OVERSHOOT..=MAX_BALL_Y + BALL_OVERSHOOT).contains(&ball_y)
        {
            return Err(DeserializeMessageError::InvalidBallPosition);
        }
        Ok(Snapshot {
            authority_paddle,
            ball_x,
            ball_y,
            authority_score: value[3],
            follower_score: value[4],
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        assert_deserialize, assert_serialize, assert_serialize_and_back,
        authority_msg::Snapshot,
        game_state::{GameState, Side, MAX_PADDLE_Y},
        simulation, DeserializeMessageError,
    };

    fn snapshot() -> Snapshot {
        Snapshot {
            authority_paddle: 10,
            ball_x: 64,
            ball_y: 30,
            authority_score: 3,
            follower_score: 7,
        }
    }

    #[test]
    fn serialize() {
        assert_serialize!(snapshot(), vec![10, 64, 30, 3, 7]);
        let overshot = Snapshot {
            ball_y: -1,
            ..snapshot()
        };
        assert_serialize!(overshot, vec![10, 64, 255, 3, 7]);
    }

    #[test]
    fn deserialize_ok() {
        assert_deserialize!(Snapshot, [10, 64, 30, 3, 7], Ok(snapshot()));
        assert_deserialize!(
            Snapshot,
            [10, 64, 255, 3, 7],
            Ok(Snapshot {
                ball_y: -1,
                ..snapshot()
            }),
        );
    }

    #[test]
    fn deserialize_err() {
        // empty message.
        assert_deserialize!(Snapshot, [], Err(DeserializeMessageError::InvalidByteCount));
        // missing score bytes.
        assert_deserialize!(
            Snapshot,
            [10, 64, 30],
            Err(DeserializeMessageError::InvalidByteCount),
        );
        // extra bytes.
        assert_deserialize!(
            Snapshot,
            [10, 64, 30, 3, 7, 0],
            Err(DeserializeMessageError::InvalidByteCount),
        );
        // paddle below the screen.
        assert_deserialize!(
            Snapshot,
            [MAX_PADDLE_Y as u8 + 1, 64, 30, 3, 7],
            Err(DeserializeMessageError::InvalidPaddlePosition),
        );
        // negative paddle.
        assert_deserialize!(
            Snapshot,
            [255, 64, 30, 3, 7],
            Err(DeserializeMessageError::InvalidPaddlePosition),
        );
        // ball past the right edge.
        assert_deserialize!(
            Snapshot,
            [10, 125, 30, 3, 7],
            Err(DeserializeMessageError::InvalidBallPosition),
        );
        // ball two steps above the top wall.
        assert_deserialize!(
            Snapshot,
            [10, 64, 254, 3, 7],
            Err(DeserializeMessageError::InvalidBallPosition),
        );
    }

    #[test]
    fn overlay_full_message_replaces_everything() {
        let stale = Snapshot::of(&GameState::new());
        assert_eq!(stale.overlay(&[10, 64, 30, 3, 7]), snapshot());
    }

    #[test]
    fn overlay_truncated_message_keeps_missing_fields() {
        let stale = snapshot();
        let fresh = stale.overlay(&[12, 70]);
        assert_eq!(
            fresh,
            Snapshot {
                authority_paddle: 12,
                ball_x: 70,
                ..stale
            }
        );
        assert_eq!(stale.overlay(&[]), stale);
    }

    #[test]
    fn overlay_clamps_positions() {
        let fresh = snapshot().overlay(&[100, 127, 100]);
        assert_eq!(fresh.authority_paddle, MAX_PADDLE_Y);
        assert_eq!(fresh.ball_x, 124);
        assert_eq!(fresh.ball_y, 61);
        let fresh = snapshot().overlay(&[255]);
        assert_eq!(fresh.authority_paddle, 0);
    }

    #[test]
    fn mirror_matches_authority_after_one_push() {
        let mut authority = GameState::new();
        authority.paddles.left.action = true;
        authority.scores.left = 4;
        authority.scores.right = 9;
        for _ in 0..20 {
            simulation::step(&mut authority);
        }
        let bytes = Vec::<u8>::from(Snapshot::of(&authority));

        let mut mirror = GameState::new();
        Snapshot::try_from(bytes.as_slice())
            .unwrap()
            .apply_to(&mut mirror);
        assert_eq!(mirror.paddles[Side::Left].y, authority.paddles.left.y);
        assert_eq!((mirror.ball.x, mirror.ball.y), (authority.ball.x, authority.ball.y));
        assert_eq!(mirror.scores, authority.scores);
    }

    #[test]
    fn serialize_and_back() {
        assert_serialize_and_back!(snapshot());
        assert_serialize_and_back!(Snapshot::of(&GameState::new()));
    }
}
