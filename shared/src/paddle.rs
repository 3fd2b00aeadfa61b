use crate::game_state::Paddle;

/// the buttons of one handheld, sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaddleInput {
    pub up: bool,
    pub down: bool,
    pub action: bool,
}

impl PaddleInput {
    fn dy(&self) -> i16 {
        self.down as i16 - self.up as i16
    }
}

/// moves a device's own paddle by one step and latches its action button.
/// each device runs this for its own slot only.
pub fn steer(paddle: &mut Paddle, input: PaddleInput) {
    paddle.y = Paddle::clamp_y(paddle.y + input.dy());
    paddle.action = input.action;
}
