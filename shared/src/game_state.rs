use std::ops::{Index, IndexMut};

pub const SCREEN_WIDTH: i16 = 128;
pub const SCREEN_HEIGHT: i16 = 64;
pub const PADDLE_WIDTH: i16 = 4;
pub const PADDLE_HEIGHT: i16 = 16;
pub const BALL_WIDTH: i16 = 4;
pub const BALL_HEIGHT: i16 = 4;

/// paddles are clamped into `0..=MAX_PADDLE_Y` every frame.
pub const MAX_PADDLE_Y: i16 = SCREEN_HEIGHT - PADDLE_HEIGHT;
pub const MAX_BALL_X: i16 = SCREEN_WIDTH - BALL_WIDTH;
pub const MAX_BALL_Y: i16 = SCREEN_HEIGHT - BALL_HEIGHT;

/// the ball is reflected off the top and bottom walls without being clamped, so it may overshoot
/// the vertical bounds by a single step for one frame.
pub const BALL_OVERSHOOT: i16 = 1;

const _CHECKS: () = {
    assert!(
        MAX_BALL_X + BALL_OVERSHOOT <= i8::MAX as i16,
        "width of the screen is too large to serialize the ball's horizontal position using a single byte"
    );
    assert!(
        MAX_BALL_Y + BALL_OVERSHOOT <= i8::MAX as i16,
        "height of the screen is too large to serialize the ball's vertical position using a single byte"
    );
    assert!(
        MAX_PADDLE_Y <= i8::MAX as i16,
        "height of the screen is too large to serialize a paddle position using a single byte"
    );
    assert!(
        PADDLE_HEIGHT >= BALL_HEIGHT,
        "the ball must fit against the face of a paddle"
    );
};

/// a paddle slot. the slot a device owns is fixed by its [`Role`]: see [`Role::side`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// horizontal position of this side's paddle column.
    pub fn paddle_x(self) -> i16 {
        match self {
            Side::Left => 0,
            Side::Right => SCREEN_WIDTH - PADDLE_WIDTH,
        }
    }

    /// horizontal position of a ball resting flush against this side's paddle face.
    pub fn flush_ball_x(self) -> i16 {
        match self {
            Side::Left => PADDLE_WIDTH,
            Side::Right => SCREEN_WIDTH - BALL_WIDTH - PADDLE_WIDTH,
        }
    }

    /// horizontal direction of a ball served away from this side.
    pub fn serve_dx(self) -> i8 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// runs the simulation and is the source of truth for the ball and the scores.
    Authority,
    /// mirrors the authority's state and reports its own paddle.
    Follower,
}

impl Role {
    pub fn side(self) -> Side {
        match self {
            Role::Authority => Side::Left,
            Role::Follower => Side::Right,
        }
    }
}

/// a value held once per paddle slot, indexed by [`Side`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerSide<T> {
    pub left: T,
    pub right: T,
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paddle {
    pub y: i16,
    /// whether the paddle's action button was held when it was last sampled.
    pub action: bool,
}

impl Paddle {
    pub fn centred() -> Self {
        Self {
            y: MAX_PADDLE_Y / 2,
            action: false,
        }
    }

    pub fn clamp_y(y: i16) -> i16 {
        y.clamp(0, MAX_PADDLE_Y)
    }

    pub fn rect(&self, side: Side) -> Rect {
        Rect {
            x: side.paddle_x(),
            y: self.y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }

    /// vertical position of a ball parked against the middle of this paddle.
    pub fn ball_rest_y(&self) -> i16 {
        self.y + (PADDLE_HEIGHT - BALL_HEIGHT) / 2
    }
}

impl Default for Paddle {
    fn default() -> Self {
        Self::centred()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ball {
    pub x: i16,
    pub y: i16,
    pub dx: i8,
    pub dy: i8,
    /// the paddle the ball waits on while it is parked.
    pub serving: Side,
}

impl Ball {
    pub fn parked_on(side: Side, paddle: &Paddle) -> Self {
        Self {
            x: side.flush_ball_x(),
            y: paddle.ball_rest_y(),
            dx: 0,
            dy: 0,
            serving: side,
        }
    }

    pub fn is_parked(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: BALL_WIDTH,
            height: BALL_HEIGHT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: i16,
    pub height: i16,
}

impl Rect {
    /// axis-aligned overlap. rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(other.x >= self.x + self.width
            || other.x + other.width <= self.x
            || other.y >= self.y + self.height
            || other.y + other.height <= self.y)
    }
}

/// everything both screens are drawn from. on the authority this is the live simulation, on the
/// follower it is the mirror last received from the authority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub paddles: PerSide<Paddle>,
    pub scores: PerSide<u8>,
    pub ball: Ball,
}

impl GameState {
    pub fn new() -> Self {
        let paddles = PerSide::<Paddle>::default();
        let serving = Role::Authority.side();
        Self {
            ball: Ball::parked_on(serving, &paddles[serving]),
            paddles,
            scores: PerSide::default(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
