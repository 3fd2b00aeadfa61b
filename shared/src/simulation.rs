use crate::game_state::{Ball, GameState, Side, MAX_BALL_X, MAX_BALL_Y};

/// vertical direction every serve starts with.
pub const SERVE_DY: i8 = 1;

/// what happened during a single [`step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub served: Option<Side>,
    /// the side that won a point.
    pub scored: Option<Side>,
    pub paddle_hit: Option<Side>,
    pub wall_hit: bool,
}

/// advances the ball by one frame. only the authority runs this; both paddles must already hold
/// the latest known positions and action buttons.
///
/// a parked ball is launched on every frame its serving paddle's action button is held, so
/// holding the button through a lost point serves again as soon as the ball is parked.
pub fn step(state: &mut GameState) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let ball = &mut state.ball;

    if ball.is_parked() {
        let serving_paddle = state.paddles[ball.serving];
        ball.y = serving_paddle.ball_rest_y();
        if serving_paddle.action {
            ball.dx = ball.serving.serve_dx();
            ball.dy = SERVE_DY;
            outcome.served = Some(ball.serving);
        }
    }

    ball.x += ball.dx as i16;
    ball.y += ball.dy as i16;

    if ball.x < 0 || ball.x > MAX_BALL_X {
        // the side the ball left through loses the point and serves next.
        let loser = if ball.x < 0 { Side::Left } else { Side::Right };
        let scorer = loser.opposite();
        state.scores[scorer] = state.scores[scorer].saturating_add(1);
        *ball = Ball::parked_on(loser, &state.paddles[loser]);
        outcome.scored = Some(scorer);
    }

    for side in Side::BOTH {
        if state.paddles[side].rect(side).overlaps(&ball.rect()) {
            ball.x = side.flush_ball_x();
            ball.dx = -ball.dx;
            outcome.paddle_hit = Some(side);
            break;
        }
    }

    // no clamping here: the ball may sit one step past the wall for a frame.
    if ball.y < 0 || ball.y > MAX_BALL_Y {
        ball.dy = -ball.dy;
        outcome.wall_hit = true;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use crate::game_state::{
        Paddle, PerSide, BALL_OVERSHOOT, BALL_WIDTH, MAX_PADDLE_Y, PADDLE_HEIGHT, PADDLE_WIDTH,
        SCREEN_WIDTH,
    };

    use super::*;

    fn flying_ball(x: i16, y: i16, dx: i8, dy: i8) -> Ball {
        Ball {
            x,
            y,
            dx,
            dy,
            serving: Side::Left,
        }
    }

    #[test]
    fn parked_ball_follows_serving_paddle() {
        let mut state = GameState::new();
        state.paddles.left.y = 3;
        let outcome = step(&mut state);
        assert_eq!(outcome, StepOutcome::default());
        assert_eq!(state.ball.y, state.paddles.left.ball_rest_y());
        assert_eq!(state.ball.x, PADDLE_WIDTH);
    }

    #[test]
    fn serve_from_left() {
        let mut state = GameState::new();
        state.paddles.left = Paddle {
            y: 10,
            action: true,
        };
        let outcome = step(&mut state);
        assert_eq!(outcome.served, Some(Side::Left));
        assert_eq!((state.ball.dx, state.ball.dy), (1, 1));
        assert_eq!(state.ball.x, PADDLE_WIDTH + 1);
        assert_eq!(state.ball.y, 10 + (PADDLE_HEIGHT - 4) / 2 + 1);
    }

    #[test]
    fn serve_from_right() {
        let mut state = GameState::new();
        state.ball = Ball::parked_on(Side::Right, &state.paddles.right);
        state.paddles.right.action = true;
        // the other paddle's button must not launch the ball.
        state.paddles.left.action = true;
        step(&mut state);
        assert_eq!((state.ball.dx, state.ball.dy), (-1, 1));
        assert_eq!(state.ball.x, Side::Right.flush_ball_x() - 1);
    }

    #[test]
    fn wrong_side_button_does_not_serve() {
        let mut state = GameState::new();
        state.paddles.right.action = true;
        step(&mut state);
        assert!(state.ball.is_parked());
    }

    #[test]
    fn holding_action_after_serve_changes_nothing() {
        let mut state = GameState::new();
        state.paddles.left.action = true;
        assert_eq!(step(&mut state).served, Some(Side::Left));
        for _ in 0..5 {
            assert_eq!(step(&mut state).served, None);
            assert_eq!((state.ball.dx, state.ball.dy), (1, 1));
        }
    }

    #[test]
    fn ball_leaving_right_scores_for_left() {
        let mut state = GameState::new();
        state.paddles.right.y = 0;
        state.ball = flying_ball(SCREEN_WIDTH - BALL_WIDTH + 1, 40, 1, 1);
        let outcome = step(&mut state);
        assert_eq!(outcome.scored, Some(Side::Left));
        assert_eq!(state.scores, PerSide { left: 1, right: 0 });
        assert_eq!(state.ball.serving, Side::Right);
        assert_eq!(state.ball.x, SCREEN_WIDTH - BALL_WIDTH - PADDLE_WIDTH);
        assert_eq!(state.ball.y, state.paddles.right.ball_rest_y());
        assert!(state.ball.is_parked());
    }

    #[test]
    fn ball_leaving_left_scores_for_right() {
        let mut state = GameState::new();
        state.paddles.left.y = MAX_PADDLE_Y;
        state.ball = flying_ball(0, 10, -1, -1);
        let outcome = step(&mut state);
        assert_eq!(outcome.scored, Some(Side::Right));
        assert_eq!(state.scores, PerSide { left: 0, right: 1 });
        assert_eq!(state.ball.serving, Side::Left);
        assert_eq!(state.ball.x, PADDLE_WIDTH);
        assert!(state.ball.is_parked());
        // the next frame keeps the ball parked on the loser's paddle.
        step(&mut state);
        assert_eq!(state.ball.y, state.paddles.left.ball_rest_y());
    }

    #[test]
    fn bounces_off_left_paddle() {
        let mut state = GameState::new();
        state.paddles.left.y = 20;
        state.ball = flying_ball(PADDLE_WIDTH, 25, -1, 1);
        let outcome = step(&mut state);
        assert_eq!(outcome.paddle_hit, Some(Side::Left));
        assert_eq!(state.ball.x, PADDLE_WIDTH);
        assert_eq!(state.ball.dx, 1);
        assert_eq!(state.ball.dy, 1);
    }

    #[test]
    fn bounces_off_right_paddle() {
        let mut state = GameState::new();
        state.paddles.right.y = 20;
        let x = Side::Right.flush_ball_x();
        state.ball = flying_ball(x, 25, 1, -1);
        let outcome = step(&mut state);
        assert_eq!(outcome.paddle_hit, Some(Side::Right));
        assert_eq!(state.ball.x, x);
        assert_eq!(state.ball.dx, -1);
    }

    #[test]
    fn misses_paddle_out_of_reach() {
        let mut state = GameState::new();
        state.paddles.right.y = 0;
        state.ball = flying_ball(Side::Right.flush_ball_x(), 40, 1, 1);
        let outcome = step(&mut state);
        assert_eq!(outcome.paddle_hit, None);
        assert_eq!(state.ball.dx, 1);
    }

    #[test]
    fn reflects_off_walls_without_clamping() {
        let mut state = GameState::new();
        state.ball = flying_ball(60, MAX_BALL_Y, 1, 1);
        let outcome = step(&mut state);
        assert!(outcome.wall_hit);
        assert_eq!(state.ball.y, MAX_BALL_Y + BALL_OVERSHOOT);
        assert_eq!(state.ball.dy, -1);
        step(&mut state);
        assert_eq!(state.ball.y, MAX_BALL_Y);

        state.ball = flying_ball(60, 0, 1, -1);
        step(&mut state);
        assert_eq!(state.ball.y, -BALL_OVERSHOOT);
        assert_eq!(state.ball.dy, 1);
    }

    #[test]
    fn long_rally_keeps_invariants() {
        let mut state = GameState::new();
        let mut total_score = 0u32;
        for frame in 0..5_000 {
            // the left paddle tracks the ball, the right one sweeps, both serve immediately.
            state.paddles.left.y = Paddle::clamp_y(state.ball.y - PADDLE_HEIGHT / 2);
            state.paddles.left.action = true;
            state.paddles.right.y = Paddle::clamp_y((frame / 3) % (MAX_PADDLE_Y + 1));
            state.paddles.right.action = frame % 7 == 0;
            let before = state.ball;
            let outcome = step(&mut state);

            assert!((0..=MAX_BALL_X).contains(&state.ball.x));
            assert!((-BALL_OVERSHOOT..=MAX_BALL_Y + BALL_OVERSHOOT).contains(&state.ball.y));
            if state.ball.is_parked() {
                assert_eq!(
                    state.ball.y,
                    state.paddles[state.ball.serving].ball_rest_y()
                );
            }
            if outcome.paddle_hit.is_some() && outcome.scored.is_none() {
                assert!(state.ball.dx == -before.dx || before.is_parked());
            }
            let new_total = state.scores.left as u32 + state.scores.right as u32;
            assert!(new_total - total_score <= 1);
            assert_eq!(new_total != total_score, outcome.scored.is_some());
            total_score = new_total;
        }
    }
}
