use shared::game_state::{
    GameState, Role, Side, BALL_HEIGHT, BALL_WIDTH, PADDLE_HEIGHT, PADDLE_WIDTH, SCREEN_WIDTH,
};

use crate::hal::Display;

pub const FONT_WIDTH: i16 = 5;
/// distance of each score from the centre of the screen.
pub const SCORE_CENTER_OFFSET: i16 = 5;

pub fn draw_pairing_screen<D: Display>(display: &mut D) {
    display.clear();
    display.set_cursor(0, 0);
    display.print(&format!(
        "Pong v{}\nWaiting for other\nplayer...",
        env!("CARGO_PKG_VERSION")
    ));
    display.display();
}

pub fn draw_game<D: Display>(display: &mut D, state: &GameState) {
    display.clear();
    for side in Side::BOTH {
        display.fill_rect(
            side.paddle_x(),
            state.paddles[side].y,
            PADDLE_WIDTH,
            PADDLE_HEIGHT,
        );
    }
    display.fill_rect(state.ball.x, state.ball.y, BALL_WIDTH, BALL_HEIGHT);

    display.set_cursor(SCREEN_WIDTH / 2 - FONT_WIDTH - SCORE_CENTER_OFFSET, 0);
    display.print(&state.scores[Role::Authority.side()].to_string());
    display.set_cursor(SCREEN_WIDTH / 2 + SCORE_CENTER_OFFSET, 0);
    display.print(&state.scores[Role::Follower.side()].to_string());

    display.display();
}
