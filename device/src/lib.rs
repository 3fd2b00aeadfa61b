use rand::{rngs::StdRng, SeedableRng};
use shared::{paddle::PaddleInput, simulation::StepOutcome};

use crate::{
    bus::Bus,
    config::DeviceConfig,
    hal::{Button, Buttons, Display},
    negotiator::NegotiationError,
    session::Session,
};

pub mod bus;
pub mod config;
pub mod hal;
pub mod link;
pub mod loopback;
pub mod negotiator;
pub mod render;
pub mod session;
#[cfg(test)]
mod testing;

/// firmware of one handheld. both handhelds run the same image and negotiate at power on which
/// of them simulates the game.
pub struct Handheld<B, D, I> {
    bus: B,
    display: D,
    buttons: I,
    config: DeviceConfig,
    rng: StdRng,
}

impl<B, D, I> Handheld<B, D, I>
where
    B: Bus,
    D: Display,
    I: Buttons,
{
    pub fn new(bus: B, display: D, buttons: I, config: DeviceConfig) -> Self {
        Self {
            bus,
            display,
            buttons,
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// shows the pairing screen and blocks until a role is agreed with the other handheld.
    pub fn pair(&mut self) -> Result<Session, NegotiationError> {
        render::draw_pairing_screen(&mut self.display);
        let role = negotiator::negotiate(
            &mut self.bus,
            self.config.target_address,
            &self.config.negotiation,
            &mut self.rng,
        )?;
        Ok(Session::establish(
            &mut self.bus,
            role,
            self.config.target_address,
        )?)
    }

    /// polls the buttons, advances the session by one frame and draws it.
    pub fn frame(&mut self, session: &mut Session) -> Option<StepOutcome> {
        self.buttons.poll();
        let input = PaddleInput {
            up: self.buttons.pressed(Button::Up),
            down: self.buttons.pressed(Button::Down),
            action: self.buttons.pressed(Button::A),
        };
        let outcome = session.frame(&mut self.bus, input);
        render::draw_game(&mut self.display, session.state());
        outcome
    }
}
