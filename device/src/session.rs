use std::sync::Arc;

use log::{debug, info};
use shared::{
    game_state::{GameState, Role, Side},
    paddle::{self, PaddleInput},
    simulation::{self, StepOutcome},
};

use crate::{
    bus::{Address, Bus, BusError},
    link::{self, FollowerLink},
};

enum Link {
    Authority,
    Follower(Arc<FollowerLink>),
}

/// one paired game, from the end of negotiation until power off.
pub struct Session {
    state: GameState,
    link: Link,
    target: Address,
}

impl Session {
    /// opens the session for a negotiated role. the follower replaces its handshake responder
    /// with the handler serving input pulls and snapshot pushes.
    pub fn establish<B: Bus>(bus: &mut B, role: Role, target: Address) -> Result<Self, BusError> {
        let state = GameState::new();
        let link = match role {
            Role::Authority => Link::Authority,
            Role::Follower => {
                let follower_link = Arc::new(FollowerLink::new(&state));
                bus.listen(target, follower_link.clone())?;
                Link::Follower(follower_link)
            }
        };
        Ok(Self {
            state,
            link,
            target,
        })
    }

    pub fn role(&self) -> Role {
        match self.link {
            Link::Authority => Role::Authority,
            Link::Follower(_) => Role::Follower,
        }
    }

    /// the paddle slot this device steers.
    pub fn own_side(&self) -> Side {
        self.role().side()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// runs one frame. both roles steer their own paddle first. the authority then pulls the
    /// follower's input, simulates and pushes the result, strictly in that order. the follower
    /// publishes its paddle for the next pull and refreshes its mirror from the last push.
    pub fn frame<B: Bus>(&mut self, bus: &mut B, input: PaddleInput) -> Option<StepOutcome> {
        let own_side = self.own_side();
        paddle::steer(&mut self.state.paddles[own_side], input);
        match &self.link {
            Link::Authority => {
                link::pull_input(
                    bus,
                    self.target,
                    &mut self.state.paddles[Role::Follower.side()],
                );
                let outcome = simulation::step(&mut self.state);
                if let Some(side) = outcome.paddle_hit {
                    debug!("ball hit the {side:?} paddle");
                }
                if outcome.scored.is_some() {
                    info!(
                        "score {} - {}",
                        self.state.scores[Role::Authority.side()],
                        self.state.scores[Role::Follower.side()]
                    );
                }
                link::push_snapshot(bus, self.target, &self.state);
                Some(outcome)
            }
            Link::Follower(follower_link) => {
                follower_link.publish_input(&self.state.paddles[own_side]);
                follower_link.snapshot().apply_to(&mut self.state);
                None
            }
        }
    }
}
