use std::sync::{
    atomic::{AtomicBool, AtomicI16, Ordering},
    Mutex, PoisonError,
};

use log::trace;
use shared::{
    authority_msg::{Snapshot, SNAPSHOT_LEN},
    follower_msg::{InputReport, INPUT_REPORT_LEN},
    game_state::{GameState, Paddle, Role},
};

use crate::bus::{Address, Bus, BusHandler};

/// asks the follower for its paddle and action button. the authority does this every frame
/// before simulating. fields the transport failed to deliver keep their previous value.
pub fn pull_input<B: Bus>(bus: &mut B, target: Address, follower_paddle: &mut Paddle) {
    let bytes = bus.request_from(target, INPUT_REPORT_LEN);
    if bytes.len() < INPUT_REPORT_LEN {
        trace!(
            "input pull returned {} of {INPUT_REPORT_LEN} bytes",
            bytes.len()
        );
    }
    InputReport::of(follower_paddle)
        .overlay(&bytes)
        .apply_to(follower_paddle);
}

/// fire-and-forget push of the post-physics state, once per frame after simulating.
pub fn push_snapshot<B: Bus>(bus: &mut B, target: Address, state: &GameState) {
    if let Err(err) = bus.transmit(target, &Vec::<u8>::from(Snapshot::of(state))) {
        trace!("snapshot push dropped: {err}");
    }
}

/// what the follower's frame loop and its bus handler share. the follower never transmits on
/// its own: the handler answers the authority's pulls with the input the frame loop published
/// and absorbs its pushes into the mirror the frame loop reads.
pub struct FollowerLink {
    paddle: AtomicI16,
    action: AtomicBool,
    /// whole snapshots only, so a frame never mixes fields of two pushes.
    mirror: Mutex<Snapshot>,
}

impl FollowerLink {
    pub fn new(state: &GameState) -> Self {
        let own = state.paddles[Role::Follower.side()];
        Self {
            paddle: AtomicI16::new(own.y),
            action: AtomicBool::new(own.action),
            mirror: Mutex::new(Snapshot::of(state)),
        }
    }

    /// makes the follower's own paddle available to the next input pull.
    pub fn publish_input(&self, paddle: &Paddle) {
        self.paddle.store(paddle.y, Ordering::Relaxed);
        self.action.store(paddle.action, Ordering::Relaxed);
    }

    pub fn input(&self) -> InputReport {
        InputReport {
            paddle: self.paddle.load(Ordering::Relaxed),
            action: self.action.load(Ordering::Relaxed),
        }
    }

    /// the latest state pushed by the authority.
    pub fn snapshot(&self) -> Snapshot {
        *self.mirror.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn absorb(&self, bytes: &[u8]) {
        if bytes.len() < SNAPSHOT_LEN {
            trace!("absorbing a truncated snapshot of {} bytes", bytes.len());
        }
        let mut mirror = self.mirror.lock().unwrap_or_else(PoisonError::into_inner);
        *mirror = mirror.overlay(bytes);
    }
}

impl BusHandler for FollowerLink {
    fn on_request(&self, _len: usize) -> Vec<u8> {
        Vec::from(self.input())
    }

    fn on_receive(&self, bytes: &[u8]) {
        self.absorb(bytes);
    }
}
