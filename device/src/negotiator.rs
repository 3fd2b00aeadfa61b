use std::{
    error::Error,
    fmt::Display,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use log::{debug, info, trace};
use rand::Rng;
use shared::{
    follower_msg::{HandshakeAck, HANDSHAKE_ACK_LEN},
    game_state::Role,
    DeserializeMessageError,
};

use crate::{
    bus::{Address, Bus, BusError, BusHandler},
    config::NegotiationConfig,
};

const OPEN: u8 = 0;
const COMPLETED: u8 = 1;
const CLOSED: u8 = 2;

/// the handshake of one listening round, shared by the bus handler and the main loop. it ends
/// exactly once: completed by a probe or closed by the listener giving up, whichever comes first.
#[derive(Clone, Default)]
pub struct HandshakeFlag(Arc<AtomicU8>);

impl HandshakeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// returns false if the listener already gave up.
    pub fn complete(&self) -> bool {
        self.0
            .compare_exchange(OPEN, COMPLETED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// returns false if a probe already completed the handshake.
    pub fn close(&self) -> bool {
        self.0
            .compare_exchange(OPEN, CLOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_complete(&self) -> bool {
        self.0.load(Ordering::Acquire) == COMPLETED
    }

    /// spins until the flag is set or `timeout` passes. returns whether the flag was set.
    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.is_complete() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::yield_now();
        }
        true
    }
}

/// answers the single-byte probe of a device looking for a peer.
pub struct HandshakeResponder {
    flag: HandshakeFlag,
}

impl HandshakeResponder {
    pub fn new(flag: HandshakeFlag) -> Self {
        Self { flag }
    }
}

impl BusHandler for HandshakeResponder {
    fn on_request(&self, len: usize) -> Vec<u8> {
        if len != HANDSHAKE_ACK_LEN {
            trace!("ignoring a {len} byte request before pairing");
            return Vec::new();
        }
        if !self.flag.complete() {
            trace!("ignoring a probe that arrived after giving up");
            return Vec::new();
        }
        Vec::from(HandshakeAck)
    }

    fn on_receive(&self, bytes: &[u8]) {
        trace!("ignoring {} bytes received before pairing", bytes.len());
    }
}

/// decides which of the two handhelds runs the simulation.
///
/// a device that finds a listener at `target` becomes the authority. otherwise it listens there
/// itself and becomes the follower once probed. a listener that is never probed, or that finds
/// the address taken, backs off for a random pause and starts over.
pub fn negotiate<B, R>(
    bus: &mut B,
    target: Address,
    config: &NegotiationConfig,
    rng: &mut R,
) -> Result<Role, NegotiationError>
where
    B: Bus,
    R: Rng,
{
    for attempt in 1..=config.max_attempts {
        let reply = bus.request_from(target, HANDSHAKE_ACK_LEN);
        if !reply.is_empty() {
            HandshakeAck::try_from(reply.as_slice()).map_err(NegotiationError::InvalidReply)?;
            info!("found a peer listening at {target:#04x}, acting as authority");
            return Ok(Role::Authority);
        }

        let flag = HandshakeFlag::new();
        match bus.listen(target, Arc::new(HandshakeResponder::new(flag.clone()))) {
            Ok(()) => {
                debug!("listening at {target:#04x} for a peer (attempt {attempt})");
                if flag.wait(config.listen_timeout) {
                    info!("probed by a peer, acting as follower");
                    return Ok(Role::Follower);
                }
                if !stop_listening(bus, &flag) {
                    info!("probed by a peer while giving up, acting as follower");
                    return Ok(Role::Follower);
                }
            }
            Err(BusError::AddressInUse(_)) => {
                debug!("{target:#04x} was claimed first (attempt {attempt})");
            }
            Err(err) => return Err(NegotiationError::Bus(err)),
        }

        if attempt < config.max_attempts {
            let max_backoff = config.max_backoff.as_millis() as u64;
            thread::sleep(Duration::from_millis(rng.gen_range(0..=max_backoff)));
        }
    }
    Err(NegotiationError::TimedOut {
        attempts: config.max_attempts,
    })
}

/// closes the handshake and frees the address. returns false, leaving the listener in place, if
/// a probe completed the handshake first.
fn stop_listening<B: Bus>(bus: &mut B, flag: &HandshakeFlag) -> bool {
    if !flag.close() {
        return false;
    }
    bus.release();
    true
}

#[derive(Debug)]
pub enum NegotiationError {
    TimedOut { attempts: u32 },
    Bus(BusError),
    InvalidReply(DeserializeMessageError),
}

impl Display for NegotiationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationError::TimedOut { attempts } => {
                write!(f, "no peer found after {attempts} attempts")
            }
            NegotiationError::Bus(err) => Display::fmt(err, f),
            NegotiationError::InvalidReply(err) => write!(f, "invalid handshake reply: {err}"),
        }
    }
}

impl Error for NegotiationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NegotiationError::TimedOut { .. } => None,
            NegotiationError::Bus(source) => Some(source),
            NegotiationError::InvalidReply(source) => Some(source),
        }
    }
}

impl From<BusError> for NegotiationError {
    fn from(value: BusError) -> Self {
        NegotiationError::Bus(value)
    }
}
