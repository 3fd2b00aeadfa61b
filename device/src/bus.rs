use std::{error::Error, fmt::Display, sync::Arc};

/// 7-bit address of a listener on the shared bus.
pub type Address = u8;

/// the two-wire link between the handhelds.
pub trait Bus {
    /// asks the listener at `address` for `len` bytes. waiting for the reply is bounded by the
    /// transport; whatever arrived in time is returned, possibly nothing.
    fn request_from(&mut self, address: Address, len: usize) -> Vec<u8>;

    /// sends `bytes` to the listener at `address` without waiting for any reply.
    fn transmit(&mut self, address: Address, bytes: &[u8]) -> Result<(), BusError>;

    /// starts listening at `address`, or swaps the handler if this endpoint already listens there.
    /// the handler is invoked from whichever context services the bus, never from the caller's.
    fn listen(&mut self, address: Address, handler: Arc<dyn BusHandler>) -> Result<(), BusError>;

    /// stops listening. does nothing if this endpoint is not listening.
    fn release(&mut self);
}

/// callbacks run on behalf of a listening endpoint.
pub trait BusHandler: Send + Sync {
    /// someone is requesting `len` bytes from this endpoint.
    fn on_request(&self, len: usize) -> Vec<u8>;

    /// someone sent this endpoint `bytes`.
    fn on_receive(&self, bytes: &[u8]);
}

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub enum BusError {
    AddressInUse(Address),
    NoListener(Address),
}

impl Display for BusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusError::AddressInUse(address) => write!(f, "address {address:#04x} already in use"),
            BusError::NoListener(address) => write!(f, "nothing listening at {address:#04x}"),
        }
    }
}

impl Error for BusError {}
