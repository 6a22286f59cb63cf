//! Wire schema for Boxfall.
//!
//! This crate defines what travels between clients and the room
//! coordinator:
//!
//! - **Types** ([`ClientIntent`], [`ServerEvent`], [`PlayerId`], ...) —
//!   the message structures with pinned JSON shapes.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how a transport adapter
//!   turns those into bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! The protocol layer knows nothing about connections, timers, or game
//! rules — it only describes the messages.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{ClientIntent, PlayerId, PlayerSnapshot, RoomSnapshot, ServerEvent};
