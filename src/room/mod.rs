//! Room message vocabulary and received room data.
//!
//! - [`MsgType`] - closed vocabulary of `msgtype` values
//! - [`RelatesTo`] - thread relation attached to outgoing messages
//! - [`Sender`], [`Message`] - messages read back from a room
//! - [`Event`] - read-only view over a raw protocol event

mod event;
mod message;
mod msg_type;
mod relates_to;
mod sender;

pub use crate::room::event::Event;
pub use crate::room::message::{Message, MessageKind};
pub use crate::room::msg_type::MsgType;
pub use crate::room::relates_to::RelatesTo;
pub use crate::room::sender::Sender;
