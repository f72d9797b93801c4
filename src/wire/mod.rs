//! Wire schema and framing
//!
//! Message types exchanged over rendezvous sync streams, and the
//! length-delimited framing that carries them. The registry and session
//! logic only ever see whole decoded messages, never raw bytes.

pub mod framing;
pub mod message;

pub use framing::{BoxedFrameWriter, FrameReader, FrameWriter, DEFAULT_MAX_FRAME_SIZE};
pub use message::{RegistrationRecord, Request, SubscriptionDescriptor};
