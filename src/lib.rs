//! An RTMP protocol stack: the plaintext handshake, the chunk mux/demux
//! state machine, typed control and command packets with transaction
//! correlation, the AMF0 value codec, and the FLV tag container.
//!
//! The stack is transport-generic: every I/O operation works over
//! `tokio::io::AsyncRead`/`AsyncWrite` halves, and the core owns no
//! socket lifecycle. Errors propagate to the caller; policy (close,
//! retry, log) stays outside.

mod amf;
mod chunk;
mod connection;
mod flv;
mod handshake;
mod protocol;
mod utils;

pub use amf::*;
pub use chunk::*;
pub use connection::*;
pub use flv::*;
pub use handshake::*;
pub use protocol::*;
pub use utils::*;
