//! A SPDY/2 and SPDY/3 framing and header-compression codec.
//!
//! This library implements the framing core of the SPDY protocol: the
//! binary parser and serializer for every SPDY frame type, and the
//! stateful name/value header compression every header-carrying control
//! frame passes through. The implementation is decoupled from TCP or
//! TLS details; the user supplies the byte stream and drives the codec.
//!
//! # Layout
//!
//! The crate exposes a [`Codec`] bound to one protocol [`Version`]
//! which implements the `ntex_codec` [`Encoder`](ntex_codec::Encoder)
//! and [`Decoder`](ntex_codec::Decoder) traits over
//! [`Frame`](frame::Frame) values. Frame types live in [`frame`], the
//! connection-scoped compression state in [`zlib`].
//!
//! # Compression state
//!
//! SPDY compresses header blocks with one zlib stream per connection
//! direction, primed with a version-specific dictionary. The stream
//! survives across frames, so all header-bearing frames of one
//! direction must pass through a single [`Codec`] (or one
//! [`zlib::Compressor`]/[`zlib::Decompressor`] pair), in wire order. A
//! failed header block leaves the two peers' streams out of sync and is
//! fatal to the connection.

#![cfg_attr(test, deny(warnings))]
#![deny(rust_2018_idioms)]

macro_rules! proto_err {
    (conn: $($msg:tt)+) => {
        log::debug!("connection error PROTOCOL_ERROR -- {};", format_args!($($msg)+))
    };
}

mod codec;
mod consts;
mod headers;

pub mod frame;
pub mod zlib;

pub use self::codec::{Codec, EncoderError};
pub use self::consts::{MAX_FRAME_SIZE, MAX_HEADER_BLOCK_SIZE, MAX_WINDOW_DELTA};
pub use self::frame::{Frame, FrameError, Reason, StreamId, Version};
pub use self::headers::HeaderMap;
