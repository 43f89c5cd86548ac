use std::{convert::TryFrom, rc::Rc};

use ntex_bytes::BytesMut;
use ntex_codec::{Decoder, Encoder};

mod error;
mod length_delimited;

pub use self::error::EncoderError;

use self::length_delimited::LengthDelimitedCodec;
use crate::consts::MAX_FRAME_SIZE;
use crate::frame::{self, Frame, FrameError, Head, Kind, Version, HEADER_LEN};
use crate::zlib::{Compressor, Decompressor};

/// A framer bound to one SPDY protocol version.
///
/// The codec owns the connection's compression state: one
/// [`Compressor`] for frames it encodes and one [`Decompressor`] for
/// frames it decodes. Clones share that state, so the read and write
/// halves of a connection use the same codec value.
#[derive(Clone, Debug)]
pub struct Codec(Rc<CodecInner>);

#[derive(Debug)]
struct CodecInner {
    version: Version,

    // decoder state
    decoder: LengthDelimitedCodec,
    decompressor: Decompressor,

    // encoder state
    compressor: Compressor,
}

impl Codec {
    /// Returns a new `Codec` bound to the given protocol version.
    pub fn new(version: Version) -> Self {
        // Delimit the frames
        let decoder = self::length_delimited::Builder::new()
            .length_field_offset(5)
            .length_field_length(3)
            .length_adjustment(HEADER_LEN as isize)
            .max_frame_length(MAX_FRAME_SIZE)
            .num_skip(0) // Don't skip the header
            .new_codec();

        Codec(Rc::new(CodecInner {
            version,
            decoder,
            decompressor: Decompressor::new(version),
            compressor: Compressor::new(version),
        }))
    }

    /// The protocol version this codec was constructed with.
    pub fn version(&self) -> Version {
        self.0.version
    }
}

impl Decoder for Codec {
    type Item = Frame;
    type Error = FrameError;

    /// Decodes a frame.
    ///
    /// Returns `Ok(None)` until `src` holds one complete frame; the
    /// transport layer keeps feeding bytes. Every error is terminal
    /// for the connection.
    fn decode(&self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        let inner = &*self.0;

        let mut bytes = if let Some(bytes) = inner.decoder.decode(src)? {
            bytes
        } else {
            return Ok(None);
        };

        let head = Head::parse(&bytes);

        let frame = match head {
            Head::Data(head) => {
                log::trace!("decoding data frame, len {}", head.length());

                let _ = bytes.split_to(HEADER_LEN);

                frame::Data::load(head, bytes.freeze())
                    .map_err(|e| {
                        proto_err!(conn: "failed to load DATA frame; err={:?}", e);
                        e
                    })?
                    .into()
            }
            Head::Control(head) => {
                if head.version() != inner.version.number() {
                    proto_err!(conn: "frame version {} on a {} connection", head.version(), inner.version);
                    return Err(match Version::try_from(head.version()) {
                        Ok(_) => FrameError::UnexpectedVersion(head.version()),
                        Err(e) => e,
                    });
                }

                let kind = head.kind();
                if !kind.is_defined(inner.version) {
                    proto_err!(conn: "frame type {} is not defined in {}", head.kind_code(), inner.version);
                    return Err(FrameError::InvalidKind(head.kind_code()));
                }

                log::trace!("decoding {:?} frame, frame buf len {}", kind, bytes.len());

                let payload = &bytes[HEADER_LEN..];
                match kind {
                    Kind::SynStream => {
                        frame::SynStream::load(head, payload, inner.version, &inner.decompressor)
                            .map_err(|e| {
                                proto_err!(conn: "failed to load SYN_STREAM frame; err={:?}", e);
                                e
                            })?
                            .into()
                    }
                    Kind::SynReply => {
                        frame::SynReply::load(head, payload, inner.version, &inner.decompressor)
                            .map_err(|e| {
                                proto_err!(conn: "failed to load SYN_REPLY frame; err={:?}", e);
                                e
                            })?
                            .into()
                    }
                    Kind::Headers => {
                        frame::Headers::load(head, payload, inner.version, &inner.decompressor)
                            .map_err(|e| {
                                proto_err!(conn: "failed to load HEADERS frame; err={:?}", e);
                                e
                            })?
                            .into()
                    }
                    Kind::Reset => frame::Reset::load(head, payload)
                        .map_err(|e| {
                            proto_err!(conn: "failed to load RST_STREAM frame; err={:?}", e);
                            e
                        })?
                        .into(),
                    Kind::Settings => frame::Settings::load(head, payload, inner.version)
                        .map_err(|e| {
                            proto_err!(conn: "failed to load SETTINGS frame; err={:?}", e);
                            e
                        })?
                        .into(),
                    Kind::Noop => frame::Noop::load(head, payload)
                        .map_err(|e| {
                            proto_err!(conn: "failed to load NOOP frame; err={:?}", e);
                            e
                        })?
                        .into(),
                    Kind::Ping => frame::Ping::load(head, payload)
                        .map_err(|e| {
                            proto_err!(conn: "failed to load PING frame; err={:?}", e);
                            e
                        })?
                        .into(),
                    Kind::GoAway => frame::GoAway::load(head, payload, inner.version)
                        .map_err(|e| {
                            proto_err!(conn: "failed to load GOAWAY frame; err={:?}", e);
                            e
                        })?
                        .into(),
                    Kind::WindowUpdate => frame::WindowUpdate::load(head, payload)
                        .map_err(|e| {
                            proto_err!(conn: "failed to load WINDOW_UPDATE frame; err={:?}", e);
                            e
                        })?
                        .into(),
                    Kind::Credential => frame::Credential::load(head, payload)
                        .map_err(|e| {
                            proto_err!(conn: "failed to load CREDENTIAL frame; err={:?}", e);
                            e
                        })?
                        .into(),
                    Kind::Unknown => {
                        return Err(FrameError::InvalidKind(head.kind_code()));
                    }
                }
            }
        };

        Ok(Some(frame))
    }
}

impl Encoder for Codec {
    type Item = Frame;
    type Error = EncoderError;

    fn encode(&self, item: Frame, buf: &mut BytesMut) -> Result<(), EncoderError> {
        let inner = &*self.0;

        if !item.is_defined(inner.version) {
            return Err(EncoderError::UnsupportedKind);
        }

        match item {
            Frame::SynStream(v) => v.encode(inner.version, &inner.compressor, buf)?,
            Frame::SynReply(v) => v.encode(inner.version, &inner.compressor, buf)?,
            Frame::Headers(v) => v.encode(inner.version, &inner.compressor, buf)?,
            Frame::Reset(v) => v.encode(inner.version, buf),
            Frame::Settings(v) => v.encode(inner.version, buf),
            Frame::Noop(v) => v.encode(inner.version, buf),
            Frame::Ping(v) => v.encode(inner.version, buf),
            Frame::GoAway(v) => v.encode(inner.version, buf),
            Frame::WindowUpdate(v) => v.encode(inner.version, buf),
            Frame::Credential(v) => v.encode(inner.version, buf),
            Frame::Data(v) => {
                // Ensure that the payload is not greater than the max frame.
                if v.payload().len() > MAX_FRAME_SIZE {
                    return Err(EncoderError::MaxSizeExceeded);
                }
                v.encode(buf);
            }
        }

        Ok(())
    }
}
