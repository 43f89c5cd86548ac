// Constants

/// Largest frame payload; the length field is 24 bits wide.
pub const MAX_FRAME_SIZE: usize = (1 << 24) - 1;

/// Largest serialized header block: the maximum frame payload minus the
/// maximum non-header frame data (SYN_STREAM).
pub const MAX_HEADER_BLOCK_SIZE: usize = MAX_FRAME_SIZE - 12;

/// Largest WINDOW_UPDATE delta.
pub const MAX_WINDOW_DELTA: u32 = (1 << 31) - 1;
