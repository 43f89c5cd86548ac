use std::fmt;

/// RST_STREAM status codes.
///
/// Codes 8 through 11 were introduced with SPDY/3; the codec does not
/// police which codes appear on which version, it only transports them.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reason(u32);

impl Reason {
    pub const PROTOCOL_ERROR: Reason = Reason(1);
    pub const INVALID_STREAM: Reason = Reason(2);
    pub const REFUSED_STREAM: Reason = Reason(3);
    pub const UNSUPPORTED_VERSION: Reason = Reason(4);
    pub const CANCEL: Reason = Reason(5);
    pub const INTERNAL_ERROR: Reason = Reason(6);
    pub const FLOW_CONTROL_ERROR: Reason = Reason(7);
    pub const STREAM_IN_USE: Reason = Reason(8);
    pub const STREAM_ALREADY_CLOSED: Reason = Reason(9);
    pub const INVALID_CREDENTIALS: Reason = Reason(10);
    pub const FRAME_TOO_LARGE: Reason = Reason(11);

    /// Get a string description of the status code.
    pub fn description(&self) -> &str {
        match self.0 {
            1 => "protocol error",
            2 => "invalid stream",
            3 => "refused stream",
            4 => "unsupported version",
            5 => "cancel",
            6 => "internal error",
            7 => "flow control error",
            8 => "stream in use",
            9 => "stream already closed",
            10 => "invalid credentials",
            11 => "frame too large",
            _ => "unknown status code",
        }
    }
}

impl From<u32> for Reason {
    fn from(src: u32) -> Reason {
        Reason(src)
    }
}

impl From<Reason> for u32 {
    fn from(src: Reason) -> u32 {
        src.0
    }
}

impl fmt::Debug for Reason {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            1 => "PROTOCOL_ERROR",
            2 => "INVALID_STREAM",
            3 => "REFUSED_STREAM",
            4 => "UNSUPPORTED_VERSION",
            5 => "CANCEL",
            6 => "INTERNAL_ERROR",
            7 => "FLOW_CONTROL_ERROR",
            8 => "STREAM_IN_USE",
            9 => "STREAM_ALREADY_CLOSED",
            10 => "INVALID_CREDENTIALS",
            11 => "FRAME_TOO_LARGE",
            other => return write!(fmt, "Reason({})", other),
        };
        fmt.write_str(name)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.description())
    }
}
