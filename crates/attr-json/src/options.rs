/// Options shared by [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Deepest nesting of containers and lists before a call fails with
    /// [`Error::DepthExceeded`](crate::Error::DepthExceeded).
    pub max_depth: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
