use thiserror::Error;

/// 編碼或解碼 job message 時的錯誤；全部視為致命，沒有重試路徑。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Encoder ran past the fixed message buffer
    #[error("buffer overflow writing '{field}': need {needed} bytes, capacity {capacity}")]
    BufferOverflow {
        field: &'static str,
        needed: usize,
        capacity: usize,
    },

    /// Received payload larger than the fixed message buffer
    #[error("payload of {len} bytes exceeds the {capacity}-byte message buffer")]
    Oversized { len: usize, capacity: usize },

    /// Input ended before the field could be read
    #[error("unexpected end of message reading '{field}'")]
    UnexpectedEnd { field: &'static str },

    /// Discriminant outside the known set
    #[error("unknown message discriminant {0}")]
    UnknownDiscriminant(i32),

    /// Decoded step count does not fit the platform's usize
    #[error("step count {0} out of range")]
    StepCountOutOfRange(u64),
}
