use crate::math::partition::Partition;

use super::bytecursor::{
    ByteReader,
    ByteWriter
};
use super::protocolerror::ProtocolError;

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────
//
//   offset  size  field
//   0       4     tag          i32 LE   0 = Job, 1 = Terminate
//   4       8     start        f64 LE   Job only
//   12      8     end          f64 LE   Job only
//   20      8     step_count   u64 LE   Job only
//
// 固定 128 bytes 緩衝區，不支援變長 payload。

pub const MESSAGE_BUFFER_SIZE: usize = 128;

pub const MESSAGE_JOB: i32 = 0;
pub const MESSAGE_TERMINATE: i32 = 1;

const TAG_LEN: usize = 4;
pub const JOB_ENCODED_LEN: usize = TAG_LEN + 8 + 8 + 8;
pub const TERMINATE_ENCODED_LEN: usize = TAG_LEN;

const _: () = assert!(JOB_ENCODED_LEN <= MESSAGE_BUFFER_SIZE);
const _: () = assert!(TERMINATE_ENCODED_LEN <= MESSAGE_BUFFER_SIZE);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobMessage {
    Job(Partition),
    /// 「沒有工作了」的 sentinel；worker 收到後離開迴圈。
    Terminate
}

/// 固定大小的編碼結果；只有前 `len` bytes 會被送出。
#[derive(Debug, Clone, Copy)]
pub struct MessageBuffer {
    bytes: [u8; MESSAGE_BUFFER_SIZE],
    len: usize
}

impl MessageBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl JobMessage {
    pub fn discriminant(&self) -> i32 {
        match self {
            JobMessage::Job(_) => MESSAGE_JOB,
            JobMessage::Terminate => MESSAGE_TERMINATE
        }
    }

    pub fn encode(&self) -> Result<MessageBuffer, ProtocolError> {
        let mut bytes = [0u8; MESSAGE_BUFFER_SIZE];
        let mut writer = ByteWriter::new(&mut bytes);

        writer.write_i32(self.discriminant(), "tag")?;
        if let JobMessage::Job(partition) = self {
            writer.write_f64(partition.start(), "start")?;
            writer.write_f64(partition.end(), "end")?;
            writer.write_u64(partition.step_count() as u64, "step_count")?;
        }

        let len = writer.position();
        Ok(MessageBuffer { bytes, len })
    }

    /// 先讀 tag，確認是 Job 後才讀 payload。
    pub fn decode(bytes: &[u8]) -> Result<JobMessage, ProtocolError> {
        if bytes.len() > MESSAGE_BUFFER_SIZE {
            return Err(ProtocolError::Oversized {
                len: bytes.len(),
                capacity: MESSAGE_BUFFER_SIZE
            });
        }

        let mut reader = ByteReader::new(bytes);
        match reader.read_i32("tag")? {
            MESSAGE_TERMINATE => Ok(JobMessage::Terminate),
            MESSAGE_JOB => {
                let start = reader.read_f64("start")?;
                let end = reader.read_f64("end")?;
                let raw_steps = reader.read_u64("step_count")?;
                let step_count = usize::try_from(raw_steps)
                    .map_err(|_| ProtocolError::StepCountOutOfRange(raw_steps))?;
                Ok(JobMessage::Job(Partition::new(start, end, step_count)))
            },
            other => Err(ProtocolError::UnknownDiscriminant(other))
        }
    }
}
