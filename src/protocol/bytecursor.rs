use super::protocolerror::ProtocolError;

/// Bounds-checked little-endian writer over a fixed-size buffer.
#[derive(Debug)]
pub struct ByteWriter<'a> {
    bytes: &'a mut [u8],
    offset: usize,
}

impl<'a> ByteWriter<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    fn write_exact(&mut self, src: &[u8], field: &'static str) -> Result<(), ProtocolError> {
        let needed = self.offset + src.len();
        if needed > self.bytes.len() {
            return Err(ProtocolError::BufferOverflow {
                field,
                needed,
                capacity: self.bytes.len(),
            });
        }
        self.bytes[self.offset..needed].copy_from_slice(src);
        self.offset = needed;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32, field: &'static str) -> Result<(), ProtocolError> {
        self.write_exact(&value.to_le_bytes(), field)
    }

    pub fn write_u64(&mut self, value: u64, field: &'static str) -> Result<(), ProtocolError> {
        self.write_exact(&value.to_le_bytes(), field)
    }

    pub fn write_f64(&mut self, value: f64, field: &'static str) -> Result<(), ProtocolError> {
        self.write_exact(&value.to_le_bytes(), field)
    }
}

/// Cursor over a byte slice providing structured little-endian reads.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], ProtocolError> {
        if N > self.remaining() {
            return Err(ProtocolError::UnexpectedEnd { field });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        Ok(out)
    }

    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, ProtocolError> {
        Ok(i32::from_le_bytes(self.read_array::<4>(field)?))
    }

    pub fn read_u64(&mut self, field: &'static str) -> Result<u64, ProtocolError> {
        Ok(u64::from_le_bytes(self.read_array::<8>(field)?))
    }

    pub fn read_f64(&mut self, field: &'static str) -> Result<f64, ProtocolError> {
        Ok(f64::from_le_bytes(self.read_array::<8>(field)?))
    }
}
