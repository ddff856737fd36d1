use crate::protocol::constants::DEFAULT_CHUNK_SIZE;
use crate::{ByteBuffer, Error, Result};

/// Protocol control message 1: notify the peer of a new maximum chunk size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetChunkSize {
    pub chunk_size: u32,
}

impl SetChunkSize {
    pub fn new(chunk_size: u32) -> Self {
        SetChunkSize { chunk_size }
    }

    pub fn size(&self) -> usize {
        4
    }

    pub fn marshal(&self) -> Vec<u8> {
        self.chunk_size.to_be_bytes().to_vec()
    }

    pub fn unmarshal(data: &[u8]) -> Result<Self> {
        let mut buffer = ByteBuffer::new(data.to_vec());
        Ok(SetChunkSize {
            chunk_size: buffer.read_u32_be()?,
        })
    }
}

impl Default for SetChunkSize {
    fn default() -> Self {
        SetChunkSize {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Protocol control message 5: the acknowledgement window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowAckSize {
    pub ack_size: u32,
}

impl WindowAckSize {
    pub fn new(ack_size: u32) -> Self {
        WindowAckSize { ack_size }
    }

    pub fn size(&self) -> usize {
        4
    }

    pub fn marshal(&self) -> Vec<u8> {
        self.ack_size.to_be_bytes().to_vec()
    }

    pub fn unmarshal(data: &[u8]) -> Result<Self> {
        let mut buffer = ByteBuffer::new(data.to_vec());
        Ok(WindowAckSize {
            ack_size: buffer.read_u32_be()?,
        })
    }
}

/// The limit type of a SetPeerBandwidth message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitType {
    #[default]
    Hard = 0,
    Soft = 1,
    Dynamic = 2,
}

impl LimitType {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0 => Ok(LimitType::Hard),
            1 => Ok(LimitType::Soft),
            2 => Ok(LimitType::Dynamic),
            _ => Err(Error::unsupported(format!("limit type {} is not supported", b))),
        }
    }
}

/// Protocol control message 6: update the output bandwidth of the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetPeerBandwidth {
    pub bandwidth: u32,
    pub limit_type: LimitType,
}

impl SetPeerBandwidth {
    pub fn new(bandwidth: u32, limit_type: LimitType) -> Self {
        SetPeerBandwidth {
            bandwidth,
            limit_type,
        }
    }

    pub fn size(&self) -> usize {
        4 + 1
    }

    pub fn marshal(&self) -> Vec<u8> {
        let mut data = self.bandwidth.to_be_bytes().to_vec();
        data.push(self.limit_type as u8);
        data
    }

    pub fn unmarshal(data: &[u8]) -> Result<Self> {
        let mut buffer = ByteBuffer::new(data.to_vec());
        let bandwidth = buffer.read_u32_be()?;
        let limit_type = LimitType::from_byte(buffer.read_u8()?)?;
        Ok(SetPeerBandwidth {
            bandwidth,
            limit_type,
        })
    }
}

/// A user control event: a 2-byte event type and its event data.
///
/// Event payloads are not interpreted; the type is decoded so that a
/// librtmp ping arriving mid-stream never fails the reader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserControl {
    pub event_type: u16,
    pub event_data: Vec<u8>,
}

impl UserControl {
    pub fn size(&self) -> usize {
        2 + self.event_data.len()
    }

    pub fn marshal(&self) -> Vec<u8> {
        let mut data = self.event_type.to_be_bytes().to_vec();
        data.extend_from_slice(&self.event_data);
        data
    }

    pub fn unmarshal(data: &[u8]) -> Result<Self> {
        let mut buffer = ByteBuffer::new(data.to_vec());
        let event_type = buffer.read_u16_be()?;
        let event_data = buffer.read_bytes(buffer.remaining())?;
        Ok(UserControl {
            event_type,
            event_data,
        })
    }
}
