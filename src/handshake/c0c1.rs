use crate::utils::{current_timestamp, generate_random_bytes};
use crate::{ByteBuffer, Error, Result};

/// RTMP version carried in C0/S0
pub const RTMP_VERSION: u8 = 3;

/// Handshake packet size (C1/S1/C2/S2)
pub const HANDSHAKE_SIZE: usize = 1536;

/// Random payload size of C1/S1: everything after time and zero
pub const HANDSHAKE_RANDOM_SIZE: usize = HANDSHAKE_SIZE - 8;

/// Client handshake opener: the version byte C0 plus the C1 block.
#[derive(Debug, Clone)]
pub struct C0C1 {
    /// RTMP version (C0)
    pub version: u8,

    /// Timestamp (C1)
    pub timestamp: u32,

    /// Four zero bytes (C1)
    pub zero: u32,

    /// Pseudo-random payload (C1)
    pub random_data: Vec<u8>,
}

impl C0C1 {
    /// Create C0+C1 for a client
    pub fn create() -> Self {
        C0C1 {
            version: RTMP_VERSION,
            timestamp: current_timestamp(),
            zero: 0,
            random_data: generate_random_bytes(HANDSHAKE_RANDOM_SIZE),
        }
    }

    /// Parse C0+C1 from 1537 bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 1 + HANDSHAKE_SIZE {
            return Err(Error::handshake(format!(
                "C0+C1 too short: {} bytes, expected {}",
                data.len(),
                1 + HANDSHAKE_SIZE
            )));
        }

        let version = data[0];
        if version != RTMP_VERSION {
            return Err(Error::handshake(format!(
                "unsupported RTMP version: {}, expected {}",
                version, RTMP_VERSION
            )));
        }

        let mut buffer = ByteBuffer::new(data[1..1 + HANDSHAKE_SIZE].to_vec());
        let timestamp = buffer.read_u32_be()?;
        let zero = buffer.read_u32_be()?;
        let random_data = buffer.read_bytes(HANDSHAKE_RANDOM_SIZE)?;

        Ok(C0C1 {
            version,
            timestamp,
            zero,
            random_data,
        })
    }

    /// Encode to 1537 bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = ByteBuffer::with_capacity(1 + HANDSHAKE_SIZE);
        buffer.write_u8(self.version);
        buffer.write_u32_be(self.timestamp);
        buffer.write_u32_be(self.zero);
        buffer.write_bytes(&self.random_data);
        buffer.into_vec()
    }

    /// The raw C1 block, the 1536 bytes a server echoes back as S2
    pub fn c1_bytes(&self) -> Vec<u8> {
        let mut buffer = ByteBuffer::with_capacity(HANDSHAKE_SIZE);
        buffer.write_u32_be(self.timestamp);
        buffer.write_u32_be(self.zero);
        buffer.write_bytes(&self.random_data);
        buffer.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c0c1_creation() {
        let c0c1 = C0C1::create();
        assert_eq!(c0c1.version, RTMP_VERSION);
        assert_eq!(c0c1.zero, 0);
        assert_eq!(c0c1.random_data.len(), HANDSHAKE_RANDOM_SIZE);
    }

    #[test]
    fn test_c0c1_round_trip() {
        let original = C0C1::create();
        let bytes = original.encode();
        assert_eq!(bytes.len(), 1537);

        let parsed = C0C1::parse(&bytes).unwrap();
        assert_eq!(parsed.version, original.version);
        assert_eq!(parsed.timestamp, original.timestamp);
        assert_eq!(parsed.zero, original.zero);
        assert_eq!(parsed.random_data, original.random_data);
    }

    #[test]
    fn test_c0c1_rejects_bad_version() {
        let mut bytes = C0C1::create().encode();
        bytes[0] = 0x06;
        assert!(matches!(C0C1::parse(&bytes), Err(Error::Handshake(_))));
    }

    #[test]
    fn test_c1_bytes_length() {
        assert_eq!(C0C1::create().c1_bytes().len(), HANDSHAKE_SIZE);
    }
}
