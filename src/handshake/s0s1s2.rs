use crate::handshake::c0c1::{C0C1, HANDSHAKE_RANDOM_SIZE, HANDSHAKE_SIZE, RTMP_VERSION};
use crate::utils::{current_timestamp, generate_random_bytes};
use crate::{ByteBuffer, Error, Result};

/// Server handshake response: version byte S0, fresh S1, and S2 echoing
/// the client's C1.
#[derive(Debug, Clone)]
pub struct S0S1S2 {
    /// RTMP version (S0)
    pub version: u8,

    /// S1 timestamp
    pub s1_timestamp: u32,

    /// S1 zero field
    pub s1_zero: u32,

    /// S1 pseudo-random payload
    pub s1_random: Vec<u8>,

    /// S2: the peer's C1 block echoed verbatim
    pub s2_echo: Vec<u8>,
}

impl S0S1S2 {
    /// Generate the response to a parsed C0+C1
    pub fn generate(c0c1: &C0C1) -> Self {
        S0S1S2 {
            version: RTMP_VERSION,
            s1_timestamp: current_timestamp(),
            s1_zero: 0,
            s1_random: generate_random_bytes(HANDSHAKE_RANDOM_SIZE),
            s2_echo: c0c1.c1_bytes(),
        }
    }

    /// Parse S0+S1+S2 from 3073 bytes, on the client side
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 1 + 2 * HANDSHAKE_SIZE {
            return Err(Error::handshake(format!(
                "S0+S1+S2 too short: {} bytes, expected {}",
                data.len(),
                1 + 2 * HANDSHAKE_SIZE
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
        let s1_timestamp = buffer.read_u32_be()?;
        let s1_zero = buffer.read_u32_be()?;
        let s1_random = buffer.read_bytes(HANDSHAKE_RANDOM_SIZE)?;

        let s2_echo = data[1 + HANDSHAKE_SIZE..1 + 2 * HANDSHAKE_SIZE].to_vec();

        Ok(S0S1S2 {
            version,
            s1_timestamp,
            s1_zero,
            s1_random,
            s2_echo,
        })
    }

    /// Encode to 3073 bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = ByteBuffer::with_capacity(1 + 2 * HANDSHAKE_SIZE);
        buffer.write_u8(self.version);
        buffer.write_u32_be(self.s1_timestamp);
        buffer.write_u32_be(self.s1_zero);
        buffer.write_bytes(&self.s1_random);
        buffer.write_bytes(&self.s2_echo);
        buffer.into_vec()
    }

    /// The raw S1 block, the 1536 bytes a client echoes back as C2
    pub fn s1_bytes(&self) -> Vec<u8> {
        let mut buffer = ByteBuffer::with_capacity(HANDSHAKE_SIZE);
        buffer.write_u32_be(self.s1_timestamp);
        buffer.write_u32_be(self.s1_zero);
        buffer.write_bytes(&self.s1_random);
        buffer.into_vec()
    }
}

/// The final handshake packet: an echo of the peer's S1.
#[derive(Debug, Clone)]
pub struct C2 {
    pub echo: Vec<u8>,
}

impl C2 {
    /// Create C2 by echoing S1
    pub fn from_s1(s0s1s2: &S0S1S2) -> Self {
        C2 {
            echo: s0s1s2.s1_bytes(),
        }
    }

    /// Parse C2 from 1536 bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HANDSHAKE_SIZE {
            return Err(Error::handshake(format!(
                "C2 too short: {} bytes, expected {}",
                data.len(),
                HANDSHAKE_SIZE
            )));
        }

        Ok(C2 {
            echo: data[..HANDSHAKE_SIZE].to_vec(),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        self.echo.clone()
    }

    /// Check the echo against the S1 we sent
    pub fn validate(&self, s0s1s2: &S0S1S2) -> Result<()> {
        if self.echo != s0s1s2.s1_bytes() {
            return Err(Error::handshake("C2 echo mismatch"));
        }
        Ok(())
    }
}
