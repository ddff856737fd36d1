use crate::protocol::constants::*;
use crate::protocol::RtmpMessage;
use crate::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Multiplexes logical messages onto the chunk stream.
///
/// Each message is assembled into one buffer and flushed with a single
/// write: a Type0 header, then Type3 continuations every `chunk_size`
/// payload bytes.
pub struct ChunkWriter {
    /// Outgoing chunk size
    chunk_size: u32,
}

impl ChunkWriter {
    pub fn new() -> Self {
        ChunkWriter {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn set_chunk_size(&mut self, size: u32) {
        self.chunk_size = size;
    }

    /// Chunk a message and write it out, flushing once.
    pub async fn write_message<W: AsyncWrite + Unpin>(
        &self,
        writer: &mut W,
        message: &RtmpMessage,
    ) -> Result<()> {
        let chunks = self.assemble_chunks(message);
        writer.write_all(&chunks).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Build the full chunk sequence of one message.
    pub fn assemble_chunks(&self, message: &RtmpMessage) -> Vec<u8> {
        let c0 = Self::type0_header(message);
        let c3 = Self::type3_header(message);

        let mut out = Vec::with_capacity(c0.len() + message.payload.len());
        let mut payload = message.payload.as_slice();
        let mut first = true;

        loop {
            out.extend_from_slice(if first { &c0 } else { &c3 });
            first = false;

            let size = payload.len().min(self.chunk_size as usize);
            out.extend_from_slice(&payload[..size]);
            payload = &payload[size..];

            if payload.is_empty() {
                break;
            }
        }

        out
    }

    /// Basic header: 1-byte form for cids 2-63, 2- and 3-byte escape
    /// forms above that.
    fn basic_header(format: u8, cid: u32, out: &mut Vec<u8>) {
        if cid <= 63 {
            out.push(format << 6 | cid as u8);
        } else if cid <= 319 {
            out.push(format << 6);
            out.push((cid - 64) as u8);
        } else {
            out.push(format << 6 | 1);
            let id = cid - 64;
            out.push((id & 0xFF) as u8);
            out.push((id >> 8) as u8);
        }
    }

    /// The full Type0 header opening a message.
    fn type0_header(message: &RtmpMessage) -> Vec<u8> {
        let header = &message.header;
        let mut out = Vec::with_capacity(3 + 11 + 4);

        Self::basic_header(0, header.chunk_stream_id, &mut out);

        if header.has_extended_timestamp() {
            out.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        } else {
            out.push((header.timestamp >> 16) as u8);
            out.push((header.timestamp >> 8) as u8);
            out.push(header.timestamp as u8);
        }

        out.push((header.payload_length >> 16) as u8);
        out.push((header.payload_length >> 8) as u8);
        out.push(header.payload_length as u8);

        out.push(header.message_type);
        out.extend_from_slice(&header.stream_id.to_le_bytes());

        if header.has_extended_timestamp() {
            out.extend_from_slice(&header.timestamp.to_be_bytes());
        }

        out
    }

    /// The Type3 continuation header. The chunk format defines no
    /// timestamp here, but FMS, Flash and FMLE all repeat the extended
    /// timestamp after a Type3 basic header, so interoperable writers
    /// do too.
    fn type3_header(message: &RtmpMessage) -> Vec<u8> {
        let header = &message.header;
        let mut out = Vec::with_capacity(3 + 4);

        Self::basic_header(3, header.chunk_stream_id, &mut out);

        if header.has_extended_timestamp() {
            out.extend_from_slice(&header.timestamp.to_be_bytes());
        }

        out
    }
}

impl Default for ChunkWriter {
    fn default() -> Self {
        ChunkWriter::new()
    }
}
