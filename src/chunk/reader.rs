use crate::chunk::stream::ChunkStream;
use crate::protocol::constants::*;
use crate::protocol::RtmpMessage;
use crate::{Error, Result};
use log::trace;
use std::collections::HashMap;
use tokio::io::{AsyncRead, AsyncReadExt};

/// The message header size, indexed by format type.
const MESSAGE_HEADER_SIZES: [usize; 4] = [11, 7, 3, 0];

/// Demultiplexes a chunk stream back into logical messages.
///
/// The reader issues many small fixed-size reads; callers should hand it
/// a buffered transport.
pub struct ChunkReader {
    /// Chunk streams by cid, created lazily on first sight
    chunks: HashMap<u32, ChunkStream>,

    /// Incoming chunk size, updated by the peer's SetChunkSize
    chunk_size: u32,
}

impl ChunkReader {
    pub fn new() -> Self {
        ChunkReader {
            chunks: HashMap::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn set_chunk_size(&mut self, size: u32) {
        self.chunk_size = size;
    }

    /// Read chunks until one message completes.
    pub async fn read_message<R: AsyncRead + Unpin>(
        &mut self,
        reader: &mut R,
    ) -> Result<RtmpMessage> {
        loop {
            let (format, cid) = Self::read_basic_header(reader).await?;
            trace!("chunk basic header fmt={} cid={}", format, cid);

            let chunk_size = self.chunk_size;
            let chunk = self
                .chunks
                .entry(cid)
                .or_insert_with(|| ChunkStream::new(cid));

            Self::read_message_header(chunk, format, reader).await?;

            if let Some(message) = Self::read_message_payload(chunk, chunk_size, reader).await? {
                trace!(
                    "message complete type={} len={} ts={}",
                    message.header.message_type,
                    message.header.payload_length,
                    message.header.timestamp
                );
                return Ok(message);
            }
        }
    }

    /// Basic header: 2-bit fmt and a 6-bit cid, escaping to 2 or 3 bytes
    /// for cids 0 and 1.
    async fn read_basic_header<R: AsyncRead + Unpin>(reader: &mut R) -> Result<(u8, u32)> {
        let t = reader.read_u8().await?;
        let format = (t >> 6) & 0x03;
        let cid0 = (t & 0x3F) as u32;

        // 2-63: 1-byte form
        if cid0 > 1 {
            return Ok((format, cid0));
        }

        // 64-319: 2-byte form, cid = 64 + byte
        let b1 = reader.read_u8().await? as u32;
        if cid0 == 0 {
            return Ok((format, 64 + b1));
        }

        // 64-65599: 3-byte form, cid = 64 + byte1 + 256 * byte2
        let b2 = reader.read_u8().await? as u32;
        Ok((format, 64 + b1 + 256 * b2))
    }

    /// Parse the message header of one chunk and fold it into the
    /// per-cid baseline.
    async fn read_message_header<R: AsyncRead + Unpin>(
        chunk: &mut ChunkStream,
        format: u8,
        reader: &mut R,
    ) -> Result<()> {
        // The first chunk of a message carries or reapplies timing; a
        // continuation chunk of a partial message must not.
        let is_first_chunk_of_msg = chunk.message.is_none();

        // A fresh chunk stream must open with a full Type0 header. The
        // single tolerated exception: librtmp opens cid 2 with fmt=1
        // when it pings.
        if chunk.count == 0
            && format != 0
            && !(chunk.cid == CHUNK_STREAM_PROTOCOL && format == 1)
        {
            return Err(Error::chunk(format!(
                "for fresh chunk, fmt {} != 0(required), cid is {}",
                format, chunk.cid
            )));
        }

        // A partial message continues with Type1-3 only; Type0 starts
        // messages.
        if chunk.message.is_some() && format == 0 {
            return Err(Error::chunk(format!(
                "for existing chunk {}, fmt must not be 0",
                chunk.cid
            )));
        }

        if format <= 2 {
            let mut p = [0u8; 11];
            let header = &mut p[..MESSAGE_HEADER_SIZES[format as usize]];
            reader.read_exact(header).await?;

            // Timestamp for Type0, timestamp delta for Type1/2. The
            // sentinel defers the real value to the extended field.
            let field = (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32;
            chunk.extended_timestamp = field >= EXTENDED_TIMESTAMP;
            if !chunk.extended_timestamp {
                chunk.header.timestamp_delta = field;
            }

            if format <= 1 {
                let payload_length = (p[3] as u32) << 16 | (p[4] as u32) << 8 | p[5] as u32;

                // A Type1 header may change the length only between
                // messages, never inside one.
                if !is_first_chunk_of_msg && chunk.header.payload_length != payload_length {
                    return Err(Error::chunk(format!(
                        "chunk message size {} != {}(required)",
                        payload_length, chunk.header.payload_length
                    )));
                }
                chunk.header.payload_length = payload_length;
                chunk.header.message_type = p[6];

                if format == 0 {
                    chunk.header.stream_id = u32::from_le_bytes([p[7], p[8], p[9], p[10]]);
                }
            }
        }

        // Advance the timestamp on the first chunk of each message.
        if chunk.extended_timestamp {
            let mut p = [0u8; 4];
            reader.read_exact(&mut p).await?;
            let extended = u32::from_be_bytes(p) & TIMESTAMP_MASK;

            // Continuation chunks repeat the field; consume and ignore.
            if is_first_chunk_of_msg {
                match format {
                    // The extended value replaces the Type0 timestamp,
                    // and carries the delta for Type1/2.
                    0 | 3 => chunk.header.timestamp = extended,
                    _ => {
                        chunk.header.timestamp_delta = extended;
                        chunk.header.timestamp =
                            chunk.header.timestamp.wrapping_add(extended);
                    }
                }
            }
        } else if is_first_chunk_of_msg {
            match format {
                0 => chunk.header.timestamp = chunk.header.timestamp_delta,
                // Type3 opening a new message reapplies the last delta.
                _ => {
                    chunk.header.timestamp = chunk
                        .header
                        .timestamp
                        .wrapping_add(chunk.header.timestamp_delta)
                }
            }
        }
        chunk.header.timestamp &= TIMESTAMP_MASK;

        match chunk.message.as_mut() {
            None => chunk.message = Some(RtmpMessage::new(chunk.header)),
            Some(message) => message.header = chunk.header,
        }

        chunk.format = format;
        chunk.count += 1;

        Ok(())
    }

    /// Read up to one chunk of payload, returning the message once its
    /// declared length is reached.
    async fn read_message_payload<R: AsyncRead + Unpin>(
        chunk: &mut ChunkStream,
        chunk_size: u32,
        reader: &mut R,
    ) -> Result<Option<RtmpMessage>> {
        let message = match chunk.message.as_mut() {
            Some(message) => message,
            None => return Err(Error::chunk("payload read before any header")),
        };

        // Empty payload completes immediately.
        if message.header.payload_length == 0 {
            return Ok(chunk.message.take());
        }

        let remaining = message.header.payload_length as usize - message.payload.len();
        let chunked_payload_size = remaining.min(chunk_size as usize);

        let mut payload = vec![0u8; chunked_payload_size];
        reader.read_exact(&mut payload).await?;
        message.payload.extend_from_slice(&payload);

        if message.is_complete() {
            return Ok(chunk.message.take());
        }

        Ok(None)
    }
}

impl Default for ChunkReader {
    fn default() -> Self {
        ChunkReader::new()
    }
}
