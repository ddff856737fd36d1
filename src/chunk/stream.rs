use crate::protocol::{RtmpHeader, RtmpMessage};

/// Per-cid demux state: the running header baseline, the message being
/// reassembled, and how many messages this chunk stream has completed.
#[derive(Debug, Clone, Default)]
pub struct ChunkStream {
    /// Last seen chunk format type (0..=3)
    pub format: u8,

    /// Chunk stream id
    pub cid: u32,

    /// The running baseline applied to incomplete headers
    pub header: RtmpHeader,

    /// The partially reassembled message, if any
    pub message: Option<RtmpMessage>,

    /// Messages completed on this chunk stream
    pub count: u64,

    /// Whether the current message carries extended timestamps; sticky
    /// across its Type3 continuation chunks
    pub extended_timestamp: bool,
}

impl ChunkStream {
    pub fn new(cid: u32) -> Self {
        ChunkStream {
            cid,
            header: RtmpHeader {
                chunk_stream_id: cid,
                ..RtmpHeader::default()
            },
            ..ChunkStream::default()
        }
    }

    /// Whether a partial message is waiting for more chunks
    pub fn is_assembling(&self) -> bool {
        self.message.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_chunk_stream() {
        let chunk = ChunkStream::new(4);
        assert_eq!(chunk.cid, 4);
        assert_eq!(chunk.header.chunk_stream_id, 4);
        assert_eq!(chunk.count, 0);
        assert!(!chunk.is_assembling());
    }
}
