use crate::flv::tag::{FlvTagType, FLV_TAG_HEADER_SIZE};
use crate::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes the FLV file header and tag stream to a transport.
pub struct FlvMuxer<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FlvMuxer<W> {
    pub fn new(writer: W) -> Self {
        FlvMuxer { writer }
    }

    /// Write the FLV file header, including PreviousTagSize0.
    pub async fn write_header(&mut self, has_video: bool, has_audio: bool) -> Result<()> {
        let mut flags = 0u8;
        if has_video {
            flags |= 0x01;
        }
        if has_audio {
            flags |= 0x04;
        }

        let header = [
            b'F', b'L', b'V', 0x01, flags, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00,
        ];
        self.writer.write_all(&header).await?;

        Ok(())
    }

    /// Write one tag: 11-byte header, body, trailing PreviousTagSize.
    pub async fn write_tag(
        &mut self,
        tag_type: FlvTagType,
        timestamp: u32,
        tag: &[u8],
    ) -> Result<()> {
        let tag_size = tag.len() as u32;

        let header = [
            tag_type.as_byte(),
            (tag_size >> 16) as u8,
            (tag_size >> 8) as u8,
            tag_size as u8,
            (timestamp >> 16) as u8,
            (timestamp >> 8) as u8,
            timestamp as u8,
            (timestamp >> 24) as u8,
            0x00, // stream id, reserved
            0x00,
            0x00,
        ];
        self.writer.write_all(&header).await?;
        self.writer.write_all(tag).await?;

        let previous_tag_size = FLV_TAG_HEADER_SIZE as u32 + tag_size;
        self.writer
            .write_all(&previous_tag_size.to_be_bytes())
            .await?;

        Ok(())
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
