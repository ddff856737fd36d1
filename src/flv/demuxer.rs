use crate::flv::tag::{FlvTagType, FLV_TAG_HEADER_SIZE};
use crate::{Error, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads the FLV file header and tag stream from a transport.
///
/// The trailing PreviousTagSize of each tag is consumed and dropped.
pub struct FlvDemuxer<R> {
    reader: R,
}

impl<R: AsyncRead + Unpin> FlvDemuxer<R> {
    pub fn new(reader: R) -> Self {
        FlvDemuxer { reader }
    }

    /// Read the 13-byte FLV file header (including PreviousTagSize0).
    /// Returns the FLV version and whether the header flags video/audio.
    pub async fn read_header(&mut self) -> Result<(u8, bool, bool)> {
        let mut p = [0u8; 13];
        self.reader.read_exact(&mut p).await?;

        if &p[..3] != b"FLV" {
            return Err(Error::illegal_marker(format!(
                "FLV signature {:02x?} is illegal",
                &p[..3]
            )));
        }

        let version = p[3];
        let has_video = (p[4] & 0x01) == 0x01;
        let has_audio = ((p[4] >> 2) & 0x01) == 0x01;

        Ok((version, has_video, has_audio))
    }

    /// Read the 11-byte tag header: tag type, body size and timestamp.
    pub async fn read_tag_header(&mut self) -> Result<(FlvTagType, u32, u32)> {
        let mut p = [0u8; FLV_TAG_HEADER_SIZE];
        self.reader.read_exact(&mut p).await?;

        let tag_type = FlvTagType::from_byte(p[0])?;
        let tag_size = (p[1] as u32) << 16 | (p[2] as u32) << 8 | p[3] as u32;
        // The fourth timestamp byte carries the high bits.
        let timestamp =
            (p[7] as u32) << 24 | (p[4] as u32) << 16 | (p[5] as u32) << 8 | p[6] as u32;

        Ok((tag_type, tag_size, timestamp))
    }

    /// Read the tag body, dropping the trailing 4-byte PreviousTagSize.
    pub async fn read_tag(&mut self, tag_size: u32) -> Result<Vec<u8>> {
        let mut body = vec![0u8; tag_size as usize + 4];
        self.reader.read_exact(&mut body).await?;

        body.truncate(tag_size as usize);
        Ok(body)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
