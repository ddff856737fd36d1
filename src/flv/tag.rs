use crate::{Error, Result};

/// FLV file header length, excluding the leading PreviousTagSize0
pub const FLV_HEADER_SIZE: usize = 9;

/// FLV tag header length
pub const FLV_TAG_HEADER_SIZE: usize = 11;

/// FLV tag type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlvTagType {
    Audio = 8,
    Video = 9,
    Script = 18,
}

impl FlvTagType {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            8 => Ok(FlvTagType::Audio),
            9 => Ok(FlvTagType::Video),
            18 => Ok(FlvTagType::Script),
            _ => Err(Error::illegal_marker(format!("tag type {} is illegal", b))),
        }
    }

    pub fn as_byte(&self) -> u8 {
        *self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_type_round_trip() {
        for tag_type in [FlvTagType::Audio, FlvTagType::Video, FlvTagType::Script] {
            assert_eq!(FlvTagType::from_byte(tag_type.as_byte()).unwrap(), tag_type);
        }
        assert!(FlvTagType::from_byte(0).is_err());
        assert!(FlvTagType::from_byte(10).is_err());
    }
}
