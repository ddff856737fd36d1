use crate::flv::aac::{ChannelConfig, SampleRateIndex};
use crate::{Error, Result};

/// The FLV SoundFormat field, the audio codec id of a tag body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    LinearPcm = 0,
    Adpcm = 1,
    Mp3 = 2,
    LinearPcmLe = 3,
    Nellymoser16kHz = 4,
    Nellymoser8kHz = 5,
    Nellymoser = 6,
    G711Alaw = 7,
    G711Mulaw = 8,
    Reserved = 9,
    Aac = 10,
    Speex = 11,
    Undefined12 = 12,
    Undefined13 = 13,
    Mp38kHz = 14,
    DeviceSpecific = 15,
}

impl AudioCodec {
    /// The codec packed in the upper nibble of a tag body's first byte
    pub fn from_nibble(b: u8) -> Self {
        match b & 0x0F {
            0 => AudioCodec::LinearPcm,
            1 => AudioCodec::Adpcm,
            2 => AudioCodec::Mp3,
            3 => AudioCodec::LinearPcmLe,
            4 => AudioCodec::Nellymoser16kHz,
            5 => AudioCodec::Nellymoser8kHz,
            6 => AudioCodec::Nellymoser,
            7 => AudioCodec::G711Alaw,
            8 => AudioCodec::G711Mulaw,
            9 => AudioCodec::Reserved,
            10 => AudioCodec::Aac,
            11 => AudioCodec::Speex,
            12 => AudioCodec::Undefined12,
            13 => AudioCodec::Undefined13,
            14 => AudioCodec::Mp38kHz,
            _ => AudioCodec::DeviceSpecific,
        }
    }
}

/// The FLV SoundRate field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSamplingRate {
    Rate5kHz = 0,
    Rate11kHz = 1,
    Rate22kHz = 2,
    Rate44kHz = 3,
}

impl AudioSamplingRate {
    pub fn from_bits(b: u8) -> Self {
        match b & 0x03 {
            0 => AudioSamplingRate::Rate5kHz,
            1 => AudioSamplingRate::Rate11kHz,
            2 => AudioSamplingRate::Rate22kHz,
            _ => AudioSamplingRate::Rate44kHz,
        }
    }

    /// The FLV sampling rate in Hz
    pub fn to_hz(&self) -> u32 {
        match self {
            AudioSamplingRate::Rate5kHz => 5512,
            AudioSamplingRate::Rate11kHz => 11025,
            AudioSamplingRate::Rate22kHz => 22050,
            AudioSamplingRate::Rate44kHz => 44100,
        }
    }
}

impl From<SampleRateIndex> for AudioSamplingRate {
    /// Collapse the AAC sample-rate index onto the nearest FLV rate
    fn from(index: SampleRateIndex) -> Self {
        use SampleRateIndex::*;
        match index {
            Rate96kHz | Rate88kHz | Rate64kHz | Rate48kHz | Rate44kHz | Rate32kHz => {
                AudioSamplingRate::Rate44kHz
            }
            Rate24kHz | Rate22kHz | Rate16kHz => AudioSamplingRate::Rate22kHz,
            Rate12kHz | Rate11kHz | Rate8kHz => AudioSamplingRate::Rate11kHz,
            Rate7kHz => AudioSamplingRate::Rate5kHz,
        }
    }
}

/// The FLV SoundSize field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSampleBits {
    Bits8 = 0,
    Bits16 = 1,
}

impl AudioSampleBits {
    pub fn from_bit(b: u8) -> Self {
        if b & 0x01 == 0 {
            AudioSampleBits::Bits8
        } else {
            AudioSampleBits::Bits16
        }
    }
}

/// The FLV SoundType field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioChannels {
    Mono = 0,
    Stereo = 1,
}

impl AudioChannels {
    pub fn from_bit(b: u8) -> Self {
        if b & 0x01 == 0 {
            AudioChannels::Mono
        } else {
            AudioChannels::Stereo
        }
    }
}

impl From<ChannelConfig> for AudioChannels {
    /// Mono stays mono, every other AAC channel layout becomes stereo
    fn from(channels: ChannelConfig) -> Self {
        match channels {
            ChannelConfig::Mono => AudioChannels::Mono,
            _ => AudioChannels::Stereo,
        }
    }
}

/// The AAC frame trait byte: sequence header (ASC) or a raw frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AacFrameTrait {
    SequenceHeader = 0,
    Raw = 1,
}

impl AacFrameTrait {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0 => Ok(AacFrameTrait::SequenceHeader),
            1 => Ok(AacFrameTrait::Raw),
            _ => Err(Error::illegal_marker(format!(
                "AAC frame trait {} is illegal",
                b
            ))),
        }
    }
}

/// The decoded two-byte prefix of an AAC-in-FLV audio tag body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTagHeader {
    pub sound_format: AudioCodec,
    pub sound_rate: AudioSamplingRate,
    pub sound_size: AudioSampleBits,
    pub sound_type: AudioChannels,
    pub frame_trait: AacFrameTrait,
}

/// Encode an AAC frame into an FLV audio tag body.
pub fn encode_aac_tag(header: &AudioTagHeader, frame: &[u8]) -> Vec<u8> {
    let mut tag = Vec::with_capacity(2 + frame.len());
    tag.push(
        (header.sound_format as u8) << 4
            | (header.sound_rate as u8) << 2
            | (header.sound_size as u8) << 1
            | header.sound_type as u8,
    );
    tag.push(header.frame_trait as u8);
    tag.extend_from_slice(frame);
    tag
}

/// Decode an FLV audio tag body into its parameter prefix and AAC frame.
pub fn decode_aac_tag(tag: &[u8]) -> Result<(AudioTagHeader, &[u8])> {
    if tag.len() < 2 {
        return Err(Error::data_not_enough("audio tag needs 2 prefix bytes"));
    }

    let t = tag[0];
    let header = AudioTagHeader {
        sound_format: AudioCodec::from_nibble(t >> 4),
        sound_rate: AudioSamplingRate::from_bits(t >> 2),
        sound_size: AudioSampleBits::from_bit(t >> 1),
        sound_type: AudioChannels::from_bit(t),
        frame_trait: AacFrameTrait::from_byte(tag[1])?,
    };

    Ok((header, &tag[2..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aac_header(frame_trait: AacFrameTrait) -> AudioTagHeader {
        AudioTagHeader {
            sound_format: AudioCodec::Aac,
            sound_rate: AudioSamplingRate::Rate44kHz,
            sound_size: AudioSampleBits::Bits16,
            sound_type: AudioChannels::Stereo,
            frame_trait,
        }
    }

    #[test]
    fn test_encode_aac_tag() {
        // AAC(10)<<4 | 44kHz(3)<<2 | 16bit(1)<<1 | stereo(1) = 0xAF
        let tag = encode_aac_tag(&aac_header(AacFrameTrait::SequenceHeader), &[0x12, 0x10]);
        assert_eq!(tag, vec![0xAF, 0x00, 0x12, 0x10]);

        let tag = encode_aac_tag(&aac_header(AacFrameTrait::Raw), &[0x21]);
        assert_eq!(tag, vec![0xAF, 0x01, 0x21]);
    }

    #[test]
    fn test_decode_aac_tag() {
        let (header, frame) = decode_aac_tag(&[0xAF, 0x01, 0x21, 0x00]).unwrap();
        assert_eq!(header, aac_header(AacFrameTrait::Raw));
        assert_eq!(frame, &[0x21, 0x00]);
    }

    #[test]
    fn test_decode_aac_tag_round_trip() {
        let header = AudioTagHeader {
            sound_format: AudioCodec::Aac,
            sound_rate: AudioSamplingRate::Rate22kHz,
            sound_size: AudioSampleBits::Bits8,
            sound_type: AudioChannels::Mono,
            frame_trait: AacFrameTrait::Raw,
        };
        let frame = [1u8, 2, 3, 4];

        let tag = encode_aac_tag(&header, &frame);
        let (decoded, body) = decode_aac_tag(&tag).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(body, frame);
    }

    #[test]
    fn test_decode_short_tag() {
        assert!(matches!(
            decode_aac_tag(&[0xAF]),
            Err(Error::DataNotEnough(_))
        ));
    }

    #[test]
    fn test_sampling_rate_mapping() {
        use SampleRateIndex::*;

        for index in [Rate96kHz, Rate88kHz, Rate64kHz, Rate48kHz, Rate44kHz, Rate32kHz] {
            assert_eq!(AudioSamplingRate::from(index), AudioSamplingRate::Rate44kHz);
        }
        for index in [Rate24kHz, Rate22kHz, Rate16kHz] {
            assert_eq!(AudioSamplingRate::from(index), AudioSamplingRate::Rate22kHz);
        }
        for index in [Rate12kHz, Rate11kHz, Rate8kHz] {
            assert_eq!(AudioSamplingRate::from(index), AudioSamplingRate::Rate11kHz);
        }
        assert_eq!(AudioSamplingRate::from(Rate7kHz), AudioSamplingRate::Rate5kHz);
    }

    #[test]
    fn test_channel_mapping() {
        assert_eq!(AudioChannels::from(ChannelConfig::Mono), AudioChannels::Mono);
        for channels in [
            ChannelConfig::Stereo,
            ChannelConfig::Three,
            ChannelConfig::Four,
            ChannelConfig::Five,
            ChannelConfig::FiveOne,
            ChannelConfig::SevenOne,
        ] {
            assert_eq!(AudioChannels::from(channels), AudioChannels::Stereo);
        }
    }
}
