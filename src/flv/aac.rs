use crate::{Error, Result};

/// AAC sampling frequency index, as carried in the AudioSpecificConfig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRateIndex {
    Rate96kHz = 0,
    Rate88kHz = 1,
    Rate64kHz = 2,
    Rate48kHz = 3,
    Rate44kHz = 4,
    Rate32kHz = 5,
    Rate24kHz = 6,
    Rate22kHz = 7,
    Rate16kHz = 8,
    Rate12kHz = 9,
    Rate11kHz = 10,
    Rate8kHz = 11,
    Rate7kHz = 12,
}

impl SampleRateIndex {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0 => Ok(SampleRateIndex::Rate96kHz),
            1 => Ok(SampleRateIndex::Rate88kHz),
            2 => Ok(SampleRateIndex::Rate64kHz),
            3 => Ok(SampleRateIndex::Rate48kHz),
            4 => Ok(SampleRateIndex::Rate44kHz),
            5 => Ok(SampleRateIndex::Rate32kHz),
            6 => Ok(SampleRateIndex::Rate24kHz),
            7 => Ok(SampleRateIndex::Rate22kHz),
            8 => Ok(SampleRateIndex::Rate16kHz),
            9 => Ok(SampleRateIndex::Rate12kHz),
            10 => Ok(SampleRateIndex::Rate11kHz),
            11 => Ok(SampleRateIndex::Rate8kHz),
            12 => Ok(SampleRateIndex::Rate7kHz),
            _ => Err(Error::unsupported(format!(
                "sample rate index {} is not supported",
                b
            ))),
        }
    }

    pub fn to_hz(&self) -> u32 {
        const RATES: [u32; 13] = [
            96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000,
            7350,
        ];
        RATES[*self as usize]
    }
}

/// AAC channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelConfig {
    Mono = 1,
    Stereo = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    FiveOne = 6,
    SevenOne = 7,
}

impl ChannelConfig {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            1 => Ok(ChannelConfig::Mono),
            2 => Ok(ChannelConfig::Stereo),
            3 => Ok(ChannelConfig::Three),
            4 => Ok(ChannelConfig::Four),
            5 => Ok(ChannelConfig::Five),
            6 => Ok(ChannelConfig::FiveOne),
            7 => Ok(ChannelConfig::SevenOne),
            _ => Err(Error::unsupported(format!(
                "channel configuration {} is not supported",
                b
            ))),
        }
    }
}

/// AAC audio object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Main = 1,
    Lc = 2,
    Ssr = 3,
    He = 5,    // HE = LC + SBR
    HeV2 = 29, // HEv2 = LC + SBR + PS
}

impl ObjectType {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            1 => Ok(ObjectType::Main),
            2 => Ok(ObjectType::Lc),
            3 => Ok(ObjectType::Ssr),
            5 => Ok(ObjectType::He),
            29 => Ok(ObjectType::HeV2),
            _ => Err(Error::unsupported(format!(
                "AAC object type {} is not supported",
                b
            ))),
        }
    }

    pub fn to_profile(&self) -> Profile {
        match self {
            ObjectType::Main => Profile::Main,
            ObjectType::Lc | ObjectType::He | ObjectType::HeV2 => Profile::Lc,
            ObjectType::Ssr => Profile::Ssr,
        }
    }
}

/// The AAC profile as written in an ADTS header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Main = 0,
    Lc = 1,
    Ssr = 2,
}

/// The codec parameters carried by the 2-byte AAC sequence header.
///
/// Only the leading fields are decoded: 5 bits object type, 4 bits
/// sampling frequency index, 4 bits channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpecificConfig {
    pub object_type: ObjectType,
    pub sample_rate_index: SampleRateIndex,
    pub channels: ChannelConfig,
}

impl AudioSpecificConfig {
    pub fn parse(asc: &[u8]) -> Result<Self> {
        if asc.len() < 2 {
            return Err(Error::data_not_enough("ASC needs 2 bytes"));
        }

        let (t0, t1) = (asc[0], asc[1]);

        let object_type = ObjectType::from_byte((t0 >> 3) & 0x1F)?;
        let sample_rate_index = SampleRateIndex::from_byte(((t0 << 1) & 0x0E) | ((t1 >> 7) & 0x01))?;
        let channels = ChannelConfig::from_byte((t1 >> 3) & 0x0F)?;

        Ok(AudioSpecificConfig {
            object_type,
            sample_rate_index,
            channels,
        })
    }
}

/// Wraps raw AAC frames into ADTS frames, using the codec parameters of
/// a previously supplied sequence header.
#[derive(Debug, Default)]
pub struct AdtsEncoder {
    config: Option<AudioSpecificConfig>,
}

impl AdtsEncoder {
    pub fn new() -> Self {
        AdtsEncoder::default()
    }

    /// Set the codec parameters from an AAC sequence header
    pub fn set_asc(&mut self, asc: &[u8]) -> Result<()> {
        self.config = Some(AudioSpecificConfig::parse(asc)?);
        Ok(())
    }

    pub fn asc(&self) -> Option<&AudioSpecificConfig> {
        self.config.as_ref()
    }

    /// Prefix a raw AAC frame with the 7-byte protection-absent ADTS header
    pub fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let config = self
            .config
            .ok_or_else(|| Error::protocol("ASC must be set before encoding ADTS"))?;

        let profile = config.object_type.to_profile() as u8;
        let sample_rate = config.sample_rate_index as u8;
        let channels = config.channels as u8;
        let frame_length = (raw.len() + 7) as u16;

        let mut adts = Vec::with_capacity(7 + raw.len());
        // syncword, ID, layer, protection_absent
        adts.push(0xFF);
        adts.push(0xF1);
        adts.push((profile << 6) & 0xC0 | (sample_rate << 2) & 0x3C | (channels >> 2) & 0x01);
        adts.push((channels << 6) & 0xC0 | ((frame_length >> 11) as u8 & 0x03));
        adts.push((frame_length >> 3) as u8);
        adts.push(((frame_length << 5) as u8) & 0xE0 | 0x1F);
        adts.push(0xFC);
        adts.extend_from_slice(raw);

        Ok(adts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_asc() {
        // AAC LC, 44.1kHz (index 4), stereo: 0x12 0x10
        let config = AudioSpecificConfig::parse(&[0x12, 0x10]).unwrap();
        assert_eq!(config.object_type, ObjectType::Lc);
        assert_eq!(config.sample_rate_index, SampleRateIndex::Rate44kHz);
        assert_eq!(config.channels, ChannelConfig::Stereo);
        assert_eq!(config.sample_rate_index.to_hz(), 44100);
    }

    #[test]
    fn test_parse_asc_short() {
        assert!(matches!(
            AudioSpecificConfig::parse(&[0x12]),
            Err(Error::DataNotEnough(_))
        ));
    }

    #[test]
    fn test_adts_requires_asc() {
        let encoder = AdtsEncoder::new();
        assert!(matches!(encoder.encode(&[0x21]), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_adts_header() {
        let mut encoder = AdtsEncoder::new();
        encoder.set_asc(&[0x12, 0x10]).unwrap();

        let raw = vec![0u8; 3];
        let adts = encoder.encode(&raw).unwrap();
        assert_eq!(adts.len(), 10);

        // Syncword and protection_absent
        assert_eq!(adts[0], 0xFF);
        assert_eq!(adts[1], 0xF1);
        // Profile LC(1)<<6, sample rate index 4<<2
        assert_eq!(adts[2], 0x50);
        // Channels 2<<6, frame length 10 has no high bits
        assert_eq!(adts[3], 0x80);
        // Frame length 10: bits 10>>3=1, (10<<5)&0xE0=0x40, fullness all-ones
        assert_eq!(adts[4], 0x01);
        assert_eq!(adts[5], 0x40 | 0x1F);
        assert_eq!(adts[6], 0xFC);
    }
}
