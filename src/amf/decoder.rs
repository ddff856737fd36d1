use crate::amf::amf0::{check_marker, marker_name, markers, Amf0EcmaArray, Amf0Object, Amf0Value};
use crate::{ByteBuffer, Error, Result};

pub struct Amf0Decoder<'a> {
    buffer: &'a mut ByteBuffer,
}

impl<'a> Amf0Decoder<'a> {
    pub fn new(buffer: &'a mut ByteBuffer) -> Self {
        Amf0Decoder { buffer }
    }

    /// Check if decoder has remaining data to decode
    pub fn has_remaining(&self) -> bool {
        self.buffer.remaining() > 0
    }

    /// Decode a single value, dispatching on the leading marker byte
    pub fn decode(&mut self) -> Result<Amf0Value> {
        let marker = self.buffer.read_u8()?;
        check_marker(marker)?;

        match marker {
            markers::NUMBER => self.decode_number(),
            markers::BOOLEAN => self.decode_boolean(),
            markers::STRING => self.decode_string(),
            markers::OBJECT => self.decode_object(),
            markers::NULL => Ok(Amf0Value::Null),
            markers::UNDEFINED => Ok(Amf0Value::Undefined),
            markers::ECMA_ARRAY => self.decode_ecma_array(),
            markers::STRICT_ARRAY => self.decode_strict_array(),
            _ => unreachable!("marker {} passed check_marker", marker_name(marker)),
        }
    }

    /// Decode values until the buffer is exhausted
    pub fn decode_all(&mut self) -> Result<Vec<Amf0Value>> {
        let mut values = Vec::new();
        while self.has_remaining() {
            values.push(self.decode()?);
        }
        Ok(values)
    }

    fn decode_number(&mut self) -> Result<Amf0Value> {
        let value = self.buffer.read_f64_be()?;
        Ok(Amf0Value::Number(value))
    }

    fn decode_boolean(&mut self) -> Result<Amf0Value> {
        let value = self.buffer.read_u8()? != 0;
        Ok(Amf0Value::Boolean(value))
    }

    fn decode_string(&mut self) -> Result<Amf0Value> {
        Ok(Amf0Value::String(self.decode_utf8()?))
    }

    fn decode_object(&mut self) -> Result<Amf0Value> {
        let properties = self.decode_properties()?;
        Ok(Amf0Value::Object(properties))
    }

    fn decode_ecma_array(&mut self) -> Result<Amf0Value> {
        // The declared count is advisory; termination is by object end.
        let count = self.buffer.read_u32_be()?;
        let properties = self.decode_properties()?;
        Ok(Amf0Value::EcmaArray(Amf0EcmaArray { count, properties }))
    }

    fn decode_strict_array(&mut self) -> Result<Amf0Value> {
        // Exactly count values, no terminator.
        let count = self.buffer.read_u32_be()? as usize;
        let mut values = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            values.push(self.decode()?);
        }
        Ok(Amf0Value::StrictArray(values))
    }

    /// Decode (key, value) pairs until the object-end sentinel: a
    /// zero-length key followed by marker 9.
    fn decode_properties(&mut self) -> Result<Amf0Object> {
        let mut object = Amf0Object::new();
        loop {
            let key = self.decode_utf8_key()?;
            if key.is_empty() {
                let marker = self.buffer.read_u8()?;
                if marker != markers::OBJECT_END {
                    return Err(Error::illegal_marker(format!(
                        "object end marker {} is illegal",
                        marker_name(marker)
                    )));
                }
                break;
            }
            let value = self.decode()?;
            object.set(key, value);
        }
        Ok(object)
    }

    /// A marker-prefixed UTF8 string
    fn decode_utf8(&mut self) -> Result<String> {
        self.decode_utf8_key()
    }

    /// A bare UTF8 string: u16 big-endian length then bytes
    fn decode_utf8_key(&mut self) -> Result<String> {
        let len = self.buffer.read_u16_be()? as usize;
        let bytes = self.buffer.read_bytes(len)?;
        String::from_utf8(bytes)
            .map_err(|e| Error::protocol(format!("invalid UTF-8 in string: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amf::Amf0Encoder;

    fn decode_one(data: Vec<u8>) -> Result<Amf0Value> {
        let mut buffer = ByteBuffer::new(data);
        Amf0Decoder::new(&mut buffer).decode()
    }

    #[test]
    fn test_decode_number() {
        let data = vec![0x00, 0x40, 0x09, 0x1E, 0xB8, 0x51, 0xEB, 0x85, 0x1F];
        assert_eq!(decode_one(data).unwrap(), Amf0Value::Number(3.14));
    }

    #[test]
    fn test_decode_string() {
        let data = vec![0x02, 0x00, 0x02, 0x68, 0x69];
        assert_eq!(decode_one(data).unwrap(), Amf0Value::String("hi".to_string()));
    }

    #[test]
    fn test_decode_object() {
        let data = vec![
            0x03, 0x00, 0x01, 0x61, 0x00, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x09,
        ];
        let value = decode_one(data).unwrap();
        assert_eq!(value.as_object().unwrap().get("a"), Some(&Amf0Value::Number(1.0)));
    }

    #[test]
    fn test_decode_unsupported_markers() {
        // Date, LongString, XmlDocument, TypedObject are recognized but not implemented
        for marker in [0x0B, 0x0C, 0x0F, 0x10] {
            match decode_one(vec![marker, 0x00]) {
                Err(Error::Unsupported(_)) => {}
                other => panic!("marker {:#x}: expected Unsupported, got {:?}", marker, other),
            }
        }
    }

    #[test]
    fn test_decode_illegal_markers() {
        for marker in [0x04, 0x0E, 0x12, 0xFF] {
            match decode_one(vec![marker]) {
                Err(Error::IllegalMarker(_)) => {}
                other => panic!("marker {:#x}: expected IllegalMarker, got {:?}", marker, other),
            }
        }
    }

    #[test]
    fn test_decode_bare_object_end() {
        // A stray object-end sentinel is not a value
        assert!(matches!(
            decode_one(vec![0x09]),
            Err(Error::IllegalMarker(_))
        ));
    }

    #[test]
    fn test_decode_short_input() {
        assert!(matches!(
            decode_one(vec![0x00, 0x40, 0x09]),
            Err(Error::DataNotEnough(_))
        ));
        assert!(matches!(
            decode_one(vec![0x02, 0x00, 0x05, 0x68]),
            Err(Error::DataNotEnough(_))
        ));
        // Truncated object: key read runs dry before the sentinel
        assert!(matches!(
            decode_one(vec![0x03, 0x00, 0x01, 0x61]),
            Err(Error::DataNotEnough(_))
        ));
    }

    #[test]
    fn test_decode_all_round_trip() {
        let mut obj = Amf0Object::new();
        obj.set("app", Amf0Value::String("live".to_string()));
        obj.set("ok", Amf0Value::Boolean(true));

        let values = vec![
            Amf0Value::String("connect".to_string()),
            Amf0Value::Number(1.0),
            Amf0Value::Object(obj),
            Amf0Value::Null,
        ];

        let mut encoder = Amf0Encoder::new();
        for v in &values {
            encoder.encode(v);
        }

        let mut buffer = ByteBuffer::new(encoder.into_vec());
        let decoded = Amf0Decoder::new(&mut buffer).decode_all().unwrap();
        assert_eq!(decoded, values);
    }
}
