use crate::amf::amf0::{markers, Amf0Object, Amf0Value};
use crate::ByteBuffer;

pub struct Amf0Encoder {
    buffer: ByteBuffer,
}

impl Amf0Encoder {
    pub fn new() -> Self {
        Amf0Encoder {
            buffer: ByteBuffer::with_capacity(1024),
        }
    }

    pub fn encode(&mut self, value: &Amf0Value) {
        match value {
            Amf0Value::Number(n) => self.encode_number(*n),
            Amf0Value::Boolean(b) => self.encode_boolean(*b),
            Amf0Value::String(s) => self.encode_string(s),
            Amf0Value::Object(obj) => self.encode_object(obj),
            Amf0Value::EcmaArray(arr) => self.encode_ecma_array(arr.count, &arr.properties),
            Amf0Value::StrictArray(values) => self.encode_strict_array(values),
            Amf0Value::Null => self.buffer.write_u8(markers::NULL),
            Amf0Value::Undefined => self.buffer.write_u8(markers::UNDEFINED),
        }
    }

    pub fn encode_all(&mut self, values: &[Amf0Value]) {
        for value in values {
            self.encode(value);
        }
    }

    fn encode_number(&mut self, value: f64) {
        self.buffer.write_u8(markers::NUMBER);
        self.buffer.write_f64_be(value);
    }

    fn encode_boolean(&mut self, value: bool) {
        self.buffer.write_u8(markers::BOOLEAN);
        self.buffer.write_u8(if value { 1 } else { 0 });
    }

    fn encode_string(&mut self, value: &str) {
        self.buffer.write_u8(markers::STRING);
        self.encode_utf8(value);
    }

    fn encode_object(&mut self, obj: &Amf0Object) {
        self.buffer.write_u8(markers::OBJECT);
        self.encode_properties(obj);
        self.encode_object_end();
    }

    fn encode_ecma_array(&mut self, count: u32, obj: &Amf0Object) {
        self.buffer.write_u8(markers::ECMA_ARRAY);
        self.buffer.write_u32_be(count);
        self.encode_properties(obj);
        self.encode_object_end();
    }

    fn encode_strict_array(&mut self, values: &[Amf0Value]) {
        self.buffer.write_u8(markers::STRICT_ARRAY);
        self.buffer.write_u32_be(values.len() as u32);
        for value in values {
            self.encode(value);
        }
    }

    fn encode_properties(&mut self, obj: &Amf0Object) {
        for (key, value) in obj.iter() {
            self.encode_utf8(key);
            self.encode(value);
        }
    }

    fn encode_object_end(&mut self) {
        self.buffer.write_u16_be(0);
        self.buffer.write_u8(markers::OBJECT_END);
    }

    /// A bare UTF8 string: u16 big-endian length then bytes
    fn encode_utf8(&mut self, value: &str) {
        self.buffer.write_u16_be(value.len() as u16);
        self.buffer.write_bytes(value.as_bytes());
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer.into_vec()
    }
}

impl Default for Amf0Encoder {
    fn default() -> Self {
        Amf0Encoder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amf::{Amf0Decoder, Amf0EcmaArray};

    fn encode_one(value: &Amf0Value) -> Vec<u8> {
        let mut encoder = Amf0Encoder::new();
        encoder.encode(value);
        encoder.into_vec()
    }

    #[test]
    fn test_encode_number() {
        assert_eq!(
            encode_one(&Amf0Value::Number(3.14)),
            vec![0x00, 0x40, 0x09, 0x1E, 0xB8, 0x51, 0xEB, 0x85, 0x1F]
        );
    }

    #[test]
    fn test_encode_string() {
        assert_eq!(
            encode_one(&Amf0Value::String("hi".to_string())),
            vec![0x02, 0x00, 0x02, 0x68, 0x69]
        );
    }

    #[test]
    fn test_encode_boolean() {
        assert_eq!(encode_one(&Amf0Value::Boolean(false)), vec![0x01, 0x00]);
        assert_eq!(encode_one(&Amf0Value::Boolean(true)), vec![0x01, 0x01]);
    }

    #[test]
    fn test_encode_object() {
        let mut obj = Amf0Object::new();
        obj.set("a", Amf0Value::Number(1.0));
        assert_eq!(
            encode_one(&Amf0Value::Object(obj)),
            vec![
                0x03, 0x00, 0x01, 0x61, 0x00, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x09
            ]
        );
    }

    #[test]
    fn test_encoded_length_matches_size() {
        let mut obj = Amf0Object::new();
        obj.set("app", Amf0Value::String("live".to_string()));
        obj.set("flag", Amf0Value::Boolean(true));
        obj.set("n", Amf0Value::Number(42.0));

        let mut arr = Amf0EcmaArray::new();
        arr.count = 2;
        arr.set("w", Amf0Value::Number(1920.0));
        arr.set("h", Amf0Value::Number(1080.0));

        let values = vec![
            Amf0Value::Number(0.0),
            Amf0Value::Boolean(false),
            Amf0Value::String(String::new()),
            Amf0Value::Object(obj),
            Amf0Value::EcmaArray(arr),
            Amf0Value::StrictArray(vec![Amf0Value::Null, Amf0Value::Number(7.0)]),
            Amf0Value::Null,
            Amf0Value::Undefined,
        ];

        for value in values {
            assert_eq!(encode_one(&value).len(), value.size(), "value {:?}", value);
        }
    }

    #[test]
    fn test_ecma_array_round_trip_preserves_count() {
        // The declared count is advisory and not derived from the
        // property list; it must survive a round trip untouched.
        let mut arr = Amf0EcmaArray::new();
        arr.count = 5;
        arr.set("only", Amf0Value::Number(1.0));
        let value = Amf0Value::EcmaArray(arr);

        let mut buffer = crate::ByteBuffer::new(encode_one(&value));
        let decoded = Amf0Decoder::new(&mut buffer).decode().unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_nested_round_trip() {
        let mut inner = Amf0Object::new();
        inner.set("level", Amf0Value::String("status".to_string()));

        let mut outer = Amf0Object::new();
        outer.set("info", Amf0Value::Object(inner));
        outer.set(
            "list",
            Amf0Value::StrictArray(vec![
                Amf0Value::String("x".to_string()),
                Amf0Value::Boolean(true),
            ]),
        );
        let value = Amf0Value::Object(outer);

        let mut buffer = crate::ByteBuffer::new(encode_one(&value));
        let decoded = Amf0Decoder::new(&mut buffer).decode().unwrap();
        assert_eq!(decoded, value);
    }
}
