use crate::amf::{Amf0Decoder, Amf0Encoder, Amf0Object, Amf0Value};
use crate::protocol::constants::{COMMAND_CONNECT, COMMAND_RESULT};
use crate::{ByteBuffer, Error, Result};

/// The shared shape of every AMF command: a command name, a transaction
/// id, a command object and trailing arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct AmfCallPacket {
    pub command_name: String,
    pub transaction_id: f64,
    pub command_object: Amf0Value,
    pub args: Vec<Amf0Value>,
}

impl AmfCallPacket {
    pub fn new(command_name: impl Into<String>, transaction_id: f64) -> Self {
        AmfCallPacket {
            command_name: command_name.into(),
            transaction_id,
            command_object: Amf0Value::Null,
            args: Vec::new(),
        }
    }

    /// A connect request. The transaction id of connect is always 1.
    pub fn connect(command_object: Amf0Object) -> Self {
        AmfCallPacket {
            command_name: COMMAND_CONNECT.to_string(),
            transaction_id: 1.0,
            command_object: Amf0Value::Object(command_object),
            args: Vec::new(),
        }
    }

    /// A `_result` response to a connect request
    pub fn connect_result(transaction_id: f64) -> Self {
        AmfCallPacket {
            command_name: COMMAND_RESULT.to_string(),
            transaction_id,
            command_object: Amf0Value::Object(Amf0Object::new()),
            args: Vec::new(),
        }
    }

    /// Serialized size in bytes
    pub fn size(&self) -> usize {
        let mut size = 1 + 2 + self.command_name.len() // String
            + 9 // Number
            + self.command_object.size();
        size += self.args.iter().map(|v| v.size()).sum::<usize>();
        size
    }

    pub fn marshal(&self) -> Vec<u8> {
        let mut encoder = Amf0Encoder::new();
        encoder.encode(&Amf0Value::String(self.command_name.clone()));
        encoder.encode(&Amf0Value::Number(self.transaction_id));
        encoder.encode(&self.command_object);
        encoder.encode_all(&self.args);
        encoder.into_vec()
    }

    pub fn unmarshal(data: &[u8]) -> Result<Self> {
        let mut buffer = ByteBuffer::new(data.to_vec());
        let mut decoder = Amf0Decoder::new(&mut buffer);

        let command_name = match decoder.decode()? {
            Amf0Value::String(s) => s,
            other => {
                return Err(Error::command(format!(
                    "command name must be a string, got {:?}",
                    other
                )))
            }
        };

        let transaction_id = match decoder.decode()? {
            Amf0Value::Number(n) => n,
            other => {
                return Err(Error::command(format!(
                    "transaction id must be a number, got {:?}",
                    other
                )))
            }
        };

        let command_object = if decoder.has_remaining() {
            decoder.decode()?
        } else {
            Amf0Value::Null
        };

        let args = decoder.decode_all()?;

        Ok(AmfCallPacket {
            command_name,
            transaction_id,
            command_object,
            args,
        })
    }

    /// Unmarshal a connect request, enforcing its literals
    pub fn unmarshal_connect(data: &[u8]) -> Result<Self> {
        let packet = Self::unmarshal(data)?;

        if packet.command_name != COMMAND_CONNECT {
            return Err(Error::command(format!(
                "invalid command name {}",
                packet.command_name
            )));
        }
        if packet.transaction_id != 1.0 {
            return Err(Error::command(format!(
                "invalid transaction id {}",
                packet.transaction_id
            )));
        }

        Ok(packet)
    }

    /// Unmarshal a `_result` response to a connect request
    pub fn unmarshal_connect_result(data: &[u8]) -> Result<Self> {
        let packet = Self::unmarshal(data)?;

        if packet.command_name != COMMAND_RESULT {
            return Err(Error::command(format!(
                "invalid command name {}",
                packet.command_name
            )));
        }

        Ok(packet)
    }
}
