use crate::protocol::command::AmfCallPacket;
use crate::protocol::constants::*;
use crate::protocol::control::{SetChunkSize, SetPeerBandwidth, UserControl, WindowAckSize};

/// The header of a logical RTMP message, shared by the chunk layer as the
/// per-cid running baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RtmpHeader {
    /// Message timestamp in milliseconds, 31 bits used
    pub timestamp: u32,

    /// Timestamp delta of the last chunk header, used only during demux
    pub timestamp_delta: u32,

    /// Payload size in bytes
    pub payload_length: u32,

    /// Message type tag
    pub message_type: u8,

    /// Message stream id, little-endian on the wire
    pub stream_id: u32,

    /// The chunk stream id this message travels over
    pub chunk_stream_id: u32,
}

impl RtmpHeader {
    /// Whether the packed 3-byte timestamp field overflows into the
    /// extended timestamp field
    pub fn has_extended_timestamp(&self) -> bool {
        self.timestamp >= EXTENDED_TIMESTAMP
    }
}

/// A logical RTMP message: a header plus the reassembled payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RtmpMessage {
    pub header: RtmpHeader,
    pub payload: Vec<u8>,
}

impl RtmpMessage {
    pub fn new(header: RtmpHeader) -> Self {
        RtmpMessage {
            header,
            payload: Vec::new(),
        }
    }

    /// Wrap a marshalled payload in a message with the given routing fields
    pub fn with_payload(
        message_type: u8,
        chunk_stream_id: u32,
        stream_id: u32,
        payload: Vec<u8>,
    ) -> Self {
        RtmpMessage {
            header: RtmpHeader {
                timestamp: 0,
                timestamp_delta: 0,
                payload_length: payload.len() as u32,
                message_type,
                stream_id,
                chunk_stream_id,
            },
            payload,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.payload.len() == self.header.payload_length as usize
    }
}

/// A decoded RTMP packet, the typed view of a message payload.
///
/// The known control and command shapes get their own variants; anything
/// else passes through as raw bytes so callers can forward or drop it.
#[derive(Debug, Clone, PartialEq)]
pub enum RtmpPacket {
    Connect(AmfCallPacket),
    ConnectResult(AmfCallPacket),
    Command(AmfCallPacket),
    SetChunkSize(SetChunkSize),
    WindowAckSize(WindowAckSize),
    SetPeerBandwidth(SetPeerBandwidth),
    UserControl(UserControl),
    Raw(RawPacket),
}

impl RtmpPacket {
    /// Serialized payload size in bytes
    pub fn size(&self) -> usize {
        match self {
            RtmpPacket::Connect(p) | RtmpPacket::ConnectResult(p) | RtmpPacket::Command(p) => {
                p.size()
            }
            RtmpPacket::SetChunkSize(p) => p.size(),
            RtmpPacket::WindowAckSize(p) => p.size(),
            RtmpPacket::SetPeerBandwidth(p) => p.size(),
            RtmpPacket::UserControl(p) => p.size(),
            RtmpPacket::Raw(p) => p.payload.len(),
        }
    }

    /// Serialize to a message payload
    pub fn marshal(&self) -> Vec<u8> {
        match self {
            RtmpPacket::Connect(p) | RtmpPacket::ConnectResult(p) | RtmpPacket::Command(p) => {
                p.marshal()
            }
            RtmpPacket::SetChunkSize(p) => p.marshal(),
            RtmpPacket::WindowAckSize(p) => p.marshal(),
            RtmpPacket::SetPeerBandwidth(p) => p.marshal(),
            RtmpPacket::UserControl(p) => p.marshal(),
            RtmpPacket::Raw(p) => p.payload.clone(),
        }
    }

    /// The chunk stream this packet prefers when written
    pub fn better_cid(&self) -> u32 {
        match self {
            RtmpPacket::Connect(_) | RtmpPacket::ConnectResult(_) | RtmpPacket::Command(_) => {
                CHUNK_STREAM_COMMAND
            }
            RtmpPacket::SetChunkSize(_)
            | RtmpPacket::WindowAckSize(_)
            | RtmpPacket::SetPeerBandwidth(_)
            | RtmpPacket::UserControl(_) => CHUNK_STREAM_PROTOCOL,
            RtmpPacket::Raw(p) => p.better_cid(),
        }
    }

    /// The message type tag this packet is carried under
    pub fn message_type(&self) -> u8 {
        match self {
            RtmpPacket::Connect(_) | RtmpPacket::ConnectResult(_) | RtmpPacket::Command(_) => {
                MSG_TYPE_COMMAND_AMF0
            }
            RtmpPacket::SetChunkSize(_) => MSG_TYPE_SET_CHUNK_SIZE,
            RtmpPacket::WindowAckSize(_) => MSG_TYPE_WINDOW_ACK,
            RtmpPacket::SetPeerBandwidth(_) => MSG_TYPE_SET_PEER_BW,
            RtmpPacket::UserControl(_) => MSG_TYPE_USER_CONTROL,
            RtmpPacket::Raw(p) => p.message_type,
        }
    }

    /// The (transaction id, command name) pair of a request packet that
    /// expects a correlated response
    pub fn transaction(&self) -> Option<(f64, &str)> {
        match self {
            RtmpPacket::Connect(p) | RtmpPacket::Command(p) => {
                if p.transaction_id != 0.0 && !p.command_name.starts_with('_') {
                    Some((p.transaction_id, p.command_name.as_str()))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// A message payload of a type the decoder does not interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub message_type: u8,
    pub payload: Vec<u8>,
}

impl RawPacket {
    pub fn better_cid(&self) -> u32 {
        match self.message_type {
            MSG_TYPE_AUDIO => CHUNK_STREAM_AUDIO,
            MSG_TYPE_VIDEO => CHUNK_STREAM_VIDEO,
            t if t <= MSG_TYPE_EDGE_ORIGIN => CHUNK_STREAM_PROTOCOL,
            _ => CHUNK_STREAM_COMMAND,
        }
    }
}
