// Message types
pub const MSG_TYPE_SET_CHUNK_SIZE: u8 = 0x01;
pub const MSG_TYPE_ABORT: u8 = 0x02;
pub const MSG_TYPE_ACK: u8 = 0x03;
pub const MSG_TYPE_USER_CONTROL: u8 = 0x04;
pub const MSG_TYPE_WINDOW_ACK: u8 = 0x05;
pub const MSG_TYPE_SET_PEER_BW: u8 = 0x06;
pub const MSG_TYPE_EDGE_ORIGIN: u8 = 0x07;
pub const MSG_TYPE_AUDIO: u8 = 0x08;
pub const MSG_TYPE_VIDEO: u8 = 0x09;
pub const MSG_TYPE_DATA_AMF3: u8 = 0x0F;
pub const MSG_TYPE_COMMAND_AMF3: u8 = 0x11;
pub const MSG_TYPE_DATA_AMF0: u8 = 0x12;
pub const MSG_TYPE_COMMAND_AMF0: u8 = 0x14;

// Chunk stream id assignment when writing
pub const CHUNK_STREAM_PROTOCOL: u32 = 2;
pub const CHUNK_STREAM_COMMAND: u32 = 3;
pub const CHUNK_STREAM_STREAM: u32 = 5;
pub const CHUNK_STREAM_VIDEO: u32 = 6;
pub const CHUNK_STREAM_AUDIO: u32 = 7;

// Chunking defaults and limits
pub const DEFAULT_CHUNK_SIZE: u32 = 128;

/// Sentinel: a packed 3-byte timestamp at or above this value moves the
/// real timestamp into the trailing 4-byte extended field.
pub const EXTENDED_TIMESTAMP: u32 = 0x00FF_FFFF;

/// Timestamps are 31 bits; some peers send 32-bit extended timestamps.
pub const TIMESTAMP_MASK: u32 = 0x7FFF_FFFF;

// Command names
pub const COMMAND_CONNECT: &str = "connect";
pub const COMMAND_CREATE_STREAM: &str = "createStream";
pub const COMMAND_CLOSE_STREAM: &str = "closeStream";
pub const COMMAND_PLAY: &str = "play";
pub const COMMAND_PAUSE: &str = "pause";
pub const COMMAND_ON_BW_DONE: &str = "onBWDone";
pub const COMMAND_ON_STATUS: &str = "onStatus";
pub const COMMAND_RESULT: &str = "_result";
pub const COMMAND_ERROR: &str = "_error";
pub const COMMAND_RELEASE_STREAM: &str = "releaseStream";
pub const COMMAND_FC_PUBLISH: &str = "FCPublish";
pub const COMMAND_FC_UNPUBLISH: &str = "FCUnpublish";
pub const COMMAND_PUBLISH: &str = "publish";
pub const COMMAND_SAMPLE_ACCESS: &str = "|RtmpSampleAccess";
