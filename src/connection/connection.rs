use crate::amf::{Amf0Decoder, Amf0Value};
use crate::chunk::{ChunkReader, ChunkWriter};
use crate::connection::state::ConnectionState;
use crate::handshake::{client_handshake, server_handshake};
use crate::protocol::constants::*;
use crate::protocol::{
    AmfCallPacket, RawPacket, RtmpMessage, RtmpPacket, SetChunkSize, SetPeerBandwidth,
    TransactionRegistry, UserControl, WindowAckSize,
};
use crate::{ByteBuffer, Error, Result};
use log::debug;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader, ReadHalf, WriteHalf};

/// The RTMP command and chunk stack over one duplex transport.
///
/// The demux state machine is single-task; the transaction registry is
/// shared so a sending task may register requests while the reading task
/// correlates responses.
pub struct RtmpConnection<S> {
    /// Buffered read half: the chunk demux issues many small reads
    reader: BufReader<ReadHalf<S>>,

    writer: WriteHalf<S>,

    chunk_reader: ChunkReader,

    chunk_writer: ChunkWriter,

    transactions: Arc<TransactionRegistry>,

    state: ConnectionState,
}

impl<S: AsyncRead + AsyncWrite + Unpin> RtmpConnection<S> {
    pub fn new(stream: S) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);

        RtmpConnection {
            reader: BufReader::new(read_half),
            writer: write_half,
            chunk_reader: ChunkReader::new(),
            chunk_writer: ChunkWriter::new(),
            transactions: Arc::new(TransactionRegistry::new()),
            state: ConnectionState::Handshaking,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The shared table of outstanding requests
    pub fn transactions(&self) -> Arc<TransactionRegistry> {
        Arc::clone(&self.transactions)
    }

    pub fn input_chunk_size(&self) -> u32 {
        self.chunk_reader.chunk_size()
    }

    pub fn output_chunk_size(&self) -> u32 {
        self.chunk_writer.chunk_size()
    }

    /// Adopt a new outgoing chunk size. The caller must announce it to
    /// the peer with a SetChunkSize packet first.
    pub fn set_output_chunk_size(&mut self, size: u32) {
        self.chunk_writer.set_chunk_size(size);
    }

    /// Exchange the handshake as a client
    pub async fn handshake_client(&mut self) -> Result<()> {
        client_handshake(&mut self.reader, &mut self.writer).await?;
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Exchange the handshake as a server
    pub async fn handshake_server(&mut self) -> Result<()> {
        server_handshake(&mut self.reader, &mut self.writer).await?;
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Read chunks until the next complete message, applying protocol
    /// side effects before returning it.
    pub async fn read_message(&mut self) -> Result<RtmpMessage> {
        let message = match self.chunk_reader.read_message(&mut self.reader).await {
            Ok(message) => message,
            Err(e) => {
                self.state = ConnectionState::Closed;
                return Err(e);
            }
        };

        self.on_message_arrived(&message)?;
        Ok(message)
    }

    /// Read messages until one matches a wanted type. An empty list
    /// accepts any message.
    pub async fn expect_message(&mut self, types: &[u8]) -> Result<RtmpMessage> {
        loop {
            let message = self.read_message().await?;
            if types.is_empty() || types.contains(&message.header.message_type) {
                return Ok(message);
            }
        }
    }

    /// Read and decode messages until the filter accepts a packet
    pub async fn expect_packet<F>(&mut self, filter: F) -> Result<(RtmpMessage, RtmpPacket)>
    where
        F: Fn(&RtmpMessage, &RtmpPacket) -> bool,
    {
        loop {
            let message = self.read_message().await?;
            let packet = self.decode_message(&message)?;
            if filter(&message, &packet) {
                return Ok((message, packet));
            }
        }
    }

    /// Decode a message payload into its typed packet
    pub fn decode_message(&self, message: &RtmpMessage) -> Result<RtmpPacket> {
        if message.payload.is_empty() {
            return Err(Error::protocol("empty packet"));
        }

        // AMF3 command/data envelopes carry one format byte before plain
        // AMF0 content.
        let payload = match message.header.message_type {
            MSG_TYPE_COMMAND_AMF3 | MSG_TYPE_DATA_AMF3 => &message.payload[1..],
            _ => &message.payload[..],
        };

        match message.header.message_type {
            MSG_TYPE_SET_CHUNK_SIZE => {
                Ok(RtmpPacket::SetChunkSize(SetChunkSize::unmarshal(payload)?))
            }
            MSG_TYPE_WINDOW_ACK => Ok(RtmpPacket::WindowAckSize(WindowAckSize::unmarshal(
                payload,
            )?)),
            MSG_TYPE_SET_PEER_BW => Ok(RtmpPacket::SetPeerBandwidth(
                SetPeerBandwidth::unmarshal(payload)?,
            )),
            MSG_TYPE_USER_CONTROL => Ok(RtmpPacket::UserControl(UserControl::unmarshal(payload)?)),
            MSG_TYPE_COMMAND_AMF0 | MSG_TYPE_COMMAND_AMF3 | MSG_TYPE_DATA_AMF0
            | MSG_TYPE_DATA_AMF3 => self.parse_amf_call(payload),
            _ => Ok(RtmpPacket::Raw(RawPacket {
                message_type: message.header.message_type,
                payload: message.payload.clone(),
            })),
        }
    }

    /// Decode an AMF command payload, correlating responses to their
    /// originating requests.
    fn parse_amf_call(&self, payload: &[u8]) -> Result<RtmpPacket> {
        let command_name = Self::peek_command_name(payload)?;

        if command_name == COMMAND_RESULT || command_name == COMMAND_ERROR {
            let call = AmfCallPacket::unmarshal(payload)?;
            let request_name = self.transactions.correlate(call.transaction_id)?;
            debug!(
                "correlated {} transaction {} to {}",
                call.command_name, call.transaction_id, request_name
            );

            if request_name == COMMAND_CONNECT && command_name == COMMAND_RESULT {
                return Ok(RtmpPacket::ConnectResult(
                    AmfCallPacket::unmarshal_connect_result(payload)?,
                ));
            }
            return Ok(RtmpPacket::Command(call));
        }

        if command_name == COMMAND_CONNECT {
            return Ok(RtmpPacket::Connect(AmfCallPacket::unmarshal_connect(
                payload,
            )?));
        }

        Ok(RtmpPacket::Command(AmfCallPacket::unmarshal(payload)?))
    }

    /// The leading AMF0 String of a command payload
    fn peek_command_name(payload: &[u8]) -> Result<String> {
        let mut buffer = ByteBuffer::new(payload.to_vec());
        match Amf0Decoder::new(&mut buffer).decode()? {
            Amf0Value::String(name) => Ok(name),
            other => Err(Error::command(format!(
                "command name must be a string, got {:?}",
                other
            ))),
        }
    }

    /// Marshal a typed packet and send it over its preferred chunk stream
    pub async fn write_packet(&mut self, packet: &RtmpPacket, stream_id: u32) -> Result<()> {
        let message = RtmpMessage::with_payload(
            packet.message_type(),
            packet.better_cid(),
            stream_id,
            packet.marshal(),
        );

        self.write_message(&message).await?;
        self.on_packet_written(packet);
        Ok(())
    }

    /// Send a prebuilt message, e.g. forwarded audio/video
    pub async fn write_message(&mut self, message: &RtmpMessage) -> Result<()> {
        if let Err(e) = self
            .chunk_writer
            .write_message(&mut self.writer, message)
            .await
        {
            self.state = ConnectionState::Closed;
            return Err(e);
        }
        Ok(())
    }

    /// Track requests that expect a correlated response
    fn on_packet_written(&self, packet: &RtmpPacket) {
        if let Some((transaction_id, command_name)) = packet.transaction() {
            debug!("register transaction {} {}", transaction_id, command_name);
            self.transactions.register(transaction_id, command_name);
        }
    }

    /// Apply the side effects of freshly demuxed control messages
    fn on_message_arrived(&mut self, message: &RtmpMessage) -> Result<()> {
        match message.header.message_type {
            MSG_TYPE_SET_CHUNK_SIZE | MSG_TYPE_WINDOW_ACK | MSG_TYPE_USER_CONTROL => {
                let packet = self.decode_message(message)?;
                if let RtmpPacket::SetChunkSize(p) = packet {
                    debug!("input chunk size {}", p.chunk_size);
                    self.chunk_reader.set_chunk_size(p.chunk_size);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
