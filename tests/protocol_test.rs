// End-to-end tests for the RTMP stack: handshake, chunking, typed
// packets and transaction correlation over an in-memory pipe.

use rtmp_core::{
    Amf0Object, Amf0Value, AmfCallPacket, LimitType, RtmpConnection, RtmpMessage, RtmpPacket,
    SetChunkSize, SetPeerBandwidth, WindowAckSize, MSG_TYPE_AUDIO, MSG_TYPE_COMMAND_AMF0,
    MSG_TYPE_SET_PEER_BW, MSG_TYPE_VIDEO,
};
use tokio::io::DuplexStream;

type Connection = RtmpConnection<DuplexStream>;

/// An already-handshaken client/server pair over an in-memory pipe
async fn connected_pair() -> (Connection, Connection) {
    let (client_io, server_io) = tokio::io::duplex(256 * 1024);
    let mut client = RtmpConnection::new(client_io);
    let mut server = RtmpConnection::new(server_io);

    let server_task = tokio::spawn(async move {
        server.handshake_server().await?;
        Ok::<Connection, rtmp_core::Error>(server)
    });
    client.handshake_client().await.expect("client handshake");
    let server = server_task.await.unwrap().expect("server handshake");

    assert!(client.state().is_connected());
    assert!(server.state().is_connected());
    (client, server)
}

fn connect_packet() -> RtmpPacket {
    let mut obj = Amf0Object::new();
    obj.set("app", Amf0Value::String("live".to_string()));
    obj.set("flashVer", Amf0Value::String("FMLE/3.0".to_string()));
    obj.set(
        "tcUrl",
        Amf0Value::String("rtmp://127.0.0.1/live".to_string()),
    );
    RtmpPacket::Connect(AmfCallPacket::connect(obj))
}

#[tokio::test]
async fn test_connect_lifecycle() {
    let (mut client, mut server) = connected_pair().await;

    // Client opens the session
    client.write_packet(&connect_packet(), 0).await.unwrap();

    // Server receives and validates the request
    let (_, packet) = server
        .expect_packet(|_, p| matches!(p, RtmpPacket::Connect(_)))
        .await
        .unwrap();
    let connect = match packet {
        RtmpPacket::Connect(call) => call,
        _ => unreachable!(),
    };
    assert_eq!(connect.command_name, "connect");
    assert_eq!(connect.transaction_id, 1.0);
    assert_eq!(
        connect.command_object.as_object().unwrap().get("app"),
        Some(&Amf0Value::String("live".to_string()))
    );

    // Server replies the way real peers do: window, bandwidth, chunk
    // size, then the connect result.
    server
        .write_packet(&RtmpPacket::WindowAckSize(WindowAckSize::new(2_500_000)), 0)
        .await
        .unwrap();
    server
        .write_packet(
            &RtmpPacket::SetPeerBandwidth(SetPeerBandwidth::new(2_500_000, LimitType::Dynamic)),
            0,
        )
        .await
        .unwrap();
    server
        .write_packet(&RtmpPacket::SetChunkSize(SetChunkSize::new(4096)), 0)
        .await
        .unwrap();

    let mut result = AmfCallPacket::connect_result(1.0);
    result.args.push(Amf0Value::Object({
        let mut info = Amf0Object::new();
        info.set(
            "code",
            Amf0Value::String("NetConnection.Connect.Success".to_string()),
        );
        info
    }));
    server
        .write_packet(&RtmpPacket::ConnectResult(result), 0)
        .await
        .unwrap();

    // The client walks the control burst and correlates the result
    let message = client.expect_message(&[MSG_TYPE_SET_PEER_BW]).await.unwrap();
    match client.decode_message(&message).unwrap() {
        RtmpPacket::SetPeerBandwidth(p) => {
            assert_eq!(p.bandwidth, 2_500_000);
            assert_eq!(p.limit_type, LimitType::Dynamic);
        }
        other => panic!("expected SetPeerBandwidth, got {:?}", other),
    }

    let (_, packet) = client
        .expect_packet(|_, p| matches!(p, RtmpPacket::ConnectResult(_)))
        .await
        .unwrap();
    let result = match packet {
        RtmpPacket::ConnectResult(call) => call,
        _ => unreachable!(),
    };
    assert_eq!(result.transaction_id, 1.0);

    // The peer's SetChunkSize took effect and the table is drained
    assert_eq!(client.input_chunk_size(), 4096);
    assert!(client.transactions().is_empty());
}

#[tokio::test]
async fn test_connect_wire_format() {
    let (mut client, mut server) = connected_pair().await;

    client.write_packet(&connect_packet(), 0).await.unwrap();
    let message = server.read_message().await.unwrap();

    // Message header fields: AMF0 command on stream 0
    assert_eq!(message.header.message_type, MSG_TYPE_COMMAND_AMF0);
    assert_eq!(message.header.stream_id, 0);
    assert_eq!(message.header.chunk_stream_id, 3);
    assert_eq!(
        message.header.payload_length as usize,
        message.payload.len()
    );

    // Payload: String "connect", Number 1.0, then the command object
    assert_eq!(
        &message.payload[..10],
        &[0x02, 0x00, 0x07, 0x63, 0x6F, 0x6E, 0x6E, 0x65, 0x63, 0x74]
    );
    assert_eq!(
        &message.payload[10..19],
        &[0x00, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(message.payload[19], 0x03);
}

#[tokio::test]
async fn test_media_forwarding_round_trip() {
    let (mut client, mut server) = connected_pair().await;

    // A keyframe larger than several chunks, forwarded as raw payload
    let mut video = vec![0x17, 0x01, 0x00, 0x00, 0x00];
    video.extend((0..2000u32).map(|i| i as u8));

    let mut message = RtmpMessage::with_payload(MSG_TYPE_VIDEO, 6, 1, video.clone());
    message.header.timestamp = 40;
    client.write_message(&message).await.unwrap();

    let audio = RtmpMessage::with_payload(MSG_TYPE_AUDIO, 7, 1, vec![0xAF, 0x01, 0x21]);
    client.write_message(&audio).await.unwrap();

    let received = server.expect_message(&[MSG_TYPE_VIDEO]).await.unwrap();
    assert_eq!(received.header.timestamp, 40);
    assert_eq!(received.payload, video);

    let received = server.expect_message(&[MSG_TYPE_AUDIO]).await.unwrap();
    assert_eq!(received.payload, vec![0xAF, 0x01, 0x21]);
}

#[tokio::test]
async fn test_larger_chunk_size_round_trip() {
    let (mut client, mut server) = connected_pair().await;

    // Announce, then adopt a larger outgoing chunk size
    client
        .write_packet(&RtmpPacket::SetChunkSize(SetChunkSize::new(60000)), 0)
        .await
        .unwrap();
    client.set_output_chunk_size(60000);

    let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let message = RtmpMessage::with_payload(MSG_TYPE_VIDEO, 6, 1, payload.clone());
    client.write_message(&message).await.unwrap();

    let received = server.expect_message(&[MSG_TYPE_VIDEO]).await.unwrap();
    assert_eq!(server.input_chunk_size(), 60000);
    assert_eq!(received.payload, payload);
}

#[tokio::test]
async fn test_extended_timestamp_round_trip() {
    let (mut client, mut server) = connected_pair().await;

    let mut message = RtmpMessage::with_payload(MSG_TYPE_VIDEO, 6, 1, vec![0x27; 400]);
    message.header.timestamp = 0x01000000;
    client.write_message(&message).await.unwrap();

    let received = server.read_message().await.unwrap();
    assert_eq!(received.header.timestamp, 0x01000000);
    assert_eq!(received.payload, message.payload);
}

#[tokio::test]
async fn test_create_stream_correlation() {
    let (mut client, mut server) = connected_pair().await;

    // createStream carries a null command object and the next
    // transaction id.
    let create = AmfCallPacket::new("createStream", 2.0);
    client
        .write_packet(&RtmpPacket::Command(create), 0)
        .await
        .unwrap();

    let (_, packet) = server
        .expect_packet(|_, p| matches!(p, RtmpPacket::Command(_)))
        .await
        .unwrap();
    let request = match packet {
        RtmpPacket::Command(call) => call,
        _ => unreachable!(),
    };
    assert_eq!(request.command_name, "createStream");

    // _result with the allocated stream id correlates to createStream
    let mut result = AmfCallPacket::new("_result", 2.0);
    result.args.push(Amf0Value::Number(1.0));
    server
        .write_packet(&RtmpPacket::Command(result), 0)
        .await
        .unwrap();

    let (_, packet) = client
        .expect_packet(|m, _| m.header.message_type == MSG_TYPE_COMMAND_AMF0)
        .await
        .unwrap();
    let response = match packet {
        RtmpPacket::Command(call) => call,
        other => panic!("expected Command, got {:?}", other),
    };
    assert_eq!(response.command_name, "_result");
    assert_eq!(response.args, vec![Amf0Value::Number(1.0)]);
    assert!(client.transactions().is_empty());
}
