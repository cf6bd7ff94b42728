// Copyright (C) 2025-2026 The Cinder Developers.
// This file is part of the cinder library.

// The cinder library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The cinder library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the cinder library. If not, see <https://www.gnu.org/licenses/>.

mod framing {
    use cinder_network::{ConnReader, ConnWriter, NetworkError, Payload, MAX_MESSAGE_SIZE};
    use cinder_storage::PeerAddress;
    use cinder_testing::random_bound_address;

    use tokio::{
        io::AsyncWriteExt,
        net::{TcpListener, TcpStream},
    };

    async fn connected_pair() -> (TcpStream, TcpStream) {
        let (addr, listener): (_, TcpListener) = random_bound_address().await;
        let dialer = TcpStream::connect(addr).await.unwrap();
        let (accepted, _) = listener.accept().await.unwrap();
        (dialer, accepted)
    }

    fn sample_payload(port: u16) -> Payload {
        Payload::SendPeers {
            address: PeerAddress::new("localhost", port),
            peers: vec![PeerAddress::new("localhost", 3070)],
        }
    }

    #[tokio::test]
    async fn frame_round_trip() {
        let (dialer, accepted) = connected_pair().await;
        let peer_addr = dialer.peer_addr().unwrap();
        let local_addr = accepted.peer_addr().unwrap();

        let (_read_half, write_half) = dialer.into_split();
        let mut writer = ConnWriter::new(peer_addr, write_half);

        let (read_half, _write_half) = accepted.into_split();
        let mut reader = ConnReader::new(local_addr, read_half);

        let payload = sample_payload(8082);
        writer.write_message(&payload).await.unwrap();

        let message = reader.read_message().await.unwrap();
        assert_eq!(message.payload, payload);
    }

    #[tokio::test]
    async fn partial_writes_are_buffered() {
        let (mut dialer, accepted) = connected_pair().await;
        let local_addr = accepted.peer_addr().unwrap();

        let (read_half, _write_half) = accepted.into_split();
        let mut reader = ConnReader::new(local_addr, read_half);

        let payload = sample_payload(8082);
        let body = serde_json::to_vec(&payload).unwrap();
        let header = (body.len() as u32).to_be_bytes();

        // Dribble the frame out in four chunks with pauses in between.
        let reader_task = tokio::spawn(async move { reader.read_message().await.unwrap().payload });
        dialer.write_all(&header[..2]).await.unwrap();
        dialer.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        dialer.write_all(&header[2..]).await.unwrap();
        dialer.write_all(&body[..body.len() / 2]).await.unwrap();
        dialer.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        dialer.write_all(&body[body.len() / 2..]).await.unwrap();
        dialer.flush().await.unwrap();

        assert_eq!(reader_task.await.unwrap(), payload);
    }

    #[tokio::test]
    async fn multiple_frames_per_connection() {
        let (dialer, accepted) = connected_pair().await;
        let peer_addr = dialer.peer_addr().unwrap();
        let local_addr = accepted.peer_addr().unwrap();

        let (_read_half, write_half) = dialer.into_split();
        let mut writer = ConnWriter::new(peer_addr, write_half);

        let (read_half, _write_half) = accepted.into_split();
        let mut reader = ConnReader::new(local_addr, read_half);

        let first = sample_payload(1);
        let second = Payload::GenesisHealthCheck;
        let third = sample_payload(3);

        writer.write_message(&first).await.unwrap();
        writer.write_message(&second).await.unwrap();
        writer.write_message(&third).await.unwrap();

        assert_eq!(reader.read_message().await.unwrap().payload, first);
        assert_eq!(reader.read_message().await.unwrap().payload, second);
        assert_eq!(reader.read_message().await.unwrap().payload, third);
    }

    #[tokio::test]
    async fn oversized_frames_are_rejected() {
        let (mut dialer, accepted) = connected_pair().await;
        let local_addr = accepted.peer_addr().unwrap();

        let (read_half, _write_half) = accepted.into_split();
        let mut reader = ConnReader::new(local_addr, read_half);

        let header = ((MAX_MESSAGE_SIZE + 1) as u32).to_be_bytes();
        dialer.write_all(&header).await.unwrap();
        dialer.flush().await.unwrap();

        match reader.read_message().await {
            Err(NetworkError::MessageTooBig(size, limit)) => {
                assert_eq!(size, MAX_MESSAGE_SIZE + 1);
                assert_eq!(limit, MAX_MESSAGE_SIZE);
            }
            other => panic!("expected an oversize error, got {:?}", other.map(|m| m.payload)),
        }
    }

    #[tokio::test]
    async fn a_malformed_frame_does_not_poison_the_stream() {
        let (mut dialer, accepted) = connected_pair().await;
        let local_addr = accepted.peer_addr().unwrap();

        let (read_half, _write_half) = accepted.into_split();
        let mut reader = ConnReader::new(local_addr, read_half);

        // A well-framed message whose payload is not a known message.
        let garbage = br#"{"type":"mystery"}"#;
        dialer.write_all(&(garbage.len() as u32).to_be_bytes()).await.unwrap();
        dialer.write_all(garbage).await.unwrap();

        // Followed by a valid frame on the same connection.
        let payload = sample_payload(8082);
        let body = serde_json::to_vec(&payload).unwrap();
        dialer.write_all(&(body.len() as u32).to_be_bytes()).await.unwrap();
        dialer.write_all(&body).await.unwrap();
        dialer.flush().await.unwrap();

        assert!(matches!(
            reader.read_message().await,
            Err(NetworkError::InvalidMessage(_))
        ));
        assert_eq!(reader.read_message().await.unwrap().payload, payload);
    }
}
