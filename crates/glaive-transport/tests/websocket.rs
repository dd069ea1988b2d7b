//! Integration tests for the WebSocket transport.
//!
//! Each test binds a local tokio-tungstenite acceptor playing the server
//! and connects the transport to it, so real frames cross a real socket.
//! Binding port 0 lets the OS pick a free port; the listener's local
//! address seeds the transport's base URL.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use glaive_transport::{
        Transport, TransportError, TransportHandle, WebSocketTransport,
    };
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    type ServerWs =
        tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Accepts a single WebSocket connection on `listener`.
    async fn accept_one(listener: TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed")
    }

    /// Binds a listener, spawns the acceptor, and opens the transport
    /// against it.
    async fn connected() -> (glaive_transport::WebSocketHandle, ServerWs) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have local addr");
        let server = tokio::spawn(accept_one(listener));

        let transport = WebSocketTransport::new(format!("ws://{addr}"));
        let handle = transport
            .open("instance-1", "token")
            .await
            .expect("open should succeed");
        let server_ws = server.await.expect("acceptor should finish");
        (handle, server_ws)
    }

    #[tokio::test]
    async fn test_send_reaches_server_as_binary() {
        let (handle, mut server_ws) = connected().await;

        handle.send(b"[2,1.0,2.0]").await.expect("send should succeed");

        let msg = server_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"[2,1.0,2.0]");
    }

    #[tokio::test]
    async fn test_recv_accepts_binary_and_text_frames() {
        let (handle, mut server_ws) = connected().await;

        server_ws
            .send(Message::Binary(b"[24, 9]".to_vec().into()))
            .await
            .unwrap();
        assert_eq!(
            handle.recv().await.unwrap(),
            Some(b"[24, 9]".to_vec())
        );

        server_ws
            .send(Message::Text("[6, 42]".into()))
            .await
            .unwrap();
        assert_eq!(
            handle.recv().await.unwrap(),
            Some(b"[6, 42]".to_vec())
        );
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_server_close() {
        let (handle, mut server_ws) = connected().await;

        server_ws.close(None).await.unwrap();

        let result = handle.recv().await.expect("recv should not error");
        assert!(result.is_none(), "server close should read as None");
    }

    #[tokio::test]
    async fn test_close_sends_close_frame_to_server() {
        let (handle, mut server_ws) = connected().await;

        handle.close().await.expect("close should succeed");

        let msg = server_ws.next().await.unwrap().unwrap();
        assert!(msg.is_close(), "server should see a close frame");
    }

    #[tokio::test]
    async fn test_open_against_dead_port_fails() {
        // Bind to learn a free port, then drop the listener so nothing
        // is listening there.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = WebSocketTransport::new(format!("ws://{addr}"));
        let result = transport.open("instance-1", "token").await;
        assert!(matches!(result, Err(TransportError::OpenFailed(_))));
    }
}
