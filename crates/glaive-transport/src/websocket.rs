//! WebSocket transport implementation using `tokio-tungstenite`.

use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::MaybeTlsStream;

use crate::{Transport, TransportError, TransportHandle};

type WsStream =
    tokio_tungstenite::WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A WebSocket-based [`Transport`] connecting to a game server.
///
/// Endpoint URLs are formed from a base URL, the endpoint key as the
/// path, and the credential as a query parameter:
/// `ws://host:port/<endpoint_key>?token=<token>`.
pub struct WebSocketTransport {
    base_url: String,
}

impl WebSocketTransport {
    /// Creates a transport connecting relative to `base_url`
    /// (e.g. `ws://play.example.net:7000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn endpoint_url(&self, endpoint_key: &str, token: &str) -> String {
        format!(
            "{}/{}?token={}",
            self.base_url.trim_end_matches('/'),
            endpoint_key,
            token
        )
    }
}

impl Transport for WebSocketTransport {
    type Handle = WebSocketHandle;
    type Error = TransportError;

    async fn open(
        &self,
        endpoint_key: &str,
        token: &str,
    ) -> Result<WebSocketHandle, TransportError> {
        let url = self.endpoint_url(endpoint_key, token);
        let (ws, _) =
            tokio_tungstenite::connect_async(&url).await.map_err(|e| {
                TransportError::OpenFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;
        tracing::debug!(endpoint = endpoint_key, "WebSocket opened");
        Ok(WebSocketHandle {
            ws: Arc::new(Mutex::new(ws)),
        })
    }
}

/// A single client-side WebSocket connection.
pub struct WebSocketHandle {
    ws: Arc<Mutex<WsStream>>,
}

impl TransportHandle for WebSocketHandle {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        use futures_util::SinkExt;
        let msg = Message::Binary(data.to_vec().into());
        self.ws.lock().await.send(msg).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        use futures_util::StreamExt;
        loop {
            let msg = self.ws.lock().await.next().await;
            match msg {
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                // A dead socket reads as a close, not an error loop.
                Some(Err(
                    tungstenite::Error::ConnectionClosed
                    | tungstenite::Error::AlreadyClosed,
                )) => return Ok(None),
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        match self.ws.lock().await.close(None).await {
            Ok(())
            | Err(
                tungstenite::Error::ConnectionClosed
                | tungstenite::Error::AlreadyClosed,
            ) => Ok(()),
            Err(e) => Err(TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_key_and_token() {
        let transport = WebSocketTransport::new("ws://play.example.net:7000");
        assert_eq!(
            transport.endpoint_url("instance-1", "abc"),
            "ws://play.example.net:7000/instance-1?token=abc"
        );
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let transport = WebSocketTransport::new("ws://localhost:7000/");
        assert_eq!(
            transport.endpoint_url("arena", "t"),
            "ws://localhost:7000/arena?token=t"
        );
    }
}
