//! In-memory transport over tokio channels.
//!
//! [`ChannelTransport::pair`] returns a transport plus a [`ChannelPeer`]
//! that plays the server: tests and demos script the peer (send payloads,
//! inject faults, close) and observe everything the client writes. No
//! sockets, no timing dependence — every connection-lifecycle path can be
//! driven deterministically.

use std::sync::{Mutex as StdMutex, PoisonError};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

use crate::{Transport, TransportError, TransportHandle};

/// What travels across one direction of the in-memory pair.
enum Frame {
    Data(Vec<u8>),
    Error(String),
    Close,
}

/// An in-memory [`Transport`] wired to a scriptable peer.
///
/// `open` succeeds exactly once, yielding the handle pre-wired to the
/// peer; later opens fail. Endpoint key and token are accepted and
/// ignored — there is no real endpoint to resolve.
pub struct ChannelTransport {
    handle: StdMutex<Option<ChannelHandle>>,
}

impl ChannelTransport {
    /// Creates a connected transport/peer pair.
    pub fn pair() -> (ChannelTransport, ChannelPeer) {
        let (to_peer, from_client) = mpsc::unbounded_channel();
        let (to_client, from_peer) = mpsc::unbounded_channel();
        let handle = ChannelHandle {
            to_peer,
            from_peer: Mutex::new(from_peer),
        };
        let transport = ChannelTransport {
            handle: StdMutex::new(Some(handle)),
        };
        let peer = ChannelPeer {
            to_client,
            from_client,
        };
        (transport, peer)
    }
}

impl Transport for ChannelTransport {
    type Handle = ChannelHandle;
    type Error = TransportError;

    async fn open(
        &self,
        endpoint_key: &str,
        _token: &str,
    ) -> Result<ChannelHandle, TransportError> {
        tracing::debug!(endpoint = endpoint_key, "channel transport opened");
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| {
                TransportError::OpenFailed(std::io::Error::new(
                    std::io::ErrorKind::AddrInUse,
                    "channel transport already opened",
                ))
            })
    }
}

/// The client half of an in-memory pair.
pub struct ChannelHandle {
    to_peer: UnboundedSender<Frame>,
    from_peer: Mutex<UnboundedReceiver<Frame>>,
}

impl TransportHandle for ChannelHandle {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        self.to_peer
            .send(Frame::Data(data.to_vec()))
            .map_err(|_| TransportError::Closed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        match self.from_peer.lock().await.recv().await {
            Some(Frame::Data(data)) => Ok(Some(data)),
            Some(Frame::Error(reason)) => Err(TransportError::ReceiveFailed(
                std::io::Error::other(reason),
            )),
            Some(Frame::Close) | None => Ok(None),
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        // Tell the peer we are done; the close is confirmed only when the
        // peer closes back and `recv` returns None (mirrors the WebSocket
        // close handshake).
        let _ = self.to_peer.send(Frame::Close);
        Ok(())
    }
}

/// The server half of an in-memory pair, held by the test or demo.
pub struct ChannelPeer {
    to_client: UnboundedSender<Frame>,
    from_client: UnboundedReceiver<Frame>,
}

impl ChannelPeer {
    /// Delivers a payload to the client.
    pub fn send(&self, bytes: &[u8]) {
        let _ = self.to_client.send(Frame::Data(bytes.to_vec()));
    }

    /// Injects a transport fault: the client's next `recv` returns an
    /// error. The connection stays usable afterwards.
    pub fn fail(&self, reason: &str) {
        let _ = self.to_client.send(Frame::Error(reason.to_string()));
    }

    /// Closes the server side; the client's `recv` returns `Ok(None)`
    /// after any already-queued payloads.
    pub fn close(&self) {
        let _ = self.to_client.send(Frame::Close);
    }

    /// Waits for the next payload the client wrote. Returns `None` once
    /// the client has closed.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        match self.from_client.recv().await {
            Some(Frame::Data(data)) => Some(data),
            Some(Frame::Close) | Some(Frame::Error(_)) | None => None,
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv), for asserting that
    /// the client wrote nothing.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        match self.from_client.try_recv() {
            Ok(Frame::Data(data)) => Some(data),
            _ => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_pair() -> (ChannelHandle, ChannelPeer) {
        let (transport, peer) = ChannelTransport::pair();
        let handle = transport.open("test", "token").await.unwrap();
        (handle, peer)
    }

    #[tokio::test]
    async fn test_open_succeeds_once() {
        let (transport, _peer) = ChannelTransport::pair();
        assert!(transport.open("test", "t").await.is_ok());
        let second = transport.open("test", "t").await;
        assert!(matches!(second, Err(TransportError::OpenFailed(_))));
    }

    #[tokio::test]
    async fn test_client_to_peer() {
        let (handle, mut peer) = open_pair().await;
        handle.send(b"[2,1.0,2.0]").await.unwrap();
        assert_eq!(peer.recv().await, Some(b"[2,1.0,2.0]".to_vec()));
    }

    #[tokio::test]
    async fn test_peer_to_client() {
        let (handle, peer) = open_pair().await;
        peer.send(b"[6, 42]");
        assert_eq!(handle.recv().await.unwrap(), Some(b"[6, 42]".to_vec()));
    }

    #[tokio::test]
    async fn test_peer_close_reads_as_clean_close() {
        let (handle, peer) = open_pair().await;
        peer.send(b"last");
        peer.close();

        // Queued data drains first, then the close shows up.
        assert_eq!(handle.recv().await.unwrap(), Some(b"last".to_vec()));
        assert_eq!(handle.recv().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_injected_fault_is_an_error_not_a_close() {
        let (handle, peer) = open_pair().await;
        peer.fail("simulated fault");

        let result = handle.recv().await;
        assert!(matches!(result, Err(TransportError::ReceiveFailed(_))));

        // The connection is still alive afterwards.
        peer.send(b"still here");
        assert_eq!(
            handle.recv().await.unwrap(),
            Some(b"still here".to_vec())
        );
    }

    #[tokio::test]
    async fn test_client_close_notifies_peer_then_peer_closes_back() {
        let (handle, mut peer) = open_pair().await;
        handle.close().await.unwrap();

        // Peer observes the client's close...
        assert_eq!(peer.recv().await, None);

        // ...and the client's side only settles once the peer closes back.
        peer.close();
        assert_eq!(handle.recv().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_send_after_peer_dropped_fails() {
        let (handle, peer) = open_pair().await;
        drop(peer);
        let result = handle.send(b"anyone there").await;
        assert!(matches!(result, Err(TransportError::Closed)));
    }
}
