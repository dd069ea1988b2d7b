//! The connection: owner of the transport handle and lifecycle state.
//!
//! One `Connection` drives one logical session with a game instance. It
//! is the only mutator of its [`ConnectionState`]; everyone else watches
//! through the state channel. Inbound bytes flow through the codec into
//! the dispatcher on a spawned read task; errors met where no caller is
//! waiting (parse failures, transport faults) go out on the error
//! channel instead of being dropped.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use glaive_events::{state_channel, EventStream, StateReader, StateWriter};
use glaive_protocol::{Command, Protocol};
use glaive_transport::{Transport, TransportHandle};

use crate::{ConnectionState, MessageDispatcher, SessionError};

/// A client connection to a game instance.
///
/// Generic over the transport so tests drive it with the in-memory
/// channel pair and production uses WebSocket. The codec is shared
/// read-only; the dispatcher is injected so consumers subscribe to the
/// same instance the read loop publishes into.
pub struct Connection<T: Transport> {
    transport: T,
    protocol: Arc<Protocol>,
    dispatcher: MessageDispatcher,
    errors: Arc<EventStream<SessionError>>,
    state_writer: Arc<StateWriter<ConnectionState>>,
    state: StateReader<ConnectionState>,
    /// The open transport handle, if any.
    handle: StdMutex<Option<Arc<T::Handle>>>,
}

impl<T: Transport> Connection<T> {
    /// Creates a connection in the `Created` state. Nothing touches the
    /// network until [`connect`](Self::connect).
    pub fn new(
        transport: T,
        protocol: Arc<Protocol>,
        dispatcher: MessageDispatcher,
    ) -> Self {
        let (state_writer, state) = state_channel(ConnectionState::Created);
        Self {
            transport,
            protocol,
            dispatcher,
            errors: Arc::new(EventStream::new()),
            state_writer: Arc::new(state_writer),
            state,
            handle: StdMutex::new(None),
        }
    }

    /// The observable connection state. Subscribing replays the current
    /// state immediately.
    pub fn state(&self) -> StateReader<ConnectionState> {
        self.state.clone()
    }

    /// The dispatcher this connection publishes parsed messages into.
    pub fn dispatcher(&self) -> &MessageDispatcher {
        &self.dispatcher
    }

    /// The error channel: parse failures and transport faults met inside
    /// the read loop are published here.
    pub fn errors(&self) -> &EventStream<SessionError> {
        &self.errors
    }

    /// Opens the transport to `endpoint_key` and starts the read loop.
    ///
    /// Publishes `Connecting` before the open and `Connected` once it
    /// resolves. If the open fails the state settles at `Error` and the
    /// cause is returned; a later `connect` may try again.
    ///
    /// Lifecycle calls (`connect`/`disconnect`) are expected from one
    /// driving task, the way the state machine has a single owner;
    /// subscribers may live anywhere.
    ///
    /// # Errors
    /// - [`SessionError::AlreadyConnected`] — called while Connecting,
    ///   Connected, or Disconnecting
    /// - [`SessionError::TransportOpenFailed`] — the transport open failed
    pub async fn connect(
        &self,
        endpoint_key: &str,
        token: &str,
    ) -> Result<(), SessionError> {
        let current = self.state.get();
        if !current.can_connect() {
            return Err(SessionError::AlreadyConnected(current));
        }
        update_state(&self.state_writer, ConnectionState::Connecting);

        let handle = match self.transport.open(endpoint_key, token).await {
            Ok(handle) => Arc::new(handle),
            Err(e) => {
                update_state(&self.state_writer, ConnectionState::Error);
                return Err(SessionError::TransportOpenFailed(Box::new(e)));
            }
        };

        *self.lock_handle() = Some(Arc::clone(&handle));
        update_state(&self.state_writer, ConnectionState::Connected);

        tokio::spawn(read_loop(
            handle,
            Arc::clone(&self.protocol),
            self.dispatcher.clone(),
            Arc::clone(&self.errors),
            Arc::clone(&self.state_writer),
        ));
        Ok(())
    }

    /// Serializes `command` and writes it to the transport.
    ///
    /// # Errors
    /// - [`SessionError::NotConnected`] — state is not `Connected`
    /// - [`SessionError::Protocol`] — the command is not registered for
    ///   serialization; nothing is written
    /// - [`SessionError::Transport`] — the write failed
    pub async fn send_command(
        &self,
        command: &Command,
    ) -> Result<(), SessionError> {
        let current = self.state.get();
        if current != ConnectionState::Connected {
            return Err(SessionError::NotConnected(current));
        }
        let handle = self
            .lock_handle()
            .clone()
            .ok_or(SessionError::NotConnected(current))?;

        // Serialize before touching the transport: a malformed or
        // unregistered command must not cause a partial write.
        let bytes = self.protocol.serialize(command)?;
        handle
            .send(&bytes)
            .await
            .map_err(|e| SessionError::Transport(Box::new(e)))
    }

    /// Requests connection teardown.
    ///
    /// Publishes `Disconnecting` immediately and asks the transport to
    /// close. The state settles at `Disconnected` only when the close
    /// confirmation reaches the read loop.
    ///
    /// # Errors
    /// - [`SessionError::NotConnected`] — state is not `Connected`
    /// - [`SessionError::Transport`] — the close request failed
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        let current = self.state.get();
        if current != ConnectionState::Connected {
            return Err(SessionError::NotConnected(current));
        }
        let handle = self
            .lock_handle()
            .clone()
            .ok_or(SessionError::NotConnected(current))?;

        update_state(&self.state_writer, ConnectionState::Disconnecting);
        handle
            .close()
            .await
            .map_err(|e| SessionError::Transport(Box::new(e)))
    }

    fn lock_handle(
        &self,
    ) -> std::sync::MutexGuard<'_, Option<Arc<T::Handle>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn update_state(
    writer: &StateWriter<ConnectionState>,
    next: ConnectionState,
) {
    tracing::info!(state = %next, "connection state");
    writer.publish(next);
}

/// Drains the transport until it closes.
///
/// Parsed messages go to the dispatcher keyed by their kind. Parse
/// failures and transport faults go to the error channel and leave the
/// state machine alone; only a clean close (`recv` returning `None`)
/// transitions the state, to `Disconnected`, whether the close was
/// requested locally or by the server.
async fn read_loop<H: TransportHandle>(
    handle: Arc<H>,
    protocol: Arc<Protocol>,
    dispatcher: MessageDispatcher,
    errors: Arc<EventStream<SessionError>>,
    state_writer: Arc<StateWriter<ConnectionState>>,
) {
    loop {
        match handle.recv().await {
            Ok(Some(bytes)) => match protocol.parse(&bytes) {
                Ok(message) => {
                    tracing::trace!(kind = %message.kind(), "message received");
                    dispatcher.publish(&message);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse inbound payload");
                    errors.publish(&SessionError::Protocol(e));
                }
            },
            Ok(None) => {
                update_state(&state_writer, ConnectionState::Disconnected);
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "transport error");
                errors.publish(&SessionError::Transport(Box::new(e)));
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
