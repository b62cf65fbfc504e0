//! Connection management and command dispatch.

use crate::auth::{CredentialHasher, PassThrough};
use crate::config::ConnectionConfig;
use crate::error::ClientError;
use crate::keepalive::{FailureHandler, KeepaliveScheduler};
use crate::session::{Role, Session, SessionState};
use crate::transport::Transport;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use xmcam_protocol::message::{parse_session_id, reply_status, LoginParams, NamedQuery};
use xmcam_protocol::{
    Body, Decoder, Encoder, FrameHeader, MessageKind, Payload, StatusCode, FRAME_HEADER_SIZE,
};

/// Reply to one command.
#[derive(Debug, Clone)]
pub struct Response {
    /// Kind of the request this reply answers.
    pub kind: MessageKind,
    /// Reply frame header.
    pub header: FrameHeader,
    /// Decoded reply payload.
    pub body: Body,
}

impl Response {
    /// Device status (`Ret`) of a structured reply.
    pub fn status(&self) -> Option<StatusCode> {
        self.body.as_structured().and_then(reply_status)
    }

    /// Fails with `ClientError::Device` if the reply carries a non-success status.
    pub fn ensure_success(&self) -> Result<(), ClientError> {
        match self.status() {
            Some(status) if !status.is_success() => Err(ClientError::Device {
                kind: self.kind,
                status,
            }),
            _ => Ok(()),
        }
    }

    /// Returns the structured reply, or `Null` for raw and empty replies.
    pub fn into_structured(self) -> Value {
        self.body.into_structured()
    }
}

/// A connection to a device.
///
/// Every request/response exchange holds the transport lock from the first
/// byte sent until the last reply byte is read, so the keepalive task and
/// callers never interleave frames.
pub struct Connection {
    config: ConnectionConfig,
    hasher: Box<dyn CredentialHasher>,
    /// Transport, `None` until connected and after close.
    transport: Mutex<Option<Transport>>,
    session: parking_lot::Mutex<Session>,
    keepalive: parking_lot::Mutex<Option<KeepaliveScheduler>>,
    keepalive_failure: parking_lot::Mutex<Option<FailureHandler>>,
}

impl Connection {
    /// Creates a primary connection (not yet connected).
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_session(config, Session::new())
    }

    fn with_session(config: ConnectionConfig, session: Session) -> Self {
        Self {
            config,
            hasher: Box::new(PassThrough),
            transport: Mutex::new(None),
            session: parking_lot::Mutex::new(session),
            keepalive: parking_lot::Mutex::new(None),
            keepalive_failure: parking_lot::Mutex::new(None),
        }
    }

    /// Replaces the credential hasher used by [`Connection::login`].
    pub fn with_hasher(mut self, hasher: impl CredentialHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Installs the callback invoked when a keepalive exchange fails.
    ///
    /// Takes effect for schedulers started after this call.
    pub fn on_keepalive_failure(&self, handler: FailureHandler) {
        *self.keepalive_failure.lock() = Some(handler);
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn role(&self) -> Role {
        self.session.lock().role()
    }

    pub fn state(&self) -> SessionState {
        self.session.lock().state()
    }

    pub fn session_id(&self) -> u32 {
        self.session.lock().session_id()
    }

    /// Sequence number of the most recent reply.
    pub fn sequence(&self) -> i32 {
        self.session.lock().sequence()
    }

    /// Returns whether a keepalive scheduler is attached.
    pub fn keepalive_running(&self) -> bool {
        self.keepalive
            .lock()
            .as_ref()
            .map_or(false, KeepaliveScheduler::is_running)
    }

    /// Opens the transport. A connection that was closed cannot be reopened.
    pub async fn connect(&self) -> Result<(), ClientError> {
        let mut guard = self.transport.lock().await;
        if guard.is_some() {
            return Ok(());
        }
        {
            let session = self.session.lock();
            if session.is_closed() {
                return Err(ClientError::InvalidState {
                    operation: "connect",
                    expected: "a connection that was never closed",
                    actual: session.state(),
                });
            }
        }

        let transport = Transport::connect(
            &self.config.address(),
            self.config.connect_timeout(),
            self.config.request_timeout(),
            self.config.read_buffer_size,
        )
        .await?;
        *guard = Some(transport);

        let mut session = self.session.lock();
        session.on_connected();
        tracing::debug!(
            "Connected to {} as {:?} (session {})",
            self.config.address(),
            session.role(),
            xmcam_protocol::format_session_id(session.session_id())
        );
        Ok(())
    }

    /// Sends one command and waits for its reply.
    pub async fn execute(
        &self,
        kind: MessageKind,
        payload: Payload,
    ) -> Result<Response, ClientError> {
        let (header, raw) = {
            let mut guard = self.transport.lock().await;
            let transport = guard.as_mut().ok_or(ClientError::NotConnected)?;

            let header = self.send_and_read_header(transport, kind, &payload).await?;
            let raw = transport.recv_exact(header.payload_len as usize).await?;
            transport.finish_exchange();
            (header, raw)
        };

        tracing::debug!(
            "{} reply: seq={} len={}",
            kind,
            header.sequence,
            header.payload_len
        );
        let body = Decoder::decode_body(kind, raw)?;
        Ok(Response { kind, header, body })
    }

    /// Sends one command and streams the raw reply payload into `sink`.
    ///
    /// Returns the number of bytes written. Fails with `EmptyResponse` and
    /// leaves `sink` untouched if the reply has no payload.
    pub async fn execute_download<W>(
        &self,
        kind: MessageKind,
        payload: Payload,
        sink: &mut W,
    ) -> Result<u64, ClientError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut guard = self.transport.lock().await;
        let transport = guard.as_mut().ok_or(ClientError::NotConnected)?;

        let header = self.send_and_read_header(transport, kind, &payload).await?;
        let total = header.payload_len as usize;
        if total == 0 {
            transport.finish_exchange();
            tracing::debug!("{} reply is empty", kind);
            return Err(ClientError::EmptyResponse { kind });
        }

        let mut chunk = vec![0u8; self.config.read_buffer_size.clamp(1, total)];
        let mut remaining = total;
        let mut sink_error = None;
        while remaining > 0 {
            let n = remaining.min(chunk.len());
            transport.recv_into(&mut chunk[..n]).await?;
            remaining -= n;
            // keep draining after a sink failure so the next frame stays aligned
            if sink_error.is_none() {
                if let Err(e) = sink.write_all(&chunk[..n]).await {
                    sink_error = Some(e);
                }
            }
        }
        transport.finish_exchange();
        drop(guard);

        if let Some(e) = sink_error {
            return Err(ClientError::Io(e));
        }
        sink.flush().await?;

        tracing::debug!("{} downloaded {} bytes", kind, total);
        Ok(total as u64)
    }

    /// Encodes and sends a request, then reads the reply header.
    async fn send_and_read_header(
        &self,
        transport: &mut Transport,
        kind: MessageKind,
        payload: &Payload,
    ) -> Result<FrameHeader, ClientError> {
        let session_id = self.session.lock().session_id();
        let encoded = Encoder::encode(kind, session_id, payload)?;

        transport.begin_exchange()?;
        tracing::debug!("Sending {} ({} bytes)", kind, encoded.len());
        transport.send_exact(&encoded).await?;

        let head = transport.recv_exact(FRAME_HEADER_SIZE).await?;
        let header = FrameHeader::decode(&head)?;
        self.session.lock().record_reply(&header);
        Ok(header)
    }

    /// Logs in and, on success, starts the keepalive scheduler.
    pub async fn login(
        self: &Arc<Self>,
        username: &str,
        password: &str,
    ) -> Result<Response, ClientError> {
        let params = LoginParams::new(username, self.hasher.hash(password));
        let payload = Payload::structured(&params)?;

        {
            let mut session = self.session.lock();
            if session.role() != Role::Primary || session.state() != SessionState::Connected {
                return Err(ClientError::InvalidState {
                    operation: "login",
                    expected: "a connected primary session",
                    actual: session.state(),
                });
            }
            session.on_login_started();
        }

        let response = match self.execute(MessageKind::LOGIN, payload).await {
            Ok(response) => response,
            Err(e) => {
                self.session.lock().on_login_failed();
                return Err(e);
            }
        };

        let status = response.status().unwrap_or(StatusCode::UNKNOWN_ERROR);
        if status != StatusCode::OK {
            self.session.lock().on_login_failed();
            tracing::warn!("Login as {} rejected: {}", username, status);
            return Err(ClientError::AuthenticationFailed { status });
        }

        let session_id = if response.header.session_id != 0 {
            response.header.session_id
        } else {
            response
                .body
                .as_structured()
                .and_then(|v| v.get("SessionID"))
                .and_then(Value::as_str)
                .and_then(parse_session_id)
                .unwrap_or(0)
        };
        self.session.lock().on_login_accepted(session_id);
        tracing::info!(
            "Logged in to {} as {} (session {})",
            self.config.address(),
            username,
            xmcam_protocol::format_session_id(session_id)
        );

        self.start_keepalive();
        Ok(response)
    }

    /// Sends one keepalive command.
    pub async fn keep_alive(&self) -> Result<(), ClientError> {
        let response = self
            .execute(
                MessageKind::KEEPALIVE,
                Payload::structured(&NamedQuery::new("KeepAlive"))?,
            )
            .await?;
        response.ensure_success()
    }

    /// Attaches a keepalive scheduler to an authenticated primary session.
    fn start_keepalive(self: &Arc<Self>) {
        if self.role() != Role::Primary {
            return;
        }
        let mut slot = self.keepalive.lock();
        if slot.is_some() {
            return;
        }
        let handler = self.keepalive_failure.lock().clone();
        *slot = Some(KeepaliveScheduler::start(
            Arc::downgrade(self),
            self.config.keepalive_interval(),
            handler,
        ));
    }

    /// Stops the keepalive scheduler, waiting for an in-flight keepalive to finish.
    pub async fn stop_keepalive(&self) {
        let scheduler = self.keepalive.lock().take();
        if let Some(scheduler) = scheduler {
            scheduler.stop().await;
        }
    }

    /// Opens a sub-connection bound to this session's identifier.
    pub async fn open_sub(&self) -> Result<Connection, ClientError> {
        let session_id = {
            let session = self.session.lock();
            if session.role() != Role::Primary || !session.is_authenticated() {
                return Err(ClientError::InvalidState {
                    operation: "open_sub",
                    expected: "an authenticated primary session",
                    actual: session.state(),
                });
            }
            session.session_id()
        };

        let sub = Connection::with_session(self.config.clone(), Session::bound_to(session_id));
        sub.connect().await?;
        Ok(sub)
    }

    /// Logs out, then closes the connection.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.stop_keepalive().await;
        let result = self
            .execute(MessageKind::LOGOUT, Payload::Structured(json!({"Name": ""})))
            .await
            .and_then(|response| response.ensure_success());
        self.close().await;
        tracing::info!("Logged out of {}", self.config.address());
        result
    }

    /// Stops the keepalive scheduler and closes the transport. Safe to call more than once.
    pub async fn close(&self) {
        self.stop_keepalive().await;

        let transport = self.transport.lock().await.take();
        if let Some(mut transport) = transport {
            transport.close().await;
            tracing::info!("Closed connection to {}", self.config.address());
        }
        self.session.lock().on_disconnected();
    }

    pub fn is_connected(&self) -> bool {
        self.state() != SessionState::Disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDevice, Reply};
    use bytes::Bytes;
    use std::time::Duration;

    const SESSION: u32 = 0x0000_0011;

    async fn logged_in(device: &MockDevice) -> Arc<Connection> {
        let conn = Arc::new(Connection::new(device.config()));
        conn.connect().await.unwrap();
        conn.login("admin", "").await.unwrap();
        conn
    }

    #[tokio::test]
    async fn test_login_accepted_stores_session_and_starts_keepalive() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        assert_eq!(conn.session_id(), SESSION);
        assert_eq!(conn.state(), SessionState::Authenticated);
        assert!(conn.keepalive_running());

        let login = &device.requests()[0];
        assert_eq!(login.header.kind, MessageKind::LOGIN);
        assert_eq!(login.header.session_id, 0);
        let body = login.structured();
        assert!(body.get("SessionID").is_none());
        assert_eq!(body["UserName"], "admin");
        assert_eq!(body["LoginType"], "DVRIP-Web");

        conn.close().await;
        assert!(!conn.keepalive_running());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let device = MockDevice::start(|req| {
            if req.header.kind == MessageKind::LOGIN {
                Reply::json_with_session(0, json!({"Ret": 203}))
            } else {
                Reply::json(json!({"Ret": 100}))
            }
        })
        .await;

        let conn = Arc::new(Connection::new(device.config()));
        conn.connect().await.unwrap();
        let result = conn.login("admin", "wrong").await;

        assert!(matches!(
            result,
            Err(ClientError::AuthenticationFailed { status }) if status == StatusCode::BAD_PASSWORD
        ));
        assert_eq!(conn.state(), SessionState::Connected);
        assert_eq!(conn.session_id(), 0);
        assert!(!conn.keepalive_running());
        conn.close().await;
    }

    #[tokio::test]
    async fn test_login_exchange_failure_returns_to_connected() {
        let device = MockDevice::start(|req| {
            if req.header.kind == MessageKind::LOGIN {
                Reply::Hangup
            } else {
                Reply::json(json!({"Ret": 100}))
            }
        })
        .await;

        let conn = Arc::new(Connection::new(device.config()));
        conn.connect().await.unwrap();
        assert!(conn.login("admin", "").await.is_err());

        assert_eq!(conn.state(), SessionState::Connected);
        assert_eq!(conn.session_id(), 0);
        assert!(!conn.keepalive_running());
        conn.close().await;
    }

    #[tokio::test]
    async fn test_login_uses_hasher() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = Arc::new(
            Connection::new(device.config()).with_hasher(|p: &str| format!("hashed:{}", p)),
        );
        conn.connect().await.unwrap();
        conn.login("admin", "secret").await.unwrap();

        assert_eq!(device.requests()[0].structured()["PassWord"], "hashed:secret");
        conn.close().await;
    }

    #[tokio::test]
    async fn test_login_twice_rejected() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        let result = conn.login("admin", "").await;
        assert!(matches!(result, Err(ClientError::InvalidState { .. })));
        conn.close().await;
    }

    #[tokio::test]
    async fn test_session_propagates_to_next_command() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        let response = conn
            .execute(
                MessageKind::SYSINFO,
                Payload::structured(&NamedQuery::new("SystemInfo")).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), Some(StatusCode::OK));

        let requests = device.requests();
        let sysinfo = &requests[1];
        assert_eq!(sysinfo.header.kind, MessageKind::SYSINFO);
        assert_eq!(sysinfo.header.session_id, SESSION);
        assert_eq!(sysinfo.structured()["SessionID"], "0x00000011");
        conn.close().await;
    }

    #[tokio::test]
    async fn test_sequence_tracks_latest_reply() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        for _ in 0..3 {
            let response = conn
                .execute(MessageKind::USERS_GET, Payload::Structured(json!({})))
                .await
                .unwrap();
            assert_eq!(conn.sequence(), response.header.sequence);
        }
        assert_eq!(conn.sequence(), 4);
        conn.close().await;
    }

    #[tokio::test]
    async fn test_execute_requires_connect() {
        let conn = Connection::new(ConnectionConfig::new("127.0.0.1", 1));
        let result = conn.execute(MessageKind::KEEPALIVE, Payload::Empty).await;
        assert!(matches!(result, Err(ClientError::NotConnected)));
    }

    #[tokio::test]
    async fn test_decode_error_keeps_connection_usable() {
        let device = MockDevice::start(|req| match req.header.kind {
            MessageKind::SYSINFO => Reply::payload(b"{\"Ret\": 100,".to_vec()),
            _ => MockDevice::standard(SESSION)(req),
        })
        .await;
        let conn = logged_in(&device).await;

        let result = conn.execute(MessageKind::SYSINFO, Payload::Structured(json!({}))).await;
        assert!(matches!(&result, Err(e) if e.is_decode_error()));

        conn.keep_alive().await.unwrap();
        conn.close().await;
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let device = MockDevice::start(|req| match req.header.kind {
            MessageKind::SYSINFO => Reply::Bytes(vec![0u8; 20]),
            _ => MockDevice::standard(SESSION)(req),
        })
        .await;
        let conn = logged_in(&device).await;

        let result = conn.execute(MessageKind::SYSINFO, Payload::Structured(json!({}))).await;
        assert!(matches!(
            result,
            Err(ClientError::Protocol(xmcam_protocol::ProtocolError::MalformedHeader(_)))
        ));

        // the frame boundary is lost
        let result = conn.keep_alive().await;
        assert!(matches!(result, Err(ClientError::Desynchronized)));
        conn.close().await;
    }

    #[tokio::test]
    async fn test_peer_closes_mid_exchange() {
        let device = MockDevice::start(|req| match req.header.kind {
            MessageKind::SYSINFO => Reply::Hangup,
            _ => MockDevice::standard(SESSION)(req),
        })
        .await;
        let conn = logged_in(&device).await;

        let result = conn.execute(MessageKind::SYSINFO, Payload::Structured(json!({}))).await;
        assert!(matches!(result, Err(ClientError::ConnectionClosed)));
        conn.close().await;
    }

    #[tokio::test]
    async fn test_reply_timeout() {
        let device = MockDevice::start(|req| match req.header.kind {
            MessageKind::SYSINFO => Reply::Silent,
            _ => MockDevice::standard(SESSION)(req),
        })
        .await;
        let config = device
            .config()
            .with_request_timeout(Duration::from_millis(100));
        let conn = Arc::new(Connection::new(config));
        conn.connect().await.unwrap();
        conn.login("admin", "").await.unwrap();

        let result = conn.execute(MessageKind::SYSINFO, Payload::Structured(json!({}))).await;
        assert!(matches!(result, Err(ClientError::Timeout)));
        conn.close().await;
    }

    #[tokio::test]
    async fn test_download_streams_payload() {
        let photo: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        let expected = photo.clone();
        let device = MockDevice::start(move |req| match req.header.kind {
            MessageKind::PHOTO_GET => Reply::payload(photo.clone()),
            _ => MockDevice::standard(SESSION)(req),
        })
        .await;
        let conn = logged_in(&device).await;

        let mut sink = Vec::new();
        let written = conn
            .execute_download(MessageKind::PHOTO_GET, Payload::Structured(json!({})), &mut sink)
            .await
            .unwrap();
        assert_eq!(written, expected.len() as u64);
        assert_eq!(sink, expected);

        // next exchange is still aligned
        conn.keep_alive().await.unwrap();
        conn.close().await;
    }

    #[tokio::test]
    async fn test_download_sink_failure_drains_reply() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        let mut sink = tokio_test::io::Builder::new()
            .write_error(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            .build();
        let result = conn
            .execute_download(MessageKind::PHOTO_GET, Payload::Structured(json!({})), &mut sink)
            .await;
        assert!(matches!(result, Err(ClientError::Io(_))));

        conn.keep_alive().await.unwrap();
        conn.close().await;
    }

    #[tokio::test]
    async fn test_download_empty_response() {
        let device = MockDevice::start(|req| match req.header.kind {
            MessageKind::CONFIG_EXPORT => Reply::payload(Vec::new()),
            _ => MockDevice::standard(SESSION)(req),
        })
        .await;
        let conn = logged_in(&device).await;

        let mut sink = Vec::new();
        let result = conn
            .execute_download(
                MessageKind::CONFIG_EXPORT,
                Payload::Structured(json!({"Name": ""})),
                &mut sink,
            )
            .await;
        assert!(matches!(
            result,
            Err(ClientError::EmptyResponse { kind }) if kind == MessageKind::CONFIG_EXPORT
        ));
        assert!(sink.is_empty());
        conn.close().await;
    }

    #[tokio::test]
    async fn test_raw_reply_kept_raw() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        let response = conn
            .execute(MessageKind::PHOTO_GET, Payload::Structured(json!({})))
            .await
            .unwrap();
        assert_eq!(
            response.body.as_raw(),
            Some(&Bytes::from_static(MockDevice::PHOTO))
        );
        conn.close().await;
    }

    #[tokio::test]
    async fn test_device_error_status() {
        let device = MockDevice::start(|req| match req.header.kind {
            MessageKind::PTZ => Reply::json(json!({"Ret": 107})),
            _ => MockDevice::standard(SESSION)(req),
        })
        .await;
        let conn = logged_in(&device).await;

        let response = conn
            .execute(MessageKind::PTZ, Payload::Structured(json!({"Name": "OPPTZControl"})))
            .await
            .unwrap();
        assert!(matches!(
            response.ensure_success(),
            Err(ClientError::Device { status, .. }) if status == StatusCode::NO_PERMISSION
        ));
        conn.close().await;
    }

    #[tokio::test]
    async fn test_open_sub_requires_login() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = Connection::new(device.config());
        conn.connect().await.unwrap();

        let result = conn.open_sub().await;
        assert!(matches!(result, Err(ClientError::InvalidState { .. })));
        conn.close().await;
    }

    #[tokio::test]
    async fn test_open_sub_copies_session() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        let sub = conn.open_sub().await.unwrap();
        assert_eq!(sub.role(), Role::Sub);
        assert_eq!(sub.session_id(), SESSION);
        assert_eq!(sub.state(), SessionState::Authenticated);
        assert!(!sub.keepalive_running());

        sub.close().await;
        conn.close().await;
    }

    #[tokio::test]
    async fn test_logout_closes() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        conn.logout().await.unwrap();
        assert_eq!(conn.state(), SessionState::Disconnected);
        assert!(!conn.keepalive_running());

        let requests = device.requests();
        let last = requests.last().unwrap();
        assert_eq!(last.header.kind, MessageKind::LOGOUT);
        assert_eq!(last.structured()["SessionID"], "0x00000011");
    }

    #[tokio::test]
    async fn test_close_idempotent() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;

        conn.close().await;
        conn.close().await;
        assert!(!conn.is_connected());
        assert!(matches!(
            conn.keep_alive().await,
            Err(ClientError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_reconnect_after_close_rejected() {
        let device = MockDevice::start(MockDevice::standard(SESSION)).await;
        let conn = logged_in(&device).await;
        conn.close().await;

        let result = conn.connect().await;
        assert!(matches!(
            result,
            Err(ClientError::InvalidState {
                operation: "connect",
                actual: SessionState::Disconnected,
                ..
            })
        ));
        assert!(!conn.is_connected());
        assert_eq!(conn.state(), SessionState::Disconnected);

        let result = conn.login("admin", "").await;
        assert!(matches!(result, Err(ClientError::InvalidState { .. })));
        assert_eq!(
            device
                .requests()
                .iter()
                .filter(|r| r.header.kind == MessageKind::LOGIN)
                .count(),
            1
        );
    }
}
