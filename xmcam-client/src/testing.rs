//! In-process mock device for tests.

use crate::config::ConnectionConfig;
use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use xmcam_protocol::{format_session_id, Decoder, Frame, FrameHeader, MessageKind, Payload};

/// One request frame as received by the device.
#[derive(Debug, Clone)]
pub(crate) struct Request {
    /// Index of the accepted connection, in accept order.
    pub conn: usize,
    pub header: FrameHeader,
    pub payload: Payload,
}

impl Request {
    pub fn structured(&self) -> &Value {
        match &self.payload {
            Payload::Structured(value) => value,
            _ => panic!("{} request is not structured", self.header.kind),
        }
    }

    pub fn raw(&self) -> &Bytes {
        match &self.payload {
            Payload::Raw(bytes) => bytes,
            _ => panic!("{} request is not raw", self.header.kind),
        }
    }
}

/// What the device does with a request.
pub(crate) enum Reply {
    /// Replies with a frame of the same kind carrying `payload`.
    /// `session_id` of `None` echoes the request's identifier.
    Frame {
        session_id: Option<u32>,
        payload: Vec<u8>,
    },
    /// Writes bytes verbatim.
    Bytes(Vec<u8>),
    /// Sends nothing.
    Silent,
    /// Closes the connection.
    Hangup,
}

impl Reply {
    /// Structured reply terminated the way devices do (`\n\0`).
    pub fn json(value: Value) -> Self {
        Self::json_inner(None, value)
    }

    pub fn json_with_session(session_id: u32, value: Value) -> Self {
        Self::json_inner(Some(session_id), value)
    }

    fn json_inner(session_id: Option<u32>, value: Value) -> Self {
        let mut payload = value.to_string().into_bytes();
        payload.extend_from_slice(b"\n\0");
        Reply::Frame {
            session_id,
            payload,
        }
    }

    pub fn payload(payload: Vec<u8>) -> Self {
        Reply::Frame {
            session_id: None,
            payload,
        }
    }
}

type Handler = Arc<dyn Fn(&Request) -> Reply + Send + Sync>;

/// Routes client logs to the test output, filtered by `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Shared {
    handler: Handler,
    requests: Mutex<Vec<Request>>,
    protocol_errors: AtomicUsize,
    reply_delay: Mutex<Duration>,
}

/// Device listening on an ephemeral loopback port.
pub(crate) struct MockDevice {
    port: u16,
    shared: Arc<Shared>,
}

impl MockDevice {
    pub const PHOTO: &'static [u8] = b"\xff\xd8\xff\xe0mock-jpeg\xff\xd9";
    pub const CONFIG_ARCHIVE: &'static [u8] = b"PK\x03\x04mock-config";
    pub const DEVICE_TIME: &'static str = "2024-03-01 12:30:45";

    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> Reply + Send + Sync + 'static,
    {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let shared = Arc::new(Shared {
            handler: Arc::new(handler),
            requests: Mutex::new(Vec::new()),
            protocol_errors: AtomicUsize::new(0),
            reply_delay: Mutex::new(Duration::ZERO),
        });

        let accept_shared = shared.clone();
        tokio::spawn(async move {
            let mut next_conn = 0;
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, next_conn, accept_shared.clone()));
                next_conn += 1;
            }
        });

        Self { port, shared }
    }

    /// Handler answering the whole command catalog with success.
    pub fn standard(session_id: u32) -> impl Fn(&Request) -> Reply + Send + Sync + Clone + 'static {
        move |req: &Request| match req.header.kind {
            MessageKind::LOGIN => Reply::json_with_session(
                session_id,
                json!({
                    "Ret": 100,
                    "SessionID": format_session_id(session_id),
                    "AliveInterval": 20,
                    "ChannelNum": 1,
                    "DeviceType ": "IPC",
                }),
            ),
            MessageKind::PHOTO_GET => Reply::payload(Self::PHOTO.to_vec()),
            MessageKind::CONFIG_EXPORT => Reply::payload(Self::CONFIG_ARCHIVE.to_vec()),
            MessageKind::TALK_DATA => Reply::payload(Vec::new()),
            MessageKind::TIME_QUERY => Reply::json(json!({
                "Name": "OPTimeQuery",
                "OPTimeQuery": Self::DEVICE_TIME,
                "Ret": 100,
            })),
            MessageKind::SYSINFO | MessageKind::ABILITY_GET | MessageKind::CONFIG_GET => {
                let name = req.structured()["Name"].clone();
                let mut reply = json!({"Name": name.clone(), "Ret": 100});
                if let Some(section) = name.as_str() {
                    reply[section] = json!({"Mock": true});
                }
                Reply::json(reply)
            }
            MessageKind::CHANNEL_TITLE_GET => Reply::json(json!({
                "Name": "ChannelTitle",
                "ChannelTitle": ["CAM01"],
                "Ret": 100,
            })),
            MessageKind::USERS_GET => Reply::json(json!({
                "Ret": 100,
                "Users": [{"Name": "admin", "Group": "admin"}],
            })),
            _ => Reply::json(json!({"Ret": 100})),
        }
    }

    /// Delays every reply by `delay`.
    pub fn with_reply_delay(self, delay: Duration) -> Self {
        *self.shared.reply_delay.lock() = delay;
        self
    }

    /// Client configuration pointing at this device.
    pub fn config(&self) -> ConnectionConfig {
        ConnectionConfig::new("127.0.0.1", self.port)
            .with_connect_timeout(Duration::from_secs(2))
            .with_request_timeout(Duration::from_secs(2))
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<Request> {
        self.shared.requests.lock().clone()
    }

    /// Requests received on one connection.
    pub fn requests_on(&self, conn: usize) -> Vec<Request> {
        self.requests().into_iter().filter(|r| r.conn == conn).collect()
    }

    /// Number of frames that failed to parse.
    pub fn protocol_errors(&self) -> usize {
        self.shared.protocol_errors.load(Ordering::SeqCst)
    }
}

async fn serve(mut stream: TcpStream, conn: usize, shared: Arc<Shared>) {
    let mut decoder = Decoder::new();
    let mut buf = vec![0u8; 4096];
    let mut sequence = 0i32;

    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        decoder.extend(&buf[..n]);

        loop {
            let frame = match decoder.decode_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(_) => {
                    shared.protocol_errors.fetch_add(1, Ordering::SeqCst);
                    return;
                }
            };

            let payload = match Decoder::decode_request(frame.header.kind, frame.payload.clone())
            {
                Ok(payload) => payload,
                Err(_) => {
                    shared.protocol_errors.fetch_add(1, Ordering::SeqCst);
                    Payload::Raw(frame.payload.clone())
                }
            };
            let request = Request {
                conn,
                header: frame.header,
                payload,
            };
            shared.requests.lock().push(request.clone());

            let delay = *shared.reply_delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let out = match (shared.handler)(&request) {
                Reply::Frame {
                    session_id,
                    payload,
                } => {
                    sequence += 1;
                    let mut header = FrameHeader::new(
                        request.header.kind,
                        session_id.unwrap_or(request.header.session_id),
                    );
                    header.sequence = sequence;
                    let frame = Frame::new(header, Bytes::from(payload)).unwrap();
                    frame.encode()
                }
                Reply::Bytes(bytes) => BytesMut::from(&bytes[..]),
                Reply::Silent => continue,
                Reply::Hangup => return,
            };
            if stream.write_all(&out).await.is_err() {
                return;
            }
        }
    }
}
