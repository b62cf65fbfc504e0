//! High-level client API.

use crate::auth::CredentialHasher;
use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::ClientError;
use crate::keepalive::FailureHandler;
use crate::session::SessionState;
use crate::talk::TalkChannel;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use xmcam_protocol::message::{
    parse_time_reply, LoginReply, NamedQuery, PtzControl, PtzDirection, TimeSetting,
};
use xmcam_protocol::{format_session_id, MessageKind, Payload, ProtocolError, StatusCode};

/// High-level client for one device.
pub struct Client {
    conn: Arc<Connection>,
}

impl Client {
    /// Creates a new client with the given configuration.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            conn: Arc::new(Connection::new(config)),
        }
    }

    /// Creates a client that hashes the password with `hasher` before login.
    pub fn with_hasher(config: ConnectionConfig, hasher: impl CredentialHasher + 'static) -> Self {
        Self {
            conn: Arc::new(Connection::new(config).with_hasher(hasher)),
        }
    }

    /// Connects and logs in with the configured credentials.
    pub async fn connect_and_login(config: ConnectionConfig) -> Result<Self, ClientError> {
        let client = Self::new(config);
        client.connect().await?;
        client.login().await?;
        Ok(client)
    }

    /// Connects to the device.
    pub async fn connect(&self) -> Result<(), ClientError> {
        self.conn.connect().await
    }

    /// Logs in with the configured credentials and starts the keepalive.
    pub async fn login(&self) -> Result<LoginReply, ClientError> {
        let config = self.conn.config();
        let response = self.conn.login(&config.username, &config.password).await?;
        let session_id = self.conn.session_id();
        let reply = match serde_json::from_value::<LoginReply>(response.into_structured()) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Unreadable login reply, session kept: {}", e);
                LoginReply {
                    status: StatusCode::OK,
                    session_id: Some(format_session_id(session_id)),
                    alive_interval: None,
                    channel_count: None,
                    device_type: None,
                }
            }
        };
        if let Some(interval) = reply.alive_interval {
            tracing::debug!(
                "Device keepalive interval is {}s, channels={:?}",
                interval,
                reply.channel_count
            );
        }
        Ok(reply)
    }

    /// Installs the callback invoked when a keepalive fails.
    ///
    /// Call before [`Client::login`].
    pub fn on_keepalive_failure(&self, handler: FailureHandler) {
        self.conn.on_keepalive_failure(handler);
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    pub fn state(&self) -> SessionState {
        self.conn.state()
    }

    pub fn session_id(&self) -> u32 {
        self.conn.session_id()
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> Arc<Connection> {
        self.conn.clone()
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    async fn request<T: Serialize>(
        &self,
        kind: MessageKind,
        params: &T,
    ) -> Result<Value, ClientError> {
        let response = self.conn.execute(kind, Payload::structured(params)?).await?;
        response.ensure_success()?;
        Ok(response.into_structured())
    }

    async fn download_to_file<T: Serialize>(
        &self,
        kind: MessageKind,
        params: &T,
        path: &Path,
    ) -> Result<u64, ClientError> {
        let mut data = Vec::new();
        let written = self
            .conn
            .execute_download(kind, Payload::structured(params)?, &mut data)
            .await?;
        tokio::fs::write(path, &data).await?;
        tracing::info!("Saved {} ({} bytes) to {}", kind, written, path.display());
        Ok(written)
    }

    // =========================================================================
    // System queries
    // =========================================================================

    /// Queries the device's supported functions.
    pub async fn system_function(&self) -> Result<Value, ClientError> {
        self.request(MessageKind::ABILITY_GET, &NamedQuery::new("SystemFunction"))
            .await
    }

    pub async fn system_info(&self) -> Result<Value, ClientError> {
        self.request(MessageKind::SYSINFO, &NamedQuery::new("SystemInfo"))
            .await
    }

    pub async fn oem_info(&self) -> Result<Value, ClientError> {
        self.request(MessageKind::SYSINFO, &NamedQuery::new("OEMInfo"))
            .await
    }

    pub async fn storage_info(&self) -> Result<Value, ClientError> {
        self.request(MessageKind::SYSINFO, &NamedQuery::new("StorageInfo"))
            .await
    }

    pub async fn channel_title(&self) -> Result<Value, ClientError> {
        self.request(
            MessageKind::CHANNEL_TITLE_GET,
            &NamedQuery::new("ChannelTitle"),
        )
        .await
    }

    /// Lists device user accounts.
    pub async fn users(&self) -> Result<Value, ClientError> {
        self.request(MessageKind::USERS_GET, &json!({})).await
    }

    /// Reads one configuration section, e.g. `"General.General"`.
    pub async fn get_config(&self, name: &str) -> Result<Value, ClientError> {
        self.request(MessageKind::CONFIG_GET, &NamedQuery::new(name))
            .await
    }

    /// Sends one manual keepalive.
    pub async fn keep_alive(&self) -> Result<(), ClientError> {
        self.conn.keep_alive().await
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Starts moving the camera head, or stops it when `stop` is set.
    pub async fn ptz_control(
        &self,
        direction: PtzDirection,
        stop: bool,
    ) -> Result<Value, ClientError> {
        self.request(MessageKind::PTZ, &PtzControl::new(direction, stop))
            .await
    }

    /// Reads the device clock.
    pub async fn time_query(&self) -> Result<NaiveDateTime, ClientError> {
        let reply = self
            .request(MessageKind::TIME_QUERY, &NamedQuery::new("OPTimeQuery"))
            .await?;
        parse_time_reply(&reply).ok_or_else(|| {
            ProtocolError::InvalidPayload("missing or malformed OPTimeQuery").into()
        })
    }

    /// Sets the device clock.
    pub async fn sync_time(&self, time: NaiveDateTime) -> Result<(), ClientError> {
        self.request(MessageKind::SYNC_TIME, &TimeSetting::new(time))
            .await?;
        tracing::info!("Device clock set to {}", time);
        Ok(())
    }

    // =========================================================================
    // Downloads
    // =========================================================================

    /// Saves a snapshot to `path`. No file is created if the device sends nothing.
    pub async fn photo(&self, path: impl AsRef<Path>) -> Result<u64, ClientError> {
        self.download_to_file(MessageKind::PHOTO_GET, &json!({}), path.as_ref())
            .await
    }

    /// Saves the exported configuration archive to `path`.
    pub async fn config_export(&self, path: impl AsRef<Path>) -> Result<u64, ClientError> {
        self.download_to_file(
            MessageKind::CONFIG_EXPORT,
            &NamedQuery::new(""),
            path.as_ref(),
        )
        .await
    }

    // =========================================================================
    // Talk
    // =========================================================================

    /// Opens a talk channel on a new sub-connection.
    pub async fn open_talk(&self) -> Result<TalkChannel, ClientError> {
        TalkChannel::open(self.conn.clone()).await
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Logs out and closes the connection.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.conn.logout().await
    }

    /// Stops the keepalive and closes the connection.
    pub async fn disconnect(&self) {
        self.conn.close().await
    }
}
