//! Talk channel: streaming audio into the device.
//!
//! The channel is claimed and audio is streamed on a sub-connection sharing
//! the primary session identifier. Starting and stopping playback are
//! commands on the primary connection.

use crate::connection::Connection;
use crate::error::ClientError;
use crate::media::{chunk_pcm, AudioSource, AUDIO_FRAME_SIZE};
use bytes::BytesMut;
use std::sync::Arc;
use xmcam_protocol::message::{TalkAction, TalkRequest, TALK_STREAM_MARKER};
use xmcam_protocol::{MessageKind, Payload};

/// Talk channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TalkState {
    /// Sub-connection open, channel not claimed.
    Idle,
    /// Channel claimed; frames may be sent.
    Claimed,
    /// Device playback started.
    Talking,
    /// Sub-connection closed.
    Closed,
}

/// An audio talk session on a device.
pub struct TalkChannel {
    primary: Arc<Connection>,
    sub: Connection,
    state: TalkState,
    frames_sent: u64,
}

impl TalkChannel {
    /// Opens the sub-connection for an authenticated primary connection.
    pub async fn open(primary: Arc<Connection>) -> Result<Self, ClientError> {
        let sub = primary.open_sub().await?;
        tracing::info!(
            "Talk sub-connection open (session {})",
            xmcam_protocol::format_session_id(sub.session_id())
        );
        Ok(Self {
            primary,
            sub,
            state: TalkState::Idle,
            frames_sent: 0,
        })
    }

    pub fn state(&self) -> TalkState {
        self.state
    }

    pub fn session_id(&self) -> u32 {
        self.sub.session_id()
    }

    /// Frames sent since the channel was opened.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    fn require(
        &self,
        operation: &'static str,
        allowed: &[TalkState],
        expected: &'static str,
    ) -> Result<(), ClientError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ClientError::Audio(format!(
                "{} requires a {} talk channel, channel is {:?}",
                operation, expected, self.state
            )))
        }
    }

    /// Claims the device audio channel.
    pub async fn claim(&mut self) -> Result<(), ClientError> {
        self.require("claim", &[TalkState::Idle], "idle")?;
        self.sub
            .execute(
                MessageKind::TALK_CLAIM,
                Payload::structured(&TalkRequest::new(TalkAction::Claim))?,
            )
            .await?
            .ensure_success()?;
        self.state = TalkState::Claimed;
        tracing::debug!("Talk channel claimed");
        Ok(())
    }

    /// Starts device playback.
    pub async fn start(&mut self) -> Result<(), ClientError> {
        self.require("start", &[TalkState::Claimed], "claimed")?;
        self.primary
            .execute(
                MessageKind::TALK,
                Payload::structured(&TalkRequest::new(TalkAction::Start))?,
            )
            .await?
            .ensure_success()?;
        self.state = TalkState::Talking;
        tracing::info!("Talk started");
        Ok(())
    }

    /// Sends one audio frame of at most [`AUDIO_FRAME_SIZE`] bytes.
    pub async fn send_frame(&mut self, frame: &[u8]) -> Result<(), ClientError> {
        self.require(
            "send_frame",
            &[TalkState::Claimed, TalkState::Talking],
            "claimed or talking",
        )?;
        if frame.len() > AUDIO_FRAME_SIZE {
            return Err(ClientError::Audio(format!(
                "frame of {} bytes exceeds {} bytes",
                frame.len(),
                AUDIO_FRAME_SIZE
            )));
        }

        let mut payload = BytesMut::with_capacity(TALK_STREAM_MARKER.len() + frame.len());
        payload.extend_from_slice(&TALK_STREAM_MARKER);
        payload.extend_from_slice(frame);

        self.sub
            .execute(MessageKind::TALK_DATA, Payload::Raw(payload.freeze()))
            .await?
            .ensure_success()?;
        self.frames_sent += 1;
        Ok(())
    }

    /// Sends `pcm` as consecutive frames. Returns the number of frames sent.
    pub async fn send_pcm(&mut self, pcm: &[u8]) -> Result<usize, ClientError> {
        let mut sent = 0;
        for frame in chunk_pcm(pcm) {
            self.send_frame(frame).await?;
            sent += 1;
        }
        tracing::debug!("Sent {} bytes of audio in {} frames", pcm.len(), sent);
        Ok(sent)
    }

    /// Loads audio from `source` and sends it.
    pub async fn play<S: AudioSource>(&mut self, source: &S) -> Result<usize, ClientError> {
        let pcm = source.load_pcm().await?;
        self.send_pcm(&pcm).await
    }

    /// Stops device playback. The channel stays claimed.
    pub async fn stop(&mut self) -> Result<(), ClientError> {
        self.require("stop", &[TalkState::Talking], "talking")?;
        self.primary
            .execute(
                MessageKind::TALK,
                Payload::structured(&TalkRequest::new(TalkAction::Stop))?,
            )
            .await?
            .ensure_success()?;
        self.state = TalkState::Claimed;
        tracing::info!("Talk stopped after {} frames", self.frames_sent);
        Ok(())
    }

    /// Closes the sub-connection. The primary connection is left open.
    pub async fn close(&mut self) {
        self.sub.close().await;
        self.state = TalkState::Closed;
    }
}
