//! # xmcam-client
//!
//! Client library for XM/DVRIP network video recorders and cameras.
//!
//! This crate provides:
//! - Buffered TCP transport with exact-read semantics
//! - Session login and propagation of the device-assigned session identifier
//! - Serialized request/response exchanges shared with a background keepalive
//! - Talk sub-connections for streaming PCM audio into the device
//! - A high-level API for the common command catalog

pub mod auth;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod keepalive;
pub mod media;
pub mod session;
pub mod talk;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{CredentialHasher, PassThrough};
pub use client::Client;
pub use config::{ConfigError, ConnectionConfig};
pub use connection::{Connection, Response};
pub use error::ClientError;
pub use keepalive::{FailureHandler, KeepaliveScheduler};
pub use media::{
    chunk_pcm, frame_count, playback_duration, AudioSource, PcmBuffer, PcmFile, AUDIO_FRAME_SIZE,
};
pub use session::{Role, SessionState};
pub use talk::{TalkChannel, TalkState};
