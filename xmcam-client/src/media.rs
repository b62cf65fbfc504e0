//! PCM audio sources and framing for the talk channel.
//!
//! Audio must already be G.711 A-law, 8 kHz, 8-bit mono. Converting other
//! formats is left to the caller.

use crate::error::ClientError;
use bytes::Bytes;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use xmcam_protocol::message::AudioFormat;

/// Bytes of audio carried by one talk frame.
pub const AUDIO_FRAME_SIZE: usize = 320;

/// Splits PCM data into talk frames. The last frame may be shorter.
pub fn chunk_pcm(pcm: &[u8]) -> std::slice::Chunks<'_, u8> {
    pcm.chunks(AUDIO_FRAME_SIZE)
}

/// Number of talk frames needed for `len` bytes of PCM.
pub fn frame_count(len: usize) -> usize {
    len.div_ceil(AUDIO_FRAME_SIZE)
}

/// Time the device needs to play `len` bytes of PCM.
pub fn playback_duration(len: usize) -> Duration {
    let rate = u64::from(AudioFormat::G711_ALAW.bytes_per_second());
    Duration::from_millis(len as u64 * 1000 / rate)
}

/// Something that yields PCM ready to stream.
pub trait AudioSource {
    fn load_pcm(&self) -> impl Future<Output = Result<Bytes, ClientError>> + Send;
}

/// PCM file on disk.
#[derive(Debug, Clone)]
pub struct PcmFile {
    path: PathBuf,
}

impl PcmFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioSource for PcmFile {
    async fn load_pcm(&self) -> Result<Bytes, ClientError> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            ClientError::Audio(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        if data.is_empty() {
            return Err(ClientError::Audio(format!(
                "{} contains no audio",
                self.path.display()
            )));
        }
        tracing::debug!(
            "Loaded {} bytes of PCM from {} ({:?})",
            data.len(),
            self.path.display(),
            playback_duration(data.len())
        );
        Ok(Bytes::from(data))
    }
}

/// PCM held in memory.
#[derive(Debug, Clone)]
pub struct PcmBuffer(Bytes);

impl PcmBuffer {
    pub fn new(pcm: impl Into<Bytes>) -> Self {
        Self(pcm.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AudioSource for PcmBuffer {
    async fn load_pcm(&self) -> Result<Bytes, ClientError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chunk_exact_multiple() {
        let pcm = vec![0x55u8; AUDIO_FRAME_SIZE * 3];
        let frames: Vec<_> = chunk_pcm(&pcm).collect();
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.len() == AUDIO_FRAME_SIZE));
    }

    #[test]
    fn test_chunk_short_tail() {
        let pcm = vec![0x55u8; 700];
        let sizes: Vec<_> = chunk_pcm(&pcm).map(<[u8]>::len).collect();
        assert_eq!(sizes, vec![320, 320, 60]);
    }

    #[test]
    fn test_chunk_empty() {
        assert_eq!(chunk_pcm(&[]).count(), 0);
        assert_eq!(frame_count(0), 0);
    }

    #[test]
    fn test_playback_duration() {
        assert_eq!(playback_duration(8000), Duration::from_secs(1));
        assert_eq!(playback_duration(960), Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_pcm_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.pcm");
        std::fs::write(&path, vec![0xd5u8; 1000]).unwrap();

        let pcm = PcmFile::new(&path).load_pcm().await.unwrap();
        assert_eq!(pcm.len(), 1000);
    }

    #[tokio::test]
    async fn test_pcm_file_missing_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = PcmFile::new(dir.path().join("missing.pcm"));
        assert!(matches!(missing.load_pcm().await, Err(ClientError::Audio(_))));

        let path = dir.path().join("empty.pcm");
        std::fs::write(&path, b"").unwrap();
        assert!(matches!(
            PcmFile::new(&path).load_pcm().await,
            Err(ClientError::Audio(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_chunking_preserves_audio(len in 0usize..5000) {
            let pcm: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let frames: Vec<&[u8]> = chunk_pcm(&pcm).collect();

            prop_assert_eq!(frames.len(), frame_count(len));
            prop_assert_eq!(frames.len(), (len + AUDIO_FRAME_SIZE - 1) / AUDIO_FRAME_SIZE);
            if let Some((last, rest)) = frames.split_last() {
                prop_assert!(rest.iter().all(|f| f.len() == AUDIO_FRAME_SIZE));
                let tail = if len % AUDIO_FRAME_SIZE == 0 { AUDIO_FRAME_SIZE } else { len % AUDIO_FRAME_SIZE };
                prop_assert_eq!(last.len(), tail);
            }
            prop_assert_eq!(frames.concat(), pcm);
        }
    }
}
