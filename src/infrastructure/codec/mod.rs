//! Binary framing: base64, raw 16-bit PCM, and WAV packaging. No media
//! transcoding happens here.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::domain::AudioClip;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid base64 payload: {0}")]
    MalformedBase64(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub fn decode_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    BASE64
        .decode(text)
        .map_err(|e| CodecError::MalformedBase64(e.to_string()))
}

/// Intake guard: only image uploads are accepted as generation sources.
pub fn ensure_image_mime(mime_type: &str) -> Result<(), CodecError> {
    if mime_type.starts_with("image/") {
        Ok(())
    } else {
        Err(CodecError::UnsupportedMediaType(mime_type.to_string()))
    }
}

/// Interpret raw bytes as 16-bit little-endian PCM and normalize to [-1, 1].
/// An odd trailing byte is an incomplete sample and is truncated.
pub fn decode_pcm_to_clip(bytes: &[u8], sample_rate: u32, channels: u16) -> AudioClip {
    let samples: Vec<f32> = bytes
        .chunks_exact(2)
        .map(|chunk| {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            sample as f32 / 32768.0
        })
        .collect();

    AudioClip::new(samples, sample_rate, channels)
}

/// Frame a clip as a 16-bit PCM WAV file so it can be served playable.
pub fn clip_to_wav(clip: &AudioClip) -> Vec<u8> {
    let bytes_per_sample: u16 = 2;
    let data_size = (clip.samples.len() * bytes_per_sample as usize) as u32;
    let byte_rate = clip.sample_rate * clip.channels as u32 * bytes_per_sample as u32;
    let block_align = clip.channels * bytes_per_sample;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&clip.channels.to_le_bytes());
    buf.extend_from_slice(&clip.sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&(bytes_per_sample * 8).to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for sample in &clip.samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let pcm = (clamped * 32767.0) as i16;
        buf.extend_from_slice(&pcm.to_le_bytes());
    }

    buf
}
