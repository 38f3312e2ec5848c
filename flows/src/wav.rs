//! WAV framing for the speech capability.
//!
//! The speech model emits raw PCM samples; the reader UI expects a
//! self-contained playable container. Fixed format: mono, 24 kHz, 16-bit
//! linear PCM.

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub const CHANNELS: u16 = 1;
pub const SAMPLE_RATE: u32 = 24_000;
pub const BITS_PER_SAMPLE: u16 = 16;

const HEADER_LEN: usize = 44;

/// Wraps raw PCM bytes in a RIFF/WAVE container.
pub fn encode_wav(pcm: &[u8]) -> Vec<u8> {
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = SAMPLE_RATE * block_align as u32;
    let data_len = pcm.len() as u32;

    let mut out = Vec::with_capacity(HEADER_LEN + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}

/// Frames PCM bytes as WAV and renders the `data:audio/wav;base64,...` URI
/// the UI plays directly.
pub fn pcm_to_wav_data_uri(pcm: &[u8]) -> String {
    format!("data:audio/wav;base64,{}", STANDARD.encode(encode_wav(pcm)))
}
