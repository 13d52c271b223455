//! Wraps headerless linear PCM in a minimal WAV container.

/// Sample rate assumed when the upstream MIME type carries no `rate=` hint.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Frame raw PCM samples as a WAV byte stream.
///
/// Emits the fixed 44-byte RIFF header (PCM format block, derived byte rate
/// and block alignment) followed by the samples untouched, so the payload
/// round-trips exactly.
pub fn wrap_pcm(samples: &[u8], sample_rate: u32, channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let byte_rate = sample_rate * u32::from(channels) * u32::from(bits_per_sample) / 8;
    let block_align = channels * bits_per_sample / 8;
    let data_size = u32::try_from(samples.len()).unwrap_or(u32::MAX);

    let mut out = Vec::with_capacity(44 + samples.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // format block size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(samples);
    out
}

/// Parse the sample rate out of a MIME parameter string like
/// `audio/L16;codec=pcm;rate=24000`. Absent or unparsable → 24000 Hz.
pub fn sample_rate_from_mime(mime: &str) -> u32 {
    mime.split_once("rate=")
        .map(|(_, rest)| rest)
        .and_then(|rest| rest.split(';').next())
        .and_then(|rate| rate.trim().parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}
