//! Media post-processing: raw-PCM-to-WAV framing and aspect-ratio cropping.

pub mod audio;
pub mod image;

pub use audio::{DEFAULT_SAMPLE_RATE, sample_rate_from_mime, wrap_pcm};
pub use image::{TARGET_ASPECT, center_crop_to_aspect};
