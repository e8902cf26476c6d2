//! Sound playback
//!
//! The simulation never plays audio itself; the scheduler hands clips from the
//! asset pool to an [`AudioSink`] supplied by the host.

use crate::assets::SoundClip;

/// Sample rate of generated clips
pub const SYNTH_SAMPLE_RATE: u32 = 22_050;

/// Destination for sound clips
pub trait AudioSink {
    fn play(&mut self, clip: &SoundClip);
}

/// Sink that only records what would have played (headless hosts, tests)
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub played: u64,
}

impl AudioSink for SilentAudio {
    fn play(&mut self, clip: &SoundClip) {
        self.played += 1;
        log::debug!("(silent) play {} ({} bytes)", clip.name, clip.bytes.len());
    }
}

/// Short decaying sine ping, encoded as a 16-bit mono PCM WAV file
pub fn synth_ping_wav(frequency: f32, duration_ms: u32) -> Vec<u8> {
    let sample_count = (SYNTH_SAMPLE_RATE as u64 * duration_ms as u64 / 1000) as usize;
    let samples: Vec<i16> = (0..sample_count)
        .map(|i| {
            let t = i as f32 / SYNTH_SAMPLE_RATE as f32;
            let progress = i as f32 / sample_count.max(1) as f32;
            // Fast exponential decay with a tiny attack to avoid a click
            let attack = (i as f32 / 64.0).min(1.0);
            let envelope = attack * (-5.0 * progress).exp();
            let value = (t * frequency * std::f32::consts::TAU).sin() * envelope * 0.5;
            (value * i16::MAX as f32) as i16
        })
        .collect();
    encode_wav(&samples, SYNTH_SAMPLE_RATE)
}

fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioBuffer, AudioContext, AudioContextState};

    use super::AudioSink;
    use crate::assets::SoundClip;

    /// Plays clips through the Web Audio API
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, muted: false }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, clip: &SoundClip) {
            if self.muted {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let bytes = js_sys::Uint8Array::from(clip.bytes.as_slice());
            let promise = match ctx.decode_audio_data(&bytes.buffer()) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("Cannot decode {}: {:?}", clip.name, e);
                    return;
                }
            };

            let ctx = ctx.clone();
            let name = clip.name.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let decoded = match JsFuture::from(promise).await {
                    Ok(d) => d,
                    Err(e) => {
                        log::warn!("Decoding {} failed: {:?}", name, e);
                        return;
                    }
                };
                let buffer: AudioBuffer = decoded.unchecked_into();
                if let Ok(source) = ctx.create_buffer_source() {
                    source.set_buffer(Some(&buffer));
                    let _ = source.connect_with_audio_node(&ctx.destination());
                    let _ = source.start();
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_header() {
        let wav = synth_ping_wav(440.0, 100);
        let samples = SYNTH_SAMPLE_RATE as usize / 10;
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(wav.len(), 44 + samples * 2);
        let data_len = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_len as usize, samples * 2);
    }

    #[test]
    fn test_ping_decays() {
        let wav = synth_ping_wav(440.0, 200);
        let pcm: Vec<i16> = wav[44..]
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();
        let peak = |s: &[i16]| s.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0);
        let quarter = pcm.len() / 4;
        assert!(peak(&pcm[..quarter]) > peak(&pcm[3 * quarter..]));
    }

    #[test]
    fn test_silent_audio_counts() {
        let mut sink = SilentAudio::default();
        let clip = SoundClip {
            name: "x".into(),
            bytes: vec![1, 2, 3],
        };
        sink.play(&clip);
        sink.play(&clip);
        assert_eq!(sink.played, 2);
    }
}
