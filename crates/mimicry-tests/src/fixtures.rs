//! Generated WAV fixtures.
//!
//! Everything here is synthesized in memory, so tests carry no binary assets.

use std::f32::consts::PI;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A sine wave of `seconds` duration.
pub fn tone(freq: f32, amplitude: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
    let len = (sample_rate as f32 * seconds).round() as usize;
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Deterministic white noise in [-amplitude, amplitude].
pub fn noise(seed: u32, amplitude: f32, len: usize) -> Vec<f32> {
    let mut rng = Pcg32::seed_from_u64(seed as u64);
    (0..len)
        .map(|_| rng.gen_range(-amplitude..=amplitude))
        .collect()
}

/// Encodes mono samples as 16-bit PCM.
pub fn pcm16_wav(sample_rate: u32, samples: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    encode(spec, |writer| {
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(v)?;
        }
        Ok(())
    })
}

/// Encodes interleaved samples as 32-bit float.
pub fn float_wav(sample_rate: u32, channels: u16, interleaved: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    encode(spec, |writer| {
        for &s in interleaved {
            writer.write_sample(s)?;
        }
        Ok(())
    })
}

/// A 16-bit mono sine at half amplitude.
pub fn sine_wav(freq: f32, sample_rate: u32, seconds: f32) -> Vec<u8> {
    pcm16_wav(sample_rate, &tone(freq, 0.5, sample_rate, seconds))
}

/// A 16-bit mono clip of digital silence.
pub fn silent_wav(sample_rate: u32, seconds: f32) -> Vec<u8> {
    let len = (sample_rate as f32 * seconds).round() as usize;
    pcm16_wav(sample_rate, &vec![0.0; len])
}

/// Writes `bytes` to `dir/name`, creating parent directories, and returns the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create fixture directory");
    }
    fs::write(&path, bytes).expect("failed to write fixture");
    path
}

fn encode<F>(spec: hound::WavSpec, body: F) -> Vec<u8>
where
    F: FnOnce(&mut hound::WavWriter<&mut Cursor<Vec<u8>>>) -> hound::Result<()>,
{
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("invalid WAV spec");
        body(&mut writer).expect("failed to write samples");
        writer.finalize().expect("failed to finalize WAV");
    }
    cursor.into_inner()
}
