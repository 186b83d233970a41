use super::input::CapturedAudio;
use crate::{ParleyError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

pub const WAV_MIME: &str = "audio/wav";

/// Encode captured samples as an in-memory 16-bit PCM WAV file
pub fn encode_wav(audio: &CapturedAudio) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: audio.channels.max(1),
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(|e| {
            ParleyError::AudioProcessingError(format!("Failed to create WAV writer: {}", e))
        })?;

        // Convert f32 samples to i16
        for &sample in &audio.samples {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(sample_i16).map_err(|e| {
                ParleyError::AudioProcessingError(format!("Failed to write sample: {}", e))
            })?;
        }

        writer.finalize().map_err(|e| {
            ParleyError::AudioProcessingError(format!("Failed to finalize WAV data: {}", e))
        })?;
    }

    let bytes = cursor.into_inner();
    debug!(
        "Encoded {:.2}s of audio into {} bytes",
        audio.duration_seconds(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;
    use std::f32::consts::PI;

    #[test]
    fn test_encode_wav_is_readable() {
        let sample_rate = 16000;
        let samples: Vec<f32> = (0..sample_rate as usize)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect();
        let audio = CapturedAudio::new(samples.clone(), sample_rate, 1);

        let bytes = encode_wav(&audio).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");

        let mut reader = WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, sample_rate);
        assert_eq!(reader.spec().channels, 1);

        let decoded: Vec<f32> = reader
            .samples::<i16>()
            .map(|s| s.unwrap() as f32 / i16::MAX as f32)
            .collect();
        assert_eq!(decoded.len(), samples.len());
        for (original, read) in samples.iter().zip(decoded.iter()) {
            assert!((original - read).abs() < 0.001);
        }
    }

    #[test]
    fn test_encode_clamps_out_of_range_samples() {
        let audio = CapturedAudio::new(vec![2.0, -2.0], 8000, 1);
        let bytes = encode_wav(&audio).unwrap();
        let mut reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![i16::MAX, -i16::MAX]);
    }

    #[test]
    fn test_encode_empty_recording() {
        let audio = CapturedAudio::new(Vec::new(), 16000, 1);
        let bytes = encode_wav(&audio).unwrap();
        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.len(), 0);
    }
}
