//! Pipeline component tests
//!
//! Exercises audio encoding and prompt construction without requiring
//! camera or audio hardware

use std::io::Cursor;

use vigia::persona;
use vigia::voice::{SAMPLE_RATE, samples_to_wav};

/// Generate sine wave audio samples
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");

    // WAV should have reasonable size
    assert!(wav_data.len() > 44); // WAV header is 44 bytes
}

#[test]
fn test_wav_roundtrip() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    // Read WAV back
    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
}

#[test]
fn test_wav_of_silence_is_silent() {
    let silence = generate_silence(0.05);
    let wav_data = samples_to_wav(&silence, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();
    assert!(reader.samples::<i16>().all(|s| s.unwrap() == 0));
}

#[test]
fn test_wav_clamps_out_of_range_samples() {
    // Samples beyond [-1.0, 1.0] must clamp, not wrap
    let loud = vec![2.0_f32, -2.0];
    let wav_data = samples_to_wav(&loud, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();
    let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    assert_eq!(read[0], i16::MAX);
    assert_eq!(read[1], i16::MIN);
}

#[test]
fn test_user_prompt_quotes_transcript() {
    let prompt = persona::user_prompt("hola");
    assert!(prompt.contains("'hola'"));
    assert!(prompt.contains("cámara de seguridad"));
}

#[test]
fn test_user_prompt_empty_transcript_placeholder() {
    // An empty transcript never reaches the model as an empty quote
    let prompt = persona::user_prompt("");
    assert!(prompt.contains(persona::NO_CLEAR_AUDIO));
    assert!(!prompt.contains("''"));
}

#[test]
fn test_persona_constraints_present() {
    assert!(persona::SYSTEM_PROMPT.contains("español"));
    assert!(persona::SYSTEM_PROMPT.contains("breve"));
    assert!(persona::SYSTEM_PROMPT.contains("evita inventar"));
}
