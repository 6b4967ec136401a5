use crate::audio::Resampler;

const DEVICE_RATE: u32 = 48_000;
const RECORDING_RATE: u32 = 44_100;
const STEREO: u16 = 2;
const LENGTH_TOLERANCE: u64 = 100;
const MAX_AMPLITUDE: f32 = 1.5;

/// WHAT: One second of 48kHz stereo becomes about one second of 44.1kHz stereo
/// WHY: Microphones commonly run at 48kHz while recordings are 44.1kHz
#[test]
#[allow(clippy::unwrap_used)]
fn given_48khz_stereo_when_resampling_to_44_1khz_then_length_matches_duration() {
    // Given: A 48kHz -> 44.1kHz stereo resampler and one second of a tone
    let mut resampler = Resampler::new(DEVICE_RATE, RECORDING_RATE, STEREO).unwrap();
    let input: Vec<f32> = (0..DEVICE_RATE as usize)
        .flat_map(|i| {
            let sample = (i as f32 * 0.05).sin() * 0.5;
            [sample, sample]
        })
        .collect();

    // When: Converting the whole second at once
    let mut output = resampler.push(&input).unwrap();
    output.extend(resampler.flush().unwrap());

    // Then: About 44100 frames of two channels, all finite and bounded
    assert_eq!(output.len() % usize::from(STEREO), 0);
    let frames = (output.len() / usize::from(STEREO)) as i64;
    assert!(
        (frames - i64::from(RECORDING_RATE)).unsigned_abs() < LENGTH_TOLERANCE,
        "Expected ~{} frames, got {}",
        RECORDING_RATE,
        frames
    );
    assert!(
        output
            .iter()
            .all(|&s| s.is_finite() && s.abs() <= MAX_AMPLITUDE)
    );
}

/// WHAT: Feeding audio in small callback-sized slices gives the same length as one call
/// WHY: Capture delivers audio in device buffers of arbitrary size
#[test]
#[allow(clippy::unwrap_used)]
fn given_small_slices_when_pushing_then_flush_reaches_expected_length() {
    // Given: A mono resampler and half a second of silence in 441-frame slices
    let mut resampler = Resampler::new(DEVICE_RATE, RECORDING_RATE, 1).unwrap();
    let input = vec![0.0f32; DEVICE_RATE as usize / 2];

    // When: Pushing slice by slice, then flushing
    let mut output = Vec::new();
    for slice in input.chunks(441) {
        output.extend(resampler.push(slice).unwrap());
    }
    output.extend(resampler.flush().unwrap());

    // Then: Exactly the frames half a second takes at 44.1kHz
    assert_eq!(output.len(), RECORDING_RATE as usize / 2);
}

/// WHAT: Flushing without input produces no output
/// WHY: A capture stopped before the first callback has nothing to convert
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_samples_when_flushing_then_empty_output() {
    // Given
    let mut resampler = Resampler::new(DEVICE_RATE, RECORDING_RATE, STEREO).unwrap();

    // When
    let pushed = resampler.push(&[]).unwrap();
    let flushed = resampler.flush().unwrap();

    // Then
    assert!(pushed.is_empty());
    assert!(flushed.is_empty());
}
