use crate::{
    AudioCodec, AudioError, CaptureDevice, CpalCaptureDevice, RecordingFormat, SessionEvent,
    audio::WavSink,
};

use std::{sync::mpsc, time::Duration};

use hound::WavReader;

/// WHAT: Desktop capture only encodes linear PCM
/// WHY: There is no AAC encoder behind the cpal device
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_aac_format_when_preparing_capture_then_device_error() {
    // Given: The default microphone
    let (events, _rx) = mpsc::channel();
    let mut device = CpalCaptureDevice::new(events).unwrap();
    let dir = tempfile::tempdir().unwrap();

    // When: Preparing for AAC
    let result = device.prepare(&dir.path().join("a.m4a"), &RecordingFormat::default());

    // Then
    assert!(matches!(result, Err(AudioError::DeviceError { .. })));
}

/// WHAT: A short capture produces a finalized 16-bit WAV and a completion event
/// WHY: The player reads the artifact back as soon as capture finishes
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_microphone_when_recording_briefly_then_wav_written_and_finish_reported() {
    // Given: A prepared capture device
    let (events, rx) = mpsc::channel();
    let mut device = CpalCaptureDevice::new(events).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.wav");
    let format = RecordingFormat::default().with_codec(AudioCodec::LinearPcm);
    device.prepare(&path, &format).unwrap();

    // When: Recording for half a second
    device.record().unwrap();
    assert!(device.is_recording());
    std::thread::sleep(Duration::from_millis(500));
    device.stop().unwrap();

    // Then: File is valid, event reported, time advanced
    assert!(!device.is_recording());
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(1)).unwrap(),
        SessionEvent::RecordingFinished { success: true }
    );
    let reader = WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().bits_per_sample, RecordingFormat::PCM_BITS_PER_SAMPLE);
    assert_eq!(reader.spec().channels, format.channels);
    assert!(device.current_time() > Duration::ZERO);
}

/// WHAT: Stopping a device that never started is a no-op
/// WHY: Teardown paths may stop an idle recorder
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_idle_capture_when_stopping_then_nothing_reported() {
    // Given
    let (events, rx) = mpsc::channel();
    let mut device = CpalCaptureDevice::new(events).unwrap();

    // When
    device.stop().unwrap();

    // Then
    assert!(rx.try_recv().is_err());
}

/// WHAT: Audio captured at 48kHz is written with the recording's 44.1kHz header
/// WHY: The artifact must have the sample rate the recording format promises
#[test]
#[allow(clippy::unwrap_used)]
fn given_48khz_input_when_writing_44_1khz_recording_then_header_and_length_match_format() {
    // Given: A WAV sink for the default 44.1kHz stereo PCM format fed at 48kHz
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resampled.wav");
    let format = RecordingFormat::default().with_codec(AudioCodec::LinearPcm);
    let mut sink = WavSink::create(&path, &format, 48_000).unwrap();

    // When: One second of stereo audio arrives in device-sized buffers
    let second = vec![0.25f32; 48_000 * usize::from(format.channels)];
    for buffer in second.chunks(960) {
        sink.write(buffer).unwrap();
    }
    sink.finish().unwrap();

    // Then: The header carries the requested rate and the length is one second
    let reader = WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, format.sample_rate);
    assert_eq!(reader.spec().channels, format.channels);
    assert_eq!(reader.duration(), format.sample_rate);
}

/// WHAT: Matching rates are written through without conversion
/// WHY: A device already at the recording rate needs no resampler
#[test]
#[allow(clippy::unwrap_used)]
fn given_matching_rate_when_writing_then_every_frame_kept() {
    // Given: A mono 44.1kHz sink fed at 44.1kHz
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("direct.wav");
    let format = RecordingFormat {
        codec: AudioCodec::LinearPcm,
        sample_rate: 44_100,
        channels: 1,
    };
    let mut sink = WavSink::create(&path, &format, 44_100).unwrap();

    // When
    sink.write(&[0.5; 1_000]).unwrap();
    sink.finish().unwrap();

    // Then
    let mut reader = WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 44_100);
    assert_eq!(reader.duration(), 1_000);
    let first: i16 = reader.samples::<i16>().next().unwrap().unwrap();
    assert_eq!(first, (0.5 * f32::from(i16::MAX)) as i16);
}
