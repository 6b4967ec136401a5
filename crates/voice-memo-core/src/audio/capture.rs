use crate::{
    AudioError, CoreResult, EventSender, SessionEvent,
    audio::{AudioCodec, CaptureDevice, RecordingFormat, Resampler},
};

use std::{
    fs::File,
    io::BufWriter,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument};

type WavFileWriter = WavWriter<BufWriter<File>>;

/// 16-bit WAV output at the recording format's rate and channel count.
///
/// Interleaved samples written at the device rate are converted on the fly
/// when the two rates differ.
pub(crate) struct WavSink {
    writer: WavFileWriter,
    resampler: Option<Resampler>,
}

impl WavSink {
    /// Create the file at `path` for samples arriving at `input_rate`.
    #[track_caller]
    pub(crate) fn create(path: &Path, format: &RecordingFormat, input_rate: u32) -> CoreResult<Self> {
        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: RecordingFormat::PCM_BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };

        let resampler = if input_rate == format.sample_rate {
            None
        } else {
            Some(Resampler::new(input_rate, format.sample_rate, format.channels)?)
        };

        let writer = WavWriter::create(path, spec).map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to create WAV writer at {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self { writer, resampler })
    }

    /// Append interleaved samples already mapped to the output channel layout.
    #[track_caller]
    pub(crate) fn write(&mut self, samples: &[f32]) -> CoreResult<()> {
        match self.resampler.as_mut() {
            Some(resampler) => {
                let converted = resampler.push(samples)?;
                write_samples(&mut self.writer, &converted)
            }
            None => write_samples(&mut self.writer, samples),
        }
    }

    /// Drain the resampler and finalize the WAV header.
    #[track_caller]
    pub(crate) fn finish(mut self) -> CoreResult<()> {
        if let Some(resampler) = self.resampler.as_mut() {
            let tail = resampler.flush()?;
            write_samples(&mut self.writer, &tail)?;
        }

        self.writer.finalize().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to finalize WAV: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[track_caller]
fn write_samples(writer: &mut WavFileWriter, samples: &[f32]) -> CoreResult<()> {
    for &sample in samples {
        let amplitude = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(amplitude)
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to write sample: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }
    Ok(())
}

/// Microphone capture into a 16-bit PCM WAV file.
///
/// Samples arrive on cpal's audio thread at the device's native rate, are
/// mapped to the requested channel layout and handed to a [`WavSink`], which
/// converts them to the requested sample rate. The sink is shared behind a
/// mutex and finished in `stop()`.
pub struct CpalCaptureDevice {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    target: Option<(PathBuf, RecordingFormat)>,
    sink: Arc<Mutex<Option<WavSink>>>,
    frames: Arc<AtomicU64>,
    /// Set before the stream is dropped so a late callback writes nothing.
    shutdown: Arc<AtomicBool>,
    events: EventSender,
}

impl CpalCaptureDevice {
    /// Open the default input device.
    #[track_caller]
    #[instrument(skip(events))]
    pub fn new(events: EventSender) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(AudioError::DeviceError {
                reason: "No microphone found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "Capture device opened"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            target: None,
            sink: Arc::new(Mutex::new(None)),
            frames: Arc::new(AtomicU64::new(0)),
            shutdown: Arc::new(AtomicBool::new(false)),
            events,
        })
    }

    fn notify(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!(?event, "Event receiver gone, dropping event");
        }
    }
}

impl CaptureDevice for CpalCaptureDevice {
    #[track_caller]
    #[instrument(skip(self))]
    fn prepare(&mut self, path: &Path, format: &RecordingFormat) -> CoreResult<()> {
        if format.codec != AudioCodec::LinearPcm {
            return Err(AudioError::DeviceError {
                reason: format!("Capture device only encodes linear PCM, got {:?}", format.codec),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if format.sample_rate != self.config.sample_rate {
            debug!(
                requested = format.sample_rate,
                device = self.config.sample_rate,
                "Capture will be resampled"
            );
        }

        self.target = Some((path.to_path_buf(), *format));

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn record(&mut self) -> CoreResult<()> {
        let (path, format) = self.target.clone().ok_or(AudioError::DeviceError {
            reason: "Capture device was not prepared".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let wav = WavSink::create(&path, &format, self.config.sample_rate)?;

        *self.sink.lock().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to lock WAV sink: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })? = Some(wav);

        self.frames.store(0, Ordering::Release);
        self.shutdown.store(false, Ordering::Release);

        let sink = Arc::clone(&self.sink);
        let frames = Arc::clone(&self.frames);
        let shutdown = Arc::clone(&self.shutdown);
        let input_channels = usize::from(self.config.channels.max(1));
        let output_channels = usize::from(format.channels.max(1));

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    let mut guard = sink.lock().unwrap_or_else(|e| {
                        error!("WAV sink lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    let Some(wav) = guard.as_mut() else {
                        return;
                    };

                    let mut mapped = Vec::with_capacity(data.len() / input_channels * output_channels);
                    for frame in data.chunks(input_channels) {
                        for channel in 0..output_channels {
                            let sample = frame
                                .get(channel)
                                .or_else(|| frame.last())
                                .copied()
                                .unwrap_or(0.0);
                            mapped.push(sample);
                        }
                    }

                    if let Err(e) = wav.write(&mapped) {
                        error!(error = ?e, "Failed to write captured audio");
                        return;
                    }
                    frames.fetch_add((mapped.len() / output_channels) as u64, Ordering::AcqRel);
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!(path = ?path, "Audio capture started");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn stop(&mut self) -> CoreResult<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };

        self.shutdown.store(true, Ordering::Release);
        drop(stream);
        // Let an in-flight callback observe the shutdown flag.
        std::thread::sleep(Duration::from_millis(5));

        let wav = self
            .sink
            .lock()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to lock WAV sink: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .take();

        let success = match wav.map(WavSink::finish) {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                error!(error = ?e, "Failed to finish WAV");
                false
            }
            None => false,
        };

        info!(
            frames = self.frames.load(Ordering::Acquire),
            success, "Audio capture stopped"
        );

        self.notify(SessionEvent::RecordingFinished { success });

        Ok(())
    }

    fn current_time(&self) -> Duration {
        let frames = self.frames.load(Ordering::Acquire);
        let rate = self.config.sample_rate.max(1);
        Duration::from_secs_f64(frames as f64 / f64::from(rate))
    }

    fn is_recording(&self) -> bool {
        self.stream.is_some()
    }
}
