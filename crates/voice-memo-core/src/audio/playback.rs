use crate::{AudioError, CoreResult, EventSender, SessionEvent, audio::PlaybackDevice};

use std::{
    fs::File,
    io::BufReader,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use error_location::ErrorLocation;
use hound::WavReader;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, instrument};

/// WAV playback through the default output device.
///
/// A watcher thread waits on the sink and reports
/// [`SessionEvent::PlaybackFinished`] when it drains on its own. Pausing,
/// or dropping the device, suppresses the report.
pub struct RodioPlaybackDevice {
    path: PathBuf,
    duration: Duration,
    output: Option<OutputStream>,
    sink: Option<Arc<Sink>>,
    user_stopped: Arc<AtomicBool>,
    events: EventSender,
}

impl RodioPlaybackDevice {
    /// Bind to the WAV file at `path` and read its length.
    #[track_caller]
    #[instrument(skip(events))]
    pub fn open(path: &Path, events: EventSender) -> CoreResult<Self> {
        let reader = WavReader::open(path).map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to open {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rate = reader.spec().sample_rate.max(1);
        let duration = Duration::from_secs_f64(f64::from(reader.duration()) / f64::from(rate));

        debug!(duration_ms = duration.as_millis(), "Playback device opened");

        Ok(Self {
            path: path.to_path_buf(),
            duration,
            output: None,
            sink: None,
            user_stopped: Arc::new(AtomicBool::new(false)),
            events,
        })
    }

    #[track_caller]
    fn start_sink(&mut self) -> CoreResult<()> {
        if self.output.is_none() {
            let stream =
                OutputStreamBuilder::open_default_stream().map_err(|e| AudioError::DeviceError {
                    reason: format!("Failed to open output stream: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            self.output = Some(stream);
        }
        let Some(output) = self.output.as_ref() else {
            return Ok(());
        };

        let file = File::open(&self.path).map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to open {:?}: {}", self.path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let sink = rodio::play(output.mixer(), BufReader::new(file)).map_err(|e| {
            AudioError::DeviceError {
                reason: format!("Failed to start playback: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;
        let sink = Arc::new(sink);

        let watched = Arc::clone(&sink);
        let user_stopped = Arc::clone(&self.user_stopped);
        let events = self.events.clone();
        std::thread::spawn(move || {
            watched.sleep_until_end();
            if !user_stopped.load(Ordering::Acquire) {
                let _ = events.send(SessionEvent::PlaybackFinished { success: true });
            }
        });

        self.sink = Some(sink);

        Ok(())
    }
}

impl PlaybackDevice for RodioPlaybackDevice {
    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    fn play(&mut self) -> CoreResult<()> {
        self.user_stopped.store(false, Ordering::Release);

        let paused_sink = self.sink.as_ref().filter(|sink| !sink.empty()).cloned();

        if let Some(sink) = paused_sink {
            sink.play();
            info!("Playback resumed");
        } else {
            self.start_sink()?;
            info!("Playback started");
        }

        Ok(())
    }

    fn stop(&mut self) {
        self.user_stopped.store(true, Ordering::Release);
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn current_time(&self) -> Duration {
        self.sink
            .as_ref()
            .map(|sink| sink.get_pos().min(self.duration))
            .unwrap_or(Duration::ZERO)
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.empty() && !sink.is_paused())
    }
}

impl Drop for RodioPlaybackDevice {
    fn drop(&mut self) {
        self.user_stopped.store(true, Ordering::Release);
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
