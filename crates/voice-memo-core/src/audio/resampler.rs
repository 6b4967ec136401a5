use crate::{AudioError, CoreResult};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

/// Requested input frames per resampler pass.
const CHUNK_FRAMES: usize = 1024;

/// Streaming sample-rate converter for interleaved audio.
///
/// Samples are fed in arbitrary slices with [`push`](Self::push); whole
/// chunks are converted as they fill up and the remainder is converted,
/// zero-padded, by [`flush`](Self::flush). The total output length tracks
/// `input_frames * output_rate / input_rate`.
pub(crate) struct Resampler {
    resampler: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
    channels: usize,
    chunk_frames: usize,
    pending: Vec<f32>,
    frames_in: u64,
    frames_out: u64,
}

impl Resampler {
    #[track_caller]
    #[instrument]
    pub(crate) fn new(input_rate: u32, output_rate: u32, channels: u16) -> CoreResult<Self> {
        let channels = usize::from(channels.max(1));
        let sub_chunks = 2;

        let resampler = Fft::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            CHUNK_FRAMES,
            sub_chunks,
            channels,
            FixedSync::Input,
        )
        .map_err(|e| AudioError::ResamplingError {
            reason: format!("Failed to create resampler: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let chunk_frames = resampler.input_frames_next();

        debug!(input_rate, output_rate, channels, chunk_frames, "Resampler initialized");

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
            channels,
            chunk_frames,
            pending: Vec::with_capacity(chunk_frames * channels),
            frames_in: 0,
            frames_out: 0,
        })
    }

    /// Queue interleaved `samples` and return whatever could be converted.
    #[track_caller]
    pub(crate) fn push(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        self.frames_in += (samples.len() / self.channels) as u64;
        self.pending.extend_from_slice(samples);

        let chunk_len = self.chunk_frames * self.channels;
        let mut output = Vec::new();
        while self.pending.len() >= chunk_len {
            let chunk: Vec<f32> = self.pending.drain(..chunk_len).collect();
            self.process_chunk(&chunk, &mut output)?;
        }

        Ok(output)
    }

    /// Convert what is still queued and trim the output to the expected length.
    #[track_caller]
    pub(crate) fn flush(&mut self) -> CoreResult<Vec<f32>> {
        let expected = self.expected_frames();
        let chunk_len = self.chunk_frames * self.channels;
        let mut output = Vec::new();

        // The filter delay holds back up to a chunk, so one extra silent pass
        // may be needed to reach the expected length.
        let mut passes = 0;
        while (self.frames_out < expected || !self.pending.is_empty()) && passes < 3 {
            let take = self.pending.len().min(chunk_len);
            let mut chunk: Vec<f32> = self.pending.drain(..take).collect();
            chunk.resize(chunk_len, 0.0);
            self.process_chunk(&chunk, &mut output)?;
            passes += 1;
        }

        let overshoot = self.frames_out.saturating_sub(expected) as usize * self.channels;
        output.truncate(output.len().saturating_sub(overshoot));
        self.frames_out = self.frames_out.min(expected);

        debug!(
            frames_in = self.frames_in,
            frames_out = self.frames_out,
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampler flushed"
        );

        Ok(output)
    }

    fn expected_frames(&self) -> u64 {
        self.frames_in * u64::from(self.output_rate) / u64::from(self.input_rate.max(1))
    }

    #[track_caller]
    fn process_chunk(&mut self, chunk: &[f32], output: &mut Vec<f32>) -> CoreResult<()> {
        let input_adapter = InterleavedSlice::new(chunk, self.channels, self.chunk_frames).map_err(
            |e| AudioError::ResamplingError {
                reason: format!("Failed to create input adapter: {}", e),
                location: ErrorLocation::from(Location::caller()),
            },
        )?;

        let output_frames = self.resampler.output_frames_max();
        let mut output_chunk = vec![0.0f32; output_frames * self.channels];

        let mut output_adapter =
            InterleavedSlice::new_mut(&mut output_chunk, self.channels, output_frames).map_err(
                |e| AudioError::ResamplingError {
                    reason: format!("Failed to create output adapter: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                },
            )?;

        let (_input_frames, frames_written) = self
            .resampler
            .process_into_buffer(&input_adapter, &mut output_adapter, None)
            .map_err(|e| AudioError::ResamplingError {
                reason: format!("Resampling failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        output.extend_from_slice(&output_chunk[..frames_written * self.channels]);
        self.frames_out += frames_written as u64;

        Ok(())
    }
}
