/// Encoding used for recorded artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    /// MPEG-4 AAC in an `.m4a` container.
    Aac,
    /// 16-bit linear PCM in a `.wav` container.
    LinearPcm,
}

impl AudioCodec {
    /// File extension (without the dot) for artifacts in this codec.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioCodec::Aac => "m4a",
            AudioCodec::LinearPcm => "wav",
        }
    }
}

/// Fixed encoding parameters applied when a recorder is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingFormat {
    /// Output codec.
    pub codec: AudioCodec,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl RecordingFormat {
    /// Bits per sample written for [`AudioCodec::LinearPcm`].
    pub const PCM_BITS_PER_SAMPLE: u16 = 16;

    /// Same rate and channel layout, different codec.
    pub fn with_codec(self, codec: AudioCodec) -> Self {
        Self { codec, ..self }
    }
}

impl Default for RecordingFormat {
    fn default() -> Self {
        Self {
            codec: AudioCodec::Aac,
            sample_rate: 44_100,
            channels: 2,
        }
    }
}
