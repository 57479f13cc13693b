use ffmpeg_next::{Rational, codec::Parameters, format::stream, media};

/// Snapshot of one input stream: its codec parameters and timing.
pub struct AvStream {
    index: usize,
    parameters: Parameters,
    time_base: Rational,
}

impl AvStream {
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn medium(&self) -> media::Type {
        self.parameters.medium()
    }

    pub fn is_video(&self) -> bool {
        self.medium() == media::Type::Video
    }

    pub fn is_audio(&self) -> bool {
        self.medium() == media::Type::Audio
    }

    /// Lowercase codec name, e.g. "h264" or "aac".
    pub fn codec_name(&self) -> String {
        format!("{:?}", self.parameters.id()).to_lowercase()
    }
}

impl From<stream::Stream<'_>> for AvStream {
    fn from(stream: stream::Stream<'_>) -> Self {
        Self {
            index: stream.index(),
            parameters: stream.parameters(),
            time_base: stream.time_base(),
        }
    }
}

impl Clone for AvStream {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            parameters: self.parameters.clone(),
            time_base: self.time_base,
        }
    }
}

impl std::fmt::Debug for AvStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvStream")
            .field("index", &self.index)
            .field("medium", &self.medium())
            .field("codec", &self.codec_name())
            .field("time_base", &self.time_base)
            .finish()
    }
}
