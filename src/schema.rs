//! Output track list derived from the first segment.

use ffmpeg_next::Rational;

use crate::error::SchemaError;
use crate::media::{SegmentOutput, SourceStream, TrackRole};

/// One output track. Packets are routed to it by their source stream index,
/// which equals `index` because the schema keeps source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub index: usize,
    pub role: TrackRole,
    pub codec: String,
    pub input_time_base: Rational,
    pub output_time_base: Rational,
}

#[derive(Debug, Clone)]
pub struct OutputSchema {
    tracks: Vec<Track>,
    video: usize,
    audio: usize,
}

/// Finds the single video and single audio stream.
fn locate_av_pair<S: SourceStream>(streams: &[S]) -> Result<(usize, usize), SchemaError> {
    let mut video = None;
    let mut audio = None;
    for stream in streams {
        match stream.role() {
            TrackRole::Video => {
                if let Some(first) = video {
                    return Err(SchemaError::DuplicateVideo {
                        first,
                        second: stream.index(),
                    });
                }
                video = Some(stream.index());
            }
            TrackRole::Audio => {
                if let Some(first) = audio {
                    return Err(SchemaError::DuplicateAudio {
                        first,
                        second: stream.index(),
                    });
                }
                audio = Some(stream.index());
            }
            TrackRole::Other => {}
        }
    }
    match (video, audio) {
        (None, _) => Err(SchemaError::MissingVideo),
        (_, None) => Err(SchemaError::MissingAudio),
        (Some(v), Some(a)) => Ok((v, a)),
    }
}

impl OutputSchema {
    /// Declares one output stream per input stream, in source order, with
    /// codec parameters copied and the container codec tag cleared.
    ///
    /// Output time bases start out equal to the input ones; call
    /// [`OutputSchema::bind_output_time_bases`] once the header is written.
    pub fn build<O: SegmentOutput>(
        streams: &[O::Stream],
        output: &mut O,
    ) -> Result<Self, SchemaError> {
        let (video, audio) = locate_av_pair(streams)?;

        let mut tracks = Vec::with_capacity(streams.len());
        for (position, stream) in streams.iter().enumerate() {
            let index = output
                .add_stream(stream)
                .map_err(|cause| SchemaError::CodecCopy {
                    index: stream.index(),
                    cause,
                })?;
            if index != position || stream.index() != position {
                return Err(SchemaError::LayoutMismatch(format!(
                    "stream {} was declared as output stream {}",
                    stream.index(),
                    index
                )));
            }
            log::debug!(
                "output stream {}: {} {} time_base={}",
                index,
                stream.role(),
                stream.codec_name(),
                stream.time_base()
            );
            tracks.push(Track {
                index,
                role: stream.role(),
                codec: stream.codec_name(),
                input_time_base: stream.time_base(),
                output_time_base: stream.time_base(),
            });
        }

        Ok(Self {
            tracks,
            video,
            audio,
        })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn video_index(&self) -> usize {
        self.video
    }

    pub fn audio_index(&self) -> usize {
        self.audio
    }

    /// Records the time bases the muxer settled on. Returns the index of the
    /// first track the output does not know about.
    pub fn bind_output_time_bases<O: SegmentOutput>(&mut self, output: &O) -> Result<(), usize> {
        for track in self.tracks.iter_mut() {
            track.output_time_base = output.time_base(track.index).ok_or(track.index)?;
        }
        Ok(())
    }

    /// Checks that another segment's streams line up with this schema index
    /// by index: same count, role and codec.
    pub fn validate_layout<S: SourceStream>(&self, streams: &[S]) -> Result<(), SchemaError> {
        if streams.len() != self.tracks.len() {
            return Err(SchemaError::LayoutMismatch(format!(
                "expected {} streams, found {}",
                self.tracks.len(),
                streams.len()
            )));
        }
        for (track, stream) in self.tracks.iter().zip(streams) {
            if stream.index() != track.index
                || stream.role() != track.role
                || stream.codec_name() != track.codec
            {
                return Err(SchemaError::LayoutMismatch(format!(
                    "stream {} is {} {}, expected {} {}",
                    stream.index(),
                    stream.role(),
                    stream.codec_name(),
                    track.role,
                    track.codec
                )));
            }
        }
        Ok(())
    }
}
