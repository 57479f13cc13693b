//! Container I/O seams used by the reconstruction core.

use std::fmt;
use std::path::Path;

use ffmpeg_next::Rational;

/// What kind of elementary stream a track carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackRole {
    Video,
    Audio,
    Other,
}

impl TrackRole {
    /// Video and audio tracks take part in overlap detection.
    pub fn is_av(self) -> bool {
        matches!(self, TrackRole::Video | TrackRole::Audio)
    }
}

impl fmt::Display for TrackRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackRole::Video => write!(f, "video"),
            TrackRole::Audio => write!(f, "audio"),
            TrackRole::Other => write!(f, "other"),
        }
    }
}

/// A stream as enumerated by an opened input.
pub trait SourceStream {
    fn index(&self) -> usize;
    fn role(&self) -> TrackRole;
    fn time_base(&self) -> Rational;
    fn codec_name(&self) -> String;
}

/// An encoded access unit. `None` timestamps mean "no timestamp".
pub trait MediaPacket {
    fn stream_index(&self) -> usize;
    fn pts(&self) -> Option<i64>;
    fn dts(&self) -> Option<i64>;
    fn duration(&self) -> i64;
    fn set_pts(&mut self, pts: Option<i64>);
    fn set_dts(&mut self, dts: Option<i64>);
    fn set_duration(&mut self, duration: i64);
    /// Forget the byte offset in the source container.
    fn clear_position(&mut self);
}

/// An opened input segment: its streams and a one-shot packet sequence.
pub trait SegmentInput {
    type Stream: SourceStream;
    type Packet: MediaPacket;

    fn streams(&self) -> &[Self::Stream];

    /// Next packet in container order; `None` once the input is exhausted
    /// or unreadable.
    fn read_packet(&mut self) -> Option<Self::Packet>;
}

/// A writable output container.
pub trait SegmentOutput {
    type Stream: SourceStream;
    type Packet: MediaPacket;

    /// Declares a stream copying `stream`'s codec parameters, returning the
    /// output stream index.
    fn add_stream(&mut self, stream: &Self::Stream) -> anyhow::Result<usize>;
    fn write_header(&mut self) -> anyhow::Result<()>;
    /// Final once the header is written.
    fn time_base(&self, index: usize) -> Option<Rational>;
    /// Takes ownership of the packet; interleaving is the output's job.
    fn write_packet(&mut self, packet: Self::Packet) -> anyhow::Result<()>;
    fn write_trailer(&mut self) -> anyhow::Result<()>;
}

/// Opens inputs and creates outputs of one container implementation.
pub trait ContainerIo {
    type Input: SegmentInput;
    type Output: SegmentOutput<
            Stream = <Self::Input as SegmentInput>::Stream,
            Packet = <Self::Input as SegmentInput>::Packet,
        >;

    fn open_input(&mut self, path: &Path) -> anyhow::Result<Self::Input>;
    fn create_output(&mut self, path: &Path) -> anyhow::Result<Self::Output>;
}
