//! libav-backed [`ContainerIo`] built on `ffmpeg_bus`.

use std::path::Path;

use ffmpeg_bus::{input::AvInput, output::AvOutput, packet::RawPacket, stream::AvStream};
use ffmpeg_next::Rational;

use crate::media::{
    ContainerIo, MediaPacket, SegmentInput, SegmentOutput, SourceStream, TrackRole,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegIo;

impl ContainerIo for FfmpegIo {
    type Input = AvInput;
    type Output = AvOutput;

    fn open_input(&mut self, path: &Path) -> anyhow::Result<AvInput> {
        AvInput::open(path)
    }

    fn create_output(&mut self, path: &Path) -> anyhow::Result<AvOutput> {
        AvOutput::new(path)
    }
}

impl SourceStream for AvStream {
    fn index(&self) -> usize {
        AvStream::index(self)
    }

    fn role(&self) -> TrackRole {
        if self.is_video() {
            TrackRole::Video
        } else if self.is_audio() {
            TrackRole::Audio
        } else {
            TrackRole::Other
        }
    }

    fn time_base(&self) -> Rational {
        AvStream::time_base(self)
    }

    fn codec_name(&self) -> String {
        AvStream::codec_name(self)
    }
}

impl MediaPacket for RawPacket {
    fn stream_index(&self) -> usize {
        self.index()
    }

    fn pts(&self) -> Option<i64> {
        RawPacket::pts(self)
    }

    fn dts(&self) -> Option<i64> {
        RawPacket::dts(self)
    }

    fn duration(&self) -> i64 {
        RawPacket::duration(self)
    }

    fn set_pts(&mut self, pts: Option<i64>) {
        RawPacket::set_pts(self, pts);
    }

    fn set_dts(&mut self, dts: Option<i64>) {
        RawPacket::set_dts(self, dts);
    }

    fn set_duration(&mut self, duration: i64) {
        RawPacket::set_duration(self, duration);
    }

    fn clear_position(&mut self) {
        self.set_position(-1);
    }
}

impl SegmentInput for AvInput {
    type Stream = AvStream;
    type Packet = RawPacket;

    fn streams(&self) -> &[AvStream] {
        AvInput::streams(self)
    }

    fn read_packet(&mut self) -> Option<RawPacket> {
        AvInput::read_packet(self)
    }
}

impl SegmentOutput for AvOutput {
    type Stream = AvStream;
    type Packet = RawPacket;

    fn add_stream(&mut self, stream: &AvStream) -> anyhow::Result<usize> {
        AvOutput::add_stream(self, stream)
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        AvOutput::write_header(self)
    }

    fn time_base(&self, index: usize) -> Option<Rational> {
        AvOutput::time_base(self, index)
    }

    fn write_packet(&mut self, packet: RawPacket) -> anyhow::Result<()> {
        AvOutput::write_packet(self, packet)
    }

    fn write_trailer(&mut self) -> anyhow::Result<()> {
        self.finish()
    }
}

#[cfg(test)]
#[path = "ffmpeg_test.rs"]
mod ffmpeg_test;
