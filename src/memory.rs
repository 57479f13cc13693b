//! In-memory containers for exercising the reconstruction core.

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bytes::Bytes;
use ffmpeg_next::Rational;

use crate::media::{
    ContainerIo, MediaPacket, SegmentInput, SegmentOutput, SourceStream, TrackRole,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemStream {
    pub index: usize,
    pub role: TrackRole,
    pub codec: String,
    pub time_base: Rational,
}

impl MemStream {
    pub fn new(index: usize, role: TrackRole, time_base: Rational) -> Self {
        let codec = match role {
            TrackRole::Video => "h264",
            TrackRole::Audio => "aac",
            TrackRole::Other => "mov_text",
        };
        Self {
            index,
            role,
            codec: codec.to_string(),
            time_base,
        }
    }
}

impl SourceStream for MemStream {
    fn index(&self) -> usize {
        self.index
    }
    fn role(&self) -> TrackRole {
        self.role
    }
    fn time_base(&self) -> Rational {
        self.time_base
    }
    fn codec_name(&self) -> String {
        self.codec.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemPacket {
    pub stream: usize,
    pub pts: Option<i64>,
    pub dts: Option<i64>,
    pub duration: i64,
    /// Byte offset in the source, -1 when unknown.
    pub position: i64,
    pub payload: Bytes,
}

impl MemPacket {
    pub fn new(stream: usize, pts: i64) -> Self {
        Self {
            stream,
            pts: Some(pts),
            dts: Some(pts),
            duration: 0,
            position: 4096 + pts,
            payload: Bytes::from(format!("{}:{}", stream, pts)),
        }
    }

    pub fn with_dts(mut self, dts: Option<i64>) -> Self {
        self.dts = dts;
        self
    }

    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = duration;
        self
    }
}

impl MediaPacket for MemPacket {
    fn stream_index(&self) -> usize {
        self.stream
    }
    fn pts(&self) -> Option<i64> {
        self.pts
    }
    fn dts(&self) -> Option<i64> {
        self.dts
    }
    fn duration(&self) -> i64 {
        self.duration
    }
    fn set_pts(&mut self, pts: Option<i64>) {
        self.pts = pts;
    }
    fn set_dts(&mut self, dts: Option<i64>) {
        self.dts = dts;
    }
    fn set_duration(&mut self, duration: i64) {
        self.duration = duration;
    }
    fn clear_position(&mut self) {
        self.position = -1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemInput {
    pub streams: Vec<MemStream>,
    pub packets: VecDeque<MemPacket>,
}

impl MemInput {
    pub fn new(streams: Vec<MemStream>, packets: Vec<MemPacket>) -> Self {
        Self {
            streams,
            packets: packets.into(),
        }
    }
}

impl SegmentInput for MemInput {
    type Stream = MemStream;
    type Packet = MemPacket;

    fn streams(&self) -> &[MemStream] {
        &self.streams
    }

    fn read_packet(&mut self) -> Option<MemPacket> {
        self.packets.pop_front()
    }
}

/// Everything an output saw, shared with the test after the session drops
/// the output.
#[derive(Debug, Default)]
pub struct Recorded {
    pub streams: Vec<MemStream>,
    pub header_written: bool,
    pub trailer_written: bool,
    pub packets: Vec<MemPacket>,
}

impl Recorded {
    /// Pts sequence written on one stream.
    pub fn pts_of(&self, stream: usize) -> Vec<i64> {
        self.packets
            .iter()
            .filter(|p| p.stream == stream)
            .filter_map(|p| p.pts)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemOutput {
    recorded: Rc<RefCell<Recorded>>,
    output_time_base: Option<Rational>,
    fail_stream_copy: Option<usize>,
    fail_write_after: Option<usize>,
    fail_header: bool,
}

impl MemOutput {
    /// Every stream gets this time base once the header is written, the way
    /// a muxer may impose its own.
    pub fn with_output_time_base(mut self, time_base: Rational) -> Self {
        self.output_time_base = Some(time_base);
        self
    }

    pub fn fail_stream_copy(mut self, index: usize) -> Self {
        self.fail_stream_copy = Some(index);
        self
    }

    /// Accept `count` packets, then fail every write.
    pub fn fail_write_after(mut self, count: usize) -> Self {
        self.fail_write_after = Some(count);
        self
    }

    pub fn fail_header(mut self) -> Self {
        self.fail_header = true;
        self
    }

    pub fn recorded(&self) -> Ref<'_, Recorded> {
        self.recorded.borrow()
    }
}

impl SegmentOutput for MemOutput {
    type Stream = MemStream;
    type Packet = MemPacket;

    fn add_stream(&mut self, stream: &MemStream) -> anyhow::Result<usize> {
        if self.fail_stream_copy == Some(stream.index) {
            return Err(anyhow::anyhow!("Cannot allocate memory (code -12)"));
        }
        let mut recorded = self.recorded.borrow_mut();
        recorded.streams.push(stream.clone());
        Ok(recorded.streams.len() - 1)
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        if self.fail_header {
            return Err(anyhow::anyhow!("Invalid argument (code -22)"));
        }
        let mut recorded = self.recorded.borrow_mut();
        if let Some(time_base) = self.output_time_base {
            for stream in recorded.streams.iter_mut() {
                stream.time_base = time_base;
            }
        }
        recorded.header_written = true;
        Ok(())
    }

    fn time_base(&self, index: usize) -> Option<Rational> {
        self.recorded.borrow().streams.get(index).map(|s| s.time_base)
    }

    fn write_packet(&mut self, packet: MemPacket) -> anyhow::Result<()> {
        let mut recorded = self.recorded.borrow_mut();
        if !recorded.header_written {
            return Err(anyhow::anyhow!("header not written"));
        }
        if self
            .fail_write_after
            .is_some_and(|count| recorded.packets.len() >= count)
        {
            return Err(anyhow::anyhow!("Broken pipe (code -32)"));
        }
        recorded.packets.push(packet);
        Ok(())
    }

    fn write_trailer(&mut self) -> anyhow::Result<()> {
        self.recorded.borrow_mut().trailer_written = true;
        Ok(())
    }
}

/// Serves inputs by path from memory; each input can be opened once.
#[derive(Debug, Default)]
pub struct MemIo {
    inputs: HashMap<PathBuf, MemInput>,
    output: MemOutput,
}

impl MemIo {
    pub fn new(output: MemOutput) -> Self {
        Self {
            inputs: HashMap::new(),
            output,
        }
    }

    pub fn with_input(mut self, path: &str, input: MemInput) -> Self {
        self.inputs.insert(PathBuf::from(path), input);
        self
    }
}

impl ContainerIo for MemIo {
    type Input = MemInput;
    type Output = MemOutput;

    fn open_input(&mut self, path: &Path) -> anyhow::Result<MemInput> {
        self.inputs
            .remove(path)
            .ok_or_else(|| anyhow::anyhow!("No such file or directory (code -2)"))
    }

    fn create_output(&mut self, _path: &Path) -> anyhow::Result<MemOutput> {
        Ok(self.output.clone())
    }
}
