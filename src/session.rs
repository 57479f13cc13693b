//! Two-phase reconstruction driver.
//!
//! ```text
//! Init ─► BuildingSchema ─► Phase1Draining ─► Phase1Done ─► Phase2Draining ─► Finalized
//!   └──────────────┴────────────────┴───────────────┴──────────────┴─────────► Failed
//! ```

use std::path::Path;

use ffmpeg_next::Rational;

use crate::error::ReconstructError;
use crate::high_water::{HighWaterTracker, Phase1Summary};
use crate::media::{ContainerIo, MediaPacket, SegmentInput, SegmentOutput, SourceStream};
use crate::overlap::OverlapFilter;
use crate::schema::OutputSchema;
use crate::timestamp::rebase_packet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    BuildingSchema,
    Phase1Draining,
    Phase1Done,
    Phase2Draining,
    Finalized,
    Failed,
}

/// Outcome of draining one segment.
#[derive(Debug, Default)]
pub struct DrainStats {
    pub read: u64,
    pub written: u64,
    /// Second-segment packets rejected as already covered by the first.
    pub dropped: u64,
    /// The write failure that ended the drain early, if any.
    pub mux_error: Option<ReconstructError>,
}

#[derive(Debug, Default)]
pub struct ReconstructionReport {
    pub first: DrainStats,
    pub second: DrainStats,
}

/// Owns the output, the inputs and the high-water marks for one run. Every
/// container handle is released when the session is dropped, on success and
/// on failure alike.
pub struct ReconstructionSession<IO: ContainerIo> {
    io: IO,
    state: SessionState,
    schema: OutputSchema,
    tracker: HighWaterTracker,
    output: IO::Output,
    segment1: Option<IO::Input>,
    segment2: Option<IO::Input>,
    report: ReconstructionReport,
}

/// Source time base of every stream of `input`, by stream index. The first
/// segment's are already recorded in the schema.
fn time_bases<I: SegmentInput>(input: &I) -> Vec<Rational> {
    input.streams().iter().map(|s| s.time_base()).collect()
}

/// Rebases `packet` into its output track's time base and writes it.
/// Returns `Ok(false)` if no output track matches the packet.
fn forward<O: SegmentOutput>(
    output: &mut O,
    schema: &OutputSchema,
    source_time_bases: &[Rational],
    mut packet: O::Packet,
) -> Result<bool, ReconstructError> {
    let index = packet.stream_index();
    let (Some(track), Some(&from)) = (schema.track(index), source_time_bases.get(index)) else {
        log::warn!("packet for unknown stream {}, dropped", index);
        return Ok(false);
    };
    rebase_packet(&mut packet, from, track.output_time_base);
    log::trace!(
        "write stream={} pts={:?} dts={:?} duration={}",
        index,
        packet.pts(),
        packet.dts(),
        packet.duration()
    );
    output.write_packet(packet).map_err(ReconstructError::Mux)?;
    Ok(true)
}

impl<IO: ContainerIo> ReconstructionSession<IO> {
    /// Opens the first segment, allocates the output, declares the output
    /// tracks and writes the header.
    pub fn open(mut io: IO, segment1: &Path, output: &Path) -> Result<Self, ReconstructError> {
        log::debug!("state: {:?}", SessionState::Init);
        let input = io
            .open_input(segment1)
            .map_err(|cause| ReconstructError::Open {
                path: segment1.to_path_buf(),
                cause,
            })?;
        let mut writer = io
            .create_output(output)
            .map_err(|cause| ReconstructError::CreateOutput {
                path: output.to_path_buf(),
                cause,
            })?;

        log::debug!("state: {:?}", SessionState::BuildingSchema);
        let mut schema = OutputSchema::build(input.streams(), &mut writer)?;
        writer.write_header().map_err(ReconstructError::Header)?;
        schema.bind_output_time_bases(&writer).map_err(|index| {
            ReconstructError::Header(anyhow::anyhow!(
                "output stream {} missing after header",
                index
            ))
        })?;
        let tracker = HighWaterTracker::new(schema.tracks());

        log::info!(
            "reconstructing {} from {} ({} streams)",
            output.display(),
            segment1.display(),
            schema.tracks().len()
        );
        Ok(Self {
            io,
            state: SessionState::Phase1Draining,
            schema,
            tracker,
            output: writer,
            segment1: Some(input),
            segment2: None,
            report: ReconstructionReport::default(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// Streams every first-segment packet into the output while raising the
    /// high-water marks, then releases the first segment. A write failure
    /// stops the drain; the run continues.
    pub fn drain_first(&mut self) -> &DrainStats {
        debug_assert_eq!(self.state, SessionState::Phase1Draining);
        let stats = &mut self.report.first;
        if let Some(mut input) = self.segment1.take() {
            let source_time_bases: Vec<Rational> = self
                .schema
                .tracks()
                .iter()
                .map(|t| t.input_time_base)
                .collect();
            while let Some(packet) = input.read_packet() {
                stats.read += 1;
                self.tracker
                    .observe(packet.stream_index(), packet.pts(), packet.dts());
                match forward(&mut self.output, &self.schema, &source_time_bases, packet) {
                    Ok(true) => stats.written += 1,
                    Ok(false) => {}
                    Err(e) => {
                        log::debug!("first segment: {}", e);
                        stats.mux_error = Some(e);
                        break;
                    }
                }
            }
        }

        self.state = SessionState::Phase1Done;
        log::info!(
            "first segment drained: {} read, {} written",
            stats.read,
            stats.written
        );
        stats
    }

    /// Marks recorded by [`ReconstructionSession::drain_first`].
    pub fn summary(&self) -> Phase1Summary {
        self.tracker.summary(&self.schema)
    }

    /// Opens the second segment and checks it carries the same streams in
    /// the same order as the first.
    pub fn open_second(&mut self, segment2: &Path) -> Result<(), ReconstructError> {
        debug_assert_eq!(self.state, SessionState::Phase1Done);
        let result = self
            .io
            .open_input(segment2)
            .map_err(|cause| ReconstructError::Open {
                path: segment2.to_path_buf(),
                cause,
            })
            .and_then(|input| {
                self.schema.validate_layout(input.streams())?;
                Ok(input)
            });
        match result {
            Ok(input) => {
                self.segment2 = Some(input);
                self.state = SessionState::Phase2Draining;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// Streams the second segment, writing only packets past the first
    /// segment's marks. A write failure stops the drain; finalizing still
    /// writes the trailer.
    pub fn drain_second(&mut self) -> &DrainStats {
        debug_assert_eq!(self.state, SessionState::Phase2Draining);
        let stats = &mut self.report.second;
        let filter = OverlapFilter::new(&self.tracker);
        if let Some(input) = self.segment2.as_mut() {
            let source_time_bases = time_bases(input);
            while let Some(packet) = input.read_packet() {
                stats.read += 1;
                if !filter.accept(packet.stream_index(), packet.pts()) {
                    log::trace!(
                        "drop stream={} pts={:?}: covered by first segment",
                        packet.stream_index(),
                        packet.pts()
                    );
                    stats.dropped += 1;
                    continue;
                }
                match forward(&mut self.output, &self.schema, &source_time_bases, packet) {
                    Ok(true) => stats.written += 1,
                    Ok(false) => {}
                    Err(e) => {
                        log::debug!("second segment: {}", e);
                        stats.mux_error = Some(e);
                        break;
                    }
                }
            }
        }

        log::info!(
            "second segment drained: {} read, {} written, {} dropped as overlap",
            stats.read,
            stats.written,
            stats.dropped
        );
        stats
    }

    /// Writes the trailer and releases every container handle.
    pub fn finalize(mut self) -> Result<ReconstructionReport, ReconstructError> {
        self.segment2 = None;
        if let Err(e) = self.output.write_trailer() {
            self.state = SessionState::Failed;
            return Err(ReconstructError::Trailer(e));
        }
        self.state = SessionState::Finalized;
        log::info!(
            "finalized: {} packets written",
            self.report.first.written + self.report.second.written
        );
        Ok(self.report)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
