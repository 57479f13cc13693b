use std::ffi::CString;
use std::path::{Path, PathBuf};

use ffmpeg_next::{Rational, codec, ffi, format::Flags};

use crate::{av_error, packet::RawPacket, stream::AvStream};

/// A writable output container whose format is inferred from the path
/// extension. The byte sink is opened only when the header is written.
pub struct AvOutput {
    path: PathBuf,
    inner: ffmpeg_next::format::context::Output,
    have_written_header: bool,
    have_written_trailer: bool,
}

fn c_path(path: &Path) -> anyhow::Result<CString> {
    CString::new(path.to_string_lossy().as_bytes())
        .map_err(|e| anyhow::anyhow!("invalid path {:?}: {}", path, e))
}

impl AvOutput {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let cpath = c_path(path)?;
        let mut ctx = std::ptr::null_mut();
        let ret = unsafe {
            ffi::avformat_alloc_output_context2(
                &mut ctx,
                std::ptr::null_mut(),
                std::ptr::null(),
                cpath.as_ptr(),
            )
        };
        if ret < 0 {
            return Err(av_error(ffmpeg_next::Error::from(ret)));
        }
        if ctx.is_null() {
            return Err(anyhow::anyhow!("no output format for {}", path.display()));
        }

        let inner = unsafe { ffmpeg_next::format::context::Output::wrap(ctx) };
        log::debug!(
            "allocated output {} ({})",
            path.display(),
            inner.format().name()
        );
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            have_written_header: false,
            have_written_trailer: false,
        })
    }

    /// Declares an output stream with `stream`'s codec parameters. The
    /// container-specific codec tag is cleared so it cannot leak into a
    /// different container type. Returns the new stream's index.
    pub fn add_stream(&mut self, stream: &AvStream) -> anyhow::Result<usize> {
        if self.have_written_header {
            return Err(anyhow::anyhow!("header already written"));
        }
        let mut writer_stream = self
            .inner
            .add_stream(ffmpeg_next::encoder::find(codec::Id::None))
            .map_err(av_error)?;
        unsafe {
            let codecpar = (*writer_stream.as_mut_ptr()).codecpar;
            let ret = ffi::avcodec_parameters_copy(codecpar, stream.parameters().as_ptr());
            if ret < 0 {
                return Err(av_error(ffmpeg_next::Error::from(ret)));
            }
            (*codecpar).codec_tag = 0;
        }
        Ok(writer_stream.index())
    }

    /// Output stream time base. Muxers may replace the declared time base
    /// while writing the header, so this is only final afterwards.
    pub fn time_base(&self, stream_index: usize) -> Option<Rational> {
        self.inner.stream(stream_index).map(|s| s.time_base())
    }

    fn open_sink(&mut self) -> anyhow::Result<()> {
        if self.inner.format().flags().contains(Flags::NO_FILE) {
            return Ok(());
        }
        let cpath = c_path(&self.path)?;
        let ret = unsafe {
            ffi::avio_open(
                &mut (*self.inner.as_mut_ptr()).pb,
                cpath.as_ptr(),
                ffi::AVIO_FLAG_WRITE as i32,
            )
        };
        if ret < 0 {
            return Err(anyhow::anyhow!(
                "could not open output file {}: {}",
                self.path.display(),
                av_error(ffmpeg_next::Error::from(ret))
            ));
        }
        Ok(())
    }

    pub fn write_header(&mut self) -> anyhow::Result<()> {
        if self.have_written_header {
            return Ok(());
        }
        self.open_sink()?;
        self.inner.write_header().map_err(av_error)?;
        self.have_written_header = true;
        Ok(())
    }

    /// Writes a packet in the interleaving order the format requires. The
    /// packet's payload is handed to the muxer and released afterwards.
    pub fn write_packet(&mut self, packet: RawPacket) -> anyhow::Result<()> {
        if !self.have_written_header {
            return Err(anyhow::anyhow!("header not written"));
        }
        if self.inner.stream(packet.index()).is_none() {
            return Err(anyhow::anyhow!("stream {} not found", packet.index()));
        }
        log::trace!(
            "{}: mux stream={} size={}",
            self.path.display(),
            packet.index(),
            packet.size()
        );
        packet
            .packet()
            .write_interleaved(&mut self.inner)
            .map_err(av_error)
    }

    /// Writes the trailer once. Without a header there is nothing to
    /// finalize.
    pub fn finish(&mut self) -> anyhow::Result<()> {
        if self.have_written_header && !self.have_written_trailer {
            self.have_written_trailer = true;
            self.inner.write_trailer().map_err(av_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension() {
        let path = std::env::temp_dir().join("ffmpeg-bus-output.nosuchformat");
        assert!(AvOutput::new(&path).is_err());
    }

    #[test]
    fn test_sink_opens_with_header() {
        let path = std::env::temp_dir().join("ffmpeg-bus-deferred-sink.mkv");
        let _ = std::fs::remove_file(&path);
        let mut output = AvOutput::new(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(output.time_base(0), None);
        // trailer without header is a no-op
        output.finish().unwrap();
        assert!(!path.exists());
    }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;
