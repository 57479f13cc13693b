use std::ffi::CString;
use std::path::{Path, PathBuf};

use ffmpeg_next::{Dictionary, codec::packet::Packet};

use crate::{av_error, packet::RawPacket, stream::AvStream};

/// An opened input container with its stream info read. Dropping it closes the input.
pub struct AvInput {
    path: PathBuf,
    inner: ffmpeg_next::format::context::Input,
    streams: Vec<AvStream>,
}

impl AvInput {
    /// Resolve input format by name (e.g. "lavfi", "v4l2") via FFmpeg's av_find_input_format.
    fn find_input_format(name: &str) -> anyhow::Result<ffmpeg_next::format::format::Input> {
        let cname = CString::new(name)
            .map_err(|e| anyhow::anyhow!("invalid format name {:?}: {}", name, e))?;
        let ptr = unsafe { ffmpeg_next::ffi::av_find_input_format(cname.as_ptr()) };
        if ptr.is_null() {
            return Err(anyhow::anyhow!("input format not found: {}", name));
        }
        Ok(unsafe { ffmpeg_next::format::format::Input::wrap(ptr as *mut _) })
    }

    /// Opens `path` with automatic format detection and reads stream info.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let input = ffmpeg_next::format::input(&path).map_err(av_error)?;
        Ok(Self::from_context(path, input))
    }

    /// Opens `url` with an explicit input format, e.g. a lavfi filter graph.
    pub fn open_format(url: &str, format: &str) -> anyhow::Result<Self> {
        use ffmpeg_next::format::format::Format;

        let fmt = Self::find_input_format(format)?;
        let path = Path::new(url);
        let ctx = ffmpeg_next::format::open_with(path, &Format::Input(fmt), Dictionary::new())
            .map_err(av_error)?;
        Ok(Self::from_context(path, ctx.input()))
    }

    fn from_context(path: &Path, input: ffmpeg_next::format::context::Input) -> Self {
        let streams = input.streams().map(AvStream::from).collect::<Vec<_>>();
        log::debug!(
            "opened input {} ({}), {} streams",
            path.display(),
            input.format().name(),
            streams.len()
        );
        for stream in streams.iter() {
            log::trace!("input stream: {:?}", stream);
        }

        Self {
            path: path.to_path_buf(),
            inner: input,
            streams,
        }
    }

    /// Streams in container order.
    pub fn streams(&self) -> &[AvStream] {
        &self.streams
    }

    /// Reads the next packet. End of stream and read errors both end the
    /// sequence; a read error is not retried.
    pub fn read_packet(&mut self) -> Option<RawPacket> {
        let mut packet = Packet::empty();
        match packet.read(&mut self.inner) {
            Ok(()) => Some(packet.into()),
            Err(ffmpeg_next::Error::Eof) => None,
            Err(e) => {
                log::warn!("{}: read packet: {}", self.path.display(), av_error(e));
                None
            }
        }
    }
}
