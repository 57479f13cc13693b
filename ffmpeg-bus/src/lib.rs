/// Registers FFmpeg components and quiets libav's own logging so that only
/// errors reach stderr. Call once at startup before opening any container.
pub fn init() -> anyhow::Result<()> {
    ffmpeg_next::init().map_err(|e| anyhow::anyhow!("ffmpeg_next init: {}", e))?;
    ffmpeg_next::util::log::set_level(ffmpeg_next::util::log::Level::Error);
    Ok(())
}

/// Wraps a libav error so both the message and the numeric code survive.
pub(crate) fn av_error(err: ffmpeg_next::Error) -> anyhow::Error {
    let code: i32 = err.into();
    anyhow::anyhow!("{} (code {})", err, code)
}

pub mod input;
pub mod output;
pub mod packet;
pub mod stream;
