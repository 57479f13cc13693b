use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};

use reconstruct::{error::ReconstructError, ffmpeg::FfmpegIo, session::ReconstructionSession};

/// Rejoins two sequential recording segments into one container, dropping
/// whatever the second segment repeats from the first one's tail.
#[derive(Parser, Debug)]
#[command(name = "reconstruct")]
struct Cli {
    /// First recorded segment.
    segment1: PathBuf,
    /// Segment recorded after the first one resumed.
    segment2: PathBuf,
    /// Output file; the container format follows its extension.
    output: PathBuf,
    #[arg(hide = true)]
    _rest: Vec<String>,
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

const USAGE: &str = "Incorrect number of arguments\n\
                     Usage: reconstruct <FilePart1> <FilePart2> <OutputFile>";

/// Parses the command line. `None` means the caller should print [`USAGE`]
/// and exit -1; help and version requests exit through clap.
fn parse_cli<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Some(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => None,
    }
}

fn run(cli: &Cli) -> Result<(), ReconstructError> {
    let mut session = ReconstructionSession::open(FfmpegIo, &cli.segment1, &cli.output)?;

    if let Some(e) = &session.drain_first().mux_error {
        println!("{}", e);
    }
    print!("{}", session.summary());

    session.open_second(&cli.segment2)?;
    if let Some(e) = &session.drain_second().mux_error {
        println!("{}", e);
    }

    let report = session.finalize()?;
    log::debug!("{:?}", report);
    Ok(())
}

fn main() {
    init_logging();
    let Some(cli) = parse_cli(std::env::args_os()) else {
        println!("{}", USAGE);
        std::process::exit(-1);
    };

    if let Err(e) = ffmpeg_bus::init() {
        println!("{}", e);
        std::process::exit(-1);
    }

    if let Err(e) = run(&cli) {
        println!("{}", e);
        std::process::exit(-1);
    }
}
