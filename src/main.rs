mod app;
mod assets;
mod clock;
mod command;
mod config;
mod consts;
mod game;
mod storage;
mod ui;
mod util;
use crate::app::App;
use anyhow::Context;
use lexopt::{Arg, Parser};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

const USAGE: &str = "Usage: combo-snake [-c|--config PATH] [--log-file PATH]

Play a snake game in your terminal.

Options:
  -c PATH, --config PATH
                    Read configuration from the given file

  --log-file PATH   Write log messages to the given file.  The level can be
                    set with the RUST_LOG environment variable (default:
                    info).

  -h, --help        Display this help message and exit

  -V, --version     Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        config: Option<PathBuf>,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = None;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { config, log_file })
    }

    fn run(self) -> ExitCode {
        match self {
            Command::Run { config, log_file } => {
                if let Some(path) = log_file {
                    if let Err(e) = init_logging(&path) {
                        eprintln!("combo-snake: {e:#}");
                        return ExitCode::from(2);
                    }
                }
                tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting up");
                let terminal = ratatui::init();
                let r = App::new(config).run(terminal);
                ratatui::restore();
                io_exit(r)
            }
            Command::Help => {
                print!("{USAGE}");
                ExitCode::SUCCESS
            }
            Command::Version => {
                println!("combo-snake {}", env!("CARGO_PKG_VERSION"));
                ExitCode::SUCCESS
            }
        }
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("failed to open log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Terminal I/O failed");
            eprintln!("combo-snake: {e}");
            ExitCode::from(2)
        }
    }
}

fn main() -> ExitCode {
    match Command::from_parser(Parser::from_env()) {
        Ok(cmd) => cmd.run(),
        Err(e) => {
            eprintln!("combo-snake: {e}\n\n{USAGE}");
            ExitCode::from(2)
        }
    }
}
