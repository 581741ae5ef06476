//! pymaker - type a Python snippet and save it into a chosen folder
//!
//! The editing surface decorates the text with a line-number gutter, a
//! current-line marker and keyword/string/comment/number coloring.

mod buffer;
mod config;
mod decoration;
mod editor;
mod error;
mod input;
mod line;
mod render;
mod save;
mod state;
mod syntax;
mod terminal;

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use editor::Editor;
use error::{Error, Result};
use save::SaveRequest;
use syntax::HighlightMode;
use terminal::Terminal;

/// What to do once arguments are parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Edit,
    Save,
    Print,
    Help,
    Version,
}

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    mode: Option<Mode>,
    file: Option<PathBuf>,
    folder: Option<PathBuf>,
    subfolder: Option<String>,
    name: Option<String>,
    cursor_line: Option<usize>,
    read_only: bool,
    overlay: bool,
    log_file: Option<PathBuf>,
    verbose: bool,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut opts = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| Error::Usage(format!("{flag} needs a value")))
            };
            match arg.as_str() {
                "-h" | "--help" => opts.mode = Some(Mode::Help),
                "-V" | "--version" => opts.mode = Some(Mode::Version),
                "--save" => opts.mode = Some(Mode::Save),
                "--print" => opts.mode = Some(Mode::Print),
                "-d" | "--folder" => opts.folder = Some(PathBuf::from(value(arg)?)),
                "-s" | "--subfolder" => opts.subfolder = Some(value(arg)?),
                "-n" | "--name" => opts.name = Some(value(arg)?),
                "--cursor" => {
                    let raw = value(arg)?;
                    let line = raw
                        .parse::<usize>()
                        .map_err(|_| Error::Usage(format!("--cursor expects a line number, got {raw:?}")))?;
                    opts.cursor_line = Some(line.max(1));
                }
                "--read-only" => opts.read_only = true,
                "--overlay" => opts.overlay = true,
                "--log-file" => opts.log_file = Some(PathBuf::from(value(arg)?)),
                "-v" | "--verbose" => opts.verbose = true,
                other if other.starts_with('-') && other != "-" => {
                    return Err(Error::Usage(format!("unknown option {other}")));
                }
                other => {
                    if opts.file.is_some() {
                        return Err(Error::Usage("only one input file may be given".to_string()));
                    }
                    opts.file = Some(PathBuf::from(other));
                }
            }
        }

        Ok(opts)
    }

    /// Command-line options override the config file
    fn apply_to(&self, config: &mut Config) {
        if let Some(folder) = &self.folder {
            config.base_folder = folder.clone();
        }
        if let Some(subfolder) = &self.subfolder {
            config.subfolder = subfolder.trim().to_string();
        }
        if let Some(name) = &self.name {
            config.file_name = name.trim().to_string();
        }
        if self.overlay {
            config.highlight_mode = HighlightMode::Overlay;
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let opts = Options::parse(&args)?;
    let mode = opts.mode.unwrap_or(Mode::Edit);

    match mode {
        Mode::Help => {
            print_usage();
            return Ok(());
        }
        Mode::Version => {
            print_version();
            return Ok(());
        }
        _ => {}
    }

    init_logging(mode, &opts)?;

    let mut config = Config::load();
    opts.apply_to(&mut config);
    debug!(?config, "effective configuration");

    match mode {
        Mode::Save => {
            let text = read_input(opts.file.as_ref())?;
            let saved = save::save(&SaveRequest::from_config(&config), &text)?;
            debug!(folder = %saved.folder.display(), "target folder ready");
            println!("{}", saved.path.display());
            Ok(())
        }
        Mode::Print => {
            let text = read_input(opts.file.as_ref())?;
            editor::print_listing(&config, &text, opts.cursor_line)
        }
        _ => edit(&config, &opts),
    }
}

fn edit(config: &Config, opts: &Options) -> Result<()> {
    let text = match &opts.file {
        Some(path) if path.exists() => fs::read_to_string(path)?,
        _ => String::new(),
    };

    let mut terminal = Terminal::new()?;
    let target = SaveRequest::from_config(config);
    let mut editor = Editor::new(
        config,
        target,
        &text,
        usize::from(terminal.cols()),
        usize::from(terminal.rows()),
    );
    if opts.read_only {
        editor.set_read_only(true);
    }
    if let Some(line) = opts.cursor_line {
        editor.move_cursor_to(line - 1, 0);
    }

    info!("editor started");
    editor.run(&mut terminal)
}

/// Read the input file, or stdin when none (or `-`) is given
fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Logs go to `--log-file` when given. Otherwise the non-interactive modes
/// log to stderr and the editor stays silent, since stderr is the screen.
fn init_logging(mode: Mode, opts: &Options) -> Result<()> {
    let filter = EnvFilter::try_from_env("PYMAKER_LOG").unwrap_or_else(|_| {
        if opts.verbose {
            EnvFilter::new("pymaker=debug")
        } else {
            EnvFilter::new("pymaker=warn")
        }
    });

    if let Some(path) = &opts.log_file {
        let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if mode != Mode::Edit {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn print_usage() {
    println!("pymaker {} - write a Python snippet to a file", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: pymaker [OPTIONS] [FILE]");
    println!();
    println!("Modes:");
    println!("  (default)              Edit FILE (or an empty buffer) in the terminal");
    println!("  --save                 Save FILE or stdin without opening the editor");
    println!("  --print                Print FILE or stdin with line numbers and colors");
    println!();
    println!("Options:");
    println!("  -d, --folder DIR       Base folder to save into");
    println!("  -s, --subfolder NAME   Folder created inside the base folder");
    println!("  -n, --name FILE        File name (.py is appended when missing)");
    println!("      --cursor LINE      Put the cursor on LINE");
    println!("      --read-only        Open the editor read-only");
    println!("      --overlay          Legacy overlapping highlight rules");
    println!("      --log-file PATH    Append logs to PATH");
    println!("  -v, --verbose          Debug logging");
    println!("  -h, --help             Show this help message");
    println!("  -V, --version          Show version information");
    println!();
    println!("Keys:");
    println!("  C-s  Save     C-r  Toggle read-only     C-t  Toggle highlight mode     C-q  Quit");
    println!();
    println!("Settings are read from ~/.pymaker.toml");
}

fn print_version() {
    println!("pymaker {}", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_save_options() {
        let opts = Options::parse(&args(&["--save", "-d", "/tmp/x", "-s", "proj", "-n", "app", "in.py"])).unwrap();
        assert_eq!(opts.mode, Some(Mode::Save));
        assert_eq!(opts.folder, Some(PathBuf::from("/tmp/x")));
        assert_eq!(opts.subfolder.as_deref(), Some("proj"));
        assert_eq!(opts.name.as_deref(), Some("app"));
        assert_eq!(opts.file, Some(PathBuf::from("in.py")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Options::parse(&args(&["--folder"])), Err(Error::Usage(_))));
        assert!(matches!(Options::parse(&args(&["--bogus"])), Err(Error::Usage(_))));
        assert!(matches!(Options::parse(&args(&["a.py", "b.py"])), Err(Error::Usage(_))));
        assert!(matches!(Options::parse(&args(&["--cursor", "x"])), Err(Error::Usage(_))));
    }

    #[test]
    fn test_options_override_config() {
        let opts = Options::parse(&args(&["-n", " tool ", "--overlay"])).unwrap();
        let mut config = Config::default();
        opts.apply_to(&mut config);
        assert_eq!(config.file_name, "tool");
        assert_eq!(config.highlight_mode, HighlightMode::Overlay);
    }

    #[test]
    fn test_dash_reads_stdin_marker() {
        let opts = Options::parse(&args(&["--print", "-"])).unwrap();
        assert_eq!(opts.file, Some(PathBuf::from("-")));
        assert_eq!(opts.mode, Some(Mode::Print));
    }
}
