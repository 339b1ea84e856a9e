//! Burrow CLI - Keystroke-driven directory browser

mod opener;
mod result_file;
mod terminal;

use burrow_core::config::LogConfig;
use burrow_core::{screen, Config, Exit, Filesystem, Keymap, Navigator, ProcessFs, Session};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "burrow")]
#[command(about = "Type to narrow a directory, descend, and cd there on quit", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Config file (built-in defaults when omitted)
    #[arg(long, global = true, env = "BURROW_CONFIG")]
    config: Option<PathBuf>,

    /// Where the final directory is written on quit
    #[arg(long, global = true)]
    result_file: Option<PathBuf>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Editor for files that are not documents
    #[arg(long, env = "EDITOR")]
    editor: Option<String>,

    /// Don't highlight directories and symlinks
    #[arg(long)]
    no_color: bool,

    /// Directory to start in (defaults to the current directory)
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config file (prints it when no path is known)
    Init {
        /// Destination (defaults to --config)
        path: Option<PathBuf>,
    },

    /// Print a shell function that cds into the final directory
    ShellInit,
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Init { path }) => cmd_init(path.as_ref().or(cli.config.as_ref())),
        Some(Commands::ShellInit) => cmd_shell_init(&cli),
        None => cmd_browse(&cli),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> burrow_core::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(result_file) = &cli.result_file {
        config.output.result_file = result_file.clone();
    }
    if let Some(log_file) = &cli.log_file {
        config.log.file = Some(log_file.clone());
    }
    if let Some(editor) = &cli.editor {
        config.open.editor = editor.clone();
    }
    if cli.no_color {
        config.display.color = false;
    }
    Ok(config)
}

/// Log to the configured file; the terminal belongs to the browser.
fn init_logging(log: &LogConfig) -> burrow_core::Result<()> {
    let Some(path) = &log.file else {
        return Ok(());
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn cmd_init(path: Option<&PathBuf>) -> burrow_core::Result<()> {
    use colored::Colorize;

    match path {
        Some(path) => {
            Config::init(path)?;
            println!("{} {}", "Created".green(), path.display());
        }
        None => print!("{}", burrow_core::DEFAULT_CONFIG),
    }
    Ok(())
}

fn cmd_shell_init(cli: &Cli) -> burrow_core::Result<()> {
    let config = load_config(cli)?;
    print!(
        "{}",
        result_file::shell_function("burrow", &config.output.result_file)
    );
    Ok(())
}

fn cmd_browse(cli: &Cli) -> burrow_core::Result<()> {
    let config = load_config(cli)?;
    init_logging(&config.log)?;
    let keymap = Keymap::from_config(&config.keys)?;

    let mut fs = ProcessFs;
    if let Some(dir) = &cli.dir {
        fs.change_dir(dir)?;
    }

    let nav = Navigator::with_options(fs, config.navigator_options())?;
    let mut session = Session::new(nav, keymap).with_color(config.display.color);

    let exit = {
        let _raw = terminal::RawTerminal::enable()?;
        let mut input = io::stdin().lock();
        let mut out = io::stdout().lock();
        let exit = session.run(&mut input, &mut out);
        screen::clear(&mut out)?;
        out.flush()?;
        exit?
    };

    match exit {
        Exit::Quit => {
            let dir = session.navigator().current_dir()?;
            result_file::write(&config.output.result_file, &dir)?;
            Ok(())
        }
        Exit::Launch(path) => opener::launch(&config.open, &path),
    }
}
