//! Command-line interface for the tally calculator
//!
//! Replays key scripts, runs an interactive keypad session on a terminal,
//! and lists the keys the calculator understands.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::colorizer::{colorize_error, colorize_frame};
use tally::core::logging::init_logging;
use tally::{parse_script, Calculator, Key, LcdFrame, LcdStyle};

/// Tally - a keypad calculator driven by key scripts
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Replay calculator key presses and show the display")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a key script and print the resulting display
    Run {
        /// Key script to replay, e.g. "12 + 3 ="
        #[arg(short, long, conflicts_with = "input")]
        script: Option<String>,

        /// File containing a key script (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the display after every key
        #[arg(long)]
        trace: bool,

        /// Print the transcript as JSON
        #[arg(long, conflicts_with = "trace")]
        json: bool,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Read key scripts line by line and keep one calculator between them
    Repl {
        #[command(flatten)]
        display: DisplayArgs,
    },

    /// List supported keys and their aliases
    Keys {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// How the display text is printed
#[derive(clap::Args, Clone, Debug, PartialEq, Eq)]
pub struct DisplayArgs {
    /// Draw the display inside an LCD frame
    #[arg(long)]
    pub frame: bool,

    /// Frame border characters
    #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
    pub style: StyleChoice,

    /// Number of display columns inside the frame
    #[arg(long, default_value_t = LcdFrame::DEFAULT_WIDTH)]
    pub width: usize,

    /// When to use colors in output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

/// Supported frame styles
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Unicode,
    Ascii,
}

impl From<StyleChoice> for LcdStyle {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Unicode => LcdStyle::Unicode,
            StyleChoice::Ascii => LcdStyle::Ascii,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// One key press and the display it produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub key: String,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Every step of a replayed script plus the final display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub steps: Vec<Step>,
    pub display: String,
}

/// Resolved display options
#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    frame: Option<LcdFrame>,
    colorize: bool,
}

impl Presenter {
    pub fn new(args: &DisplayArgs, colorize: bool) -> Self {
        let frame = args
            .frame
            .then(|| LcdFrame::new(args.width).with_style(args.style.into()));
        Self { frame, colorize }
    }

    pub fn plain() -> Self {
        Self {
            frame: None,
            colorize: false,
        }
    }

    /// Text for a display value, framed and colored as configured
    pub fn show(&self, display: &str) -> String {
        match self.frame {
            Some(frame) if self.colorize => colorize_frame(&frame.render(display)),
            Some(frame) => frame.render(display),
            None => display.to_string(),
        }
    }

    pub fn error(&self, message: &str) -> String {
        if self.colorize {
            colorize_error(message)
        } else {
            message.to_string()
        }
    }
}

/// Main CLI application
#[derive(Default)]
pub struct TallyApp {
    calculator: Calculator,
}

impl TallyApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("TALLY_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("TALLY_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Tally v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Run {
                script,
                input,
                trace,
                json,
                display,
            } => self.run_command(script, input, trace, json, &display, cli.verbose),
            Commands::Repl { display } => self.repl_command(&display),
            Commands::Keys { json } => self.keys_command(json, cli.verbose),
        }
    }

    /// Handle the run command
    fn run_command(
        &mut self,
        script: Option<String>,
        input: Option<PathBuf>,
        trace: bool,
        json: bool,
        display: &DisplayArgs,
        verbose: bool,
    ) -> Result<()> {
        let content = match script {
            Some(script) => script,
            None => self.read_input(input)?,
        };

        if verbose {
            eprintln!("Read {} bytes of key script", content.len());
        }

        let keys = parse_script(&content)?;
        let transcript = self.replay(&keys);
        info!(keys = keys.len(), display = %transcript.display, "Replayed key script");

        if json {
            println!("{}", serde_json::to_string_pretty(&transcript)?);
            return Ok(());
        }

        let presenter = Presenter::new(display, Self::should_colorize(display.color));
        let mut stdout = io::stdout().lock();
        for step in &transcript.steps {
            if let Some(error) = &step.error {
                eprintln!("{}", presenter.error(error));
            }
            if trace {
                writeln!(stdout, "{:>9}  {}", step.key, step.display)?;
            }
        }
        writeln!(stdout, "{}", presenter.show(&transcript.display))?;
        stdout.flush()?;
        Ok(())
    }

    /// Press every key, recording the display after each one
    ///
    /// A division by zero is recorded on its step and the replay continues
    /// from the cleared calculator, as a user would after dismissing the alert.
    pub fn replay(&mut self, keys: &[Key]) -> Transcript {
        let mut steps = Vec::with_capacity(keys.len());
        for &key in keys {
            let error = self.calculator.press(key).err().map(|e| e.to_string());
            steps.push(Step {
                key: key.to_string(),
                display: self.calculator.display().to_string(),
                error,
            });
        }
        Transcript {
            steps,
            display: self.calculator.display().to_string(),
        }
    }

    /// Handle the repl command
    fn repl_command(&mut self, display: &DisplayArgs) -> Result<()> {
        let presenter = Presenter::new(display, Self::should_colorize(display.color));
        let prompt = crossterm::tty::IsTty::is_tty(&io::stdin());
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.repl_session(stdin.lock(), &mut stdout.lock(), &presenter, prompt)
    }

    /// Apply each input line as a key script and print the display after it
    pub fn repl_session<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        writer: &mut W,
        presenter: &Presenter,
        prompt: bool,
    ) -> Result<()> {
        writeln!(writer, "{}", presenter.show(self.calculator.display()))?;
        if prompt {
            write!(writer, "> ")?;
            writer.flush()?;
        }

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if matches!(line, "quit" | "exit") {
                break;
            }

            match parse_script(line) {
                Ok(keys) => {
                    debug!(keys = keys.len(), "Applying line");
                    for step in self.replay(&keys).steps {
                        if let Some(error) = step.error {
                            writeln!(writer, "{}", presenter.error(&error))?;
                        }
                    }
                    writeln!(writer, "{}", presenter.show(self.calculator.display()))?;
                }
                Err(e) => writeln!(writer, "{}", presenter.error(&e.to_string()))?,
            }

            if prompt {
                write!(writer, "> ")?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// Handle the keys command
    fn keys_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported keys");
        }
        println!("{}", Self::keys_listing(json)?);
        Ok(())
    }

    fn keys_listing(json: bool) -> Result<String> {
        let keys = Key::all();

        if json {
            let entries: Vec<_> = keys
                .iter()
                .map(|key| {
                    serde_json::json!({
                        "key": key.to_string(),
                        "aliases": key.aliases(),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "keys": entries,
                "total": keys.len(),
            });
            return Ok(serde_json::to_string_pretty(&listing)?);
        }

        let mut out = String::from("Supported keys:\n");
        for key in &keys {
            let aliases = key.aliases().join(", ");
            if aliases.is_empty() {
                out.push_str(&format!("  {}\n", key));
            } else {
                out.push_str(&format!("  {:<6} {}\n", key, aliases));
            }
        }
        out.push_str(&format!("\nTotal: {} keys", keys.len()));
        Ok(out)
    }

    /// Determine if we should colorize output sent to stdout
    fn should_colorize(color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&io::stdout())
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Get a reference to the calculator (for testing)
    #[cfg(test)]
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }
}
