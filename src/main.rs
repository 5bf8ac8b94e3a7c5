// stepviz: step traces for classic algorithms with a terminal player

use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::Level;

use stepviz::catalog::{self, Algorithm, Category, GeneratedTrace, HashConfig, RunConfig};
use stepviz::playback::{PlaybackConfig, Runner};
use stepviz::trace::Trace;
use stepviz::ui::{App, StepView};

#[derive(Parser)]
#[command(name = "stepviz", version, about = "Step-by-step traces of classic algorithms")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available algorithms
    List,
    /// Play a trace in the terminal player
    Run {
        #[command(flatten)]
        run: RunArgs,
        /// Playback speed multiplier (0.25 to 8)
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
        /// Write logs to this file while the player owns the terminal
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Print a trace as JSON
    Dump {
        #[command(flatten)]
        run: RunArgs,
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },
    /// Print the narrative text of every step
    Summary {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Algorithm identifier, see `stepviz list`
    algorithm: String,

    /// Comma-separated input values
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    data: Option<Vec<i64>>,

    /// Run with no input values (hashing runs then use sample keys)
    #[arg(long, conflicts_with = "data")]
    empty: bool,

    /// Search target, recursion argument or disk count
    #[arg(short = 'n', long, visible_alias = "target", allow_hyphen_values = true)]
    input: Option<i64>,

    /// Hash table size (3 to 31)
    #[arg(long, default_value_t = 7, allow_hyphen_values = true)]
    table_size: i64,

    /// Hash function: modulo, multiplication or djb2
    #[arg(long, default_value = "modulo")]
    hash_fn: String,

    /// Search the finished hash table for this key
    #[arg(long)]
    lookup: Option<String>,
}

impl RunArgs {
    fn to_config(&self) -> Result<RunConfig, stepviz::VizError> {
        let algorithm: Algorithm = self.algorithm.parse()?;
        let mut config = RunConfig::new(algorithm)
            .with_hash(HashConfig::new(self.table_size, &self.hash_fn));
        if self.empty {
            config = config.with_data(Vec::new());
        } else if let Some(data) = &self.data {
            config = config.with_data(data.clone());
        }
        if let Some(input) = self.input {
            config = config.with_input(input);
        }
        if let Some(key) = &self.lookup {
            config = config.with_lookup(key.clone());
        }
        Ok(config)
    }

    fn generate(&self) -> Result<GeneratedTrace, stepviz::VizError> {
        catalog::generate(&self.to_config()?)
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_stderr_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose))
        .with_writer(io::stderr)
        .init();
}

fn init_file_logging(verbose: u8, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            print_catalog();
            Ok(())
        }
        Command::Dump { run, compact } => {
            init_stderr_logging(cli.verbose);
            let trace = generate_or_exit(&run);
            let json = if compact {
                serde_json::to_string(&trace)?
            } else {
                serde_json::to_string_pretty(&trace)?
            };
            writeln!(io::stdout().lock(), "{}", json)?;
            Ok(())
        }
        Command::Summary { run } => {
            init_stderr_logging(cli.verbose);
            let trace = generate_or_exit(&run);
            let mut out = io::stdout().lock();
            for block in trace.narrative() {
                writeln!(out, "{}", block)?;
            }
            Ok(())
        }
        Command::Run {
            run,
            speed,
            log_file,
        } => {
            // The player owns the terminal, so logs only go to a file
            if let Some(path) = &log_file {
                init_file_logging(cli.verbose, path)?;
            }
            let trace = generate_or_exit(&run);
            let title = match &run.lookup {
                Some(key) => format!("{} · lookup \"{}\"", algorithm_name(&run), key),
                None => algorithm_name(&run),
            };
            play_any(trace, &title, speed)
        }
    }
}

fn algorithm_name(run: &RunArgs) -> String {
    run.algorithm
        .parse::<Algorithm>()
        .map(|a| a.name().to_string())
        .unwrap_or_else(|_| run.algorithm.clone())
}

fn generate_or_exit(run: &RunArgs) -> GeneratedTrace {
    match run.generate() {
        Ok(trace) => trace,
        Err(e) => {
            eprintln!("Error: {}", e);
            if matches!(e, stepviz::VizError::UnknownAlgorithm { .. }) {
                eprintln!();
                eprintln!("Run `stepviz list` to see the available algorithms.");
            }
            std::process::exit(1);
        }
    }
}

fn print_catalog() {
    for category in Category::ALL {
        println!("{}", category.name());
        for algorithm in Algorithm::in_category(category) {
            let input = match (algorithm.input_name(), algorithm.input_range()) {
                (Some(name), Some((min, max))) => format!("-n <{}> in {}..={}", name, min, max),
                (Some(name), None) => format!("-n <{}>", name),
                _ => String::new(),
            };
            println!(
                "  {:<16} {:<26} {:<14} {}",
                algorithm.id(),
                algorithm.name(),
                algorithm.complexity(),
                input
            );
        }
        println!();
    }
}

fn play_any(trace: GeneratedTrace, title: &str, speed: f64) -> Result<(), Box<dyn Error>> {
    match trace {
        GeneratedTrace::Sorting(t) => play(t, title, speed),
        GeneratedTrace::Searching(t) => play(t, title, speed),
        GeneratedTrace::Chaining(t) => play(t, title, speed),
        GeneratedTrace::Probing(t) => play(t, title, speed),
        GeneratedTrace::ChainingLookup(t) => play(t, title, speed),
        GeneratedTrace::ProbingLookup(t) => play(t, title, speed),
        GeneratedTrace::Calls(t) => play(t, title, speed),
        GeneratedTrace::Hanoi(t) => play(t, title, speed),
    }
}

fn play<K: StepView>(trace: Trace<K>, title: &str, speed: f64) -> Result<(), Box<dyn Error>> {
    let config = PlaybackConfig {
        speed,
        ..PlaybackConfig::default()
    };
    let mut app = App::new(Runner::new(trace, config), title);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
