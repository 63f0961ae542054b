use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use ravenfoot::{
    Arrangement, Catalog, CompositionRequest, HistoryLog, JoinRule, KeystreamRng, entropy, sampler,
    ui,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ravenfoot",
    version,
    author,
    about = "Mixed-language passphrase generator with heuristic entropy estimates"
)]
struct Cli {
    /// Words per passphrase
    #[arg(short, long, default_value_t = CompositionRequest::DEFAULT_WORDS)]
    words: usize,

    /// Special characters per passphrase
    #[arg(short, long, default_value_t = CompositionRequest::DEFAULT_SPECIALS)]
    specials: usize,

    /// Numbers per passphrase
    #[arg(short, long, default_value_t = CompositionRequest::DEFAULT_NUMBERS)]
    numbers: usize,

    /// How many passphrases to generate
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Text placed between tokens (default: none)
    #[arg(long, value_name = "SEP")]
    separator: Option<String>,

    /// Allow all words to come from a single language
    #[arg(long)]
    no_diversity: bool,

    /// Token layout: all tokens shuffled, or numbers and specials stuck to words
    #[arg(short, long, value_enum, default_value = "shuffled")]
    layout: Layout,

    /// Directory holding *_words_clean.txt, numbers.txt and special_characters.txt
    #[arg(short = 'L', long, env = "RAVENFOOT_LIBRARY", default_value = "library")]
    library: PathBuf,

    /// History file (default: per-user location)
    #[arg(long, env = "RAVENFOOT_HISTORY", value_name = "FILE")]
    history: Option<PathBuf>,

    /// Do not append generated passphrases to the history file
    #[arg(long)]
    no_history: bool,

    /// Delete the history file and exit
    #[arg(long)]
    clear_history: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    yes: bool,

    /// Copy passphrase number N of the output to the clipboard
    #[arg(long, value_name = "N")]
    copy: Option<usize>,

    /// Print the entropy estimate without generating anything
    #[arg(long)]
    estimate_only: bool,

    /// Fixed seed for reproducible output (testing only)
    #[arg(long, hide = true)]
    seed: Option<u64>,

    /// Print passphrases only
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Layout {
    Shuffled,
    Decorated,
}

impl Cli {
    fn request(&self) -> CompositionRequest {
        let join = match &self.separator {
            Some(sep) if !sep.is_empty() => JoinRule::Separator(sep.clone()),
            _ => JoinRule::Concatenate,
        };
        let arrangement = match self.layout {
            Layout::Shuffled => Arrangement::Shuffled,
            Layout::Decorated => Arrangement::Decorated,
        };

        CompositionRequest::new(self.words, self.specials, self.numbers)
            .with_diversity(!self.no_diversity)
            .with_join(join)
            .with_arrangement(arrangement)
    }

    fn history_log(&self) -> Result<HistoryLog> {
        match &self.history {
            Some(path) => Ok(HistoryLog::new(path)),
            None => HistoryLog::open_default().context("Failed to locate history file"),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    if cli.clear_history {
        let history = cli.history_log()?;
        let question = format!("Delete {}?", history.path().display());
        if !cli.yes && !ui::confirm(&question)? {
            eprintln!("Aborted.");
            return Ok(());
        }

        if history.clear()? {
            println!("Deleted {}", history.path().display());
        } else {
            println!("No history at {}", history.path().display());
        }
        return Ok(());
    }

    if let Some(n) = cli.copy
        && (n == 0 || n > cli.count)
    {
        anyhow::bail!("--copy {} is out of range (1-{})", n, cli.count);
    }

    let request = cli.request();

    let (catalog, _) = ui::show_progress(&options, "Loading word lists...", || {
        Catalog::load(&cli.library).with_context(|| {
            format!(
                "Failed to load word lists from {}",
                cli.library.display()
            )
        })
    })?;

    if cli.estimate_only {
        let estimate = entropy::estimate(&request, &catalog);
        ui::display_estimate(&estimate, &catalog, &request, &options);
        return Ok(());
    }

    let mut rng = match cli.seed {
        Some(seed) => {
            log::warn!("Using fixed seed {}; output is reproducible", seed);
            KeystreamRng::seeded(seed)
        }
        None => KeystreamRng::from_os_entropy()?,
    };

    let (passphrases, elapsed) = ui::show_progress(&options, "Generating...", || {
        (0..cli.count)
            .map(|_| sampler::sample_with(&catalog, &request, &mut rng))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to generate passphrase")
    })?;

    ui::display_output(&passphrases, &catalog, &request, elapsed, &options);

    if let Some(n) = cli.copy {
        ui::copy_to_clipboard(passphrases[n - 1].as_str(), n, &options);
    }

    if !cli.no_history {
        let history = cli.history_log()?;
        history
            .append(&passphrases)
            .context("Failed to append to history file")?;
        log::info!("Appended to {}", history.path().display());
    }

    Ok(())
}
