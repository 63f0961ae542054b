use crate::catalog::Catalog;
use crate::composition::{Arrangement, CompositionRequest, JoinRule};
use crate::entropy::{EntropyEstimate, Strength};
use crate::error::{Category, Warning};
use crate::sampler::Passphrase;
use anyhow::Result;
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::{Duration, Instant};

pub const MIN_SAFE_WORD_COUNT: usize = 4;
pub const MIN_SAFE_LENGTH: usize = 20;

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

struct Tree {
    branch: &'static str,
    last: &'static str,
    pipe: &'static str,
}

fn tree(unicode_support: bool) -> Tree {
    if unicode_support {
        Tree {
            branch: "├─",
            last: "└─",
            pipe: "│ ",
        }
    } else {
        Tree {
            branch: "|-",
            last: "`-",
            pipe: "| ",
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn status_style(ok: bool, options: &DisplayOptions) -> Style {
    if !options.color_support {
        Style::new()
    } else if ok {
        Style::new().green()
    } else {
        Style::new().yellow()
    }
}

/// Asks a yes/no question on stderr. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{} [y/N]: ", question))?;
    term.flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    let response = response.trim().to_lowercase();

    Ok(response == "y" || response == "yes")
}

pub fn show_progress<F, T>(options: &DisplayOptions, message: &str, f: F) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    if options.quiet {
        let start = Instant::now();
        return f().map(|r| (r, start.elapsed()));
    }

    let term = Term::stdout();
    term.hide_cursor().ok();

    let pb = ProgressBar::new_spinner();

    if options.unicode_support {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠏"]),
        );
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("-\\|/-"),
        );
    }

    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    pb.finish_and_clear();
    term.show_cursor().ok();

    result.map(|r| (r, elapsed))
}

pub fn display_output(
    passphrases: &[Passphrase],
    catalog: &Catalog,
    request: &CompositionRequest,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    if options.quiet {
        for passphrase in passphrases {
            println!("{}", passphrase.as_str());
        }
        return;
    }

    let width = passphrases.len().to_string().len().max(2);
    for (i, passphrase) in passphrases.iter().enumerate() {
        println!("Out[{:0width$}]: {}", i + 1, passphrase.as_str(), width = width);
    }
    println!();

    let Some(first) = passphrases.first() else {
        return;
    };

    display_settings(catalog, request, options);
    display_stats(first.estimate(), passphrases, request, elapsed, options);
    display_warnings(passphrases, options);
}

/// Prints only the estimate, for checking a composition before generating.
pub fn display_estimate(
    estimate: &EntropyEstimate,
    catalog: &Catalog,
    request: &CompositionRequest,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{:.1}", estimate.bits);
        return;
    }

    display_settings(catalog, request, options);
    display_entropy(estimate, options);
}

fn display_settings(catalog: &Catalog, request: &CompositionRequest, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let t = tree(options.unicode_support);

    let languages: Vec<_> = catalog.languages().collect();
    let mixing_ok = !request.diversity || (languages.len() >= 2 && request.words >= 2);
    let mixing_style = status_style(mixing_ok, options);

    println!("Settings:");

    if let Some(source) = catalog.source() {
        println!("  {} Library    {}", t.branch, source.display());
    }

    println!(
        "  {} Languages  {} {}",
        t.branch,
        languages.len(),
        plural(languages.len(), "list", "lists")
    );
    for (i, pool) in languages.iter().enumerate() {
        let prefix = if i == languages.len() - 1 {
            t.last
        } else {
            t.branch
        };
        println!(
            "  {}  {} {:<10} {} {}",
            t.pipe,
            prefix,
            pool.name(),
            pool.len(),
            plural(pool.len(), "word", "words")
        );
    }

    println!(
        "  {} Numbers    {} {}",
        t.branch,
        catalog.numbers().map_or(0, |p| p.len()),
        plural(catalog.numbers().map_or(0, |p| p.len()), "token", "tokens")
    );
    println!(
        "  {} Specials   {} {}",
        t.branch,
        catalog.specials().map_or(0, |p| p.len()),
        plural(catalog.specials().map_or(0, |p| p.len()), "token", "tokens")
    );

    if !catalog.skipped().is_empty() {
        let skipped_style = status_style(false, options);
        println!(
            "  {} Skipped    {} {} {}",
            t.branch,
            skipped_style.apply_to(format!("[{}]", check_warn)),
            catalog.skipped().len(),
            plural(catalog.skipped().len(), "file", "files")
        );
    }

    println!(
        "  {} Mixing     {} {}",
        t.branch,
        mixing_style.apply_to(format!(
            "[{}]",
            if mixing_ok { check_ok } else { check_warn }
        )),
        if request.diversity {
            "At least two languages"
        } else {
            "Off"
        }
    );

    let join = match &request.join {
        JoinRule::Concatenate => "none".to_string(),
        JoinRule::Separator(sep) => format!("\"{}\"", sep),
    };
    let layout = match request.arrangement {
        Arrangement::Shuffled => "Shuffled",
        Arrangement::Decorated => "Decorated",
    };
    println!("  {} Layout     {} (separator: {})", t.branch, layout, join);

    println!(
        "  {} Request    {} {}, {} {}, {} {}",
        t.last,
        request.words,
        plural(request.words, "word", "words"),
        request.specials,
        plural(request.specials, "special", "specials"),
        request.numbers,
        plural(request.numbers, "number", "numbers")
    );

    println!();
}

fn strength_style(strength: Strength, options: &DisplayOptions) -> Style {
    if !options.color_support {
        return Style::new();
    }
    match strength {
        Strength::Strong => Style::new().green(),
        Strength::Fair => Style::new().cyan(),
        Strength::Weak => Style::new().yellow(),
    }
}

fn display_entropy(estimate: &EntropyEstimate, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let t = tree(options.unicode_support);

    let strength = estimate.strength();
    let style = strength_style(strength, options);
    let icon = if strength == Strength::Weak {
        check_warn
    } else {
        check_ok
    };

    println!("Entropy:");
    for c in &estimate.categories {
        println!(
            "  {} {:<10} {} x log2({}) = {:.1} bits",
            t.branch,
            category_label(c.category),
            c.count,
            c.pool_size,
            c.bits
        );
    }
    if estimate.placement_bits > 0.0 {
        println!(
            "  {} Placement  {:.1} bits",
            t.branch, estimate.placement_bits
        );
    }
    println!(
        "  {} Total      {} {} bits ({})",
        t.last,
        style.apply_to(format!("[{}]", icon)),
        style.apply_to(format!("{:.1}", estimate.bits)),
        style.apply_to(strength.label())
    );
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Words => "Words",
        Category::Numbers => "Numbers",
        Category::Specials => "Specials",
    }
}

fn display_stats(
    estimate: &EntropyEstimate,
    passphrases: &[Passphrase],
    request: &CompositionRequest,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let t = tree(options.unicode_support);

    let strength = estimate.strength();
    let entropy_style = strength_style(strength, options);
    let status_icon = if strength == Strength::Weak {
        check_warn
    } else {
        check_ok
    };

    let lengths: Vec<usize> = passphrases
        .iter()
        .map(|p| p.as_str().chars().count())
        .collect();
    let shortest = lengths.iter().copied().min().unwrap_or(0);
    let longest = lengths.iter().copied().max().unwrap_or(0);

    let length_secure = shortest >= MIN_SAFE_LENGTH;
    let length_style = status_style(length_secure, options);
    let length_status = if length_secure { check_ok } else { check_warn };

    let words_secure = request.words >= MIN_SAFE_WORD_COUNT;
    let words_style = status_style(words_secure, options);
    let words_status = if words_secure { check_ok } else { check_warn };

    println!("Stats:");

    println!(
        "  {} Entropy    {} {} bits ({})",
        t.branch,
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(format!("{:.1}", estimate.bits)),
        entropy_style.apply_to(strength.label())
    );

    let length = if shortest == longest {
        shortest.to_string()
    } else {
        format!("{}-{}", shortest, longest)
    };
    println!(
        "  {} Length     {} {} {}",
        t.branch,
        length_style.apply_to(format!("[{}]", length_status)),
        length_style.apply_to(length),
        plural(longest, "char", "chars")
    );

    println!(
        "  {} Words      {} {} {}",
        t.branch,
        words_style.apply_to(format!("[{}]", words_status)),
        words_style.apply_to(request.words),
        plural(request.words, "word", "words")
    );

    println!(
        "  {} Generated  {} {}",
        t.branch,
        passphrases.len(),
        plural(passphrases.len(), "passphrase", "passphrases")
    );
    println!("  {} Time       {:.2}s", t.last, elapsed.as_secs_f64());

    println!(
        "\n{} Strength: {} (heuristic estimate, not a guarantee)",
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(strength.label())
    );
}

/// Copies `text` to the system clipboard. Failure is reported, not fatal.
pub fn copy_to_clipboard(text: &str, index: usize, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);

    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => {
            if !options.quiet {
                let style = status_style(true, options);
                println!(
                    "{} Copied Out[{:02}] to clipboard",
                    style.apply_to(format!("[{}]", check_ok)),
                    index
                );
            }
        }
        Err(e) => {
            log::warn!("Clipboard unavailable: {}", e);
            let style = status_style(false, options);
            eprintln!(
                "{} Failed to copy to clipboard: {}",
                style.apply_to(format!("[{}]", check_warn)),
                e
            );
        }
    }
}

/// Distinct warnings raised across a batch, in first-seen order.
fn collect_warnings(passphrases: &[Passphrase]) -> Vec<&Warning> {
    let mut seen: Vec<&Warning> = Vec::new();
    for warning in passphrases.iter().flat_map(|p| p.warnings()) {
        if !seen.contains(&warning) {
            seen.push(warning);
        }
    }
    seen
}

fn display_warnings(passphrases: &[Passphrase], options: &DisplayOptions) {
    let warnings = collect_warnings(passphrases);
    if warnings.is_empty() {
        return;
    }

    let (_, check_warn) = get_status_symbols(options.unicode_support);
    let style = status_style(false, options);

    println!();
    for warning in warnings {
        println!("{} {}", style.apply_to(format!("[{}]", check_warn)), warning);
    }
}
