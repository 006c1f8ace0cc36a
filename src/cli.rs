use crate::deck::{self, DeckController, InitOutcome};
use crate::parse;
use crate::storage;
use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Sample pool used when no file is given and nothing is saved.
pub const SAMPLE_QUESTIONS: &str = "\
list all the properties of indirect utility function
list all the properties of expenditure function
list all the properties of profit function
list the duality between utility maximization and expenditure minimization
list the duality between profit maximization and cost minimization
list the Slutsky equation
list the Roy's identity
list the formulas for consumer surplus, compensated variation, equivalent variation
list the formulas for substitution effect and income effect
define pareto efficiency";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "question-deck-cli",
    version,
    about = "Draw study questions one at a time without repeats, with optional TUI"
)]
pub struct Cli {
    /// File with one question per line
    #[arg(long)]
    pub questions: Option<PathBuf>,

    /// Run the plain-text line mode instead of the TUI
    #[arg(long)]
    pub text: bool,

    /// Draw N questions and exit (no TUI)
    #[arg(long)]
    pub draws: Option<usize>,

    /// Seed the shuffle so draws are reproducible
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the saved-pool location
    #[arg(long)]
    pub storage_path: Option<PathBuf>,

    /// Use --auto-save true or --auto-save false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub auto_save: bool,

    /// Initialize the deck as soon as the app launches
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub start_on_launch: bool,
}

/// Where the launch pool came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSource {
    File,
    Saved,
    Sample,
}

/// A submitted line of user input in the line mode.
///
/// Only a handful of words are recognized; any other input is discarded
/// and performs a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Draw,
    Finish,
    Reset,
    Clear,
    Quit,
}

impl Command {
    pub fn interpret(line: &str) -> Command {
        match line.trim().to_lowercase().as_str() {
            "finish" => Command::Finish,
            "start" | "reset" => Command::Reset,
            "clear" => Command::Clear,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Draw,
        }
    }
}

pub fn run(args: Cli) -> Result<()> {
    if args.draws.is_none() && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args);
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args);
        }
    }

    if let Some(n) = args.draws {
        return run_draws(&args, n);
    }

    run_text(args)
}

/// Where the saved pool lives for this invocation.
pub fn pool_path(args: &Cli) -> Option<PathBuf> {
    args.storage_path
        .clone()
        .or_else(storage::default_pool_path)
}

/// Resolve the launch pool: explicit file, then saved pool, then the
/// built-in sample.
pub fn resolve_lines(args: &Cli) -> Result<(Vec<String>, PoolSource)> {
    if let Some(path) = args.questions.as_deref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read questions file {}", path.display()))?;
        return Ok((parse::clean_lines(&text), PoolSource::File));
    }

    if let Some(path) = pool_path(args) {
        if let Some(saved) = storage::load_pool(&path) {
            let cleaned = parse::clean_lines(&saved.join("\n"));
            if !cleaned.is_empty() {
                return Ok((cleaned, PoolSource::Saved));
            }
        }
    }

    Ok((parse::clean_lines(SAMPLE_QUESTIONS), PoolSource::Sample))
}

/// Build a controller, seeded when `--seed` is given.
pub fn build_controller(args: &Cli) -> DeckController {
    match args.seed {
        Some(seed) => DeckController::with_rng(StdRng::seed_from_u64(seed)),
        None => DeckController::new(),
    }
}

/// Persist the pool after a successful initialize. Empty pools are never
/// saved; failures are ignored.
pub fn save_after_init(args: &Cli, pool: &[String]) {
    if !args.auto_save || pool.is_empty() {
        return;
    }
    if let Some(path) = pool_path(args) {
        storage::save_pool_best_effort(&path, pool);
    }
}

/// Request deletion of the saved pool after a clear. Failures are
/// ignored.
pub fn delete_after_clear(args: &Cli) {
    if !args.auto_save {
        return;
    }
    if let Some(path) = pool_path(args) {
        storage::delete_pool_best_effort(&path);
    }
}

/// Non-interactive mode: initialize, draw `n` questions to stdout, exit.
fn run_draws(args: &Cli, n: usize) -> Result<()> {
    let (lines, _) = resolve_lines(args)?;
    let mut deck = build_controller(args);
    let outcome = deck.initialize(lines);
    save_after_init(args, deck.pool());

    if outcome == InitOutcome::EmptyPool {
        anyhow::bail!("no questions to draw");
    }
    eprintln!("{}", outcome.status());

    for _ in 0..n {
        match deck.draw() {
            Ok(out) => {
                println!("{}", out.question);
                eprintln!("{}", out.status());
            }
            Err(e) => {
                eprintln!("{}", e.message());
                break;
            }
        }
    }
    Ok(())
}

/// Line mode: a stdin REPL. Empty input draws, "finish" stops,
/// "start"/"reset", "clear" and "quit" stand in for the buttons; any
/// other text is discarded and draws.
fn run_text(args: Cli) -> Result<()> {
    let (lines, source) = resolve_lines(&args)?;
    if source == PoolSource::Saved {
        eprintln!("Loaded your saved questions.");
    }

    let mut deck = build_controller(&args);
    // The line mode always starts immediately; there is no separate
    // start gesture before the prompt.
    let mut current_lines = lines;
    let outcome = deck.initialize(current_lines.clone());
    save_after_init(&args, deck.pool());
    eprintln!("{}", outcome.message());
    eprintln!("{}", outcome.status());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("read stdin")?;
        match Command::interpret(&line) {
            Command::Quit => break,
            Command::Finish => {
                deck.finish();
                eprintln!("{}", deck::FINISHED_MESSAGE);
            }
            Command::Reset => {
                let outcome = deck.initialize(current_lines.clone());
                save_after_init(&args, deck.pool());
                eprintln!("{}", outcome.message());
                eprintln!("{}", outcome.status());
            }
            Command::Clear => {
                deck.clear();
                current_lines.clear();
                delete_after_clear(&args);
                eprintln!("{}", deck::CLEARED_MESSAGE);
            }
            Command::Draw => match deck.draw() {
                Ok(out) => {
                    println!("{}", out.question);
                    eprintln!("{}", out.status());
                }
                Err(e) => eprintln!("{}", e.message()),
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse_args(extra: &[&str]) -> Cli {
        let mut argv = vec!["question-deck-cli"];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv)
    }

    #[test]
    fn interpret_recognizes_the_finish_word() {
        assert_eq!(Command::interpret("finish"), Command::Finish);
        assert_eq!(Command::interpret("  FINISH  "), Command::Finish);
    }

    #[test]
    fn interpret_treats_everything_else_as_a_draw() {
        assert_eq!(Command::interpret(""), Command::Draw);
        assert_eq!(Command::interpret("   "), Command::Draw);
        assert_eq!(Command::interpret("what is this"), Command::Draw);
        assert_eq!(Command::interpret("finish please"), Command::Draw);
    }

    #[test]
    fn interpret_maps_the_button_words() {
        assert_eq!(Command::interpret("start"), Command::Reset);
        assert_eq!(Command::interpret("reset"), Command::Reset);
        assert_eq!(Command::interpret("clear"), Command::Clear);
        assert_eq!(Command::interpret("quit"), Command::Quit);
        assert_eq!(Command::interpret("q"), Command::Quit);
    }

    #[test]
    fn resolve_prefers_an_explicit_questions_file() {
        let dir = TempDir::new().expect("create temp dir");
        let file = dir.path().join("input.txt");
        std::fs::write(&file, "  one \n\ntwo\n").unwrap();
        let store = dir.path().join("questions.json");
        storage::save_pool(&store, &["saved".to_string()]).unwrap();

        let args = parse_args(&[
            "--questions",
            file.to_str().unwrap(),
            "--storage-path",
            store.to_str().unwrap(),
        ]);
        let (lines, source) = resolve_lines(&args).unwrap();
        assert_eq!(source, PoolSource::File);
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn resolve_falls_back_to_the_saved_pool() {
        let dir = TempDir::new().expect("create temp dir");
        let store = dir.path().join("questions.json");
        storage::save_pool(&store, &["saved one".to_string(), "saved two".to_string()]).unwrap();

        let args = parse_args(&["--storage-path", store.to_str().unwrap()]);
        let (lines, source) = resolve_lines(&args).unwrap();
        assert_eq!(source, PoolSource::Saved);
        assert_eq!(lines, vec!["saved one", "saved two"]);
    }

    #[test]
    fn resolve_uses_the_sample_when_nothing_is_saved() {
        let dir = TempDir::new().expect("create temp dir");
        let store = dir.path().join("absent.json");

        let args = parse_args(&["--storage-path", store.to_str().unwrap()]);
        let (lines, source) = resolve_lines(&args).unwrap();
        assert_eq!(source, PoolSource::Sample);
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn resolve_treats_corrupt_saved_data_as_absent() {
        let dir = TempDir::new().expect("create temp dir");
        let store = dir.path().join("questions.json");
        std::fs::write(&store, "{ definitely broken").unwrap();

        let args = parse_args(&["--storage-path", store.to_str().unwrap()]);
        let (_, source) = resolve_lines(&args).unwrap();
        assert_eq!(source, PoolSource::Sample);
    }

    #[test]
    fn saved_pool_round_trips_into_a_new_controller() {
        let dir = TempDir::new().expect("create temp dir");
        let store = dir.path().join("questions.json");
        let args = parse_args(&["--storage-path", store.to_str().unwrap()]);

        let mut first = build_controller(&args);
        first.initialize(vec!["alpha".into(), "beta".into(), "gamma".into()]);
        save_after_init(&args, first.pool());

        let (lines, source) = resolve_lines(&args).unwrap();
        assert_eq!(source, PoolSource::Saved);

        let mut second = build_controller(&args);
        second.initialize(lines);
        assert_eq!(second.pool(), first.pool());
    }

    #[test]
    fn save_after_init_skips_empty_pools() {
        let dir = TempDir::new().expect("create temp dir");
        let store = dir.path().join("questions.json");

        let args = parse_args(&["--storage-path", store.to_str().unwrap()]);
        save_after_init(&args, &[]);
        assert!(!store.exists());

        save_after_init(&args, &["q".to_string()]);
        assert!(store.exists());
    }

    #[test]
    fn auto_save_false_disables_the_store_entirely() {
        let dir = TempDir::new().expect("create temp dir");
        let store = dir.path().join("questions.json");
        storage::save_pool(&store, &["keep me".to_string()]).unwrap();

        let args = parse_args(&[
            "--storage-path",
            store.to_str().unwrap(),
            "--auto-save",
            "false",
        ]);
        save_after_init(&args, &["new".to_string()]);
        delete_after_clear(&args);

        assert_eq!(storage::load_pool(&store), Some(vec!["keep me".to_string()]));
    }
}
