mod report;

use anyhow::{Context as _, Result};
use article_helper::{Checks, Engine, Outcome, RuleStore, TraversalError, consult, outcome_at, walk};
use clap::{Parser, Subcommand};
use report::Palette;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the `tracing` filter directives.
const LOG_ENV: &str = "ARTICLE_HELPER_LOG";

#[derive(Parser)]
#[command(name = "article-helper", version)]
#[command(about = "Pick the right English article (a, an, the, or none) for a noun")]
struct Cli {
    /// Rule dataset (JSON). The bundled rules are used when omitted.
    #[arg(long, global = true, env = "ARTICLE_HELPER_RULES")]
    rules: Option<PathBuf>,

    /// Also reject unreachable nodes, repeated option labels and empty option lists.
    #[arg(long, global = true)]
    strict: bool,

    /// Force ANSI color output.
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look a noun up; on a miss, show the first question
    Check {
        #[arg(required = true)]
        noun: Vec<String>,
    },

    /// Walk the decision tree with scripted answers
    Walk {
        #[arg(required = true)]
        noun: Vec<String>,

        /// Option label to answer the next question with (repeatable, in order)
        #[arg(short, long = "answer", value_name = "LABEL")]
        answers: Vec<String>,
    },

    /// Answer the questions interactively
    Ask { noun: Vec<String> },

    /// Load the rules and report what they contain
    Validate,

    /// Print the rules with legacy encodings migrated
    Migrate,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let palette = Palette::new(if cli.no_color { false } else { cli.color || io::stdout().is_terminal() });
    let store = load_store(cli.rules.as_ref(), cli.strict)?;

    match cli.command {
        Command::Check { noun } => {
            let noun = noun.join(" ");
            let mut engine = Engine::new(&store);
            let outcome = consult(&mut engine, &noun)?;
            report::print_outcome(&noun, &outcome, &palette);
            println!();
        }
        Command::Walk { noun, answers } => {
            let result = walk(&store, &noun.join(" "), &answers)?;
            report::print_walk(&result, &palette);
        }
        Command::Ask { noun } => ask(&store, noun.join(" "), &palette)?,
        Command::Validate => {
            let source = match &cli.rules {
                Some(path) => path.display().to_string(),
                None => "bundled rules".to_string(),
            };
            report::print_summary(&source, cli.strict, &store, &palette);
        }
        Command::Migrate => {
            let json = serde_json::to_string_pretty(&store.to_json_value()).context("serializing rules")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn load_store(path: Option<&PathBuf>, strict: bool) -> Result<RuleStore> {
    let checks = if strict { Checks::STRICT } else { Checks::default() };
    match path {
        Some(path) => RuleStore::from_path_with(path, checks)
            .with_context(|| format!("loading rules from {}", path.display())),
        None => RuleStore::bundled_with(checks).context("loading bundled rules"),
    }
}

/// Interactive session on stdin/stdout.
///
/// Options can be chosen by number or by their exact label; `q` quits.
fn ask(store: &RuleStore, mut noun: String, palette: &Palette) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while noun.trim().is_empty() {
        prompt("Enter a noun or phrase (e.g., car, USA, breakfast): ")?;
        match lines.next().transpose()? {
            Some(line) => noun = line,
            None => return Ok(()),
        }
        if noun.trim().is_empty() {
            println!("Please enter a noun or phrase to check.");
        }
    }

    let mut engine = Engine::new(store);
    let mut outcome = consult(&mut engine, &noun)?;
    report::print_outcome(&noun, &outcome, palette);

    loop {
        let Outcome::Pending { node, .. } = &outcome else { break };
        let node = *node;

        prompt("\nYour choice (number or label, q to quit): ")?;
        let Some(line) = lines.next().transpose()? else { return Ok(()) };
        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let label = match choice.parse::<usize>() {
            Ok(n) if n >= 1 => node.options.labels().nth(n - 1).unwrap_or(choice),
            _ => choice,
        };

        match engine.advance(label) {
            Ok(_) => {}
            Err(TraversalError::InvalidOption { .. }) => {
                println!("{:?} is not one of the options; try again.", label);
                continue;
            }
            Err(err) => return Err(err.into()),
        }

        outcome = outcome_at(&engine)?;
        match &outcome {
            Outcome::Pending { node_id, node } => report::print_question(node_id, node, palette),
            _ => {
                if let Some(rec) = outcome.recommendation() {
                    report::print_recommendation(&rec, palette);
                }
            }
        }
    }

    println!();
    Ok(())
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{text}");
    io::stdout().flush()
}
