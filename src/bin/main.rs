use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};
use wordsense_core::persistence::load_index;
use wordsense_core::{
    EngineConfig, InMemoryIndex, PhraseInput, SenseEngine, SenseError, SimilarityOptions,
    SynonymOptions, WordSenseKey,
};

/// Word-sense synonym and similarity queries over a vector vocabulary
#[derive(Parser)]
#[command(name = "wordsense")]
#[command(version)]
#[command(about = "Resolve mis-cased or ambiguous phrases against a word-sense vocabulary")]
struct Cli {
    /// Vector table (.json) or index snapshot
    #[arg(short, long)]
    index: PathBuf,

    /// Engine configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nearest synonyms of a phrase
    Synonyms {
        /// Phrase as JSON, e.g. '["big|ADJ","apple|NOUN"]', or a bare key
        phrase: String,
        #[command(flatten)]
        flags: SynonymFlags,
    },
    /// Similarity of two phrases
    Similarity {
        a: String,
        b: String,
        /// Try compound keys for multi-word phrases
        #[arg(long)]
        join_compounds: bool,
    },
    /// Find the vocabulary's casing of a key
    Lookup { key: String },
    /// Run the probe query
    Healthcheck,
    /// Interactive synonym prompt
    Repl {
        #[command(flatten)]
        flags: SynonymFlags,
    },
}

#[derive(Args, Clone)]
struct SynonymFlags {
    #[arg(short, long, default_value_t = 10)]
    n: usize,
    #[arg(long)]
    min_score: Option<f32>,
    #[arg(long)]
    min_word_len: Option<usize>,
    #[arg(long)]
    reduce_multicase: bool,
    #[arg(long)]
    match_input_sense: bool,
    #[arg(long)]
    reduce_compound_nouns: bool,
    #[arg(long)]
    join_compounds: bool,
    #[arg(long)]
    multi_token_queries: bool,
}

impl From<SynonymFlags> for SynonymOptions {
    fn from(flags: SynonymFlags) -> Self {
        Self {
            attempt_phrase_join_for_compound_phrases: flags.join_compounds,
            reduce_multicase: flags.reduce_multicase,
            match_input_sense: flags.match_input_sense,
            reduce_compound_nouns: flags.reduce_compound_nouns,
            min_word_len: flags.min_word_len,
            min_score: flags.min_score,
            n: flags.n,
            allow_multi_token_queries: flags.multi_token_queries,
        }
    }
}

/// Accepts JSON phrases and falls back to treating the text as one bare key.
fn parse_phrase(text: &str) -> Result<PhraseInput, SenseError> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => PhraseInput::from_json(value),
        Err(_) => Ok(PhraseInput::Key(text.trim().to_string())),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), SenseError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn repl(engine: &SenseEngine<InMemoryIndex>, options: &SynonymOptions) -> Result<(), SenseError> {
    println!("{}", "wordsense repl. Enter a phrase, or 'exit' to quit.".bold());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("{} ", ">".cyan());
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "" => continue,
            "exit" => break,
            text => match parse_phrase(text).and_then(|p| engine.resolve_synonyms(&p, options)) {
                Ok(matches) if matches.is_empty() => println!("{}", "No synonyms found.".dim()),
                Ok(matches) => {
                    for (i, m) in matches.iter().enumerate() {
                        println!(
                            "  {:>2}. {} {} {}",
                            i + 1,
                            m.word.as_str().green(),
                            format!("|{}", m.sense).dim(),
                            format!("{:.3}", m.score).yellow()
                        );
                    }
                }
                Err(e) => println!("{} {}", "error:".red(), e),
            },
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), SenseError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = SenseEngine::with_config(load_index(&cli.index)?, config);

    match cli.command {
        Commands::Synonyms { phrase, flags } => {
            let matches = engine.resolve_synonyms(&parse_phrase(&phrase)?, &flags.into())?;
            print_json(&matches)
        }
        Commands::Similarity {
            a,
            b,
            join_compounds,
        } => {
            let options = SimilarityOptions {
                attempt_phrase_join_for_compound_phrases: join_compounds,
            };
            let score = engine.compute_similarity(&parse_phrase(&a)?, &parse_phrase(&b)?, &options)?;
            print_json(&score)
        }
        Commands::Lookup { key } => {
            let found = engine.lookup(&WordSenseKey::parse(&key)?);
            print_json(&found.map(|k| k.to_key()))
        }
        Commands::Healthcheck => print_json(&engine.healthcheck()?),
        Commands::Repl { flags } => repl(&engine, &flags.into()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "wordsense failed");
            eprintln!("{} {e}", "error:".red());
            ExitCode::FAILURE
        }
    }
}
