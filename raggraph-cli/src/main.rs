//! RAG agent binary: indexes documents, answers one question and prints the result.

use std::path::PathBuf;

use clap::Parser;
use raggraph_cli::{run_with_config, AgentKind, RunConfig, RunOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "raggraph")]
#[command(about = "RAG agent: retrieve from local documents, then answer")]
struct Args {
    /// Question to answer (also accepted as trailing words)
    #[arg(short, long, value_name = "TEXT")]
    question: Option<String>,

    /// Files or directories to index; paragraphs become documents
    #[arg(short, long = "docs", value_name = "PATH")]
    docs: Vec<PathBuf>,

    /// Preset: simple, conditional, advanced or self_reflective
    #[arg(short, long)]
    agent: Option<AgentKind>,

    /// Documents per retrieval
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    #[arg(long)]
    max_steps: Option<u32>,

    #[arg(long)]
    max_refinements: Option<u32>,

    #[arg(short, long)]
    temperature: Option<f32>,

    /// Longest indexed document, in characters
    #[arg(long)]
    chunk_size: Option<usize>,

    #[arg(long)]
    chunk_overlap: Option<usize>,

    /// Print the answer as it is generated
    #[arg(short, long)]
    stream: bool,

    /// Log node execution and print the config summary
    #[arg(short, long)]
    verbose: bool,

    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

impl Args {
    fn question(&self) -> Option<String> {
        if let Some(ref q) = self.question {
            return Some(q.clone());
        }
        let joined = self.rest.join(" ").trim().to_string();
        (!joined.is_empty()).then_some(joined)
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            agent: self.agent,
            top_k: self.top_k,
            max_steps: self.max_steps,
            max_refinements: self.max_refinements,
            temperature: self.temperature,
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            docs: self.docs.clone(),
            stream: self.stream,
            verbose: self.verbose,
        }
    }
}

/// `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose { "raggraph=debug,raggraph_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let Some(question) = args.question() else {
        eprintln!("error: no question given");
        std::process::exit(2);
    };

    let mut config = RunConfig::from_env()?;
    config.apply_options(&args.options());

    println!("Question: {}", question);
    println!("---");

    let state = match run_with_config(&config, &question).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if config.stream {
        println!("---");
    }
    println!("{}", state.answer.as_deref().unwrap_or_default());
    println!("---");
    if let Some(score) = state.retrieval_score {
        println!("retrieval score: {:.3}", score);
    }
    if let Some(score) = state.confidence_score {
        println!("confidence: {:.3}", score);
    }
    println!(
        "steps: {}/{} refinements: {}",
        state.step_count(),
        state.max_steps(),
        state.refinement_count()
    );
    if let Some(ref err) = state.error {
        eprintln!("step error: {}", err);
    }
    Ok(())
}
