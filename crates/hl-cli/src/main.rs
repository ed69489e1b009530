use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::Path;

use hl_engine::{GrammarRegistry, Node};
use hl_templ::ComposeOptions;

#[derive(Parser)]
#[command(name = "templ-hl")]
#[command(about = "Syntax highlighter for templ files")]
#[command(version)]
struct Cli {
    /// JSON file with grammar options (language_id, block_keywords, ...)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Language id to highlight with (defaults to the configured templ id)
    #[arg(long, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a file as highlighted HTML on stdout
    Highlight {
        /// Input file
        path: String,

        /// Emit a full HTML page with a stylesheet
        #[arg(long)]
        standalone: bool,
    },

    /// Print a file's token tree as JSON on stdout
    Tokens {
        /// Input file
        path: String,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let options = load_options(cli.config.as_deref());
    let registry = build_registry(&options);
    let language = cli.language.unwrap_or_else(|| options.language_id.clone());

    match cli.command {
        Command::Highlight { path, standalone } => {
            cmd_highlight(&registry, &language, &path, standalone)
        }
        Command::Tokens { path, pretty } => cmd_tokens(&registry, &language, &path, pretty),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn load_options(config: Option<&str>) -> ComposeOptions {
    let Some(path) = config else {
        return ComposeOptions::default();
    };
    let source = read_source(path);
    match serde_json::from_str(&source) {
        Ok(options) => {
            debug!("loaded options from {path}");
            options
        }
        Err(e) => {
            eprintln!("Config error in {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn build_registry(options: &ComposeOptions) -> GrammarRegistry {
    let registry = match GrammarRegistry::with_base_grammars() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Grammar error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = hl_templ::register(&registry, options) {
        eprintln!("Grammar error: {e}");
        std::process::exit(1);
    }
    registry
}

fn tokenize_file(registry: &GrammarRegistry, language: &str, path: &str) -> Vec<Node> {
    let source = read_source(path);
    match registry.highlight(language, &source) {
        Ok(tokens) => {
            info!("{path}: {} top-level nodes", tokens.len());
            tokens
        }
        Err(e) => {
            eprintln!("Highlight error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_highlight(registry: &GrammarRegistry, language: &str, path: &str, standalone: bool) {
    let tokens = tokenize_file(registry, language, path);

    let html = if standalone {
        let title = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path);
        hl_render::render_document(title, language, &tokens)
    } else {
        let mut block = hl_render::render_code_block(language, &tokens);
        block.push('\n');
        block
    };
    print!("{html}");
}

fn cmd_tokens(registry: &GrammarRegistry, language: &str, path: &str, pretty: bool) {
    let tokens = tokenize_file(registry, language, path);

    let json = if pretty {
        serde_json::to_string_pretty(&tokens)
    } else {
        serde_json::to_string(&tokens)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        }
    }
}
