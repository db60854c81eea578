use anyhow::{Context, Result, bail};
use ledge_render_config::{Config, MarkdownConfig};
use ledge_render_engine::{LedgeConverter, LexerOptions, PulldownLexer, Renderer};
use std::{
    env,
    io::{self, Read},
    path::PathBuf,
    process,
};

const USAGE: &str = "Usage: ledge-render [--config <path>] [FILE]\n\nReads FILE (or stdin) and prints the Ledge document model as JSON.";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            flag if flag.starts_with('-') && flag != "-" => bail!("unknown option `{flag}`"),
            _ if parsed.input.is_some() => bail!("only one input file may be given"),
            "-" => {}
            path => parsed.input = Some(PathBuf::from(path)),
        }
    }
    Ok(parsed)
}

fn lexer_options(markdown: MarkdownConfig) -> LexerOptions {
    LexerOptions {
        tables: markdown.tables,
        strikethrough: markdown.strikethrough,
        tasklists: markdown.tasklists,
        smart_punctuation: markdown.smart_punctuation,
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            log::info!("Config path: {}", path.display());
            let config = Config::load_from_path(path)?;
            if config.is_none() {
                bail!("config file {} not found", path.display());
            }
            config
        }
        None => {
            log::info!("Config path: {}", Config::config_path().display());
            Config::load()?
        }
    };
    Ok(loaded.unwrap_or_else(|| {
        log::info!("No config file found, using defaults");
        Config::default()
    }))
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            Ok(content)
        }
    }
}

fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config = load_config(args.config.as_ref())?;
    let markdown = read_input(args.input.as_ref())?;

    let lexer = PulldownLexer::with_options(lexer_options(config.markdown));
    let renderer = Renderer::with_parts(lexer.clone(), LedgeConverter::with_lexer(lexer));
    let doc = renderer.render(&markdown)?;
    log::info!(
        "Rendered {} blocks with {} diagnostics",
        doc.blocks.len(),
        doc.diagnostics.len()
    );

    let json = if config.output.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    println!("{json}");
    Ok(())
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
