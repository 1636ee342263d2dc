mod args;

use std::path::{Path, PathBuf};

use clap::Parser;
use cuemark::config::EngineConfig;
use cuemark::fetch::{is_url, load_source};
use cuemark::pipeline::{json_from_cues, paragraph_from_cues, paragraph_to_json, srt_from_timed_text};
use cuemark::timedtext::parse_timed_text;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command, Io};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading engine config from {}", path.display());
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(fake_groups) = args.fake_groups {
        config.fake_groups = fake_groups;
    }
    if let Some(chunk_duration) = args.chunk_duration {
        config.chunk_duration = chunk_duration;
    }

    match args.command {
        Command::Srt(io) => {
            let xml = load_source(&io.input).await?;
            let srt = srt_from_timed_text(&xml)?;
            emit(&io, &srt)?;
        }
        Command::Json {
            input,
            out_dir,
            name,
            single,
        } => {
            config.validate()?;
            let xml = load_source(&input).await?;
            let cues = parse_timed_text(&xml)?;
            info!("Loaded {} cues from {}", cues.len(), input);

            let base = name.unwrap_or_else(|| base_name(&input));
            let parts = json_from_cues(cues, &config, &base, single).await?;
            std::fs::create_dir_all(&out_dir)?;
            for part in &parts {
                let path = out_dir.join(&part.file_name);
                std::fs::write(&path, &part.content)?;
                info!("Wrote {}", path.display());
            }
        }
        Command::Paragraph {
            io,
            min,
            max,
            chance,
        } => {
            if let Some(min) = min {
                config.paragraph.min = min;
            }
            if let Some(max) = max {
                config.paragraph.max = max;
            }
            if let Some(chance) = chance {
                config.paragraph.split_chance = chance;
            }
            config.validate()?;
            debug!("Paragraph options: {:?}", config.paragraph);

            let xml = load_source(&io.input).await?;
            let cues = parse_timed_text(&xml)?;
            info!("Loaded {} cues from {}", cues.len(), io.input);
            let text = paragraph_from_cues(cues, &config).await;
            emit(&io, &text)?;
        }
        Command::Reverse(io) => {
            config.validate()?;
            let text = load_source(&io.input).await?;
            if text.trim().is_empty() {
                anyhow::bail!("No paragraph text in {}", io.input);
            }
            let json = paragraph_to_json(&text, &config)?;
            emit(&io, &json)?;
        }
    }

    Ok(())
}

fn emit(io: &Io, text: &str) -> anyhow::Result<()> {
    match &io.out {
        Some(path) => {
            std::fs::write(path, text)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// File stem of a local input, or a fixed name for URLs and stdin.
fn base_name(input: &str) -> String {
    if is_url(input) || input == "-" {
        return "captions".to_string();
    }
    Path::new(input)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| PathBuf::from(input).display().to_string())
}
