mod cli;

use quietcut::{config, pipeline, toc};
use quietcut_av::RenderSettings;
use quietcut_common::paths::database_path;
use quietcut_db::{ClipRepository, SqliteRepository};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "quietcut=debug,quietcut_av=debug,quietcut_db=debug".to_string()
        } else {
            "quietcut=info,quietcut_av=warn,quietcut_db=warn".to_string()
        }
    });

    // stdout carries summaries, chapters and commands
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::CreateDatabase {
            input,
            threshold,
            duration,
            toc,
            thumbnail,
            toc_out,
            start,
            end,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if let Some(threshold) = threshold {
                config.detection.threshold_db = threshold;
            }
            if let Some(duration) = duration {
                config.detection.min_silence_duration = duration;
            }
            config::validate_config(&config)?;

            create_database(
                &config,
                input,
                toc.as_deref(),
                thumbnail,
                toc_out.as_deref(),
                (start, end),
            )
        }
        Commands::CreateToc { database, toc_out } => create_toc(&database, toc_out.as_deref()),
        Commands::CreateClips {
            database,
            tmpdir,
            dry_run,
            concat,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let options = pipeline::RenderOptions {
                tmpdir,
                dry_run,
                concat,
            };
            create_clips(&config, &database, &options)
        }
        Commands::CheckTools => check_tools(),
        Commands::Version => {
            println!("quietcut {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn create_database(
    config: &config::Config,
    input: PathBuf,
    toc_path: Option<&Path>,
    thumbnail: Option<PathBuf>,
    toc_out: Option<&Path>,
    (window_start, window_end): (Option<String>, Option<String>),
) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let toc = match toc_path {
        Some(path) => toc::read_toc(path)
            .with_context(|| format!("Failed to read table of contents {:?}", path))?,
        None => Vec::new(),
    };

    if let Some(ref thumbnail) = thumbnail {
        if !thumbnail.exists() {
            tracing::warn!("Thumbnail does not exist: {:?}", thumbnail);
        }
    }

    let tools = pipeline::Tools::resolve(&config.tools)?;
    let database = database_path(&input);
    let options = pipeline::BuildOptions {
        input,
        detection: (&config.detection).into(),
        window_start,
        window_end,
        toc,
        thumbnail,
        overlay: config.overlay.clone(),
    };

    let outcome = pipeline::build_database(&tools, &options, &database)?;

    let summary = outcome.summary;
    println!("audio_rate = {}", summary.audio_rate);
    println!("prev_duration = {:.3}", summary.previous_duration);
    println!("new_duration = {:.3}", summary.new_duration);
    println!("num_intervals = {}", summary.interval_count);

    let mut out = pipeline::open_output(toc_out)?;
    pipeline::toc::write_chapters(&mut *out, &outcome.chapters)?;

    tracing::info!(
        "Wrote {} clips to {:?}",
        outcome.clips.len(),
        outcome.database
    );

    Ok(())
}

fn create_toc(database: &Path, toc_out: Option<&Path>) -> Result<()> {
    let repo = SqliteRepository::open_existing(database)
        .with_context(|| format!("Failed to open database {:?}", database))?;

    let mut out = pipeline::open_output(toc_out)?;
    for source in repo.sources()? {
        let chapters = pipeline::chapters_from_store(&repo, source.id)?;
        pipeline::toc::write_chapters(&mut *out, &chapters)?;
    }

    Ok(())
}

fn create_clips(
    config: &config::Config,
    database: &Path,
    options: &pipeline::RenderOptions,
) -> Result<()> {
    let repo = SqliteRepository::open_existing(database)
        .with_context(|| format!("Failed to open database {:?}", database))?;

    let ffmpeg = pipeline::tool_path(
        "ffmpeg",
        config.tools.ffmpeg_path.as_deref(),
        !options.dry_run,
    )?;

    let outcome = pipeline::render_clips(
        &repo,
        database,
        &ffmpeg,
        RenderSettings::from(&config.render),
        options,
    )?;

    tracing::info!("Manifest written to {:?}", outcome.manifest);
    if let Some(ref output) = options.concat {
        if !options.dry_run {
            println!("Output: {}", output.display());
        }
    }

    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = quietcut_av::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to create databases and clips.");
    }

    Ok(())
}
