//! The `create-clips` stage.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quietcut_av::{ClipRenderer, ClipWorkspace, RenderSettings, ToolCommand};
use quietcut_common::clip::timeline_order;
use quietcut_common::paths::output_root;
use quietcut_db::ClipRepository;

/// Switches of the render stage.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Render into a fresh directory under the system temp dir instead of
    /// next to the database.
    pub tmpdir: bool,
    /// Print commands without running them.
    pub dry_run: bool,
    /// Join the rendered clips into this file.
    pub concat: Option<PathBuf>,
}

/// What the render stage produced.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub root: PathBuf,
    pub manifest: PathBuf,
    /// Every command in execution order, the concat step last.
    pub commands: Vec<ToolCommand>,
}

/// Render every stored clip into `<root>/clips` and write the manifest.
///
/// The output root is `database` without its extension unless
/// `options.tmpdir` is set. Commands are printed to stdout as they run. With
/// `dry_run` the directory and manifest are still laid out but no tool is
/// invoked.
pub fn render_clips<R: ClipRepository>(
    repo: &R,
    database: &Path,
    ffmpeg: &Path,
    settings: RenderSettings,
    options: &RenderOptions,
) -> Result<RenderOutcome> {
    let workspace = if options.tmpdir {
        ClipWorkspace::temporary()
    } else {
        ClipWorkspace::at(output_root(database))
    }
    .context("Failed to prepare output directory")?;
    tracing::info!("Rendering into {:?}", workspace.root());

    let renderer = ClipRenderer::new(ffmpeg, settings);
    let clips_dir = workspace.clips_dir();

    let mut timeline = Vec::new();
    let mut commands = Vec::new();
    for source in repo.sources()? {
        let clips = timeline_order(repo.clips(source.id)?)?;
        for clip in &clips {
            let cmd = renderer
                .command(clip, &source, &clips_dir)
                .with_context(|| format!("Failed to build command for {}", clip.output_file_name()))?;
            commands.push(cmd);
        }
        timeline.extend(clips);
    }

    let manifest = workspace.write_manifest(&timeline)?;

    if let Some(output) = &options.concat {
        commands.push(workspace.concat_command(ffmpeg, output));
    }

    for (i, cmd) in commands.iter().enumerate() {
        println!("{}", cmd);
        if options.dry_run {
            continue;
        }
        tracing::debug!("Running command {} of {}", i + 1, commands.len());
        cmd.execute()
            .with_context(|| format!("Command failed: {}", cmd))?;
    }

    if options.dry_run {
        tracing::info!("[DRY RUN] Printed {} commands", commands.len());
    } else {
        tracing::info!("Rendered {} clips", timeline.len());
    }

    Ok(RenderOutcome {
        root: workspace.root().to_path_buf(),
        manifest,
        commands,
    })
}
