//! Output directory layout for rendered clips.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use quietcut_common::paths::{CLIPS_DIR, MANIFEST_FILE};
use quietcut_common::Clip;

use crate::{Result, ToolCommand};

/// Directory that receives rendered clips and their concat manifest.
///
/// The layout is `<root>/clips/<clip file>` plus `<root>/list.txt`. Nothing
/// is removed when the workspace is dropped; the files are the product.
///
/// # Example
///
/// ```no_run
/// use quietcut_av::ClipWorkspace;
///
/// let workspace = ClipWorkspace::at("/videos/talk")?;
/// println!("rendering into {}", workspace.clips_dir().display());
/// # Ok::<(), quietcut_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClipWorkspace {
    root: PathBuf,
}

impl ClipWorkspace {
    /// Use `root` as the workspace, creating it and its clips folder.
    pub fn at<P: AsRef<Path>>(root: P) -> Result<Self> {
        let workspace = Self {
            root: root.as_ref().to_path_buf(),
        };
        std::fs::create_dir_all(workspace.clips_dir())?;
        Ok(workspace)
    }

    /// Create a fresh workspace under the system temp directory.
    ///
    /// The directory outlives the process.
    pub fn temporary() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("quietcut-").tempdir()?;
        Self::at(dir.keep())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn clips_dir(&self) -> PathBuf {
        self.root.join(CLIPS_DIR)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Write the concat manifest listing `clips` in the given order.
    ///
    /// Entries are relative to the workspace root, e.g.
    /// `file 'clips/videoclip_0001.mkv'`.
    pub fn write_manifest(&self, clips: &[Clip]) -> Result<PathBuf> {
        let mut manifest = String::new();
        for clip in clips {
            // Writing into a String cannot fail.
            let _ = writeln!(manifest, "file '{}/{}'", CLIPS_DIR, clip.output_file_name());
        }

        let path = self.manifest_path();
        std::fs::write(&path, manifest)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Wrote manifest with {} entries to {:?}", clips.len(), path);

        Ok(path)
    }

    /// Build the ffmpeg invocation joining the manifest into `output`.
    pub fn concat_command(&self, ffmpeg: &Path, output: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(ffmpeg);
        cmd.args(["-y", "-hide_banner", "-f", "concat", "-safe", "0", "-i"])
            .arg(self.manifest_path())
            .args(["-c", "copy"])
            .arg(output);
        cmd
    }
}
