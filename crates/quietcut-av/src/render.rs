//! ffmpeg invocations that render each clip kind to its own file.
//!
//! Every clip renders into `<folder>/<clip.output_file_name()>` as a
//! Matroska file with one video and one audio stream, so the results can be
//! joined with the concat demuxer. Building a command has no side effects.

use std::path::{Path, PathBuf};

use quietcut_common::{Clip, ImageClip, Source, TextClip, VideoClip};

use crate::seek::resolve_seek;
use crate::{Result, ToolCommand};

/// Output format shared by generated (image and text) clips.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub pixel_format: String,
    /// Background of text clips, any ffmpeg color name or `0xRRGGBB`.
    pub background_color: String,
    pub font_color: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            frame_rate: 30,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            pixel_format: "yuv420p".to_string(),
            background_color: "white".to_string(),
            font_color: "black".to_string(),
        }
    }
}

/// Builds render commands for clips of one source.
#[derive(Debug, Clone)]
pub struct ClipRenderer {
    ffmpeg: PathBuf,
    settings: RenderSettings,
}

impl ClipRenderer {
    pub fn new(ffmpeg: impl Into<PathBuf>, settings: RenderSettings) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            settings,
        }
    }

    /// Build the command rendering `clip` into `folder`.
    ///
    /// # Errors
    ///
    /// Fails if a clip timestamp is malformed, or if a video clip starts
    /// before the first keyframe of `source`.
    pub fn command(&self, clip: &Clip, source: &Source, folder: &Path) -> Result<ToolCommand> {
        let output = folder.join(clip.output_file_name());
        match clip {
            Clip::Video(c) => self.video_command(c, source, &output),
            Clip::Image(c) => Ok(self.image_command(c, source, &output)),
            Clip::Text(c) => Ok(self.text_command(c, source, &output)),
        }
    }

    /// Cut a segment of the source, copying its audio stream.
    ///
    /// Speed only shortens the cut; the video is not retimed.
    fn video_command(&self, clip: &VideoClip, source: &Source, output: &Path) -> Result<ToolCommand> {
        let start = quietcut_common::timestamp::timestamp_to_seconds(&clip.start)?;
        let seek = resolve_seek(&source.keyframes, start)?;
        let length = clip.duration()? / clip.speed;

        let mut cmd = ToolCommand::new(&self.ffmpeg);
        cmd.args(["-y", "-hide_banner", "-ss"])
            .arg(format!("{:.4}", seek.coarse))
            .arg("-i")
            .arg(&source.path)
            .arg("-ss")
            .arg(format!("{:.4}", seek.fine))
            .arg("-t")
            .arg(format!("{length:.4}"))
            .args(["-codec:a", "copy"])
            .arg(output);
        Ok(cmd)
    }

    /// Loop a still image over silent audio.
    fn image_command(&self, clip: &ImageClip, source: &Source, output: &Path) -> ToolCommand {
        let s = &self.settings;

        let mut cmd = ToolCommand::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-loop", "1", "-i"])
            .arg(&clip.input_file)
            .args(["-f", "lavfi", "-i", "aevalsrc=0", "-shortest"])
            .arg("-r")
            .arg(s.frame_rate.to_string())
            .arg("-ar")
            .arg(source.audio_rate.to_string())
            .arg("-t")
            .arg(clip.duration.to_string())
            .arg("-pix_fmt")
            .arg(&s.pixel_format)
            .arg("-vf")
            .arg(format!("scale={}:{}", s.width, s.height))
            .arg("-c:v")
            .arg(&s.video_codec)
            .arg("-c:a")
            .arg(&s.audio_codec)
            .arg("-y")
            .arg(output);
        cmd
    }

    /// Draw centred text on a solid background over silent audio.
    fn text_command(&self, clip: &TextClip, source: &Source, output: &Path) -> ToolCommand {
        let s = &self.settings;
        let background = format!(
            "color=size={}x{}:duration={}:rate={}:color={}",
            s.width, s.height, clip.duration, s.frame_rate, s.background_color
        );
        let drawtext = format!(
            "drawtext=expansion=none:fontfile={}:fontsize={}:fontcolor={}:x=(w-text_w)/2:y=(h-text_h)/2:text={}",
            escape_filter_value(&clip.font_file.to_string_lossy()),
            clip.font_size,
            s.font_color,
            escape_filter_value(&clip.text),
        );

        let mut cmd = ToolCommand::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-f", "lavfi", "-i"])
            .arg(background)
            .args(["-f", "lavfi", "-i", "aevalsrc=0", "-shortest"])
            .arg("-r")
            .arg(s.frame_rate.to_string())
            .arg("-ar")
            .arg(source.audio_rate.to_string())
            .arg("-pix_fmt")
            .arg(&s.pixel_format)
            .arg("-c:v")
            .arg(&s.video_codec)
            .arg("-c:a")
            .arg(&s.audio_codec)
            .arg("-vf")
            .arg(drawtext)
            .arg("-y")
            .arg(output);
        cmd
    }
}

/// Escape a value for use as a filter option inside a filtergraph.
///
/// Two levels apply: the filter option parser treats `\`, `'` and `:`
/// specially, and the filtergraph parser additionally `[`, `]`, `,` and `;`.
fn escape_filter_value(value: &str) -> String {
    escape_chars(&escape_chars(value, &['\\', '\'', ':']), &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use quietcut_common::clip::{DEFAULT_FONT_FILE, DEFAULT_FONT_SIZE};
    use quietcut_common::{ClipId, SourceId};

    fn source() -> Source {
        Source {
            id: SourceId::from(1),
            path: PathBuf::from("/videos/my talk.mp4"),
            window_start: None,
            window_end: None,
            duration: 20.0,
            audio_rate: 48000,
            keyframes: vec![0.0, 5.0, 10.0, 15.0],
            created_at: Default::default(),
        }
    }

    fn renderer() -> ClipRenderer {
        ClipRenderer::new("ffmpeg", RenderSettings::default())
    }

    #[test]
    fn video_clip_seeks_via_preceding_keyframe() {
        let clip = Clip::Video(VideoClip {
            id: ClipId::from(7),
            source_id: SourceId::from(1),
            start: "00:00:12.000000".to_string(),
            end: "00:00:14.500000".to_string(),
            speed: 1.0,
        });

        let cmd = renderer()
            .command(&clip, &source(), Path::new("/out/clips"))
            .unwrap();

        assert_eq!(cmd.program(), Path::new("ffmpeg"));
        assert_eq!(
            cmd.arg_strings(),
            vec![
                "-y",
                "-hide_banner",
                "-ss",
                "9.0000",
                "-i",
                "/videos/my talk.mp4",
                "-ss",
                "3.0000",
                "-t",
                "2.5000",
                "-codec:a",
                "copy",
                "/out/clips/videoclip_0007.mkv",
            ]
        );
    }

    #[test]
    fn video_clip_speed_shortens_cut() {
        let clip = Clip::Video(VideoClip {
            id: ClipId::from(1),
            source_id: SourceId::from(1),
            start: "00:00:06.000000".to_string(),
            end: "00:00:10.000000".to_string(),
            speed: 2.0,
        });

        let args = renderer()
            .command(&clip, &source(), Path::new("out"))
            .unwrap()
            .arg_strings();
        assert!(args.windows(2).any(|w| w == ["-t", "2.0000"]));
    }

    #[test]
    fn video_clip_before_first_keyframe_fails() {
        let mut source = source();
        source.keyframes = vec![1.0, 5.0];
        let clip = Clip::Video(VideoClip {
            id: ClipId::from(1),
            source_id: SourceId::from(1),
            start: "00:00:00.500000".to_string(),
            end: "00:00:02.000000".to_string(),
            speed: 1.0,
        });

        assert_matches!(
            renderer().command(&clip, &source, Path::new("out")),
            Err(crate::Error::OutOfRange { .. })
        );
    }

    #[test]
    fn image_clip_loops_still_over_silence() {
        let clip = Clip::Image(ImageClip {
            id: ClipId::from(1),
            source_id: SourceId::from(1),
            timestamp: "0:00:00".to_string(),
            duration: 3.0,
            input_file: PathBuf::from("thumbnail.png"),
        });

        let cmd = renderer()
            .command(&clip, &source(), Path::new("out"))
            .unwrap();
        assert_eq!(
            cmd.to_string(),
            "ffmpeg -hide_banner -loop 1 -i thumbnail.png -f lavfi -i aevalsrc=0 -shortest \
             -r 30 -ar 48000 -t 3 -pix_fmt yuv420p -vf scale=1920:1080 -c:v libx264 -c:a aac \
             -y out/imageclip_0001.mkv"
        );
    }

    #[test]
    fn text_clip_draws_escaped_text() {
        let clip = Clip::Text(TextClip {
            id: ClipId::from(2),
            source_id: SourceId::from(1),
            timestamp: "0:05:00".to_string(),
            text: "Q&A: what's next, then?".to_string(),
            duration: 2.0,
            font_file: PathBuf::from(DEFAULT_FONT_FILE),
            font_size: DEFAULT_FONT_SIZE,
        });

        let args = renderer()
            .command(&clip, &source(), Path::new("out"))
            .unwrap()
            .arg_strings();

        assert!(args.contains(&"color=size=1920x1080:duration=2:rate=30:color=white".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("out/textclip_0002.mkv"));

        let vf = args
            .windows(2)
            .find(|w| w[0] == "-vf")
            .map(|w| w[1].clone())
            .unwrap();
        assert_eq!(
            vf,
            r"drawtext=expansion=none:fontfile=/usr/share/fonts/TTF/FiraMono-Medium.ttf:fontsize=60:fontcolor=black:x=(w-text_w)/2:y=(h-text_h)/2:text=Q&A\\: what\\\'s next\, then?"
        );
    }

    #[test]
    fn custom_settings_are_applied() {
        let settings = RenderSettings {
            width: 1280,
            height: 720,
            frame_rate: 25,
            background_color: "0x202020".to_string(),
            ..RenderSettings::default()
        };
        let clip = Clip::Text(TextClip {
            id: ClipId::from(1),
            source_id: SourceId::from(1),
            timestamp: "0:00:00".to_string(),
            text: "Intro".to_string(),
            duration: 2.0,
            font_file: PathBuf::from("font.ttf"),
            font_size: 48,
        });

        let args = ClipRenderer::new("/opt/ffmpeg", settings)
            .command(&clip, &source(), Path::new("out"))
            .unwrap()
            .arg_strings();
        assert!(args.contains(&"color=size=1280x720:duration=2:rate=25:color=0x202020".to_string()));
        assert!(args.windows(2).any(|w| w == ["-r", "25"]));
    }

    #[test]
    fn escape_matches_filtergraph_rules() {
        assert_eq!(escape_filter_value("plain"), "plain");
        assert_eq!(
            escape_filter_value("this is a 'string': may contain one, or more, special characters"),
            r"this is a \\\'string\\\'\\: may contain one\, or more\, special characters"
        );
        assert_eq!(escape_filter_value(r"C:\fonts"), r"C\\:\\\\fonts");
    }
}
