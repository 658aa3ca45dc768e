//! Video metadata probing.
//!
//! The client asks a [`VideoProbe`] for the dimensions and duration of a video
//! before posting it. Probing is best effort: the client falls back to
//! [`VideoData::default`] whenever the probe fails.

use std::path::Path;

use log::debug;
use mockall::automock;
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;

/// Dimensions and duration of a video. All zero when probing is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoData {
    width: u32,
    height: u32,
    /// Duration in milliseconds.
    duration: u64,
}

impl VideoData {
    pub fn new(width: u32, height: u32, duration: u64) -> Self {
        VideoData {
            width,
            height,
            duration,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }
}

/// Errors raised while probing a video.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probing tool is not available.
    #[error("video probing is unavailable: {0}")]
    Unavailable(String),
    /// The probing tool ran but failed.
    #[error("video probing failed: {0}")]
    Failed(String),
    /// The probing tool output could not be parsed.
    #[error("unable to parse probe output: {0}")]
    Parse(#[from] serde_json::Error),
    /// The file holds no video stream.
    #[error("no video stream found")]
    NoVideoStream,
}

/// Extracts [`VideoData`] from a local video file.
#[allow(async_fn_in_trait)]
#[automock]
pub trait VideoProbe {
    async fn probe(&self, path: &Path) -> Result<VideoData, ProbeError>;
}

/// [`VideoProbe`] backed by the `ffprobe` executable.
#[derive(Debug, Clone)]
pub struct FfprobeVideoProbe {
    program: String,
}

#[derive(Deserialize, Debug)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Deserialize, Debug)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct FfprobeFormat {
    /// Seconds, as a decimal string.
    duration: Option<String>,
}

impl FfprobeVideoProbe {
    pub fn new() -> Self {
        FfprobeVideoProbe::with_program("ffprobe")
    }

    /// Uses another executable, e.g. an absolute path to `ffprobe`.
    pub fn with_program(program: &str) -> Self {
        FfprobeVideoProbe {
            program: program.to_owned(),
        }
    }

    fn parse_output(stdout: &[u8]) -> Result<VideoData, ProbeError> {
        let output: FfprobeOutput = serde_json::from_slice(stdout)?;

        let stream = output
            .streams
            .into_iter()
            .find(|s| s.width.is_some() && s.height.is_some())
            .ok_or(ProbeError::NoVideoStream)?;

        let duration = output
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.trim().parse::<f64>().ok())
            .map(|seconds| (seconds * 1000.0) as u64)
            .unwrap_or(0);

        Ok(VideoData::new(
            stream.width.unwrap_or(0),
            stream.height.unwrap_or(0),
            duration,
        ))
    }
}

impl Default for FfprobeVideoProbe {
    fn default() -> Self {
        FfprobeVideoProbe::new()
    }
}

impl VideoProbe for FfprobeVideoProbe {
    async fn probe(&self, path: &Path) -> Result<VideoData, ProbeError> {
        debug!("probe video {}", path.display());

        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height:format=duration",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| ProbeError::Unavailable(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(ProbeError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let video_data = FfprobeVideoProbe::parse_output(&output.stdout)?;
        debug!("probed video {} -> {:?}", path.display(), video_data);

        Ok(video_data)
    }
}

/// [`VideoProbe`] for deployments without any probing tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVideoProbe;

impl VideoProbe for NoVideoProbe {
    async fn probe(&self, _path: &Path) -> Result<VideoData, ProbeError> {
        Err(ProbeError::Unavailable("no video probe configured".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output() {
        let stdout = br#"{
            "programs": [],
            "streams": [{ "width": 1280, "height": 720 }],
            "format": { "duration": "12.345678" }
        }"#;

        let video_data = FfprobeVideoProbe::parse_output(stdout).unwrap();
        assert_eq!(video_data, VideoData::new(1280, 720, 12345));
    }

    #[test]
    fn test_parse_output_without_duration() {
        let stdout = br#"{ "streams": [{ "width": 640, "height": 480 }], "format": {} }"#;

        let video_data = FfprobeVideoProbe::parse_output(stdout).unwrap();
        assert_eq!(video_data, VideoData::new(640, 480, 0));
    }

    #[test]
    fn test_parse_output_without_video_stream() {
        let stdout = br#"{ "streams": [], "format": { "duration": "3.0" } }"#;

        assert!(matches!(
            FfprobeVideoProbe::parse_output(stdout),
            Err(ProbeError::NoVideoStream)
        ));
    }

    #[test]
    fn test_parse_output_garbage() {
        assert!(matches!(
            FfprobeVideoProbe::parse_output(b"not json"),
            Err(ProbeError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_executable_is_unavailable() {
        let probe = FfprobeVideoProbe::with_program("mxpost-no-such-ffprobe");
        let result = probe.probe(Path::new("clip.mp4")).await;

        assert!(matches!(result, Err(ProbeError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_no_video_probe() {
        let result = NoVideoProbe.probe(Path::new("clip.mp4")).await;

        assert!(matches!(result, Err(ProbeError::Unavailable(_))));
    }

    #[test]
    fn test_default_video_data_is_zero() {
        let video_data = VideoData::default();
        assert_eq!(
            (video_data.width(), video_data.height(), video_data.duration()),
            (0, 0, 0)
        );
    }
}
