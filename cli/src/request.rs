//! Request loading utilities.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use personalens_analyze::{TimedFrame, TimelineItem};
use personalens_embed::Frame;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

/// Error type for request loading.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read file: {0}")]
    ReadFile(#[from] io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse file (tried YAML and JSON)")]
    ParseFailed,
    #[error("frame {index}: invalid base64: {source}")]
    FrameBase64 {
        index: usize,
        source: base64::DecodeError,
    },
    #[error("frame {index}: {width}x{height} is too large")]
    FrameTooLarge {
        index: usize,
        width: usize,
        height: usize,
    },
    #[error("frame {index}: expected {expected} RGB bytes, got {got}")]
    FrameSize {
        index: usize,
        expected: usize,
        got: usize,
    },
}

/// Loads a request from a YAML or JSON file into the provided type.
pub fn load_request<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, RequestError> {
    let data = fs::read(path.as_ref())?;
    parse_request(&data, path.as_ref())
}

/// Parses request data based on file extension or content.
pub fn parse_request<T: DeserializeOwned>(data: &[u8], path: impl AsRef<Path>) -> Result<T, RequestError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => parse_any(data, false),
    }
}

/// Loads a request from stdin.
pub fn load_request_from_stdin<T: DeserializeOwned>() -> Result<T, RequestError> {
    let mut data = Vec::new();
    io::stdin().read_to_end(&mut data)?;
    parse_any(&data, true)
}

/// Loads from `path` when given, otherwise from stdin.
pub fn read_request<T: DeserializeOwned>(path: Option<&str>) -> Result<T, RequestError> {
    match path {
        Some(p) => load_request(p),
        None => load_request_from_stdin(),
    }
}

fn parse_any<T: DeserializeOwned>(data: &[u8], json_first: bool) -> Result<T, RequestError> {
    if json_first {
        if let Ok(v) = serde_json::from_slice(data) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_yaml::from_slice(data) {
        return Ok(v);
    }
    if !json_first {
        if let Ok(v) = serde_json::from_slice(data) {
            return Ok(v);
        }
    }
    Err(RequestError::ParseFailed)
}

/// Input for `signals`, `drift` and `clusters`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextsRequest {
    #[serde(default)]
    pub texts: Vec<String>,
}

/// Input for `reasons`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReasonsRequest {
    #[serde(default)]
    pub texts: Vec<String>,
    /// Optional subset of `texts` to analyze.
    #[serde(default)]
    pub indices: Option<Vec<i64>>,
}

/// Input for `timeline`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineRequest {
    #[serde(default)]
    pub items: Vec<TimelineItem>,
    #[serde(default)]
    pub baseline_items: Option<usize>,
}

/// One decoded video frame as raw RGB24, base64 encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameEntry {
    /// Presentation time in seconds.
    pub time: f64,
    pub width: usize,
    pub height: usize,
    pub rgb: String,
}

/// Input for `video`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoRequest {
    #[serde(default)]
    pub frames: Vec<FrameEntry>,
}

impl VideoRequest {
    /// Decodes every frame, checking its size against `width * height * 3`.
    pub fn decode(&self) -> Result<Vec<TimedFrame>, RequestError> {
        self.frames
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let rgb = STANDARD
                    .decode(entry.rgb.trim())
                    .map_err(|source| RequestError::FrameBase64 { index, source })?;
                let expected = entry
                    .width
                    .checked_mul(entry.height)
                    .and_then(|px| px.checked_mul(3))
                    .ok_or(RequestError::FrameTooLarge {
                        index,
                        width: entry.width,
                        height: entry.height,
                    })?;
                if rgb.len() != expected {
                    return Err(RequestError::FrameSize {
                        index,
                        expected,
                        got: rgb.len(),
                    });
                }
                Ok(TimedFrame {
                    time: entry.time,
                    frame: Frame::new(entry.width, entry.height, rgb),
                })
            })
            .collect()
    }
}

/// Converts raw little-endian 16-bit PCM to samples in `[-1, 1)`.
/// A trailing odd byte is ignored.
pub fn decode_pcm16le(data: &[u8]) -> Vec<f32> {
    data.chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "texts:\n  - first answer\n  - second answer").unwrap();

        let req: TextsRequest = load_request(file.path()).unwrap();
        assert_eq!(req.texts, vec!["first answer", "second answer"]);
    }

    #[test]
    fn test_load_json() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(file, r#"{{"texts": ["a", "b", "c"], "indices": [2, 0]}}"#).unwrap();

        let req: ReasonsRequest = load_request(file.path()).unwrap();
        assert_eq!(req.texts.len(), 3);
        assert_eq!(req.indices, Some(vec![2, 0]));
    }

    #[test]
    fn test_parse_unknown_extension() {
        let data = b"items:\n  - date: 2024-01-02\n    text: hello\nbaseline_items: 2";
        let req: TimelineRequest = parse_request(data, "file.txt").unwrap();
        assert_eq!(req.items.len(), 1);
        assert_eq!(req.items[0].date, "2024-01-02");
        assert_eq!(req.baseline_items, Some(2));
    }

    #[test]
    fn test_parse_invalid() {
        let data = b"invalid data {{{{";
        let result: Result<TextsRequest, _> = parse_request(data, "file.txt");
        assert!(matches!(result, Err(RequestError::ParseFailed)));
    }

    #[test]
    fn decode_video_frames() {
        let rgb = STANDARD.encode([255u8, 0, 0, 0, 255, 0]);
        let req = VideoRequest {
            frames: vec![FrameEntry { time: 0.5, width: 2, height: 1, rgb }],
        };
        let frames = req.decode().unwrap();
        assert_eq!(frames[0].time, 0.5);
        assert_eq!(frames[0].frame.rgb, vec![255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn decode_rejects_wrong_size() {
        let req = VideoRequest {
            frames: vec![FrameEntry {
                time: 0.0,
                width: 2,
                height: 2,
                rgb: STANDARD.encode([0u8; 6]),
            }],
        };
        assert!(matches!(
            req.decode(),
            Err(RequestError::FrameSize { index: 0, expected: 12, got: 6 })
        ));
    }

    #[test]
    fn decode_rejects_overflowing_size() {
        let req = VideoRequest {
            frames: vec![FrameEntry {
                time: 0.0,
                width: usize::MAX,
                height: 2,
                rgb: STANDARD.encode([0u8; 3]),
            }],
        };
        assert!(matches!(
            req.decode(),
            Err(RequestError::FrameTooLarge { index: 0, height: 2, .. })
        ));
    }

    #[test]
    fn pcm_decoding() {
        let samples = decode_pcm16le(&[0x00, 0x80, 0xff, 0x7f, 0x00, 0x00, 0x01]);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], -1.0);
        assert!((samples[1] - 32767.0 / 32768.0).abs() < 1e-7);
        assert_eq!(samples[2], 0.0);
    }
}
