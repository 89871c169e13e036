//! Sidecar documents and the download-delivery boundary.

use std::path::PathBuf;

use vidprompt_common::config::ExportSettings;
use vidprompt_common::error::VidpromptResult;
use vidprompt_media_host::RecordedMedia;
use vidprompt_scene_model::{timecode::to_subtitle_timestamp, Scene};

/// Render the scene list as a numbered SRT document.
///
/// One block per scene in stored order, blocks separated by a blank line.
/// Purely textual: invalid time ranges are emitted as-is, not validated.
pub fn to_subtitle_document(scenes: &[Scene]) -> String {
    scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                index + 1,
                to_subtitle_timestamp(&scene.start_time),
                to_subtitle_timestamp(&scene.end_time),
                scene.narration
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the scene list as a 2-space-indented JSON array.
///
/// Internal ids are stripped; only `startTime`, `endTime`, and `narration`
/// appear on the wire.
pub fn to_structured_document(scenes: &[Scene]) -> VidpromptResult<String> {
    Ok(serde_json::to_string_pretty(scenes)?)
}

/// An in-memory file ready for delivery.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Build the subtitle sidecar artifact.
pub fn subtitle_artifact(scenes: &[Scene], settings: &ExportSettings) -> Artifact {
    Artifact {
        filename: settings.subtitle_filename.clone(),
        mime: "text/plain".to_string(),
        bytes: to_subtitle_document(scenes).into_bytes(),
    }
}

/// Build the structured sidecar artifact.
pub fn structured_artifact(
    scenes: &[Scene],
    settings: &ExportSettings,
) -> VidpromptResult<Artifact> {
    Ok(Artifact {
        filename: settings.structured_filename.clone(),
        mime: "application/json".to_string(),
        bytes: to_structured_document(scenes)?.into_bytes(),
    })
}

/// Build the video artifact from a finished recording.
pub fn video_artifact(media: &RecordedMedia, settings: &ExportSettings) -> Artifact {
    Artifact {
        filename: settings.video_filename.clone(),
        mime: media.mime.clone(),
        bytes: media.bytes.clone(),
    }
}

/// The "trigger a download with filename X" boundary.
pub trait DownloadSink: Send + Sync {
    fn deliver(&self, artifact: Artifact) -> VidpromptResult<()>;
}

/// Delivers artifacts as files in a directory.
pub struct FileDownloadSink {
    directory: PathBuf,
}

impl FileDownloadSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl DownloadSink for FileDownloadSink {
    fn deliver(&self, artifact: Artifact) -> VidpromptResult<()> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(&artifact.filename);
        std::fs::write(&path, &artifact.bytes)?;
        tracing::info!(
            path = %path.display(),
            bytes = artifact.bytes.len(),
            "Delivered artifact"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidprompt_scene_model::{SceneDraft, SceneList};

    fn sample_scenes() -> Vec<Scene> {
        SceneList::seeded([
            SceneDraft {
                start_time: "00:00:05".to_string(),
                end_time: "00:00:12".to_string(),
                narration: "The hike begins.".to_string(),
            },
            SceneDraft {
                start_time: "1:2".to_string(),
                end_time: "00:01:02.500".to_string(),
                narration: "Reaching the summit.".to_string(),
            },
        ])
        .snapshot()
    }

    #[test]
    fn subtitle_document_formats_numbered_blocks() {
        let srt = to_subtitle_document(&sample_scenes());
        assert_eq!(
            srt,
            "1\n00:00:05,000 --> 00:00:12,000\nThe hike begins.\n\n\
             2\n00:01:02,000 --> 00:01:02,500\nReaching the summit.\n"
        );
    }

    #[test]
    fn subtitle_document_keeps_invalid_ranges() {
        let scenes = SceneList::seeded([SceneDraft {
            start_time: "00:00:10".to_string(),
            end_time: "00:00:08".to_string(),
            narration: "Backwards.".to_string(),
        }])
        .snapshot();
        let srt = to_subtitle_document(&scenes);
        assert!(srt.contains("00:00:10,000 --> 00:00:08,000"));
    }

    #[test]
    fn structured_document_strips_ids() {
        let json = to_structured_document(&sample_scenes()).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"startTime\": \"00:00:05\""));
        assert!(json.contains("\"narration\": \"Reaching the summit.\""));
    }

    #[test]
    fn exporters_are_idempotent() {
        let scenes = sample_scenes();
        assert_eq!(to_subtitle_document(&scenes), to_subtitle_document(&scenes));
        assert_eq!(
            to_structured_document(&scenes).unwrap(),
            to_structured_document(&scenes).unwrap()
        );
    }

    #[test]
    fn file_sink_writes_artifact() {
        let dir = std::env::temp_dir().join("vidprompt_sink_test");
        let sink = FileDownloadSink::new(&dir);
        sink.deliver(Artifact {
            filename: "narration.srt".to_string(),
            mime: "text/plain".to_string(),
            bytes: b"1\n00:00:00,000 --> 00:00:01,000\nhi\n".to_vec(),
        })
        .unwrap();

        let written = std::fs::read(dir.join("narration.srt")).unwrap();
        assert!(written.starts_with(b"1\n"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
