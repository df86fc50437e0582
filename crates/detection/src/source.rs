//! Detector adapter interface

use std::path::Path;

use tracing::info;

use crate::{Detection, DetectionError};

/// Per-lane supplier of detections, one call per frame.
///
/// Implementations wrap whatever produces frames and runs the detector.
/// Calls must return within a bounded time; they run on the control loop.
pub trait DetectionSource {
    /// Detections for the next frame.
    ///
    /// `Ok(None)` means the source has no more frames. `Err` means the
    /// detector failed for this frame only.
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, DetectionError>;

    /// Rewind to the first frame. Returns `false` if the source cannot rewind.
    fn rewind(&mut self) -> bool {
        false
    }
}

/// Replays a pre-recorded script of detections
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: Vec<Vec<Detection>>,
    position: usize,
}

impl ReplaySource {
    pub fn new(frames: Vec<Vec<Detection>>) -> Self {
        Self {
            frames,
            position: 0,
        }
    }

    /// Parse a script: a JSON array of frames, each an array of detections
    pub fn from_json(json: &str) -> Result<Self, DetectionError> {
        let frames: Vec<Vec<Detection>> = serde_json::from_str(json)?;
        Ok(Self::new(frames))
    }

    /// Load a script from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DetectionError> {
        let path = path.as_ref();
        let source = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!("Loaded {} scripted frames from {}", source.len(), path.display());
        Ok(source)
    }

    /// Number of frames in the script
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl DetectionSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, DetectionError> {
        let frame = self.frames.get(self.position).cloned();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }

    fn rewind(&mut self) -> bool {
        self.position = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundingBox;

    const SCRIPT: &str = r#"[
        [{"class_label": "car", "confidence": 0.9, "bbox": {"x": 10, "y": 20, "width": 30, "height": 40}}],
        []
    ]"#;

    #[test]
    fn test_replay_in_order_then_exhausted() {
        let mut source = ReplaySource::from_json(SCRIPT).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first, vec![Detection::new("car", 0.9, BoundingBox::new(10, 20, 30, 40))]);

        assert_eq!(source.next_frame().unwrap(), Some(vec![]));
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_rewind_restarts_script() {
        let mut source = ReplaySource::from_json(SCRIPT).unwrap();
        while source.next_frame().unwrap().is_some() {}

        assert!(source.rewind());
        assert_eq!(source.next_frame().unwrap().map(|f| f.len()), Some(1));
    }

    #[test]
    fn test_malformed_script() {
        let err = ReplaySource::from_json("[{").unwrap_err();
        assert!(matches!(err, DetectionError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ReplaySource::from_path("/nonexistent/script.json").unwrap_err();
        assert!(matches!(err, DetectionError::Io(_)));
    }
}
