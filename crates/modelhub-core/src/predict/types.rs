//! Prediction inputs and outputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pipeline tags with a decoded response shape.
const IMAGE_CLASSIFICATION: &str = "image-classification";
const OBJECT_DETECTION: &str = "object-detection";
const SPEECH_RECOGNITION: &str = "automatic-speech-recognition";

/// Input for one prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictRequest {
    /// An image file, sent as the multipart part `image`
    Image {
        /// Original file name
        file_name: String,
        /// File contents
        bytes: Vec<u8>,
    },
    /// An audio file, sent as the multipart part `audio`
    Audio {
        /// Original file name
        file_name: String,
        /// File contents
        bytes: Vec<u8>,
    },
    /// Plain text, sent as JSON `{"text": ...}`
    Text {
        /// Input text
        text: String,
    },
}

impl PredictRequest {
    /// Name of the multipart part for file inputs.
    pub const fn part_name(&self) -> Option<&'static str> {
        match self {
            Self::Image { .. } => Some("image"),
            Self::Audio { .. } => Some("audio"),
            Self::Text { .. } => None,
        }
    }
}

/// Box around a detected object: `[x, y, width, height]` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// One object found by a detection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Class label
    pub label: String,
    /// Confidence in `[0, 1]`
    pub score: f64,
    /// Location
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
}

/// A decoded prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prediction {
    /// Image classification result
    Classification {
        /// Top class
        predicted_class: String,
    },
    /// Object detection result
    Detection {
        /// Detected objects
        objects: Vec<DetectedObject>,
    },
    /// Speech recognition result
    Transcription {
        /// Recognised text
        text: String,
    },
    /// Any other pipeline, or a body that did not match the expected shape
    Raw {
        /// Response body
        body: Value,
    },
}

#[derive(Deserialize)]
struct ClassificationBody {
    predicted_class: String,
}

#[derive(Deserialize)]
struct DetectionBody {
    predictions: Vec<DetectedObject>,
}

#[derive(Deserialize)]
struct TranscriptionBody {
    transcribed_text: String,
}

impl Prediction {
    /// Decode a predict response body for the given pipeline.
    ///
    /// Never fails: unknown pipelines and unexpected shapes come back as
    /// [`Prediction::Raw`].
    pub fn from_response(pipeline_tag: &str, body: Value) -> Self {
        let decoded = match pipeline_tag {
            IMAGE_CLASSIFICATION => serde_json::from_value::<ClassificationBody>(body.clone())
                .ok()
                .map(|b| Self::Classification {
                    predicted_class: b.predicted_class,
                }),
            OBJECT_DETECTION => serde_json::from_value::<DetectionBody>(body.clone())
                .ok()
                .map(|b| Self::Detection {
                    objects: b.predictions,
                }),
            SPEECH_RECOGNITION => serde_json::from_value::<TranscriptionBody>(body.clone())
                .ok()
                .map(|b| Self::Transcription {
                    text: b.transcribed_text,
                }),
            _ => None,
        };
        decoded.unwrap_or(Self::Raw { body })
    }
}
