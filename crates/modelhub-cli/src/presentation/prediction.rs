//! Prediction rendering.

use std::fmt::Write as _;

use modelhub_core::Prediction;

/// Human-readable prediction result.
pub fn render_prediction(prediction: &Prediction) -> String {
    match prediction {
        Prediction::Classification { predicted_class } => {
            format!("Predicted class: {predicted_class}")
        }
        Prediction::Transcription { text } => format!("Transcription: {text}"),
        Prediction::Detection { objects } if objects.is_empty() => {
            "No objects detected.".to_string()
        }
        Prediction::Detection { objects } => {
            let mut out = format!("Detected {} objects:", objects.len());
            for object in objects {
                let b = object.bounding_box;
                let _ = write!(
                    out,
                    "\n  {:<16} {:>5.1}%  at ({:.0}, {:.0}) size {:.0}x{:.0}",
                    object.label,
                    object.score * 100.0,
                    b.x,
                    b.y,
                    b.width,
                    b.height
                );
            }
            out
        }
        Prediction::Raw { body } => {
            serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
        }
    }
}
