//! Contracts for the external collaborators of the editor.
//!
//! PDF export and AI guidance are fire-and-forget from the editor's point
//! of view: it hands over a rendered snapshot (plus context), never blocks
//! on completion, and treats the results as opaque. Failures stay inside
//! the implementing service; the scene and history remain valid either way.

use crate::measurements::Measurements;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by collaborator implementations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("export failed: {0}")]
    Export(String),
    #[error("guidance failed: {0}")]
    Guidance(String),
    #[error("malformed guidance payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Account tier controlling export watermarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportRole {
    Free,
    Premium,
}

/// An encoded raster capture of the current canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSnapshot {
    /// PNG-encoded pixels.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Everything a PDF exporter needs for one document.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub project_name: String,
    /// Pattern-type label printed in the header.
    pub pattern_type: String,
    pub snapshot: RasterSnapshot,
    pub role: ExportRole,
    /// Optional instruction steps for an extra page.
    pub instructions: Vec<String>,
}

impl ExportRequest {
    /// Free-tier exports carry a watermark.
    pub fn watermarked(&self) -> bool {
        self.role == ExportRole::Free
    }
}

/// Produces a PDF document from an export request.
///
/// Returns the finished document as opaque bytes.
pub trait PdfExporter {
    fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, ServiceError>;
}

/// Request payload for the AI pattern-guidance service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceRequest {
    /// Base64-encoded reference image.
    pub image: String,
    pub measurements: Measurements,
    /// Free-form garment type ("blouse", "a-line skirt", ...).
    pub garment_type: String,
}

impl GuidanceRequest {
    /// Build a request from raw image bytes.
    pub fn new(image: &[u8], measurements: Measurements, garment_type: impl Into<String>) -> Self {
        Self {
            image: BASE64.encode(image),
            measurements,
            garment_type: garment_type.into(),
        }
    }
}

/// One drafted piece in a guidance response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternPiece {
    pub name: String,
    pub description: String,
    pub dimensions: String,
}

/// Structured guidance returned by the AI service.
///
/// Display data only: never fed back into the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternGuidance {
    pub pattern_pieces: Vec<PatternPiece>,
    pub instructions: Vec<String>,
    pub fabric_suggestions: String,
    pub estimated_yardage: String,
}

impl PatternGuidance {
    /// Parse a guidance response from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Generates drafting guidance from a reference image and measurements.
pub trait GuidanceService {
    fn generate(&self, request: &GuidanceRequest) -> Result<PatternGuidance, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watermark_follows_role() {
        let snapshot = RasterSnapshot {
            png: vec![0x89, 0x50, 0x4e, 0x47],
            width: 800,
            height: 600,
        };
        let mut request = ExportRequest {
            project_name: "Draft".to_string(),
            pattern_type: "CAD".to_string(),
            snapshot,
            role: ExportRole::Free,
            instructions: Vec::new(),
        };
        assert!(request.watermarked());
        request.role = ExportRole::Premium;
        assert!(!request.watermarked());
    }

    #[test]
    fn test_guidance_request_encodes_image() {
        let request = GuidanceRequest::new(b"raw-bytes", Measurements::default(), "blouse");
        assert_eq!(request.image, BASE64.encode(b"raw-bytes"));
        assert_eq!(request.garment_type, "blouse");
    }

    #[test]
    fn test_guidance_parses_wire_json() {
        let json = r#"{
            "patternPieces": [
                {"name": "Front Bodice", "description": "Main front piece", "dimensions": "18in x 22in"}
            ],
            "instructions": ["Cut two on fold", "Sew darts first"],
            "fabricSuggestions": "Medium-weight linen",
            "estimatedYardage": "2.5 yards"
        }"#;

        let guidance = PatternGuidance::from_json(json).unwrap();
        assert_eq!(guidance.pattern_pieces.len(), 1);
        assert_eq!(guidance.pattern_pieces[0].name, "Front Bodice");
        assert_eq!(guidance.instructions.len(), 2);
        assert_eq!(guidance.estimated_yardage, "2.5 yards");

        // Round-trips through the same wire form.
        let back = serde_json::to_string(&guidance).unwrap();
        assert_eq!(PatternGuidance::from_json(&back).unwrap(), guidance);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let result = PatternGuidance::from_json("{\"patternPieces\": 3}");
        assert!(matches!(result, Err(ServiceError::Payload(_))));
    }
}
