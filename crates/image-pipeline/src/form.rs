//! Partner-onboarding upload form: sequences the pipeline stages and
//! produces the submitted field shape.
//!
//! Stage ordering is strict: the banner must be resized and crop-committed
//! before it enters the form, documents are encoded one by one, and all
//! clinic photos are encoded in a single all-or-nothing batch before the
//! payload is produced. A validation failure aborts with no partial payload.

use serde::Serialize;
use tracing::info;

use crate::crop::FinalAsset;
use crate::encode::{encode_batch, encode_file};
use crate::{PipelineError, Result};

/// The JSON field shape submitted to the backend. Every field is a data-URL
/// string (or an array of them).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingPayload {
    pub banner: Option<String>,
    pub pan_card: String,
    pub aadhar_card: String,
    pub clinic_photos: Vec<String>,
}

/// Accumulates one form instance's upload state. Each instance exclusively
/// owns its intermediate artifacts; nothing is shared across forms.
#[derive(Debug, Default)]
pub struct UploadForm {
    banner: Option<FinalAsset>,
    pan_card: Option<Vec<u8>>,
    aadhar_card: Option<Vec<u8>>,
    clinic_photos: Vec<(String, Vec<u8>)>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the committed banner crop. Optional field.
    pub fn set_banner(&mut self, asset: FinalAsset) {
        self.banner = Some(asset);
    }

    pub fn set_pan_card(&mut self, bytes: Vec<u8>) {
        self.pan_card = Some(bytes);
    }

    pub fn set_aadhar_card(&mut self, bytes: Vec<u8>) {
        self.aadhar_card = Some(bytes);
    }

    pub fn add_clinic_photo(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.clinic_photos.push((name.into(), bytes));
    }

    /// Encode every attachment and produce the submission payload.
    ///
    /// Documents are validated and encoded in order; clinic photos join as
    /// one atomic batch. The first failure aborts the whole submission.
    pub fn into_payload(self) -> Result<OnboardingPayload> {
        let pan_card = self.pan_card.ok_or(PipelineError::MissingField("panCard"))?;
        let aadhar_card = self
            .aadhar_card
            .ok_or(PipelineError::MissingField("aadharCard"))?;

        let pan_card = encode_file("panCard", &pan_card)?;
        let aadhar_card = encode_file("aadharCard", &aadhar_card)?;
        let clinic_photos = encode_batch(&self.clinic_photos)?;

        info!(
            has_banner = self.banner.is_some(),
            photos = clinic_photos.len(),
            "Onboarding payload assembled"
        );

        Ok(OnboardingPayload {
            banner: self.banner.map(|asset| asset.data_url),
            pan_card,
            aadhar_card,
            clinic_photos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TRANSPORT_LIMIT_BYTES;

    fn jpeg_bytes(total_len: usize) -> Vec<u8> {
        let mut v = vec![0u8; total_len];
        v[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
        v
    }

    fn filled_form() -> UploadForm {
        let mut form = UploadForm::new();
        form.set_pan_card(jpeg_bytes(128));
        form.set_aadhar_card(jpeg_bytes(128));
        form
    }

    #[test]
    fn payload_serializes_with_camel_case_fields() {
        let payload = filled_form().into_payload().unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("panCard").is_some());
        assert!(json.get("aadharCard").is_some());
        assert!(json.get("clinicPhotos").is_some());
        assert!(json.get("banner").unwrap().is_null());
    }

    #[test]
    fn missing_pan_card_aborts() {
        let mut form = UploadForm::new();
        form.set_aadhar_card(jpeg_bytes(128));
        let err = form.into_payload().unwrap_err();
        assert!(matches!(err, PipelineError::MissingField("panCard")));
    }

    #[test]
    fn oversized_photo_fails_whole_submission() {
        let mut form = filled_form();
        form.add_clinic_photo("front.jpg", jpeg_bytes(64));
        form.add_clinic_photo("ward.jpg", jpeg_bytes(TRANSPORT_LIMIT_BYTES as usize + 1));
        form.add_clinic_photo("reception.jpg", jpeg_bytes(64));
        let err = form.into_payload().unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { .. }));
    }

    #[test]
    fn photos_are_all_encoded_in_order() {
        let mut form = filled_form();
        form.add_clinic_photo("a.jpg", jpeg_bytes(16));
        form.add_clinic_photo("b.jpg", jpeg_bytes(32));
        let payload = form.into_payload().unwrap();
        assert_eq!(payload.clinic_photos.len(), 2);
        // Longer input encodes to a longer data URL; order preserved.
        assert!(payload.clinic_photos[0].len() < payload.clinic_photos[1].len());
    }
}
