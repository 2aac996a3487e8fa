//! Contracts with the services around the engine.
//!
//! Image storage, order persistence and store settings live outside this
//! crate. Each is a trait here so the storefront can plug in its backend
//! and tests can plug in fakes.

use tracing::{debug, instrument};

use crate::customization::{DesignSet, PreviewHandle, PrintPosition};
use crate::order::{GuestOrderRequest, OrderReceipt, StoredOrder};
use crate::{Email, OrderId};

/// Errors reported across a collaborator boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The uploaded file is not an image.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    /// The storage backend rejected or failed the upload.
    #[error("upload failed: {0}")]
    Upload(String),
    /// The order backend rejected or failed the submission.
    #[error("order submission failed: {0}")]
    Submission(String),
    /// The service could not be reached.
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },
}

/// A raw image file picked by the buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Only `image/*` content types are accepted.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// Stores design images and returns a public reference.
pub trait ImageUploader {
    /// Upload the file and return its URL.
    async fn upload(&self, upload: ImageUpload) -> Result<String, CollaboratorError>;
}

/// Persists guest orders.
pub trait OrderSubmitter {
    async fn create_guest_order(
        &self,
        request: GuestOrderRequest,
    ) -> Result<OrderReceipt, CollaboratorError>;
}

/// Retrieves guest orders by id, email and lookup token.
pub trait OrderLookup {
    /// `Ok(None)` when no order matches all three.
    async fn find_guest_order(
        &self,
        order_id: OrderId,
        email: &Email,
        lookup_token: &str,
    ) -> Result<Option<StoredOrder>, CollaboratorError>;
}

/// Store-wide settings.
pub trait SettingsSource {
    /// Unit count at which an order counts as bulk.
    async fn bulk_order_threshold(&self) -> Result<u32, CollaboratorError>;
}

/// Upload a design image and attach it to `position`.
///
/// Non-image files are rejected before the uploader is called. The design
/// is only touched once the upload succeeds; on failure the preview (if
/// any) is released and the position keeps its previous content.
///
/// # Errors
///
/// Returns [`CollaboratorError::UnsupportedContentType`] for non-image files
/// and whatever the uploader reports otherwise.
#[instrument(skip(uploader, design, upload, preview), fields(file = %upload.file_name))]
pub async fn upload_design_image<U: ImageUploader>(
    uploader: &U,
    design: &mut DesignSet,
    position: PrintPosition,
    upload: ImageUpload,
    preview: Option<PreviewHandle>,
) -> Result<String, CollaboratorError> {
    if !upload.is_image() {
        return Err(CollaboratorError::UnsupportedContentType(upload.content_type));
    }

    let url = uploader.upload(upload).await?;
    design.set_image(position, url.clone(), preview);
    debug!(%position, %url, "attached uploaded design image");
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::customization::RecordingReleaser;

    struct FixedUploader(Result<String, CollaboratorError>);

    impl ImageUploader for FixedUploader {
        async fn upload(&self, _upload: ImageUpload) -> Result<String, CollaboratorError> {
            self.0.clone()
        }
    }

    fn png() -> ImageUpload {
        ImageUpload::new("logo.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_is_image() {
        assert!(png().is_image());
        assert!(ImageUpload::new("a.jpg", " Image/JPEG", Vec::new()).is_image());
        assert!(!ImageUpload::new("a.pdf", "application/pdf", Vec::new()).is_image());
        assert!(!ImageUpload::new("a", "", Vec::new()).is_image());
    }

    #[tokio::test]
    async fn test_upload_attaches_image() {
        let uploader = FixedUploader(Ok("https://cdn.test/logo.png".to_string()));
        let mut design = DesignSet::new();

        let url = upload_design_image(&uploader, &mut design, PrintPosition::Back, png(), None)
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.test/logo.png");
        let part = design.part(PrintPosition::Back);
        assert!(part.applied());
        assert_eq!(part.image_ref(), Some("https://cdn.test/logo.png"));
    }

    #[tokio::test]
    async fn test_rejects_non_image_without_uploading() {
        let uploader = FixedUploader(Err(CollaboratorError::Upload("should not run".into())));
        let mut design = DesignSet::new();
        let pdf = ImageUpload::new("doc.pdf", "application/pdf", Vec::new());

        let err = upload_design_image(&uploader, &mut design, PrintPosition::Front, pdf, None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CollaboratorError::UnsupportedContentType("application/pdf".to_string())
        );
        assert!(!design.part(PrintPosition::Front).applied());
    }

    #[tokio::test]
    async fn test_failed_upload_leaves_design_and_releases_preview() {
        let releaser = RecordingReleaser::new();
        let uploader = FixedUploader(Err(CollaboratorError::Upload("bucket full".into())));
        let mut design = DesignSet::new();
        design.set_text(PrintPosition::Front, "EUY!");

        let result = upload_design_image(
            &uploader,
            &mut design,
            PrintPosition::Front,
            png(),
            Some(releaser.handle("blob:pending")),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(design.part(PrintPosition::Front).image_ref(), None);
        assert_eq!(design.part(PrintPosition::Front).text(), "EUY!");
        assert_eq!(releaser.released(), vec!["blob:pending".to_string()]);
    }
}
