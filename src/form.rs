//! In-memory state of the "add image" form.

use std::fmt;
use std::sync::Arc;

use crate::object_store::{UploadError, Uploader};
use crate::validation::{DraftRecord, ImageFile};

/// Collects a draft plus the URL the image was uploaded to.
///
/// The form starts open; a successful registration resets and closes it.
#[derive(Clone)]
pub struct ImageForm {
    draft: DraftRecord,
    image_url: Option<String>,
    open: bool,
    on_reset: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl fmt::Debug for ImageForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageForm")
            .field("draft", &self.draft)
            .field("image_url", &self.image_url)
            .field("open", &self.open)
            .field("on_reset", &self.on_reset.is_some())
            .finish()
    }
}

impl Default for ImageForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageForm {
    pub fn new() -> Self {
        Self {
            draft: DraftRecord::default(),
            image_url: None,
            open: true,
            on_reset: None,
        }
    }

    /// Run `hook` after every `reset`, e.g. to clear a rendered preview.
    pub fn on_reset(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_reset = Some(Arc::new(hook));
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Select a file without uploading it. Any previous upload URL is dropped.
    pub fn set_image(&mut self, image: ImageFile) {
        self.draft.image = Some(image);
        self.image_url = None;
    }

    /// Select a file and upload it right away. The URL is kept only on success.
    pub async fn attach_image(
        &mut self,
        image: ImageFile,
        uploader: &dyn Uploader,
    ) -> Result<&str, UploadError> {
        // Bytes clones share the buffer
        self.set_image(image.clone());

        let url = uploader.upload(&image).await?;
        tracing::info!(image_url = %url, "Image uploaded");
        Ok(self.image_url.insert(url).as_str())
    }

    /// Record a URL obtained out of band (e.g. an image already hosted).
    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.image_url = Some(url.into());
    }

    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Clear every input. The open/closed state is left alone.
    pub fn reset(&mut self) {
        self.draft = DraftRecord::default();
        self.image_url = None;
        if let Some(hook) = &self.on_reset {
            hook();
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}
