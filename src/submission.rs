//! Validate, register, invalidate, notify: the submit path of the image form.

use std::sync::Arc;

use serde::Serialize;

use crate::api::{RecordsApi, StoredRecord};
use crate::cache::{QueryCache, RECORDS_KEY};
use crate::form::ImageForm;
use crate::notify::{Notification, Notifier};
use crate::validation::{validate, ValidationErrors, ValidationRules};

/// How a submission attempt ended. None of these are fatal; the user may retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Rules failed; nothing was sent.
    Invalid(ValidationErrors),
    /// No upload URL was available; nothing was sent.
    MissingUpload,
    /// The API answered `success: false`.
    Rejected,
    Registered,
    /// Transport or decoding failure, with the error text.
    Failed(String),
}

impl SubmitOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, SubmitOutcome::Registered)
    }
}

pub struct Submission {
    api: Arc<dyn RecordsApi>,
    cache: Arc<dyn QueryCache>,
    notifier: Arc<dyn Notifier>,
    rules: ValidationRules,
}

impl Submission {
    pub fn new(
        api: Arc<dyn RecordsApi>,
        cache: Arc<dyn QueryCache>,
        notifier: Arc<dyn Notifier>,
        rules: ValidationRules,
    ) -> Self {
        Self {
            api,
            cache,
            notifier,
            rules,
        }
    }

    pub async fn submit(&self, form: &mut ImageForm) -> SubmitOutcome {
        let draft = match validate(form.draft(), &self.rules) {
            Ok(draft) => draft,
            Err(errors) => {
                tracing::debug!(%errors, "Draft rejected by validation");
                return SubmitOutcome::Invalid(errors);
            }
        };

        let outcome = match form.image_url().filter(|url| !url.is_empty()) {
            None => {
                self.notifier.notify(Notification::error(
                    "Image not added",
                    "Add an image and wait for the upload to finish before registering.",
                ));
                SubmitOutcome::MissingUpload
            }
            Some(url) => {
                let record = StoredRecord {
                    title: draft.title().to_string(),
                    description: draft.description().to_string(),
                    url: url.to_string(),
                };
                self.register(record, form).await
            }
        };

        // Runs on every path past validation, whatever the outcome.
        if let Err(e) = self.cache.refetch(RECORDS_KEY).await {
            tracing::warn!(error = %e, "Failed to refetch records list");
        }

        outcome
    }

    async fn register(&self, record: StoredRecord, form: &mut ImageForm) -> SubmitOutcome {
        let response = match self.api.create_record(&record).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, record_url = %record.url, "Create record failed");
                self.notifier
                    .notify(Notification::error("Error", e.to_string()));
                return SubmitOutcome::Failed(e.to_string());
            }
        };

        if !response.success {
            tracing::info!(record_url = %record.url, "Create record rejected");
            self.notifier.notify(Notification::error(
                "Registration failed",
                "An error occurred while trying to register your image.",
            ));
            return SubmitOutcome::Rejected;
        }

        self.notifier.notify(Notification::success(
            "Image registered",
            "Your image was registered successfully.",
        ));
        form.reset();
        form.close();
        self.cache.invalidate(RECORDS_KEY).await;

        tracing::info!(title = %record.title, record_url = %record.url, "Registered image");
        SubmitOutcome::Registered
    }
}
