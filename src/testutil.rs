//! Shared fakes for the sequencer unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{ApiError, CreateRecordResponse, RecordPage, RecordsApi, StoredRecord};
use crate::cache::QueryCache;
use crate::form::ImageForm;
use crate::notify::{Notification, Notifier, Severity};
use crate::validation::ImageFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCall {
    Invalidate(String),
    Refetch(String),
}

/// One observable side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Notified(Severity),
    FormReset,
    Cache(CacheCall),
}

pub type StepLog = Arc<Mutex<Vec<Step>>>;

/// A valid, filled-in form with no upload URL yet.
pub fn sample_form() -> ImageForm {
    let mut form = ImageForm::new();
    form.set_title("Cat");
    form.set_description("A cat on a mat");
    form.set_image(ImageFile::new("cat.png", vec![0x89, b'P', b'N', b'G']));
    form
}

/// `sample_form` that records its resets on `log`.
pub fn logged_form(log: &StepLog) -> ImageForm {
    let log = Arc::clone(log);
    sample_form().on_reset(move || log.lock().unwrap().push(Step::FormReset))
}

/// Answers every create call with a canned reply.
pub struct FakeRecordsApi {
    reply: Result<CreateRecordResponse, ApiError>,
    calls: AtomicUsize,
    last: Mutex<Option<StoredRecord>>,
}

impl FakeRecordsApi {
    pub fn new(reply: Result<CreateRecordResponse, ApiError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn create_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_record(&self) -> Option<StoredRecord> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordsApi for FakeRecordsApi {
    async fn create_record(&self, record: &StoredRecord) -> Result<CreateRecordResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(record.clone());
        self.reply.clone()
    }

    async fn list_records(&self, _after: Option<&str>) -> Result<RecordPage, ApiError> {
        Ok(RecordPage::default())
    }
}

pub struct FakeCache {
    log: StepLog,
    fail_refetch: AtomicBool,
}

impl FakeCache {
    pub fn new(log: StepLog) -> Self {
        Self {
            log,
            fail_refetch: AtomicBool::new(false),
        }
    }

    pub fn fail_refetch(&self) {
        self.fail_refetch.store(true, Ordering::SeqCst);
    }

    /// Every step recorded on the shared log, notifications included.
    pub fn log(&self) -> Vec<Step> {
        self.log.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<CacheCall> {
        self.log()
            .into_iter()
            .filter_map(|step| match step {
                Step::Cache(call) => Some(call),
                Step::Notified(_) | Step::FormReset => None,
            })
            .collect()
    }
}

#[async_trait]
impl QueryCache for FakeCache {
    async fn invalidate(&self, key: &str) {
        self.log
            .lock()
            .unwrap()
            .push(Step::Cache(CacheCall::Invalidate(key.to_string())));
    }

    async fn refetch(&self, key: &str) -> Result<(), ApiError> {
        self.log
            .lock()
            .unwrap()
            .push(Step::Cache(CacheCall::Refetch(key.to_string())));
        if self.fail_refetch.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("refetch failed".to_string()));
        }
        Ok(())
    }
}

pub struct RecordingNotifier {
    log: StepLog,
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new(log: StepLog) -> Self {
        Self {
            log,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.log
            .lock()
            .unwrap()
            .push(Step::Notified(notification.severity));
        self.seen.lock().unwrap().push(notification);
    }
}
