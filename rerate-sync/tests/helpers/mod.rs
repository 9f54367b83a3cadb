//! Shared test helpers for rerate-sync integration tests

#![allow(dead_code)]

pub mod log_capture;

use async_trait::async_trait;
use rerate_sync::ratings::{MovieRating, RawRating};
use rerate_sync::site::{RatingsSite, SiteError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Build a validated rating
pub fn rating(title: &str, year: &str, value: &str) -> MovieRating {
    RawRating {
        title: title.to_string(),
        rating: value.to_string(),
        year: year.to_string(),
        rated_at: "2021-03-14".to_string(),
        date_format: "%Y-%m-%d".to_string(),
    }
    .validate()
    .unwrap()
}

/// Write a CSV fixture into `dir`
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// One search result row of [`FakeSite`]
#[derive(Debug, Clone)]
pub struct FakeRow {
    pub caption: String,
    /// Caption lookup fails for this row
    pub unreadable: bool,
}

impl FakeRow {
    pub fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            unreadable: false,
        }
    }

    pub fn unreadable(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            unreadable: true,
        }
    }
}

/// Submitted `(caption, rating)` pairs
pub type Submissions = Arc<Mutex<Vec<(String, u8)>>>;

/// In-memory ratings site
#[derive(Default)]
pub struct FakeSite {
    results: HashMap<String, Vec<FakeRow>>,
    failing: HashSet<String>,
    slow: HashSet<String>,
    delay: Duration,
    failing_submits: HashSet<String>,
    slow_submits: HashSet<String>,
    submit_delay: Duration,
    submissions: Submissions,
    searches: Arc<Mutex<Vec<String>>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned when searching for `title`
    pub fn with_results(mut self, title: &str, rows: Vec<FakeRow>) -> Self {
        self.results.insert(title.to_string(), rows);
        self
    }

    /// Searching for `title` fails with a network error
    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    /// Searching for `title` sleeps for `delay` first
    pub fn slow_on(mut self, title: &str, delay: Duration) -> Self {
        self.slow.insert(title.to_string());
        self.delay = delay;
        self
    }

    /// Submitting the row captioned `caption` fails with an HTTP error
    pub fn failing_submit_on(mut self, caption: &str) -> Self {
        self.failing_submits.insert(caption.to_string());
        self
    }

    /// Submitting the row captioned `caption` sleeps for `delay` first
    pub fn slow_submit_on(mut self, caption: &str, delay: Duration) -> Self {
        self.slow_submits.insert(caption.to_string());
        self.submit_delay = delay;
        self
    }

    pub fn submissions(&self) -> Submissions {
        Arc::clone(&self.submissions)
    }

    pub fn searches(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.searches)
    }
}

#[async_trait]
impl RatingsSite for FakeSite {
    type Row = FakeRow;

    fn name(&self) -> &'static str {
        "Fake"
    }

    async fn search(&self, title: &str) -> Result<Vec<FakeRow>, SiteError> {
        self.searches.lock().unwrap().push(title.to_string());

        if self.slow.contains(title) {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.contains(title) {
            return Err(SiteError::NetworkError("connection reset".to_string()));
        }

        Ok(self.results.get(title).cloned().unwrap_or_default())
    }

    fn row_caption(&self, row: &FakeRow) -> Result<String, SiteError> {
        if row.unreadable {
            return Err(SiteError::ParseError("caption element missing".to_string()));
        }
        Ok(row.caption.clone())
    }

    async fn submit_rating(&self, row: &FakeRow, rating: &MovieRating) -> Result<(), SiteError> {
        if self.slow_submits.contains(&row.caption) {
            tokio::time::sleep(self.submit_delay).await;
        }
        if self.failing_submits.contains(&row.caption) {
            return Err(SiteError::HttpStatus(500, format!("rating '{}' failed", row.caption)));
        }

        self.submissions
            .lock()
            .unwrap()
            .push((row.caption.clone(), rating.rating()));
        Ok(())
    }
}
