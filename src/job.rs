use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};

use crate::clients::{SetlistFmClient, errors::Result};
use crate::exporter::{ExportOptions, Exporter, MissingFieldPolicy};
use crate::fetcher::{DEFAULT_PAGE_DELAY, Fetcher, PageSource};

// Configuration for the ExportJob struct
pub struct Config<S> {
    pub source: S,
    pub username: String,
    pub delay: Duration,
    pub export: ExportOptions,
}

pub struct ConfigBuilder<S> {
    source: Option<S>,
    username: String,
    delay: Option<Duration>,
    output: Option<PathBuf>,
    missing_fields: MissingFieldPolicy,
}

impl<S> ConfigBuilder<S> {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            source: None,
            username: username.into(),
            delay: None, // Pause between page requests, 2 seconds unless set
            output: None,
            missing_fields: MissingFieldPolicy::default(),
        }
    }

    #[must_use]
    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_fields = policy;
        self
    }

    fn finish(self, source: S) -> Config<S> {
        Config {
            source,
            username: self.username,
            delay: self.delay.unwrap_or(DEFAULT_PAGE_DELAY),
            export: ExportOptions {
                output: self.output,
                missing_fields: self.missing_fields,
            },
        }
    }
}

impl ConfigBuilder<SetlistFmClient> {
    pub fn build(mut self) -> Result<Config<SetlistFmClient>> {
        let source = match self.source.take() {
            Some(s) => s,
            None => SetlistFmClient::try_default()?,
        };
        Ok(self.finish(source))
    }
}

impl<S: PageSource> ConfigBuilder<S> {
    /// Builds with an already provided source, e.g. a fake one in tests.
    pub fn build_with_source(mut self) -> Option<Config<S>> {
        let source = self.source.take()?;
        Some(self.finish(source))
    }
}

/// Outcome of a run: nothing to export, or the written file.
#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    NoConcerts,
    Written(PathBuf),
}

// Fetches every attended concert and writes them to a spreadsheet
pub struct ExportJob<S> {
    config: Config<S>,
}

impl<S: PageSource> ExportJob<S> {
    pub fn new(config: Config<S>) -> Self {
        ExportJob { config }
    }

    pub async fn run(self) -> Result<ExportOutcome> {
        let Config {
            source,
            username,
            delay,
            export,
        } = self.config;

        info!("Fetching attended concerts for {username} ...");
        let setlists = Fetcher::new(source, delay).fetch_all(&username).await;

        if setlists.is_empty() {
            info!("No concerts found.");
            return Ok(ExportOutcome::NoConcerts);
        }

        debug!("Exporting {} setlists ...", setlists.len());
        match Exporter::new(export).export(&username, &setlists)? {
            Some(path) => Ok(ExportOutcome::Written(path)),
            None => Ok(ExportOutcome::NoConcerts),
        }
    }
}
