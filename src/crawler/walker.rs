//! Hierarchical walker - main discovery orchestration
//!
//! The documentation tree is sparse and has no sitemap, so it is discovered
//! by probing. The walk descends four enumeration levels strictly in
//! sequence:
//!
//! 1. **Course** - configured slugs (optionally probed)
//! 2. **Year** - a descending year range; missing years are skipped
//! 3. **Format** - the first candidate (`psets`, `projects`) that resolves
//! 4. **Index** - `0, 1, 2, …` until the first probe fails
//!
//! Each successful index page is fanned out: all of its sub-problem pages
//! are fetched concurrently (bounded by the fetcher's gate), cleaned, and
//! merged into the catalog once every task has finished. The catalog is
//! checkpointed after each (course, year).

use crate::config::{Config, SiteConfig};
use crate::crawler::cleaner::CommandCleaner;
use crate::crawler::extractor::CommandExtractor;
use crate::crawler::fetcher::{FetchError, FetchOutcome, Fetcher, HttpTransport, Transport};
use crate::crawler::parser::extract_sub_links;
use crate::storage::{Catalog, CatalogWriter, CommandSequence, JsonCatalogStore};
use crate::url::Endpoint;
use crate::ScoutError;
use futures::future::join_all;
use std::fmt;
use url::Url;

/// Enumeration levels of the walk, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Course,
    Year,
    Format,
    Index,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Course => "course",
            Self::Year => "year",
            Self::Format => "format",
            Self::Index => "index",
        };
        f.write_str(name)
    }
}

/// What a single probe says about its branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceResult {
    /// The branch exists; keep going
    Continue,
    /// The branch is missing or unreachable
    StopBranch,
}

impl AdvanceResult {
    /// `NotFound` and `Failed` both stop the branch; only the logs tell
    /// them apart
    pub fn from_outcome(outcome: &FetchOutcome) -> Self {
        if outcome.is_success() {
            Self::Continue
        } else {
            Self::StopBranch
        }
    }
}

/// What the walker does next at a level after a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Enter the probed branch
    Descend,
    /// Leave this branch alone and try its next sibling
    Skip,
    /// Stop enumerating this level altogether
    EndLevel,
}

/// Termination policy for each level
///
/// | Level | Continue | StopBranch |
/// |-------|----------|------------|
/// | Course | descend | skip course |
/// | Year | descend | skip year |
/// | Format | take format | try next candidate |
/// | Index | scrape, then next index | end index loop (no gap skipping) |
pub fn next_step(level: Level, result: AdvanceResult) -> Step {
    match (level, result) {
        (_, AdvanceResult::Continue) => Step::Descend,
        (Level::Index, AdvanceResult::StopBranch) => Step::EndLevel,
        (Level::Course | Level::Year | Level::Format, AdvanceResult::StopBranch) => Step::Skip,
    }
}

/// Counters describing one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub courses_walked: u64,
    pub years_found: u64,
    pub formats_found: u64,
    pub index_pages: u64,
    pub problem_pages: u64,
    pub problems_recorded: u64,
    pub problems_dropped: u64,
    pub probes: u64,
    pub not_found: u64,
    pub failed: u64,
    pub checkpoints: u64,
}

impl fmt::Display for WalkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} courses, {} years, {} index pages, {} problem pages \
             ({} recorded, {} without commands), {} requests \
             ({} not found, {} failed), {} checkpoints",
            self.courses_walked,
            self.years_found,
            self.index_pages,
            self.problem_pages,
            self.problems_recorded,
            self.problems_dropped,
            self.probes,
            self.not_found,
            self.failed,
            self.checkpoints
        )
    }
}

/// A fetched page along with the URL that was requested
struct Page {
    url: Url,
    body: String,
}

/// Result of one fan-out task
enum ProblemScrape {
    Found(Endpoint, CommandSequence),
    Empty(Endpoint),
    NotFound,
    Failed(FetchError),
}

/// Walks the documentation tree and builds the catalog
pub struct Walker<T: Transport = HttpTransport, W: CatalogWriter = JsonCatalogStore> {
    site: SiteConfig,
    base_url: Url,
    fetcher: Fetcher<T>,
    extractor: CommandExtractor,
    cleaner: CommandCleaner,
    writer: W,
    catalog: Catalog,
    report: WalkReport,
}

impl Walker<HttpTransport, JsonCatalogStore> {
    /// Builds a walker that fetches over HTTP and writes a JSON catalog
    pub fn from_config(config: &Config) -> Result<Self, ScoutError> {
        let fetcher = Fetcher::from_config(&config.fetcher)?;
        Self::new(
            config.site.clone(),
            fetcher,
            CommandExtractor::from_config(&config.extractor),
            CommandCleaner::from_config(&config.extractor),
            JsonCatalogStore::new(&config.output.catalog_path),
        )
    }
}

impl<T: Transport, W: CatalogWriter> Walker<T, W> {
    pub fn new(
        site: SiteConfig,
        fetcher: Fetcher<T>,
        extractor: CommandExtractor,
        cleaner: CommandCleaner,
        writer: W,
    ) -> Result<Self, ScoutError> {
        let base_url = site.base_url()?;

        Ok(Self {
            site,
            base_url,
            fetcher,
            extractor,
            cleaner,
            writer,
            catalog: Catalog::new(),
            report: WalkReport::default(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    pub fn report(&self) -> &WalkReport {
        &self.report
    }

    /// Runs the full walk
    ///
    /// Starts from an empty catalog every time, so walking an unchanged
    /// site twice produces the same catalog. The only error is a failed
    /// checkpoint; every fetch failure is absorbed at its level.
    pub async fn run(&mut self) -> Result<WalkReport, ScoutError> {
        self.catalog = Catalog::new();
        self.report = WalkReport::default();

        let start_time = std::time::Instant::now();
        let courses = self.site.courses.clone();

        for slug in &courses {
            let course = Endpoint::course(slug.as_str());

            if self.site.probe_courses {
                let (result, _) = self.probe(Level::Course, &course).await;
                if next_step(Level::Course, result) != Step::Descend {
                    tracing::info!("Skipping course {}: root page unavailable", slug);
                    continue;
                }
            }

            tracing::info!("Processing course: {}", slug);
            self.report.courses_walked += 1;
            self.walk_course(&course).await?;
        }

        self.checkpoint()?;

        tracing::info!(
            "Walk completed in {:?}: {}",
            start_time.elapsed(),
            self.report
        );

        Ok(self.report.clone())
    }

    /// Probes every year of a course, checkpointing after each one found
    async fn walk_course(&mut self, course: &Endpoint) -> Result<(), ScoutError> {
        let years: Vec<u16> = self.site.years().collect();

        for year in years {
            let year_endpoint = course.with_year(year);
            let (result, _) = self.probe(Level::Year, &year_endpoint).await;
            if next_step(Level::Year, result) != Step::Descend {
                continue;
            }

            tracing::info!("  Found year: {}", year_endpoint);
            self.report.years_found += 1;

            self.walk_year(&year_endpoint).await;
            self.checkpoint()?;
        }

        Ok(())
    }

    async fn walk_year(&mut self, year: &Endpoint) {
        match self.resolve_format(year).await {
            Some(format) => {
                tracing::info!("  Using format: {}", format);
                self.report.formats_found += 1;
                self.walk_indices(&format).await;
            }
            None => tracing::info!("  No known format under {}, skipping year", year),
        }
    }

    /// Returns the first format candidate that resolves under `year`
    async fn resolve_format(&mut self, year: &Endpoint) -> Option<Endpoint> {
        let formats = self.site.formats.clone();

        for format in formats {
            let endpoint = year.with_format(format);
            let (result, _) = self.probe(Level::Format, &endpoint).await;
            if next_step(Level::Format, result) == Step::Descend {
                return Some(endpoint);
            }
        }

        None
    }

    /// Walks `0, 1, 2, …` until the first index that does not resolve
    async fn walk_indices(&mut self, format: &Endpoint) {
        let mut index: u32 = 0;

        loop {
            let endpoint = format.with_index(index);
            let (result, page) = self.probe(Level::Index, &endpoint).await;

            let page = match (next_step(Level::Index, result), page) {
                (Step::Descend, Some(page)) => page,
                _ => {
                    tracing::debug!("Index enumeration for {} ended at {}", format, index);
                    break;
                }
            };

            self.report.index_pages += 1;
            self.scrape_index_page(&endpoint, &page).await;

            index = match index.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }
    }

    /// Fetches every sub-problem of an index page concurrently, then merges
    /// the results into the catalog
    async fn scrape_index_page(&mut self, index: &Endpoint, page: &Page) {
        let links = extract_sub_links(&page.body, &page.url);
        tracing::debug!("Found {} sub-problem links on {}", links.len(), page.url);

        if links.is_empty() {
            return;
        }

        let tasks = links
            .iter()
            .map(|link| self.scrape_problem(index.with_problem(&link.href), &link.url));
        let results = join_all(tasks).await;

        for result in results {
            self.report.probes += 1;
            match result {
                ProblemScrape::Found(endpoint, commands) => {
                    self.report.problem_pages += 1;
                    let count = commands.len();
                    if self.catalog.insert(&endpoint, commands) {
                        tracing::debug!("Recorded {} ({} commands)", endpoint, count);
                        self.report.problems_recorded += 1;
                    }
                }
                ProblemScrape::Empty(endpoint) => {
                    self.report.problem_pages += 1;
                    self.report.problems_dropped += 1;
                    tracing::debug!("No setup commands on {}", endpoint);
                }
                ProblemScrape::NotFound => self.report.not_found += 1,
                ProblemScrape::Failed(e) => {
                    tracing::debug!("Skipping problem page under {}: {}", index, e);
                    self.report.failed += 1;
                }
            }
        }
    }

    /// Fetch + extract + clean for one sub-problem page
    async fn scrape_problem(&self, endpoint: Endpoint, url: &Url) -> ProblemScrape {
        match self.fetcher.fetch(url).await {
            FetchOutcome::Success { body, .. } => {
                let raw = self.extractor.extract(&body);
                let commands = self.cleaner.clean(&raw);
                if commands.is_empty() {
                    ProblemScrape::Empty(endpoint)
                } else {
                    ProblemScrape::Found(endpoint, commands)
                }
            }
            FetchOutcome::NotFound => {
                tracing::debug!("Problem page {} not found", url);
                ProblemScrape::NotFound
            }
            FetchOutcome::Failed(e) => ProblemScrape::Failed(e),
        }
    }

    /// Fetches one endpoint for the given level
    async fn probe(&mut self, level: Level, endpoint: &Endpoint) -> (AdvanceResult, Option<Page>) {
        let url = match endpoint.url(&self.base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build {} URL for {}: {}", level, endpoint, e);
                self.report.failed += 1;
                return (AdvanceResult::StopBranch, None);
            }
        };

        self.report.probes += 1;
        let outcome = self.fetcher.fetch(&url).await;
        let result = AdvanceResult::from_outcome(&outcome);

        match outcome {
            FetchOutcome::Success { body, .. } => (result, Some(Page { url, body })),
            FetchOutcome::NotFound => {
                tracing::debug!("No {} at {}", level, url);
                self.report.not_found += 1;
                (result, None)
            }
            FetchOutcome::Failed(e) => {
                tracing::debug!("Treating unreachable {} {} as missing: {}", level, url, e);
                self.report.failed += 1;
                (result, None)
            }
        }
    }

    /// Writes the full catalog; failure aborts the walk
    fn checkpoint(&mut self) -> Result<(), ScoutError> {
        if let Err(e) = self.writer.persist(&self.catalog) {
            tracing::error!("Failed to persist catalog: {}", e);
            return Err(e.into());
        }

        self.report.checkpoints += 1;
        tracing::info!("Checkpoint: {} problems catalogued", self.catalog.len());
        Ok(())
    }
}
