//! The two-phase boilerplate removal pipeline.
//!
//! `fit` compares adjacent pages of the sorted URL list and accumulates the
//! subtree fingerprints that recur across pages; `transform` streams the
//! corpus back out with those subtrees removed and the page content
//! extracted. The two phases run over the same dataset, so fingerprints
//! learned on one domain are only ever applied to that domain.
//!
//! Results are independent of the operation mode and the worker count: the
//! pairs are always matched in sorted-URL order and merged in that order, so
//! a parallel run produces byte-identical output to a sequential one.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::matcher::{match_pair, PairMatch};
use crate::memo::MemoSlot;
use crate::options::{OperationMode, Options};
use crate::output::OutputPage;
use crate::page::ParsedPage;

/// Learns and removes cross-page boilerplate for one domain.
pub struct Deboiler {
    options: Options,
    boilerplate: HashSet<String>,
    cache: HashMap<String, ParsedPage>,
}

impl Deboiler {
    /// Creates a pipeline with the given options.
    ///
    /// # Errors
    ///
    /// `Error::Config` when the options are inconsistent, e.g. multiple
    /// workers combined with performance mode.
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            boilerplate: HashSet::new(),
            cache: HashMap::new(),
        })
    }

    /// The boilerplate fingerprints identified by the last `fit`.
    #[must_use]
    pub fn boilerplate(&self) -> &HashSet<String> {
        &self.boilerplate
    }

    fn build_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.n_workers)
            .build()
            .map_err(|err| Error::WorkerPool(err.to_string()))
    }

    /// Identifies boilerplate fingerprints across the dataset.
    ///
    /// Every adjacent pair of the sorted URL list is matched; fingerprints
    /// seen in at least `min_occurrence_threshold` pairs become boilerplate.
    /// Near-duplicate pairs are excluded so that templated copies of the
    /// same page cannot vote their entire body into the boilerplate set.
    ///
    /// # Errors
    ///
    /// Propagates dataset access failures and worker pool construction
    /// failures.
    pub fn fit<D: Dataset + Sync>(&mut self, dataset: &D) -> Result<()> {
        self.boilerplate = HashSet::new();
        self.cache = HashMap::new();
        let started = Instant::now();

        let pairs = dataset.pairs();
        if pairs.is_empty() {
            info!(
                domain = %self.options.domain,
                n_pages = dataset.len(),
                "fewer than two pages, nothing to identify"
            );
            return Ok(());
        }

        let iou_threshold = self.options.iou_threshold;
        let matches: Vec<PairMatch> = match self.options.operation_mode {
            OperationMode::Performance => {
                for url in dataset.urls() {
                    let page = dataset.get(&url)?.parse();
                    self.cache.insert(url, page);
                }
                let mut matches = Vec::with_capacity(pairs.len());
                for (primary_url, secondary_url) in &pairs {
                    let primary = self
                        .cache
                        .get(primary_url)
                        .ok_or_else(|| Error::UnknownUrl(primary_url.clone()))?;
                    let secondary = self
                        .cache
                        .get(secondary_url)
                        .ok_or_else(|| Error::UnknownUrl(secondary_url.clone()))?;
                    matches.push(match_pair(primary, secondary, iou_threshold));
                    // the primary has now been in both of its pairs; its
                    // candidate set is no longer needed, the node memo is
                    // kept for transform
                    if let Some(primary) = self.cache.get_mut(primary_url) {
                        primary.clear_cache(false);
                    }
                }
                matches
            }
            OperationMode::Memory if self.options.n_workers > 1 => {
                let pool = self.build_pool()?;
                let chunks: Vec<Vec<PairMatch>> = pool.install(|| {
                    pairs
                        .par_chunks(self.options.chunk_size)
                        .map(|chunk| fit_chunk(dataset, chunk, iou_threshold))
                        .collect::<Result<_>>()
                })?;
                chunks.into_iter().flatten().collect()
            }
            OperationMode::Memory => fit_chunk(dataset, &pairs, iou_threshold)?,
        };

        let mut counter: HashMap<String, usize> = HashMap::new();
        let mut n_similar_pairs = 0usize;
        for result in matches {
            if result.too_similar {
                n_similar_pairs += 1;
            }
            for fingerprint in result.shared {
                *counter.entry(fingerprint).or_insert(0) += 1;
            }
        }

        let n_candidates = counter.len();
        self.boilerplate = counter
            .into_iter()
            .filter(|(_, count)| *count >= self.options.min_occurrence_threshold)
            .map(|(fingerprint, _)| fingerprint)
            .collect();

        info!(
            domain = %self.options.domain,
            n_pairs = pairs.len(),
            n_similar_pairs,
            n_candidates,
            n_boilerplate = self.boilerplate.len(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "identified boilerplate"
        );
        Ok(())
    }

    /// Streams the transformed pages in sorted-URL order.
    ///
    /// Pages are processed one chunk at a time; within a chunk, multiple
    /// workers may parse and clean pages in parallel, but items are always
    /// yielded in URL order. Each item is its own `Result`, so one broken
    /// page does not end the stream.
    ///
    /// In performance mode the parsed trees cached during `fit` are
    /// consumed instead of re-parsing; the dataset must therefore be the
    /// one `fit` ran on, and each `fit` supports exactly one `transform`.
    /// Call `fit` again before transforming a second time.
    ///
    /// # Errors
    ///
    /// `Error::DatasetMismatch` in performance mode when the cached corpus
    /// does not cover the dataset; `Error::WorkerPool` when the pool cannot
    /// be built.
    pub fn transform<'a, D: Dataset + Sync>(
        &mut self,
        dataset: &'a D,
        include_cleaned_html: bool,
    ) -> Result<TransformIter<'a, D>> {
        let urls = dataset.urls();

        let cache = match self.options.operation_mode {
            OperationMode::Performance => {
                let covered = self.cache.len() == urls.len()
                    && urls.iter().all(|url| self.cache.contains_key(url));
                if !covered {
                    return Err(Error::DatasetMismatch);
                }
                std::mem::take(&mut self.cache)
            }
            OperationMode::Memory => HashMap::new(),
        };

        let pool = if self.options.operation_mode == OperationMode::Memory
            && self.options.n_workers > 1
        {
            Some(self.build_pool()?)
        } else {
            None
        };

        debug!(
            domain = %self.options.domain,
            n_pages = urls.len(),
            n_boilerplate = self.boilerplate.len(),
            include_cleaned_html,
            "starting transform"
        );

        Ok(TransformIter {
            dataset,
            urls,
            next_url: 0,
            boilerplate: self.boilerplate.clone(),
            cache,
            pool,
            chunk_size: self.options.chunk_size,
            include_cleaned_html,
            buffer: VecDeque::new(),
            deltas: Vec::new(),
            stats_logged: false,
            started: Instant::now(),
        })
    }
}

/// Matches a consecutive run of pairs sequentially.
///
/// Adjacent pairs share their middle page, so a one-slot memo carries each
/// secondary page over to the next pair where it is the primary. At most
/// two parsed pages are alive at any moment.
fn fit_chunk<D: Dataset>(
    dataset: &D,
    pairs: &[(String, String)],
    iou_threshold: f64,
) -> Result<Vec<PairMatch>> {
    let mut memo: MemoSlot<String, ParsedPage> = MemoSlot::new();
    let mut matches = Vec::with_capacity(pairs.len());
    for (primary_url, secondary_url) in pairs {
        let primary = match memo.take(primary_url) {
            Some(page) => page,
            None => dataset.get(primary_url)?.parse(),
        };
        let secondary = dataset.get(secondary_url)?.parse();
        matches.push(match_pair(&primary, &secondary, iou_threshold));
        memo.insert(secondary_url.clone(), secondary);
    }
    Ok(matches)
}

/// Cleans one parsed page and extracts its content.
///
/// Title, breadcrumbs and the original text are taken before removal,
/// since the removed subtrees may contain them; everything else reflects
/// the cleaned tree.
#[must_use]
pub fn transform_page(
    mut page: ParsedPage,
    boilerplate: &HashSet<String>,
    include_cleaned_html: bool,
) -> OutputPage {
    let text = page.extract_text();
    let title = page.extract_title();
    let breadcrumbs = page.extract_breadcrumbs();

    let n_removed = page.remove_boilerplate(boilerplate);
    debug!(url = %page.url, n_removed, "removed boilerplate subtrees");

    let cleaned_text = page.extract_text();
    let headings = page.extract_headings();
    let lists = page.extract_lists();
    let language = page.detect_language(&cleaned_text);
    let cleaned_html = include_cleaned_html.then(|| page.html());

    OutputPage {
        url: page.url,
        text,
        cleaned_text,
        title,
        headings,
        lists,
        breadcrumbs,
        language,
        cleaned_html,
    }
}

/// Lazy iterator over transformed pages, in sorted-URL order.
pub struct TransformIter<'a, D> {
    dataset: &'a D,
    urls: Vec<String>,
    next_url: usize,
    boilerplate: HashSet<String>,
    cache: HashMap<String, ParsedPage>,
    pool: Option<rayon::ThreadPool>,
    chunk_size: usize,
    include_cleaned_html: bool,
    buffer: VecDeque<Result<OutputPage>>,
    deltas: Vec<usize>,
    stats_logged: bool,
    started: Instant,
}

impl<D: Dataset + Sync> TransformIter<'_, D> {
    fn fill_buffer(&mut self) {
        let end = (self.next_url + self.chunk_size).min(self.urls.len());
        let chunk = &self.urls[self.next_url..end];
        self.next_url = end;

        let results: Vec<Result<OutputPage>> = if let Some(pool) = &self.pool {
            let dataset = self.dataset;
            let boilerplate = &self.boilerplate;
            let include_cleaned_html = self.include_cleaned_html;
            pool.install(|| {
                chunk
                    .par_iter()
                    .map(|url| {
                        let page = dataset.get(url)?.parse();
                        Ok(transform_page(page, boilerplate, include_cleaned_html))
                    })
                    .collect()
            })
        } else {
            chunk
                .iter()
                .map(|url| {
                    let page = match self.cache.remove(url) {
                        Some(page) => page,
                        None => self.dataset.get(url)?.parse(),
                    };
                    Ok(transform_page(
                        page,
                        &self.boilerplate,
                        self.include_cleaned_html,
                    ))
                })
                .collect()
        };

        for result in results {
            if let Ok(output) = &result {
                let before = output.text.chars().count();
                let after = output.cleaned_text.chars().count();
                self.deltas.push(before.saturating_sub(after));
            }
            self.buffer.push_back(result);
        }
    }

    fn log_stats(&mut self) {
        if self.stats_logged || self.deltas.is_empty() {
            self.stats_logged = true;
            return;
        }
        self.stats_logged = true;
        let mut sorted = self.deltas.clone();
        sorted.sort_unstable();
        let mean = sorted.iter().sum::<usize>() as f64 / sorted.len() as f64;
        let median = sorted[sorted.len() / 2];
        info!(
            n_pages = sorted.len(),
            mean_chars_removed = mean,
            median_chars_removed = median,
            elapsed_secs = self.started.elapsed().as_secs_f64(),
            "transform finished"
        );
    }
}

impl<D: Dataset + Sync> Iterator for TransformIter<'_, D> {
    type Item = Result<OutputPage>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.buffer.is_empty() && self.next_url < self.urls.len() {
            self.fill_buffer();
        }
        match self.buffer.pop_front() {
            Some(item) => Some(item),
            None => {
                self.log_stats();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len() + (self.urls.len() - self.next_url);
        (remaining, Some(remaining))
    }
}
