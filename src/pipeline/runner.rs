//! Pipeline execution

use super::types::{new_load_id, LoadInfo, TableMetrics};
use crate::config::PipelineConfig;
use crate::destination::{DuckDbDestination, LoadJob, TableLoader};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::normalize::{NormalizedPage, Normalizer};
use crate::output::{LoadPackage, StagedTable};
use crate::resource::{Resource, Source};
use crate::types::WriteDisposition;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A resource whose pages have been extracted and staged
struct Extracted {
    index: usize,
    resource: String,
    disposition: WriteDisposition,
    pages: usize,
    staged: StagedTable,
}

/// Runs sources through extract, normalize and load
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    client: HttpClient,
}

impl Pipeline {
    /// Create a pipeline from a resolved configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_config(config.to_client_config())?;
        Ok(Self { config, client })
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// DuckDB database file written by this pipeline
    pub fn destination_path(&self) -> PathBuf {
        self.config.destination_path()
    }

    /// Extract, normalize and load every resource of `source`
    pub async fn run(&self, source: &Source) -> Result<LoadInfo> {
        let start = Instant::now();
        let load_id = new_load_id();

        info!(
            pipeline = %self.config.pipeline_name,
            source = %source.name(),
            load_id = %load_id,
            resources = source.len(),
            "Starting pipeline run"
        );

        let package = LoadPackage::create(self.config.pipeline_dir(), &load_id)?;
        let normalizer = Arc::new(Normalizer::new(&load_id));
        let normalize_slots = Arc::new(Semaphore::new(self.config.workers.normalize));

        let mut extracted: Vec<Extracted> = stream::iter(source.resources().iter().enumerate())
            .map(|(index, resource)| {
                self.extract(index, resource, &normalizer, &normalize_slots, &package)
            })
            .buffer_unordered(self.config.workers.extract)
            .try_collect()
            .await?;
        extracted.sort_by_key(|e| e.index);

        let destination =
            DuckDbDestination::open(self.config.destination_path(), &self.config.dataset_name)?;
        let jobs = extracted
            .into_iter()
            .map(|e| Ok((destination.loader()?, e)))
            .collect::<Result<Vec<_>>>()?;

        let mut tables: Vec<(usize, TableMetrics)> = stream::iter(jobs)
            .map(|(loader, extracted)| load_table(loader, extracted))
            .buffer_unordered(self.config.workers.load)
            .try_collect()
            .await?;
        tables.sort_by_key(|(index, _)| *index);

        destination.record_load(&load_id, &self.config.pipeline_name)?;
        package.remove()?;

        let info = LoadInfo {
            pipeline_name: self.config.pipeline_name.clone(),
            destination_path: self.config.destination_path(),
            dataset_name: self.config.dataset_name.clone(),
            load_id,
            tables: tables.into_iter().map(|(_, metrics)| metrics).collect(),
            elapsed: start.elapsed(),
        };

        info!(
            pipeline = %info.pipeline_name,
            load_id = %info.load_id,
            pages = info.total_pages(),
            rows = info.total_rows(),
            elapsed_ms = info.elapsed.as_millis() as u64,
            "Pipeline run completed"
        );
        Ok(info)
    }

    /// Paginate one resource, normalizing pages as they arrive, then stage
    /// its table
    async fn extract(
        &self,
        index: usize,
        resource: &Resource,
        normalizer: &Arc<Normalizer>,
        slots: &Arc<Semaphore>,
        package: &LoadPackage,
    ) -> Result<Extracted> {
        info!(resource = %resource.name(), endpoint = %resource.endpoint(), "Extracting resource");

        let pages = resource.pages(&self.client);
        futures::pin_mut!(pages);

        let mut tasks: Vec<JoinHandle<Result<NormalizedPage>>> = Vec::new();
        while let Some(page) = pages.try_next().await? {
            debug!(
                resource = %resource.name(),
                page = page.number,
                records = page.len(),
                "Queueing page for normalization"
            );

            let permit = acquire(slots).await?;
            let normalizer = Arc::clone(normalizer);
            let records = page.into_records();
            tasks.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                normalizer.normalize(&records)
            }));
        }

        let page_count = tasks.len();
        let mut normalized = Vec::with_capacity(page_count);
        for task in tasks {
            normalized.push(join(task).await?);
        }

        let permit = acquire(slots).await?;
        let table = resource.table_name().to_string();
        let package = package.clone();
        let staged = join(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            package.write_table(&table, &normalized)
        }))
        .await?;

        info!(
            resource = %resource.name(),
            table = %staged.table,
            pages = page_count,
            rows = staged.rows,
            "Extracted resource"
        );

        Ok(Extracted {
            index,
            resource: resource.name().to_string(),
            disposition: resource.write_disposition(),
            pages: page_count,
            staged,
        })
    }
}

async fn load_table(
    mut loader: TableLoader,
    extracted: Extracted,
) -> Result<(usize, TableMetrics)> {
    let job = LoadJob::new(&extracted.staged, extracted.disposition);
    let table_rows = join(tokio::task::spawn_blocking(move || loader.load(&job))).await?;

    let metrics = TableMetrics {
        resource: extracted.resource,
        table: extracted.staged.table,
        write_disposition: extracted.disposition,
        pages: extracted.pages,
        rows: extracted.staged.rows,
        files: extracted.staged.files.len(),
        table_rows,
    };
    Ok((extracted.index, metrics))
}

async fn acquire(slots: &Arc<Semaphore>) -> Result<tokio::sync::OwnedSemaphorePermit> {
    Arc::clone(slots)
        .acquire_owned()
        .await
        .map_err(|e| Error::Other(format!("normalize workers unavailable: {e}")))
}

async fn join<T>(task: JoinHandle<Result<T>>) -> Result<T> {
    task.await
        .map_err(|e| Error::Other(format!("worker task failed: {e}")))?
}
