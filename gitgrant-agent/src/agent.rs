//! Cycle driver: one reconciliation pass per desired-state record.
//!
//! The generic engine machinery (backoff schedulers, rate limiting, leader
//! election) lives outside this crate. The driver only walks the store and
//! runs, per record: connect, then observe, then at most one of create,
//! update, or delete — re-derived entirely from the record's current content
//! every time, so any step can be retried on a later pass.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::time::{interval, timeout};
use tracing::{debug, error, info};

use gitgrant_api::{Condition, Record, RecordStore};

use crate::events::EventRecorder;
use crate::registry::Registry;

/// What a single cycle did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Created,
    Updated,
    UpToDate,
    Deleted,
}

pub struct Agent {
    store: Arc<dyn RecordStore>,
    registry: Arc<Registry>,
    events: EventRecorder,
    cycle_timeout: Duration,
}

impl Agent {
    pub fn new(store: Arc<dyn RecordStore>, registry: Arc<Registry>) -> Self {
        Self {
            store,
            registry,
            events: EventRecorder,
            cycle_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_cycle_timeout(mut self, cycle_timeout: Duration) -> Self {
        self.cycle_timeout = cycle_timeout;
        self
    }

    /// Poll loop: full passes on a fixed interval until the task is dropped.
    pub async fn run(&self, poll_interval: Duration) -> Result<()> {
        info!(interval_secs = poll_interval.as_secs(), "agent started");
        let mut ticker = interval(poll_interval);
        loop {
            ticker.tick().await;
            self.run_once().await?;
        }
    }

    /// Run one pass over every record in the store. Per-record failures are
    /// recorded on the record and do not abort the pass.
    pub async fn run_once(&self) -> Result<()> {
        let records = self.store.list().await.context("cannot list records")?;
        debug!(count = records.len(), "reconciling records");
        for record in records {
            let id = record.id().to_string();
            if let Err(e) = self.reconcile_record(record).await {
                debug!(record = %id, error = format!("{e:#}"), "cycle failed");
            }
        }
        Ok(())
    }

    /// One full cycle for a record, with status persisted afterwards. A
    /// successfully finalized record is purged from the store instead.
    pub async fn reconcile_record(&self, mut record: Record) -> Result<CycleOutcome> {
        let outcome = match timeout(self.cycle_timeout, self.cycle(&mut record)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "cycle deadline of {:?} exceeded",
                self.cycle_timeout
            )),
        };

        match outcome {
            Ok(CycleOutcome::Deleted) => {
                self.events.deleted(&record);
                self.store
                    .delete(record.id())
                    .await
                    .with_context(|| format!("cannot purge record {}", record.id()))?;
                Ok(CycleOutcome::Deleted)
            }
            Ok(outcome) => {
                record
                    .status_mut()
                    .set_condition(Condition::reconcile_success());
                self.store
                    .put(record)
                    .await
                    .context("cannot persist record status")?;
                Ok(outcome)
            }
            Err(e) => {
                self.events.reconcile_failed(&record, &e);
                record
                    .status_mut()
                    .set_condition(Condition::reconcile_error(format!("{e:#}")));
                if let Err(persist_err) = self.store.put(record).await {
                    error!(error = %persist_err, "cannot persist failed-cycle status");
                }
                Err(e)
            }
        }
    }

    async fn cycle(&self, record: &mut Record) -> Result<CycleOutcome> {
        let kind = record.kind();
        let connector = self
            .registry
            .connector_for(kind)
            .ok_or_else(|| anyhow!("no connector registered for kind {kind}"))?;
        let client = connector
            .connect(record)
            .await
            .with_context(|| format!("cannot connect record {}", record.id()))?;

        if record.deletion_requested() {
            record.status_mut().set_condition(Condition::deleting());
            client.delete(record).await?;
            return Ok(CycleOutcome::Deleted);
        }

        let observation = client.observe(record).await?;
        if !observation.exists {
            record.status_mut().set_condition(Condition::creating());
            client.create(record).await?;
            self.events.created(record);
            return Ok(CycleOutcome::Created);
        }
        if !observation.up_to_date {
            client.update(record).await?;
            self.events.updated(record);
            return Ok(CycleOutcome::Updated);
        }
        Ok(CycleOutcome::UpToDate)
    }
}
