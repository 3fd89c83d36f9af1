// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use futures_util::future::join_all;
use log::{info, warn};
use serde::Serialize;
use std::time::Duration;

use crate::config::CampaignConfig;
use crate::crm::{ContactSource, CrmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub batch_size: usize,
    pub batch_interval: Duration,
    pub call_timeout: Duration,
}

impl BatchPolicy {
    pub fn from_config(config: &CampaignConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            batch_interval: Duration::from_millis(config.batch_interval_ms),
            call_timeout: Duration::from_secs(config.call_timeout_seconds),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactOutcome {
    pub contact_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub status: JobStatus,
    pub results: Vec<ContactOutcome>,
    pub chunks: usize,
    pub rate_limited: bool,
    pub reset_after_secs: Option<u64>,
    /// Ids never attempted because the job was aborted.
    pub remaining: Vec<String>,
}

impl BatchReport {
    fn pending(capacity: usize) -> Self {
        Self {
            status: JobStatus::Pending,
            results: Vec::with_capacity(capacity),
            chunks: 0,
            rate_limited: false,
            reset_after_secs: None,
            remaining: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|outcome| outcome.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Applies a tag to contacts in fixed-size concurrent chunks, pausing between
/// chunks and giving up on the first rate-limit answer.
#[derive(Debug, Clone)]
pub struct BatchTagger {
    policy: BatchPolicy,
}

impl BatchTagger {
    pub fn new(policy: BatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    pub async fn run<S>(&self, source: &S, contact_ids: &[String], tag: &str) -> BatchReport
    where
        S: ContactSource + ?Sized,
    {
        let mut report = BatchReport::pending(contact_ids.len());
        let tags = vec![tag.to_string()];
        let chunks: Vec<&[String]> = contact_ids.chunks(self.policy.batch_size.max(1)).collect();

        report.status = JobStatus::Running;
        info!(
            "Tagging {} contacts with '{}' in {} chunks",
            contact_ids.len(),
            tag,
            chunks.len()
        );

        for (index, chunk) in chunks.iter().enumerate() {
            let settled = join_all(chunk.iter().map(|id| self.tag_one(source, id, &tags))).await;
            report.chunks += 1;

            let mut limited = false;
            for (contact_id, result) in chunk.iter().zip(settled) {
                let outcome = match result {
                    Ok(()) => ContactOutcome {
                        contact_id: contact_id.clone(),
                        success: true,
                        error: None,
                    },
                    Err(err) => {
                        if let CrmError::RateLimited { reset_after_secs } = &err {
                            limited = true;
                            report.reset_after_secs =
                                report.reset_after_secs.max(*reset_after_secs);
                        }
                        ContactOutcome {
                            contact_id: contact_id.clone(),
                            success: false,
                            error: Some(err.to_string()),
                        }
                    }
                };
                report.results.push(outcome);
            }

            if limited {
                report.rate_limited = true;
                report.status = JobStatus::Aborted;
                report.remaining = chunks[index + 1..].concat();
                warn!(
                    "Rate limited during chunk {} of {}; {} contacts left untagged",
                    index + 1,
                    chunks.len(),
                    report.remaining.len()
                );
                return report;
            }

            if index + 1 < chunks.len() && !self.policy.batch_interval.is_zero() {
                tokio::time::sleep(self.policy.batch_interval).await;
            }
        }

        report.status = JobStatus::Completed;
        info!(
            "Tagging with '{}' finished: {} succeeded, {} failed",
            tag,
            report.succeeded(),
            report.failed()
        );
        report
    }

    async fn tag_one<S>(&self, source: &S, contact_id: &str, tags: &[String]) -> Result<(), CrmError>
    where
        S: ContactSource + ?Sized,
    {
        match tokio::time::timeout(self.policy.call_timeout, source.add_tags(contact_id, tags)).await
        {
            Ok(result) => result,
            Err(_) => Err(CrmError::Timeout),
        }
    }
}
