// This file is part of the terraform-provider-azurerm project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Job execution operations, independent of the Terraform state shape.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::mssql::{JobExecution, JobExecutionsApi};
use crate::custompollers::{lifecycle_status, JobExecutionPoller};
use crate::ids::mssql::{JobExecutionId, JobId};
use crate::polling::{Poller, DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW};

pub(super) const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Warning detail when `job` lives outside the subscription the provider is configured with
pub(super) fn foreign_subscription(configured: Option<&str>, job: &JobId) -> Option<String> {
    let configured = configured?;
    if job.subscription_id.eq_ignore_ascii_case(configured) {
        return None;
    }
    Some(format!(
        "{job} is in subscription {:?}, the provider is configured with {configured:?}",
        job.subscription_id
    ))
}

/// Start a new execution of `job` under a freshly generated execution ID
pub(super) async fn start_execution(
    api: &dyn JobExecutionsApi,
    job: &JobId,
) -> Result<(JobExecutionId, JobExecution)> {
    let execution = Uuid::new_v4().to_string();
    let id = job.execution(execution.as_str());
    let created = api
        .create(job, &execution)
        .await
        .with_context(|| format!("starting {id}"))?;
    info!(id = %id.id(), "started job execution");
    Ok((id, created))
}

/// Wait until the execution reaches a terminal lifecycle, then read it back
pub(super) async fn wait_for_execution(
    api: &dyn JobExecutionsApi,
    id: &JobExecutionId,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<JobExecution> {
    let poller = Poller::new(
        JobExecutionPoller::new(api, id.clone()),
        POLL_INTERVAL,
        DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
    );
    poller
        .poll_until_done(cancel, timeout)
        .await
        .with_context(|| format!("waiting for {id}"))?;
    api.get(id).await.with_context(|| format!("retrieving {id}"))
}

/// Current state of the execution, `None` once it no longer exists
pub(super) async fn refresh(
    api: &dyn JobExecutionsApi,
    id: &JobExecutionId,
) -> Result<Option<JobExecution>> {
    match api.get(id).await {
        Ok(execution) => Ok(Some(execution)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err).with_context(|| format!("retrieving {id}")),
    }
}

/// Read the execution back after waiting failed. Errors are logged, not reported.
pub(super) async fn refresh_after_failure(
    api: &dyn JobExecutionsApi,
    id: &JobExecutionId,
) -> Option<JobExecution> {
    match refresh(api, id).await {
        Ok(Some(execution)) => Some(execution),
        Ok(None) => {
            warn!(id = %id.id(), "job execution vanished after failing");
            None
        }
        Err(err) => {
            warn!(id = %id.id(), "keeping the last known lifecycle: {err:#}");
            None
        }
    }
}

/// Cancel the execution unless it already finished. Returns whether a cancellation was requested.
pub(super) async fn cancel_if_running(api: &dyn JobExecutionsApi, id: &JobExecutionId) -> Result<bool> {
    let Some(execution) = refresh(api, id).await? else {
        debug!(id = %id.id(), "job execution already gone");
        return Ok(false);
    };
    let running = execution
        .lifecycle()
        .map_or(true, |lifecycle| !lifecycle_status(&lifecycle).is_terminal());
    if !running {
        return Ok(false);
    }
    api.cancel(id)
        .await
        .with_context(|| format!("cancelling {id}"))?;
    info!(id = %id.id(), "cancelled job execution");
    Ok(true)
}
