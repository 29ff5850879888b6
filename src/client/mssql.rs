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

//! Elastic job executions of Azure SQL.

use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use super::{ApiError, ArmClient};
use crate::ids::mssql::{JobExecutionId, JobId};

pub const API_VERSION: &str = "2023-08-01-preview";

/// A job execution, or one of its step executions
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobExecution {
    pub id: Option<String>,
    pub name: Option<String>,
    pub properties: Option<JobExecutionProperties>,
}

/// Step executions share the job execution model
pub type JobStepExecution = JobExecution;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobExecutionProperties {
    pub lifecycle: Option<String>,
    pub provisioning_state: Option<String>,
    pub last_message: Option<String>,
    pub step_name: Option<String>,
    pub step_id: Option<i64>,
    pub current_attempts: Option<i64>,
    pub create_time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub last_update_time: Option<String>,
}

impl JobExecution {
    pub fn lifecycle(&self) -> Option<JobExecutionLifecycle> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.lifecycle.as_deref())
            .map(|lifecycle| match lifecycle.parse() {
                Ok(lifecycle) => lifecycle,
                Err(infallible) => match infallible {},
            })
    }

    pub fn last_message(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.last_message.as_deref())
            .filter(|message| !message.is_empty())
    }

    pub fn step_id(&self) -> Option<i64> {
        self.properties.as_ref().and_then(|properties| properties.step_id)
    }

    pub fn step_name(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.step_name.as_deref())
            .or(self.name.as_deref())
    }

    /// Unparseable timestamps are treated as absent
    pub fn last_update_time(&self) -> Option<OffsetDateTime> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.last_update_time.as_deref())
            .and_then(|time| OffsetDateTime::parse(time, &Rfc3339).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobExecutionLifecycle {
    Canceled,
    Created,
    Failed,
    InProgress,
    Skipped,
    Succeeded,
    SucceededWithSkipped,
    TimedOut,
    WaitingForChildJobExecutions,
    WaitingForRetry,
    Other(String),
}

impl JobExecutionLifecycle {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canceled => "Canceled",
            Self::Created => "Created",
            Self::Failed => "Failed",
            Self::InProgress => "InProgress",
            Self::Skipped => "Skipped",
            Self::Succeeded => "Succeeded",
            Self::SucceededWithSkipped => "SucceededWithSkipped",
            Self::TimedOut => "TimedOut",
            Self::WaitingForChildJobExecutions => "WaitingForChildJobExecutions",
            Self::WaitingForRetry => "WaitingForRetry",
            Self::Other(other) => other,
        }
    }
}

impl FromStr for JobExecutionLifecycle {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Canceled" => Self::Canceled,
            "Created" => Self::Created,
            "Failed" => Self::Failed,
            "InProgress" => Self::InProgress,
            "Skipped" => Self::Skipped,
            "Succeeded" => Self::Succeeded,
            "SucceededWithSkipped" => Self::SucceededWithSkipped,
            "TimedOut" => Self::TimedOut,
            "WaitingForChildJobExecutions" => Self::WaitingForChildJobExecutions,
            "WaitingForRetry" => Self::WaitingForRetry,
            other => Self::Other(other.to_owned()),
        })
    }
}

impl Display for JobExecutionLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait JobExecutionsApi: Send + Sync {
    /// Start a new execution of `job`, identified by `execution`
    async fn create(&self, job: &JobId, execution: &str) -> Result<JobExecution, ApiError>;
    async fn get(&self, id: &JobExecutionId) -> Result<JobExecution, ApiError>;
    async fn list_steps(&self, id: &JobExecutionId) -> Result<Vec<JobStepExecution>, ApiError>;
    async fn cancel(&self, id: &JobExecutionId) -> Result<(), ApiError>;
}

#[async_trait]
impl JobExecutionsApi for ArmClient {
    async fn create(&self, job: &JobId, execution: &str) -> Result<JobExecution, ApiError> {
        let id = job.execution(execution);
        let response = self
            .put(&id.id(), API_VERSION, &serde_json::json!({}))
            .await?;
        if response.has_body() {
            response.json()
        } else {
            debug!(status = response.status, "job execution accepted, reading it back");
            self.get(&id).await
        }
    }

    async fn get(&self, id: &JobExecutionId) -> Result<JobExecution, ApiError> {
        self.get_json(&id.id(), API_VERSION).await
    }

    async fn list_steps(&self, id: &JobExecutionId) -> Result<Vec<JobStepExecution>, ApiError> {
        self.list_json(&format!("{}/steps", id.id()), API_VERSION)
            .await
    }

    async fn cancel(&self, id: &JobExecutionId) -> Result<(), ApiError> {
        self.post(&format!("{}/cancel", id.id()), API_VERSION)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_job_execution() {
        let execution: JobExecution = serde_json::from_str(
            r#"{
                "id": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Sql/servers/s/jobAgents/a/jobs/j/executions/e/steps/step1",
                "name": "step1",
                "type": "Microsoft.Sql/servers/jobAgents/jobs/executions/steps",
                "properties": {
                    "jobVersion": 1,
                    "stepName": "step1",
                    "stepId": 2,
                    "lifecycle": "Failed",
                    "provisioningState": "Succeeded",
                    "lastMessage": "Login failed for user 'job'.",
                    "currentAttempts": 3,
                    "createTime": "2024-03-01T10:00:00.123Z",
                    "lastUpdateTime": "2024-03-01T10:05:00Z",
                    "endTime": null
                }
            }"#,
        )
        .unwrap();
        assert_eq!(execution.lifecycle(), Some(JobExecutionLifecycle::Failed));
        assert_eq!(execution.last_message(), Some("Login failed for user 'job'."));
        assert_eq!(execution.step_id(), Some(2));
        assert_eq!(execution.step_name(), Some("step1"));
        assert_eq!(
            execution.last_update_time().map(OffsetDateTime::unix_timestamp),
            Some(1709287500)
        );
    }

    #[test]
    fn lenient_fields() {
        let execution: JobExecution = serde_json::from_str(
            r#"{"name": "e", "properties": {"lifecycle": "Exploded", "lastMessage": "", "lastUpdateTime": "yesterday"}}"#,
        )
        .unwrap();
        assert_eq!(
            execution.lifecycle(),
            Some(JobExecutionLifecycle::Other("Exploded".to_owned()))
        );
        assert_eq!(execution.last_message(), None);
        assert_eq!(execution.last_update_time(), None);
        assert_eq!(execution.step_name(), Some("e"));
        assert_eq!(JobExecution::default().lifecycle(), None);
    }

    #[test]
    fn lifecycle_names() {
        for name in [
            "Canceled",
            "Created",
            "Failed",
            "InProgress",
            "Skipped",
            "Succeeded",
            "SucceededWithSkipped",
            "TimedOut",
            "WaitingForChildJobExecutions",
            "WaitingForRetry",
            "Unheard",
        ] {
            let lifecycle: JobExecutionLifecycle = name.parse().unwrap();
            assert_eq!(lifecycle.to_string(), name);
        }
    }
}
