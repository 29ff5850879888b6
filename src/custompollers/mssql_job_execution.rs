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

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::mssql::{JobExecution, JobExecutionLifecycle, JobExecutionsApi};
use crate::ids::mssql::JobExecutionId;
use crate::polling::{PollResult, PollerType, PollingError, PollingStatus};

/// Waits for an elastic job execution to finish.
///
/// When the execution fails, its step executions are inspected so the
/// failure points at the step that broke.
pub struct JobExecutionPoller<'a, C: ?Sized> {
    client: &'a C,
    id: JobExecutionId,
}

impl<'a, C: JobExecutionsApi + ?Sized> JobExecutionPoller<'a, C> {
    pub fn new(client: &'a C, id: JobExecutionId) -> Self {
        Self { client, id }
    }

    async fn failure_message(&self, execution: &JobExecution, lifecycle: &str) -> String {
        match self.client.list_steps(&self.id).await {
            Ok(steps) => {
                if let Some(step) = first_failed_step(&steps) {
                    let name = step.step_name().unwrap_or("unknown");
                    let step_lifecycle = step
                        .lifecycle()
                        .map(|lifecycle| lifecycle.to_string())
                        .unwrap_or_default();
                    return match step.last_message() {
                        Some(message) => {
                            format!("job step {name:?} finished as {step_lifecycle}: {message}")
                        }
                        None => format!("job step {name:?} finished as {step_lifecycle}"),
                    };
                }
            }
            Err(err) => warn!(id = %self.id.id(), "listing job step executions: {err}"),
        }

        match execution.last_message() {
            Some(message) => format!("job execution finished as {lifecycle}: {message}"),
            None => format!("job execution finished as {lifecycle}"),
        }
    }
}

pub fn lifecycle_status(lifecycle: &JobExecutionLifecycle) -> PollingStatus {
    use JobExecutionLifecycle::*;
    match lifecycle {
        Created | InProgress | WaitingForChildJobExecutions | WaitingForRetry => {
            PollingStatus::InProgress
        }
        Succeeded | SucceededWithSkipped => PollingStatus::Succeeded,
        Failed | TimedOut | Canceled | Skipped => PollingStatus::Failed,
        Other(_) => PollingStatus::Unknown,
    }
}

/// Lowest step id wins, then the earliest update
fn first_failed_step(steps: &[JobExecution]) -> Option<&JobExecution> {
    steps
        .iter()
        .filter(|step| {
            step.lifecycle()
                .map_or(false, |lifecycle| lifecycle_status(&lifecycle) == PollingStatus::Failed)
        })
        .min_by_key(|step| (step.step_id().unwrap_or(i64::MAX), step.last_update_time()))
}

#[async_trait]
impl<'a, C: JobExecutionsApi + ?Sized> PollerType for JobExecutionPoller<'a, C> {
    async fn poll(&self) -> Result<PollResult, PollingError> {
        let execution = self.client.get(&self.id).await?;
        let Some(lifecycle) = execution.lifecycle() else {
            return Ok(PollResult::new(PollingStatus::Unknown));
        };

        let status = lifecycle_status(&lifecycle);
        debug!(id = %self.id.id(), %lifecycle, %status, "job execution");
        if status == PollingStatus::Failed {
            let message = self.failure_message(&execution, lifecycle.as_str()).await;
            return Ok(PollResult::failed(message));
        }
        Ok(PollResult::new(status))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::client::ApiError;
    use crate::ids::mssql::JobId;
    use crate::polling::{Poller, DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW};

    #[derive(Default)]
    struct FakeJobExecutions {
        executions: Mutex<VecDeque<JobExecution>>,
        steps: Option<Vec<JobExecution>>,
    }

    impl FakeJobExecutions {
        fn new(lifecycles: &[&str]) -> Self {
            Self {
                executions: Mutex::new(
                    lifecycles
                        .iter()
                        .map(|lifecycle| execution(lifecycle, Some("execution message")))
                        .collect(),
                ),
                steps: Some(Vec::new()),
            }
        }

        fn with_steps(mut self, steps: Option<Vec<JobExecution>>) -> Self {
            self.steps = steps;
            self
        }
    }

    #[async_trait]
    impl JobExecutionsApi for FakeJobExecutions {
        async fn create(&self, _job: &JobId, _execution: &str) -> Result<JobExecution, ApiError> {
            unimplemented!()
        }

        async fn get(&self, _id: &JobExecutionId) -> Result<JobExecution, ApiError> {
            Ok(self.executions.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn list_steps(&self, id: &JobExecutionId) -> Result<Vec<JobExecution>, ApiError> {
            self.steps.clone().ok_or_else(|| ApiError::Status {
                url: format!("{}/steps", id.id()),
                status: 403,
                code: "AuthorizationFailed".to_owned(),
                message: "no access".to_owned(),
            })
        }

        async fn cancel(&self, _id: &JobExecutionId) -> Result<(), ApiError> {
            unimplemented!()
        }
    }

    fn execution(lifecycle: &str, message: Option<&str>) -> JobExecution {
        serde_json::from_value(serde_json::json!({
            "properties": {"lifecycle": lifecycle, "lastMessage": message}
        }))
        .unwrap()
    }

    fn step(name: &str, id: i64, lifecycle: &str, updated: &str, message: &str) -> JobExecution {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "properties": {
                "stepName": name,
                "stepId": id,
                "lifecycle": lifecycle,
                "lastUpdateTime": updated,
                "lastMessage": message,
            }
        }))
        .unwrap()
    }

    fn id() -> JobExecutionId {
        JobExecutionId::new("sub", "rg", "server", "agent", "job", "exec")
    }

    #[test]
    fn lifecycle_mapping() {
        for (lifecycle, status) in [
            ("Created", PollingStatus::InProgress),
            ("InProgress", PollingStatus::InProgress),
            ("WaitingForChildJobExecutions", PollingStatus::InProgress),
            ("WaitingForRetry", PollingStatus::InProgress),
            ("Succeeded", PollingStatus::Succeeded),
            ("SucceededWithSkipped", PollingStatus::Succeeded),
            ("Failed", PollingStatus::Failed),
            ("TimedOut", PollingStatus::Failed),
            ("Canceled", PollingStatus::Failed),
            ("Skipped", PollingStatus::Failed),
            ("Paused", PollingStatus::Unknown),
        ] {
            assert_eq!(
                lifecycle_status(&lifecycle.parse().unwrap()),
                status,
                "{lifecycle}"
            );
        }
    }

    #[test]
    fn first_failed_step_by_id_then_time() {
        let steps = vec![
            step("cleanup", 3, "Failed", "2024-01-01T10:00:00Z", "c"),
            step("load", 2, "TimedOut", "2024-01-01T10:05:00Z", "late"),
            step("load", 2, "Failed", "2024-01-01T10:01:00Z", "early"),
            step("extract", 1, "Succeeded", "2024-01-01T09:00:00Z", "ok"),
        ];
        let failed = first_failed_step(&steps).unwrap();
        assert_eq!(failed.last_message(), Some("early"));
        assert!(first_failed_step(&steps[3..]).is_none());
    }

    #[tokio::test]
    async fn in_progress_and_success() {
        let api = FakeJobExecutions::new(&["Created", "SucceededWithSkipped"]);
        let poller = JobExecutionPoller::new(&api, id());
        assert_eq!(poller.poll().await.unwrap().status, PollingStatus::InProgress);
        assert_eq!(poller.poll().await.unwrap().status, PollingStatus::Succeeded);
        // No lifecycle reported yet
        assert_eq!(poller.poll().await.unwrap().status, PollingStatus::Unknown);
    }

    #[tokio::test]
    async fn failure_names_the_failed_step() {
        let api = FakeJobExecutions::new(&["Failed"]).with_steps(Some(vec![
            step("extract", 1, "Succeeded", "2024-01-01T09:00:00Z", "ok"),
            step("load", 2, "Failed", "2024-01-01T10:01:00Z", "Login failed"),
        ]));
        let result = JobExecutionPoller::new(&api, id()).poll().await.unwrap();
        assert_eq!(result.status, PollingStatus::Failed);
        assert_eq!(
            result.message.as_deref(),
            Some("job step \"load\" finished as Failed: Login failed")
        );
    }

    #[tokio::test]
    async fn failure_falls_back_to_execution_message() {
        let api = FakeJobExecutions::new(&["TimedOut"]);
        let result = JobExecutionPoller::new(&api, id()).poll().await.unwrap();
        assert_eq!(
            result.message.as_deref(),
            Some("job execution finished as TimedOut: execution message")
        );

        let api = FakeJobExecutions::new(&["Canceled"]).with_steps(None);
        let result = JobExecutionPoller::new(&api, id()).poll().await.unwrap();
        assert_eq!(
            result.message.as_deref(),
            Some("job execution finished as Canceled: execution message")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn drives_poller_to_failure() {
        let api = FakeJobExecutions::new(&["Created", "InProgress", "WaitingForRetry", "Failed"])
            .with_steps(Some(vec![step(
                "load",
                1,
                "Failed",
                "2024-01-01T10:01:00Z",
                "Login failed",
            )]));
        let poller = Poller::new(
            JobExecutionPoller::new(&api, id()),
            Duration::from_secs(10),
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        );
        match poller
            .poll_until_done(&CancellationToken::new(), Duration::from_secs(3600))
            .await
        {
            Err(PollingError::Failed { message }) => {
                assert_eq!(message, "job step \"load\" finished as Failed: Login failed")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(api.executions.lock().unwrap().is_empty());
    }
}
