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
use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::ids::mssql::JobId;
use crate::resourceids::validate_resource_id;
use crate::utils::{report_id_errors, WithValidate};

use super::state::{JobExecutionState, MAX_TIMEOUT_MINUTES};

#[async_trait]
impl<'a> WithValidate for JobExecutionState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(job_id) = &self.job_id {
            report_id_errors(
                diags,
                validate_resource_id::<JobId>(job_id),
                attr_path.clone().attribute("job_id"),
            );
        }
        if let Value::Value(minutes) = self.timeout_minutes {
            if !(1..=MAX_TIMEOUT_MINUTES).contains(&minutes) {
                diags.error(
                    "Invalid timeout",
                    format!(
                        "`timeout_minutes` must be between 1 and {MAX_TIMEOUT_MINUTES}, got {minutes}"
                    ),
                    attr_path.attribute("timeout_minutes"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    const JOB: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/rg/providers/Microsoft.Sql/servers/server1/jobAgents/agent1/jobs/job1";

    async fn errors(state: JobExecutionState<'_>) -> usize {
        let mut diags = Diagnostics::default();
        state.validate(&mut diags, AttributePath::default()).await;
        diags.errors.len()
    }

    #[tokio::test]
    async fn job_id_must_be_a_job() {
        let valid = JobExecutionState {
            job_id: Value::Value(Cow::Borrowed(JOB)),
            ..Default::default()
        };
        assert_eq!(errors(valid.clone()).await, 0);

        let server = JobExecutionState {
            job_id: Value::Value(Cow::Borrowed(
                "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/rg/providers/Microsoft.Sql/servers/server1",
            )),
            ..Default::default()
        };
        assert_eq!(errors(server).await, 1);

        let unknown = JobExecutionState {
            job_id: Value::Unknown,
            ..Default::default()
        };
        assert_eq!(errors(unknown).await, 0);

        let zero = JobExecutionState {
            timeout_minutes: Value::Value(0),
            ..valid.clone()
        };
        assert_eq!(errors(zero).await, 1);

        let week = JobExecutionState {
            timeout_minutes: Value::Value(MAX_TIMEOUT_MINUTES),
            ..valid.clone()
        };
        assert_eq!(errors(week).await, 0);

        for minutes in [MAX_TIMEOUT_MINUTES + 1, i64::MAX / 60, i64::MAX] {
            let huge = JobExecutionState {
                timeout_minutes: Value::Value(minutes),
                ..valid.clone()
            };
            assert_eq!(errors(huge).await, 1, "{minutes}");
        }
    }
}
