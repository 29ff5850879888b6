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
use tracing::debug;

use crate::client::machinelearning::MachineLearningComputeApi;
use crate::ids::machinelearning::ComputeId;
use crate::polling::{PollResult, PollerType, PollingError, PollingStatus};

/// Waits for a Machine Learning compute to settle after a create, update or delete
pub struct ComputePoller<'a, C: ?Sized> {
    client: &'a C,
    id: ComputeId,
}

impl<'a, C: MachineLearningComputeApi + ?Sized> ComputePoller<'a, C> {
    pub fn new(client: &'a C, id: ComputeId) -> Self {
        Self { client, id }
    }
}

pub fn provisioning_status(state: &str) -> PollingStatus {
    match state {
        "Creating" | "Updating" | "Deleting" => PollingStatus::InProgress,
        "Succeeded" => PollingStatus::Succeeded,
        "Failed" | "Canceled" => PollingStatus::Failed,
        _ => PollingStatus::Unknown,
    }
}

#[async_trait]
impl<'a, C: MachineLearningComputeApi + ?Sized> PollerType for ComputePoller<'a, C> {
    async fn poll(&self) -> Result<PollResult, PollingError> {
        let compute = self.client.get(&self.id).await?;
        let state = compute.provisioning_state().unwrap_or("Unknown");
        let status = provisioning_status(state);
        debug!(id = %self.id.id(), state, %status, "machine learning compute");

        if status != PollingStatus::Failed {
            return Ok(PollResult::new(status));
        }
        let errors = compute.provisioning_errors();
        Ok(PollResult::failed(if errors.is_empty() {
            format!("compute provisioning finished as {state}")
        } else {
            format!(
                "compute provisioning finished as {state}: {}",
                errors.join("; ")
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::client::machinelearning::ComputeResource;
    use crate::client::ApiError;

    struct FakeCompute(Mutex<Vec<serde_json::Value>>);

    #[async_trait]
    impl MachineLearningComputeApi for FakeCompute {
        async fn get(&self, _id: &ComputeId) -> Result<ComputeResource, ApiError> {
            let body = self.0.lock().unwrap().remove(0);
            Ok(serde_json::from_value(body).unwrap())
        }
    }

    fn id() -> ComputeId {
        ComputeId::new("sub", "rg", "workspace", "cluster")
    }

    #[test]
    fn provisioning_mapping() {
        for (state, status) in [
            ("Creating", PollingStatus::InProgress),
            ("Updating", PollingStatus::InProgress),
            ("Deleting", PollingStatus::InProgress),
            ("Succeeded", PollingStatus::Succeeded),
            ("Failed", PollingStatus::Failed),
            ("Canceled", PollingStatus::Failed),
            ("Unknown", PollingStatus::Unknown),
            ("Resizing", PollingStatus::Unknown),
        ] {
            assert_eq!(provisioning_status(state), status, "{state}");
        }
    }

    #[tokio::test]
    async fn polls_until_failure() {
        let api = FakeCompute(Mutex::new(vec![
            serde_json::json!({"properties": {"provisioningState": "Creating"}}),
            serde_json::json!({"properties": {}}),
            serde_json::json!({"properties": {
                "provisioningState": "Failed",
                "provisioningErrors": [{"error": {"code": "QuotaExceeded", "message": "Not enough cores"}}]
            }}),
            serde_json::json!({"properties": {"provisioningState": "Canceled"}}),
        ]));
        let poller = ComputePoller::new(&api, id());

        assert_eq!(poller.poll().await.unwrap().status, PollingStatus::InProgress);
        assert_eq!(poller.poll().await.unwrap().status, PollingStatus::Unknown);

        let failed = poller.poll().await.unwrap();
        assert_eq!(failed.status, PollingStatus::Failed);
        assert_eq!(
            failed.message.as_deref(),
            Some("compute provisioning finished as Failed: QuotaExceeded: Not enough cores")
        );

        let canceled = poller.poll().await.unwrap();
        assert_eq!(
            canceled.message.as_deref(),
            Some("compute provisioning finished as Canceled")
        );
    }
}
