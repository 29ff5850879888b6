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

use crate::client::logic::WorkflowRunActionsApi;
use crate::ids::logic::WorkflowRunActionId;
use crate::polling::{PollResult, PollerType, PollingError, PollingStatus};

pub struct WorkflowRunActionPoller<'a, C: ?Sized> {
    client: &'a C,
    id: WorkflowRunActionId,
}

impl<'a, C: WorkflowRunActionsApi + ?Sized> WorkflowRunActionPoller<'a, C> {
    pub fn new(client: &'a C, id: WorkflowRunActionId) -> Self {
        Self { client, id }
    }
}

pub fn run_action_status(status: &str) -> PollingStatus {
    match status {
        "Running" | "Waiting" | "Paused" | "Suspended" | "NotSpecified" => PollingStatus::InProgress,
        "Succeeded" | "Skipped" | "Ignored" => PollingStatus::Succeeded,
        "Failed" | "Faulted" | "Aborted" | "Cancelled" | "TimedOut" => PollingStatus::Failed,
        _ => PollingStatus::Unknown,
    }
}

#[async_trait]
impl<'a, C: WorkflowRunActionsApi + ?Sized> PollerType for WorkflowRunActionPoller<'a, C> {
    async fn poll(&self) -> Result<PollResult, PollingError> {
        let action = self.client.get(&self.id).await?;
        let Some(state) = action.status() else {
            return Ok(PollResult::new(PollingStatus::Unknown));
        };
        let status = run_action_status(state);
        debug!(id = %self.id.id(), state, %status, "workflow run action");

        if status != PollingStatus::Failed {
            return Ok(PollResult::new(status));
        }
        Ok(PollResult::failed(match action.error_message() {
            Some(message) => format!("action {:?} finished as {state}: {message}", self.id.action_name),
            None => format!("action {:?} finished as {state}", self.id.action_name),
        }))
    }
}
