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

//! Poll-until-terminal-state loop for long-running operations.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;

mod error;
mod poller;

pub use error::PollingError;
pub use poller::{Poller, DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW};

/// Status reported by a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollingStatus {
    InProgress,
    /// The state could not be mapped; polling continues
    Unknown,
    Succeeded,
    Failed,
}

impl PollingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl Display for PollingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::InProgress => "InProgress",
            Self::Unknown => "Unknown",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    pub status: PollingStatus,
    /// Overrides the poller interval for the next poll
    pub poll_interval: Option<Duration>,
    /// Diagnostic attached to a failure
    pub message: Option<String>,
}

impl PollResult {
    pub fn new(status: PollingStatus) -> Self {
        Self {
            status,
            poll_interval: None,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: PollingStatus::Failed,
            poll_interval: None,
            message: Some(message.into()),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }
}

/// A single long-running operation that can report its current status
#[async_trait]
pub trait PollerType: Send + Sync {
    async fn poll(&self) -> Result<PollResult, PollingError>;
}
