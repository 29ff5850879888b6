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

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tf_provider::value::{Value, ValueMap, ValueNumber, ValueString};
use tf_provider::{map, Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};

use crate::utils::{ValueExt, WithSchema};

pub(super) const DEFAULT_TIMEOUT_MINUTES: i64 = 60;
/// One week
pub(super) const MAX_TIMEOUT_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct JobExecutionState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub job_id: ValueString<'a>,
    pub wait_for_completion: Value<bool>,
    pub timeout_minutes: ValueNumber,
    #[serde(borrow = "'a")]
    pub lifecycle: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub triggers: ValueMap<'a, ValueString<'a>>,
}

impl<'a> JobExecutionState<'a> {
    pub(super) fn wait_for_completion(&self) -> bool {
        self.wait_for_completion.known_or(true)
    }

    pub(super) fn timeout_minutes(&self) -> i64 {
        match self.timeout_minutes {
            Value::Value(minutes) => minutes,
            _ => DEFAULT_TIMEOUT_MINUTES,
        }
    }

    /// Saturates instead of overflowing on out of range values
    pub(super) fn timeout(&self) -> Duration {
        u64::try_from(self.timeout_minutes())
            .ok()
            .and_then(|minutes| minutes.checked_mul(60))
            .map_or(Duration::MAX, Duration::from_secs)
    }
}

impl<'a> WithSchema for JobExecutionState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("ID of the job execution"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "job_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("ID of the elastic job to execute"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "wait_for_completion" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain("Wait for the execution to finish, and fail if it does not succeed (default true)"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "timeout_minutes" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain(format!("How long to wait for the execution, at most {MAX_TIMEOUT_MINUTES} (default {DEFAULT_TIMEOUT_MINUTES})")),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "lifecycle" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Last known lifecycle of the execution"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "triggers" => Attribute {
                        attr_type: AttributeType::Map(AttributeType::String.into()),
                        description: Description::plain("Arbitrary values that start a new execution when changed"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("Execution of an Azure SQL elastic job"),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout() {
        let mut state = JobExecutionState::default();
        assert_eq!(state.timeout(), Duration::from_secs(3600));

        state.timeout_minutes = Value::Value(5);
        assert_eq!(state.timeout(), Duration::from_secs(300));

        state.timeout_minutes = Value::Value(i64::MAX);
        assert_eq!(state.timeout(), Duration::MAX);

        state.timeout_minutes = Value::Value(-1);
        assert_eq!(state.timeout(), Duration::MAX);
    }
}
