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

//! Logic App workflow run actions.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ApiError, ArmClient};
use crate::ids::logic::WorkflowRunActionId;

pub const API_VERSION: &str = "2019-05-01";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkflowRunAction {
    pub id: Option<String>,
    pub name: Option<String>,
    pub properties: Option<WorkflowRunActionProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunActionProperties {
    pub status: Option<String>,
    pub code: Option<String>,
    /// Free-form error object, usually `{"code": ..., "message": ...}`
    pub error: Option<serde_json::Value>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl WorkflowRunAction {
    pub fn status(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.status.as_deref())
    }

    /// Most specific description of a failure
    pub fn error_message(&self) -> Option<String> {
        let properties = self.properties.as_ref()?;
        let field = |name: &str| {
            properties
                .error
                .as_ref()
                .and_then(|error| error.get(name))
                .and_then(serde_json::Value::as_str)
                .filter(|value| !value.is_empty())
        };
        match (field("code"), field("message")) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (None, Some(message)) => Some(message.to_owned()),
            (Some(code), None) => Some(code.to_owned()),
            (None, None) => properties
                .code
                .as_deref()
                .filter(|code| !code.is_empty())
                .map(str::to_owned),
        }
    }
}

#[async_trait]
pub trait WorkflowRunActionsApi: Send + Sync {
    async fn get(&self, id: &WorkflowRunActionId) -> Result<WorkflowRunAction, ApiError>;
}

#[async_trait]
impl WorkflowRunActionsApi for ArmClient {
    async fn get(&self, id: &WorkflowRunActionId) -> Result<WorkflowRunAction, ApiError> {
        self.get_json(&id.id(), API_VERSION).await
    }
}
