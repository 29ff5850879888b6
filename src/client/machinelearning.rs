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

//! Machine Learning workspace computes.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ApiError, ArmClient};
use crate::ids::machinelearning::ComputeId;

pub const API_VERSION: &str = "2024-04-01";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComputeResource {
    pub id: Option<String>,
    pub name: Option<String>,
    pub properties: Option<Compute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compute {
    pub compute_type: Option<String>,
    pub provisioning_state: Option<String>,
    #[serde(default)]
    pub provisioning_errors: Option<Vec<ErrorResponse>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl ComputeResource {
    pub fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|compute| compute.provisioning_state.as_deref())
    }

    /// Provisioning errors, formatted as `code: message`
    pub fn provisioning_errors(&self) -> Vec<String> {
        self.properties
            .iter()
            .flat_map(|compute| compute.provisioning_errors.iter().flatten())
            .filter_map(|response| response.error.as_ref())
            .map(|error| match (error.code.as_deref(), error.message.as_deref()) {
                (Some(code), Some(message)) => format!("{code}: {message}"),
                (Some(code), None) => code.to_owned(),
                (None, Some(message)) => message.to_owned(),
                (None, None) => String::from("unknown error"),
            })
            .collect()
    }
}

#[async_trait]
pub trait MachineLearningComputeApi: Send + Sync {
    async fn get(&self, id: &ComputeId) -> Result<ComputeResource, ApiError>;
}

#[async_trait]
impl MachineLearningComputeApi for ArmClient {
    async fn get(&self, id: &ComputeId) -> Result<ComputeResource, ApiError> {
        self.get_json(&id.id(), API_VERSION).await
    }
}
