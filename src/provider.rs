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

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use tf_provider::value::Value;
use tf_provider::{map, AttributePath, Provider, ValueEmpty};

use crate::client::ArmClient;
use crate::config::{ClientConfig, ProviderConfig};
use crate::services::mssql::JobExecutionResource;
use crate::services::resourceid::ResourceIdDataSource;
use crate::utils::WithSchema;

/// Client shared by every resource, set once the provider is configured
#[derive(Debug, Default, Clone)]
pub struct ClientHandle(Arc<RwLock<Option<Arc<ArmClient>>>>);

impl ClientHandle {
    pub async fn set(&self, client: ArmClient) {
        *self.0.write().await = Some(Arc::new(client));
    }

    pub async fn get(&self) -> anyhow::Result<Arc<ArmClient>> {
        self.0
            .read()
            .await
            .clone()
            .ok_or_else(|| anyhow!("the azurerm provider has not been configured"))
    }
}

#[derive(Debug, Default, Clone)]
pub struct AzureRmProvider {
    client: ClientHandle,
}

#[async_trait]
impl Provider for AzureRmProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut tf_provider::Diagnostics) -> Option<tf_provider::Schema> {
        Some(ProviderConfig::schema())
    }

    async fn validate<'a>(
        &self,
        diags: &mut tf_provider::Diagnostics,
        config: Self::Config<'a>,
    ) -> Option<()> {
        if let Value::Value(max_retries) = config.max_retries {
            if max_retries < 0 {
                diags.error(
                    "Invalid max_retries",
                    format!("`max_retries` must not be negative, got {max_retries}"),
                    AttributePath::new("max_retries"),
                );
            }
        }
        if let Value::Value(endpoint) = &config.resource_manager_endpoint {
            if let Err(err) = url::Url::parse(endpoint) {
                diags.error(
                    "Invalid resource manager endpoint",
                    format!("{endpoint:?}: {err}"),
                    AttributePath::new("resource_manager_endpoint"),
                );
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut tf_provider::Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        debug!(%terraform_version, "configuring provider");
        let resolved = match ClientConfig::from_env(&config) {
            Ok(resolved) => resolved,
            Err(err) => {
                diags.error(
                    "Invalid provider configuration",
                    err.to_string(),
                    AttributePath::new(err.attribute()),
                );
                return None;
            }
        };
        let client = match ArmClient::new(&resolved) {
            Ok(client) => client,
            Err(err) => {
                diags.root_error("Failed to create the Azure Resource Manager client", err.to_string());
                return None;
            }
        };
        info!(endpoint = %client.endpoint(), "provider configured");
        self.client.set(client).await;
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut tf_provider::Diagnostics,
    ) -> Option<std::collections::HashMap<String, Box<dyn tf_provider::resource::DynamicResource>>>
    {
        Some(map! {
            "mssql_job_execution" => JobExecutionResource::new(self.client.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut tf_provider::Diagnostics,
    ) -> Option<
        std::collections::HashMap<String, Box<dyn tf_provider::data_source::DynamicDataSource>>,
    > {
        Some(map! {
            "resource_id" => ResourceIdDataSource,
        })
    }
}
