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

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use tf_provider::value::{Value, ValueEmpty, ValueString};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::client::mssql::JobExecution;
use crate::client::ArmClient;
use crate::ids::mssql::{JobExecutionId, JobId};
use crate::provider::ClientHandle;
use crate::utils::{WithNormalize, WithSchema, WithValidate};

use super::execution::{
    cancel_if_running, foreign_subscription, refresh, refresh_after_failure, start_execution,
    wait_for_execution,
};
use super::state::JobExecutionState;

/// `azurerm_mssql_job_execution`: run an elastic job once per create or trigger change
#[derive(Debug, Default, Clone)]
pub struct JobExecutionResource {
    client: ClientHandle,
}

impl JobExecutionResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    async fn client(&self, diags: &mut Diagnostics) -> Option<Arc<ArmClient>> {
        match self.client.get().await {
            Ok(client) => Some(client),
            Err(err) => {
                diags.root_error("Provider is not configured", format!("{err:#}"));
                None
            }
        }
    }
}

fn lifecycle_value<'a>(execution: &JobExecution) -> ValueString<'a> {
    match execution.lifecycle() {
        Some(lifecycle) => Value::Value(Cow::Owned(lifecycle.to_string())),
        None => Value::Null,
    }
}

fn parse_job(diags: &mut Diagnostics, state: &JobExecutionState<'_>) -> Option<JobId> {
    match JobId::parse(state.job_id.as_str()) {
        Ok(job) => Some(job),
        Err(err) => {
            diags.error("Invalid job ID", err.to_string(), AttributePath::new("job_id"));
            None
        }
    }
}

fn parse_execution(diags: &mut Diagnostics, state: &JobExecutionState<'_>) -> Option<JobExecutionId> {
    match JobExecutionId::parse(state.id.as_str()) {
        Ok(id) => Some(id),
        Err(err) => {
            diags.error("Invalid job execution ID", err.to_string(), AttributePath::new("id"));
            None
        }
    }
}

#[async_trait]
impl Resource for JobExecutionResource {
    type State<'a> = JobExecutionState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(JobExecutionState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, Default::default()).await;

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = parse_execution(diags, &state)?;
        let client = self.client(diags).await?;

        let mut state = state;
        match refresh(client.as_ref(), &id).await {
            Ok(Some(execution)) => state.lifecycle = lifecycle_value(&execution),
            Ok(None) => {
                diags.root_warning(
                    "Job execution not found",
                    format!("{id} no longer exists, its lifecycle is unknown"),
                );
                state.lifecycle = Value::Null;
            }
            Err(err) => {
                diags.root_error("Failed to read job execution", format!("{err:#}"));
                return None;
            }
        }

        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.id = ValueString::Unknown;
        state.lifecycle = ValueString::Unknown;
        state.normalize(diags);

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        let mut trigger_replace = Vec::new();
        if proposed_state.job_id != prior_state.job_id {
            trigger_replace.push(AttributePath::new("job_id"));
        }
        if proposed_state.triggers != prior_state.triggers {
            trigger_replace.push(AttributePath::new("triggers"));
        }

        let mut state = proposed_state;
        if trigger_replace.is_empty() {
            state.id = prior_state.id;
            state.lifecycle = prior_state.lifecycle;
        } else {
            state.id = Value::Unknown;
            state.lifecycle = Value::Unknown;
        }
        state.normalize(diags);

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        _prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        Some(())
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let job = parse_job(diags, &planned_state)?;
        let client = self.client(diags).await?;
        if let Some(detail) = foreign_subscription(client.subscription_id(), &job) {
            diags.root_warning("Job outside the configured subscription", detail);
        }

        let (id, created) = match start_execution(client.as_ref(), &job).await {
            Ok(started) => started,
            Err(err) => {
                diags.error(
                    "Failed to start job execution",
                    format!("{err:#}"),
                    AttributePath::new("job_id"),
                );
                return None;
            }
        };

        let mut state = planned_state;
        state.id = Value::Value(Cow::Owned(id.id()));
        state.lifecycle = lifecycle_value(&created);

        if state.wait_for_completion() {
            let timeout = state.timeout();
            match wait_for_execution(client.as_ref(), &id, timeout, &CancellationToken::new()).await
            {
                Ok(execution) => state.lifecycle = lifecycle_value(&execution),
                Err(err) => {
                    // The execution exists: keep it in state so it gets replaced
                    diags.root_error("Job execution did not succeed", format!("{err:#}"));
                    if let Some(execution) = refresh_after_failure(client.as_ref(), &id).await {
                        state.lifecycle = lifecycle_value(&execution);
                    }
                }
            }
        }

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        // Only wait_for_completion and timeout_minutes can change in place
        Some((planned_state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let id = parse_execution(diags, &state)?;
        let client = self.client(diags).await?;

        if let Err(err) = cancel_if_running(client.as_ref(), &id).await {
            warn!("{err:#}");
            diags.root_error("Failed to cancel job execution", format!("{err:#}"));
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = match JobExecutionId::parse(&id) {
            Ok(id) => id,
            Err(err) => {
                diags.root_error("Invalid job execution ID", err.to_string());
                return None;
            }
        };

        let state = JobExecutionState {
            id: Value::Value(Cow::Owned(id.id())),
            job_id: Value::Value(Cow::Owned(id.job_id().id())),
            wait_for_completion: Value::Null,
            timeout_minutes: Value::Null,
            lifecycle: Value::Unknown,
            triggers: Value::Null,
        };
        Some((state, Default::default()))
    }
}
