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

use tf_provider::{AttributePath, DataSource, Diagnostics, Schema, ValueEmpty};

use crate::utils::{WithSchema, WithValidate};

use super::state::ResourceIdState;

/// `azurerm_resource_id`: parse an ID as a given type and expose its normalized form
#[derive(Debug, Default, Clone)]
pub struct ResourceIdDataSource;

#[async_trait]
impl DataSource for ResourceIdDataSource {
    type State<'a> = ResourceIdState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ResourceIdState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, AttributePath::default()).await;

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let kind = match config.kind() {
            Some(Ok(kind)) => kind,
            Some(Err(err)) => {
                diags.error(
                    "Invalid resource type",
                    err,
                    AttributePath::new("resource_type"),
                );
                return None;
            }
            None => {
                diags.error_short("`resource_type` must be known", AttributePath::new("resource_type"));
                return None;
            }
        };

        let parsed = match config.parse(kind) {
            Some(Ok(parsed)) => parsed,
            Some(Err(err)) => {
                diags.error("Invalid resource ID", err.to_string(), AttributePath::new("input"));
                return None;
            }
            None => {
                diags.error_short("`input` must be known", AttributePath::new("input"));
                return None;
            }
        };
        debug!(%kind, id = %parsed.id, "parsed resource ID");

        let mut state = config;
        state.fill(parsed);
        Some(state)
    }
}
