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

use super::error::ResourceIdError;

/// Generic key/value view of an ARM resource ID.
///
/// Used by the few hand-written parsers that predate the segment grammar.
/// Keys are looked up by position pairs: `/{key}/{value}/{key}/{value}...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureResourceId {
    pub id_type: &'static str,
    pub input: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub provider: String,
    path: Vec<(String, String)>,
}

impl AzureResourceId {
    pub fn parse(id_type: &'static str, input: &str) -> Result<Self, ResourceIdError> {
        if input.is_empty() {
            return Err(ResourceIdError::Empty { id_type });
        }

        let trimmed = input.trim_start_matches('/');
        let components = trimmed.split('/').collect::<Vec<_>>();
        if components.len() % 2 != 0 {
            return Err(ResourceIdError::malformed(
                id_type,
                input,
                "the number of path segments is not divisible by 2",
            ));
        }

        let mut id = Self {
            id_type,
            input: input.to_owned(),
            subscription_id: String::new(),
            resource_group: String::new(),
            provider: String::new(),
            path: Vec::new(),
        };

        for pair in components.chunks(2) {
            let (key, value) = (pair[0], pair[1]);
            if key.is_empty() {
                return Err(ResourceIdError::malformed(
                    id_type,
                    input,
                    "found an empty key in the path",
                ));
            }
            if value.is_empty() {
                return Err(ResourceIdError::malformed(
                    id_type,
                    input,
                    format!("key {key:?} has no value"),
                ));
            }

            match key {
                "subscriptions" if id.subscription_id.is_empty() => {
                    id.subscription_id = value.to_owned()
                }
                k if k.eq_ignore_ascii_case("resourceGroups") && id.resource_group.is_empty() => {
                    id.resource_group = value.to_owned()
                }
                "providers" if id.provider.is_empty() => id.provider = value.to_owned(),
                _ => id.path.push((key.to_owned(), value.to_owned())),
            }
        }

        if id.subscription_id.is_empty() {
            return Err(ResourceIdError::malformed(
                id_type,
                input,
                "no subscription ID found",
            ));
        }

        Ok(id)
    }

    /// Remove and return the value stored under `key`
    pub fn pop_segment(&mut self, key: &str) -> Result<String, ResourceIdError> {
        self.pop_matching(key, |k| k == key)
    }

    /// Same as [`Self::pop_segment`], ignoring the casing of `key`.
    ///
    /// Only meant for keys the API is known to return with inconsistent casing.
    pub fn pop_segment_insensitively(&mut self, key: &str) -> Result<String, ResourceIdError> {
        self.pop_matching(key, |k| k.eq_ignore_ascii_case(key))
    }

    fn pop_matching(
        &mut self,
        key: &str,
        predicate: impl Fn(&str) -> bool,
    ) -> Result<String, ResourceIdError> {
        match self.path.iter().position(|(k, _)| predicate(k)) {
            Some(position) => Ok(self.path.remove(position).1),
            None => Err(ResourceIdError::malformed(
                self.id_type,
                self.input.clone(),
                format!("ID was missing the `{key}` element"),
            )),
        }
    }

    /// Fail when segments were left over after every expected key was popped
    pub fn validate_no_remaining_segments(&self) -> Result<(), ResourceIdError> {
        if self.path.is_empty() {
            Ok(())
        } else {
            Err(ResourceIdError::malformed(
                self.id_type,
                self.input.clone(),
                format!(
                    "ID contained more segments than required: {}",
                    self.path
                        .iter()
                        .map(|(k, v)| format!("{k}/{v}"))
                        .collect::<Vec<_>>()
                        .join("/")
                ),
            ))
        }
    }
}
