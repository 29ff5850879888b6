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

//! Azure Resource Manager provider for Terraform.
//!
//! Besides the plugin itself, the crate exposes the building blocks it is made of:
//! typed resource IDs, a long-running operation poller and a small ARM client.

pub mod client;
pub mod config;
pub mod custompollers;
pub mod ids;
pub mod polling;
pub mod provider;
pub mod resourceids;
pub mod services;
mod utils;

pub use provider::AzureRmProvider;
