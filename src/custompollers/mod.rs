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

//! Pollers for long-running operations whose status lives on the resource itself.

mod logic_workflow_run_action;
mod machine_learning_compute;
mod mssql_job_execution;

pub use logic_workflow_run_action::{run_action_status, WorkflowRunActionPoller};
pub use machine_learning_compute::{provisioning_status, ComputePoller};
pub use mssql_job_execution::{lifecycle_status, JobExecutionPoller};
