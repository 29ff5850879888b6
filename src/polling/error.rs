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

use thiserror::Error;

use crate::client::ApiError;

#[derive(Debug, Error)]
pub enum PollingError {
    /// The operation reached a failed terminal state
    #[error("polling failed: {message}")]
    Failed { message: String },

    #[error("polling was cancelled")]
    Cancelled,

    #[error("polling timed out after {0:?}")]
    TimedOut(Duration),

    #[error("the connection was dropped {attempts} times in a row while polling: {source}")]
    DroppedConnection {
        attempts: usize,
        #[source]
        source: ApiError,
    },

    #[error("polling: {0}")]
    Api(#[from] ApiError),
}
