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

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{PollResult, PollerType, PollingError, PollingStatus};

/// Transient connection failures tolerated in a row before polling gives up
pub const DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW: usize = 3;

/// Drives a [`PollerType`] until it reaches a terminal status.
///
/// The poller waits `interval` before every poll, unless the previous poll
/// asked for a different delay. There is no backoff.
#[derive(Debug)]
pub struct Poller<P> {
    poller_type: P,
    interval: Duration,
    max_dropped_connections: usize,
}

impl<P: PollerType> Poller<P> {
    pub fn new(poller_type: P, interval: Duration, max_dropped_connections: usize) -> Self {
        Self {
            poller_type,
            interval,
            max_dropped_connections,
        }
    }

    /// Poll until the operation succeeds or fails, `cancel` is triggered, or `timeout` elapses.
    /// A timeout too large to be represented as an instant never elapses.
    pub async fn poll_until_done(
        &self,
        cancel: &CancellationToken,
        timeout: Duration,
    ) -> Result<PollResult, PollingError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut interval = self.interval;
        let mut dropped_connections = 0;

        loop {
            self.wait(interval, cancel, deadline, timeout).await?;

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(PollingError::Cancelled),
                _ = expire(deadline) => return Err(PollingError::TimedOut(timeout)),
                result = self.poller_type.poll() => result,
            };

            let result = match result {
                Ok(result) => {
                    dropped_connections = 0;
                    result
                }
                Err(PollingError::Api(err)) if err.is_dropped_connection() => {
                    dropped_connections += 1;
                    if dropped_connections > self.max_dropped_connections {
                        return Err(PollingError::DroppedConnection {
                            attempts: dropped_connections,
                            source: err,
                        });
                    }
                    warn!(
                        attempt = dropped_connections,
                        max = self.max_dropped_connections,
                        "connection dropped while polling: {err}"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };

            debug!(status = %result.status, "polled long-running operation");
            match result.status {
                PollingStatus::Succeeded => return Ok(result),
                PollingStatus::Failed => {
                    return Err(PollingError::Failed {
                        message: result
                            .message
                            .unwrap_or_else(|| "the operation failed".to_owned()),
                    })
                }
                PollingStatus::InProgress | PollingStatus::Unknown => {
                    interval = result.poll_interval.unwrap_or(self.interval);
                }
            }
        }
    }

    async fn wait(
        &self,
        interval: Duration,
        cancel: &CancellationToken,
        deadline: Option<Instant>,
        timeout: Duration,
    ) -> Result<(), PollingError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(PollingError::Cancelled),
            _ = expire(deadline) => Err(PollingError::TimedOut(timeout)),
            _ = tokio::time::sleep(interval) => Ok(()),
        }
    }
}

async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::ApiError;

    #[derive(Default)]
    struct Scripted {
        results: Mutex<VecDeque<Result<PollResult, PollingError>>>,
        polls: AtomicUsize,
    }

    impl Scripted {
        fn new(results: Vec<Result<PollResult, PollingError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                polls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PollerType for Scripted {
        async fn poll(&self) -> Result<PollResult, PollingError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(PollResult::new(PollingStatus::InProgress)))
        }
    }

    fn dropped() -> Result<PollResult, PollingError> {
        Err(PollingError::Api(ApiError::Transport {
            url: "https://management.azure.com/".to_owned(),
            message: "connection reset".to_owned(),
        }))
    }

    const INTERVAL: Duration = Duration::from_secs(10);
    const TIMEOUT: Duration = Duration::from_secs(3600);

    #[tokio::test(start_paused = true)]
    async fn continues_until_succeeded() {
        let poller = Poller::new(
            Scripted::new(vec![
                Ok(PollResult::new(PollingStatus::InProgress)),
                Ok(PollResult::new(PollingStatus::Unknown)),
                Ok(PollResult::new(PollingStatus::InProgress)),
                Ok(PollResult::new(PollingStatus::Succeeded)),
            ]),
            INTERVAL,
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        );

        let start = Instant::now();
        let result = poller
            .poll_until_done(&CancellationToken::new(), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(result.status, PollingStatus::Succeeded);
        assert_eq!(poller.poller_type.polls.load(Ordering::SeqCst), 4);
        assert!(start.elapsed() >= INTERVAL * 4);
        assert!(start.elapsed() < INTERVAL * 5);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_carries_message() {
        let poller = Poller::new(
            Scripted::new(vec![
                Ok(PollResult::new(PollingStatus::InProgress)),
                Ok(PollResult::failed("step 2 failed")),
            ]),
            INTERVAL,
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        );

        match poller
            .poll_until_done(&CancellationToken::new(), TIMEOUT)
            .await
        {
            Err(PollingError::Failed { message }) => assert_eq!(message, "step 2 failed"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn honours_requested_interval() {
        let poller = Poller::new(
            Scripted::new(vec![
                Ok(PollResult::new(PollingStatus::InProgress)
                    .with_poll_interval(Duration::from_secs(60))),
                Ok(PollResult::new(PollingStatus::Succeeded)),
            ]),
            INTERVAL,
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        );

        let start = Instant::now();
        poller
            .poll_until_done(&CancellationToken::new(), TIMEOUT)
            .await
            .unwrap();
        assert!(start.elapsed() >= INTERVAL + Duration::from_secs(60));
        assert!(start.elapsed() < INTERVAL * 2 + Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out() {
        let poller = Poller::new(
            Scripted::default(),
            INTERVAL,
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        );

        let result = poller
            .poll_until_done(&CancellationToken::new(), Duration::from_secs(35))
            .await;
        assert!(matches!(result, Err(PollingError::TimedOut(_))));
        assert_eq!(poller.poller_type.polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_timeout() {
        let poller = Poller::new(
            Scripted::new(vec![
                Ok(PollResult::new(PollingStatus::InProgress)),
                Ok(PollResult::new(PollingStatus::Succeeded)),
            ]),
            INTERVAL,
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        );

        let result = poller
            .poll_until_done(&CancellationToken::new(), Duration::MAX)
            .await
            .unwrap();
        assert_eq!(result.status, PollingStatus::Succeeded);
        assert_eq!(poller.poller_type.polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_polling() {
        let poller = Poller::new(
            Scripted::default(),
            INTERVAL,
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        );
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(25)).await;
            trigger.cancel();
        });

        let result = poller.poll_until_done(&cancel, TIMEOUT).await;
        assert!(matches!(result, Err(PollingError::Cancelled)));
        assert_eq!(poller.poller_type.polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tolerates_some_dropped_connections() {
        let poller = Poller::new(
            Scripted::new(vec![
                dropped(),
                dropped(),
                Ok(PollResult::new(PollingStatus::InProgress)),
                dropped(),
                Ok(PollResult::new(PollingStatus::Succeeded)),
            ]),
            INTERVAL,
            2,
        );
        assert!(poller
            .poll_until_done(&CancellationToken::new(), TIMEOUT)
            .await
            .is_ok());

        let poller = Poller::new(
            Scripted::new(vec![dropped(), dropped(), dropped()]),
            INTERVAL,
            2,
        );
        let result = poller
            .poll_until_done(&CancellationToken::new(), TIMEOUT)
            .await;
        assert!(matches!(
            result,
            Err(PollingError::DroppedConnection { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn other_api_errors_abort() {
        let poller = Poller::new(
            Scripted::new(vec![Err(PollingError::Api(ApiError::Status {
                url: "https://management.azure.com/".to_owned(),
                status: 404,
                code: "ResourceNotFound".to_owned(),
                message: "gone".to_owned(),
            }))]),
            INTERVAL,
            DEFAULT_NUMBER_OF_DROPPED_CONNECTIONS_TO_ALLOW,
        );
        let result = poller
            .poll_until_done(&CancellationToken::new(), TIMEOUT)
            .await;
        assert!(matches!(result, Err(PollingError::Api(_))));
        assert_eq!(poller.poller_type.polls.load(Ordering::SeqCst), 1);
    }
}
