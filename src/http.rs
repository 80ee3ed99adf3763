use std::thread;
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("request failed: {0}")]
    Status(StatusFailure),
    #[error("request failed after {attempts} attempt(s): {reason}")]
    Exhausted { attempts: usize, reason: String },
    #[error("request failed: response decode failed: {0}")]
    Decode(#[source] std::io::Error),
}

#[derive(Debug)]
pub(crate) struct StatusFailure {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl std::fmt::Display for StatusFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = self.body.trim();
        if body.is_empty() {
            write!(f, "HTTP status {}", self.status)
        } else {
            let truncated = body.chars().take(240).collect::<String>();
            write!(f, "HTTP status {} ({truncated})", self.status)
        }
    }
}

fn should_retry_http_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

/// Blocking JSON-over-HTTP getter with bounded retries.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    agent: ureq::Agent,
    attempts: usize,
    retry_delay: Duration,
}

impl HttpClient {
    pub(crate) fn new(
        connect_timeout: Duration,
        read_timeout: Duration,
        attempts: usize,
        retry_delay: Duration,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .timeout_write(read_timeout)
            .build();
        Self {
            agent,
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    pub(crate) fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let attempts = self.attempts;

        for attempt in 1..=attempts {
            let mut request = self.agent.get(url).set("Accept", "application/json");
            for (key, value) in query {
                request = request.query(key, value);
            }

            debug!("GET {url} (attempt {attempt}/{attempts})");
            match request.call() {
                Ok(response) => return response.into_string().map_err(FetchError::Decode),
                Err(ureq::Error::Status(status, response)) => {
                    let failure = StatusFailure {
                        status,
                        body: response.into_string().ok().unwrap_or_default(),
                    };
                    if !should_retry_http_status(status) {
                        return Err(FetchError::Status(failure));
                    }
                    if attempt < attempts {
                        warn!("GET {url} returned {status}, retrying");
                        thread::sleep(self.retry_delay);
                        continue;
                    }
                    return Err(FetchError::Exhausted {
                        attempts,
                        reason: failure.to_string(),
                    });
                }
                Err(ureq::Error::Transport(err)) => {
                    if attempt < attempts {
                        warn!("GET {url} transport error: {err}, retrying");
                        thread::sleep(self.retry_delay);
                        continue;
                    }
                    return Err(FetchError::Exhausted {
                        attempts,
                        reason: format!("transport error: {err}"),
                    });
                }
            }
        }

        Err(FetchError::Exhausted {
            attempts,
            reason: "no attempt produced a response".to_string(),
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(3),
            Duration::from_secs(10),
            3,
            Duration::from_millis(500),
        )
    }
}
