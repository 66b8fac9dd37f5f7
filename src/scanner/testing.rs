//! Scripted [`ScanService`] for exercising the form without a network.

use std::{collections::HashMap, time::Duration};

use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::domain::{ScanRequest, ScanResult};

use super::{ScanError, ScanService};

#[derive(Clone)]
pub enum Reply {
    Verdict(ScanResult),
    Fail,
    After(Duration, Box<Reply>),
    Hang,
}

/// Answers by URL; unknown URLs fail with a 503.
#[derive(Default)]
pub struct ScriptedService {
    replies: HashMap<String, Reply>,
    seen: Mutex<Vec<ScanRequest>>,
}

impl ScriptedService {
    pub fn with(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<ScanRequest> {
        self.seen.lock().clone()
    }
}

impl ScanService for ScriptedService {
    fn scan(&self, request: ScanRequest) -> BoxFuture<'_, Result<ScanResult, ScanError>> {
        self.seen.lock().push(request.clone());
        let reply = self
            .replies
            .get(&request.url)
            .cloned()
            .unwrap_or(Reply::Fail);
        Box::pin(async move {
            let mut reply = reply;
            loop {
                match reply {
                    Reply::Verdict(result) => return Ok(result),
                    Reply::Fail => return Err(ScanError::Status(503)),
                    Reply::After(delay, next) => {
                        tokio::time::sleep(delay).await;
                        reply = *next;
                    }
                    Reply::Hang => return std::future::pending().await,
                }
            }
        })
    }
}

pub fn verdict(risk: &str, score: f64, reasons: &[&str]) -> ScanResult {
    ScanResult {
        risk: risk.to_string(),
        score,
        reasons: reasons.iter().map(|r| r.to_string()).collect(),
    }
}
