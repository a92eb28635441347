use std::collections::HashMap;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::json;

use crate::adapters::invoke::RandomInvoker;
use crate::runtime::aggregate::{AggregateSummary, BatchAggregator};
use crate::runtime::contract::{
    batch_fingerprint, build_requests, normalize_batch, BatchQuery, InvocationOutcome, RangeRequest,
    BATCH_SCHEMA_VERSION,
};
use crate::runtime::render::render_batch_body;

/// Every request path answers 200; invalid parameters yield an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextResponse {
    pub status_code: u16,
    pub body: String,
}

impl PlainTextResponse {
    fn empty() -> Self {
        Self {
            status_code: 200,
            body: String::new(),
        }
    }
}

pub fn batch_query_from_params(params: &HashMap<String, String>) -> BatchQuery {
    BatchQuery {
        min: integer_param(params, "min"),
        max: integer_param(params, "max"),
        count: integer_param(params, "count"),
    }
}

fn integer_param(params: &HashMap<String, String>, name: &str) -> Option<i64> {
    params
        .get(name)
        .and_then(|value| value.trim().parse::<i64>().ok())
}

/// Full pipeline for one web request: validate the query, fan out one
/// invocation per requested unit, aggregate the outcomes, render the body.
pub async fn handle_random_batch<I: RandomInvoker>(
    params: &HashMap<String, String>,
    invoker: &I,
) -> PlainTextResponse {
    let query = batch_query_from_params(params);
    let batch = match normalize_batch(query) {
        Ok(value) => value,
        Err(error) => {
            log_batch_error(
                "batch_rejected",
                json!({
                    "reason": error.message(),
                }),
            );
            return PlainTextResponse::empty();
        }
    };

    let fingerprint = batch_fingerprint(&batch);
    let requests = build_requests(&batch);
    log_batch_info(
        "batch_started",
        json!({
            "count": batch.count,
            "min": batch.range.min,
            "max": batch.range.max,
            "batch_fingerprint": fingerprint.clone(),
            "schema_version": BATCH_SCHEMA_VERSION,
        }),
    );

    let started_at = Instant::now();
    let summary = run_batch(invoker, &requests).await;
    log_batch_info(
        "batch_completed",
        json!({
            "attempted": summary.attempted,
            "succeeded": summary.succeeded,
            "failed": summary.failed_reasons.len(),
            "duration_ms": started_at.elapsed().as_millis(),
            "batch_fingerprint": fingerprint,
        }),
    );

    PlainTextResponse {
        status_code: 200,
        body: render_batch_body(&summary),
    }
}

/// Start every invocation concurrently and drain completions in arrival
/// order. All calls are issued immediately; there is no throttling, retry,
/// or cancellation.
pub async fn run_batch<I: RandomInvoker>(
    invoker: &I,
    requests: &[RangeRequest],
) -> AggregateSummary {
    let mut aggregator = BatchAggregator::new(requests.len());
    let mut pending: FuturesUnordered<_> = requests
        .iter()
        .map(|request| invoker.invoke_random(request))
        .collect();

    let mut summary = None;
    while let Some(result) = pending.next().await {
        let outcome = match result {
            Ok(value) => InvocationOutcome::Success(value),
            Err(reason) => {
                log_batch_error(
                    "invocation_failed",
                    json!({
                        "reason": reason.clone(),
                    }),
                );
                InvocationOutcome::Failure(reason)
            }
        };
        if let Some(completed) = aggregator.record(outcome) {
            summary = Some(completed);
        }
    }

    summary.unwrap_or_else(AggregateSummary::empty)
}

fn log_batch_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "batch_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_batch_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "batch_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
