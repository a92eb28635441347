use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const BATCH_SCHEMA_VERSION: &str = "v1";

/// Wire payload sent to the remote random-number function.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeRequest {
    pub min: i64,
    pub max: i64,
}

/// Raw query parameters as extracted from the URL. A parameter that is
/// absent or does not parse as an integer stays `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchQuery {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedBatch {
    pub range: RangeRequest,
    pub count: usize,
}

/// Terminal result of one remote invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    Success(serde_json::Number),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn normalize_batch(query: BatchQuery) -> Result<NormalizedBatch, ValidationError> {
    let Some(count) = query.count else {
        return Err(ValidationError::new("count must be an integer"));
    };

    if count <= 0 {
        return Err(ValidationError::new("count must be a positive integer"));
    }

    let Some(min) = query.min else {
        return Err(ValidationError::new("min must be an integer"));
    };

    let Some(max) = query.max else {
        return Err(ValidationError::new("max must be an integer"));
    };

    if max < min {
        return Err(ValidationError::new(format!(
            "max={max} must be greater than or equal to min={min}"
        )));
    }

    Ok(NormalizedBatch {
        range: RangeRequest { min, max },
        count: count as usize,
    })
}

/// Every unit of a batch carries the same range.
pub fn build_requests(batch: &NormalizedBatch) -> Vec<RangeRequest> {
    vec![batch.range; batch.count]
}

pub fn batch_fingerprint(batch: &NormalizedBatch) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stable_contract_json(batch));
    format!("{:x}", hasher.finalize())
}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_batch_rejects_missing_count() {
        let query = BatchQuery {
            min: Some(1),
            max: Some(10),
            count: None,
        };

        let error = normalize_batch(query).expect_err("query should fail");
        assert_eq!(error.message(), "count must be an integer");
    }

    #[test]
    fn normalize_batch_rejects_zero_count() {
        let query = BatchQuery {
            min: Some(1),
            max: Some(10),
            count: Some(0),
        };

        let error = normalize_batch(query).expect_err("query should fail");
        assert_eq!(error.message(), "count must be a positive integer");
    }

    #[test]
    fn normalize_batch_rejects_negative_count() {
        let query = BatchQuery {
            min: Some(1),
            max: Some(10),
            count: Some(-3),
        };

        let error = normalize_batch(query).expect_err("query should fail");
        assert_eq!(error.message(), "count must be a positive integer");
    }

    #[test]
    fn normalize_batch_rejects_missing_bounds() {
        let query = BatchQuery {
            min: None,
            max: Some(10),
            count: Some(2),
        };

        let error = normalize_batch(query).expect_err("query should fail");
        assert_eq!(error.message(), "min must be an integer");
    }

    #[test]
    fn normalize_batch_rejects_inverted_range() {
        let query = BatchQuery {
            min: Some(5),
            max: Some(1),
            count: Some(3),
        };

        let error = normalize_batch(query).expect_err("query should fail");
        assert_eq!(
            error.message(),
            "max=1 must be greater than or equal to min=5"
        );
    }

    #[test]
    fn normalize_batch_accepts_degenerate_range() {
        let query = BatchQuery {
            min: Some(1),
            max: Some(1),
            count: Some(2),
        };

        let batch = normalize_batch(query).expect("query should pass");
        assert_eq!(batch.range, RangeRequest { min: 1, max: 1 });
        assert_eq!(batch.count, 2);
    }

    #[test]
    fn build_requests_produces_identical_copies() {
        let batch = NormalizedBatch {
            range: RangeRequest { min: -5, max: 5 },
            count: 4,
        };

        let requests = build_requests(&batch);
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|request| *request == batch.range));
    }

    #[test]
    fn batch_fingerprint_is_deterministic() {
        let batch = NormalizedBatch {
            range: RangeRequest { min: 1, max: 100 },
            count: 8,
        };

        assert_eq!(batch_fingerprint(&batch), batch_fingerprint(&batch));
    }

    #[test]
    fn batch_fingerprint_distinguishes_batches() {
        let batch_a = NormalizedBatch {
            range: RangeRequest { min: 1, max: 100 },
            count: 8,
        };
        let batch_b = NormalizedBatch {
            range: RangeRequest { min: 1, max: 100 },
            count: 9,
        };

        assert_ne!(batch_fingerprint(&batch_a), batch_fingerprint(&batch_b));
    }

    #[test]
    fn range_request_serializes_to_wire_payload() {
        let request = RangeRequest { min: 3, max: 9 };
        assert_eq!(stable_contract_json(request), r#"{"min":3,"max":9}"#);
    }
}
