use crate::aggregate::AggregateSummary;

/// Render the plain-text response body for a completed batch.
///
/// Line order is fixed: the attempt summary, then the failure section when
/// any invocation failed, then the value line when any succeeded.
pub fn render_batch_body(summary: &AggregateSummary) -> String {
    let mut body = format!(
        "Result: {} attempts & {} successful random values\n",
        summary.attempted, summary.succeeded
    );

    if !summary.failed_reasons.is_empty() {
        body.push_str("Failed to send to: \n");
        body.push_str(&summary.failed_reasons.join("\n"));
        body.push('\n');
    }

    if !summary.values.is_empty() {
        let values = summary
            .values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(",");
        body.push_str(&format!("random values:\t{values}\n"));
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: i64) -> serde_json::Number {
        serde_json::Number::from(value)
    }

    #[test]
    fn renders_all_successful_batch() {
        let summary = AggregateSummary {
            attempted: 2,
            succeeded: 2,
            values: vec![number(1), number(1)],
            failed_reasons: Vec::new(),
        };

        assert_eq!(
            render_batch_body(&summary),
            "Result: 2 attempts & 2 successful random values\nrandom values:\t1,1\n"
        );
    }

    #[test]
    fn renders_failure_section_with_reasons() {
        let summary = AggregateSummary {
            attempted: 2,
            succeeded: 1,
            values: vec![number(42)],
            failed_reasons: vec!["connection reset".to_string()],
        };

        let body = render_batch_body(&summary);
        assert!(body.starts_with("Result: 2 attempts & 1 successful random values\n"));
        assert!(body.contains("Failed to send to: \nconnection reset\n"));
        assert!(body.ends_with("random values:\t42\n"));
    }

    #[test]
    fn omits_value_line_when_nothing_succeeded() {
        let summary = AggregateSummary {
            attempted: 2,
            succeeded: 0,
            values: Vec::new(),
            failed_reasons: vec!["boom".to_string(), "bust".to_string()],
        };

        assert_eq!(
            render_batch_body(&summary),
            "Result: 2 attempts & 0 successful random values\nFailed to send to: \nboom\nbust\n"
        );
    }

    #[test]
    fn omits_failure_section_when_nothing_failed() {
        let summary = AggregateSummary {
            attempted: 1,
            succeeded: 1,
            values: vec![number(-3)],
            failed_reasons: Vec::new(),
        };

        let body = render_batch_body(&summary);
        assert!(!body.contains("Failed to send to:"));
    }
}
