use std::future::Future;

use rng_fanout_core::contract::RangeRequest;

/// Seam for the remote random-number function. The production implementation
/// drives `aws-sdk-lambda`; tests use scripted fakes.
pub trait RandomInvoker {
    /// Invoke the remote function once for `request`. Failures are terminal;
    /// the invoker does not retry.
    fn invoke_random(
        &self,
        request: &RangeRequest,
    ) -> impl Future<Output = Result<serde_json::Number, String>> + Send;
}

/// Decode an invocation reply into its numeric value.
///
/// A reported function error, a missing payload, or a payload that is not a
/// bare JSON number all map to a failure reason.
pub fn decode_invoke_reply(
    function_error: Option<&str>,
    payload: Option<&[u8]>,
) -> Result<serde_json::Number, String> {
    if let Some(kind) = function_error {
        let detail = payload
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        return Err(format!("function returned error ({kind}): {detail}"));
    }

    let bytes = payload.ok_or_else(|| "invocation reply carried no payload".to_string())?;
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|error| format!("failed to parse invocation payload: {error}"))?;

    match value {
        serde_json::Value::Number(number) => Ok(number),
        other => Err(format!("invocation payload is not a number: {other}")),
    }
}

/// The Lambda API returns the function's log tail base64-encoded.
pub fn decode_tail_log(encoded: &str) -> Option<String> {
    aws_smithy_types::base64::decode(encoded)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
