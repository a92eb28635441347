use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_lambda::types::{InvocationType, LogType};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::json;

use rng_fanout_gateway::adapters::invoke::{decode_invoke_reply, decode_tail_log, RandomInvoker};
use rng_fanout_gateway::handlers::batch::handle_random_batch;
use rng_fanout_gateway::runtime::contract::RangeRequest;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_FUNCTION_NAME: &str = "GetRandom";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

struct AwsLambdaRandomInvoker {
    lambda_client: aws_sdk_lambda::Client,
    function_name: String,
}

impl RandomInvoker for AwsLambdaRandomInvoker {
    async fn invoke_random(&self, request: &RangeRequest) -> Result<serde_json::Number, String> {
        let payload = serde_json::to_vec(request)
            .map_err(|error| format!("failed to encode range payload: {error}"))?;

        let output = self
            .lambda_client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::RequestResponse)
            .log_type(LogType::Tail)
            .set_payload(Some(payload.into()))
            .send()
            .await
            .map_err(|error| format!("failed to invoke {}: {error}", self.function_name))?;

        if let Some(tail) = output.log_result().and_then(decode_tail_log) {
            log_gateway_info(
                "function_log_tail",
                json!({
                    "function_name": self.function_name.clone(),
                    "log_tail": tail,
                }),
            );
        }

        decode_invoke_reply(
            output.function_error(),
            output.payload().map(|blob| blob.as_ref()),
        )
    }
}

#[derive(Clone)]
struct GatewayState {
    invoker: Arc<AwsLambdaRandomInvoker>,
}

async fn serve_random(
    State(state): State<GatewayState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let response = handle_random_batch(&params, state.invoker.as_ref()).await;
    (
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::OK),
        [(header::CONTENT_TYPE, "text/plain")],
        response.body,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let function_name = std::env::var("RANDOM_FUNCTION_NAME")
        .unwrap_or_else(|_| DEFAULT_FUNCTION_NAME.to_string());

    let region_provider =
        RegionProviderChain::default_provider().or_else(Region::new(DEFAULT_REGION));
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    let state = GatewayState {
        invoker: Arc::new(AwsLambdaRandomInvoker {
            lambda_client: aws_sdk_lambda::Client::new(&config),
            function_name: function_name.clone(),
        }),
    };

    // Every path and method reaches the batch handler.
    let app = Router::new().fallback(serve_random).with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    log_gateway_info(
        "gateway_started",
        json!({
            "bind_addr": bind_addr,
            "function_name": function_name,
        }),
    );

    axum::serve(listener, app)
        .await
        .context("gateway server exited")?;
    Ok(())
}

fn log_gateway_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "gateway",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
