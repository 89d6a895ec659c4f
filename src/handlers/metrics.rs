use crate::error::GatewayResult;
use crate::metrics;

pub async fn metrics_handler() -> GatewayResult<String> {
    Ok(metrics::render()?)
}
