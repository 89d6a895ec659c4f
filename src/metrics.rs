use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Encoder, TextEncoder, register_counter, register_gauge};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("gateway_requests_total", "Total number of rate limited requests").unwrap();
    pub static ref REQUESTS_ADMITTED: Counter =
        register_counter!("gateway_requests_admitted_total", "Requests admitted by the limiter").unwrap();
    pub static ref REQUESTS_REJECTED: Counter =
        register_counter!("gateway_requests_rejected_total", "Requests rejected with 429").unwrap();
    pub static ref IDENTITY_FAILURES: Counter =
        register_counter!("gateway_identity_failures_total", "Requests whose peer address could not be parsed").unwrap();
    pub static ref ACTIVE_CLIENTS: Gauge =
        register_gauge!("gateway_active_clients", "Current number of tracked clients").unwrap();
    pub static ref EVICTED_CLIENTS: Counter =
        register_counter!("gateway_evicted_clients_total", "Clients removed by the idle sweeper").unwrap();
}

// Render all registered metrics in text exposition format
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
