//! ShardRelay metrics definitions.
//!
//! All metrics use OpenTelemetry conventions and can be exported via
//! OTLP to Prometheus, Grafana, CloudWatch, etc.

use opentelemetry::{
    metrics::{Counter, Histogram, Meter, MetricsError},
    KeyValue,
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;

/// Central metrics handle for ShardRelay.
#[derive(Clone)]
pub struct RelayMetrics {
    pub documents_emitted: Counter<u64>,
    pub records_failed: Counter<u64>,
    pub continuations_published: Counter<u64>,
    pub batch_records: Histogram<u64>,
}

impl RelayMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            documents_emitted: meter
                .u64_counter("shardrelay.documents_emitted")
                .with_description("Canonical documents forwarded to the sink")
                .init(),
            records_failed: meter
                .u64_counter("shardrelay.records_failed")
                .with_description("Records skipped because their payload failed to decode")
                .init(),
            continuations_published: meter
                .u64_counter("shardrelay.continuations_published")
                .with_description("Continuation messages handed to the queue")
                .init(),
            batch_records: meter
                .u64_histogram("shardrelay.batch_records")
                .with_description("Records per consumed batch")
                .init(),
        }
    }

    pub fn record_emitted(&self, stream: &str, count: u64) {
        self.documents_emitted
            .add(count, &[KeyValue::new("stream", stream.to_string())]);
    }

    pub fn record_failed(&self, stream: &str, reason: &str) {
        self.records_failed.add(
            1,
            &[
                KeyValue::new("stream", stream.to_string()),
                KeyValue::new("reason", reason.to_string()),
            ],
        );
    }

    pub fn record_continuations(&self, stream: &str, count: u64) {
        self.continuations_published
            .add(count, &[KeyValue::new("stream", stream.to_string())]);
    }

    pub fn record_batch(&self, records: u64) {
        self.batch_records.record(records, &[]);
    }
}

/// Install an OTLP metrics pipeline and make it the global provider.
/// Requires a Tokio runtime.
pub fn init_otlp_metrics(endpoint: &str) -> Result<SdkMeterProvider, MetricsError> {
    let provider = opentelemetry_otlp::new_pipeline()
        .metrics(opentelemetry_sdk::runtime::Tokio)
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .build()?;
    opentelemetry::global::set_meter_provider(provider.clone());
    Ok(provider)
}
