//! Built-in component catalog.

use serde_json::json;

use super::{Category, ComponentKind, FieldDescriptor};

const ATTRIBUTE_ACTIONS: &[&str] = &["insert", "update", "upsert", "delete"];
const ERROR_MODES: &[&str] = &["ignore", "propagate"];
const COMPRESSIONS: &[&str] = &["gzip", "zstd", "none"];

/// Returns the built-in component kinds in catalog order.
pub fn builtin_kinds() -> Vec<ComponentKind> {
    let mut kinds = receivers();
    kinds.extend(processors());
    kinds.extend(exporters());
    kinds.extend(connectors());
    kinds
}

fn receivers() -> Vec<ComponentKind> {
    use FieldDescriptor as F;
    let r = |type_id, label, defaults| ComponentKind::new(Category::Receiver, type_id, label, defaults);

    vec![
        r(
            "otlp",
            "OTLP Receiver",
            json!({
                "protocols": {
                    "grpc": { "endpoint": "0.0.0.0:4317" },
                    "http": { "endpoint": "0.0.0.0:4318" }
                }
            }),
        )
        .with_field(F::text("protocols.grpc.endpoint", "gRPC Endpoint", "0.0.0.0:4317"))
        .with_field(F::text("protocols.http.endpoint", "HTTP Endpoint", "0.0.0.0:4318")),
        r(
            "prometheus",
            "Prometheus Receiver",
            json!({
                "config": {
                    "scrape_configs": [{
                        "job_name": "otel-collector",
                        "scrape_interval": "10s",
                        "static_configs": [{ "targets": ["localhost:8888"] }]
                    }]
                }
            }),
        )
        .with_field(F::text("config.scrape_configs.0.job_name", "Job Name", "otel-collector"))
        .with_field(F::text("config.scrape_configs.0.scrape_interval", "Scrape Interval", "10s"))
        .with_field(F::text(
            "config.scrape_configs.0.static_configs.0.targets.0",
            "Target",
            "localhost:8888",
        )),
        r(
            "hostmetrics",
            "Host Metrics Receiver",
            json!({
                "collection_interval": "30s",
                "scrapers": { "cpu": {}, "memory": {}, "disk": {}, "network": {} }
            }),
        )
        .with_field(F::text("collection_interval", "Collection Interval", "30s"))
        .with_field(F::toggle("scrapers.cpu", "CPU Scraper", true))
        .with_field(F::toggle("scrapers.memory", "Memory Scraper", true))
        .with_field(F::toggle("scrapers.disk", "Disk Scraper", true))
        .with_field(F::toggle("scrapers.network", "Network Scraper", true)),
        r("filelog", "Filelog Receiver", json!({ "include": ["/var/log/**/*.log"] }))
            .with_field(F::text("include.0", "Include Path", "/var/log/**/*.log"))
            .with_field(F::select("start_at", "Start At", "end", &["beginning", "end"])),
        r("journald", "Journald Receiver", json!({ "directory": "/run/log/journal" }))
            .with_field(F::text("directory", "Directory", "/run/log/journal"))
            .with_field(F::text("units", "Units (comma-sep)", "")),
        r("k8s_events", "K8s Events Receiver", json!({ "namespaces": [] }))
            .with_field(F::text("namespaces", "Namespaces (comma-sep)", "")),
        r("zipkin", "Zipkin Receiver", json!({ "endpoint": "0.0.0.0:9411" }))
            .with_field(F::text("endpoint", "Endpoint", "0.0.0.0:9411")),
        r(
            "jaeger",
            "Jaeger Receiver",
            json!({
                "protocols": {
                    "grpc": { "endpoint": "0.0.0.0:14250" },
                    "thrift_http": { "endpoint": "0.0.0.0:14268" }
                }
            }),
        )
        .with_field(F::text("protocols.grpc.endpoint", "gRPC Endpoint", "0.0.0.0:14250"))
        .with_field(F::text(
            "protocols.thrift_http.endpoint",
            "Thrift HTTP Endpoint",
            "0.0.0.0:14268",
        )),
    ]
}

fn processors() -> Vec<ComponentKind> {
    use FieldDescriptor as F;
    let p = |type_id, label, defaults| ComponentKind::new(Category::Processor, type_id, label, defaults);

    vec![
        p("batch", "Batch Processor", json!({ "timeout": "200ms", "send_batch_size": 8192 }))
            .with_field(F::text("timeout", "Timeout", "200ms"))
            .with_field(F::number("send_batch_size", "Send Batch Size", 8192))
            .with_field(F::number("send_batch_max_size", "Max Batch Size", 0)),
        p(
            "memory_limiter",
            "Memory Limiter",
            json!({ "limit_mib": 512, "spike_limit_mib": 128, "check_interval": "5s" }),
        )
        .with_field(F::number("limit_mib", "Limit (MiB)", 512))
        .with_field(F::number("spike_limit_mib", "Spike Limit (MiB)", 128))
        .with_field(F::text("check_interval", "Check Interval", "5s")),
        p(
            "attributes",
            "Attributes Processor",
            json!({ "actions": [{ "key": "env", "value": "production", "action": "upsert" }] }),
        )
        .with_field(F::text("actions.0.key", "Attribute Key", "env"))
        .with_field(F::text("actions.0.value", "Attribute Value", "production"))
        .with_field(F::select("actions.0.action", "Action", "upsert", ATTRIBUTE_ACTIONS)),
        p("filter", "Filter Processor", json!({ "error_mode": "ignore" }))
            .with_field(F::select("error_mode", "Error Mode", "ignore", ERROR_MODES))
            .with_field(F::text("traces.span", "Trace Span Filter (OTTL)", ""))
            .with_field(F::text("metrics.metric", "Metric Filter (OTTL)", ""))
            .with_field(F::text("logs.log_record", "Log Filter (OTTL)", "")),
        p("transform", "Transform Processor", json!({ "error_mode": "ignore" }))
            .with_field(F::select("error_mode", "Error Mode", "ignore", ERROR_MODES)),
        p(
            "resource",
            "Resource Processor",
            json!({ "attributes": [{ "key": "service.name", "value": "my-service", "action": "upsert" }] }),
        )
        .with_field(F::text("attributes.0.key", "Attribute Key", "service.name"))
        .with_field(F::text("attributes.0.value", "Attribute Value", "my-service"))
        .with_field(F::select("attributes.0.action", "Action", "upsert", ATTRIBUTE_ACTIONS)),
        p("probabilistic_sampler", "Probabilistic Sampler", json!({ "sampling_percentage": 10 }))
            .with_field(F::number("sampling_percentage", "Sampling %", 10)),
        p("tail_sampling", "Tail Sampling", json!({ "decision_wait": "10s", "num_traces": 100 }))
            .with_field(F::text("decision_wait", "Decision Wait", "10s"))
            .with_field(F::number("num_traces", "Num Traces", 100)),
        p(
            "k8s_attributes",
            "K8s Attributes",
            json!({ "extract": { "metadata": ["k8s.pod.name", "k8s.namespace.name", "k8s.node.name"] } }),
        )
        .with_field(F::text(
            "extract.metadata",
            "Metadata Fields (comma-sep)",
            "k8s.pod.name,k8s.namespace.name,k8s.node.name",
        )),
        p(
            "resourcedetection",
            "Resource Detection",
            json!({ "detectors": ["env", "system"], "timeout": "5s" }),
        )
        .with_field(F::text("detectors", "Detectors (comma-sep)", "env,system"))
        .with_field(F::text("timeout", "Timeout", "5s")),
    ]
}

fn exporters() -> Vec<ComponentKind> {
    use FieldDescriptor as F;
    let e = |type_id, label, defaults| ComponentKind::new(Category::Exporter, type_id, label, defaults);

    vec![
        e(
            "otlp",
            "OTLP Exporter",
            json!({ "endpoint": "localhost:4317", "tls": { "insecure": true } }),
        )
        .with_field(F::text("endpoint", "Endpoint", "localhost:4317"))
        .with_field(F::toggle("tls.insecure", "TLS Insecure", true))
        .with_field(F::select("compression", "Compression", "gzip", COMPRESSIONS)),
        e("otlphttp", "OTLP HTTP Exporter", json!({ "endpoint": "http://localhost:4318" }))
            .with_field(F::text("endpoint", "Endpoint", "http://localhost:4318"))
            .with_field(F::toggle("tls.insecure", "TLS Insecure", true))
            .with_field(F::select("compression", "Compression", "gzip", COMPRESSIONS)),
        e(
            "prometheus",
            "Prometheus Exporter",
            json!({ "endpoint": "0.0.0.0:8889", "namespace": "otel" }),
        )
        .with_field(F::text("endpoint", "Endpoint", "0.0.0.0:8889"))
        .with_field(F::text("namespace", "Namespace", "otel"))
        .with_field(F::toggle("send_timestamps", "Send Timestamps", true)),
        e("debug", "Debug Exporter", json!({ "verbosity": "basic" }))
            .with_field(F::select("verbosity", "Verbosity", "basic", &["basic", "normal", "detailed"])),
        e("file", "File Exporter", json!({ "path": "./otel-output.json" }))
            .with_field(F::text("path", "File Path", "./otel-output.json")),
        e(
            "elasticsearch",
            "Elasticsearch Exporter",
            json!({ "endpoints": ["http://localhost:9200"], "logs_index": "otel-logs" }),
        )
        .with_field(F::text("endpoints.0", "Endpoint", "http://localhost:9200"))
        .with_field(F::text("logs_index", "Logs Index", "otel-logs"))
        .with_field(F::text("traces_index", "Traces Index", "otel-traces")),
        e("loki", "Loki Exporter", json!({ "endpoint": "http://localhost:3100/loki/api/v1/push" }))
            .with_field(F::text("endpoint", "Endpoint", "http://localhost:3100/loki/api/v1/push")),
    ]
}

fn connectors() -> Vec<ComponentKind> {
    vec![
        ComponentKind::new(
            Category::Connector,
            "spanmetrics",
            "Span Metrics Connector",
            json!({ "histogram": { "explicit": { "buckets": [1, 5, 10, 25, 50, 100, 250, 500, 1000] } } }),
        )
        .with_field(FieldDescriptor::text(
            "histogram.explicit.buckets",
            "Histogram Buckets",
            "1,5,10,25,50,100,250,500,1000",
        )),
        ComponentKind::new(Category::Connector, "count", "Count Connector", json!({})),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InputKind;
    use crate::settings;

    #[test]
    fn test_catalog_sizes() {
        let kinds = builtin_kinds();
        let count = |c| kinds.iter().filter(|k| k.category == c).count();
        assert_eq!(count(Category::Receiver), 8);
        assert_eq!(count(Category::Processor), 10);
        assert_eq!(count(Category::Exporter), 7);
        assert_eq!(count(Category::Connector), 2);
    }

    #[test]
    fn test_all_defaults_are_maps() {
        assert!(builtin_kinds().iter().all(|k| k.defaults.is_object()));
    }

    #[test]
    fn test_select_defaults_are_options() {
        for kind in builtin_kinds() {
            for field in kind.fields.iter().filter(|f| f.input == InputKind::Select) {
                let default = field.default.as_str().unwrap();
                assert!(
                    field.options.iter().any(|o| o == default),
                    "{}.{} default {} not among options",
                    kind.type_id,
                    field.key,
                    default
                );
            }
        }
    }

    #[test]
    fn test_hostmetrics_scrapers_are_stanzas() {
        let kinds = builtin_kinds();
        let hostmetrics = kinds.iter().find(|k| k.type_id == "hostmetrics").unwrap();
        for scraper in ["cpu", "memory", "disk", "network"] {
            let path = format!("scrapers.{scraper}");
            assert!(hostmetrics.is_stanza(&path));
            assert_eq!(hostmetrics.field(&path).unwrap().input, InputKind::Toggle);
        }
    }

    #[test]
    fn test_prometheus_field_paths_resolve_in_defaults() {
        let kinds = builtin_kinds();
        let prometheus = kinds
            .iter()
            .find(|k| k.category == Category::Receiver && k.type_id == "prometheus")
            .unwrap();
        for field in &prometheus.fields {
            assert_eq!(
                settings::get(&prometheus.defaults, &field.key),
                Some(&field.default)
            );
        }
    }
}
