//! Application instrumentation snippets.
//!
//! Looks at the receivers and active signals of a model and produces SDK
//! setup code, plus the matching install commands, that points an
//! application at the collector. Python, Node.js, Go and Java are supported.
//!
//! Only Python wires up logs; the other SDKs cover traces and metrics.

use clap::ValueEnum;
use std::fmt;

use crate::deploy::indent;
use crate::model::{PipelineSet, Signal};
use crate::registry::Category;
use crate::settings::SettingsValue;

/// Output for a model without receivers or exporters.
pub const NO_RECEIVERS_PLACEHOLDER: &str = "# Add receivers to your pipeline first";

/// Port the Prometheus client examples expose for scraping.
const PROMETHEUS_CLIENT_PORT: u16 = 8000;

/// Maven coordinates of the Java SDK artifacts.
const JAVA_SDK: (&str, &str, &str) = ("io.opentelemetry", "opentelemetry-sdk", "1.40.0");
const JAVA_OTLP_EXPORTER: (&str, &str, &str) =
    ("io.opentelemetry", "opentelemetry-exporter-otlp", "1.40.0");

/// Target language of a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    Python,
    #[value(name = "nodejs")]
    NodeJs,
    Go,
    Java,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Python => "python",
            Language::NodeJs => "nodejs",
            Language::Go => "go",
            Language::Java => "java",
        };
        f.write_str(name)
    }
}

/// OTLP transport an application should export with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Grpc,
    Http,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Grpc => "grpc",
            Protocol::Http => "http",
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            Protocol::Grpc => 4317,
            Protocol::Http => 4318,
        }
    }
}

/// What the model's receivers accept, and which signals carry data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiverAnalysis {
    /// Signals with at least one receiver or exporter, in signal order.
    pub signals: Vec<Signal>,
    pub otlp_grpc: bool,
    pub otlp_http: bool,
    pub prometheus: bool,
}

impl ReceiverAnalysis {
    pub fn has_content(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn has_signal(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    /// The OTLP transport to use. gRPC wins when both are open.
    pub fn otlp_protocol(&self) -> Option<Protocol> {
        if self.otlp_grpc {
            Some(Protocol::Grpc)
        } else if self.otlp_http {
            Some(Protocol::Http)
        } else {
            None
        }
    }
}

/// Generated setup code and the command that installs its dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub install: String,
    pub code: String,
}

/// Inspect the receivers of every signal.
///
/// An `otlp` receiver without a `protocols` stanza accepts both transports.
/// When nothing identifies a transport, OTLP over gRPC is assumed.
pub fn analyze(pipelines: &PipelineSet) -> ReceiverAnalysis {
    let mut analysis = ReceiverAnalysis::default();

    for pipeline in pipelines.iter() {
        let receivers = pipeline.components(Category::Receiver);
        if !receivers.is_empty() || !pipeline.components(Category::Exporter).is_empty() {
            analysis.signals.push(pipeline.signal());
        }

        for receiver in receivers {
            match receiver.kind.as_str() {
                "otlp" => match receiver.settings.get("protocols").filter(|p| is_truthy(p)) {
                    Some(protocols) => {
                        analysis.otlp_grpc |= protocols.get("grpc").is_some_and(is_truthy);
                        analysis.otlp_http |= protocols.get("http").is_some_and(is_truthy);
                    }
                    None => {
                        analysis.otlp_grpc = true;
                        analysis.otlp_http = true;
                    }
                },
                "prometheus" => analysis.prometheus = true,
                _ => {}
            }
        }
    }

    if !analysis.otlp_grpc && !analysis.otlp_http && !analysis.prometheus {
        analysis.otlp_grpc = true;
    }
    analysis
}

/// Generate an instrumentation snippet for `pipelines` in `language`.
pub fn generate(pipelines: &PipelineSet, language: Language) -> Snippet {
    let analysis = analyze(pipelines);
    if !analysis.has_content() {
        return Snippet {
            install: String::new(),
            code: NO_RECEIVERS_PLACEHOLDER.to_string(),
        };
    }

    match language {
        Language::Python => python(&analysis),
        Language::NodeJs => nodejs(&analysis),
        Language::Go => go(&analysis),
        Language::Java => java(&analysis),
    }
}

/// Loose truthiness of a settings value: present and not null, false, zero
/// or the empty string.
fn is_truthy(value: &SettingsValue) -> bool {
    match value {
        SettingsValue::Null => false,
        SettingsValue::Bool(b) => *b,
        SettingsValue::Number(n) => n.as_f64() != Some(0.0),
        SettingsValue::String(s) => !s.is_empty(),
        SettingsValue::Array(_) | SettingsValue::Object(_) => true,
    }
}

fn push_unique(list: &mut Vec<String>, item: impl Into<String>) {
    let item = item.into();
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Join the non-empty blocks with a blank line between them.
fn join_blocks(blocks: &[String]) -> String {
    blocks
        .iter()
        .filter(|b| !b.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn python(analysis: &ReceiverAnalysis) -> Snippet {
    let mut packages = vec!["opentelemetry-api".to_string(), "opentelemetry-sdk".to_string()];
    let mut imports: Vec<String> = Vec::new();
    let mut parts: Vec<String> = Vec::new();

    if let Some(protocol) = analysis.otlp_protocol() {
        let proto = protocol.as_str();
        let port = protocol.port();
        let exporter_package = format!("opentelemetry-exporter-otlp-proto-{proto}");

        if analysis.has_signal(Signal::Traces) {
            push_unique(&mut packages, &exporter_package);
            push_unique(&mut imports, "from opentelemetry import trace");
            push_unique(&mut imports, "from opentelemetry.sdk.trace import TracerProvider");
            push_unique(&mut imports, "from opentelemetry.sdk.trace.export import BatchSpanProcessor");
            push_unique(
                &mut imports,
                format!("from opentelemetry.exporter.otlp.proto.{proto}.trace_exporter import OTLPSpanExporter"),
            );
            parts.push(format!(
                r#"# Traces
provider = TracerProvider()
exporter = OTLPSpanExporter(endpoint="http://localhost:{port}")
provider.add_span_processor(BatchSpanProcessor(exporter))
trace.set_tracer_provider(provider)
tracer = trace.get_tracer(__name__)"#
            ));
        }

        if analysis.has_signal(Signal::Metrics) {
            push_unique(&mut packages, &exporter_package);
            push_unique(&mut imports, "from opentelemetry import metrics");
            push_unique(&mut imports, "from opentelemetry.sdk.metrics import MeterProvider");
            push_unique(
                &mut imports,
                "from opentelemetry.sdk.metrics.export import PeriodicExportingMetricReader",
            );
            push_unique(
                &mut imports,
                format!("from opentelemetry.exporter.otlp.proto.{proto}.metric_exporter import OTLPMetricExporter"),
            );
            parts.push(format!(
                r#"# Metrics
metric_exporter = OTLPMetricExporter(endpoint="http://localhost:{port}")
reader = PeriodicExportingMetricReader(metric_exporter)
meter_provider = MeterProvider(metric_readers=[reader])
metrics.set_meter_provider(meter_provider)
meter = metrics.get_meter(__name__)"#
            ));
        }

        if analysis.has_signal(Signal::Logs) {
            push_unique(&mut packages, &exporter_package);
            push_unique(&mut imports, "from opentelemetry._logs import set_logger_provider");
            push_unique(&mut imports, "from opentelemetry.sdk._logs import LoggerProvider");
            push_unique(&mut imports, "from opentelemetry.sdk._logs.export import BatchLogRecordProcessor");
            push_unique(
                &mut imports,
                format!("from opentelemetry.exporter.otlp.proto.{proto}._log_exporter import OTLPLogExporter"),
            );
            parts.push(format!(
                r#"# Logs
log_exporter = OTLPLogExporter(endpoint="http://localhost:{port}")
logger_provider = LoggerProvider()
logger_provider.add_log_record_processor(BatchLogRecordProcessor(log_exporter))
set_logger_provider(logger_provider)"#
            ));
        }
    }

    if analysis.prometheus {
        push_unique(&mut packages, "prometheus-client");
        parts.push(format!(
            r#"# Prometheus metrics (scraped by collector)
from prometheus_client import start_http_server, Counter, Histogram
start_http_server({PROMETHEUS_CLIENT_PORT})
requests_total = Counter("requests_total", "Total requests")
request_duration = Histogram("request_duration_seconds", "Request duration")"#
        ));
    }

    Snippet {
        install: format!("pip install {}", packages.join(" ")),
        code: join_blocks(&[imports.join("\n"), parts.join("\n\n")]),
    }
}

fn nodejs(analysis: &ReceiverAnalysis) -> Snippet {
    let mut packages = vec!["@opentelemetry/sdk-node".to_string(), "@opentelemetry/api".to_string()];
    let mut requires: Vec<String> = Vec::new();
    let mut parts: Vec<String> = Vec::new();

    if let Some(protocol) = analysis.otlp_protocol() {
        let proto = protocol.as_str();
        let port = protocol.port();
        let mut options: Vec<String> = Vec::new();

        push_unique(&mut requires, "const { NodeSDK } = require('@opentelemetry/sdk-node');");

        if analysis.has_signal(Signal::Traces) {
            let package = format!("@opentelemetry/exporter-trace-otlp-{proto}");
            push_unique(
                &mut requires,
                format!("const {{ OTLPTraceExporter }} = require('{package}');"),
            );
            push_unique(&mut packages, package);
            options.push(format!(
                "  traceExporter: new OTLPTraceExporter({{ url: 'http://localhost:{port}' }})"
            ));
        }

        if analysis.has_signal(Signal::Metrics) {
            let package = format!("@opentelemetry/exporter-metrics-otlp-{proto}");
            push_unique(&mut packages, "@opentelemetry/sdk-metrics");
            push_unique(
                &mut requires,
                format!("const {{ OTLPMetricExporter }} = require('{package}');"),
            );
            push_unique(
                &mut requires,
                "const { PeriodicExportingMetricReader } = require('@opentelemetry/sdk-metrics');",
            );
            push_unique(&mut packages, package);
            options.push(format!(
                "  metricReader: new PeriodicExportingMetricReader({{\n    exporter: new OTLPMetricExporter({{ url: 'http://localhost:{port}' }}),\n  }})"
            ));
        }

        let sdk = if options.is_empty() {
            "const sdk = new NodeSDK({});".to_string()
        } else {
            format!("const sdk = new NodeSDK({{\n{}\n}});", options.join(",\n"))
        };
        parts.push(format!(
            "{sdk}\n\nsdk.start();\n\n// Graceful shutdown\nprocess.on('SIGTERM', () => sdk.shutdown().then(() => process.exit(0)));"
        ));
    }

    if analysis.prometheus {
        push_unique(&mut packages, "prom-client");
        parts.push(format!(
            r#"// Prometheus metrics (scraped by collector)
const client = require('prom-client');
const register = new client.Registry();
client.collectDefaultMetrics({{ register }});

// Expose /metrics endpoint
const http = require('http');
http.createServer(async (req, res) => {{
  if (req.url === '/metrics') {{
    res.setHeader('Content-Type', register.contentType);
    res.end(await register.metrics());
  }}
}}).listen({PROMETHEUS_CLIENT_PORT});"#
        ));
    }

    Snippet {
        install: format!("npm install {}", packages.join(" ")),
        code: join_blocks(&[requires.join("\n"), parts.join("\n\n")]),
    }
}

fn go(analysis: &ReceiverAnalysis) -> Snippet {
    let mut modules: Vec<String> = Vec::new();
    let mut imports: Vec<String> = Vec::new();
    let mut parts: Vec<String> = Vec::new();
    let mut shutdown: Vec<&str> = Vec::new();

    if let Some(protocol) = analysis.otlp_protocol() {
        let proto = protocol.as_str();
        let port = protocol.port();

        if analysis.has_signal(Signal::Traces) {
            let package = format!("otlptrace{proto}");
            let module = format!("go.opentelemetry.io/otel/exporters/otlp/otlptrace/{package}");
            push_unique(&mut imports, format!("\"{module}\""));
            push_unique(&mut modules, module);
            push_unique(&mut modules, "go.opentelemetry.io/otel");
            push_unique(&mut modules, "go.opentelemetry.io/otel/sdk/trace");
            push_unique(&mut imports, "\"go.opentelemetry.io/otel\"");
            push_unique(&mut imports, "sdktrace \"go.opentelemetry.io/otel/sdk/trace\"");
            parts.push(format!(
                r#"  // Traces
  traceExporter, err := {package}.New(ctx,
    {package}.WithEndpoint("localhost:{port}"),
    {package}.WithInsecure(),
  )
  if err != nil {{ log.Fatal(err) }}
  tp := sdktrace.NewTracerProvider(sdktrace.WithBatcher(traceExporter))
  otel.SetTracerProvider(tp)"#
            ));
            shutdown.push("    tp.Shutdown(ctx)");
        }

        if analysis.has_signal(Signal::Metrics) {
            let package = format!("otlpmetric{proto}");
            let module = format!("go.opentelemetry.io/otel/exporters/otlp/otlpmetric/{package}");
            push_unique(&mut imports, format!("\"{module}\""));
            push_unique(&mut modules, module);
            push_unique(&mut modules, "go.opentelemetry.io/otel");
            push_unique(&mut modules, "go.opentelemetry.io/otel/sdk/metric");
            push_unique(&mut imports, "\"go.opentelemetry.io/otel\"");
            push_unique(&mut imports, "sdkmetric \"go.opentelemetry.io/otel/sdk/metric\"");
            parts.push(format!(
                r#"  // Metrics
  metricExporter, err := {package}.New(ctx,
    {package}.WithEndpoint("localhost:{port}"),
    {package}.WithInsecure(),
  )
  if err != nil {{ log.Fatal(err) }}
  mp := sdkmetric.NewMeterProvider(sdkmetric.WithReader(
    sdkmetric.NewPeriodicReader(metricExporter),
  ))
  otel.SetMeterProvider(mp)"#
            ));
            shutdown.push("    mp.Shutdown(ctx)");
        }
    }

    let mut import_lines = vec!["\"context\"".to_string(), "\"log\"".to_string()];
    import_lines.extend(imports);
    let import_block = import_lines
        .iter()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut body = parts.join("\n\n");
    if !body.is_empty() {
        body.push_str("\n\n");
    }
    let shutdown_body = shutdown.iter().map(|line| format!("\n{line}")).collect::<String>();

    let code = format!(
        "package main\n\nimport (\n{import_block}\n)\n\nfunc initTelemetry(ctx context.Context) func() {{\n{body}  return func() {{{shutdown_body}\n  }}\n}}"
    );

    Snippet {
        install: modules
            .iter()
            .map(|m| format!("go get {m}"))
            .collect::<Vec<_>>()
            .join("\n"),
        code,
    }
}

fn java(analysis: &ReceiverAnalysis) -> Snippet {
    let mut dependencies = vec![JAVA_SDK];
    let mut parts: Vec<String> = Vec::new();
    let mut providers: Vec<&str> = Vec::new();

    if let Some(protocol) = analysis.otlp_protocol() {
        let port = protocol.port();
        let transport = match protocol {
            Protocol::Grpc => "Grpc",
            Protocol::Http => "Http",
        };
        let endpoint = |signal_path: &str| match protocol {
            Protocol::Grpc => format!("http://localhost:{port}"),
            Protocol::Http => format!("http://localhost:{port}/v1/{signal_path}"),
        };

        if analysis.has_signal(Signal::Traces) || analysis.has_signal(Signal::Metrics) {
            dependencies.push(JAVA_OTLP_EXPORTER);
        }

        if analysis.has_signal(Signal::Traces) {
            let exporter = format!("Otlp{transport}SpanExporter");
            parts.push(format!(
                r#"// Traces
{exporter} spanExporter = {exporter}.builder()
    .setEndpoint("{}")
    .build();

SdkTracerProvider tracerProvider = SdkTracerProvider.builder()
    .addSpanProcessor(BatchSpanProcessor.builder(spanExporter).build())
    .build();"#,
                endpoint("traces")
            ));
            providers.push("            .setTracerProvider(tracerProvider)");
        }

        if analysis.has_signal(Signal::Metrics) {
            let exporter = format!("Otlp{transport}MetricExporter");
            parts.push(format!(
                r#"// Metrics
{exporter} metricExporter = {exporter}.builder()
    .setEndpoint("{}")
    .build();

SdkMeterProvider meterProvider = SdkMeterProvider.builder()
    .registerMetricReader(PeriodicMetricReader.builder(metricExporter).build())
    .build();"#,
                endpoint("metrics")
            ));
            providers.push("            .setMeterProvider(meterProvider)");
        }
    }

    let maven = dependencies
        .iter()
        .map(|(group, artifact, version)| {
            format!(
                "<dependency>\n  <groupId>{group}</groupId>\n  <artifactId>{artifact}</artifactId>\n  <version>{version}</version>\n</dependency>"
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let gradle = dependencies
        .iter()
        .map(|(group, artifact, version)| format!("implementation '{group}:{artifact}:{version}'"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut body = String::new();
    if !parts.is_empty() {
        body.push_str(&indent(&parts.join("\n\n"), 8));
        body.push_str("\n\n");
    }
    let mut chain = vec!["        return OpenTelemetrySdk.builder()"];
    chain.extend(providers);
    chain.push("            .buildAndRegisterGlobal();");

    let code = format!(
        r#"import io.opentelemetry.api.OpenTelemetry;
import io.opentelemetry.sdk.OpenTelemetrySdk;
import io.opentelemetry.sdk.trace.*;
import io.opentelemetry.sdk.trace.export.BatchSpanProcessor;
import io.opentelemetry.exporter.otlp.trace.*;
import io.opentelemetry.sdk.metrics.*;
import io.opentelemetry.sdk.metrics.export.PeriodicMetricReader;
import io.opentelemetry.exporter.otlp.metrics.*;

public class TelemetryConfig {{
    public static OpenTelemetry init() {{
{body}{}
    }}
}}"#,
        chain.join("\n")
    );

    Snippet {
        install: format!("<!-- Maven -->\n{maven}\n\n// Gradle\n{gradle}"),
        code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(value: serde_json::Value) -> PipelineSet {
        PipelineSet::from_value(&value).unwrap()
    }

    fn traces_and_metrics() -> PipelineSet {
        model(json!({
            "pipelines": {
                "traces": {
                    "receivers": [{ "type": "otlp", "settings": { "protocols": { "grpc": { "endpoint": "0.0.0.0:4317" } } } }],
                    "exporters": [{ "type": "debug" }]
                },
                "metrics": {
                    "receivers": [{ "type": "otlp", "settings": { "protocols": { "grpc": {} } } }],
                    "exporters": [{ "type": "prometheus" }]
                }
            }
        }))
    }

    fn http_logs() -> PipelineSet {
        model(json!({
            "pipelines": { "logs": {
                "receivers": [{ "type": "otlp", "settings": { "protocols": { "http": { "endpoint": "0.0.0.0:4318" } } } }],
                "exporters": [{ "type": "debug" }]
            } }
        }))
    }

    #[test]
    fn test_empty_model_placeholder() {
        for language in Language::value_variants() {
            let snippet = generate(&PipelineSet::empty(), *language);
            assert_eq!(snippet.code, NO_RECEIVERS_PLACEHOLDER);
            assert!(snippet.install.is_empty());
        }
    }

    #[test]
    fn test_analyze_protocol_stanzas() {
        let analysis = analyze(&traces_and_metrics());
        assert_eq!(analysis.signals, vec![Signal::Traces, Signal::Metrics]);
        assert!(analysis.otlp_grpc);
        assert!(!analysis.otlp_http);
        assert!(!analysis.prometheus);
        assert_eq!(analysis.otlp_protocol(), Some(Protocol::Grpc));

        let analysis = analyze(&http_logs());
        assert_eq!(analysis.signals, vec![Signal::Logs]);
        assert_eq!(analysis.otlp_protocol(), Some(Protocol::Http));
    }

    #[test]
    fn test_analyze_otlp_without_protocols_opens_both() {
        let set = model(json!({
            "pipelines": { "traces": { "receivers": [{ "type": "otlp" }] } }
        }));
        let analysis = analyze(&set);
        assert!(analysis.otlp_grpc && analysis.otlp_http);
    }

    #[test]
    fn test_analyze_defaults_to_grpc() {
        let set = model(json!({
            "pipelines": { "logs": { "receivers": [{ "type": "filelog" }], "exporters": [{ "type": "debug" }] } }
        }));
        let analysis = analyze(&set);
        assert_eq!(analysis.otlp_protocol(), Some(Protocol::Grpc));
        assert!(!analysis.prometheus);
    }

    #[test]
    fn test_analyze_prometheus_only() {
        let set = model(json!({
            "pipelines": { "metrics": { "receivers": [{ "type": "prometheus" }], "exporters": [{ "type": "debug" }] } }
        }));
        let analysis = analyze(&set);
        assert!(analysis.prometheus);
        assert_eq!(analysis.otlp_protocol(), None);
    }

    #[test]
    fn test_exporters_alone_count_as_content() {
        let set = model(json!({
            "pipelines": { "traces": { "exporters": [{ "type": "debug" }] } }
        }));
        assert_eq!(analyze(&set).signals, vec![Signal::Traces]);
        assert_ne!(generate(&set, Language::Python).code, NO_RECEIVERS_PLACEHOLDER);
    }

    #[test]
    fn test_python_grpc() {
        let snippet = generate(&traces_and_metrics(), Language::Python);
        assert_eq!(
            snippet.install,
            "pip install opentelemetry-api opentelemetry-sdk opentelemetry-exporter-otlp-proto-grpc"
        );
        assert!(snippet.code.starts_with("from opentelemetry import trace\n"));
        assert!(snippet
            .code
            .contains("from opentelemetry.exporter.otlp.proto.grpc.metric_exporter import OTLPMetricExporter\n"));
        assert!(snippet.code.contains("exporter = OTLPSpanExporter(endpoint=\"http://localhost:4317\")\n"));
        assert!(snippet.code.contains("\n\n# Metrics\n"));
        assert!(!snippet.code.contains("# Logs"));
    }

    #[test]
    fn test_python_http_logs() {
        let snippet = generate(&http_logs(), Language::Python);
        assert!(snippet.install.ends_with("opentelemetry-exporter-otlp-proto-http"));
        assert!(snippet
            .code
            .contains("from opentelemetry.exporter.otlp.proto.http._log_exporter import OTLPLogExporter"));
        assert!(snippet.code.contains("OTLPLogExporter(endpoint=\"http://localhost:4318\")"));
    }

    #[test]
    fn test_python_prometheus_only_has_no_leading_blank() {
        let set = model(json!({
            "pipelines": { "metrics": { "receivers": [{ "type": "prometheus" }], "exporters": [{ "type": "debug" }] } }
        }));
        let snippet = generate(&set, Language::Python);
        assert!(snippet.code.starts_with("# Prometheus metrics (scraped by collector)\n"));
        assert!(snippet.code.contains("start_http_server(8000)"));
        assert!(snippet.install.ends_with(" prometheus-client"));
    }

    #[test]
    fn test_nodejs() {
        let snippet = generate(&traces_and_metrics(), Language::NodeJs);
        assert_eq!(
            snippet.install,
            "npm install @opentelemetry/sdk-node @opentelemetry/api @opentelemetry/exporter-trace-otlp-grpc @opentelemetry/sdk-metrics @opentelemetry/exporter-metrics-otlp-grpc"
        );
        assert!(snippet
            .code
            .starts_with("const { NodeSDK } = require('@opentelemetry/sdk-node');\n"));
        assert!(snippet.code.contains(
            "const sdk = new NodeSDK({\n  traceExporter: new OTLPTraceExporter({ url: 'http://localhost:4317' }),\n  metricReader:"
        ));
        assert!(snippet.code.contains("sdk.start();"));
    }

    #[test]
    fn test_nodejs_logs_only_has_empty_sdk_options() {
        let snippet = generate(&http_logs(), Language::NodeJs);
        assert!(snippet.code.contains("const sdk = new NodeSDK({});"));
        assert_eq!(snippet.install, "npm install @opentelemetry/sdk-node @opentelemetry/api");
    }

    #[test]
    fn test_go() {
        let snippet = generate(&traces_and_metrics(), Language::Go);
        assert_eq!(
            snippet.install,
            [
                "go get go.opentelemetry.io/otel/exporters/otlp/otlptrace/otlptracegrpc",
                "go get go.opentelemetry.io/otel",
                "go get go.opentelemetry.io/otel/sdk/trace",
                "go get go.opentelemetry.io/otel/exporters/otlp/otlpmetric/otlpmetricgrpc",
                "go get go.opentelemetry.io/otel/sdk/metric",
            ]
            .join("\n")
        );
        assert!(snippet.code.starts_with("package main\n\nimport (\n  \"context\"\n  \"log\"\n"));
        assert_eq!(snippet.code.matches("  \"go.opentelemetry.io/otel\"\n").count(), 1);
        assert!(snippet.code.contains("otlptracegrpc.WithEndpoint(\"localhost:4317\")"));
        assert!(snippet
            .code
            .ends_with("  return func() {\n    tp.Shutdown(ctx)\n    mp.Shutdown(ctx)\n  }\n}"));
    }

    #[test]
    fn test_java_grpc() {
        let snippet = generate(&traces_and_metrics(), Language::Java);
        assert!(snippet.install.starts_with("<!-- Maven -->\n<dependency>\n  <groupId>io.opentelemetry</groupId>\n  <artifactId>opentelemetry-sdk</artifactId>\n"));
        assert!(snippet
            .install
            .ends_with("// Gradle\nimplementation 'io.opentelemetry:opentelemetry-sdk:1.40.0'\nimplementation 'io.opentelemetry:opentelemetry-exporter-otlp:1.40.0'"));
        assert!(snippet.code.contains(
            "        OtlpGrpcSpanExporter spanExporter = OtlpGrpcSpanExporter.builder()\n            .setEndpoint(\"http://localhost:4317\")\n"
        ));
        assert!(snippet.code.contains(
            "        return OpenTelemetrySdk.builder()\n            .setTracerProvider(tracerProvider)\n            .setMeterProvider(meterProvider)\n            .buildAndRegisterGlobal();\n    }\n}"
        ));
    }

    #[test]
    fn test_java_http_endpoints_carry_signal_paths() {
        let set = model(json!({
            "pipelines": { "traces": {
                "receivers": [{ "type": "otlp", "settings": { "protocols": { "http": {} } } }],
                "exporters": [{ "type": "debug" }]
            } }
        }));
        let snippet = generate(&set, Language::Java);
        assert!(snippet.code.contains("OtlpHttpSpanExporter.builder()"));
        assert!(snippet.code.contains("\"http://localhost:4318/v1/traces\""));
        assert!(!snippet.code.contains("setMeterProvider"));
    }

    #[test]
    fn test_language_names() {
        let names: Vec<String> = Language::value_variants().iter().map(|l| l.to_string()).collect();
        assert_eq!(names, ["python", "nodejs", "go", "java"]);
        assert_eq!(Language::from_str("nodejs", false).unwrap(), Language::NodeJs);
        assert_eq!(Language::default(), Language::Python);
    }
}
