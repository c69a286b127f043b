//! Deployment manifest generation.
//!
//! Wraps a rendered collector configuration in ready-to-apply manifests
//! for Docker Compose, Kubernetes (DaemonSet or Deployment with HPA) and
//! the upstream Helm chart. Container ports and memory limits are derived
//! from the components in the model.

use clap::ValueEnum;
use std::fmt;

use crate::model::PipelineSet;
use crate::registry::Category;
use crate::render::render;
use crate::settings::SettingsValue;

/// Output for a model without components.
pub const EMPTY_DEPLOY_PLACEHOLDER: &str = "# Add components to your pipeline first\n";

/// Ports exposed when no known component declares any.
const FALLBACK_PORTS: [u16; 2] = [4317, 4318];

const DEFAULT_MEMORY_LIMIT: &str = "512Mi";

/// Manifest flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeployFormat {
    #[value(name = "docker-compose")]
    DockerCompose,
    #[value(name = "k8s-daemonset")]
    K8sDaemonSet,
    #[value(name = "k8s-deployment")]
    K8sDeployment,
    #[value(name = "helm-values")]
    HelmValues,
}

impl fmt::Display for DeployFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployFormat::DockerCompose => "docker-compose",
            DeployFormat::K8sDaemonSet => "k8s-daemonset",
            DeployFormat::K8sDeployment => "k8s-deployment",
            DeployFormat::HelmValues => "helm-values",
        };
        f.write_str(name)
    }
}

/// Generate a deployment manifest for `pipelines`.
pub fn generate(pipelines: &PipelineSet, format: DeployFormat) -> String {
    if pipelines.is_empty() {
        return EMPTY_DEPLOY_PLACEHOLDER.to_string();
    }

    let config = render(pipelines);
    let ports = detect_ports(pipelines);
    let memory = memory_limit(pipelines);

    match format {
        DeployFormat::DockerCompose => docker_compose(&ports),
        DeployFormat::K8sDaemonSet => k8s_daemonset(&config, &ports, &memory),
        DeployFormat::K8sDeployment => k8s_deployment(&config, &ports, &memory),
        DeployFormat::HelmValues => helm_values(&config, &ports, &memory),
    }
}

/// Ports the collector listens on, in first-seen order without duplicates.
pub fn detect_ports(pipelines: &PipelineSet) -> Vec<u16> {
    let mut ports: Vec<u16> = Vec::new();
    let mut add = |port: u16| {
        if !ports.contains(&port) {
            ports.push(port);
        }
    };

    for pipeline in pipelines.iter().filter(|p| !p.is_empty()) {
        for receiver in pipeline.components(Category::Receiver) {
            match receiver.kind.as_str() {
                "otlp" => {
                    add(4317);
                    add(4318);
                }
                "prometheus" => add(8888),
                "zipkin" => add(9411),
                "jaeger" => {
                    add(14250);
                    add(14268);
                }
                _ => {}
            }
        }
        for exporter in pipeline.components(Category::Exporter) {
            if exporter.kind == "prometheus" {
                add(8889);
            }
        }
    }

    if ports.is_empty() {
        ports.extend(FALLBACK_PORTS);
    }
    ports
}

/// Container memory limit taken from the last `memory_limiter` processor
/// with a `limit_mib` setting, e.g. `1024Mi`.
pub fn memory_limit(pipelines: &PipelineSet) -> String {
    pipelines
        .iter()
        .filter(|p| !p.is_empty())
        .flat_map(|p| p.components(Category::Processor))
        .filter(|c| c.kind == "memory_limiter")
        .filter_map(|c| match c.settings.get("limit_mib") {
            Some(SettingsValue::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Some(SettingsValue::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .last()
        .map(|mib| format!("{mib}Mi"))
        .unwrap_or_else(|| DEFAULT_MEMORY_LIMIT.to_string())
}

/// Indent every non-empty line of `text` by `width` spaces.
pub(crate) fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.trim_end_matches('\n')
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn container_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(|p| format!("          - containerPort: {p}\n            protocol: TCP"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn service_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(|p| format!("    - port: {p}\n      targetPort: {p}\n      protocol: TCP\n      name: port-{p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn docker_compose(ports: &[u16]) -> String {
    let port_lines = ports
        .iter()
        .map(|p| format!("      - \"{p}:{p}\""))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"# Docker Compose - OpenTelemetry Collector
# Usage:
#   1. Save collector config as otel-config.yaml
#   2. docker compose up -d

services:
  otel-collector:
    image: otel/opentelemetry-collector-contrib:latest
    container_name: otel-collector
    restart: unless-stopped
    command: ["--config=/etc/otel/config.yaml"]
    volumes:
      - ./otel-config.yaml:/etc/otel/config.yaml:ro
    ports:
{port_lines}
    environment:
      - GOMEMLIMIT=400MiB
    deploy:
      resources:
        limits:
          memory: 512M
        reservations:
          memory: 128M

# --- otel-config.yaml ---
# Save the rendered collector configuration as otel-config.yaml
"#
    )
}

/// Workload settings that differ between the DaemonSet and Deployment.
struct Workload<'a> {
    heading: &'a str,
    component: &'a str,
    kind: &'a str,
    replicas: &'a str,
    cpu_limit: &'a str,
    memory_request: &'a str,
    cpu_request: &'a str,
}

fn k8s_workload(config: &str, ports: &[u16], memory: &str, workload: &Workload<'_>) -> String {
    let Workload {
        heading,
        component,
        kind,
        replicas,
        cpu_limit,
        memory_request,
        cpu_request,
    } = workload;
    let config = indent(config, 4);
    let container_ports = container_ports(ports);
    let service_ports = service_ports(ports);

    format!(
        r#"{heading}
apiVersion: v1
kind: ConfigMap
metadata:
  name: otel-collector-config
  namespace: otel
  labels:
    app.kubernetes.io/name: otel-collector
    app.kubernetes.io/component: {component}
data:
  config.yaml: |
{config}

---
apiVersion: apps/v1
kind: {kind}
metadata:
  name: otel-collector
  namespace: otel
  labels:
    app.kubernetes.io/name: otel-collector
    app.kubernetes.io/component: {component}
spec:
{replicas}  selector:
    matchLabels:
      app.kubernetes.io/name: otel-collector
  template:
    metadata:
      labels:
        app.kubernetes.io/name: otel-collector
        app.kubernetes.io/component: {component}
    spec:
      serviceAccountName: otel-collector
      containers:
        - name: otel-collector
          image: otel/opentelemetry-collector-contrib:latest
          args: ["--config=/etc/otel/config.yaml"]
          ports:
{container_ports}
          resources:
            limits:
              memory: {memory}
              cpu: "{cpu_limit}"
            requests:
              memory: "{memory_request}"
              cpu: "{cpu_request}"
          volumeMounts:
            - name: config
              mountPath: /etc/otel
              readOnly: true
          livenessProbe:
            httpGet:
              path: /
              port: 13133
            initialDelaySeconds: 10
          readinessProbe:
            httpGet:
              path: /
              port: 13133
      volumes:
        - name: config
          configMap:
            name: otel-collector-config

---
apiVersion: v1
kind: Service
metadata:
  name: otel-collector
  namespace: otel
  labels:
    app.kubernetes.io/name: otel-collector
spec:
  type: ClusterIP
  selector:
    app.kubernetes.io/name: otel-collector
  ports:
{service_ports}
"#
    )
}

const NAMESPACE_MANIFEST: &str = r#"
---
apiVersion: v1
kind: Namespace
metadata:
  name: otel
"#;

const HPA_MANIFEST: &str = r#"
---
apiVersion: autoscaling/v2
kind: HorizontalPodAutoscaler
metadata:
  name: otel-collector
  namespace: otel
spec:
  scaleTargetRef:
    apiVersion: apps/v1
    kind: Deployment
    name: otel-collector
  minReplicas: 2
  maxReplicas: 10
  metrics:
    - type: Resource
      resource:
        name: cpu
        target:
          type: Utilization
          averageUtilization: 70
    - type: Resource
      resource:
        name: memory
        target:
          type: Utilization
          averageUtilization: 80
"#;

fn k8s_daemonset(config: &str, ports: &[u16], memory: &str) -> String {
    let workload = Workload {
        heading: "# Kubernetes DaemonSet - OpenTelemetry Collector\n\
                  # Deploys collector on every node for host-level telemetry collection\n\
                  # Usage: kubectl apply -f otel-collector-daemonset.yaml\n",
        component: "collector",
        kind: "DaemonSet",
        replicas: "",
        cpu_limit: "500m",
        memory_request: "128Mi",
        cpu_request: "100m",
    };
    let mut out = k8s_workload(config, ports, memory, &workload);
    out.push_str(NAMESPACE_MANIFEST);
    out
}

fn k8s_deployment(config: &str, ports: &[u16], memory: &str) -> String {
    let workload = Workload {
        heading: "# Kubernetes Deployment - OpenTelemetry Collector\n\
                  # Gateway/aggregation pattern with configurable replicas\n\
                  # Usage: kubectl apply -f otel-collector-deployment.yaml\n",
        component: "gateway",
        kind: "Deployment",
        replicas: "  replicas: 2\n",
        cpu_limit: "1",
        memory_request: "256Mi",
        cpu_request: "200m",
    };
    let mut out = k8s_workload(config, ports, memory, &workload);
    out.push_str(HPA_MANIFEST);
    out.push_str(NAMESPACE_MANIFEST);
    out
}

/// Port name used by the Helm chart for well-known collector ports.
fn helm_port_name(port: u16) -> String {
    match port {
        4317 => "otlp-grpc".to_string(),
        4318 => "otlp-http".to_string(),
        8888 | 8889 => "prometheus".to_string(),
        9411 => "zipkin".to_string(),
        other => format!("port-{other}"),
    }
}

fn helm_values(config: &str, ports: &[u16], memory: &str) -> String {
    let port_entries = ports
        .iter()
        .map(|p| {
            format!(
                "    {}:\n      enabled: true\n      containerPort: {p}\n      servicePort: {p}\n      protocol: TCP",
                helm_port_name(*p)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let config = indent(config, 2);

    format!(
        r#"# Helm Values - open-telemetry/opentelemetry-collector chart
# Usage:
#   helm repo add open-telemetry https://open-telemetry.github.io/opentelemetry-helm-charts
#   helm install otel-collector open-telemetry/opentelemetry-collector -f values.yaml

mode: daemonset  # or "deployment" for gateway pattern

image:
  repository: otel/opentelemetry-collector-contrib

resources:
  limits:
    memory: {memory}
    cpu: 500m
  requests:
    memory: 128Mi
    cpu: 100m

ports:
{port_entries}

config:
{config}

serviceAccount:
  create: true
  name: otel-collector

service:
  enabled: true
  type: ClusterIP
"#
    )
}
