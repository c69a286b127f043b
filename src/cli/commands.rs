//! CLI command definitions for pipeline-forge.
//!
//! Every command reads a pipeline model (or a generation request) from a
//! file or stdin and writes its result to stdout. Logs go to stderr.

use clap::Parser;
use std::fs;
use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::deploy::{self, DeployFormat};
use crate::endpoint;
use crate::instrument::{self, Language};
use crate::lint;
use crate::model::{PipelineSet, Signal};
use crate::registry::{Category, ComponentKind, ComponentRegistry, InputKind};
use crate::render::render;
use crate::server;
use crate::settings::{self, SettingsValue};

/// OpenTelemetry Collector configuration builder.
#[derive(Parser)]
#[command(name = "pipeline-forge")]
#[command(about = "Build and render OpenTelemetry Collector pipeline configurations")]
#[command(version)]
#[command(
    long_about = "pipeline-forge turns a pipeline model (receivers, processors, exporters per signal) into collector configuration YAML.\n\nExample usage:\n  pipeline-forge add receiver otlp --signal traces model.json > model.json.new\n  pipeline-forge render model.json"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render a pipeline model as collector configuration.
    Render(ModelArgs),

    /// Answer a generation request body exactly as the HTTP endpoint would.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Report wiring problems and risky settings in a model.
    Lint(LintArgs),

    /// Produce deployment manifests for a model.
    Deploy(DeployArgs),

    /// Print SDK setup code that sends application telemetry to the collector.
    Instrument(InstrumentArgs),

    /// List the component registry.
    Components(ComponentsArgs),

    /// Add a component from the registry defaults and print the new model.
    Add(AddArgs),

    /// Run the HTTP generation endpoint.
    Serve(ServeArgs),
}

/// Arguments for commands that only read a model.
#[derive(Parser, Debug)]
pub struct ModelArgs {
    /// Model file (JSON, or YAML with a .yaml/.yml extension). Reads stdin when omitted.
    pub file: Option<PathBuf>,
}

/// Arguments for `pipeline-forge generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Request body file. Reads stdin when omitted.
    pub file: Option<PathBuf>,
}

/// Arguments for `pipeline-forge lint`.
#[derive(Parser, Debug)]
pub struct LintArgs {
    /// Model file. Reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Print advisories as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `pipeline-forge deploy`.
#[derive(Parser, Debug)]
pub struct DeployArgs {
    /// Model file. Reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Manifest flavour to produce.
    #[arg(short, long, value_enum, default_value_t = DeployFormat::DockerCompose)]
    pub format: DeployFormat,
}

/// Arguments for `pipeline-forge instrument`.
#[derive(Parser, Debug)]
pub struct InstrumentArgs {
    /// Model file. Reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Application language.
    #[arg(long, value_enum, default_value_t = Language::Python)]
    pub lang: Language,

    /// Print the install commands instead of the setup code.
    #[arg(long)]
    pub install: bool,
}

/// Arguments for `pipeline-forge components`.
#[derive(Parser, Debug)]
pub struct ComponentsArgs {
    /// Only list one category (receiver, processor, exporter, connector).
    #[arg(short, long)]
    pub category: Option<Category>,

    /// Print registry entries as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `pipeline-forge add`.
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Component category (receiver, processor, exporter, connector).
    pub category: Category,

    /// Component type, e.g. `otlp` or `batch`.
    #[arg(value_name = "TYPE")]
    pub type_id: String,

    /// Pipeline to add the component to.
    #[arg(short, long, default_value = "traces")]
    pub signal: Signal,

    /// Model file to start from. Starts from an empty model when omitted.
    pub file: Option<PathBuf>,
}

/// Arguments for `pipeline-forge serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Listen address. Overrides FORGE_BIND_ADDR.
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Request body cap in bytes. Overrides FORGE_MAX_BODY_BYTES.
    #[arg(long)]
    pub max_body_bytes: Option<usize>,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
///
/// For control over logging initialization, use `parse_cli()` and `run_with_cli()`.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Render(args) => run_render_command(args),
        Commands::Generate(args) => run_generate_command(args),
        Commands::Lint(args) => run_lint_command(args),
        Commands::Deploy(args) => run_deploy_command(args),
        Commands::Instrument(args) => run_instrument_command(args),
        Commands::Components(args) => run_components_command(args),
        Commands::Add(args) => run_add_command(args),
        Commands::Serve(args) => run_serve_command(args).await,
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

fn run_render_command(args: ModelArgs) -> anyhow::Result<()> {
    let pipelines = load_model_file(args.file.as_deref())?;
    info!(pipelines = %pipelines.summary(), "Rendering configuration");
    print!("{}", render(&pipelines));
    Ok(())
}

fn run_generate_command(args: GenerateArgs) -> anyhow::Result<()> {
    let body = read_input(args.file.as_deref())?;
    print!("{}", endpoint::generate_yaml(&body));
    Ok(())
}

fn run_lint_command(args: LintArgs) -> anyhow::Result<()> {
    let pipelines = load_model_file(args.file.as_deref())?;
    let advisories = lint::lint(&pipelines);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&advisories)?);
        return Ok(());
    }

    if advisories.is_empty() {
        info!("No issues found");
    }
    for advisory in &advisories {
        println!("{advisory}");
    }
    Ok(())
}

fn run_deploy_command(args: DeployArgs) -> anyhow::Result<()> {
    let pipelines = load_model_file(args.file.as_deref())?;
    info!(format = %args.format, "Generating deployment manifest");
    print!("{}", deploy::generate(&pipelines, args.format));
    Ok(())
}

fn run_instrument_command(args: InstrumentArgs) -> anyhow::Result<()> {
    let pipelines = load_model_file(args.file.as_deref())?;
    info!(lang = %args.lang, "Generating instrumentation snippet");
    let snippet = instrument::generate(&pipelines, args.lang);

    if args.install {
        if snippet.install.is_empty() {
            warn!("Model has no receivers or exporters; nothing to install");
        } else {
            println!("{}", snippet.install);
        }
        return Ok(());
    }
    println!("{}", snippet.code);
    Ok(())
}

fn run_components_command(args: ComponentsArgs) -> anyhow::Result<()> {
    let registry = ComponentRegistry::builtin();
    let categories: Vec<Category> = match args.category {
        Some(category) => vec![category],
        None => Category::all().to_vec(),
    };

    if args.json {
        let kinds: Vec<&ComponentKind> = categories
            .iter()
            .flat_map(|category| registry.kinds(*category))
            .collect();
        println!("{}", serde_json::to_string_pretty(&kinds)?);
        return Ok(());
    }

    for category in categories {
        println!("{category}:");
        for kind in registry.kinds(category) {
            print!("{}", describe_kind(kind));
        }
    }
    Ok(())
}

fn run_add_command(args: AddArgs) -> anyhow::Result<()> {
    let registry = ComponentRegistry::builtin();
    let mut pipelines = match args.file.as_deref() {
        Some(path) => load_model_file(Some(path))?,
        None => PipelineSet::empty(),
    };

    if registry.lookup(args.category, &args.type_id).is_none() {
        warn!(
            category = %args.category,
            type_id = %args.type_id,
            "Type is not in the registry; adding it with empty settings"
        );
    }

    let instance = pipelines
        .pipeline_mut(args.signal)
        .add_component(&registry, args.category, &args.type_id);
    info!(signal = %args.signal, id = %instance.id, "Added component");

    println!("{}", serde_json::to_string_pretty(&pipelines)?);
    Ok(())
}

async fn run_serve_command(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(bind) = args.bind {
        config = config.with_bind_addr(bind);
    }
    if let Some(bytes) = args.max_body_bytes {
        config = config.with_max_body_bytes(bytes);
    }

    server::serve(config).await
}

// ============================================================================
// Input Helpers
// ============================================================================

/// Read a whole input. `None` or `-` reads stdin.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read {}: {}", path.display(), e)
        }),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Load a model from a file or stdin.
///
/// Files ending in `.yaml` or `.yml` are read as YAML, everything else as
/// JSON. Malformed content yields the empty model; only I/O failures are
/// errors.
pub fn load_model_file(path: Option<&Path>) -> anyhow::Result<PipelineSet> {
    let text = read_input(path)?;
    if path.is_some_and(is_yaml_path) {
        return Ok(model_from_yaml(&text));
    }
    Ok(PipelineSet::from_snapshot(&text))
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

fn model_from_yaml(text: &str) -> PipelineSet {
    if text.trim().is_empty() {
        return PipelineSet::empty();
    }

    let parsed = serde_yaml::from_str::<SettingsValue>(text)
        .map_err(|e| e.to_string())
        .and_then(|value| PipelineSet::from_value(&value).map_err(|e| e.to_string()));

    match parsed {
        Ok(pipelines) => pipelines,
        Err(err) => {
            warn!(error = %err, "Discarding malformed YAML model");
            PipelineSet::empty()
        }
    }
}

fn describe_kind(kind: &ComponentKind) -> String {
    let mut out = format!("  {:<16} {}\n", kind.type_id, kind.label);
    for field in &kind.fields {
        let default = match &field.default {
            SettingsValue::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.push_str(&format!(
            "    {:<32} {:<7} default: {}",
            field.key,
            input_name(field.input),
            default
        ));
        if !field.options.is_empty() {
            out.push_str(&format!(" [{}]", field.options.join(", ")));
        }
        out.push('\n');
    }
    if kind.fields.is_empty() && !settings::clean_settings(&kind.defaults).is_empty() {
        out.push_str(&format!("    defaults: {}\n", kind.defaults));
    }
    out
}

fn input_name(input: InputKind) -> &'static str {
    match input {
        InputKind::Text => "text",
        InputKind::Number => "number",
        InputKind::Select => "select",
        InputKind::Toggle => "toggle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["pipeline-forge", "render"]).expect("should parse");
        match cli.command {
            Commands::Render(args) => assert!(args.file.is_none()),
            _ => panic!("Expected Render command"),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_add_command_arguments() {
        let cli = Cli::try_parse_from([
            "pipeline-forge",
            "add",
            "processor",
            "batch",
            "--signal",
            "logs",
            "model.json",
        ])
        .expect("should parse");

        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.category, Category::Processor);
                assert_eq!(args.type_id, "batch");
                assert_eq!(args.signal, Signal::Logs);
                assert_eq!(args.file, Some(PathBuf::from("model.json")));
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_add_rejects_unknown_category() {
        let result = Cli::try_parse_from(["pipeline-forge", "add", "extension", "pprof"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_deploy_format_names() {
        let cli = Cli::try_parse_from(["pipeline-forge", "deploy", "--format", "helm-values"])
            .expect("should parse");
        match cli.command {
            Commands::Deploy(args) => assert_eq!(args.format, DeployFormat::HelmValues),
            _ => panic!("Expected Deploy command"),
        }

        let cli = Cli::try_parse_from(["pipeline-forge", "deploy"]).expect("should parse");
        match cli.command {
            Commands::Deploy(args) => assert_eq!(args.format, DeployFormat::DockerCompose),
            _ => panic!("Expected Deploy command"),
        }
    }

    #[test]
    fn test_instrument_arguments() {
        let cli = Cli::try_parse_from(["pipeline-forge", "instrument", "--lang", "nodejs", "--install"])
            .expect("should parse");
        match cli.command {
            Commands::Instrument(args) => {
                assert_eq!(args.lang, Language::NodeJs);
                assert!(args.install);
                assert!(args.file.is_none());
            }
            _ => panic!("Expected Instrument command"),
        }

        let cli = Cli::try_parse_from(["pipeline-forge", "instrument", "model.yaml"]).expect("should parse");
        match cli.command {
            Commands::Instrument(args) => {
                assert_eq!(args.lang, Language::Python);
                assert!(!args.install);
            }
            _ => panic!("Expected Instrument command"),
        }

        assert!(Cli::try_parse_from(["pipeline-forge", "instrument", "--lang", "ruby"]).is_err());
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from([
            "pipeline-forge",
            "--log-level",
            "debug",
            "serve",
            "--bind",
            "0.0.0.0:8080",
        ])
        .expect("should parse");
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
                assert!(args.max_body_bytes.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn test_load_json_model() {
        let file = write_temp(
            ".json",
            r#"{"pipelines":{"traces":{"receivers":[{"type":"otlp"}]}}}"#,
        );
        let pipelines = load_model_file(Some(file.path())).unwrap();
        assert_eq!(pipelines.summary(), "1 receiver");
        assert_eq!(
            pipelines.pipeline(Signal::Traces).components(Category::Receiver)[0].id,
            "otlp"
        );
    }

    #[test]
    fn test_load_yaml_model() {
        let file = write_temp(
            ".yaml",
            "pipelines:\n  metrics:\n    receivers:\n      - type: hostmetrics\n        settings:\n          collection_interval: 10s\n",
        );
        let pipelines = load_model_file(Some(file.path())).unwrap();
        let receiver = &pipelines.pipeline(Signal::Metrics).components(Category::Receiver)[0];
        assert_eq!(receiver.kind, "hostmetrics");
        assert_eq!(receiver.settings["collection_interval"], "10s");
    }

    #[test]
    fn test_malformed_file_is_empty_model() {
        let file = write_temp(".json", "{not json");
        assert!(load_model_file(Some(file.path())).unwrap().is_empty());

        let file = write_temp(".yml", "pipelines: [unclosed");
        assert!(load_model_file(Some(file.path())).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let err = load_model_file(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_describe_kind_lists_fields() {
        let registry = ComponentRegistry::builtin();
        let batch = registry.lookup(Category::Processor, "batch").unwrap();
        let text = describe_kind(batch);
        assert!(text.starts_with("  batch"));
        assert!(text.contains("send_batch_size"));
        assert!(text.contains("number"));
    }
}
