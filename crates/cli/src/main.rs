use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use recdata_engine::{DataRequest, DataResolver, FieldValueProvider, InMemoryRecordStore, ProviderList, StaticProvider};
use recdata_registry::{RegistryConfig, SchemaCatalog};
use recdata_types::NestedTree;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "recdata", version, about = "Resolve structured data attached to record fields")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the data of a table/field and print it as JSON
    Resolve(ResolveArgs),
    /// List every table:field pair declared in the schema
    Schema(SourceArgs),
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[arg(long)]
    table: String,
    #[arg(long)]
    field: String,
    /// Primary key of the stored record
    #[arg(long)]
    uid: Option<u64>,
    /// Explicit record as a JSON object; skips the record store
    #[arg(long, value_name = "JSON")]
    record: Option<String>,
    /// JSON object merged over the decoded value; repeatable, later wins
    #[arg(long = "overlay", value_name = "JSON")]
    overlays: Vec<String>,
    #[command(flatten)]
    sources: SourceArgs,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Schema document (YAML or JSON)
    #[arg(long)]
    schema: Option<PathBuf>,
    /// Record fixture document (YAML or JSON)
    #[arg(long)]
    records: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = RegistryConfig::load();

    match cli.command {
        Command::Resolve(args) => run_resolve(&config, args),
        Command::Schema(sources) => run_schema(&config, &sources),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_resolve(config: &RegistryConfig, args: ResolveArgs) -> Result<()> {
    let schema = load_schema(config, &args.sources)?;
    let store = load_records(config, &args.sources)?;
    let providers = build_providers(&args.overlays)?;

    let mut request = DataRequest::new(args.table, args.field);
    request.uid = args.uid;
    if let Some(raw) = args.record.as_deref() {
        request = request.with_record(parse_tree(raw, "--record")?);
    }

    let resolver = DataResolver::new(Arc::new(schema), Arc::new(store), Arc::new(providers));
    let values = resolver.resolve_data(&request, None)?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn run_schema(config: &RegistryConfig, sources: &SourceArgs) -> Result<()> {
    let schema = load_schema(config, sources)?;
    for (table, field) in schema.field_pairs() {
        println!("{table}:{field}");
    }
    Ok(())
}

fn load_schema(config: &RegistryConfig, sources: &SourceArgs) -> Result<SchemaCatalog> {
    let Some(path) = sources.schema.clone().or_else(|| config.schema_path()) else {
        bail!("no schema document configured; pass --schema or set RECDATA_SCHEMA_PATH");
    };
    SchemaCatalog::load_from_path(path)
}

fn load_records(config: &RegistryConfig, sources: &SourceArgs) -> Result<InMemoryRecordStore> {
    match sources.records.clone().or_else(|| config.records_path()) {
        Some(path) => InMemoryRecordStore::load_from_path(path),
        None => {
            debug!("no record fixtures configured; store is empty");
            Ok(InMemoryRecordStore::new())
        }
    }
}

/// Without overlays the list stays empty so the stored value is decoded directly.
fn build_providers(overlays: &[String]) -> Result<ProviderList> {
    if overlays.is_empty() {
        return Ok(ProviderList::new());
    }
    let mut providers = ProviderList::new().with(FieldValueProvider::new());
    for (index, raw) in overlays.iter().enumerate() {
        let values = parse_tree(raw, "--overlay")?;
        providers = providers.with(StaticProvider::new(format!("overlay-{}", index + 1), values));
    }
    Ok(providers)
}

fn parse_tree(raw: &str, option: &str) -> Result<NestedTree> {
    serde_json::from_str(raw).with_context(|| format!("{option} must be a JSON object"))
}
