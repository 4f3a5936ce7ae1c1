use std::path::{Path, PathBuf};

use argmatch_core::{
    CommandDefinition, CommandId, CommandSchema, ConverterRegistry, ParseResult, TypedValue,
    ValueType,
};
use argmatch_loader::{SchemaCatalog, SchemaDocument};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status when the parsed arguments produced error diagnostics.
const EXIT_DIAGNOSTICS: i32 = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "argmatch", version)]
#[command(about = "Check command schemas and parse arguments against them")]
struct Cli {
    /// Log verbosity on stderr; overrides `RUST_LOG`.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate schema documents and print their command trees.
    Check(CheckArgs),
    /// Parse an argument vector against a schema document.
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema files and/or directories containing schema documents.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Only print failures.
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Output format for the parse result.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Schema document (`.json`, `.yaml` or `.yml`).
    schema: PathBuf,
    /// Arguments to parse. Put them after `--` when the first one starts
    /// with `-`.
    #[arg(
        value_name = "ARG",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let result = match cli.command {
        Command::Check(args) => run_check(args).map(|()| 0),
        Command::Parse(args) => run_parse(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let documents = collect_documents(&args.inputs)?;
    let mut failures = 0;

    for (path, doc) in &documents {
        match build_schema(doc) {
            Ok(schema) => {
                if !args.quiet {
                    println!("{}: ok", path.display());
                    print_tree(&schema, CommandId::ROOT, 1);
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err}", path.display());
            }
        }
    }

    if failures > 0 {
        return Err(format!(
            "{failures} of {} schema document(s) failed validation",
            documents.len()
        ));
    }
    if !args.quiet {
        println!("Checked {} schema document(s).", documents.len());
    }
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<i32, String> {
    let doc = SchemaDocument::load(&args.schema)
        .map_err(|err| format!("Failed to load '{}': {err}", args.schema.display()))?;
    let parser = doc
        .build_parser(passthrough_registry(&doc.command)?)
        .map_err(|err| format!("Invalid schema '{}': {err}", args.schema.display()))?;

    debug!(args = ?args.args, "parsing arguments");
    let result = parser.parse(&args.args);

    for diagnostic in result.diagnostics() {
        eprintln!("{diagnostic}");
    }
    println!("{}", render(&result, args.format)?);

    if result.has_errors() {
        Ok(EXIT_DIAGNOSTICS)
    } else {
        Ok(0)
    }
}

/// Loads every input, expanding directories into their schema documents.
fn collect_documents(inputs: &[PathBuf]) -> Result<Vec<(PathBuf, SchemaDocument)>, String> {
    let mut documents = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let catalog = SchemaCatalog::from_dir(input)
                .map_err(|err| format!("Failed to load '{}': {err}", input.display()))?;
            for name in catalog.commands() {
                let path = catalog
                    .source(name)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| input.clone());
                if let Some(doc) = catalog.get(name) {
                    documents.push((path, doc.clone()));
                }
            }
        } else {
            let doc = SchemaDocument::load(input)
                .map_err(|err| format!("Failed to load '{}': {err}", input.display()))?;
            documents.push((input.clone(), doc));
        }
    }
    info!(count = documents.len(), "collected schema documents");
    Ok(documents)
}

/// Builds the parser as `parse` would, returning the validated schema.
fn build_schema(doc: &SchemaDocument) -> Result<CommandSchema, String> {
    let parser = doc
        .build_parser(passthrough_registry(&doc.command)?)
        .map_err(|err| err.to_string())?;
    Ok(parser.schema().clone())
}

/// Registry that accepts every custom value type in `root` verbatim as a
/// string, since documents cannot carry converter code.
fn passthrough_registry(root: &CommandDefinition) -> Result<ConverterRegistry, String> {
    let mut ids = Vec::new();
    collect_custom_types(root, &mut ids);

    let mut registry = ConverterRegistry::new();
    for id in ids {
        if registry.contains(&id) {
            continue;
        }
        warn!(type_id = %id, "no converter for custom type; accepting values as strings");
        registry
            .register(id, |raw: &str| Ok(TypedValue::Str(raw.to_string())))
            .map_err(|err| err.to_string())?;
    }
    Ok(registry)
}

fn collect_custom_types(command: &CommandDefinition, ids: &mut Vec<String>) {
    for arg in command.positional.iter().chain(&command.options) {
        if let ValueType::Custom(id) = &arg.value_type {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
    }
    for sub in &command.subcommands {
        collect_custom_types(sub, ids);
    }
}

fn print_tree(schema: &CommandSchema, id: CommandId, depth: usize) {
    let node = schema.node(id);
    let indent = "  ".repeat(depth);

    let mut header = node.name.clone();
    if !node.aliases.is_empty() {
        header.push_str(&format!(" ({})", node.aliases.join(", ")));
    }
    if node.subcommand_required {
        header.push_str(" [subcommand required]");
    }
    println!("{indent}{header}");

    for (index, arg) in node.arguments().enumerate() {
        let mut line = node.display_argument(index);
        if let Some(short) = arg.short {
            line = format!("-{short}, {line}");
        }
        let mut notes = vec![arg.value_type.type_id().to_string(), arg.arity.to_string()];
        if arg.required {
            notes.push("required".to_string());
        }
        if let Some(default) = &arg.default {
            notes.push(format!("default {default}"));
        }
        if !arg.groups.is_empty() {
            notes.push(format!("group {}", arg.groups.join("/")));
        }
        println!("{indent}  {line} [{}]", notes.join(", "));
    }

    for &child in &node.children {
        print_tree(schema, child, depth + 1);
    }
}

fn render(result: &ParseResult, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|err| format!("Failed to serialize parse result: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(result)
            .map_err(|err| format!("Failed to serialize parse result: {err}")),
    }
}
