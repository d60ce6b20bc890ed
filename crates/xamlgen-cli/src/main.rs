//! xamlgen command-line client
//!
//! Generates XAML views and C# view-models for model classes described in a
//! JSON catalog.

mod error;
mod project;
mod sink;

use clap::{Args, Parser, Subcommand, ValueEnum};
use error::Result;
use project::{load_json, read_metadata, FsDataFileLocator};
use sink::{ConsoleNotifier, FsArtifactSink};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use xamlgen_codegen::{
    detect_platform, ArtifactSet, Catalog, GenerationRequest, Notifier, Orchestrator, Platform, SchemaProvider,
};
use xamlgen_core::{CommandMode, ContextFallback, GenerationConfig, PersistenceKind};

/// xamlgen command-line client
#[derive(Parser, Debug)]
#[command(name = "xamlgen")]
#[command(version, about = "Generate XAML views and view-models from model classes")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate artifacts for one class
    Generate(GenerateArgs),
    /// List classes in a catalog
    List {
        /// Schema catalog (JSON)
        #[arg(long)]
        catalog: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Schema catalog (JSON)
    #[arg(long)]
    catalog: PathBuf,

    /// Class to generate for
    #[arg(long = "class")]
    class_name: String,

    /// Generation config (JSON); flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project directory; defaults to the catalog's directory
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Target platform
    #[arg(long, value_enum, default_value_t = PlatformArg::Auto)]
    platform: PlatformArg,

    /// Output directory; defaults to the project directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print artifacts instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// Persistence backend
    #[arg(long, value_enum)]
    persistence: Option<PersistenceArg>,

    /// Command set
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Unmatched context collection policy
    #[arg(long, value_enum)]
    context_fallback: Option<FallbackArg>,

    /// Skip the view-model
    #[arg(long)]
    no_view_model: bool,

    /// Leave view controls unbound
    #[arg(long)]
    no_binding: bool,

    /// Route Add/Edit through a dialog and confirm Delete
    #[arg(long)]
    dialog: bool,

    /// Emit validation hooks
    #[arg(long)]
    validation: bool,

    /// Operations to render as stubs
    #[arg(long, value_enum, value_delimiter = ',')]
    disable: Vec<OperationArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum PlatformArg {
    /// Detect from the project file
    #[default]
    Auto,
    Wpf,
    Uwp,
    Maui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PersistenceArg {
    None,
    File,
    Context,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Crud,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FallbackArg {
    Placeholder,
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OperationArg {
    Add,
    Edit,
    Delete,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "xamlgen=debug" } else { "xamlgen=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        ConsoleNotifier.report_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::List { catalog } => {
            let catalog: Catalog = load_json(&catalog)?;
            for name in catalog.list_all_class_names() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Generate(args) => {
            let notifier = ConsoleNotifier;
            let written = generate(&args)?;
            if !args.dry_run {
                notifier.report_success(&format!(
                    "Generated {} files for {}",
                    written.len(),
                    args.class_name
                ));
            }
            Ok(())
        }
    }
}

/// Generate for one class. Returns the paths written.
fn generate(args: &GenerateArgs) -> Result<Vec<PathBuf>> {
    let catalog: Catalog = load_json(&args.catalog)?;
    let config = layered_config(args)?;
    let project_dir = args
        .project_dir
        .clone()
        .unwrap_or_else(|| catalog_dir(&args.catalog));

    let (platform, platform_diagnostic) = match args.platform {
        PlatformArg::Auto => detect_platform(&read_metadata(&project_dir)?),
        PlatformArg::Wpf => (Platform::Wpf, None),
        PlatformArg::Uwp => (Platform::Uwp, None),
        PlatformArg::Maui => (Platform::Maui, None),
    };
    info!(%platform, project = %project_dir.display(), "generating {}", args.class_name);

    let locator = FsDataFileLocator::new(&project_dir);
    let orchestrator = Orchestrator::new(&catalog, &catalog, &locator)?;
    let request = GenerationRequest {
        config,
        platform,
        project: catalog.project.clone(),
    };
    let mut set = orchestrator.generate(&args.class_name, &request)?;
    if let Some(diagnostic) = platform_diagnostic {
        warn!("{}", diagnostic);
        set.diagnostics.insert(0, diagnostic);
    }
    for diagnostic in &set.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    if args.dry_run {
        print_artifacts(&set);
        return Ok(Vec::new());
    }

    let mut sink = FsArtifactSink::new(args.out.clone().unwrap_or(project_dir));
    let written = set.write_to(&mut sink)?;
    debug!(registered = sink.registered().len(), "registered artifacts");
    Ok(written)
}

fn catalog_dir(catalog: &Path) -> PathBuf {
    match catalog.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Defaults, then the config file, then flags.
fn layered_config(args: &GenerateArgs) -> Result<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => load_json(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(persistence) = args.persistence {
        config.persistence = match persistence {
            PersistenceArg::None => PersistenceKind::None,
            PersistenceArg::File => PersistenceKind::File,
            PersistenceArg::Context => PersistenceKind::Context,
        };
    }
    if let Some(mode) = args.mode {
        config.command_mode = match mode {
            ModeArg::Crud => CommandMode::Crud,
            ModeArg::Legacy => CommandMode::Legacy,
        };
    }
    if let Some(fallback) = args.context_fallback {
        config.context_fallback = match fallback {
            FallbackArg::Placeholder => ContextFallback::Placeholder,
            FallbackArg::Disable => ContextFallback::Disable,
        };
    }
    if args.no_view_model {
        config.generate_view_model = false;
    }
    if args.no_binding {
        config.use_data_binding = false;
    }
    if args.dialog {
        config.use_dialog = true;
    }
    if args.validation {
        config.enable_validation = true;
    }
    for operation in &args.disable {
        match operation {
            OperationArg::Add => config.enable_add = false,
            OperationArg::Edit => config.enable_edit = false,
            OperationArg::Delete => config.enable_delete = false,
        }
    }
    Ok(config)
}

fn print_artifacts(set: &ArtifactSet) {
    for artifact in &set.artifacts {
        for (path, text) in artifact.files() {
            println!("// ---- {} ----", path.display());
            print!("{}", text);
        }
    }
}
