use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use apigen_core::config::{self, ApigenConfig, CONFIG_FILE_NAME};
use apigen_core::parse::{self, OpenApiSpec};
use apigen_core::{CodeGenerator, GeneratedFile};
use apigen_typescript::ApiGenerator;

#[derive(Parser)]
#[command(name = "apigen", about = "OpenAPI 3.x to TypeScript client generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a TypeScript client module from an OpenAPI spec
    Generate(GenerateArgs),

    /// Validate an OpenAPI spec by running generation without writing output
    Validate {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new apigen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Flags override the values loaded from the config file.
#[derive(Args)]
struct GenerateArgs {
    /// Path to the OpenAPI spec file (YAML or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path of the generated TypeScript module
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit named enums instead of literal unions
    #[arg(long)]
    use_enum_type: bool,

    /// Keep one type per schema instead of Read/Write variants
    #[arg(long)]
    merge_read_write_only: bool,

    /// Union optional properties with `undefined`
    #[arg(long)]
    union_undefined: bool,

    /// Wrap every call in the runtime's `ok` adapter
    #[arg(long)]
    optimistic: bool,

    /// Only emit operations with this tag (repeatable)
    #[arg(long = "include", value_name = "TAG")]
    include: Vec<String>,

    /// Skip operations with this tag (repeatable)
    #[arg(long = "exclude", value_name = "TAG")]
    exclude: Vec<String>,

    /// The input document was converted from Swagger 2.0
    #[arg(long)]
    upgraded: bool,
}

impl GenerateArgs {
    fn apply(self, cfg: &mut ApigenConfig) {
        if let Some(input) = self.input {
            cfg.input = input.display().to_string();
        }
        if let Some(output) = self.output {
            cfg.output = output.display().to_string();
        }
        let options = &mut cfg.options;
        options.use_enum_type |= self.use_enum_type;
        options.merge_read_write_only |= self.merge_read_write_only;
        options.union_undefined |= self.union_undefined;
        options.optimistic |= self.optimistic;
        if !self.include.is_empty() {
            options.include = Some(self.include);
        }
        options.exclude.extend(self.exclude);
        cfg.upgraded |= self.upgraded;
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apigen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ApigenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_spec(path: &Path) -> Result<OpenApiSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse::from_json(&content),
        Some("yaml" | "yml") => parse::from_yaml(&content),
        _ => parse::from_str(&content),
    };
    parsed.with_context(|| format!("failed to parse {}", path.display()))
}

/// Write generated files to disk, creating parent directories as needed.
fn write_files(files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = Path::new(&file.path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    args.apply(&mut cfg);
    log::debug!("generate options: {:?}", cfg.options);

    let spec = load_spec(Path::new(&cfg.input))?;
    eprintln!("Generating {} → {}", cfg.input, cfg.output);
    let files = ApiGenerator.generate(&spec, &cfg)?;
    write_files(&files)?;

    eprintln!(
        "\nThe generated module should not be edited manually; changes will be overwritten."
    );
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let parsed = load_spec(&input)?;

    eprintln!(
        "Valid OpenAPI {} spec: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());

    eprintln!("  Schemas: {}", parsed.schemas().count());

    let operations: usize = parsed
        .paths
        .values()
        .map(|item| item.operations().count())
        .sum();
    eprintln!("  Operations: {operations}");

    // Generation surfaces reference and discriminator errors.
    ApiGenerator.generate(&parsed, &ApigenConfig::default())?;

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
