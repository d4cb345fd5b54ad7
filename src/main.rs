mod cli;

use vidvault::{
    blob,
    bulk::{self, BulkSummary, Selection},
    config::{self, RepositoryBackend},
    logging, MediaLibrary,
};
use vv_av::ToolRegistry;
use vv_db::{migrate_json_to, open_repository, JsonVideoRepository};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, Targets};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Thumbnail(targets) => {
            run_bulk(cli.config.as_deref(), targets, "Thumbnails", bulk::regenerate_thumbnails)
        }
        Commands::Transcode(targets) => {
            run_bulk(cli.config.as_deref(), targets, "Transcodes", bulk::transcode_videos)
        }
        Commands::MigrateJson { from } => migrate_json(cli.config.as_deref(), from),
        Commands::Decode { path, out } => decode(cli.config.as_deref(), &path, &out),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vidvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_bulk(
    config_path: Option<&Path>,
    targets: Targets,
    label: &str,
    job: fn(&MediaLibrary, &Selection) -> vv_core::Result<BulkSummary>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let library = MediaLibrary::open(config)?;

    let selection = if targets.all {
        Selection::All
    } else {
        Selection::Ids(targets.ids.clone())
    };

    let result = job(&library, &selection);
    library.close()?;
    let summary = result?;

    if targets.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{}: {} succeeded, {} failed",
            label,
            summary.succeeded.len(),
            summary.failed.len()
        );
        for (id, reason) in &summary.failed {
            println!("  ✗ {}: {}", id, reason);
        }
    }

    if !summary.failed.is_empty() {
        anyhow::bail!("{} of {} videos failed", summary.failed.len(), summary.total());
    }
    Ok(())
}

fn migrate_json(config_path: Option<&Path>, from: Option<String>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let document = from.unwrap_or_else(|| config.repository.json_file.clone());

    if config.repository.backend == RepositoryBackend::Json
        && document == config.repository.json_file
    {
        anyhow::bail!(
            "Source document {} is the active repository; configure another backend first",
            document
        );
    }

    let storage = vv_storage::open_local(&config.storage.root_dir, config.storage.key)?;
    let source = JsonVideoRepository::open(Arc::clone(&storage), &document)?;
    let target = open_repository(&config, storage)?;

    let result = migrate_json_to(&source, target.as_ref());
    target.close()?;
    let mapping = result?;

    for (old_id, new_id) in &mapping {
        println!("  {} -> {}", old_id, new_id);
    }
    println!("Migrated {} videos from {}", mapping.len(), document);
    Ok(())
}

fn decode(config_path: Option<&Path>, path: &str, out: &Path) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let storage = vv_storage::open_local(&config.storage.root_dir, config.storage.key)?;

    let bytes = blob::download(storage.as_ref(), path, out)?;
    println!("Decoded {} ({} bytes) to {:?}", path, bytes, out);
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tools = ToolRegistry::discover(&config.tools).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Thumbnails and transcodes will fail without them.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        for warning in &warnings {
            println!("! {}", warning);
        }
    }
    println!("  Storage root: {:?}", config.storage.root_dir);
    println!("  Repository: {:?}", config.repository.backend);
    println!("  Thumbnail width: {}", config.thumbnail.width);
    println!(
        "  Transcode: {} / {} -> {}",
        config.transcode.video_codec, config.transcode.audio_codec, config.transcode.file_name
    );

    Ok(())
}
