use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libcompile::{
    compile,
    config::Config,
    web::{self, WebLibrary},
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "libcompile")]
#[command(about = "Merge media-library text exports into one deduplicated catalog and browsable JSON")]
#[command(version)]
struct Cli {
    #[arg(short, long, global = true, help = "YAML config file")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Directory searched for exports (overrides config)")]
    input: Option<PathBuf>,

    #[arg(long, global = true, help = "Compiled CSV path (overrides config)")]
    output_csv: Option<PathBuf>,

    #[arg(long, global = true, help = "Validation report path (overrides config)")]
    report: Option<PathBuf>,

    #[arg(long, global = true, help = "Web data directory (overrides config)")]
    web_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "List extract directory (overrides config)")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover, merge and deduplicate exports into a CSV plus validation report
    Compile,
    /// Build chunked track pages, indexes and metadata from the compiled CSV
    BuildWeb {
        #[arg(long, help = "Tracks per chunk (overrides config)")]
        chunk_size: Option<usize>,
    },
    /// Write the flat track list
    ExtractTracks,
    /// Write the flat artist list
    ExtractArtists,
    /// Write the flat album list
    ExtractAlbums,
    /// Compile, then build the web data from the result
    All,
}

fn main() -> Result<ExitCode> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(input) = cli.input {
        config.input_dir = input;
    }
    if let Some(path) = cli.output_csv {
        config.output_csv = path;
    }
    if let Some(path) = cli.report {
        config.report_path = path;
    }
    if let Some(dir) = cli.web_dir {
        config.web_dir = dir;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Command::Compile => compile::run(&config).map(|c| ExitCode::from(c.exit_status())),
        Command::BuildWeb { chunk_size } => {
            if let Some(n) = chunk_size {
                config.chunk_size = n;
            }
            let rows = load_compiled(&config)?;
            build_web(&config, &rows)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::ExtractTracks => {
            let rows = load_compiled(&config)?;
            let list = web::track_list(&rows);
            write_list(&config, web::TRACKS_FILE, &list)?;
            info!("extracted {} tracks", list.total_tracks);
            Ok(ExitCode::SUCCESS)
        }
        Command::ExtractArtists => {
            let rows = load_compiled(&config)?;
            let list = web::artist_list(&rows);
            write_list(&config, web::ARTISTS_FILE, &list)?;
            info!("extracted {} artists", list.total_artists);
            Ok(ExitCode::SUCCESS)
        }
        Command::ExtractAlbums => {
            let rows = load_compiled(&config)?;
            let list = web::album_list(&rows);
            write_list(&config, web::ALBUMS_FILE, &list)?;
            info!("extracted {} albums", list.total_albums);
            Ok(ExitCode::SUCCESS)
        }
        Command::All => {
            let compilation = compile::run(&config)?;
            if !compilation.succeeded() {
                return Ok(ExitCode::from(compilation.exit_status()));
            }
            build_web(&config, &compilation.records())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_compiled(config: &Config) -> Result<Vec<HashMap<String, String>>> {
    let path = config.resolve(&config.output_csv);
    let rows = compile::read_compiled_csv(&path)
        .with_context(|| format!("loading compiled library; run `compile` first ({})", path.display()))?;
    info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn build_web(config: &Config, rows: &[HashMap<String, String>]) -> Result<()> {
    let library = WebLibrary::build(rows);
    let out_dir = config.resolve(&config.web_dir);
    let chunks = web::write_web_data(&out_dir, &library, config.chunk_size)?;
    info!(
        "web data ready in {}: {} tracks in {} chunks, {} artists, {} albums",
        out_dir.display(),
        library.metadata.total_tracks,
        chunks,
        library.metadata.total_artists,
        library.metadata.total_albums
    );
    Ok(())
}

fn write_list<T: serde::Serialize>(config: &Config, file_name: &str, list: &T) -> Result<()> {
    let path: PathBuf = config.resolve(&config.data_dir).join(Path::new(file_name));
    web::write_json(&path, list, true)?;
    info!("wrote {}", path.display());
    Ok(())
}
