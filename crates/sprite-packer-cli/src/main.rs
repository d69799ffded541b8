use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Deserialize;
use sprite_packer_core::config::{MapperConfig, MapperKind};
use sprite_packer_core::{Item, PackingResult, map_items, to_json};
use tracing::{error, info};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-packer",
    about = "Compute sprite sheet layouts for sets of images",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute a layout and write it as JSON
    Layout(LayoutArgs),
    /// Simple timing bench (maps once, prints time + efficiency)
    Bench(BenchArgs),
}

#[derive(Args, Debug, Clone)]
struct MapperArgs {
    /// Mapper: horizontal | vertical | optimal
    #[arg(long, value_parser = ["horizontal", "vertical", "optimal"], default_value = "optimal", help_heading = "Mapper")]
    mapper: String,
    /// Optimal: stop once a candidate reaches this efficiency (0 < e <= 1)
    #[arg(long, default_value_t = 1.0, help_heading = "Mapper")]
    cutoff_efficiency: f32,
    /// Optimal: stop after this many successful candidates
    #[arg(long, default_value_t = 70, help_heading = "Mapper")]
    max_candidates: u32,
    /// Optimal: time budget (ms), checked between trials
    #[arg(long, help_heading = "Mapper")]
    time_budget: Option<u64>,
    /// YAML config file path (keys present in the file override flags)
    #[arg(long, help_heading = "Mapper")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    /// Image file, directory of images, or a .json manifest of {name, width, height}
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file (defaults to stdout)
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    #[command(flatten)]
    mapper: MapperArgs,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Image file, directory of images, or a .json manifest
    input: PathBuf,
    #[command(flatten)]
    mapper: MapperArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Layout(args) => run_layout(args),
        Commands::Bench(args) => run_bench(args),
    }
}

fn run_layout(args: &LayoutArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.mapper)?;

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let items = load_items(&args.input)?;
    info!(count = items.len(), "loaded items");
    let result = map_items(&items, &cfg)?;
    log_result(&result);

    let text = serde_json::to_string_pretty(&to_json(&result))?;
    match &args.out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("create out dir {}", dir.display()))?;
            }
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote layout");
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn run_bench(args: &BenchArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.mapper)?;
    let items = load_items(&args.input)?;
    let start = Instant::now();
    let result = map_items(&items, &cfg)?;
    let elapsed = start.elapsed();
    println!(
        "items={} mapper={:?} time_ms={} size={}x{} efficiency={:.2}%",
        items.len(),
        cfg.kind,
        elapsed.as_millis(),
        result.width,
        result.height,
        result.efficiency() * 100.0
    );
    if let Some(stats) = &result.stats {
        println!("{}", stats.summary());
    }
    Ok(())
}

fn log_result(result: &PackingResult<String>) {
    info!(
        width = result.width,
        height = result.height,
        efficiency = %format!("{:.2}%", result.efficiency() * 100.0),
        "layout computed"
    );
    if let Some(stats) = &result.stats {
        info!("{}", stats.summary());
    }
}

fn build_config(args: &MapperArgs) -> anyhow::Result<MapperConfig> {
    let kind: MapperKind = args
        .mapper
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown mapper: {}", args.mapper))?;
    let cfg = MapperConfig {
        kind,
        cutoff_efficiency: args.cutoff_efficiency,
        max_candidates: args.max_candidates,
        time_budget_ms: args.time_budget,
    };
    let cfg = if let Some(path) = &args.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_mapper_config(cfg)?
    } else {
        cfg
    };
    cfg.validate()?;
    Ok(cfg)
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    mapper: Option<String>,
    cutoff_efficiency: Option<f32>,
    max_candidates: Option<u32>,
    time_budget_ms: Option<u64>,
}

impl YamlConfig {
    fn into_mapper_config(self, mut cfg: MapperConfig) -> anyhow::Result<MapperConfig> {
        if let Some(v) = self.mapper {
            cfg.kind = v
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown mapper in config: {}", v))?;
        }
        if let Some(v) = self.cutoff_efficiency {
            cfg.cutoff_efficiency = v;
        }
        if let Some(v) = self.max_candidates {
            cfg.max_candidates = v;
        }
        if let Some(v) = self.time_budget_ms {
            cfg.time_budget_ms = Some(v);
        }
        Ok(cfg)
    }
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    name: String,
    width: u32,
    height: u32,
}

fn load_items(input: &Path) -> anyhow::Result<Vec<Item<String>>> {
    if is_manifest(input) {
        let text = fs::read_to_string(input)
            .with_context(|| format!("read manifest {}", input.display()))?;
        return parse_manifest(&text);
    }
    let paths = gather_paths(input);
    let mut items = Vec::with_capacity(paths.len());
    for p in &paths {
        match image::image_dimensions(p) {
            Ok((w, h)) => items.push(Item::new(w, h, item_name(p))),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
    }
    Ok(items)
}

fn parse_manifest(text: &str) -> anyhow::Result<Vec<Item<String>>> {
    let entries: Vec<ManifestEntry> = serde_json::from_str(text)?;
    Ok(entries
        .into_iter()
        .map(|e| Item::new(e.width, e.height, e.name))
        .collect())
}

fn gather_paths(path: &Path) -> Vec<PathBuf> {
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    list
}

fn item_name(p: &Path) -> String {
    p.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.to_string_lossy().replace('\\', "/"))
}

fn extension(p: &Path) -> Option<String> {
    p.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
}

fn is_manifest(p: &Path) -> bool {
    p.is_file() && extension(p).as_deref() == Some("json")
}

fn is_image(p: &Path) -> bool {
    matches!(
        extension(p),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "gif" | "ico")
    )
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_keeps_order_and_names() {
        let items = parse_manifest(
            r#"[{"name": "home", "width": 16, "height": 16},
                {"name": "logo", "width": 120, "height": 40}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].payload, "logo");
        assert_eq!((items[1].width, items[1].height), (120, 40));
    }

    #[test]
    fn yaml_overrides_only_present_keys() {
        let y: YamlConfig = serde_yaml::from_str("mapper: vertical\nmax_candidates: 5\n").unwrap();
        let cfg = y.into_mapper_config(MapperConfig::default()).unwrap();
        assert_eq!(cfg.kind, MapperKind::VerticalOnly);
        assert_eq!(cfg.max_candidates, 5);
        assert_eq!(cfg.cutoff_efficiency, 1.0);
    }

    #[test]
    fn yaml_rejects_unknown_mapper() {
        let y: YamlConfig = serde_yaml::from_str("mapper: spiral\n").unwrap();
        assert!(y.into_mapper_config(MapperConfig::default()).is_err());
    }

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image(Path::new("a/B.PNG")));
        assert!(is_image(Path::new("icon.ico")));
        assert!(!is_image(Path::new("notes.txt")));
        assert_eq!(item_name(Path::new("dir/icon-home.png")), "icon-home");
    }
}
