use clap::Args;
use rescope_core::{FailurePolicy, ResolutionResult, ResolverConfig};
use rescope_runtime::SearchContext;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{Table, Tabled, settings::Style};
use tracing::info;

#[derive(Args)]
pub struct ResolveArgs {
    /// Location pattern, e.g. `classpath*:conf/**/*.yml`
    #[arg(value_name = "PATTERN")]
    pub pattern: String,
    /// Base directory for plain and relative paths. Defaults to current directory.
    #[arg(long, value_name = "DIR")]
    pub base: Option<PathBuf>,
    /// Search path of roots, separated like PATH
    #[arg(long, value_name = "PATH")]
    pub classpath: Option<String>,
    /// Additional search root (repeatable)
    #[arg(long = "root", value_name = "PATH")]
    pub roots: Vec<PathBuf>,
    /// JSON file with resolver settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Skip unreadable origins instead of failing
    #[arg(long)]
    pub lenient: bool,
    /// Enumerate search roots in parallel
    #[arg(long)]
    pub parallel: bool,
    /// Do not descend into symbolic links
    #[arg(long)]
    pub no_follow_links: bool,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct HandleRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URI")]
    uri: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    pattern: &'a str,
    complete: bool,
    #[serde(flatten)]
    result: &'a ResolutionResult,
}

pub fn run(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let context = build_context(&args);
    let resolver = rescope_runtime::build_default_resolver(context, config);

    info!("Resolving {}", args.pattern);
    let result = resolver.get_resources(&args.pattern)?;

    if args.json {
        let report = JsonReport {
            pattern: &args.pattern,
            complete: result.is_complete(),
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if result.is_empty() {
        println!("No resources matched.");
    } else {
        let rows: Vec<HandleRow> = result
            .iter()
            .map(|h| HandleRow {
                kind: h.origin_kind.as_str(),
                name: h.filename().unwrap_or_default().to_string(),
                uri: h.uri.clone(),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::psql()));
    }

    for skipped in result.skipped() {
        eprintln!("skipped {}: {}", skipped.origin, skipped.reason);
    }
    Ok(())
}

fn build_config(args: &ResolveArgs) -> rescope_core::Result<ResolverConfig> {
    let mut config = match &args.config {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::default(),
    };
    if args.lenient {
        config.failure_policy = FailurePolicy::Lenient;
    }
    if args.parallel {
        config.parallel_roots = true;
    }
    if args.no_follow_links {
        config.follow_links = false;
    }
    Ok(config)
}

fn build_context(args: &ResolveArgs) -> SearchContext {
    let mut roots: Vec<PathBuf> = args
        .classpath
        .as_deref()
        .map(|search_path| {
            std::env::split_paths(search_path)
                .filter(|p| !p.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default();
    roots.extend(args.roots.iter().cloned());

    SearchContext {
        base_dir: Some(args.base.clone().unwrap_or_else(crate::current_dir)),
        classpath_root: None,
        roots,
    }
}
