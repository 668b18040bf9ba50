//! pilgrim-cms operator CLI
//!
//! Inspect and maintain the site content document from a shell. Results go to
//! stdout as JSON; logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};
use tracing_subscriber::filter::LevelFilter;

use pilgrim_cms::catalog::{PackageQuery, PackageSort};
use pilgrim_cms::config::{
    CliOptions, ResolvedParams, expand_path, load_config, resolve_params,
};
use pilgrim_cms::prefs::PreferenceStore;
use pilgrim_cms::provider::StatusMirror;
use pilgrim_cms::router::{Router, Session};
use pilgrim_cms::{AnyStore, ContentProvider, ContentStore, default_document, default_value};
use pilgrim_common::{PackageKind, ThemeMode};

/// Content maintenance for the pilgrimage site: reconcile stored content
/// against the default table, apply edits, reset, and check routes.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct RootCli {
    #[command(subcommand)]
    command: CliCommand,
    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Reconcile a stored document file (or nothing) and print the result.
    Reconcile(ReconcileArgs),
    /// Load content from the configured store and print provider status.
    Load,
    /// Merge a partial document into the stored content and persist it.
    Mutate(MutateArgs),
    /// Replace the stored content with the default table.
    Reset(ResetArgs),
    /// Resolve a URL fragment against the stored content.
    Route(RouteArgs),
    /// Filter and sort packages from the stored content.
    Packages(PackagesArgs),
    /// Show or change device-local preferences.
    Prefs(PrefsArgs),
    /// Print the default content table.
    Defaults,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Config file (toml, yaml or json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory for the file store. Overrides config.
    #[arg(long, global = true)]
    store_root: Option<PathBuf>,
    /// Base URL for the HTTP store (needs the `http` feature).
    #[arg(long, global = true)]
    store_url: Option<String>,
    /// Store collection.
    #[arg(long, global = true)]
    collection: Option<String>,
    /// Document name inside the collection.
    #[arg(long, global = true)]
    name: Option<String>,
    /// Write provider status JSON here after store commands.
    #[arg(long, global = true)]
    status_file: Option<PathBuf>,
    /// Directory for device-local preferences.
    #[arg(long, global = true)]
    prefs_dir: Option<PathBuf>,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

impl CliOptions for GlobalArgs {
    fn store_root(&self) -> Option<PathBuf> {
        self.store_root.clone()
    }
    fn store_url(&self) -> Option<String> {
        self.store_url.clone()
    }
    fn collection(&self) -> Option<String> {
        self.collection.clone()
    }
    fn name(&self) -> Option<String> {
        self.name.clone()
    }
    fn status_file(&self) -> Option<PathBuf> {
        self.status_file.clone()
    }
    fn prefs_dir(&self) -> Option<PathBuf> {
        self.prefs_dir.clone()
    }
    fn log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

#[derive(Args, Debug, Clone)]
struct ReconcileArgs {
    /// Stored document as JSON. Omit to reconcile an empty store.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Print only the report.
    #[arg(long)]
    report_only: bool,
}

#[derive(Args, Debug, Clone)]
struct MutateArgs {
    /// Partial document as JSON.
    #[arg(long)]
    patch: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ResetArgs {
    /// Confirm that every admin edit should be discarded.
    #[arg(long)]
    yes: bool,
}

#[derive(Args, Debug, Clone)]
struct RouteArgs {
    /// Fragment such as `#book-now?subject=Hajj`.
    fragment: String,
    /// Resolve as a signed-in admin.
    #[arg(long)]
    authenticated: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Document,
    PriceAsc,
    PriceDesc,
    Name,
}

impl From<SortArg> for PackageSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Document => PackageSort::Document,
            SortArg::PriceAsc => PackageSort::PriceAsc,
            SortArg::PriceDesc => PackageSort::PriceDesc,
            SortArg::Name => PackageSort::Name,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct PackagesArgs {
    /// Package list: hajj, umrah or exclusive.
    #[arg(long)]
    list: Option<String>,
    /// Hajj or umrah, across all lists.
    #[arg(long)]
    pilgrimage: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    max_price: Option<u64>,
    #[arg(long)]
    include_disabled: bool,
    #[arg(long, value_enum, default_value = "document")]
    sort: SortArg,
}

#[derive(Args, Debug, Clone)]
struct PrefsArgs {
    #[command(subcommand)]
    action: Option<PrefsAction>,
}

#[derive(Subcommand, Debug, Clone)]
enum PrefsAction {
    /// Print both preferences (default).
    Show,
    /// Change the theme preference.
    Theme {
        #[arg(long)]
        dark: bool,
        #[arg(long)]
        light: bool,
        /// `#rgb` / `#rrggbb`, or empty for the site colour.
        #[arg(long)]
        primary_color: Option<String>,
    },
    /// Flip a checklist item.
    Toggle { item: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = RootCli::parse();

    let config = match &cli.global.config {
        Some(path) => {
            let path = expand_path(path.to_string_lossy());
            Some(
                load_config(&path)?
                    .ok_or_else(|| anyhow!("config file {} not found", path.display()))?,
            )
        }
        None => None,
    };
    let params = resolve_params(&cli.global, config.as_ref());

    let level = params
        .log_level
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("invalid log level: {}", params.log_level))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        CliCommand::Reconcile(args) => run_reconcile(args),
        CliCommand::Defaults => print_json(default_value()),
        CliCommand::Load => run_load(&params).await,
        CliCommand::Mutate(args) => run_mutate(&params, args).await,
        CliCommand::Reset(args) => run_reset(&params, args).await,
        CliCommand::Route(args) => run_route(&params, args).await,
        CliCommand::Packages(args) => run_packages(&params, args).await,
        CliCommand::Prefs(args) => run_prefs(&params, args).await,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn run_reconcile(args: ReconcileArgs) -> Result<()> {
    let remote = args.input.as_deref().map(read_json).transpose()?;
    let reconciled = pilgrim_cms::reconcile(remote.as_ref())?;
    if args.report_only {
        return print_json(&reconciled.report);
    }
    print_json(&json!({
        "persistDefaults": reconciled.persist_defaults,
        "report": reconciled.report,
        "document": reconciled.document,
    }))
}

/// A loaded provider and, when a status file is configured, its live mirror.
struct StoreSession {
    provider: ContentProvider<AnyStore>,
    mirror: Option<StatusMirror>,
}

async fn open_provider(params: &ResolvedParams) -> Result<StoreSession> {
    let provider = ContentProvider::new(params.build_store()?);
    let mirror = params
        .status_file
        .clone()
        .map(|path| StatusMirror::spawn(provider.subscribe(), path));
    provider.load().await?;
    // an initial write-back must land before any later write is issued
    provider.flush().await;
    Ok(StoreSession { provider, mirror })
}

async fn finish(session: StoreSession) -> Result<()> {
    let status = session.provider.flush().await;
    if let Some(mirror) = session.mirror {
        mirror.close(&status).await?;
    }
    print_json(&status)
}

async fn run_load(params: &ResolvedParams) -> Result<()> {
    let session = open_provider(params).await?;
    finish(session).await
}

async fn run_mutate(params: &ResolvedParams, args: MutateArgs) -> Result<()> {
    let patch = read_json(&args.patch)?;
    let session = open_provider(params).await?;
    let write = session.provider.mutate(patch).await?;
    let seq = write.seq;
    let outcome = write.wait().await;
    finish(session).await?;
    outcome.with_context(|| format!("content write {seq} failed"))
}

async fn run_reset(params: &ResolvedParams, args: ResetArgs) -> Result<()> {
    if !args.yes {
        bail!("reset discards every admin edit; re-run with --yes to confirm");
    }
    let session = open_provider(params).await?;
    let outcome = session.provider.reset_to_default().await?.wait().await;
    finish(session).await?;
    outcome.context("reset write failed")
}

/// Read and reconcile without writing anything back.
async fn read_document(params: &ResolvedParams) -> Result<pilgrim_cms::Document> {
    let store = params.build_store()?;
    match store.get().await {
        Ok(remote) => Ok(pilgrim_cms::reconcile(remote.as_ref())?.document),
        Err(e) => {
            tracing::warn!(store = %store.describe(), error = %e, "store unreadable; using defaults");
            Ok(default_document().clone())
        }
    }
}

async fn run_route(params: &ResolvedParams, args: RouteArgs) -> Result<()> {
    let document = read_document(params).await?;
    let session = if args.authenticated {
        Session::authenticated()
    } else {
        Session::anonymous()
    };
    let router = Router::new(&args.fragment, &document, session);
    print_json(router.current())
}

fn parse_kind(raw: Option<&str>, flag: &str) -> Result<Option<PackageKind>> {
    raw.map(|label| {
        PackageKind::from_label(label).ok_or_else(|| anyhow!("unknown package kind for {flag}: {label}"))
    })
    .transpose()
}

async fn run_packages(params: &ResolvedParams, args: PackagesArgs) -> Result<()> {
    let document = read_document(params).await?;
    let query = PackageQuery {
        list: parse_kind(args.list.as_deref(), "--list")?,
        pilgrimage: parse_kind(args.pilgrimage.as_deref(), "--pilgrimage")?,
        include_disabled: args.include_disabled,
        search: args.search,
        max_price: args.max_price,
        sort: args.sort.into(),
    };
    let rows: Vec<Value> = query
        .run(&document.packages)
        .iter()
        .map(|pkg| {
            json!({
                "list": pkg.list().as_label(),
                "name": pkg.name(),
                "price": pkg.price(),
                "enabled": pkg.enabled(),
            })
        })
        .collect();
    print_json(&rows)
}

async fn run_prefs(params: &ResolvedParams, args: PrefsArgs) -> Result<()> {
    let prefs = PreferenceStore::new(&params.prefs_dir);
    match args.action.unwrap_or(PrefsAction::Show) {
        PrefsAction::Show => {}
        PrefsAction::Theme {
            dark,
            light,
            primary_color,
        } => {
            if dark && light {
                bail!("--dark and --light are mutually exclusive");
            }
            let mut theme = prefs.theme();
            if dark {
                theme.mode = ThemeMode::Dark;
            } else if light {
                theme.mode = ThemeMode::Light;
            }
            if let Some(color) = primary_color {
                theme.primary_color = color;
            }
            prefs.save_theme(&theme)?;
        }
        PrefsAction::Toggle { item } => {
            prefs.toggle_checklist_item(&item)?;
        }
    }

    let document = read_document(params).await?;
    let checklist = prefs.checklist();
    let (done, total) = checklist.completion(&document.pages.checklist);
    print_json(&json!({
        "theme": prefs.theme(),
        "checklist": checklist,
        "completed": done,
        "total": total,
    }))
}
