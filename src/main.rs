mod error;

use crate::error::{ErrorKind, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use exn::ResultExt;
use futures::TryStreamExt;
use oga_config::{Config, Overrides};
use oga_extract::models::Asset;
use oga_session::search::{Order, SortBy, TagOperator};
use oga_session::{SearchFilters, Session};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Search and download assets from OpenGameArt.org
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Configuration file to read instead of ~/.oga/config.
    #[arg(long, global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,
    /// Directory downloaded files and manifests are stored in.
    #[arg(long, global = true, value_name = "DIR")]
    root_dir: Option<String>,
    /// Base URL of the catalog.
    #[arg(long, global = true)]
    url: Option<String>,
    /// Maximum number of simultaneous requests.
    #[arg(long, global = true)]
    max_conns: Option<i64>,
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a single asset.
    Describe {
        asset: String,
        /// Print the full asset as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Download every file of a single asset.
    Download { asset: String },
    /// Search for assets, describing each result.
    Search(SearchArgs),
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search the whole page.
    #[arg(long)]
    keys: Option<String>,
    /// Search the asset title.
    #[arg(long)]
    title: Option<String>,
    /// Search the submitter name.
    #[arg(long)]
    submitter: Option<String>,
    /// One of: favorites, created, views.
    #[arg(long, default_value = "favorites")]
    sort_by: String,
    #[arg(long)]
    ascending: bool,
    /// Asset type (2d, 3d, concept, texture, music, sfx, doc); repeatable.
    #[arg(long = "type")]
    types: Vec<String>,
    /// License (cc-by-40, cc0, gpl-30, ...); repeatable.
    #[arg(long = "license")]
    licenses: Vec<String>,
    /// Freeform tag; repeatable.
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// One of: or, and, not, empty, not-empty.
    #[arg(long, default_value = "or")]
    tag_op: String,
    /// Maximum number of result pages to fetch.
    #[arg(long)]
    page_limit: Option<u32>,
    /// Print each asset as JSON.
    #[arg(long)]
    json: bool,
}
impl SearchArgs {
    fn filters(&self) -> oga_session::error::Result<SearchFilters> {
        let mut filters = SearchFilters::default()
            .with_sort_by(self.sort_by.parse::<SortBy>()?)
            .with_order(if self.ascending { Order::Ascending } else { Order::Descending })
            .with_tag_operator(self.tag_op.parse::<TagOperator>()?);
        if let Some(keys) = &self.keys {
            filters = filters.with_keys(keys);
        }
        if let Some(title) = &self.title {
            filters = filters.with_title(title);
        }
        if let Some(submitter) = &self.submitter {
            filters = filters.with_submitter(submitter);
        }
        for kind in &self.types {
            filters = filters.with_type_named(kind)?;
        }
        for license in &self.licenses {
            filters = filters.with_license_named(license)?;
        }
        for tag in &self.tags {
            filters = filters.with_tag(tag);
        }
        if let Some(page_limit) = self.page_limit {
            filters = filters.with_page_limit(page_limit)?;
        }
        Ok(filters)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let overrides = Overrides {
        url: cli.url.clone(),
        max_conns: cli.max_conns,
        root_dir: cli.root_dir.clone(),
    };
    Config::load(cli.config_path.as_deref(), &overrides).or_raise(|| ErrorKind::Config)
}

/// One-line summary of an asset, e.g. `imminent-threat music (241 favorites, 3 tags)`.
fn summary(asset: &Asset) -> String {
    format!(
        "{} {} ({} favorites, {} tags)",
        asset.id,
        asset.kind.as_short_str(),
        asset.favorites,
        asset.tags.len()
    )
}

fn render(asset: &Asset, json: bool) -> Result<String> {
    match json {
        true => serde_json::to_string_pretty(asset).or_raise(|| ErrorKind::Output),
        false => Ok(summary(asset)),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    tracing::debug!(url = %config.url, max_conns = config.max_conns, root_dir = %config.root_dir.display(), "Loaded configuration");
    let session = Session::new(config).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Describe { asset, json } => {
            let asset = session.describe_asset(&asset).await.or_raise(|| ErrorKind::Command("describe"))?;
            println!("{}", render(&asset, json)?);
        },
        Command::Download { asset } => {
            let asset = session.describe_asset(&asset).await.or_raise(|| ErrorKind::Command("describe"))?;
            session.download_asset(&asset).await.or_raise(|| ErrorKind::Command("download"))?;
        },
        Command::Search(args) => {
            let filters = args.filters().or_raise(|| ErrorKind::Argument)?;
            let mut results = session.search(&filters).or_raise(|| ErrorKind::Command("search"))?;
            while let Some(id) = results.try_next().await.or_raise(|| ErrorKind::Command("search"))? {
                let asset = session.describe_asset(&id).await.or_raise(|| ErrorKind::Command("describe"))?;
                println!("{}", render(&asset, args.json)?);
            }
        },
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oga_extract::models::AssetType;
    use rstest::rstest;

    fn search(args: &[&str]) -> SearchArgs {
        let mut argv = vec!["oga", "search"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Search(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["oga", "describe", "x", "--url", "http://mirror.test", "-vv"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://mirror.test"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_search_filters() {
        let filters = search(&[
            "--keys", "battle", "--sort-by", "views", "--ascending", "--type", "music", "--type", "sfx", "--license", "cc0",
            "--tag", "epic", "--tag-op", "not-empty", "--page-limit", "2",
        ])
        .filters()
        .unwrap();
        assert_eq!(filters.keys(), "battle");
        assert_eq!(filters.sort_by(), SortBy::Views);
        assert_eq!(filters.order(), Order::Ascending);
        assert_eq!(filters.types(), &[AssetType::Music, AssetType::SoundEffect]);
        assert_eq!(filters.tags(), &["epic".to_string()]);
        assert_eq!(filters.tag_operator(), TagOperator::NotEmpty);
        assert_eq!(filters.page_limit(), Some(2));
    }

    #[rstest]
    #[case(&["--sort-by", "popularity"])]
    #[case(&["--tag-op", "xor"])]
    #[case(&["--type", "video"])]
    #[case(&["--license", "wtfpl"])]
    #[case(&["--page-limit", "0"])]
    fn test_invalid_search_filters(#[case] args: &[&str]) {
        assert!(search(args).filters().is_err());
    }

    #[test]
    fn test_summary() {
        let asset = Asset {
            id: "imminent-threat".into(),
            author: Some("matthew-pablo".into()),
            author_name: Some("Matthew Pablo".into()),
            kind: AssetType::Music,
            licenses: Vec::new(),
            tags: vec!["battle".into(), "epic".into(), "orchestral".into()],
            favorites: 241,
            files: Vec::new(),
            name: None,
            description: None,
            attribution: None,
            collections: Vec::new(),
        };
        assert_eq!(summary(&asset), "imminent-threat music (241 favorites, 3 tags)");
        let json: serde_json::Value = serde_json::from_str(&render(&asset, true).unwrap()).unwrap();
        assert_eq!(json["type"], "Music");
        assert_eq!(json["favorites"], 241);
    }
}
