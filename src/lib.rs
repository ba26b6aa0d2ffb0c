pub mod config;
pub mod engine;
pub mod index;
pub mod model;
pub mod search;
pub mod translate;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::warn;

use config::EngineConfig;
use engine::HttpEngine;
use index::SearchIndex;
use model::SearchHit;
use translate::{GoogleTranslator, localize_query};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "psearch",
    version,
    about = "Bilingual product search over an Elasticsearch index"
)]
pub struct Cli {
    /// Index name (overrides PSEARCH_INDEX)
    #[arg(long, global = true)]
    pub index: Option<String>,

    /// Engine base URL (overrides ELASTICSEARCH_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the index if it does not exist (idempotent)
    CreateIndex,
    /// Delete the index (irreversible)
    DeleteIndex,
    /// Check whether the index exists
    Exists,
    /// Print the document count (-1 when the engine query fails)
    Count,
    /// Bulk-load a JSON array of products into the index
    Load {
        /// Path to the JSON source file
        file: PathBuf,
    },
    /// Search products by free text
    Search {
        /// The query, in Georgian unless --from says otherwise
        query: String,

        /// Search with the query as typed, skipping translation
        #[arg(long)]
        raw: bool,

        /// Source language of the query
        #[arg(long = "from", value_name = "LANG", default_value = "ka")]
        source_lang: String,

        /// Language the index is stored in
        #[arg(long = "to", value_name = "LANG", default_value = "en")]
        target_lang: String,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = EngineConfig::from_env();
    if let Some(index) = cli.index {
        cfg.index = index;
    }
    if let Some(url) = cli.url {
        cfg.base_url = url;
    }

    match cli.command {
        Commands::CreateIndex => {
            let index = open_index(&cfg)?;
            if index.create().await? {
                println!("Index '{}' created.", index.name());
            } else {
                println!("Index '{}' already exists.", index.name());
            }
            Ok(())
        }
        Commands::DeleteIndex => {
            let index = open_index(&cfg)?;
            if index.delete().await? {
                println!("Index '{}' deleted.", index.name());
            } else {
                println!("Index '{}' does not exist.", index.name());
            }
            Ok(())
        }
        Commands::Exists => {
            let index = open_index(&cfg)?;
            println!("{}", index.exists().await?);
            Ok(())
        }
        Commands::Count => {
            let index = open_index(&cfg)?;
            // -1 is the documented display sentinel for "query failed".
            match index.count().await {
                Ok(count) => println!("{count}"),
                Err(e) => {
                    warn!("count failed: {e}");
                    println!("-1");
                }
            }
            Ok(())
        }
        Commands::Load { file } => {
            let index = open_index(&cfg)?;
            let pb = ingest_progress_bar();
            let report = match index.add_documents_from(&file, Some(&pb)).await {
                Ok(report) => report,
                Err(engine::EngineError::IndexNotFound { index }) => {
                    pb.finish_and_clear();
                    anyhow::bail!(
                        "index '{index}' does not exist; run `psearch create-index` first"
                    );
                }
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(e.into());
                }
            };
            pb.finish_and_clear();

            println!(
                "All documents inserted. Successful inserts: {}/{}",
                report.successful, report.total
            );
            if report.malformed > 0 {
                println!("Rejected {} document(s) without a sku.", report.malformed);
            }
            if report.failed_batches > 0 {
                println!(
                    "{} batch(es) failed in transport; their documents were not inserted.",
                    report.failed_batches
                );
            }
            Ok(())
        }
        Commands::Search {
            query,
            raw,
            source_lang,
            target_lang,
        } => {
            let index = open_index(&cfg)?;
            let effective = if raw {
                query
            } else {
                let translator = GoogleTranslator::new()?;
                localize_query(&translator, &query, &source_lang, &target_lang).await
            };

            // A failed search degrades to "no results" for interactive use.
            let results = match index.search(&effective).await {
                Ok(hits) => hits,
                Err(e) => {
                    warn!("search failed: {e}");
                    Vec::new()
                }
            };

            if results.is_empty() {
                println!("No results.");
            }
            for hit in &results {
                render_hit(hit);
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "psearch", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

fn open_index(cfg: &EngineConfig) -> Result<SearchIndex<HttpEngine>> {
    let engine = HttpEngine::new(cfg)?;
    Ok(SearchIndex::new(engine, cfg.index.clone()))
}

fn ingest_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} inserted")
            .unwrap()
            .progress_chars("██░"),
    );
    pb
}

fn render_hit(hit: &SearchHit) {
    println!("SKU: {}", hit.sku);
    println!("Name: {}", hit.name);
    println!("Description: {}...", truncate_chars(&hit.description, 200));
    println!("Short Description: {}", hit.short_description);
    println!("Price: {}", hit.price);
    match hit.special_price {
        Some(special) => println!("Special Price: {special}"),
        None => println!("Special Price: -"),
    }
    println!("Country: {}", hit.country_of_manufacture);
    println!("Categories: {}", hit.categories);
    println!("Score: {}", hit.score);
    println!("{}", "-".repeat(40));
}

/// Char-boundary-safe prefix for display.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
