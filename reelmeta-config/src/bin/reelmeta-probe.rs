use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use reelmeta_config::{ResolverConfig, init_tracing};
use reelmeta_core::{Enrichment, MetadataPipeline};
use reelmeta_model::{LookupRequest, RecordKind};
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(
    name = "reelmeta-probe",
    about = "Run reelmeta lookups against TMDB and print the result as JSON"
)]
struct Cli {
    /// Abort in-flight requests after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Lookup {
    /// Name as known locally
    #[arg(long, default_value = "")]
    name: String,
    /// Existing TMDB id; for seasons this is the series id
    #[arg(long)]
    id: Option<i64>,
    /// Preferred locale, e.g. `fr` or `pt-BR`; defaults to the configured language
    #[arg(long)]
    locale: Option<String>,
    /// Treat the lookup as automated (no name search)
    #[arg(long)]
    automated: bool,
}

impl Lookup {
    fn request(&self, default_language: &str) -> LookupRequest {
        let mut request = LookupRequest::new(self.name.clone())
            .with_locale(self.locale.as_deref().unwrap_or(default_language))
            .automated(self.automated);
        request.existing_remote_id = self.id;
        request
    }
}

#[derive(Subcommand)]
enum Command {
    /// Resolve and map a person
    Person(Lookup),
    /// Resolve and map a season of a series
    Season {
        #[command(flatten)]
        lookup: Lookup,
        #[arg(long)]
        season: u32,
    },
    /// List disambiguation candidates for a person
    Search(Lookup),
    /// List ranked images for a person, or a season when `--season` is given
    Images {
        #[command(flatten)]
        lookup: Lookup,
        #[arg(long)]
        season: Option<u32>,
    },
}

fn enrichment_json<T: Serialize>(outcome: Enrichment<T>) -> Result<serde_json::Value> {
    Ok(match outcome {
        Enrichment::Found(entity) => {
            json!({ "status": "found", "entity": serde_json::to_value(entity)? })
        }
        Enrichment::Unresolved => json!({ "status": "unresolved" }),
        Enrichment::NotFound => json!({ "status": "not_found" }),
    })
}

async fn run(
    pipeline: &MetadataPipeline,
    command: Command,
    default_language: &str,
    cancel: &CancellationToken,
) -> Result<serde_json::Value> {
    match command {
        Command::Person(lookup) => {
            let request = lookup.request(default_language);
            enrichment_json(pipeline.resolve_and_map_person(&request, cancel).await?)
        }
        Command::Season { lookup, season } => {
            let request = lookup.request(default_language);
            enrichment_json(
                pipeline
                    .resolve_and_map_season(&request, season, cancel)
                    .await?,
            )
        }
        Command::Search(lookup) => {
            let request = lookup.request(default_language);
            let results = pipeline
                .search_candidates(RecordKind::Person, &request, cancel)
                .await?;
            Ok(serde_json::to_value(results)?)
        }
        Command::Images { lookup, season } => {
            let request = lookup.request(default_language);
            let images = match season {
                Some(season) => {
                    pipeline.season_images(&request, season, cancel).await?
                }
                None => pipeline.person_images(&request, cancel).await?,
            };
            Ok(serde_json::to_value(images)?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let (config, source) = ResolverConfig::load_from_env()?;
    tracing::info!(?source, "configuration source");

    let pipeline = config.build_pipeline()?;
    let cancel = CancellationToken::new();

    if let Some(secs) = cli.timeout_secs {
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            tracing::warn!(secs, "timeout reached, cancelling");
            trigger.cancel();
        });
    }

    let output =
        run(&pipeline, cli.command, &config.tmdb.default_language, &cancel)
            .await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
