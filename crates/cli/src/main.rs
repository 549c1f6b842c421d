use clap::{Args, Parser, Subcommand};
use lexeval_cli::api::{create_router, metrics as api_metrics};
use lexeval_cli::api::handlers::AppState;
use lexeval_cli::load_retriever;
use lexeval_cli::remote::RemoteSearchClient;
use lexeval_cli::settings::{DataPaths, Settings};
use lexeval_core::config;
use lexeval_core::eval::{Experiment, ExperimentReport, FieldSetSpec, LabelConvention, ModeSpec};
use lexeval_core::storage::load_queries;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexeval", version, about = "Lexical search and retrieval evaluation")]
struct Cli {
    /// TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate local retrieval modes over queries and field-sets
    Evaluate {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        queries: QueryArgs,
        /// Comma-separated modes (basic, synonyms, syn+lemma, syn+stem, weighted, tf-idf)
        #[arg(long, value_delimiter = ',')]
        modes: Vec<ModeSpec>,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Evaluate an external search endpoint against the local ground truth
    Remote {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        queries: QueryArgs,
        /// Search endpoint URL, e.g. http://localhost:8000/search
        #[arg(long)]
        endpoint: String,
        /// Ask the endpoint to expand queries
        #[arg(long, default_value_t = false)]
        expand: bool,
        /// Mode name reported for the endpoint
        #[arg(long, default_value = "Remote")]
        name: String,
        /// Local modes evaluated alongside the endpoint
        #[arg(long, value_delimiter = ',', default_value = "basic")]
        modes: Vec<ModeSpec>,
        /// Attempts per query before giving up
        #[arg(long)]
        attempts: Option<u32>,
        /// Delay between attempts in milliseconds
        #[arg(long)]
        retry_delay_ms: Option<u64>,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Serve the weighted search over HTTP
    Serve {
        #[command(flatten)]
        data: DataArgs,
        /// Port to listen on
        #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
        port: u16,
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Corpus JSON file (array of documents)
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Synonym table JSON file (term -> [[similar, weight], ...])
    #[arg(long)]
    synonyms: Option<PathBuf>,
    /// Lemma dictionary JSON file (word -> [[lemma, score], ...])
    #[arg(long)]
    lemmas: Option<PathBuf>,
}

impl DataArgs {
    /// Command-line paths take precedence over the settings file.
    fn merge(self, from_file: DataPaths) -> DataPaths {
        DataPaths {
            corpus: self.corpus.or(from_file.corpus),
            synonyms: self.synonyms.or(from_file.synonyms),
            lemmas: self.lemmas.or(from_file.lemmas),
        }
    }
}

#[derive(Args)]
struct QueryArgs {
    /// Query to evaluate (repeatable)
    #[arg(short, long = "query")]
    queries: Vec<String>,
    /// File of queries: JSON array of strings or one query per line
    #[arg(long)]
    queries_file: Option<PathBuf>,
}

impl QueryArgs {
    fn collect(self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let mut queries: Vec<String> = self
            .queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        if let Some(path) = self.queries_file {
            queries.extend(load_queries(&path)?);
        }
        if queries.is_empty() {
            return Err("no queries given (--query or --queries-file)".into());
        }
        Ok(queries)
    }
}

#[derive(Args)]
struct ReportArgs {
    /// Label convention: restricted or full_collection
    #[arg(long)]
    convention: Option<LabelConvention>,
    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ReportArgs {
    fn write(&self, report: &ExperimentReport) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(report)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, json)?;
                tracing::info!(path = %path.display(), "Report written");
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("lexeval_cli=info".parse()?)
                .add_directive("lexeval_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Evaluate {
            data,
            queries,
            modes,
            report,
        } => {
            let mut pipeline = settings.pipeline;
            if let Some(convention) = report.convention {
                pipeline.label_convention = convention;
            }
            let retriever = load_retriever(&data.merge(settings.paths), pipeline)?;
            let queries = queries.collect()?;
            let modes = if modes.is_empty() {
                ModeSpec::defaults()
            } else {
                modes
            };
            let experiment = Experiment::new(retriever, FieldSetSpec::defaults(), modes);
            let result = experiment.run(&queries)?;
            report.write(&result)?;
        }
        Command::Remote {
            data,
            queries,
            endpoint,
            expand,
            name,
            mut modes,
            attempts,
            retry_delay_ms,
            report,
        } => {
            let mut pipeline = settings.pipeline;
            if let Some(convention) = report.convention {
                pipeline.label_convention = convention;
            }
            if let Some(n) = attempts {
                pipeline.remote_max_attempts = n;
            }
            if let Some(ms) = retry_delay_ms {
                pipeline.remote_retry_delay_ms = ms;
            }
            let client = RemoteSearchClient::new(endpoint.clone(), &pipeline)?;
            let retriever = load_retriever(&data.merge(settings.paths), pipeline)?;
            let queries = queries.collect()?;

            tracing::info!(endpoint = %endpoint, queries = queries.len(), expand, "Querying remote endpoint");
            let fetched = client.search_all(&queries, expand).await;
            modes.push(ModeSpec::precomputed(name, fetched));

            let experiment = Experiment::new(retriever, FieldSetSpec::defaults(), modes);
            let result = experiment.run(&queries)?;
            report.write(&result)?;
        }
        Command::Serve { data, port, host } => {
            if port == 0 {
                return Err("port must be > 0".into());
            }
            let retriever = Arc::new(load_retriever(
                &data.merge(settings.paths),
                settings.pipeline,
            )?);
            // build the lemma view before accepting requests
            retriever.lemmatized_corpus();
            let prometheus_handle =
                metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
            api_metrics::set_corpus_gauges(retriever.corpus().len(), retriever.synonyms().len());

            let documents = retriever.corpus().len();
            let synonym_terms = retriever.synonyms().len();
            let app = create_router(AppState::new(retriever, prometheus_handle));
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                addr = %addr,
                documents,
                synonym_terms,
                "lexeval search service ready"
            );
            axum::serve(listener, app)
                .with_graceful_shutdown(wait_for_signal())
                .await?;
            tracing::info!("Shutdown complete");
        }
    }
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}

