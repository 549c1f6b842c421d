//! Evaluation benchmark over a JSON corpus.
//! Measures per-mode retrieval throughput and prints the experiment summary.
//!
//! Usage: cargo bench --bench eval_corpus
//!
//! Reads `benchmarks/data/arxiv/{corpus,synonyms,queries}.json` when present
//! (override the directory with `LEXEVAL_BENCH_DATA`). Without data a
//! deterministic synthetic corpus is generated instead.

use lexeval_core::eval::{Experiment, FieldSetSpec, ModeSpec, Strategy};
use lexeval_core::expansion::{SimilarTerm, SynonymTable};
use lexeval_core::retrieval::{FieldSet, Retriever, TfIdfIndex};
use lexeval_core::storage::{load_corpus, load_queries, load_synonyms, Corpus};
use lexeval_core::text::Normalizer;
use lexeval_core::{document::Document, PipelineConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

const DATA_DIR: &str = "benchmarks/data/arxiv";

const TOPICS: [&str; 8] = [
    "machine learning",
    "neural networks",
    "computer vision",
    "robotics",
    "optimization",
    "graph theory",
    "reinforcement learning",
    "natural language processing",
];

const FILLER: [&str; 10] = [
    "we", "study", "a", "novel", "method", "for", "large", "scale", "data", "analysis",
];

/// Deterministic corpus: each document mixes two topics and some filler.
fn synthetic_corpus(n: usize) -> Corpus {
    Corpus::new((0..n).map(|i| {
        let a = TOPICS[i % TOPICS.len()];
        let b = TOPICS[(i * 7 + 3) % TOPICS.len()];
        let filler: Vec<&str> = (0..12).map(|j| FILLER[(i + j * 3) % FILLER.len()]).collect();
        Document::new(
            format!("doc-{i:06}"),
            format!("On {a} and {b}"),
            format!("{} {a} {}", filler[..6].join(" "), filler[6..].join(" ")),
            vec![a.to_string(), if i % 3 == 0 { b.to_string() } else { "misc".into() }],
        )
    }))
}

fn synthetic_synonyms() -> SynonymTable {
    SynonymTable::from_entries(
        [
            ("ml", vec![("machine learning", 0.92), ("neural networks", 0.41), ("ai", 0.07)]),
            ("vision", vec![("computer vision", 0.88), ("image", 0.35)]),
            ("rl", vec![("reinforcement learning", 0.95), ("robotics", 0.22)]),
            ("nlp", vec![("natural language processing", 0.97)]),
        ]
        .into_iter()
        .map(|(k, v)| {
            (
                k.to_string(),
                v.into_iter().map(|(t, w)| SimilarTerm::new(t, w)).collect(),
            )
        }),
        5,
    )
}

fn main() {
    println!("=== Evaluation Benchmark: lexical retrieval ===");
    println!();

    let dir = PathBuf::from(std::env::var("LEXEVAL_BENCH_DATA").unwrap_or_else(|_| DATA_DIR.into()));
    let corpus_path = dir.join("corpus.json");
    let (corpus, table, queries) = if corpus_path.exists() {
        print!("Loading corpus from {}...", dir.display());
        let corpus = load_corpus(&corpus_path).unwrap();
        let table = load_synonyms(&dir.join("synonyms.json"), 5).unwrap_or_else(|_| SynonymTable::empty());
        let queries = load_queries(&dir.join("queries.json"))
            .unwrap_or_else(|_| TOPICS.iter().map(|t| t.to_string()).collect());
        (corpus, table, queries)
    } else {
        print!("No data at {}, generating synthetic corpus...", dir.display());
        let mut queries: Vec<String> = TOPICS.iter().map(|t| t.to_string()).collect();
        queries.extend(["ml", "vision", "rl", "nlp", "quantum"].map(String::from));
        (synthetic_corpus(20_000), synthetic_synonyms(), queries)
    };
    println!(" {} documents, {} synonym terms, {} queries", corpus.len(), table.len(), queries.len());

    let corpus = Arc::new(corpus);
    let retriever = Retriever::new(
        corpus.clone(),
        Arc::new(table),
        Normalizer::default(),
        PipelineConfig::default(),
    );

    println!();
    println!("--- Index Construction ---");
    let t0 = Instant::now();
    let index = TfIdfIndex::build(&corpus);
    let build_time = t0.elapsed();
    println!(
        "TF-IDF fit: {:.3}s ({:.0} docs/s), vocabulary {} terms",
        build_time.as_secs_f64(),
        corpus.len() as f64 / build_time.as_secs_f64(),
        index.vocabulary_len()
    );

    println!();
    println!("--- Retrieval throughput (full-text field set) ---");
    println!();
    let fields = FieldSet::all();
    for mode in ModeSpec::builtins() {
        let t0 = Instant::now();
        let mut hits = 0usize;
        for q in &queries {
            hits += match &mode.strategy {
                Strategy::Boolean { expand, norm } => retriever.retrieve(q, *expand, *norm, &fields).len(),
                Strategy::Scored { expand, norm } => retriever.retrieve_scored(q, *expand, *norm).len(),
                Strategy::TfIdf => index.search(q).len(),
                Strategy::Precomputed(_) => 0,
            };
        }
        let elapsed = t0.elapsed();
        let qps = queries.len() as f64 / elapsed.as_secs_f64();
        let avg_latency_us = elapsed.as_micros() as f64 / queries.len().max(1) as f64;
        println!(
            "  {:<10} | QPS: {qps:>8.0} | Avg latency: {avg_latency_us:>8.0} us | Hits/query: {:.1}",
            mode.name,
            hits as f64 / queries.len().max(1) as f64
        );
    }

    println!();
    println!("--- Experiment (all built-in modes) ---");
    println!();
    let experiment = Experiment::new(retriever, FieldSetSpec::defaults(), ModeSpec::builtins());
    let t0 = Instant::now();
    let report = experiment.run(&queries).unwrap();
    println!("Run time: {:.3}s", t0.elapsed().as_secs_f64());
    println!("Field set: {} ({})", report.summary.field_set, report.convention);
    println!("  Mode       |  mean P |  mean R | mean F1 | F1 median");
    println!("  -----------+---------+---------+---------+----------");
    for m in &report.summary.modes {
        println!(
            "  {:<10} | {:>7.4} | {:>7.4} | {:>7.4} | {:>8.4}",
            m.mode, m.mean_precision, m.mean_recall, m.mean_f1, m.f1.median
        );
    }
}
