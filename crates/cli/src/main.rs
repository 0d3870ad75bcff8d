use anyhow::{bail, Context};
use beamwalk_core::beam::{run, DistanceMetric, SearchParams, Strategy};
use beamwalk_core::config;
use beamwalk_core::eval::evaluate;
use beamwalk_core::storage::{read_fbin, read_graph, Vocabulary};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "beamwalk",
    about = "Beam traversal over proximity graphs",
    version
)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a traversal for every query and report convergence and cost
    Eval(EvalArgs),
    /// Run a single traversal and print its path
    Search(SearchArgs),
    /// Print the out-degree distribution of a graph
    Stats {
        /// Graph file (ParlayANN format)
        #[arg(short, long)]
        graph: PathBuf,
    },
    /// Print the out-neighborhood of nodes
    Neighbors {
        /// Graph file (ParlayANN format)
        #[arg(short, long)]
        graph: PathBuf,
        /// Vocabulary file labelling node ids, one word per line
        #[arg(long)]
        vocab: Option<PathBuf>,
        /// Node ids, or words when a vocabulary is given
        #[arg(required = true)]
        nodes: Vec<String>,
    },
}

#[derive(Args)]
struct TraversalArgs {
    /// Vector file (.fbin)
    #[arg(short, long)]
    vectors: PathBuf,

    /// Graph file (ParlayANN format)
    #[arg(short, long)]
    graph: PathBuf,

    /// Entry node
    #[arg(long, default_value_t = config::DEFAULT_START)]
    start: u32,

    /// Maximum number of nodes settled per traversal
    #[arg(short, long, default_value_t = config::DEFAULT_LIMIT)]
    limit: usize,

    /// Expansion strategy: standard or eager
    #[arg(long, default_value = "standard")]
    strategy: Strategy,

    /// Distance metric: dot_product, cosine, or euclidean
    #[arg(long, default_value = "dot_product")]
    metric: DistanceMetric,

    /// Vocabulary file labelling node ids, one word per line
    #[arg(long)]
    vocab: Option<PathBuf>,
}

impl TraversalArgs {
    fn params(&self) -> SearchParams {
        SearchParams::default()
            .with_start(self.start)
            .with_limit(self.limit)
            .with_metric(self.metric)
    }

    fn vocabulary(&self) -> anyhow::Result<Option<Vocabulary>> {
        self.vocab
            .as_deref()
            .map(|p| {
                Vocabulary::read(p).with_context(|| format!("reading vocabulary {}", p.display()))
            })
            .transpose()
    }
}

#[derive(Args)]
struct EvalArgs {
    #[command(flatten)]
    traversal: TraversalArgs,

    /// Query file, one node id (or word, with --vocab) per line. Defaults to every node.
    #[arg(short, long)]
    queries: Option<PathBuf>,

    /// Only evaluate the first N queries
    #[arg(long)]
    max_queries: Option<usize>,

    /// Fail unless the convergence rate is strictly above this value (e.g. 0.995)
    #[arg(long)]
    target: Option<f64>,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    traversal: TraversalArgs,

    /// Query node id, or a word when a vocabulary is given
    query: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Eval(args) => eval(args),
        Command::Search(args) => search(args),
        Command::Stats { graph } => stats(&graph),
        Command::Neighbors {
            graph,
            vocab,
            nodes,
        } => neighbors(&graph, vocab.as_deref(), &nodes),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("beamwalk_core=info,beamwalk_cli=info")
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn resolve(token: &str, vocab: Option<&Vocabulary>) -> anyhow::Result<u32> {
    match vocab {
        Some(v) => v
            .resolve(token)
            .with_context(|| format!("'{token}' is not in the vocabulary")),
        None => token
            .parse()
            .with_context(|| format!("'{token}' is not a node id")),
    }
}

fn label(id: u32, vocab: Option<&Vocabulary>) -> String {
    match vocab.and_then(|v| v.word(id)) {
        Some(word) => format!("{id} ({word})"),
        None => id.to_string(),
    }
}

fn load_queries(
    path: Option<&Path>,
    vocab: Option<&Vocabulary>,
    node_count: usize,
) -> anyhow::Result<Vec<u32>> {
    let Some(path) = path else {
        return Ok((0..node_count as u32).collect());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading queries {}", path.display()))?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|token| resolve(token, vocab))
        .collect()
}

fn eval(args: EvalArgs) -> anyhow::Result<()> {
    let t = &args.traversal;
    let vectors = read_fbin(&t.vectors)
        .with_context(|| format!("reading vectors {}", t.vectors.display()))?;
    let graph =
        read_graph(&t.graph).with_context(|| format!("reading graph {}", t.graph.display()))?;
    let vocab = t.vocabulary()?;

    let mut queries = load_queries(args.queries.as_deref(), vocab.as_ref(), graph.len())?;
    if let Some(max) = args.max_queries {
        queries.truncate(max);
    }

    let started = Instant::now();
    let report = evaluate(&graph, &vectors, &queries, &t.params(), t.strategy)?;
    let elapsed = started.elapsed();
    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "Batch finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("strategy:         {}", report.strategy);
        println!("queries:          {}", report.queries);
        println!("converged:        {}", report.converged);
        println!("convergence rate: {:.4}", report.convergence_rate);
        println!("average visited:  {:.2}", report.mean_visited);
        println!("average compared: {:.2}", report.mean_compared);
        println!("max compared:     {}", report.max_compared);
    }

    if let Some(target) = args.target {
        if !report.meets(target) {
            bail!(
                "convergence rate {:.4} does not exceed target {target}",
                report.convergence_rate
            );
        }
    }
    Ok(())
}

fn search(args: SearchArgs) -> anyhow::Result<()> {
    let t = &args.traversal;
    let vectors = read_fbin(&t.vectors)
        .with_context(|| format!("reading vectors {}", t.vectors.display()))?;
    let graph =
        read_graph(&t.graph).with_context(|| format!("reading graph {}", t.graph.display()))?;
    let vocab = t.vocabulary()?;
    let query = resolve(&args.query, vocab.as_ref())?;

    let trace = run(t.strategy, &graph, &vectors, query, &t.params())?;
    println!("termination: {}", trace.termination);
    println!("compared:    {}", trace.compared.len());
    println!("visited:     {}", trace.visited.len());
    for id in &trace.visited {
        println!("  {}", label(*id, vocab.as_ref()));
    }
    Ok(())
}

fn stats(path: &Path) -> anyhow::Result<()> {
    let graph = read_graph(path).with_context(|| format!("reading graph {}", path.display()))?;
    let stats = graph.degree_stats();
    println!("{} points", stats.nodes);
    println!("{} edges", stats.edges);
    println!("{:.3} average degree", stats.mean_degree);
    println!("neighbor count distribution:");
    for (p, degree) in &stats.percentiles {
        println!("{p}%: {degree}");
    }
    Ok(())
}

fn neighbors(path: &Path, vocab: Option<&Path>, nodes: &[String]) -> anyhow::Result<()> {
    let graph = read_graph(path).with_context(|| format!("reading graph {}", path.display()))?;
    let vocab = vocab
        .map(|p| Vocabulary::read(p).with_context(|| format!("reading vocabulary {}", p.display())))
        .transpose()?;

    for token in nodes {
        let id = resolve(token, vocab.as_ref())?;
        let Some(list) = graph.get(id) else {
            bail!("node {id} out of range for {} points", graph.len());
        };
        println!("Neighbors of {}:", label(id, vocab.as_ref()));
        for &n in list {
            println!("  {}", label(n, vocab.as_ref()));
        }
        println!();
    }
    Ok(())
}
