use anyhow::{Context, Result, anyhow};

use euler_lca::config::LcaConfig;
use euler_lca::options::Options;
use euler_lca::tree::io::{self, QueryAnswer, QueryBatch, TreeDocument};
use euler_lca::tree::{LcaIndex, NodeId};

fn main() {
    if std::env::var("LCA_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("LCA_LOG")
            .write_style("LCA_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    if let Err(err) = run() {
        eprintln!("lca: {err:#}");
        std::process::exit(1);
    }
}

fn parse_options() -> Result<Options> {
    let env_flags = std::env::var("LCA_FLAGS").unwrap_or_default();
    let mut flags = shellwords::split(&env_flags).context("LCA_FLAGS has mismatched quotes")?;
    flags.extend(std::env::args().skip(1));

    match Options::parse_from_args(&flags) {
        Ok(options) => Ok(options),
        Err(err) => match err.downcast::<clap::Error>() {
            // help, version and usage errors print themselves
            Ok(clap_err) => clap_err.exit(),
            Err(err) => Err(anyhow!("{err}")),
        },
    }
}

/// `--query` pairs followed by the batch file. `--format` applies to the tree
/// document only; the batch is read by its own extension.
fn collect_queries(options: &Options) -> Result<Vec<(NodeId, NodeId)>> {
    let mut pairs: Vec<(NodeId, NodeId)> = options
        .queries
        .iter()
        .map(|&(u, v)| (NodeId::new(u), NodeId::new(v)))
        .collect();
    if let Some(path) = &options.queries_file {
        let batch: QueryBatch = io::read_document(path, None)
            .with_context(|| format!("Failed to load query batch: {path}"))?;
        pairs.extend(batch.node_pairs());
    }
    Ok(pairs)
}

fn run() -> Result<()> {
    let options = parse_options()?;
    log::debug!("lca options: {:?}", options);

    let config = LcaConfig::load_from_file(&options.config)?;
    let format = options.format.or(config.format);

    let input = options
        .input
        .as_deref()
        .context("no tree document given, pass --input FILE")?;
    let document: TreeDocument = io::read_document(input, format)
        .with_context(|| format!("Failed to load tree document: {input}"))?;
    let adjacency = document.to_adjacency()?;

    let root = options
        .root
        .map(NodeId::new)
        .or(document.root())
        .unwrap_or(NodeId::new(config.root));
    let index = LcaIndex::new(&adjacency, root)?.with_parallel_threshold(config.parallel_threshold);
    log::info!(
        "indexed {} nodes rooted at {:?} (tour length {})",
        index.len(),
        index.root(),
        index.euler_tour().len()
    );

    if let Some(path) = &options.dot {
        index
            .write_dot(path)
            .with_context(|| format!("Failed to write dot file: {path}"))?;
    }

    if let Some(path) = &options.tour {
        io::write_json(path, index.euler_tour())
            .with_context(|| format!("Failed to write euler tour: {path}"))?;
    }

    let pairs = collect_queries(&options)?;
    let results = index.query_batch(&pairs);
    let answers: Vec<QueryAnswer> = pairs
        .iter()
        .zip(&results)
        .map(|(&(u, v), result)| QueryAnswer::new(u, v, result))
        .collect();

    let failed = answers.iter().filter(|answer| answer.error.is_some()).count();
    if failed > 0 {
        log::warn!("{} of {} queries failed", failed, answers.len());
    }

    match &options.output {
        Some(path) => io::write_json(path, &answers)
            .with_context(|| format!("Failed to write answers: {path}"))?,
        None => {
            for answer in &answers {
                match (answer.lca, &answer.error) {
                    (Some(lca), _) => println!("lca({}, {}) = {}", answer.u, answer.v, lca),
                    (None, Some(err)) => println!("lca({}, {}) failed: {}", answer.u, answer.v, err),
                    (None, None) => {}
                }
            }
        }
    }
    Ok(())
}
