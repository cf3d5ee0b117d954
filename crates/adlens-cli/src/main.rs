//! AdLens CLI
//!
//! Classify ad copy into persuasion typologies from the command line,
//! optionally attaching model-generated insights under a spend budget.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

mod export;

use adlens_core::AdInput;
use adlens_engine::{Analyzer, TypologyDistribution};
use adlens_enhance::{EnhancementContext, Enhancer, HybridAnalyzer, OpenAiEnhancer};
use adlens_rules::{RuleFileSpec, RuleSet};

#[derive(Parser, Debug)]
#[command(name = "adlens")]
#[command(about = "Ad-copy persuasion typology analyzer", long_about = None)]
struct Cli {
    /// Rules file (YAML); defaults to the built-in rule set
    #[arg(short, long, global = true)]
    rules: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a single ad copy text
    Classify {
        /// The ad copy to classify
        text: String,

        /// Identifier attached to the result
        #[arg(long)]
        ad_id: Option<String>,

        #[command(flatten)]
        enhance: EnhanceArgs,
    },

    /// Classify a batch of ads from a file
    Batch {
        /// Input file: a JSON array of {"text", "ad_id"} objects, or one ad per line
        #[arg(short, long)]
        input: String,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: export::Format,

        /// Print typology distribution statistics to stderr
        #[arg(long)]
        stats: bool,

        #[command(flatten)]
        enhance: EnhanceArgs,
    },

    /// List and validate the active rule set
    Rules,
}

#[derive(Args, Debug)]
struct EnhanceArgs {
    /// Attach model-generated insights (requires an API key)
    #[arg(long)]
    enhanced: bool,

    /// Spend ceiling in USD for this session
    #[arg(long, default_value_t = 5.0)]
    budget: f64,

    /// Industry context forwarded to the model
    #[arg(long)]
    industry: Option<String>,

    /// Model to use for enhancement
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Fraction of batch items to enhance (0.0-1.0)
    #[arg(long, default_value_t = 1.0)]
    fraction: f32,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rules = load_rules(cli.rules.as_deref())?;

    match cli.command {
        Command::Classify {
            text,
            ad_id,
            enhance,
        } => run_classify(rules, &text, ad_id.as_deref(), &enhance).await,
        Command::Batch {
            input,
            output,
            format,
            stats,
            enhance,
        } => run_batch(rules, &input, output.as_deref(), format, stats, &enhance).await,
        Command::Rules => run_rules(cli.rules.as_deref(), rules),
    }
}

fn load_rules(path: Option<&str>) -> Result<RuleSet> {
    match path {
        Some(path) => RuleSet::from_file(path)
            .with_context(|| format!("failed to load rules from {path}")),
        None => RuleSet::builtin().context("built-in rules failed to compile"),
    }
}

fn build_hybrid(rules: RuleSet, enhance: &EnhanceArgs) -> Result<HybridAnalyzer> {
    let analyzer = Analyzer::new(rules)?;

    if !enhance.enhanced {
        return Ok(HybridAnalyzer::rule_based(analyzer));
    }

    let Some(api_key) = enhance.api_key.as_deref() else {
        bail!("--enhanced requires an API key (set OPENAI_API_KEY or pass --api-key)");
    };
    let enhancer = OpenAiEnhancer::new(api_key)?.model(&enhance.model);

    Ok(HybridAnalyzer::new(
        analyzer,
        Arc::new(enhancer) as Arc<dyn Enhancer>,
        enhance.budget,
    ))
}

async fn run_classify(
    rules: RuleSet,
    text: &str,
    ad_id: Option<&str>,
    enhance: &EnhanceArgs,
) -> Result<()> {
    let hybrid = build_hybrid(rules, enhance)?;
    let context = enhance.industry.as_deref().map(EnhancementContext::industry);

    if enhance.enhanced {
        let record = hybrid
            .classify_enhanced(text, ad_id, context.as_ref())
            .await;
        println!("{}", serde_json::to_string_pretty(&record)?);
        report_cost(&hybrid);
    } else {
        let result = hybrid.classify(text, ad_id);
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

async fn run_batch(
    rules: RuleSet,
    input: &str,
    output: Option<&str>,
    format: export::Format,
    stats: bool,
    enhance: &EnhanceArgs,
) -> Result<()> {
    let ads = read_ads(input)?;
    info!(ads = ads.len(), input, "loaded batch input");

    let hybrid = build_hybrid(rules, enhance)?;
    let context = enhance.industry.as_deref().map(EnhancementContext::industry);

    let mut writer = open_output(output)?;
    if enhance.enhanced {
        let records = hybrid
            .classify_batch_enhanced(ads, context.as_ref(), enhance.fraction)
            .await;

        if stats {
            let bases: Vec<_> = records
                .iter()
                .map(|record| record.classification.clone())
                .collect();
            print_stats(hybrid.analyzer(), &bases)?;
        }
        export::write_enriched(&mut writer, &records, format)?;
        report_cost(&hybrid);
    } else {
        let results = hybrid.analyzer().classify_batch(ads);
        if stats {
            print_stats(hybrid.analyzer(), &results)?;
        }
        export::write_classifications(&mut writer, &results, format)?;
    }

    Ok(())
}

fn run_rules(path: Option<&str>, rules: RuleSet) -> Result<()> {
    // a file that compiled may still deserve the full problem report
    if let Some(path) = path {
        let spec = RuleFileSpec::from_file(path)?;
        let problems = spec.validate();
        if !problems.is_empty() {
            for problem in &problems {
                eprintln!("problem: {problem}");
            }
            bail!("{} problem(s) in {path}", problems.len());
        }
    }

    println!(
        "{} typologies (min_confidence {}, max {} labels per ad)\n",
        rules.len(),
        rules.settings().min_confidence,
        rules.settings().max_labels_per_ad
    );
    for typology in rules.typologies() {
        println!(
            "{:<24} {:<28} threshold {:.2}, {} patterns",
            typology.id(),
            typology.name(),
            typology.threshold(),
            typology.patterns().len()
        );
        if !typology.description().is_empty() {
            println!("    {}", typology.description());
        }
    }

    Ok(())
}

/// Read batch input: JSON array of ad objects, or one ad text per line
fn read_ads(path: &str) -> Result<Vec<AdInput>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {path}"))?;

    if Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        serde_json::from_str(&content).with_context(|| format!("invalid JSON input in {path}"))
    } else {
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(AdInput::new)
            .collect())
    }
}

fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create output file {path}"))?;
            Box::new(std::io::BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    })
}

fn print_stats(analyzer: &Analyzer, results: &[adlens_core::ClassificationResult]) -> Result<()> {
    let distribution = TypologyDistribution::from_results(analyzer.rules(), results);
    eprintln!("{}", serde_json::to_string_pretty(&distribution)?);
    Ok(())
}

fn report_cost(hybrid: &HybridAnalyzer) {
    let cost = hybrid.cost_report();
    info!(
        spent = cost.spent,
        remaining = cost.remaining,
        calls_made = cost.calls_made,
        "session cost"
    );
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("adlens=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("adlens=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
