use anyhow::{Context, Result};
use bizlens_core::config::Config;
use bizlens_core::{compute_item_similarity, DataSource, MockDataSource};
use bizlens_std::standard_registry;
use bizlens_view::ViewRegistry;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bizlens")]
#[command(about = "Business-intelligence dashboard views from the command line", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Show current configuration")]
    Show,

    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(short, long, help = "Overwrite an existing file")]
        force: bool,
    },

    #[command(about = "List dashboard views")]
    Views,

    #[command(about = "Recommend items for a user")]
    Recommend {
        #[arg(short, long, help = "User to recommend for (defaults to the first user)")]
        user: Option<String>,

        #[arg(short = 'n', long, help = "Number of recommendations")]
        top_n: Option<usize>,

        #[arg(long, help = "Print the raw view data as JSON")]
        json: bool,
    },

    #[command(about = "Show the item similarity matrix")]
    Similarity,

    #[command(about = "Show the sales correlation heatmap")]
    Insights {
        #[arg(short, long, help = "Number of generated records (50-500, step 50)")]
        rows: Option<usize>,
    },

    #[command(about = "Segment customers with K-Means")]
    Segment,

    #[command(about = "Show the production report")]
    Report {
        #[arg(long, help = "First date to include (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long, help = "Last date to include (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(short, long, value_delimiter = ',', help = "Minerals to include, comma separated")]
        minerals: Option<Vec<String>>,

        #[arg(long, help = "Write the report as CSV to this path")]
        csv: Option<PathBuf>,
    },

    #[command(about = "Render any view and print its JSON output")]
    Render {
        #[arg(help = "View name (see `bizlens views`)")]
        view: String,

        #[arg(short, long, help = "View parameters as a JSON object")]
        params: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = load_config(&cli.config)?;
    let registry = standard_registry(&config);

    match cli.command {
        Commands::Show => show_config(&config),
        Commands::Init { force } => init_config(&cli.config, force),
        Commands::Views => list_views(&registry),
        Commands::Recommend { user, top_n, json } => {
            recommend(&registry, user, top_n, json)
        }
        Commands::Similarity => show_similarity(&config),
        Commands::Insights { rows } => insights(&registry, rows),
        Commands::Segment => segment(&registry),
        Commands::Report {
            from,
            to,
            minerals,
            csv,
        } => report(&registry, from, to, minerals, csv.as_deref()),
        Commands::Render { view, params } => render(&registry, &view, params.as_deref()),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let directive = if verbose {
        "bizlens_core=debug"
    } else {
        "bizlens_core=info"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();
    Ok(())
}

/// Loads the config file if present, otherwise falls back to defaults.
fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).context("Failed to load config")
    } else {
        Ok(Config::default())
    }
}

fn show_config(config: &Config) -> Result<()> {
    println!("{}", "Current Configuration:".bold().green());
    println!();
    println!("{}", "Data:".bold());
    println!("  Seed:            {}", config.data.seed.to_string().cyan());
    println!("  Insight Rows:    {}", config.data.insight_rows);
    println!("  Customers:       {}", config.data.customers);
    println!();
    println!("{}", "Recommendations:".bold());
    println!("  Top N:           {}", config.recommend.top_n);
    println!("  Max Top N:       {}", config.recommend.max_top_n);
    println!("  Boost:           {}", config.recommend.boost.to_string().cyan());
    println!();
    println!("{}", "Segmentation:".bold());
    println!("  Clusters:        {}", config.segmentation.clusters);
    println!("  Restarts:        {}", config.segmentation.n_init);
    println!("  Max Iterations:  {}", config.segmentation.max_iter);
    println!();
    println!("{}", "Reporting:".bold());
    println!("  Profit Target:   {}", config.reporting.profit_target);
    println!("  CSV File:        {}", config.reporting.csv_file_name);

    Ok(())
}

fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists, use --force to overwrite",
            config_path.display()
        );
    }

    let content = serde_yaml::to_string(&Config::default())
        .context("Failed to serialize config")?;
    std::fs::write(config_path, content).context("Failed to write config file")?;

    println!(
        "{} Default configuration written to: {}",
        "✓".green().bold(),
        config_path.display().to_string().cyan()
    );
    Ok(())
}

fn list_views(registry: &ViewRegistry) -> Result<()> {
    let default = registry.default_view().map(|v| v.name().to_string());

    println!("{}", "Views:".bold().green());
    println!();
    for view in registry.all() {
        let marker = if default.as_deref() == Some(view.name()) {
            " (default)".yellow().to_string()
        } else {
            String::new()
        };
        println!("  {} {}{}", "•".cyan(), view.name().bold(), marker);
        println!("    {}", view.description());
    }

    Ok(())
}

fn recommend(
    registry: &ViewRegistry,
    user: Option<String>,
    top_n: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut params = serde_json::Map::new();
    if let Some(user) = user {
        params.insert("user".into(), Value::String(user));
    }
    if let Some(top_n) = top_n {
        params.insert("top_n".into(), Value::from(top_n));
    }

    let output = registry
        .render("recommendations", Value::Object(params))
        .context("Failed to generate recommendations")?;
    let data = output.data.unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let user = data["user"].as_str().unwrap_or_default();
    println!("{} {}", "Recommended for".bold().green(), user.bold());
    println!();

    let ranking = data["ranking"].as_array().cloned().unwrap_or_default();
    if ranking.is_empty() {
        println!("{}", "Not enough data to generate recommendations.".yellow());
        return Ok(());
    }

    for (i, entry) in ranking.iter().enumerate() {
        let item = entry["item"].as_str().unwrap_or_default();
        let score = entry["score"].as_f64().unwrap_or_default();
        let line = format!("  {}. {:<12} {:>8.2}", i + 1, item, score);
        if entry["highlight"].as_bool().unwrap_or(false) {
            println!("{}", line.red().bold());
        } else {
            println!("{}", line.blue());
        }
    }

    Ok(())
}

fn show_similarity(config: &Config) -> Result<()> {
    let ratings = MockDataSource::new(config.data.seed)
        .ratings()
        .context("Failed to generate ratings")?;
    let similarity = compute_item_similarity(&ratings);

    println!("{}", "Item Similarity:".bold().green());
    println!();
    print_matrix(similarity.items(), similarity.values());
    Ok(())
}

fn insights(registry: &ViewRegistry, rows: Option<usize>) -> Result<()> {
    let params = match rows {
        Some(rows) => serde_json::json!({ "rows": rows }),
        None => Value::Null,
    };
    let output = registry
        .render("insights", params)
        .context("Failed to compute correlations")?;
    let data = output.data.clone().unwrap_or_default();

    let labels: Vec<String> = serde_json::from_value(data["heatmap"]["x"].clone())?;
    let values: Vec<Vec<f64>> = serde_json::from_value(data["heatmap"]["z"].clone())?;

    println!("{}", "Sales Correlation:".bold().green());
    println!();
    print_matrix(&labels, &values);
    println!();
    println!("{}", output.content);
    Ok(())
}

fn segment(registry: &ViewRegistry) -> Result<()> {
    let output = registry
        .render("segmentation", Value::Null)
        .context("Failed to segment customers")?;

    println!("{}", "Customer Segmentation:".bold().green());
    println!();
    println!("{}", output.content);
    Ok(())
}

fn report(
    registry: &ViewRegistry,
    from: Option<String>,
    to: Option<String>,
    minerals: Option<Vec<String>>,
    csv_path: Option<&Path>,
) -> Result<()> {
    let params = serde_json::json!({
        "from": from,
        "to": to,
        "minerals": minerals,
    });
    let output = registry
        .render("reporting", params)
        .context("Failed to build production report")?;

    println!("{}", "Production Report:".bold().green());
    println!();
    println!("{}", output.content);

    if let Some(path) = csv_path {
        let data = output.data.unwrap_or_default();
        let csv = data["download"]["content"].as_str().unwrap_or_default();
        std::fs::write(path, csv).context("Failed to write CSV report")?;
        println!();
        println!(
            "{} Report written to: {}",
            "✓".green().bold(),
            path.display().to_string().cyan()
        );
    }

    Ok(())
}

fn render(registry: &ViewRegistry, view: &str, params: Option<&str>) -> Result<()> {
    let params: Value = match params {
        Some(raw) => serde_json::from_str(raw).context("Failed to parse --params as JSON")?,
        None => Value::Null,
    };

    let output = registry
        .render(view, params)
        .with_context(|| format!("Failed to render view '{}'", view))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_matrix(labels: &[String], values: &[Vec<f64>]) {
    let width = labels.iter().map(|l| l.len()).max().unwrap_or(0).max(6);

    print!("{:width$}", "", width = width);
    for label in labels {
        print!(" {:>width$}", label, width = width);
    }
    println!();

    for (label, row) in labels.iter().zip(values) {
        print!("{:<width$}", label.bold(), width = width);
        for v in row {
            let cell = format!(" {:>width$.2}", v, width = width);
            if *v >= 0.5 {
                print!("{}", cell.red());
            } else if *v <= -0.5 {
                print!("{}", cell.blue());
            } else {
                print!("{}", cell);
            }
        }
        println!();
    }
}
