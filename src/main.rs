// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use godojo_content::authoring::{self, ContentFormatter, ContentStats, TopicScaffolder};
use godojo_content::utils::logging::{
    format_error, format_finding, format_info, format_step, format_success, format_warning,
    init_logger,
};
use godojo_content::{
    AuthorProfile, Config, ContentBuilder, ExportNotifier, FileScanner, JsonExporter,
    OperationTimer, PerformanceMetrics, QualityChecker, Report, RepositorySync, Settings,
    StructureGenerator, StructureValidator,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "godojo")]
#[command(version)]
#[command(about = "Content pipeline for the GoDojo Go course", long_about = None)]
struct Cli {
    /// Pipeline settings (TOML); `GODOJO_*` environment variables override it
    #[arg(short, long, value_name = "FILE", env = "GODOJO_SETTINGS")]
    config: Option<PathBuf>,

    /// Course configuration (JSON)
    #[arg(long, value_name = "FILE")]
    course: Option<PathBuf>,

    /// Content root directory
    #[arg(long, value_name = "DIR")]
    content: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the author profile and a default course configuration
    Init {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        email: String,
    },

    /// Scaffold a new topic in a category
    New {
        category: String,

        title: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Run the quality checks on one file
    Validate {
        file: PathBuf,

        /// Treat advisory findings as blocking
        #[arg(long)]
        strict: bool,
    },

    /// Per-category content statistics
    Stats,

    /// Run the quality checks on every topic
    Check {
        #[arg(long)]
        strict: bool,
    },

    /// Normalize markdown formatting
    Format {
        /// Only report files that would change
        #[arg(long)]
        check: bool,
    },

    /// Build JSON and YAML records from the content tree
    Build,

    /// Show the branch and commit of the content repository
    Sync,

    #[command(name = "structure:validate")]
    /// Validate the content tree against the course configuration
    StructureValidate,

    #[command(name = "structure:generate")]
    /// Create missing category directories and index files
    StructureGenerate,

    #[command(name = "godojo:prepare")]
    /// Build, export and validate the platform package
    GodojoPrepare {
        /// Export the existing build output without rebuilding
        #[arg(long)]
        skip_build: bool,

        /// Webhook to notify once the export is written
        #[arg(long, value_name = "URL")]
        notify: Option<String>,
    },

    #[command(name = "godojo:validate")]
    /// Validate an exported platform package
    GodojoValidate {
        #[arg(long, value_name = "DIR")]
        package: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", format_error(&err.to_string()));
            return Ok(ExitCode::FAILURE);
        }
    };
    if let Some(course) = cli.course {
        settings.course_config = course;
    }
    if let Some(content) = cli.content {
        settings.content_dir = content;
    }

    if let Commands::Init { name, email } = &cli.command {
        return cmd_init(&settings, name, email);
    }

    info!(
        "Loading course configuration from: {}",
        settings.course_config.display()
    );
    let config = match Config::load(&settings.course_config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", format_error(&err.to_string()));
            return Ok(ExitCode::FAILURE);
        }
    };

    match cli.command {
        Commands::Init { .. } => Ok(ExitCode::SUCCESS),
        Commands::New {
            category,
            title,
            description,
        } => cmd_new(config, &settings, &category, &title, &description),
        Commands::Validate { file, strict } => cmd_validate(&config, &settings, &file, strict),
        Commands::Stats => cmd_stats(&config, &settings),
        Commands::Check { strict } => cmd_check(&config, &settings, strict),
        Commands::Format { check } => cmd_format(&settings, check),
        Commands::Build => cmd_build(config, &settings),
        Commands::Sync => cmd_sync(&settings),
        Commands::StructureValidate => cmd_structure_validate(config, &settings),
        Commands::StructureGenerate => cmd_structure_generate(config, &settings),
        Commands::GodojoPrepare { skip_build, notify } => {
            cmd_prepare(config, &settings, skip_build, notify).await
        }
        Commands::GodojoValidate { package } => {
            let root = package.unwrap_or_else(|| settings.export_dir.clone());
            cmd_package_validate(config, &root)
        }
    }
}

fn cmd_init(settings: &Settings, name: &str, email: &str) -> Result<ExitCode> {
    let outcome = authoring::init(settings, name, email).context("Initialization failed")?;

    for path in &outcome.created {
        println!("{}", format_success(&format!("Created {}", path.display())));
    }
    if outcome.created.is_empty() {
        println!("{}", format_info("Workspace already initialized"));
    }
    println!(
        "{}",
        format_info(&format!(
            "Author {} <{}> ({})",
            outcome.profile.name, outcome.profile.email, outcome.profile.id
        ))
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_new(
    config: Config,
    settings: &Settings,
    category: &str,
    title: &str,
    description: &str,
) -> Result<ExitCode> {
    let scaffolder = TopicScaffolder::new(config, settings)?;
    match scaffolder.new_topic(category, title, description) {
        Ok(topic) => {
            println!(
                "{}",
                format_success(&format!(
                    "Created {} (module {}) at {}",
                    topic.id,
                    topic.module,
                    topic.path.display()
                ))
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", format_error(&err.to_string()));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_validate(
    config: &Config,
    settings: &Settings,
    file: &Path,
    strict: bool,
) -> Result<ExitCode> {
    let checker = QualityChecker::new(config).with_content_root(&settings.content_dir);
    let root = if file.starts_with(&settings.content_dir) {
        settings.content_dir.as_path()
    } else {
        file.parent().unwrap_or(file)
    };

    let report = checker.check_file(file, root);
    Ok(exit_code(print_report(report, strict)))
}

fn cmd_check(config: &Config, settings: &Settings, strict: bool) -> Result<ExitCode> {
    let timer = OperationTimer::new("quality check");
    let checker = QualityChecker::new(config).with_content_root(&settings.content_dir);
    let report = checker
        .check_tree(&settings.content_dir, &FileScanner::from_settings(settings))
        .context("Quality check failed")?;

    timer.finish_with_count(report.files_checked);
    Ok(exit_code(print_report(report, strict)))
}

fn cmd_stats(config: &Config, settings: &Settings) -> Result<ExitCode> {
    let stats = ContentStats::collect(config, settings).context("Failed to gather statistics")?;

    println!(
        "{:<20} {:>7} {:>9} {:>9} {:>10} {:>9}",
        "category", "topics", "words", "examples", "exercises", "minutes"
    );
    for (slug, category) in &stats.categories {
        println!(
            "{:<20} {:>7} {:>9} {:>9} {:>10} {:>9}",
            slug,
            category.topics,
            category.words,
            category.examples,
            category.exercises,
            category.reading_minutes
        );
    }
    let totals = stats.totals();
    println!(
        "{:<20} {:>7} {:>9} {:>9} {:>10} {:>9}",
        "total", totals.topics, totals.words, totals.examples, totals.exercises, totals.reading_minutes
    );

    for path in &stats.unreadable {
        println!("{}", format_warning(&format!("Could not read {}", path)));
    }

    match AuthorProfile::load_optional(&settings.author_profile)? {
        Some(profile) => println!(
            "{}",
            format_info(&format!(
                "{} has created {} topic(s){}",
                profile.name,
                profile.stats.topics_created,
                profile
                    .stats
                    .last_created
                    .as_deref()
                    .map(|id| format!(", most recently {}", id))
                    .unwrap_or_default()
            ))
        ),
        None => println!("{}", format_info("No author profile; run `godojo init`")),
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_format(settings: &Settings, check: bool) -> Result<ExitCode> {
    let formatter = ContentFormatter::new(FileScanner::from_settings(settings));
    let changed = formatter
        .format_tree(&settings.content_dir, check)
        .context("Formatting failed")?;

    for path in &changed {
        if check {
            println!("{}", format_warning(&format!("Would reformat {}", path)));
        } else {
            println!("{}", format_success(&format!("Formatted {}", path)));
        }
    }

    if check && !changed.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_build(config: Config, settings: &Settings) -> Result<ExitCode> {
    Ok(exit_code(run_build(config, settings)?))
}

/// `true` when every file built.
fn run_build(config: Config, settings: &Settings) -> Result<bool> {
    let outcome = ContentBuilder::new(config, settings)
        .with_progress(true)
        .run()
        .context("Build failed")?;

    let metrics = PerformanceMetrics::from_stats("build", &outcome.stats);
    println!("{}", format_info(&metrics.format()));

    for failure in outcome.failures() {
        println!(
            "{}",
            format_error(&format!("{}: {}", failure.path, failure.reason))
        );
    }

    println!(
        "{}",
        format_success(&format!(
            "Built {} topics in {} categories into {}",
            outcome.topics.len(),
            outcome.categories.len(),
            settings.build_dir.display()
        ))
    );

    Ok(outcome.failures().is_empty())
}

fn cmd_sync(settings: &Settings) -> Result<ExitCode> {
    match RepositorySync::new(&settings.content_dir).revision() {
        Ok(revision) => {
            println!(
                "{}",
                format_info(&format!(
                    "{} @ {}",
                    revision.branch.as_deref().unwrap_or("detached HEAD"),
                    revision.commit
                ))
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", format_error(&err.to_string()));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_structure_validate(config: Config, settings: &Settings) -> Result<ExitCode> {
    let report = StructureValidator::new(config)
        .validate_tree(&settings.content_dir)
        .context("Structure validation failed")?;
    Ok(exit_code(print_report(report, false)))
}

fn cmd_structure_generate(config: Config, settings: &Settings) -> Result<ExitCode> {
    let generator = StructureGenerator::new(config, settings.template_dir.as_deref())?;
    let created = generator
        .generate(&settings.content_dir)
        .context("Structure generation failed")?;

    if created.is_empty() {
        println!("{}", format_info("Structure is complete, nothing to create"));
    }
    for path in &created {
        println!("{}", format_success(&format!("Created {}", path.display())));
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_prepare(
    config: Config,
    settings: &Settings,
    skip_build: bool,
    notify: Option<String>,
) -> Result<ExitCode> {
    let total = 3;
    let mut passed = true;

    if skip_build {
        println!("{}", format_step(1, total, "Build skipped"));
    } else {
        println!("{}", format_step(1, total, "Building content"));
        passed &= run_build(config.clone(), settings)?;
    }

    println!("{}", format_step(2, total, "Exporting platform package"));
    let timer = OperationTimer::new("export");
    let exporter = JsonExporter::new(config.clone(), settings).with_progress(true);
    let outcome = exporter.export().context("Export failed")?;
    timer.finish_with_count(outcome.report.counts.topics);

    for warning in &outcome.report.warnings {
        println!("{}", format_warning(warning));
    }
    println!(
        "{}",
        format_success(&format!(
            "Exported {} {} to {} ({})",
            exporter.package_name(),
            exporter.package_version(),
            exporter.output_dir().display(),
            outcome.package.checksum
        ))
    );

    println!("{}", format_step(3, total, "Validating package"));
    passed &= validate_package(config, exporter.output_dir())?;

    if let Some(url) = notify.or_else(|| settings.notify_url.clone()) {
        match ExportNotifier::new(&url) {
            Ok(notifier) => {
                if notifier
                    .notify(
                        exporter.package_name(),
                        exporter.package_version(),
                        &outcome.report,
                    )
                    .await
                {
                    println!("{}", format_success(&format!("Notified {}", notifier.url())));
                }
            }
            Err(err) => warn!("{}", err),
        }
    }

    Ok(exit_code(passed))
}

fn cmd_package_validate(config: Config, root: &Path) -> Result<ExitCode> {
    Ok(exit_code(validate_package(config, root)?))
}

fn validate_package(config: Config, root: &Path) -> Result<bool> {
    let report = StructureValidator::new(config)
        .validate_package(root)
        .context("Package validation failed")?;
    Ok(print_report(report, false))
}

/// Prints every finding and the summary; `true` when nothing is blocking.
fn print_report(report: Report, strict: bool) -> bool {
    let report = (if strict { report.strict() } else { report }).sorted();

    for finding in &report.findings {
        println!("{}", format_finding(finding));
    }

    let summary = report.summary_line();
    if report.has_blocking() {
        println!("{}", format_error(&summary));
        false
    } else {
        println!("{}", format_success(&summary));
        true
    }
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
