//! # CLI Module
//!
//! Command-line interface for the family photo grouper.
//!
//! ## Usage
//! ```bash
//! # Group every photo in a directory
//! photo-groups group ~/Photos/family --manifest faces.json
//!
//! # Stricter matching
//! photo-groups group ~/Photos/family --manifest faces.json --threshold 0.4
//!
//! # Ask an external face recognizer
//! photo-groups group a.jpg b.jpg --analyzer-command ./faces.sh --output json
//!
//! # Count faces
//! photo-groups analyze fam1.jpg --manifest faces.json
//!
//! # HTTP API
//! photo-groups serve --port 5000 --analyzer-command ./faces.sh
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, StyledObject, Term};
use family_photo_grouper::api;
use family_photo_grouper::core::analyzer::{CommandAnalyzer, FaceAnalyzer, ManifestAnalyzer};
use family_photo_grouper::core::grouper::{ThresholdStrategy, DEFAULT_THRESHOLD};
use family_photo_grouper::core::photo::{FaceCount, Photo, PhotoKind};
use family_photo_grouper::core::scanner::{CollectConfig, PhotoCollector};
use family_photo_grouper::error::{AnalyzerError, FamilyGrouperError, Result};
use family_photo_grouper::events::{Event, EventChannel, GroupingEvent};
use family_photo_grouper::service::{GroupingResponse, GroupingService, ServiceConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

/// Family Photo Grouper - Sort photos into families by face
#[derive(Parser, Debug)]
#[command(name = "photo-groups")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Group photos into families
    Group {
        /// Photos or directories of photos
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Maximum face distance for a match (lower = stricter)
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },

    /// Count the faces in photos
    Analyze {
        /// Photos to analyze
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },

    /// Serve the grouping API over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,

        /// Default threshold for requests that do not set one
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
}

/// Where face counts and distances come from
#[derive(Args, Debug)]
struct AnalyzerArgs {
    /// JSON manifest of face counts and pairwise distances
    #[arg(long, conflicts_with = "analyzer_command")]
    manifest: Option<PathBuf>,

    /// Program answering `count <photo>` and `compare <a> <b>`
    #[arg(long)]
    analyzer_command: Option<String>,

    /// Argument passed to the analyzer program (repeatable)
    #[arg(long = "analyzer-arg", requires = "analyzer_command", allow_hyphen_values = true)]
    analyzer_args: Vec<String>,
}

impl AnalyzerArgs {
    fn build(self) -> Result<Arc<dyn FaceAnalyzer>> {
        match (self.manifest, self.analyzer_command) {
            (Some(path), None) => Ok(Arc::new(ManifestAnalyzer::from_path(&path)?)),
            (None, Some(program)) => Ok(Arc::new(CommandAnalyzer::new(program, self.analyzer_args)?)),
            _ => Err(AnalyzerError::NotConfigured.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (group id and path per line)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Group {
            paths,
            threshold,
            output,
            include_hidden,
            verbose,
            analyzer,
        } => {
            family_photo_grouper::init_tracing(if verbose { "info" } else { "warn" });
            run_group(paths, threshold, output, include_hidden, verbose, analyzer)
        }
        Commands::Analyze {
            photos,
            output,
            analyzer,
        } => {
            family_photo_grouper::init_tracing("warn");
            run_analyze(photos, output, analyzer)
        }
        Commands::Serve {
            host,
            port,
            threshold,
            analyzer,
        } => {
            family_photo_grouper::init_tracing("info");
            run_serve(SocketAddr::new(host, port), threshold, analyzer)
        }
    }
}

fn build_service(analyzer: AnalyzerArgs, threshold: f64) -> Result<GroupingService> {
    let strategy = ThresholdStrategy::new(threshold)?;
    let analyzer = analyzer.build()?;

    Ok(GroupingService::new(
        analyzer,
        ServiceConfig {
            strategy,
            require_existing_files: true,
        },
    ))
}

fn run_group(
    paths: Vec<PathBuf>,
    threshold: f64,
    output: OutputFormat,
    include_hidden: bool,
    verbose: bool,
    analyzer: AnalyzerArgs,
) -> Result<()> {
    let term = Term::stderr();

    // Print header
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Family Photo Grouper").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let service = build_service(analyzer, threshold)?;

    let photos = PhotoCollector::new(CollectConfig {
        include_hidden,
        ..CollectConfig::default()
    })
    .collect(&paths)?;

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Grouping(GroupingEvent::PhaseChanged { phase, total }) => {
                    pb.set_length(total as u64);
                    pb.set_position(0);
                    pb.set_message(phase.to_string());
                }
                Event::Grouping(GroupingEvent::Progress { completed, .. }) => {
                    pb.set_position(completed as u64);
                }
                Event::Grouping(GroupingEvent::Completed(_)) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    // Run the grouper
    let response = service.group_with_events(&photos, None, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    let response = response?;

    // Output results
    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &service, &response, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Minimal => print_minimal_results(&response),
    }

    Ok(())
}

fn print_pretty_results(
    term: &Term,
    service: &GroupingService,
    response: &GroupingResponse,
    verbose: bool,
) {
    term.write_line(&format!("{} Grouping Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    // Summary
    term.write_line(&format!(
        "  {} photos analyzed",
        style(response.total_photos).cyan()
    ))
    .ok();

    term.write_line(&format!(
        "  {} family groups found",
        style(response.total_groups).cyan()
    ))
    .ok();

    if !response.photos_without_faces.is_empty() {
        term.write_line(&format!(
            "  {} photos without faces",
            style(response.photos_without_faces.len()).yellow()
        ))
        .ok();
    }

    if verbose {
        term.write_line(&format!(
            "  {}",
            style(service.config().strategy.description()).dim()
        ))
        .ok();

        let stats = service.cache_stats();
        term.write_line(&format!(
            "  {} face counts cached ({:.0}% hit rate, analyzer: {})",
            style(stats.total_entries).dim(),
            stats.hit_rate() * 100.0,
            service.analyzer_name()
        ))
        .ok();
    }

    term.write_line("").ok();

    if response.groups.is_empty() {
        term.write_line("  No groups formed.").ok();
        return;
    }

    term.write_line(&format!("{}", style("Family Groups:").bold().underlined()))
        .ok();
    term.write_line("").ok();

    for (id, group) in &response.groups {
        term.write_line(&format!(
            "  {} {} photos ({} family, {} individual)",
            style(format!("Group {}:", id)).bold(),
            group.total_photos,
            style(group.family_photos).yellow(),
            group.individual_photos
        ))
        .ok();

        for photo in &group.photos {
            // Counts are cached from grouping, no new detection happens here
            let marker = if service.is_family_photo(photo) {
                style("◆").yellow().to_string()
            } else {
                style("○").dim().to_string()
            };
            term.write_line(&format!("    {} {}", marker, photo)).ok();
        }

        term.write_line("").ok();
    }

    if verbose && !response.photos_without_faces.is_empty() {
        term.write_line(&format!("{}", style("Without faces:").dim())).ok();
        for photo in &response.photos_without_faces {
            term.write_line(&format!("    {}", style(photo).dim())).ok();
        }
    }
}

/// Face count classification, colored by kind
fn styled_kind(face_count: FaceCount) -> StyledObject<PhotoKind> {
    let kind = PhotoKind::from_face_count(face_count);
    match kind {
        PhotoKind::Family => style(kind).yellow(),
        PhotoKind::Individual => style(kind).cyan(),
        PhotoKind::Empty => style(kind).dim(),
    }
}

fn print_minimal_results(response: &GroupingResponse) {
    for (id, group) in &response.groups {
        for photo in &group.photos {
            println!("{}\t{}", id, photo);
        }
    }
}

fn run_analyze(photos: Vec<PathBuf>, output: OutputFormat, analyzer: AnalyzerArgs) -> Result<()> {
    let service = build_service(analyzer, DEFAULT_THRESHOLD)?;

    let reports = photos
        .iter()
        .map(|path| service.analyze(&Photo::from(path.as_path())))
        .collect::<Result<Vec<_>>>()?;

    match output {
        OutputFormat::Pretty => {
            let term = Term::stdout();
            for report in &reports {
                term.write_line(&format!(
                    "{}: {} faces ({})",
                    report.photo,
                    style(report.face_count).cyan(),
                    styled_kind(report.face_count)
                ))
                .ok();
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Minimal => {
            for report in &reports {
                println!("{}\t{}", report.face_count, report.photo);
            }
        }
    }

    Ok(())
}

fn run_serve(addr: SocketAddr, threshold: f64, analyzer: AnalyzerArgs) -> Result<()> {
    let service = Arc::new(build_service(analyzer, threshold)?);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| FamilyGrouperError::Server(e.to_string()))?;

    runtime
        .block_on(api::serve(service, addr))
        .map_err(|e| FamilyGrouperError::Server(e.to_string()))
}
