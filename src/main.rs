//! CLI entry point for the Yard Velocity engine.
//!
//! Provides subcommands for scoring single facilities, network and regional
//! views, risk and deployment planning, coordinate validation, and
//! publishing the dashboard report.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use yard_velocity::analyzers::aggregate::network_stats;
use yard_velocity::analyzers::leaderboard::{paginate, rank, regional_leaderboard, Scope, SortKey};
use yard_velocity::analyzers::report::{build_report, RenderedReport};
use yard_velocity::analyzers::risk::{profile_pending, summarize};
use yard_velocity::analyzers::waves::plan_waves;
use yard_velocity::analyzers::yvs::explain;
use yard_velocity::config::EngineConfig;
use yard_velocity::detection::DetectionProvider;
use yard_velocity::detection::mock::MockDetectionProvider;
use yard_velocity::facility::{AdoptionStatus, Coordinates};
use yard_velocity::infra::mapbox::MapboxGeocoder;
use yard_velocity::output::{append_record, print_json, print_pretty};
use yard_velocity::roster::{FacilityRepository, Roster, RosterFilter};
use yard_velocity::scorecard::{hit_list, ScoreRecord};
use yard_velocity::validate::{cancel_pair, validate_coordinates, ValidationScope};

#[derive(Parser)]
#[command(name = "yard_velocity")]
#[command(about = "Score, rank and plan yard automation rollouts", long_about = None)]
struct Cli {
    /// Roster JSON file (defaults to the bundled roster)
    #[arg(long, global = true)]
    roster: Option<String>,

    /// Engine config JSON file (defaults to built-in tables)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a roster facility, explicit inputs, or mock detections at a location
    Score {
        /// Roster facility id
        #[arg(long, conflicts_with_all = ["paved", "lat"])]
        facility: Option<String>,

        /// Paved area percentage (0-100)
        #[arg(long, requires_all = ["trailers", "gates"])]
        paved: Option<f64>,

        #[arg(long)]
        trailers: Option<u32>,

        #[arg(long)]
        gates: Option<u32>,

        /// Latitude for mock detection
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Seed for mock detection
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// CSV file to append the score to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Network-wide adoption and ROI statistics
    Stats {
        #[arg(long)]
        region: Option<String>,

        #[arg(long, value_enum)]
        status: Option<AdoptionStatus>,

        /// Only facilities that have started adopting
        #[arg(long, default_value_t = false)]
        active: bool,
    },
    /// Ranked facility leaderboard
    Leaderboard {
        #[arg(short, long, value_enum, default_value_t = SortKey::Points)]
        by: SortKey,

        /// Include facilities that have not started adopting
        #[arg(long, default_value_t = false)]
        all: bool,

        #[arg(short, long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
    /// Regional standings by total points
    Regions,
    /// Deployment risk profiles for pending facilities
    Risk {
        #[arg(long)]
        region: Option<String>,
    },
    /// Plan regional deployment waves for pending facilities
    Waves {
        /// Calendar anchor (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Check stored coordinates against the geocoder
    Validate {
        /// Only the first N facilities
        #[arg(long)]
        sample: Option<usize>,

        /// Maximum number of concurrent lookups
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Only print facilities that need review
        #[arg(long, default_value_t = false)]
        review_only: bool,
    },
    /// Write the dashboard report and optionally upload it to S3
    Report {
        /// Directory to write dashboard.json and hit_list.csv into
        #[arg(short = 'd', long, default_value = "report")]
        output_dir: String,

        /// Optional: S3 bucket name to upload the report to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Key prefix inside the bucket
        #[arg(long, default_value = "dashboard")]
        s3_prefix: String,

        /// Optional: Gzip compress report files
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/yard_velocity.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("yard_velocity.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    print_pretty(&config);
    let roster = match &cli.roster {
        Some(path) => Roster::load(path)?,
        None => Roster::seeded()?,
    };

    match cli.command {
        Commands::Score {
            facility,
            paved,
            trailers,
            gates,
            lat,
            lng,
            seed,
            output,
        } => {
            let (source, breakdown) = match (facility, paved, lat.zip(lng)) {
                (Some(id), _, _) => {
                    let f = roster
                        .get(&id)
                        .with_context(|| format!("no facility with id '{id}'"))?;
                    let b = explain(&config.scoring, f.paved_area_pct, f.trailers_detected, f.gate_nodes);
                    (format!("facility:{id}"), b)
                }
                (None, Some(p), _) => {
                    let b = explain(
                        &config.scoring,
                        p,
                        trailers.unwrap_or_default(),
                        gates.unwrap_or_default(),
                    );
                    ("manual".to_string(), b)
                }
                (None, None, Some((lat, lng))) => {
                    let at = Coordinates::new(lat, lng);
                    at.validate()?;
                    let d = MockDetectionProvider::new(seed).detect(at)?;
                    info!(location = %at, trailers = d.trailers, tractors = d.tractors, "Mock detections");
                    let b = explain(&config.scoring, d.paved_area_pct, d.trailers, d.gate_nodes);
                    (format!("mock:{at}"), b)
                }
                (None, None, None) => bail!("pass --facility, --paved/--trailers/--gates, or --lat/--lng"),
            };

            info!(
                source = %source,
                yvs = breakdown.total_score,
                tier = breakdown.classification.tier.as_str(),
                "Scored"
            );
            print_json(&breakdown)?;
            if let Some(path) = output {
                append_record(&path, &ScoreRecord::from_breakdown(&source, &breakdown))?;
            }
        }
        Commands::Stats {
            region,
            status,
            active,
        } => {
            let filter = RosterFilter {
                status,
                region,
                active_only: active,
            };
            let selected = roster.filter(&filter);
            print_json(&network_stats(selected, &config))?;
        }
        Commands::Leaderboard {
            by,
            all,
            page,
            page_size,
        } => {
            let scope = if all { Scope::All } else { Scope::Active };
            let ranked = rank(roster.all(), by, scope, &config.scoring);
            print_json(&paginate(&ranked, page_size, page)?)?;
        }
        Commands::Regions => {
            print_json(&regional_leaderboard(roster.all(), &config.scoring))?;
        }
        Commands::Risk { region } => {
            let selected = roster.filter(&RosterFilter {
                region,
                ..Default::default()
            });
            let mut profiles = profile_pending(selected, &config.scoring, &config.risk);
            profiles.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.facility_id.cmp(&b.facility_id)));
            for p in &profiles {
                info!(facility_id = %p.facility_id, score = p.score, tier = p.tier.as_str(), "Risk profiled");
            }
            print_json(&summarize(&profiles))?;
            print_json(&profiles)?;
        }
        Commands::Waves { start } => {
            let today = start.unwrap_or_else(|| Utc::now().date_naive());
            let plan = plan_waves(roster.all(), &config.scoring, &config.waves, today);
            for w in &plan.waves {
                info!(
                    wave = w.wave,
                    region = %w.region,
                    priority = w.priority.as_str(),
                    facilities = w.facility_count,
                    "Wave planned"
                );
            }
            print_json(&plan)?;
        }
        Commands::Validate {
            sample,
            concurrency,
            review_only,
        } => {
            let mut settings = config.validation;
            if let Some(c) = concurrency {
                settings.concurrency = c;
            }
            settings.validate()?;

            let geocoder = Arc::new(MapboxGeocoder::from_env(settings.lookup_timeout())?);
            let scope = sample.map_or(ValidationScope::Full, ValidationScope::Sample);

            let (cancel, token) = cancel_pair();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, cancelling validation");
                    cancel.cancel();
                }
            });

            let run = validate_coordinates(geocoder, roster.all(), scope, &settings, token, |progress, result| {
                info!(
                    completed = progress.completed,
                    total = progress.total,
                    facility_id = %result.facility_id,
                    confidence = result.confidence.as_str(),
                    needs_review = result.needs_review,
                    "Validated"
                );
            })
            .await;

            if review_only {
                let flagged: Vec<_> = run.needs_review().collect();
                print_json(&flagged)?;
            } else {
                print_json(&run)?;
            }
        }
        Commands::Report {
            output_dir,
            s3_bucket,
            s3_prefix,
            gzip,
        } => {
            let today = Utc::now().date_naive();
            let report = build_report(roster.all(), &config, today);
            let cards = hit_list(roster.all(), &config.scoring, &config.risk);
            let rendered = RenderedReport::render(&report, &cards, gzip)?;

            let paths = rendered.write_to_dir(&PathBuf::from(&output_dir))?;
            info!(files = paths.len(), output_dir = %output_dir, "Report files ready");

            match s3_bucket {
                Some(bucket) => {
                    let aws = aws_config::load_from_env().await;
                    let s3 = aws_sdk_s3::Client::new(&aws);
                    info!(bucket = %bucket, gzip, "S3 upload enabled");
                    rendered.upload(&s3, &bucket, &s3_prefix).await?;
                }
                None => info!("S3 bucket not specified, skipping upload"),
            }
        }
    }

    Ok(())
}
