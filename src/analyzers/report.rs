//! Builds the dashboard report and writes it to disk and, optionally, S3.
//!
//! A report run produces two artifacts: `dashboard.json` with every network
//! view, and `hit_list.csv` with one score card per facility.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyzers::aggregate::network_stats;
use crate::analyzers::leaderboard::regional_leaderboard;
use crate::analyzers::risk::{profile_pending, summarize};
use crate::analyzers::types::DashboardReport;
use crate::analyzers::waves::plan_waves;
use crate::analyzers::writetos3::write_bytes_to_s3;
use crate::config::EngineConfig;
use crate::facility::Facility;
use crate::output::hit_list_csv;
use crate::scorecard::{hit_list, ScoreCard};

pub const SCHEMA_VERSION: u8 = 1;
pub const DASHBOARD_FILE: &str = "dashboard.json";
pub const HIT_LIST_FILE: &str = "hit_list.csv";

/// How many score cards the dashboard lists as top targets.
pub const TOP_TARGETS: usize = 10;

/// Runs every analyzer over `facilities`.
///
/// Top targets are the highest-YVS facilities that have not started
/// adopting. `today` anchors the deployment calendar.
pub fn build_report(facilities: &[Facility], config: &EngineConfig, today: NaiveDate) -> DashboardReport {
    let mut risk_profiles = profile_pending(facilities, &config.scoring, &config.risk);
    risk_profiles.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.facility_id.cmp(&b.facility_id))
    });

    let pending: Vec<&Facility> = facilities.iter().filter(|f| f.is_pending()).collect();
    let top_targets = hit_list(pending.iter().copied(), &config.scoring, &config.risk)
        .into_iter()
        .take(TOP_TARGETS)
        .collect();

    DashboardReport {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        network: network_stats(facilities, config),
        top_targets,
        regions: regional_leaderboard(facilities, &config.scoring),
        risk_summary: summarize(&risk_profiles),
        risk_profiles,
        deployment_plan: plan_waves(facilities, &config.scoring, &config.waves, today),
    }
}

/// Rendered report files, ready to write or upload.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub dashboard: Vec<u8>,
    pub hit_list: Vec<u8>,
    pub gzip: bool,
}

impl RenderedReport {
    pub fn render(report: &DashboardReport, cards: &[ScoreCard], gzip: bool) -> Result<Self> {
        let dashboard = serde_json::to_vec_pretty(report)?;
        let hit_list = hit_list_csv(cards)?;

        if gzip {
            Ok(Self {
                dashboard: compress(&dashboard)?,
                hit_list: compress(&hit_list)?,
                gzip,
            })
        } else {
            Ok(Self {
                dashboard,
                hit_list,
                gzip,
            })
        }
    }

    fn file_name(&self, base: &str) -> String {
        if self.gzip {
            format!("{base}.gz")
        } else {
            base.to_string()
        }
    }

    pub fn dashboard_name(&self) -> String {
        self.file_name(DASHBOARD_FILE)
    }

    pub fn hit_list_name(&self) -> String {
        self.file_name(HIT_LIST_FILE)
    }

    /// Writes both files into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory '{}'", dir.display()))?;

        let dashboard_path = dir.join(self.dashboard_name());
        let hit_list_path = dir.join(self.hit_list_name());
        std::fs::write(&dashboard_path, &self.dashboard)?;
        std::fs::write(&hit_list_path, &self.hit_list)?;

        info!(dir = %dir.display(), gzip = self.gzip, "Report written");
        Ok(vec![dashboard_path, hit_list_path])
    }

    /// Uploads both files under `prefix/`.
    pub async fn upload(&self, client: &aws_sdk_s3::Client, bucket: &str, prefix: &str) -> Result<()> {
        let key = |name: String| format!("{}/{}", prefix.trim_end_matches('/'), name);

        write_bytes_to_s3(
            client,
            bucket,
            &key(self.dashboard_name()),
            self.dashboard.clone(),
            "application/json",
            self.gzip,
        )
        .await?;
        write_bytes_to_s3(
            client,
            bucket,
            &key(self.hit_list_name()),
            self.hit_list.clone(),
            "text/csv",
            self.gzip,
        )
        .await?;

        Ok(())
    }
}

fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
