// ==========================================
// 设备预防性维护决策支持系统 - CLI 入口
// ==========================================
// 依据: PM_Master_Spec.md
// 用法:
//   fleet-pm [db_path] [evaluation_time]
//   - db_path: 快照库路径(缺省走 FLEET_PM_DB_PATH 或用户数据目录)
//   - evaluation_time: RFC3339 评估时刻(缺省为当前时刻,回算时显式传入)
// ==========================================

use anyhow::Context;
use chrono::{DateTime, Utc};
use fleet_pm::api::{DueItemDto, DueListApi, ReportSummaryDto};
use fleet_pm::logging;
use fleet_pm::snapshot::SqliteSnapshotProvider;
use std::path::PathBuf;
use std::time::Duration;

/// 快照获取上界
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", fleet_pm::APP_NAME);
    tracing::info!("系统版本: {}", fleet_pm::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);

    let db_path = args
        .next()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_db_path);
    tracing::info!("使用快照库: {}", db_path);

    let evaluation_time: Option<DateTime<Utc>> = match args.next() {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw.trim())
                .with_context(|| format!("评估时刻不是合法 RFC3339: {}", raw))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    let provider = SqliteSnapshotProvider::new(&db_path).context("打开快照库失败")?;
    let config = provider.load_engine_config().context("装载引擎配置失败")?;
    tracing::info!(?config, "引擎配置");

    let api = DueListApi::new(config, FETCH_TIMEOUT);
    let report = api
        .evaluate_with_provider(&provider, evaluation_time)
        .await
        .context("到期评估失败")?;

    let summary = ReportSummaryDto::from(&report);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    let due_items: Vec<DueItemDto> = report.effective.iter().map(DueItemDto::from).collect();
    println!("{}", serde_json::to_string_pretty(&due_items)?);

    let near_due = api.near_due_items(&report);
    if !near_due.is_empty() {
        tracing::info!(count = near_due.len(), "临近到期项");
        println!("{}", serde_json::to_string_pretty(&near_due)?);
    }

    for diagnostic in &report.diagnostics {
        tracing::warn!(
            kind = %diagnostic.kind,
            plan_id = %diagnostic.plan_id,
            "诊断: {}",
            diagnostic.message
        );
    }

    Ok(())
}

/// 解析缺省快照库路径
///
/// 优先级: FLEET_PM_DB_PATH 环境变量 → 用户数据目录 → 当前目录
fn default_db_path() -> String {
    if let Ok(path) = std::env::var("FLEET_PM_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./fleet_pm.db");
    if let Some(data_dir) = dirs::data_dir() {
        path = data_dir.join("fleet-pm");
        std::fs::create_dir_all(&path).ok();
        path = path.join("fleet_pm.db");
    }

    path.to_string_lossy().to_string()
}
