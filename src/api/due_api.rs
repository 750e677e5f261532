// ==========================================
// 设备预防性维护决策支持系统 - 到期评估 API
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 6. 外部接口
// ==========================================
// 职责: 进程内调用边界: 快照获取(带超时) → 引擎评估 → 报告
// 红线: 快照获取失败/超时对整次调用致命,不输出部分清单;
//       评估不长时间运行,同步请求/响应即可,无需流式
// ==========================================

use crate::api::dto::NearDueItemDto;
use crate::config::engine_config::EngineConfig;
use crate::engine::evaluator::DueListEngine;
use crate::engine::report::EvaluationReport;
use crate::engine::validate::ValidationError;
use crate::repository::error::StoreError;
use crate::snapshot::fleet::FleetSnapshot;
use crate::snapshot::provider::{fetch_snapshot_with_timeout, SnapshotProvider};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

// ==========================================
// DueApiError - API 层错误
// ==========================================
#[derive(Error, Debug)]
pub enum DueApiError {
    #[error("快照获取失败: {0}")]
    Store(#[from] StoreError),

    #[error("规则校验失败: {0}")]
    Validation(#[from] ValidationError),
}

// ==========================================
// DueListApi - 到期评估接口
// ==========================================
pub struct DueListApi {
    engine: DueListEngine,
    config: EngineConfig,
    fetch_timeout: Duration,
}

impl DueListApi {
    /// # 参数
    /// - config: 引擎策略开关
    /// - fetch_timeout: 快照获取上界(整次评估唯一的挂起点)
    pub fn new(config: EngineConfig, fetch_timeout: Duration) -> Self {
        Self {
            engine: DueListEngine::new(),
            config,
            fetch_timeout,
        }
    }

    /// 从提供方获取快照并评估
    ///
    /// # 参数
    /// - evaluation_time: 评估时刻; None = "现在"(可注入,测试/回算用)
    #[instrument(skip(self, provider))]
    pub async fn evaluate_with_provider(
        &self,
        provider: &dyn SnapshotProvider,
        evaluation_time: Option<DateTime<Utc>>,
    ) -> Result<EvaluationReport, DueApiError> {
        let snapshot = fetch_snapshot_with_timeout(provider, self.fetch_timeout).await?;
        let evaluation_time = evaluation_time.unwrap_or_else(Utc::now);
        Ok(self.engine.evaluate(&snapshot, evaluation_time, &self.config)?)
    }

    /// 对已有快照评估(无挂起点)
    pub fn evaluate_snapshot(
        &self,
        snapshot: &FleetSnapshot,
        evaluation_time: DateTime<Utc>,
    ) -> Result<EvaluationReport, DueApiError> {
        Ok(self.engine.evaluate(snapshot, evaluation_time, &self.config)?)
    }

    /// 临近到期视图: 未到期但 next_due_at 落在配置视窗内的 TIME 裁决
    ///
    /// 取自伴随裁决视图,不参与精度裁决(有效清单仍只含已到期项)
    pub fn near_due_items(&self, report: &EvaluationReport) -> Vec<NearDueItemDto> {
        let horizon =
            report.evaluated_at + ChronoDuration::days(self.config.near_due_horizon_days);

        report
            .evaluated
            .iter()
            .filter(|row| !row.verdict.due_now)
            .filter(|row| {
                row.verdict
                    .next_due_at
                    .map(|next| next <= horizon)
                    .unwrap_or(false)
            })
            .map(NearDueItemDto::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::machine::Machine;
    use crate::domain::plan::{MaintenancePlan, PlanScope, ScheduleRule};
    use crate::domain::task::MaintenanceTask;
    use crate::domain::types::{IntervalUnit, ResetPolicy, RuleKind};
    use crate::snapshot::fleet::FleetData;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};

    struct FixtureProvider {
        data: FleetData,
    }

    #[async_trait]
    impl SnapshotProvider for FixtureProvider {
        async fn fetch_snapshot(&self) -> Result<FleetSnapshot, StoreError> {
            Ok(FleetSnapshot::from_data(self.data.clone()))
        }
    }

    fn fixture_data() -> FleetData {
        FleetData {
            machines: vec![Machine {
                machine_id: "M001".to_string(),
                model_code: "EXC-320".to_string(),
                name: None,
                in_service_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                retired_date: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }],
            tasks: vec![MaintenanceTask {
                task_id: "T001".to_string(),
                name: "年检".to_string(),
                part_family: None,
            }],
            plans: vec![MaintenancePlan {
                plan_id: "P001".to_string(),
                task_id: "T001".to_string(),
                scope: PlanScope::Machine("M001".to_string()),
                is_active: true,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }],
            rules: vec![ScheduleRule {
                rule_id: "R001".to_string(),
                plan_id: "P001".to_string(),
                kind: RuleKind::Time,
                reset_policy: ResetPolicy::Never,
                is_active: true,
                start_at: None,
                counter_id: None,
                threshold: None,
                interval_count: Some(12),
                interval_unit: Some(IntervalUnit::Month),
                recurrence: None,
                timezone: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_evaluate_with_injected_time() {
        let api = DueListApi::new(EngineConfig::default(), Duration::from_secs(5));
        let provider = FixtureProvider {
            data: fixture_data(),
        };

        // 投运 2025-09-01 + 12月 = 2026-09-01; 评估时刻之后 → 到期
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let report = api
            .evaluate_with_provider(&provider, Some(at))
            .await
            .unwrap();
        assert_eq!(report.evaluated_at, at);
        assert_eq!(report.effective.len(), 1);
    }

    #[tokio::test]
    async fn test_near_due_window() {
        let api = DueListApi::new(EngineConfig::default(), Duration::from_secs(5));
        let provider = FixtureProvider {
            data: fixture_data(),
        };

        // next_due = 2026-09-01; 视窗 14 天
        let within = Utc.with_ymd_and_hms(2026, 8, 25, 0, 0, 0).unwrap();
        let report = api
            .evaluate_with_provider(&provider, Some(within))
            .await
            .unwrap();
        assert!(report.effective.is_empty());
        let near = api.near_due_items(&report);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].machine_id, "M001");

        // 视窗之外
        let outside = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let report = api
            .evaluate_with_provider(&provider, Some(outside))
            .await
            .unwrap();
        assert!(api.near_due_items(&report).is_empty());
    }
}
