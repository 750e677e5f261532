// ==========================================
// 设备预防性维护决策支持系统 - API 数据传输对象
// ==========================================
// 职责: 面向展示/导出的序列化行,时间统一 RFC3339 字符串
// ==========================================

use crate::engine::report::{DueItem, EvaluatedRule, EvaluationReport};
use serde::{Deserialize, Serialize};

// ==========================================
// DueItemDto - 有效到期项视图行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueItemDto {
    pub machine_id: String,
    pub task_id: String,
    pub scope_level: String,
    pub rule_kind: String,
    pub current_value: Option<f64>,
    pub threshold: Option<f64>,
    pub next_due_at: Option<String>,
    pub last_serviced_at: Option<String>,
    pub notes: Option<String>,
}

impl From<&DueItem> for DueItemDto {
    fn from(item: &DueItem) -> Self {
        Self {
            machine_id: item.machine_id.clone(),
            task_id: item.task_id.clone(),
            scope_level: item.scope_level.to_string(),
            rule_kind: item.rule_kind.to_string(),
            current_value: item.current_value,
            threshold: item.threshold,
            next_due_at: item.next_due_at.map(|t| t.to_rfc3339()),
            last_serviced_at: item.last_serviced_at.map(|t| t.to_rfc3339()),
            notes: item.notes.clone(),
        }
    }
}

// ==========================================
// NearDueItemDto - 临近到期视图行
// ==========================================
// 来自伴随裁决视图: 未到期但 next_due_at 落在视窗内的 TIME 裁决
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearDueItemDto {
    pub machine_id: String,
    pub task_id: String,
    pub scope_level: String,
    pub next_due_at: String,
}

impl From<&EvaluatedRule> for NearDueItemDto {
    fn from(row: &EvaluatedRule) -> Self {
        Self {
            machine_id: row.machine_id.clone(),
            task_id: row.task_id.clone(),
            scope_level: row.scope_level.to_string(),
            next_due_at: row
                .verdict
                .next_due_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

// ==========================================
// ReportSummaryDto - 报告摘要
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummaryDto {
    pub evaluated_at: String,
    pub effective_count: usize,
    pub evaluated_count: usize,
    pub skipped_count: usize,
    pub diagnostic_count: usize,
}

impl From<&EvaluationReport> for ReportSummaryDto {
    fn from(report: &EvaluationReport) -> Self {
        Self {
            evaluated_at: report.evaluated_at.to_rfc3339(),
            effective_count: report.effective.len(),
            evaluated_count: report.evaluated.len(),
            skipped_count: report.skipped.len(),
            diagnostic_count: report.diagnostics.len(),
        }
    }
}
