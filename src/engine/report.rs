// ==========================================
// 设备预防性维护决策支持系统 - 评估输出读模型
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 6. 外部接口
// ==========================================
// 职责: 定义评估管线各阶段的输出行与最终报告
// 红线: 报告可序列化,同 (快照, 评估时刻) 两次评估字节级一致
// ==========================================

use crate::domain::types::{DiagnosticKind, RuleKind, ScopeLevel, SkipReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RuleVerdict - 单条规则裁决
// ==========================================
// 四类规则统一的结构化裁决; USAGE 无日历投影(next_due_at 恒空),
// TIME 无用量口径(current/remaining 恒空)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVerdict {
    pub due_now: bool,                        // 当前是否到期
    pub next_due_at: Option<DateTime<Utc>>,   // 下次到期时刻(尽力而为)
    pub remaining: Option<f64>,               // 剩余用量(阈值 - 当前值)
    pub current_value: Option<f64>,           // 当前用量(无读数按 0)
}

// ==========================================
// RuleOutcome - 单条规则评估结果
// ==========================================
// 三分: 有裁决 / 显式跳过 / 不可评估(缺引用数据,局部降级)
#[derive(Debug, Clone)]
pub enum RuleOutcome {
    Verdict(RuleVerdict),
    Skipped(SkipReason),
    NotEvaluable {
        kind: DiagnosticKind,
        message: String,
    },
}

// ==========================================
// EvaluatedRule - 全量评估行(伴随视图)
// ==========================================
// 每条产生裁决的规则一行,无论是否在精度裁决中胜出;
// 诊断口径,不做去重
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedRule {
    pub machine_id: String,             // 目标设备
    pub task_id: String,                // 保养任务
    pub plan_id: String,                // 来源计划
    pub rule_id: String,                // 来源规则
    pub component_id: Option<String>,   // 部件实例(COMPONENT_INSTANCE 作用域)
    pub scope_level: ScopeLevel,        // 作用域层级
    pub rule_kind: RuleKind,            // 规则类别
    pub threshold: Option<f64>,         // USAGE 阈值
    pub verdict: RuleVerdict,           // 裁决
    pub notes: Option<String>,          // 计划备注透传
}

// ==========================================
// SkippedRule - 显式跳过行
// ==========================================
// 红线: 跳过可与"已评估未到期"区分,绝不伪造权威性裁决
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRule {
    pub machine_id: String,
    pub task_id: String,
    pub plan_id: String,
    pub rule_id: String,
    pub component_id: Option<String>,
    pub scope_level: ScopeLevel,
    pub rule_kind: RuleKind,
    pub reason: SkipReason,
}

// ==========================================
// Diagnostic - 诊断行(局部降级)
// ==========================================
// 单个目标的数据缺口不毒化整队结果,收敛为诊断行随报告返回
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub plan_id: String,
    pub rule_id: Option<String>,
    pub machine_id: Option<String>,
    pub component_id: Option<String>,
    pub message: String,
}

// ==========================================
// DueItem - 有效到期项
// ==========================================
// 精度裁决后每 (设备, 任务) 至多一条可执行项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueItem {
    pub machine_id: String,                      // 设备
    pub task_id: String,                         // 任务
    pub plan_id: String,                         // 胜出计划
    pub rule_id: String,                         // 胜出规则
    pub component_id: Option<String>,            // 胜出部件实例
    pub scope_level: ScopeLevel,                 // 触发作用域
    pub rule_kind: RuleKind,                     // 触发规则类别
    pub current_value: Option<f64>,              // 当前用量(USAGE)
    pub threshold: Option<f64>,                  // 阈值(USAGE)
    pub next_due_at: Option<DateTime<Utc>>,      // 到期时刻(TIME)
    pub last_serviced_at: Option<DateTime<Utc>>, // 最近一次保养(装饰字段)
    pub notes: Option<String>,                   // 计划备注透传
}

// ==========================================
// EvaluationReport - 评估报告
// ==========================================
// effective: 去重后的有效到期清单(按设备、任务排序,便于跨次 diff)
// evaluated: 全量裁决伴随视图
// skipped:   显式跳过清单
// diagnostics: 局部降级诊断
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluated_at: DateTime<Utc>,
    pub effective: Vec<DueItem>,
    pub evaluated: Vec<EvaluatedRule>,
    pub skipped: Vec<SkippedRule>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EvaluationReport {
    /// 报告摘要(日志用)
    pub fn summary(&self) -> String {
        format!(
            "effective={}, evaluated={}, skipped={}, diagnostics={}",
            self.effective.len(),
            self.evaluated.len(),
            self.skipped.len(),
            self.diagnostics.len()
        )
    }
}
