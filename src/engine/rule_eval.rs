// ==========================================
// 设备预防性维护决策支持系统 - 规则评估引擎
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 4. Rule Evaluator
// ==========================================
// 职责: (规则, 目标) → 结构统一的裁决
// 红线: 纯函数,无状态无 I/O; RRULE/EVENT 显式跳过,
//       绝不伪造"看似权威"的到期/未到期结论
// ==========================================

use crate::domain::plan::ScheduleRule;
use crate::domain::types::{DiagnosticKind, RuleKind, SkipReason};
use crate::engine::baseline::BaselineResolver;
use crate::engine::calendar::add_interval;
use crate::engine::expansion::ExpansionRow;
use crate::engine::reading::LatestReadingResolver;
use crate::engine::report::{RuleOutcome, RuleVerdict};
use crate::snapshot::fleet::FleetSnapshot;
use chrono::{DateTime, Utc};
use tracing::warn;

// ==========================================
// RuleEvaluator - 规则评估引擎
// ==========================================
pub struct RuleEvaluator;

impl RuleEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// 对单个 (规则, 目标行) 评估
    ///
    /// # 规则
    /// - USAGE: current = 最新读数或 0; remaining = threshold - current;
    ///   due_now = current >= threshold; 无日历投影
    /// - TIME: next_due_at = 基线 + 周期(日历感知); due_now = next_due_at <= 评估时刻
    /// - RRULE: 显式跳过(展开未实现)
    /// - EVENT: 显式跳过(外部信号判定)
    pub fn evaluate(
        &self,
        rule: &ScheduleRule,
        row: &ExpansionRow,
        snapshot: &FleetSnapshot,
        evaluation_time: DateTime<Utc>,
    ) -> RuleOutcome {
        match rule.kind {
            RuleKind::Usage => self.evaluate_usage(rule, row, snapshot),
            RuleKind::Time => self.evaluate_time(rule, row, snapshot, evaluation_time),
            RuleKind::Rrule => RuleOutcome::Skipped(SkipReason::RruleUnsupported),
            RuleKind::Event => RuleOutcome::Skipped(SkipReason::EventExternal),
        }
    }

    fn evaluate_usage(
        &self,
        rule: &ScheduleRule,
        row: &ExpansionRow,
        snapshot: &FleetSnapshot,
    ) -> RuleOutcome {
        // 装载校验保证必填; 防御路径仍然降级而非 panic
        let (Some(counter_id), Some(threshold)) = (&rule.counter_id, rule.threshold) else {
            warn!(rule_id = %rule.rule_id, "USAGE 规则必填字段缺失(应被装载校验拦截)");
            return RuleOutcome::NotEvaluable {
                kind: DiagnosticKind::MalformedRule,
                message: "USAGE 规则必填字段缺失".to_string(),
            };
        };

        // 计数器目录完整性: 断裂外键降级为诊断
        if !snapshot.counter_exists(counter_id) {
            return RuleOutcome::NotEvaluable {
                kind: DiagnosticKind::MissingCounter,
                message: format!("计数器不存在: counter_id={}", counter_id),
            };
        }

        // 从未抄表的计数器读作 0,不是立即到期
        let current = LatestReadingResolver::new(snapshot)
            .current_value_or_zero(&row.machine_id, counter_id);

        RuleOutcome::Verdict(RuleVerdict {
            due_now: current >= threshold,
            next_due_at: None,
            remaining: Some(threshold - current),
            current_value: Some(current),
        })
    }

    fn evaluate_time(
        &self,
        rule: &ScheduleRule,
        row: &ExpansionRow,
        snapshot: &FleetSnapshot,
        evaluation_time: DateTime<Utc>,
    ) -> RuleOutcome {
        let Some(machine) = snapshot.machine(&row.machine_id) else {
            return RuleOutcome::NotEvaluable {
                kind: DiagnosticKind::MissingMachine,
                message: format!("设备不存在: machine_id={}", row.machine_id),
            };
        };

        let component = match &row.component_id {
            Some(component_id) => match snapshot.component(component_id) {
                Some(c) => Some(c),
                None => {
                    return RuleOutcome::NotEvaluable {
                        kind: DiagnosticKind::MissingComponent,
                        message: format!("部件实例不存在: component_id={}", component_id),
                    }
                }
            },
            None => None,
        };

        let (Some(count), Some(unit)) = (rule.interval_count, rule.interval_unit) else {
            warn!(rule_id = %rule.rule_id, "TIME 规则必填字段缺失(应被装载校验拦截)");
            return RuleOutcome::NotEvaluable {
                kind: DiagnosticKind::MalformedRule,
                message: "TIME 规则必填字段缺失".to_string(),
            };
        };

        let base = BaselineResolver::resolve(rule, machine, component);
        // 日历溢出按时间上界饱和,等价于"远未到期"
        let next_due_at =
            add_interval(base, count, unit).unwrap_or(DateTime::<Utc>::MAX_UTC);

        RuleOutcome::Verdict(RuleVerdict {
            due_now: next_due_at <= evaluation_time,
            next_due_at: Some(next_due_at),
            remaining: None,
            current_value: None,
        })
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
