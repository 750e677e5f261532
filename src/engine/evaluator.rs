// ==========================================
// 设备预防性维护决策支持系统 - 到期评估编排引擎
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 1.1 评估管线
// 管线: 装载校验 → 计划展开 → 逐目标规则评估 → 精度裁决
// ==========================================
// 红线: 评估是 (快照, 评估时刻) 的纯函数,幂等无状态;
//       单目标数据缺口只降级为诊断,绝不毒化整队结果
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::engine::expansion::PlanExpander;
use crate::engine::precedence::PrecedenceResolver;
use crate::engine::report::{
    Diagnostic, EvaluatedRule, EvaluationReport, RuleOutcome, SkippedRule,
};
use crate::engine::rule_eval::RuleEvaluator;
use crate::engine::validate::{RuleValidator, ValidationError};
use crate::snapshot::fleet::FleetSnapshot;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

// ==========================================
// DueListEngine - 到期评估引擎
// ==========================================
pub struct DueListEngine {
    expander: PlanExpander,
    evaluator: RuleEvaluator,
    precedence: PrecedenceResolver,
}

impl DueListEngine {
    pub fn new() -> Self {
        Self {
            expander: PlanExpander::new(),
            evaluator: RuleEvaluator::new(),
            precedence: PrecedenceResolver::new(),
        }
    }

    /// 对快照执行一次完整到期评估
    ///
    /// # 参数
    /// - snapshot: 实体快照(只读)
    /// - evaluation_time: 评估时刻(可注入,用于测试与回算)
    /// - config: 引擎策略开关
    ///
    /// # 返回
    /// - Ok(EvaluationReport): 有效清单 + 全量裁决 + 跳过 + 诊断
    /// - Err(ValidationError): 存在畸形规则,评估前整体拒绝
    #[instrument(skip(self, snapshot, config), fields(evaluation_time = %evaluation_time))]
    pub fn evaluate(
        &self,
        snapshot: &FleetSnapshot,
        evaluation_time: DateTime<Utc>,
        config: &EngineConfig,
    ) -> Result<EvaluationReport, ValidationError> {
        // 阶段 0: 装载校验(畸形规则在评估前拒绝,绝不静默矫正)
        RuleValidator::validate_snapshot(snapshot)?;

        // 阶段 1: 计划展开
        let expansion = self.expander.expand(snapshot, config);
        let mut diagnostics: Vec<Diagnostic> = expansion.diagnostics;

        // 阶段 2: 逐目标规则评估
        let mut evaluated: Vec<EvaluatedRule> = Vec::new();
        let mut skipped: Vec<SkippedRule> = Vec::new();

        for row in &expansion.rows {
            for rule in snapshot.rules_for_plan(&row.plan_id) {
                // 停用规则在本阶段前丢弃
                if !rule.is_active {
                    continue;
                }

                match self.evaluator.evaluate(rule, row, snapshot, evaluation_time) {
                    RuleOutcome::Verdict(verdict) => evaluated.push(EvaluatedRule {
                        machine_id: row.machine_id.clone(),
                        task_id: row.task_id.clone(),
                        plan_id: row.plan_id.clone(),
                        rule_id: rule.rule_id.clone(),
                        component_id: row.component_id.clone(),
                        scope_level: row.scope_level,
                        rule_kind: rule.kind,
                        threshold: rule.threshold,
                        verdict,
                        notes: row.notes.clone(),
                    }),
                    RuleOutcome::Skipped(reason) => skipped.push(SkippedRule {
                        machine_id: row.machine_id.clone(),
                        task_id: row.task_id.clone(),
                        plan_id: row.plan_id.clone(),
                        rule_id: rule.rule_id.clone(),
                        component_id: row.component_id.clone(),
                        scope_level: row.scope_level,
                        rule_kind: rule.kind,
                        reason,
                    }),
                    RuleOutcome::NotEvaluable { kind, message } => {
                        diagnostics.push(Diagnostic {
                            kind,
                            plan_id: row.plan_id.clone(),
                            rule_id: Some(rule.rule_id.clone()),
                            machine_id: Some(row.machine_id.clone()),
                            component_id: row.component_id.clone(),
                            message,
                        })
                    }
                }
            }
        }

        // 伴随视图与跳过清单按稳定键排序,保证跨次字节级一致
        evaluated.sort_by(|a, b| {
            (&a.machine_id, &a.task_id, &a.plan_id, &a.rule_id)
                .cmp(&(&b.machine_id, &b.task_id, &b.plan_id, &b.rule_id))
        });
        skipped.sort_by(|a, b| {
            (&a.machine_id, &a.task_id, &a.plan_id, &a.rule_id)
                .cmp(&(&b.machine_id, &b.task_id, &b.plan_id, &b.rule_id))
        });

        // 阶段 3: 精度裁决
        let mut effective = self.precedence.resolve(&evaluated, evaluation_time);

        // 输出装饰: 最近一次保养时刻(来自 service_log 索引)
        for item in &mut effective {
            item.last_serviced_at = snapshot.last_serviced_at(&item.machine_id, &item.task_id);
        }

        let report = EvaluationReport {
            evaluated_at: evaluation_time,
            effective,
            evaluated,
            skipped,
            diagnostics,
        };

        info!(summary = %report.summary(), "到期评估完成");
        Ok(report)
    }
}

impl Default for DueListEngine {
    fn default() -> Self {
        Self::new()
    }
}
