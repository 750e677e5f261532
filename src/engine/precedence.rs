// ==========================================
// 设备预防性维护决策支持系统 - 精度裁决引擎
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 5. Precedence Resolver
// ==========================================
// 职责: 到期裁决按 (设备, 任务) 分组,每组恰选一条有效项
// 排序键: 作用域精度升序 → 到期时刻升序(空值按"现在") → rule_id 升序
// 红线: 未到期的组不产出任何行(不出现在有效清单中)
// ==========================================

use crate::engine::report::{DueItem, EvaluatedRule};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::instrument;

// ==========================================
// PrecedenceResolver - 精度裁决引擎
// ==========================================
pub struct PrecedenceResolver;

impl PrecedenceResolver {
    pub fn new() -> Self {
        Self
    }

    /// 从全量裁决中选出有效到期清单
    ///
    /// # 规则
    /// 1) 只收 due_now=true 的裁决
    /// 2) 按 (machine_id, task_id) 分组
    /// 3) 组内排序: 作用域精度(部件<设备<型号) → 最早 next_due_at
    ///    (空值视为评估时刻,即用量触发项不劣于任何带日期项) → rule_id
    /// 4) 取组内第一条为有效项
    ///
    /// BTreeMap 分组保证输出天然按 (machine_id, task_id) 排序,跨次可 diff
    #[instrument(skip(self, evaluated), fields(candidates = evaluated.len()))]
    pub fn resolve(
        &self,
        evaluated: &[EvaluatedRule],
        evaluation_time: DateTime<Utc>,
    ) -> Vec<DueItem> {
        let mut groups: BTreeMap<(String, String), Vec<&EvaluatedRule>> = BTreeMap::new();
        for row in evaluated.iter().filter(|r| r.verdict.due_now) {
            groups
                .entry((row.machine_id.clone(), row.task_id.clone()))
                .or_default()
                .push(row);
        }

        groups
            .into_values()
            .map(|mut group| {
                group.sort_by(|a, b| {
                    let key_a = (
                        a.scope_level.precedence_rank(),
                        a.verdict.next_due_at.unwrap_or(evaluation_time),
                        &a.rule_id,
                    );
                    let key_b = (
                        b.scope_level.precedence_rank(),
                        b.verdict.next_due_at.unwrap_or(evaluation_time),
                        &b.rule_id,
                    );
                    key_a.cmp(&key_b)
                });
                // 组非空(只有 due_now 裁决才会建组)
                self.due_item(group[0])
            })
            .collect()
    }

    fn due_item(&self, winner: &EvaluatedRule) -> DueItem {
        DueItem {
            machine_id: winner.machine_id.clone(),
            task_id: winner.task_id.clone(),
            plan_id: winner.plan_id.clone(),
            rule_id: winner.rule_id.clone(),
            component_id: winner.component_id.clone(),
            scope_level: winner.scope_level,
            rule_kind: winner.rule_kind,
            current_value: winner.verdict.current_value,
            threshold: winner.threshold,
            next_due_at: winner.verdict.next_due_at,
            last_serviced_at: None, // 由编排层按快照装饰
            notes: winner.notes.clone(),
        }
    }
}

impl Default for PrecedenceResolver {
    fn default() -> Self {
        Self::new()
    }
}
