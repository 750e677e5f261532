// ==========================================
// 设备预防性维护决策支持系统 - 计划展开引擎
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 1. Plan Expander
// ==========================================
// 职责: 把抽象计划投影为具体 (设备, 任务, 部件?) 目标行
// 红线: 纯读取+投影,无副作用; 退役设备对所有作用域一律排除
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::domain::plan::{MaintenancePlan, PlanScope};
use crate::domain::types::{DiagnosticKind, ScopeLevel};
use crate::engine::report::Diagnostic;
use crate::snapshot::fleet::FleetSnapshot;
use tracing::{debug, instrument};

// ==========================================
// ExpansionRow - 展开目标行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRow {
    pub plan_id: String,
    pub task_id: String,
    pub scope_level: ScopeLevel,
    pub machine_id: String,
    pub component_id: Option<String>, // COMPONENT_INSTANCE 作用域携带
    pub notes: Option<String>,        // 计划备注,随行透传
}

/// 展开结果: 目标行 + 局部降级诊断
#[derive(Debug, Clone, Default)]
pub struct ExpansionOutcome {
    pub rows: Vec<ExpansionRow>,
    pub diagnostics: Vec<Diagnostic>,
}

// ==========================================
// PlanExpander - 计划展开引擎
// ==========================================
pub struct PlanExpander;

impl PlanExpander {
    pub fn new() -> Self {
        Self
    }

    /// 展开全部激活计划
    ///
    /// # 规则
    /// - MODEL: 该型号每台在役设备一行
    /// - MACHINE: 指定设备一行(在役时)
    /// - COMPONENT_INSTANCE: 部件所在设备一行(设备在役时);
    ///   已拆除部件默认仍展开(参考行为),
    ///   config.exclude_removed_components=true 时过滤
    /// - 任务/设备/部件引用缺失 → 诊断行,不中断整队展开
    ///
    /// 输出按 (plan_id, machine_id) 排序,保证确定性
    #[instrument(skip(self, snapshot, config), fields(plans = snapshot.plans().len()))]
    pub fn expand(&self, snapshot: &FleetSnapshot, config: &EngineConfig) -> ExpansionOutcome {
        let mut outcome = ExpansionOutcome::default();

        for plan in snapshot.plans() {
            if !plan.is_active {
                continue;
            }
            self.expand_plan(plan, snapshot, config, &mut outcome);
        }

        outcome
            .rows
            .sort_by(|a, b| (&a.plan_id, &a.machine_id).cmp(&(&b.plan_id, &b.machine_id)));

        debug!(
            rows = outcome.rows.len(),
            diagnostics = outcome.diagnostics.len(),
            "计划展开完成"
        );
        outcome
    }

    fn expand_plan(
        &self,
        plan: &MaintenancePlan,
        snapshot: &FleetSnapshot,
        config: &EngineConfig,
        outcome: &mut ExpansionOutcome,
    ) {
        // 任务引用完整性: 缺失则整计划降级为诊断
        if snapshot.task(&plan.task_id).is_none() {
            outcome.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::MissingTask,
                plan_id: plan.plan_id.clone(),
                rule_id: None,
                machine_id: None,
                component_id: None,
                message: format!("任务不存在: task_id={}", plan.task_id),
            });
            return;
        }

        match &plan.scope {
            PlanScope::Model(model_code) => {
                for machine_id in snapshot.machine_ids_of_model(model_code) {
                    // 型号索引只收录已知设备,查不到按不在役处理
                    let Some(machine) = snapshot.machine(machine_id) else {
                        continue;
                    };
                    if machine.is_retired() {
                        continue;
                    }
                    outcome.rows.push(self.row(plan, machine_id, None));
                }
            }

            PlanScope::Machine(machine_id) => match snapshot.machine(machine_id) {
                Some(machine) => {
                    if !machine.is_retired() {
                        outcome.rows.push(self.row(plan, machine_id, None));
                    }
                }
                None => outcome.diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::MissingMachine,
                    plan_id: plan.plan_id.clone(),
                    rule_id: None,
                    machine_id: Some(machine_id.clone()),
                    component_id: None,
                    message: format!("设备不存在: machine_id={}", machine_id),
                }),
            },

            PlanScope::ComponentInstance(component_id) => {
                let component = match snapshot.component(component_id) {
                    Some(c) => c,
                    None => {
                        outcome.diagnostics.push(Diagnostic {
                            kind: DiagnosticKind::MissingComponent,
                            plan_id: plan.plan_id.clone(),
                            rule_id: None,
                            machine_id: None,
                            component_id: Some(component_id.clone()),
                            message: format!("部件实例不存在: component_id={}", component_id),
                        });
                        return;
                    }
                };

                if config.exclude_removed_components && component.is_removed() {
                    debug!(
                        plan_id = %plan.plan_id,
                        component_id = %component_id,
                        "按策略过滤已拆除部件"
                    );
                    return;
                }

                match snapshot.machine(&component.machine_id) {
                    Some(machine) => {
                        if !machine.is_retired() {
                            outcome.rows.push(self.row(
                                plan,
                                &component.machine_id,
                                Some(component_id.clone()),
                            ));
                        }
                    }
                    None => outcome.diagnostics.push(Diagnostic {
                        kind: DiagnosticKind::MissingMachine,
                        plan_id: plan.plan_id.clone(),
                        rule_id: None,
                        machine_id: Some(component.machine_id.clone()),
                        component_id: Some(component_id.clone()),
                        message: format!(
                            "部件所在设备不存在: machine_id={}",
                            component.machine_id
                        ),
                    }),
                }
            }
        }
    }

    fn row(
        &self,
        plan: &MaintenancePlan,
        machine_id: &str,
        component_id: Option<String>,
    ) -> ExpansionRow {
        ExpansionRow {
            plan_id: plan.plan_id.clone(),
            task_id: plan.task_id.clone(),
            scope_level: plan.scope.level(),
            machine_id: machine_id.to_string(),
            component_id,
            notes: plan.notes.clone(),
        }
    }
}

impl Default for PlanExpander {
    fn default() -> Self {
        Self::new()
    }
}
