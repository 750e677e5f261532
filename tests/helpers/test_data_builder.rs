// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use fleet_pm::domain::machine::{Counter, InstalledComponent, Machine, Meter, MeterReading};
use fleet_pm::domain::plan::{MaintenancePlan, PlanScope, ScheduleRule};
use fleet_pm::domain::task::{MaintenanceTask, ServiceLog};
use fleet_pm::domain::types::{IntervalUnit, ResetPolicy, RuleKind};
use fleet_pm::snapshot::{FleetData, FleetSnapshot};

// ==========================================
// Machine 构建器
// ==========================================

pub struct MachineBuilder {
    machine_id: String,
    model_code: String,
    in_service_date: NaiveDate,
    retired_date: Option<NaiveDate>,
}

impl MachineBuilder {
    pub fn new(machine_id: &str, model_code: &str) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            model_code: model_code.to_string(),
            in_service_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            retired_date: None,
        }
    }

    pub fn in_service(mut self, date: NaiveDate) -> Self {
        self.in_service_date = date;
        self
    }

    pub fn retired(mut self, date: NaiveDate) -> Self {
        self.retired_date = Some(date);
        self
    }

    pub fn build(self) -> Machine {
        Machine {
            machine_id: self.machine_id,
            model_code: self.model_code,
            name: None,
            in_service_date: self.in_service_date,
            retired_date: self.retired_date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

// ==========================================
// MaintenancePlan 构建器
// ==========================================

pub struct PlanBuilder {
    plan_id: String,
    task_id: String,
    scope: PlanScope,
    is_active: bool,
    notes: Option<String>,
}

impl PlanBuilder {
    pub fn model_scope(plan_id: &str, task_id: &str, model_code: &str) -> Self {
        Self::new(plan_id, task_id, PlanScope::Model(model_code.to_string()))
    }

    pub fn machine_scope(plan_id: &str, task_id: &str, machine_id: &str) -> Self {
        Self::new(plan_id, task_id, PlanScope::Machine(machine_id.to_string()))
    }

    pub fn component_scope(plan_id: &str, task_id: &str, component_id: &str) -> Self {
        Self::new(
            plan_id,
            task_id,
            PlanScope::ComponentInstance(component_id.to_string()),
        )
    }

    fn new(plan_id: &str, task_id: &str, scope: PlanScope) -> Self {
        Self {
            plan_id: plan_id.to_string(),
            task_id: task_id.to_string(),
            scope,
            is_active: true,
            notes: None,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn build(self) -> MaintenancePlan {
        MaintenancePlan {
            plan_id: self.plan_id,
            task_id: self.task_id,
            scope: self.scope,
            is_active: self.is_active,
            notes: self.notes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

// ==========================================
// ScheduleRule 构建器
// ==========================================

pub struct RuleBuilder {
    rule: ScheduleRule,
}

impl RuleBuilder {
    fn new(rule_id: &str, plan_id: &str, kind: RuleKind) -> Self {
        Self {
            rule: ScheduleRule {
                rule_id: rule_id.to_string(),
                plan_id: plan_id.to_string(),
                kind,
                reset_policy: ResetPolicy::Never,
                is_active: true,
                start_at: None,
                counter_id: None,
                threshold: None,
                interval_count: None,
                interval_unit: None,
                recurrence: None,
                timezone: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    pub fn usage(rule_id: &str, plan_id: &str, counter_id: &str, threshold: f64) -> Self {
        let mut builder = Self::new(rule_id, plan_id, RuleKind::Usage);
        builder.rule.counter_id = Some(counter_id.to_string());
        builder.rule.threshold = Some(threshold);
        builder
    }

    pub fn time(rule_id: &str, plan_id: &str, count: i32, unit: IntervalUnit) -> Self {
        let mut builder = Self::new(rule_id, plan_id, RuleKind::Time);
        builder.rule.interval_count = Some(count);
        builder.rule.interval_unit = Some(unit);
        builder
    }

    pub fn rrule(rule_id: &str, plan_id: &str, recurrence: &str, timezone: &str) -> Self {
        let mut builder = Self::new(rule_id, plan_id, RuleKind::Rrule);
        builder.rule.recurrence = Some(recurrence.to_string());
        builder.rule.timezone = Some(timezone.to_string());
        builder
    }

    pub fn event(rule_id: &str, plan_id: &str) -> Self {
        Self::new(rule_id, plan_id, RuleKind::Event)
    }

    pub fn reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.rule.reset_policy = policy;
        self
    }

    pub fn start_at(mut self, at: DateTime<Utc>) -> Self {
        self.rule.start_at = Some(at);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.rule.is_active = false;
        self
    }

    pub fn build(self) -> ScheduleRule {
        self.rule
    }
}

// ==========================================
// FleetData 构建器
// ==========================================

pub struct FleetDataBuilder {
    data: FleetData,
}

impl FleetDataBuilder {
    pub fn new() -> Self {
        Self {
            data: FleetData::default(),
        }
    }

    pub fn machine(mut self, machine: Machine) -> Self {
        self.data.machines.push(machine);
        self
    }

    pub fn counter(mut self, counter_id: &str, unit: &str) -> Self {
        self.data.counters.push(Counter {
            counter_id: counter_id.to_string(),
            name: counter_id.to_string(),
            unit: unit.to_string(),
        });
        self
    }

    pub fn component(
        mut self,
        component_id: &str,
        machine_id: &str,
        installed_at: DateTime<Utc>,
    ) -> Self {
        self.data.components.push(InstalledComponent {
            component_id: component_id.to_string(),
            machine_id: machine_id.to_string(),
            part_code: "PART".to_string(),
            installed_at,
            removed_at: None,
        });
        self
    }

    pub fn removed_component(
        mut self,
        component_id: &str,
        machine_id: &str,
        installed_at: DateTime<Utc>,
        removed_at: DateTime<Utc>,
    ) -> Self {
        self.data.components.push(InstalledComponent {
            component_id: component_id.to_string(),
            machine_id: machine_id.to_string(),
            part_code: "PART".to_string(),
            installed_at,
            removed_at: Some(removed_at),
        });
        self
    }

    pub fn task(mut self, task_id: &str, name: &str) -> Self {
        self.data.tasks.push(MaintenanceTask {
            task_id: task_id.to_string(),
            name: name.to_string(),
            part_family: None,
        });
        self
    }

    pub fn plan(mut self, plan: MaintenancePlan) -> Self {
        self.data.plans.push(plan);
        self
    }

    pub fn rule(mut self, rule: ScheduleRule) -> Self {
        self.data.rules.push(rule);
        self
    }

    /// 为 (设备, 计数器) 追加一条读数; 计量表按需自动建立
    pub fn reading(
        mut self,
        machine_id: &str,
        counter_id: &str,
        value: f64,
        observed_at: DateTime<Utc>,
    ) -> Self {
        let meter_id = format!("MT_{}_{}", machine_id, counter_id);
        if !self.data.meters.iter().any(|m| m.meter_id == meter_id) {
            self.data.meters.push(Meter {
                meter_id: meter_id.clone(),
                machine_id: machine_id.to_string(),
                counter_id: counter_id.to_string(),
            });
        }
        let reading_id = format!("R{:04}", self.data.readings.len() + 1);
        self.data.readings.push(MeterReading {
            reading_id,
            meter_id,
            value,
            observed_at,
        });
        self
    }

    pub fn service_log(
        mut self,
        machine_id: &str,
        task_id: &str,
        performed_at: DateTime<Utc>,
    ) -> Self {
        let log_id = format!("L{:04}", self.data.service_logs.len() + 1);
        self.data.service_logs.push(ServiceLog {
            log_id,
            machine_id: machine_id.to_string(),
            task_id: task_id.to_string(),
            performed_at,
            counter_value: None,
        });
        self
    }

    pub fn build(self) -> FleetData {
        self.data
    }

    pub fn snapshot(self) -> FleetSnapshot {
        FleetSnapshot::from_data(self.data)
    }
}
