// ==========================================
// 设备预防性维护决策支持系统 - 机队快照
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 2. 快照与物化索引
// ==========================================
// 职责: 评估输入的不可变视图 + 一次性构建的派生索引
// 红线: 快照构建后只读; "最新读数"是物化 top-1 索引,
//       不允许评估路径扫描全量读数历史
// ==========================================

use crate::domain::machine::{Counter, InstalledComponent, Machine, Meter, MeterReading};
use crate::domain::plan::{MaintenancePlan, ScheduleRule};
use crate::domain::task::{MaintenanceTask, ServiceLog};
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

// ==========================================
// FleetData - 快照原始数据
// ==========================================
// 提供方(存储适配器/测试构建器)按表装填,快照构建时转为索引结构
#[derive(Debug, Clone, Default)]
pub struct FleetData {
    pub machines: Vec<Machine>,
    pub counters: Vec<Counter>,
    pub meters: Vec<Meter>,
    pub readings: Vec<MeterReading>,
    pub components: Vec<InstalledComponent>,
    pub tasks: Vec<MaintenanceTask>,
    pub plans: Vec<MaintenancePlan>,
    pub rules: Vec<ScheduleRule>,
    pub service_logs: Vec<ServiceLog>,
}

// ==========================================
// FleetSnapshot - 评估输入快照
// ==========================================
#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    machines: HashMap<String, Machine>,
    counters: HashMap<String, Counter>,
    components: HashMap<String, InstalledComponent>,
    tasks: HashMap<String, MaintenanceTask>,
    plans: Vec<MaintenancePlan>,
    rules: Vec<ScheduleRule>,

    // ===== 派生索引(构建期一次生成) =====
    machine_ids_by_model: HashMap<String, Vec<String>>,
    meter_by_machine_counter: HashMap<(String, String), String>,
    latest_reading_by_meter: HashMap<String, MeterReading>,
    rule_idx_by_plan: HashMap<String, Vec<usize>>,
    last_service_by_machine_task: HashMap<(String, String), DateTime<Utc>>,
}

impl FleetSnapshot {
    /// 从原始数据构建快照并生成全部派生索引
    ///
    /// 确定性约定:
    /// - 同型号设备列表按 machine_id 排序
    /// - 计量表索引按 meter_id 排序后装填,(machine, counter) 重复时取 meter_id 最大者
    /// - 最新读数按 (observed_at, reading_id) 取最大,平局有确定解
    pub fn from_data(data: FleetData) -> Self {
        let FleetData {
            machines,
            counters,
            mut meters,
            readings,
            components,
            tasks,
            plans,
            rules,
            service_logs,
        } = data;

        // 型号 → 设备列表索引
        let mut machine_ids_by_model: HashMap<String, Vec<String>> = HashMap::new();
        for machine in &machines {
            machine_ids_by_model
                .entry(machine.model_code.clone())
                .or_default()
                .push(machine.machine_id.clone());
        }
        for ids in machine_ids_by_model.values_mut() {
            ids.sort();
        }

        // (设备, 计数器) → 计量表索引
        meters.sort_by(|a, b| a.meter_id.cmp(&b.meter_id));
        let mut meter_by_machine_counter: HashMap<(String, String), String> = HashMap::new();
        for meter in &meters {
            meter_by_machine_counter.insert(
                (meter.machine_id.clone(), meter.counter_id.clone()),
                meter.meter_id.clone(),
            );
        }

        // 计量表 → 最新读数 top-1 物化索引
        let mut latest_reading_by_meter: HashMap<String, MeterReading> = HashMap::new();
        for reading in readings {
            match latest_reading_by_meter.entry(reading.meter_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(reading);
                }
                Entry::Occupied(mut slot) => {
                    let newer = {
                        let current = slot.get();
                        (reading.observed_at, &reading.reading_id)
                            > (current.observed_at, &current.reading_id)
                    };
                    if newer {
                        slot.insert(reading);
                    }
                }
            }
        }

        // 计划 → 规则下标索引
        let mut rule_idx_by_plan: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            rule_idx_by_plan
                .entry(rule.plan_id.clone())
                .or_default()
                .push(idx);
        }

        // (设备, 任务) → 最近保养时刻索引
        let mut last_service_by_machine_task: HashMap<(String, String), DateTime<Utc>> =
            HashMap::new();
        for log in &service_logs {
            let key = (log.machine_id.clone(), log.task_id.clone());
            let slot = last_service_by_machine_task
                .entry(key)
                .or_insert(log.performed_at);
            if *slot < log.performed_at {
                *slot = log.performed_at;
            }
        }

        Self {
            machines: machines
                .into_iter()
                .map(|m| (m.machine_id.clone(), m))
                .collect(),
            counters: counters
                .into_iter()
                .map(|c| (c.counter_id.clone(), c))
                .collect(),
            components: components
                .into_iter()
                .map(|c| (c.component_id.clone(), c))
                .collect(),
            tasks: tasks.into_iter().map(|t| (t.task_id.clone(), t)).collect(),
            plans,
            rules,
            machine_ids_by_model,
            meter_by_machine_counter,
            latest_reading_by_meter,
            rule_idx_by_plan,
            last_service_by_machine_task,
        }
    }

    // ==========================================
    // 实体访问
    // ==========================================

    pub fn machine(&self, machine_id: &str) -> Option<&Machine> {
        self.machines.get(machine_id)
    }

    pub fn component(&self, component_id: &str) -> Option<&InstalledComponent> {
        self.components.get(component_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&MaintenanceTask> {
        self.tasks.get(task_id)
    }

    pub fn counter_exists(&self, counter_id: &str) -> bool {
        self.counters.contains_key(counter_id)
    }

    /// 全部计划(含停用; 展开阶段负责过滤 is_active)
    pub fn plans(&self) -> &[MaintenancePlan] {
        &self.plans
    }

    /// 全部规则(含停用)
    pub fn rules(&self) -> &[ScheduleRule] {
        &self.rules
    }

    /// 指定计划下的规则(含停用)
    pub fn rules_for_plan(&self, plan_id: &str) -> Vec<&ScheduleRule> {
        self.rule_idx_by_plan
            .get(plan_id)
            .map(|idxs| idxs.iter().map(|&i| &self.rules[i]).collect())
            .unwrap_or_default()
    }

    /// 指定型号的设备 ID 列表(按 machine_id 排序)
    pub fn machine_ids_of_model(&self, model_code: &str) -> &[String] {
        self.machine_ids_by_model
            .get(model_code)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    // ==========================================
    // 读数访问(物化 top-1 索引)
    // ==========================================

    /// (设备, 计数器) 的最新读数
    ///
    /// 无计量表或计量表无读数 ⇒ None(USAGE 评估按 0 处理,绝不报错)
    pub fn latest_reading(&self, machine_id: &str, counter_id: &str) -> Option<&MeterReading> {
        let meter_id = self
            .meter_by_machine_counter
            .get(&(machine_id.to_string(), counter_id.to_string()))?;
        self.latest_reading_by_meter.get(meter_id)
    }

    /// (设备, 任务) 最近一次保养时刻
    ///
    /// 输出装饰用; 基线解析当前不消费该索引(TASK_COMPLETION 已知简化)
    pub fn last_serviced_at(&self, machine_id: &str, task_id: &str) -> Option<DateTime<Utc>> {
        self.last_service_by_machine_task
            .get(&(machine_id.to_string(), task_id.to_string()))
            .copied()
    }
}
