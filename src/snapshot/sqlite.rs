// ==========================================
// 设备预防性维护决策支持系统 - SQLite 快照适配器
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 6. 外部接口
// 对齐: fleet_schema_v0.1.sql
// ==========================================
// 职责: 把快照存储库整表装入 FleetSnapshot,只读
// 红线: 行映射失败(枚举串非法/作用域列与层级不一致)按畸形数据拒绝,
//       绝不静默矫正
// ==========================================

use crate::db::{open_snapshot_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::domain::machine::{Counter, InstalledComponent, Machine, Meter, MeterReading};
use crate::domain::plan::{MaintenancePlan, PlanScope, ScheduleRule};
use crate::domain::task::{MaintenanceTask, ServiceLog};
use crate::domain::types::{IntervalUnit, ResetPolicy, RuleKind, ScopeLevel};
use crate::repository::error::{StoreError, StoreResult};
use crate::snapshot::fleet::{FleetData, FleetSnapshot};
use crate::snapshot::provider::SnapshotProvider;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// SqliteSnapshotProvider - SQLite 快照提供方
// ==========================================
pub struct SqliteSnapshotProvider {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSnapshotProvider {
    /// 打开只读快照连接
    pub fn new(db_path: &str) -> StoreResult<Self> {
        let conn = open_snapshot_connection(db_path)
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        // schema 版本只提示,不自动迁移
        match read_schema_version(&conn) {
            Ok(Some(v)) if v != CURRENT_SCHEMA_VERSION => {
                warn!(
                    found = v,
                    expected = CURRENT_SCHEMA_VERSION,
                    "快照库 schema_version 与当前代码不一致"
                );
            }
            Ok(Some(_)) => {}
            Ok(None) => warn!("快照库缺少 schema_version 表"),
            Err(e) => warn!(error = %e, "读取 schema_version 失败"),
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建(测试/复用场景)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::ConnectionError(format!("锁获取失败: {}", e)))
    }

    /// 装载引擎配置(config_kv 表,缺键取默认值)
    pub fn load_engine_config(&self) -> StoreResult<crate::config::EngineConfig> {
        let conn = self.get_conn()?;
        crate::config::EngineConfig::load(&conn)
    }

    /// 整库装载为快照原始数据
    pub fn load_fleet_data(&self) -> StoreResult<FleetData> {
        let conn = self.get_conn()?;

        Ok(FleetData {
            machines: load_machines(&conn)?,
            counters: load_counters(&conn)?,
            meters: load_meters(&conn)?,
            readings: load_readings(&conn)?,
            components: load_components(&conn)?,
            tasks: load_tasks(&conn)?,
            plans: load_plans(&conn)?,
            rules: load_rules(&conn)?,
            service_logs: load_service_logs(&conn)?,
        })
    }
}

#[async_trait]
impl SnapshotProvider for SqliteSnapshotProvider {
    async fn fetch_snapshot(&self) -> StoreResult<FleetSnapshot> {
        let data = self.load_fleet_data()?;
        Ok(FleetSnapshot::from_data(data))
    }
}

// ==========================================
// 逐表装载(参数化查询,整表只读)
// ==========================================

fn load_machines(conn: &Connection) -> StoreResult<Vec<Machine>> {
    let mut stmt = conn.prepare(
        "SELECT machine_id, model_code, name, in_service_date, retired_date,
                created_at, updated_at
         FROM machine ORDER BY machine_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Machine {
            machine_id: row.get(0)?,
            model_code: row.get(1)?,
            name: row.get(2)?,
            in_service_date: row.get::<_, NaiveDate>(3)?,
            retired_date: row.get::<_, Option<NaiveDate>>(4)?,
            created_at: row.get::<_, DateTime<Utc>>(5)?,
            updated_at: row.get::<_, DateTime<Utc>>(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

fn load_counters(conn: &Connection) -> StoreResult<Vec<Counter>> {
    let mut stmt =
        conn.prepare("SELECT counter_id, name, unit FROM counter ORDER BY counter_id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Counter {
            counter_id: row.get(0)?,
            name: row.get(1)?,
            unit: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

fn load_meters(conn: &Connection) -> StoreResult<Vec<Meter>> {
    let mut stmt =
        conn.prepare("SELECT meter_id, machine_id, counter_id FROM meter ORDER BY meter_id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Meter {
            meter_id: row.get(0)?,
            machine_id: row.get(1)?,
            counter_id: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

fn load_readings(conn: &Connection) -> StoreResult<Vec<MeterReading>> {
    let mut stmt = conn.prepare(
        "SELECT reading_id, meter_id, value, observed_at
         FROM meter_reading ORDER BY reading_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(MeterReading {
            reading_id: row.get(0)?,
            meter_id: row.get(1)?,
            value: row.get(2)?,
            observed_at: row.get::<_, DateTime<Utc>>(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

fn load_components(conn: &Connection) -> StoreResult<Vec<InstalledComponent>> {
    let mut stmt = conn.prepare(
        "SELECT component_id, machine_id, part_code, installed_at, removed_at
         FROM installed_component ORDER BY component_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(InstalledComponent {
            component_id: row.get(0)?,
            machine_id: row.get(1)?,
            part_code: row.get(2)?,
            installed_at: row.get::<_, DateTime<Utc>>(3)?,
            removed_at: row.get::<_, Option<DateTime<Utc>>>(4)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

fn load_tasks(conn: &Connection) -> StoreResult<Vec<MaintenanceTask>> {
    let mut stmt = conn.prepare(
        "SELECT task_id, name, part_family FROM maintenance_task ORDER BY task_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(MaintenanceTask {
            task_id: row.get(0)?,
            name: row.get(1)?,
            part_family: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

/// maintenance_plan 原始行(作用域三列 + 层级,映射时校验一致性)
struct PlanRow {
    plan_id: String,
    task_id: String,
    scope_level: String,
    model_code: Option<String>,
    machine_id: Option<String>,
    component_id: Option<String>,
    is_active: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn load_plans(conn: &Connection) -> StoreResult<Vec<MaintenancePlan>> {
    let mut stmt = conn.prepare(
        "SELECT plan_id, task_id, scope_level, model_code, machine_id, component_id,
                is_active, notes, created_at, updated_at
         FROM maintenance_plan ORDER BY plan_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(PlanRow {
            plan_id: row.get(0)?,
            task_id: row.get(1)?,
            scope_level: row.get(2)?,
            model_code: row.get(3)?,
            machine_id: row.get(4)?,
            component_id: row.get(5)?,
            is_active: row.get(6)?,
            notes: row.get(7)?,
            created_at: row.get::<_, DateTime<Utc>>(8)?,
            updated_at: row.get::<_, DateTime<Utc>>(9)?,
        })
    })?;

    let mut plans = Vec::new();
    for row in rows {
        let row = row.map_err(StoreError::from)?;
        plans.push(map_plan_row(row)?);
    }
    Ok(plans)
}

/// 作用域列与 scope_level 一致性校验 + 标签变体重建
fn map_plan_row(row: PlanRow) -> StoreResult<MaintenancePlan> {
    let malformed = |message: String| StoreError::MalformedRow {
        table: "maintenance_plan".to_string(),
        id: row.plan_id.clone(),
        message,
    };

    let level = ScopeLevel::from_db_str(&row.scope_level)
        .ok_or_else(|| malformed(format!("未知 scope_level: {}", row.scope_level)))?;

    let scope = match (
        level,
        &row.model_code,
        &row.machine_id,
        &row.component_id,
    ) {
        (ScopeLevel::Model, Some(model), None, None) => PlanScope::Model(model.clone()),
        (ScopeLevel::Machine, None, Some(machine), None) => PlanScope::Machine(machine.clone()),
        (ScopeLevel::ComponentInstance, None, None, Some(component)) => {
            PlanScope::ComponentInstance(component.clone())
        }
        _ => {
            return Err(malformed(format!(
                "作用域列与层级不一致: level={}, model={:?}, machine={:?}, component={:?}",
                level, row.model_code, row.machine_id, row.component_id
            )))
        }
    };

    Ok(MaintenancePlan {
        plan_id: row.plan_id,
        task_id: row.task_id,
        scope,
        is_active: row.is_active,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// schedule_rule 原始行(kind/policy/unit 为存储串,映射时解析)
struct RuleRow {
    rule_id: String,
    plan_id: String,
    kind: String,
    reset_policy: String,
    is_active: bool,
    start_at: Option<DateTime<Utc>>,
    counter_id: Option<String>,
    threshold: Option<f64>,
    interval_count: Option<i32>,
    interval_unit: Option<String>,
    recurrence: Option<String>,
    timezone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn load_rules(conn: &Connection) -> StoreResult<Vec<ScheduleRule>> {
    let mut stmt = conn.prepare(
        "SELECT rule_id, plan_id, kind, reset_policy, is_active, start_at,
                counter_id, threshold, interval_count, interval_unit,
                recurrence, timezone, created_at, updated_at
         FROM schedule_rule ORDER BY rule_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RuleRow {
            rule_id: row.get(0)?,
            plan_id: row.get(1)?,
            kind: row.get(2)?,
            reset_policy: row.get(3)?,
            is_active: row.get(4)?,
            start_at: row.get::<_, Option<DateTime<Utc>>>(5)?,
            counter_id: row.get(6)?,
            threshold: row.get(7)?,
            interval_count: row.get(8)?,
            interval_unit: row.get(9)?,
            recurrence: row.get(10)?,
            timezone: row.get(11)?,
            created_at: row.get::<_, DateTime<Utc>>(12)?,
            updated_at: row.get::<_, DateTime<Utc>>(13)?,
        })
    })?;

    let mut rules = Vec::new();
    for row in rows {
        let row = row.map_err(StoreError::from)?;
        rules.push(map_rule_row(row)?);
    }
    Ok(rules)
}

fn map_rule_row(row: RuleRow) -> StoreResult<ScheduleRule> {
    let malformed = |message: String| StoreError::MalformedRow {
        table: "schedule_rule".to_string(),
        id: row.rule_id.clone(),
        message,
    };

    let kind = RuleKind::from_db_str(&row.kind)
        .ok_or_else(|| malformed(format!("未知 kind: {}", row.kind)))?;
    let reset_policy = ResetPolicy::from_db_str(&row.reset_policy)
        .ok_or_else(|| malformed(format!("未知 reset_policy: {}", row.reset_policy)))?;
    let interval_unit = match &row.interval_unit {
        Some(s) => Some(
            IntervalUnit::from_db_str(s)
                .ok_or_else(|| malformed(format!("未知 interval_unit: {}", s)))?,
        ),
        None => None,
    };

    Ok(ScheduleRule {
        rule_id: row.rule_id,
        plan_id: row.plan_id,
        kind,
        reset_policy,
        is_active: row.is_active,
        start_at: row.start_at,
        counter_id: row.counter_id,
        threshold: row.threshold,
        interval_count: row.interval_count,
        interval_unit,
        recurrence: row.recurrence,
        timezone: row.timezone,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn load_service_logs(conn: &Connection) -> StoreResult<Vec<ServiceLog>> {
    let mut stmt = conn.prepare(
        "SELECT log_id, machine_id, task_id, performed_at, counter_value
         FROM service_log ORDER BY log_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ServiceLog {
            log_id: row.get(0)?,
            machine_id: row.get(1)?,
            task_id: row.get(2)?,
            performed_at: row.get::<_, DateTime<Utc>>(3)?,
            counter_value: row.get(4)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

// ==========================================
// 建表语句(种子工具/测试复用)
// ==========================================

/// fleet_schema_v0.1: 快照存储库全部表
///
/// 注意: meter 上的 UNIQUE(machine_id, counter_id) 承载
/// "每台设备每种计数器至多一块表"不变式
pub const FLEET_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
  version INTEGER PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS machine (
  machine_id TEXT PRIMARY KEY,
  model_code TEXT NOT NULL,
  name TEXT,
  in_service_date TEXT NOT NULL,
  retired_date TEXT,
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_machine_model ON machine(model_code);

CREATE TABLE IF NOT EXISTS counter (
  counter_id TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  unit TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS meter (
  meter_id TEXT PRIMARY KEY,
  machine_id TEXT NOT NULL,
  counter_id TEXT NOT NULL,
  FOREIGN KEY (machine_id) REFERENCES machine(machine_id),
  FOREIGN KEY (counter_id) REFERENCES counter(counter_id),
  UNIQUE(machine_id, counter_id)
);

CREATE TABLE IF NOT EXISTS meter_reading (
  reading_id TEXT PRIMARY KEY,
  meter_id TEXT NOT NULL,
  value REAL NOT NULL CHECK (value >= 0),
  observed_at TEXT NOT NULL,
  FOREIGN KEY (meter_id) REFERENCES meter(meter_id)
);
CREATE INDEX IF NOT EXISTS idx_reading_meter_observed
  ON meter_reading(meter_id, observed_at DESC);

CREATE TABLE IF NOT EXISTS installed_component (
  component_id TEXT PRIMARY KEY,
  machine_id TEXT NOT NULL,
  part_code TEXT NOT NULL,
  installed_at TEXT NOT NULL,
  removed_at TEXT,
  FOREIGN KEY (machine_id) REFERENCES machine(machine_id)
);
CREATE INDEX IF NOT EXISTS idx_component_machine ON installed_component(machine_id);

CREATE TABLE IF NOT EXISTS maintenance_task (
  task_id TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  part_family TEXT
);

CREATE TABLE IF NOT EXISTS maintenance_plan (
  plan_id TEXT PRIMARY KEY,
  task_id TEXT NOT NULL,
  scope_level TEXT NOT NULL,
  model_code TEXT,
  machine_id TEXT,
  component_id TEXT,
  is_active INTEGER NOT NULL DEFAULT 1,
  notes TEXT,
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now')),
  FOREIGN KEY (task_id) REFERENCES maintenance_task(task_id)
);

CREATE TABLE IF NOT EXISTS schedule_rule (
  rule_id TEXT PRIMARY KEY,
  plan_id TEXT NOT NULL,
  kind TEXT NOT NULL,
  reset_policy TEXT NOT NULL DEFAULT 'NEVER',
  is_active INTEGER NOT NULL DEFAULT 1,
  start_at TEXT,
  counter_id TEXT,
  threshold REAL,
  interval_count INTEGER,
  interval_unit TEXT,
  recurrence TEXT,
  timezone TEXT,
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now')),
  FOREIGN KEY (plan_id) REFERENCES maintenance_plan(plan_id)
);
CREATE INDEX IF NOT EXISTS idx_rule_plan ON schedule_rule(plan_id);

CREATE TABLE IF NOT EXISTS service_log (
  log_id TEXT PRIMARY KEY,
  machine_id TEXT NOT NULL,
  task_id TEXT NOT NULL,
  performed_at TEXT NOT NULL,
  counter_value REAL,
  FOREIGN KEY (machine_id) REFERENCES machine(machine_id),
  FOREIGN KEY (task_id) REFERENCES maintenance_task(task_id)
);
CREATE INDEX IF NOT EXISTS idx_service_log_machine_task
  ON service_log(machine_id, task_id, performed_at DESC);

CREATE TABLE IF NOT EXISTS config_kv (
  scope_id TEXT NOT NULL DEFAULT 'global',
  key TEXT NOT NULL,
  value TEXT NOT NULL,
  PRIMARY KEY (scope_id, key)
);
"#;
