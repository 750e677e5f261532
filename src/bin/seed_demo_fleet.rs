// Small dev utility: reset the snapshot DB and seed a demo fleet that
// exercises every scope level and rule kind.
//
// Usage:
//   cargo run --bin seed_demo_fleet -- [db_path]
//
// The seeded fleet is deliberately tiny but covers: a model-level USAGE rule
// with a machine-level override, a component-scoped TIME rule under
// PART_REPLACEMENT, an RRULE and an EVENT rule (both skipped by the engine),
// a retired machine, and a machine with no readings at all.

use chrono::{Duration, Local, Months, Utc};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use fleet_pm::db::open_sqlite_connection;
use fleet_pm::snapshot::FLEET_SCHEMA_SQL;

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fleet_pm.db".to_string());

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    conn.execute_batch(FLEET_SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
        params![fleet_pm::db::CURRENT_SCHEMA_VERSION],
    )?;

    seed_demo_fleet(&conn)?;
    print_quick_counts(&conn)?;

    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_demo_fleet(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let now = Utc::now();

    // ===== 计数器目录 =====
    conn.execute(
        "INSERT INTO counter (counter_id, name, unit) VALUES
         ('engine_hours', '发动机小时', 'h'),
         ('odometer_km', '行驶里程', 'km')",
        [],
    )?;

    // ===== 设备台账 =====
    // M001/M002 同型号在役; M003 已退役(任何输出都不应出现)
    let thirteen_months_ago = now
        .checked_sub_months(Months::new(13))
        .expect("13 months before now is representable")
        .date_naive();
    conn.execute(
        "INSERT INTO machine (machine_id, model_code, name, in_service_date, retired_date)
         VALUES
         ('M001', 'EXC-320', '1号挖机', ?1, NULL),
         ('M002', 'EXC-320', '2号挖机', ?2, NULL),
         ('M003', 'EXC-320', '3号挖机(退役)', '2020-01-01', '2025-12-31')",
        params![
            thirteen_months_ago.to_string(),
            (now - Duration::days(90)).date_naive().to_string(),
        ],
    )?;

    // ===== 计量表与读数 =====
    // M001 有读数; M002 从未抄表(USAGE 按 0 评估)
    conn.execute(
        "INSERT INTO meter (meter_id, machine_id, counter_id) VALUES
         ('MT001', 'M001', 'engine_hours'),
         ('MT002', 'M002', 'engine_hours')",
        [],
    )?;
    conn.execute(
        "INSERT INTO meter_reading (reading_id, meter_id, value, observed_at) VALUES
         (?1, 'MT001', 130.0, ?2),
         (?3, 'MT001', 210.0, ?4)",
        params![
            Uuid::new_v4().to_string(),
            (now - Duration::days(30)).to_rfc3339(),
            Uuid::new_v4().to_string(),
            (now - Duration::days(2)).to_rfc3339(),
        ],
    )?;

    // ===== 部件实例 =====
    // C001: 8 个月前装上的机油滤芯(6 个月周期 → 已过期)
    let eight_months_ago = now
        .checked_sub_months(Months::new(8))
        .expect("8 months before now is representable");
    conn.execute(
        "INSERT INTO installed_component
           (component_id, machine_id, part_code, installed_at, removed_at)
         VALUES ('C001', 'M001', 'FLT-OIL', ?1, NULL)",
        params![eight_months_ago.to_rfc3339()],
    )?;

    // ===== 保养任务 =====
    conn.execute(
        "INSERT INTO maintenance_task (task_id, name, part_family) VALUES
         ('T001', '发动机保养', NULL),
         ('T002', '更换机油滤芯', 'FLT'),
         ('T003', '年度检验', NULL)",
        [],
    )?;

    // ===== 维护计划 =====
    conn.execute(
        "INSERT INTO maintenance_plan
           (plan_id, task_id, scope_level, model_code, machine_id, component_id, is_active, notes)
         VALUES
         ('P001', 'T001', 'MODEL', 'EXC-320', NULL, NULL, 1, '型号级通用周期'),
         ('P002', 'T001', 'MACHINE', NULL, 'M001', NULL, 1, '1号挖机工况恶劣,提前保养'),
         ('P003', 'T002', 'COMPONENT_INSTANCE', NULL, NULL, 'C001', 1, NULL),
         ('P004', 'T003', 'MODEL', 'EXC-320', NULL, NULL, 1, NULL)",
        [],
    )?;

    // ===== 调度规则 =====
    // R001: 型号级 USAGE 250h; R002: 设备级覆盖 200h
    // R003: 部件级 TIME 6月, PART_REPLACEMENT
    // R004: TIME 12月 年检; R005: RRULE(跳过); R006: EVENT(跳过)
    conn.execute(
        "INSERT INTO schedule_rule
           (rule_id, plan_id, kind, reset_policy, is_active,
            counter_id, threshold, interval_count, interval_unit, recurrence, timezone)
         VALUES
         ('R001', 'P001', 'USAGE', 'NEVER', 1, 'engine_hours', 250.0, NULL, NULL, NULL, NULL),
         ('R002', 'P002', 'USAGE', 'NEVER', 1, 'engine_hours', 200.0, NULL, NULL, NULL, NULL),
         ('R003', 'P003', 'TIME', 'PART_REPLACEMENT', 1, NULL, NULL, 6, 'MONTH', NULL, NULL),
         ('R004', 'P004', 'TIME', 'NEVER', 1, NULL, NULL, 12, 'MONTH', NULL, NULL),
         ('R005', 'P004', 'RRULE', 'NEVER', 1, NULL, NULL, NULL, NULL,
          'FREQ=YEARLY;BYMONTH=3', 'Asia/Shanghai'),
         ('R006', 'P001', 'EVENT', 'NEVER', 1, NULL, NULL, NULL, NULL, NULL, NULL)",
        [],
    )?;

    // ===== 保养记录(输出装饰用) =====
    conn.execute(
        "INSERT INTO service_log (log_id, machine_id, task_id, performed_at, counter_value)
         VALUES (?1, 'M001', 'T001', ?2, 95.0)",
        params![
            Uuid::new_v4().to_string(),
            (now - Duration::days(200)).to_rfc3339(),
        ],
    )?;

    // ===== 引擎配置 =====
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES
         ('global', 'engine/near_due_horizon_days', '14')",
        [],
    )?;

    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    for table in [
        "machine",
        "counter",
        "meter",
        "meter_reading",
        "installed_component",
        "maintenance_task",
        "maintenance_plan",
        "schedule_rule",
        "service_log",
    ] {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        println!("{}: {}", table, count);
    }
    Ok(())
}
