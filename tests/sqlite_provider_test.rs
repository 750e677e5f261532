// ==========================================
// SQLite 快照适配器集成测试
// ==========================================
// 职责: 验证快照库装载 → 引擎评估的完整链路,
//       以及行映射对畸形数据的拒绝口径
// ==========================================

mod helpers;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fleet_pm::config::EngineConfig;
use fleet_pm::engine::DueListEngine;
use fleet_pm::repository::StoreError;
use fleet_pm::snapshot::{
    fetch_snapshot_with_timeout, SnapshotProvider, SqliteSnapshotProvider, FLEET_SCHEMA_SQL,
};
use helpers::test_data_builder::{FleetDataBuilder, MachineBuilder, PlanBuilder, RuleBuilder};
use rusqlite::{params, Connection};
use std::time::Duration;
use tempfile::NamedTempFile;

fn eval_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap()
}

/// 创建临时快照库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件(需要保持存活)
/// - String: 数据库文件路径
fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().expect("create temp db");
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path).expect("open temp db");
    conn.execute_batch(FLEET_SCHEMA_SQL).expect("init schema");
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        params![fleet_pm::db::CURRENT_SCHEMA_VERSION],
    )
    .expect("write schema version");

    (temp_file, db_path)
}

/// 种入与 in-memory 对照快照等价的数据
fn seed_reference_fleet(conn: &Connection) {
    conn.execute_batch(
        r#"
        INSERT INTO counter (counter_id, name, unit)
          VALUES ('engine_hours', 'engine_hours', 'h');
        INSERT INTO machine (machine_id, model_code, name, in_service_date, retired_date)
          VALUES ('M001', 'EXC-320', NULL, '2025-07-08', NULL);
        INSERT INTO meter (meter_id, machine_id, counter_id)
          VALUES ('MT_M001_engine_hours', 'M001', 'engine_hours');
        INSERT INTO meter_reading (reading_id, meter_id, value, observed_at)
          VALUES ('R0001', 'MT_M001_engine_hours', 210.0, '2026-08-01T08:00:00+00:00');
        INSERT INTO maintenance_task (task_id, name, part_family)
          VALUES ('T001', '发动机保养', NULL);
        INSERT INTO maintenance_plan
          (plan_id, task_id, scope_level, model_code, machine_id, component_id, is_active, notes)
          VALUES ('P001', 'T001', 'MACHINE', NULL, 'M001', NULL, 1, '备注');
        INSERT INTO schedule_rule
          (rule_id, plan_id, kind, reset_policy, is_active,
           counter_id, threshold, interval_count, interval_unit, recurrence, timezone)
          VALUES
          ('R001', 'P001', 'USAGE', 'NEVER', 1, 'engine_hours', 200.0, NULL, NULL, NULL, NULL),
          ('R002', 'P001', 'TIME', 'NEVER', 1, NULL, NULL, 12, 'MONTH', NULL, NULL);
        INSERT INTO service_log (log_id, machine_id, task_id, performed_at, counter_value)
          VALUES ('L0001', 'M001', 'T001', '2026-01-20T09:00:00+00:00', NULL);
        "#,
    )
    .expect("seed reference fleet");
}

#[tokio::test]
async fn test_store_roundtrip_matches_in_memory_twin() {
    let (_temp_file, db_path) = create_test_db();
    {
        let conn = Connection::open(&db_path).unwrap();
        seed_reference_fleet(&conn);
    }

    let provider = SqliteSnapshotProvider::new(&db_path).unwrap();
    let snapshot = provider.fetch_snapshot().await.unwrap();

    // in-memory 对照快照(同样的业务数据)
    let twin = FleetDataBuilder::new()
        .machine(
            MachineBuilder::new("M001", "EXC-320")
                .in_service(NaiveDate::from_ymd_opt(2025, 7, 8).unwrap())
                .build(),
        )
        .counter("engine_hours", "h")
        .task("T001", "发动机保养")
        .plan(PlanBuilder::machine_scope("P001", "T001", "M001").notes("备注").build())
        .rule(RuleBuilder::usage("R001", "P001", "engine_hours", 200.0).build())
        .rule(
            RuleBuilder::time("R002", "P001", 12, fleet_pm::domain::types::IntervalUnit::Month)
                .build(),
        )
        .reading(
            "M001",
            "engine_hours",
            210.0,
            Utc.with_ymd_and_hms(2026, 8, 1, 8, 0, 0).unwrap(),
        )
        .service_log(
            "M001",
            "T001",
            Utc.with_ymd_and_hms(2026, 1, 20, 9, 0, 0).unwrap(),
        )
        .snapshot();

    let engine = DueListEngine::new();
    let config = EngineConfig::default();
    let from_store = engine.evaluate(&snapshot, eval_time(), &config).unwrap();
    let from_twin = engine.evaluate(&twin, eval_time(), &config).unwrap();

    // 两个来源的报告字节级一致
    assert_eq!(
        serde_json::to_string(&from_store).unwrap(),
        serde_json::to_string(&from_twin).unwrap()
    );

    // USAGE 200 到期(210), TIME 2026-07-08 到期 → 同组裁决取最早 next_due_at:
    // TIME 的 2026-07-08 早于 USAGE 的"现在" → TIME 胜出
    assert_eq!(from_store.effective.len(), 1);
    assert_eq!(from_store.effective[0].rule_id, "R002");
    assert_eq!(
        from_store.effective[0].last_serviced_at,
        Some(Utc.with_ymd_and_hms(2026, 1, 20, 9, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn test_fetch_with_timeout_through_provider() {
    let (_temp_file, db_path) = create_test_db();
    {
        let conn = Connection::open(&db_path).unwrap();
        seed_reference_fleet(&conn);
    }

    let provider = SqliteSnapshotProvider::new(&db_path).unwrap();
    let snapshot = fetch_snapshot_with_timeout(&provider, Duration::from_secs(5))
        .await
        .unwrap();
    assert!(snapshot.machine("M001").is_some());
}

#[tokio::test]
async fn test_scope_column_mismatch_rejected() {
    let (_temp_file, db_path) = create_test_db();
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO maintenance_task (task_id, name, part_family)
              VALUES ('T001', '发动机保养', NULL);
            -- scope_level=MACHINE 但填的是 model_code 列
            INSERT INTO maintenance_plan
              (plan_id, task_id, scope_level, model_code, machine_id, component_id, is_active)
              VALUES ('P_BAD', 'T001', 'MACHINE', 'EXC-320', NULL, NULL, 1);
            "#,
        )
        .unwrap();
    }

    let provider = SqliteSnapshotProvider::new(&db_path).unwrap();
    let result = provider.fetch_snapshot().await;

    match result {
        Err(StoreError::MalformedRow { table, id, .. }) => {
            assert_eq!(table, "maintenance_plan");
            assert_eq!(id, "P_BAD");
        }
        other => panic!("expected MalformedRow, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_unknown_rule_kind_rejected() {
    let (_temp_file, db_path) = create_test_db();
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO maintenance_task (task_id, name, part_family)
              VALUES ('T001', '发动机保养', NULL);
            INSERT INTO maintenance_plan
              (plan_id, task_id, scope_level, model_code, machine_id, component_id, is_active)
              VALUES ('P001', 'T001', 'MODEL', 'EXC-320', NULL, NULL, 1);
            INSERT INTO schedule_rule (rule_id, plan_id, kind, reset_policy, is_active)
              VALUES ('R_BAD', 'P001', 'CRON', 'NEVER', 1);
            "#,
        )
        .unwrap();
    }

    let provider = SqliteSnapshotProvider::new(&db_path).unwrap();
    let result = provider.fetch_snapshot().await;

    match result {
        Err(StoreError::MalformedRow { table, id, message }) => {
            assert_eq!(table, "schedule_rule");
            assert_eq!(id, "R_BAD");
            assert!(message.contains("CRON"));
        }
        other => panic!("expected MalformedRow, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_engine_config_loaded_from_config_kv() {
    let (_temp_file, db_path) = create_test_db();
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "INSERT INTO config_kv (scope_id, key, value) VALUES
               ('global', 'engine/exclude_removed_components', 'true'),
               ('global', 'engine/near_due_horizon_days', '30');",
        )
        .unwrap();
    }

    let provider = SqliteSnapshotProvider::new(&db_path).unwrap();
    let config = provider.load_engine_config().unwrap();
    assert!(config.exclude_removed_components);
    assert_eq!(config.near_due_horizon_days, 30);
}

#[tokio::test]
async fn test_malformed_usage_rule_fails_run_before_evaluation() {
    // 装载能成功(行本身合法),但装载校验在评估前拒绝缺 counter 的 USAGE 规则
    let (_temp_file, db_path) = create_test_db();
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO maintenance_task (task_id, name, part_family)
              VALUES ('T001', '发动机保养', NULL);
            INSERT INTO maintenance_plan
              (plan_id, task_id, scope_level, model_code, machine_id, component_id, is_active)
              VALUES ('P001', 'T001', 'MODEL', 'EXC-320', NULL, NULL, 1);
            INSERT INTO schedule_rule (rule_id, plan_id, kind, reset_policy, is_active, threshold)
              VALUES ('R_BAD', 'P001', 'USAGE', 'NEVER', 1, 250.0);
            "#,
        )
        .unwrap();
    }

    let provider = SqliteSnapshotProvider::new(&db_path).unwrap();
    let snapshot = provider.fetch_snapshot().await.unwrap();

    let result = DueListEngine::new().evaluate(&snapshot, eval_time(), &EngineConfig::default());
    assert!(result.is_err());
}
