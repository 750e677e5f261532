// ==========================================
// 设备预防性维护决策支持系统 - 引擎配置
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 1.3 已拆除部件策略
// 存储: config_kv 表 (key-value, scope_id='global')
// ==========================================

use crate::repository::error::{StoreError, StoreResult};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 配置键: 是否在展开阶段过滤已拆除部件
pub const KEY_EXCLUDE_REMOVED_COMPONENTS: &str = "engine/exclude_removed_components";
/// 配置键: 临近到期视窗(天)
pub const KEY_NEAR_DUE_HORIZON_DAYS: &str = "engine/near_due_horizon_days";

// ==========================================
// EngineConfig - 引擎策略开关
// ==========================================
// 参考行为: 已拆除部件的计划不过滤(拆除可见性交给评估阶段),
// 这里把过滤做成显式策略开关,默认贴参考行为
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub exclude_removed_components: bool, // 默认 false = 参考行为
    pub near_due_horizon_days: i64,       // 临近到期视窗,api 层消费
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exclude_removed_components: false,
            near_due_horizon_days: 14,
        }
    }
}

impl EngineConfig {
    /// 从 config_kv 表装载(缺键取默认值)
    ///
    /// 值解析失败按缺键处理并告警,不让一个坏配置拖垮评估
    pub fn load(conn: &Connection) -> StoreResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            exclude_removed_components: read_bool(
                conn,
                KEY_EXCLUDE_REMOVED_COMPONENTS,
                defaults.exclude_removed_components,
            )?,
            near_due_horizon_days: read_i64(
                conn,
                KEY_NEAR_DUE_HORIZON_DAYS,
                defaults.near_due_horizon_days,
            )?,
        })
    }
}

/// 读取 global scope 的配置值
fn read_value(conn: &Connection, key: &str) -> StoreResult<Option<String>> {
    let result = conn.query_row(
        "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        // config_kv 表不存在视同空配置(快照库可以不带配置表)
        Err(rusqlite::Error::SqliteFailure(_, Some(msg))) if msg.contains("no such table") => {
            Ok(None)
        }
        Err(e) => Err(StoreError::from(e)),
    }
}

fn read_bool(conn: &Connection, key: &str, default: bool) -> StoreResult<bool> {
    match read_value(conn, key)? {
        Some(raw) => match raw.trim() {
            "1" | "true" | "TRUE" => Ok(true),
            "0" | "false" | "FALSE" => Ok(false),
            other => {
                warn!(key, value = other, "配置值不是布尔口径,回退默认值");
                Ok(default)
            }
        },
        None => Ok(default),
    }
}

fn read_i64(conn: &Connection, key: &str, default: i64) -> StoreResult<i64> {
    match read_value(conn, key)? {
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!(key, value = %raw, "配置值不是整数口径,回退默认值");
                Ok(default)
            }
        },
        None => Ok(default),
    }
}
