// ==========================================
// 设备预防性维护决策支持系统 - 快照层
// ==========================================
// 职责: 评估输入的不可变视图、派生索引与获取边界
// 红线: 引擎只消费快照,绝不回写
// ==========================================

pub mod fleet;
pub mod provider;
pub mod sqlite;

// 重导出核心类型
pub use fleet::{FleetData, FleetSnapshot};
pub use provider::{fetch_snapshot_with_timeout, SnapshotProvider};
pub use sqlite::{SqliteSnapshotProvider, FLEET_SCHEMA_SQL};
