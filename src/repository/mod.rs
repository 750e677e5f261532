// ==========================================
// 设备预防性维护决策支持系统 - 快照存储层
// ==========================================
// 红线: 存储层不含业务逻辑,所有查询参数化
// 职责: 错误类型与数据访问口径,屏蔽数据库细节
// ==========================================

pub mod error;

pub use error::{StoreError, StoreResult};
