// ==========================================
// 设备预防性维护决策支持系统 - 快照存储层错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 快照存储层错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    ConnectionError(String),

    #[error("数据库查询失败: {0}")]
    QueryError(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    // ===== 行映射错误 =====
    // 枚举串不可解析、作用域列与 scope_level 不一致等,一律拒绝,不做静默矫正
    #[error("行映射失败 (table={table}, id={id}): {message}")]
    MalformedRow {
        table: String,
        id: String,
        message: String,
    },

    // ===== 快照获取边界 =====
    #[error("快照获取超时: 超过 {timeout_ms}ms")]
    FetchTimeout { timeout_ms: u64 },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    StoreError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    StoreError::ForeignKeyViolation(msg)
                } else {
                    StoreError::QueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => StoreError::QueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
