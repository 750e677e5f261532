// ==========================================
// 设备预防性维护决策支持系统 - 核心库
// ==========================================
// 依据: PM_Master_Spec.md - 系统宪法
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (到期清单只供参考,人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 快照存储层 - 错误口径
pub mod repository;

// 快照层 - 评估输入与提供方
pub mod snapshot;

// 引擎层 - 到期解析管线
pub mod engine;

// 配置层 - 策略开关
pub mod config;

// 数据库基础设施(连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    DiagnosticKind, IntervalUnit, ResetPolicy, RuleKind, ScopeLevel, SkipReason,
};

// 领域实体
pub use domain::{
    Counter, InstalledComponent, Machine, MaintenancePlan, MaintenanceTask, Meter, MeterReading,
    PlanScope, ScheduleRule, ServiceLog,
};

// 快照
pub use snapshot::{FleetData, FleetSnapshot, SnapshotProvider, SqliteSnapshotProvider};

// 引擎
pub use engine::{
    BaselineResolver, DueItem, DueListEngine, EvaluationReport, LatestReadingResolver,
    PlanExpander, PrecedenceResolver, RuleEvaluator, RuleValidator,
};

// 配置
pub use config::EngineConfig;

// API
pub use api::{DueApiError, DueListApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备预防性维护决策支持系统";
