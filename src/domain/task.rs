// ==========================================
// 设备预防性维护决策支持系统 - 保养任务领域模型
// ==========================================
// 依据: PM_Master_Spec.md - PART C 保养任务目录
// 对齐: fleet_schema_v0.1.sql maintenance_task/service_log 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// MaintenanceTask - 保养任务目录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub task_id: String,                 // 任务唯一标识
    pub name: String,                    // 任务名称(如"更换机油滤芯")
    pub part_family: Option<String>,     // 关联部件族(可空)
}

// ==========================================
// ServiceLog - 保养执行记录
// ==========================================
// 写路径归外部系统; 本引擎只读,作为 TASK_COMPLETION 重置策略
// 将来需要的查找依据装入快照(当前基线解析尚未消费,见 baseline 模块)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLog {
    pub log_id: String,                     // 记录唯一标识
    pub machine_id: String,                 // 执行设备(FK)
    pub task_id: String,                    // 执行任务(FK)
    pub performed_at: DateTime<Utc>,        // 执行时刻
    pub counter_value: Option<f64>,         // 执行时计数器读数(可空)
}
