// ==========================================
// 设备预防性维护决策支持系统 - 维护计划领域模型
// ==========================================
// 依据: PM_Master_Spec.md - PART B 计划与规则
// 依据: Maintenance_Engine_Specs_v0.2.md - 1. Plan Expander / 4. Rule Evaluator
// 对齐: fleet_schema_v0.1.sql maintenance_plan/schedule_rule 表
// ==========================================

use crate::domain::types::{IntervalUnit, ResetPolicy, RuleKind, ScopeLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// PlanScope - 计划作用域(标签变体)
// ==========================================
// 红线: "恰好一个作用域目标"用带标签变体表达,非法组合不可构造。
// 存储层仍是 scope_level + 三个可空列,行映射时校验列与层级一致,
// 不一致的行按畸形数据拒绝,绝不静默矫正。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope_level", content = "scope_target")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanScope {
    Model(String),             // 设备型号代码: 该型号全部在役设备
    Machine(String),           // 设备 ID: 指定单台设备
    ComponentInstance(String), // 部件实例 ID: 指定部件,传递到其所在设备
}

impl PlanScope {
    /// 作用域层级(精度裁决用)
    pub fn level(&self) -> ScopeLevel {
        match self {
            PlanScope::Model(_) => ScopeLevel::Model,
            PlanScope::Machine(_) => ScopeLevel::Machine,
            PlanScope::ComponentInstance(_) => ScopeLevel::ComponentInstance,
        }
    }
}

// ==========================================
// MaintenancePlan - 维护计划
// ==========================================
// 计划把一个保养任务绑定到恰好一个作用域; is_active=false 软停用,
// 展开阶段直接丢弃
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenancePlan {
    // ===== 主键与关联 =====
    pub plan_id: String, // 计划唯一标识
    pub task_id: String, // 绑定的保养任务(FK)

    // ===== 作用域 =====
    #[serde(flatten)]
    pub scope: PlanScope, // 作用域(恰好一个目标)

    // ===== 状态与备注 =====
    pub is_active: bool,       // 软停用开关
    pub notes: Option<String>, // 自由备注(随到期项透传输出)

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

// ==========================================
// ScheduleRule - 调度规则
// ==========================================
// 每个计划挂一条或多条规则; 按 kind 决定必填字段组合,
// 必填项缺失属于畸形规则,装载期拒绝(见 engine::validate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRule {
    // ===== 主键与关联 =====
    pub rule_id: String, // 规则唯一标识
    pub plan_id: String, // 所属计划(FK)

    // ===== 类别与策略 =====
    pub kind: RuleKind,            // USAGE / TIME / RRULE / EVENT
    pub reset_policy: ResetPolicy, // 基线重置策略
    pub is_active: bool,           // 软停用开关

    // ===== 显式基线(全类别可用) =====
    pub start_at: Option<DateTime<Utc>>, // 显式起算时刻,优先于一切重置策略

    // ===== USAGE 必填 =====
    pub counter_id: Option<String>, // 计数器(FK)
    pub threshold: Option<f64>,     // 用量阈值

    // ===== TIME 必填 =====
    pub interval_count: Option<i32>,         // 周期数(必须 > 0)
    pub interval_unit: Option<IntervalUnit>, // 周期单位

    // ===== RRULE 必填 =====
    pub recurrence: Option<String>, // 重复表达式
    pub timezone: Option<String>,   // 表达式时区

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}
