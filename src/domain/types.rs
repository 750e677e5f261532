// ==========================================
// 设备预防性维护决策支持系统 - 领域类型定义
// ==========================================
// 依据: PM_Master_Spec.md - PART B 规则体系
// 依据: Maintenance_Engine_Specs_v0.2.md - 0.2 作用域与规则类别
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 作用域层级 (Scope Level)
// ==========================================
// 红线: 优先级是封闭集合,不是评分制
// 排序: COMPONENT_INSTANCE(1) < MACHINE(2) < MODEL(3),数字越小越具体
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeLevel {
    ComponentInstance, // 部件实例级(最具体)
    Machine,           // 单台设备级
    Model,             // 设备型号级(最泛化)
}

impl ScopeLevel {
    /// 优先级序数(越小越具体,精度裁决用)
    pub fn precedence_rank(&self) -> u8 {
        match self {
            ScopeLevel::ComponentInstance => 1,
            ScopeLevel::Machine => 2,
            ScopeLevel::Model => 3,
        }
    }

    /// 从数据库字符串解析
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "COMPONENT_INSTANCE" => Some(ScopeLevel::ComponentInstance),
            "MACHINE" => Some(ScopeLevel::Machine),
            "MODEL" => Some(ScopeLevel::Model),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ScopeLevel::ComponentInstance => "COMPONENT_INSTANCE",
            ScopeLevel::Machine => "MACHINE",
            ScopeLevel::Model => "MODEL",
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 规则类别 (Rule Kind)
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 4. Rule Evaluator
// USAGE/TIME 完整实现; RRULE/EVENT 显式跳过(可与"未到期"区分)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    Usage, // 用量阈值(计数器)
    Time,  // 时间周期(日/周/月/年)
    Rrule, // 日历重复表达式
    Event, // 外部事件触发
}

impl RuleKind {
    /// 从数据库字符串解析
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "USAGE" => Some(RuleKind::Usage),
            "TIME" => Some(RuleKind::Time),
            "RRULE" => Some(RuleKind::Rrule),
            "EVENT" => Some(RuleKind::Event),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RuleKind::Usage => "USAGE",
            RuleKind::Time => "TIME",
            RuleKind::Rrule => "RRULE",
            RuleKind::Event => "EVENT",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 基线重置策略 (Reset Policy)
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 3. Baseline Resolver
// 说明: TASK_COMPLETION 目前与 NEVER 同路径(已知简化,见 baseline 模块)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResetPolicy {
    TaskCompletion,  // 按最近一次保养完成重置
    PartReplacement, // 按部件更换(安装时刻)重置
    Never,           // 永不重置(从投运日起算)
}

impl ResetPolicy {
    /// 从数据库字符串解析
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TASK_COMPLETION" => Some(ResetPolicy::TaskCompletion),
            "PART_REPLACEMENT" => Some(ResetPolicy::PartReplacement),
            "NEVER" => Some(ResetPolicy::Never),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ResetPolicy::TaskCompletion => "TASK_COMPLETION",
            ResetPolicy::PartReplacement => "PART_REPLACEMENT",
            ResetPolicy::Never => "NEVER",
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 周期单位 (Interval Unit)
// ==========================================
// 红线: 月/年必须按日历推进,禁止固定时长近似
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalUnit {
    Day,   // 日
    Week,  // 周
    Month, // 月(日历感知)
    Year,  // 年(日历感知)
}

impl IntervalUnit {
    /// 从数据库字符串解析
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DAY" => Some(IntervalUnit::Day),
            "WEEK" => Some(IntervalUnit::Week),
            "MONTH" => Some(IntervalUnit::Month),
            "YEAR" => Some(IntervalUnit::Year),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            IntervalUnit::Day => "DAY",
            IntervalUnit::Week => "WEEK",
            IntervalUnit::Month => "MONTH",
            IntervalUnit::Year => "YEAR",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 跳过原因 (Skip Reason)
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 7. 错误分级
// 红线: 跳过 ≠ 未到期,必须在诊断输出中可区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    RruleUnsupported, // RRULE 展开未实现,显式跳过
    EventExternal,    // EVENT 由外部信号判定,本引擎不计算
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RruleUnsupported => write!(f, "RRULE_UNSUPPORTED"),
            SkipReason::EventExternal => write!(f, "EVENT_EXTERNAL"),
        }
    }
}

// ==========================================
// 诊断类别 (Diagnostic Kind)
// ==========================================
// 局部降级: 缺引用数据的目标不产出裁决,只产出诊断行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    MissingMachine,   // 计划指向的设备不存在
    MissingComponent, // 计划指向的部件实例不存在
    MissingCounter,   // USAGE 规则引用的计数器不在目录中
    MissingTask,      // 计划关联的保养任务不存在
    MalformedRule,    // 必填字段缺失的规则漏过装载校验(防御路径)
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MissingMachine => write!(f, "MISSING_MACHINE"),
            DiagnosticKind::MissingComponent => write!(f, "MISSING_COMPONENT"),
            DiagnosticKind::MissingCounter => write!(f, "MISSING_COUNTER"),
            DiagnosticKind::MissingTask => write!(f, "MISSING_TASK"),
            DiagnosticKind::MalformedRule => write!(f, "MALFORMED_RULE"),
        }
    }
}
