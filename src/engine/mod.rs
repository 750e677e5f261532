// ==========================================
// 设备预防性维护决策支持系统 - 引擎层
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 1.2 模块拆分
// ==========================================
// 职责: 到期解析管线(展开/读数/基线/评估/裁决),不拼 SQL
// 红线: 引擎只消费快照; 所有降级必须落诊断行,可解释
// ==========================================

pub mod baseline;
pub mod calendar;
pub mod evaluator;
pub mod expansion;
pub mod precedence;
pub mod reading;
pub mod report;
pub mod rule_eval;
pub mod validate;

// 重导出核心引擎
pub use baseline::BaselineResolver;
pub use evaluator::DueListEngine;
pub use expansion::{ExpansionOutcome, ExpansionRow, PlanExpander};
pub use precedence::PrecedenceResolver;
pub use reading::LatestReadingResolver;
pub use report::{
    Diagnostic, DueItem, EvaluatedRule, EvaluationReport, RuleOutcome, RuleVerdict, SkippedRule,
};
pub use rule_eval::RuleEvaluator;
pub use validate::{RuleValidator, RuleViolation, ValidationError};
