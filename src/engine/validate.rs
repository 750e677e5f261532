// ==========================================
// 设备预防性维护决策支持系统 - 规则装载校验
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 7. 错误分级
// ==========================================
// 职责: 按规则类别校验必填字段组合,评估前整体把关
// 红线: 畸形规则在装载期拒绝并列出全部违规,绝不静默矫正;
//       与运行期"缺引用数据"的局部降级是两类错误
// ==========================================

use crate::domain::plan::ScheduleRule;
use crate::domain::types::RuleKind;
use crate::snapshot::fleet::FleetSnapshot;
use std::fmt;
use thiserror::Error;

// ==========================================
// RuleViolation - 单条违规
// ==========================================
#[derive(Debug, Clone)]
pub struct RuleViolation {
    pub rule_id: String,
    pub plan_id: String,
    pub message: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule_id={}, plan_id={}: {}",
            self.rule_id, self.plan_id, self.message
        )
    }
}

// ==========================================
// ValidationError - 装载校验失败
// ==========================================
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("规则装载校验失败, {} 条违规: [{}]", .violations.len(), format_violations(.violations))]
    MalformedRules { violations: Vec<RuleViolation> },
}

fn format_violations(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ==========================================
// RuleValidator - 规则校验器
// ==========================================
pub struct RuleValidator;

impl RuleValidator {
    /// 校验整个快照的规则集
    ///
    /// 停用规则同样校验: 畸形数据属于完整性问题,与是否参与评估无关
    pub fn validate_snapshot(snapshot: &FleetSnapshot) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        for rule in snapshot.rules() {
            violations.extend(Self::validate_rule(rule));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MalformedRules { violations })
        }
    }

    /// 校验单条规则,收集全部违规(不短路)
    ///
    /// # 规则
    /// - USAGE: counter_id + threshold 必填
    /// - TIME: interval_count(>0) + interval_unit 必填
    /// - RRULE: recurrence + timezone 必填
    /// - EVENT: 无额外必填
    pub fn validate_rule(rule: &ScheduleRule) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        let mut push = |message: String| {
            violations.push(RuleViolation {
                rule_id: rule.rule_id.clone(),
                plan_id: rule.plan_id.clone(),
                message,
            });
        };

        match rule.kind {
            RuleKind::Usage => {
                if rule.counter_id.as_deref().map_or(true, str::is_empty) {
                    push("USAGE 规则缺少 counter_id".to_string());
                }
                if rule.threshold.is_none() {
                    push("USAGE 规则缺少 threshold".to_string());
                }
            }
            RuleKind::Time => {
                match rule.interval_count {
                    None => push("TIME 规则缺少 interval_count".to_string()),
                    Some(count) if count <= 0 => {
                        push(format!("TIME 规则 interval_count 非正: {}", count))
                    }
                    Some(_) => {}
                }
                if rule.interval_unit.is_none() {
                    push("TIME 规则缺少 interval_unit".to_string());
                }
            }
            RuleKind::Rrule => {
                if rule.recurrence.as_deref().map_or(true, str::is_empty) {
                    push("RRULE 规则缺少 recurrence".to_string());
                }
                if rule.timezone.as_deref().map_or(true, str::is_empty) {
                    push("RRULE 规则缺少 timezone".to_string());
                }
            }
            RuleKind::Event => {}
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{IntervalUnit, ResetPolicy};
    use chrono::Utc;

    fn base_rule(kind: RuleKind) -> ScheduleRule {
        ScheduleRule {
            rule_id: "R001".to_string(),
            plan_id: "P001".to_string(),
            kind,
            reset_policy: ResetPolicy::Never,
            is_active: true,
            start_at: None,
            counter_id: None,
            threshold: None,
            interval_count: None,
            interval_unit: None,
            recurrence: None,
            timezone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_usage_rule_requires_counter_and_threshold() {
        let rule = base_rule(RuleKind::Usage);
        let violations = RuleValidator::validate_rule(&rule);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.message.contains("counter_id")));
        assert!(violations.iter().any(|v| v.message.contains("threshold")));
    }

    #[test]
    fn test_usage_rule_complete_passes() {
        let mut rule = base_rule(RuleKind::Usage);
        rule.counter_id = Some("engine_hours".to_string());
        rule.threshold = Some(250.0);
        assert!(RuleValidator::validate_rule(&rule).is_empty());
    }

    #[test]
    fn test_time_rule_rejects_non_positive_interval() {
        let mut rule = base_rule(RuleKind::Time);
        rule.interval_count = Some(0);
        rule.interval_unit = Some(IntervalUnit::Month);
        let violations = RuleValidator::validate_rule(&rule);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("非正"));
    }

    #[test]
    fn test_rrule_requires_expression_and_timezone() {
        let mut rule = base_rule(RuleKind::Rrule);
        rule.recurrence = Some("FREQ=MONTHLY;BYMONTHDAY=1".to_string());
        let violations = RuleValidator::validate_rule(&rule);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("timezone"));
    }

    #[test]
    fn test_event_rule_has_no_required_fields() {
        let rule = base_rule(RuleKind::Event);
        assert!(RuleValidator::validate_rule(&rule).is_empty());
    }
}
