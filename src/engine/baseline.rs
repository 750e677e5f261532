// ==========================================
// 设备预防性维护决策支持系统 - 基线解析引擎
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 3. Baseline Resolver
// 优先级: 显式 start_at -> PART_REPLACEMENT 安装时刻 -> 投运日 00:00 UTC
// ==========================================
// 红线: 显式 start_at 永远胜出,即使 reset_policy=PART_REPLACEMENT;
//       PART_REPLACEMENT 只对部件作用域目标生效
//       (MODEL/MACHINE 作用域没有安装时刻可回退)
// ==========================================

use crate::domain::machine::{InstalledComponent, Machine};
use crate::domain::plan::ScheduleRule;
use crate::domain::types::ResetPolicy;
use chrono::{DateTime, Utc};

// ==========================================
// BaselineResolver - 基线解析器
// ==========================================
pub struct BaselineResolver;

impl BaselineResolver {
    /// 解析 TIME 规则的起算基线,命中即返回
    ///
    /// # 规则
    /// 1) rule.start_at 存在 → 直接使用
    /// 2) reset_policy=PART_REPLACEMENT 且目标携带部件 → 部件安装时刻
    /// 3) 否则 → 设备投运日(00:00 UTC)
    ///
    /// TASK_COMPLETION 当前不查 service_log,落入规则 2)/3)(与参考行为一致)。
    // TODO(PM-TD003): TASK_COMPLETION 应取该 (设备, 任务) 最近一次 service_log
    // 的 performed_at 作为基线,无记录时回退规则 2)/3);
    // 快照已装载 service_log 并建好 last_serviced_at 索引,待产品确认后接入。
    pub fn resolve(
        rule: &ScheduleRule,
        machine: &Machine,
        component: Option<&InstalledComponent>,
    ) -> DateTime<Utc> {
        // 规则 1: 显式起算时刻
        if let Some(start_at) = rule.start_at {
            return start_at;
        }

        // 规则 2: 部件更换重置(仅部件作用域目标可用)
        if rule.reset_policy == ResetPolicy::PartReplacement {
            if let Some(component) = component {
                return component.installed_at;
            }
        }

        // 规则 3: 投运日兜底
        machine.in_service_baseline()
    }
}
