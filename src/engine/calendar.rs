// ==========================================
// 设备预防性维护决策支持系统 - 日历周期推进
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 4.2 TIME 规则
// 红线: 月/年按日历推进(月末自动收口),禁止 30 天/365 天近似
// ==========================================

use crate::domain::types::IntervalUnit;
use chrono::{DateTime, Duration, Months, Utc};

/// 基线时刻 + N 个周期单位
///
/// # 规则
/// - DAY/WEEK: 固定时长推进
/// - MONTH/YEAR: 日历感知推进(1月31日 + 1月 = 2月28/29日)
///
/// # 返回
/// - None: 仅在日历溢出时(周期数大到超出 chrono 可表示范围)
pub fn add_interval(
    base: DateTime<Utc>,
    count: i32,
    unit: IntervalUnit,
) -> Option<DateTime<Utc>> {
    if count < 0 {
        return None;
    }
    match unit {
        IntervalUnit::Day => base.checked_add_signed(Duration::days(count as i64)),
        IntervalUnit::Week => base.checked_add_signed(Duration::weeks(count as i64)),
        IntervalUnit::Month => base.checked_add_months(Months::new(count as u32)),
        IntervalUnit::Year => base.checked_add_months(Months::new((count as u32).checked_mul(12)?)),
    }
}
