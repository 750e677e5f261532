// ==========================================
// 设备预防性维护决策支持系统 - 最新读数解析
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 2. Latest-Reading Resolver
// ==========================================
// 职责: (设备, 计数器) → 最新观测值; 查不到 = 无读数,不是错误
// 红线: 只走快照物化 top-1 索引,评估路径不扫读数历史
// ==========================================

use crate::domain::machine::MeterReading;
use crate::snapshot::fleet::FleetSnapshot;

// ==========================================
// LatestReadingResolver - 最新读数解析器
// ==========================================
pub struct LatestReadingResolver<'a> {
    snapshot: &'a FleetSnapshot,
}

impl<'a> LatestReadingResolver<'a> {
    pub fn new(snapshot: &'a FleetSnapshot) -> Self {
        Self { snapshot }
    }

    /// (设备, 计数器) 的最新读数
    ///
    /// 无计量表或无读数 ⇒ None; USAGE 评估把 None 解释为当前用量 0
    /// (从未抄表的计数器读作零,而不是立即到期)
    pub fn latest(&self, machine_id: &str, counter_id: &str) -> Option<&'a MeterReading> {
        self.snapshot.latest_reading(machine_id, counter_id)
    }

    /// 最新读数值,无读数按 0
    pub fn current_value_or_zero(&self, machine_id: &str, counter_id: &str) -> f64 {
        self.latest(machine_id, counter_id)
            .map(|r| r.value)
            .unwrap_or(0.0)
    }
}
