// ==========================================
// 设备预防性维护决策支持系统 - 设备领域模型
// ==========================================
// 依据: PM_Master_Spec.md - PART C 设备台账体系
// 依据: Maintenance_Engine_Specs_v0.2.md - 主实体定义
// 对齐: fleet_schema_v0.1.sql machine/counter/meter/meter_reading/installed_component 表
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Machine - 设备台账
// ==========================================
// 红线: 引擎只读,台账由外部存储层维护
// retired_date 非空 ⇒ 已退役,所有作用域的展开都排除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    // ===== 主键 =====
    pub machine_id: String, // 设备唯一标识

    // ===== 基础信息 =====
    pub model_code: String,        // 设备型号代码(MODEL 作用域匹配键)
    pub name: Option<String>,      // 设备名称

    // ===== 生命周期 =====
    pub in_service_date: NaiveDate,        // 投运日期(TIME 规则默认基线)
    pub retired_date: Option<NaiveDate>,   // 退役日期(非空=退役)

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

impl Machine {
    /// 是否退役
    ///
    /// 对齐参考视图的空值判定: retired_date 只要非空即视为退役,
    /// 不与评估时刻比较,保证展开结果与 evaluation_time 无关
    pub fn is_retired(&self) -> bool {
        self.retired_date.is_some()
    }

    /// 投运基线时刻(投运日 00:00 UTC)
    pub fn in_service_baseline(&self) -> DateTime<Utc> {
        self.in_service_date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc()
    }
}

// ==========================================
// Counter - 计数器目录
// ==========================================
// 可度量量纲目录(发动机小时/行驶里程等)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    pub counter_id: String,   // 计数器唯一标识
    pub name: String,         // 名称(如 engine_hours)
    pub unit: String,         // 单位(如 h / km)
}

// ==========================================
// Meter - 设备计量表
// ==========================================
// 红线: 每台设备每种计数器至多一块表(UNIQUE(machine_id, counter_id))
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meter {
    pub meter_id: String,   // 计量表唯一标识
    pub machine_id: String, // 所属设备(FK)
    pub counter_id: String, // 计数器类别(FK)
}

// ==========================================
// MeterReading - 计量读数
// ==========================================
// 最新读数 = observed_at 最大者; 同刻并列按 reading_id 最大者(插入序替代),
// 保证 top-1 索引确定性
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeterReading {
    pub reading_id: String,            // 读数唯一标识
    pub meter_id: String,              // 所属计量表(FK)
    pub value: f64,                    // 观测值(非负)
    pub observed_at: DateTime<Utc>,    // 观测时刻
}

// ==========================================
// InstalledComponent - 已安装部件实例
// ==========================================
// COMPONENT_INSTANCE 作用域的目标; installed_at 是 PART_REPLACEMENT 基线
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledComponent {
    pub component_id: String,               // 部件实例唯一标识
    pub machine_id: String,                 // 安装所在设备(FK)
    pub part_code: String,                  // 部件料号/族代码
    pub installed_at: DateTime<Utc>,        // 安装时刻
    pub removed_at: Option<DateTime<Utc>>,  // 拆除时刻(空=仍在机)
}

impl InstalledComponent {
    /// 是否已拆除
    pub fn is_removed(&self) -> bool {
        self.removed_at.is_some()
    }
}
