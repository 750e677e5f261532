// ==========================================
// 设备预防性维护决策支持系统 - API 层
// ==========================================
// 职责: 进程内调用边界与展示 DTO
// ==========================================

pub mod dto;
pub mod due_api;

pub use dto::{DueItemDto, NearDueItemDto, ReportSummaryDto};
pub use due_api::{DueApiError, DueListApi};
