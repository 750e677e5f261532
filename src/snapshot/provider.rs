// ==========================================
// 设备预防性维护决策支持系统 - 快照提供方接口
// ==========================================
// 依据: Maintenance_Engine_Specs_v0.2.md - 5. 并发与资源模型
// ==========================================
// 职责: 快照获取是整次评估唯一的挂起点,必须由调用方给定超时上界
// 红线: 超时即整体失败,不允许返回部分快照/部分到期清单
// ==========================================

use crate::repository::error::{StoreError, StoreResult};
use crate::snapshot::fleet::FleetSnapshot;
use async_trait::async_trait;
use std::time::Duration;

// ==========================================
// SnapshotProvider - 快照提供方
// ==========================================
// 实体快照的只读来源(SQLite 适配器/测试桩/远端服务)
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// 获取评估时刻的一致性快照
    async fn fetch_snapshot(&self) -> StoreResult<FleetSnapshot>;
}

/// 带超时上界的快照获取
///
/// # 参数
/// - provider: 快照提供方
/// - timeout: 调用方给定的获取上界
///
/// # 返回
/// - 超时 ⇒ StoreError::FetchTimeout,整次评估原子失败
pub async fn fetch_snapshot_with_timeout(
    provider: &dyn SnapshotProvider,
    timeout: Duration,
) -> StoreResult<FleetSnapshot> {
    match tokio::time::timeout(timeout, provider.fetch_snapshot()).await {
        Ok(result) => result,
        Err(_elapsed) => Err(StoreError::FetchTimeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fleet::FleetData;

    /// 人为延迟的测试桩
    struct SlowProvider {
        delay: Duration,
    }

    #[async_trait]
    impl SnapshotProvider for SlowProvider {
        async fn fetch_snapshot(&self) -> StoreResult<FleetSnapshot> {
            tokio::time::sleep(self.delay).await;
            Ok(FleetSnapshot::from_data(FleetData::default()))
        }
    }

    #[tokio::test]
    async fn test_fetch_within_timeout() {
        let provider = SlowProvider {
            delay: Duration::from_millis(10),
        };
        let result =
            fetch_snapshot_with_timeout(&provider, Duration::from_millis(500)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_atomic_failure() {
        let provider = SlowProvider {
            delay: Duration::from_millis(500),
        };
        let result = fetch_snapshot_with_timeout(&provider, Duration::from_millis(20)).await;
        match result {
            Err(StoreError::FetchTimeout { timeout_ms }) => assert_eq!(timeout_ms, 20),
            other => panic!("expected FetchTimeout, got {:?}", other.map(|_| ())),
        }
    }
}
