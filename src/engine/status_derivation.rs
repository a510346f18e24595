// ==========================================
// 零件文档有效期对账系统 - 有效期状态派生
// ==========================================
// 职责: 由修订日期推出到期日，并给出两种状态
// - ReportStatus: 写入对账终表（默认 90 天预警窗口，按整天数向下取整比较）
// - TrackingStatus: 看板重新计算（默认 30 天预警窗口，直接比较时间点）
// 两种状态窗口不同，互不替代
// ==========================================

use crate::config::StatusWindows;
use crate::domain::types::{ReportStatus, TrackingStatus};
use chrono::{Duration, Months, NaiveDateTime};

// ==========================================
// StatusDeriver
// ==========================================
#[derive(Debug, Clone)]
pub struct StatusDeriver {
    windows: StatusWindows,
}

impl StatusDeriver {
    pub fn new(windows: StatusWindows) -> Self {
        Self { windows }
    }

    /// 到期日 = 修订日期 + N 个月（月末按目标月最后一天截断，如 2/29 → 次年 2/28）
    pub fn expiration_date(&self, revision: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
        revision?.checked_add_months(Months::new(self.windows.validity_months))
    }

    /// 终表状态
    ///
    /// # 规则
    /// - 到期日早于 now → Expired
    /// - 剩余整天数 ≤ 预警窗口 → ExpiringSoon
    /// - 其余 → Valid
    /// - 无到期日 → None
    pub fn report_status(
        &self,
        expiration: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Option<ReportStatus> {
        let expiration = expiration?;
        let remaining = expiration - now;
        if remaining < Duration::zero() {
            return Some(ReportStatus::Expired);
        }
        if remaining.num_days() <= self.windows.report_expiring_days {
            Some(ReportStatus::ExpiringSoon)
        } else {
            Some(ReportStatus::Valid)
        }
    }

    /// 看板跟踪状态（无到期日视为 VIGENTE）
    pub fn tracking_status(
        &self,
        expiration: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> TrackingStatus {
        match expiration {
            Some(exp) if exp < now => TrackingStatus::Vencido,
            Some(exp) if exp < now + Duration::days(self.windows.tracking_expiring_days) => {
                TrackingStatus::PorVencer
            }
            _ => TrackingStatus::Vigente,
        }
    }
}

impl Default for StatusDeriver {
    fn default() -> Self {
        Self::new(StatusWindows::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_expiration_adds_twelve_months() {
        let deriver = StatusDeriver::default();
        assert_eq!(deriver.expiration_date(Some(at(2023, 3, 15))), Some(at(2024, 3, 15)));
        assert_eq!(deriver.expiration_date(None), None);
    }

    #[test]
    fn test_expiration_leap_day_clamps() {
        let deriver = StatusDeriver::default();
        assert_eq!(deriver.expiration_date(Some(at(2024, 2, 29))), Some(at(2025, 2, 28)));
    }

    #[test]
    fn test_report_status_boundaries() {
        let deriver = StatusDeriver::default();
        let now = at(2024, 1, 1);
        assert_eq!(
            deriver.report_status(Some(now - Duration::seconds(1)), now),
            Some(ReportStatus::Expired)
        );
        assert_eq!(deriver.report_status(Some(now), now), Some(ReportStatus::ExpiringSoon));
        assert_eq!(
            deriver.report_status(Some(now + Duration::days(89)), now),
            Some(ReportStatus::ExpiringSoon)
        );
        assert_eq!(
            deriver.report_status(Some(now + Duration::days(90)), now),
            Some(ReportStatus::ExpiringSoon)
        );
        assert_eq!(
            deriver.report_status(Some(now + Duration::days(91)), now),
            Some(ReportStatus::Valid)
        );
        assert_eq!(deriver.report_status(None, now), None);
    }

    #[test]
    fn test_tracking_status_boundaries() {
        let deriver = StatusDeriver::default();
        let now = at(2024, 1, 1);
        assert_eq!(
            deriver.tracking_status(Some(now - Duration::days(1)), now),
            TrackingStatus::Vencido
        );
        assert_eq!(
            deriver.tracking_status(Some(now + Duration::days(29)), now),
            TrackingStatus::PorVencer
        );
        assert_eq!(
            deriver.tracking_status(Some(now + Duration::days(30)), now),
            TrackingStatus::Vigente
        );
        assert_eq!(deriver.tracking_status(None, now), TrackingStatus::Vigente);
    }

    #[test]
    fn test_windows_are_independent() {
        let deriver = StatusDeriver::default();
        let now = at(2024, 1, 1);
        let exp = Some(now + Duration::days(60));
        assert_eq!(deriver.report_status(exp, now), Some(ReportStatus::ExpiringSoon));
        assert_eq!(deriver.tracking_status(exp, now), TrackingStatus::Vigente);
    }
}
