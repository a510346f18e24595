// ==========================================
// 零件文档有效期对账系统 - 领域类型定义
// ==========================================
// 两套状态并存，互不派生：
// - ReportStatus: 对账报告口径（90 天窗口），写入报告
// - TrackingStatus: 看板跟踪口径（30 天窗口），仅用于筛选
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报告状态 (Report Status)
// ==========================================
// 无修订日期时整行状态为 None（未知），不在此枚举内
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Expired,      // 已过期
    ExpiringSoon, // 临期
    Valid,        // 有效
}

impl ReportStatus {
    /// 报告中使用的单元格文本
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Expired => "Expirada",
            ReportStatus::ExpiringSoon => "Por expirar",
            ReportStatus::Valid => "Vigente",
        }
    }

    /// 从报告单元格文本还原
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "Expirada" => Some(ReportStatus::Expired),
            "Por expirar" => Some(ReportStatus::ExpiringSoon),
            "Vigente" => Some(ReportStatus::Valid),
            _ => None,
        }
    }

    /// 状态列底色（RGB）
    pub fn fill_rgb(&self) -> u32 {
        match self {
            ReportStatus::Expired => 0xFF9999,
            ReportStatus::ExpiringSoon => 0xFFF599,
            ReportStatus::Valid => 0xC6EFCE,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 看板跟踪状态 (Tracking Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingStatus {
    Vencido,   // 已过期
    PorVencer, // 即将过期
    Vigente,   // 有效
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 3] = [
        TrackingStatus::Vencido,
        TrackingStatus::PorVencer,
        TrackingStatus::Vigente,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrackingStatus::Vencido => "VENCIDO",
            TrackingStatus::PorVencer => "POR VENCER",
            TrackingStatus::Vigente => "VIGENTE",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "VENCIDO" => Some(TrackingStatus::Vencido),
            "POR VENCER" | "POR_VENCER" => Some(TrackingStatus::PorVencer),
            "VIGENTE" => Some(TrackingStatus::Vigente),
            _ => None,
        }
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
