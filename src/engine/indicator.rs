// ==========================================
// 电池循环测试报告生成系统 - 指标计算引擎
// ==========================================
// 职责: 数据集 + 配置 → KPI 映射（含目标阈值与状态）
// 口径: Basic / Extended 两套预设共用同一引擎
// 固定阈值: 过放 <20% SoC, 过充 >105% SoC, 满充 >=99% SoC,
//           高温 >45°C, 低温 <0°C
// ==========================================

use crate::config::{KpiPreset, ReportConfig};
use crate::domain::CycleDataset;
use serde::Serialize;

// ===== 固定策略阈值 =====
pub const OVER_DISCHARGE_SOC_PCT: f64 = 20.0;
pub const OVER_CHARGE_SOC_PCT: f64 = 105.0;
pub const FULL_CHARGE_SOC_PCT: f64 = 99.0;
pub const HIGH_TEMP_C: f64 = 45.0;
pub const LOW_TEMP_C: f64 = 0.0;

/// 满充占比目标（Extended 预设状态判定）
const FULL_CHARGE_RATIO_TARGET: f64 = 0.95;
/// 效率健康区间（Extended 预设状态判定）
const EFFICIENCY_RANGE: (f64, f64) = (1.05, 1.10);

/// KPI 标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiKind {
    TotalCycles,
    DeepDischarges,
    OverDischarges,
    OverCharges,
    FullCharges,
    PartialCharges,
    HighTempCycles,
    LowTempCycles,
    TmaxMean,
    AhEfficiency,
}

/// KPI 标量值
///
/// Undefined 为显式未定义值（分母为零 / 源列整列缺失），
/// 不使用 NaN 传播也绝不抛除零错误
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiValue {
    Count(u64),
    Ratio(f64),
    Temperature(f64),
    Undefined,
}

impl KpiValue {
    fn from_count(count: Option<u64>) -> Self {
        match count {
            Some(n) => KpiValue::Count(n),
            None => KpiValue::Undefined,
        }
    }
}

/// KPI 状态（报告表格的状态列，Extended 预设）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KpiStatus {
    Ok,
    Critico,
    DaMigliorare,
    Check,
}

impl KpiStatus {
    /// 报告中的状态文案（报告语言为意大利语）
    pub fn as_report_str(&self) -> &'static str {
        match self {
            KpiStatus::Ok => "OK",
            KpiStatus::Critico => "Critico",
            KpiStatus::DaMigliorare => "Da migliorare",
            KpiStatus::Check => "Check",
        }
    }
}

/// 单条 KPI（名称 + 值 + 可选目标阈值与状态）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiEntry {
    pub kind: KpiKind,
    /// 报告中的指标名称（意大利语文案）
    pub label: String,
    pub value: KpiValue,
    /// 目标阈值文案（仅 Extended 预设的部分指标）
    pub target: Option<String>,
    /// 与固定阈值比较得出的状态（仅 Extended 预设的部分指标）
    pub status: Option<KpiStatus>,
}

/// KPI 映射（构建后不可变，条目顺序固定）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    preset: KpiPreset,
    entries: Vec<KpiEntry>,
}

impl KpiReport {
    pub fn preset(&self) -> KpiPreset {
        self.preset
    }

    pub fn entries(&self) -> &[KpiEntry] {
        &self.entries
    }

    /// 按标识取值
    pub fn value(&self, kind: KpiKind) -> Option<KpiValue> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| e.value)
    }

    /// 本预设是否携带目标阈值/状态列
    pub fn has_targets(&self) -> bool {
        self.entries.iter().any(|e| e.target.is_some())
    }
}

// ==========================================
// IndicatorEngine - 指标计算引擎
// ==========================================
pub struct IndicatorEngine;

impl IndicatorEngine {
    /// 计算 KPI 映射（确定性: 相同输入与配置产出相同结果）
    pub fn compute(dataset: &CycleDataset, config: &ReportConfig) -> KpiReport {
        let entries = match config.preset {
            KpiPreset::Basic => Self::compute_basic(dataset, config),
            KpiPreset::Extended => Self::compute_extended(dataset, config),
        };
        KpiReport {
            preset: config.preset,
            entries,
        }
    }

    // ===== Basic 预设: 深放电 / 满充 / 部分充电 / 效率 / 高温 / Tmax 均值 =====
    fn compute_basic(dataset: &CycleDataset, config: &ReportConfig) -> Vec<KpiEntry> {
        let total = dataset.len() as u64;
        let deep_threshold = config.deep_discharge_threshold_ah();

        let deep = dataset.count_where(|r| r.ah_discharged, |v| v >= deep_threshold);
        let full = dataset.count_where(|r| r.soc_end_charge, |v| v >= FULL_CHARGE_SOC_PCT);
        let partial = full.map(|f| total - f);
        let high_temp = dataset.count_where(|r| r.tmax, |v| v > HIGH_TEMP_C);

        vec![
            KpiEntry {
                kind: KpiKind::TotalCycles,
                label: "Cicli totali esaminati".to_string(),
                value: KpiValue::Count(total),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::DeepDischarges,
                label: format!("Scariche profonde (>= {:.0} Ah)", deep_threshold),
                value: KpiValue::from_count(deep),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::FullCharges,
                label: "Cariche complete (>=99% SoC)".to_string(),
                value: KpiValue::from_count(full),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::PartialCharges,
                label: "Cariche parziali (<99% SoC)".to_string(),
                value: KpiValue::from_count(partial),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::AhEfficiency,
                label: "Efficienza Ah".to_string(),
                value: Self::efficiency(dataset),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::HighTempCycles,
                label: "Cicli Tmax >45 °C".to_string(),
                value: KpiValue::from_count(high_temp),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::TmaxMean,
                label: "Tmax media (°C)".to_string(),
                value: match dataset.mean(|r| r.tmax) {
                    Some(m) => KpiValue::Temperature(m),
                    None => KpiValue::Undefined,
                },
                target: None,
                status: None,
            },
        ]
    }

    // ===== Extended 预设: 过放 / 过充 / 满充 / 部分充电 / 高温 / 低温 / 效率 =====
    fn compute_extended(dataset: &CycleDataset, _config: &ReportConfig) -> Vec<KpiEntry> {
        let total = dataset.len() as u64;

        let over_discharge =
            dataset.count_where(|r| r.soc_end_discharge, |v| v < OVER_DISCHARGE_SOC_PCT);
        let over_charge = dataset.count_where(|r| r.soc_end_charge, |v| v > OVER_CHARGE_SOC_PCT);
        let full = dataset.count_where(|r| r.soc_end_charge, |v| v >= FULL_CHARGE_SOC_PCT);
        let partial = full.map(|f| total - f);
        let high_temp = dataset.count_where(|r| r.tmax, |v| v > HIGH_TEMP_C);
        let low_temp = dataset.count_where(|r| r.tmin, |v| v < LOW_TEMP_C);
        let efficiency = Self::efficiency(dataset);

        vec![
            KpiEntry {
                kind: KpiKind::TotalCycles,
                label: "Cicli totali esaminati".to_string(),
                value: KpiValue::Count(total),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::OverDischarges,
                label: "Scariche profonde (<20% SoC)".to_string(),
                value: KpiValue::from_count(over_discharge),
                target: Some("0".to_string()),
                status: Some(Self::zero_count_status(over_discharge)),
            },
            KpiEntry {
                kind: KpiKind::OverCharges,
                label: "Sovra-cariche (>105% SoC)".to_string(),
                value: KpiValue::from_count(over_charge),
                target: Some("0".to_string()),
                status: Some(Self::zero_count_status(over_charge)),
            },
            KpiEntry {
                kind: KpiKind::FullCharges,
                label: "Cariche complete (>=99% SoC)".to_string(),
                value: KpiValue::from_count(full),
                target: Some(">= 95%".to_string()),
                status: Some(Self::full_charge_status(full, total)),
            },
            KpiEntry {
                kind: KpiKind::PartialCharges,
                label: "Cariche parziali (<99% SoC)".to_string(),
                value: KpiValue::from_count(partial),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::HighTempCycles,
                label: "Cicli Tmax >45 °C".to_string(),
                value: KpiValue::from_count(high_temp),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::LowTempCycles,
                label: "Cicli Tmin <0 °C".to_string(),
                value: KpiValue::from_count(low_temp),
                target: None,
                status: None,
            },
            KpiEntry {
                kind: KpiKind::AhEfficiency,
                label: "Efficienza Ah".to_string(),
                value: efficiency,
                target: Some("1.05 - 1.10".to_string()),
                status: Some(Self::efficiency_status(efficiency)),
            },
        ]
    }

    /// 充电效率 = Σ充入 Ah / Σ放出 Ah（分母为零或整列缺失 → 未定义）
    fn efficiency(dataset: &CycleDataset) -> KpiValue {
        let discharged = dataset.sum(|r| r.ah_discharged);
        let charged = dataset.sum(|r| r.ah_charged);
        if discharged == 0.0 || dataset.present_count(|r| r.ah_discharged) == 0 {
            KpiValue::Undefined
        } else {
            KpiValue::Ratio(charged / discharged)
        }
    }

    /// 目标为 0 的计数指标: >0 为 Critico
    fn zero_count_status(count: Option<u64>) -> KpiStatus {
        match count {
            Some(0) => KpiStatus::Ok,
            Some(_) => KpiStatus::Critico,
            None => KpiStatus::Check,
        }
    }

    /// 满充占比 >= 95% 为 OK，否则待改进
    fn full_charge_status(full: Option<u64>, total: u64) -> KpiStatus {
        match full {
            Some(f) if total > 0 => {
                if f as f64 / total as f64 >= FULL_CHARGE_RATIO_TARGET {
                    KpiStatus::Ok
                } else {
                    KpiStatus::DaMigliorare
                }
            }
            _ => KpiStatus::Check,
        }
    }

    /// 效率位于 [1.05, 1.10] 为 OK，否则需复核
    fn efficiency_status(value: KpiValue) -> KpiStatus {
        match value {
            KpiValue::Ratio(r) if r >= EFFICIENCY_RANGE.0 && r <= EFFICIENCY_RANGE.1 => {
                KpiStatus::Ok
            }
            KpiValue::Ratio(_) => KpiStatus::Check,
            _ => KpiStatus::Check,
        }
    }
}
