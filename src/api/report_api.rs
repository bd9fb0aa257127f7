// ==========================================
// 电池循环测试报告生成系统 - 报告流水线编排
// ==========================================
// 职责: 数据加载 → 指标计算 → 图表渲染 → PDF 装配
// 模型: 单线程同步执行，一次调用跑完整条流水线；
//       任一阶段硬失败即中止，无部分结果、无重试
// ==========================================

use crate::config::ReportConfig;
use crate::engine::{ChartBuilder, ChartSet, IndicatorEngine, KpiReport};
use crate::error::ReportResult;
use crate::importer::{FieldMapper, UniversalFileParser};
use crate::report::{ReportAssembler, REPORT_FILENAME};
use std::path::{Path, PathBuf};

/// 单次运行的全部产物（不跨运行持久化）
#[derive(Debug)]
pub struct ReportArtifacts {
    pub kpi_report: KpiReport,
    pub charts: ChartSet,
    pub pdf_path: PathBuf,
}

// ==========================================
// ReportPipeline - 流水线编排器
// ==========================================
pub struct ReportPipeline;

impl ReportPipeline {
    /// 执行完整流水线
    ///
    /// scratch_dir 为本次运行的临时产物目录（图表 PNG 与 PDF），
    /// 每次运行覆盖旧产物
    pub fn run(
        input_path: &Path,
        scratch_dir: &Path,
        config: &ReportConfig,
    ) -> ReportResult<ReportArtifacts> {
        config.validate()?;
        std::fs::create_dir_all(scratch_dir)?;

        // 阶段 0: 文件解析
        tracing::info!(input = %input_path.display(), "加载循环日志");
        let raw_records = UniversalFileParser.parse(input_path)?;
        tracing::info!(rows = raw_records.len(), "解析完成");

        // 阶段 1: 字段映射（宽松数值转换）
        let dataset = FieldMapper.build_dataset(&raw_records);

        // 阶段 2: KPI 计算
        let kpi_report = IndicatorEngine::compute(&dataset, config);
        tracing::info!(preset = ?config.preset, kpi_count = kpi_report.entries().len(), "KPI 计算完成");

        // 阶段 3: 图表渲染
        let charts = ChartBuilder::render(&dataset, config, scratch_dir)?;

        // 阶段 4: PDF 装配
        let pdf_path = scratch_dir.join(REPORT_FILENAME);
        ReportAssembler::build(&kpi_report, &charts, config, &pdf_path)?;

        Ok(ReportArtifacts {
            kpi_report,
            charts,
            pdf_path,
        })
    }
}
