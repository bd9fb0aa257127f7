// ==========================================
// 电池循环测试报告生成系统 - 图表生成器
// ==========================================
// 职责: 增强数据集 + 配置 → 两张 PNG 柱状图
//   ah_cycle   - 每循环充/放电 Ah 分组柱 + DOD 参考线 + 充电完成标记
//   tmax_cycle - 每循环最高温度柱 + 45°C 参考线
// 规格: 2400x900 像素（8:3, 约 300 DPI 打印质量）
// ==========================================

use crate::config::ReportConfig;
use crate::domain::CycleDataset;
use crate::engine::indicator::{FULL_CHARGE_SOC_PCT, HIGH_TEMP_C};
use crate::error::{ReportError, ReportResult};
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};

/// 图表标签（固定文件名 <label>.png）
pub const AH_CHART_LABEL: &str = "ah_cycle";
pub const TMAX_CHART_LABEL: &str = "tmax_cycle";

/// 输出分辨率: 8x3 英寸 @ 300 DPI
const CHART_SIZE_PX: (u32, u32) = (2400, 900);

/// 分组柱: 柱宽 0.4 个循环单位，中心偏移 ±0.2
const BAR_HALF_WIDTH: f64 = 0.2;

// ===== 系列颜色（放电红 / 充电绿 / 温度黄）=====
const DISCHARGE_COLOR: RGBColor = RGBColor(231, 76, 60);
const CHARGE_COLOR: RGBColor = RGBColor(46, 204, 113);
const TEMP_COLOR: RGBColor = RGBColor(241, 196, 15);

/// 两张图表的落盘产物
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub ah_cycle: PathBuf,
    pub tmax_cycle: PathBuf,
}

/// Ah 图纵轴上界: 最高柱 × 1.15（上方留标记行余量）
pub fn ah_axis_ceiling(max_bar: f64) -> f64 {
    if max_bar <= 0.0 {
        1.0
    } else {
        max_bar * 1.15
    }
}

/// 温度图纵轴上界: max(50, 观测最高 Tmax × 1.1)
pub fn tmax_axis_ceiling(max_tmax: f64) -> f64 {
    (max_tmax * 1.1).max(50.0)
}

// ==========================================
// ChartBuilder - 图表生成器（无跨调用状态）
// ==========================================
pub struct ChartBuilder;

impl ChartBuilder {
    /// 渲染两张图表到 out_dir，每次运行覆盖旧产物
    pub fn render(
        dataset: &CycleDataset,
        config: &ReportConfig,
        out_dir: &Path,
    ) -> ReportResult<ChartSet> {
        std::fs::create_dir_all(out_dir)?;

        let ah_path = out_dir.join(format!("{}.png", AH_CHART_LABEL));
        let tmax_path = out_dir.join(format!("{}.png", TMAX_CHART_LABEL));

        Self::render_ah_chart(dataset, config, &ah_path)
            .map_err(|e| ReportError::Render(format!("{} 图表: {}", AH_CHART_LABEL, e)))?;
        tracing::debug!(path = %ah_path.display(), "Ah 图表已生成");

        Self::render_tmax_chart(dataset, &tmax_path)
            .map_err(|e| ReportError::Render(format!("{} 图表: {}", TMAX_CHART_LABEL, e)))?;
        tracing::debug!(path = %tmax_path.display(), "温度图表已生成");

        Ok(ChartSet {
            ah_cycle: ah_path,
            tmax_cycle: tmax_path,
        })
    }

    // ===== Ah 分组柱状图 =====
    fn render_ah_chart(
        dataset: &CycleDataset,
        config: &ReportConfig,
        path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, CHART_SIZE_PX).into_drawing_area();
        root.fill(&WHITE)?;

        let records = dataset.records();
        let max_bar = dataset
            .max(|r| r.ah_discharged)
            .unwrap_or(0.0)
            .max(dataset.max(|r| r.ah_charged).unwrap_or(0.0));
        let dod_line = config.deep_discharge_threshold_ah();

        let (x_min, x_max) = x_bounds(dataset);
        let y_top = ah_axis_ceiling(max_bar.max(dod_line));

        let mut chart = plotters::chart::ChartBuilder::on(&root)
            .caption("Ah caricati / scaricati per ciclo", ("sans-serif", 48))
            .margin(24)
            .x_label_area_size(70)
            .y_label_area_size(110)
            .build_cartesian_2d(x_min..x_max, 0f64..y_top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Cycle")
            .y_desc("Ah")
            .axis_desc_style(("sans-serif", 36))
            .label_style(("sans-serif", 28))
            .draw()?;

        // 放电柱（循环序号左侧）
        chart
            .draw_series(records.iter().filter_map(|r| {
                let v = r.ah_discharged?;
                let x = r.cycle_index;
                Some(Rectangle::new(
                    [(x - 2.0 * BAR_HALF_WIDTH, 0.0), (x, v)],
                    DISCHARGE_COLOR.filled(),
                ))
            }))?
            .label("Ah scaricati")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 6), (x + 14, y + 6)], DISCHARGE_COLOR.filled())
            });

        // 充电柱（循环序号右侧）
        chart
            .draw_series(records.iter().filter_map(|r| {
                let v = r.ah_charged?;
                let x = r.cycle_index;
                Some(Rectangle::new(
                    [(x, 0.0), (x + 2.0 * BAR_HALF_WIDTH, v)],
                    CHARGE_COLOR.filled(),
                ))
            }))?
            .label("Ah caricati")
            .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], CHARGE_COLOR.filled()));

        // DOD 参考线
        chart
            .draw_series(LineSeries::new(
                vec![(x_min, dod_line), (x_max, dod_line)],
                ShapeStyle::from(&BLACK).stroke_width(3),
            ))?
            .label(format!("{:.0}% DOD", config.dod_threshold * 100.0))
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 14, y)], ShapeStyle::from(&BLACK).stroke_width(3))
            });

        // 每循环充电完成标记行（✓ 完成 / ✗ 未完成）
        if max_bar > 0.0 {
            let y_marker = max_bar * 1.05;
            chart.draw_series(records.iter().map(|r| {
                let complete = r.soc_end_charge.map_or(false, |v| v >= FULL_CHARGE_SOC_PCT);
                let (glyph, color) = if complete {
                    ("✓", &GREEN)
                } else {
                    ("✗", &RED)
                };
                Text::new(
                    glyph,
                    (r.cycle_index, y_marker),
                    ("sans-serif", 30).into_font().color(color),
                )
            }))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font(("sans-serif", 28))
            .draw()?;

        root.present()?;
        Ok(())
    }

    // ===== Tmax 柱状图 =====
    fn render_tmax_chart(dataset: &CycleDataset, path: &Path) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, CHART_SIZE_PX).into_drawing_area();
        root.fill(&WHITE)?;

        let records = dataset.records();
        let max_tmax = dataset.max(|r| r.tmax).unwrap_or(0.0);

        let (x_min, x_max) = x_bounds(dataset);
        let y_top = tmax_axis_ceiling(max_tmax);

        let mut chart = plotters::chart::ChartBuilder::on(&root)
            .caption("Temperatura massima per ciclo", ("sans-serif", 48))
            .margin(24)
            .x_label_area_size(70)
            .y_label_area_size(110)
            .build_cartesian_2d(x_min..x_max, 0f64..y_top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Cycle")
            .y_desc("Tmax (°C)")
            .axis_desc_style(("sans-serif", 36))
            .label_style(("sans-serif", 28))
            .draw()?;

        // 温度柱
        chart
            .draw_series(records.iter().filter_map(|r| {
                let v = r.tmax?;
                let x = r.cycle_index;
                Some(Rectangle::new(
                    [(x - 2.0 * BAR_HALF_WIDTH, 0.0), (x + 2.0 * BAR_HALF_WIDTH, v)],
                    TEMP_COLOR.filled(),
                ))
            }))?
            .label("Tmax ciclo")
            .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], TEMP_COLOR.filled()));

        // 45°C 参考线
        chart
            .draw_series(LineSeries::new(
                vec![(x_min, HIGH_TEMP_C), (x_max, HIGH_TEMP_C)],
                ShapeStyle::from(&RED).stroke_width(3),
            ))?
            .label("Soglia 45 °C")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 14, y)], ShapeStyle::from(&RED).stroke_width(3))
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font(("sans-serif", 28))
            .draw()?;

        root.present()?;
        Ok(())
    }
}

/// 横轴范围: [最小循环序号 - 1, 最大循环序号 + 1]，空数据集退化为 [0, 1]
fn x_bounds(dataset: &CycleDataset) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for record in dataset.records() {
        min = min.min(record.cycle_index);
        max = max.max(record.cycle_index);
    }
    if dataset.is_empty() {
        (0.0, 1.0)
    } else {
        (min - 1.0, max + 1.0)
    }
}
