// ==========================================
// 电池循环测试报告生成系统 - PDF 报告装配器
// ==========================================
// 职责: KPI 映射 + 图表图片 + 配置 → 单份分页 PDF
// 纯格式化组件: 不做任何指标计算，状态列由指标引擎给出
// 版式: A4 纵向，固定页边距；第 1 页标题/元信息/KPI 表格，
//       第 2 页嵌入两张图表
// ==========================================

use crate::config::ReportConfig;
use crate::engine::indicator::{KpiReport, KpiValue};
use crate::engine::ChartSet;
use crate::error::{ReportError, ReportResult};
use chrono::Local;
use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// 报告固定下载文件名
pub const REPORT_FILENAME: &str = "relazione_batteria.pdf";

// ===== A4 版式常量 (mm) =====
const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 15.0;

/// 表格行高 (mm)
const ROW_HEIGHT: f64 = 8.0;

/// 图表显示缩放（2400x900 @ 300 DPI → 约 171x64 mm）
const CHART_SCALE: f64 = 0.84;
const CHART_DPI: f64 = 300.0;
const CHART_HEIGHT_MM: f64 = 900.0 / CHART_DPI * 25.4 * CHART_SCALE;

// ==========================================
// ReportAssembler - PDF 装配器
// ==========================================
pub struct ReportAssembler;

impl ReportAssembler {
    /// 装配报告并写入 out_path
    pub fn build(
        kpi: &KpiReport,
        charts: &ChartSet,
        config: &ReportConfig,
        out_path: &Path,
    ) -> ReportResult<()> {
        let title = match &config.battery_id {
            Some(id) => format!("Relazione tecnica - Batteria {}", id),
            None => "Relazione tecnica - Batteria".to_string(),
        };

        let (doc, page1, layer1) =
            PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Render(e.to_string()))?;

        // ===== 第 1 页: 标题 + 元信息 + KPI 表格 =====
        let layer = doc.get_page(page1).get_layer(layer1);
        let mut y = PAGE_HEIGHT - 25.0;

        layer.use_text(title.as_str(), 18.0, Mm(MARGIN as f32), Mm(y as f32), &font_bold);
        y -= 4.0;
        hline(&layer, MARGIN, PAGE_WIDTH - MARGIN, y, 0.8);
        y -= 9.0;

        // 元信息行
        if let Some(customer) = &config.customer {
            layer.use_text(
                format!("Cliente: {}", customer),
                11.0,
                Mm(MARGIN as f32),
                Mm(y as f32),
                &font,
            );
            y -= 6.0;
        }
        layer.use_text(
            format!("Capacita nominale: {:.0} Ah", config.nominal_capacity_ah),
            11.0,
            Mm(MARGIN as f32),
            Mm(y as f32),
            &font,
        );
        y -= 6.0;
        layer.use_text(
            format!("Data relazione: {}", Local::now().format("%Y-%m-%d")),
            11.0,
            Mm(MARGIN as f32),
            Mm(y as f32),
            &font,
        );
        y -= 12.0;

        layer.use_text("1. Indici chiave", 14.0, Mm(MARGIN as f32), Mm(y as f32), &font_bold);
        y -= 8.0;

        draw_kpi_table(&layer, &font, &font_bold, kpi, y);

        // ===== 第 2 页: 图表 =====
        let (page2, layer2) = doc.add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
        let layer = doc.get_page(page2).get_layer(layer2);
        let mut y = PAGE_HEIGHT - 25.0;

        layer.use_text("2. Grafici", 14.0, Mm(MARGIN as f32), Mm(y as f32), &font_bold);
        y -= 10.0;

        y = embed_chart(
            &layer,
            &font,
            "Ah caricati / scaricati per ciclo",
            &charts.ah_cycle,
            y,
        )?;
        embed_chart(
            &layer,
            &font,
            "Temperatura massima per ciclo (soglia 45 °C)",
            &charts.tmax_cycle,
            y,
        )?;

        // 落盘
        let file = File::create(out_path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| ReportError::Render(e.to_string()))?;

        tracing::info!(path = %out_path.display(), "PDF 报告已生成");
        Ok(())
    }
}

/// KPI 值格式化: 计数取整 / 比率 2 位小数 / 温度 1 位小数 / 未定义 "n/d"
pub fn format_value(value: &KpiValue) -> String {
    match value {
        KpiValue::Count(n) => n.to_string(),
        KpiValue::Ratio(r) => format!("{:.2}", r),
        KpiValue::Temperature(t) => format!("{:.1}", t),
        KpiValue::Undefined => "n/d".to_string(),
    }
}

/// 绘制 KPI 表格（含网格线），返回表格下缘的 y 坐标
fn draw_kpi_table(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    kpi: &KpiReport,
    top_y: f64,
) -> f64 {
    let with_targets = kpi.has_targets();

    // 列布局: 指标名 / 值，Extended 预设追加 目标 / 状态
    let col_widths: Vec<f64> = if with_targets {
        vec![90.0, 30.0, 30.0, 30.0]
    } else {
        vec![120.0, 60.0]
    };
    let mut header = vec!["Indicatore".to_string(), "Valore".to_string()];
    if with_targets {
        header.push("Soglia".to_string());
        header.push("Stato".to_string());
    }

    let mut rows: Vec<Vec<String>> = vec![header];
    for entry in kpi.entries() {
        let mut row = vec![entry.label.clone(), format_value(&entry.value)];
        if with_targets {
            row.push(entry.target.clone().unwrap_or_else(|| "-".to_string()));
            row.push(
                entry
                    .status
                    .map(|s| s.as_report_str().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
        rows.push(row);
    }

    let table_width: f64 = col_widths.iter().sum();
    let bottom_y = top_y - rows.len() as f64 * ROW_HEIGHT;

    // 单元格文本（表头加粗）
    for (row_idx, row) in rows.iter().enumerate() {
        let cell_font = if row_idx == 0 { font_bold } else { font };
        let text_y = top_y - row_idx as f64 * ROW_HEIGHT - 5.5;
        let mut x = MARGIN;
        for (col_idx, cell) in row.iter().enumerate() {
            layer.use_text(cell.as_str(), 10.0, Mm((x + 2.0) as f32), Mm(text_y as f32), cell_font);
            x += col_widths[col_idx];
        }
    }

    // 网格线
    for row_idx in 0..=rows.len() {
        let line_y = top_y - row_idx as f64 * ROW_HEIGHT;
        hline(layer, MARGIN, MARGIN + table_width, line_y, 0.25);
    }
    let mut x = MARGIN;
    vline(layer, x, bottom_y, top_y, 0.25);
    for width in &col_widths {
        x += width;
        vline(layer, x, bottom_y, top_y, 0.25);
    }

    bottom_y
}

/// 嵌入单张图表（标题 + 图片），返回下一段落的 y 坐标
fn embed_chart(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    caption: &str,
    image_path: &Path,
    top_y: f64,
) -> ReportResult<f64> {
    layer.use_text(caption, 12.0, Mm(MARGIN as f32), Mm(top_y as f32), font);
    let image_bottom = top_y - 6.0 - CHART_HEIGHT_MM;

    let file = File::open(image_path).map_err(|e| {
        ReportError::Render(format!("图表图片不可读 {}: {}", image_path.display(), e))
    })?;
    let decoder = printpdf::image_crate::codecs::png::PngDecoder::new(std::io::BufReader::new(
        file,
    ))
    .map_err(|e| ReportError::Render(e.to_string()))?;
    let image = printpdf::Image::try_from(decoder).map_err(|e| ReportError::Render(e.to_string()))?;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN as f32)),
            translate_y: Some(Mm(image_bottom as f32)),
            scale_x: Some(CHART_SCALE as f32),
            scale_y: Some(CHART_SCALE as f32),
            dpi: Some(CHART_DPI as f32),
            ..Default::default()
        },
    );

    Ok(image_bottom - 12.0)
}

/// 水平线
fn hline(layer: &PdfLayerReference, x0: f64, x1: f64, y: f64, thickness: f64) {
    stroke_line(layer, Point::new(Mm(x0 as f32), Mm(y as f32)), Point::new(Mm(x1 as f32), Mm(y as f32)), thickness);
}

/// 垂直线
fn vline(layer: &PdfLayerReference, x: f64, y0: f64, y1: f64, thickness: f64) {
    stroke_line(layer, Point::new(Mm(x as f32), Mm(y0 as f32)), Point::new(Mm(x as f32), Mm(y1 as f32)), thickness);
}

fn stroke_line(layer: &PdfLayerReference, from: Point, to: Point, thickness: f64) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.1, 0.1, 0.1, None)));
    layer.set_outline_thickness(thickness as f32);
    layer.add_line(Line {
        points: vec![(from, false), (to, false)],
        is_closed: false,
    });
}
