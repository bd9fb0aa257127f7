// ==========================================
// 电池循环测试报告生成系统 - 顶层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 策略: 单元格级别的转换失败降级为缺失值（见 importer），
//       硬失败（文件不可读 / 渲染目标不可写）中止整条流水线
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use thiserror::Error;

/// 报告流水线错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    /// 输入文件无法解析为表格（FormatError）
    #[error("输入文件格式错误: {0}")]
    Format(#[from] ImportError),

    /// 报告配置无效
    #[error("配置无效: {0}")]
    Config(#[from] ConfigError),

    /// 图表或 PDF 文档生成失败（RenderError）
    #[error("渲染失败: {0}")]
    Render(String),

    /// 底层 IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;
