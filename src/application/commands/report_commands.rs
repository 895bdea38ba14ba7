//! Report Commands

/// 生成诊断报告命令（基于文件当前的成功检测结果）
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub file_id: String,
}
