//! Detection Commands

/// 开始检测命令
#[derive(Debug, Clone, Default)]
pub struct StartDetection {
    /// 要检测的文件 ID（按此顺序提交）；为 None 时提交全部已注册文件
    pub file_ids: Option<Vec<String>>,
    /// 是否等待批次结束
    pub wait: bool,
}

/// 重置检测结果命令
#[derive(Debug, Clone)]
pub struct ResetDetection;
