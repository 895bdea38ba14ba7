//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（DetectionEngine、ReportGenerator、RasterDecoder、FileRegistry、DetectionTracker）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // File commands
    ClearFiles,
    RegisterFile,
    RemoveFile,
    RenameFile,
    UploadPolicy,
    // Detection commands
    ResetDetection,
    StartDetection,
    // Report commands
    GenerateReport,
    // Handlers
    handlers::{
        ClearFilesHandler, GenerateReportHandler, RegisterFileHandler, RemoveFileHandler,
        RenameFileHandler, ResetDetectionHandler, StartDetectionHandler, StartDetectionResponse,
    },
};

pub use error::ApplicationError;

pub use ports::{
    BatchHandle, DecodeError, DetectRequest, DetectionEnginePort, DetectionError,
    DetectionTrackerPort, FileRegistryPort, RasterDecoderPort, ReportError, ReportGeneratorPort,
};

pub use queries::{
    GetDetectionProgress,
    GetFile,
    ListFiles,
    // Handlers
    handlers::{
        DetectionProgressResponse, FileSummary, GetDetectionProgressHandler, GetFileHandler,
        ListFilesHandler,
    },
};
