//! Dobbe - 牙科 X 光 DICOM 检测工作台
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - DICOM Context: 已注册文件、栅格图像
//! - Detection Context: 检测框、元数据、批次进度状态机、诊断报告
//!
//! 应用层 (application/):
//! - Ports: 端口定义（DetectionEngine, ReportGenerator, RasterDecoder, FileRegistry, DetectionTracker）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: FileRegistry 内存实现
//! - Worker: DetectionTracker 并发检测
//! - Adapters: HTTP / Fake 检测客户端, DICOM 栅格解码器
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
