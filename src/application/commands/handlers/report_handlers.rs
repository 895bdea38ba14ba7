//! Report Command Handlers

use std::sync::Arc;

use crate::application::commands::GenerateReport;
use crate::application::error::ApplicationError;
use crate::application::ports::{DetectionTrackerPort, ReportGeneratorPort};
use crate::domain::detection::{DiagnosticReportRequest, DiagnosticReportResponse, FileStatus};

/// GenerateReport Handler
///
/// 使用文件当前批次中的成功检测结果生成报告；报告失败只影响本次调用
pub struct GenerateReportHandler {
    tracker: Arc<dyn DetectionTrackerPort>,
    report_generator: Arc<dyn ReportGeneratorPort>,
}

impl GenerateReportHandler {
    pub fn new(
        tracker: Arc<dyn DetectionTrackerPort>,
        report_generator: Arc<dyn ReportGeneratorPort>,
    ) -> Self {
        Self {
            tracker,
            report_generator,
        }
    }

    pub async fn handle(&self, command: GenerateReport) -> Result<DiagnosticReportResponse, ApplicationError> {
        let snapshot = self.tracker.current_snapshot();
        let entry = snapshot
            .find(&command.file_id)
            .ok_or_else(|| ApplicationError::not_found("Detection result", &command.file_id))?;

        let result = match (&entry.status, &entry.result) {
            (FileStatus::Success, Some(result)) => result,
            _ => {
                return Err(ApplicationError::invalid_state(format!(
                    "Detection for {} is {}, report requires a successful detection",
                    command.file_id,
                    entry.status.as_str()
                )))
            }
        };

        let request = DiagnosticReportRequest::from(result.response.clone());
        let detections = request.predictions.len();

        let response = self.report_generator.generate(request).await.map_err(|e| {
            tracing::warn!(file_id = %command.file_id, error = %e, "Diagnostic report generation failed");
            ApplicationError::from(e)
        })?;

        tracing::info!(
            file_id = %command.file_id,
            detections = detections,
            severity = response.diagnostic_report.severity_level.as_str(),
            "Diagnostic report generated"
        );

        Ok(response)
    }
}
