//! Event Publisher Implementation
//!
//! 文件注册表与检测进度的事件推送（WebSocket 和进程内观察者共用）

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::domain::detection::DetectionProgress;

/// 事件通道容量
const CHANNEL_CAPACITY: usize = 256;

/// 事件类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 文件已注册
    FileRegistered {
        file_id: String,
        file_name: String,
        width: u32,
        height: u32,
    },
    /// 文件已更新
    FileUpdated {
        file_id: String,
        file_name: String,
    },
    /// 文件已移除
    FileRemoved {
        file_id: String,
    },
    /// 文件已清空
    FilesCleared {
        count: usize,
    },
    /// 检测进度快照（每次状态迁移、新批次和重置都会发布）
    DetectionProgress {
        generation: u64,
        progress: DetectionProgress,
    },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<WsEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅所有事件
    pub fn subscribe(&self) -> broadcast::Receiver<WsEvent> {
        self.channel.subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.channel.receiver_count()
    }

    /// 发布文件注册事件
    pub fn publish_file_registered(&self, file_id: &str, file_name: &str, width: u32, height: u32) {
        self.publish(WsEvent::FileRegistered {
            file_id: file_id.to_string(),
            file_name: file_name.to_string(),
            width,
            height,
        });
    }

    /// 发布文件更新事件
    pub fn publish_file_updated(&self, file_id: &str, file_name: &str) {
        self.publish(WsEvent::FileUpdated {
            file_id: file_id.to_string(),
            file_name: file_name.to_string(),
        });
    }

    /// 发布文件移除事件
    pub fn publish_file_removed(&self, file_id: &str) {
        self.publish(WsEvent::FileRemoved {
            file_id: file_id.to_string(),
        });
    }

    /// 发布文件清空事件
    pub fn publish_files_cleared(&self, count: usize) {
        self.publish(WsEvent::FilesCleared { count });
    }

    /// 发布检测进度快照
    pub fn publish_progress(&self, generation: u64, progress: DetectionProgress) {
        self.publish(WsEvent::DetectionProgress {
            generation,
            progress,
        });
    }

    fn publish(&self, event: WsEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Event dropped (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        publisher.publish_file_registered("a-1", "a.dcm", 10, 20);
        publisher.publish_file_removed("a-1");

        match rx.recv().await.unwrap() {
            WsEvent::FileRegistered { file_id, width, .. } => {
                assert_eq!(file_id, "a-1");
                assert_eq!(width, 10);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(rx.recv().await.unwrap(), WsEvent::FileRemoved { .. }));
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let publisher = EventPublisher::new();
        publisher.publish_files_cleared(3);
    }

    #[test]
    fn test_event_serialization() {
        let event = WsEvent::DetectionProgress {
            generation: 2,
            progress: DetectionProgress::empty(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "DetectionProgress");
        assert_eq!(value["data"]["generation"], 2);
        assert_eq!(value["data"]["progress"]["is_all_complete"], true);
    }
}
