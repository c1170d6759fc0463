//! scena-log - 结构化日志系统
//!
//! 为 Scena 脚本引擎设计的结构化日志系统，特点：
//! - **显式传递**：无全局 logger，`Arc<Logger>` 通过参数传入
//! - **非阻塞**：sink 写入不做 IO 重试，满了覆盖旧数据
//! - **崩溃恢复**：环形缓冲区保留最后 N 条日志，可在故障时转储
//!
//! # 快速开始
//!
//! ```
//! use scena_log::{debug, Level, LogConfig};
//!
//! let (logger, ring) = LogConfig::new(Level::Debug).with_ring_buffer(1000).init();
//! debug!(logger, "脚本引擎启动, tick = {}", 0);
//! assert_eq!(ring.unwrap().len(), 1);
//! ```

pub mod config;
pub mod logger;
pub mod macros;
pub mod record;
pub mod ring_buffer;

pub use config::LogConfig;
pub use logger::{LogSink, Logger};
pub use record::{Level, Record};
pub use ring_buffer::{LogRingBuffer, RingBufferStats};
