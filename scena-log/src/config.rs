//! 日志配置
//!
//! 提供便捷的日志初始化配置。

use crate::logger::{StderrSink, StdoutSink};
use crate::{Level, LogRingBuffer, Logger};
use std::sync::Arc;

/// 日志输出目标配置
#[derive(Clone, Debug, PartialEq)]
pub enum OutputConfig {
    /// 输出到标准输出
    Stdout,
    /// 输出到标准错误
    Stderr,
    /// 输出到环形缓冲区（容量）
    RingBuffer(usize),
}

/// 日志配置
///
/// 用于一键初始化日志系统
///
/// # 示例
///
/// ```
/// use scena_log::{LogConfig, Level};
///
/// let config = LogConfig::new(Level::Debug).with_ring_buffer(10000);
/// let (logger, ring) = config.init();
/// assert!(ring.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// 日志级别
    pub level: Level,
    /// 输出目标列表
    pub outputs: Vec<OutputConfig>,
}

impl LogConfig {
    /// 创建默认配置（指定级别，无输出）
    pub fn new(level: Level) -> Self {
        LogConfig {
            level,
            outputs: Vec::new(),
        }
    }

    /// 开发环境推荐配置
    ///
    /// - Debug 级别
    /// - 输出到 stdout
    /// - 环形缓冲区 10000 条（用于崩溃转储）
    pub fn dev() -> Self {
        LogConfig {
            level: Level::Debug,
            outputs: vec![OutputConfig::Stdout, OutputConfig::RingBuffer(10000)],
        }
    }

    /// 生产环境推荐配置
    ///
    /// - Warn 级别
    /// - 输出到 stderr
    /// - 环形缓冲区 1000 条
    pub fn production() -> Self {
        LogConfig {
            level: Level::Warn,
            outputs: vec![OutputConfig::Stderr, OutputConfig::RingBuffer(1000)],
        }
    }

    /// 测试环境配置（静默）
    pub fn test() -> Self {
        LogConfig {
            level: Level::Error,
            outputs: Vec::new(),
        }
    }

    /// 添加 stdout 输出
    pub fn with_stdout(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stdout) {
            self.outputs.push(OutputConfig::Stdout);
        }
        self
    }

    /// 添加 stderr 输出
    pub fn with_stderr(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stderr) {
            self.outputs.push(OutputConfig::Stderr);
        }
        self
    }

    /// 添加环形缓冲区输出
    pub fn with_ring_buffer(mut self, capacity: usize) -> Self {
        self.outputs.push(OutputConfig::RingBuffer(capacity));
        self
    }

    /// 初始化日志系统
    ///
    /// 返回 logger 以及环形缓冲区句柄（如果配置了的话）
    pub fn init(&self) -> (Arc<Logger>, Option<Arc<LogRingBuffer>>) {
        let logger = Logger::new(self.level);
        let mut ring = None;

        for output in &self.outputs {
            match output {
                OutputConfig::Stdout => logger.add_sink(StdoutSink),
                OutputConfig::Stderr => logger.add_sink(StderrSink),
                OutputConfig::RingBuffer(capacity) => {
                    let buffer = LogRingBuffer::new(*capacity);
                    logger.add_sink(buffer.clone());
                    ring = Some(buffer);
                }
            }
        }

        (logger, ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_with_ring_buffer() {
        let (logger, ring) = LogConfig::new(Level::Debug).with_ring_buffer(8).init();
        let ring = ring.expect("ring buffer configured");

        logger.log(Level::Info, "test", "hello");
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_silent_config() {
        let (logger, ring) = LogConfig::test().init();
        assert!(ring.is_none());
        assert_eq!(logger.level(), Level::Error);
    }

    #[test]
    fn test_with_stdout_deduplicates() {
        let config = LogConfig::new(Level::Info).with_stdout().with_stdout();
        assert_eq!(config.outputs.len(), 1);
    }
}
