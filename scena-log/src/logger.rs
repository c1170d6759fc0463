//! 日志器实现

use crate::record::{Level, Record};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

/// 日志输出目标 trait
pub trait LogSink: Send + Sync {
    /// 写入日志记录
    fn write(&self, record: &Record);
}

/// 标准输出 sink
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, record: &Record) {
        println!("{}", record.format());
    }
}

/// 标准错误 sink
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, record: &Record) {
        eprintln!("{}", record.format());
    }
}

/// 日志器配置和状态
pub struct Logger {
    /// 当前日志级别（原子存储，可动态调整）
    level: AtomicU8,
    /// 输出目标列表
    sinks: Mutex<Vec<Box<dyn LogSink>>>,
}

impl Logger {
    /// 创建新的日志器
    pub fn new(level: Level) -> Arc<Self> {
        Arc::new(Logger {
            level: AtomicU8::new(level as u8),
            sinks: Mutex::new(Vec::new()),
        })
    }

    /// 添加输出目标
    pub fn with_sink<S: LogSink + 'static>(self: Arc<Self>, sink: S) -> Arc<Self> {
        self.add_sink(sink);
        self
    }

    /// 添加 sink（内部方法，用于 config）
    pub fn add_sink<S: LogSink + 'static>(&self, sink: S) {
        let mut sinks = self.sinks.lock().expect("logger sink lock poisoned");
        sinks.push(Box::new(sink));
    }

    /// 动态设置日志级别
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// 获取当前日志级别
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Info)
    }

    /// 检查指定级别是否启用
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// 记录日志（内部方法，宏展开后调用）
    #[inline(never)]
    pub fn log(&self, level: Level, target: &'static str, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }

        let record = Record::new(level, target, message);

        let sinks = self.sinks.lock().expect("logger sink lock poisoned");
        for sink in sinks.iter() {
            sink.write(&record);
        }
    }

    /// 创建禁用日志的 no-op 日志器（用于测试或禁用场景）
    pub fn noop() -> Arc<Self> {
        // Error 级别且没有任何 sink
        Self::new(Level::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring_buffer::LogRingBuffer;

    #[test]
    fn test_level_filtering() {
        let ring = LogRingBuffer::new(16);
        let logger = Logger::new(Level::Warn).with_sink(ring.clone());

        logger.log(Level::Debug, "test", "filtered");
        logger.log(Level::Error, "test", "kept");

        let records = ring.dump_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Error);
    }

    #[test]
    fn test_dynamic_level() {
        let ring = LogRingBuffer::new(16);
        let logger = Logger::new(Level::Error).with_sink(ring.clone());

        logger.log(Level::Info, "test", "dropped");
        logger.set_level(Level::Info);
        logger.log(Level::Info, "test", "kept");

        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_noop_logger_has_no_sinks() {
        let logger = Logger::noop();
        // 没有 sink，写入不应 panic
        logger.log(Level::Error, "test", "discarded");
        assert_eq!(logger.level(), Level::Error);
    }
}
