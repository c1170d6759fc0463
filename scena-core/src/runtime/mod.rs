//! 解释器运行时
//!
//! 模块划分：
//! - `cursor`：指令流游标（小端定宽读取）
//! - `frames`：调用帧栈（上限 20 层）
//! - `context`：单个脚本的运行时状态
//! - `command`：命令派发契约与命令表
//! - `commands`：标准字段命令集
//! - `resolver`：变量/旗标解析契约与双层存储
//! - `vm`：派发循环与 tick 状态机
//! - `error`：脚本级错误

pub mod command;
pub mod commands;
pub mod context;
pub mod cursor;
pub mod error;
pub mod frames;
pub mod resolver;
pub mod vm;

pub use command::{Command, CommandTable, Control, PendingCommand, PollStatus};
pub use context::{ActorId, ScriptContext, ScriptStatus};
pub use cursor::Cursor;
pub use error::ScriptError;
pub use frames::FrameStack;
pub use resolver::{TwoTierStore, VariableResolver};
pub use vm::{Interpreter, TickOutcome};
