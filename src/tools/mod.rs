//! 工具系统
//!
//! 工具集合在编译期就已确定，因此用枚举 [`WeatherTool`] 表示，而不是按名字
//! 动态注册。模型的调用请求经 [`ToolRequest::parse`] 转成强类型请求后再执行。

mod weather;

pub use weather::{ToolOutcome, ToolRequest, WeatherTool};

use std::collections::HashMap;

pub type ToolParameters = HashMap<String, serde_json::Value>;
