// 语音合成前端文本规范化
//
// 模块：
// - cleaners: 处理阶段、缩写词典、profile 注册表与执行器
// - config: JSON 配置加载/保存
// - dictionary_utils: 平面缩写词典文件解析

pub mod cleaners;
pub mod config;
pub mod dictionary_utils;

pub use cleaners::{
    build_registry, default_registry, CleanerError, ConstructionError, Registry, StageId,
};
pub use config::CleanerConfig;

/// 初始化日志（输出到 stderr，stdout 只留给规范化结果）
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
}
