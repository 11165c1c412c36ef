//! Cleaner 错误类型

/// registry 构建期错误
///
/// 任一错误都会阻止 registry 构建，不存在“部分可用”的 registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    /// profile 引用了未注册的阶段
    #[error("profile `{profile}` 引用了未注册的阶段 `{stage}`")]
    UnknownStage { profile: String, stage: String },

    /// profile 名重复
    #[error("profile 名重复: `{0}`")]
    DuplicateProfile(String),

    /// 缩写模式为空
    #[error("第 {index} 条缩写规则的模式为空")]
    EmptyPattern { index: usize },

    /// 缩写模式重复
    #[error("缩写模式重复: `{0}`")]
    DuplicatePattern(String),

    /// 缩写模式无法编译
    #[error("缩写模式 `{pattern}` 编译失败: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// 数字映射表不完整（源/目标都必须恰好 10 个字形）
    #[error("数字映射表需要 10 个字形，源 {source_len} 个，目标 {target_len} 个")]
    IncompleteNumeralTable {
        source_len: usize,
        target_len: usize,
    },

    /// 数字映射表源字形重复
    #[error("数字映射表源字形重复: `{0}`")]
    DuplicateNumeral(char),
}

/// Cleaner 错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CleanerError {
    /// 调用时传入了未注册的 profile
    #[error("未知 profile: `{0}`")]
    UnknownProfile(String),

    /// 构建期错误
    #[error("pipeline 构建失败: {0}")]
    PipelineConstruction(#[from] ConstructionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CleanerError::UnknownProfile("nonexistent".to_string());
        assert_eq!(err.to_string(), "未知 profile: `nonexistent`");

        let err: CleanerError = ConstructionError::DuplicatePattern("dr".to_string()).into();
        assert_eq!(err.to_string(), "pipeline 构建失败: 缩写模式重复: `dr`");
    }

    #[test]
    fn test_incomplete_table_display() {
        let err = ConstructionError::IncompleteNumeralTable {
            source_len: 9,
            target_len: 10,
        };
        assert!(err.to_string().contains("源 9 个"));
    }
}
