//! Cleaner 类型定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 处理阶段标识
///
/// 配置中以 snake_case 字符串出现（如 `"diacritic_normalizer"`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    /// 去除变音符号 + 字形统一
    DiacriticNormalizer,
    /// 缩写展开
    AbbreviationExpander,
    /// 数字字形转换
    NumeralConverter,
    /// 空白折叠
    WhitespaceCollapser,
    /// ASCII 音译（有损）
    AsciiTransliterator,
    /// 小写化
    CaseFolder,
    /// Unicode 兼容归一化 (NFKC)
    UnicodeCompat,
    /// 去除首尾空白
    Trimmer,
}

impl StageId {
    pub const ALL: [StageId; 8] = [
        StageId::DiacriticNormalizer,
        StageId::AbbreviationExpander,
        StageId::NumeralConverter,
        StageId::WhitespaceCollapser,
        StageId::AsciiTransliterator,
        StageId::CaseFolder,
        StageId::UnicodeCompat,
        StageId::Trimmer,
    ];

    /// 配置中使用的标识名
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::DiacriticNormalizer => "diacritic_normalizer",
            StageId::AbbreviationExpander => "abbreviation_expander",
            StageId::NumeralConverter => "numeral_converter",
            StageId::WhitespaceCollapser => "whitespace_collapser",
            StageId::AsciiTransliterator => "ascii_transliterator",
            StageId::CaseFolder => "case_folder",
            StageId::UnicodeCompat => "unicode_compat",
            StageId::Trimmer => "trimmer",
        }
    }

    /// 对自身输出再次调用是否结果不变
    ///
    /// 缩写展开存在链式替换，数字转换在源/目标字形集相交时也可能继续变化
    pub fn is_idempotent(&self) -> bool {
        match self {
            StageId::AbbreviationExpander | StageId::NumeralConverter => false,
            _ => true,
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// 命名的处理流程
///
/// 阶段以字符串给出，构建 registry 时才解析，未知标识在构建时报错
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub stages: Vec<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, stages: &[StageId]) -> Self {
        Self {
            name: name.into(),
            stages: stages.iter().map(|s| s.as_str().to_string()).collect(),
        }
    }
}

/// 单个阶段的执行记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTrace {
    pub stage: StageId,
    /// 该阶段是否改动了文本
    pub changed: bool,
}

/// 规范化结果（带阶段追踪）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationResult {
    /// 规范化后的文本
    pub text: String,
    /// 是否有改动
    pub changed: bool,
    /// 按执行顺序排列的阶段记录
    pub stages: Vec<StageTrace>,
    /// 处理耗时（微秒）
    pub elapsed_us: u64,
}

/// 解析逗号分隔的 profile 列表
///
/// `"basic, full"` -> `["basic", "full"]`，空段忽略
pub fn parse_profile_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_id_round_trip_names() {
        for id in StageId::ALL {
            assert_eq!(id.as_str().parse::<StageId>(), Ok(id));
        }
        assert_eq!(
            "unknown_stage".parse::<StageId>(),
            Err("unknown_stage".to_string())
        );
    }

    #[test]
    fn test_stage_id_serde_matches_as_str() {
        let json = serde_json::to_string(&StageId::WhitespaceCollapser).unwrap();
        assert_eq!(json, "\"whitespace_collapser\"");
    }

    #[test]
    fn test_idempotence_flags() {
        assert!(StageId::WhitespaceCollapser.is_idempotent());
        assert!(StageId::DiacriticNormalizer.is_idempotent());
        assert!(!StageId::AbbreviationExpander.is_idempotent());
    }

    #[test]
    fn test_parse_profile_list() {
        assert_eq!(parse_profile_list("basic, full"), vec!["basic", "full"]);
        assert_eq!(parse_profile_list(" full ,, "), vec!["full"]);
        assert!(parse_profile_list("").is_empty());
    }
}
