//! Cleaners - 语音合成前端的文本规范化层
//!
//! 将原始文本转换为确定的规范形式，供下游音素化/分词使用。
//!
//! ## 处理阶段
//! 1. 变音符号去除 + 字形统一
//! 2. 缩写展开（词典驱动，整词匹配，链式替换）
//! 3. 数字字形转换（如 ١٢٣ -> 123）
//! 4. 空白折叠
//! 5. ASCII 音译 / 小写化 / NFKC / 去首尾空白（可选）
//!
//! 阶段通过命名 profile 组合，registry 构建一次后只读。

mod engine;
mod error;
mod rules;
pub mod stages;
mod types;

pub use engine::{build_registry, default_registry, Registry};
pub use error::{CleanerError, ConstructionError};
pub use rules::{
    default_profiles, eastern_arabic_numerals, egyptian_abbreviations, AbbreviationDictionary,
    AbbreviationRule, CompiledAbbreviations, NumeralMap, NumeralTable,
};
pub use stages::{
    collapse_whitespace, compat_normalize, convert_numerals, convert_to_ascii,
    expand_abbreviations, lowercase, normalize_script, trim,
};
pub use types::{parse_profile_list, NormalizationResult, Profile, StageId, StageTrace};
