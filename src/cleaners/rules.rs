//! Cleaner 规则定义
//!
//! 包含缩写词典、数字字形映射表、内置 profile

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::cleaners::error::ConstructionError;
use crate::cleaners::types::{Profile, StageId};

lazy_static::lazy_static! {
    static ref WORD_CHAR_RE: Regex = Regex::new(r"^\w$").expect("word char regex");
}

/// 缩写规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationRule {
    /// 缩写（整词匹配）
    pub pattern: String,
    /// 展开后的文本（按字面替换）
    pub replacement: String,
    /// 是否区分大小写（默认不区分）
    #[serde(default)]
    pub case_sensitive: bool,
}

impl AbbreviationRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

/// 缩写词典（有序）
///
/// 未校验的原始数据，`compile()` 后才能用于展开
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbbreviationDictionary {
    rules: Vec<AbbreviationRule>,
}

impl AbbreviationDictionary {
    pub fn new(rules: Vec<AbbreviationRule>) -> Self {
        Self { rules }
    }

    /// 从 (缩写, 展开) 对构建，全部不区分大小写
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(pattern, replacement)| AbbreviationRule::new(*pattern, *replacement))
                .collect(),
        )
    }

    pub fn push(&mut self, rule: AbbreviationRule) {
        self.rules.push(rule);
    }

    pub fn extend(&mut self, other: AbbreviationDictionary) {
        self.rules.extend(other.rules);
    }

    pub fn rules(&self) -> &[AbbreviationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 校验并预编译
    ///
    /// 空模式、重复模式（字符串完全相同）均为配置错误
    pub fn compile(&self) -> Result<CompiledAbbreviations, ConstructionError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.rules.len());
        let mut compiled = Vec::with_capacity(self.rules.len());

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.pattern.trim().is_empty() {
                return Err(ConstructionError::EmptyPattern { index });
            }
            if !seen.insert(rule.pattern.as_str()) {
                return Err(ConstructionError::DuplicatePattern(rule.pattern.clone()));
            }

            let regex = RegexBuilder::new(&word_bounded(&rule.pattern))
                .case_insensitive(!rule.case_sensitive)
                .build()
                .map_err(|e| ConstructionError::InvalidPattern {
                    pattern: rule.pattern.clone(),
                    reason: e.to_string(),
                })?;

            compiled.push(CompiledRule {
                regex,
                replacement: rule.replacement.clone(),
                check_before: !rule.pattern.chars().next().is_some_and(is_word_char),
                check_after: !rule.pattern.chars().last().is_some_and(is_word_char),
            });
        }

        Ok(CompiledAbbreviations { rules: compiled })
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    replacement: String,
    /// 模式以标点开头：匹配前一个字符必须是文本开头或非单词字符
    check_before: bool,
    /// 模式以标点结尾：匹配后一个字符必须是文本结尾或非单词字符
    check_after: bool,
}

impl CompiledRule {
    /// 对文本做一次全局替换，无匹配返回 None
    ///
    /// regex 不支持环视，标点一侧的边界在这里逐个匹配手动检查；
    /// 被拒绝的匹配只前进一个字符，不会漏掉重叠位置上的合法匹配
    fn replace_all(&self, text: &str) -> Option<String> {
        let mut result = String::new();
        let mut last_end = 0;
        let mut pos = 0;
        let mut changed = false;

        while pos < text.len() {
            let Some(m) = self.regex.find_at(text, pos) else {
                break;
            };

            if self.is_isolated(text, m.start(), m.end()) {
                result.push_str(&text[last_end..m.start()]);
                result.push_str(&self.replacement);
                last_end = m.end();
                changed = true;
                pos = m.end();
            } else {
                pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            }
        }

        if !changed {
            return None;
        }
        result.push_str(&text[last_end..]);
        Some(result)
    }

    fn is_isolated(&self, text: &str, start: usize, end: usize) -> bool {
        let before_ok =
            !self.check_before || !text[..start].chars().next_back().is_some_and(is_word_char);
        let after_ok = !self.check_after || !text[end..].chars().next().is_some_and(is_word_char);
        before_ok && after_ok
    }
}

/// 预编译的缩写词典（只读，可跨线程共享）
#[derive(Debug, Clone, Default)]
pub struct CompiledAbbreviations {
    rules: Vec<CompiledRule>,
}

impl CompiledAbbreviations {
    /// 按词典顺序逐条替换
    ///
    /// 每条规则对当前文本做一次全局替换，前一条的输出是后一条的输入（链式）
    pub fn expand(&self, text: &str) -> String {
        let mut result = text.to_string();

        for rule in &self.rules {
            if let Some(replaced) = rule.replace_all(&result) {
                result = replaced;
            }
        }

        result
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 构造整词匹配正则
///
/// 边缘为单词字符的一侧用 `\b`；标点一侧由 `CompiledRule::is_isolated` 检查
fn word_bounded(pattern: &str) -> String {
    let escaped = regex::escape(pattern);
    let starts_with_word = pattern.chars().next().is_some_and(is_word_char);
    let ends_with_word = pattern.chars().last().is_some_and(is_word_char);

    let mut result = String::with_capacity(escaped.len() + 4);
    if starts_with_word {
        result.push_str(r"\b");
    }
    result.push_str(&escaped);
    if ends_with_word {
        result.push_str(r"\b");
    }
    result
}

/// 与 regex 的 Unicode `\w` 保持一致
fn is_word_char(ch: char) -> bool {
    let mut buf = [0u8; 4];
    WORD_CHAR_RE.is_match(ch.encode_utf8(&mut buf))
}

/// 数字字形映射表
///
/// `source` 第 i 个字形映射到 `target` 第 i 个字形
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumeralTable {
    pub source: String,
    pub target: String,
}

impl NumeralTable {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// 校验为完整的 10 位映射
    pub fn compile(&self) -> Result<NumeralMap, ConstructionError> {
        let source: Vec<char> = self.source.chars().collect();
        let target: Vec<char> = self.target.chars().collect();

        if source.len() != 10 || target.len() != 10 {
            return Err(ConstructionError::IncompleteNumeralTable {
                source_len: source.len(),
                target_len: target.len(),
            });
        }

        let mut pairs = [('\0', '\0'); 10];
        for (i, (&from, &to)) in source.iter().zip(target.iter()).enumerate() {
            if pairs[..i].iter().any(|(seen, _)| *seen == from) {
                return Err(ConstructionError::DuplicateNumeral(from));
            }
            pairs[i] = (from, to);
        }

        Ok(NumeralMap { pairs })
    }
}

impl Default for NumeralTable {
    fn default() -> Self {
        eastern_arabic_numerals()
    }
}

/// 已校验的数字映射（恰好 10 对）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumeralMap {
    pairs: [(char, char); 10],
}

impl NumeralMap {
    /// 查询单个字形的映射，非源字形返回 None
    pub fn get(&self, ch: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(from, _)| *from == ch)
            .map(|(_, to)| *to)
    }

    /// 源字形集合（按表顺序）
    pub fn source_digits(&self) -> impl Iterator<Item = char> + '_ {
        self.pairs.iter().map(|(from, _)| *from)
    }
}

/// 埃及阿拉伯语常用称谓缩写
///
/// 注意：`full` profile 先做字形统一（`أ` -> `ا`），`أ` 规则在该流程中不会命中，
/// 仅在不含 diacritic_normalizer 的自定义 profile 中生效
pub fn egyptian_abbreviations() -> AbbreviationDictionary {
    AbbreviationDictionary::from_pairs(&[
        ("د", "دكتور"),
        ("أ", "أستاذ"),
        ("م", "مهندس"),
        ("س", "سيد"),
        ("سيدة", "مدام"),
        ("ش", "شيخ"),
        ("ب", "باشا"),
    ])
}

/// 东阿拉伯-印度数字 -> 西阿拉伯数字
pub fn eastern_arabic_numerals() -> NumeralTable {
    NumeralTable::new("٠١٢٣٤٥٦٧٨٩", "0123456789")
}

/// 内置 profile
pub fn default_profiles() -> Vec<Profile> {
    vec![
        Profile::new(
            "basic",
            &[StageId::DiacriticNormalizer, StageId::WhitespaceCollapser],
        ),
        // 预留：后续在此插入 ASCII 音译
        Profile::new(
            "transliteration",
            &[StageId::DiacriticNormalizer, StageId::WhitespaceCollapser],
        ),
        Profile::new(
            "full",
            &[
                StageId::DiacriticNormalizer,
                StageId::AbbreviationExpander,
                StageId::NumeralConverter,
                StageId::WhitespaceCollapser,
            ],
        ),
        Profile::new(
            "ascii",
            &[
                StageId::AsciiTransliterator,
                StageId::CaseFolder,
                StageId::WhitespaceCollapser,
            ],
        ),
    ]
}
