//! Cleaner 主引擎
//!
//! profile 注册表 + 顺序执行器

use std::collections::HashMap;
use std::time::Instant;

use crate::cleaners::error::{CleanerError, ConstructionError};
use crate::cleaners::rules::{
    default_profiles, eastern_arabic_numerals, egyptian_abbreviations, AbbreviationDictionary,
    CompiledAbbreviations, NumeralMap, NumeralTable,
};
use crate::cleaners::stages;
use crate::cleaners::types::{NormalizationResult, Profile, StageId, StageTrace};

lazy_static::lazy_static! {
    /// 进程级默认 registry（内置词典 + 内置 profile），首次访问时构建
    static ref DEFAULT_REGISTRY: Result<Registry, ConstructionError> = build_registry(
        &egyptian_abbreviations(),
        &eastern_arabic_numerals(),
        &default_profiles(),
    );
}

/// 获取进程级默认 registry
pub fn default_registry() -> Result<&'static Registry, ConstructionError> {
    DEFAULT_REGISTRY.as_ref().map_err(Clone::clone)
}

/// 构建 registry
///
/// 任何配置错误都会直接返回，不会得到部分可用的 registry
pub fn build_registry(
    dictionary: &AbbreviationDictionary,
    numeral_table: &NumeralTable,
    profiles: &[Profile],
) -> Result<Registry, ConstructionError> {
    let abbreviations = dictionary.compile()?;
    let numerals = numeral_table.compile()?;

    let mut resolved: HashMap<String, Vec<StageId>> = HashMap::with_capacity(profiles.len());
    let mut order = Vec::with_capacity(profiles.len());

    for profile in profiles {
        let stages = profile
            .stages
            .iter()
            .map(|stage| {
                stage
                    .parse::<StageId>()
                    .map_err(|stage| ConstructionError::UnknownStage {
                        profile: profile.name.clone(),
                        stage,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if resolved.insert(profile.name.clone(), stages).is_some() {
            return Err(ConstructionError::DuplicateProfile(profile.name.clone()));
        }
        order.push(profile.name.clone());
    }

    tracing::info!(
        "Cleaner registry 已构建: {} 个 profile, {} 条缩写规则",
        order.len(),
        abbreviations.len()
    );

    Ok(Registry {
        abbreviations,
        numerals,
        profiles: resolved,
        order,
    })
}

/// profile 注册表（构建后只读，可跨线程共享）
#[derive(Debug, Clone)]
pub struct Registry {
    abbreviations: CompiledAbbreviations,
    numerals: NumeralMap,
    profiles: HashMap<String, Vec<StageId>>,
    /// 按注册顺序的 profile 名
    order: Vec<String>,
}

impl Registry {
    /// 按 profile 规范化文本
    ///
    /// 唯一的调用期错误是 `UnknownProfile`
    pub fn normalize(&self, text: &str, profile_name: &str) -> Result<String, CleanerError> {
        let stages = self.resolve(profile_name)?;
        Ok(stages
            .iter()
            .fold(text.to_string(), |acc, stage| self.apply_stage(*stage, &acc)))
    }

    /// 依次应用多个 profile
    ///
    /// 先解析全部名称，任一未知则不执行任何阶段
    pub fn normalize_chain<S: AsRef<str>>(
        &self,
        text: &str,
        profile_names: &[S],
    ) -> Result<String, CleanerError> {
        let chain = profile_names
            .iter()
            .map(|name| self.resolve(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(chain
            .into_iter()
            .flatten()
            .fold(text.to_string(), |acc, stage| self.apply_stage(*stage, &acc)))
    }

    /// 按 profile 规范化并记录每个阶段
    pub fn normalize_traced(
        &self,
        text: &str,
        profile_name: &str,
    ) -> Result<NormalizationResult, CleanerError> {
        let start = Instant::now();
        let stages = self.resolve(profile_name)?;

        let mut current = text.to_string();
        let mut traces = Vec::with_capacity(stages.len());

        for &stage in stages {
            let next = self.apply_stage(stage, &current);
            let changed = next != current;
            tracing::debug!("[{}] 阶段 {} changed={}", profile_name, stage, changed);
            traces.push(StageTrace { stage, changed });
            current = next;
        }

        let changed = current != text;
        Ok(NormalizationResult {
            text: current,
            changed,
            stages: traces,
            elapsed_us: start.elapsed().as_micros() as u64,
        })
    }

    /// profile 对应的阶段序列
    pub fn stages(&self, profile_name: &str) -> Option<&[StageId]> {
        self.profiles.get(profile_name).map(Vec::as_slice)
    }

    /// 已注册的 profile 名（注册顺序）
    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// 数字字形映射
    pub fn numeral_map(&self) -> &NumeralMap {
        &self.numerals
    }

    pub fn contains_profile(&self, profile_name: &str) -> bool {
        self.profiles.contains_key(profile_name)
    }

    fn resolve(&self, profile_name: &str) -> Result<&[StageId], CleanerError> {
        self.stages(profile_name)
            .ok_or_else(|| CleanerError::UnknownProfile(profile_name.to_string()))
    }

    fn apply_stage(&self, stage: StageId, text: &str) -> String {
        match stage {
            StageId::DiacriticNormalizer => stages::normalize_script(text),
            StageId::AbbreviationExpander => {
                stages::expand_abbreviations(text, &self.abbreviations)
            }
            StageId::NumeralConverter => stages::convert_numerals(text, &self.numerals),
            StageId::WhitespaceCollapser => stages::collapse_whitespace(text),
            StageId::AsciiTransliterator => stages::convert_to_ascii(text),
            StageId::CaseFolder => stages::lowercase(text),
            StageId::UnicodeCompat => stages::compat_normalize(text),
            StageId::Trimmer => stages::trim(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn shipped() -> Registry {
        build_registry(
            &egyptian_abbreviations(),
            &eastern_arabic_numerals(),
            &default_profiles(),
        )
        .unwrap()
    }

    #[test]
    fn test_full_profile_end_to_end() {
        let registry = shipped();
        let result = registry.normalize("د. أحمد قال ١٢٣", "full").unwrap();
        assert_eq!(result, "دكتور. احمد قال 123");
    }

    #[test]
    fn test_full_profile_collapses_spacing() {
        let registry = shipped();
        let result = registry
            .normalize("م.  محمود\t\tدفع ٥٠  جنيه", "full")
            .unwrap();
        assert_eq!(result, "مهندس. محمود دفع 50 جنيه");
    }

    #[test]
    fn test_basic_profile_skips_abbreviations_and_numerals() {
        let registry = shipped();
        let result = registry.normalize("د.   أحمد ١٢٣", "basic").unwrap();
        assert_eq!(result, "د. احمد ١٢٣");
        assert_eq!(
            registry.normalize("د.   أحمد ١٢٣", "transliteration").unwrap(),
            result
        );
    }

    #[test]
    fn test_ascii_profile() {
        let registry = shipped();
        let result = registry.normalize("Café   NAÏVE", "ascii").unwrap();
        assert_eq!(result, "cafe naive");
    }

    #[test]
    fn test_unknown_profile() {
        let registry = shipped();
        assert_eq!(
            registry.normalize("hello", "nonexistent"),
            Err(CleanerError::UnknownProfile("nonexistent".to_string()))
        );
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let registry = shipped();
        assert_eq!(registry.normalize("", "full").unwrap(), "");
    }

    #[test]
    fn test_duplicate_pattern_fails_construction() {
        let dictionary = AbbreviationDictionary::from_pairs(&[("dr", "doctor"), ("dr", "drive")]);
        let result = build_registry(&dictionary, &eastern_arabic_numerals(), &default_profiles());
        assert_eq!(
            result.unwrap_err(),
            ConstructionError::DuplicatePattern("dr".to_string())
        );
    }

    #[test]
    fn test_unknown_stage_fails_construction() {
        let profiles = vec![Profile {
            name: "broken".to_string(),
            stages: vec!["whitespace_collapser".to_string(), "stemmer".to_string()],
        }];
        let result = build_registry(
            &egyptian_abbreviations(),
            &eastern_arabic_numerals(),
            &profiles,
        );
        assert_eq!(
            result.unwrap_err(),
            ConstructionError::UnknownStage {
                profile: "broken".to_string(),
                stage: "stemmer".to_string(),
            }
        );
    }

    #[test]
    fn test_incomplete_numeral_table_fails_construction() {
        let result = build_registry(
            &egyptian_abbreviations(),
            &NumeralTable::new("٠١٢", "012"),
            &default_profiles(),
        );
        assert!(matches!(
            result,
            Err(ConstructionError::IncompleteNumeralTable { .. })
        ));
    }

    #[test]
    fn test_duplicate_profile_fails_construction() {
        let mut profiles = default_profiles();
        profiles.push(Profile::new("basic", &[StageId::Trimmer]));
        let result = build_registry(&egyptian_abbreviations(), &eastern_arabic_numerals(), &profiles);
        assert_eq!(
            result.unwrap_err(),
            ConstructionError::DuplicateProfile("basic".to_string())
        );
    }

    #[test]
    fn test_normalize_chain() {
        let registry = shipped();
        let profiles = vec![
            Profile::new("trimmed", &[StageId::Trimmer]),
            Profile::new("full", &[StageId::NumeralConverter, StageId::WhitespaceCollapser]),
        ];
        let custom = build_registry(
            &AbbreviationDictionary::default(),
            &eastern_arabic_numerals(),
            &profiles,
        )
        .unwrap();

        assert_eq!(
            custom.normalize_chain("  ١  ٢  ", &["full", "trimmed"]).unwrap(),
            "1 2"
        );
        assert_eq!(
            registry.normalize_chain("أحمد", &["basic", "missing"]),
            Err(CleanerError::UnknownProfile("missing".to_string()))
        );
    }

    #[test]
    fn test_normalize_traced() {
        let registry = shipped();
        let result = registry.normalize_traced("أحمد قال", "full").unwrap();
        assert!(result.changed);
        assert_eq!(result.text, "احمد قال");
        let changed: Vec<(StageId, bool)> =
            result.stages.iter().map(|t| (t.stage, t.changed)).collect();
        assert_eq!(
            changed,
            vec![
                (StageId::DiacriticNormalizer, true),
                (StageId::AbbreviationExpander, false),
                (StageId::NumeralConverter, false),
                (StageId::WhitespaceCollapser, false),
            ]
        );
    }

    #[test]
    fn test_profile_listing() {
        let registry = shipped();
        let names: Vec<&str> = registry.profile_names().collect();
        assert_eq!(names, vec!["basic", "transliteration", "full", "ascii"]);
        assert!(registry.contains_profile("full"));
        assert_eq!(registry.stages("basic").map(<[StageId]>::len), Some(2));
        assert!(registry.stages("nope").is_none());
    }

    #[test]
    fn test_hamza_alef_rule_shadowed_by_script_normalizer() {
        let registry = shipped();
        assert_eq!(registry.normalize("أ. محمد", "full").unwrap(), "ا. محمد");

        let profiles = vec![Profile::new("raw", &[StageId::AbbreviationExpander])];
        let raw = build_registry(&egyptian_abbreviations(), &eastern_arabic_numerals(), &profiles)
            .unwrap();
        assert_eq!(raw.normalize("أ. محمد", "raw").unwrap(), "أستاذ. محمد");
    }

    #[test]
    fn test_numeral_map_exposed() {
        let registry = shipped();
        let digits: String = registry.numeral_map().source_digits().collect();
        assert_eq!(digits, "٠١٢٣٤٥٦٧٨٩");
    }

    #[test]
    fn test_default_registry() {
        let registry = default_registry().unwrap();
        assert_eq!(
            registry.normalize("ب. سعيد", "full").unwrap(),
            "باشا. سعيد"
        );
    }

    #[test]
    fn test_concurrent_normalize() {
        let registry = Arc::new(shipped());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let input = format!("د. أحمد  رقم {}", "١".repeat(i + 1));
                    registry.normalize(&input, "full").unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let expected = format!("دكتور. احمد رقم {}", "1".repeat(i + 1));
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
