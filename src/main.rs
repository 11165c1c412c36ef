// 命令行入口 - 逐行读取 stdin，输出规范化结果
//
// 用法: tts-cleaners [--config PATH] [--profile basic,full] [--list]

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use tts_cleaners_lib::cleaners::parse_profile_list;
use tts_cleaners_lib::{init_logging, CleanerConfig};

struct Args {
    config: Option<PathBuf>,
    profile: Option<String>,
    list: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        profile: None,
        list: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = iter.next() else {
                    anyhow::bail!("--config 缺少路径");
                };
                args.config = Some(PathBuf::from(path));
            }
            "--profile" => {
                let Some(profile) = iter.next() else {
                    anyhow::bail!("--profile 缺少名称");
                };
                args.profile = Some(profile);
            }
            "--list" => args.list = true,
            other => anyhow::bail!("未知参数: {}", other),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    init_logging();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => CleanerConfig::load_from_path(path)?,
        None => CleanerConfig::load()?,
    };
    let registry = config.build_registry()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.list {
        for name in registry.profile_names() {
            let stages: Vec<String> = registry
                .stages(name)
                .unwrap_or_default()
                .iter()
                .map(|s| {
                    if s.is_idempotent() {
                        s.as_str().to_string()
                    } else {
                        format!("{} (非幂等)", s.as_str())
                    }
                })
                .collect();
            writeln!(out, "{}: {}", name, stages.join(", "))?;
        }
        let digits: String = registry.numeral_map().source_digits().collect();
        writeln!(out, "numerals: {}", digits)?;
        return Ok(());
    }

    let profiles = parse_profile_list(args.profile.as_deref().unwrap_or(&config.default_profile));
    if profiles.is_empty() {
        anyhow::bail!("未指定 profile");
    }
    tracing::info!("使用 profile: {}", profiles.join(","));

    let stdin = std::io::stdin();
    let mut lines = 0usize;
    for line in stdin.lock().lines() {
        let line = line?;
        writeln!(out, "{}", registry.normalize_chain(&line, profiles.as_slice())?)?;
        lines += 1;
    }

    tracing::info!("处理完成: {} 行", lines);
    Ok(())
}
