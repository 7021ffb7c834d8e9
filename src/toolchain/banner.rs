//! Compiler version banner classification.
//!
//! A banner is what a compiler prints for `--version`. Rules are tried in
//! order against each line and the first match wins:
//!
//! 1. Apple clang (`Apple clang version 14.0.3 ...`)
//! 2. Any other clang (`Ubuntu clang version 14.0.0-1ubuntu1`)
//! 3. GCC 4.x, kept at minor granularity (`gcc (GCC) 4.8.5`)
//! 4. GCC 5 and later, major only (`gcc (Ubuntu 9.4.0-1ubuntu1) 9.4.0`)

use std::sync::LazyLock;

use regex::Regex;

use crate::core::compiler::{CompilerFamily, CompilerId};

static APPLE_CLANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Apple (?:LLVM|clang) version (\d+)").unwrap());

static CLANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*(?:LLVM|clang) version (\d+)").unwrap());

// The driver may be invoked as gcc, cc, g++, c++, gcc-11 or
// x86_64-linux-gnu-gcc-11.
static GCC_LEGACY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\S+-)?(?:g?cc|[gc]\+\+)(?:-[\d.]+)? .+ (4\.\d+)").unwrap()
});

static GCC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\S+-)?(?:g?cc|[gc]\+\+)(?:-[\d.]+)? .+ (\d+)\.").unwrap()
});

/// Classify a version banner into a compiler family and version.
pub fn parse_banner(text: &str) -> Option<CompilerId> {
    let rules: [(&Regex, CompilerFamily); 4] = [
        (&APPLE_CLANG, CompilerFamily::AppleClang),
        (&CLANG, CompilerFamily::Clang),
        (&GCC_LEGACY, CompilerFamily::Gcc),
        (&GCC, CompilerFamily::Gcc),
    ];

    text.lines().find_map(|line| {
        rules.iter().find_map(|(re, family)| {
            re.captures(line)
                .map(|caps| CompilerId::new(*family, &caps[1]))
        })
    })
}
