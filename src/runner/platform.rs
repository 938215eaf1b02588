//! Platform probe
//!
//! Reports the current operating system using kernel-name style identifiers
//! (`Linux`, `Darwin`, `Windows`, ...), the vocabulary used by `os` fields.

use crate::config::EnvVariant;
use std::env;

/// Environment variable that overrides the detected platform
pub const PLATFORM_ENV: &str = "DOMESTOBOT_PLATFORM";

/// Current platform identifier
pub fn current() -> String {
    match env::var(PLATFORM_ENV) {
        Ok(platform) if !platform.is_empty() => platform,
        _ => kernel_name(env::consts::OS).to_string(),
    }
}

/// Map a Rust target OS name to its kernel name
pub fn kernel_name(target_os: &str) -> &str {
    match target_os {
        "linux" | "android" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "netbsd" => "NetBSD",
        "openbsd" => "OpenBSD",
        "dragonfly" => "DragonFly",
        "solaris" | "illumos" => "SunOS",
        other => other,
    }
}

/// First variant declared for `platform`, if any
pub fn select_variant<'a>(variants: &'a [EnvVariant], platform: &str) -> Option<&'a EnvVariant> {
    variants.iter().find(|variant| variant.os == platform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecForm;

    fn variant(os: &str, program: &str) -> EnvVariant {
        EnvVariant {
            os: os.to_string(),
            title: None,
            form: ExecForm::Command(vec![program.to_string()]),
        }
    }

    #[test]
    fn test_kernel_names() {
        assert_eq!(kernel_name("linux"), "Linux");
        assert_eq!(kernel_name("macos"), "Darwin");
        assert_eq!(kernel_name("windows"), "Windows");
        assert_eq!(kernel_name("haiku"), "haiku");
    }

    #[test]
    fn test_first_matching_variant_wins() {
        let variants = vec![
            variant("Darwin", "brew"),
            variant("Linux", "paru"),
            variant("Linux", "apt"),
        ];

        let selected = select_variant(&variants, "Linux").unwrap();
        assert_eq!(selected.form, ExecForm::Command(vec!["paru".to_string()]));
    }

    #[test]
    fn test_no_matching_variant() {
        let variants = vec![variant("Darwin", "brew")];
        assert!(select_variant(&variants, "Linux").is_none());
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let variants = vec![variant("linux", "paru")];
        assert!(select_variant(&variants, "Linux").is_none());
    }

    #[test]
    fn test_current_is_not_empty() {
        assert!(!current().is_empty());
    }
}
