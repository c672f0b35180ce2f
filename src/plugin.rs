//! The plugin bootstrap file as seen from the packager.
//!
//! We never run the plugin. We only read its header comment, its version
//! constant, and check that it registers the lifecycle callbacks WordPress
//! expects from a packaged plugin.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::patch;

/// A callback registration the bootstrap file must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookRequirement {
    /// Short name used in reports
    pub name: &'static str,
    /// Registration call, matched as `<call>(` with optional first argument
    pub call: &'static str,
    /// Required first argument (action name), if any
    pub action: Option<&'static str>,
}

/// Lifecycle registrations every packaged plugin must provide.
pub const REQUIRED_HOOKS: &[HookRequirement] = &[
    HookRequirement {
        name: "init",
        call: "add_action",
        action: Some("plugins_loaded"),
    },
    HookRequirement {
        name: "activation",
        call: "register_activation_hook",
        action: None,
    },
    HookRequirement {
        name: "deactivation",
        call: "register_deactivation_hook",
        action: None,
    },
    HookRequirement {
        name: "uninstall",
        call: "register_uninstall_hook",
        action: None,
    },
];

impl HookRequirement {
    fn pattern_source(&self) -> String {
        match self.action {
            Some(action) => format!(
                r#"\b{}\s*\(\s*['"]{}['"]"#,
                regex::escape(self.call),
                regex::escape(action)
            ),
            None => format!(r"\b{}\s*\(", regex::escape(self.call)),
        }
    }

    pub fn is_registered(&self, content: &str) -> bool {
        HOOK_PATTERNS
            .iter()
            .find(|(hook, _)| hook == self)
            .map(|(_, re)| re.is_match(content))
            .unwrap_or(false)
    }
}

static HOOK_PATTERNS: Lazy<Vec<(HookRequirement, Regex)>> = Lazy::new(|| {
    REQUIRED_HOOKS
        .iter()
        .map(|hook| {
            let re = Regex::new(&hook.pattern_source()).expect("valid hook regex");
            (*hook, re)
        })
        .collect()
});

/// Names of required hooks the file does not register.
pub fn missing_hooks(content: &str) -> Vec<&'static str> {
    REQUIRED_HOOKS
        .iter()
        .filter(|h| !h.is_registered(content))
        .map(|h| h.name)
        .collect()
}

/// Bodies of every block comment, in file order.
fn block_comments(content: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = content;
    while let Some(start) = rest.find("/*") {
        let body = rest[start + 2..].trim_start_matches('*');
        match body.find("*/") {
            Some(end) => {
                blocks.push(&body[..end]);
                rest = &body[end + 2..];
            }
            None => {
                blocks.push(body);
                break;
            }
        }
    }
    blocks
}

fn header_block(content: &str) -> Option<&str> {
    let blocks = block_comments(content);
    blocks
        .iter()
        .find(|b| b.to_ascii_lowercase().contains("plugin name:"))
        .or_else(|| blocks.first())
        .copied()
}

/// Parsed header fields plus the version constant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginHeader {
    /// `Key: value` pairs from the header comment, in file order
    pub fields: Vec<(String, String)>,
    /// Value of `define('<CONST>', '...')`
    pub version_constant: Option<String>,
}

impl PluginHeader {
    /// Parse the plugin header and version constant out of `content`.
    ///
    /// The header is the first `/* ... */` or `/** ... */` comment that
    /// declares `Plugin Name`, falling back to the first comment.
    pub fn parse(content: &str, constant_name: &str) -> Result<Self> {
        let mut fields = Vec::new();

        if let Some(block) = header_block(content) {
            for line in block.lines() {
                let line = line.trim().trim_start_matches('*').trim();
                if let Some((key, value)) = line.split_once(':') {
                    let key = key.trim();
                    // Header keys are words; skip URLs and prose
                    if !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == ' ') {
                        fields.push((key.to_string(), value.trim().to_string()));
                    }
                }
            }
        }

        Ok(Self {
            fields,
            version_constant: patch::constant_value(content, constant_name)?,
        })
    }

    /// Case-insensitive field lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("Plugin Name")
    }

    pub fn version(&self) -> Option<&str> {
        self.get("Version")
    }

    pub fn print(&self) {
        println!("Plugin header:");
        for (key, value) in &self.fields {
            println!("  {}: {}", key, value);
        }
        match &self.version_constant {
            Some(v) => println!("  (version constant): {}", v),
            None => println!("  (version constant): NOT FOUND"),
        }
    }
}
