//! In-memory INI configuration
//!
//! [`ConfigurationHandle`] wraps [`ini::Ini`] and keeps it in a normalised
//! shape: no general (header-less) section, one entry per section name and
//! one value per key. Everything that reaches disk can be parsed back into an
//! equal handle.

use super::error::ConfigError;
use ini::{EscapePolicy, Ini, LineSeparator, ParseOption, Properties, WriteOption};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Parsed configuration: ordered sections of string key/value pairs
pub struct ConfigurationHandle {
    ini: Ini,
}

impl ConfigurationHandle {
    /// Create an empty configuration with no sections
    pub fn new() -> Self {
        Self { ini: Ini::new() }
    }

    /// Parse configuration text
    ///
    /// `origin` is only used to label errors. Duplicate sections and keys are
    /// merged, the later value winning.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let parse_error = |cause: String| ConfigError::Parse {
            path: origin.to_path_buf(),
            cause,
        };

        check_separators(content).map_err(parse_error)?;

        let raw = Ini::load_from_str_opt(content, parse_option())
            .map_err(|e| parse_error(e.to_string()))?;

        if let Some((key, _)) = raw
            .section(None::<String>)
            .and_then(|general| general.iter().next())
        {
            return Err(parse_error(format!(
                "option '{}' appears before any section header",
                key.trim()
            )));
        }

        let mut handle = Self::new();
        for (section, props) in raw.iter() {
            let Some(section) = section else { continue };
            if section.contains(['\n', '\r']) {
                return Err(parse_error(format!(
                    "section header '[{}' is not closed on its line",
                    section.lines().next().unwrap_or_default()
                )));
            }

            let merged = handle.section_entry(section);
            for (key, value) in props.iter() {
                if key.contains(['\n', '\r']) {
                    return Err(parse_error(format!(
                        "line '{}' in section '{}' has no key/value separator",
                        key.lines().next().unwrap_or_default(),
                        section
                    )));
                }
                merged.insert(key, value);
            }
        }

        Ok(handle)
    }

    /// Names of all sections, in file order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.ini.sections().flatten()
    }

    pub fn section_count(&self) -> usize {
        self.section_names().count()
    }

    /// True when the configuration has no sections at all
    pub fn is_empty(&self) -> bool {
        self.section_count() == 0
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.ini.section(Some(section)).is_some()
    }

    /// Add an empty section
    pub fn add_section(&mut self, section: &str) -> Result<(), ConfigError> {
        let section = section.trim();
        validate_section_name(section)?;
        if self.has_section(section) {
            return Err(ConfigError::DuplicateSection {
                section: section.to_string(),
            });
        }
        self.section_entry(section);
        Ok(())
    }

    /// Remove a section and all its options, returning whether it existed
    pub fn remove_section(&mut self, section: &str) -> bool {
        self.ini.delete(Some(section)).is_some()
    }

    /// Look up a single value
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.ini.get_from(Some(section), key)
    }

    pub fn has_option(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Look up a value and interpret it as a boolean
    ///
    /// Accepts `1`, `yes`, `true`, `on` and `0`, `no`, `false`, `off` in any
    /// case.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
        let Some(value) = self.get(section, key) else {
            return Ok(None);
        };

        match value.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(Some(true)),
            "0" | "no" | "false" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidBoolean {
                section: section.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Option names of a section, or `None` if the section is missing
    pub fn options(&self, section: &str) -> Option<Vec<&str>> {
        self.items(section)
            .map(|items| items.into_iter().map(|(key, _)| key).collect())
    }

    /// Key/value pairs of a section in insertion order
    pub fn items(&self, section: &str) -> Option<Vec<(&str, &str)>> {
        self.ini
            .section(Some(section))
            .map(|props| props.iter().collect())
    }

    /// Set a value in an existing section
    ///
    /// Key and value are trimmed, since surrounding whitespace does not
    /// survive a save/load cycle.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.trim();
        let value = value.trim();
        validate_key(key)?;
        validate_value(key, value)?;

        let props = self
            .ini
            .section_mut(Some(section))
            .ok_or_else(|| ConfigError::NoSection {
                section: section.to_string(),
            })?;
        props.insert(key, value);
        Ok(())
    }

    /// Remove an option, returning whether it existed
    pub fn remove_option(&mut self, section: &str, key: &str) -> Result<bool, ConfigError> {
        let props = self
            .ini
            .section_mut(Some(section))
            .ok_or_else(|| ConfigError::NoSection {
                section: section.to_string(),
            })?;
        Ok(props.remove(key).is_some())
    }

    /// Serialize in the same INI format that [`parse`](Self::parse) reads
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.ini.write_to_opt(writer, write_option())
    }

    fn section_entry(&mut self, section: &str) -> &mut Properties {
        self.ini
            .entry(Some(section.to_string()))
            .or_insert(Properties::new())
    }

    fn snapshot(&self) -> BTreeMap<&str, BTreeMap<&str, &str>> {
        self.ini
            .iter()
            .filter_map(|(section, props)| section.map(|name| (name, props.iter().collect())))
            .collect()
    }
}

impl Default for ConfigurationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ConfigurationHandle {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot() == other.snapshot()
    }
}

impl Eq for ConfigurationHandle {}

impl fmt::Debug for ConfigurationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}

/// Every line that is not blank, a comment, a section header or the tail of
/// a backslash continuation must carry a `=` or `:` separator
fn check_separators(content: &str) -> Result<(), String> {
    let mut continued = false;
    for (index, line) in content.lines().enumerate() {
        let is_continuation = continued;
        continued = line.trim_end().ends_with('\\');
        if is_continuation {
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(['#', ';', '[']) {
            continue;
        }
        if !trimmed.contains(['=', ':']) {
            return Err(format!(
                "line {} ('{}') has no key/value separator",
                index + 1,
                trimmed
            ));
        }
    }
    Ok(())
}

/// Values are kept literally: no quote stripping, no backslash escapes
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn write_option() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Nothing,
        line_separator: LineSeparator::SystemDefault,
        kv_separator: " = ",
    }
}

fn validate_section_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.contains(']') {
        Some("must not contain ']'")
    } else if name.contains(['\n', '\r']) {
        Some("must not contain line breaks")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidName {
            kind: "section",
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn validate_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let reason = if value.contains(['\n', '\r']) {
        Some("values cannot span multiple lines")
    } else if value.ends_with('\\') {
        // A trailing backslash reads back as a line continuation
        Some("values cannot end with a backslash")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn validate_key(key: &str) -> Result<(), ConfigError> {
    let reason = if key.is_empty() {
        Some("must not be empty")
    } else if key.contains(['=', ':']) {
        Some("must not contain '=' or ':'")
    } else if key.contains(['\n', '\r']) {
        Some("must not contain line breaks")
    } else if key.starts_with(['[', '#', ';']) {
        Some("must not start with '[', '#' or ';'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidName {
            kind: "option",
            name: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigurationHandle, ConfigError> {
        ConfigurationHandle::parse(content, Path::new("test.ini"))
    }

    #[test]
    fn test_empty_content_has_no_sections() {
        let handle = parse("").unwrap();
        assert!(handle.is_empty());
        assert_eq!(handle.section_count(), 0);
    }

    #[test]
    fn test_parse_sections_and_separators() {
        let handle = parse(
            "# leading comment\n[core]\neditor = vim\npager: less\n; another comment\n\n[remote]\nurl=https://example.com/xeno\n",
        )
        .unwrap();

        assert_eq!(handle.section_names().collect::<Vec<_>>(), vec!["core", "remote"]);
        assert_eq!(handle.get("core", "editor"), Some("vim"));
        assert_eq!(handle.get("core", "pager"), Some("less"));
        assert_eq!(handle.get("remote", "url"), Some("https://example.com/xeno"));
        assert_eq!(handle.get("remote", "missing"), None);
        assert_eq!(handle.get("missing", "url"), None);
    }

    #[test]
    fn test_values_are_literal() {
        let handle = parse("[paths]\nroot = \"C:\\xeno\\data\"\n").unwrap();
        assert_eq!(handle.get("paths", "root"), Some("\"C:\\xeno\\data\""));
    }

    #[test]
    fn test_duplicate_sections_and_keys_are_merged() {
        let handle = parse("[core]\neditor = vi\n[core]\neditor = vim\nshell = zsh\n").unwrap();

        assert_eq!(handle.section_count(), 1);
        assert_eq!(handle.get("core", "editor"), Some("vim"));
        assert_eq!(handle.get("core", "shell"), Some("zsh"));
        assert_eq!(handle.options("core").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_section_survives_parsing() {
        let handle = parse("[empty]\n").unwrap();
        assert!(handle.has_section("empty"));
        assert_eq!(handle.items("empty"), Some(vec![]));
    }

    #[test]
    fn test_option_before_section_is_rejected() {
        let err = parse("editor = vim\n[core]\n").unwrap_err();
        match err {
            ConfigError::Parse { path, cause } => {
                assert_eq!(path, Path::new("test.ini"));
                assert!(cause.contains("editor"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_section_is_rejected() {
        assert!(matches!(
            parse("[core\neditor = vim\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_line_without_separator_is_rejected() {
        assert!(matches!(
            parse("[core]\njust some words\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_indented_line_without_separator_is_rejected() {
        match parse("[a]\nk = v\n  cont\n") {
            Err(ConfigError::Parse { cause, .. }) => assert!(cause.contains("line 3")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_backslash_continuation_is_not_a_missing_separator() {
        let handle = parse("[a]\nk = one \\\n  two\nnext = v\n").unwrap();
        assert_eq!(handle.get("a", "next"), Some("v"));
    }

    #[test]
    fn test_set_rejects_trailing_backslash() {
        let mut handle = ConfigurationHandle::new();
        handle.add_section("paths").unwrap();

        match handle.set("paths", "root", "C:\\xeno\\") {
            Err(ConfigError::InvalidValue { key, reason }) => {
                assert_eq!(key, "root");
                assert!(reason.contains("backslash"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert!(!handle.has_option("paths", "root"));

        handle.set("paths", "root", "C:\\xeno\\data").unwrap();
        assert_eq!(handle.get("paths", "root"), Some("C:\\xeno\\data"));
    }

    #[test]
    fn test_add_and_remove_section() {
        let mut handle = ConfigurationHandle::new();
        handle.add_section("core").unwrap();
        assert!(handle.has_section("core"));

        assert!(matches!(
            handle.add_section("core"),
            Err(ConfigError::DuplicateSection { .. })
        ));
        assert!(matches!(
            handle.add_section("bad]name"),
            Err(ConfigError::InvalidName { kind: "section", .. })
        ));
        assert!(matches!(
            handle.add_section("  "),
            Err(ConfigError::InvalidName { .. })
        ));

        assert!(handle.remove_section("core"));
        assert!(!handle.remove_section("core"));
        assert!(handle.is_empty());
    }

    #[test]
    fn test_set_requires_existing_section() {
        let mut handle = ConfigurationHandle::new();
        assert!(matches!(
            handle.set("core", "editor", "vim"),
            Err(ConfigError::NoSection { .. })
        ));

        handle.add_section("core").unwrap();
        handle.set("core", "editor", "vim").unwrap();
        handle.set("core", "editor", "  nvim  ").unwrap();
        assert_eq!(handle.get("core", "editor"), Some("nvim"));
        assert_eq!(handle.options("core"), Some(vec!["editor"]));
    }

    #[test]
    fn test_set_rejects_unrepresentable_input() {
        let mut handle = ConfigurationHandle::new();
        handle.add_section("core").unwrap();

        for key in ["", "a=b", "a:b", "#comment", "[section", "two\nlines"] {
            assert!(
                matches!(
                    handle.set("core", key, "value"),
                    Err(ConfigError::InvalidName { kind: "option", .. })
                ),
                "key {key:?} should be rejected"
            );
        }
        assert!(matches!(
            handle.set("core", "editor", "vim\nemacs"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_remove_option() {
        let mut handle = parse("[core]\neditor = vim\n").unwrap();
        assert!(handle.remove_option("core", "editor").unwrap());
        assert!(!handle.remove_option("core", "editor").unwrap());
        assert!(handle.has_section("core"));
        assert!(matches!(
            handle.remove_option("missing", "editor"),
            Err(ConfigError::NoSection { .. })
        ));
    }

    #[test]
    fn test_get_bool() {
        let handle = parse("[flags]\na = Yes\nb = off\nc = 1\nd = FALSE\ne = maybe\n").unwrap();

        assert_eq!(handle.get_bool("flags", "a").unwrap(), Some(true));
        assert_eq!(handle.get_bool("flags", "b").unwrap(), Some(false));
        assert_eq!(handle.get_bool("flags", "c").unwrap(), Some(true));
        assert_eq!(handle.get_bool("flags", "d").unwrap(), Some(false));
        assert_eq!(handle.get_bool("flags", "missing").unwrap(), None);
        assert!(matches!(
            handle.get_bool("flags", "e"),
            Err(ConfigError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn test_written_text_parses_back_to_equal_handle() {
        let mut handle = ConfigurationHandle::new();
        handle.add_section("core").unwrap();
        handle.set("core", "editor", "vim").unwrap();
        handle.set("core", "path", "/usr/local/bin:/usr/bin").unwrap();
        handle.add_section("empty").unwrap();
        handle.add_section("remote origin").unwrap();
        handle.set("remote origin", "url", "ssh://host/repo; not a comment").unwrap();

        let mut buffer = Vec::new();
        handle.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("[core]"));
        assert!(text.contains("editor = vim"));

        let reparsed = parse(&text).unwrap();
        assert_eq!(reparsed, handle);
        assert_eq!(
            reparsed.section_names().collect::<Vec<_>>(),
            vec!["core", "empty", "remote origin"]
        );
    }

    #[test]
    fn test_equality_ignores_key_order() {
        let a = parse("[core]\neditor = vim\nshell = zsh\n").unwrap();
        let b = parse("[core]\nshell = zsh\neditor = vim\n").unwrap();
        let c = parse("[core]\nshell = bash\neditor = vim\n").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
