//! Raw profile file model
//!
//! An ordered section/key model of the profile file, covering the subset of
//! INI that `.databrickscfg` files actually use: `[section]` headers,
//! single-line `key = value` entries (`:` also accepted as a delimiter),
//! and `#`/`;` comment lines. Section order, entry order, and keys the
//! library does not recognize all survive a load/store round trip, so a
//! file shared with other Databricks tooling is never mangled.

use std::fmt;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

use super::DEFAULT_SECTION;

/// Parsed contents of a profile file
///
/// Keys are lowercased on the way in, matching how `configparser` normalizes
/// option names, so lookups are case-insensitive with respect to the file.
/// Section names stay case-sensitive. Lookups never fall through from a named
/// section to `[DEFAULT]`; each section stands alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProfiles {
    sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl RawProfiles {
    /// Create an empty model with no sections
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse profile file text, reporting errors against `origin`
    pub fn parse(text: &str, origin: &Path) -> ConfigResult<Self> {
        let mut profiles = Self::new();
        let mut current: Option<usize> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return Err(ConfigError::parse(
                        origin,
                        line_number,
                        "unterminated section header",
                    ));
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(ConfigError::parse(origin, line_number, "empty section header"));
                }
                if profiles.has_section(name) {
                    return Err(ConfigError::parse(
                        origin,
                        line_number,
                        format!("duplicate section `{name}`"),
                    ));
                }
                profiles.sections.push(Section::named(name));
                current = Some(profiles.sections.len() - 1);
                continue;
            }

            let Some((key, value)) = split_entry(line) else {
                return Err(ConfigError::parse(
                    origin,
                    line_number,
                    "expected `key = value`",
                ));
            };
            let Some(section) = current else {
                return Err(ConfigError::parse(
                    origin,
                    line_number,
                    "entry before any section header",
                ));
            };
            let key = key.to_ascii_lowercase();
            if key.is_empty() {
                return Err(ConfigError::parse(origin, line_number, "entry missing key"));
            }

            let entries = &mut profiles.sections[section].entries;
            if entries.iter().any(|(existing, _)| *existing == key) {
                return Err(ConfigError::parse(
                    origin,
                    line_number,
                    format!("duplicate key `{key}`"),
                ));
            }
            entries.push((key, value.to_string()));
        }

        Ok(profiles)
    }

    /// Check whether the model holds no sections at all
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Check whether a section is physically present
    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Iterate over section names in storage order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|section| section.name.as_str())
    }

    /// Make sure a section header exists for `name`
    ///
    /// `DEFAULT` is never created here; it comes into existence only when a
    /// value is written to it, which is how `configparser` treats its
    /// implicit default section.
    pub fn ensure_section(&mut self, name: &str) {
        if name == DEFAULT_SECTION || self.has_section(name) {
            return;
        }
        self.sections.push(Section::named(name));
    }

    /// Look up a value in exactly the named section
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_ascii_lowercase();
        self.section(section)?
            .entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Set, replace, or remove a value in the named section
    ///
    /// A `None` or empty-string value removes the key instead of storing it,
    /// so persisted profiles never carry placeholder entries. Removal is a
    /// no-op when the section or key does not exist. Writing a real value
    /// creates the section on demand, including `DEFAULT`.
    pub fn set(&mut self, section: &str, key: &str, value: Option<&str>) {
        let key = key.to_ascii_lowercase();
        match value.filter(|value| !value.is_empty()) {
            Some(value) => {
                let index = match self.sections.iter().position(|s| s.name == section) {
                    Some(index) => index,
                    None => {
                        self.sections.push(Section::named(section));
                        self.sections.len() - 1
                    }
                };
                let entries = &mut self.sections[index].entries;
                if let Some(entry) = entries.iter_mut().find(|(existing, _)| *existing == key) {
                    entry.1 = value.to_string();
                } else {
                    entries.push((key, value.to_string()));
                }
            }
            None => {
                if let Some(found) = self.sections.iter_mut().find(|s| s.name == section) {
                    found.entries.retain(|(existing, _)| *existing != key);
                }
            }
        }
    }

    /// Explain why this model cannot be rendered to the file format
    ///
    /// The format is line-oriented, so a line break inside a section name,
    /// key, or value would come back as a different entry on the next load,
    /// and a blank section name renders as a header the parser refuses.
    /// Returns `None` when the model survives a render/parse round trip.
    pub(super) fn unwritable_reason(&self) -> Option<String> {
        for section in &self.sections {
            if section.name.trim().is_empty() {
                return Some("blank section name".to_string());
            }
            if has_line_break(&section.name) {
                return Some(format!(
                    "section name {:?} spans multiple lines",
                    section.name
                ));
            }
            for (key, value) in &section.entries {
                if has_line_break(key) {
                    return Some(format!(
                        "key {key:?} in section `{}` spans multiple lines",
                        section.name
                    ));
                }
                if has_line_break(value) {
                    return Some(format!(
                        "value for `{key}` in section `{}` spans multiple lines",
                        section.name
                    ));
                }
            }
        }
        None
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }
}

impl fmt::Display for RawProfiles {
    /// Render back to file text, `DEFAULT` section first
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let default = self
            .sections
            .iter()
            .filter(|section| section.name == DEFAULT_SECTION);
        let named = self
            .sections
            .iter()
            .filter(|section| section.name != DEFAULT_SECTION);
        for section in default.chain(named) {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{key} = {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Section {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let delimiter = line.find(|c| c == '=' || c == ':')?;
    let (key, rest) = line.split_at(delimiter);
    Some((key.trim_end(), rest[1..].trim_start()))
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}
