//! Configuration command implementations
//!
//! Commands for inspecting and editing `~/.xenoconfig`.

use crate::cli::ConfigCommands;
use crate::cli::Output;
use crate::config::ConfigurationStore;
use crate::Result;
use anyhow::anyhow;
use std::io::IsTerminal;
use syntect::easy::HighlightLines;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};
use two_face::theme::EmbeddedThemeName;

/// Execute config commands
pub fn execute(cmd: ConfigCommands, store: &mut ConfigurationStore, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Path => path(store, output),
        ConfigCommands::Show => show(store, output),
        ConfigCommands::List => list(store, output),
        ConfigCommands::Get {
            section,
            key,
            as_bool,
        } => get(store, output, section.trim(), key.trim(), as_bool),
        ConfigCommands::Set {
            section,
            key,
            value,
        } => set(store, output, section.trim(), key.trim(), &value),
        ConfigCommands::Unset { section, key } => unset(store, output, section.trim(), key.trim()),
        ConfigCommands::RemoveSection { section } => remove_section(store, output, section.trim()),
    }
}

fn path(store: &ConfigurationStore, output: &Output) -> Result<()> {
    let path = store.path(false)?;
    output.raw(&path.display().to_string());
    Ok(())
}

fn show(store: &mut ConfigurationStore, output: &Output) -> Result<()> {
    let handle = store.configuration()?;
    if handle.is_empty() {
        output.info("No configuration set");
        return Ok(());
    }

    let mut buffer = Vec::new();
    handle.write_to(&mut buffer)?;
    let text = String::from_utf8(buffer)?;
    let text = text.trim_end();

    if std::io::stdout().is_terminal() {
        output.raw(highlight_ini(text).as_deref().unwrap_or(text));
    } else {
        output.raw(text);
    }

    output.verbose(&format!("Read from {}", store.path(true)?.display()));
    Ok(())
}

fn list(store: &mut ConfigurationStore, output: &Output) -> Result<()> {
    let handle = store.configuration()?;
    for section in handle.section_names() {
        for (key, value) in handle.items(section).unwrap_or_default() {
            output.raw(&format!("{section}.{key} = {value}"));
        }
    }
    Ok(())
}

fn get(
    store: &mut ConfigurationStore,
    output: &Output,
    section: &str,
    key: &str,
    as_bool: bool,
) -> Result<()> {
    let handle = store.configuration()?;
    let missing = || anyhow!("No option '{key}' in section '{section}'");

    if as_bool {
        let value = handle.get_bool(section, key)?.ok_or_else(missing)?;
        output.raw(&value.to_string());
    } else {
        let value = handle.get(section, key).ok_or_else(missing)?;
        output.raw(value);
    }
    Ok(())
}

fn set(
    store: &mut ConfigurationStore,
    output: &Output,
    section: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let handle = store.configuration()?;
    if !handle.has_section(section) {
        handle.add_section(section)?;
        output.verbose(&format!("Created section '{section}'"));
    }
    handle.set(section, key, value)?;

    store.save()?;
    output.success(&format!("Set {section}.{key}"));
    Ok(())
}

fn unset(store: &mut ConfigurationStore, output: &Output, section: &str, key: &str) -> Result<()> {
    let handle = store.configuration()?;
    let removed = handle.has_section(section) && handle.remove_option(section, key)?;
    if !removed {
        output.warning(&format!("Option '{key}' is not set in section '{section}'"));
        return Ok(());
    }

    store.save()?;
    output.success(&format!("Removed {section}.{key}"));
    Ok(())
}

fn remove_section(store: &mut ConfigurationStore, output: &Output, section: &str) -> Result<()> {
    if !store.configuration()?.remove_section(section) {
        output.warning(&format!("Section '{section}' does not exist"));
        return Ok(());
    }

    store.save()?;
    output.success(&format!("Removed section '{section}'"));
    Ok(())
}

/// Highlight INI text for the terminal, or `None` if highlighting fails
fn highlight_ini(text: &str) -> Option<String> {
    let syntax_set = two_face::syntax::extra_newlines();
    let theme_set = two_face::theme::extra();

    let syntax = syntax_set
        .find_syntax_by_extension("ini")
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text());
    let theme = theme_set.get(EmbeddedThemeName::Base16OceanDark);

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut highlighted = String::new();
    for line in LinesWithEndings::from(text) {
        let ranges = highlighter.highlight_line(line, &syntax_set).ok()?;
        highlighted.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
    }
    highlighted.push_str("\x1b[0m");

    Some(highlighted)
}
