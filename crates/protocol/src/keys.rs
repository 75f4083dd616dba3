//! Key-combination strings such as `"ctrl+shift+t"`.

use std::fmt;
use std::str::FromStr;

/// Special keys addressable by name in a key string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Control,
    Shift,
    Alt,
    Meta,
    Enter,
    Backspace,
    Tab,
    Escape,
    Space,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    CapsLock,
    /// Function key `F1`..=`F12`.
    Function(u8),
}

impl NamedKey {
    /// Resolve a lower-case token against the key-name table.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "ctrl" | "control" => NamedKey::Control,
            "shift" => NamedKey::Shift,
            "alt" | "option" => NamedKey::Alt,
            "cmd" | "command" | "meta" | "win" | "super" => NamedKey::Meta,
            "enter" | "return" => NamedKey::Enter,
            "backspace" => NamedKey::Backspace,
            "tab" => NamedKey::Tab,
            "esc" | "escape" => NamedKey::Escape,
            "space" => NamedKey::Space,
            "delete" | "del" => NamedKey::Delete,
            "home" => NamedKey::Home,
            "end" => NamedKey::End,
            "pageup" | "pgup" => NamedKey::PageUp,
            "pagedown" | "pgdn" => NamedKey::PageDown,
            "up" => NamedKey::Up,
            "down" => NamedKey::Down,
            "left" => NamedKey::Left,
            "right" => NamedKey::Right,
            "capslock" => NamedKey::CapsLock,
            _ => return Self::function_key(name),
        };
        Some(key)
    }

    fn function_key(name: &str) -> Option<Self> {
        let n: u8 = name.strip_prefix('f')?.parse().ok()?;
        (1..=12).contains(&n).then_some(NamedKey::Function(n))
    }

    pub fn name(&self) -> String {
        let s = match self {
            NamedKey::Control => "ctrl",
            NamedKey::Shift => "shift",
            NamedKey::Alt => "alt",
            NamedKey::Meta => "cmd",
            NamedKey::Enter => "enter",
            NamedKey::Backspace => "backspace",
            NamedKey::Tab => "tab",
            NamedKey::Escape => "esc",
            NamedKey::Space => "space",
            NamedKey::Delete => "delete",
            NamedKey::Home => "home",
            NamedKey::End => "end",
            NamedKey::PageUp => "pageup",
            NamedKey::PageDown => "pagedown",
            NamedKey::Up => "up",
            NamedKey::Down => "down",
            NamedKey::Left => "left",
            NamedKey::Right => "right",
            NamedKey::CapsLock => "capslock",
            NamedKey::Function(n) => return format!("f{n}"),
        };
        s.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Named(NamedKey),
    Char(char),
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Named(key) => f.write_str(&key.name()),
            KeyToken::Char(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("key combination is empty")]
    Empty,
    #[error("unknown key '{token}' in '{input}'")]
    UnknownKey { token: String, input: String },
}

/// A chord of keys, pressed in order and released in reverse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo(Vec<KeyToken>);

impl KeyCombo {
    pub fn single(key: KeyToken) -> Self {
        Self(vec![key])
    }

    pub fn from_keys(keys: Vec<KeyToken>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[KeyToken] {
        &self.0
    }

    pub fn press_order(&self) -> impl Iterator<Item = &KeyToken> {
        self.0.iter()
    }

    pub fn release_order(&self) -> impl Iterator<Item = &KeyToken> {
        self.0.iter().rev()
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl FromStr for KeyCombo {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_combo(s)
    }
}

/// Parse a `+`-joined key string.
///
/// Tokens are lower-cased, then resolved as a named key or taken literally
/// when they are a single character. One unresolvable token rejects the
/// whole string.
pub fn parse_key_combo(input: &str) -> Result<KeyCombo, KeyParseError> {
    if input.trim().is_empty() {
        return Err(KeyParseError::Empty);
    }

    let keys = input
        .split('+')
        .map(|raw| {
            let token = raw.trim().to_lowercase();
            resolve_token(&token).ok_or_else(|| KeyParseError::UnknownKey {
                token,
                input: input.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(KeyCombo(keys))
}

fn resolve_token(token: &str) -> Option<KeyToken> {
    if let Some(named) = NamedKey::from_name(token) {
        return Some(KeyToken::Named(named));
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeyToken::Char(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_char() {
        let combo = parse_key_combo("f").unwrap();
        assert_eq!(combo.keys(), &[KeyToken::Char('f')]);
    }

    #[test]
    fn test_parse_modifier_combo() {
        let combo = parse_key_combo("ctrl+r").unwrap();
        assert_eq!(
            combo.keys(),
            &[KeyToken::Named(NamedKey::Control), KeyToken::Char('r')]
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let combo = parse_key_combo("Ctrl+Shift+T").unwrap();
        assert_eq!(
            combo.keys(),
            &[
                KeyToken::Named(NamedKey::Control),
                KeyToken::Named(NamedKey::Shift),
                KeyToken::Char('t'),
            ]
        );
    }

    #[test]
    fn test_parse_function_keys() {
        assert_eq!(
            parse_key_combo("F11").unwrap().keys(),
            &[KeyToken::Named(NamedKey::Function(11))]
        );
        assert!(parse_key_combo("f13").is_err());
        assert!(parse_key_combo("f0").is_err());
    }

    #[test]
    fn test_parse_aliases() {
        for (alias, key) in [
            ("control", NamedKey::Control),
            ("return", NamedKey::Enter),
            ("esc", NamedKey::Escape),
            ("cmd", NamedKey::Meta),
            ("win", NamedKey::Meta),
            ("pgdn", NamedKey::PageDown),
        ] {
            assert_eq!(parse_key_combo(alias).unwrap().keys(), &[KeyToken::Named(key)]);
        }
    }

    #[test]
    fn test_unknown_token_rejects_whole_combo() {
        let err = parse_key_combo("ctrl+banana").unwrap_err();
        assert_eq!(
            err,
            KeyParseError::UnknownKey {
                token: "banana".to_string(),
                input: "ctrl+banana".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_tokens_are_rejected() {
        assert_eq!(parse_key_combo(""), Err(KeyParseError::Empty));
        assert_eq!(parse_key_combo("   "), Err(KeyParseError::Empty));
        assert!(parse_key_combo("ctrl+").is_err());
        assert!(parse_key_combo("ctrl++r").is_err());
    }

    #[test]
    fn test_release_order_is_reversed() {
        let combo: KeyCombo = "ctrl+alt+delete".parse().unwrap();
        let pressed: Vec<_> = combo.press_order().copied().collect();
        let mut released: Vec<_> = combo.release_order().copied().collect();
        released.reverse();
        assert_eq!(pressed, released);
        assert_eq!(combo.release_order().next(), Some(&KeyToken::Named(NamedKey::Delete)));
    }

    #[test]
    fn test_display_normalizes() {
        let combo = parse_key_combo("Control+Return").unwrap();
        assert_eq!(combo.to_string(), "ctrl+enter");
    }
}
