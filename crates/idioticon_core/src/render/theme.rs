//! Icon themes.

use super::escape_html;

/// Name of the default theme.
pub const DEFAULT_THEME: &str = "plain";

const THEME_NAMES: &[&str] = &["plain", "bootstrap"];

/// Returns the names accepted by `Theme::by_name`.
pub fn theme_names() -> &'static [&'static str] {
    THEME_NAMES
}

/// Icon rendering recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    /// Tag wrapping the icon, e.g. `span`.
    pub wrapper: String,
    pub icon_tag: String,
    /// Space-separated CSS classes; empty means no `class` attribute.
    pub icon_class: String,
    /// Text placed inside the icon tag.
    pub symbol: String,
}

impl Theme {
    /// `<abbr>*</abbr>` inside a `span`.
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            wrapper: "span".to_string(),
            icon_tag: "abbr".to_string(),
            icon_class: String::new(),
            symbol: "*".to_string(),
        }
    }

    /// Font Awesome question-circle icon.
    pub fn bootstrap() -> Self {
        Self {
            name: "bootstrap".to_string(),
            wrapper: "span".to_string(),
            icon_tag: "span".to_string(),
            icon_class: "fa fa-fw fa-question-circle".to_string(),
            symbol: String::new(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim() {
            "plain" => Some(Self::plain()),
            "bootstrap" => Some(Self::bootstrap()),
            _ => None,
        }
    }

    /// Renders the icon element alone.
    pub fn icon_html(&self) -> String {
        let class = if self.icon_class.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, escape_html(&self.icon_class))
        };
        format!(
            "<{tag}{class}>{symbol}</{tag}>",
            tag = self.icon_tag,
            symbol = escape_html(&self.symbol)
        )
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::plain()
    }
}
