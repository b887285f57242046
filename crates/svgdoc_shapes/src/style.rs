//! The `style` attribute as a record of properties.
use std::{convert::Infallible, fmt::Display, str::FromStr};

use itertools::Itertools;

macro_rules! define_properties {
    ($($(#[$meta:meta])* $variant:ident, $field:ident: $name:literal,)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        /// A style property recognised by [`Style`]
        pub enum Property {
            $($(#[$meta])* $variant,)+
        }

        impl Property {
            /// Every recognised property, in the order they're written
            pub const ALL: &'static [Property] = &[$(Property::$variant,)+];

            /// The hyphenated name of the property, e.g. `stroke-width`
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        /// The declarations of a `style` attribute, such as `fill:red;stroke-width:2;`
        ///
        /// Recognised properties are kept as fields and always written in the same order,
        /// followed by any other properties in the order they were found.
        pub struct Style {
            $($(#[$meta])* pub $field: Option<String>,)+
            /// Unrecognised properties, in the order they were found
            pub other: Vec<(String, String)>,
        }

        impl Style {
            /// Returns the value of a recognised property
            pub fn get(&self, property: Property) -> Option<&str> {
                match property {
                    $(Property::$variant => self.$field.as_deref(),)+
                }
            }

            fn slot(&mut self, property: Property) -> &mut Option<String> {
                match property {
                    $(Property::$variant => &mut self.$field,)+
                }
            }
        }
    };
}

define_properties! {
    /// `fill`
    Fill, fill: "fill",
    /// `stroke`
    Stroke, stroke: "stroke",
    /// `stroke-width`
    StrokeWidth, stroke_width: "stroke-width",
    /// `stop-color`
    StopColor, stop_color: "stop-color",
    /// `stop-opacity`
    StopOpacity, stop_opacity: "stop-opacity",
    /// `display`
    Display, display: "display",
    /// `opacity`
    Opacity, opacity: "opacity",
    /// `fill-opacity`
    FillOpacity, fill_opacity: "fill-opacity",
    /// `stroke-opacity`
    StrokeOpacity, stroke_opacity: "stroke-opacity",
    /// `font-size`
    FontSize, font_size: "font-size",
    /// `font-family`
    FontFamily, font_family: "font-family",
}

impl Property {
    /// Finds a recognised property from it's hyphenated or camel-case name
    pub fn parse(name: &str) -> Option<Self> {
        let name = from_camel_case(name.trim());
        Self::ALL
            .iter()
            .copied()
            .find(|property| property.name() == name)
    }

    /// The camel-case name of the property, e.g. `strokeWidth`
    pub fn camel_name(self) -> String {
        to_camel_case(self.name())
    }
}

/// Converts a hyphenated name to camel-case, e.g. `stroke-width` to `strokeWidth`
pub fn to_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper = false;
    for char in name.chars() {
        if char == '-' {
            upper = true;
        } else if upper {
            result.extend(char.to_uppercase());
            upper = false;
        } else {
            result.push(char);
        }
    }
    result
}

/// Converts a camel-case name to a hyphenated one, e.g. `strokeWidth` to `stroke-width`
pub fn from_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 2);
    for (i, char) in name.chars().enumerate() {
        if char.is_ascii_uppercase() {
            if i > 0 {
                result.push('-');
            }
            result.push(char.to_ascii_lowercase());
        } else {
            result.push(char);
        }
    }
    result
}

impl Style {
    /// Creates a style without any properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a recognised property. An empty value removes it.
    pub fn set(&mut self, property: Property, value: impl Into<String>) {
        let value = value.into();
        *self.slot(property) = Some(value).filter(|value| !value.is_empty());
    }

    /// Removes a recognised property
    pub fn remove(&mut self, property: Property) {
        *self.slot(property) = None;
    }

    /// Sets any property by name, recognised or not. An empty value removes it.
    pub fn insert(&mut self, name: &str, value: &str) {
        if let Some(property) = Property::parse(name) {
            self.set(property, value);
            return;
        }
        let position = self.other.iter().position(|(key, _)| key == name);
        match (position, value.is_empty()) {
            (Some(i), true) => {
                self.other.remove(i);
            }
            (Some(i), false) => value.clone_into(&mut self.other[i].1),
            (None, false) => self.other.push((name.into(), value.into())),
            (None, true) => {}
        }
    }

    /// Returns each property and it's value, in the order they're written
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        Property::ALL
            .iter()
            .filter_map(|property| Some((property.name(), self.get(*property)?)))
            .chain(
                self.other
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            )
    }

    /// Whether no property is set
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Sets `display:inline`
    pub fn show(&mut self) {
        self.set(Property::Display, "inline");
    }

    /// Sets `display:none`
    pub fn hide(&mut self) {
        self.set(Property::Display, "none");
    }

    /// Sets the `fill`
    pub fn set_fill(&mut self, fill: impl Into<String>) {
        self.set(Property::Fill, fill);
    }

    /// Sets the `stroke`, and the `stroke-width` when given
    pub fn set_stroke(&mut self, stroke: impl Into<String>, width: Option<&str>) {
        self.set(Property::Stroke, stroke);
        if let Some(width) = width.filter(|width| !width.is_empty()) {
            self.set(Property::StrokeWidth, width);
        }
    }

    /// Returns a reference to an element by id, for use as a paint, e.g. `url(#gradient)`
    pub fn url(id: &str) -> String {
        format!("url(#{id})")
    }
}

impl FromStr for Style {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for Style {
    /// Parses `name:value` declarations separated by `;`, skipping any without a name or value
    fn from(value: &str) -> Self {
        let mut style = Self::new();
        for (name, value) in value
            .split(';')
            .filter_map(|declaration| declaration.split_once(':'))
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, _)| !name.is_empty())
        {
            style.insert(name, value);
        }
        style
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.entries()
            .format_with("", |(name, value), f| f(&format_args!("{name}:{value};")))
            .fmt(f)
    }
}

#[test]
fn parse() {
    let style = Style::from("stroke: blue ; fill:red;cursor:pointer;; :empty;invalid;strokeWidth:2");
    assert_eq!(style.fill.as_deref(), Some("red"));
    assert_eq!(style.stroke_width.as_deref(), Some("2"));
    assert_eq!(style.other, vec![("cursor".into(), "pointer".into())]);
    assert_eq!(
        style.to_string(),
        "fill:red;stroke:blue;stroke-width:2;cursor:pointer;"
    );
    assert_eq!(Style::from(style.to_string().as_str()), style);
    assert!(Style::from("").is_empty());
    assert_eq!(Style::from("").to_string(), "");
}

#[test]
fn camel_case() {
    assert_eq!(Property::StrokeWidth.camel_name(), "strokeWidth");
    assert_eq!(to_camel_case("fill"), "fill");
    assert_eq!(from_camel_case("stopOpacity"), "stop-opacity");
    assert_eq!(Property::parse("fontFamily"), Some(Property::FontFamily));
    assert_eq!(Property::parse("font-family"), Some(Property::FontFamily));
    assert_eq!(Property::parse("cursor"), None);
}

#[test]
fn display_and_other_values() {
    let mut style = Style::new();
    style.hide();
    assert_eq!(style.to_string(), "display:none;");
    style.show();
    style.insert("cursor", "pointer");
    style.insert("cursor", "move");
    style.set_stroke("black", Some(""));
    assert_eq!(style.to_string(), "stroke:black;display:inline;cursor:move;");

    style.insert("cursor", "");
    style.set(Property::Display, "");
    assert_eq!(style.to_string(), "stroke:black;");
    assert_eq!(Style::url("gradient"), "url(#gradient)");
}
