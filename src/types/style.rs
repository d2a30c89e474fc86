use serde::{Deserialize, Serialize};

/// Style of a single cell as reported by the model.
///
/// Field names follow the model's JSON payload so the same struct can be
/// decoded from a JS object or a model file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    pub fill: Fill,
    pub font: Font,
    pub border: Border,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl CellStyle {
    /// Explicit fill color, if the cell has one.
    pub fn fill_color(&self) -> Option<&str> {
        self.fill.fg_color.as_deref().filter(|c| !c.is_empty())
    }

    pub fn wrap_text(&self) -> bool {
        self.alignment.as_ref().is_some_and(|a| a.wrap_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    /// Size in pixels; zero means "use the default"
    pub sz: f64,
    /// Bold
    pub b: bool,
    /// Italic
    pub i: bool,
    /// Underline
    pub u: bool,
    pub strike: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderItem {
    pub style: BorderStyle,
    #[serde(default)]
    pub color: Option<String>,
}

/// Border line styles the model may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Thin,
    Medium,
    Thick,
    Double,
    Dotted,
    Dashed,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub wrap_text: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlignment {
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlignment {
    #[default]
    Bottom,
    Center,
    Top,
    Justify,
    Distributed,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn decodes_model_payload() {
        let json = r##"{
            "fill": {"fg_color": "#FFEEDD"},
            "font": {"sz": 16, "b": true, "color": "#112233"},
            "border": {"left": {"style": "medium", "color": "#000000"}},
            "alignment": {"horizontal": "center", "vertical": "top", "wrap_text": true}
        }"##;
        let style: CellStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.fill_color(), Some("#FFEEDD"));
        assert_eq!(style.font.sz, 16.0);
        assert!(style.font.b);
        assert!(style.wrap_text());
        assert_eq!(
            style.border.left.as_ref().map(|b| b.style),
            Some(BorderStyle::Medium)
        );
        let alignment = style.alignment.unwrap();
        assert_eq!(alignment.horizontal, HorizontalAlignment::Center);
        assert_eq!(alignment.vertical, VerticalAlignment::Top);
    }

    #[test]
    fn unknown_styles_are_tolerated() {
        let item: BorderStyle = serde_json::from_str(r#""wiggly""#).unwrap();
        assert_eq!(item, BorderStyle::Unknown);
        let h: HorizontalAlignment = serde_json::from_str(r#""sideways""#).unwrap();
        assert_eq!(h, HorizontalAlignment::Unknown);
    }

    #[test]
    fn empty_fill_counts_as_none() {
        let mut style = CellStyle::default();
        style.fill.fg_color = Some(String::new());
        assert_eq!(style.fill_color(), None);
    }
}
