//! Stroke definitions for shape outlines and connector lines.

use std::str::FromStr;

use serde::Deserialize;

use crate::color::Color;

/// Dash pattern of a stroke.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// 5px dash, 5px gap
    Dashed,
    /// 2px dot, 3px gap
    Dotted,
    /// 10px dash, 5px gap, 2px dot, 5px gap
    DashDot,
    /// Custom dash/gap pattern, comma or space separated
    Custom(String),
}

impl StrokeStyle {
    /// Dash/gap lengths for this style, empty for solid lines.
    pub fn dash_pattern(&self) -> Vec<f32> {
        match self {
            Self::Solid => Vec::new(),
            Self::Dashed => vec![5.0, 5.0],
            Self::Dotted => vec![2.0, 3.0],
            Self::DashDot => vec![10.0, 5.0, 2.0, 5.0],
            Self::Custom(pattern) => pattern
                .split([',', ' '])
                .filter_map(|part| part.trim().parse::<f32>().ok())
                .collect(),
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "dash-dot" | "dashdot" => Ok(Self::DashDot),
            _ if s
                .split([',', ' '])
                .filter(|part| !part.is_empty())
                .all(|part| part.parse::<f32>().is_ok()) =>
            {
                Ok(Self::Custom(s.to_string()))
            }
            _ => Err(format!(
                "invalid stroke style `{s}`, expected solid, dashed, dotted, dash-dot or a dash pattern"
            )),
        }
    }
}

/// Color, width and dash pattern of a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    /// Returns a copy with the width multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            ..self.clone()
        }
    }
}

impl Default for StrokeDefinition {
    /// Black, 1px, solid.
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_style_from_str() {
        assert_eq!("solid".parse::<StrokeStyle>().unwrap(), StrokeStyle::Solid);
        assert_eq!("dash-dot".parse::<StrokeStyle>().unwrap(), StrokeStyle::DashDot);
        assert_eq!(
            "4,2".parse::<StrokeStyle>().unwrap(),
            StrokeStyle::Custom("4,2".to_string())
        );
        assert!("zigzag".parse::<StrokeStyle>().is_err());
    }

    #[test]
    fn test_stroke_style_dash_pattern() {
        assert!(StrokeStyle::Solid.dash_pattern().is_empty());
        assert_eq!(StrokeStyle::Dashed.dash_pattern(), vec![5.0, 5.0]);
        assert_eq!(
            StrokeStyle::Custom("4, 2 1".to_string()).dash_pattern(),
            vec![4.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_stroke_definition_scaled() {
        let mut stroke = StrokeDefinition::default();
        stroke.set_style(StrokeStyle::Dotted);
        let scaled = stroke.scaled(3.0);
        assert_eq!(scaled.width(), 3.0);
        assert_eq!(scaled.style(), &StrokeStyle::Dotted);
    }
}
