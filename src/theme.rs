use serde::{Deserialize, Serialize};

use crate::canvas::{Color, Stroke};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: Color,
    pub circle_fill: Color,
    pub separator_color: Color,
    pub label_color: Color,
    /// One style per decorative line, in draw order.
    pub decorations: [Stroke; 3],
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            background: Color::rgb(0, 0, 0),
            circle_fill: Color::rgb(127, 127, 127),
            separator_color: Color::rgb(64, 64, 64),
            label_color: Color::rgb(255, 255, 255),
            decorations: [
                Stroke::solid(Color::rgb(255, 0, 0), 2.0),
                Stroke::dashed(Color::rgb(0, 0, 255), 4.0, vec![10.0, 5.0]),
                Stroke::solid(Color::rgba(255, 255, 0, 127), 1.0),
            ],
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::rgb(255, 255, 255),
            circle_fill: Color::rgb(236, 236, 255),
            separator_color: Color::rgb(147, 112, 219),
            label_color: Color::rgb(51, 51, 51),
            decorations: [
                Stroke::solid(Color::rgb(220, 38, 38), 2.0),
                Stroke::dashed(Color::rgb(37, 99, 235), 4.0, vec![10.0, 5.0]),
                Stroke::solid(Color::rgba(202, 138, 4, 127), 1.0),
            ],
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" | "default" | "dark" => Some(Self::classic()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decorations_are_distinct() {
        for theme in [Theme::classic(), Theme::light()] {
            let [a, b, c] = &theme.decorations;
            assert_ne!(a, b);
            assert_ne!(b, c);
            assert_ne!(a, c);
        }
    }

    #[test]
    fn classic_third_line_is_translucent() {
        let theme = Theme::classic();
        assert!(!theme.decorations[2].color.is_opaque());
        assert_eq!(theme.decorations[1].dash.as_deref(), Some(&[10.0, 5.0][..]));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(Theme::by_name("Light"), Some(Theme::light()));
        assert_eq!(Theme::by_name("classic"), Some(Theme::classic()));
        assert!(Theme::by_name("neon").is_none());
    }
}
