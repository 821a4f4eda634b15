use iced::{Border, Color, Shadow, Theme};
use iced::widget::button::{StyleSheet, Appearance};

const LINK_COLOR: Color = Color { r: 0.13, g: 0.4, b: 0.8, a: 1.0 };

// a button that looks like a hyperlink
pub struct LinkButtonStyleSheet;

impl StyleSheet for LinkButtonStyleSheet {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> Appearance {
        Appearance {
            shadow_offset: Default::default(),
            background: None,
            text_color: LINK_COLOR,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 0.0.into(),
            },
            shadow: Shadow::default(),
        }
    }
}
