use iced::{button, container, slider, text_input, Background, Color, Vector};

const SURFACE: Color = Color {
    r: 0.05,
    g: 0.05,
    b: 0.09,
    a: 1.0,
};

const ACCENT: Color = Color {
    r: 0.42,
    g: 0.55,
    b: 0.96,
    a: 1.0,
};

const MUTED: Color = Color {
    r: 0.22,
    g: 0.24,
    b: 0.32,
    a: 1.0,
};

pub struct Container;

impl container::StyleSheet for Container {
    fn style(&self) -> container::Style {
        container::Style {
            text_color: Some(Color::WHITE),
            background: Some(Background::Color(SURFACE)),
            ..container::Style::default()
        }
    }
}

pub struct Button;

impl button::StyleSheet for Button {
    fn active(&self) -> button::Style {
        button::Style {
            background: Some(Background::Color(MUTED)),
            border_radius: 4.0,
            shadow_offset: Vector::new(0.0, 1.0),
            text_color: Color::WHITE,
            ..button::Style::default()
        }
    }

    fn hovered(&self) -> button::Style {
        button::Style {
            background: Some(Background::Color(ACCENT)),
            ..self.active()
        }
    }
}

pub struct Slider;

impl slider::StyleSheet for Slider {
    fn active(&self) -> slider::Style {
        slider::Style {
            rail_colors: (MUTED, Color::TRANSPARENT),
            handle: slider::Handle {
                shape: slider::HandleShape::Circle { radius: 7.0 },
                color: MUTED,
                border_width: 1.0,
                border_color: ACCENT,
            },
        }
    }

    fn hovered(&self) -> slider::Style {
        let active = self.active();
        slider::Style {
            handle: slider::Handle {
                color: ACCENT,
                ..active.handle
            },
            ..active
        }
    }

    fn dragging(&self) -> slider::Style {
        self.hovered()
    }
}

pub struct TextInput;

impl text_input::StyleSheet for TextInput {
    fn active(&self) -> text_input::Style {
        text_input::Style {
            background: Background::Color(SURFACE),
            border_radius: 4.0,
            border_width: 1.0,
            border_color: MUTED,
        }
    }

    fn focused(&self) -> text_input::Style {
        text_input::Style {
            border_color: ACCENT,
            ..self.active()
        }
    }

    fn placeholder_color(&self) -> Color {
        MUTED
    }

    fn value_color(&self) -> Color {
        Color::WHITE
    }

    fn selection_color(&self) -> Color {
        ACCENT
    }
}
