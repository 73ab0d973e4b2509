use spindle_core::{Color, StyleProps, StyleSurface, apply_styles, css_number};
use smallvec::smallvec;

/// Horizontal bar whose fill width follows a 0..=100 progress value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressBar {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub bar: Color,
    pub border_radius: f64,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 10.0,
            background: Color::from_hex("#999"),
            bar: Color::BLACK,
            border_radius: 10.0,
        }
    }
}

impl ProgressBar {
    pub fn container_style(&self) -> StyleProps {
        smallvec![
            ("width", px(self.width)),
            ("height", px(self.height)),
            ("background-color", self.background.to_css()),
            ("border-radius", px(self.border_radius)),
            ("overflow", "hidden".to_string()),
        ]
    }

    pub fn bar_style(&self, progress: f64) -> StyleProps {
        smallvec![
            ("width", format!("{}%", css_number(progress))),
            ("height", "100%".to_string()),
            ("background-color", self.bar.to_css()),
            ("border-radius", px(self.border_radius)),
        ]
    }

    pub fn render(&self, container: &dyn StyleSurface, bar: &dyn StyleSurface, progress: f64) {
        apply_styles(container, &self.container_style());
        apply_styles(bar, &self.bar_style(progress));
    }
}

fn px(v: f64) -> String {
    format!("{}px", css_number(v))
}
