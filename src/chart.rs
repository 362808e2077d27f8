use iced::mouse;
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Font, Point, Rectangle, Renderer, Size, Theme};

use crate::theme::Palette;

const PAD_LEFT: f32 = 46.0;
const PAD_RIGHT: f32 = 10.0;
const PAD_TOP: f32 = 24.0;
const PAD_BOTTOM: f32 = 8.0;

/// Hover state: the snapped sample index, not the raw pixel.
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    hovered: Option<usize>,
}

/// A single-series history chart drawn on an iced canvas.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub color: Color,
    pub data: Vec<f32>,
    pub y_max: f32,
    /// Unit suffix for readouts (e.g. "%").
    pub unit: String,
    pub palette: Palette,
}

impl LineChart {
    fn plot_rect(&self, bounds: Rectangle) -> Rectangle {
        Rectangle {
            x: PAD_LEFT,
            y: PAD_TOP,
            width: bounds.width - PAD_LEFT - PAD_RIGHT,
            height: bounds.height - PAD_TOP - PAD_BOTTOM,
        }
    }

    fn sample_point(&self, plot: Rectangle, i: usize, val: f32) -> Point {
        let n = self.data.len();
        let x = plot.x + (i as f32 / (n - 1) as f32) * plot.width;
        let frac = if self.y_max > 0.0 {
            (val / self.y_max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Point::new(x, plot.y + plot.height * (1.0 - frac))
    }
}

impl<Message: 'static> canvas::Program<Message> for LineChart {
    type State = ChartState;

    fn update(
        &self,
        state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let plot = self.plot_rect(bounds);
        let n = self.data.len();

        let hovered = match &event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => cursor
                .position_in(bounds)
                .filter(|pos| {
                    n >= 2 && plot.width > 0.0 && pos.x >= plot.x && pos.x <= plot.x + plot.width
                })
                .map(|pos| {
                    let frac = (pos.x - plot.x) / plot.width;
                    ((frac * (n - 1) as f32).round() as usize).min(n - 1)
                }),
            Event::Mouse(mouse::Event::CursorLeft) => None,
            _ => return (canvas::event::Status::Ignored, None),
        };

        if hovered != state.hovered {
            state.hovered = hovered;
        }
        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let pal = &self.palette;
        let plot = self.plot_rect(bounds);

        if plot.width <= 0.0 || plot.height <= 0.0 {
            return vec![frame.into_geometry()];
        }

        let bg = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.fill(&bg, pal.panel_bg);
        let border = Path::rectangle(
            Point::new(0.5, 0.5),
            Size::new(bounds.width - 1.0, bounds.height - 1.0),
        );
        frame.stroke(&border, Stroke::default().with_color(pal.border).with_width(0.5));

        let mut title = Text::from(self.title.clone());
        title.position = Point::new(plot.x, 4.0);
        title.color = pal.text;
        title.size = 12.0.into();
        frame.fill_text(title);

        // Horizontal grid at round tick values.
        if self.y_max > 0.0 {
            let step = tick_step(self.y_max, 5);
            let mut val = step;
            while val <= self.y_max + step * 0.001 {
                let y = plot.y + plot.height * (1.0 - val / self.y_max);
                let grid = Path::line(Point::new(plot.x, y), Point::new(plot.x + plot.width, y));
                frame.stroke(&grid, Stroke::default().with_color(pal.grid).with_width(1.0));

                let mut label = Text::from(if step >= 1.0 {
                    format!("{val:.0}")
                } else {
                    format!("{val:.1}")
                });
                label.position = Point::new(6.0, y - 5.0);
                label.color = pal.label;
                label.size = 10.0.into();
                label.font = Font::MONOSPACE;
                frame.fill_text(label);

                val += step;
            }
        }

        let n = self.data.len();
        if n >= 2 {
            let mut area = canvas::path::Builder::new();
            area.move_to(Point::new(plot.x, plot.y + plot.height));
            for (i, &val) in self.data.iter().enumerate() {
                area.line_to(self.sample_point(plot, i, val));
            }
            area.line_to(Point::new(plot.x + plot.width, plot.y + plot.height));
            area.close();
            let fill = Color::from_rgba(self.color.r, self.color.g, self.color.b, 0.18);
            frame.fill(&area.build(), fill);

            let mut line = canvas::path::Builder::new();
            for (i, &val) in self.data.iter().enumerate() {
                let point = self.sample_point(plot, i, val);
                if i == 0 {
                    line.move_to(point);
                } else {
                    line.line_to(point);
                }
            }
            frame.stroke(
                &line.build(),
                Stroke::default().with_color(self.color).with_width(1.8),
            );
        }

        // Hover crosshair with a value readout.
        if let Some(idx) = state.hovered {
            if n >= 2 && idx < n {
                let val = self.data[idx];
                let at = self.sample_point(plot, idx, val);

                let crosshair = Path::line(
                    Point::new(at.x, plot.y),
                    Point::new(at.x, plot.y + plot.height),
                );
                frame.stroke(
                    &crosshair,
                    Stroke::default()
                        .with_color(Color::from_rgba(pal.text.r, pal.text.g, pal.text.b, 0.35))
                        .with_width(1.0),
                );

                let dot = Path::circle(at, 3.5);
                frame.fill(&dot, self.color);
                frame.stroke(&dot, Stroke::default().with_color(pal.text).with_width(1.0));

                let readout = format!("{:.1}{}", val, self.unit);
                let text_w = readout.len() as f32 * 6.6 + 12.0;
                let tx = (at.x + 10.0).min(plot.x + plot.width - text_w);
                let box_path =
                    Path::rectangle(Point::new(tx - 4.0, plot.y + 2.0), Size::new(text_w, 16.0));
                frame.fill(
                    &box_path,
                    Color::from_rgba(pal.bg.r, pal.bg.g, pal.bg.b, 0.95),
                );
                frame.stroke(
                    &box_path,
                    Stroke::default().with_color(pal.border).with_width(0.8),
                );
                let mut tt = Text::from(readout);
                tt.position = Point::new(tx, plot.y + 4.0);
                tt.color = self.color;
                tt.size = 11.0.into();
                tt.font = Font::MONOSPACE;
                frame.fill_text(tt);
            }
        }

        // Latest value, top right.
        if let Some(&last) = self.data.last() {
            let current = format!("{:.1}{}", last, self.unit);
            let mut label = Text::from(current.clone());
            label.position = Point::new(bounds.width - current.len() as f32 * 6.6 - 10.0, 4.0);
            label.color = self.color;
            label.size = 11.0.into();
            label.font = Font::MONOSPACE;
            frame.fill_text(label);
        }

        vec![frame.into_geometry()]
    }
}

/// Round tick step (1, 2, 5, 10, …) dividing `range` into at most
/// `max_ticks` intervals.
fn tick_step(range: f32, max_ticks: usize) -> f32 {
    let rough = range / max_ticks as f32;
    let mag = 10f32.powf(rough.log10().floor());
    let norm = rough / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    (nice * mag).max(f32::EPSILON)
}
