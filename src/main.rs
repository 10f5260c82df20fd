mod color;
mod error;
mod field;
mod frame_loop;
mod parameters;
mod raster;
mod star;
mod style;
mod surface;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::{Duration, Instant};

use iced::button::{self, Button};
use iced::image::{self, Image};
use iced::slider::{self, Slider};
use iced::text_input::{self, TextInput};
use iced::time;
use iced::{
    Align, Application, Clipboard, Column, Command, Container, Element, Length, Row, Settings,
    Subscription, Text,
};

use crate::error::ConfigError;
use crate::field::{ParameterChange, Starfield};
use crate::frame_loop::FrameLoop;
use crate::parameters::Parameters;
use crate::raster::Raster;

/// Roughly one display refresh.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Clone, Debug)]
enum Message {
    Frame(Instant),
    TogglePlay,
    Step,
    Randomize,
    SpeedChanged(f32),
    ColorChanged(String),
    ColorSubmitted,
    DensityChanged(u32),
    TrailChanged(u32),
    GlowChanged(u32),
    ParametersLoaded(Parameters),
}

#[derive(Default)]
struct Controls {
    play_button: button::State,
    next_button: button::State,
    randomize_button: button::State,
    speed_slider: slider::State,
    density_slider: slider::State,
    trail_slider: slider::State,
    glow_slider: slider::State,
    color_input: text_input::State,
}

struct Starscape {
    field: Starfield<StdRng>,
    raster: Raster,
    frame_loop: FrameLoop,
    frame: image::Handle,
    color_text: String,
    last_tick_duration: Duration,
    controls: Controls,
}

impl Default for Starscape {
    fn default() -> Self {
        let parameters = Parameters::default();
        let raster = Raster::new(parameters.width, parameters.height);
        let field = Starfield::new(
            parameters.clone(),
            parameters.width as f32,
            StdRng::from_entropy(),
        );
        Self {
            frame: raster.to_handle(),
            color_text: parameters.color.to_string(),
            field,
            raster,
            frame_loop: FrameLoop::default(),
            last_tick_duration: Duration::default(),
            controls: Controls::default(),
        }
    }
}

impl Starscape {
    fn tick(&mut self) {
        let start = Instant::now();
        self.field.tick(&mut self.raster);
        self.frame = self.raster.to_handle();
        self.last_tick_duration = start.elapsed();
    }

    fn change(&mut self, change: ParameterChange) {
        if let Err(err) = self.field.apply(change) {
            tracing::warn!(%err, "rejected parameter change");
        }
    }

    fn load_parameters(&mut self, parameters: Parameters) {
        if self.raster.size() != (parameters.width, parameters.height) {
            self.raster = Raster::new(parameters.width, parameters.height);
        }
        self.color_text = parameters.color.to_string();
        self.field.set_parameters(parameters);
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Frame(now) => {
                if self.frame_loop.is_running() {
                    let delta = self.frame_loop.advance(now);
                    self.tick();
                    tracing::trace!(?delta, duration = ?self.last_tick_duration, "frame");
                }
            }
            Message::TogglePlay => {
                self.frame_loop.toggle();
            }
            Message::Step => {
                if !self.frame_loop.is_running() {
                    self.frame_loop.advance(Instant::now());
                    self.tick();
                }
            }
            Message::Randomize => {
                self.raster.clear();
                self.field.rebuild();
                self.frame = self.raster.to_handle();
            }
            Message::SpeedChanged(speed) => {
                self.change(ParameterChange::Speed(speed));
            }
            Message::ColorChanged(text) => {
                // only complete `#rrggbb` values are applied while typing
                if text.len() == 7 {
                    self.change(ParameterChange::Color(text.clone()));
                }
                self.color_text = text;
            }
            Message::ColorSubmitted => {
                self.change(ParameterChange::Color(self.color_text.clone()));
                self.color_text = self.field.parameters().color.to_string();
            }
            Message::DensityChanged(density) => {
                self.change(ParameterChange::Density(density));
            }
            Message::TrailChanged(trail) => {
                self.change(ParameterChange::Trail(trail));
            }
            Message::GlowChanged(glow) => {
                self.change(ParameterChange::Glow(glow));
            }
            Message::ParametersLoaded(parameters) => {
                self.load_parameters(parameters);
                self.frame_loop.start();
            }
        }
    }
}

impl Application for Starscape {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Flags = ();

    fn new(_flags: Self::Flags) -> (Self, Command<Message>) {
        let path = Parameters::path();
        (
            Self::default(),
            Command::perform(Parameters::load(path.clone()), move |result| {
                parameters_loaded(&path, result)
            }),
        )
    }

    fn title(&self) -> String {
        String::from("Starscape")
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.frame_loop.is_running() {
            time::every(FRAME_INTERVAL).map(Message::Frame)
        } else {
            Subscription::none()
        }
    }

    fn update(&mut self, message: Self::Message, _clipboard: &mut Clipboard) -> Command<Message> {
        self.handle(message);
        Command::none()
    }

    fn view(&mut self) -> Element<Message> {
        let parameters = self.field.parameters();
        let running = self.frame_loop.is_running();

        // stepping only makes sense while paused
        let mut next_button =
            Button::new(&mut self.controls.next_button, Text::new("Next")).style(style::Button);
        if !running {
            next_button = next_button.on_press(Message::Step);
        }

        let playback_controls = Row::new()
            .spacing(10)
            .push(
                Button::new(
                    &mut self.controls.play_button,
                    Text::new(if running { "Stop" } else { "Play" }),
                )
                .on_press(Message::TogglePlay)
                .style(style::Button),
            )
            .push(next_button)
            .push(
                Button::new(&mut self.controls.randomize_button, Text::new("Randomize"))
                    .on_press(Message::Randomize)
                    .style(style::Button),
            );

        let motion_controls = Row::new()
            .spacing(10)
            .push(
                Slider::new(
                    &mut self.controls.speed_slider,
                    0.5..=10.0,
                    parameters.speed,
                    Message::SpeedChanged,
                )
                .step(0.5)
                .width(Length::Units(160))
                .style(style::Slider),
            )
            .push(Text::new(format!("Speed = {:.1}", parameters.speed)).size(16))
            .push(
                Slider::new(
                    &mut self.controls.density_slider,
                    50..=2000,
                    parameters.density,
                    Message::DensityChanged,
                )
                .step(50)
                .width(Length::Units(160))
                .style(style::Slider),
            )
            .push(Text::new(format!("Density = {}", parameters.density)).size(16))
            .align_items(Align::Center);

        let look_controls = Row::new()
            .spacing(10)
            .push(
                Slider::new(
                    &mut self.controls.trail_slider,
                    0..=100,
                    parameters.trail,
                    Message::TrailChanged,
                )
                .step(1)
                .width(Length::Units(160))
                .style(style::Slider),
            )
            .push(Text::new(format!("Trail = {}%", parameters.trail)).size(16))
            .push(
                Slider::new(
                    &mut self.controls.glow_slider,
                    0..=20,
                    parameters.glow,
                    Message::GlowChanged,
                )
                .step(1)
                .width(Length::Units(160))
                .style(style::Slider),
            )
            .push(Text::new(format!("Glow = {}", parameters.glow)).size(16))
            .push(
                TextInput::new(
                    &mut self.controls.color_input,
                    "#rrggbb",
                    &self.color_text,
                    Message::ColorChanged,
                )
                .on_submit(Message::ColorSubmitted)
                .padding(6)
                .size(16)
                .width(Length::Units(100))
                .style(style::TextInput),
            )
            .align_items(Align::Center);

        let status = Text::new(format!(
            "state = {:?}\nframes = {}\nstars = {}\nlast_tick_duration = {:?}",
            self.frame_loop.state(),
            self.frame_loop.frames(),
            self.field.stars().len(),
            self.last_tick_duration,
        ))
        .size(14);

        let controls = Row::new()
            .spacing(30)
            .push(playback_controls)
            .push(
                Column::new()
                    .spacing(8)
                    .push(motion_controls)
                    .push(look_controls),
            )
            .push(status)
            .align_items(Align::Center);

        let content = Column::new()
            .spacing(10)
            .padding(10)
            .align_items(Align::Center)
            .push(
                Image::new(self.frame.clone())
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .push(controls);

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::Container)
            .into()
    }
}

fn parameters_loaded(path: &Path, result: Result<Parameters, ConfigError>) -> Message {
    match result {
        Ok(parameters) => {
            tracing::info!(path = %path.display(), "loaded parameters");
            Message::ParametersLoaded(parameters)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "using default parameters");
            Message::ParametersLoaded(Parameters::default())
        }
    }
}

fn main() -> iced::Result {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    tracing::info!("starscape starting");

    Starscape::run(Settings {
        antialiasing: true,
        window: iced::window::Settings {
            size: (1280, 880),
            ..iced::window::Settings::default()
        },
        ..Settings::default()
    })
}
