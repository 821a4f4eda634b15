use std::sync::{Arc, Mutex};
use futures::channel::mpsc::channel;
use iced::{Alignment, Application, Command, Element, Length, Settings, Size, Subscription, executor, window};
use iced::event::{self, Event};
use iced::theme::{self, Theme};
use iced::widget::{Column, button, column, container, horizontal_rule, row, text};
use log::{error, info};
use tokio_util::sync::{CancellationToken};

use crate::config::types::Config;
use crate::device::constants::EVENT_CHANNEL_SIZE;
use crate::device::types::DeviceEvent;
use crate::dispatch::dispatcher::EventDispatcher;
use crate::dispatch::slots::{Slot, SLOTS};
use crate::dispatch::types::Effect;
use crate::error::{AppRunError, APP_TITLE};
use crate::gui::open::open_link;
use crate::gui::style::{LinkButtonStyleSheet};
use crate::gui::subscription::{session_event_subscription, SessionEvents};
use crate::gui::types::Message;
use crate::sim::headset::SimulatedHeadset;

pub struct ApplicationFlags {
    pub config: Config,
}

pub struct EegApplication {
    // this token is cancelled upon exit
    app_cancel: CancellationToken,

    // messages that the user must click away
    notices: Vec<String>,

    dispatcher: EventDispatcher<SimulatedHeadset>,
    session_events: SessionEvents,

    about_url: String,
}

impl EegApplication {
    fn before_close(&mut self) {
        self.dispatcher.close();
        self.app_cancel.cancel();
    }

    fn open_link(&self, url: String) -> Command<Message> {
        let fut = async move {
            match open_link(&url).await {
                Ok(_) => true,
                Err(err) => {
                    error!("Failed to open link: {:?}", &err);
                    false
                },
            }
        };

        Command::perform(fut, Message::LinkOpened)
    }

    fn device_event(&mut self, event: DeviceEvent) {
        if let Effect::Notify(notification) = self.dispatcher.dispatch(event) {
            self.notices.push(notification.message().to_string());
        }
    }
}

impl Application for EegApplication {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ApplicationFlags;

    fn new(flags: ApplicationFlags) -> (EegApplication, Command<Self::Message>) {
        let app_cancel = CancellationToken::new();
        let config = flags.config;

        // the session is created once for the lifetime of the window, raw mode is fixed from here on
        let (sender, receiver) = channel::<DeviceEvent>(EVENT_CHANNEL_SIZE);
        let headset = SimulatedHeadset::new(config.headset.clone(), sender, app_cancel.child_token());

        let app = EegApplication {
            app_cancel,
            notices: Vec::new(),
            dispatcher: EventDispatcher::new(headset, config.raw_mode),
            session_events: Arc::new(Mutex::new(Some(receiver))),
            about_url: config.about_url,
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from(APP_TITLE)
    }

    fn update(&mut self, message: Message) -> Command<Self::Message> {
        match message {
            Message::NoticeConfirmed => {
                if !self.notices.is_empty() {
                    self.notices.remove(0);
                }
            },
            Message::ConnectPress => {
                self.dispatcher.request_connect();
            },
            Message::AboutPress => {
                return self.open_link(self.about_url.clone());
            },
            Message::LinkOpened(success) => {
                if !success {
                    self.notices.push(format!("Failed to open {}", self.about_url));
                }
            },
            Message::EventOccurred(Event::Window(id, window::Event::CloseRequested)) => {
                info!("Close requested");
                self.before_close();
                return window::close(id);
            },
            Message::DeviceEvent(event) => {
                self.device_event(event);
            },

            _ => {}
        }

        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            event::listen().map(Message::EventOccurred),
            session_event_subscription(self.session_events.clone()).map(Message::DeviceEvent),
        ])
    }

    fn view(&self) -> Element<Message> {
        let slots = self.dispatcher.slots();

        let slot_row = |slot: Slot| -> Element<Message> {
            row![
                text(slot.to_string()).width(150),
                text(slots.text(slot)).size(24),
            ]
            .align_items(Alignment::Center)
            .spacing(20)
            .into()
        };

        let notices = Column::with_children(
            self.notices
                .iter()
                .take(1)
                .map(|notice| {
                    row![
                        text(notice),
                        button(text("Okay"))
                            .on_press(Message::NoticeConfirmed),
                    ]
                    .align_items(Alignment::Center)
                    .spacing(20)
                })
                .map(Element::from)
        );

        container(
            column![
                row![
                    button(text("Connect"))
                        .style(theme::Button::Primary)
                        .on_press(Message::ConnectPress),
                ],

                notices,

                horizontal_rule(10),

                Column::with_children(
                    SLOTS
                        .iter()
                        .filter(|slot| **slot != Slot::RawSample || self.dispatcher.raw_mode())
                        .map(|slot| slot_row(*slot))
                )
                    .spacing(20)
                    .width(Length::Shrink)
                    .height(Length::Fill),

                button(
                    text("About EEG Starter")
                        .size(14)
                )
                    .style(theme::Button::Custom(Box::new(LinkButtonStyleSheet)))
                    .on_press(Message::AboutPress),

            ].align_items(Alignment::Center).spacing(20),
        )
        .width(Length::Fill)
        .padding(20)
        .into()
    }
}

pub fn run_application(config: Config) -> Result<(), AppRunError> {
    let flags = ApplicationFlags { config };
    let mut settings = Settings::with_flags(flags);

    // handle exits ourselves (Event::CloseRequested)
    settings.id = Some("eeg-starter".to_string());
    settings.window.exit_on_close_request = false;
    settings.window.size = Size::new(420.0, 480.0);
    settings.window.resizable = false;

    // this function will call process::exit() unless there was a startup error
    EegApplication::run(settings)?;
    Ok(())
}
