/// This file contains the application model
use std::time::Duration;

use tokio::sync::mpsc;
use tuirealm::terminal::TerminalBridge;
use tuirealm::{Application, EventListenerCfg, Sub, SubClause, SubEventClause, Update};

use crate::components::{
    admin::Admin, bottom_bar::BottomBar, conversation::Conversation, dossier::Dossiers,
    help::Help, home::Home, inbox::Inbox, login::Login, menu::Menu,
    network_receptor::NetworkReceptor, rooms::RoomsPane, Id, MenuSelection, Msg,
};

use super::layout;
use super::network::{
    types::{Request, UserEvent},
    NetworkClient,
};
use super::types::{ClientConfig, Theme, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Home,
    Room,
    Dossiers,
    Admin,
    Inbox,
}

#[derive(Default)]
pub struct AppState {
    pub user: Option<User>,
    pub screen: Screen,
    pub theme: Theme,
    pub focus: Option<Id>,
}

pub struct Model {
    /// Application
    pub app: Application<Id, Msg, UserEvent>,
    pub network_channel: mpsc::UnboundedSender<Request>,
    /// Indicates that the application must quit
    pub quit: bool,
    /// Tells whether to redraw interface
    pub redraw: bool,
    /// Used to draw to terminal
    pub terminal: TerminalBridge,
    /// State of the application
    pub state: AppState,
    /// In order to safely close any open connections
    pub network_join_handler: Option<std::thread::JoinHandle<()>>,
}

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ClientArgs {
    /// Path to the client configuration file
    #[arg(short, long, default_value = "config/client.toml")]
    pub config: String,
    /// Override the configured server url
    #[arg(long)]
    pub server_url: Option<String>,
}

impl Model {
    pub fn new(config: ClientConfig, theme: Theme) -> Self {
        let (request_sender, request_receiver) = mpsc::unbounded_channel::<Request>();
        // start the network client

        let mut network_client = NetworkClient::default();
        let cloned_network_client = network_client.clone();

        let join_handler = std::thread::spawn(move || {
            network_client.start_network_client(request_receiver, config)
        });

        // Resolve any stored session before the first paint
        request_sender.send(Request::Bootstrap).unwrap();

        Self {
            app: Self::init_app(cloned_network_client, theme),
            network_channel: request_sender,
            quit: false,
            redraw: true,
            terminal: TerminalBridge::new().expect("Cannot initialize terminal"),
            state: AppState {
                theme,
                focus: Some(Id::Login),
                ..AppState::default()
            },
            network_join_handler: Some(join_handler),
        }
    }

    fn init_app(network_client: NetworkClient, theme: Theme) -> Application<Id, Msg, UserEvent> {
        let mut app: Application<Id, Msg, UserEvent> = Application::init(
            EventListenerCfg::default()
                .default_input_listener(Duration::from_millis(20))
                .port(Box::new(network_client), Duration::from_millis(10))
                .poll_timeout(Duration::from_millis(10))
                .tick_interval(Duration::from_secs(1)),
        );

        app.mount(
            Id::BottomBar,
            Box::new(BottomBar::new(theme)),
            vec![Sub::new(SubEventClause::Any, SubClause::Always)],
        )
        .unwrap();

        app.mount(
            Id::NetworkReceptor,
            Box::<NetworkReceptor>::default(),
            vec![Sub::new(SubEventClause::Any, SubClause::Always)],
        )
        .unwrap();

        app.mount(Id::Help, Box::new(Help::new(theme)), Vec::default())
            .unwrap();

        app.mount(Id::Login, Box::new(Login::new(theme)), Vec::default())
            .unwrap();

        // Activate the login form
        assert!(app.active(&Id::Login).is_ok());
        app
    }
}

impl Model {
    pub fn view(&mut self) {
        self.terminal
            .raw_mut()
            .draw(|f| {
                let custom_layout = layout::CustomLayout::new(f.size());

                if self.app.mounted(&Id::Menu) {
                    self.app.view(&Id::Menu, f, custom_layout.menu);
                }
                if self.app.mounted(&Id::RoomsPane) {
                    self.app.view(&Id::RoomsPane, f, custom_layout.details);
                }
                self.app.view(&Id::Help, f, custom_layout.navigation);

                let action = Self::action_id(self.state.screen);
                if self.app.mounted(&action) {
                    self.app.view(&action, f, custom_layout.action_area);
                }

                self.app.view(&Id::BottomBar, f, custom_layout.bottom_bar);
            })
            .unwrap();
    }

    fn action_id(screen: Screen) -> Id {
        match screen {
            Screen::Login => Id::Login,
            Screen::Home => Id::Home,
            Screen::Room => Id::Conversation,
            Screen::Dossiers => Id::Dossiers,
            Screen::Admin => Id::Admin,
            Screen::Inbox => Id::Inbox,
        }
    }

    fn send_request(&self, request: Request) {
        self.network_channel.send(request).unwrap();
    }

    fn activate(&mut self, id: Id) {
        if self.app.mounted(&id) && self.app.active(&id).is_ok() {
            self.state.focus = Some(id);
        }
    }

    /// Replace the action area with `component` and switch to `screen`.
    fn mount_screen(
        &mut self,
        screen: Screen,
        component: Box<dyn tuirealm::Component<Msg, UserEvent>>,
        subscribe: bool,
    ) {
        let previous = Self::action_id(self.state.screen);
        let id = Self::action_id(screen);

        if self.app.mounted(&id) {
            self.app.umount(&id).unwrap();
        }

        let subs = if subscribe {
            vec![Sub::new(SubEventClause::Any, SubClause::Always)]
        } else {
            Vec::default()
        };
        self.app.mount(id.clone(), component, subs).unwrap();

        if previous != id && self.app.mounted(&previous) {
            self.app.umount(&previous).unwrap();
        }

        self.state.screen = screen;
        self.activate(id);
    }

    fn mount_chrome(&mut self, user: &User) {
        let theme = self.state.theme;

        if self.app.mounted(&Id::Menu) {
            self.app.umount(&Id::Menu).unwrap();
        }
        self.app
            .mount(
                Id::Menu,
                Box::new(Menu::new(theme, &user.username, user.is_admin())),
                vec![Sub::new(SubEventClause::Any, SubClause::Always)],
            )
            .unwrap();

        if self.app.mounted(&Id::RoomsPane) {
            self.app.umount(&Id::RoomsPane).unwrap();
        }
        self.app
            .mount(
                Id::RoomsPane,
                Box::new(RoomsPane::new(theme)),
                vec![Sub::new(SubEventClause::Any, SubClause::Always)],
            )
            .unwrap();
    }

    fn umount_chrome(&mut self) {
        if self.app.mounted(&Id::Menu) {
            self.app.umount(&Id::Menu).unwrap();
        }
        if self.app.mounted(&Id::RoomsPane) {
            self.app.umount(&Id::RoomsPane).unwrap();
        }
    }

    fn show_home(&mut self) {
        let theme = self.state.theme;
        self.mount_screen(Screen::Home, Box::new(Home::new(theme)), true);
    }

    fn show_login(&mut self) {
        let theme = self.state.theme;
        self.umount_chrome();
        self.mount_screen(Screen::Login, Box::new(Login::new(theme)), false);
    }

    fn focus_ring(&self) -> Vec<Id> {
        let mut ring = vec![Self::action_id(self.state.screen)];
        if self.app.mounted(&Id::RoomsPane) {
            ring.push(Id::RoomsPane);
        }
        if self.app.mounted(&Id::Menu) {
            ring.push(Id::Menu);
        }
        ring
    }

    fn focus_next(&mut self) {
        let ring = self.focus_ring();
        let current = self
            .state
            .focus
            .as_ref()
            .and_then(|id| ring.iter().position(|candidate| candidate == id))
            .unwrap_or(0);
        let next = ring[(current + 1) % ring.len()].clone();
        self.activate(next);
    }

    fn handle_network_event(&mut self, event: UserEvent) {
        match event {
            UserEvent::SessionReady { user: Some(user) } | UserEvent::LoggedIn { user } => {
                self.state.user = Some(user.clone());
                self.mount_chrome(&user);
                self.show_home();
            }
            UserEvent::SessionReady { user: None } => {
                // No valid session: stay on the login form.
            }
            UserEvent::LoggedOut => {
                self.state.user = None;
                self.show_login();
            }
            UserEvent::RoomOpened { room, messages } => {
                let theme = self.state.theme;
                let username = self
                    .state
                    .user
                    .as_ref()
                    .map(|user| user.username.clone())
                    .unwrap_or_default();
                self.mount_screen(
                    Screen::Room,
                    Box::new(Conversation::new(theme, username, room, messages)),
                    true,
                );
            }
            UserEvent::Dossier {
                personas,
                clues,
                annotations,
            } => {
                let theme = self.state.theme;
                self.mount_screen(
                    Screen::Dossiers,
                    Box::new(Dossiers::new(theme, personas, clues, annotations)),
                    false,
                );
            }
            UserEvent::AdminData {
                personas,
                murder_clues,
                rooms,
            } => {
                let theme = self.state.theme;
                self.mount_screen(
                    Screen::Admin,
                    Box::new(Admin::new(theme, personas, murder_clues, rooms)),
                    true,
                );
            }
            UserEvent::ReceivedDirectMessages { messages } => {
                if self.state.screen != Screen::Inbox {
                    let theme = self.state.theme;
                    self.mount_screen(
                        Screen::Inbox,
                        Box::new(Inbox::for_user(theme, messages)),
                        true,
                    );
                }
            }
            UserEvent::SentDirectMessages { messages } => {
                if self.state.screen != Screen::Inbox {
                    let theme = self.state.theme;
                    self.mount_screen(
                        Screen::Inbox,
                        Box::new(Inbox::for_admin(theme, messages)),
                        true,
                    );
                }
            }
            // Everything else is rendered by the subscribed components.
            _ => {}
        }
    }

    fn handle_menu(&mut self, selection: MenuSelection) {
        match selection {
            MenuSelection::Home => {
                self.show_home();
                self.send_request(Request::FetchSavedRooms);
            }
            MenuSelection::Dossiers => self.send_request(Request::FetchDossier),
            MenuSelection::Messages => {
                let is_admin = self.state.user.as_ref().is_some_and(User::is_admin);
                if is_admin {
                    self.send_request(Request::FetchSentDirectMessages);
                } else {
                    self.send_request(Request::FetchReceivedDirectMessages);
                }
            }
            MenuSelection::Admin => self.send_request(Request::FetchAdmin),
            MenuSelection::ToggleTheme => {
                self.state.theme = self.state.theme.toggled();
                self.send_request(Request::SetTheme {
                    theme: self.state.theme,
                });

                if let Some(user) = self.state.user.clone() {
                    self.mount_chrome(&user);
                }
                if self.app.mounted(&Id::BottomBar) {
                    self.app.umount(&Id::BottomBar).unwrap();
                }
                self.app
                    .mount(
                        Id::BottomBar,
                        Box::new(BottomBar::new(self.state.theme)),
                        vec![Sub::new(SubEventClause::Any, SubClause::Always)],
                    )
                    .unwrap();
                if self.app.mounted(&Id::Help) {
                    self.app.umount(&Id::Help).unwrap();
                }
                self.app
                    .mount(
                        Id::Help,
                        Box::new(Help::new(self.state.theme)),
                        Vec::default(),
                    )
                    .unwrap();

                // Repopulate the freshly mounted rooms pane.
                self.send_request(Request::FetchSavedRooms);
                let action = Self::action_id(self.state.screen);
                self.activate(action);
            }
            MenuSelection::Logout => self.send_request(Request::Logout),
            MenuSelection::Quit => {
                self.update(Some(Msg::AppClose));
            }
        }
    }
}

impl Update<Msg> for Model {
    fn update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        if let Some(msg) = msg {
            self.redraw = true;
            match msg {
                Msg::AppClose => {
                    self.quit = true;
                    self.network_channel.send(Request::Quit).unwrap();
                    if let Some(network_join_handler) = self.network_join_handler.take() {
                        network_join_handler.join().unwrap();
                    }
                    None
                }
                Msg::Network(event) => {
                    self.handle_network_event(event);
                    None
                }
                Msg::Menu(selection) => {
                    self.handle_menu(selection);
                    None
                }
                Msg::FocusNext => {
                    self.focus_next();
                    None
                }
                Msg::SubmitLogin { username, password } => {
                    self.send_request(Request::Login { username, password });
                    None
                }
                Msg::OpenRoom(code4) => {
                    self.send_request(Request::OpenRoom { code4 });
                    None
                }
                Msg::RemoveSavedRoom(code4) => {
                    self.send_request(Request::RemoveSavedRoom { code4 });
                    None
                }
                Msg::LeaveRoom => {
                    self.send_request(Request::LeaveRoom);
                    self.show_home();
                    self.send_request(Request::FetchSavedRooms);
                    None
                }
                Msg::SendChatMessage { code4, content } => {
                    self.send_request(Request::SendMessage { code4, content });
                    None
                }
                Msg::Annotate {
                    persona,
                    annotation,
                } => {
                    self.send_request(Request::SetAnnotation {
                        persona,
                        annotation,
                    });
                    None
                }
                Msg::CreateRoom { player_a, player_b } => {
                    self.send_request(Request::CreateRoom { player_a, player_b });
                    None
                }
                Msg::SendDirectMessage {
                    user_username,
                    content,
                } => {
                    self.send_request(Request::SendDirectMessage {
                        user_username,
                        content,
                    });
                    None
                }
                Msg::ReDraw => None,
            }
        } else {
            None
        }
    }
}
