use gloo_storage::{LocalStorage, Storage};
use ideabox_client::{Session, SessionStore};
use yew::prelude::*;

mod ui;

const KEY_HOST: &str = "host";
const KEY_SESSION: &str = "session";

fn main() {
    tracing_wasm::set_as_global_default();
    yew::Renderer::<Root>::new().render();
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LoginInfo {
    pub host: String,
    pub session: Session,
}

/// Session kept in the browser's local storage, so that it survives reloads
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageSession;

impl SessionStore for LocalStorageSession {
    fn load(&self) -> Option<Session> {
        LocalStorage::get(KEY_SESSION).ok()
    }

    fn save(&self, session: Session) {
        if let Err(e) = LocalStorage::set(KEY_SESSION, session) {
            tracing::error!(?e, "failed saving session to LocalStorage");
        }
    }

    fn clear(&self) {
        LocalStorage::delete(KEY_SESSION);
    }
}

pub enum RootMsg {
    UserLogin(LoginInfo),
    UserLogout,
}

struct Root {
    host: Option<String>,
    logged_in: bool,
}

impl Component for Root {
    type Message = RootMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            host: LocalStorage::get(KEY_HOST).ok(),
            logged_in: LocalStorageSession.load().is_some(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            RootMsg::UserLogin(info) => {
                if let Err(e) = LocalStorage::set(KEY_HOST, &info.host) {
                    tracing::error!(?e, "failed saving host to LocalStorage");
                }
                LocalStorageSession.save(info.session);
                self.host = Some(info.host);
                self.logged_in = true;
            }
            RootMsg::UserLogout => {
                LocalStorageSession.clear();
                self.logged_in = false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match (&self.host, self.logged_in) {
            (Some(host), true) => html! {
                <ui::App
                    host={host.clone()}
                    on_logout={ctx.link().callback(|_| RootMsg::UserLogout)}
                />
            },
            _ => html! {
                <div class="container">
                    <ui::Login
                        host={self.host.clone()}
                        on_submit={ctx.link().callback(RootMsg::UserLogin)}
                    />
                </div>
            },
        }
    }
}
