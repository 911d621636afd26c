use ideabox_client::{api::AuthToken, Session};
use yew::prelude::*;

use crate::LoginInfo;

#[derive(Clone, PartialEq, Properties)]
pub struct LoginProps {
    pub host: Option<String>,
    pub on_submit: Callback<LoginInfo>,
}

pub struct Login {
    host: String,
    token: String,
    user: String,
}

pub enum LoginMsg {
    HostChanged(String),
    TokenChanged(String),
    UserChanged(String),
    SubmitClicked,
}

impl Component for Login {
    type Message = LoginMsg;
    type Properties = LoginProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            host: ctx.props().host.clone().unwrap_or_default(),
            token: String::new(),
            user: String::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LoginMsg::HostChanged(h) => self.host = h,
            LoginMsg::TokenChanged(t) => self.token = t,
            LoginMsg::UserChanged(u) => self.user = u,
            LoginMsg::SubmitClicked => {
                if self.host.trim().is_empty() || self.token.trim().is_empty() {
                    return false;
                }
                // An empty user name gets resolved with GET /me once logged in
                let username = Some(self.user.trim())
                    .filter(|u| !u.is_empty())
                    .map(String::from);
                ctx.props().on_submit.emit(LoginInfo {
                    host: String::from(self.host.trim()),
                    session: Session {
                        token: AuthToken(String::from(self.token.trim())),
                        username,
                    },
                });
                return false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        macro_rules! callback_for {
            ($msg:ident) => {
                ctx.link().callback(|e: web_sys::Event| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    LoginMsg::$msg(input.value())
                })
            };
        }
        html! {<>
            <div class="text-center my-4">
                <h1>{ "Login" }</h1>
            </div>
            <form class="login-form" onsubmit={ctx.link().callback(|e: SubmitEvent| {
                e.prevent_default();
                LoginMsg::SubmitClicked
            })}>
                <div class="input-group mb-3">
                    <label class="input-group-text col-xl-1" for="host">{ "Host" }</label>
                    <input
                        type="url"
                        class="form-control form-control-lg"
                        id="host"
                        placeholder="https://example.org"
                        value={self.host.clone()}
                        onchange={callback_for!(HostChanged)}
                    />
                </div>
                <div class="input-group mb-3">
                    <label class="input-group-text col-xl-1" for="token">{ "Token" }</label>
                    <input
                        type="password"
                        class="form-control form-control-lg"
                        id="token"
                        placeholder="bearer token"
                        value={self.token.clone()}
                        onchange={callback_for!(TokenChanged)}
                    />
                </div>
                <div class="input-group mb-3">
                    <label class="input-group-text col-xl-1" for="user">{ "Username" }</label>
                    <input
                        type="text"
                        class="form-control form-control-lg"
                        id="user"
                        placeholder="optional"
                        value={self.user.clone()}
                        onchange={callback_for!(UserChanged)}
                    />
                </div>
                <button type="submit" class="btn btn-primary">
                    { "Connect" }
                </button>
            </form>
        </>}
    }
}
