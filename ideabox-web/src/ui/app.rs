use std::{rc::Rc, sync::Arc};

use futures::lock::Mutex;
use gloo_storage::{LocalStorage, Storage};
use ideabox_client::{
    api::{Comment, CommentId, IdeaId},
    own_comment, Backend, CommentStore, Error, HttpBackend, Redirect, ReplyBox, SessionStore, Thread,
    ThreadConfig,
};
use yew::prelude::*;

use crate::{ui, LocalStorageSession};

const KEY_IDEA: &str = "idea";

type Store = Rc<Mutex<CommentStore<HttpBackend>>>;

#[derive(Clone, PartialEq, Properties)]
pub struct AppProps {
    pub host: String,
    pub on_logout: Callback<()>,
}

/// Request that produced a `Loaded` message
#[derive(Debug)]
pub enum Op {
    Fetch,
    PostRoot,
    Reply(CommentId),
    Delete,
}

pub enum AppMsg {
    Logout,
    IdeaChanged(String),
    Identified(Result<String, Error>),
    Refresh,

    RootTextChanged(String),
    PostRoot,
    OpenReply(CommentId),
    ReplyTextChanged(String),
    CancelReply,
    SubmitReply,
    Delete(CommentId),

    Loaded {
        idea: IdeaId,
        op: Op,
        res: Result<(bool, Vec<Comment>), Error>,
    },
}

pub struct App {
    idea: IdeaId,
    store: Store,
    comments: Vec<Comment>,
    root_text: String,
    reply: ReplyBox,
    username: Option<String>,
    error: Option<String>,
    loading: bool,
}

fn finish(
    idea: IdeaId,
    op: Op,
    store: &CommentStore<HttpBackend>,
    res: Result<bool, Error>,
) -> AppMsg {
    AppMsg::Loaded {
        idea,
        op,
        res: res.map(|done| (done, store.snapshot().to_vec())),
    }
}

impl App {
    fn new_store(host: &str, idea: &IdeaId) -> Store {
        let backend = HttpBackend::new(String::from(host), Arc::new(LocalStorageSession));
        Rc::new(Mutex::new(CommentStore::new(backend, idea.clone())))
    }

    fn fetch(&mut self, ctx: &Context<Self>) {
        self.loading = true;
        let store = self.store.clone();
        let idea = self.idea.clone();
        ctx.link().send_future(async move {
            let mut store = store.lock().await;
            let res = store.fetch().await.map(|_| true);
            finish(idea, Op::Fetch, &store, res)
        });
    }

    fn post(&self, ctx: &Context<Self>, parent: Option<CommentId>, text: String) {
        let store = self.store.clone();
        let idea = self.idea.clone();
        let op = match &parent {
            None => Op::PostRoot,
            Some(id) => Op::Reply(id.clone()),
        };
        ctx.link().send_future(async move {
            let mut store = store.lock().await;
            let res = store.post(parent, &text).await.map(|c| c.is_some());
            finish(idea, op, &store, res)
        });
    }

    fn identify(&self, ctx: &Context<Self>) {
        let store = self.store.clone();
        ctx.link().send_future(async move {
            let store = store.lock().await;
            let res = store.backend().whoami().await.map(|me| me.username);
            AppMsg::Identified(res)
        });
    }

    /// Returns whether the view needs to be re-rendered
    fn handle_error(&mut self, ctx: &Context<Self>, e: Error) -> bool {
        match e.redirect() {
            Redirect::Login => {
                tracing::info!("session is no longer valid, going back to login");
                ctx.props().on_logout.emit(());
                false
            }
            Redirect::ErrorPage => {
                tracing::error!(?e, "comment request failed");
                self.error = Some(e.to_string());
                true
            }
        }
    }
}

impl Component for App {
    type Message = AppMsg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let idea = LocalStorage::get(KEY_IDEA).unwrap_or_else(|_| IdeaId::from("1"));
        let username = LocalStorageSession.load().and_then(|s| s.username);
        let mut this = App {
            store: App::new_store(&ctx.props().host, &idea),
            idea,
            comments: Vec::new(),
            root_text: String::new(),
            reply: ReplyBox::new(),
            username,
            error: None,
            loading: false,
        };
        if this.username.is_none() {
            this.identify(ctx);
        }
        this.fetch(ctx);
        this
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::Logout => {
                ctx.props().on_logout.emit(());
                return false;
            }
            AppMsg::IdeaChanged(idea) => {
                let idea = IdeaId(String::from(idea.trim()));
                if idea.0.is_empty() || idea == self.idea {
                    return false;
                }
                if let Err(e) = LocalStorage::set(KEY_IDEA, &idea) {
                    tracing::error!(?e, "failed saving idea to LocalStorage");
                }
                // Requests still in flight for the previous idea keep their
                // own store, and their answers get dropped in `Loaded`
                self.store = App::new_store(&ctx.props().host, &idea);
                self.idea = idea;
                self.comments.clear();
                self.root_text.clear();
                self.reply.cancel();
                self.error = None;
                self.fetch(ctx);
            }
            AppMsg::Identified(Ok(username)) => {
                if let Some(mut session) = LocalStorageSession.load() {
                    session.username = Some(username.clone());
                    LocalStorageSession.save(session);
                }
                self.username = Some(username);
            }
            AppMsg::Identified(Err(e)) => return self.handle_error(ctx, e),
            AppMsg::Refresh => {
                self.error = None;
                self.fetch(ctx);
            }
            AppMsg::RootTextChanged(text) => self.root_text = text,
            AppMsg::PostRoot => {
                // Blank text is refused by the store without any request
                self.post(ctx, None, self.root_text.clone());
                return false;
            }
            AppMsg::OpenReply(id) => self.reply.open(id),
            AppMsg::ReplyTextChanged(text) => self.reply.set_text(text),
            AppMsg::CancelReply => self.reply.cancel(),
            AppMsg::SubmitReply => {
                let new = match self.reply.pending() {
                    Some(new) => new,
                    None => return false,
                };
                self.post(ctx, new.parent_id, new.comment);
                return false;
            }
            AppMsg::Delete(id) => {
                if own_comment(&self.comments, &id, self.username.as_deref()).is_none() {
                    tracing::warn!(%id, "refusing to delete a comment we did not author");
                    return false;
                }
                let confirmed = web_sys::window()
                    .and_then(|w| {
                        w.confirm_with_message("Are you sure you want to delete this comment?")
                            .ok()
                    })
                    .unwrap_or(false);
                if !confirmed {
                    return false;
                }
                let store = self.store.clone();
                let idea = self.idea.clone();
                ctx.link().send_future(async move {
                    let mut store = store.lock().await;
                    let res = store.delete(&id, |_| true).await;
                    finish(idea, Op::Delete, &store, res)
                });
                return false;
            }
            AppMsg::Loaded { idea, op, res } => {
                if idea != self.idea {
                    tracing::debug!(%idea, ?op, "dropping answer for an idea no longer shown");
                    return false;
                }
                self.loading = false;
                match res {
                    Ok((done, comments)) => {
                        self.comments = comments;
                        match (&op, done) {
                            (Op::PostRoot, true) => self.root_text.clear(),
                            (Op::Reply(target), true) => self.reply.submitted(target),
                            _ => (),
                        }
                    }
                    Err(e) => return self.handle_error(ctx, e),
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let header = html! {
            <div class="d-flex align-items-center my-3">
                <label class="me-2" for="idea">{ "Idea" }</label>
                <input
                    type="text"
                    class="form-control w-auto me-auto"
                    id="idea"
                    value={self.idea.0.clone()}
                    onchange={ctx.link().callback(|e: web_sys::Event| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        AppMsg::IdeaChanged(input.value())
                    })}
                />
                <span class="me-2">{ self.username.clone().unwrap_or_default() }</span>
                <button type="button" class="btn btn-outline-secondary" onclick={ctx.link().callback(|_| AppMsg::Logout)}>
                    { "Logout" }
                </button>
            </div>
        };

        if let Some(message) = &self.error {
            return html! {
                <div class="container">
                    { header }
                    <ui::ErrorView
                        message={message.clone()}
                        on_retry={ctx.link().callback(|_| AppMsg::Refresh)}
                    />
                </div>
            };
        }

        let thread = Thread::build(&self.comments, &ThreadConfig::default());
        let body = if thread.is_empty() {
            match self.loading {
                true => html! { <p class="text-muted">{ "Loading..." }</p> },
                false => html! { <p class="text-muted">{ "No Comments Present" }</p> },
            }
        } else {
            thread
                .iter()
                .map(|node| {
                    let c = &node.comment;
                    html! {
                        <ui::CommentItem
                            key={c.id.0.clone()}
                            comment={c.clone()}
                            level={node.level}
                            can_delete={c.is_authored_by(self.username.as_deref())}
                            reply_text={self.reply.is_replying_to(&c.id).then(|| String::from(self.reply.text()))}
                            on_reply={ctx.link().callback(AppMsg::OpenReply)}
                            on_reply_text={ctx.link().callback(AppMsg::ReplyTextChanged)}
                            on_cancel_reply={ctx.link().callback(|_| AppMsg::CancelReply)}
                            on_submit_reply={ctx.link().callback(|_| AppMsg::SubmitReply)}
                            on_delete={ctx.link().callback(AppMsg::Delete)}
                        />
                    }
                })
                .collect::<Html>()
        };

        html! {
            <div class="container">
                { header }
                <ui::PostBox
                    text={self.root_text.clone()}
                    on_input={ctx.link().callback(AppMsg::RootTextChanged)}
                    on_submit={ctx.link().callback(|_| AppMsg::PostRoot)}
                />
                <ul class="list-group comments">
                    { body }
                </ul>
            </div>
        }
    }
}
