use ideabox_client::{
    api::{Comment, CommentId},
    TIME_FORMAT,
};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct CommentItemProps {
    pub comment: Comment,
    pub level: usize,
    pub can_delete: bool,

    /// Text of the reply box, if it is open on this comment
    pub reply_text: Option<String>,

    pub on_reply: Callback<CommentId>,
    pub on_reply_text: Callback<String>,
    pub on_cancel_reply: Callback<()>,
    pub on_submit_reply: Callback<()>,
    pub on_delete: Callback<CommentId>,
}

#[function_component(CommentItem)]
pub fn comment_item(p: &CommentItemProps) -> Html {
    let c = &p.comment;
    let on_reply = {
        let id = c.id.clone();
        p.on_reply.reform(move |_| id.clone())
    };
    let on_delete = {
        let id = c.id.clone();
        p.on_delete.reform(move |_| id.clone())
    };
    let reply_box = p.reply_text.as_ref().map(|text| {
        let on_cancel = p.on_cancel_reply.clone();
        let on_submit = p.on_submit_reply.clone();
        html! {
            <div class="input-group mt-2">
                <input
                    type="text"
                    class="form-control"
                    placeholder={format!("Reply to @{}", c.username)}
                    value={text.clone()}
                    oninput={p.on_reply_text.reform(|e: InputEvent| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        input.value()
                    })}
                    onkeydown={Callback::from(move |e: KeyboardEvent| {
                        match &e.key() as &str {
                            "Enter" => on_submit.emit(()),
                            "Escape" => on_cancel.emit(()),
                            _ => (),
                        }
                    })}
                />
                <button
                    type="button"
                    class="btn btn-primary"
                    onclick={p.on_submit_reply.reform(|_| ())}
                >
                    { "Reply" }
                </button>
                <button
                    type="button"
                    class="btn btn-outline-secondary"
                    onclick={p.on_cancel_reply.reform(|_| ())}
                >
                    { "Cancel" }
                </button>
            </div>
        }
    });
    html! {
        <li
            class="list-group-item comment"
            style={format!("margin-left: {}rem", 2 * p.level)}
        >
            <div class="d-flex align-items-baseline">
                <strong class="me-2">{ &c.username }</strong>
                <small class="text-muted">{ c.created_at.format(TIME_FORMAT).to_string() }</small>
            </div>
            <div class="comment-body">{ &c.comment }</div>
            <div class="comment-actions">
                <button type="button" class="btn btn-link btn-sm" onclick={on_reply}>
                    { "Reply" }
                </button>
                if p.can_delete {
                    <button type="button" class="btn btn-link btn-sm text-danger" onclick={on_delete}>
                        { "Delete" }
                    </button>
                }
            </div>
            { for reply_box }
        </li>
    }
}
