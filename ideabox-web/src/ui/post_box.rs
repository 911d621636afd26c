use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct PostBoxProps {
    pub text: String,
    pub on_input: Callback<String>,
    pub on_submit: Callback<()>,
}

/// Input for new root comments. Blank text cannot be submitted, and the text
/// stays until the comment is actually created.
#[function_component(PostBox)]
pub fn post_box(p: &PostBoxProps) -> Html {
    let blank = p.text.trim().is_empty();
    let onkeydown = {
        let on_submit = p.on_submit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !blank {
                on_submit.emit(());
            }
        })
    };
    html! {
        <div class="input-group my-3">
            <input
                type="text"
                class="form-control"
                placeholder="Add a comment"
                aria-label="Add a comment"
                value={p.text.clone()}
                oninput={p.on_input.reform(|e: InputEvent| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    input.value()
                })}
                {onkeydown}
            />
            <button
                type="button"
                class="btn btn-primary"
                disabled={blank}
                onclick={p.on_submit.reform(|_| ())}
            >
                { "Post" }
            </button>
        </div>
    }
}
