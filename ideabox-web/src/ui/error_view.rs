use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ErrorViewProps {
    pub message: String,
    pub on_retry: Callback<()>,
}

#[function_component(ErrorView)]
pub fn error_view(p: &ErrorViewProps) -> Html {
    html! {
        <div class="alert alert-danger m-4" role="alert">
            <h4 class="alert-heading">{ "Something went wrong" }</h4>
            <p>{ &p.message }</p>
            <button
                type="button"
                class="btn btn-outline-danger"
                onclick={p.on_retry.reform(|_| ())}
            >
                { "Retry" }
            </button>
        </div>
    }
}
