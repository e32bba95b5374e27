use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ComposerProps {
    pub value: String,
    pub disabled: bool,
    pub on_input: Callback<String>,
    pub on_send: Callback<()>,
}

#[function_component(Composer)]
pub fn composer(props: &ComposerProps) -> Html {
    let on_input = {
        let cb = props.on_input.clone();
        Callback::from(move |event: InputEvent| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            cb.emit(target.value());
        })
    };

    let on_keydown = {
        let cb = props.on_send.clone();
        let disabled = props.disabled;
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Enter" && !disabled {
                event.prevent_default();
                cb.emit(());
            }
        })
    };

    let on_click = {
        let cb = props.on_send.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <div style="display:flex; gap:0.5em; padding:1em; border-top:1px solid #ddd; background:#fafafa;">
            <input
                type="text"
                value={props.value.clone()}
                oninput={on_input}
                onkeydown={on_keydown}
                placeholder="Type your message..."
                style="flex:1; padding:0.6em; border:1px solid #ccc; border-radius:4px; font-size:1em;"
            />
            <button
                onclick={on_click}
                disabled={props.disabled}
                style={format!(
                    "padding:0.6em 1.5em; font-size:1em; border:none; border-radius:4px; {}",
                    if props.disabled {
                        "background:#ccc; cursor:not-allowed;"
                    } else {
                        "background:#6c757d; color:white; cursor:pointer;"
                    }
                )}
            >
                { "Send" }
            </button>
        </div>
    }
}
