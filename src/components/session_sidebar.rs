use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::types::SessionId;

#[derive(Properties, PartialEq)]
pub struct SessionSidebarProps {
    pub sessions: Vec<SessionId>,
    pub active: Option<SessionId>,
    pub loading: bool,
    pub notice: Option<String>,
    pub on_new_session: Callback<()>,
    pub on_select: Callback<SessionId>,
    pub on_refresh: Callback<()>,
    pub on_dismiss_notice: Callback<()>,
}

#[function_component(SessionSidebar)]
pub fn session_sidebar(props: &SessionSidebarProps) -> Html {
    let on_change = {
        let on_select = props.on_select.clone();
        Callback::from(move |event: Event| {
            let target = event.target_unchecked_into::<HtmlSelectElement>();
            let value = target.value();
            if !value.is_empty() {
                on_select.emit(SessionId::from(value));
            }
        })
    };

    let on_new_session = {
        let cb = props.on_new_session.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    let on_refresh = {
        let cb = props.on_refresh.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    // A locally started session is not in the backend list until its first reply.
    let mut options = props.sessions.clone();
    if let Some(active) = &props.active {
        if !options.contains(active) {
            options.insert(0, active.clone());
        }
    }

    html! {
        <div style="width:320px; min-width:260px; padding:1.5em; background:#f8f9fa; border-right:1px solid #ddd; display:flex; flex-direction:column; gap:1em; box-sizing:border-box;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h1 style="margin:0; font-size:1.3em; color:#333;">{ "Chat" }</h1>
                <button onclick={on_new_session} style="padding:0.4em 0.8em; border:1px solid #6c757d; background:white; border-radius:4px; cursor:pointer;">
                    { "Start New Session" }
                </button>
            </div>

            <div style="display:flex; flex-direction:column; gap:0.5em;">
                <label style="font-weight:bold; color:#555;">{ "Select Session:" }</label>
                <select onchange={on_change} disabled={props.loading} style="width:100%; padding:0.5em; border:1px solid #ccc; border-radius:4px;">
                    <option value="" selected={props.active.is_none()}>{ "-- Choose a session --" }</option>
                    { for options.iter().map(|id| {
                        let selected = props.active.as_ref() == Some(id);
                        html! { <option value={id.to_string()} selected={selected}>{ id.to_string() }</option> }
                    })}
                </select>
                <button onclick={on_refresh} disabled={props.loading} style="padding:0.4em 0; border:1px solid #ccc; background:white; border-radius:4px; cursor:pointer;">
                    { if props.loading { "Loading..." } else { "Refresh" } }
                </button>
            </div>

            { if props.loading {
                html! {
                    <div style="display:flex; align-items:center; gap:0.5em; color:#0056b3;">
                        <div class="spinner" style="width:16px; height:16px; border:2px solid #f3f3f3; border-top:2px solid #007bff; border-radius:50%; animation:spin 1s linear infinite;"></div>
                        { "Loading sessions..." }
                    </div>
                }
            } else {
                html! {}
            }}

            { if let Some(notice) = &props.notice {
                let on_dismiss = {
                    let cb = props.on_dismiss_notice.clone();
                    Callback::from(move |_: MouseEvent| cb.emit(()))
                };
                html! {
                    <div style="padding:0.75em; background:#fff3cd; border:1px solid #ffeeba; border-radius:4px; color:#856404; font-size:0.9em; display:flex; gap:0.5em; align-items:flex-start;">
                        <div style="flex:1;">{ notice.clone() }</div>
                        <button onclick={on_dismiss} style="background:none; border:none; cursor:pointer; color:#856404;">{ "×" }</button>
                    </div>
                }
            } else {
                html! {}
            }}

            { if props.sessions.is_empty() {
                html! {}
            } else {
                html! {
                    <div style="color:#666; font-size:0.85em;">
                        { format!("{} session{} on server", props.sessions.len(), if props.sessions.len() != 1 { "s" } else { "" }) }
                    </div>
                }
            }}
        </div>
    }
}
