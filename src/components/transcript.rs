use yew::prelude::*;

use crate::controller::TranscriptEntry;
use crate::formatter;
use crate::types::Role;

#[derive(Properties, PartialEq)]
pub struct TranscriptProps {
    pub entries: Vec<TranscriptEntry>,
}

#[function_component(Transcript)]
pub fn transcript(props: &TranscriptProps) -> Html {
    let entries = &props.entries;

    if entries.is_empty() {
        return html! {
            <div style="flex:1; display:flex; align-items:center; justify-content:center; color:#888; font-size:1.2em;">
                { "No messages yet. Start chatting!" }
            </div>
        };
    }

    html! {
        <div style="flex:1; overflow-y:auto; padding:2em 3em; display:flex; flex-direction:column; gap:0.75em;">
            { for entries.iter().map(|entry| {
                let is_user = entry.message.role == Role::User;
                let row_style = format!(
                    "display:flex; justify-content:{};",
                    if is_user { "flex-end" } else { "flex-start" }
                );
                let bubble_style = format!(
                    "max-width:70%; padding:0.6em 0.9em; border-radius:8px; white-space:pre-wrap; word-wrap:break-word; border:1px solid #ddd; background:{};",
                    if is_user { "#e9ecef" } else { "#fff" }
                );

                let body = if entry.is_pending() {
                    html! {
                        <div style="display:flex; align-items:center; gap:0.5em; color:#666;">
                            <div class="spinner" style="width:14px; height:14px; border:2px solid #f3f3f3; border-top:2px solid #007bff; border-radius:50%; animation:spin 1s linear infinite;"></div>
                            { entry.message.content.clone() }
                        </div>
                    }
                } else if is_user {
                    html! { { entry.message.content.clone() } }
                } else {
                    formatter::render(&formatter::parse(&entry.message.content))
                };

                html! {
                    <div style={row_style}>
                        <div style={bubble_style}>
                            { if is_user {
                                html! {}
                            } else {
                                html! { <div style="font-weight:bold; margin-bottom:0.25em;">{ "Bot" }</div> }
                            }}
                            { body }
                        </div>
                    </div>
                }
            }) }
        </div>
    }
}
